//! Session driver and sensor seams
//!
//! The simulation consumes the platform through two narrow traits: a
//! continuously-updated tilt vector (sampled, last-value semantics) and a
//! fire-once shake notification. The `Session` owns both plus the game
//! state, clamps measured elapsed time, and publishes immutable snapshots.
//! Dropping the session releases the sources and stops the loop; nothing
//! keeps mutating ring/ball state afterward.

use glam::Vec2;

use crate::consts::MAX_TICK_DT;
use crate::sim::{GameEvent, GameState, RenderSnapshot, TickInput, tick};
use crate::tuning::Tuning;

/// Continuous tilt input. `sample` returns the most recent value without
/// blocking; `None` means the sensor is unavailable.
pub trait TiltSource {
    fn sample(&mut self) -> Option<Vec2>;
}

/// Discrete shake input. `take` drains a pending notification; shakes inside
/// the simulation's debounce window are discarded downstream.
pub trait ShakeSource {
    fn take(&mut self) -> bool;
}

/// Absent tilt sensor; the session steers with neutral input
pub struct NoTiltSensor;

impl TiltSource for NoTiltSensor {
    fn sample(&mut self) -> Option<Vec2> {
        None
    }
}

/// Shake source that never fires
pub struct NoShakeSensor;

impl ShakeSource for NoShakeSensor {
    fn take(&mut self) -> bool {
        false
    }
}

/// One play session: game state plus its input sources
pub struct Session {
    state: GameState,
    tilt: Box<dyn TiltSource>,
    shake: Box<dyn ShakeSource>,
    sensor_warned: bool,
}

impl Session {
    pub fn new(
        seed: u64,
        tuning: Tuning,
        tilt: Box<dyn TiltSource>,
        shake: Box<dyn ShakeSource>,
    ) -> Self {
        Self {
            state: GameState::new(seed, tuning),
            tilt,
            shake,
            sensor_warned: false,
        }
    }

    /// Advance one tick using measured elapsed seconds (clamped against
    /// clock drift). Returns the events the tick emitted.
    pub fn advance(&mut self, elapsed: f32) -> &[GameEvent] {
        let dt = elapsed.clamp(0.0, MAX_TICK_DT);
        let tilt = match self.tilt.sample() {
            Some(v) => v,
            None => {
                // Non-fatal: run with neutral input, warn once
                if !self.sensor_warned {
                    log::warn!("tilt sensor unavailable; steering with neutral input");
                    self.sensor_warned = true;
                }
                Vec2::ZERO
            }
        };
        let input = TickInput {
            tilt,
            shake: self.shake.take(),
        };
        tick(&mut self.state, &input, dt);
        &self.state.events
    }

    /// Immutable geometry for the render sink
    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot::capture(&self.state)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::TICK_PERIOD;
    use crate::sim::GamePhase;

    struct AlwaysShake;

    impl ShakeSource for AlwaysShake {
        fn take(&mut self) -> bool {
            true
        }
    }

    #[test]
    fn test_runs_without_a_tilt_sensor() {
        let mut session = Session::new(
            1,
            Tuning::default(),
            Box::new(NoTiltSensor),
            Box::new(NoShakeSensor),
        );
        for _ in 0..120 {
            session.advance(TICK_PERIOD);
        }
        // Neutral input drifts the ball but the session keeps playing
        assert_eq!(session.state().phase, GamePhase::Playing);
    }

    #[test]
    fn test_elapsed_time_is_clamped() {
        let mut session = Session::new(
            2,
            Tuning::default(),
            Box::new(NoTiltSensor),
            Box::new(NoShakeSensor),
        );
        // A five second stall must not integrate five seconds of motion
        session.advance(5.0);
        let used = session.state().tuning.session_seconds - session.state().time_left;
        assert!(used <= MAX_TICK_DT + f32::EPSILON);
    }

    #[test]
    fn test_noisy_shake_source_is_debounced() {
        let mut session = Session::new(
            3,
            Tuning::default(),
            Box::new(NoTiltSensor),
            Box::new(AlwaysShake),
        );
        let mut acks = 0;
        for _ in 0..30 {
            acks += session
                .advance(TICK_PERIOD)
                .iter()
                .filter(|e| **e == GameEvent::ShakeAck)
                .count();
        }
        assert_eq!(acks, 1);
    }
}
