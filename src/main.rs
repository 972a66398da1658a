//! Ring Escape entry point
//!
//! Headless demo: runs one session with a scripted tilt source at the
//! nominal tick cadence and prints the outcome. Pass a seed as the first
//! argument to replay a specific board.

use glam::Vec2;

use ring_escape::Tuning;
use ring_escape::consts::TICK_PERIOD;
use ring_escape::session::{NoShakeSensor, Session, TiltSource};
use ring_escape::sim::GameEvent;

/// Scripted tilt that slowly sweeps direction, rolling the ball outward
/// through the obstacle field
struct ScriptedTilt {
    t: f32,
}

impl TiltSource for ScriptedTilt {
    fn sample(&mut self) -> Option<Vec2> {
        self.t += TICK_PERIOD;
        Some(Vec2::new(
            (self.t * 0.6).sin() * 6.0,
            4.0 + (self.t * 0.6).cos() * 6.0,
        ))
    }
}

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(2125);
    log::info!("Ring Escape (headless) starting with seed {seed}");

    let mut session = Session::new(
        seed,
        Tuning::default(),
        Box::new(ScriptedTilt { t: 0.0 }),
        Box::new(NoShakeSensor),
    );

    let mut ticks: u64 = 0;
    while !session.is_over() {
        for event in session.advance(TICK_PERIOD) {
            match event {
                GameEvent::RingCleared {
                    ordinal,
                    effect_label,
                } => log::info!("cleared ring {ordinal} ({effect_label})"),
                GameEvent::ShakeAck => log::info!("shake acknowledged"),
                GameEvent::Won { score } => log::info!("won with score {score}"),
                GameEvent::Lost { reason } => log::info!("lost: {reason:?}"),
            }
        }
        ticks += 1;
    }

    let snap = session.snapshot();
    println!(
        "{:?} - score {} - rings {}/{} - {:.1}s left - {} ticks",
        snap.hud.phase,
        snap.hud.score,
        snap.hud.ring_completions,
        snap.hud.target_ring_count,
        snap.hud.time_left,
        ticks
    );
}
