//! The central black hole
//!
//! Sits at the board center, holds for a start delay, then grows linearly
//! whenever it isn't paused. Growth is monotonic; only explicit pause credit
//! (time gained from gap effects) stalls it. The ball starts on top of the
//! hazard, so the delay is the escape window.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hazard {
    pub center: Vec2,
    pub radius: f32,
    /// px/s once armed and unpaused
    pub growth_rate: f32,
    /// Remaining grace period before the hazard arms
    pub delay: f32,
    /// Remaining pause credit, consumed before any growth resumes
    pub pause: f32,
}

impl Hazard {
    pub fn new(center: Vec2, tuning: &Tuning) -> Self {
        Self {
            center,
            radius: tuning.hazard_initial_radius,
            growth_rate: tuning.hazard_growth_rate,
            delay: tuning.hazard_start_delay,
            pause: 0.0,
        }
    }

    /// Advance one tick: burn delay first, then pause credit, then grow
    pub fn advance(&mut self, dt: f32) {
        if self.delay > 0.0 {
            self.delay -= dt;
        } else if self.pause > 0.0 {
            self.pause -= dt;
        } else {
            self.radius += self.growth_rate * dt;
        }
    }

    /// Whether the start delay has elapsed (collisions only count after)
    #[inline]
    pub fn armed(&self) -> bool {
        self.delay <= 0.0
    }

    /// Credit pause time; non-positive amounts are ignored
    pub fn pause_for(&mut self, seconds: f32) {
        if seconds > 0.0 {
            self.pause += seconds;
        }
    }

    /// Ball swallowed: center distance within combined radii, once armed
    pub fn swallows(&self, ball_pos: Vec2, ball_radius: f32) -> bool {
        self.armed() && ball_pos.distance(self.center) <= self.radius + ball_radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::BOARD_CENTER;

    fn hazard() -> Hazard {
        Hazard::new(BOARD_CENTER, &Tuning::default())
    }

    #[test]
    fn test_no_growth_during_delay() {
        let mut h = hazard();
        let r0 = h.radius;
        for _ in 0..60 {
            h.advance(1.0 / 60.0);
        }
        // One second in, still four seconds of delay left
        assert!((h.radius - r0).abs() < f32::EPSILON);
        assert!(!h.armed());
    }

    #[test]
    fn test_grows_after_delay() {
        let mut h = hazard();
        h.delay = 0.0;
        let r0 = h.radius;
        h.advance(1.0);
        assert!((h.radius - (r0 + h.growth_rate)).abs() < 0.001);
        // Monotonic
        let r1 = h.radius;
        h.advance(0.5);
        assert!(h.radius > r1);
    }

    #[test]
    fn test_pause_credit_stalls_growth() {
        let mut h = hazard();
        h.delay = 0.0;
        h.pause_for(2.0);
        let r0 = h.radius;
        h.advance(1.0);
        assert!((h.radius - r0).abs() < f32::EPSILON);
        h.advance(1.5);
        // Credit spent; growth resumes on the next tick
        h.advance(1.0);
        assert!(h.radius > r0);
    }

    #[test]
    fn test_negative_pause_ignored() {
        let mut h = hazard();
        h.pause_for(-3.0);
        assert!((h.pause - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_swallow_at_center() {
        // Ball centered on the hazard: distance 0 vs radii 40 + 40
        let mut h = hazard();
        assert!(!h.swallows(BOARD_CENTER, 40.0), "unarmed hazard never swallows");
        h.delay = 0.0;
        assert!(h.swallows(BOARD_CENTER, 40.0));
        // Just out of reach
        let clear = BOARD_CENTER + Vec2::new(h.radius + 40.0 + 1.0, 0.0);
        assert!(!h.swallows(clear, 40.0));
    }
}
