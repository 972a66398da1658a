//! Ring Escape - a tilt-steered concentric ring arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, procedural obstacle field, game state)
//! - `session`: External-interface seam (tilt/shake sources, render snapshot pipeline)
//! - `tuning`: Data-driven game balance

pub mod session;
pub mod sim;
pub mod tuning;

pub use session::{Session, ShakeSource, TiltSource};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Nominal tick cadence (~60 Hz); integration always uses measured elapsed time
    pub const TICK_PERIOD: f32 = 1.0 / 60.0;
    /// Upper clamp on measured elapsed time per tick (clock drift guard)
    pub const MAX_TICK_DT: f32 = 0.1;

    /// Board center in world pixels; rings, connector walls and the hazard all share it
    pub const BOARD_CENTER: Vec2 = Vec2::new(600.0, 800.0);
}

/// Normalize an angle to [0, 360) degrees
#[inline]
pub fn normalize_deg(mut angle: f32) -> f32 {
    angle %= 360.0;
    if angle < 0.0 {
        angle += 360.0;
    }
    angle
}

/// Smallest angular separation between two angles, degrees [0, 180]
#[inline]
pub fn deg_separation(a: f32, b: f32) -> f32 {
    let d = (normalize_deg(a) - normalize_deg(b)).abs();
    d.min(360.0 - d)
}

/// Check whether `angle` lies in the span starting at `start` sweeping `width` degrees
/// (handles spans that wrap past 360)
#[inline]
pub fn deg_in_span(angle: f32, start: f32, width: f32) -> bool {
    normalize_deg(angle - start) <= width
}

/// Point at `radius` pixels from `center` along direction `deg`
#[inline]
pub fn polar_offset(center: Vec2, radius: f32, deg: f32) -> Vec2 {
    let rad = deg.to_radians();
    center + Vec2::new(radius * rad.cos(), radius * rad.sin())
}

/// Angle of `point` as seen from `center`, degrees [0, 360)
#[inline]
pub fn angle_from_center(center: Vec2, point: Vec2) -> f32 {
    normalize_deg((point.y - center.y).atan2(point.x - center.x).to_degrees())
}
