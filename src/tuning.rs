//! Data-driven game balance
//!
//! Every gameplay constant lives in one serializable struct so the balance can
//! be tweaked from a JSON file without recompiling. Defaults carry the
//! reference values the game shipped with. The tuning rides inside the
//! simulation context; nothing here is ambient/global.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Ball physics ===
    /// Tilt-to-acceleration scale
    pub acceleration_factor: f32,
    /// Velocity damping applied every tick
    pub friction: f32,
    /// Speed clamp, px per reference frame
    pub max_speed: f32,
    /// Empirical vertical tilt offset (device held at a comfortable angle reads ~4)
    pub tilt_offset_y: f32,
    /// Position integration is velocity * dt * this, keeping feel stable under jitter
    pub frame_rate_reference: f32,
    pub ball_radius: f32,

    // === Central hazard ===
    pub hazard_initial_radius: f32,
    /// Growth in px/s once the start delay has elapsed
    pub hazard_growth_rate: f32,
    /// Grace period before the hazard arms and starts growing
    pub hazard_start_delay: f32,

    // === Rings ===
    pub first_inner_radius: f32,
    pub ring_thickness: f32,
    /// Radial distance between one ring's outer edge and the next ring's inner edge
    pub ring_spacing: f32,
    /// Completions needed to win
    pub target_ring_count: u32,
    /// Linear gap opening in px; angular width shrinks as rings grow
    pub gap_arc_px: f32,
    /// Cap on the difficulty-driven gap count reduction
    pub gap_reduction_cap: u32,

    // === Connector walls ===
    pub wall_half_width: f32,
    pub wall_base_count: i32,
    /// Extra walls per ring-pair ordinal
    pub wall_count_per_ring: i32,
    /// Minimum arc separation between walls of one ring pair, world px
    pub wall_min_spacing_px: f32,
    /// Keep-out margin around gap spans when placing walls, degrees
    pub wall_gap_margin_deg: f32,
    pub wall_candidate_step_deg: f32,

    // === Contact resolution ===
    /// Extra push past the surface when resolving gap boundary hits
    pub gap_push_epsilon: f32,
    /// Extra push for connector and ring wall hits
    pub wall_push_epsilon: f32,

    // === Session / scoring ===
    pub session_seconds: f32,
    /// Ring-clear bonus starts here and decays with time taken
    pub ring_bonus_base: f32,
    pub ring_bonus_decay_per_sec: f32,
    /// Score per remaining second on victory
    pub win_bonus_per_sec: i64,
    /// Minimum spacing between honored shake triggers
    pub shake_debounce_secs: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            acceleration_factor: 0.1,
            friction: 0.92,
            max_speed: 10.0,
            tilt_offset_y: 4.0,
            frame_rate_reference: 60.0,
            ball_radius: 40.0,

            hazard_initial_radius: 40.0,
            hazard_growth_rate: 15.0,
            hazard_start_delay: 5.0,

            first_inner_radius: 200.0,
            ring_thickness: 50.0,
            ring_spacing: 200.0,
            target_ring_count: 15,
            gap_arc_px: 120.0,
            gap_reduction_cap: 4,

            wall_half_width: 25.0,
            wall_base_count: 6,
            wall_count_per_ring: 10,
            wall_min_spacing_px: 200.0,
            wall_gap_margin_deg: 5.0,
            wall_candidate_step_deg: 0.1,

            gap_push_epsilon: 0.1,
            wall_push_epsilon: 0.5,

            session_seconds: 60.0,
            ring_bonus_base: 50.0,
            ring_bonus_decay_per_sec: 5.0,
            win_bonus_per_sec: 5,
            shake_debounce_secs: 1.0,
        }
    }
}

impl Tuning {
    /// Angular width of a gap on a ring with the given inner radius, degrees
    #[inline]
    pub fn gap_width_deg(&self, inner_radius: f32) -> f32 {
        (self.gap_arc_px / inner_radius).to_degrees()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
