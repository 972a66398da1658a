//! Immutable render snapshots
//!
//! The simulate/render split is an explicit pipeline: each tick produces a
//! self-contained snapshot the renderer can consume without touching live
//! simulation state, and the core never reads anything back. Ring geometry
//! arrives pre-split into solid arcs and labeled gaps so the sink only draws.

use glam::Vec2;
use serde::Serialize;

use super::ring::Ring;
use super::state::{GamePhase, GameState};

#[derive(Debug, Clone, Serialize)]
pub struct BallView {
    pub pos: Vec2,
    pub radius: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct HazardView {
    pub center: Vec2,
    pub radius: f32,
    /// Start delay elapsed; draw it hot
    pub armed: bool,
}

/// A solid (drawn) arc of ring material
#[derive(Debug, Clone, Serialize)]
pub struct ArcView {
    pub start_deg: f32,
    pub sweep_deg: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct GapView {
    pub start_deg: f32,
    pub width_deg: f32,
    /// Effect label shown beside the opening
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RingView {
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub arcs: Vec<ArcView>,
    pub gaps: Vec<GapView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WallView {
    pub start: Vec2,
    pub end: Vec2,
    pub half_width: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct HudView {
    pub score: i64,
    pub time_left: f32,
    pub ring_completions: u32,
    pub target_ring_count: u32,
    pub phase: GamePhase,
}

/// Everything the render sink needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct RenderSnapshot {
    pub center: Vec2,
    pub ball: BallView,
    pub hazard: HazardView,
    pub rings: Vec<RingView>,
    pub walls: Vec<WallView>,
    pub hud: HudView,
}

impl RenderSnapshot {
    pub fn capture(state: &GameState) -> Self {
        Self {
            center: state.center,
            ball: BallView {
                pos: state.ball.pos,
                radius: state.ball.radius,
            },
            hazard: HazardView {
                center: state.hazard.center,
                radius: state.hazard.radius,
                armed: state.hazard.armed(),
            },
            rings: state.rings.iter().map(ring_view).collect(),
            walls: state
                .walls
                .iter()
                .map(|w| {
                    let (start, end) = w.endpoints(state.center);
                    WallView {
                        start,
                        end,
                        half_width: w.half_width,
                    }
                })
                .collect(),
            hud: HudView {
                score: state.score,
                time_left: state.time_left,
                ring_completions: state.ring_completions,
                target_ring_count: state.tuning.target_ring_count,
                phase: state.phase,
            },
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Split one ring into its solid arcs (the complement of the gap spans) and
/// its labeled gaps
fn ring_view(ring: &Ring) -> RingView {
    let mut sorted: Vec<f32> = ring.gaps.clone();
    sorted.sort_by(f32::total_cmp);

    let mut arcs = Vec::with_capacity(sorted.len() + 1);
    let mut cursor = 0.0;
    for &gap_start in &sorted {
        if cursor < gap_start {
            arcs.push(ArcView {
                start_deg: cursor,
                sweep_deg: gap_start - cursor,
            });
        }
        cursor = gap_start + ring.gap_width_deg;
    }
    if cursor < 360.0 {
        arcs.push(ArcView {
            start_deg: cursor,
            sweep_deg: 360.0 - cursor,
        });
    }

    let gaps = ring
        .gaps
        .iter()
        .zip(&ring.effects)
        .map(|(&start_deg, effect)| GapView {
            start_deg,
            width_deg: ring.gap_width_deg,
            label: effect.label.clone(),
        })
        .collect();

    RingView {
        inner_radius: ring.inner_radius,
        outer_radius: ring.outer_radius,
        arcs,
        gaps,
    }
}
