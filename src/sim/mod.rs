//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Measured elapsed time comes in as a parameter, no wall-clock reads
//! - No rendering or platform dependencies

pub mod effect;
pub mod geom;
pub mod hazard;
pub mod ring;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod wall;

pub use effect::{EffectKind, EffectOp, GapEffect, Modifiers};
pub use geom::{SegmentHit, circle_line_normal, circle_segment_collision, closest_point_on_segment};
pub use hazard::Hazard;
pub use ring::{GapBoundary, Ring, RingClass};
pub use snapshot::RenderSnapshot;
pub use state::{Ball, GameEvent, GamePhase, GameState, LossReason};
pub use tick::{TickInput, tick};
pub use wall::Wall;
