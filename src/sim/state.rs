//! Game state and core simulation types
//!
//! All mutable simulation state lives in one explicit `GameState` context
//! struct passed by reference to each subsystem call - no ambient globals,
//! so tests can run deterministic parallel instances.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effect::Modifiers;
use super::hazard::Hazard;
use super::ring::{Ring, RingClass};
use super::wall::{self, Wall};
use crate::consts::BOARD_CENTER;
use crate::tuning::Tuning;

/// Current phase; `Won` and `Lost` are terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    Won,
    Lost,
}

/// Why a session ended in `Lost`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossReason {
    /// Swallowed by the central hazard
    Swallowed,
    /// Timer reached zero
    TimeUp,
    /// Physics invariant violated (NaN position, negative radius)
    CorruptPhysics,
}

/// Transient per-tick notifications for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    RingCleared { ordinal: u32, effect_label: String },
    ShakeAck,
    Won { score: i64 },
    Lost { reason: LossReason },
}

/// The player-controlled ball
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius,
        }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// Complete simulation context (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Seeded RNG; all procedural generation draws from this stream
    pub rng: Pcg32,
    pub tuning: Tuning,
    /// Shared board center
    pub center: Vec2,
    pub ball: Ball,
    pub hazard: Hazard,
    /// Rings in creation order; index = creation ordinal
    pub rings: Vec<Ring>,
    /// Append-only connector walls
    pub walls: Vec<Wall>,
    /// Running generation modifiers from triggered effects
    pub modifiers: Modifiers,
    pub phase: GamePhase,
    pub score: i64,
    /// Remaining session time, seconds
    pub time_left: f32,
    pub ring_completions: u32,
    /// Seconds since the previous ring completion (drives the speed bonus)
    pub time_since_clear: f32,
    /// Previous tick's classification per ring, keyed by creation order
    pub prev_class: Vec<RingClass>,
    /// Whether each ring's completion trigger has been consumed
    pub triggered: Vec<bool>,
    /// Remaining shake debounce window, seconds
    pub shake_cooldown: f32,
    /// Tick counter
    pub time_ticks: u64,
    /// Events emitted during the most recent tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a session: ball at the board center, the first two rings, and
    /// their connector batch. Same seed, same board.
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let center = BOARD_CENTER;
        let mut rng = Pcg32::seed_from_u64(seed);

        let inner0 = tuning.first_inner_radius;
        let ring0 = Ring::generate(
            &mut rng,
            center,
            inner0,
            inner0 + tuning.ring_thickness,
            0,
            0,
            0,
            &tuning,
        );
        let inner1 = ring0.outer_radius + tuning.ring_spacing;
        let ring1 = Ring::generate(
            &mut rng,
            center,
            inner1,
            inner1 + tuning.ring_thickness,
            1,
            0,
            0,
            &tuning,
        );
        let mut rings = vec![ring0, ring1];

        let mut walls = Vec::new();
        wall::generate_connectors(&mut rings, &mut walls, 0, &mut rng, &tuning);

        let ring_count = rings.len();
        Self {
            seed,
            rng,
            center,
            ball: Ball::new(center, tuning.ball_radius),
            hazard: Hazard::new(center, &tuning),
            rings,
            walls,
            modifiers: Modifiers::default(),
            phase: GamePhase::Playing,
            score: 0,
            time_left: tuning.session_seconds,
            ring_completions: 0,
            time_since_clear: 0.0,
            prev_class: vec![RingClass::NoContact; ring_count],
            triggered: vec![false; ring_count],
            shake_cooldown: 0.0,
            time_ticks: 0,
            events: Vec::new(),
            tuning,
        }
    }

    /// Append a ring, keeping the per-ring history arrays aligned
    pub fn push_ring(&mut self, ring: Ring) {
        self.rings.push(ring);
        self.prev_class.push(RingClass::NoContact);
        self.triggered.push(false);
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.phase != GamePhase::Playing
    }
}
