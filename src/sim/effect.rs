//! Gap effects - the gameplay modifiers attached to every ring gap
//!
//! Passing through a gap applies its effect: the obstacle field gets denser
//! or sparser, the clock moves, or points change hands. Category and
//! operation are closed sum types matched exhaustively so a new effect can't
//! be half-wired.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// What the effect modifies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    Walls,
    Gaps,
    Time,
    Points,
}

impl EffectKind {
    fn icon(self) -> &'static str {
        match self {
            EffectKind::Walls => "🧱",
            EffectKind::Gaps => "🌀",
            EffectKind::Time => "⏳",
            EffectKind::Points => "★",
        }
    }
}

/// How the magnitude is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

/// One effect, bound to one gap's angular span
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GapEffect {
    pub kind: EffectKind,
    pub op: EffectOp,
    /// Positive magnitude; `op` carries the direction
    pub value: f32,
    /// Icon + signed value, persisted for the render sink
    pub label: String,
}

impl GapEffect {
    /// Roll one effect for a gap on the ring with the given ordinal.
    ///
    /// Category is uniform; a biased coin makes ~70% of effects debuffs.
    /// Additive magnitudes grow (bounded) with ring ordinal; multiplicative
    /// factors stay at 2 or 3.
    pub fn roll<R: Rng>(rng: &mut R, ordinal: u32) -> Self {
        let kind = match rng.random_range(0..4) {
            0 => EffectKind::Walls,
            1 => EffectKind::Gaps,
            2 => EffectKind::Time,
            _ => EffectKind::Points,
        };
        let debuff = rng.random_bool(0.7);
        let multiplicative = rng.random_bool(0.25);

        // More walls hurts; fewer gaps, less time, fewer points hurt.
        let op = match (kind, debuff, multiplicative) {
            (EffectKind::Walls, true, false) => EffectOp::Add,
            (EffectKind::Walls, true, true) => EffectOp::Multiply,
            (EffectKind::Walls, false, false) => EffectOp::Subtract,
            (EffectKind::Walls, false, true) => EffectOp::Divide,
            (_, true, false) => EffectOp::Subtract,
            (_, true, true) => EffectOp::Divide,
            (_, false, false) => EffectOp::Add,
            (_, false, true) => EffectOp::Multiply,
        };

        let value = match op {
            EffectOp::Multiply | EffectOp::Divide => rng.random_range(2..=3) as f32,
            EffectOp::Add | EffectOp::Subtract => Self::magnitude(kind, ordinal),
        };

        let label = Self::format_label(kind, op, value);
        Self {
            kind,
            op,
            value,
            label,
        }
    }

    /// Additive magnitude per category; grows with ordinal but stays bounded
    fn magnitude(kind: EffectKind, ordinal: u32) -> f32 {
        match kind {
            EffectKind::Walls | EffectKind::Gaps => (1 + ordinal / 4).min(4) as f32,
            EffectKind::Time => (3 + ordinal).min(10) as f32,
            EffectKind::Points => (10 + 10 * ordinal).min(100) as f32,
        }
    }

    fn format_label(kind: EffectKind, op: EffectOp, value: f32) -> String {
        let v = value as i32;
        match op {
            EffectOp::Add => format!("{} +{}", kind.icon(), v),
            EffectOp::Subtract => format!("{} -{}", kind.icon(), v),
            EffectOp::Multiply => format!("{} ×{}", kind.icon(), v),
            EffectOp::Divide => format!("{} ÷{}", kind.icon(), v),
        }
    }
}

/// Running generation modifiers, accumulated from triggered effects and
/// consumed when the next ring / connector batch is generated
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Modifiers {
    pub wall_count: i32,
    pub gap_count: i32,
    /// Point delta paid out (and reset) at the next ring completion
    pub pending_points: f32,
}

impl Modifiers {
    /// Pay out the accumulated point delta and reset it
    pub fn take_pending_points(&mut self) -> i64 {
        let p = self.pending_points as i64;
        self.pending_points = 0.0;
        p
    }
}

/// Apply one operation to a count modifier (wall-count / gap-count).
///
/// Multiplication floors at 0, division rounds and floors at 1.
pub fn apply_count_op(current: i32, op: EffectOp, value: f32) -> i32 {
    match op {
        EffectOp::Add => current + value as i32,
        EffectOp::Subtract => current - value as i32,
        EffectOp::Multiply => ((current as f32 * value) as i32).max(0),
        EffectOp::Divide => {
            if value == 0.0 {
                current
            } else {
                ((current as f32 / value).round() as i32).max(1)
            }
        }
    }
}
