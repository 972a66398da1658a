//! Per-tick simulation step
//!
//! One tick runs a fixed-order pipeline: timer, hazard, shake, integration,
//! gap-boundary pass, connector-wall pass, ring-wall pass, trigger detection.
//! A terminal event (win/loss) halts the remainder of the tick so the ball
//! never moves an extra frame after the session ends.
//!
//! The ordering constraint that matters: a gap-boundary hit latches
//! `hit_gap`, which suppresses the ring-wall response for that tick - the
//! ball is legitimately inside a gap's narrow lateral channel and a radial
//! push would fight the tangential one.

use glam::Vec2;

use super::effect::{EffectKind, EffectOp, GapEffect, apply_count_op};
use super::geom::circle_segment_collision;
use super::ring::RingClass;
use super::state::{GameEvent, GamePhase, GameState, LossReason};
use super::wall;
use crate::angle_from_center;

/// Inputs sampled for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Latest tilt vector from the motion sensor (last-value semantics)
    pub tilt: Vec2,
    /// A shake notification arrived since the previous tick
    pub shake: bool,
}

/// Advance the simulation by one tick of measured duration `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();
    if state.is_over() {
        return;
    }

    state.time_ticks += 1;
    state.time_since_clear += dt;
    if state.shake_cooldown > 0.0 {
        state.shake_cooldown -= dt;
    }

    // Timer exhaustion ends the session before any further physics
    state.time_left -= dt;
    if state.time_left <= 0.0 {
        state.time_left = 0.0;
        lose(state, LossReason::TimeUp);
        return;
    }

    // Hazard next; a swallow halts the rest of the tick
    state.hazard.advance(dt);
    if state.hazard.swallows(state.ball.pos, state.ball.radius) {
        lose(state, LossReason::Swallowed);
        return;
    }

    // At most one shake per debounce window; extras are discarded
    if input.shake && state.shake_cooldown <= 0.0 {
        randomize_walls(state);
        state.shake_cooldown = state.tuning.shake_debounce_secs;
        state.events.push(GameEvent::ShakeAck);
    }

    integrate(state, input.tilt, dt);

    if !state.ball.pos.is_finite() || !state.ball.vel.is_finite() || state.hazard.radius < 0.0 {
        log::error!(
            "physics invariant violated (pos {:?}, vel {:?}, hazard r {}); ending session",
            state.ball.pos,
            state.ball.vel,
            state.hazard.radius
        );
        lose(state, LossReason::CorruptPhysics);
        return;
    }

    // One classification per ring per tick, shared by the ring-wall pass and
    // the trigger pass
    let classes: Vec<RingClass> = state
        .rings
        .iter()
        .map(|r| r.classify(state.ball.pos, state.ball.radius))
        .collect();

    let hit_gap = resolve_gap_boundaries(state);
    resolve_connector_walls(state);
    if !hit_gap {
        resolve_ring_walls(state, &classes);
    }
    detect_triggers(state, &classes);

    // Persist this tick's classifications; rings spawned this tick start
    // their history at NoContact
    state.prev_class = classes;
    if state.prev_class.len() < state.rings.len() {
        state.prev_class.resize(state.rings.len(), RingClass::NoContact);
    }
}

/// Tilt -> acceleration -> velocity (with friction and speed clamp) ->
/// position. Position integration scales by measured dt times the reference
/// frame rate so feel is stable under tick jitter.
fn integrate(state: &mut GameState, tilt: Vec2, dt: f32) {
    let t = &state.tuning;
    let ball = &mut state.ball;

    // Screen x grows rightward while the device x axis tilts the other way
    let ax = -tilt.x * t.acceleration_factor;
    let ay = (tilt.y - t.tilt_offset_y) * t.acceleration_factor;

    ball.vel = (ball.vel + Vec2::new(ax, ay)) * t.friction;

    let speed = ball.vel.length();
    if speed > t.max_speed {
        ball.vel *= t.max_speed / speed;
    }

    ball.pos += ball.vel * dt * t.frame_rate_reference;
}

/// Resolve the ball against every gap's edge segments. Returns whether any
/// hit occurred (which suppresses the ring-wall pass this tick).
fn resolve_gap_boundaries(state: &mut GameState) -> bool {
    let eps = state.tuning.gap_push_epsilon;
    let ball = &mut state.ball;
    let mut hit_gap = false;

    for ring in &state.rings {
        for boundary in ring.gap_boundaries() {
            let Some(hit) = circle_segment_collision(
                ball.pos,
                ball.radius,
                boundary.start,
                boundary.end,
                boundary.normal,
            ) else {
                continue;
            };
            hit_gap = true;
            let penetration = ball.radius - hit.distance;
            if penetration > 0.0 {
                ball.pos += hit.normal * (penetration + eps);
            }
            let inward = ball.vel.dot(hit.normal);
            if inward < 0.0 {
                ball.vel -= hit.normal * inward;
            }
        }
    }
    hit_gap
}

fn resolve_connector_walls(state: &mut GameState) {
    let center = state.center;
    let eps = state.tuning.wall_push_epsilon;
    let ball = &mut state.ball;

    for w in &state.walls {
        let Some(hit) = w.collide(center, ball.pos, ball.radius) else {
            continue;
        };
        let penetration = (ball.radius + w.half_width) - hit.distance;
        if penetration > 0.0 {
            ball.pos += hit.normal * (penetration + eps);
        }
        // Push-out plus slide: cancel the inward component, add no energy
        let inward = ball.vel.dot(hit.normal);
        if inward < 0.0 {
            ball.vel -= hit.normal * inward;
        }
    }
}

/// Radial push-out for rings the ball is touching, along whichever boundary
/// (inner/outer) is nearer
fn resolve_ring_walls(state: &mut GameState, classes: &[RingClass]) {
    let eps = state.tuning.wall_push_epsilon;
    let ball = &mut state.ball;

    for (ring, class) in state.rings.iter().zip(classes) {
        if *class != RingClass::Touching {
            continue;
        }
        let offset = ball.pos - ring.center;
        let distance = offset.length();
        if distance <= f32::EPSILON {
            // Ball centered on the ring center: no usable normal this tick
            continue;
        }
        let radial = offset / distance;
        let inner_dist = (distance - ring.inner_radius).abs();
        let outer_dist = (distance - ring.outer_radius).abs();
        let (normal, penetration) = if inner_dist < outer_dist {
            (-radial, (ring.inner_radius - ball.radius) - distance)
        } else {
            (radial, distance - (ring.outer_radius + ball.radius))
        };
        ball.pos += normal * (penetration.abs() + eps);
        let inward = ball.vel.dot(normal);
        if inward < 0.0 {
            ball.vel -= normal * inward;
        }
    }
}

/// Detect InGap -> NoContact transitions (the ball fully exited through a
/// gap), apply the nearest gap effect, score the completion, and extend the
/// board or end the session.
fn detect_triggers(state: &mut GameState, classes: &[RingClass]) {
    for i in 0..classes.len() {
        if state.prev_class[i] != RingClass::InGap
            || classes[i] != RingClass::NoContact
            || state.triggered[i]
        {
            continue;
        }

        let exit_angle = angle_from_center(state.center, state.ball.pos);
        let effect = state.rings[i].nearest_effect(exit_angle).cloned();
        let label = effect.as_ref().map(|e| e.label.clone()).unwrap_or_default();
        if let Some(effect) = &effect {
            apply_effect(state, effect);
        }

        state.triggered[i] = true;
        state.ring_completions += 1;

        // Faster clears pay better
        let bonus = (state.tuning.ring_bonus_base
            - state.time_since_clear * state.tuning.ring_bonus_decay_per_sec)
            .max(0.0) as i64;
        state.score += bonus;
        state.time_since_clear = 0.0;
        state.score += state.modifiers.take_pending_points();

        let ordinal = state.rings[i].ordinal;
        state.events.push(GameEvent::RingCleared {
            ordinal,
            effect_label: label,
        });
        log::info!(
            "ring {} cleared ({} of {})",
            ordinal,
            state.ring_completions,
            state.tuning.target_ring_count
        );

        if state.ring_completions >= state.tuning.target_ring_count {
            state.score += state.time_left as i64 * state.tuning.win_bonus_per_sec;
            state.phase = GamePhase::Won;
            state.events.push(GameEvent::Won { score: state.score });
            log::info!("session won with score {}", state.score);
            return;
        }

        if (state.rings.len() as u32) < state.tuning.target_ring_count {
            spawn_next_ring(state);
        }
    }
}

/// Apply one gap effect to the running modifiers, timer or score
fn apply_effect(state: &mut GameState, effect: &GapEffect) {
    log::info!("gap effect: {}", effect.label);
    match effect.kind {
        EffectKind::Walls => {
            state.modifiers.wall_count =
                apply_count_op(state.modifiers.wall_count, effect.op, effect.value);
        }
        EffectKind::Gaps => {
            state.modifiers.gap_count =
                apply_count_op(state.modifiers.gap_count, effect.op, effect.value);
        }
        EffectKind::Time => {
            let before = state.time_left;
            state.time_left = match effect.op {
                EffectOp::Add => before + effect.value,
                EffectOp::Subtract => before - effect.value,
                EffectOp::Multiply => before * effect.value,
                EffectOp::Divide => {
                    if effect.value == 0.0 {
                        before
                    } else {
                        before / effect.value
                    }
                }
            };
            // Gained time also stalls the hazard for the same duration
            state.hazard.pause_for(state.time_left - before);
        }
        EffectKind::Points => match effect.op {
            EffectOp::Add => state.modifiers.pending_points += effect.value,
            EffectOp::Subtract => state.modifiers.pending_points -= effect.value,
            EffectOp::Multiply => {
                state.score = ((state.score as f32 * effect.value) as i64).max(0);
            }
            EffectOp::Divide => {
                if effect.value != 0.0 {
                    state.score = ((state.score as f32 / effect.value) as i64).max(1);
                }
            }
        },
    }
}

/// Generate the next ring outward of the current board edge, consuming the
/// running modifiers, then produce its connector batch
fn spawn_next_ring(state: &mut GameState) {
    let Some(last) = state.rings.last() else {
        return;
    };
    let inner = last.outer_radius + state.tuning.ring_spacing;
    let outer = inner + state.tuning.ring_thickness;
    let ordinal = last.ordinal + 1;

    let ring = super::ring::Ring::generate(
        &mut state.rng,
        state.center,
        inner,
        outer,
        ordinal,
        state.ring_completions,
        state.modifiers.gap_count,
        &state.tuning,
    );
    log::info!(
        "spawned ring {} ({:.0}..{:.0} px, {} gaps)",
        ordinal,
        inner,
        outer,
        ring.gaps.len()
    );
    state.push_ring(ring);

    wall::generate_connectors(
        &mut state.rings,
        &mut state.walls,
        state.modifiers.wall_count,
        &mut state.rng,
        &state.tuning,
    );
}

/// Shake hook: throw away every connector wall and re-roll each pair's batch
/// with fresh randomness
fn randomize_walls(state: &mut GameState) {
    state.walls.clear();
    for ring in &mut state.rings {
        ring.walls_generated = false;
    }
    wall::generate_connectors(
        &mut state.rings,
        &mut state.walls,
        state.modifiers.wall_count,
        &mut state.rng,
        &state.tuning,
    );
    log::info!("shake: {} connector walls re-randomized", state.walls.len());
}

fn lose(state: &mut GameState, reason: LossReason) {
    state.phase = GamePhase::Lost;
    state.events.push(GameEvent::Lost { reason });
    log::info!("session lost: {reason:?}");
}
