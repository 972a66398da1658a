//! Connector walls - radial obstacles between adjacent rings
//!
//! Generated once per ring pair when a new ring is appended, gap-aware on
//! both bounding rings, and spaced in world-space pixels so larger rings
//! don't end up proportionally more crowded. Append-only: no wall is ever
//! moved or removed once accepted.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geom::{SegmentHit, circle_line_normal, closest_point_on_segment};
use super::ring::Ring;
use crate::tuning::Tuning;
use crate::{deg_in_span, deg_separation, normalize_deg, polar_offset};

/// A capsule-like radial segment between two rings, at a fixed angle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wall {
    /// Creation-order index of the inner bounding ring
    pub inner_ring: usize,
    /// Creation-order index of the outer bounding ring
    pub outer_ring: usize,
    pub start_radius: f32,
    pub end_radius: f32,
    /// Degrees [0, 360)
    pub angle_deg: f32,
    pub half_width: f32,
}

impl Wall {
    /// World-space endpoints of the wall's centerline
    pub fn endpoints(&self, board_center: Vec2) -> (Vec2, Vec2) {
        (
            polar_offset(board_center, self.start_radius, self.angle_deg),
            polar_offset(board_center, self.end_radius, self.angle_deg),
        )
    }

    #[inline]
    pub fn mean_radius(&self) -> f32 {
        (self.start_radius + self.end_radius) / 2.0
    }

    /// Ball-vs-wall check. The normal is derived from the segment direction
    /// with its sign chosen toward the ball, since edge orientation varies
    /// per wall. Degenerate walls report no collision.
    pub fn collide(
        &self,
        board_center: Vec2,
        ball_pos: Vec2,
        ball_radius: f32,
    ) -> Option<SegmentHit> {
        let (a, b) = self.endpoints(board_center);
        let normal = circle_line_normal(a, b, ball_pos)?;
        let (point, distance) = closest_point_on_segment(ball_pos, a, b)?;
        if distance <= ball_radius + self.half_width {
            Some(SegmentHit {
                point,
                distance,
                normal,
            })
        } else {
            None
        }
    }
}

/// Generate connector batches for every adjacent ring pair that has not
/// produced one yet, appending to `walls`. Pairs already flagged
/// `walls_generated` are skipped (idempotence guard).
pub fn generate_connectors<R: Rng>(
    rings: &mut [Ring],
    walls: &mut Vec<Wall>,
    wall_modifier: i32,
    rng: &mut R,
    tuning: &Tuning,
) {
    for i in 0..rings.len().saturating_sub(1) {
        if rings[i].walls_generated {
            continue;
        }
        let count =
            (tuning.wall_base_count + tuning.wall_count_per_ring * i as i32 + wall_modifier).max(1)
                as usize;
        let batch = generate_pair(&rings[i], &rings[i + 1], i, count, rng, tuning);
        log::info!(
            "ring pair {}-{}: placed {} of {} connector walls",
            i,
            i + 1,
            batch.len(),
            count
        );
        rings[i].walls_generated = true;
        walls.extend(batch);
    }
}

fn generate_pair<R: Rng>(
    current: &Ring,
    next: &Ring,
    pair_index: usize,
    count: usize,
    rng: &mut R,
    tuning: &Tuning,
) -> Vec<Wall> {
    let margin = tuning.wall_gap_margin_deg;
    let step = tuning.wall_candidate_step_deg;

    // Fine-grained candidate grid minus the gap keep-out zones of both rings
    let grid_len = (360.0 / step).round() as usize;
    let valid: Vec<f32> = (0..grid_len)
        .map(|k| k as f32 * step)
        .filter(|&a| !in_gap_with_margin(current, a, margin) && !in_gap_with_margin(next, a, margin))
        .collect();
    if valid.is_empty() {
        log::warn!("ring pair {pair_index}: no gap-free angles, skipping connector batch");
        return Vec::new();
    }

    let sector = 360.0 / count as f32;
    let span = next.inner_radius - current.outer_radius;
    let mut used: Vec<f32> = Vec::new();
    let mut out = Vec::new();

    for index in 0..count {
        let sector_min = sector * index as f32;
        let sector_max = sector_min + sector;
        let candidates: Vec<f32> = valid
            .iter()
            .copied()
            .filter(|&a| a >= sector_min && a <= sector_max)
            .collect();
        if candidates.is_empty() {
            // Unsatisfiable sector; a sparser field beats a wall inside a gap
            continue;
        }

        let base = candidates[rng.random_range(0..candidates.len())];
        let angle = nudge_outside_gaps(base, current, next, sector_min, sector_max, margin);
        if in_gap_with_margin(current, angle, margin) || in_gap_with_margin(next, angle, margin) {
            // Clamping back into the sector re-entered a gap zone
            continue;
        }

        // Radius-span shape: mostly full span, sometimes a stub anchored to
        // one boundary for visual variety
        let (start_radius, end_radius) = match rng.random_range(0..4) {
            0 | 1 => (current.outer_radius - 5.0, next.inner_radius + 5.0),
            2 => (
                current.outer_radius,
                current.outer_radius + span / 3.0 + 10.0,
            ),
            _ => (
                next.inner_radius + 5.0,
                current.outer_radius + span / 1.5 - 10.0,
            ),
        };

        let mean_radius = (start_radius + end_radius) / 2.0;
        if !far_enough_px(angle, &used, tuning.wall_min_spacing_px, mean_radius) {
            continue;
        }

        used.push(angle);
        out.push(Wall {
            inner_ring: pair_index,
            outer_ring: pair_index + 1,
            start_radius,
            end_radius,
            angle_deg: normalize_deg(angle),
            half_width: tuning.wall_half_width,
        });
    }
    out
}

fn in_gap_with_margin(ring: &Ring, angle: f32, margin: f32) -> bool {
    ring.gaps
        .iter()
        .any(|&g| deg_in_span(angle, g - margin, ring.gap_width_deg + 2.0 * margin))
}

/// Walk the candidate past any gap zone it landed in, clamp it back into its
/// sector, and quantize to the candidate grid's resolution.
fn nudge_outside_gaps(
    angle: f32,
    current: &Ring,
    next: &Ring,
    sector_min: f32,
    sector_max: f32,
    margin: f32,
) -> f32 {
    let mut adjusted = angle;
    for ring in [current, next] {
        for &g in &ring.gaps {
            if deg_in_span(adjusted, g - margin, ring.gap_width_deg + 2.0 * margin) {
                adjusted = g + ring.gap_width_deg + margin + 1.0;
            }
        }
    }
    if adjusted > sector_max {
        adjusted = sector_max - 1.0;
    }
    if adjusted < sector_min {
        adjusted = sector_min + 1.0;
    }
    (adjusted * 10.0).floor() / 10.0
}

/// Minimum-spacing test in world pixels at the candidate's mean radius, so
/// spacing is radius-independent rather than a fixed number of degrees
fn far_enough_px(angle: f32, used: &[f32], min_px: f32, radius: f32) -> bool {
    let min_deg = (min_px / radius).to_degrees();
    used.iter().all(|&u| deg_separation(angle, u) >= min_deg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::BOARD_CENTER;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn two_rings(seed: u64) -> Vec<Ring> {
        let t = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(seed);
        let r0 = Ring::generate(&mut rng, BOARD_CENTER, 200.0, 250.0, 0, 0, 0, &t);
        let r1 = Ring::generate(&mut rng, BOARD_CENTER, 450.0, 500.0, 1, 0, 0, &t);
        vec![r0, r1]
    }

    #[test]
    fn test_generator_is_idempotent() {
        let t = Tuning::default();
        let mut rings = two_rings(11);
        let mut walls = Vec::new();
        let mut rng = Pcg32::seed_from_u64(99);

        generate_connectors(&mut rings, &mut walls, 0, &mut rng, &t);
        let first_batch = walls.len();
        assert!(first_batch > 0);
        assert!(rings[0].walls_generated);

        generate_connectors(&mut rings, &mut walls, 0, &mut rng, &t);
        assert_eq!(walls.len(), first_batch);
    }

    #[test]
    fn test_walls_avoid_gap_zones() {
        let t = Tuning::default();
        let mut rings = two_rings(12);
        let mut walls = Vec::new();
        let mut rng = Pcg32::seed_from_u64(5);
        generate_connectors(&mut rings, &mut walls, 0, &mut rng, &t);

        for wall in &walls {
            assert!(!in_gap_with_margin(&rings[0], wall.angle_deg, t.wall_gap_margin_deg));
            assert!(!in_gap_with_margin(&rings[1], wall.angle_deg, t.wall_gap_margin_deg));
        }
    }

    #[test]
    fn test_wall_count_floor() {
        // A heavily negative modifier still yields at least one requested wall
        let t = Tuning::default();
        let mut rings = two_rings(13);
        let mut walls = Vec::new();
        let mut rng = Pcg32::seed_from_u64(7);
        generate_connectors(&mut rings, &mut walls, -100, &mut rng, &t);
        assert!(walls.len() <= 1);
        assert!(rings[0].walls_generated);
    }

    #[test]
    fn test_collide_threshold_and_normal() {
        let wall = Wall {
            inner_ring: 0,
            outer_ring: 1,
            start_radius: 245.0,
            end_radius: 455.0,
            angle_deg: 0.0,
            half_width: 25.0,
        };
        let center = BOARD_CENTER;
        // Straddle the wall at its mean radius, offset sideways
        let ball = polar_offset(center, 350.0, 0.0) + Vec2::new(0.0, 50.0);

        let hit = wall.collide(center, ball, 40.0).expect("should collide");
        assert!((hit.distance - 50.0).abs() < 0.5);
        // Normal faces the ball
        assert!(hit.normal.dot(ball - hit.point) > 0.0);

        let far = polar_offset(center, 350.0, 0.0) + Vec2::new(0.0, 80.0);
        assert!(wall.collide(center, far, 40.0).is_none());
    }

    #[test]
    fn test_degenerate_wall_is_no_collision() {
        let wall = Wall {
            inner_ring: 0,
            outer_ring: 1,
            start_radius: 300.0,
            end_radius: 300.0,
            angle_deg: 90.0,
            half_width: 25.0,
        };
        let ball = polar_offset(BOARD_CENTER, 300.0, 90.0);
        assert!(wall.collide(BOARD_CENTER, ball, 40.0).is_none());
    }

    proptest! {
        #[test]
        fn prop_pixel_spacing_respected(seed in any::<u64>()) {
            let t = Tuning::default();
            let mut rings = two_rings(seed);
            let mut walls = Vec::new();
            let mut rng = Pcg32::seed_from_u64(seed ^ 0xDEAD_BEEF);
            generate_connectors(&mut rings, &mut walls, 0, &mut rng, &t);

            // Each accepted wall was checked against every earlier one at its
            // own mean radius
            for j in 1..walls.len() {
                let min_deg = (t.wall_min_spacing_px / walls[j].mean_radius()).to_degrees();
                for i in 0..j {
                    let sep = deg_separation(walls[i].angle_deg, walls[j].angle_deg);
                    prop_assert!(
                        sep >= min_deg - 0.11,
                        "walls {} and {} are {:.2} deg apart, need {:.2}",
                        i, j, sep, min_deg
                    );
                }
            }
        }
    }
}
