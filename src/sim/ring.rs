//! Ring model and procedural gap generator
//!
//! A ring is a thick annulus around the board center, pierced by one or more
//! angular gaps. Gaps are placed one per equal sector so they can never
//! overlap, and each carries a gameplay effect rolled at creation time. Rings
//! are immutable after generation except for the `walls_generated` latch.
//!
//! Angles are degrees in [0, 360); a gap's angular width is derived from a
//! fixed linear arc length, so the physical opening stays constant as rings
//! grow.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::effect::GapEffect;
use crate::tuning::Tuning;
use crate::{angle_from_center, deg_in_span, deg_separation, normalize_deg, polar_offset};

/// Where the ball sits relative to one ring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RingClass {
    /// Overlapping the annulus outside any gap
    Touching,
    /// Inside the radial band, within a gap's angular span
    InGap,
    /// Clear of the ring entirely
    NoContact,
}

/// A radial segment closing off one side of a gap, with its precomputed
/// normal pointing into the gap channel. Derived on demand, never stored.
#[derive(Debug, Clone, Copy)]
pub struct GapBoundary {
    pub start: Vec2,
    pub end: Vec2,
    pub normal: Vec2,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ring {
    /// Shared board center
    pub center: Vec2,
    pub inner_radius: f32,
    pub outer_radius: f32,
    /// Creation order; scales difficulty and tags effects
    pub ordinal: u32,
    /// Gap start angles, degrees [0, 360), ascending
    pub gaps: Vec<f32>,
    /// One effect per gap, same order
    pub effects: Vec<GapEffect>,
    /// Angular width shared by every gap on this ring
    pub gap_width_deg: f32,
    /// Set exactly once when the connector batch toward the next ring is produced
    pub walls_generated: bool,
}

/// Gap count for a ring: circumference-derived base, reduced as the run
/// progresses (capped), shifted by the running modifier, never below 1.
pub fn gap_count_for(inner_radius: f32, completions: u32, modifier: i32, tuning: &Tuning) -> usize {
    let base = ((std::f32::consts::PI * inner_radius / tuning.gap_arc_px) / 8.0).floor() as i32 + 1;
    let reduction = completions.saturating_sub(2).min(tuning.gap_reduction_cap) as i32;
    (base - reduction + modifier).max(1) as usize
}

impl Ring {
    /// Generate a complete ring: gap count, per-sector gap placement, one
    /// rolled effect per gap. Fully determined by the RNG stream.
    pub fn generate<R: Rng>(
        rng: &mut R,
        center: Vec2,
        inner_radius: f32,
        outer_radius: f32,
        ordinal: u32,
        completions: u32,
        gap_modifier: i32,
        tuning: &Tuning,
    ) -> Self {
        let count = gap_count_for(inner_radius, completions, gap_modifier, tuning);
        let width = tuning.gap_width_deg(inner_radius);
        let sector = 360.0 / count as f32;

        let mut gaps = Vec::with_capacity(count);
        let mut effects = Vec::with_capacity(count);
        for i in 0..count {
            let sector_start = sector * i as f32;
            let room = sector - width;
            if room <= 0.0 {
                // Sector too narrow for a full gap; a sparser ring beats an
                // overlapping one
                log::warn!(
                    "ring {ordinal}: sector {i} narrower than gap width ({sector:.1} < {width:.1} deg), skipping gap"
                );
                continue;
            }
            gaps.push(normalize_deg(sector_start + rng.random_range(0.0..room)));
            effects.push(GapEffect::roll(rng, ordinal));
        }
        if gaps.is_empty() {
            // A ring with no way through is unplayable; force one gap
            gaps.push(rng.random_range(0.0..(360.0 - width).max(1.0)));
            effects.push(GapEffect::roll(rng, ordinal));
        }

        Self {
            center,
            inner_radius,
            outer_radius,
            ordinal,
            gaps,
            effects,
            gap_width_deg: width,
            walls_generated: false,
        }
    }

    /// Classify the ball against this ring.
    ///
    /// Radial band test first; inside the band, angular membership in any gap
    /// span (wrap-aware) decides InGap vs Touching.
    pub fn classify(&self, ball_center: Vec2, ball_radius: f32) -> RingClass {
        let distance = ball_center.distance(self.center);
        if distance < self.inner_radius - ball_radius || distance > self.outer_radius + ball_radius
        {
            return RingClass::NoContact;
        }
        let angle = angle_from_center(self.center, ball_center);
        if self.angle_in_any_gap(angle) {
            RingClass::InGap
        } else {
            RingClass::Touching
        }
    }

    #[inline]
    pub fn angle_in_any_gap(&self, angle: f32) -> bool {
        self.gaps
            .iter()
            .any(|&g| deg_in_span(angle, g, self.gap_width_deg))
    }

    /// Mid-angle of gap `i`, degrees [0, 360)
    #[inline]
    pub fn gap_mid_angle(&self, i: usize) -> f32 {
        normalize_deg(self.gaps[i] + self.gap_width_deg / 2.0)
    }

    /// The short radial segments at both edges of every gap.
    ///
    /// Normals point into the gap channel (toward increasing angle at the
    /// start edge, decreasing at the end edge) so a resolved hit pushes the
    /// ball back into the opening instead of through the wall.
    pub fn gap_boundaries(&self) -> Vec<GapBoundary> {
        let mut out = Vec::with_capacity(self.gaps.len() * 2);
        for &gap_start in &self.gaps {
            let gap_end = gap_start + self.gap_width_deg;
            out.push(self.boundary_at(gap_start, 1.0));
            out.push(self.boundary_at(gap_end, -1.0));
        }
        out
    }

    fn boundary_at(&self, deg: f32, direction: f32) -> GapBoundary {
        let rad = deg.to_radians();
        // Tangential unit vector toward increasing angle
        let tangent = Vec2::new(-rad.sin(), rad.cos());
        GapBoundary {
            start: polar_offset(self.center, self.inner_radius, deg),
            end: polar_offset(self.center, self.outer_radius, deg),
            normal: tangent * direction,
        }
    }

    /// The effect whose gap lies angularly closest to `exit_angle` (wrap-aware)
    pub fn nearest_effect(&self, exit_angle: f32) -> Option<&GapEffect> {
        let mut best: Option<&GapEffect> = None;
        let mut best_sep = f32::MAX;
        for i in 0..self.gaps.len().min(self.effects.len()) {
            let sep = deg_separation(self.gap_mid_angle(i), exit_angle);
            if sep < best_sep {
                best_sep = sep;
                best = self.effects.get(i);
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::BOARD_CENTER;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn make_ring(seed: u64, inner: f32, completions: u32, modifier: i32) -> Ring {
        let mut rng = Pcg32::seed_from_u64(seed);
        Ring::generate(
            &mut rng,
            BOARD_CENTER,
            inner,
            inner + 50.0,
            0,
            completions,
            modifier,
            &Tuning::default(),
        )
    }

    #[test]
    fn test_first_ring_gap_count_matches_formula() {
        // inner 200: floor((pi*200/120)/8) + 1 = 1
        assert_eq!(gap_count_for(200.0, 0, 0, &Tuning::default()), 1);
        let ring = make_ring(1, 200.0, 0, 0);
        assert_eq!(ring.gaps.len(), 1);
    }

    #[test]
    fn test_second_ring_gap_count() {
        // inner 450: floor((pi*450/120)/8) + 1 = 2
        assert_eq!(gap_count_for(450.0, 0, 0, &Tuning::default()), 2);
    }

    #[test]
    fn test_difficulty_reduction_is_capped() {
        let t = Tuning::default();
        let unreduced = gap_count_for(3000.0, 0, 0, &t);
        let late = gap_count_for(3000.0, 30, 0, &t);
        assert_eq!(unreduced - late, t.gap_reduction_cap as usize);
        // Never below one gap
        assert_eq!(gap_count_for(200.0, 30, -5, &t), 1);
    }

    #[test]
    fn test_classify_bands() {
        let ring = make_ring(3, 200.0, 0, 0);
        let gap_mid = ring.gap_mid_angle(0);
        let solid = normalize_deg(gap_mid + 180.0);

        // Well inside the hole
        assert_eq!(
            ring.classify(polar_offset(ring.center, 100.0, solid), 40.0),
            RingClass::NoContact
        );
        // Well outside
        assert_eq!(
            ring.classify(polar_offset(ring.center, 400.0, solid), 40.0),
            RingClass::NoContact
        );
        // In the band, away from the gap
        assert_eq!(
            ring.classify(polar_offset(ring.center, 225.0, solid), 40.0),
            RingClass::Touching
        );
        // In the band, through the gap
        assert_eq!(
            ring.classify(polar_offset(ring.center, 225.0, gap_mid), 40.0),
            RingClass::InGap
        );
    }

    #[test]
    fn test_gap_membership_wraps() {
        let mut ring = make_ring(4, 200.0, 0, 0);
        ring.gaps = vec![350.0];
        assert!(ring.angle_in_any_gap(355.0));
        assert!(ring.angle_in_any_gap(5.0));
        assert!(!ring.angle_in_any_gap(180.0));
    }

    #[test]
    fn test_boundary_normals_point_into_gap() {
        let ring = make_ring(5, 200.0, 0, 0);
        let mid = polar_offset(
            ring.center,
            (ring.inner_radius + ring.outer_radius) / 2.0,
            ring.gap_mid_angle(0),
        );
        for boundary in ring.gap_boundaries() {
            let edge_mid = (boundary.start + boundary.end) / 2.0;
            assert!(
                boundary.normal.dot(mid - edge_mid) > 0.0,
                "normal should face the gap interior"
            );
            assert!((boundary.normal.length() - 1.0).abs() < 0.001);
        }
    }

    #[test]
    fn test_nearest_effect_is_wrap_aware() {
        let mut ring = make_ring(6, 450.0, 0, 0);
        ring.gaps = vec![10.0, 180.0];
        // Exit at 355 deg is 15+width/2 away from gap 0 across the wrap,
        // far from gap 1
        let expected = ring.effects[0].label.clone();
        let found = ring.nearest_effect(355.0).unwrap();
        assert_eq!(found.label, expected);
    }

    proptest! {
        #[test]
        fn prop_gaps_disjoint_and_under_full_circle(
            seed in any::<u64>(),
            inner in 150.0f32..3000.0,
            completions in 0u32..25,
            modifier in -3i32..7,
        ) {
            let ring = {
                let mut rng = Pcg32::seed_from_u64(seed);
                Ring::generate(
                    &mut rng,
                    BOARD_CENTER,
                    inner,
                    inner + 50.0,
                    completions,
                    completions,
                    modifier,
                    &Tuning::default(),
                )
            };

            let width = ring.gap_width_deg;
            prop_assert!(ring.gaps.len() as f32 * width < 360.0);
            prop_assert_eq!(ring.gaps.len(), ring.effects.len());

            // Per-sector placement keeps spans inside [0, 360) and ascending
            for window in ring.gaps.windows(2) {
                prop_assert!(window[0] + width <= window[1] + 0.001);
            }
            if let (Some(&first), Some(&last)) = (ring.gaps.first(), ring.gaps.last()) {
                prop_assert!(last + width <= 360.0 + 0.001);
                prop_assert!(first >= 0.0);
            }
        }
    }
}
