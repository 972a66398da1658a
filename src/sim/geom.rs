//! Point/segment/circle primitives shared by the collision passes
//!
//! The tricky part is sign stability: normals must not flip when the ball
//! center sits exactly on a segment, so callers either supply the normal
//! (gap boundaries, whose orientation is known a priori) or have it derived
//! from the segment direction with the sign chosen toward a reference point
//! (connector walls).

use glam::Vec2;

/// Result of a circle-vs-segment check
#[derive(Debug, Clone, Copy)]
pub struct SegmentHit {
    /// Closest point on the segment to the circle center
    pub point: Vec2,
    /// Distance from circle center to that point
    pub distance: f32,
    /// Surface normal to resolve along (unit length)
    pub normal: Vec2,
}

/// Closest point on segment `a..b` to `point`, with its distance.
///
/// Zero-length segments have no usable closest direction and yield `None`
/// rather than a NaN normal downstream.
pub fn closest_point_on_segment(point: Vec2, a: Vec2, b: Vec2) -> Option<(Vec2, f32)> {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1e-4 {
        return None;
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    let closest = a + ab * t;
    Some((closest, point.distance(closest)))
}

/// Circle vs segment with a caller-supplied normal.
///
/// Used where the segment's orientation is known in advance; deriving the
/// normal from center-to-closest would be sign-ambiguous at exact overlap.
pub fn circle_segment_collision(
    center: Vec2,
    radius: f32,
    a: Vec2,
    b: Vec2,
    normal: Vec2,
) -> Option<SegmentHit> {
    let (point, distance) = closest_point_on_segment(center, a, b)?;
    if distance <= radius {
        Some(SegmentHit {
            point,
            distance,
            normal,
        })
    } else {
        None
    }
}

/// Unit normal of the line through `a..b`, signed to face `reference`.
///
/// Degenerate segments yield `None` (treated as "no collision" by callers).
/// When `reference` lies exactly on the line the perpendicular keeps its
/// default sign, which is stable across ticks.
pub fn circle_line_normal(a: Vec2, b: Vec2, reference: Vec2) -> Option<Vec2> {
    let ab = b - a;
    let len = ab.length();
    if len < 1e-3 {
        return None;
    }
    let mut normal = Vec2::new(-ab.y, ab.x) / len;
    let (closest, _) = closest_point_on_segment(reference, a, b)?;
    if normal.dot(reference - closest) < 0.0 {
        normal = -normal;
    }
    Some(normal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closest_point_clamps_to_endpoints() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);

        let (p, d) = closest_point_on_segment(Vec2::new(-5.0, 0.0), a, b).unwrap();
        assert!((p - a).length() < 0.001);
        assert!((d - 5.0).abs() < 0.001);

        let (p, d) = closest_point_on_segment(Vec2::new(5.0, 3.0), a, b).unwrap();
        assert!((p - Vec2::new(5.0, 0.0)).length() < 0.001);
        assert!((d - 3.0).abs() < 0.001);
    }

    #[test]
    fn test_degenerate_segment_is_no_collision() {
        let a = Vec2::new(4.0, 4.0);
        assert!(closest_point_on_segment(Vec2::new(0.0, 0.0), a, a).is_none());
        assert!(circle_segment_collision(Vec2::new(0.0, 0.0), 100.0, a, a, Vec2::X).is_none());
        assert!(circle_line_normal(a, a, Vec2::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn test_circle_segment_collision_threshold() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        let n = Vec2::new(0.0, 1.0);

        let hit = circle_segment_collision(Vec2::new(5.0, 3.0), 4.0, a, b, n).unwrap();
        assert!((hit.distance - 3.0).abs() < 0.001);
        assert_eq!(hit.normal, n);

        assert!(circle_segment_collision(Vec2::new(5.0, 5.0), 4.0, a, b, n).is_none());
    }

    #[test]
    fn test_line_normal_faces_reference() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);

        let above = circle_line_normal(a, b, Vec2::new(5.0, 7.0)).unwrap();
        assert!(above.y > 0.99);

        let below = circle_line_normal(a, b, Vec2::new(5.0, -7.0)).unwrap();
        assert!(below.y < -0.99);
    }
}
