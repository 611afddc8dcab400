// src/intersection.rs

use crate::geometry::{Parametric, Vec2, DEFAULT_TOLERANCE};

/// Where two lines/segments meet. `point` only means something when
/// `intersects` is true.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntersectionPoint {
    pub intersects: bool,
    pub point: Vec2,
}

impl IntersectionPoint {
    pub const NONE: Self = Self { intersects: false, point: Vec2::ZERO };

    pub fn point(&self) -> Option<Vec2> {
        self.intersects.then_some(self.point)
    }
}

/// Parametric coordinate of an intersection along the first argument.
///
/// For a `Line` the distance scales `dir`, so it is only a Euclidean distance
/// when `dir` is unit length. For a `LineSegment` 0 is `p1` and 1 is `p2`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntersectionDistance {
    pub intersects: bool,
    pub distance: f32,
}

impl IntersectionDistance {
    pub const NONE: Self = Self { intersects: false, distance: 0.0 };

    pub fn distance(&self) -> Option<f32> {
        self.intersects.then_some(self.distance)
    }
}

/// Solves `a.origin + k_a * a.dir == b.origin + k_b * b.dir` and returns
/// `(k_a, k_b)`. Range checks are left to the caller.
///
/// Returns `None` when the directions are parallel (cross product below
/// `tolerance`), coincident lines included.
pub fn intersection_parameters<A, B>(a: &A, b: &B, tolerance: f32) -> Option<(f32, f32)>
where
    A: Parametric + ?Sized,
    B: Parametric + ?Sized,
{
    let dir_a = a.direction();
    let dir_b = b.direction();

    let denominator = dir_a.perp_dot(dir_b);
    if denominator.abs() < tolerance {
        return None;
    }

    let w = b.origin() - a.origin();
    let k_a = w.perp_dot(dir_b) / denominator;
    let k_b = w.perp_dot(dir_a) / denominator;
    Some((k_a, k_b))
}

#[inline(always)]
fn admitted_parameters<A, B>(a: &A, b: &B, tolerance: f32) -> Option<(f32, f32)>
where
    A: Parametric + ?Sized,
    B: Parametric + ?Sized,
{
    intersection_parameters(a, b, tolerance)
        .filter(|&(k_a, k_b)| a.admits(k_a, tolerance) && b.admits(k_b, tolerance))
}

/// Works for any mix of `Line` and `LineSegment`, in either order.
pub fn intersect<A, B>(a: &A, b: &B) -> bool
where
    A: Parametric + ?Sized,
    B: Parametric + ?Sized,
{
    intersect_with_tolerance(a, b, DEFAULT_TOLERANCE)
}

pub fn intersect_with_tolerance<A, B>(a: &A, b: &B, tolerance: f32) -> bool
where
    A: Parametric + ?Sized,
    B: Parametric + ?Sized,
{
    admitted_parameters(a, b, tolerance).is_some()
}

pub fn intersection<A, B>(a: &A, b: &B) -> IntersectionPoint
where
    A: Parametric + ?Sized,
    B: Parametric + ?Sized,
{
    intersection_with_tolerance(a, b, DEFAULT_TOLERANCE)
}

pub fn intersection_with_tolerance<A, B>(a: &A, b: &B, tolerance: f32) -> IntersectionPoint
where
    A: Parametric + ?Sized,
    B: Parametric + ?Sized,
{
    match admitted_parameters(a, b, tolerance) {
        Some((k_a, _)) => IntersectionPoint { intersects: true, point: a.point_at(k_a) },
        None => IntersectionPoint::NONE,
    }
}

pub fn intersection_distance<A, B>(a: &A, b: &B) -> IntersectionDistance
where
    A: Parametric + ?Sized,
    B: Parametric + ?Sized,
{
    intersection_distance_with_tolerance(a, b, DEFAULT_TOLERANCE)
}

pub fn intersection_distance_with_tolerance<A, B>(
    a: &A,
    b: &B,
    tolerance: f32,
) -> IntersectionDistance
where
    A: Parametric + ?Sized,
    B: Parametric + ?Sized,
{
    match admitted_parameters(a, b, tolerance) {
        Some((k_a, _)) => IntersectionDistance { intersects: true, distance: k_a },
        None => IntersectionDistance::NONE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Line, LineSegment};

    fn v(x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y)
    }

    fn assert_close(a: Vec2, b: Vec2) {
        assert!((a - b).length() < 1e-5, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_crossing_segments() {
        let a = LineSegment::new(v(0.0, 0.0), v(1.0, 1.0));
        let b = LineSegment::new(v(1.0, -0.5), v(0.0, 0.5));

        assert!(intersect(&a, &b));
        let hit = intersection(&a, &b);
        assert!(hit.intersects);
        assert_close(hit.point, v(0.25, 0.25));

        let reversed = intersection(&b, &a);
        assert_close(reversed.point().unwrap(), v(0.25, 0.25));
    }

    #[test]
    fn test_segments_that_miss() {
        let a = LineSegment::new(v(0.0, 0.0), v(1.0, 1.0));
        let b = LineSegment::new(v(3.0, 0.0), v(2.0, 1.0));
        assert!(!intersect(&a, &b));
        assert_eq!(intersection(&a, &b).point(), None);
        // The supporting lines still meet
        assert!(intersect(&a.to_line(), &b.to_line()));
    }

    #[test]
    fn test_touching_endpoints_count() {
        let a = LineSegment::new(v(0.0, 0.0), v(1.0, 0.0));
        let b = LineSegment::new(v(1.0, 0.0), v(1.0, 1.0));
        assert!(intersect(&a, &b));
    }

    #[test]
    fn test_parallel_never_intersects() {
        let a = Line::new(v(0.0, 0.0), v(1.0, 0.0));
        let parallel = Line::new(v(0.0, 1.0), v(2.0, 0.0));
        let anti_parallel = Line::new(v(0.0, 1.0), v(-1.0, 0.0));
        let coincident = Line::new(v(5.0, 0.0), v(3.0, 0.0));

        assert!(!intersect(&a, &parallel));
        assert!(!intersect(&a, &anti_parallel));
        assert!(!intersect(&a, &coincident));

        let overlapping_a = LineSegment::new(v(0.0, 0.0), v(2.0, 0.0));
        let overlapping_b = LineSegment::new(v(1.0, 0.0), v(3.0, 0.0));
        assert!(!intersect(&overlapping_a, &overlapping_b));
    }

    #[test]
    fn test_line_and_segment() {
        let line = Line::new(v(0.0, 0.5), v(1.0, 0.0));
        let hit = LineSegment::new(v(3.0, 0.0), v(3.0, 1.0));
        let miss = LineSegment::new(v(3.0, 1.0), v(3.0, 2.0));

        assert!(intersect(&line, &hit));
        assert!(!intersect(&line, &miss));
        assert_close(intersection(&line, &hit).point, v(3.0, 0.5));
        assert_close(intersection(&hit, &line).point, v(3.0, 0.5));
    }

    #[test]
    fn test_symmetry_for_all_combinations() {
        let lines = [
            Line::new(v(0.0, 0.0), v(1.0, 1.0)),
            Line::new(v(0.0, 1.0), v(1.0, -2.0)),
            Line::new(v(4.0, 4.0), v(0.0, 1.0)),
            Line::new(v(-1.0, 0.0), v(1.0, 1.0)),
        ];
        let segments = [
            LineSegment::new(v(0.0, 0.0), v(1.0, 1.0)),
            LineSegment::new(v(1.0, -0.5), v(0.0, 0.5)),
            LineSegment::new(v(2.0, 2.0), v(3.0, 0.0)),
            LineSegment::new(v(-1.0, 0.0), v(0.0, 1.0)),
        ];

        for a in &lines {
            for b in &lines {
                assert_eq!(intersect(a, b), intersect(b, a));
            }
            for s in &segments {
                assert_eq!(intersect(a, s), intersect(s, a));
            }
        }
        for a in &segments {
            for b in &segments {
                assert_eq!(intersect(a, b), intersect(b, a));
            }
        }
    }

    #[test]
    fn test_distance_is_along_first_argument() {
        let ray = Line::new(v(0.0, 0.0), v(2.0, 0.0));
        let wall = LineSegment::new(v(4.0, -1.0), v(4.0, 3.0));

        let d = intersection_distance(&ray, &wall);
        assert!(d.intersects);
        assert!((d.distance - 2.0).abs() < 1e-6);

        let back = intersection_distance(&wall, &ray);
        assert!(back.intersects);
        assert!((back.distance - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_distance_can_be_negative_for_lines() {
        let ray = Line::new(v(0.0, 0.0), v(1.0, 0.0));
        let behind = LineSegment::new(v(-3.0, -1.0), v(-3.0, 1.0));
        assert_eq!(intersection_distance(&ray, &behind).distance(), Some(-3.0));
    }

    #[test]
    fn test_segment_out_of_range_has_no_distance() {
        let a = LineSegment::new(v(0.0, 0.0), v(1.0, 0.0));
        let b = LineSegment::new(v(2.0, -1.0), v(2.0, 1.0));
        assert_eq!(intersection_distance(&a, &b), IntersectionDistance::NONE);
    }

    #[test]
    fn test_tolerance_widens_segment_range() {
        let a = LineSegment::new(v(0.0, 0.0), v(1.0, 0.0));
        let b = LineSegment::new(v(1.01, -1.0), v(1.01, 1.0));
        assert!(!intersect(&a, &b));
        assert!(intersect_with_tolerance(&a, &b, 0.05));
    }
}
