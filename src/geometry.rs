// src/geometry.rs

pub use glam::Vec2;

use crate::intersection::intersection_parameters;

/// Tolerance used by every predicate that doesn't take one explicitly.
pub const DEFAULT_TOLERANCE: f32 = 1e-5;

/// Anything that can be written as `origin + k * direction`.
///
/// `admits` decides which values of `k` belong to the shape: any real for a
/// [`Line`], `[0, 1]` (widened by the tolerance) for a [`LineSegment`].
pub trait Parametric {
    fn origin(&self) -> Vec2;
    fn direction(&self) -> Vec2;
    fn admits(&self, k: f32, tolerance: f32) -> bool;

    fn point_at(&self, k: f32) -> Vec2 {
        self.origin() + self.direction() * k
    }
}

/// An infinite line through `p` along `dir`. `dir` doesn't have to be unit length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    pub p: Vec2,
    pub dir: Vec2,
}

impl Line {
    pub fn new(p: Vec2, dir: Vec2) -> Self {
        Self { p, dir }
    }

    pub fn from_points(a: Vec2, b: Vec2) -> Self {
        Self { p: a, dir: b - a }
    }

    pub fn point_at(&self, k: f32) -> Vec2 {
        self.p + self.dir * k
    }

    /// True when `point` lies on the line.
    pub fn intersects(&self, point: Vec2) -> bool {
        self.intersects_with_tolerance(point, DEFAULT_TOLERANCE)
    }

    pub fn intersects_with_tolerance(&self, point: Vec2, tolerance: f32) -> bool {
        distance_to_supporting_line(self.p, self.dir, point) <= tolerance
    }

    /// Treats the line as a ray from `p` along `dir` and checks whether the
    /// ray reaches `target` (a point, a line or a segment).
    pub fn intersects_along_direction<T: RayTarget + ?Sized>(&self, target: &T) -> bool {
        target.hit_by_ray(self, DEFAULT_TOLERANCE)
    }

    pub fn intersects_along_direction_with_tolerance<T: RayTarget + ?Sized>(
        &self,
        target: &T,
        tolerance: f32,
    ) -> bool {
        target.hit_by_ray(self, tolerance)
    }
}

impl Parametric for Line {
    fn origin(&self) -> Vec2 {
        self.p
    }

    fn direction(&self) -> Vec2 {
        self.dir
    }

    fn admits(&self, _k: f32, _tolerance: f32) -> bool {
        true
    }
}

/// A bounded segment from `p1` (k = 0) to `p2` (k = 1).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineSegment {
    pub p1: Vec2,
    pub p2: Vec2,
}

impl LineSegment {
    pub fn new(p1: Vec2, p2: Vec2) -> Self {
        Self { p1, p2 }
    }

    pub fn direction(&self) -> Vec2 {
        self.p2 - self.p1
    }

    pub fn length(&self) -> f32 {
        self.direction().length()
    }

    pub fn midpoint(&self) -> Vec2 {
        (self.p1 + self.p2) * 0.5
    }

    pub fn point_at(&self, k: f32) -> Vec2 {
        self.p1 + self.direction() * k
    }

    pub fn to_line(&self) -> Line {
        Line::from_points(self.p1, self.p2)
    }

    /// True when `point` lies on the segment, endpoints included.
    pub fn intersects(&self, point: Vec2) -> bool {
        self.intersects_with_tolerance(point, DEFAULT_TOLERANCE)
    }

    pub fn intersects_with_tolerance(&self, point: Vec2, tolerance: f32) -> bool {
        let dir = self.direction();
        if distance_to_supporting_line(self.p1, dir, point) > tolerance {
            return false;
        }
        let len_sq = dir.length_squared();
        if len_sq <= tolerance * tolerance {
            // Zero length, the distance check above already compared against p1
            return true;
        }
        let k = (point - self.p1).dot(dir) / len_sq;
        self.admits(k, tolerance)
    }
}

impl Parametric for LineSegment {
    fn origin(&self) -> Vec2 {
        self.p1
    }

    fn direction(&self) -> Vec2 {
        self.p2 - self.p1
    }

    fn admits(&self, k: f32, tolerance: f32) -> bool {
        k >= -tolerance && k <= 1.0 + tolerance
    }
}

/// Something a ray (a [`Line`] read from `p` towards `dir`) can hit.
pub trait RayTarget {
    fn hit_by_ray(&self, ray: &Line, tolerance: f32) -> bool;
}

impl RayTarget for Vec2 {
    fn hit_by_ray(&self, ray: &Line, tolerance: f32) -> bool {
        if !ray.intersects_with_tolerance(*self, tolerance) {
            return false;
        }
        let len_sq = ray.dir.length_squared();
        if len_sq <= tolerance * tolerance {
            return true;
        }
        (*self - ray.p).dot(ray.dir) / len_sq >= -tolerance
    }
}

impl RayTarget for Line {
    fn hit_by_ray(&self, ray: &Line, tolerance: f32) -> bool {
        match intersection_parameters(ray, self, tolerance) {
            Some((k_ray, _)) => k_ray >= -tolerance,
            None => false,
        }
    }
}

impl RayTarget for LineSegment {
    fn hit_by_ray(&self, ray: &Line, tolerance: f32) -> bool {
        match intersection_parameters(ray, self, tolerance) {
            Some((k_ray, k_segment)) => k_ray >= -tolerance && self.admits(k_segment, tolerance),
            None => false,
        }
    }
}

/// True when both lines describe the same set of points, whatever the sign
/// or length of their directions.
pub fn approx_equivalent(a: &Line, b: &Line) -> bool {
    approx_equivalent_with_tolerance(a, b, DEFAULT_TOLERANCE)
}

pub fn approx_equivalent_with_tolerance(a: &Line, b: &Line, tolerance: f32) -> bool {
    let da = a.dir.normalize_or_zero();
    let db = b.dir.normalize_or_zero();
    da.perp_dot(db).abs() <= tolerance && a.intersects_with_tolerance(b.p, tolerance)
}

#[inline(always)]
fn distance_to_supporting_line(origin: Vec2, dir: Vec2, point: Vec2) -> f32 {
    let len = dir.length();
    if len == 0.0 {
        return (point - origin).length();
    }
    dir.perp_dot(point - origin).abs() / len
}
