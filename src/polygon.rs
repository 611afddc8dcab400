// src/polygon.rs

use crate::geometry::{Line, LineSegment, Vec2, DEFAULT_TOLERANCE};
use crate::intersection::intersection_distance_with_tolerance;
use crate::triangulation;

/// One triangle of a polygon's mesh, as ascending indices into its vertices.
pub type TriangleIndices = [u32; 3];

/// A simple polygon: an ordered, implicitly closed loop of vertices.
///
/// The triangle mesh is built on demand and cached. Any mutable access to
/// the vertices drops the cache, so a stale mesh can't be observed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polygon {
    vertices: Vec<Vec2>,
    triangle_mesh: Option<Vec<TriangleIndices>>,
}

impl Polygon {
    pub fn new(vertices: Vec<Vec2>) -> Self {
        Self {
            vertices,
            triangle_mesh: None,
        }
    }

    pub fn from_points(points: &[Vec2]) -> Self {
        Self::new(points.to_vec())
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    pub fn count(&self) -> usize {
        self.vertices.len()
    }

    pub fn vertices_mut(&mut self) -> &mut Vec<Vec2> {
        self.triangle_mesh = None;
        &mut self.vertices
    }

    pub fn set_vertices(&mut self, vertices: Vec<Vec2>) {
        self.triangle_mesh = None;
        self.vertices = vertices;
    }

    pub fn push_vertex(&mut self, vertex: Vec2) {
        self.triangle_mesh = None;
        self.vertices.push(vertex);
    }

    /// The boundary edges in order, the last one closing the loop back to
    /// vertex 0.
    pub fn lines(&self) -> impl Iterator<Item = LineSegment> + '_ {
        let n = self.vertices.len();
        let closing = if n > 1 { n } else { 0 };
        (0..closing).map(move |i| LineSegment::new(self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Shoelace area, positive for counter-clockwise winding.
    pub fn signed_area(&self) -> f32 {
        let n = self.vertices.len();
        if n < 3 {
            return 0.0;
        }
        let mut area = 0.0;
        for i in 0..n {
            let j = (i + 1) % n;
            area += self.vertices[i].x * self.vertices[j].y;
            area -= self.vertices[j].x * self.vertices[i].y;
        }
        area / 2.0
    }

    pub fn area(&self) -> f32 {
        self.signed_area().abs()
    }

    /// Point-in-polygon test (odd/even ray cast along +x).
    ///
    /// Edges only count when they straddle the ray half-open, so a ray through
    /// a vertex is counted once. Points on the boundary get an arbitrary but
    /// stable answer.
    pub fn envelops(&self, point: Vec2) -> bool {
        self.envelops_with_tolerance(point, DEFAULT_TOLERANCE)
    }

    pub fn envelops_with_tolerance(&self, point: Vec2, tolerance: f32) -> bool {
        if self.vertices.len() < 3 {
            return false;
        }
        let ray = Line::new(point, Vec2::X);
        let crossings = self
            .lines()
            .filter(|edge| (edge.p1.y > point.y) != (edge.p2.y > point.y))
            .filter(|edge| {
                let hit = intersection_distance_with_tolerance(&ray, edge, tolerance);
                hit.intersects && hit.distance >= -tolerance
            })
            .count();
        crossings % 2 == 1
    }

    /// Triangulates the polygon and caches the result, replacing any previous
    /// mesh. Does nothing for fewer than 3 vertices.
    ///
    /// The vertices must describe a simple polygon. Self-intersecting input
    /// terminates but leaves an incomplete mesh.
    pub fn build_triangle_mesh(&mut self) {
        self.build_triangle_mesh_with_tolerance(DEFAULT_TOLERANCE);
    }

    pub fn build_triangle_mesh_with_tolerance(&mut self, tolerance: f32) {
        if self.vertices.len() < 3 {
            self.triangle_mesh = None;
            return;
        }
        self.triangle_mesh = Some(triangulation::triangulate(self, tolerance));
    }

    /// Returns the cached mesh, building it first if nobody has yet.
    pub fn ensure_triangle_mesh(&mut self) -> Option<&[TriangleIndices]> {
        if self.triangle_mesh.is_none() {
            self.build_triangle_mesh();
        }
        self.triangle_mesh()
    }

    pub fn triangle_mesh(&self) -> Option<&[TriangleIndices]> {
        self.triangle_mesh.as_deref()
    }

    /// The cached mesh as a flat index list, ready for an index buffer.
    pub fn mesh_indices(&self) -> Option<&[u32]> {
        self.triangle_mesh
            .as_deref()
            .map(|mesh| bytemuck::cast_slice::<TriangleIndices, u32>(mesh))
    }
}

impl From<Vec<Vec2>> for Polygon {
    fn from(vertices: Vec<Vec2>) -> Self {
        Self::new(vertices)
    }
}

impl From<&[Vec2]> for Polygon {
    fn from(points: &[Vec2]) -> Self {
        Self::from_points(points)
    }
}

impl<const N: usize> From<[Vec2; N]> for Polygon {
    fn from(points: [Vec2; N]) -> Self {
        Self::new(points.to_vec())
    }
}

impl FromIterator<Vec2> for Polygon {
    fn from_iter<I: IntoIterator<Item = Vec2>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
