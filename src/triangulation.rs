// src/triangulation.rs
//
// Incremental boundary-closing triangulation. Triangles are grown from the
// polygon's outer edges; every diagonal a triangle introduces becomes an
// "open" edge that still needs a triangle on its other side, and turns
// "closed" once it has one. Candidates are only accepted if they stay inside
// the polygon and don't overlap anything already placed.

use std::collections::HashSet;

use log::{debug, trace, warn};

use crate::geometry::{LineSegment, Vec2};
use crate::intersection::intersect_with_tolerance;
use crate::polygon::{Polygon, TriangleIndices};

/// Undirected edge between two vertex indices, smaller index first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct Edge(usize, usize);

impl Edge {
    fn new(a: usize, b: usize) -> Self {
        if a < b {
            Edge(a, b)
        } else {
            Edge(b, a)
        }
    }

    fn contains(&self, index: usize) -> bool {
        self.0 == index || self.1 == index
    }

    fn shares_vertex(&self, other: &Edge) -> bool {
        self.contains(other.0) || self.contains(other.1)
    }
}

#[inline(always)]
fn edges_of(tri: [usize; 3]) -> [Edge; 3] {
    [
        Edge::new(tri[0], tri[1]),
        Edge::new(tri[1], tri[2]),
        Edge::new(tri[2], tri[0]),
    ]
}

/// Each edge of `tri` paired with the vertex across from it.
#[inline(always)]
fn edges_with_opposite(tri: [usize; 3]) -> [(Edge, usize); 3] {
    [
        (Edge::new(tri[0], tri[1]), tri[2]),
        (Edge::new(tri[1], tri[2]), tri[0]),
        (Edge::new(tri[2], tri[0]), tri[1]),
    ]
}

#[inline(always)]
fn third_vertex(tri: [usize; 3], edge: Edge) -> usize {
    tri[0] + tri[1] + tri[2] - edge.0 - edge.1
}

#[inline(always)]
fn orientation(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b - a).perp_dot(p - a)
}

struct MeshBuilder<'a> {
    polygon: &'a Polygon,
    vertices: &'a [Vec2],
    outer_edges: Vec<Edge>,
    open_edges: Vec<Edge>,
    closed_edges: HashSet<Edge>,
    triangles: Vec<[usize; 3]>,
    target: usize,
    tolerance: f32,
}

impl<'a> MeshBuilder<'a> {
    fn new(polygon: &'a Polygon, tolerance: f32) -> Self {
        let vertices = polygon.vertices();
        let n = vertices.len();
        Self {
            polygon,
            vertices,
            outer_edges: (0..n).map(|i| Edge::new(i, (i + 1) % n)).collect(),
            open_edges: Vec::new(),
            closed_edges: HashSet::new(),
            triangles: Vec::with_capacity(n.saturating_sub(2)),
            target: n.saturating_sub(2),
            tolerance,
        }
    }

    fn run(mut self) -> Vec<TriangleIndices> {
        debug!(
            "Triangulating polygon with {} vertices ({} triangles expected)",
            self.vertices.len(),
            self.target
        );

        loop {
            let before = self.triangles.len();
            for i in 0..self.outer_edges.len() {
                if self.is_complete() {
                    break;
                }
                let edge = self.outer_edges[i];
                if self.boundary_covered(edge) {
                    continue;
                }
                if let Some(k) = self.find_third_vertex(edge) {
                    self.accept([edge.0, edge.1, k]);
                    self.try_close_open_edges();
                }
            }
            if self.is_complete() || self.triangles.len() == before {
                break;
            }
        }

        if !self.is_complete() || !self.open_edges.is_empty() {
            warn!(
                "Incomplete triangulation: {} of {} triangles, {} open edges left (is the polygon simple?)",
                self.triangles.len(),
                self.target,
                self.open_edges.len()
            );
        } else {
            debug!("Triangulation finished with {} triangles", self.triangles.len());
        }

        self.triangles
            .into_iter()
            .map(|tri| tri.map(|i| i as u32))
            .collect()
    }

    fn is_complete(&self) -> bool {
        self.triangles.len() >= self.target
    }

    fn is_boundary(&self, edge: Edge) -> bool {
        let n = self.vertices.len();
        edge.1 - edge.0 == 1 || (edge.0 == 0 && edge.1 == n - 1)
    }

    fn boundary_covered(&self, edge: Edge) -> bool {
        self.triangles.iter().any(|&tri| edges_of(tri).contains(&edge))
    }

    fn segment(&self, edge: Edge) -> LineSegment {
        LineSegment::new(self.vertices[edge.0], self.vertices[edge.1])
    }

    fn segments_intersect(&self, a: Edge, b: Edge) -> bool {
        intersect_with_tolerance(&self.segment(a), &self.segment(b), self.tolerance)
    }

    /// First vertex, in index order, that closes `edge` into an acceptable triangle.
    fn find_third_vertex(&self, edge: Edge) -> Option<usize> {
        (0..self.vertices.len())
            .filter(|&k| !edge.contains(k))
            .find(|&k| self.is_valid_triangle([edge.0, edge.1, k]))
    }

    fn is_valid_triangle(&self, tri: [usize; 3]) -> bool {
        !self.is_degenerate(tri)
            && !self.edge_used_in_existing_triangles(tri)
            && !self.intersects_outer_edge(tri)
            && !self.intersects_existing_triangle(tri)
            && !self.envelops_any_vertex(tri)
            && !self.has_edges_outside_polygon(tri)
    }

    fn is_degenerate(&self, tri: [usize; 3]) -> bool {
        let [a, b, c] = tri.map(|i| self.vertices[i]);
        orientation(a, b, c).abs() <= self.tolerance
    }

    /// An edge can't take another triangle if it is closed, if it is an
    /// already covered outer edge, or if the triangle would sit on the same
    /// side as the one already using it.
    fn edge_used_in_existing_triangles(&self, tri: [usize; 3]) -> bool {
        edges_with_opposite(tri).iter().any(|&(edge, opposite)| {
            if self.closed_edges.contains(&edge) {
                return true;
            }
            let a = self.vertices[edge.0];
            let b = self.vertices[edge.1];
            let side = orientation(a, b, self.vertices[opposite]);
            self.triangles
                .iter()
                .filter(|&&existing| edges_of(existing).contains(&edge))
                .any(|&existing| {
                    if self.is_boundary(edge) {
                        return true;
                    }
                    let other = self.vertices[third_vertex(existing, edge)];
                    side * orientation(a, b, other) >= 0.0
                })
        })
    }

    /// Diagonals may not cross (or touch) an outer edge they don't share a
    /// vertex with. Parallel edges never count as crossing.
    fn intersects_outer_edge(&self, tri: [usize; 3]) -> bool {
        edges_of(tri)
            .iter()
            .filter(|&&edge| !self.is_boundary(edge))
            .any(|&edge| {
                self.outer_edges
                    .iter()
                    .any(|&outer| !edge.shares_vertex(&outer) && self.segments_intersect(edge, outer))
            })
    }

    fn intersects_existing_triangle(&self, tri: [usize; 3]) -> bool {
        self.triangles
            .iter()
            .any(|&existing| self.triangles_intersect(tri, existing))
    }

    fn triangles_intersect(&self, a: [usize; 3], b: [usize; 3]) -> bool {
        edges_of(a).iter().any(|&ea| {
            edges_of(b)
                .iter()
                .any(|&eb| !ea.shares_vertex(&eb) && self.segments_intersect(ea, eb))
        })
    }

    /// True if some other polygon vertex lies strictly inside `tri`.
    fn envelops_any_vertex(&self, tri: [usize; 3]) -> bool {
        let [a, b, c] = tri.map(|i| self.vertices[i]);
        let tol = self.tolerance;
        (0..self.vertices.len())
            .filter(|i| !tri.contains(i))
            .any(|i| {
                let p = self.vertices[i];
                let d1 = orientation(a, b, p);
                let d2 = orientation(b, c, p);
                let d3 = orientation(c, a, p);
                (d1 > tol && d2 > tol && d3 > tol) || (d1 < -tol && d2 < -tol && d3 < -tol)
            })
    }

    fn has_edges_outside_polygon(&self, tri: [usize; 3]) -> bool {
        edges_of(tri)
            .iter()
            .filter(|&&edge| !self.is_boundary(edge))
            .any(|&edge| {
                !self
                    .polygon
                    .envelops_with_tolerance(self.segment(edge).midpoint(), self.tolerance)
            })
    }

    fn accept(&mut self, mut tri: [usize; 3]) {
        tri.sort_unstable();
        self.triangles.push(tri);
        self.update_open_and_closed_edges(tri);
        trace!(
            "Accepted triangle {:?} ({} open, {} closed edges)",
            tri,
            self.open_edges.len(),
            self.closed_edges.len()
        );
    }

    fn update_open_and_closed_edges(&mut self, tri: [usize; 3]) {
        for edge in edges_of(tri) {
            if self.is_boundary(edge) {
                continue;
            }
            match self.open_edges.iter().position(|&open| open == edge) {
                Some(pos) => {
                    self.open_edges.remove(pos);
                    self.closed_edges.insert(edge);
                }
                None => self.open_edges.push(edge),
            }
        }
    }

    /// Keeps closing open edges, oldest first, until none of them can take a
    /// triangle.
    fn try_close_open_edges(&mut self) {
        while !self.is_complete() {
            let next = self
                .open_edges
                .iter()
                .find_map(|&edge| self.find_third_vertex(edge).map(|k| (edge, k)));
            match next {
                Some((edge, k)) => self.accept([edge.0, edge.1, k]),
                None => break,
            }
        }
    }
}

/// Triangulates `polygon`, which must have at least 3 vertices.
pub(crate) fn triangulate(polygon: &Polygon, tolerance: f32) -> Vec<TriangleIndices> {
    MeshBuilder::new(polygon, tolerance).run()
}

#[cfg(test)]
mod tests {
    use crate::geometry::Vec2;
    use crate::polygon::Polygon;

    fn polygon(points: &[(f32, f32)]) -> Polygon {
        points.iter().map(|&(x, y)| Vec2::new(x, y)).collect()
    }

    fn mesh_of(points: &[(f32, f32)]) -> Vec<[u32; 3]> {
        let mut poly = polygon(points);
        poly.build_triangle_mesh();
        poly.triangle_mesh().map(|mesh| mesh.to_vec()).unwrap_or_default()
    }

    fn mesh_area(poly: &Polygon) -> f32 {
        let v = poly.vertices();
        poly.triangle_mesh()
            .unwrap_or_default()
            .iter()
            .map(|&[a, b, c]| {
                let (a, b, c) = (v[a as usize], v[b as usize], v[c as usize]);
                (b - a).perp_dot(c - a).abs() / 2.0
            })
            .sum()
    }

    #[test]
    fn test_triangle() {
        assert_eq!(mesh_of(&[(0.0, 0.0), (1.0, 0.0), (0.5, 1.0)]), vec![[0, 1, 2]]);
    }

    #[test]
    fn test_square_is_a_fan() {
        assert_eq!(
            mesh_of(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]),
            vec![[0, 1, 2], [0, 2, 3]]
        );
    }

    #[test]
    fn test_pentagon_with_reflex_vertex() {
        assert_eq!(
            mesh_of(&[(0.0, 0.5), (-0.5, -0.5), (0.5, -0.5), (0.5, 0.0), (0.6, 0.6)]),
            vec![[0, 1, 2], [0, 2, 3], [0, 3, 4]]
        );
    }

    #[test]
    fn test_irregular_polygon_follows_frontier() {
        assert_eq!(
            mesh_of(&[
                (0.0, 0.4),
                (-0.2, 0.1),
                (0.1, -0.2),
                (0.5, 0.0),
                (0.25, 0.25),
                (0.4, 0.0),
                (0.0, 0.0),
            ]),
            vec![[0, 1, 6], [1, 2, 6], [2, 5, 6], [2, 3, 5], [3, 4, 5]]
        );
    }

    #[test]
    fn test_clockwise_winding() {
        let mut poly = polygon(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]);
        poly.build_triangle_mesh();
        assert_eq!(poly.triangle_mesh().map(|mesh| mesh.len()), Some(2));
        assert!((mesh_area(&poly) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_collinear_vertex() {
        let mut poly = polygon(&[(0.0, 0.0), (0.5, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        poly.build_triangle_mesh();
        assert_eq!(poly.triangle_mesh().map(|mesh| mesh.len()), Some(3));
        assert!((mesh_area(&poly) - poly.area()).abs() < 1e-5);
    }

    #[test]
    fn test_too_few_vertices() {
        let mut poly = polygon(&[(0.0, 0.0), (1.0, 0.0)]);
        poly.build_triangle_mesh();
        assert!(poly.triangle_mesh().is_none());
        assert!(poly.ensure_triangle_mesh().is_none());

        let mut empty = Polygon::default();
        empty.build_triangle_mesh();
        assert!(empty.triangle_mesh().is_none());
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let mut poly = polygon(&[
            (0.0, 0.4),
            (-0.2, 0.1),
            (0.1, -0.2),
            (0.5, 0.0),
            (0.25, 0.25),
            (0.4, 0.0),
            (0.0, 0.0),
        ]);
        poly.build_triangle_mesh();
        let first = poly.triangle_mesh().map(|mesh| mesh.to_vec());
        poly.build_triangle_mesh();
        assert_eq!(poly.triangle_mesh().map(|mesh| mesh.to_vec()), first);
    }

    #[test]
    fn test_self_intersecting_input_terminates() {
        // Bow tie: not a simple polygon, only required not to hang or panic
        let mut poly = polygon(&[(0.0, 0.0), (1.0, 1.0), (1.0, 0.0), (0.0, 1.0)]);
        poly.build_triangle_mesh();
        let mesh = poly.triangle_mesh().unwrap_or_default();
        assert!(mesh.len() <= 2);
        assert!(mesh.iter().flatten().all(|&i| i < 4));
    }
}
