// src/lib.rs

//! 2D line/segment intersection and simple-polygon triangulation for
//! renderers.
//!
//! ```
//! use polymesh2d::{Polygon, Vec2};
//!
//! let mut square = Polygon::from([
//!     Vec2::new(0.0, 0.0),
//!     Vec2::new(1.0, 0.0),
//!     Vec2::new(1.0, 1.0),
//!     Vec2::new(0.0, 1.0),
//! ]);
//! assert!(square.envelops(Vec2::new(0.5, 0.5)));
//!
//! square.build_triangle_mesh();
//! assert_eq!(square.triangle_mesh(), Some(&[[0, 1, 2], [0, 2, 3]][..]));
//! ```

pub mod geometry;
pub mod generator;
pub mod intersection;
pub mod polygon;
mod triangulation;
pub mod vertex;

pub use geometry::{
    approx_equivalent, approx_equivalent_with_tolerance, Line, LineSegment, Parametric, RayTarget,
    Vec2, DEFAULT_TOLERANCE,
};
pub use generator::PolygonGenerator;
pub use intersection::{
    intersect, intersect_with_tolerance, intersection, intersection_distance,
    intersection_distance_with_tolerance, intersection_parameters, intersection_with_tolerance,
    IntersectionDistance, IntersectionPoint,
};
pub use polygon::{Polygon, TriangleIndices};
pub use vertex::{push_filled_polygon, Vertex};
