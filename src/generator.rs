// src/generator.rs

use rand::Rng;

use crate::geometry::Vec2;
use crate::polygon::Polygon;

/// Random test polygons. Every vertex sits at its own angle around `center`
/// (angles strictly increasing), so the result is star-shaped, simple and
/// counter-clockwise, but usually not convex.
pub struct PolygonGenerator;

impl PolygonGenerator {
    pub fn generate_star_polygon(center: Vec2, avg_radius: f32, num_vertices: usize) -> Polygon {
        let mut rng = rand::thread_rng();
        Self::generate_star_polygon_with_rng(&mut rng, center, avg_radius, num_vertices)
    }

    pub fn generate_star_polygon_with_rng<R: Rng>(
        rng: &mut R,
        center: Vec2,
        avg_radius: f32,
        num_vertices: usize,
    ) -> Polygon {
        if num_vertices == 0 {
            return Polygon::default();
        }

        let mut angles = Vec::with_capacity(num_vertices);
        for i in 0..num_vertices {
            let base_angle = (i as f32) * 2.0 * std::f32::consts::PI / (num_vertices as f32);
            angles.push(base_angle);
        }

        let max_perturbation = std::f32::consts::PI / (num_vertices as f32) * 0.3;

        for angle in angles.iter_mut() {
            *angle += rng.gen_range(-max_perturbation..max_perturbation);
        }

        for i in 1..num_vertices {
            if angles[i] <= angles[i - 1] {
                angles[i] = angles[i - 1] + 0.01;
            }
        }

        let min_radius = avg_radius * 0.5;
        let max_radius = avg_radius * 1.5;

        angles
            .into_iter()
            .map(|angle_rad| {
                let radius = rng.gen_range(min_radius..max_radius);
                center + Vec2::new(radius * angle_rad.cos(), radius * angle_rad.sin())
            })
            .collect()
    }
}
