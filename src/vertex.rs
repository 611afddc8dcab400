// src/vertex.rs

use bytemuck::{Pod, Zeroable};
use log::warn;

use crate::polygon::Polygon;

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable, PartialEq)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub fn new(position: [f32; 2], color: [f32; 4]) -> Self {
        Self { position, color }
    }

    #[cfg(feature = "wgpu")]
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Appends `polygon` as filled triangles to a frame's vertex/index buffers,
/// triangulating it first if its mesh isn't cached yet.
///
/// Returns false (and appends nothing) if there is no mesh or the batch
/// would no longer be addressable with `u16` indices.
pub fn push_filled_polygon(
    polygon: &mut Polygon,
    color: [f32; 4],
    frame_vertices: &mut Vec<Vertex>,
    frame_indices: &mut Vec<u16>,
) -> bool {
    if polygon.ensure_triangle_mesh().is_none() {
        return false;
    }

    let start = frame_vertices.len();
    if start + polygon.count() > u16::MAX as usize + 1 {
        warn!(
            "Frame vertex buffer full ({} + {} vertices), skipping polygon",
            start,
            polygon.count()
        );
        return false;
    }

    let Some(indices) = polygon.mesh_indices() else {
        return false;
    };
    frame_indices.extend(indices.iter().map(|&i| (start + i as usize) as u16));
    frame_vertices.extend(
        polygon
            .vertices()
            .iter()
            .map(|point| Vertex::new([point.x, point.y], color)),
    );
    true
}
