//! GPU-ready label mesh.
//!
//! `MeshVertex` derives `bytemuck::Pod` + `Zeroable` so a finished label
//! can be uploaded with `bytemuck::cast_slice` and no per-vertex copy.

use bytemuck::{Pod, Zeroable};

use lumen_core::{Vertex, VERTS_PER_QUAD};

/// One vertex of the finished label mesh, in layout units.
///
/// 36 bytes per vertex.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    /// RGBA, each channel in [0.0, 1.0].
    pub color: [f32; 4],
    pub uv: [f32; 2],
}

impl MeshVertex {
    /// Convert an engine-pixel vertex, scaling its position by `units_per_pixel`.
    pub fn from_vertex(v: &Vertex, units_per_pixel: f32) -> Self {
        let [x, y, z] = v.position;
        Self {
            position: [x * units_per_pixel, y * units_per_pixel, z],
            color: v.color.to_f32(),
            uv: v.uv,
        }
    }
}

/// Scale a whole quad buffer into mesh vertices.
pub fn build_mesh(verts: &[Vertex], units_per_pixel: f32) -> Vec<MeshVertex> {
    verts
        .iter()
        .map(|v| MeshVertex::from_vertex(v, units_per_pixel))
        .collect()
}

/// Two triangles per quad, corners in top-left, top-right,
/// bottom-right, bottom-left order.
pub fn quad_indices(quad_count: usize) -> Vec<u32> {
    (0..quad_count as u32)
        .flat_map(|q| {
            let b = q * VERTS_PER_QUAD as u32;
            [b, b + 1, b + 2, b + 2, b + 3, b]
        })
        .collect()
}

// ===================================================================
// Tests
// ===================================================================
