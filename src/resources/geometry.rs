//! Procedurally built geometry, handed to an [`AssetProvider`](super::AssetProvider)
//! to become a mesh.

/**
 * Vertex layout of procedural geometry.
 *
 * Kept `Pod` so a provider can cast a whole vertex list straight into a
 * vertex buffer.
 */
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GeometryVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

#[derive(Clone, Debug, Default)]
pub struct Geometry {
    pub vertices: Vec<GeometryVertex>,
    pub indices: Vec<u32>,
}

impl Geometry {
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// UV sphere around the origin.
///
/// Produces `(segments + 1) * (rings + 1)` vertices and
/// `segments * rings * 2` triangles. Normals point outwards. `segments` and
/// `rings` are clamped to at least 3 and 2 so the sphere never degenerates.
pub fn uv_sphere(radius: f32, segments: u32, rings: u32) -> Geometry {
    let segments = segments.max(3);
    let rings = rings.max(2);
    let mut vertices = Vec::with_capacity(((segments + 1) * (rings + 1)) as usize);
    let mut indices = Vec::with_capacity((segments * rings * 6) as usize);

    for ring in 0..=rings {
        let phi = std::f32::consts::PI * ring as f32 / rings as f32;
        let y = phi.cos();
        let ring_radius = phi.sin();

        for seg in 0..=segments {
            let theta = 2.0 * std::f32::consts::PI * seg as f32 / segments as f32;
            let x = ring_radius * theta.cos();
            let z = ring_radius * theta.sin();

            vertices.push(GeometryVertex {
                position: [x * radius, y * radius, z * radius],
                normal: [x, y, z],
                tex_coords: [seg as f32 / segments as f32, ring as f32 / rings as f32],
            });
        }
    }

    for ring in 0..rings {
        for seg in 0..segments {
            let current = ring * (segments + 1) + seg;
            let next = current + segments + 1;

            indices.extend_from_slice(&[current, next, current + 1]);
            indices.extend_from_slice(&[current + 1, next, next + 1]);
        }
    }

    Geometry { vertices, indices }
}
