use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::error::{Result, TerrainError};
use crate::height_field::HeightField;
use crate::metrics::TerrainMetrics;

// Vertex layout handed to the rendering backend.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
}

// Triangulated height field: one vertex per cell, two triangles per quad.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TerrainMesh {
    pub vertices: Vec<TerrainVertex>,
    pub indices: Vec<u32>,
}

impl TerrainMesh {
    // Build the mesh for `field`, placing vertices with `metrics`.
    // Vertices are row-major (`row * width + col`), so indices address the
    // same cell the height field does. Normals are the normalized sum of the
    // adjacent face normals; a vertex whose faces are all degenerate gets the
    // up vector.
    pub fn from_height_field(field: &HeightField, metrics: &TerrainMetrics) -> Result<Self> {
        let (w, h) = field.dimensions();
        if u32::try_from(w * h).is_err() {
            return Err(TerrainError::MeshTooLarge {
                width: w,
                height: h,
            });
        }

        let mut vertices = Vec::with_capacity(w * h);
        for z in 0..h {
            for x in 0..w {
                vertices.push(TerrainVertex {
                    position: [
                        x as f32 * metrics.world_scale,
                        field.get(x, z),
                        z as f32 * metrics.world_scale,
                    ],
                    tex_coords: [
                        metrics.texture_scale * x as f32 / metrics.terrain_size,
                        metrics.texture_scale * z as f32 / metrics.terrain_size,
                    ],
                    normal: [0.0; 3],
                });
            }
        }

        let quads = (w - 1) * (h - 1);
        let mut indices = Vec::with_capacity(quads * 6);
        let w32 = w as u32;
        for z in 0..h.saturating_sub(1) as u32 {
            for x in 0..w.saturating_sub(1) as u32 {
                let bottom_left = z * w32 + x;
                let top_left = (z + 1) * w32 + x;
                let top_right = (z + 1) * w32 + x + 1;
                let bottom_right = z * w32 + x + 1;
                indices.extend_from_slice(&[
                    bottom_left,
                    top_left,
                    top_right,
                    bottom_left,
                    top_right,
                    bottom_right,
                ]);
            }
        }

        let mut mesh = Self { vertices, indices };
        mesh.compute_normals();
        Ok(mesh)
    }

    fn compute_normals(&mut self) {
        let mut sums = vec![Vec3::ZERO; self.vertices.len()];
        for tri in self.indices.chunks_exact(3) {
            let [i0, i1, i2] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let p0 = Vec3::from_array(self.vertices[i0].position);
            let v1 = Vec3::from_array(self.vertices[i1].position) - p0;
            let v2 = Vec3::from_array(self.vertices[i2].position) - p0;
            let face = v1.cross(v2).normalize_or_zero();
            sums[i0] += face;
            sums[i1] += face;
            sums[i2] += face;
        }

        for (vertex, sum) in self.vertices.iter_mut().zip(sums) {
            vertex.normal = sum.try_normalize().unwrap_or(Vec3::Y).to_array();
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}
