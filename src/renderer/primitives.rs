//! GPU-facing geometry and uniform layouts shared by the scene passes.
//!
//! This module defines the [`Vertex`] format used by every lit mesh, the
//! per-draw [`SceneInstance`] data, the uniform blocks uploaded once per frame,
//! and the unit cube mesh that floors, walls, crates, and the player are all
//! instanced from.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

/// A single mesh vertex: position, outward normal, and texture coordinates.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    /// Position in model space.
    pub position: [f32; 3],
    /// Outward-facing unit normal in model space.
    pub normal: [f32; 3],
    /// Texture coordinates, with `v` increasing downward.
    pub uv: [f32; 2],
}

impl Vertex {
    /// Returns the vertex buffer layout for [`Vertex`].
    ///
    /// Attributes occupy shader locations 0 through 2.
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Per-instance data for one cube in the scene: its model matrix and a tint.
///
/// Textured surfaces use a white tint so the texture shows through unchanged;
/// the player cube pairs a flat color with a plain white texture.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SceneInstance {
    /// Model matrix rows, stored in the same order the CPU-side matrices keep them.
    pub model: [[f32; 4]; 4],
    /// RGBA tint multiplied into the sampled texture color.
    pub color: [f32; 4],
}

impl SceneInstance {
    /// Returns the instance buffer layout for [`SceneInstance`].
    ///
    /// The model matrix occupies shader locations 3 through 6 (one `vec4` per
    /// row) and the tint occupies location 7.
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SceneInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: 16,
                    shader_location: 4,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: 32,
                    shader_location: 5,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: 48,
                    shader_location: 6,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: 64,
                    shader_location: 7,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Per-frame uniforms shared by every lit draw call.
///
/// The light-space matrix here is the same one the shadow pass renders with,
/// so depth comparisons in the lighting shader line up with the shadow map.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SceneUniforms {
    /// Combined view-projection matrix for the camera.
    pub view_proj: [[f32; 4]; 4],
    /// Combined light projection-view matrix used for shadow lookups.
    pub light_space: [[f32; 4]; 4],
    /// World-space light position (`w` unused).
    pub light_pos: [f32; 4],
    /// World-space camera position for the specular term (`w` unused).
    pub camera_pos: [f32; 4],
}

impl Default for SceneUniforms {
    /// Returns a new [`SceneUniforms`] with all elements set to zero.
    fn default() -> Self {
        Self::new()
    }
}

impl SceneUniforms {
    /// Creates a new [`SceneUniforms`] with all elements set to zero.
    ///
    /// Real values are written every frame before the passes run.
    pub fn new() -> Self {
        Self {
            view_proj: [[0.0; 4]; 4],
            light_space: [[0.0; 4]; 4],
            light_pos: [0.0; 4],
            camera_pos: [0.0; 4],
        }
    }

    /// Returns the raw bytes of the uniform struct for uploading to the GPU.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    /// Creates a GPU buffer containing the uniform data.
    ///
    /// # Arguments
    /// * `device` - The wgpu device to create the buffer with.
    ///
    /// # Returns
    /// A [`wgpu::Buffer`] with the uniform data, ready for use as a uniform buffer.
    pub fn create_buffer(&self, device: &wgpu::Device) -> wgpu::Buffer {
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene Uniform Buffer"),
            contents: self.as_bytes(),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        })
    }
}

/// Uniforms for the depth-only shadow pass.
///
/// Holds only the light projection-view matrix; instance data carries the
/// model transforms.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ShadowUniforms {
    /// Combined light projection-view matrix.
    pub light_space: [[f32; 4]; 4],
}

impl Default for ShadowUniforms {
    /// Returns a new [`ShadowUniforms`] with all elements set to zero.
    fn default() -> Self {
        Self::new()
    }
}

impl ShadowUniforms {
    /// Creates a new [`ShadowUniforms`] with all elements set to zero.
    pub fn new() -> Self {
        Self {
            light_space: [[0.0; 4]; 4],
        }
    }

    /// Returns the raw bytes of the uniform struct for uploading to the GPU.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    /// Creates a GPU buffer containing the uniform data.
    pub fn create_buffer(&self, device: &wgpu::Device) -> wgpu::Buffer {
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Shadow Uniform Buffer"),
            contents: self.as_bytes(),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        })
    }
}

/// Generates the vertices of a unit cube centered at the origin.
///
/// Each face carries its own four vertices so normals and texture coordinates
/// stay flat across the face. Triangles wind counter-clockwise when viewed
/// from outside the cube.
///
/// # Returns
/// A vector of 24 [`Vertex`] values, four per face.
pub fn create_cube_vertices() -> Vec<Vertex> {
    let face_uvs: [[f32; 2]; 4] = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];
    let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
        // Right (+X)
        (
            [1.0, 0.0, 0.0],
            [
                [0.5, -0.5, 0.5],
                [0.5, -0.5, -0.5],
                [0.5, 0.5, -0.5],
                [0.5, 0.5, 0.5],
            ],
        ),
        // Left (-X)
        (
            [-1.0, 0.0, 0.0],
            [
                [-0.5, -0.5, -0.5],
                [-0.5, -0.5, 0.5],
                [-0.5, 0.5, 0.5],
                [-0.5, 0.5, -0.5],
            ],
        ),
        // Top (+Y)
        (
            [0.0, 1.0, 0.0],
            [
                [-0.5, 0.5, 0.5],
                [0.5, 0.5, 0.5],
                [0.5, 0.5, -0.5],
                [-0.5, 0.5, -0.5],
            ],
        ),
        // Bottom (-Y)
        (
            [0.0, -1.0, 0.0],
            [
                [-0.5, -0.5, -0.5],
                [0.5, -0.5, -0.5],
                [0.5, -0.5, 0.5],
                [-0.5, -0.5, 0.5],
            ],
        ),
        // Front (+Z)
        (
            [0.0, 0.0, 1.0],
            [
                [-0.5, -0.5, 0.5],
                [0.5, -0.5, 0.5],
                [0.5, 0.5, 0.5],
                [-0.5, 0.5, 0.5],
            ],
        ),
        // Back (-Z)
        (
            [0.0, 0.0, -1.0],
            [
                [0.5, -0.5, -0.5],
                [-0.5, -0.5, -0.5],
                [-0.5, 0.5, -0.5],
                [0.5, 0.5, -0.5],
            ],
        ),
    ];

    let mut vertices = Vec::with_capacity(24);
    for (normal, corners) in faces.iter() {
        for (corner, uv) in corners.iter().zip(face_uvs.iter()) {
            vertices.push(Vertex {
                position: *corner,
                normal: *normal,
                uv: *uv,
            });
        }
    }
    vertices
}

/// Generates the index list pairing with [`create_cube_vertices`].
///
/// # Returns
/// A vector of 36 indices, two triangles per face.
pub fn create_cube_indices() -> Vec<u16> {
    let mut indices = Vec::with_capacity(36);
    for face in 0..6u16 {
        let base = face * 4;
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every cube triangle should wind counter-clockwise seen from outside,
    /// meaning the cross product of its edges points along the stored normal.
    #[test]
    fn test_cube_winding_matches_normals() {
        let vertices = create_cube_vertices();
        let indices = create_cube_indices();
        assert_eq!(vertices.len(), 24, "Cube should have 4 vertices per face");
        assert_eq!(indices.len(), 36, "Cube should have 2 triangles per face");

        for triangle in indices.chunks(3) {
            let a = vertices[triangle[0] as usize];
            let b = vertices[triangle[1] as usize];
            let c = vertices[triangle[2] as usize];
            let e1 = [
                b.position[0] - a.position[0],
                b.position[1] - a.position[1],
                b.position[2] - a.position[2],
            ];
            let e2 = [
                c.position[0] - a.position[0],
                c.position[1] - a.position[1],
                c.position[2] - a.position[2],
            ];
            let cross = [
                e1[1] * e2[2] - e1[2] * e2[1],
                e1[2] * e2[0] - e1[0] * e2[2],
                e1[0] * e2[1] - e1[1] * e2[0],
            ];
            let dot = cross[0] * a.normal[0] + cross[1] * a.normal[1] + cross[2] * a.normal[2];
            assert!(
                dot > 0.0,
                "Triangle {:?} winds against its normal {:?}",
                triangle,
                a.normal
            );
        }
    }

    /// All cube corners should sit on the surface of a unit cube.
    #[test]
    fn test_cube_is_unit_sized() {
        for vertex in create_cube_vertices() {
            for coordinate in vertex.position {
                assert!(
                    (coordinate.abs() - 0.5).abs() < f32::EPSILON,
                    "Corner coordinate {} should be +/-0.5",
                    coordinate
                );
            }
        }
    }

    /// The GPU-side structs must stay tightly packed for the buffer layouts
    /// to line up with the shader declarations.
    #[test]
    fn test_gpu_struct_sizes() {
        assert_eq!(
            std::mem::size_of::<Vertex>(),
            32,
            "Vertex should pack position, normal, and uv with no padding"
        );
        assert_eq!(
            std::mem::size_of::<SceneInstance>(),
            80,
            "SceneInstance should be a 4x4 matrix plus an RGBA color"
        );
        assert_eq!(
            std::mem::size_of::<SceneUniforms>(),
            160,
            "SceneUniforms should be two matrices plus the light and camera positions"
        );
    }
}
