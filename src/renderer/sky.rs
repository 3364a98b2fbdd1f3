//! Renders the sky behind the board.
//!
//! A fullscreen quad drawn at the far plane after the scene, so it only
//! touches pixels nothing else covered. The fragment shader reconstructs the
//! view ray from the camera basis and shades a gradient with a glow around
//! the scene light's direction.

use crate::game::GameState;
use crate::math::deg_to_rad;
use crate::math::vec::Vec3;
use crate::renderer::pipeline_builder::{
    BindGroupLayoutBuilder, PipelineBuilder, create_fullscreen_vertices, create_uniform_buffer,
    create_vertex_2d_layout,
};
use crate::renderer::scene::LIGHT_POSITION;

#[repr(C)]
/// Uniform data for sky rendering.
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct SkyUniforms {
    /// Camera forward vector; `w` holds tan(fov / 2).
    forward: [f32; 4],
    /// Camera right vector; `w` holds the aspect ratio.
    right: [f32; 4],
    /// Camera up vector (`w` unused).
    up: [f32; 4],
    /// Direction toward the sun (`w` unused).
    sun_direction: [f32; 4],
}

/// Renderer for the fullscreen sky pass.
pub struct SkyRenderer {
    /// The render pipeline for the sky.
    pub pipeline: wgpu::RenderPipeline,
    /// Vertex buffer containing the fullscreen quad geometry.
    pub vertex_buffer: wgpu::Buffer,
    /// Uniform buffer with the camera basis and sun direction.
    pub uniform_buffer: wgpu::Buffer,
    /// Bind group for the uniforms.
    pub bind_group: wgpu::BindGroup,
}

impl SkyRenderer {
    /// Creates a new SkyRenderer with initialized pipeline and resources.
    ///
    /// # Arguments
    /// * `device` - The WGPU device
    /// * `surface_config` - The surface configuration for pipeline creation
    ///
    /// # Returns
    /// A new SkyRenderer instance
    pub fn new(device: &wgpu::Device, surface_config: &wgpu::SurfaceConfiguration) -> Self {
        let uniforms = SkyUniforms {
            forward: [0.0; 4],
            right: [0.0; 4],
            up: [0.0; 4],
            sun_direction: [0.0; 4],
        };
        let uniform_buffer = create_uniform_buffer(device, &uniforms, "Sky Uniform Buffer");

        let bind_group_layout = BindGroupLayoutBuilder::new(device)
            .with_label("Sky Bind Group Layout")
            .with_uniform_buffer(0, wgpu::ShaderStages::FRAGMENT)
            .build();

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
            label: Some("Sky Bind Group"),
        });

        // The quad sits exactly on the far plane; LessEqual lets it pass the
        // depth test only where the clear value survived.
        let pipeline = PipelineBuilder::new(device, surface_config.format)
            .with_label("Sky Pipeline")
            .with_shader(include_str!("shaders/sky.wgsl"))
            .with_vertex_buffer(create_vertex_2d_layout())
            .with_bind_group_layout(&bind_group_layout)
            .with_depth_test(wgpu::CompareFunction::LessEqual)
            .with_depth_read_only()
            .with_no_culling()
            .build();

        let vertex_buffer = create_fullscreen_vertices(device);

        Self {
            pipeline,
            vertex_buffer,
            uniform_buffer,
            bind_group,
        }
    }

    /// Uploads the camera basis and sun direction for this frame.
    pub fn update(&mut self, queue: &wgpu::Queue, game_state: &GameState, aspect_ratio: f32) {
        let forward = game_state.camera.forward_vector();
        let right = game_state.camera.right_vector();
        let up = game_state.camera.up_vector();
        let tan_half_fov = deg_to_rad(game_state.camera.fov / 2.0).tan();
        let sun = Vec3::from(LIGHT_POSITION).normalize();

        let uniforms = SkyUniforms {
            forward: [forward.x(), forward.y(), forward.z(), tan_half_fov],
            right: [right.x(), right.y(), right.z(), aspect_ratio],
            up: [up.x(), up.y(), up.z(), 0.0],
            sun_direction: [sun.x(), sun.y(), sun.z(), 0.0],
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));
    }

    /// Draws the sky. Must run after the scene pass so depth is final.
    pub fn render(&self, render_pass: &mut wgpu::RenderPass) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.draw(0..6, 0..1);
    }
}
