//! Renders the victory celebration: spark fountains and shockwave rings.
//!
//! Every effect is a camera-facing quad shaded in the fragment stage, drawn
//! in one instanced call after the scene pass. The quads depth-test against
//! the scene but never write depth, so sparks overlap each other freely.

use crate::game::GameState;
use crate::game::board::Board;
use crate::renderer::pipeline_builder::{
    BindGroupLayoutBuilder, PipelineBuilder, create_uniform_buffer, create_vertex_2d_layout,
};
use wgpu::{self, util::DeviceExt};

/// Side length of a spark quad in world units.
const SPARK_SIZE: f32 = 0.12;

/// Rings are lifted off their origin so the floor does not swallow the
/// bottom half of the billboard.
const RING_LIFT: f32 = 0.4;

const EFFECT_KIND_SPARK: u32 = 0;
const EFFECT_KIND_RING: u32 = 1;

#[repr(C)]
/// Uniform data for the effects pass.
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct EffectUniforms {
    /// View-projection matrix for the camera.
    view_proj: [[f32; 4]; 4],
    /// Camera right vector used to span billboards (`w` unused).
    camera_right: [f32; 4],
    /// Camera up vector used to span billboards (`w` unused).
    camera_up: [f32; 4],
}

#[repr(C)]
/// One billboard: a spark or a ring.
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct EffectInstance {
    /// xyz: world position of the quad center, w: quad size.
    position_size: [f32; 4],
    /// RGBA color; alpha carries the fade.
    color: [f32; 4],
    /// 0 for sparks, 1 for rings. Selects the fragment mask.
    kind: u32,
}

/// Renderer for the win celebration overlay.
pub struct EffectsRenderer {
    /// The alpha-blended billboard pipeline.
    pub pipeline: wgpu::RenderPipeline,
    /// Vertex buffer with the shared quad corners.
    pub vertex_buffer: wgpu::Buffer,
    /// Per-billboard instance data, rewritten every frame.
    pub instance_buffer: wgpu::Buffer,
    /// Uniform buffer with the camera basis.
    pub uniform_buffer: wgpu::Buffer,
    /// Bind group for the uniforms.
    pub bind_group: wgpu::BindGroup,
    instance_count: u32,
    instance_capacity: usize,
}

impl EffectsRenderer {
    /// Creates a new EffectsRenderer sized for the board's celebration.
    ///
    /// # Arguments
    /// * `device` - The WGPU device
    /// * `surface_config` - The surface configuration for pipeline creation
    /// * `board` - The board, used to size the instance buffer
    ///
    /// # Returns
    /// A new EffectsRenderer instance
    pub fn new(
        device: &wgpu::Device,
        surface_config: &wgpu::SurfaceConfiguration,
        board: &Board,
    ) -> Self {
        let uniforms = EffectUniforms {
            view_proj: [[0.0; 4]; 4],
            camera_right: [0.0; 4],
            camera_up: [0.0; 4],
        };
        let uniform_buffer = create_uniform_buffer(device, &uniforms, "Effect Uniform Buffer");

        let bind_group_layout = BindGroupLayoutBuilder::new(device)
            .with_label("Effect Bind Group Layout")
            .with_uniform_buffer(0, wgpu::ShaderStages::VERTEX)
            .build();

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
            label: Some("Effect Bind Group"),
        });

        // The full particle arena plus one ring, replicated at every origin
        // (each goal and the player).
        let origin_count = board.goals().len() + 1;
        let instance_capacity =
            (crate::game::particles::PARTICLE_CAPACITY + 1) * origin_count;
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Effect Instance Buffer"),
            size: (instance_capacity * std::mem::size_of::<EffectInstance>())
                as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let pipeline = PipelineBuilder::new(device, surface_config.format)
            .with_label("Effects Pipeline")
            .with_shader(include_str!("shaders/effects.wgsl"))
            .with_vertex_buffer(create_vertex_2d_layout())
            .with_vertex_buffer(Self::instance_layout())
            .with_bind_group_layout(&bind_group_layout)
            .with_alpha_blending()
            .with_depth_test(wgpu::CompareFunction::Less)
            .with_depth_read_only()
            .build();

        let vertex_buffer = Self::create_quad_vertices(device);

        Self {
            pipeline,
            vertex_buffer,
            instance_buffer,
            uniform_buffer,
            bind_group,
            instance_count: 0,
            instance_capacity,
        }
    }

    fn instance_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<EffectInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: 16,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: 32,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Uint32,
                },
            ],
        }
    }

    fn create_quad_vertices(device: &wgpu::Device) -> wgpu::Buffer {
        // Unit quad centered on the origin, spanned along the camera basis
        // in the vertex shader.
        let corners: &[f32] = &[
            -0.5, -0.5, 0.5, -0.5, 0.5, 0.5, -0.5, -0.5, 0.5, 0.5, -0.5, 0.5,
        ];

        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Effect Quad Vertex Buffer"),
            contents: bytemuck::cast_slice(corners),
            usage: wgpu::BufferUsages::VERTEX,
        })
    }

    /// Uploads this frame's camera basis and billboard instances.
    pub fn update(&mut self, queue: &wgpu::Queue, game_state: &GameState, aspect_ratio: f32) {
        let right = game_state.camera.right_vector();
        let up = game_state.camera.up_vector();
        let uniforms = EffectUniforms {
            view_proj: game_state.camera.get_view_proj_matrix(aspect_ratio).into(),
            camera_right: [right.x(), right.y(), right.z(), 0.0],
            camera_up: [up.x(), up.y(), up.z(), 0.0],
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));

        let mut instances = build_effect_instances(game_state);
        instances.truncate(self.instance_capacity);
        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }
        self.instance_count = instances.len() as u32;
    }

    /// Draws the billboards. Does nothing while the puzzle is unsolved.
    pub fn render(&self, render_pass: &mut wgpu::RenderPass) {
        if self.instance_count == 0 {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        render_pass.draw(0..6, 0..self.instance_count);
    }
}

/// Builds the billboard list for this frame: every live spark and the ring,
/// repeated at each celebration origin.
fn build_effect_instances(game_state: &GameState) -> Vec<EffectInstance> {
    if !game_state.is_won() {
        return Vec::new();
    }

    let origins = game_state.win_effect_origins();
    let mut instances =
        Vec::with_capacity((game_state.win_particles.alive_count() + 1) * origins.len());

    for origin in &origins {
        for particle in game_state.win_particles.alive() {
            instances.push(EffectInstance {
                position_size: [
                    origin[0] + particle.offset[0],
                    origin[1] + particle.offset[1],
                    origin[2] + particle.offset[2],
                    SPARK_SIZE,
                ],
                color: particle.color,
                kind: EFFECT_KIND_SPARK,
            });
        }

        if game_state.explosion.is_active() {
            instances.push(EffectInstance {
                position_size: [
                    origin[0],
                    origin[1] + RING_LIFT,
                    origin[2],
                    game_state.explosion.radius() * 2.0,
                ],
                color: [1.0, 0.85, 0.4, game_state.explosion.alpha()],
                kind: EFFECT_KIND_RING,
            });
        }
    }

    instances
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::PushDirection;

    fn solve(game: &mut GameState) {
        use PushDirection::*;
        let solution = [
            Left, Left, Left, Down, Down, Right, Right, Up, Left, Left, Down, Right, Right, Up,
            Up, Up, Left, Left,
        ];
        for push in solution {
            game.push_toward(push);
        }
    }

    /// No billboards while the puzzle is unsolved.
    #[test]
    fn test_no_instances_before_win() {
        let game = GameState::new();
        assert!(build_effect_instances(&game).is_empty());
    }

    /// After the win every origin gets the same spark count plus one ring.
    #[test]
    fn test_instances_replicated_per_origin() {
        let mut game = GameState::new();
        solve(&mut game);
        game.update(0.016);
        assert!(game.is_won());

        let instances = build_effect_instances(&game);
        let origins = game.win_effect_origins().len();
        let sparks = game.win_particles.alive_count();
        assert!(sparks > 0, "winning frame spawns sparks");
        assert_eq!(
            instances.len(),
            (sparks + 1) * origins,
            "each origin shows all sparks and one ring"
        );

        let rings = instances
            .iter()
            .filter(|instance| instance.kind == EFFECT_KIND_RING)
            .count();
        assert_eq!(rings, origins);
    }

    /// Ring size tracks the explosion radius as it expands.
    #[test]
    fn test_ring_grows_with_explosion() {
        let mut game = GameState::new();
        solve(&mut game);
        game.update(0.016);
        let early_radius = game.explosion.radius();

        game.update(0.4);
        let later = build_effect_instances(&game);
        let ring = later
            .iter()
            .find(|instance| instance.kind == EFFECT_KIND_RING)
            .expect("ring active after win");
        assert!(
            ring.position_size[3] > early_radius * 2.0,
            "ring billboard should have expanded"
        );
    }
}
