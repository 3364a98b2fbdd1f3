//! Renders the board scene: textured floors, walls, crates, and the player.
//!
//! The scene is drawn twice per frame with shared vertex and instance
//! buffers. The first pass renders depth from the light's point of view into
//! the shadow map; the second renders the lit scene from the camera, sampling
//! that shadow map. Both passes read the same light-space matrix, computed
//! once per frame in [`SceneRenderer::update`].

use crate::assets;
use crate::game::GameState;
use crate::game::board::{Board, Cell, Tile};
use crate::game::player::Player;
use crate::math::mat::Mat4;
use crate::math::vec::Vec3;
use crate::renderer::pipeline_builder::{BindGroupLayoutBuilder, PipelineBuilder};
use crate::renderer::primitives::{
    SceneInstance, SceneUniforms, ShadowUniforms, Vertex, create_cube_indices,
    create_cube_vertices,
};
use crate::renderer::texture::{
    create_shadow_sampler, create_solid_texture, create_texture_sampler, load_texture_from_data,
};
use std::ops::Range;
use wgpu::{self, util::DeviceExt};

/// World-space position of the light the shadow map is rendered from.
pub const LIGHT_POSITION: [f32; 3] = [-2.0, 7.0, 2.0];

/// Resolution of the square shadow map.
pub const SHADOW_MAP_SIZE: u32 = 1024;

// Orthographic light frustum. Wide enough to cover the whole board with
// margin on every side.
const LIGHT_FRUSTUM_EXTENT: f32 = 10.0;
const LIGHT_NEAR: f32 = 1.0;
const LIGHT_FAR: f32 = 15.0;

const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const PLAYER_TINT: [f32; 4] = [0.9, 0.3, 0.2, 1.0];

// Material indices. The first five follow the order of
// [`assets::board_textures`]; the last is the white texture the tinted
// player cube samples.
const MATERIAL_GRASS: usize = 0;
const MATERIAL_DIRT: usize = 1;
const MATERIAL_WALL: usize = 2;
const MATERIAL_BOX: usize = 3;
const MATERIAL_GOAL: usize = 4;
const MATERIAL_PLAYER: usize = 5;
const MATERIAL_COUNT: usize = 6;

/// A contiguous run of instances sharing one material bind group.
struct MaterialBatch {
    material: usize,
    instances: Range<u32>,
}

/// Renderer for the shadowed, textured board scene.
pub struct SceneRenderer {
    /// Pipeline for the lit color pass.
    pub scene_pipeline: wgpu::RenderPipeline,
    /// Depth-only pipeline for the shadow map pass.
    pub shadow_pipeline: wgpu::RenderPipeline,
    /// Vertex buffer holding the shared unit cube mesh.
    pub vertex_buffer: wgpu::Buffer,
    /// Index buffer for the cube mesh.
    pub index_buffer: wgpu::Buffer,
    /// Per-instance model matrices and tints, rewritten every frame.
    pub instance_buffer: wgpu::Buffer,
    /// Uniform buffer for the lit pass.
    pub scene_uniform_buffer: wgpu::Buffer,
    /// Uniform buffer for the shadow pass.
    pub shadow_uniform_buffer: wgpu::Buffer,
    /// Bind group with the scene uniforms, shadow map, and comparison sampler.
    pub frame_bind_group: wgpu::BindGroup,
    /// Bind group with the shadow pass uniforms.
    pub shadow_bind_group: wgpu::BindGroup,
    /// One bind group per material texture, indexed by material constant.
    pub material_bind_groups: Vec<wgpu::BindGroup>,
    /// Depth view rendered by the shadow pass and sampled by the lit pass.
    pub shadow_map_view: wgpu::TextureView,
    index_count: u32,
    instance_count: u32,
    batches: Vec<MaterialBatch>,
}

impl SceneRenderer {
    /// Creates a new SceneRenderer with both pipelines and all GPU resources.
    ///
    /// # Arguments
    /// * `device` - The WGPU device
    /// * `queue` - The WGPU queue for texture uploads
    /// * `surface_config` - The surface configuration for pipeline creation
    /// * `board` - The board, used to size the instance buffer
    ///
    /// # Returns
    /// A new SceneRenderer instance
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_config: &wgpu::SurfaceConfiguration,
        board: &Board,
    ) -> Self {
        // Shadow map target, sampled by the lit pass
        let shadow_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Shadow Map Texture"),
            size: wgpu::Extent3d {
                width: SHADOW_MAP_SIZE,
                height: SHADOW_MAP_SIZE,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let shadow_map_view = shadow_texture.create_view(&wgpu::TextureViewDescriptor::default());

        // Material textures, in the order of the material index constants
        let material_sampler = create_texture_sampler(device);
        let mut material_views = Vec::with_capacity(MATERIAL_COUNT);
        for (name, data) in assets::board_textures() {
            let view = load_texture_from_data(device, queue, data, name)
                .expect("Failed to decode embedded board texture");
            material_views.push(view);
        }
        material_views.push(create_solid_texture(
            device,
            queue,
            [255, 255, 255, 255],
            "player",
        ));

        let scene_uniform_buffer = SceneUniforms::new().create_buffer(device);
        let shadow_uniform_buffer = ShadowUniforms::new().create_buffer(device);

        let frame_layout = BindGroupLayoutBuilder::new(device)
            .with_label("Scene Frame Bind Group Layout")
            .with_uniform_buffer(0, wgpu::ShaderStages::VERTEX_FRAGMENT)
            .with_depth_texture(1, wgpu::ShaderStages::FRAGMENT)
            .with_comparison_sampler(2, wgpu::ShaderStages::FRAGMENT)
            .build();

        let material_layout = BindGroupLayoutBuilder::new(device)
            .with_label("Material Bind Group Layout")
            .with_texture(0, wgpu::ShaderStages::FRAGMENT)
            .with_sampler(1, wgpu::ShaderStages::FRAGMENT)
            .build();

        let shadow_layout = BindGroupLayoutBuilder::new(device)
            .with_label("Shadow Bind Group Layout")
            .with_uniform_buffer(0, wgpu::ShaderStages::VERTEX)
            .build();

        let shadow_sampler = create_shadow_sampler(device);
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &frame_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: scene_uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&shadow_map_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&shadow_sampler),
                },
            ],
            label: Some("Scene Frame Bind Group"),
        });

        let shadow_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &shadow_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: shadow_uniform_buffer.as_entire_binding(),
            }],
            label: Some("Shadow Bind Group"),
        });

        let material_bind_groups = material_views
            .iter()
            .map(|view| {
                device.create_bind_group(&wgpu::BindGroupDescriptor {
                    layout: &material_layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: wgpu::BindingResource::TextureView(view),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::Sampler(&material_sampler),
                        },
                    ],
                    label: Some("Material Bind Group"),
                })
            })
            .collect();

        // Shared cube mesh
        let cube_vertices = create_cube_vertices();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Vertex Buffer"),
            contents: bytemuck::cast_slice(&cube_vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let cube_indices = create_cube_indices();
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Index Buffer"),
            contents: bytemuck::cast_slice(&cube_indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        // One instance per tile, one per crate, one for the player
        let instance_capacity = board.width() * board.height() + board.boxes().len() + 1;
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Scene Instance Buffer"),
            size: (instance_capacity * std::mem::size_of::<SceneInstance>())
                as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let scene_pipeline = PipelineBuilder::new(device, surface_config.format)
            .with_label("Scene Pipeline")
            .with_shader(include_str!("shaders/scene.wgsl"))
            .with_vertex_buffer(Vertex::desc())
            .with_vertex_buffer(SceneInstance::desc())
            .with_bind_group_layout(&frame_layout)
            .with_bind_group_layout(&material_layout)
            .with_depth_test(wgpu::CompareFunction::Less)
            .build();

        let shadow_pipeline = PipelineBuilder::new(device, surface_config.format)
            .with_label("Shadow Pipeline")
            .with_shader(include_str!("shaders/shadow.wgsl"))
            .with_vertex_buffer(Vertex::desc())
            .with_vertex_buffer(SceneInstance::desc())
            .with_bind_group_layout(&shadow_layout)
            .with_depth_test(wgpu::CompareFunction::Less)
            .build_depth_only();

        Self {
            scene_pipeline,
            shadow_pipeline,
            vertex_buffer,
            index_buffer,
            instance_buffer,
            scene_uniform_buffer,
            shadow_uniform_buffer,
            frame_bind_group,
            shadow_bind_group,
            material_bind_groups,
            shadow_map_view,
            index_count: cube_indices.len() as u32,
            instance_count: 0,
            batches: Vec::new(),
        }
    }

    /// Uploads this frame's uniforms and instance data.
    ///
    /// The light-space matrix is computed exactly once here and written to
    /// both uniform buffers, so the shadow pass and the lit pass always agree
    /// on where shadows fall.
    pub fn update(&mut self, queue: &wgpu::Queue, game_state: &GameState, aspect_ratio: f32) {
        let light_pos = Vec3::from(LIGHT_POSITION);
        let light_view = Mat4::look_at(
            light_pos,
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        );
        let light_space = Mat4::ortho(
            -LIGHT_FRUSTUM_EXTENT,
            LIGHT_FRUSTUM_EXTENT,
            -LIGHT_FRUSTUM_EXTENT,
            LIGHT_FRUSTUM_EXTENT,
            LIGHT_NEAR,
            LIGHT_FAR,
        )
        .multiply(&light_view);

        let camera_pos = game_state.camera.position;
        let scene_uniforms = SceneUniforms {
            view_proj: game_state.camera.get_view_proj_matrix(aspect_ratio).into(),
            light_space: light_space.into(),
            light_pos: [LIGHT_POSITION[0], LIGHT_POSITION[1], LIGHT_POSITION[2], 1.0],
            camera_pos: [camera_pos[0], camera_pos[1], camera_pos[2], 1.0],
        };
        queue.write_buffer(&self.scene_uniform_buffer, 0, scene_uniforms.as_bytes());

        let shadow_uniforms = ShadowUniforms {
            light_space: light_space.into(),
        };
        queue.write_buffer(&self.shadow_uniform_buffer, 0, shadow_uniforms.as_bytes());

        let (instances, batches) = build_instances(&game_state.board, &game_state.player);
        queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        self.instance_count = instances.len() as u32;
        self.batches = batches;
    }

    /// Records the shadow map pass: scene depth from the light's point of view.
    ///
    /// Must run before the lit pass in the same frame so the lit pass samples
    /// this frame's depth.
    pub fn render_shadow_pass(&self, encoder: &mut wgpu::CommandEncoder) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Shadow Pass"),
            color_attachments: &[],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.shadow_map_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        render_pass.set_pipeline(&self.shadow_pipeline);
        render_pass.set_bind_group(0, &self.shadow_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        // Every instance casts a shadow; materials are irrelevant here.
        render_pass.draw_indexed(0..self.index_count, 0, 0..self.instance_count);
    }

    /// Draws the lit scene, one batch per material.
    pub fn render(&self, render_pass: &mut wgpu::RenderPass) {
        render_pass.set_pipeline(&self.scene_pipeline);
        render_pass.set_bind_group(0, &self.frame_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);

        for batch in &self.batches {
            render_pass.set_bind_group(1, &self.material_bind_groups[batch.material], &[]);
            render_pass.draw_indexed(0..self.index_count, 0, batch.instances.clone());
        }
    }
}

/// Builds this frame's instance list from the board and player, grouped into
/// contiguous per-material batches.
fn build_instances(board: &Board, player: &Player) -> (Vec<SceneInstance>, Vec<MaterialBatch>) {
    let mut buckets: [Vec<SceneInstance>; MATERIAL_COUNT] = std::array::from_fn(|_| Vec::new());

    for z in 0..board.height() as i32 {
        for x in 0..board.width() as i32 {
            let cell = Cell::new(x, z);
            let (wx, wz) = board.cell_to_world(cell);
            match board.tile(cell) {
                // Walls rise one unit above the floor plane.
                Tile::Wall => buckets[MATERIAL_WALL].push(SceneInstance {
                    model: Mat4::translation(wx, 0.0, wz)
                        .multiply(&Mat4::scaling(1.0, 2.0, 1.0))
                        .into(),
                    color: WHITE,
                }),
                Tile::Grass => buckets[MATERIAL_GRASS].push(floor_instance(wx, wz)),
                Tile::Dirt => buckets[MATERIAL_DIRT].push(floor_instance(wx, wz)),
                Tile::Goal => buckets[MATERIAL_GOAL].push(floor_instance(wx, wz)),
            }
        }
    }

    for &box_cell in board.boxes() {
        let (wx, wz) = board.cell_to_world(box_cell);
        buckets[MATERIAL_BOX].push(SceneInstance {
            model: Mat4::translation(wx, 0.5, wz).into(),
            color: WHITE,
        });
    }

    buckets[MATERIAL_PLAYER].push(SceneInstance {
        model: player.model_matrix().into(),
        color: PLAYER_TINT,
    });

    let mut instances = Vec::new();
    let mut batches = Vec::new();
    for (material, bucket) in buckets.into_iter().enumerate() {
        if bucket.is_empty() {
            continue;
        }
        let start = instances.len() as u32;
        instances.extend(bucket);
        batches.push(MaterialBatch {
            material,
            instances: start..instances.len() as u32,
        });
    }
    (instances, batches)
}

/// Floor cubes sit with their top face on the y = 0 plane.
fn floor_instance(wx: f32, wz: f32) -> SceneInstance {
    SceneInstance {
        model: Mat4::translation(wx, -0.5, wz).into(),
        color: WHITE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The instance list should cover every tile, every crate, and the player.
    #[test]
    fn test_instances_cover_board() {
        let board = Board::new();
        let player = Player::new(&board);
        let (instances, _) = build_instances(&board, &player);

        let expected = board.width() * board.height() + board.boxes().len() + 1;
        assert_eq!(
            instances.len(),
            expected,
            "One instance per tile, per crate, and the player"
        );
    }

    /// Batches must tile the instance list exactly, in order, so each draw
    /// call renders its own instances and nothing else.
    #[test]
    fn test_batches_are_contiguous() {
        let board = Board::new();
        let player = Player::new(&board);
        let (instances, batches) = build_instances(&board, &player);

        let mut next = 0u32;
        for batch in &batches {
            assert_eq!(
                batch.instances.start, next,
                "Batch for material {} should start where the last one ended",
                batch.material
            );
            assert!(
                batch.instances.end > batch.instances.start,
                "Empty batches should have been skipped"
            );
            next = batch.instances.end;
        }
        assert_eq!(
            next,
            instances.len() as u32,
            "Batches should cover the whole instance list"
        );
    }

    /// The player is always the last batch, tinted rather than textured.
    #[test]
    fn test_player_batch_is_last() {
        let board = Board::new();
        let player = Player::new(&board);
        let (instances, batches) = build_instances(&board, &player);

        let last = batches.last().unwrap();
        assert_eq!(last.material, MATERIAL_PLAYER);
        assert_eq!(
            last.instances.end - last.instances.start,
            1,
            "Exactly one player instance"
        );
        let player_instance = &instances[last.instances.start as usize];
        assert_eq!(player_instance.color, PLAYER_TINT);
    }

    /// Goal tiles get their own material so the marker texture shows.
    #[test]
    fn test_goal_tiles_batched_separately() {
        let board = Board::new();
        let player = Player::new(&board);
        let (_, batches) = build_instances(&board, &player);

        let goal_batch = batches
            .iter()
            .find(|batch| batch.material == MATERIAL_GOAL)
            .expect("Shipped level has goal tiles");
        assert_eq!(
            (goal_batch.instances.end - goal_batch.instances.start) as usize,
            board.goals().len(),
        );
    }
}
