//! WGPU-based renderer for the Sokoban game.
//!
//! This module provides [`WgpuRenderer`], which manages the surface, device, queue, and the
//! per-pass renderers for the scene. Each frame it records a depth-only shadow pass from the
//! light's point of view, then draws the shadowed board, the sky backdrop, the win
//! celebration effects, and finally the text overlay.
//!
//! # Features
//! - Instanced rendering of the board, boxes, and player with a shared cube mesh
//! - Shadow mapping with one light-space matrix shared by the shadow and lit passes
//! - Procedural gradient sky and billboarded celebration particles
//! - Depth buffering that tracks surface resizes
//!
//! # Usage
//! Create a [`WgpuRenderer`] via [`WgpuRenderer::new`] and call [`WgpuRenderer::update_canvas`]
//! each frame to render the current game state.

use crate::game::GameState;
use crate::game::board::Board;
use crate::renderer::effects::EffectsRenderer;
use crate::renderer::scene::SceneRenderer;
use crate::renderer::sky::SkyRenderer;
use crate::renderer::text::TextRenderer;
use wgpu::{SurfaceTexture, TextureView};

/// Main WGPU renderer for the Sokoban game.
///
/// This struct manages all GPU resources, pipelines, and rendering logic for the game scene,
/// including the shadowed board, the sky backdrop, the win effects, and the text overlay.
pub struct WgpuRenderer {
    /// The WGPU surface for presenting rendered frames.
    pub surface: wgpu::Surface<'static>,
    /// The surface configuration (format, size, etc.).
    pub surface_config: wgpu::SurfaceConfiguration,
    /// The WGPU device for resource creation.
    pub device: wgpu::Device,
    /// The WGPU queue for submitting commands.
    pub queue: wgpu::Queue,
    /// Renderer for the board, boxes, and player, including the shadow pass.
    pub scene_renderer: SceneRenderer,
    /// Renderer for the procedural sky backdrop.
    pub sky_renderer: SkyRenderer,
    /// Renderer for the win celebration particles and shockwave rings.
    pub effects_renderer: EffectsRenderer,
    /// Depth buffer for the scene, recreated whenever the surface size changes.
    pub depth_texture: Option<wgpu::Texture>,
}

impl WgpuRenderer {
    /// Initializes a new [`WgpuRenderer`] and all associated GPU resources.
    ///
    /// The board is needed up front to size the instance buffers for the scene
    /// and effects renderers.
    pub async fn new(
        instance: &wgpu::Instance,
        surface: wgpu::Surface<'static>,
        width: u32,
        height: u32,
        board: &Board,
    ) -> Self {
        let adapter = Self::create_adapter(instance, &surface).await;
        let (device, queue) = Self::create_device(&adapter).await;
        let surface_config = Self::create_surface_config(&surface, &adapter, width, height);

        surface.configure(&device, &surface_config);

        let scene_renderer = SceneRenderer::new(&device, &queue, &surface_config, board);
        let sky_renderer = SkyRenderer::new(&device, &surface_config);
        let effects_renderer = EffectsRenderer::new(&device, &surface_config, board);

        Self {
            surface,
            surface_config,
            device,
            queue,
            scene_renderer,
            sky_renderer,
            effects_renderer,
            depth_texture: None,
        }
    }

    /// Renders the current frame to the surface.
    ///
    /// Records the shadow pass, the lit scene pass, the sky pass, the effects pass,
    /// and the text pass into `encoder`, in that order. The sky runs before the
    /// effects so that alpha-blended particles composite over it; neither writes
    /// depth. Returns the acquired surface texture for the caller to present
    /// after submitting the encoder.
    pub fn update_canvas(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        game_state: &GameState,
        text_renderer: &mut TextRenderer,
    ) -> Result<SurfaceTexture, String> {
        let (surface_texture, surface_view) = self.get_surface_texture_and_view()?;
        let depth_texture_view = self.update_depth_texture();
        let aspect = self.surface_config.width as f32 / self.surface_config.height as f32;

        self.scene_renderer.update(&self.queue, game_state, aspect);
        self.sky_renderer.update(&self.queue, game_state, aspect);
        self.effects_renderer.update(&self.queue, game_state, aspect);

        self.scene_renderer.render_shadow_pass(encoder);
        self.render_scene(encoder, &surface_view, &depth_texture_view);
        self.render_sky(encoder, &surface_view, &depth_texture_view);
        self.render_effects(encoder, &surface_view, &depth_texture_view);
        self.render_text(encoder, &surface_view, text_renderer);

        Ok(surface_texture)
    }

    // Private helper methods

    async fn create_adapter(
        instance: &wgpu::Instance,
        surface: &wgpu::Surface<'static>,
    ) -> wgpu::Adapter {
        instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                force_fallback_adapter: false,
                compatible_surface: Some(surface),
            })
            .await
            .expect("Failed to find an appropriate adapter")
    }

    async fn create_device(adapter: &wgpu::Adapter) -> (wgpu::Device, wgpu::Queue) {
        adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    required_limits: Default::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await
            .expect("Failed to create device")
    }

    fn create_surface_config(
        surface: &wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> wgpu::SurfaceConfiguration {
        let capabilities = surface.get_capabilities(adapter);
        let format = capabilities
            .formats
            .iter()
            .find(|&&f| f == wgpu::TextureFormat::Bgra8UnormSrgb)
            .copied()
            .expect("Failed to select proper surface texture format");

        wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            desired_maximum_frame_latency: 0,
            alpha_mode: capabilities.alpha_modes[0],
            view_formats: vec![],
        }
    }

    fn get_surface_texture_and_view(&self) -> Result<(SurfaceTexture, TextureView), String> {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Outdated) => {
                return Err("WGPU surface outdated".to_string());
            }
            Err(_) => {
                return Err("Failed to acquire next swap chain texture".to_string());
            }
        };

        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        Ok((surface_texture, surface_view))
    }

    fn update_depth_texture(&mut self) -> TextureView {
        let (width, height) = (self.surface_config.width, self.surface_config.height);
        if self.depth_texture.is_none()
            || self.depth_texture.as_ref().unwrap().width() != width
            || self.depth_texture.as_ref().unwrap().height() != height
        {
            if let Some(depth_texture) = self.depth_texture.take() {
                // Manually drop the texture to free up resources
                drop(depth_texture);
            }

            self.depth_texture = Some(self.device.create_texture(&wgpu::TextureDescriptor {
                label: Some("Depth Texture"),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Depth32Float,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            }));
        }
        self.depth_texture
            .as_ref()
            .unwrap()
            .create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn render_scene(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        surface_view: &TextureView,
        depth_texture_view: &TextureView,
    ) {
        let mut scene_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: surface_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: 0.1,
                        g: 0.1,
                        b: 0.1,
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_texture_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        self.scene_renderer.render(&mut scene_pass);
    }

    fn render_sky(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        surface_view: &TextureView,
        depth_texture_view: &TextureView,
    ) {
        let mut sky_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Sky Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: surface_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_texture_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        self.sky_renderer.render(&mut sky_pass);
    }

    fn render_effects(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        surface_view: &TextureView,
        depth_texture_view: &TextureView,
    ) {
        let mut effects_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Effects Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: surface_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_texture_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        self.effects_renderer.render(&mut effects_pass);
    }

    fn render_text(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        surface_view: &TextureView,
        text_renderer: &mut TextRenderer,
    ) {
        self.prepare_text_renderer(text_renderer);

        let mut text_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Text Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: surface_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if let Err(e) = text_renderer.render(&mut text_pass) {
            println!("Text render failed: {:?}", e);
        }
    }

    fn prepare_text_renderer(&self, text_renderer: &mut TextRenderer) {
        text_renderer.resize(
            &self.queue,
            glyphon::Resolution {
                width: self.surface_config.width,
                height: self.surface_config.height,
            },
        );

        if let Err(e) = text_renderer.prepare(&self.device, &self.queue, &self.surface_config) {
            println!("Failed to prepare text renderer: {:?}", e);
        }
    }
}
