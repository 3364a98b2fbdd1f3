//! AppState module for the Sokoban game.
//!
//! This module defines the [`AppState`] struct, which holds all state required for a running
//! game session, including the renderer, game logic, text overlay, and input state.

use crate::game::{GameState, keys::KeyState};
use crate::renderer::text::TextRenderer;
use crate::renderer::wgpu_lib::WgpuRenderer;
use wgpu;
use winit::window::Window;

/// Holds all state required for a running game session.
///
/// This includes the renderer, game logic, text overlay, and input state.
pub struct AppState {
    /// The WGPU renderer for the scene and overlays.
    pub wgpu_renderer: WgpuRenderer,
    /// The main game state (board, player, camera, effects, timing).
    pub game_state: GameState,
    /// The current input state (pressed keys, queued pushes).
    pub key_state: KeyState,
    /// The text renderer for the title and FPS overlay.
    pub text_renderer: TextRenderer,
}

impl AppState {
    /// Asynchronously creates a new [`AppState`] with initialized renderers and game state.
    ///
    /// The game state is created first so the renderer can size its instance
    /// buffers from the loaded board.
    ///
    /// # Arguments
    /// - `instance`: The WGPU instance.
    /// - `surface`: The WGPU surface for rendering.
    /// - `window`: The application window.
    /// - `width`: Initial window width.
    /// - `height`: Initial window height.
    pub async fn new(
        instance: &wgpu::Instance,
        surface: wgpu::Surface<'static>,
        window: &Window,
        width: u32,
        height: u32,
    ) -> Self {
        window.set_cursor_visible(false);

        let game_state = GameState::new();
        let wgpu_renderer =
            WgpuRenderer::new(instance, surface, width, height, &game_state.board).await;

        let mut text_renderer = TextRenderer::new(
            &wgpu_renderer.device,
            &wgpu_renderer.queue,
            wgpu_renderer.surface_config.format,
            window,
        );

        // Check that font discovery found something to render with
        let font_count = text_renderer.font_system.db().len();
        if font_count == 0 {
            println!("WARNING: No fonts found! Text may not render properly.");
        } else {
            println!("Found {} system font faces", font_count);
        }

        text_renderer.initialize_overlay(width, height);

        Self {
            wgpu_renderer,
            game_state,
            key_state: KeyState::default(),
            text_renderer,
        }
    }

    /// Resizes the WGPU surface and updates the configuration.
    ///
    /// Also reflows the text overlay so the FPS readout stays anchored to the
    /// bottom left corner.
    ///
    /// # Arguments
    /// - `width`: New width of the surface.
    /// - `height`: New height of the surface.
    pub fn resize_surface(&mut self, width: u32, height: u32) {
        self.wgpu_renderer.surface_config.width = width;
        self.wgpu_renderer.surface_config.height = height;
        self.wgpu_renderer.surface.configure(
            &self.wgpu_renderer.device,
            &self.wgpu_renderer.surface_config,
        );

        self.text_renderer.layout_overlay(width, height);
    }

    /// Handles mouse capture and cursor visibility based on game state.
    ///
    /// Locks/unlocks the cursor and centers it if mouse capture is enabled.
    pub fn triage_mouse(&self, window: &Window) {
        if self.game_state.capture_mouse {
            if let Err(e) = window.set_cursor_grab(winit::window::CursorGrabMode::Locked) {
                eprintln!("Failed to lock cursor: {}", e);
            }
            window.set_cursor_visible(false);
            let window_size = window.inner_size().to_logical::<f64>(window.scale_factor());

            let center_x = window_size.width / 2.0;
            let center_y = window_size.height / 2.0;
            if let Err(e) =
                window.set_cursor_position(winit::dpi::LogicalPosition::new(center_x, center_y))
            {
                eprintln!("Failed to center cursor: {}", e);
            }
        } else {
            if let Err(e) = window.set_cursor_grab(winit::window::CursorGrabMode::None) {
                eprintln!("Failed to unlock cursor: {}", e);
            }
            window.set_cursor_visible(true);
        }
    }
}
