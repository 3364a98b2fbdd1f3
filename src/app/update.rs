//! Update logic for the Sokoban app.
//!
//! Contains the per-frame update and rendering methods for the App struct.

use crate::renderer::text::FPS_BUFFER;
use std::time::Instant;
use wgpu;

use super::event_handler::App;

/// Frames between refreshes of the FPS readout.
const FPS_REFRESH_INTERVAL: u32 = 20;

impl App {
    /// Handles the main rendering loop and game state updates.
    ///
    /// This method is called every frame. It applies held keys and queued
    /// pushes to the game state, advances the puzzle and win effect
    /// simulation, refreshes the FPS readout, and records and submits the
    /// frame.
    ///
    /// # Rendering Pipeline
    /// 1. **Input**: Held keys fly the camera, at most one queued push fires
    /// 2. **Simulation**: Win detection and effect simulators advance by delta time
    /// 3. **Rendering**: The renderer records the shadow, scene, sky, effects, and text passes
    /// 4. **Frame Submission**: Commands are submitted and the frame is presented
    ///
    /// # Error Handling
    /// - Logs errors for canvas update failures and skips the frame
    /// - Skips rendering entirely while the window is minimized
    pub fn handle_redraw(&mut self) {
        let window = self
            .window
            .as_ref()
            .expect("Window must be initialized before use");
        if window.is_minimized().unwrap_or(false) {
            println!("Window is minimized");
            return;
        }

        let state = self
            .state
            .as_mut()
            .expect("State must be initialized before use");

        let delta_time = state.game_state.delta_time;
        state.key_state.update(&mut state.game_state);
        state.game_state.update(delta_time);

        if state.game_state.frame_count % FPS_REFRESH_INTERVAL == 0 {
            let fps_text = format!("FPS: {}", state.game_state.current_fps);
            if let Err(e) = state.text_renderer.update_text(FPS_BUFFER, &fps_text) {
                println!("Failed to update FPS readout: {}", e);
            }
        }

        let mut encoder = state
            .wgpu_renderer
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });

        let surface_texture = match state.wgpu_renderer.update_canvas(
            &mut encoder,
            &state.game_state,
            &mut state.text_renderer,
        ) {
            Ok(texture) => texture,
            Err(err) => {
                eprintln!("Failed to update canvas: {}", err);
                #[cfg(debug_assertions)]
                eprintln!("Backtrace: {:?}", std::backtrace::Backtrace::capture());
                return;
            }
        };

        window.request_redraw();

        // Submit commands and present
        state.wgpu_renderer.queue.submit(Some(encoder.finish()));
        surface_texture.present();
        state.text_renderer.trim();

        // Poll the device to process any pending operations
        state.wgpu_renderer.device.poll(wgpu::Maintain::Poll);
    }

    /// Updates frame timing and the FPS readout value.
    ///
    /// Computes the delta time since the previous frame and, at a fixed frame
    /// interval, refreshes the displayed FPS from the instantaneous frame
    /// time.
    ///
    /// # Side Effects
    /// - Updates `game_state.delta_time` for use by other systems
    /// - Updates the frame counter and the displayed FPS value
    pub fn handle_frame_timing(&mut self, current_time: Instant) {
        if let Some(state) = self.state.as_mut() {
            let delta_time = current_time
                .duration_since(state.game_state.last_frame_time)
                .as_secs_f32();

            state.game_state.delta_time = delta_time;
            state.game_state.last_frame_time = current_time;
            state.game_state.frame_count += 1;

            if state.game_state.frame_count % FPS_REFRESH_INTERVAL == 0 && delta_time > 0.0 {
                state.game_state.current_fps = (1.0 / delta_time) as u32;
            }
        }
    }
}
