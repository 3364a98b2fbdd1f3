//! Event handler module for the Sokoban game.
//!
//! Contains the App struct and its event handling logic.

use crate::app::app_state::AppState;
use crate::game::keys::GameKey;
use std::{sync::Arc, time::Instant};
use wgpu;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::ActiveEventLoop,
    window::{Window, WindowId},
};

/// Initial window width in pixels.
const WINDOW_WIDTH: u32 = 1080;
/// Initial window height in pixels.
const WINDOW_HEIGHT: u32 = 700;

/// Main application struct that manages the game lifecycle and event handling.
///
/// This struct implements the [`ApplicationHandler`] trait to handle all window and device
/// events. It manages the WGPU instance, application state, and window lifecycle.
///
/// # Lifecycle
/// 1. Created with `App::new()` - initializes WGPU instance
/// 2. Window is set via `set_window()` - creates surface and application state
/// 3. Events are handled via `ApplicationHandler` trait methods
/// 4. Application runs until the window is closed or Escape is pressed
#[derive(Default)]
pub struct App {
    /// The WGPU instance for graphics operations.
    pub instance: wgpu::Instance,
    /// The current application state, None until initialized.
    pub state: Option<AppState>,
    /// The application window, None until set.
    pub window: Option<Arc<Window>>,
}

impl App {
    /// Creates a new [`App`] instance with default WGPU configuration.
    ///
    /// The application state and window will be None until `set_window()` is
    /// called.
    pub fn new() -> Self {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        Self {
            instance,
            state: None,
            window: None,
        }
    }

    /// Asynchronously sets up the application window and initializes all game systems.
    ///
    /// Creates the WGPU surface for the window, initializes the [`AppState`]
    /// with the renderer and game state, and captures the mouse for camera
    /// control.
    ///
    /// # Panics
    /// - If surface creation fails
    pub async fn set_window(&mut self, window: Window) {
        let window = Arc::new(window);

        let _ = window.request_inner_size(PhysicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));

        let surface = self
            .instance
            .create_surface(window.clone())
            .expect("Failed to create surface!");

        let state = AppState::new(
            &self.instance,
            surface,
            &window,
            WINDOW_WIDTH,
            WINDOW_HEIGHT,
        )
        .await;

        state.triage_mouse(&window);

        self.window.get_or_insert(window);
        self.state.get_or_insert(state);
    }

    /// Handles window resize events and updates the rendering surface.
    ///
    /// Only processes the resize if both dimensions are greater than 0. Logs
    /// an error if the application state has not been initialized yet.
    pub fn handle_resized(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            let state = match &mut self.state {
                Some(state) => state,
                None => {
                    eprintln!("Cannot resize surface without state initialized!");
                    #[cfg(debug_assertions)]
                    eprintln!("Backtrace: {:?}", std::backtrace::Backtrace::capture());
                    return;
                }
            };
            state.resize_surface(width, height);
        }
    }
}

impl ApplicationHandler for App {
    /// Handles application resume events by creating a new window.
    ///
    /// # Panics
    /// - If window creation fails
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let window =
            match event_loop.create_window(Window::default_attributes().with_title("Sokoban")) {
                Ok(window) => window,
                Err(err) => {
                    panic!("Failed to create window: {}", err);
                }
            };
        pollster::block_on(self.set_window(window));
    }

    /// Handles device events, primarily mouse movement for camera control.
    ///
    /// Mouse movement is only applied to the camera while mouse capture is
    /// enabled; `triage_mouse()` keeps the cursor state in sync either way.
    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if let Some(state) = self.state.as_mut() {
                if let Some(window) = &self.window {
                    if state.game_state.capture_mouse {
                        state.game_state.camera.mouse_movement(delta.0, delta.1);
                    }
                    state.triage_mouse(window);
                }
            }
        }
    }

    /// Handles window events including input, resize, and close requests.
    ///
    /// # Event Types Handled
    /// - **CloseRequested**: Stops the event loop
    /// - **Resized**: Calls `handle_resized()` to update the surface
    /// - **KeyboardInput**: Processes game controls
    /// - **RedrawRequested**: Triggers frame timing and rendering
    ///
    /// # Keyboard Controls
    /// - Arrow keys queue a box push for the next frame
    /// - R restarts the puzzle, Tab toggles mouse capture, Escape quits
    /// - WASD, Space, and Shift are held keys applied in the update loop
    ///
    /// # Panics
    /// - If application state is not initialized
    fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        let state = match self.state.as_mut() {
            Some(state) => state,
            None => {
                panic!("State not initialized");
            }
        };

        match event {
            WindowEvent::CloseRequested => {
                println!("The close button was pressed; stopping");
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                self.handle_resized(new_size.width, new_size.height);
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: key,
                        state: key_state,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                if let Some(game_key) = crate::game::keys::winit_key_to_game_key(&key) {
                    match key_state {
                        ElementState::Pressed => {
                            state.key_state.press_key(game_key);

                            // Handle non-movement keys immediately on press
                            match game_key {
                                GameKey::Quit => event_loop.exit(),
                                GameKey::Restart => state.game_state.restart(),
                                GameKey::ToggleMouseCapture => {
                                    state.game_state.capture_mouse =
                                        !state.game_state.capture_mouse;
                                    if let Some(window) = self.window.as_ref() {
                                        state.triage_mouse(window);
                                    }
                                }
                                GameKey::PushUp
                                | GameKey::PushDown
                                | GameKey::PushLeft
                                | GameKey::PushRight => {
                                    state.key_state.queue_push(game_key);
                                }
                                _ => {} // Movement keys are handled in process_movement
                            }
                        }
                        ElementState::Released => {
                            state.key_state.release_key(game_key);
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                let current_time = Instant::now();
                self.handle_frame_timing(current_time);
                self.handle_redraw();
            }

            _ => {}
        }
    }
}
