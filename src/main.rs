//! Bodega - A 3D Sokoban Puzzle Game
//!
//! This is the main entry point for the Bodega game application. Bodega is a
//! shadow-mapped 3D Sokoban puzzle built with Rust and WGPU, where the player
//! pushes crates onto goal tiles on a small warehouse board while flying a
//! free camera around the scene.
//!
//! # Features
//! - **3D Graphics**: Real-time 3D rendering using WGPU with shadow mapping
//! - **Classic Puzzle Rules**: One box pushed at a time, never pulled
//! - **Free-Fly Camera**: WASD flight with mouse look, detached from the player
//! - **Win Celebration**: Particle fountains and expanding rings over the goals
//! - **Text Overlay**: Title and live FPS readout rendered with glyphon
//!
//! # Architecture
//! The application follows a modular architecture:
//! - `app/`: Application state management and event handling
//! - `game/`: Core game logic, board, player, camera, and effect simulators
//! - `renderer/`: Graphics rendering pipeline and text overlay
//! - `math/`: Mathematical utilities for 3D graphics
//!
//! # Usage
//! Run the application with `cargo run`. Push boxes with the arrow keys, fly
//! the camera with WASD, Space, and Shift, restart with R, and quit with
//! Escape.

#![warn(missing_docs)]
pub mod app;
pub mod assets;
pub mod game;
pub mod math;

pub mod renderer;

use winit::event_loop::{ControlFlow, EventLoop};

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

/// Main entry point for the Bodega game application.
///
/// This function initializes the application, sets up the event loop, and starts
/// the game. It handles different compilation targets (native vs WASM) and
/// optional memory profiling.
///
/// # Features
/// - Memory profiling with dhat-heap feature
/// - Cross-platform compatibility (native and WASM targets)
/// - Graceful error handling for event loop creation
///
/// # Panics
/// - If the event loop cannot be created
/// - If the application fails to run
fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();
    #[cfg(not(target_arch = "wasm32"))]
    {
        pollster::block_on(run());
    }
}

/// Asynchronously runs the main game loop.
///
/// This function creates the event loop, initializes the application state,
/// and starts the game. It handles the complete lifecycle of the application
/// from startup to shutdown.
///
/// # Returns
/// This function runs indefinitely until the application is closed by the user.
///
/// # Errors
/// - Returns early if event loop creation fails
/// - Exits the process if the application fails to run
async fn run() {
    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            eprintln!("Error creating event loop: {}", err);
            return;
        }
    };

    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = app::App::new();

    event_loop.run_app(&mut app).expect("Failed to run app");
}
