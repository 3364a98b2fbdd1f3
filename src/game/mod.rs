//! Game state management module.
//!
//! This module defines the [`GameState`] struct, which tracks all mutable state
//! for the game loop: the puzzle board, the player entity, the free-fly camera,
//! the win celebration effects, and frame timing.

pub mod board;
pub mod camera;
pub mod keys;
pub mod particles;
pub mod player;

use self::board::{Board, PushDirection};
use self::camera::Camera;
use self::particles::{Explosion, ParticleSystem};
use self::player::Player;
use std::time::Instant;

/// Particles spawned per frame over each celebration origin while the
/// puzzle stays solved.
pub const WIN_PARTICLES_PER_FRAME: usize = 8;

/// Represents the entire mutable state of the game.
///
/// This struct is updated every frame and contains:
/// - The puzzle board and the player entity standing on it.
/// - The free-fly camera.
/// - The win celebration simulators (particles and expanding rings).
/// - Timing information for frame updates and FPS display.
pub struct GameState {
    /// The puzzle board: tiles, boxes, and the player's cell.
    pub board: Board,
    /// The visible player entity, mirroring the board's player cell.
    pub player: Player,
    /// The free-fly observer camera.
    pub camera: Camera,
    /// Fountain particles shown over each goal and the player after a win.
    pub win_particles: ParticleSystem,
    /// Expanding ring shown at the same origins after a win.
    pub explosion: Explosion,
    /// Time of the last frame.
    pub last_frame_time: Instant,
    /// Time elapsed since the last frame (seconds).
    pub delta_time: f32,
    /// Number of frames rendered since start.
    pub frame_count: u32,
    /// FPS value currently shown in the overlay.
    pub current_fps: u32,
    /// Whether the mouse is captured for camera movement.
    pub capture_mouse: bool,
    win_active: bool,
}

impl Default for GameState {
    /// Returns a new [`GameState`] with the shipped level loaded.
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Creates a new [`GameState`] with the shipped level, the default
    /// camera, and idle win effects.
    pub fn new() -> Self {
        let board = Board::new();
        let player = Player::new(&board);
        Self {
            board,
            player,
            camera: Camera::new(),
            win_particles: ParticleSystem::new(),
            explosion: Explosion::new(),
            last_frame_time: Instant::now(),
            delta_time: 0.0,
            frame_count: 0,
            current_fps: 0,
            capture_mouse: true,
            win_active: false,
        }
    }

    /// Attempts one push in `direction`.
    ///
    /// The player model turns toward the direction whether or not the board
    /// accepts the move; on success it snaps to the new cell.
    pub fn push_toward(&mut self, direction: PushDirection) {
        self.player.face(direction);
        if self.board.attempt_move(direction) {
            self.player.snap_to_board(&self.board);
        }
    }

    /// Puts the puzzle back to its starting layout and stops the win
    /// celebration.
    pub fn restart(&mut self) {
        self.board.reset();
        self.player.snap_to_board(&self.board);
        self.player.facing = 0.0;
        self.win_active = false;
        self.win_particles.clear();
        self.explosion.reset();
    }

    /// Advances the per-frame simulation.
    ///
    /// Checks for the solved transition, spawning the celebration on the
    /// frame the last box lands, and steps the effect simulators exactly
    /// once per frame even though they are drawn over several origins.
    pub fn update(&mut self, delta_time: f32) {
        let solved = self.board.is_solved();
        if solved && !self.win_active {
            self.win_active = true;
            self.explosion.trigger();
        } else if !solved && self.win_active {
            self.win_active = false;
            self.win_particles.clear();
            self.explosion.reset();
        }

        if self.win_active {
            self.win_particles.update(delta_time, WIN_PARTICLES_PER_FRAME);
            self.explosion.update(delta_time);
        }
    }

    /// Whether the puzzle is currently solved and the celebration running.
    pub fn is_won(&self) -> bool {
        self.win_active
    }

    /// World-space origins the win effects are drawn over: one per goal
    /// tile, plus the player's position.
    pub fn win_effect_origins(&self) -> Vec<[f32; 3]> {
        let mut origins: Vec<[f32; 3]> = self
            .board
            .goals()
            .iter()
            .map(|goal| {
                let (world_x, world_z) = self.board.cell_to_world(*goal);
                [world_x, 0.0, world_z]
            })
            .collect();
        origins.push(self.player.position);
        origins
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::Cell;

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

    /// Tests that solving the puzzle starts the celebration on the next
    /// update and keeps it running.
    #[test]
    fn test_win_transition_starts_effects() {
        let mut game = GameState::new();
        assert!(!game.is_won());

        solve(&mut game);
        game.update(0.016);

        assert!(game.is_won());
        assert!(game.explosion.is_active());
        assert!(
            game.win_particles.alive_count() > 0,
            "particles should spawn on the winning frame"
        );
    }

    /// Tests that restart rewinds the board and silences the celebration.
    #[test]
    fn test_restart_clears_win_state() {
        let mut game = GameState::new();
        solve(&mut game);
        game.update(0.016);
        assert!(game.is_won());

        game.restart();

        assert!(!game.is_won());
        assert!(!game.board.is_solved());
        assert_eq!(game.board.player(), Cell::new(5, 2));
        assert!(!game.explosion.is_active());
        assert_eq!(game.win_particles.alive_count(), 0);
        assert_eq!(game.player.facing, 0.0);
    }

    /// Tests that a rejected push still turns the player model.
    #[test]
    fn test_rejected_push_still_faces() {
        let mut game = GameState::new();
        let start = game.player.position;

        // One step up reaches the wall ring; the second bounces.
        game.push_toward(PushDirection::Up);
        let blocked = game.board.player();
        game.push_toward(PushDirection::Up);

        assert_eq!(game.board.player(), blocked, "wall must reject the push");
        assert_eq!(game.player.facing, 0.0, "model still faces the wall");
        assert_ne!(game.player.position, start, "the first push did move");
    }

    /// Tests the celebration origins: one per goal plus the player.
    #[test]
    fn test_win_effect_origins() {
        let game = GameState::new();
        let origins = game.win_effect_origins();

        assert_eq!(origins.len(), game.board.goals().len() + 1);
        assert_eq!(origins.last(), Some(&game.player.position));
        for origin in &origins[..origins.len() - 1] {
            assert!(
                (origin[0] - -2.5).abs() < 1e-6,
                "goal origins sit in the x = -2.5 column"
            );
        }
    }
}
