//! The visible player entity on the board.
//!
//! The board decides where the player is allowed to be; this struct only
//! mirrors that cell into world space and remembers which way the player
//! model faces. Movement is instant: after a successful push the entity
//! snaps to the new cell with no interpolation, so the rendered position
//! can never disagree with the puzzle state.

use crate::game::board::{Board, PushDirection};
use crate::math::mat::Mat4;

/// Edge length of the player cube, slightly smaller than a tile.
pub const PLAYER_SIZE: f32 = 0.7;

/// World-space state of the player model.
#[derive(Debug, Clone)]
pub struct Player {
    /// World position of the model's center `[x, y, z]`.
    pub position: [f32; 3],
    /// Yaw of the model in degrees. Up is 0, right 90, down 180, left 270.
    pub facing: f32,
}

impl Player {
    /// Creates a player standing on the board's starting cell, facing up.
    pub fn new(board: &Board) -> Self {
        let mut player = Self {
            position: [0.0, PLAYER_SIZE / 2.0, 0.0],
            facing: 0.0,
        };
        player.snap_to_board(board);
        player
    }

    /// Turns the model toward `direction`. Called for every push attempt,
    /// so the player faces a wall it just bumped into.
    pub fn face(&mut self, direction: PushDirection) {
        self.facing = direction.facing_degrees();
    }

    /// Moves the model to the center of the board's current player cell.
    pub fn snap_to_board(&mut self, board: &Board) {
        let (world_x, world_z) = board.cell_to_world(board.player());
        self.position = [world_x, PLAYER_SIZE / 2.0, world_z];
    }

    /// Model matrix for rendering: scale to player size, turn to the
    /// facing direction, then translate onto the board.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::translation(self.position[0], self.position[1], self.position[2])
            .multiply(&Mat4::rotation_y(self.facing))
            .multiply(&Mat4::scaling(PLAYER_SIZE, PLAYER_SIZE, PLAYER_SIZE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests that the entity lines up with the board cell it mirrors.
    #[test]
    fn test_snap_follows_board() {
        let mut board = Board::new();
        let mut player = Player::new(&board);

        let (start_x, start_z) = board.cell_to_world(board.player());
        assert_eq!(player.position[0], start_x);
        assert_eq!(player.position[2], start_z);

        assert!(board.attempt_move(PushDirection::Left));
        player.snap_to_board(&board);

        let (moved_x, moved_z) = board.cell_to_world(board.player());
        assert_eq!(player.position[0], moved_x);
        assert_eq!(player.position[2], moved_z);
        assert!(
            player.position[1] > 0.0,
            "player cube must rest on the floor, not in it"
        );
    }

    /// Tests the documented facing angles for all four directions.
    #[test]
    fn test_facing_angles() {
        let board = Board::new();
        let mut player = Player::new(&board);

        player.face(PushDirection::Right);
        assert_eq!(player.facing, 90.0);
        player.face(PushDirection::Down);
        assert_eq!(player.facing, 180.0);
        player.face(PushDirection::Left);
        assert_eq!(player.facing, 270.0);
        player.face(PushDirection::Up);
        assert_eq!(player.facing, 0.0);
    }
}
