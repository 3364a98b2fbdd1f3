//! # Assets Module
//!
//! This module contains all game assets embedded in the binary using `include_bytes!()`.
//! This ensures that all assets are available at runtime without requiring external files.

// Tile textures
/// Grass floor texture data
pub const GRASS_TEXTURE: &[u8] = include_bytes!("../assets/grass.png");
/// Dirt floor texture data
pub const DIRT_TEXTURE: &[u8] = include_bytes!("../assets/dirt.png");
/// Wall block texture data
pub const WALL_TEXTURE: &[u8] = include_bytes!("../assets/wall.png");
/// Pushable box texture data
pub const BOX_TEXTURE: &[u8] = include_bytes!("../assets/box.png");
/// Goal marker texture data
pub const GOAL_TEXTURE: &[u8] = include_bytes!("../assets/end.png");

/// Returns all board textures with their IDs, in bind order.
pub fn board_textures() -> &'static [(&'static str, &'static [u8])] {
    &[
        ("grass", GRASS_TEXTURE),
        ("dirt", DIRT_TEXTURE),
        ("wall", WALL_TEXTURE),
        ("box", BOX_TEXTURE),
        ("goal", GOAL_TEXTURE),
    ]
}
