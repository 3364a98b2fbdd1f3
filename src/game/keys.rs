//! Keyboard input handling for the game.
//!
//! This module defines the [`GameKey`] enum for abstracting game actions from physical keys,
//! and provides [`KeyState`] for tracking pressed keys and updating the [`GameState`] accordingly.
//! It also includes utilities for mapping from winit key events to game actions.

use crate::game::GameState;
use crate::game::board::PushDirection;
use std::collections::HashSet;
use winit::keyboard;

/// Enum representing all possible in-game actions that can be triggered by keyboard input.
///
/// This abstraction allows the game logic to be decoupled from specific physical keys.
/// Variants cover camera flight, box pushes, and application control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKey {
    /// Fly the camera forward (W).
    MoveForward,
    /// Fly the camera backward (S).
    MoveBackward,
    /// Fly the camera left (A).
    MoveLeft,
    /// Fly the camera right (D).
    MoveRight,
    /// Fly the camera up (Space).
    FlyUp,
    /// Fly the camera down (Shift).
    FlyDown,
    /// Push toward the far edge of the board (Up Arrow).
    PushUp,
    /// Push toward the near edge of the board (Down Arrow).
    PushDown,
    /// Push toward negative x (Left Arrow).
    PushLeft,
    /// Push toward positive x (Right Arrow).
    PushRight,
    /// Restart the current puzzle (R).
    Restart,
    /// Release or recapture the mouse cursor (Tab).
    ToggleMouseCapture,
    /// Quit the game (Escape).
    Quit,
}

/// Push directions checked in a fixed order, so that when several arrow keys
/// land in the same frame exactly one push happens: Up beats Left beats Down
/// beats Right.
const PUSH_PRIORITY: [(GameKey, PushDirection); 4] = [
    (GameKey::PushUp, PushDirection::Up),
    (GameKey::PushLeft, PushDirection::Left),
    (GameKey::PushDown, PushDirection::Down),
    (GameKey::PushRight, PushDirection::Right),
];

/// Tracks the set of currently pressed game keys plus pushes queued for the next frame.
///
/// Use [`press_key`](KeyState::press_key) and [`release_key`](KeyState::release_key) to
/// update the state, and [`is_pressed`](KeyState::is_pressed) to query. The
/// [`update`](KeyState::update) method applies the current key state to the [`GameState`].
#[derive(Debug, Default)]
pub struct KeyState {
    /// Set of currently pressed keys.
    pub pressed_keys: HashSet<GameKey>,
    /// Arrow presses received since the last frame. Drained once per frame.
    queued_pushes: HashSet<GameKey>,
}

impl KeyState {
    /// Creates a new, empty [`KeyState`]
    pub fn new() -> Self {
        Self {
            pressed_keys: HashSet::new(),
            queued_pushes: HashSet::new(),
        }
    }

    /// Marks a key as pressed.
    pub fn press_key(&mut self, key: GameKey) {
        self.pressed_keys.insert(key);
    }

    /// Marks a key as released.
    pub fn release_key(&mut self, key: GameKey) {
        self.pressed_keys.remove(&key);
    }

    /// Checks if a key is currently pressed.
    pub fn is_pressed(&self, key: GameKey) -> bool {
        self.pressed_keys.contains(&key)
    }

    /// Records an arrow press to be resolved on the next frame.
    ///
    /// Pushes are edge triggered: holding an arrow key queues nothing further
    /// until the key is released and pressed again.
    pub fn queue_push(&mut self, key: GameKey) {
        self.queued_pushes.insert(key);
    }

    /// Takes the highest-priority queued push, discarding the rest.
    pub fn take_queued_push(&mut self) -> Option<PushDirection> {
        let direction = PUSH_PRIORITY
            .iter()
            .find(|(key, _)| self.queued_pushes.contains(key))
            .map(|(_, direction)| *direction);
        self.queued_pushes.clear();
        direction
    }

    /// Updates the [`GameState`] based on the current pressed keys.
    ///
    /// - Flies the camera according to held movement keys.
    /// - Resolves at most one queued box push per frame.
    pub fn update(&mut self, game_state: &mut GameState) {
        let delta_time = game_state.delta_time;
        game_state.camera.process_movement(
            delta_time,
            self.is_pressed(GameKey::MoveForward),
            self.is_pressed(GameKey::MoveBackward),
            self.is_pressed(GameKey::MoveLeft),
            self.is_pressed(GameKey::MoveRight),
            self.is_pressed(GameKey::FlyUp),
            self.is_pressed(GameKey::FlyDown),
        );

        if let Some(direction) = self.take_queued_push() {
            game_state.push_toward(direction);
        }
    }
}

macro_rules! match_char_key {
    ($c:expr, {
        $($key:literal => $variant:expr),* $(,)?
    }) => {{
        match $c.to_ascii_lowercase().as_str() {
            $($key => Some($variant),)*
            _ => None,
        }
    }};
}

macro_rules! match_named_key {
    ($k:expr, {
        $($key:ident => $variant:expr),* $(,)?
    }) => {{
        match $k {
            $(winit::keyboard::NamedKey::$key => Some($variant),)*
            _ => None,
        }
    }};
}

/// Converts a winit [`keyboard::Key`] to a [`GameKey`] if it matches a mapped action.
///
/// Supports both named keys (arrows, shift, space, tab, escape) and character keys (WASD, R).
///
/// # Arguments
/// * `key` - The winit key event to convert.
///
/// # Returns
/// * `Some(GameKey)` if the key maps to a game action.
/// * `None` otherwise.
pub fn winit_key_to_game_key(key: &keyboard::Key) -> Option<GameKey> {
    match key {
        keyboard::Key::Named(named) => match_named_key!(named, {
            ArrowUp => GameKey::PushUp,
            ArrowDown => GameKey::PushDown,
            ArrowLeft => GameKey::PushLeft,
            ArrowRight => GameKey::PushRight,
            Shift => GameKey::FlyDown,
            Space => GameKey::FlyUp,
            Tab => GameKey::ToggleMouseCapture,
            Escape => GameKey::Quit,
        }),

        keyboard::Key::Character(c) => match_char_key!(c, {
            "w" => GameKey::MoveForward,
            "s" => GameKey::MoveBackward,
            "a" => GameKey::MoveLeft,
            "d" => GameKey::MoveRight,
            "r" => GameKey::Restart,
        }),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests that character keys map to camera flight actions.
    #[test]
    fn test_character_keys_map_to_flight() {
        let key = keyboard::Key::Character("W".into());
        assert_eq!(winit_key_to_game_key(&key), Some(GameKey::MoveForward));

        let key = keyboard::Key::Character("r".into());
        assert_eq!(winit_key_to_game_key(&key), Some(GameKey::Restart));
    }

    /// Tests that unmapped keys produce no action.
    #[test]
    fn test_unmapped_key_is_ignored() {
        let key = keyboard::Key::Character("z".into());
        assert_eq!(winit_key_to_game_key(&key), None);
    }

    /// Tests that when several arrows queue in one frame, Up wins and the
    /// rest are discarded.
    #[test]
    fn test_push_priority_up_wins() {
        let mut keys = KeyState::new();
        keys.queue_push(GameKey::PushRight);
        keys.queue_push(GameKey::PushUp);
        keys.queue_push(GameKey::PushDown);

        assert_eq!(keys.take_queued_push(), Some(PushDirection::Up));
        assert_eq!(
            keys.take_queued_push(),
            None,
            "losing pushes should not carry over to the next frame"
        );
    }

    /// Tests that Left beats Down and Right when Up is absent.
    #[test]
    fn test_push_priority_left_beats_down_and_right() {
        let mut keys = KeyState::new();
        keys.queue_push(GameKey::PushDown);
        keys.queue_push(GameKey::PushRight);
        keys.queue_push(GameKey::PushLeft);

        assert_eq!(keys.take_queued_push(), Some(PushDirection::Left));
    }
}
