//! Keyboard input handling.
//!
//! This module defines the [`GameKey`] enum for abstracting game actions from
//! physical keys, and provides [`KeyState`] for debouncing held keys. It also
//! includes the mapping from winit key events to game actions.

use std::collections::HashSet;
use winit::keyboard;

/// Game actions triggered from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKey {
    /// Glide one cell forward (W or Up Arrow).
    MoveForward,
    /// Glide one cell backward (S or Down Arrow).
    MoveBackward,
    /// Quarter turn counter-clockwise (A or Left Arrow).
    RotateCcw,
    /// Quarter turn clockwise (D or Right Arrow).
    RotateCw,
    /// Climb the up-ladder underfoot (E).
    GoUp,
    /// Climb the down-ladder underfoot (C).
    GoDown,
    /// Swap between the corridor and top-down views (V).
    ToggleView,
    /// Toggle the corner minimap (M).
    ToggleMinimap,
    /// Throw the level away and generate a fresh one (N).
    NewMaze,
    /// Leave the title screen and start playing (Enter).
    Begin,
    /// Save the path log and quit (Q).
    Quit,
}

/// Tracks which keys are held, so key auto-repeat does not retrigger
/// single-shot actions.
#[derive(Debug, Default)]
pub struct KeyState {
    /// Set of currently pressed keys.
    pressed: HashSet<GameKey>,
}

impl KeyState {
    /// Creates a new, empty [`KeyState`].
    pub fn new() -> Self {
        Self {
            pressed: HashSet::new(),
        }
    }

    /// Marks a key as pressed. Returns `false` when it was already held,
    /// which is the debounce signal.
    pub fn press_key(&mut self, key: GameKey) -> bool {
        self.pressed.insert(key)
    }

    /// Marks a key as released.
    pub fn release_key(&mut self, key: GameKey) {
        self.pressed.remove(&key);
    }

    /// Checks if a key is currently pressed.
    pub fn is_pressed(&self, key: GameKey) -> bool {
        self.pressed.contains(&key)
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

/// Converts a winit [`keyboard::Key`] to a [`GameKey`] if it matches a mapped
/// action.
///
/// Supports both named keys (arrows, enter) and character keys (WASD plus the
/// toggles).
pub fn winit_key_to_game_key(key: &keyboard::Key) -> Option<GameKey> {
    match key {
        keyboard::Key::Named(named) => match_named_key!(named, {
            ArrowUp => GameKey::MoveForward,
            ArrowDown => GameKey::MoveBackward,
            ArrowLeft => GameKey::RotateCcw,
            ArrowRight => GameKey::RotateCw,
            Enter => GameKey::Begin,
        }),

        keyboard::Key::Character(c) => match_char_key!(c, {
            "w" => GameKey::MoveForward,
            "s" => GameKey::MoveBackward,
            "a" => GameKey::RotateCcw,
            "d" => GameKey::RotateCw,
            "e" => GameKey::GoUp,
            "c" => GameKey::GoDown,
            "v" => GameKey::ToggleView,
            "m" => GameKey::ToggleMinimap,
            "n" => GameKey::NewMaze,
            "q" => GameKey::Quit,
        }),

        _ => None,
    }
}
