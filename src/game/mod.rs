//! Gameplay state: the session aggregate, grid-locked motion, key bindings,
//! and the visited-path log.

/// Keyboard mapping and pressed-key bookkeeping.
pub mod keys;
/// The motion state machine: glides, rotations, ladder jumps.
pub mod motion;
/// Visited-cell log persisted at session end.
pub mod path_log;

pub use keys::{GameKey, KeyState, winit_key_to_game_key};
pub use motion::MoveStep;
pub use path_log::{PathEntry, PathLog, PersistError};

use crate::maze::{Cell, CellKind, Direction, GridMaze, LevelSet};
use std::time::{Duration, Instant};

/// How long one cell-to-cell glide takes.
pub const MOVE_ANIMATION: Duration = Duration::from_millis(160);

/// Which screen the shell is presenting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrentScreen {
    /// Waiting for the player to begin.
    Title,
    /// Live play.
    Game,
    /// Win banner after stepping onto the unlocked exit.
    ExitReached,
}

/// An in-flight glide between two adjacent cells.
#[derive(Debug, Clone, Copy)]
pub struct MoveAnimation {
    /// Cell being vacated.
    pub from: Cell,
    /// Cell being entered.
    pub to: Cell,
    /// When the glide began.
    pub started: Instant,
}

impl MoveAnimation {
    /// Interpolation progress at `now`, clamped to `0.0..=1.0`.
    pub fn progress_at(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f32() / MOVE_ANIMATION.as_secs_f32()).min(1.0)
    }

    /// True once the glide has run its full duration.
    pub fn is_finished(&self, now: Instant) -> bool {
        self.progress_at(now) >= 1.0
    }
}

/// Whether the player is mid-glide or free to act.
#[derive(Debug, Clone, Copy)]
pub enum MotionState {
    /// Free to move, rotate, or climb.
    Idle,
    /// Gliding between two cells; further movement is rejected.
    Animating(MoveAnimation),
}

/// Observable session changes, drained by the shell once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A glide was accepted and started.
    MoveStarted,
    /// The key was picked up.
    KeyCollected,
    /// A ladder jump landed on another floor.
    FloorChanged {
        /// The floor just arrived on.
        floor: usize,
    },
    /// The player stepped onto the unlocked exit.
    ReachedExit,
}

/// Camera-ready pose with fractional coordinates mid-glide.
#[derive(Debug, Clone, Copy)]
pub struct PoseSnapshot {
    /// Active floor.
    pub floor: usize,
    /// Interpolated row.
    pub row: f32,
    /// Interpolated column.
    pub col: f32,
    /// Current facing.
    pub facing: Direction,
    /// True while a glide is in flight.
    pub animating: bool,
}

/// One run through a generated level: player pose, motion state, key and
/// exit bookkeeping, and the path log.
#[derive(Debug)]
pub struct GameSession {
    levels: LevelSet,
    floor: usize,
    position: Cell,
    facing: Direction,
    has_key: bool,
    reached_exit: bool,
    motion: MotionState,
    events: Vec<SessionEvent>,
    /// Every cell occupied so far, in order.
    pub path_log: PathLog,
    /// Which screen the shell is presenting.
    pub current_screen: CurrentScreen,
    /// First-person corridor when set, top-down map otherwise.
    pub corridor_view: bool,
    /// Minimap overlay in the corner of the corridor view.
    pub show_minimap: bool,
}

impl GameSession {
    /// Starts a session at the level's entrance, facing up, with the initial
    /// position already recorded in the path log.
    pub fn new(levels: LevelSet) -> Self {
        let position = levels.start();
        let mut path_log = PathLog::new(levels.n_floors() > 1);
        path_log.record(0, position);
        Self {
            levels,
            floor: 0,
            position,
            facing: Direction::Up,
            has_key: false,
            reached_exit: false,
            motion: MotionState::Idle,
            events: Vec::new(),
            path_log,
            current_screen: CurrentScreen::Title,
            corridor_view: true,
            show_minimap: false,
        }
    }

    /// The level being played.
    pub fn levels(&self) -> &LevelSet {
        &self.levels
    }

    /// Index of the floor the player is on.
    pub fn active_floor(&self) -> usize {
        self.floor
    }

    /// The grid of the active floor.
    pub fn active_maze(&self) -> &GridMaze {
        self.levels.floor(self.floor)
    }

    fn active_maze_mut(&mut self) -> &mut GridMaze {
        self.levels.floor_mut(self.floor)
    }

    /// The player's committed cell. Mid-glide this is still the origin cell.
    pub fn position(&self) -> Cell {
        self.position
    }

    /// Current facing.
    pub fn facing(&self) -> Direction {
        self.facing
    }

    /// True once the key has been picked up.
    pub fn has_key(&self) -> bool {
        self.has_key
    }

    /// True once the player has stepped onto the unlocked exit.
    pub fn reached_exit(&self) -> bool {
        self.reached_exit
    }

    /// Current motion state.
    pub fn motion(&self) -> MotionState {
        self.motion
    }

    /// True when no glide is in flight.
    pub fn is_idle(&self) -> bool {
        matches!(self.motion, MotionState::Idle)
    }

    /// The exit stays locked while a key exists and is uncollected.
    pub fn exit_locked(&self) -> bool {
        !self.has_key && self.levels.key().is_some()
    }

    /// Where the uncollected key sits on `floor`, for rendering.
    pub fn key_visible_on(&self, floor: usize) -> Option<Cell> {
        self.levels.key_on_floor(floor)
    }

    /// Kind of the cell the player is standing on.
    pub fn standing_on(&self) -> CellKind {
        self.active_maze().kind(self.position)
    }

    /// Interpolated pose at `now` for the renderer.
    pub fn pose_snapshot(&self, now: Instant) -> PoseSnapshot {
        match self.motion {
            MotionState::Idle => PoseSnapshot {
                floor: self.floor,
                row: self.position.row as f32,
                col: self.position.col as f32,
                facing: self.facing,
                animating: false,
            },
            MotionState::Animating(anim) => {
                let t = anim.progress_at(now);
                let lerp = |a: usize, b: usize| a as f32 + (b as f32 - a as f32) * t;
                PoseSnapshot {
                    floor: self.floor,
                    row: lerp(anim.from.row, anim.to.row),
                    col: lerp(anim.from.col, anim.to.col),
                    facing: self.facing,
                    animating: true,
                }
            }
        }
    }

    /// Takes all events raised since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }
}
