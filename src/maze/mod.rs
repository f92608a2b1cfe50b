//! Maze construction: the grid model, per-floor generation, and multi-floor
//! level assembly.

/// Randomized depth-first maze carving for a single floor.
pub mod generator;
/// Cell kinds, coordinates, directions, and the floor grid.
pub mod grid;
/// Stacked floors linked by ladders, plus key placement.
pub mod level;

pub use generator::{GeneratedMaze, generate};
pub use grid::{Cell, CellKind, DIRECTIONS, Direction, GridMaze};
pub use level::{KeyItem, LadderPair, LevelSet};
