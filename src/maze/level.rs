//! Multi-floor level assembly: stacked floors, ladder wiring, and key
//! placement.
//!
//! Each floor is generated independently, then a corrective pass strips the
//! exit off every floor but the top and the start marker off every floor but
//! the bottom. Adjacent floors are linked by ladder pairs that share one
//! coordinate, recorded in an explicit adjacency table.

use crate::maze::generator::{self, GeneratedMaze};
use crate::maze::grid::{Cell, CellKind, GridMaze};
use rand::Rng;

/// Location of the single key, when the level has one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyItem {
    /// Floor index holding the key.
    pub floor: usize,
    /// Cell holding the key.
    pub cell: Cell,
}

/// One wired ladder pair. Floor `lower` holds the up-ladder at `cell`; floor
/// `lower + 1` holds the matching down-ladder at the same coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LadderPair {
    /// The lower of the two linked floors.
    pub lower: usize,
    /// Shared coordinate of both ladder ends.
    pub cell: Cell,
}

/// A stack of floors with their ladder table, entrance, exit, and key.
#[derive(Debug, Clone)]
pub struct LevelSet {
    floors: Vec<GridMaze>,
    ladders: Vec<LadderPair>,
    start: Cell,
    exit: Cell,
    key: Option<KeyItem>,
}

impl LevelSet {
    /// Generates `n_floors` stacked floors of the given dimensions.
    ///
    /// A single-floor level has neither ladders nor a key, so its exit is
    /// never locked. Multi-floor levels clamp dimensions to at least 5 so a
    /// floor can host both ends of its ladder chain.
    pub fn generate<R: Rng>(
        n_floors: usize,
        rows: usize,
        cols: usize,
        allow_loops: bool,
        loop_chance: f64,
        rng: &mut R,
    ) -> Self {
        let n_floors = n_floors.max(1);
        let (rows, cols) = if n_floors > 1 {
            (rows.max(5), cols.max(5))
        } else {
            (rows, cols)
        };

        let mut generated: Vec<GeneratedMaze> = (0..n_floors)
            .map(|_| generator::generate(rows, cols, allow_loops, loop_chance, rng))
            .collect();

        // Corrective pass: one exit on the top floor, one start on the bottom.
        let top = n_floors - 1;
        for (idx, floor) in generated.iter_mut().enumerate() {
            if idx != top {
                floor.maze.set_kind(floor.exit, CellKind::Wall);
            }
            if idx != 0 {
                floor.maze.set_kind(floor.start, CellKind::Passage);
            }
        }
        let start = generated[0].start;
        let exit = generated[top].exit;
        let mut floors: Vec<GridMaze> = generated.into_iter().map(|g| g.maze).collect();

        let mut ladders = Vec::new();
        for lower in 0..top {
            // Odd-lattice cells only: the carve opens every one of them on
            // every floor, so both ladder ends connect to their floor's
            // corridor graph.
            let candidates: Vec<Cell> = floors[lower]
                .passage_cells()
                .into_iter()
                .filter(|cell| cell.row % 2 == 1 && cell.col % 2 == 1)
                .collect();
            let cell = candidates[rng.gen_range(0..candidates.len())];
            floors[lower].set_kind(cell, CellKind::LadderUp);
            // The destination opens regardless of what was carved there.
            floors[lower + 1].set_kind(cell, CellKind::LadderDown);
            ladders.push(LadderPair { lower, cell });
        }

        let key = if n_floors > 1 {
            let candidates: Vec<KeyItem> = floors
                .iter()
                .enumerate()
                .flat_map(|(floor, maze)| {
                    maze.passage_cells()
                        .into_iter()
                        .map(move |cell| KeyItem { floor, cell })
                })
                .collect();
            Some(candidates[rng.gen_range(0..candidates.len())])
        } else {
            None
        };

        Self {
            floors,
            ladders,
            start,
            exit,
            key,
        }
    }

    /// Number of floors.
    pub fn n_floors(&self) -> usize {
        self.floors.len()
    }

    /// Index of the top floor.
    pub fn top_floor(&self) -> usize {
        self.floors.len() - 1
    }

    /// The floor at `idx`. Panics when out of range.
    pub fn floor(&self, idx: usize) -> &GridMaze {
        &self.floors[idx]
    }

    /// Mutable access to the floor at `idx`.
    pub fn floor_mut(&mut self, idx: usize) -> &mut GridMaze {
        &mut self.floors[idx]
    }

    /// Entrance cell on the bottom floor.
    pub fn start(&self) -> Cell {
        self.start
    }

    /// Exit cell on the top floor.
    pub fn exit(&self) -> Cell {
        self.exit
    }

    /// The uncollected key, if this level ever had one.
    pub fn key(&self) -> Option<KeyItem> {
        self.key
    }

    /// Removes and returns the key.
    pub fn take_key(&mut self) -> Option<KeyItem> {
        self.key.take()
    }

    /// The key's cell when it sits uncollected on `floor`.
    pub fn key_on_floor(&self, floor: usize) -> Option<Cell> {
        self.key.filter(|k| k.floor == floor).map(|k| k.cell)
    }

    /// The wired ladder pairs.
    pub fn ladders(&self) -> &[LadderPair] {
        &self.ladders
    }

    /// Target floor for climbing up from `cell` on `floor`.
    pub fn ladder_up_target(&self, floor: usize, cell: Cell) -> Option<usize> {
        self.ladders
            .iter()
            .find(|pair| pair.lower == floor && pair.cell == cell)
            .map(|pair| pair.lower + 1)
    }

    /// Target floor for climbing down from `cell` on `floor`.
    pub fn ladder_down_target(&self, floor: usize, cell: Cell) -> Option<usize> {
        self.ladders
            .iter()
            .find(|pair| pair.lower + 1 == floor && pair.cell == cell)
            .map(|pair| pair.lower)
    }
}

#[cfg(test)]
impl LevelSet {
    /// Assembles a level from explicit parts, bypassing generation.
    pub(crate) fn from_parts(
        floors: Vec<GridMaze>,
        ladders: Vec<LadderPair>,
        start: Cell,
        exit: Cell,
        key: Option<KeyItem>,
    ) -> Self {
        Self {
            floors,
            ladders,
            start,
            exit,
            key,
        }
    }
}
