//! Maze generation for a single floor.
//!
//! Uses iterative randomized depth-first backtracking over the odd-coordinate
//! lattice, producing a perfect maze. An optional second phase knocks out
//! candidate walls to introduce loops, and a final phase picks the entrance
//! and exit on opposite sides of the grid.

use crate::maze::grid::{Cell, CellKind, GridMaze};
use rand::Rng;

/// Carving steps between lattice cells, two apart in each direction.
const CARVE_STEPS: [[i64; 2]; 4] = [[-2, 0], [2, 0], [0, -2], [0, 2]];

/// A freshly generated floor together with its chosen entry and exit.
#[derive(Debug, Clone)]
pub struct GeneratedMaze {
    /// The carved grid.
    pub maze: GridMaze,
    /// Interior entrance cell, marked [`CellKind::Start`].
    pub start: Cell,
    /// The cell marked [`CellKind::Exit`], on the outer border except in the
    /// degenerate fallback where no border-adjacent candidate exists.
    pub exit: Cell,
}

/// Generates one floor.
///
/// Dimensions are clamped to at least 3 and rounded up to odd so the lattice
/// carving lines up with the border walls. When `allow_loops` is set, each
/// wall separating two parallel passages is independently removed with
/// probability `loop_chance`.
pub fn generate<R: Rng>(
    rows: usize,
    cols: usize,
    allow_loops: bool,
    loop_chance: f64,
    rng: &mut R,
) -> GeneratedMaze {
    let (rows, cols) = clamp_dimensions(rows, cols);
    let mut maze = GridMaze::filled(rows, cols);

    carve_passages(&mut maze, rng);
    if allow_loops && loop_chance > 0.0 {
        inject_loops(&mut maze, loop_chance, rng);
    }
    let (start, exit) = place_start_and_exit(&mut maze, rng);

    GeneratedMaze { maze, start, exit }
}

fn clamp_dimensions(rows: usize, cols: usize) -> (usize, usize) {
    let mut rows = rows.max(3);
    let mut cols = cols.max(3);
    if rows % 2 == 0 {
        rows += 1;
    }
    if cols % 2 == 0 {
        cols += 1;
    }
    (rows, cols)
}

/// Depth-first backtracking carve over the odd lattice, seeded at (1, 1).
fn carve_passages<R: Rng>(maze: &mut GridMaze, rng: &mut R) {
    let rows = maze.rows() as i64;
    let cols = maze.cols() as i64;
    let mut visited = vec![false; maze.rows() * maze.cols()];

    let seed = Cell::new(1, 1);
    maze.set_kind(seed, CellKind::Passage);
    visited[seed.row * maze.cols() + seed.col] = true;

    let mut stack = vec![seed];
    while let Some(&current) = stack.last() {
        let mut neighbors = Vec::new();
        for step in CARVE_STEPS {
            let nr = current.row as i64 + step[0];
            let nc = current.col as i64 + step[1];
            if nr > 0
                && nr < rows - 1
                && nc > 0
                && nc < cols - 1
                && !visited[nr as usize * cols as usize + nc as usize]
            {
                neighbors.push(Cell::new(nr as usize, nc as usize));
            }
        }
        if neighbors.is_empty() {
            stack.pop();
            continue;
        }
        let next = neighbors[rng.gen_range(0..neighbors.len())];
        // Open the wall midway between the two lattice cells, then the cell.
        let between = Cell::new(
            (current.row + next.row) / 2,
            (current.col + next.col) / 2,
        );
        maze.set_kind(between, CellKind::Passage);
        maze.set_kind(next, CellKind::Passage);
        visited[next.row * maze.cols() + next.col] = true;
        stack.push(next);
    }
}

/// Removes interior walls that separate two parallel passages, each with
/// independent probability `loop_chance`. Candidates are collected before any
/// removal so one opening cannot enable another in the same pass.
fn inject_loops<R: Rng>(maze: &mut GridMaze, loop_chance: f64, rng: &mut R) {
    let mut candidates = Vec::new();
    for row in 1..maze.rows() - 1 {
        for col in 1..maze.cols() - 1 {
            let cell = Cell::new(row, col);
            if maze.kind(cell) != CellKind::Wall {
                continue;
            }
            let open = |r: i64, c: i64| maze.kind_at(r, c) == Some(CellKind::Passage);
            let r = row as i64;
            let c = col as i64;
            let vertical_pair = open(r - 1, c) && open(r + 1, c);
            let horizontal_pair = open(r, c - 1) && open(r, c + 1);
            if vertical_pair || horizontal_pair {
                candidates.push(cell);
            }
        }
    }
    for cell in candidates {
        if rng.r#gen::<f64>() < loop_chance {
            maze.set_kind(cell, CellKind::Passage);
        }
    }
}

/// Picks the start and exit on opposite sides of the grid, marks them, and
/// opens the matching outer-border exit cell.
fn place_start_and_exit<R: Rng>(maze: &mut GridMaze, rng: &mut R) -> (Cell, Cell) {
    let rows = maze.rows();
    let cols = maze.cols();
    let choose_vertical = rng.gen_bool(0.5);

    let mut start_candidates = Vec::new();
    let mut exit_candidates = Vec::new();
    if choose_vertical {
        // Start along the bottom interior row, exit along the top.
        for col in (1..cols - 1).step_by(2) {
            if maze.kind(Cell::new(rows - 2, col)) == CellKind::Passage {
                start_candidates.push(Cell::new(rows - 2, col));
            }
            if maze.kind(Cell::new(1, col)) == CellKind::Passage {
                exit_candidates.push(Cell::new(1, col));
            }
        }
    } else {
        for row in (1..rows - 1).step_by(2) {
            if maze.kind(Cell::new(row, cols - 2)) == CellKind::Passage {
                start_candidates.push(Cell::new(row, cols - 2));
            }
            if maze.kind(Cell::new(row, 1)) == CellKind::Passage {
                exit_candidates.push(Cell::new(row, 1));
            }
        }
    }
    if start_candidates.is_empty() {
        start_candidates = lattice_passages(maze);
    }
    if exit_candidates.is_empty() {
        exit_candidates = lattice_passages(maze);
    }

    let start = start_candidates[rng.gen_range(0..start_candidates.len())];
    let mut exit = exit_candidates[rng.gen_range(0..exit_candidates.len())];
    if exit == start {
        if exit_candidates.len() > 1 {
            while exit == start {
                exit = exit_candidates[rng.gen_range(0..exit_candidates.len())];
            }
        } else if let Some(other) = lattice_passages(maze).into_iter().find(|&c| c != start) {
            exit = other;
        }
    }

    // Exit first: on a one-cell lattice the two coincide, and the start
    // marker must win.
    maze.set_kind(exit, CellKind::Passage);
    maze.set_kind(start, CellKind::Start);

    // Break through the outer border next to the exit cell.
    let border = if exit.row == 1 {
        Cell::new(0, exit.col)
    } else if exit.row == rows - 2 {
        Cell::new(rows - 1, exit.col)
    } else if exit.col == 1 {
        Cell::new(exit.row, 0)
    } else if exit.col == cols - 2 {
        Cell::new(exit.row, cols - 1)
    } else {
        exit
    };
    maze.set_kind(border, CellKind::Exit);

    (start, border)
}

/// Every odd-lattice passage cell, row-major. The carve visits all of them,
/// so this is never empty.
fn lattice_passages(maze: &GridMaze) -> Vec<Cell> {
    let mut cells = Vec::new();
    for row in (1..maze.rows() - 1).step_by(2) {
        for col in (1..maze.cols() - 1).step_by(2) {
            if maze.kind(Cell::new(row, col)) == CellKind::Passage {
                cells.push(Cell::new(row, col));
            }
        }
    }
    cells
}
