//! Grid data model for a single floor: cell kinds, coordinates, and the
//! facing-direction table shared by movement and projection.

/// What a single grid cell holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    /// Solid cell, never enterable.
    Wall,
    /// Open corridor cell.
    Passage,
    /// Trail marker left on vacated cells; also the initial player cell.
    Start,
    /// Goal cell on the outer border of the top floor.
    Exit,
    /// Cell carrying a ladder to the floor above.
    LadderUp,
    /// Cell carrying a ladder to the floor below.
    LadderDown,
}

impl CellKind {
    /// Kinds that player movement must never overwrite.
    pub fn is_protected(self) -> bool {
        matches!(
            self,
            CellKind::Exit | CellKind::LadderUp | CellKind::LadderDown
        )
    }

    /// True for any kind the player may stand on.
    pub fn is_open(self) -> bool {
        self != CellKind::Wall
    }
}

/// A position in the maze grid.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// The row index of the cell.
    pub row: usize,
    /// The column index of the cell.
    pub col: usize,
}

impl Cell {
    /// Creates a new cell at the given position.
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Row/column deltas for [`Direction::Up`], `Right`, `Down`, `Left`, in that
/// order. Index with [`Direction::index`].
pub const DIRECTIONS: [[i64; 2]; 4] = [[-1, 0], [0, 1], [1, 0], [0, -1]];

/// One of the four cardinal facings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward decreasing rows.
    Up,
    /// Toward increasing columns.
    Right,
    /// Toward increasing rows.
    Down,
    /// Toward decreasing columns.
    Left,
}

impl Direction {
    /// Index into [`DIRECTIONS`].
    pub fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Right => 1,
            Direction::Down => 2,
            Direction::Left => 3,
        }
    }

    fn from_index(index: usize) -> Self {
        match index % 4 {
            0 => Direction::Up,
            1 => Direction::Right,
            2 => Direction::Down,
            _ => Direction::Left,
        }
    }

    /// `(row_delta, col_delta)` for one step in this direction.
    pub fn vector(self) -> [i64; 2] {
        DIRECTIONS[self.index()]
    }

    /// Facing after a quarter turn clockwise.
    pub fn rotated_cw(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Facing after a quarter turn counter-clockwise.
    pub fn rotated_ccw(self) -> Self {
        Self::from_index(self.index() + 3)
    }

    /// `(row_delta, col_delta)` one step to the left of this facing.
    pub fn left_vector(self) -> [i64; 2] {
        let [dr, dc] = self.vector();
        [-dc, dr]
    }
}

/// A rectangular grid of [`CellKind`]s making up one floor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridMaze {
    rows: usize,
    cols: usize,
    cells: Vec<CellKind>,
}

impl GridMaze {
    /// Creates a grid filled entirely with walls.
    pub fn filled(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![CellKind::Wall; rows * cols],
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The kind at `cell`. Panics when out of bounds; gameplay code reaches
    /// bounds-checked cells only.
    pub fn kind(&self, cell: Cell) -> CellKind {
        self.cells[cell.row * self.cols + cell.col]
    }

    /// Overwrites the kind at `cell`.
    pub fn set_kind(&mut self, cell: Cell, kind: CellKind) {
        self.cells[cell.row * self.cols + cell.col] = kind;
    }

    /// Bounds-tolerant lookup used by movement and wall sampling. Signed
    /// coordinates outside the grid return `None`.
    pub fn kind_at(&self, row: i64, col: i64) -> Option<CellKind> {
        if row < 0 || col < 0 || row >= self.rows as i64 || col >= self.cols as i64 {
            return None;
        }
        Some(self.cells[row as usize * self.cols + col as usize])
    }

    /// True when the signed coordinate lies inside the grid.
    pub fn contains(&self, row: i64, col: i64) -> bool {
        self.kind_at(row, col).is_some()
    }

    /// Iterates every cell with its kind, row-major.
    pub fn iter_cells(&self) -> impl Iterator<Item = (Cell, CellKind)> + '_ {
        self.cells.iter().enumerate().map(|(i, &kind)| {
            let cell = Cell::new(i / self.cols, i % self.cols);
            (cell, kind)
        })
    }

    /// All cells currently holding [`CellKind::Passage`]. Marker kinds such as
    /// start, exit, and ladders are excluded by construction.
    pub fn passage_cells(&self) -> Vec<Cell> {
        self.iter_cells()
            .filter(|&(_, kind)| kind == CellKind::Passage)
            .map(|(cell, _)| cell)
            .collect()
    }
}

/// Builds a grid from ascii rows: `#` wall, space passage, `O` start, `E`
/// exit, `U` up-ladder, `D` down-ladder.
#[cfg(test)]
pub(crate) fn parse_grid(rows: &[&str]) -> GridMaze {
    let height = rows.len();
    let width = rows[0].len();
    let mut maze = GridMaze::filled(height, width);
    for (row, line) in rows.iter().enumerate() {
        assert_eq!(line.len(), width, "ragged ascii grid");
        for (col, ch) in line.chars().enumerate() {
            let kind = match ch {
                '#' => CellKind::Wall,
                ' ' => CellKind::Passage,
                'O' => CellKind::Start,
                'E' => CellKind::Exit,
                'U' => CellKind::LadderUp,
                'D' => CellKind::LadderDown,
                other => panic!("unknown grid char {other:?}"),
            };
            maze.set_kind(Cell::new(row, col), kind);
        }
    }
    maze
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotations_cover_all_facings() {
        let mut facing = Direction::Up;
        for expected in [
            Direction::Right,
            Direction::Down,
            Direction::Left,
            Direction::Up,
        ] {
            facing = facing.rotated_cw();
            assert_eq!(facing, expected);
        }
        assert_eq!(Direction::Up.rotated_ccw(), Direction::Left);
        assert_eq!(Direction::Left.rotated_ccw(), Direction::Down);
    }

    #[test]
    fn rotation_pairs_cancel() {
        for facing in [
            Direction::Up,
            Direction::Right,
            Direction::Down,
            Direction::Left,
        ] {
            assert_eq!(facing.rotated_cw().rotated_ccw(), facing);
        }
    }

    #[test]
    fn left_vector_is_perpendicular() {
        for facing in [
            Direction::Up,
            Direction::Right,
            Direction::Down,
            Direction::Left,
        ] {
            let [dr, dc] = facing.vector();
            let [lr, lc] = facing.left_vector();
            assert_eq!(dr * lr + dc * lc, 0, "{facing:?} left vector not perpendicular");
        }
        // Facing up, left is toward decreasing columns.
        assert_eq!(Direction::Up.left_vector(), [0, -1]);
    }

    #[test]
    fn out_of_bounds_lookup_is_none() {
        let maze = GridMaze::filled(5, 7);
        assert_eq!(maze.kind_at(-1, 0), None);
        assert_eq!(maze.kind_at(0, 7), None);
        assert_eq!(maze.kind_at(5, 0), None);
        assert_eq!(maze.kind_at(2, 3), Some(CellKind::Wall));
    }

    #[test]
    fn protected_kinds_survive_overwrites() {
        assert!(CellKind::Exit.is_protected());
        assert!(CellKind::LadderUp.is_protected());
        assert!(CellKind::LadderDown.is_protected());
        assert!(!CellKind::Passage.is_protected());
        assert!(!CellKind::Start.is_protected());
    }

    #[test]
    fn passage_cells_skip_markers() {
        let mut maze = GridMaze::filled(3, 3);
        maze.set_kind(Cell::new(1, 1), CellKind::Passage);
        maze.set_kind(Cell::new(1, 2), CellKind::Start);
        maze.set_kind(Cell::new(0, 1), CellKind::Exit);
        assert_eq!(maze.passage_cells(), vec![Cell::new(1, 1)]);
    }
}
