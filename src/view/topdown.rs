//! Top-down views: the full-screen map swapped in with the view toggle, and
//! the small corner minimap overlaid on the corridor.

use crate::game::PoseSnapshot;
use crate::maze::{Cell, CellKind, GridMaze};
use crate::view::draw::{
    Color, DrawList, EXIT_RED, FACING_BLUE, FACING_YELLOW, JOINT, KEY_GOLD, LADDER_DARK,
    LADDER_WOOD, MAP_OPEN, MAP_WALL, PLAYER_GREEN, PLAYER_YELLOW, TRAIL_GREEN,
};

/// Cell size of the full-screen map, in pixels.
pub const TOPDOWN_CELL: f32 = 28.0;
/// Cell size of the corner minimap, in pixels.
pub const MINIMAP_CELL: f32 = 8.0;
/// Top-left corner of the minimap on screen.
pub const MINIMAP_ORIGIN: [f32; 2] = [10.0, 10.0];

fn map_fill(kind: CellKind) -> Color {
    match kind {
        CellKind::Wall => MAP_WALL,
        CellKind::Start => TRAIL_GREEN,
        CellKind::Exit => EXIT_RED,
        CellKind::LadderUp => LADDER_WOOD,
        CellKind::LadderDown => LADDER_DARK,
        CellKind::Passage => MAP_OPEN,
    }
}

/// The minimap collapses the trail marker into plain open cells.
fn minimap_fill(kind: CellKind) -> Color {
    match kind {
        CellKind::Wall => MAP_WALL,
        CellKind::Exit => EXIT_RED,
        CellKind::LadderUp => LADDER_WOOD,
        CellKind::LadderDown => LADDER_DARK,
        CellKind::Passage | CellKind::Start => MAP_OPEN,
    }
}

/// Full-screen map of the active floor, centered in the viewport: cell
/// fills, grid outlines, the key, and the player disc with its facing tick.
pub fn topdown_view(
    maze: &GridMaze,
    pose: &PoseSnapshot,
    key_cell: Option<Cell>,
    width: f32,
    height: f32,
) -> DrawList {
    let mut list = DrawList::new();
    let cell = TOPDOWN_CELL;
    let map_w = maze.cols() as f32 * cell;
    let map_h = maze.rows() as f32 * cell;
    let ox = (width - map_w) / 2.0;
    let oy = (height - map_h) / 2.0;

    for (c, kind) in maze.iter_cells() {
        let x = ox + c.col as f32 * cell;
        let y = oy + c.row as f32 * cell;
        list.quad(
            [[x, y], [x + cell, y], [x + cell, y + cell], [x, y + cell]],
            map_fill(kind),
        );
    }
    for row in 0..=maze.rows() {
        let y = oy + row as f32 * cell;
        list.line([ox, y], [ox + map_w, y], JOINT, 1.0);
    }
    for col in 0..=maze.cols() {
        let x = ox + col as f32 * cell;
        list.line([x, oy], [x, oy + map_h], JOINT, 1.0);
    }

    if let Some(key) = key_cell {
        list.disc(
            [
                ox + (key.col as f32 + 0.5) * cell,
                oy + (key.row as f32 + 0.5) * cell,
            ],
            cell * 0.22,
            KEY_GOLD,
        );
    }

    let px = ox + (pose.col + 0.5) * cell;
    let py = oy + (pose.row + 0.5) * cell;
    list.disc([px, py], cell / 4.0, PLAYER_YELLOW);
    let [dr, dc] = pose.facing.vector();
    list.line(
        [px, py],
        [px + dc as f32 * cell, py + dr as f32 * cell],
        FACING_BLUE,
        1.0,
    );

    list
}

/// Small always-on-top map in the screen corner. No outlines, just fills
/// with the player disc and facing tick.
pub fn minimap_overlay(maze: &GridMaze, pose: &PoseSnapshot, key_cell: Option<Cell>) -> DrawList {
    let mut list = DrawList::new();
    let cell = MINIMAP_CELL;
    let [ox, oy] = MINIMAP_ORIGIN;

    for (c, kind) in maze.iter_cells() {
        let x = ox + c.col as f32 * cell;
        let y = oy + c.row as f32 * cell;
        list.quad(
            [[x, y], [x + cell, y], [x + cell, y + cell], [x, y + cell]],
            minimap_fill(kind),
        );
    }

    if let Some(key) = key_cell {
        list.disc(
            [
                ox + (key.col as f32 + 0.5) * cell,
                oy + (key.row as f32 + 0.5) * cell,
            ],
            cell * 0.3,
            KEY_GOLD,
        );
    }

    let px = ox + (pose.col + 0.5) * cell;
    let py = oy + (pose.row + 0.5) * cell;
    list.disc([px, py], cell / 2.0, PLAYER_GREEN);
    let [dr, dc] = pose.facing.vector();
    list.line(
        [px, py],
        [px + dc as f32 * cell, py + dr as f32 * cell],
        FACING_YELLOW,
        1.0,
    );

    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::Direction;
    use crate::maze::grid::parse_grid;
    use crate::view::draw::DrawCmd;

    const W: f32 = 1360.0;
    const H: f32 = 768.0;

    fn pose(row: f32, col: f32, facing: Direction) -> PoseSnapshot {
        PoseSnapshot {
            floor: 0,
            row,
            col,
            facing,
            animating: false,
        }
    }

    fn fixture() -> GridMaze {
        parse_grid(&[
            "#E###", //
            "#  U#", //
            "# ###", //
            "#O D#", //
            "#####",
        ])
    }

    fn quads_with(list: &DrawList, color: Color) -> usize {
        list.cmds()
            .iter()
            .filter(|cmd| {
                matches!(cmd, DrawCmd::Poly { points, color: c } if points.len() == 4 && *c == color)
            })
            .count()
    }

    fn poly_centroid(points: &[[f32; 2]]) -> [f32; 2] {
        let n = points.len() as f32;
        let (sx, sy) = points
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p[0], sy + p[1]));
        [sx / n, sy / n]
    }

    #[test]
    fn map_paints_one_fill_per_cell() {
        let maze = fixture();
        let list = topdown_view(&maze, &pose(3.0, 1.0, Direction::Up), None, W, H);
        let fills: usize = list
            .cmds()
            .iter()
            .filter(|cmd| matches!(cmd, DrawCmd::Poly { points, .. } if points.len() == 4))
            .count();
        assert_eq!(fills, 25);
        assert_eq!(quads_with(&list, TRAIL_GREEN), 1);
        assert_eq!(quads_with(&list, EXIT_RED), 1);
        assert_eq!(quads_with(&list, LADDER_WOOD), 1);
        assert_eq!(quads_with(&list, LADDER_DARK), 1);
    }

    #[test]
    fn map_outlines_every_grid_line() {
        let maze = fixture();
        let list = topdown_view(&maze, &pose(3.0, 1.0, Direction::Up), None, W, H);
        let outlines = list
            .cmds()
            .iter()
            .filter(|cmd| matches!(cmd, DrawCmd::Line { color, .. } if *color == JOINT))
            .count();
        // Six horizontal and six vertical lines for a 5x5 grid.
        assert_eq!(outlines, 12);
    }

    #[test]
    fn player_disc_tracks_the_interpolated_pose() {
        let maze = fixture();
        let snapshot = pose(2.5, 1.0, Direction::Up);
        let list = topdown_view(&maze, &snapshot, None, W, H);

        let ox = (W - 5.0 * TOPDOWN_CELL) / 2.0;
        let oy = (H - 5.0 * TOPDOWN_CELL) / 2.0;
        let expected = [
            ox + 1.5 * TOPDOWN_CELL,
            oy + 3.0 * TOPDOWN_CELL,
        ];
        let disc = list
            .cmds()
            .iter()
            .find_map(|cmd| match cmd {
                DrawCmd::Poly { points, color } if *color == PLAYER_YELLOW => Some(points),
                _ => None,
            })
            .expect("player disc missing");
        let centroid = poly_centroid(disc);
        assert!((centroid[0] - expected[0]).abs() < 0.1);
        assert!((centroid[1] - expected[1]).abs() < 0.1);
    }

    #[test]
    fn facing_tick_points_along_the_facing() {
        let maze = fixture();
        let list = topdown_view(&maze, &pose(3.0, 1.0, Direction::Right), None, W, H);
        let (from, to) = list
            .cmds()
            .iter()
            .find_map(|cmd| match cmd {
                DrawCmd::Line { from, to, color, .. } if *color == FACING_BLUE => {
                    Some((*from, *to))
                }
                _ => None,
            })
            .expect("facing tick missing");
        assert!((to[0] - from[0] - TOPDOWN_CELL).abs() < 1e-3);
        assert!((to[1] - from[1]).abs() < 1e-3);
    }

    #[test]
    fn key_disc_appears_only_when_present() {
        let maze = fixture();
        let with_key = topdown_view(
            &maze,
            &pose(3.0, 1.0, Direction::Up),
            Some(Cell::new(1, 2)),
            W,
            H,
        );
        let without = topdown_view(&maze, &pose(3.0, 1.0, Direction::Up), None, W, H);
        let golds = |list: &DrawList| {
            list.cmds()
                .iter()
                .filter(|cmd| matches!(cmd, DrawCmd::Poly { color, .. } if *color == KEY_GOLD))
                .count()
        };
        assert_eq!(golds(&with_key), 1);
        assert_eq!(golds(&without), 0);
    }

    #[test]
    fn minimap_sits_at_its_corner_origin() {
        let maze = fixture();
        let list = minimap_overlay(&maze, &pose(3.0, 1.0, Direction::Up), None);
        let DrawCmd::Poly { points, .. } = &list.cmds()[0] else {
            panic!("expected a cell fill first");
        };
        assert_eq!(points[0], MINIMAP_ORIGIN);

        // The trail marker is indistinguishable from open floor here.
        assert_eq!(quads_with(&list, TRAIL_GREEN), 0);
        assert_eq!(quads_with(&list, MAP_OPEN), 5);
    }

    #[test]
    fn minimap_player_disc_spans_its_cell() {
        let maze = fixture();
        let list = minimap_overlay(&maze, &pose(3.0, 1.0, Direction::Up), None);
        let disc = list
            .cmds()
            .iter()
            .find_map(|cmd| match cmd {
                DrawCmd::Poly { points, color } if *color == PLAYER_GREEN => Some(points),
                _ => None,
            })
            .expect("player disc missing");
        let centroid = poly_centroid(disc);
        let expected = [
            MINIMAP_ORIGIN[0] + 1.5 * MINIMAP_CELL,
            MINIMAP_ORIGIN[1] + 3.5 * MINIMAP_CELL,
        ];
        assert!((centroid[0] - expected[0]).abs() < 0.1);
        assert!((centroid[1] - expected[1]).abs() < 0.1);
        // Radius covers the whole cell.
        let r = ((disc[0][0] - centroid[0]).powi(2) + (disc[0][1] - centroid[1]).powi(2)).sqrt();
        assert!((r - MINIMAP_CELL / 2.0).abs() < 0.1);
    }
}
