//! First-person corridor projection.
//!
//! Walks cells ahead of the interpolated pose and emits nested wall slices:
//! per depth a ceiling band and floor band, then a wall face or doorway
//! recess on each side, stopping at the first blocking cell. Key and ladder
//! overlays are collected during the walk and painted after the wall
//! geometry so they sit on top of it.

use crate::game::PoseSnapshot;
use crate::maze::{Cell, CellKind, GridMaze};
use crate::view::draw::{
    CEILING, Color, DARK_FACE, DrawList, EXIT_RED, FLOOR, HOLE_DARK, JOINT, KEY_GOLD, LADDER_DARK,
    LADDER_WOOD, WALL_FACE, with_alpha,
};

/// How many cells ahead the projector looks.
pub const VIEW_DEPTH: i32 = 10;

/// Per-depth darkening of wall fills, in 8-bit channel units.
const SHADE_STEP: f32 = 4.0 / 255.0;
/// Darkest any shaded channel is allowed to get.
const SHADE_FLOOR: f32 = 30.0 / 255.0;

/// Darkens wall fills with distance.
fn shade(color: Color, depth: i32) -> Color {
    let drop = SHADE_STEP * (depth - 1) as f32;
    [
        (color[0] - drop).max(SHADE_FLOOR),
        (color[1] - drop).max(SHADE_FLOOR),
        (color[2] - drop).max(SHADE_FLOOR),
        color[3],
    ]
}

/// Rounds with halves toward positive infinity, so a glide at exactly half a
/// cell samples the same cell from either side.
fn round_half_up(x: f32) -> i64 {
    (x + 0.5).floor() as i64
}

/// Screen-space geometry of one corridor slice and the opening behind it.
#[derive(Debug, Clone, Copy)]
struct SliceFrame {
    depth: i32,
    left: f32,
    right: f32,
    top: f32,
    bottom: f32,
    left_next: f32,
    right_next: f32,
    top_next: f32,
    bottom_next: f32,
}

impl SliceFrame {
    fn at(depth: i32, w: f32, h: f32) -> Self {
        let half = |d: i32| (w / 2.0) * (1.0 - (d as f32 - 1.0) / VIEW_DEPTH as f32) * 0.7;
        let top = |d: i32| h * 0.15 + h * 0.35 * (d as f32 - 1.0) / VIEW_DEPTH as f32;
        let cx = w / 2.0;
        Self {
            depth,
            left: cx - half(depth),
            right: cx + half(depth),
            top: top(depth),
            bottom: h - top(depth),
            left_next: cx - half(depth + 1),
            right_next: cx + half(depth + 1),
            top_next: top(depth + 1),
            bottom_next: h - top(depth + 1),
        }
    }
}

/// Grid sampling relative to the interpolated pose. `side` counts cells to
/// the left of the facing; negative values sample to the right.
struct Sampler<'a> {
    maze: &'a GridMaze,
    row: f32,
    col: f32,
    dir: [f32; 2],
    left: [f32; 2],
}

impl<'a> Sampler<'a> {
    fn new(maze: &'a GridMaze, pose: &PoseSnapshot) -> Self {
        let [dr, dc] = pose.facing.vector();
        let [lr, lc] = pose.facing.left_vector();
        Self {
            maze,
            row: pose.row,
            col: pose.col,
            dir: [dr as f32, dc as f32],
            left: [lr as f32, lc as f32],
        }
    }

    fn cell(&self, forward: i32, side: i32) -> (i64, i64) {
        let f = forward as f32;
        let s = side as f32;
        (
            round_half_up(self.row + self.dir[0] * f + self.left[0] * s),
            round_half_up(self.col + self.dir[1] * f + self.left[1] * s),
        )
    }

    fn kind(&self, forward: i32, side: i32) -> Option<CellKind> {
        let (row, col) = self.cell(forward, side);
        self.maze.kind_at(row, col)
    }

    /// Outside the grid counts as wall.
    fn is_wall(&self, forward: i32, side: i32) -> bool {
        matches!(self.kind(forward, side), None | Some(CellKind::Wall))
    }
}

/// Projects the corridor ahead of `pose` into a draw list for a `width` by
/// `height` viewport. `key_cell` is the uncollected key on the active floor,
/// and `exit_locked` adds the locked tag under the exit label.
pub fn project(
    maze: &GridMaze,
    pose: &PoseSnapshot,
    key_cell: Option<Cell>,
    exit_locked: bool,
    width: f32,
    height: f32,
) -> DrawList {
    let mut list = DrawList::new();
    let (w, h) = (width, height);
    let sampler = Sampler::new(maze, pose);

    // Background halves: sky above, ground below.
    list.quad([[0.0, 0.0], [w, 0.0], [w, h / 2.0], [0.0, h / 2.0]], CEILING);
    list.quad([[0.0, h / 2.0], [w, h / 2.0], [w, h], [0.0, h]], FLOOR);

    paint_edge_doorways(&mut list, &sampler, w, h);

    let mut key_frame: Option<SliceFrame> = None;
    let mut ladder_frames: Vec<(SliceFrame, CellKind)> = Vec::new();

    for depth in 1..=VIEW_DEPTH {
        let f = SliceFrame::at(depth, w, h);
        let mid = (f.top + f.bottom) / 2.0;
        let mid_next = (f.top_next + f.bottom_next) / 2.0;

        // Ceiling and floor bands converging toward the vanishing line.
        list.quad(
            [
                [f.left, f.top],
                [f.right, f.top],
                [f.right_next, f.top_next],
                [f.left_next, f.top_next],
            ],
            CEILING,
        );
        list.quad(
            [
                [f.left, mid],
                [f.right, mid],
                [f.right_next, mid_next],
                [f.left_next, mid_next],
            ],
            DARK_FACE,
        );

        if depth == 1 {
            // Walls flanking the player's own cell run off the screen edges.
            if sampler.is_wall(0, 1) {
                list.quad(
                    [[0.0, 0.0], [f.left, f.top], [f.left, f.bottom], [0.0, h]],
                    WALL_FACE,
                );
            }
            if sampler.is_wall(0, -1) {
                list.quad(
                    [[f.right, f.top], [w, 0.0], [w, h], [f.right, f.bottom]],
                    WALL_FACE,
                );
            }
        }

        if sampler.is_wall(depth, 1) {
            list.quad(
                [
                    [f.left, f.top],
                    [f.left, f.bottom],
                    [f.left_next, f.bottom_next],
                    [f.left_next, f.top_next],
                ],
                shade(WALL_FACE, depth),
            );
        } else {
            paint_left_doorway(&mut list, &f);
        }
        if sampler.is_wall(depth, -1) {
            list.quad(
                [
                    [f.right, f.top],
                    [f.right, f.bottom],
                    [f.right_next, f.bottom_next],
                    [f.right_next, f.top_next],
                ],
                shade(WALL_FACE, depth),
            );
        } else {
            paint_right_doorway(&mut list, &f);
        }

        let front = sampler.kind(depth, 0);
        if let Some(kind @ (CellKind::LadderUp | CellKind::LadderDown)) = front {
            ladder_frames.push((f, kind));
        }
        if let Some(key) = key_cell {
            if sampler.cell(depth, 0) == (key.row as i64, key.col as i64) {
                key_frame = Some(f);
            }
        }

        let blocking = matches!(front, None | Some(CellKind::Wall));
        let exit_ahead = front == Some(CellKind::Exit);
        if blocking || exit_ahead {
            list.quad(
                [
                    [f.left_next, f.top_next],
                    [f.right_next, f.top_next],
                    [f.right_next, f.bottom_next],
                    [f.left_next, f.bottom_next],
                ],
                shade(DARK_FACE, depth),
            );
            if exit_ahead {
                paint_exit_label(&mut list, &f, exit_locked);
            }
            break;
        }
    }

    if let Some(frame) = key_frame {
        let behind_ladder = ladder_frames.iter().any(|(lf, _)| lf.depth <= frame.depth);
        paint_key(&mut list, &frame, behind_ladder);
    }
    for (frame, kind) in &ladder_frames {
        match kind {
            CellKind::LadderUp => paint_ladder_up(&mut list, frame),
            CellKind::LadderDown => paint_ladder_down(&mut list, frame),
            _ => {}
        }
    }

    list
}

/// Openings beside the player's own cell, flaring out to the screen edges.
fn paint_edge_doorways(list: &mut DrawList, sampler: &Sampler, w: f32, h: f32) {
    let first = SliceFrame::at(1, w, h);
    let (left, right) = (first.left, first.right);
    let (top, bottom) = (first.top, first.bottom);

    if !sampler.is_wall(0, 1) {
        list.quad(
            [[0.0, 0.0], [left, top], [left, bottom], [0.0, h]],
            DARK_FACE,
        );
        list.tri([[0.0, 0.0], [left, top], [0.0, top]], CEILING);
        list.tri([[0.0, h], [left, bottom], [0.0, bottom]], FLOOR);
        list.line([left, top], [0.0, top], JOINT, 1.0);
        list.line([left, bottom], [0.0, bottom], JOINT, 1.0);
    }
    if !sampler.is_wall(0, -1) {
        list.quad([[right, top], [w, 0.0], [w, h], [right, bottom]], DARK_FACE);
        list.tri([[right, top], [w, 0.0], [w, top]], CEILING);
        list.tri([[right, bottom], [w, h], [w, bottom]], FLOOR);
        list.line([right, top], [w, top], JOINT, 1.0);
        list.line([right, bottom], [w, bottom], JOINT, 1.0);
    }
}

/// Recessed opening in the left wall: dark fill with ceiling and floor
/// wedges, seamed where they meet the opening.
fn paint_left_doorway(list: &mut DrawList, f: &SliceFrame) {
    list.quad(
        [
            [f.left, f.top],
            [f.left, f.bottom],
            [f.left_next, f.bottom_next],
            [f.left_next, f.top_next],
        ],
        shade(DARK_FACE, f.depth),
    );
    list.tri(
        [[f.left, f.top_next], [f.left_next, f.top_next], [f.left, f.top]],
        CEILING,
    );
    list.tri(
        [
            [f.left, f.bottom_next],
            [f.left_next, f.bottom_next],
            [f.left, f.bottom],
        ],
        FLOOR,
    );
    list.line(
        [f.left, f.top_next],
        [f.left_next, f.top_next],
        JOINT,
        1.0,
    );
    list.line(
        [f.left, f.bottom_next],
        [f.left_next, f.bottom_next],
        JOINT,
        1.0,
    );
}

fn paint_right_doorway(list: &mut DrawList, f: &SliceFrame) {
    list.quad(
        [
            [f.right, f.top],
            [f.right, f.bottom],
            [f.right_next, f.bottom_next],
            [f.right_next, f.top_next],
        ],
        shade(DARK_FACE, f.depth),
    );
    list.tri(
        [
            [f.right, f.top_next],
            [f.right_next, f.top_next],
            [f.right, f.top],
        ],
        CEILING,
    );
    list.tri(
        [
            [f.right, f.bottom_next],
            [f.right_next, f.bottom_next],
            [f.right, f.bottom],
        ],
        FLOOR,
    );
    list.line(
        [f.right, f.top_next],
        [f.right_next, f.top_next],
        JOINT,
        1.0,
    );
    list.line(
        [f.right, f.bottom_next],
        [f.right_next, f.bottom_next],
        JOINT,
        1.0,
    );
}

/// Red label centered on the closing wall, scaled with the remaining slice.
fn paint_exit_label(list: &mut DrawList, f: &SliceFrame, exit_locked: bool) {
    let center = [
        (f.left_next + f.right_next) / 2.0,
        (f.top_next + f.bottom_next) / 2.0,
    ];
    let size = ((f.right_next - f.left_next) * 0.4).max(12.0);
    list.label("Exit", center, size, EXIT_RED, true);
    if exit_locked {
        list.label(
            "locked",
            [center[0], center[1] + size * 0.75],
            (size * 0.45).max(9.0),
            EXIT_RED,
            false,
        );
    }
}

/// The key floating in its slice: a round bow, a shaft, and two teeth. Drawn
/// faded when a ladder stands in the same slice or nearer.
fn paint_key(list: &mut DrawList, f: &SliceFrame, behind_ladder: bool) {
    let alpha = if behind_ladder { 0.45 } else { 0.85 };
    let gold = with_alpha(KEY_GOLD, alpha);
    let slice_w = f.right_next - f.left_next;
    let slice_h = f.bottom_next - f.top_next;
    let cx = (f.left_next + f.right_next) / 2.0;
    let cy = (f.top_next + f.bottom_next) / 2.0 + slice_h * 0.08;

    let bow_r = (slice_w * 0.07).max(3.0);
    let shaft = (slice_w * 0.16).max(7.0);
    let girth = (bow_r * 0.45).max(1.5);
    let head = cx - shaft / 2.0;
    let tip = cx + shaft / 2.0 + bow_r;

    list.disc([head, cy], bow_r, gold);
    list.quad(
        [
            [head, cy - girth / 2.0],
            [tip, cy - girth / 2.0],
            [tip, cy + girth / 2.0],
            [head, cy + girth / 2.0],
        ],
        gold,
    );
    for frac in [0.78_f32, 1.0] {
        let x = head + (tip - head) * frac;
        list.quad(
            [
                [x - girth / 2.0, cy],
                [x + girth / 2.0, cy],
                [x + girth / 2.0, cy + bow_r * 0.9],
                [x - girth / 2.0, cy + bow_r * 0.9],
            ],
            gold,
        );
    }
}

/// Two rails and five rungs filling the slice opening.
fn paint_ladder_up(list: &mut DrawList, f: &SliceFrame) {
    let slice_w = f.right_next - f.left_next;
    let x_left = f.left_next + slice_w * 0.35;
    let x_right = f.left_next + slice_w * 0.65;
    let top = f.top_next + (f.bottom_next - f.top_next) * 0.12;
    let bottom = f.bottom_next;
    let rail = (slice_w * 0.03).max(2.0);

    list.line([x_left, top], [x_left, bottom], LADDER_WOOD, rail);
    list.line([x_right, top], [x_right, bottom], LADDER_WOOD, rail);
    for i in 0..5 {
        let y = top + (bottom - top) * (i as f32 + 0.5) / 5.0;
        list.line([x_left, y], [x_right, y], LADDER_WOOD, rail * 0.8);
    }
}

/// Dark floor opening ahead, wider toward the viewer.
fn paint_ladder_down(list: &mut DrawList, f: &SliceFrame) {
    let cx = (f.left_next + f.right_next) / 2.0;
    let far_half = (f.right_next - f.left_next) * 0.3;
    let near_half = (f.right - f.left) * 0.3;
    let far_y = f.bottom_next;
    let near_y = f.bottom;

    list.quad(
        [
            [cx - far_half, far_y],
            [cx + far_half, far_y],
            [cx + near_half, near_y],
            [cx - near_half, near_y],
        ],
        HOLE_DARK,
    );
    list.line([cx - far_half, far_y], [cx + far_half, far_y], LADDER_DARK, 2.0);
    list.line([cx + far_half, far_y], [cx + near_half, near_y], LADDER_DARK, 2.0);
    list.line([cx - far_half, far_y], [cx - near_half, near_y], LADDER_DARK, 2.0);
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

    /// Ceiling-colored quads minus the sky background half.
    fn slice_bands(list: &DrawList) -> usize {
        list.cmds()
            .iter()
            .filter(|cmd| {
                matches!(cmd, DrawCmd::Poly { points, color } if *color == CEILING && points.len() == 4)
            })
            .count()
            - 1
    }

    fn label_texts(list: &DrawList) -> Vec<String> {
        list.cmds()
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCmd::Label { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    fn poly_indices(list: &DrawList, pred: impl Fn(&Color) -> bool) -> Vec<usize> {
        list.cmds()
            .iter()
            .enumerate()
            .filter_map(|(i, cmd)| match cmd {
                DrawCmd::Poly { color, .. } if pred(color) => Some(i),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn rounds_halves_toward_positive_infinity() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(2.4), 2);
        assert_eq!(round_half_up(-0.5), 0);
        assert_eq!(round_half_up(-0.6), -1);
    }

    #[test]
    fn background_halves_open_the_list() {
        let maze = parse_grid(&["###", "#O#", "###"]);
        let list = project(&maze, &pose(1.0, 1.0, Direction::Up), None, false, W, H);
        let DrawCmd::Poly { color, .. } = &list.cmds()[0] else {
            panic!("expected the sky half first");
        };
        assert_eq!(*color, CEILING);
        let DrawCmd::Poly { color, .. } = &list.cmds()[1] else {
            panic!("expected the ground half second");
        };
        assert_eq!(*color, FLOOR);
    }

    #[test]
    fn corridor_paints_one_band_per_visible_cell() {
        let maze = parse_grid(&[
            "###", //
            "# #", //
            "# #", //
            "# #", //
            "#O#", //
            "###",
        ]);
        // Three open cells ahead, then the border wall.
        let list = project(&maze, &pose(4.0, 1.0, Direction::Up), None, false, W, H);
        assert_eq!(slice_bands(&list), 4);
        assert!(label_texts(&list).is_empty());
    }

    #[test]
    fn facing_a_wall_closes_at_depth_one() {
        let maze = parse_grid(&["###", "#O#", "###"]);
        let list = project(&maze, &pose(1.0, 1.0, Direction::Right), None, false, W, H);
        assert_eq!(slice_bands(&list), 1);

        let f = SliceFrame::at(1, W, H);
        let closing = vec![
            [f.left_next, f.top_next],
            [f.right_next, f.top_next],
            [f.right_next, f.bottom_next],
            [f.left_next, f.bottom_next],
        ];
        let found = list.cmds().iter().any(|cmd| {
            matches!(cmd, DrawCmd::Poly { points, color } if *points == closing && *color == shade(DARK_FACE, 1))
        });
        assert!(found, "closing wall quad missing");
    }

    #[test]
    fn view_depth_caps_the_walk() {
        let mut rows = vec!["###"];
        rows.extend(["# #"; 11]);
        rows.push("#O#");
        rows.push("###");
        let maze = parse_grid(&rows);
        // Eleven open cells ahead, but the walk stops after ten.
        let list = project(&maze, &pose(12.0, 1.0, Direction::Up), None, false, W, H);
        assert_eq!(slice_bands(&list), VIEW_DEPTH as usize);
        assert!(label_texts(&list).is_empty());
    }

    #[test]
    fn exit_ahead_gets_a_label() {
        let maze = parse_grid(&[
            "#E#", //
            "# #", //
            "# #", //
            "#O#", //
            "###",
        ]);
        let list = project(&maze, &pose(3.0, 1.0, Direction::Up), None, false, W, H);
        assert_eq!(slice_bands(&list), 3);
        assert_eq!(label_texts(&list), vec!["Exit"]);

        let locked = project(&maze, &pose(3.0, 1.0, Direction::Up), None, true, W, H);
        assert_eq!(label_texts(&locked), vec!["Exit", "locked"]);
    }

    #[test]
    fn exit_label_scales_with_the_slice_but_stays_readable() {
        let mut rows = vec!["#E#"];
        rows.extend(["# #"; 9]);
        rows.push("#O#");
        rows.push("###");
        let maze = parse_grid(&rows);
        // The exit sits ten cells out, where the slice has fully collapsed.
        let list = project(&maze, &pose(10.0, 1.0, Direction::Up), None, false, W, H);
        let size = list
            .cmds()
            .iter()
            .find_map(|cmd| match cmd {
                DrawCmd::Label { size, .. } => Some(*size),
                _ => None,
            })
            .unwrap();
        assert!((size - 12.0).abs() < 1e-3, "far label should clamp to 12, got {size}");
    }

    #[test]
    fn open_cells_beside_the_player_flare_to_the_screen_edges() {
        let maze = parse_grid(&[
            "#####", //
            "# O #", //
            "#####",
        ]);
        let list = project(&maze, &pose(1.0, 2.0, Direction::Up), None, false, W, H);
        let has_left_flare = list.cmds().iter().any(|cmd| {
            matches!(cmd, DrawCmd::Poly { points, color } if *color == DARK_FACE && points.contains(&[0.0, 0.0]))
        });
        let has_right_flare = list.cmds().iter().any(|cmd| {
            matches!(cmd, DrawCmd::Poly { points, color } if *color == DARK_FACE && points.contains(&[W, 0.0]))
        });
        assert!(has_left_flare);
        assert!(has_right_flare);
    }

    #[test]
    fn side_openings_paint_ceiling_wedges() {
        let maze = parse_grid(&[
            "#####", //
            "### #", //
            "#   #", //
            "###O#", //
            "#####",
        ]);
        let list = project(&maze, &pose(3.0, 3.0, Direction::Up), None, false, W, H);
        let wedges = list
            .cmds()
            .iter()
            .filter(|cmd| {
                matches!(cmd, DrawCmd::Poly { points, color } if *color == CEILING && points.len() == 3)
            })
            .count();
        assert!(wedges >= 1, "left doorway should add a ceiling wedge");
    }

    #[test]
    fn key_paints_after_the_walls() {
        let maze = parse_grid(&[
            "###", //
            "# #", //
            "# #", //
            "#O#", //
            "###",
        ]);
        let key = Some(Cell::new(2, 1));
        let list = project(&maze, &pose(3.0, 1.0, Direction::Up), key, true, W, H);

        let gold = poly_indices(&list, |c| c[..3] == KEY_GOLD[..3]);
        assert!(!gold.is_empty(), "key overlay missing");
        let walls = poly_indices(&list, |c| c[3] == 1.0);
        let last_wall = *walls.last().unwrap();
        assert!(
            gold.iter().all(|&i| i > last_wall),
            "key must paint over the wall pass"
        );
        // Undimmed key keeps its bright alpha.
        let DrawCmd::Poly { color, .. } = &list.cmds()[gold[0]] else {
            unreachable!()
        };
        assert!((color[3] - 0.85).abs() < 1e-3);
    }

    #[test]
    fn ladders_overlay_their_slices() {
        let up = parse_grid(&[
            "###", //
            "# #", //
            "#U#", //
            "#O#", //
            "###",
        ]);
        let list = project(&up, &pose(3.0, 1.0, Direction::Up), None, false, W, H);
        let rails = list
            .cmds()
            .iter()
            .filter(|cmd| matches!(cmd, DrawCmd::Line { color, .. } if *color == LADDER_WOOD))
            .count();
        assert_eq!(rails, 7, "two rails and five rungs");

        let down = parse_grid(&[
            "###", //
            "# #", //
            "#D#", //
            "#O#", //
            "###",
        ]);
        let list = project(&down, &pose(3.0, 1.0, Direction::Up), None, false, W, H);
        let holes = poly_indices(&list, |c| *c == HOLE_DARK);
        assert_eq!(holes.len(), 1, "down-ladder floor hole missing");
    }

    #[test]
    fn key_fades_behind_a_nearer_ladder() {
        let maze = parse_grid(&[
            "###", //
            "# #", //
            "#U#", //
            "#O#", //
            "###",
        ]);
        let key = Some(Cell::new(1, 1));
        let list = project(&maze, &pose(3.0, 1.0, Direction::Up), key, true, W, H);
        let gold = poly_indices(&list, |c| c[..3] == KEY_GOLD[..3]);
        assert!(!gold.is_empty());
        let DrawCmd::Poly { color, .. } = &list.cmds()[gold[0]] else {
            unreachable!()
        };
        assert!((color[3] - 0.45).abs() < 1e-3, "key behind a ladder fades");
    }

    #[test]
    fn sampling_follows_the_interpolated_pose() {
        let maze = parse_grid(&[
            "###", //
            "# #", //
            "# #", //
            "# #", //
            "#O#", //
            "###",
        ]);
        // Closer to row 3: the far wall sits three samples out.
        let early = project(&maze, &pose(3.4, 1.0, Direction::Up), None, false, W, H);
        assert_eq!(slice_bands(&early), 3);
        // Still closer to row 4: four samples until the wall.
        let late = project(&maze, &pose(3.9, 1.0, Direction::Up), None, false, W, H);
        assert_eq!(slice_bands(&late), 4);
    }
}
