//! Flat-colored draw primitives shared by the corridor and map views.
//!
//! View builders emit a [`DrawList`] of screen-space commands; the renderer
//! turns polygons and lines into triangles and hands labels to the text
//! renderer. Nothing here touches the GPU.

/// RGBA color with `0.0..=1.0` components.
pub type Color = [f32; 4];

/// Opaque color from 8-bit channels.
pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
}

/// Replaces the alpha channel.
pub const fn with_alpha(color: Color, alpha: f32) -> Color {
    [color[0], color[1], color[2], alpha]
}

/// Ceiling fill and doorway ceiling wedges.
pub const CEILING: Color = rgb(255, 255, 255);
/// World floor fill and doorway floor wedges.
pub const FLOOR: Color = rgb(150, 120, 80);
/// Doorway recesses and corridor-closing walls.
pub const DARK_FACE: Color = rgb(40, 40, 40);
/// Side wall faces.
pub const WALL_FACE: Color = rgb(80, 80, 80);
/// Seams between wall faces and openings.
pub const JOINT: Color = rgb(0, 0, 0);
/// Exit cells and the exit label.
pub const EXIT_RED: Color = rgb(255, 0, 0);
/// Wall cells on the maps.
pub const MAP_WALL: Color = rgb(64, 64, 64);
/// Open cells on the maps.
pub const MAP_OPEN: Color = rgb(192, 192, 192);
/// Trail marker on the full map.
pub const TRAIL_GREEN: Color = rgb(0, 255, 0);
/// Player disc on the full map.
pub const PLAYER_YELLOW: Color = rgb(255, 255, 0);
/// Player disc on the minimap.
pub const PLAYER_GREEN: Color = rgb(0, 255, 0);
/// Facing tick on the full map.
pub const FACING_BLUE: Color = rgb(0, 0, 255);
/// Facing tick on the minimap.
pub const FACING_YELLOW: Color = rgb(255, 255, 0);
/// The key, in both views.
pub const KEY_GOLD: Color = rgb(218, 165, 32);
/// Up-ladder rails and rungs.
pub const LADDER_WOOD: Color = rgb(156, 108, 60);
/// Down-ladder cells on the maps and hole outlines.
pub const LADDER_DARK: Color = rgb(104, 72, 40);
/// Floor opening above a down-ladder.
pub const HOLE_DARK: Color = rgb(15, 15, 15);

/// A single paint operation in screen pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// Convex polygon fill. Vertices wind clockwise in screen space.
    Poly {
        /// Outline vertices.
        points: Vec<[f32; 2]>,
        /// Fill color.
        color: Color,
    },
    /// Line segment, rendered as a thin quad.
    Line {
        /// Segment start.
        from: [f32; 2],
        /// Segment end.
        to: [f32; 2],
        /// Stroke color.
        color: Color,
        /// Stroke width in pixels.
        width: f32,
    },
    /// Text centered on a point.
    Label {
        /// Text to draw.
        text: String,
        /// Center of the rendered text.
        center: [f32; 2],
        /// Font size in pixels.
        size: f32,
        /// Text color.
        color: Color,
        /// Bold weight when set.
        bold: bool,
    },
}

/// Ordered list of paint operations for one view.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DrawList {
    cmds: Vec<DrawCmd>,
}

impl DrawList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// The commands in paint order.
    pub fn cmds(&self) -> &[DrawCmd] {
        &self.cmds
    }

    /// Number of queued commands.
    pub fn len(&self) -> usize {
        self.cmds.len()
    }

    /// True when nothing has been queued.
    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    /// Queues a four-vertex polygon.
    pub fn quad(&mut self, points: [[f32; 2]; 4], color: Color) {
        self.cmds.push(DrawCmd::Poly {
            points: points.to_vec(),
            color,
        });
    }

    /// Queues a triangle.
    pub fn tri(&mut self, points: [[f32; 2]; 3], color: Color) {
        self.cmds.push(DrawCmd::Poly {
            points: points.to_vec(),
            color,
        });
    }

    /// Queues an arbitrary convex polygon.
    pub fn poly(&mut self, points: Vec<[f32; 2]>, color: Color) {
        self.cmds.push(DrawCmd::Poly { points, color });
    }

    /// Queues a disc as a 16-gon.
    pub fn disc(&mut self, center: [f32; 2], radius: f32, color: Color) {
        let points = (0..16)
            .map(|i| {
                let angle = std::f32::consts::TAU * i as f32 / 16.0;
                [
                    center[0] + radius * angle.cos(),
                    center[1] + radius * angle.sin(),
                ]
            })
            .collect();
        self.cmds.push(DrawCmd::Poly { points, color });
    }

    /// Queues a line segment.
    pub fn line(&mut self, from: [f32; 2], to: [f32; 2], color: Color, width: f32) {
        self.cmds.push(DrawCmd::Line {
            from,
            to,
            color,
            width,
        });
    }

    /// Queues a centered label.
    pub fn label(
        &mut self,
        text: impl Into<String>,
        center: [f32; 2],
        size: f32,
        color: Color,
        bold: bool,
    ) {
        self.cmds.push(DrawCmd::Label {
            text: text.into(),
            center,
            size,
            color,
            bold,
        });
    }

    /// Appends all commands from `other`.
    pub fn extend(&mut self, other: DrawList) {
        self.cmds.extend(other.cmds);
    }
}
