//! Scene assembly: routes view-layer draw lists into the GPU renderers.
//!
//! The view layer emits [`DrawList`]s that mix geometry and text. Each frame
//! the queue clears both renderers, then dispatches polygons and lines to the
//! shape batch and labels to the text renderer's per-frame namespace.

use glyphon::Weight;

use crate::renderer::shape::ShapeRenderer;
use crate::renderer::text::{TextRenderer, TextStyle};
use crate::view::{Color, DrawCmd, DrawList};

/// Converts a view-layer color (0.0-1.0 RGBA) to a glyphon color.
fn glyphon_color(color: Color) -> glyphon::Color {
    glyphon::Color::rgba(
        (color[0] * 255.0).round() as u8,
        (color[1] * 255.0).round() as u8,
        (color[2] * 255.0).round() as u8,
        (color[3] * 255.0).round() as u8,
    )
}

/// Per-frame dispatcher from draw lists to the shape and text renderers.
///
/// Tracks how many labels have been queued this frame so each gets a unique
/// id in the text renderer's `frame:` namespace.
#[derive(Default)]
pub struct SceneQueue {
    label_count: usize,
}

impl SceneQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets both renderers for a new frame.
    pub fn begin(&mut self, shapes: &mut ShapeRenderer, text: &mut TextRenderer) {
        shapes.clear();
        text.clear_frame_labels();
        self.label_count = 0;
    }

    /// Dispatches every command in `list` to the matching renderer.
    pub fn queue(&mut self, list: &DrawList, shapes: &mut ShapeRenderer, text: &mut TextRenderer) {
        shapes.queue_list(list);

        for cmd in list.cmds() {
            if let DrawCmd::Label {
                text: content,
                center,
                size,
                color,
                bold,
            } = cmd
            {
                let style = TextStyle {
                    font_size: *size,
                    line_height: *size * 1.2,
                    color: glyphon_color(*color),
                    weight: if *bold { Weight::BOLD } else { Weight::NORMAL },
                };
                text.add_frame_label(self.label_count, content, style, *center);
                self.label_count += 1;
            }
        }
    }
}
