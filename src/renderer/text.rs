//! Text rendering system built on glyphon.
//!
//! Owns the font system, glyph atlas, and a keyed collection of text buffers.
//! Persistent HUD buffers (floor indicator, key status, help line, banners)
//! are created once and updated in place; per-frame labels produced by the
//! corridor projector live under the `frame:` id prefix and are rebuilt every
//! frame by the scene queue.

use glyphon::{
    Attrs, Buffer, Cache, Color, Family, FontSystem, Metrics, Resolution, Shaping, SwashCache,
    TextArea, TextAtlas, TextBounds, TextRenderer as GlyphonTextRenderer, Viewport, Weight,
};
use std::collections::HashMap;
use wgpu::{Device, Queue, RenderPass, SurfaceConfiguration};
use winit::window::Window;

/// Font size, line height, color, and weight for one text buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Font size in pixels.
    pub font_size: f32,
    /// Line height in pixels.
    pub line_height: f32,
    /// Text color.
    pub color: Color,
    /// Font weight.
    pub weight: Weight,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            line_height: 20.0,
            color: Color::rgb(255, 255, 255),
            weight: Weight::NORMAL,
        }
    }
}

/// Top-left anchor and optional clip bounds for one text buffer.
#[derive(Debug, Clone, Default)]
pub struct TextPosition {
    /// X coordinate of the top-left corner in screen pixels.
    pub x: f32,
    /// Y coordinate of the top-left corner in screen pixels.
    pub y: f32,
    /// Maximum layout width; defaults to the window width.
    pub max_width: Option<f32>,
    /// Maximum layout height; defaults to the window height.
    pub max_height: Option<f32>,
}

/// One shaped text buffer plus its style, position, and visibility flag.
#[derive(Debug)]
pub struct TextBuffer {
    /// The shaped glyphon buffer.
    pub buffer: Buffer,
    /// Style the buffer was shaped with.
    pub style: TextStyle,
    /// Screen position and bounds.
    pub position: TextPosition,
    /// Hidden buffers are skipped during prepare.
    pub visible: bool,
    /// Text content, kept for reshaping on style changes.
    pub text_content: String,
}

/// Renderer for all HUD and overlay text.
pub struct TextRenderer {
    /// Font database and shaping context.
    pub font_system: FontSystem,
    /// Glyph rasterization cache.
    pub swash_cache: SwashCache,
    /// Viewport resolution state.
    pub viewport: Viewport,
    /// Glyph atlas texture.
    pub atlas: TextAtlas,
    /// The underlying glyphon renderer.
    pub renderer: GlyphonTextRenderer,
    /// All text buffers, keyed by id.
    pub text_buffers: HashMap<String, TextBuffer>,
    /// Window size used for default buffer bounds.
    pub window_size: winit::dpi::PhysicalSize<u32>,
}

impl TextRenderer {
    /// Creates the text stack for the given surface format. System fonts are
    /// used; no bundled font files.
    pub fn new(
        device: &Device,
        queue: &Queue,
        surface_format: wgpu::TextureFormat,
        window: &Window,
    ) -> Self {
        let font_system = FontSystem::new();
        let swash_cache = SwashCache::new();
        let cache = Cache::new(device);
        let viewport = Viewport::new(device, &cache);
        let mut atlas = TextAtlas::new(device, queue, &cache, surface_format);
        let renderer =
            GlyphonTextRenderer::new(&mut atlas, device, wgpu::MultisampleState::default(), None);

        Self {
            font_system,
            swash_cache,
            viewport,
            atlas,
            renderer,
            text_buffers: HashMap::new(),
            window_size: window.inner_size(),
        }
    }

    /// Creates (or replaces) a text buffer under `id`.
    pub fn create_text_buffer(
        &mut self,
        id: &str,
        text: &str,
        style: Option<TextStyle>,
        position: Option<TextPosition>,
    ) {
        let style = style.unwrap_or_default();
        let position = position.unwrap_or_default();

        let metrics = Metrics::new(style.font_size, style.line_height);
        let mut buffer = Buffer::new(&mut self.font_system, metrics);

        let width = position.max_width.unwrap_or(self.window_size.width as f32);
        let height = position
            .max_height
            .unwrap_or(self.window_size.height as f32);
        buffer.set_size(&mut self.font_system, Some(width), Some(height));

        let attrs = Attrs::new()
            .family(Family::SansSerif)
            .weight(style.weight);
        buffer.set_text(&mut self.font_system, text, attrs, Shaping::Advanced);
        buffer.shape_until_scroll(&mut self.font_system, false);

        self.text_buffers.insert(
            id.to_string(),
            TextBuffer {
                buffer,
                style,
                position,
                visible: true,
                text_content: text.to_string(),
            },
        );
    }

    /// Updates the text content of an existing buffer.
    pub fn update_text(&mut self, id: &str, text: &str) -> Result<(), String> {
        let text_buffer = self
            .text_buffers
            .get_mut(id)
            .ok_or_else(|| format!("Text buffer '{}' not found", id))?;

        if text_buffer.text_content == text {
            return Ok(());
        }

        let attrs = Attrs::new()
            .family(Family::SansSerif)
            .weight(text_buffer.style.weight);
        text_buffer
            .buffer
            .set_text(&mut self.font_system, text, attrs, Shaping::Advanced);
        text_buffer
            .buffer
            .shape_until_scroll(&mut self.font_system, false);

        text_buffer.text_content = text.to_string();
        Ok(())
    }

    /// Updates the position of an existing buffer.
    pub fn update_position(&mut self, id: &str, position: TextPosition) -> Result<(), String> {
        let text_buffer = self
            .text_buffers
            .get_mut(id)
            .ok_or_else(|| format!("Text buffer '{}' not found", id))?;

        if text_buffer.position.max_width != position.max_width
            || text_buffer.position.max_height != position.max_height
        {
            let width = position.max_width.unwrap_or(self.window_size.width as f32);
            let height = position
                .max_height
                .unwrap_or(self.window_size.height as f32);
            text_buffer
                .buffer
                .set_size(&mut self.font_system, Some(width), Some(height));
        }

        text_buffer.position = position;
        Ok(())
    }

    /// Creates a per-frame label centered on a point. The buffer is shaped
    /// first, then measured so the anchor can be shifted to center the text.
    pub fn add_frame_label(&mut self, index: usize, text: &str, style: TextStyle, center: [f32; 2]) {
        let metrics = Metrics::new(style.font_size, style.line_height);
        let mut buffer = Buffer::new(&mut self.font_system, metrics);
        buffer.set_size(
            &mut self.font_system,
            Some(self.window_size.width as f32),
            Some(style.line_height * 2.0),
        );

        let attrs = Attrs::new()
            .family(Family::SansSerif)
            .weight(style.weight);
        buffer.set_text(&mut self.font_system, text, attrs, Shaping::Advanced);
        buffer.shape_until_scroll(&mut self.font_system, false);

        let text_width = buffer
            .layout_runs()
            .map(|run| run.line_w)
            .fold(0.0, f32::max);

        let position = TextPosition {
            x: center[0] - text_width / 2.0,
            y: center[1] - style.line_height / 2.0,
            max_width: Some(text_width + 4.0),
            max_height: Some(style.line_height + 4.0),
        };

        self.text_buffers.insert(
            format!("frame:{index}"),
            TextBuffer {
                buffer,
                style,
                position,
                visible: true,
                text_content: text.to_string(),
            },
        );
    }

    /// Removes all per-frame labels. Call at the start of each frame.
    pub fn clear_frame_labels(&mut self) {
        self.text_buffers.retain(|id, _| !id.starts_with("frame:"));
    }

    /// Updates the viewport resolution after a resize.
    pub fn resize(&mut self, queue: &Queue, resolution: Resolution) {
        self.window_size = winit::dpi::PhysicalSize::new(resolution.width, resolution.height);
        self.viewport.update(queue, resolution);
    }

    /// Shapes and uploads all visible buffers for the current frame.
    pub fn prepare(
        &mut self,
        device: &Device,
        queue: &Queue,
        surface_config: &SurfaceConfiguration,
    ) -> Result<(), glyphon::PrepareError> {
        let text_areas: Vec<TextArea> = self
            .text_buffers
            .values()
            .filter(|buffer| buffer.visible)
            .map(|buffer| TextArea {
                buffer: &buffer.buffer,
                left: buffer.position.x,
                top: buffer.position.y,
                scale: 1.0,
                bounds: TextBounds {
                    left: buffer.position.x as i32,
                    top: buffer.position.y as i32,
                    right: (buffer.position.x
                        + buffer
                            .position
                            .max_width
                            .unwrap_or(surface_config.width as f32)) as i32,
                    bottom: (buffer.position.y
                        + buffer
                            .position
                            .max_height
                            .unwrap_or(surface_config.height as f32))
                        as i32,
                },
                default_color: buffer.style.color,
                custom_glyphs: &[],
            })
            .collect();

        self.renderer.prepare(
            device,
            queue,
            &mut self.font_system,
            &mut self.atlas,
            &self.viewport,
            text_areas,
            &mut self.swash_cache,
        )?;

        Ok(())
    }

    /// Draws all prepared text.
    pub fn render(&mut self, render_pass: &mut RenderPass) -> Result<(), glyphon::RenderError> {
        self.renderer
            .render(&self.atlas, &self.viewport, render_pass)?;
        Ok(())
    }

    /// Frees atlas space held by glyphs absent from the last prepare.
    pub fn trim(&mut self) {
        self.atlas.trim();
    }
}
