//! # Flat-Shape Batch Renderer
//!
//! Renders the per-frame [`DrawList`](crate::view::DrawList) geometry: corridor
//! trapezoids, map fills, grid lines, and player markers. Polygons are fan
//! triangulated and lines expanded into thin quads on the CPU, batched into a
//! single vertex/index buffer, and drawn with one indexed call per frame.
//!
//! Coordinates come in as screen pixels with (0,0) at the top-left and are
//! converted to normalized device coordinates at queue time.

use std::mem;
use wgpu::{
    BufferUsages, Device, RenderPass, RenderPipeline, VertexAttribute, VertexBufferLayout,
    VertexFormat, util::DeviceExt,
};

use crate::renderer::pipeline_builder::PipelineBuilder;
use crate::view::{Color, DrawCmd, DrawList};

/// Vertex data for flat-colored 2D geometry.
///
/// `#[repr(C)]` keeps the layout stable for the GPU buffer; 24 bytes per
/// vertex, no padding needed.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    /// Position in normalized device coordinates (-1.0 to 1.0).
    position: [f32; 2],
    /// RGBA color (0.0 to 1.0).
    color: [f32; 4],
}

impl Vertex {
    /// Vertex buffer layout: position at location 0, color at location 1.
    fn desc<'a>() -> VertexBufferLayout<'a> {
        VertexBufferLayout {
            array_stride: mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: VertexFormat::Float32x2,
                },
                VertexAttribute {
                    offset: mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Batch renderer for the corridor and map draw lists.
///
/// ## Usage Pattern
///
/// 1. [`clear()`](ShapeRenderer::clear) at the start of the frame
/// 2. [`queue_list()`](ShapeRenderer::queue_list) for each view's draw list
/// 3. [`render()`](ShapeRenderer::render) inside the shape render pass
///
/// All queued geometry is uploaded and drawn in a single indexed draw call.
/// Label commands are text and are skipped here; the scene queue routes them
/// to the text renderer.
pub struct ShapeRenderer {
    /// Pipeline with alpha blending and no culling (draw-list winding varies).
    render_pipeline: RenderPipeline,
    /// CPU-side vertex batch for the current frame.
    vertices: Vec<Vertex>,
    /// CPU-side index batch for the current frame.
    indices: Vec<u16>,
    /// Current window width in pixels, for the NDC transform.
    window_width: f32,
    /// Current window height in pixels, for the NDC transform.
    window_height: f32,
}

impl ShapeRenderer {
    /// Creates the shape pipeline for the given surface format.
    pub fn new(device: &Device, surface_format: wgpu::TextureFormat) -> Self {
        let render_pipeline = PipelineBuilder::new(device, surface_format)
            .with_label("Shape Pipeline")
            .with_shader(include_str!("shaders/shape.wgsl"))
            .with_vertex_buffer(Vertex::desc())
            .with_alpha_blending()
            .with_no_culling()
            .build();

        Self {
            render_pipeline,
            vertices: Vec::new(),
            indices: Vec::new(),
            // Default window size - updated via resize()
            window_width: 1360.0,
            window_height: 768.0,
        }
    }

    /// Updates the window dimensions used for the screen-to-NDC transform.
    /// Call from the window resize handler.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.window_width = width;
        self.window_height = height;
    }

    /// Drops all queued geometry. Call at the start of each frame.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    /// Queues every polygon and line in `list`. Label commands are ignored.
    pub fn queue_list(&mut self, list: &DrawList) {
        for cmd in list.cmds() {
            match cmd {
                DrawCmd::Poly { points, color } => self.push_poly(points, *color),
                DrawCmd::Line {
                    from,
                    to,
                    color,
                    width,
                } => self.push_line(*from, *to, *color, *width),
                DrawCmd::Label { .. } => {}
            }
        }
    }

    /// Queues a convex polygon as a triangle fan anchored at its first vertex.
    pub fn push_poly(&mut self, points: &[[f32; 2]], color: Color) {
        if points.len() < 3 {
            return;
        }

        let base = self.vertices.len() as u16;
        for point in points {
            self.vertices.push(Vertex {
                position: self.to_ndc(*point),
                color,
            });
        }
        for i in 1..points.len() as u16 - 1 {
            self.indices.extend_from_slice(&[base, base + i, base + i + 1]);
        }
    }

    /// Queues a line segment as a quad of the given width.
    pub fn push_line(&mut self, from: [f32; 2], to: [f32; 2], color: Color, width: f32) {
        let dx = to[0] - from[0];
        let dy = to[1] - from[1];
        let length = (dx * dx + dy * dy).sqrt();
        if length < f32::EPSILON {
            return;
        }

        // Half-width offset perpendicular to the segment.
        let nx = -dy / length * width * 0.5;
        let ny = dx / length * width * 0.5;

        self.push_poly(
            &[
                [from[0] + nx, from[1] + ny],
                [to[0] + nx, to[1] + ny],
                [to[0] - nx, to[1] - ny],
                [from[0] - nx, from[1] - ny],
            ],
            color,
        );
    }

    /// Uploads the batched geometry and draws it in one indexed call.
    ///
    /// Vertex and index buffers are created fresh each frame; the batch is
    /// small (a few thousand vertices at most) so dynamic creation is cheap.
    pub fn render(&mut self, device: &Device, render_pass: &mut RenderPass) {
        if self.vertices.is_empty() {
            return;
        }

        render_pass.set_pipeline(&self.render_pipeline);

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Shape Vertex Buffer"),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Shape Index Buffer"),
            contents: bytemuck::cast_slice(&self.indices),
            usage: BufferUsages::INDEX,
        });

        render_pass.set_vertex_buffer(0, vertex_buffer.slice(..));
        render_pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        render_pass.draw_indexed(0..self.indices.len() as u32, 0, 0..1);
    }

    /// Screen pixels (top-left origin, Y down) to NDC (center origin, Y up).
    fn to_ndc(&self, point: [f32; 2]) -> [f32; 2] {
        [
            (point[0] / self.window_width) * 2.0 - 1.0,
            1.0 - (point[1] / self.window_height) * 2.0,
        ]
    }
}
