//! # WGPU Pipeline Builder
//!
//! Fluent helper for creating render pipelines without repeating the full
//! descriptor boilerplate at every call site.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use crate::renderer::pipeline_builder::PipelineBuilder;
//!
//! let pipeline = PipelineBuilder::new(&device, surface_format)
//!     .with_label("My Pipeline")
//!     .with_shader(shader_source)
//!     .with_vertex_buffer(vertex_layout)
//!     .with_alpha_blending()
//!     .build();
//! ```

use wgpu;

/// Builder for render pipelines with the defaults this crate's 2D passes use.
///
/// ## Default Configuration
///
/// - Vertex entry point: `"vs_main"`
/// - Fragment entry point: `"fs_main"`
/// - Blend state: `REPLACE` (no blending)
/// - Cull mode: `Back` face culling
/// - Primitive topology: `TriangleList`
///
/// Each method returns `Self` for chaining; call
/// [`build()`](PipelineBuilder::build) at the end to create the pipeline.
/// Shader source is the one required parameter.
pub struct PipelineBuilder<'a> {
    device: &'a wgpu::Device,
    surface_format: wgpu::TextureFormat,
    label: Option<&'a str>,
    shader_source: Option<&'a str>,
    vertex_buffers: Vec<wgpu::VertexBufferLayout<'a>>,
    blend_state: Option<wgpu::BlendState>,
    cull_mode: Option<wgpu::Face>,
}

impl<'a> PipelineBuilder<'a> {
    /// Creates a new pipeline builder with default settings.
    ///
    /// # Parameters
    ///
    /// - `device` - The WGPU device used to create the pipeline
    /// - `surface_format` - The texture format of the render target
    pub fn new(device: &'a wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        Self {
            device,
            surface_format,
            label: None,
            shader_source: None,
            vertex_buffers: Vec::new(),
            blend_state: Some(wgpu::BlendState::REPLACE),
            cull_mode: Some(wgpu::Face::Back),
        }
    }

    /// Sets the debug label used for the pipeline, shader module, and layout.
    pub fn with_label(mut self, label: &'a str) -> Self {
        self.label = Some(label);
        self
    }

    /// Sets the WGSL shader source. Required; the source must contain both
    /// `vs_main` and `fs_main` entry points.
    pub fn with_shader(mut self, source: &'a str) -> Self {
        self.shader_source = Some(source);
        self
    }

    /// Adds a vertex buffer layout describing how vertex data maps to shader
    /// inputs. May be called multiple times for multiple buffers.
    pub fn with_vertex_buffer(mut self, layout: wgpu::VertexBufferLayout<'a>) -> Self {
        self.vertex_buffers.push(layout);
        self
    }

    /// Enables standard alpha blending
    /// (`SrcAlpha * src + OneMinusSrcAlpha * dst`) in place of the default
    /// `REPLACE` blend state. Needed for transparent overlays.
    pub fn with_alpha_blending(mut self) -> Self {
        self.blend_state = Some(wgpu::BlendState::ALPHA_BLENDING);
        self
    }

    /// Disables face culling so both triangle windings are rendered.
    ///
    /// Geometry batched from screen-space draw lists has no consistent
    /// winding, so the 2D shape pass renders with culling off.
    pub fn with_no_culling(mut self) -> Self {
        self.cull_mode = None;
        self
    }

    /// Builds the render pipeline with the configured parameters.
    ///
    /// # Panics
    ///
    /// Panics if no shader source was provided.
    pub fn build(self) -> wgpu::RenderPipeline {
        let shader_source = self.shader_source.expect("Shader source must be provided");

        let shader = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: self.label,
                source: wgpu::ShaderSource::Wgsl(shader_source.into()),
            });

        let pipeline_layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: self.label,
                bind_group_layouts: &[],
                push_constant_ranges: &[],
            });

        self.device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: self.label,
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &self.vertex_buffers,
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: self.surface_format,
                        blend: self.blend_state,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: self.cull_mode,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState {
                    count: 1,
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                multiview: None,
                cache: None,
            })
    }
}
