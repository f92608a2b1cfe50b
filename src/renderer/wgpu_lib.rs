//! WGPU-based renderer for the maze crawler.
//!
//! This module provides [`WgpuRenderer`], which owns the surface, device, and
//! queue, plus the flat-shape batch renderer. Each frame is two passes over
//! the surface: a clearing pass that draws all batched geometry, then a
//! second pass that keeps its contents and draws the prepared text on top.
//!
//! # Usage
//! Create a [`WgpuRenderer`] via [`WgpuRenderer::new`] and call
//! [`WgpuRenderer::render_frame`] with a fresh command encoder each frame.

use tracing::warn;
use wgpu::{SurfaceTexture, TextureView};

use crate::renderer::shape::ShapeRenderer;
use crate::renderer::text::TextRenderer;

/// Core GPU state: surface, device, queue, and the shape batch renderer.
pub struct WgpuRenderer {
    /// The WGPU surface for presenting rendered frames.
    pub surface: wgpu::Surface<'static>,
    /// The surface configuration (format, size, etc.).
    pub surface_config: wgpu::SurfaceConfiguration,
    /// The WGPU device for resource creation.
    pub device: wgpu::Device,
    /// The WGPU queue for submitting commands.
    pub queue: wgpu::Queue,
    /// Batch renderer for the corridor and map geometry.
    pub shape_renderer: ShapeRenderer,
}

impl WgpuRenderer {
    /// Initializes the adapter, device, surface configuration, and pipelines.
    ///
    /// # Panics
    /// Panics if no suitable adapter, device, or surface format is available;
    /// there is no fallback render path.
    pub async fn new(
        instance: &wgpu::Instance,
        surface: wgpu::Surface<'static>,
        width: u32,
        height: u32,
    ) -> Self {
        let adapter = Self::create_adapter(instance, &surface).await;
        let (device, queue) = Self::create_device(&adapter).await;
        let surface_config = Self::create_surface_config(&surface, &adapter, width, height);

        surface.configure(&device, &surface_config);

        let mut shape_renderer = ShapeRenderer::new(&device, surface_config.format);
        shape_renderer.resize(width as f32, height as f32);

        Self {
            surface,
            surface_config,
            device,
            queue,
            shape_renderer,
        }
    }

    /// Acquires the next surface texture and a default view of it.
    ///
    /// Returns an error string on an outdated or otherwise unavailable
    /// surface; the caller skips the frame and the next resize reconfigures.
    pub fn get_surface_texture_and_view(&self) -> Result<(SurfaceTexture, TextureView), String> {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Outdated) => {
                return Err("WGPU surface outdated".to_string());
            }
            Err(_) => {
                return Err("Failed to acquire next swap chain texture".to_string());
            }
        };

        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        Ok((surface_texture, surface_view))
    }

    /// Encodes the frame's two render passes: clear + batched shapes, then
    /// text on top. The text renderer must already be prepared.
    pub fn render_frame(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        surface_view: &TextureView,
        clear_color: wgpu::Color,
        text_renderer: &mut TextRenderer,
    ) {
        {
            let mut shape_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Shape Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            self.shape_renderer.render(&self.device, &mut shape_pass);
        }

        let mut text_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Text Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: surface_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        if let Err(err) = text_renderer.render(&mut text_pass) {
            warn!(%err, "text render failed");
        }
    }

    /// Blocks until all submitted GPU work completes. Called before shutdown
    /// so surface resources are released cleanly.
    pub fn cleanup(&self) {
        let _ = self.device.poll(wgpu::Maintain::Wait);
    }

    async fn create_adapter(
        instance: &wgpu::Instance,
        surface: &wgpu::Surface<'static>,
    ) -> wgpu::Adapter {
        instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                force_fallback_adapter: false,
                compatible_surface: Some(surface),
            })
            .await
            .expect("Failed to find an appropriate adapter")
    }

    async fn create_device(adapter: &wgpu::Adapter) -> (wgpu::Device, wgpu::Queue) {
        adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    required_limits: Default::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await
            .expect("Failed to create device")
    }

    fn create_surface_config(
        surface: &wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> wgpu::SurfaceConfiguration {
        let capabilities = surface.get_capabilities(adapter);
        let format = capabilities
            .formats
            .iter()
            .find(|&&f| f == wgpu::TextureFormat::Bgra8UnormSrgb)
            .copied()
            .expect("Failed to select proper surface texture format");

        wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            desired_maximum_frame_latency: 0,
            alpha_mode: capabilities.alpha_modes[0],
            view_formats: vec![],
        }
    }
}
