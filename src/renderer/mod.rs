//! Main renderer module.
//!
//! This module contains submodules for pipeline construction, flat-shape
//! batching, text rendering, and the wgpu renderer implementation. It provides
//! the core rendering infrastructure for the application.

/// Pipeline building utilities for WGPU.
pub mod pipeline_builder;
/// Frame scene assembly from view draw lists.
pub mod scene;
/// Batched flat-color shape rendering.
pub mod shape;
/// Text rendering system.
pub mod text;
/// Core WGPU library and utilities.
pub mod wgpu_lib;

pub use scene::SceneQueue;
pub use shape::ShapeRenderer;
pub use text::TextRenderer;
pub use wgpu_lib::WgpuRenderer;
