//! Main renderer module.
//!
//! This module contains submodules for the per-pass renderers, pipeline construction, GPU
//! primitives, and the wgpu renderer implementation. It provides the core rendering
//! infrastructure for the application.

/// Win celebration particle and shockwave rendering.
pub mod effects;
/// Pipeline building utilities for WGPU.
pub mod pipeline_builder;
/// Basic geometric primitives for rendering.
pub mod primitives;
/// Shadowed board, box, and player rendering.
pub mod scene;
/// Procedural sky backdrop rendering.
pub mod sky;
/// Text rendering system.
pub mod text;
/// Texture loading and sampler utilities.
pub mod texture;
/// Core WGPU library and utilities.
pub mod wgpu_lib;
