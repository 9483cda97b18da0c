//! Magnifying-glass overlay for an interactive scene.
//!
//! Given a pointer position, the [`Magnifier`] renders the scene twice into
//! offscreen buffers (once normally, once through a magnifying viewport),
//! composites a circular lens with an outline over the normal render, and
//! optionally smooths the result with an antialiasing pass.
//!
//! The pipeline runs against the [`LensRenderer`] and [`BufferAllocator`]
//! traits. [`gpu`] provides the wgpu implementation.

mod config;
mod controller;
mod error;
mod pipeline;
mod targets;
mod uniforms;
mod viewport;

pub mod gpu;

pub use config::{DeviceContext, LensConfig};
pub use controller::LensController;
pub use error::{LensError, Result};
pub use pipeline::{FrameOutcome, LensRenderer, Magnifier, PassTarget, Scene, StateScope};
pub use targets::{BufferAllocator, BufferSlot, LensBuffers, LensTargets};
pub use uniforms::{AntialiasUniforms, LensUniforms};
pub use viewport::{compute_zoom_viewport, ZoomLayout, ZoomViewport};
