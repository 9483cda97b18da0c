//! wgpu implementation of [`BufferAllocator`](crate::BufferAllocator) and
//! [`LensRenderer`](crate::LensRenderer).

mod buffer;
mod passes;
mod renderer;

pub use buffer::{GpuAllocator, GpuBuffer, BUFFER_FORMAT};
pub use passes::LensPasses;
pub use renderer::{RendererState, SceneCtx, SceneDraw, WgpuRenderer};
