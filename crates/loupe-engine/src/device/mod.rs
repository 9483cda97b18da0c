//! wgpu device and window surface.
//!
//! `Gpu` is created once per window by the runtime. Frames are acquired with
//! `begin_frame` and presented with `submit`; acquire failures map to a
//! [`SurfaceErrorAction`] for the frame loop.

mod error;
mod frame;
mod gpu;
mod init;
mod surface;

pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::{GpuInit, TextureLimit};
