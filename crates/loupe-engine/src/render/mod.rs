//! GPU rendering helpers shared by the magnifier passes and host scenes.
//!
//! Convention:
//! - pixel rectangles handed to renderers use GL orientation (origin bottom-left)
//! - shaders apply a [`ViewTransform`] in clip space, which lets a viewport
//!   extend past the render target's edges (wgpu rejects such viewports)

mod ctx;
mod quad;
mod view_transform;

pub use ctx::{RenderCtx, RenderTarget};
pub use quad::{
    uniform_binding_size, QuadVertex, ViewTransformUniform, QUAD_INDICES, QUAD_VERTICES,
};
pub use view_transform::ViewTransform;
