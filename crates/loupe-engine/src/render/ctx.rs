use crate::coords::Size;

/// Device handles plus the surface description for one frame.
///
/// Offscreen passes choose their own format and extent; only screen passes
/// read `surface_format` and `surface_size`.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    /// Surface extent in device pixels.
    pub surface_size: Size,
}

/// The frame's encoder and the surface view it draws into.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
}
