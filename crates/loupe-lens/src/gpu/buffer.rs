use loupe_engine::coords::Size;

use crate::error::{LensError, Result};
use crate::targets::{BufferAllocator, BufferSlot};

/// Color format of every offscreen buffer.
pub const BUFFER_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// Offscreen color target that later passes sample from.
#[derive(Debug)]
pub struct GpuBuffer {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
    size: Size,
}

impl GpuBuffer {
    /// Creates the texture after checking `size` against `device` limits.
    pub fn new(device: &wgpu::Device, slot: BufferSlot, size: Size) -> Result<Self> {
        check_size(slot, size, device.limits().max_texture_dimension_2d)?;

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(slot.label()),
            size: wgpu::Extent3d {
                width: size.width,
                height: size.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: BUFFER_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(slot.label()),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Ok(Self { texture, view, sampler, size })
    }

    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    #[inline]
    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }
}

/// Allocates [`GpuBuffer`]s outside a frame (resize, teardown).
pub struct GpuAllocator<'a> {
    device: &'a wgpu::Device,
}

impl<'a> GpuAllocator<'a> {
    pub fn new(device: &'a wgpu::Device) -> Self {
        Self { device }
    }
}

impl BufferAllocator for GpuAllocator<'_> {
    type Buffer = GpuBuffer;

    fn allocate(&mut self, slot: BufferSlot, size: Size) -> Result<GpuBuffer> {
        GpuBuffer::new(self.device, slot, size)
    }

    fn release(&mut self, buffer: GpuBuffer) {
        release_buffer(buffer);
    }
}

pub(super) fn release_buffer(buffer: GpuBuffer) {
    buffer.texture.destroy();
}

/// Rejects empty sizes and sizes past the device's 2D texture limit.
fn check_size(slot: BufferSlot, size: Size, limit: u32) -> Result<()> {
    if size.is_empty() || size.width > limit || size.height > limit {
        return Err(LensError::BufferAllocation {
            slot,
            width: size.width,
            height: size.height,
            limit,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_within_limit_pass() {
        assert!(check_size(BufferSlot::Original, Size::new(8192, 8192), 8192).is_ok());
        assert!(check_size(BufferSlot::Zoomed, Size::new(1, 1), 8192).is_ok());
    }

    #[test]
    fn oversized_buffer_is_rejected() {
        let err = check_size(BufferSlot::Zoomed, Size::new(8193, 10), 8192).unwrap_err();
        assert!(matches!(
            err,
            LensError::BufferAllocation { slot: BufferSlot::Zoomed, width: 8193, height: 10, limit: 8192 }
        ));
    }

    #[test]
    fn empty_buffer_is_rejected() {
        assert!(check_size(BufferSlot::Filtered, Size::new(0, 600), 8192).is_err());
    }

    #[test]
    fn error_message_names_the_slot() {
        let err = check_size(BufferSlot::Filtered, Size::new(0, 0), 4096).unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot allocate filtered buffer of 0x0 (device limit 4096)"
        );
    }
}
