use loupe_engine::coords::{ColorRgba, Size};
use loupe_engine::render::{RenderCtx, RenderTarget, ViewTransform};

use crate::error::Result;
use crate::pipeline::{LensRenderer, PassTarget, Scene};
use crate::targets::{BufferAllocator, BufferSlot};
use crate::uniforms::{AntialiasUniforms, LensUniforms};
use crate::viewport::ZoomViewport;

use super::buffer::release_buffer;
use super::passes::{LensPasses, PassOutput};
use super::{GpuBuffer, BUFFER_FORMAT};

/// Clear state that outlives a single frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RendererState {
    pub clear_color: ColorRgba,
    pub auto_clear: bool,
}

impl Default for RendererState {
    fn default() -> Self {
        Self {
            clear_color: ColorRgba::black(),
            auto_clear: true,
        }
    }
}

impl RendererState {
    fn load_op(&self) -> wgpu::LoadOp<wgpu::Color> {
        if self.auto_clear {
            wgpu::LoadOp::Clear(self.clear_color.into())
        } else {
            wgpu::LoadOp::Load
        }
    }
}

/// Everything a scene needs to record one pass.
pub struct SceneCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    /// Color format of the pass target.
    pub format: wgpu::TextureFormat,
    /// Pass target extent in device pixels.
    pub target_size: Size,
    /// Placement of the scene inside the target; apply after projection.
    pub transform: ViewTransform,
}

/// A scene the wgpu renderer can draw.
pub trait SceneDraw: Scene {
    /// Records draw calls into an already-begun pass. The pass has no depth
    /// attachment. Per-pass uniforms written through `ctx.queue` are visible
    /// to this pass only.
    fn draw(&mut self, ctx: &SceneCtx<'_>, pass: &mut wgpu::RenderPass<'_>);
}

/// [`LensRenderer`] over wgpu for one frame.
///
/// Screen passes record into the frame's encoder. Offscreen passes get their
/// own encoder and are submitted immediately, so queue writes made for one
/// scene pass never leak into another.
pub struct WgpuRenderer<'a, 't> {
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
    screen: &'a mut RenderTarget<'t>,
    surface_format: wgpu::TextureFormat,
    surface_size: Size,
    passes: &'a mut LensPasses,
    state: &'a mut RendererState,
}

impl<'a, 't> WgpuRenderer<'a, 't> {
    pub fn new(
        ctx: &'a RenderCtx<'_>,
        screen: &'a mut RenderTarget<'t>,
        passes: &'a mut LensPasses,
        state: &'a mut RendererState,
    ) -> Self {
        Self {
            device: ctx.device,
            queue: ctx.queue,
            screen,
            surface_format: ctx.surface_format,
            surface_size: ctx.surface_size,
            passes,
            state,
        }
    }

    /// Runs `record` against `target`'s encoder and view.
    fn encode<F>(&mut self, target: PassTarget<'_, GpuBuffer>, label: &'static str, record: F) -> Result<()>
    where
        F: FnOnce(&mut LensPasses, PassOutput<'_>, Size) -> Result<()>,
    {
        let load = self.state.load_op();
        match target {
            PassTarget::Screen => {
                let out = PassOutput {
                    encoder: &mut *self.screen.encoder,
                    view: self.screen.color_view,
                    format: self.surface_format,
                    load,
                };
                record(&mut *self.passes, out, self.surface_size)
            }
            PassTarget::Buffer(buffer) => {
                let mut encoder = self
                    .device
                    .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some(label) });
                let out = PassOutput {
                    encoder: &mut encoder,
                    view: buffer.view(),
                    format: BUFFER_FORMAT,
                    load,
                };
                record(&mut *self.passes, out, buffer.size())?;
                self.queue.submit(std::iter::once(encoder.finish()));
                Ok(())
            }
        }
    }
}

impl BufferAllocator for WgpuRenderer<'_, '_> {
    type Buffer = GpuBuffer;

    fn allocate(&mut self, slot: BufferSlot, size: Size) -> Result<GpuBuffer> {
        GpuBuffer::new(self.device, slot, size)
    }

    fn release(&mut self, buffer: GpuBuffer) {
        release_buffer(buffer);
    }
}

impl LensRenderer for WgpuRenderer<'_, '_> {
    type Scene = dyn SceneDraw;

    fn clear_color(&self) -> ColorRgba {
        self.state.clear_color
    }

    fn set_clear_color(&mut self, color: ColorRgba) {
        self.state.clear_color = color;
    }

    fn auto_clear(&self) -> bool {
        self.state.auto_clear
    }

    fn set_auto_clear(&mut self, enabled: bool) {
        self.state.auto_clear = enabled;
    }

    fn render_scene(
        &mut self,
        scene: &mut Self::Scene,
        target: PassTarget<'_, GpuBuffer>,
        viewport: Option<&ZoomViewport>,
    ) -> Result<()> {
        let (device, queue) = (self.device, self.queue);
        self.encode(target, "loupe scene encoder", |_, out, size| {
            let transform = match viewport {
                Some(v) => ViewTransform::from_viewport(v.x, v.y, v.width, v.height, size),
                None => ViewTransform::IDENTITY,
            };
            let ctx = SceneCtx {
                device,
                queue,
                format: out.format,
                target_size: size,
                transform,
            };

            let mut rpass = out.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("loupe scene pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: out.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: out.load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            scene.draw(&ctx, &mut rpass);
            Ok(())
        })
    }

    fn lens_pass(
        &mut self,
        original: &GpuBuffer,
        zoomed: &GpuBuffer,
        uniforms: &LensUniforms,
        target: PassTarget<'_, GpuBuffer>,
    ) -> Result<()> {
        let (device, queue) = (self.device, self.queue);
        self.encode(target, "loupe lens encoder", |passes, out, _| {
            passes.draw_lens(device, queue, out, original, zoomed, uniforms)
        })
    }

    fn antialias_pass(&mut self, source: &GpuBuffer, uniforms: &AntialiasUniforms) -> Result<()> {
        let (device, queue) = (self.device, self.queue);
        self.encode(PassTarget::Screen, "loupe antialias encoder", |passes, out, _| {
            passes.draw_antialias(device, queue, out, source, uniforms)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_clear_loads_clear_color() {
        let state = RendererState {
            clear_color: ColorRgba::new(0.25, 0.5, 0.75, 1.0),
            auto_clear: true,
        };
        let wgpu::LoadOp::Clear(c) = state.load_op() else { panic!("expected clear") };
        assert_eq!((c.r, c.g, c.b, c.a), (0.25, 0.5, 0.75, 1.0));
    }

    #[test]
    fn wgpu_renderer_drives_a_magnifier() {
        fn drives<R>()
        where
            R: LensRenderer<Buffer = GpuBuffer, Scene = dyn SceneDraw>,
        {
            let _ = crate::pipeline::Magnifier::<GpuBuffer>::render_frame::<R>;
        }
        drives::<WgpuRenderer<'static, 'static>>();
    }

    #[test]
    fn manual_clear_preserves_contents() {
        let state = RendererState { auto_clear: false, ..RendererState::default() };
        assert!(matches!(state.load_op(), wgpu::LoadOp::Load));
    }
}
