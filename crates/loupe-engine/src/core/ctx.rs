use anyhow::Result;
use winit::window::{Window, WindowId};

use crate::coords::{Size, Viewport};
use crate::device::{Gpu, SurfaceErrorAction};
use crate::input::{InputFrame, InputState};
use crate::render::{RenderCtx, RenderTarget};
use crate::time::FrameTime;
use crate::window::RuntimeCtx;

use super::app::AppControl;

/// Per-window handles and immutable window metadata.
pub struct WindowCtx<'a> {
    pub id:     WindowId,
    pub window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    /// Returns the logical window size in logical pixels.
    pub fn logical_size(&self) -> Viewport {
        let phys  = self.window.inner_size();
        let logi: winit::dpi::LogicalSize<f64> = phys.to_logical(self.window.scale_factor());
        Viewport::new(logi.width as f32, logi.height as f32)
    }

    /// Scale factor between logical and device pixels.
    pub fn pixel_ratio(&self) -> f32 {
        self.window.scale_factor() as f32
    }
}

/// Context passed to `core::App::on_resize` and `core::App::on_exit`.
pub struct LifecycleCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu:    &'a Gpu<'w>,
}

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window:       WindowCtx<'a>,
    pub gpu:          &'a mut Gpu<'w>,
    pub input:        &'a InputState,
    pub input_frame:  &'a InputFrame,
    pub time:         FrameTime,
    pub runtime:      &'a mut RuntimeCtx,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Acquires the next surface frame, calls `draw` with a ready [`RenderCtx`]
    /// and [`RenderTarget`], then presents the frame.
    ///
    /// `draw` owns clearing: nothing is drawn to the surface beforehand.
    ///
    /// Surface errors are handled here (reconfigure / skip / exit). Errors
    /// returned by `draw` propagate unchanged and the frame is not presented.
    pub fn render<F>(&mut self, draw: F) -> Result<AppControl>
    where
        F: FnOnce(&RenderCtx<'_>, &mut RenderTarget<'_>) -> Result<()>,
    {
        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                log::warn!("surface frame unavailable: {err}");
                let action = self.gpu.handle_surface_error(err);
                if action.is_fatal() {
                    return Ok(AppControl::Exit);
                }
                return Ok(AppControl::Continue);
            }
        };

        let (width, height) = frame.size();
        let rctx = RenderCtx {
            device: self.gpu.device(),
            queue: self.gpu.queue(),
            surface_format: self.gpu.surface_format(),
            surface_size: Size::new(width, height),
        };

        // RenderTarget borrows frame.encoder; dropped before submit() takes frame.
        {
            let mut target = RenderTarget {
                encoder: &mut frame.encoder,
                color_view: &frame.view,
            };
            draw(&rctx, &mut target)?;
        }

        self.window.window.pre_present_notify();
        self.gpu.submit(frame);

        Ok(AppControl::Continue)
    }
}
