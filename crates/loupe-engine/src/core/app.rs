use winit::event::WindowEvent;
use winit::window::WindowId;

use super::ctx::{FrameCtx, LifecycleCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
pub trait App {
    /// Called for raw window events, before the runtime handles them.
    fn on_window_event(&mut self, window_id: WindowId, event: &WindowEvent) -> AppControl {
        let _ = (window_id, event);
        AppControl::Continue
    }

    /// Called once after the window's GPU context exists, and again whenever
    /// the drawable size or the pixel ratio changes.
    ///
    /// Never runs while a frame is in flight.
    fn on_resize(&mut self, ctx: &mut LifecycleCtx<'_, '_>) -> anyhow::Result<()> {
        let _ = ctx;
        Ok(())
    }

    /// Called once per rendered frame per window.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Called before a window's GPU context is dropped.
    fn on_exit(&mut self, ctx: &mut LifecycleCtx<'_, '_>) {
        let _ = ctx;
    }
}
