//! Per-frame compositing.

use std::ops::{Deref, DerefMut};

use loupe_engine::coords::{ColorRgba, Vec2, Viewport};

use crate::config::{DeviceContext, LensConfig};
use crate::controller::LensController;
use crate::error::Result;
use crate::targets::{BufferAllocator, LensTargets};
use crate::uniforms::{AntialiasUniforms, LensUniforms};
use crate::viewport::{compute_zoom_viewport, ZoomViewport};

/// What the magnifier needs to know about the host scene.
pub trait Scene {
    /// Solid background color, or `None` for anything else (no background,
    /// gradients, textures). `None` clears offscreen passes to opaque white.
    fn background_color(&self) -> Option<ColorRgba>;
}

/// Output of a pass.
#[derive(Debug)]
pub enum PassTarget<'a, B> {
    /// The host's default framebuffer.
    Screen,
    Buffer(&'a B),
}

impl<B> Clone for PassTarget<'_, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B> Copy for PassTarget<'_, B> {}

/// Host renderer as seen by the magnifier.
///
/// Clear color and auto-clear are renderer-global state: every pass that
/// starts with auto-clear on clears its target to the current clear color
/// first, otherwise it draws over the existing contents.
pub trait LensRenderer: BufferAllocator {
    type Scene: Scene + ?Sized;

    fn clear_color(&self) -> ColorRgba;
    fn set_clear_color(&mut self, color: ColorRgba);
    fn auto_clear(&self) -> bool;
    fn set_auto_clear(&mut self, enabled: bool);

    /// Draws the scene into `target`. `viewport` places it inside the
    /// target (device pixels, origin bottom-left); `None` is the full target.
    fn render_scene(
        &mut self,
        scene: &mut Self::Scene,
        target: PassTarget<'_, Self::Buffer>,
        viewport: Option<&ZoomViewport>,
    ) -> Result<()>;

    /// Composites the lens from `original` and `zoomed` into `target`.
    fn lens_pass(
        &mut self,
        original: &Self::Buffer,
        zoomed: &Self::Buffer,
        uniforms: &LensUniforms,
        target: PassTarget<'_, Self::Buffer>,
    ) -> Result<()>;

    /// Smooths `source` onto the screen.
    fn antialias_pass(&mut self, source: &Self::Buffer, uniforms: &AntialiasUniforms) -> Result<()>;
}

// ── scoped state ──────────────────────────────────────────────────────────

/// Saves the renderer's clear color and auto-clear flag and restores both on
/// drop, including on early return through `?`.
pub struct StateScope<'a, R: LensRenderer + ?Sized> {
    renderer: &'a mut R,
    clear_color: ColorRgba,
    auto_clear: bool,
}

impl<'a, R: LensRenderer + ?Sized> StateScope<'a, R> {
    pub fn new(renderer: &'a mut R) -> Self {
        let clear_color = renderer.clear_color();
        let auto_clear = renderer.auto_clear();
        Self { renderer, clear_color, auto_clear }
    }
}

impl<R: LensRenderer + ?Sized> Deref for StateScope<'_, R> {
    type Target = R;

    fn deref(&self) -> &R {
        self.renderer
    }
}

impl<R: LensRenderer + ?Sized> DerefMut for StateScope<'_, R> {
    fn deref_mut(&mut self) -> &mut R {
        self.renderer
    }
}

impl<R: LensRenderer + ?Sized> Drop for StateScope<'_, R> {
    fn drop(&mut self) {
        self.renderer.set_clear_color(self.clear_color);
        self.renderer.set_auto_clear(self.auto_clear);
    }
}

// ── magnifier ─────────────────────────────────────────────────────────────

/// Which branch a frame took.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameOutcome {
    /// Scene drawn straight to the screen.
    Direct,
    Magnified { antialiased: bool },
}

/// The magnifying-glass effect: parameters, offscreen buffers and the
/// per-frame pass sequence.
#[derive(Debug)]
pub struct Magnifier<B> {
    controller: LensController,
    targets: LensTargets<B>,
}

impl<B> Magnifier<B> {
    pub fn new(config: LensConfig) -> Self {
        Self {
            controller: LensController::new(config),
            targets: LensTargets::new(),
        }
    }

    #[inline]
    pub fn controller(&self) -> &LensController {
        &self.controller
    }

    #[inline]
    pub fn controller_mut(&mut self) -> &mut LensController {
        &mut self.controller
    }

    #[inline]
    pub fn targets(&self) -> &LensTargets<B> {
        &self.targets
    }

    /// Brings the buffers in line with the window. Call on creation, resize
    /// and pixel-ratio change.
    pub fn resize<A>(&mut self, alloc: &mut A, logical: Viewport, pixel_ratio: f32) -> Result<()>
    where
        A: BufferAllocator<Buffer = B> + ?Sized,
    {
        self.targets.ensure_buffers(alloc, logical, pixel_ratio)
    }

    pub fn dispose<A>(&mut self, alloc: &mut A)
    where
        A: BufferAllocator<Buffer = B> + ?Sized,
    {
        self.targets.dispose(alloc);
    }

    /// Renders one frame of `scene`, magnified when the lens is active and
    /// its buffers exist, directly otherwise.
    ///
    /// Renderer errors propagate unchanged. The renderer's clear color and
    /// auto-clear flag are the same afterwards as before, on success or error.
    pub fn render_frame<R>(
        &mut self,
        renderer: &mut R,
        scene: &mut R::Scene,
        device: &DeviceContext,
    ) -> Result<FrameOutcome>
    where
        R: LensRenderer<Buffer = B> + ?Sized,
    {
        let pointer = match self.controller.pointer_device_px(device.pixel_ratio) {
            Some(p) if self.controller.is_active() && self.targets.buffers().is_some() => p,
            _ => {
                renderer.render_scene(scene, PassTarget::Screen, None)?;
                return Ok(FrameOutcome::Direct);
            }
        };

        let layout = compute_zoom_viewport(
            pointer,
            self.controller.config().zoom,
            device.screen_size,
            device.max_viewport_dims,
        );
        self.targets.ensure_zoomed_resolution(renderer, layout.resolution)?;
        self.controller.sync(device, layout.resolution);

        let Some(buffers) = self.targets.buffers() else {
            renderer.render_scene(scene, PassTarget::Screen, None)?;
            return Ok(FrameOutcome::Direct);
        };
        let antialias = self.controller.config().antialias;

        let mut frame = StateScope::new(renderer);
        frame.set_auto_clear(true);

        {
            let mut offscreen = StateScope::new(&mut *frame);
            let background = scene.background_color().unwrap_or(ColorRgba::white());
            offscreen.set_clear_color(background);

            offscreen.render_scene(scene, PassTarget::Buffer(&buffers.original), None)?;
            offscreen.render_scene(scene, PassTarget::Buffer(&buffers.zoomed), Some(&layout.viewport))?;
        }

        let lens_target = if antialias {
            PassTarget::Buffer(&buffers.filtered)
        } else {
            PassTarget::Screen
        };
        frame.lens_pass(
            &buffers.original,
            &buffers.zoomed,
            self.controller.lens_uniforms(),
            lens_target,
        )?;

        if antialias {
            frame.antialias_pass(&buffers.filtered, self.controller.antialias_uniforms())?;
        }

        Ok(FrameOutcome::Magnified { antialiased: antialias })
    }

    /// Moves the lens. `None` turns it off for subsequent frames.
    pub fn set_position(&mut self, position: Option<Vec2>) {
        self.controller.set_position(position);
    }
}

impl<B> Default for Magnifier<B> {
    fn default() -> Self {
        Self::new(LensConfig::default())
    }
}
