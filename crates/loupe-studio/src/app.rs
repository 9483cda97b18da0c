use anyhow::Context;

use loupe_engine::coords::{Size, Vec2};
use loupe_engine::core::{App, AppControl, FrameCtx, LifecycleCtx};
use loupe_lens::gpu::{GpuAllocator, GpuBuffer, LensPasses, RendererState, SceneDraw, WgpuRenderer};
use loupe_lens::{DeviceContext, Magnifier};

use crate::config::StudioConfig;
use crate::controls::{Action, Controls};
use crate::scene::CubeField;

/// The demo application: a cube field with the magnifier following the pointer.
pub struct Studio {
    config: StudioConfig,
    magnifier: Magnifier<GpuBuffer>,
    passes: LensPasses,
    renderer: RendererState,
    scene: CubeField,
    controls: Controls,
}

impl Studio {
    pub fn new(config: StudioConfig) -> Self {
        let controls = Controls::new(config.steps, config.outline_palette.clone(), config.lens);
        let scene = CubeField::new(config.grid, config.background, config.solid_background);
        Self {
            magnifier: Magnifier::new(config.lens),
            passes: LensPasses::new(),
            renderer: RendererState::default(),
            scene,
            controls,
            config,
        }
    }
}

impl App for Studio {
    fn on_resize(&mut self, ctx: &mut LifecycleCtx<'_, '_>) -> anyhow::Result<()> {
        let logical = ctx.window.logical_size();
        let pixel_ratio = ctx.window.pixel_ratio();
        let mut alloc = GpuAllocator::new(ctx.gpu.device());

        // Minimized: nothing to draw into.
        if Size::from_logical(logical.width, logical.height, pixel_ratio).is_empty() {
            self.magnifier.dispose(&mut alloc);
            return Ok(());
        }

        self.magnifier
            .resize(&mut alloc, logical, pixel_ratio)
            .with_context(|| {
                format!(
                    "failed to allocate lens buffers for {}x{} @ {pixel_ratio}",
                    logical.width, logical.height
                )
            })
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        for action in self.controls.apply(ctx.input_frame, self.magnifier.controller_mut()) {
            match action {
                Action::ToggleBackground => self.scene.toggle_background(),
                Action::Quit => {
                    log::info!("quit requested");
                    return AppControl::Exit;
                }
            }
        }

        let viewport = ctx.window.logical_size();
        let pointer = ctx
            .input
            .pointer_pos
            .map(|(x, y)| viewport.flip_y(Vec2::new(x, y)));
        self.magnifier.set_position(pointer);

        self.scene.update(ctx.time.elapsed, viewport);

        let (max_w, max_h) = ctx.gpu.max_texture_dimension();
        let device = DeviceContext::new(viewport, ctx.window.pixel_ratio(), Size::new(max_w, max_h));

        self.renderer.clear_color = self.config.clear_color;
        let magnifier = &mut self.magnifier;
        let scene: &mut dyn SceneDraw = &mut self.scene;
        let passes = &mut self.passes;
        let state = &mut self.renderer;

        let result = ctx.render(|rctx, target| {
            let mut renderer = WgpuRenderer::new(rctx, target, passes, state);
            magnifier.render_frame(&mut renderer, scene, &device)?;
            Ok(())
        });

        match result {
            Ok(control) => control,
            Err(e) => {
                log::error!("frame failed: {e:#}");
                AppControl::Exit
            }
        }
    }

    fn on_exit(&mut self, ctx: &mut LifecycleCtx<'_, '_>) {
        log::debug!("window {:?} closing; releasing lens buffers", ctx.window.id);
        self.magnifier.dispose(&mut GpuAllocator::new(ctx.gpu.device()));
    }
}
