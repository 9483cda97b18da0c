use anyhow::{Context, Result};
use wgpu::SurfaceError;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::surface::WindowSurface;
use super::{GpuFrame, GpuInit, SurfaceErrorAction};

/// Device, queue, and the window surface they present to.
pub struct Gpu<'w> {
    /// Kept alive for the surface's sake.
    #[allow(dead_code)]
    instance: wgpu::Instance,
    surface: WindowSurface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl<'w> Gpu<'w> {
    /// Creates a GPU context bound to a window.
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(size.width > 0 && size.height > 0, "window has zero size");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let info = adapter.get_info();
        let required_limits = init.device_limits(&adapter.limits());
        log::info!(
            "using adapter {} ({:?}), max texture {}",
            info.name,
            info.backend,
            required_limits.max_texture_dimension_2d
        );

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("loupe-engine device"),
                required_features: init.required_features,
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let caps = surface.get_capabilities(&adapter);
        let surface = WindowSurface::configure(surface, &caps, &device, size, &init)?;

        Ok(Self {
            instance,
            surface,
            device,
            queue,
        })
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface.format()
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Ceiling on either dimension of a render target, in pixels.
    ///
    /// Reflects [`TextureLimit`](super::TextureLimit) from the init settings.
    pub fn max_texture_dimension(&self) -> (u32, u32) {
        let max = self.device.limits().max_texture_dimension_2d;
        (max, max)
    }

    /// Reconfigures the surface; a zero extent is remembered but not applied.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.surface.resize(&self.device, new_size);
    }

    /// Acquires the next surface texture with a fresh encoder for it.
    pub fn begin_frame(&self) -> std::result::Result<GpuFrame, SurfaceError> {
        let surface_texture = self.surface.acquire()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("loupe frame encoder"),
            });

        Ok(GpuFrame {
            surface_texture,
            view,
            encoder,
        })
    }

    /// Submits the recorded commands for the given frame and presents it.
    pub fn submit(&self, frame: GpuFrame) {
        self.queue.submit(std::iter::once(frame.encoder.finish()));
        drop(frame.view);
        frame.surface_texture.present();
    }

    /// Recovers from a failed acquire where possible.
    pub fn handle_surface_error(&mut self, err: SurfaceError) -> SurfaceErrorAction {
        self.surface.recover(&self.device, err)
    }
}
