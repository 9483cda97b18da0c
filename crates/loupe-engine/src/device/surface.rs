use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;

use super::{GpuInit, SurfaceErrorAction};

/// A window surface together with its configuration.
///
/// The configuration keeps the last non-empty extent, so a minimized window
/// is never configured at 0x0 and restoring it reconfigures at the new size.
pub(super) struct WindowSurface<'w> {
    surface: wgpu::Surface<'w>,
    config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
}

impl<'w> WindowSurface<'w> {
    /// Picks format and alpha mode from `caps` and configures the surface.
    pub(super) fn configure(
        surface: wgpu::Surface<'w>,
        caps: &wgpu::SurfaceCapabilities,
        device: &wgpu::Device,
        size: PhysicalSize<u32>,
        init: &GpuInit,
    ) -> Result<Self> {
        let format = pick_format(&caps.formats, init.prefer_srgb)
            .context("surface reports no supported formats")?;
        let alpha_mode = pick_alpha_mode(&caps.alpha_modes, init.alpha_mode);
        log::debug!("surface format {format:?}, alpha {alpha_mode:?}");

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: init.present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: init.frame_latency,
        };
        surface.configure(device, &config);

        Ok(Self { surface, config, size })
    }

    #[inline]
    pub(super) fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub(super) fn acquire(&self) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        self.surface.get_current_texture()
    }

    pub(super) fn resize(&mut self, device: &wgpu::Device, size: PhysicalSize<u32>) {
        self.size = size;
        if is_empty(size) {
            return;
        }
        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(device, &self.config);
    }

    /// Reconfigures after a lost or outdated surface, then reports what the
    /// frame loop should do.
    pub(super) fn recover(&mut self, device: &wgpu::Device, err: wgpu::SurfaceError) -> SurfaceErrorAction {
        let action = error_action(&err);
        if action == SurfaceErrorAction::Reconfigured && !is_empty(self.size) {
            self.surface.configure(device, &self.config);
        }
        action
    }
}

fn is_empty(size: PhysicalSize<u32>) -> bool {
    size.width == 0 || size.height == 0
}

/// First sRGB format when preferred and offered, else the surface's first.
fn pick_format(formats: &[wgpu::TextureFormat], prefer_srgb: bool) -> Option<wgpu::TextureFormat> {
    let srgb = formats.iter().copied().find(|f| f.is_srgb());
    match srgb {
        Some(f) if prefer_srgb => Some(f),
        _ => formats.first().copied(),
    }
}

fn pick_alpha_mode(
    modes: &[wgpu::CompositeAlphaMode],
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    match requested {
        Some(m) if modes.contains(&m) => m,
        _ => modes.first().copied().unwrap_or(wgpu::CompositeAlphaMode::Auto),
    }
}

fn error_action(err: &wgpu::SurfaceError) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceErrorAction::Reconfigured,
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::TextureFormat as F;

    // ── pick_format ───────────────────────────────────────────────────────

    #[test]
    fn srgb_format_wins_when_preferred() {
        let formats = [F::Bgra8Unorm, F::Rgba16Float, F::Bgra8UnormSrgb];
        assert_eq!(pick_format(&formats, true), Some(F::Bgra8UnormSrgb));
    }

    #[test]
    fn first_format_when_srgb_not_wanted() {
        let formats = [F::Bgra8Unorm, F::Bgra8UnormSrgb];
        assert_eq!(pick_format(&formats, false), Some(F::Bgra8Unorm));
    }

    #[test]
    fn no_formats_is_none() {
        assert_eq!(pick_format(&[], true), None);
        assert_eq!(pick_format(&[F::Rgba16Float], true), Some(F::Rgba16Float));
    }

    // ── pick_alpha_mode ───────────────────────────────────────────────────

    #[test]
    fn unsupported_alpha_request_falls_back() {
        use wgpu::CompositeAlphaMode as A;
        assert_eq!(pick_alpha_mode(&[A::Opaque], Some(A::PreMultiplied)), A::Opaque);
        assert_eq!(pick_alpha_mode(&[A::Opaque, A::PreMultiplied], Some(A::PreMultiplied)), A::PreMultiplied);
        assert_eq!(pick_alpha_mode(&[], None), A::Auto);
    }

    // ── error_action ──────────────────────────────────────────────────────

    #[test]
    fn only_out_of_memory_is_fatal() {
        assert_eq!(error_action(&wgpu::SurfaceError::Outdated), SurfaceErrorAction::Reconfigured);
        assert_eq!(error_action(&wgpu::SurfaceError::Lost), SurfaceErrorAction::Reconfigured);
        assert_eq!(error_action(&wgpu::SurfaceError::Timeout), SurfaceErrorAction::SkipFrame);
        assert!(error_action(&wgpu::SurfaceError::OutOfMemory).is_fatal());
    }
}
