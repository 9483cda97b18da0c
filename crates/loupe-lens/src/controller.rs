use loupe_engine::coords::{ColorRgba, Size, Vec2};

use crate::config::{DeviceContext, LensConfig};
use crate::uniforms::{AntialiasUniforms, LensUniforms};

/// Keeps the shader uniform records in step with [`LensConfig`].
///
/// The records are long-lived and rewritten in place: [`sync`](Self::sync)
/// recomputes them fully every active frame, while the zoom and exponent
/// setters also push straight through so a change is visible even before
/// the next sync.
#[derive(Debug, Clone)]
pub struct LensController {
    config: LensConfig,
    lens: LensUniforms,
    antialias: AntialiasUniforms,
}

impl LensController {
    pub fn new(config: LensConfig) -> Self {
        let mut lens = LensUniforms::default();
        lens.zoom = config.zoom;
        lens.shape_exponent = config.shape_exponent;
        Self {
            config,
            lens,
            antialias: AntialiasUniforms::default(),
        }
    }

    #[inline]
    pub fn config(&self) -> &LensConfig {
        &self.config
    }

    /// Replaces the whole configuration.
    pub fn apply(&mut self, config: LensConfig) {
        self.config = config;
        self.lens.zoom = config.zoom;
        self.lens.shape_exponent = config.shape_exponent;
    }

    // ── setters ───────────────────────────────────────────────────────────

    pub fn set_position(&mut self, position: Option<Vec2>) {
        self.config.position = position;
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.config.zoom = zoom;
        self.lens.zoom = zoom;
    }

    pub fn set_shape_exponent(&mut self, exponent: f32) {
        self.config.shape_exponent = exponent;
        self.lens.shape_exponent = exponent;
    }

    /// Logical pixels; scaled at sync time.
    pub fn set_radius(&mut self, radius: f32) {
        self.config.radius = radius;
    }

    /// Packed `0xRRGGBB`.
    pub fn set_outline_color(&mut self, rgb: u32) {
        self.config.outline_color = rgb;
    }

    /// Logical pixels; scaled at sync time.
    pub fn set_outline_thickness(&mut self, thickness: f32) {
        self.config.outline_thickness = thickness;
    }

    pub fn set_antialias(&mut self, antialias: bool) {
        self.config.antialias = antialias;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
    }

    // ── per frame ─────────────────────────────────────────────────────────

    /// Whether this frame takes the magnified branch.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.config.is_active()
    }

    /// Lens center in device pixels, or `None` when unset.
    pub fn pointer_device_px(&self, pixel_ratio: f32) -> Option<Vec2> {
        self.config.position.map(|p| p * pixel_ratio)
    }

    /// Recomputes both uniform records for the coming frame.
    pub fn sync(&mut self, device: &DeviceContext, zoomed_resolution: Size) {
        let ratio = device.pixel_ratio;
        let pointer = self.pointer_device_px(ratio).unwrap_or_default();
        let (screen_w, screen_h) = device.screen_size.as_f32();
        let (zoomed_w, zoomed_h) = zoomed_resolution.as_f32();
        let color = ColorRgba::from_rgb_hex(self.config.outline_color);

        self.lens = LensUniforms {
            pointer: pointer.to_array(),
            zoomed_resolution: [zoomed_w, zoomed_h],
            screen_resolution: [screen_w, screen_h],
            zoom: self.config.zoom,
            shape_exponent: self.config.shape_exponent,
            outline_color: color.to_array(),
            radius: self.config.radius * ratio,
            outline_thickness: self.config.outline_thickness * ratio,
            _pad: [0.0; 2],
        };

        self.antialias.inverse_resolution = [recip_or_zero(screen_w), recip_or_zero(screen_h)];
    }

    #[inline]
    pub fn lens_uniforms(&self) -> &LensUniforms {
        &self.lens
    }

    #[inline]
    pub fn antialias_uniforms(&self) -> &AntialiasUniforms {
        &self.antialias
    }
}

impl Default for LensController {
    fn default() -> Self {
        Self::new(LensConfig::default())
    }
}

fn recip_or_zero(v: f32) -> f32 {
    if v > 0.0 { 1.0 / v } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(ratio: f32) -> DeviceContext {
        DeviceContext {
            pixel_ratio: ratio,
            screen_size: Size::new(800, 600),
            max_viewport_dims: Size::new(8192, 8192),
        }
    }

    #[test]
    fn zoom_and_exponent_push_immediately() {
        let mut c = LensController::default();
        c.set_zoom(4.0);
        c.set_shape_exponent(12.0);
        assert_eq!(c.lens_uniforms().zoom, 4.0);
        assert_eq!(c.lens_uniforms().shape_exponent, 12.0);
        assert_eq!(c.config().zoom, 4.0);
    }

    #[test]
    fn radius_waits_for_sync_and_scales() {
        let mut c = LensController::default();
        c.set_radius(50.0);
        c.set_outline_thickness(4.0);
        assert_eq!(c.lens_uniforms().radius, 0.0);

        c.sync(&device(2.0), Size::new(800, 600));
        assert_eq!(c.lens_uniforms().radius, 100.0);
        assert_eq!(c.lens_uniforms().outline_thickness, 8.0);
    }

    #[test]
    fn sync_fills_pointer_and_resolutions() {
        let mut c = LensController::default();
        c.set_position(Some(Vec2::new(10.0, 20.0)));
        c.sync(&device(1.5), Size::new(400, 300));

        let u = c.lens_uniforms();
        assert_eq!(u.pointer, [15.0, 30.0]);
        assert_eq!(u.zoomed_resolution, [400.0, 300.0]);
        assert_eq!(u.screen_resolution, [800.0, 600.0]);
        assert_eq!(c.antialias_uniforms().inverse_resolution, [1.0 / 800.0, 1.0 / 600.0]);
    }

    #[test]
    fn outline_color_unpacks_to_linear_rgb() {
        let mut c = LensController::default();
        c.set_outline_color(0xFF8000);
        c.sync(&device(1.0), Size::new(800, 600));
        let [r, g, b, a] = c.lens_uniforms().outline_color;
        assert!((r - 1.0).abs() < 1e-6);
        assert!((g - 0.2158605).abs() < 1e-5);
        assert_eq!((b, a), (0.0, 1.0));
    }

    #[test]
    fn default_outline_syncs_linear_for_srgb_targets() {
        let mut c = LensController::default();
        c.sync(&device(1.0), Size::new(800, 600));
        let [r, g, b, _] = c.lens_uniforms().outline_color;
        // 0xCCCCCC stored back through an sRGB target reads 204, not 231.
        assert!((r - 0.604).abs() < 1e-3);
        assert_eq!((r, r), (g, b));
    }

    #[test]
    fn apply_replaces_config_and_pushes_zoom() {
        let mut c = LensController::default();
        let next = LensConfig { zoom: 3.0, enabled: false, ..LensConfig::default() };
        c.apply(next);
        assert_eq!(c.config(), &next);
        assert_eq!(c.lens_uniforms().zoom, 3.0);
        assert!(!c.is_active());
    }

    #[test]
    fn empty_screen_gives_zero_inverse_resolution() {
        let mut c = LensController::default();
        let d = DeviceContext { screen_size: Size::new(0, 0), ..device(1.0) };
        c.sync(&d, Size::new(1, 1));
        assert_eq!(c.antialias_uniforms().inverse_resolution, [0.0, 0.0]);
    }
}
