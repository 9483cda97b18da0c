use loupe_engine::coords::{Size, Vec2, Viewport};

/// Lens parameters supplied by the caller.
///
/// Lengths are logical pixels; the pipeline scales them by the pixel ratio
/// at the point of use. `position` is in UI space (origin bottom-left).
///
/// Values are not validated: out-of-range zoom, radius or exponent produce
/// whatever the viewport math and the lens shader make of them.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LensConfig {
    /// Lens center; `None` disables the effect.
    pub position: Option<Vec2>,
    pub zoom: f32,
    /// Lens falloff curve; higher is flatter.
    pub shape_exponent: f32,
    pub radius: f32,
    /// Packed `0xRRGGBB`.
    pub outline_color: u32,
    pub outline_thickness: f32,
    pub antialias: bool,
    pub enabled: bool,
}

impl LensConfig {
    pub const DEFAULT_ZOOM: f32 = 2.0;
    pub const DEFAULT_SHAPE_EXPONENT: f32 = 35.0;
    pub const DEFAULT_RADIUS: f32 = 100.0;
    pub const DEFAULT_OUTLINE_COLOR: u32 = 0xCCCCCC;
    pub const DEFAULT_OUTLINE_THICKNESS: f32 = 8.0;

    /// Whether this frame runs the magnified path.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.enabled && self.position.is_some()
    }
}

impl Default for LensConfig {
    fn default() -> Self {
        Self {
            position: None,
            zoom: Self::DEFAULT_ZOOM,
            shape_exponent: Self::DEFAULT_SHAPE_EXPONENT,
            radius: Self::DEFAULT_RADIUS,
            outline_color: Self::DEFAULT_OUTLINE_COLOR,
            outline_thickness: Self::DEFAULT_OUTLINE_THICKNESS,
            antialias: true,
            enabled: true,
        }
    }
}

/// Host display facts, derived each frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DeviceContext {
    pub pixel_ratio: f32,
    /// Screen extent in device pixels.
    pub screen_size: Size,
    /// Hardware ceiling on a single render target dimension.
    pub max_viewport_dims: Size,
}

impl DeviceContext {
    /// Builds the context from the logical window size.
    pub fn new(logical: Viewport, pixel_ratio: f32, max_viewport_dims: Size) -> Self {
        Self {
            pixel_ratio,
            screen_size: Size::from_logical(logical.width, logical.height, pixel_ratio),
            max_viewport_dims,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let c = LensConfig::default();
        assert_eq!(c.zoom, 2.0);
        assert_eq!(c.shape_exponent, 35.0);
        assert_eq!(c.radius, 100.0);
        assert_eq!(c.outline_color, 0xCCCCCC);
        assert_eq!(c.outline_thickness, 8.0);
        assert!(c.antialias);
        assert!(c.enabled);
        assert_eq!(c.position, None);
    }

    #[test]
    fn inactive_without_position_or_when_disabled() {
        let mut c = LensConfig::default();
        assert!(!c.is_active());

        c.position = Some(Vec2::new(10.0, 10.0));
        assert!(c.is_active());

        c.enabled = false;
        assert!(!c.is_active());
    }

    #[test]
    fn device_context_scales_screen() {
        let d = DeviceContext::new(Viewport::new(640.0, 480.0), 2.0, Size::new(8192, 8192));
        assert_eq!(d.screen_size, Size::new(1280, 960));
    }
}
