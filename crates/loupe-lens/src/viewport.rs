//! Zoomed-buffer sizing and viewport placement.

use loupe_engine::coords::{Size, Vec2};

/// Where the scene is drawn inside the zoomed buffer, in device pixels with
/// GL orientation (origin bottom-left). May extend past the buffer.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ZoomViewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Zoomed buffer resolution plus the viewport to render it with.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ZoomLayout {
    pub resolution: Size,
    pub viewport: ZoomViewport,
}

/// Maps a pointer and zoom factor to the zoomed buffer's layout.
///
/// The buffer nominally matches the screen. When `screen * zoom` would exceed
/// `max_viewport_dims` on either axis, the buffer shrinks uniformly until the
/// magnified extent fits, trading resolution for staying within the hardware
/// limit. The viewport then places the scene so that, sampled at the
/// pointer, the zoomed buffer shows the same point the unzoomed render does,
/// magnified by `zoom`.
///
/// `zoom <= 1` is accepted and never divides by zero.
pub fn compute_zoom_viewport(
    pointer: Vec2,
    zoom: f32,
    screen: Size,
    max_viewport_dims: Size,
) -> ZoomLayout {
    let (w, h) = screen.as_f32();
    let (max_w, max_h) = max_viewport_dims.as_f32();

    let resolution = if w * zoom > max_w || h * zoom > max_h {
        let scale = (max_w / (w * zoom)).min(max_h / (h * zoom));
        Size::new(scaled_dim(w, scale), scaled_dim(h, scale))
    } else {
        screen
    };

    let (res_w, res_h) = Size::new(resolution.width.max(1), resolution.height.max(1)).as_f32();

    ZoomLayout {
        resolution,
        viewport: ZoomViewport {
            x: -pointer.x * (zoom - 1.0) * w / res_w,
            y: -pointer.y * (zoom - 1.0) * h / res_h,
            width: w * w / res_w * zoom,
            height: h * h / res_h * zoom,
        },
    }
}

// Floor keeps the result within the limit the scale was derived from.
fn scaled_dim(v: f32, scale: f32) -> u32 {
    let d = (v * scale).floor();
    if d.is_finite() && d >= 1.0 { d as u32 } else { 1 }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LARGE: Size = Size::new(4096, 4096);

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() <= 1e-3 * b.abs().max(1.0)
    }

    // ── resolution ────────────────────────────────────────────────────────

    #[test]
    fn fits_within_limits_keeps_screen_resolution() {
        let l = compute_zoom_viewport(Vec2::new(400.0, 300.0), 2.0, Size::new(800, 600), LARGE);
        assert_eq!(l.resolution, Size::new(800, 600));
    }

    #[test]
    fn over_limit_scales_uniformly() {
        let l = compute_zoom_viewport(
            Vec2::new(0.0, 0.0),
            3.0,
            Size::new(4000, 3000),
            Size::new(8192, 4096),
        );
        // scale = min(8192/12000, 4096/9000) = 0.4551
        assert_eq!(l.resolution, Size::new(1820, 1365));
    }

    #[test]
    fn resolution_never_exceeds_limits() {
        let screens = [Size::new(800, 600), Size::new(3840, 2160), Size::new(7680, 4320)];
        let limits = [Size::new(2048, 2048), Size::new(8192, 4096), Size::new(16384, 16384)];
        for screen in screens {
            for max in limits {
                for zoom in [1.0, 1.5, 2.0, 3.0, 8.0, 40.0] {
                    let l = compute_zoom_viewport(Vec2::new(10.0, 20.0), zoom, screen, max);
                    assert!(l.resolution.width <= max.width, "{screen:?} {max:?} {zoom}");
                    assert!(l.resolution.height <= max.height, "{screen:?} {max:?} {zoom}");
                    assert!(!l.resolution.is_empty());
                }
            }
        }
    }

    // ── viewport ──────────────────────────────────────────────────────────

    #[test]
    fn centered_pointer_scenario() {
        let l = compute_zoom_viewport(Vec2::new(400.0, 300.0), 2.0, Size::new(800, 600), LARGE);
        assert_eq!(
            l.viewport,
            ZoomViewport { x: -400.0, y: -300.0, width: 1600.0, height: 1200.0 }
        );
    }

    #[test]
    fn origin_pointer_gives_origin_viewport() {
        for zoom in [0.5, 1.0, 2.0, 3.0, 10.0] {
            let l = compute_zoom_viewport(Vec2::zero(), zoom, Size::new(4000, 3000), LARGE);
            assert_eq!(l.viewport.x, 0.0);
            assert_eq!(l.viewport.y, 0.0);
        }
    }

    #[test]
    fn scaled_viewport_uses_reduced_resolution() {
        let l = compute_zoom_viewport(
            Vec2::new(100.0, 50.0),
            3.0,
            Size::new(4000, 3000),
            Size::new(8192, 4096),
        );
        assert!(approx(l.viewport.x, -100.0 * 2.0 * 4000.0 / 1820.0));
        assert!(approx(l.viewport.y, -50.0 * 2.0 * 3000.0 / 1365.0));
        assert!(approx(l.viewport.width, 4000.0 * 4000.0 / 1820.0 * 3.0));
        assert!(approx(l.viewport.height, 3000.0 * 3000.0 / 1365.0 * 3.0));
    }

    // ── degenerate zoom ───────────────────────────────────────────────────

    #[test]
    fn unit_zoom_is_identity_placement() {
        let l = compute_zoom_viewport(Vec2::new(123.0, 45.0), 1.0, Size::new(800, 600), LARGE);
        assert_eq!(l.viewport, ZoomViewport { x: 0.0, y: 0.0, width: 800.0, height: 600.0 });
    }

    #[test]
    fn zero_zoom_stays_finite() {
        let l = compute_zoom_viewport(Vec2::new(10.0, 10.0), 0.0, Size::new(800, 600), LARGE);
        assert_eq!(l.resolution, Size::new(800, 600));
        assert!(l.viewport.x.is_finite() && l.viewport.width.is_finite());
        assert_eq!(l.viewport.width, 0.0);
    }

    #[test]
    fn empty_screen_stays_finite() {
        let l = compute_zoom_viewport(Vec2::new(1.0, 1.0), 2.0, Size::new(0, 0), LARGE);
        assert!(l.viewport.x.is_finite() && l.viewport.height.is_finite());
    }
}
