//! Keyboard bindings for the lens parameters.

use loupe_engine::input::{InputFrame, Key};
use loupe_lens::{LensConfig, LensController};

use crate::config::ControlSteps;

const ZOOM_RANGE: (f32, f32) = (1.0, 16.0);
const EXPONENT_RANGE: (f32, f32) = (1.0, 200.0);
const RADIUS_RANGE: (f32, f32) = (10.0, 600.0);
const THICKNESS_RANGE: (f32, f32) = (0.0, 40.0);

/// Requests the controls cannot satisfy on the lens alone.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Action {
    ToggleBackground,
    Quit,
}

/// Maps key presses to lens parameter changes.
///
/// Position is not handled here; the app feeds it from the pointer.
pub struct Controls {
    steps: ControlSteps,
    palette: Vec<u32>,
    palette_index: usize,
    defaults: LensConfig,
}

impl Controls {
    pub fn new(steps: ControlSteps, palette: Vec<u32>, defaults: LensConfig) -> Self {
        Self {
            steps,
            palette,
            palette_index: 0,
            defaults,
        }
    }

    /// Applies this frame's key presses to `lens`, logging each change.
    pub fn apply(&mut self, frame: &InputFrame, lens: &mut LensController) -> Vec<Action> {
        let mut actions = Vec::new();
        let c = *lens.config();
        let s = self.steps;

        if frame.key_triggered(Key::ArrowUp) || frame.key_triggered(Key::ArrowDown) {
            let dir = if frame.key_triggered(Key::ArrowUp) { 1.0 } else { -1.0 };
            let zoom = clamp(c.zoom + dir * s.zoom, ZOOM_RANGE);
            lens.set_zoom(zoom);
            log::info!("zoom {zoom:.2}");
        }

        if frame.key_triggered(Key::ArrowRight) {
            let exponent = clamp(c.shape_exponent * s.shape_exponent, EXPONENT_RANGE);
            lens.set_shape_exponent(exponent);
            log::info!("shape exponent {exponent:.1}");
        } else if frame.key_triggered(Key::ArrowLeft) {
            let exponent = clamp(c.shape_exponent / s.shape_exponent, EXPONENT_RANGE);
            lens.set_shape_exponent(exponent);
            log::info!("shape exponent {exponent:.1}");
        }

        if frame.key_triggered(Key::R) || frame.key_triggered(Key::F) {
            let dir = if frame.key_triggered(Key::R) { 1.0 } else { -1.0 };
            let radius = clamp(c.radius + dir * s.radius, RADIUS_RANGE);
            lens.set_radius(radius);
            log::info!("radius {radius:.0}");
        }

        if frame.key_triggered(Key::T) || frame.key_triggered(Key::G) {
            let dir = if frame.key_triggered(Key::T) { 1.0 } else { -1.0 };
            let thickness = clamp(c.outline_thickness + dir * s.outline_thickness, THICKNESS_RANGE);
            lens.set_outline_thickness(thickness);
            log::info!("outline thickness {thickness:.0}");
        }

        if frame.keys_pressed.contains(&Key::O) && !self.palette.is_empty() {
            self.palette_index = (self.palette_index + 1) % self.palette.len();
            let rgb = self.palette[self.palette_index];
            lens.set_outline_color(rgb);
            log::info!("outline color #{rgb:06X}");
        }

        if frame.keys_pressed.contains(&Key::A) {
            lens.set_antialias(!c.antialias);
            log::info!("antialias {}", on_off(!c.antialias));
        }

        if frame.keys_pressed.contains(&Key::E) {
            lens.set_enabled(!c.enabled);
            log::info!("lens {}", on_off(!c.enabled));
        }

        if frame.keys_pressed.contains(&Key::Backspace) {
            let position = lens.config().position;
            lens.apply(LensConfig { position, ..self.defaults });
            self.palette_index = 0;
            log::info!("lens parameters reset");
        }

        if frame.keys_pressed.contains(&Key::B) {
            actions.push(Action::ToggleBackground);
        }

        if frame.keys_pressed.contains(&Key::Escape) {
            actions.push(Action::Quit);
        }

        actions
    }
}

fn clamp(v: f32, (lo, hi): (f32, f32)) -> f32 {
    v.clamp(lo, hi)
}

fn on_off(v: bool) -> &'static str {
    if v { "on" } else { "off" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loupe_engine::coords::Vec2;

    fn controls() -> Controls {
        Controls::new(ControlSteps::default(), vec![0xCCCCCC, 0xFF0000], LensConfig::default())
    }

    fn press(keys: &[Key]) -> InputFrame {
        let mut frame = InputFrame::default();
        frame.keys_pressed.extend(keys.iter().copied());
        frame
    }

    #[test]
    fn arrows_adjust_zoom_and_exponent() {
        let mut c = controls();
        let mut lens = LensController::default();

        c.apply(&press(&[Key::ArrowUp, Key::ArrowRight]), &mut lens);

        assert_eq!(lens.config().zoom, 2.25);
        assert_eq!(lens.lens_uniforms().zoom, 2.25);
        assert!((lens.config().shape_exponent - 43.75).abs() < 1e-4);
    }

    #[test]
    fn zoom_stops_at_one() {
        let mut c = controls();
        let mut lens = LensController::default();
        for _ in 0..10 {
            c.apply(&press(&[Key::ArrowDown]), &mut lens);
        }
        assert_eq!(lens.config().zoom, 1.0);
    }

    #[test]
    fn repeats_count_as_presses_for_sizes() {
        let mut c = controls();
        let mut lens = LensController::default();
        let mut frame = InputFrame::default();
        frame.keys_repeated.insert(Key::R);

        c.apply(&frame, &mut lens);
        assert_eq!(lens.config().radius, 110.0);
    }

    #[test]
    fn toggles_flip_flags() {
        let mut c = controls();
        let mut lens = LensController::default();

        c.apply(&press(&[Key::A, Key::E]), &mut lens);
        assert!(!lens.config().antialias);
        assert!(!lens.config().enabled);
    }

    #[test]
    fn outline_cycles_through_palette() {
        let mut c = controls();
        let mut lens = LensController::default();

        c.apply(&press(&[Key::O]), &mut lens);
        assert_eq!(lens.config().outline_color, 0xFF0000);
        c.apply(&press(&[Key::O]), &mut lens);
        assert_eq!(lens.config().outline_color, 0xCCCCCC);
    }

    #[test]
    fn reset_keeps_position() {
        let mut c = controls();
        let mut lens = LensController::default();
        lens.set_position(Some(Vec2::new(5.0, 6.0)));
        c.apply(&press(&[Key::ArrowUp, Key::T]), &mut lens);

        c.apply(&press(&[Key::Backspace]), &mut lens);

        assert_eq!(lens.config().zoom, LensConfig::DEFAULT_ZOOM);
        assert_eq!(lens.config().outline_thickness, LensConfig::DEFAULT_OUTLINE_THICKNESS);
        assert_eq!(lens.config().position, Some(Vec2::new(5.0, 6.0)));
    }

    #[test]
    fn app_level_keys_become_actions() {
        let mut c = controls();
        let mut lens = LensController::default();
        let actions = c.apply(&press(&[Key::B, Key::Escape]), &mut lens);
        assert_eq!(actions, vec![Action::ToggleBackground, Action::Quit]);
    }
}
