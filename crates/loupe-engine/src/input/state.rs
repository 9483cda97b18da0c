use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{InputEvent, Key, KeyState, PointerMoveEvent};

/// Current input state for a single window.
///
/// Holds "is down" information and current pointer position.
/// Per-frame transitions are recorded into an `InputFrame`.
#[derive(Debug, Default)]
pub struct InputState {
    /// Pointer position in logical pixels, top-left origin.
    ///
    /// `None` while the pointer is outside the window.
    pub pointer_pos: Option<(f32, f32)>,

    /// Set of currently held keys.
    pub keys_down: HashSet<Key>,
}

impl InputState {
    /// Updates held state from `ev` and records key transitions into `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match ev {
            InputEvent::Focused(false) => {
                // Focus loss mid-press never delivers the release.
                self.keys_down.clear();
            }
            InputEvent::Focused(true) => {}

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                self.pointer_pos = Some((x, y));
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
            }

            InputEvent::Key { key, state, repeat } => match state {
                KeyState::Pressed if repeat => {
                    frame.keys_repeated.insert(key);
                }
                KeyState::Pressed => {
                    if self.keys_down.insert(key) {
                        frame.keys_pressed.insert(key);
                    }
                }
                KeyState::Released => {
                    self.keys_down.remove(&key);
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, state: KeyState, repeat: bool) -> InputEvent {
        InputEvent::Key { key, state, repeat }
    }

    #[test]
    fn press_records_transition_and_release_clears_held() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::A, KeyState::Pressed, false));
        assert!(state.keys_down.contains(&Key::A));
        assert!(frame.keys_pressed.contains(&Key::A));

        frame.clear();
        state.apply_event(&mut frame, key(Key::A, KeyState::Released, false));
        assert!(!state.keys_down.contains(&Key::A));
        assert!(!frame.keys_pressed.contains(&Key::A));
    }

    #[test]
    fn repeat_is_triggered_but_not_pressed() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, key(Key::ArrowUp, KeyState::Pressed, false));
        frame.clear();

        state.apply_event(&mut frame, key(Key::ArrowUp, KeyState::Pressed, true));
        assert!(!frame.keys_pressed.contains(&Key::ArrowUp));
        assert!(frame.key_triggered(Key::ArrowUp));
    }

    #[test]
    fn pointer_left_clears_position() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, InputEvent::PointerMoved(PointerMoveEvent { x: 3.0, y: 4.0 }));
        assert_eq!(state.pointer_pos, Some((3.0, 4.0)));

        state.apply_event(&mut frame, InputEvent::PointerLeft);
        assert_eq!(state.pointer_pos, None);
    }

    #[test]
    fn focus_loss_releases_keys() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, key(Key::E, KeyState::Pressed, false));
        state.apply_event(&mut frame, InputEvent::Focused(false));
        assert!(state.keys_down.is_empty());
    }

    #[test]
    fn release_is_never_a_trigger() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, key(Key::R, KeyState::Pressed, false));
        frame.clear();

        state.apply_event(&mut frame, key(Key::R, KeyState::Released, false));
        assert!(!frame.key_triggered(Key::R));
        assert!(state.keys_down.is_empty());
    }
}
