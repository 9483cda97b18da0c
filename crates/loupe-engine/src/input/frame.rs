use std::collections::HashSet;

use super::types::Key;

/// Key transitions collected since the previous frame.
///
/// Held keys and the pointer live in [`InputState`](super::InputState).
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Went down this frame.
    pub keys_pressed: HashSet<Key>,

    /// Auto-repeated this frame (held past the platform repeat delay).
    pub keys_repeated: HashSet<Key>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.keys_pressed.clear();
        self.keys_repeated.clear();
    }

    /// Pressed this frame, or auto-repeating.
    pub fn key_triggered(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key) || self.keys_repeated.contains(&key)
    }
}
