//! Level-triggered keyboard state.
//!
//! The frame callback never consumes an event queue: it asks "is this key down right now?"
//! once per frame. Key codes are the classic ASCII-style codes (`'1'` = 49, space = 32),
//! so a window backend only has to translate its own key identifiers into these numbers.

use std::collections::BTreeSet;

pub const KEY_SPACE: u32 = 32;
pub const KEY_DIGIT_1: u32 = 49;
pub const KEY_DIGIT_9: u32 = 57;

/// Anything that can answer "is key `code` currently held".
pub trait InputState {
    fn is_key_down(&self, code: u32) -> bool;
}

/// Set of key codes currently held, maintained from press/release notifications.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeldKeys {
    down: BTreeSet<u32>,
}

impl HeldKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the key was not already held (i.e. this is a fresh press, not a repeat).
    pub fn press(&mut self, code: u32) -> bool {
        self.down.insert(code)
    }

    pub fn release(&mut self, code: u32) {
        self.down.remove(&code);
    }

    /// Forget everything. Called when the window loses focus, since releases are not
    /// delivered to unfocused windows.
    pub fn clear(&mut self) {
        self.down.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.down.is_empty()
    }
}

impl InputState for HeldKeys {
    fn is_key_down(&self, code: u32) -> bool {
        self.down.contains(&code)
    }
}

impl<const N: usize> From<[u32; N]> for HeldKeys {
    fn from(codes: [u32; N]) -> Self {
        Self {
            down: codes.into_iter().collect(),
        }
    }
}

/// Key code for a digit character, `'1'..='9'` only.
pub fn digit_key_code(digit: u8) -> Option<u32> {
    match digit {
        1..=9 => Some(KEY_DIGIT_1 + u32::from(digit) - 1),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_release_and_repeat() {
        let mut keys = HeldKeys::new();
        assert!(keys.press(KEY_SPACE));
        assert!(!keys.press(KEY_SPACE), "second press is a repeat");
        assert!(keys.is_key_down(KEY_SPACE));

        keys.release(KEY_SPACE);
        assert!(!keys.is_key_down(KEY_SPACE));
        assert!(keys.is_empty());
    }

    #[test]
    fn clear_drops_all_held_keys() {
        let mut keys = HeldKeys::from([KEY_DIGIT_1, KEY_SPACE]);
        keys.clear();
        assert!(!keys.is_key_down(KEY_DIGIT_1));
        assert!(!keys.is_key_down(KEY_SPACE));
    }

    #[test]
    fn digit_codes_follow_ascii() {
        assert_eq!(digit_key_code(1), Some(49));
        assert_eq!(digit_key_code(9), Some(KEY_DIGIT_9));
        assert_eq!(digit_key_code(0), None);
        assert_eq!(digit_key_code(10), None);
    }
}
