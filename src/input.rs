//! Input tracking for the mini-game
//!
//! Records which arrow keys are held. Pointer moves steer the basket
//! directly and are not tracked here.

use crate::sim::TickInput;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom(key: &str) -> Self {
        match key {
            "ArrowLeft" => Key::Left,
            "ArrowRight" => Key::Right,
            _ => Key::Other,
        }
    }
}

/// Held arrow keys
#[derive(Debug, Clone, Default)]
pub struct InputTracker {
    left: bool,
    right: bool,
}

impl InputTracker {
    pub fn key_down(&mut self, key: Key) {
        self.set(key, true);
    }

    pub fn key_up(&mut self, key: Key) {
        self.set(key, false);
    }

    fn set(&mut self, key: Key, held: bool) {
        match key {
            Key::Left => self.left = held,
            Key::Right => self.right = held,
            Key::Other => {}
        }
    }

    /// Forget everything (new session or listeners detached)
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn tick_input(&self) -> TickInput {
        TickInput {
            left: self.left,
            right: self.right,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(Key::from_dom("ArrowLeft"), Key::Left);
        assert_eq!(Key::from_dom("ArrowRight"), Key::Right);
        assert_eq!(Key::from_dom("a"), Key::Other);
    }

    #[test]
    fn test_held_keys() {
        let mut input = InputTracker::default();
        input.key_down(Key::Left);
        input.key_down(Key::Other);
        assert_eq!(input.tick_input(), TickInput { left: true, right: false });
        input.key_down(Key::Right);
        input.key_up(Key::Left);
        assert_eq!(input.tick_input(), TickInput { left: false, right: true });
    }

    #[test]
    fn test_clear() {
        let mut input = InputTracker::default();
        input.key_down(Key::Right);
        input.key_down(Key::Left);
        input.clear();
        assert_eq!(input.tick_input(), TickInput::default());
    }
}
