//! Key state tracking.
//!
//! The host delivers raw key presses/releases; this module folds them into
//! four logical driving flags. Keys are matched case-sensitively against
//! `w`, `a`, `s` and `d`. Anything else is ignored. There is no debouncing
//! and no repeat suppression: the latest event wins.

use bitflags::bitflags;

bitflags! {
    /// Logical driving inputs currently held down.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct KeyFlags: u8 {
        const FORWARD  = 1 << 0;
        const BACKWARD = 1 << 1;
        const LEFT     = 1 << 2;
        const RIGHT    = 1 << 3;
    }
}

/// One of the four recognised driving inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalKey {
    Forward,
    Backward,
    Left,
    Right,
}

impl LogicalKey {
    pub const ALL: [LogicalKey; 4] = [
        LogicalKey::Forward,
        LogicalKey::Backward,
        LogicalKey::Left,
        LogicalKey::Right,
    ];

    /// Maps a host key name to a logical input.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "w" => Some(LogicalKey::Forward),
            "s" => Some(LogicalKey::Backward),
            "a" => Some(LogicalKey::Left),
            "d" => Some(LogicalKey::Right),
            _ => None,
        }
    }

    /// The host key bound to this input.
    pub fn key(self) -> &'static str {
        match self {
            LogicalKey::Forward => "w",
            LogicalKey::Backward => "s",
            LogicalKey::Left => "a",
            LogicalKey::Right => "d",
        }
    }

    fn flag(self) -> KeyFlags {
        match self {
            LogicalKey::Forward => KeyFlags::FORWARD,
            LogicalKey::Backward => KeyFlags::BACKWARD,
            LogicalKey::Left => KeyFlags::LEFT,
            LogicalKey::Right => KeyFlags::RIGHT,
        }
    }
}

/// Current pressed/released state of the driving keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    flags: KeyFlags,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the flag for `key` if it is a recognised key.
    ///
    /// Returns `false` (and changes nothing) for unrecognised keys.
    pub fn set_key(&mut self, key: &str, pressed: bool) -> bool {
        match LogicalKey::from_key(key) {
            Some(logical) => {
                self.set(logical, pressed);
                true
            }
            None => false,
        }
    }

    /// Returns whether `key` is held. Unrecognised keys are never pressed.
    pub fn is_pressed(&self, key: &str) -> bool {
        LogicalKey::from_key(key).is_some_and(|logical| self.pressed(logical))
    }

    pub fn set(&mut self, key: LogicalKey, pressed: bool) {
        self.flags.set(key.flag(), pressed);
    }

    pub fn pressed(&self, key: LogicalKey) -> bool {
        self.flags.contains(key.flag())
    }

    pub fn flags(&self) -> KeyFlags {
        self.flags
    }

    pub fn any(&self) -> bool {
        !self.flags.is_empty()
    }

    /// Releases every key.
    pub fn clear(&mut self) {
        self.flags = KeyFlags::empty();
    }
}

impl From<KeyFlags> for KeyState {
    fn from(flags: KeyFlags) -> Self {
        Self { flags }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wasd_map_to_logical_inputs() {
        let mut keys = KeyState::new();
        assert!(keys.set_key("w", true));
        assert!(keys.set_key("d", true));
        assert!(keys.pressed(LogicalKey::Forward));
        assert!(keys.pressed(LogicalKey::Right));
        assert!(!keys.pressed(LogicalKey::Backward));
        assert_eq!(keys.flags(), KeyFlags::FORWARD | KeyFlags::RIGHT);
    }

    #[test]
    fn unknown_and_uppercase_keys_are_ignored() {
        let mut keys = KeyState::new();
        assert!(!keys.set_key("W", true));
        assert!(!keys.set_key("ArrowUp", true));
        assert!(!keys.set_key("", true));
        assert!(!keys.any());
        assert!(!keys.is_pressed("W"));
    }

    #[test]
    fn release_clears_only_that_key() {
        let mut keys = KeyState::new();
        keys.set_key("a", true);
        keys.set_key("s", true);
        keys.set_key("a", false);
        assert!(!keys.is_pressed("a"));
        assert!(keys.is_pressed("s"));
    }

    #[test]
    fn repeated_press_is_idempotent() {
        let mut keys = KeyState::new();
        keys.set_key("w", true);
        keys.set_key("w", true);
        keys.set_key("w", false);
        assert!(!keys.is_pressed("w"));
    }

    #[test]
    fn key_names_round_trip() {
        for logical in LogicalKey::ALL {
            assert_eq!(LogicalKey::from_key(logical.key()), Some(logical));
        }
    }
}
