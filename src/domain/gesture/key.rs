//! Keyboard event value objects

use std::fmt;
use std::time::Instant;

/// A key as seen by the gesture tracker.
///
/// Only the keys that take part in gestures get their own variant; every
/// other key is carried by name so it can still be tracked in the key state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Up,
    Down,
    Left,
    Right,
    Other(String),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Escape => write!(f, "Esc"),
            Self::Up => write!(f, "Up"),
            Self::Down => write!(f, "Down"),
            Self::Left => write!(f, "Left"),
            Self::Right => write!(f, "Right"),
            Self::Other(name) => write!(f, "{}", name),
        }
    }
}

/// Press or release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEventKind {
    Press,
    Release,
}

/// A single raw event from the platform input stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub kind: KeyEventKind,
    pub key: Key,
    pub at: Instant,
}

impl KeyEvent {
    pub fn press(key: Key, at: Instant) -> Self {
        Self {
            kind: KeyEventKind::Press,
            key,
            at,
        }
    }

    pub fn release(key: Key, at: Instant) -> Self {
        Self {
            kind: KeyEventKind::Release,
            key,
            at,
        }
    }
}
