//! Gesture domain module

mod key;
mod tracker;

pub use key::{Key, KeyEvent, KeyEventKind};
pub use tracker::{Gesture, GestureTracker, DOUBLE_TAP_THRESHOLD};
