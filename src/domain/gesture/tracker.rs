//! Gesture recognition state machine
//!
//! Turns the raw key event stream into discrete gestures. The tracker owns the
//! set of currently pressed keys and the time of the last tap-key press; it is
//! mutated only by the single task consuming the event stream.

use std::collections::HashSet;
use std::fmt;
use std::time::{Duration, Instant};

use super::key::{Key, KeyEvent, KeyEventKind};

/// Maximum interval between two tap-key presses that counts as a double-tap
pub const DOUBLE_TAP_THRESHOLD: Duration = Duration::from_millis(500);

/// A recognised gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gesture {
    /// Double-tap of the tap key
    StartRecording,
    /// Tap key released while a recording is active
    StopRecording,
    /// Tap key + Down
    CaptureScreenshot,
    /// Tap key + Up
    FlushScreenshots,
    /// Tap key + Right
    SendClipboard,
}

impl Gesture {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::StartRecording => "start-recording",
            Self::StopRecording => "stop-recording",
            Self::CaptureScreenshot => "capture-screenshot",
            Self::FlushScreenshots => "flush-screenshots",
            Self::SendClipboard => "send-clipboard",
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Key state plus double-tap clock
#[derive(Debug)]
pub struct GestureTracker {
    tap_key: Key,
    threshold: Duration,
    pressed: HashSet<Key>,
    last_tap: Option<Instant>,
}

impl GestureTracker {
    /// Tracker using Escape as the tap key
    pub fn new() -> Self {
        Self::with_tap_key(Key::Escape)
    }

    /// Tracker with a custom tap key
    pub fn with_tap_key(tap_key: Key) -> Self {
        Self {
            tap_key,
            threshold: DOUBLE_TAP_THRESHOLD,
            pressed: HashSet::new(),
            last_tap: None,
        }
    }

    /// The modifier key arming the combos
    pub fn tap_key(&self) -> &Key {
        &self.tap_key
    }

    /// Whether the key is currently held
    pub fn is_pressed(&self, key: &Key) -> bool {
        self.pressed.contains(key)
    }

    /// Number of keys currently held
    pub fn pressed_count(&self) -> usize {
        self.pressed.len()
    }

    /// Feed one event. `recording` tells whether a recording session is active.
    pub fn handle(&mut self, event: &KeyEvent, recording: bool) -> Option<Gesture> {
        match event.kind {
            KeyEventKind::Press => self.on_press(&event.key, event.at, recording),
            KeyEventKind::Release => self.on_release(&event.key, recording),
        }
    }

    fn on_press(&mut self, key: &Key, at: Instant, recording: bool) -> Option<Gesture> {
        if *key == self.tap_key {
            // Auto-repeat while held must not re-arm the double-tap window
            if !self.pressed.insert(key.clone()) {
                return None;
            }

            let double_tap = self
                .last_tap
                .and_then(|last| at.checked_duration_since(last))
                .is_some_and(|interval| interval < self.threshold);
            self.last_tap = Some(at);

            return (double_tap && !recording).then_some(Gesture::StartRecording);
        }

        self.pressed.insert(key.clone());

        if !self.pressed.contains(&self.tap_key) {
            return None;
        }

        match key {
            Key::Down => Some(Gesture::CaptureScreenshot),
            Key::Up => Some(Gesture::FlushScreenshots),
            Key::Right => Some(Gesture::SendClipboard),
            _ => None,
        }
    }

    fn on_release(&mut self, key: &Key, recording: bool) -> Option<Gesture> {
        self.pressed.remove(key);

        (recording && *key == self.tap_key).then_some(Gesture::StopRecording)
    }
}

impl Default for GestureTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(base: Instant, millis: u64) -> Instant {
        base + Duration::from_millis(millis)
    }

    fn tap(tracker: &mut GestureTracker, at: Instant, recording: bool) -> Option<Gesture> {
        let pressed = tracker.handle(&KeyEvent::press(Key::Escape, at), recording);
        tracker.handle(&KeyEvent::release(Key::Escape, at), recording);
        pressed
    }

    #[test]
    fn single_tap_does_nothing() {
        let mut tracker = GestureTracker::new();
        let t0 = Instant::now();
        assert_eq!(tap(&mut tracker, t0, false), None);
    }

    #[test]
    fn double_tap_within_threshold_starts_recording() {
        let mut tracker = GestureTracker::new();
        let t0 = Instant::now();
        assert_eq!(tap(&mut tracker, t0, false), None);
        let second = tracker.handle(&KeyEvent::press(Key::Escape, ms(t0, 300)), false);
        assert_eq!(second, Some(Gesture::StartRecording));
    }

    #[test]
    fn double_tap_just_under_threshold_starts_recording() {
        let mut tracker = GestureTracker::new();
        let t0 = Instant::now();
        tap(&mut tracker, t0, false);
        let second = tracker.handle(&KeyEvent::press(Key::Escape, ms(t0, 499)), false);
        assert_eq!(second, Some(Gesture::StartRecording));
    }

    #[test]
    fn double_tap_at_threshold_is_ignored() {
        let mut tracker = GestureTracker::new();
        let t0 = Instant::now();
        tap(&mut tracker, t0, false);
        assert_eq!(tap(&mut tracker, ms(t0, 500), false), None);
    }

    #[test]
    fn double_tap_beyond_threshold_is_ignored() {
        let mut tracker = GestureTracker::new();
        let t0 = Instant::now();
        tap(&mut tracker, t0, false);
        assert_eq!(tap(&mut tracker, ms(t0, 900), false), None);
    }

    #[test]
    fn double_tap_while_recording_is_ignored() {
        let mut tracker = GestureTracker::new();
        let t0 = Instant::now();
        tap(&mut tracker, t0, true);
        assert_eq!(tap(&mut tracker, ms(t0, 100), true), None);
    }

    #[test]
    fn held_tap_key_repeats_never_start_recording() {
        let mut tracker = GestureTracker::new();
        let t0 = Instant::now();
        tap(&mut tracker, t0, false);

        let mut starts = 0;
        for i in 0..20 {
            let event = KeyEvent::press(Key::Escape, ms(t0, 100 + i * 30));
            if tracker.handle(&event, starts > 0) == Some(Gesture::StartRecording) {
                starts += 1;
            }
        }
        assert_eq!(starts, 1);
        assert_eq!(tracker.pressed_count(), 1);
    }

    #[test]
    fn repeats_do_not_move_the_clock() {
        let mut tracker = GestureTracker::new();
        let t0 = Instant::now();
        // Hold for a long time: first press at t0, repeats until 2s
        tracker.handle(&KeyEvent::press(Key::Escape, t0), false);
        for i in 1..40 {
            tracker.handle(&KeyEvent::press(Key::Escape, ms(t0, i * 50)), false);
        }
        tracker.handle(&KeyEvent::release(Key::Escape, ms(t0, 2000)), false);

        // Next press is 2.1s after the first real press, not a double-tap
        assert_eq!(tap(&mut tracker, ms(t0, 2100), false), None);
    }

    #[test]
    fn combos_require_tap_key_held() {
        let mut tracker = GestureTracker::new();
        let t0 = Instant::now();
        assert_eq!(tracker.handle(&KeyEvent::press(Key::Down, t0), false), None);
        tracker.handle(&KeyEvent::release(Key::Down, t0), false);

        tracker.handle(&KeyEvent::press(Key::Escape, t0), false);
        assert_eq!(
            tracker.handle(&KeyEvent::press(Key::Down, t0), false),
            Some(Gesture::CaptureScreenshot)
        );
        assert_eq!(
            tracker.handle(&KeyEvent::press(Key::Up, t0), false),
            Some(Gesture::FlushScreenshots)
        );
        assert_eq!(
            tracker.handle(&KeyEvent::press(Key::Right, t0), false),
            Some(Gesture::SendClipboard)
        );
        assert_eq!(tracker.handle(&KeyEvent::press(Key::Left, t0), false), None);
    }

    #[test]
    fn combo_stops_after_tap_release() {
        let mut tracker = GestureTracker::new();
        let t0 = Instant::now();
        tracker.handle(&KeyEvent::press(Key::Escape, t0), false);
        tracker.handle(&KeyEvent::release(Key::Escape, t0), false);
        assert_eq!(tracker.handle(&KeyEvent::press(Key::Down, t0), false), None);
    }

    #[test]
    fn tap_release_while_recording_stops() {
        let mut tracker = GestureTracker::new();
        let t0 = Instant::now();
        tracker.handle(&KeyEvent::press(Key::Escape, t0), true);
        assert_eq!(
            tracker.handle(&KeyEvent::release(Key::Escape, t0), true),
            Some(Gesture::StopRecording)
        );
        assert!(!tracker.is_pressed(&Key::Escape));
    }

    #[test]
    fn release_of_unknown_key_is_noop() {
        let mut tracker = GestureTracker::new();
        let t0 = Instant::now();
        assert_eq!(
            tracker.handle(&KeyEvent::release(Key::Other("KeyA".into()), t0), false),
            None
        );
        assert_eq!(tracker.pressed_count(), 0);
    }

    #[test]
    fn custom_tap_key() {
        let mut tracker = GestureTracker::with_tap_key(Key::Other("F9".into()));
        let t0 = Instant::now();
        tracker.handle(&KeyEvent::press(Key::Escape, t0), false);
        assert_eq!(tracker.handle(&KeyEvent::press(Key::Down, t0), false), None);

        tracker.handle(&KeyEvent::press(Key::Other("F9".into()), t0), false);
        assert_eq!(
            tracker.handle(&KeyEvent::press(Key::Down, t0), false),
            Some(Gesture::CaptureScreenshot)
        );
    }

    #[test]
    fn gesture_display() {
        assert_eq!(Gesture::StartRecording.to_string(), "start-recording");
        assert_eq!(Gesture::SendClipboard.to_string(), "send-clipboard");
    }
}
