//! Global key listener using rdev
//!
//! rdev's `listen` blocks its thread for the life of the process, so it runs
//! on a dedicated OS thread and forwards events over a channel.

use std::time::Instant;

use rdev::{listen, Event, EventType, Key as RdevKey};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error};

use crate::application::ports::{InputError, KeyEventSource};
use crate::domain::gesture::{Key, KeyEvent};

/// Process-wide keyboard hook
pub struct RdevKeyListener;

impl RdevKeyListener {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RdevKeyListener {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyEventSource for RdevKeyListener {
    fn start(&self, events: UnboundedSender<KeyEvent>) -> Result<(), InputError> {
        std::thread::Builder::new()
            .name("key-listener".into())
            .spawn(move || {
                let callback = move |event: Event| {
                    if let Some(key_event) = translate(&event, Instant::now()) {
                        // A closed channel means the agent is shutting down
                        let _ = events.send(key_event);
                    }
                };

                debug!("keyboard listener started");
                if let Err(e) = listen(callback) {
                    error!(error = ?e, "Keyboard listener stopped");
                }
            })
            .map_err(|e| InputError::StartFailed(e.to_string()))?;

        Ok(())
    }
}

/// Convert an rdev event into a key event; mouse and wheel events are dropped
fn translate(event: &Event, at: Instant) -> Option<KeyEvent> {
    match event.event_type {
        EventType::KeyPress(key) => Some(KeyEvent::press(map_key(key), at)),
        EventType::KeyRelease(key) => Some(KeyEvent::release(map_key(key), at)),
        _ => None,
    }
}

fn map_key(key: RdevKey) -> Key {
    match key {
        RdevKey::Escape => Key::Escape,
        RdevKey::UpArrow => Key::Up,
        RdevKey::DownArrow => Key::Down,
        RdevKey::LeftArrow => Key::Left,
        RdevKey::RightArrow => Key::Right,
        other => Key::Other(format!("{:?}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::gesture::KeyEventKind;
    use std::time::SystemTime;

    fn event(event_type: EventType) -> Event {
        Event {
            time: SystemTime::now(),
            name: None,
            event_type,
        }
    }

    #[test]
    fn maps_gesture_keys() {
        assert_eq!(map_key(RdevKey::Escape), Key::Escape);
        assert_eq!(map_key(RdevKey::UpArrow), Key::Up);
        assert_eq!(map_key(RdevKey::DownArrow), Key::Down);
        assert_eq!(map_key(RdevKey::LeftArrow), Key::Left);
        assert_eq!(map_key(RdevKey::RightArrow), Key::Right);
    }

    #[test]
    fn other_keys_keep_their_name() {
        assert_eq!(map_key(RdevKey::KeyA), Key::Other("KeyA".into()));
        assert_eq!(map_key(RdevKey::Unknown(42)), Key::Other("Unknown(42)".into()));
    }

    #[test]
    fn translates_press_and_release() {
        let now = Instant::now();
        let press = translate(&event(EventType::KeyPress(RdevKey::Escape)), now).unwrap();
        assert_eq!(press.kind, KeyEventKind::Press);
        assert_eq!(press.key, Key::Escape);

        let release = translate(&event(EventType::KeyRelease(RdevKey::DownArrow)), now).unwrap();
        assert_eq!(release.kind, KeyEventKind::Release);
        assert_eq!(release.key, Key::Down);
    }

    #[test]
    fn ignores_mouse_events() {
        let now = Instant::now();
        assert!(translate(&event(EventType::MouseMove { x: 1.0, y: 2.0 }), now).is_none());
    }
}
