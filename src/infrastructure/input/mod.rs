//! Global keyboard input adapters

mod rdev_listener;

pub use rdev_listener::RdevKeyListener;
