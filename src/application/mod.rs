//! Application layer - Use cases and port interfaces
//!
//! Contains the gesture dispatcher, the actions behind each gesture
//! and the trait definitions for external system interactions.

pub mod dispatcher;
pub mod executor;
pub mod ports;
pub mod recording;

// Re-export use cases
pub use dispatcher::GestureDispatcher;
pub use executor::{ActionError, ActionExecutor, ActionPorts, ArtifactDirs};
pub use recording::RecordingSession;
