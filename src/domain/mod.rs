//! Domain layer - Core business logic
//!
//! Contains value objects, state machines, and domain errors.
//! This layer has no dependencies on external systems.

pub mod artifacts;
pub mod config;
pub mod error;
pub mod gesture;
pub mod lifecycle;
pub mod lock;
pub mod recording;

// Re-export common types
pub use artifacts::PendingArtifacts;
pub use config::AppConfig;
pub use error::*;
pub use gesture::{Gesture, GestureTracker, Key, KeyEvent, KeyEventKind};
pub use lifecycle::{Lifecycle, LifecycleState, ShutdownCause};
pub use lock::{AcquireDecision, LockMetadata, LockStatus, ServerMode};
pub use recording::AudioFrames;
