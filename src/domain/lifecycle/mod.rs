//! Agent lifecycle domain module

mod state;

pub use state::{InvalidStateTransition, Lifecycle, LifecycleState, ShutdownCause};
