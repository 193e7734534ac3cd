//! ai-screenshooter - hotkey agent for a code-challenge session
//!
//! A background agent listens for global keyboard gestures. It captures
//! screenshots of the focused window, uploads them in batches, forwards
//! clipboard text and records, transcribes and sends voice notes.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Lock record, gesture tracking, lifecycle states, audio frames, config
//! - **Application**: Port interfaces (traits), gesture dispatcher, recording session and actions
//! - **Infrastructure**: Adapter implementations (rdev, screenshots, cpal, Gemini, reqwest, etc.)
//! - **CLI**: Argument parsing, single-instance lock, signals, backgrounding and the agent runner

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
