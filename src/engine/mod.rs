// src/engine/mod.rs

//! Orchestration between the watcher, the build executor and the supervisor.
//!
//! - [`debounce`] holds the debounce core and the trigger queue loop that
//!   turns bursts of change signals into single builds.
//! - [`signals`] forwards OS termination signals to the supervisor.

use std::path::PathBuf;

pub mod debounce;
pub mod signals;

pub use debounce::{Debouncer, run_trigger_queue};
pub use signals::spawn_signal_listener;

/// Capacity of the trigger channel between the watcher and the queue.
pub const TRIGGER_CHANNEL_CAPACITY: usize = 16;

/// A request for a (debounced) build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Issued once so the program builds and starts without any change.
    Startup,
    /// A watched path changed.
    FileChange(PathBuf),
}
