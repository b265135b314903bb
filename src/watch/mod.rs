// src/watch/mod.rs

//! File watching and watch-set maintenance.
//!
//! This module is responsible for:
//! - Deciding which paths count as sources (`filter`).
//! - Expanding `--extra-watches` globs into absolute paths (`extra`).
//! - Owning the set of subscribed paths (`watch_set`).
//! - Turning `notify` events into watch-set updates and build triggers
//!   (`event`, `event_handler`, `watcher`).
//!
//! It does **not** know about builds or processes; it only emits
//! [`Trigger`](crate::engine::Trigger)s.

pub mod event;
pub mod event_handler;
pub mod extra;
pub mod filter;
pub mod walk;
pub mod watch_set;
pub mod watcher;

pub use event::FsOp;
pub use event_handler::{EventOutcome, EventPlan, apply_plan, plan_event};
pub use extra::{ExtraPathSet, expand_patterns};
pub use filter::SourceFilter;
pub use walk::collect_new_tree;
pub use watch_set::{PathSubscriber, WatchSet};
pub use watcher::{WatcherHandle, run_event_loop, spawn_watcher};
