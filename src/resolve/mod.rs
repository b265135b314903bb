// src/resolve/mod.rs

//! Dependency discovery.
//!
//! Starting from the root command, this walks the import graph breadth-first
//! and collects every unit (package) the program transitively depends on.
//! Only *discovery* happens here: nothing is built, versioned or cached.
//!
//! - [`unit`] defines the [`Unit`] model and the [`UnitSource`] seam.
//! - [`go_list`] is the production source backed by `go list -json`.
//! - [`resolver`] runs the level-by-level traversal.
//! - [`graph`] orders the discovered units for display.

pub mod go_list;
pub mod graph;
pub mod resolver;
pub mod unit;

pub use go_list::GoListSource;
pub use graph::DependencyGraph;
pub use resolver::{Resolution, resolve, skipped_imports};
pub use unit::{INTEROP_SENTINEL, Unit, UnitId, UnitSource, is_skipped_import};
