// src/config/mod.rs

//! Configuration for rewatch.
//!
//! Responsibilities:
//! - Define the runtime `Config` and the optional TOML file model (`model.rs`).
//! - Load the config file from disk (`loader.rs`).
//! - Merge CLI flags over file values and validate them (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_config, load_file};
pub use model::{
    BuildSection, Config, ConfigFile, DEFAULT_CONFIG_FILE, DEFAULT_QUIET_PERIOD, WatchSection,
};
pub use validate::{parse_install_env, split_list};
