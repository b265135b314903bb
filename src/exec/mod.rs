// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`build`] runs the external build command behind the [`Builder`] trait,
//!   so tests can replace it with a scripted fake.
//! - [`status`] renders the in-progress / ok / failed markers.
//! - [`supervisor`] owns the lifecycle of the built program.

pub mod build;
pub mod status;
pub mod supervisor;

pub use build::{BuildOutcome, Builder, GoInstall};
pub use status::{Status, StatusLine, configure_color};
pub use supervisor::{
    ProcessState, ProgramSpec, SupervisorHandle, SupervisorRequest, spawn_supervisor,
};
