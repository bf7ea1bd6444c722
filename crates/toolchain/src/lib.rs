//! External toolchain orchestration: command capture, the two-stage build
//! driver, and the trial runner.

pub mod build;
pub mod command;
pub mod runner;

pub use build::{BuildError, RemoveOnDrop, Toolchain};
pub use command::{capture, CommandOutput};
pub use runner::run_trials;
