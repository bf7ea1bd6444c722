//! Sweep controller, binary finalizer, and CLI wiring for GateTune.

pub mod cli;
pub mod finalize;
pub mod sweep;

pub use cli::{run_cli, Cli};
pub use finalize::{finalize, resolve_best_configs, FinalizeOutcome};
pub use sweep::{SweepOutcome, SweepSession};
