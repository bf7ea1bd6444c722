//! Gate catalogue and sweep data model for GateTune.

pub mod catalog;
pub mod config;
pub mod grid;

pub use catalog::{gate_by_name, GateSpec, DEFAULT_BEST, GATE_CATALOG};
pub use config::{BestConfig, SweepConfig};
pub use grid::{GridConfig, GridPoint};
