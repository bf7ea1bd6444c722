//! Telemetry parsing, result-matrix persistence, and best-configuration
//! selection.

pub mod matrix;
pub mod parse;
pub mod select;

pub use matrix::{matrix_path, MatrixWriter, ResultMatrix};
pub use parse::parse_accuracies;
pub use select::{select_best, select_best_all, write_summary};
