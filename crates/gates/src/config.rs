//! Sweep configuration and selected-configuration records.

use crate::grid::GridConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Everything a sweep or finalize run needs to know: the grid, the trial
/// count handed to the simulator, and the on-disk layout.
///
/// Defaults mirror the layout the simulator sources ship with; every field
/// is overridable from the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    pub grid: GridConfig,

    /// Trials per grid point, forwarded to the simulator's `-t` flag.
    pub trials: u32,

    /// Composition-unit template.
    pub compose_template: PathBuf,
    /// Main-unit template.
    pub main_template: PathBuf,

    /// Working directory generated sources are written under and the
    /// compiler runs in. The compose unit lands in its `gates/` subdirectory
    /// so the main unit's include path resolves.
    pub work_dir: PathBuf,
    /// Object files from the compile stage.
    pub build_dir: PathBuf,
    /// Per-gate result matrices.
    pub results_dir: PathBuf,
    /// Consolidated best-configuration summary.
    pub summary_file: PathBuf,
    /// Specialized per-gate executables.
    pub binaries_dir: PathBuf,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            trials: 10,
            compose_template: PathBuf::from("gates/compose.cpp"),
            main_template: PathBuf::from("main.cpp"),
            work_dir: PathBuf::from("."),
            build_dir: PathBuf::from("build"),
            results_dir: PathBuf::from("grid-search-results"),
            summary_file: PathBuf::from("output.txt"),
            binaries_dir: PathBuf::from("optimal-binaries"),
        }
    }
}

impl SweepConfig {
    pub fn with_grid(mut self, grid: GridConfig) -> Self {
        self.grid = grid;
        self
    }

    pub fn with_trials(mut self, trials: u32) -> Self {
        self.trials = trials;
        self
    }

    /// Resolve a configured path against the working directory. Absolute
    /// paths pass through; relative paths are anchored at `work_dir`, the
    /// same rule the compiler invocation uses.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.work_dir.join(path)
        }
    }
}

/// The winning grid point for one gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestConfig {
    pub gate: String,
    pub threshold: u32,
    pub delay: u32,
    pub accuracy: f64,
}

impl BestConfig {
    /// Summary line format consumed by downstream tooling; keep stable.
    pub fn summary_line(&self) -> String {
        format!(
            "{}: Threshold={}, Delay={}, Accuracy={:.1}%",
            self.gate, self.threshold, self.delay, self.accuracy
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_line_format() {
        let best = BestConfig {
            gate: "XOR".to_string(),
            threshold: 275,
            delay: 1024,
            accuracy: 87.25,
        };
        assert_eq!(
            best.summary_line(),
            "XOR: Threshold=275, Delay=1024, Accuracy=87.2%"
        );
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = SweepConfig::default().with_trials(3);
        let json = serde_json::to_string(&config).unwrap();
        let back: SweepConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.trials, 3);
        assert_eq!(back.grid, config.grid);
    }
}
