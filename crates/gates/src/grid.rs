//! Parameter grid model.

use serde::{Deserialize, Serialize};

/// One (threshold, delay) parameter pair under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPoint {
    pub threshold: u32,
    pub delay: u32,
}

/// The full parameter grid: an inclusive arithmetic progression of
/// thresholds crossed with a fixed, ordered list of delays.
///
/// Enumeration is row-major (outer loop thresholds ascending, inner loop
/// delays in listed order). The selector's tie-break relies on this order,
/// so it must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    pub threshold_start: u32,
    pub threshold_stop: u32,
    pub threshold_step: u32,
    pub delays: Vec<u32>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            threshold_start: 100,
            threshold_stop: 300,
            threshold_step: 25,
            delays: vec![32, 48, 64, 96, 128, 192, 256, 512, 1024],
        }
    }
}

impl GridConfig {
    /// Threshold values in ascending order, both bounds inclusive.
    pub fn thresholds(&self) -> Vec<u32> {
        let step = self.threshold_step.max(1);
        (self.threshold_start..=self.threshold_stop)
            .step_by(step as usize)
            .collect()
    }

    /// Total number of grid points.
    pub fn len(&self) -> usize {
        self.thresholds().len() * self.delays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row-major enumeration of the grid.
    pub fn points(&self) -> Vec<GridPoint> {
        let mut points = Vec::with_capacity(self.len());
        for threshold in self.thresholds() {
            for &delay in &self.delays {
                points.push(GridPoint { threshold, delay });
            }
        }
        points
    }
}
