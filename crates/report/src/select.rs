//! Best-configuration selection over persisted matrices.

use crate::matrix::{matrix_path, ResultMatrix};
use anyhow::{Context, Result};
use gatetune_gates::{BestConfig, GATE_CATALOG};
use std::fs;
use std::path::Path;
use tracing::info;

/// Scan one matrix in stored row-major order for the grid point with
/// maximal accuracy. The comparison is strictly greater-than, so the first
/// occurrence of a tied maximum wins; that relies on rows being persisted
/// in ascending-threshold order and columns in delay-list order.
pub fn select_best(gate: &str, matrix: &ResultMatrix) -> BestConfig {
    let mut best = BestConfig {
        gate: gate.to_string(),
        threshold: 0,
        delay: 0,
        accuracy: 0.0,
    };

    for (threshold, values) in &matrix.rows {
        for (column, &accuracy) in values.iter().enumerate() {
            let Some(&delay) = matrix.delays.get(column) else {
                continue;
            };
            if accuracy > best.accuracy {
                best.accuracy = accuracy;
                best.threshold = *threshold;
                best.delay = delay;
            }
        }
    }

    best
}

/// Select the best configuration for every catalogued gate from its
/// persisted matrix file.
pub fn select_best_all(results_dir: &Path) -> Result<Vec<BestConfig>> {
    let mut records = Vec::with_capacity(GATE_CATALOG.len());
    for gate in GATE_CATALOG {
        let path = matrix_path(results_dir, gate.name);
        let matrix = ResultMatrix::load(&path)
            .with_context(|| format!("loading matrix for {} gate", gate.name))?;
        let best = select_best(gate.name, &matrix);
        info!(gate = gate.name, threshold = best.threshold, delay = best.delay,
              accuracy = best.accuracy, "selected best configuration");
        records.push(best);
    }
    Ok(records)
}

/// Write the consolidated summary file, one line per gate.
pub fn write_summary(path: &Path, records: &[BestConfig]) -> Result<()> {
    let mut out = String::from("Best configurations for each gate:\n");
    for record in records {
        out.push_str(&record.summary_line());
        out.push('\n');
    }
    fs::write(path, out).with_context(|| format!("writing summary {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn matrix(delays: &[u32], rows: &[(u32, &[f64])]) -> ResultMatrix {
        ResultMatrix {
            delays: delays.to_vec(),
            rows: rows
                .iter()
                .map(|(t, values)| (*t, values.to_vec()))
                .collect(),
        }
    }

    #[test]
    fn selects_global_maximum() {
        let matrix = matrix(
            &[32, 64],
            &[(100, &[10.0, 20.0][..]), (125, &[95.5, 30.0][..])],
        );
        let best = select_best("AND", &matrix);
        assert_eq!(best.threshold, 125);
        assert_eq!(best.delay, 32);
        assert_abs_diff_eq!(best.accuracy, 95.5);
    }

    #[test]
    fn first_of_equal_maxima_wins() {
        let matrix = matrix(
            &[32, 64],
            &[(100, &[50.0, 88.8][..]), (125, &[88.8, 10.0][..])],
        );
        let best = select_best("XOR", &matrix);
        // Row-major order: (100, 64) precedes (125, 32).
        assert_eq!((best.threshold, best.delay), (100, 64));
    }

    #[test]
    fn empty_matrix_selects_zero_record() {
        let matrix = matrix(&[32], &[]);
        let best = select_best("OR", &matrix);
        assert_eq!((best.threshold, best.delay), (0, 0));
        assert_eq!(best.accuracy, 0.0);
    }

    #[test]
    fn extra_columns_beyond_delay_list_ignored() {
        let matrix = matrix(&[32], &[(100, &[10.0, 99.0][..])]);
        let best = select_best("NOT", &matrix);
        assert_eq!(best.delay, 32);
        assert_abs_diff_eq!(best.accuracy, 10.0);
    }

    #[test]
    fn summary_file_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.txt");
        let records = vec![BestConfig {
            gate: "NOT".to_string(),
            threshold: 150,
            delay: 512,
            accuracy: 91.0,
        }];
        write_summary(&path, &records).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "Best configurations for each gate:\nNOT: Threshold=150, Delay=512, Accuracy=91.0%\n"
        );
    }
}
