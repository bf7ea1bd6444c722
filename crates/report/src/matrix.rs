//! Result-matrix persistence.
//!
//! One plain-text table per gate, rows indexed by threshold and columns by
//! delay. Rows are appended and flushed as soon as they complete, so an
//! interrupted sweep leaves a valid prefix on disk. That per-row flush is
//! the sweep's only durability guarantee.

use anyhow::{Context, Result};
use gatetune_gates::GATE_CATALOG;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const FIELD_WIDTH: usize = 10;

/// File name of one gate's matrix inside the results directory.
pub fn matrix_path(results_dir: &Path, gate: &str) -> PathBuf {
    results_dir.join(format!("{}_results.txt", gate.to_ascii_lowercase()))
}

/// Streaming writer over one file per catalogued gate.
pub struct MatrixWriter {
    files: HashMap<&'static str, BufWriter<File>>,
    delays: Vec<u32>,
}

impl MatrixWriter {
    /// Create (truncating) one matrix file per gate and write the two
    /// header lines.
    pub fn create(results_dir: &Path, delays: &[u32]) -> Result<Self> {
        fs::create_dir_all(results_dir)
            .with_context(|| format!("creating {}", results_dir.display()))?;

        let mut files = HashMap::new();
        for gate in GATE_CATALOG {
            let path = matrix_path(results_dir, gate.name);
            let file = File::create(&path)
                .with_context(|| format!("creating {}", path.display()))?;
            let mut writer = BufWriter::new(file);

            writeln!(writer, "# Results for {} gate", gate.name)?;
            let mut header = format!("{:<FIELD_WIDTH$}", "T\\D");
            for delay in delays {
                header.push_str(&format!("{delay:<FIELD_WIDTH$}"));
            }
            writeln!(writer, "{}", header.trim_end())?;
            writer.flush()?;

            files.insert(gate.name, writer);
        }

        Ok(Self {
            files,
            delays: delays.to_vec(),
        })
    }

    /// Append one completed row for one gate and flush it to disk.
    /// `values` must hold one accuracy per delay column, in column order.
    pub fn append_row(&mut self, gate: &str, threshold: u32, values: &[f64]) -> Result<()> {
        anyhow::ensure!(
            values.len() == self.delays.len(),
            "row for {gate} has {} values, expected {}",
            values.len(),
            self.delays.len()
        );
        let writer = self
            .files
            .get_mut(gate)
            .with_context(|| format!("unknown gate {gate}"))?;

        let mut row = format!("{threshold:<FIELD_WIDTH$}");
        for value in values {
            row.push_str(&format!("{:<FIELD_WIDTH$}", format!("{value:.1}")));
        }
        writeln!(writer, "{}", row.trim_end())?;
        writer.flush().context("flushing result row")?;
        Ok(())
    }
}

/// A matrix read back from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultMatrix {
    /// Column delays, recovered from the file's own header line.
    pub delays: Vec<u32>,
    /// `(threshold, accuracies)` rows in stored order. A row may be shorter
    /// than the delay list if the sweep was interrupted mid-write.
    pub rows: Vec<(u32, Vec<f64>)>,
}

impl ResultMatrix {
    /// Parse a persisted matrix file. The first two lines are the comment
    /// and column headers; unparsable trailing fields are skipped, matching
    /// the writer's tolerance for interrupted sweeps.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let mut lines = text.lines();

        let _comment = lines.next();
        let delays = lines
            .next()
            .map(|header| {
                header
                    .split_whitespace()
                    .skip(1) // the T\D corner label
                    .filter_map(|field| field.parse::<u32>().ok())
                    .collect()
            })
            .unwrap_or_default();

        let mut rows = Vec::new();
        for line in lines {
            let mut fields = line.split_whitespace();
            let Some(threshold) = fields.next().and_then(|f| f.parse::<u32>().ok()) else {
                continue;
            };
            let values = fields.filter_map(|f| f.parse::<f64>().ok()).collect();
            rows.push((threshold, values));
        }

        Ok(Self { delays, rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn rows_survive_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let delays = [32, 64];
        let mut writer = MatrixWriter::create(dir.path(), &delays).unwrap();
        writer.append_row("XOR", 100, &[12.5, 50.0]).unwrap();
        writer.append_row("XOR", 125, &[87.3, 0.0]).unwrap();
        drop(writer);

        let matrix = ResultMatrix::load(&matrix_path(dir.path(), "XOR")).unwrap();
        assert_eq!(matrix.delays, vec![32, 64]);
        assert_eq!(matrix.rows.len(), 2);
        assert_eq!(matrix.rows[0].0, 100);
        assert_abs_diff_eq!(matrix.rows[1].1[0], 87.3);
    }

    #[test]
    fn every_gate_gets_a_file_with_headers() {
        let dir = tempfile::tempdir().unwrap();
        let writer = MatrixWriter::create(dir.path(), &[32]).unwrap();
        drop(writer);

        for gate in GATE_CATALOG {
            let path = matrix_path(dir.path(), gate.name);
            let text = fs::read_to_string(&path).unwrap();
            let mut lines = text.lines();
            assert_eq!(
                lines.next().unwrap(),
                format!("# Results for {} gate", gate.name)
            );
            assert!(lines.next().unwrap().starts_with("T\\D"));
        }
    }

    #[test]
    fn header_fields_are_fixed_width() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = MatrixWriter::create(dir.path(), &[32, 1024]).unwrap();
        writer.append_row("AND", 100, &[1.0, 2.0]).unwrap();
        drop(writer);

        let text = fs::read_to_string(matrix_path(dir.path(), "AND")).unwrap();
        let header = text.lines().nth(1).unwrap();
        assert_eq!(&header[0..10], "T\\D       ");
        assert_eq!(&header[10..20], "32        ");
        let row = text.lines().nth(2).unwrap();
        assert_eq!(&row[0..10], "100       ");
        assert_eq!(&row[10..20], "1.0       ");
    }

    #[test]
    fn rows_flushed_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = MatrixWriter::create(dir.path(), &[32]).unwrap();
        writer.append_row("NOT", 100, &[75.0]).unwrap();
        // Read back while the writer is still open.
        let matrix = ResultMatrix::load(&matrix_path(dir.path(), "NOT")).unwrap();
        assert_eq!(matrix.rows, vec![(100, vec![75.0])]);
        drop(writer);
    }

    #[test]
    fn row_width_must_match_delay_columns() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = MatrixWriter::create(dir.path(), &[32, 64]).unwrap();
        assert!(writer.append_row("AND", 100, &[1.0]).is_err());
        assert!(writer.append_row("AND", 100, &[1.0, 2.0, 3.0]).is_err());
        writer.append_row("AND", 100, &[1.0, 2.0]).unwrap();
    }

    #[test]
    fn truncated_final_row_is_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nand_results.txt");
        fs::write(
            &path,
            "# Results for NAND gate\nT\\D       32        64\n100       50.0      60.0\n125       70.0\n",
        )
        .unwrap();
        let matrix = ResultMatrix::load(&path).unwrap();
        assert_eq!(matrix.rows.len(), 2);
        assert_eq!(matrix.rows[1].1, vec![70.0]);
    }
}
