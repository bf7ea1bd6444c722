//! Sweep controller: drives the full parameter grid and streams results.

use anyhow::{Context, Result};
use gatetune_gates::{GridPoint, SweepConfig, GATE_CATALOG};
use gatetune_report::{parse_accuracies, select_best_all, write_summary, MatrixWriter};
use gatetune_template::VariantGenerator;
use gatetune_toolchain::{run_trials, RemoveOnDrop, Toolchain};
use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// Tally of a completed sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepOutcome {
    pub points_total: usize,
    pub points_failed: usize,
}

/// One sweep run over the configured grid.
///
/// Per grid point, in row-major order: render the shared variant pair,
/// build, run once, parse, and buffer one column per gate. When a
/// threshold's delay list completes, the row is flushed to every gate's
/// matrix file, so an interrupted sweep leaves a usable prefix.
pub struct SweepSession {
    config: SweepConfig,
    toolchain: Toolchain,
    generator: VariantGenerator,
}

impl SweepSession {
    pub fn new(config: SweepConfig, toolchain: Toolchain) -> Result<Self> {
        let generator = VariantGenerator::load(
            &config.resolve(&config.compose_template),
            &config.resolve(&config.main_template),
        )?;
        Ok(Self {
            config,
            toolchain,
            generator,
        })
    }

    pub fn run(&self) -> Result<SweepOutcome> {
        let thresholds = self.config.grid.thresholds();
        let delays = &self.config.grid.delays;
        let total = thresholds.len() * delays.len();

        let results_dir = self.config.resolve(&self.config.results_dir);
        let mut writer =
            MatrixWriter::create(&results_dir, delays).context("opening result matrices")?;

        info!(total, "starting grid sweep");
        let started = Instant::now();
        let mut counter = 0usize;
        let mut failed = 0usize;

        for &threshold in &thresholds {
            let mut rows: HashMap<&'static str, Vec<f64>> = GATE_CATALOG
                .iter()
                .map(|gate| (gate.name, Vec::with_capacity(delays.len())))
                .collect();

            for &delay in delays {
                counter += 1;
                log_progress(counter, total, threshold, delay, started.elapsed().as_secs_f64());

                let point = GridPoint { threshold, delay };
                let accuracies = match self.measure_point(point) {
                    Ok(accuracies) => accuracies,
                    Err(err) => {
                        warn!(threshold, delay, %err, "grid point failed; recording zeros");
                        failed += 1;
                        HashMap::new()
                    }
                };

                for gate in GATE_CATALOG {
                    let accuracy = accuracies.get(gate.name).copied().unwrap_or(0.0);
                    rows.entry(gate.name).or_default().push(accuracy);
                }
            }

            for gate in GATE_CATALOG {
                writer
                    .append_row(gate.name, threshold, &rows[gate.name])
                    .with_context(|| format!("flushing row for {} gate", gate.name))?;
            }
        }

        info!(
            total,
            failed,
            elapsed_s = started.elapsed().as_secs(),
            "sweep complete"
        );

        let records = select_best_all(&results_dir)?;
        let summary_file = self.config.resolve(&self.config.summary_file);
        write_summary(&summary_file, &records)?;
        info!(summary = %summary_file.display(), "summary written");

        Ok(SweepOutcome {
            points_total: total,
            points_failed: failed,
        })
    }

    /// Measure one grid point: generate, build, run, parse. Generated
    /// sources and the temporary executable are removed on every exit path.
    fn measure_point(&self, point: GridPoint) -> Result<HashMap<String, f64>> {
        let work_dir = &self.config.work_dir;
        let sources = self.generator.write_sweep_variant(work_dir, point)?;

        // One grid point is in flight at a time, so the sweep reuses a
        // single temporary name pair.
        let object = self.config.build_dir.join("compose.o");
        let exe = Path::new("main_temp.elf");
        let _exe_cleanup = RemoveOnDrop(work_dir.join(exe));
        let _object_cleanup = RemoveOnDrop(self.config.resolve(&object));

        self.toolchain.build(work_dir, &sources, &object, exe)?;
        let output = run_trials(exe, self.config.trials, work_dir);
        Ok(parse_accuracies(&output))
    }
}

fn log_progress(counter: usize, total: usize, threshold: u32, delay: u32, elapsed_s: f64) {
    if counter > 1 {
        let eta = elapsed_s / (counter - 1) as f64 * (total - counter + 1) as f64;
        info!(
            point = format!("{counter}/{total}"),
            threshold,
            delay,
            eta_s = eta as u64,
            "testing combination"
        );
    } else {
        info!(
            point = format!("{counter}/{total}"),
            threshold,
            delay,
            "testing combination"
        );
    }
}
