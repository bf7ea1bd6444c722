//! Binary finalizer: builds one specialized executable per gate.

use anyhow::{Context, Result};
use gatetune_gates::{gate_by_name, BestConfig, GridPoint, SweepConfig, DEFAULT_BEST, GATE_CATALOG};
use gatetune_report::{matrix_path, select_best_all};
use gatetune_template::VariantGenerator;
use gatetune_toolchain::Toolchain;
use std::fs;
use std::path::PathBuf;
use tracing::{error, info};

/// Tally of a finalize run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizeOutcome {
    /// Binaries present in the output directory after the run.
    pub built: Vec<PathBuf>,
    /// Gates whose build failed.
    pub failed: Vec<String>,
}

/// Resolve the best configuration per gate: from persisted sweep matrices
/// when present, otherwise from the built-in table of best-known values.
/// A results directory with no matrix files (a sweep interrupted before
/// its first write) counts as absent.
pub fn resolve_best_configs(config: &SweepConfig) -> Result<Vec<BestConfig>> {
    let results_dir = config.resolve(&config.results_dir);
    let has_matrices = GATE_CATALOG
        .iter()
        .any(|gate| matrix_path(&results_dir, gate.name).is_file());
    if has_matrices {
        let records =
            select_best_all(&results_dir).context("selecting from persisted matrices")?;
        info!(results_dir = %results_dir.display(), "using swept best configurations");
        return Ok(records);
    }

    info!("no sweep results on disk; using built-in best configurations");
    Ok(DEFAULT_BEST
        .iter()
        .map(|&(gate, threshold, delay)| BestConfig {
            gate: gate.to_string(),
            threshold,
            delay,
            accuracy: 0.0,
        })
        .collect())
}

/// Build one specialized binary per best-configuration record. A failure
/// for one gate does not stop the others; the outcome carries the tally.
pub fn finalize(
    config: &SweepConfig,
    toolchain: &Toolchain,
    records: &[BestConfig],
) -> Result<FinalizeOutcome> {
    let generator = VariantGenerator::load(
        &config.resolve(&config.compose_template),
        &config.resolve(&config.main_template),
    )?;
    let binaries_dir = config.resolve(&config.binaries_dir);
    fs::create_dir_all(&binaries_dir)
        .with_context(|| format!("creating {}", binaries_dir.display()))?;

    let mut failed = Vec::new();

    for record in records {
        let Some(gate) = gate_by_name(&record.gate) else {
            error!(gate = %record.gate, "not in the gate catalogue; skipping");
            failed.push(record.gate.clone());
            continue;
        };
        let stem = gate.file_stem();
        let point = GridPoint {
            threshold: record.threshold,
            delay: record.delay,
        };
        info!(
            gate = gate.name,
            threshold = point.threshold,
            delay = point.delay,
            "building specialized binary"
        );

        // Object and executable names embed the gate so parallel or repeated
        // invocations cannot clobber each other.
        let object = config.build_dir.join(format!("compose_{stem}.o"));
        let exe = config.binaries_dir.join(format!("main_{stem}.elf"));

        let result = generator
            .write_specialized_variant(&config.work_dir, point, gate)
            .and_then(|sources| build_one(toolchain, config, &sources, &object, &exe));

        if let Err(err) = result {
            error!(gate = gate.name, %err, "specialized build failed");
            failed.push(gate.name.to_string());
        }
    }

    let built = list_binaries(config)?;
    info!(
        built = built.len(),
        failed = failed.len(),
        total = records.len(),
        "finalize complete"
    );
    Ok(FinalizeOutcome { built, failed })
}

fn build_one(
    toolchain: &Toolchain,
    config: &SweepConfig,
    sources: &gatetune_template::GeneratedSources,
    object: &std::path::Path,
    exe: &std::path::Path,
) -> Result<()> {
    toolchain.build(&config.work_dir, sources, object, exe)?;
    Ok(())
}

/// Binaries actually present in the output directory, sorted by name.
fn list_binaries(config: &SweepConfig) -> Result<Vec<PathBuf>> {
    let binaries_dir = config.resolve(&config.binaries_dir);
    let mut built = Vec::new();
    for entry in fs::read_dir(&binaries_dir)
        .with_context(|| format!("listing {}", binaries_dir.display()))?
    {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "elf") {
            built.push(path);
        }
    }
    built.sort();
    Ok(built)
}
