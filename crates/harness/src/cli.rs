//! CLI wiring for the GateTune harness.

use crate::finalize::{finalize, resolve_best_configs};
use crate::sweep::SweepSession;
use anyhow::Result;
use clap::{Parser, Subcommand};
use gatetune_gates::{GridConfig, SweepConfig};
use gatetune_report::{select_best_all, write_summary};
use gatetune_toolchain::Toolchain;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "gatetune", about = "Gate simulator parameter-sweep harness")]
pub struct Cli {
    /// Directory generated sources are written under; the compiler runs here.
    #[arg(long, default_value = ".")]
    pub work_dir: PathBuf,

    /// Composition-unit template.
    #[arg(long, default_value = "gates/compose.cpp")]
    pub compose_template: PathBuf,

    /// Main-unit template.
    #[arg(long, default_value = "main.cpp")]
    pub main_template: PathBuf,

    /// Directory for intermediate object files.
    #[arg(long, default_value = "build")]
    pub build_dir: PathBuf,

    /// Directory for per-gate result matrices.
    #[arg(long, default_value = "grid-search-results")]
    pub results_dir: PathBuf,

    /// Consolidated best-configuration summary file.
    #[arg(long, default_value = "output.txt")]
    pub summary: PathBuf,

    /// Directory for specialized per-gate binaries.
    #[arg(long, default_value = "optimal-binaries")]
    pub binaries_dir: PathBuf,

    /// External compiler binary.
    #[arg(long, default_value = "g++")]
    pub compiler: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sweep the full threshold x delay grid and persist per-gate matrices.
    Sweep {
        /// Trials per grid point, forwarded to the simulator.
        #[arg(long, default_value_t = 10)]
        trials: u32,
        #[arg(long, default_value_t = 100)]
        threshold_start: u32,
        #[arg(long, default_value_t = 300)]
        threshold_stop: u32,
        #[arg(long, default_value_t = 25)]
        threshold_step: u32,
        /// Delay column values, in matrix column order.
        #[arg(long = "delay", value_name = "DELAY")]
        delays: Vec<u32>,
    },
    /// Re-select best configurations from persisted matrices and rewrite
    /// the summary.
    Select {
        /// Also dump the selected records as JSON.
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Build one specialized binary per gate from its best configuration.
    Finalize,
}

impl Cli {
    fn to_config(&self) -> SweepConfig {
        SweepConfig {
            compose_template: self.compose_template.clone(),
            main_template: self.main_template.clone(),
            work_dir: self.work_dir.clone(),
            build_dir: self.build_dir.clone(),
            results_dir: self.results_dir.clone(),
            summary_file: self.summary.clone(),
            binaries_dir: self.binaries_dir.clone(),
            ..SweepConfig::default()
        }
    }

    fn toolchain(&self) -> Toolchain {
        Toolchain::default().with_compiler(self.compiler.clone())
    }
}

pub fn run_cli(cli: Cli) -> Result<()> {
    tracing_subscriber::fmt::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let toolchain = cli.toolchain();
    let mut config = cli.to_config();

    match &cli.command {
        Command::Sweep {
            trials,
            threshold_start,
            threshold_stop,
            threshold_step,
            delays,
        } => {
            let mut grid = GridConfig {
                threshold_start: *threshold_start,
                threshold_stop: *threshold_stop,
                threshold_step: *threshold_step,
                ..GridConfig::default()
            };
            if !delays.is_empty() {
                grid.delays = delays.clone();
            }
            config = config.with_grid(grid).with_trials(*trials);

            let session = SweepSession::new(config, toolchain)?;
            let outcome = session.run()?;
            println!(
                "Sweep complete: {}/{} grid points measured ({} failed).",
                outcome.points_total - outcome.points_failed,
                outcome.points_total,
                outcome.points_failed
            );
        }
        Command::Select { json } => {
            let results_dir = config.resolve(&config.results_dir);
            let records = select_best_all(&results_dir)?;
            let summary = config.resolve(&config.summary_file);
            write_summary(&summary, &records)?;
            if let Some(json_path) = json {
                let blob = serde_json::to_vec_pretty(&records)?;
                std::fs::write(config.resolve(json_path), blob)?;
            }
            println!("Best configurations for each gate:");
            for record in &records {
                println!("{}", record.summary_line());
            }
            info!(summary = %summary.display(), "summary written");
        }
        Command::Finalize => {
            let records = resolve_best_configs(&config)?;
            let outcome = finalize(&config, &toolchain, &records)?;
            println!(
                "Build summary: {}/{} binaries created successfully.",
                records.len() - outcome.failed.len(),
                records.len()
            );
            for path in &outcome.built {
                println!("  - {}", path.display());
            }
        }
    }

    Ok(())
}
