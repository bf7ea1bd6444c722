//! Harness executable for GateTune.

use anyhow::Result;
use clap::Parser;
use gatetune_harness::{run_cli, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();
    run_cli(cli)
}
