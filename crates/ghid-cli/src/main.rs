use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use ghid_cli::bootstrap::init_tracing;
use ghid_cli::cli_args::Cli;

fn main() -> Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();
    ghid_cli::run(cli)
}
