//! bomsmith -- SPDX SBOM generator command-line interface

mod cli;
mod commands;
mod error;
mod logging;

use std::process::ExitCode;

use clap::Parser;

use bomsmith_core::config::BomsmithConfig;

use crate::cli::{Cli, Commands};
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = BomsmithConfig::load_or_default(&cli.settings).await?;

    if let Some(level) = cli.log_level {
        config.general.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.general.log_format = format.as_str().to_owned();
    }
    config.validate()?;

    logging::init_tracing(&config.general).map_err(|e| CliError::Config(e.to_string()))?;
    bomsmith_core::metrics::describe_all();

    tracing::debug!(settings = %cli.settings.display(), "bomsmith starting");

    match cli.command {
        Commands::Generate(args) => commands::generate::execute(args, &config).await,
        Commands::Config(args) => commands::config::execute(args, &cli.settings, &config).await,
    }
}
