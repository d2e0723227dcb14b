//! `bomsmith config` command handler

use std::io::Write;
use std::path::Path;

use tracing::info;

use bomsmith_core::config::BomsmithConfig;

use crate::cli::{ConfigAction, ConfigArgs};
use crate::error::CliError;

/// Execute the `config` command.
///
/// `effective` is the configuration already loaded at startup
/// (file + env overrides + defaults, plus global flag overrides).
pub async fn execute(
    args: ConfigArgs,
    settings_path: &Path,
    effective: &BomsmithConfig,
) -> Result<(), CliError> {
    match args.action {
        ConfigAction::Validate => execute_validate(settings_path).await,
        ConfigAction::Show => execute_show(effective),
    }
}

/// Load the settings file strictly: a missing file is an error here.
async fn execute_validate(settings_path: &Path) -> Result<(), CliError> {
    info!(path = %settings_path.display(), "validating settings");

    BomsmithConfig::load(settings_path)
        .await
        .map_err(|e| CliError::Config(format!("{}: {e}", settings_path.display())))?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}: valid", settings_path.display())?;
    Ok(())
}

fn execute_show(effective: &BomsmithConfig) -> Result<(), CliError> {
    let rendered = toml::to_string_pretty(effective)
        .map_err(|e| CliError::Command(format!("failed to render settings: {e}")))?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(rendered.as_bytes())?;
    Ok(())
}
