//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use bomsmith_spdx::DocumentFormat;

/// bomsmith -- SPDX SBOM generator.
///
/// Use `bomsmith <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "bomsmith", version, about, long_about = None)]
pub struct Cli {
    /// Path to the bomsmith.toml settings file.
    #[arg(long, global = true, default_value = "bomsmith.toml")]
    pub settings: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Override log format.
    #[arg(long, global = true)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported log formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Machine-readable JSON lines.
    Json,
    /// Human-readable multi-line output.
    Pretty,
}

impl LogFormat {
    /// Name used in the `[general]` settings section.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Pretty => "pretty",
        }
    }
}

/// Supported document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// SPDX tag-value text.
    #[default]
    TagValue,
    /// SPDX 2.3 JSON.
    Json,
}

impl From<OutputFormat> for DocumentFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::TagValue => DocumentFormat::TagValue,
            OutputFormat::Json => DocumentFormat::Json,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate an SPDX document from images, archives, directories and files.
    Generate(GenerateArgs),

    /// Manage bomsmith.toml settings.
    Config(ConfigArgs),
}

// ---- generate ----

/// Generate an SPDX document.
#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// Container image reference to analyze (repeatable).
    #[arg(short = 'i', long = "image", value_name = "REF")]
    pub images: Vec<String>,

    /// File to include (repeatable).
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    pub files: Vec<String>,

    /// Local image tarball to analyze (repeatable).
    #[arg(long = "image-archive", value_name = "PATH")]
    pub image_archives: Vec<String>,

    /// Archive (tar, tar.gz) to analyze (repeatable).
    #[arg(long = "archive", value_name = "PATH")]
    pub archives: Vec<String>,

    /// Directory to include (repeatable).
    #[arg(short = 'd', long = "dirs", value_name = "DIR")]
    pub directories: Vec<String>,

    /// Regular expression of relative paths to skip in directories (repeatable).
    #[arg(long = "ignore", value_name = "REGEX")]
    pub ignore_patterns: Vec<String>,

    /// Do not apply .gitignore rules when walking directories.
    #[arg(long)]
    pub no_gitignore: bool,

    /// Do not read go.mod dependencies.
    #[arg(long)]
    pub no_gomod: bool,

    /// Include only direct go module dependencies.
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub no_transient: Option<bool>,

    /// Document namespace URI.
    #[arg(short = 'n', long)]
    pub namespace: Option<String>,

    /// Document name.
    #[arg(long)]
    pub name: Option<String>,

    /// SPDX license identifier declared on top-level packages.
    #[arg(short = 'l', long)]
    pub license: Option<String>,

    /// Write the document to this file instead of stdout.
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Document format.
    #[arg(long, default_value = "tag-value")]
    pub format: OutputFormat,

    /// Analyze image layers.
    #[arg(short = 'a', long = "analyze-images")]
    pub analyze_images: bool,

    /// Scan OS packages inside images.
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub scan_images: Option<bool>,

    /// SBOM configuration file declaring artifacts and metadata.
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    pub config_file: Option<String>,

    /// Also write an in-toto provenance statement to this file.
    #[arg(long, value_name = "PATH")]
    pub provenance: Option<PathBuf>,

    /// Directory relative paths are resolved against.
    #[arg(short = 'C', long = "workdir", value_name = "DIR")]
    pub work_dir: Option<PathBuf>,

    /// Existing directories to include.
    #[arg(value_name = "PATH")]
    pub paths: Vec<String>,
}

// ---- config ----

/// Manage bomsmith.toml settings.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the settings file and report errors.
    Validate,
    /// Show the effective settings (file + env overrides + defaults).
    Show,
}
