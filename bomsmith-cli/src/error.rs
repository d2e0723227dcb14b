//! CLI-specific error types and exit code mapping

use bomsmith_core::error::BomsmithError;
use bomsmith_spdx::SpdxError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to standard Unix exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// IO error without a known path.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Writing the rendered document failed.
    #[error("io error: {path}: {source}")]
    Output {
        /// Destination path, or `<stdout>`.
        path: String,
        source: std::io::Error,
    },

    /// Wrapped error from bomsmith-core.
    #[error("{0}")]
    Core(#[from] BomsmithError),

    /// Document generation or export error.
    #[error("{0}")]
    Spdx(#[from] SpdxError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                          |
    /// |------|----------------------------------|
    /// | 0    | Success                          |
    /// | 1    | Generation / command error       |
    /// | 2    | Configuration error              |
    /// | 10   | IO error                         |
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Io(_) | Self::Output { .. } => 10,
            Self::Command(_) => 1,
            Self::Core(e) => match e {
                BomsmithError::Config(_) => 2,
                BomsmithError::Io(_) => 10,
                BomsmithError::Generation(_) | BomsmithError::Provenance(_) => 1,
            },
            Self::Spdx(e) if e.is_config() => 2,
            Self::Spdx(SpdxError::Io { .. }) => 10,
            Self::Spdx(_) => 1,
        }
    }
}
