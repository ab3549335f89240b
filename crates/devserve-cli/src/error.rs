//! Error handling for the devserve CLI.
//!
//! A single top-level [`CliError`] covers every failure a command can hit.
//! Domain errors convert automatically via `#[from]`; the binary boundary
//! turns the final error into a miette diagnostic for reporting.

use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration loading or validation failures.
    #[error("Configuration error: {0}")]
    Config(#[from] devserve_config::ConfigError),

    /// I/O errors from file system operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File watching errors.
    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),

    /// A watch include/exclude pattern failed to compile.
    #[error("Invalid watch pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },

    /// HTTP server errors, including the fatal failure to bind.
    #[error("Server error: {0}")]
    Server(String),

    /// The managed command could not be spawned at all.
    #[error("Failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    /// Lifecycle violations and other supervisor failures.
    #[error("Process error: {0}")]
    Process(String),

    /// JSON serialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Convert a CliError into a miette Report for terminal diagnostics.
pub fn cli_error_to_miette(err: CliError) -> miette::Report {
    match err {
        CliError::Config(e) => miette::miette!(
            help = "run `devserve check` to inspect the effective configuration",
            "{e}"
        ),
        CliError::Server(msg) => miette::miette!(
            help = "is another process already listening on this address?",
            "Server error: {msg}"
        ),
        CliError::Spawn { command, source } => miette::miette!(
            help = "the command runs through the platform shell; check it works there",
            "Failed to spawn '{command}': {source}"
        ),
        other => miette::miette!("{other}"),
    }
}
