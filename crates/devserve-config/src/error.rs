//! Error types for configuration loading and validation.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("unsupported configuration format: .{0} (expected .toml, .json, .yaml, or .yml)")]
    UnsupportedFormat(String),

    #[error("invalid config value for '{field}': {hint}")]
    InvalidValue { field: String, hint: String },

    #[error("static directory not found: {0}")]
    StaticDirNotFound(PathBuf),

    #[error("static directory is not a directory: {0}")]
    StaticDirNotADirectory(PathBuf),

    // Startup would have no serving mode and no watch pipeline to run.
    #[error("nothing to do: no command, no static directory, and no watch directories configured")]
    NothingToServe,

    #[error("failed to merge configuration: {0}")]
    Merge(#[from] Box<figment::Error>),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Merge(Box::new(err))
    }
}
