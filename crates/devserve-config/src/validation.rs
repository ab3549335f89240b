//! Configuration consistency checks.
//!
//! Runs before any server component starts. Only conditions that would
//! leave the server with nothing to do, or with a serving mode that cannot
//! work, are fatal here; a missing watch directory is handled at runtime by
//! the watcher (log and continue).

use tracing::warn;

use crate::error::{ConfigError, Result};
use crate::server::ServerConfig;

/// Validate a merged configuration.
pub fn validate(config: &ServerConfig) -> Result<()> {
    if config.command.is_none()
        && config.static_dir.is_none()
        && config.watch_directories.is_empty()
    {
        return Err(ConfigError::NothingToServe);
    }

    if config.host.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "host".to_string(),
            hint: "bind address must not be empty".to_string(),
        });
    }

    // static_dir only matters when no command is configured; the serving
    // modes are mutually exclusive and the command wins.
    if config.command.is_none() {
        if let Some(dir) = &config.static_dir {
            if !dir.exists() {
                return Err(ConfigError::StaticDirNotFound(dir.clone()));
            }
            if !dir.is_dir() {
                return Err(ConfigError::StaticDirNotADirectory(dir.clone()));
            }
        }
    } else if config.static_dir.is_some() {
        warn!("both command and static_dir configured; static_dir is ignored");
    }

    for dir in &config.watch_directories {
        if !dir.exists() {
            warn!(path = %dir.display(), "watch directory does not exist yet");
        }
    }

    Ok(())
}
