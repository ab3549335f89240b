//! Multi-source configuration merging.

use std::path::Path;

use figment::{
    providers::{Env, Format as _, Json, Serialized, Toml, Yaml},
    Figment,
};
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::server::{ConfigOverrides, ServerConfig};

impl ServerConfig {
    /// Load configuration from multiple sources.
    ///
    /// Priority: CLI overrides > environment variables (`DEVSERVE_` prefix)
    /// > config file > defaults. The file format is selected by extension;
    /// an explicitly requested file must exist.
    pub fn load(file: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(path) = file {
            if !path.is_file() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            debug!(path = %path.display(), "merging config file");
            figment = merge_file(figment, path)?;
        }

        figment = figment
            .merge(Env::prefixed("DEVSERVE_"))
            .merge(Serialized::defaults(overrides.clone()));

        Ok(figment.extract()?)
    }
}

/// Merge a config file into the figment, choosing the provider by extension.
fn merge_file(figment: Figment, path: &Path) -> Result<Figment> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    match ext.as_str() {
        "toml" => Ok(figment.merge(Toml::file(path))),
        "json" => Ok(figment.merge(Json::file(path))),
        "yaml" | "yml" => Ok(figment.merge(Yaml::file(path))),
        other => Err(ConfigError::UnsupportedFormat(other.to_string())),
    }
}
