//! The server configuration structure and its defaults.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Complete configuration for one dev server run.
///
/// Produced by [`ServerConfig::load`](crate::loading) and never mutated by
/// the server core. `command` and `static_dir` select the serving mode:
/// a configured command is supervised and restarted on changes; without a
/// command, `static_dir` is served over HTTP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Bind address for the HTTP server.
    #[serde(default = "defaults::host")]
    pub host: String,

    /// Bind port for the HTTP server.
    #[serde(default = "defaults::port")]
    pub port: u16,

    /// Shell command to run and restart on changes.
    #[serde(default)]
    pub command: Option<String>,

    /// Directories watched for changes. Empty disables the watch pipeline.
    #[serde(default)]
    pub watch_directories: Vec<PathBuf>,

    /// Glob patterns excluded from watching. Matched before any include
    /// pattern; a match here always drops the event.
    #[serde(default = "defaults::ignore")]
    pub ignore: Vec<String>,

    /// Glob patterns a changed path must match to count. Empty means all.
    #[serde(default)]
    pub include: Vec<String>,

    /// Quiet period between the last change and the reload trigger.
    #[serde(default = "defaults::debounce_ms")]
    pub debounce_ms: u64,

    /// Directory served over HTTP when no command is configured.
    #[serde(default)]
    pub static_dir: Option<PathBuf>,

    /// Time allowed for graceful child termination before a forced kill.
    #[serde(default = "defaults::grace_period_ms")]
    pub grace_period_ms: u64,

    /// Extra environment variables for the managed command.
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::host(),
            port: defaults::port(),
            command: None,
            watch_directories: Vec::new(),
            ignore: defaults::ignore(),
            include: Vec::new(),
            debounce_ms: defaults::debounce_ms(),
            static_dir: None,
            grace_period_ms: defaults::grace_period_ms(),
            env: HashMap::new(),
        }
    }
}

impl ServerConfig {
    /// Human-readable `host:port` pair for binding and display.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// URL the server will be reachable at.
    pub fn server_url(&self) -> String {
        format!("http://{}", self.address())
    }
}

/// Partial configuration supplied by the CLI layer.
///
/// Only present fields override the merged file/env configuration; `None`
/// fields are skipped during serialization so figment leaves the underlying
/// value untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watch_directories: Option<Vec<PathBuf>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub static_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debounce_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grace_period_ms: Option<u64>,
}

pub(crate) mod defaults {
    pub fn host() -> String {
        "127.0.0.1".to_string()
    }

    pub fn port() -> u16 {
        8000
    }

    pub fn ignore() -> Vec<String> {
        [
            ".git",
            "node_modules",
            "target",
            "dist",
            "build",
            "__pycache__",
            ".venv",
            "*.log",
            "*.tmp",
            "*.swp",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    pub fn debounce_ms() -> u64 {
        200
    }

    pub fn grace_period_ms() -> u64 {
        5000
    }
}
