//! File-based config discovery.
//!
//! Searches conventional locations for a devserve configuration file. This
//! is for CLI use; library users construct [`ServerConfig`] directly.

use std::path::{Path, PathBuf};

use crate::server::ServerConfig;

/// File names probed, in priority order.
const CANDIDATES: &[&str] = &[
    "devserve.toml",
    "devserve.yaml",
    "devserve.yml",
    "devserve.json",
];

/// Conventional-location configuration discovery.
///
/// # Example
///
/// ```no_run
/// use devserve_config::ConfigDiscovery;
///
/// if let Some(path) = ConfigDiscovery::new(".").find() {
///     println!("using config at {}", path.display());
/// }
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    /// Create a discovery rooted at `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Find the first config file present under the root.
    pub fn find(&self) -> Option<PathBuf> {
        CANDIDATES
            .iter()
            .map(|name| self.root.join(name))
            .find(|path| path.is_file())
    }
}

/// Load config from the current directory, falling back to defaults when no
/// file is present.
pub fn discover() -> crate::Result<ServerConfig> {
    let root = std::env::current_dir()?;
    let file = ConfigDiscovery::new(&root).find();
    ServerConfig::load(file.as_deref(), &Default::default())
}
