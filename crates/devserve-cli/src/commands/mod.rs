//! Command implementations.
//!
//! - [`serve`] - the development server
//! - [`check`] - configuration validation
//!
//! Each command exposes an `execute` function taking its parsed arguments.

pub mod check;
pub mod serve;

use std::path::{Path, PathBuf};

use devserve_config::ConfigDiscovery;

// Re-export execute functions for convenience
pub use check::execute as check_execute;
pub use serve::execute as serve_execute;

/// An explicitly requested config file, or whatever discovery turns up in
/// the working directory.
pub(crate) fn resolve_config_file(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| ConfigDiscovery::new(".").find())
}
