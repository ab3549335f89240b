//! Configuration model and loader for the devserve development server.
//!
//! This crate owns the [`ServerConfig`] structure consumed by the dev server
//! core and the machinery for producing it from the usual sources:
//!
//! - config files in TOML, JSON, or YAML (format chosen by extension)
//! - environment variables with the `DEVSERVE_` prefix
//! - command-line overrides supplied by the CLI crate
//!
//! Precedence is CLI > environment > file > built-in defaults. The merged
//! configuration is immutable once handed to the server.

pub mod discovery;
pub mod error;
pub mod loading;
pub mod server;
pub mod validation;

pub use discovery::ConfigDiscovery;
pub use error::{ConfigError, Result};
pub use server::{ConfigOverrides, ServerConfig};
pub use validation::validate;
