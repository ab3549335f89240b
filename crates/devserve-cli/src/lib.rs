//! devserve - hot-reload development server.
//!
//! This crate provides the `devserve` binary: a file watcher, debouncer,
//! and process supervisor pipeline with a static HTTP fallback, driven by
//! the configuration from `devserve-config`.
//!
//! # Architecture
//!
//! - [`error`] - typed errors with miette diagnostics at the boundary
//! - [`logger`] - structured logging with tracing
//! - [`ui`] - terminal status messages
//! - [`cli`] - clap command-line definition
//! - [`commands`] - individual CLI command implementations
//! - [`dev`] - the dev server core (watcher, debouncer, supervisor,
//!   static server, controller)

pub mod cli;
pub mod commands;
pub mod dev;
pub mod error;
pub mod logger;
pub mod ui;

// Re-export commonly used types
pub use error::{CliError, Result};
