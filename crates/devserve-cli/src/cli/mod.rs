//! Command-line interface definition.
//!
//! Defines the CLI structure with clap v4 derive macros.
//!
//! # Command Structure
//!
//! - `devserve serve` - Development server with hot reload
//! - `devserve check` - Load and validate configuration

mod commands;

use clap::Parser;

pub use commands::{CheckArgs, Command, ServeArgs};

/// devserve - A hot-reload development server
#[derive(Parser, Debug)]
#[command(
    name = "devserve",
    version,
    about = "A hot-reload development server",
    long_about = "Devserve watches your project for changes and restarts the configured\n\
                  command once per burst of edits, or serves a static directory when no\n\
                  command is given. Configuration comes from devserve.toml/.yaml/.json,\n\
                  DEVSERVE_* environment variables, and command-line flags."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}
