use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Available devserve subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the development server
    ///
    /// Watches the configured directories, restarts the managed command
    /// once per debounced burst of changes, and serves static files when
    /// no command is configured.
    Serve(ServeArgs),

    /// Load and validate the configuration
    ///
    /// Merges config file, environment, and flags exactly like `serve`,
    /// validates the result, and prints the effective configuration
    /// without starting anything.
    Check(CheckArgs),
}

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Server port
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Server bind address
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Command to run and restart on changes
    ///
    /// Runs through the platform shell, so pipelines and arguments work
    /// as they would interactively. Without a command (and without
    /// --static-dir) the project type is auto-detected.
    #[arg(short, long, value_name = "CMD")]
    pub command: Option<String>,

    /// Directory to serve as static files (only used without a command)
    #[arg(short, long, value_name = "DIR")]
    pub static_dir: Option<PathBuf>,

    /// Directory to watch for changes (repeatable)
    #[arg(short, long = "watch", value_name = "DIR")]
    pub watch: Vec<PathBuf>,

    /// Disable file watching and hot reload entirely
    #[arg(long, conflicts_with = "watch")]
    pub no_watch: bool,

    /// Quiet period after the last change before reloading
    #[arg(long, value_name = "MS")]
    pub debounce_ms: Option<u64>,

    /// Time allowed for graceful termination before a forced kill
    #[arg(long, value_name = "MS")]
    pub grace_period_ms: Option<u64>,

    /// Path to a configuration file (.toml, .json, .yaml)
    ///
    /// Defaults to the first of devserve.toml, devserve.yaml,
    /// devserve.yml, devserve.json found in the working directory.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to a configuration file (.toml, .json, .yaml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}
