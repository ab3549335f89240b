//! The check command.
//!
//! Runs the same merge pipeline as `serve`, validates the result, and
//! prints the effective configuration without starting anything.

use devserve_config::{ConfigOverrides, ServerConfig};

use crate::cli::CheckArgs;
use crate::error::Result;
use crate::ui;

/// Execute the check command.
pub async fn execute(args: CheckArgs) -> Result<()> {
    let file = super::resolve_config_file(args.config.as_deref());
    match &file {
        Some(path) => ui::info(&format!("Using config file {}", path.display())),
        None => ui::info("No config file found; checking defaults and environment"),
    }

    let config = ServerConfig::load(file.as_deref(), &ConfigOverrides::default())?;
    devserve_config::validate(&config)?;

    ui::success("Configuration is valid");
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
