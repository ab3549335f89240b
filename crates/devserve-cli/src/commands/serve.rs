//! The serve command.
//!
//! Merges configuration, fills in gaps through project auto-detection the
//! way the interactive workflow expects, then hands the result to the
//! controller until Ctrl-C.

use std::path::{Path, PathBuf};

use devserve_config::{ConfigOverrides, ServerConfig};
use tracing::info;

use crate::cli::ServeArgs;
use crate::dev::{DevServer, ProjectKind};
use crate::error::Result;
use crate::ui;

/// Execute the serve command.
pub async fn execute(args: ServeArgs) -> Result<()> {
    let overrides = ConfigOverrides {
        host: args.host.clone(),
        port: args.port,
        command: args.command.clone(),
        watch_directories: watch_override(&args),
        static_dir: args.static_dir.clone(),
        debounce_ms: args.debounce_ms,
        grace_period_ms: args.grace_period_ms,
    };

    let file = super::resolve_config_file(args.config.as_deref());
    let config = ServerConfig::load(file.as_deref(), &overrides)?;
    let config = apply_defaults(config, args.no_watch, Path::new("."));

    devserve_config::validate(&config)?;

    match (&config.command, &config.static_dir) {
        (Some(command), _) => ui::info(&format!("Supervising '{command}'")),
        (None, Some(dir)) => ui::info(&format!(
            "Serving {} at {}",
            dir.display(),
            config.server_url()
        )),
        (None, None) => {}
    }
    if !config.watch_directories.is_empty() {
        ui::info(&format!(
            "Hot reload on ({} watched director{})",
            config.watch_directories.len(),
            if config.watch_directories.len() == 1 { "y" } else { "ies" }
        ));
    }
    ui::info("Press Ctrl+C to stop");

    DevServer::new(config)
        .run(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    ui::success("Development server stopped");
    Ok(())
}

fn watch_override(args: &ServeArgs) -> Option<Vec<PathBuf>> {
    if args.no_watch {
        Some(Vec::new())
    } else if args.watch.is_empty() {
        None
    } else {
        Some(args.watch.clone())
    }
}

/// Fill configuration gaps the way the original workflow does: detect the
/// project when neither a command nor a static directory is given, and
/// default to watching the working directory when a command is supervised
/// without an explicit watch set.
fn apply_defaults(mut config: ServerConfig, no_watch: bool, cwd: &Path) -> ServerConfig {
    if config.command.is_none() && config.static_dir.is_none() {
        let kind = ProjectKind::detect(cwd);
        match kind.run_command() {
            Some(command) => {
                info!(?kind, command, "auto-detected project type");
                config.command = Some(command.to_string());
            }
            None => {
                info!("no project type detected, serving the working directory");
                config.static_dir = Some(cwd.to_path_buf());
            }
        }
        if config.watch_directories.is_empty() && !no_watch {
            config.watch_directories = kind.watch_directories(cwd);
        }
    }

    if config.watch_directories.is_empty() && !no_watch && config.command.is_some() {
        config.watch_directories = vec![cwd.to_path_buf()];
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn detection_fills_command_and_watch_set() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package.json"), "{}").unwrap();

        let config = apply_defaults(ServerConfig::default(), false, dir.path());
        assert_eq!(config.command.as_deref(), Some("npm start"));
        assert!(!config.watch_directories.is_empty());
        assert!(config.static_dir.is_none());
    }

    #[test]
    fn unknown_project_falls_back_to_static_serving() {
        let dir = TempDir::new().unwrap();

        let config = apply_defaults(ServerConfig::default(), false, dir.path());
        assert!(config.command.is_none());
        assert_eq!(config.static_dir.as_deref(), Some(dir.path()));
    }

    #[test]
    fn explicit_command_gets_a_default_watch_directory() {
        let dir = TempDir::new().unwrap();
        let config = ServerConfig {
            command: Some("cargo run".to_string()),
            ..ServerConfig::default()
        };

        let config = apply_defaults(config, false, dir.path());
        assert_eq!(config.watch_directories, vec![dir.path().to_path_buf()]);
    }

    #[test]
    fn no_watch_disables_all_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ServerConfig {
            command: Some("cargo run".to_string()),
            ..ServerConfig::default()
        };

        let config = apply_defaults(config, true, dir.path());
        assert!(config.watch_directories.is_empty());
    }

    #[test]
    fn configured_values_are_left_alone() {
        let dir = TempDir::new().unwrap();
        let config = ServerConfig {
            command: Some("cargo run".to_string()),
            watch_directories: vec![PathBuf::from("src")],
            ..ServerConfig::default()
        };

        let config = apply_defaults(config, false, dir.path());
        assert_eq!(config.command.as_deref(), Some("cargo run"));
        assert_eq!(config.watch_directories, vec![PathBuf::from("src")]);
    }
}
