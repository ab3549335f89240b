//! Composition root for the dev server.
//!
//! Wires the watch pipeline into the supervisor (or the static server when
//! no command is configured), runs the main event loop, and owns the
//! shutdown ordering: watcher first so no new triggers arrive, then any
//! in-flight restart settles, then the process and the HTTP server go down,
//! all under one bounded deadline.

use std::sync::Arc;
use std::time::Duration;

use devserve_config::ServerConfig;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::error::Result;

use super::debounce::{Debouncer, ReloadTrigger};
use super::static_server::StaticServer;
use super::supervisor::{CommandSpec, ProcessSupervisor};
use super::watcher::{PathWatcher, WatchRule};

/// Extra time past the grace period before shutdown gives up waiting.
const SHUTDOWN_SLACK: Duration = Duration::from_secs(5);

/// The assembled dev server.
pub struct DevServer {
    config: ServerConfig,
}

impl DevServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Build the watch rules for the configured directories.
    pub fn watch_rules(config: &ServerConfig) -> Result<Vec<WatchRule>> {
        config
            .watch_directories
            .iter()
            .map(|root| {
                WatchRule::new(root.clone())
                    .exclude(&config.ignore)?
                    .include(&config.include)
            })
            .collect()
    }

    /// Run until the shutdown future completes (typically Ctrl-C).
    pub async fn run(
        self,
        shutdown_signal: impl std::future::Future<Output = ()>,
    ) -> Result<()> {
        let config = self.config;

        // Watch pipeline: watcher -> unbounded events -> debouncer ->
        // capacity-1 trigger slot. The keepalive sender stops recv() from
        // reporting closure when watching is disabled.
        let (trigger_tx, mut trigger_rx) = mpsc::channel::<ReloadTrigger>(1);
        let mut watcher = None;
        if !config.watch_directories.is_empty() {
            let rules = Self::watch_rules(&config)?;
            let (path_watcher, events) = PathWatcher::spawn(rules)?;
            info!(
                roots = path_watcher.active_roots().len(),
                debounce_ms = config.debounce_ms,
                "watching for changes"
            );
            tokio::spawn(Debouncer::new(config.debounce_ms).run(events, trigger_tx.clone()));
            watcher = Some(path_watcher);
        }
        let _trigger_keepalive = trigger_tx;

        // Serving mode: a configured command is supervised; otherwise the
        // static directory, when present, is served over HTTP.
        let supervisor = config.command.as_ref().map(|command| {
            let spec = CommandSpec::new(command.clone()).env(config.env.clone());
            Arc::new(ProcessSupervisor::new(spec, config.grace_period_ms))
        });
        if let Some(supervisor) = &supervisor {
            supervisor.start().await?;
        }

        let (http_shutdown_tx, http_shutdown_rx) = watch::channel(());
        let mut server_task: Option<JoinHandle<Result<()>>> = None;
        if supervisor.is_none() {
            if let Some(static_dir) = config.static_dir.clone() {
                let server = StaticServer::new(static_dir);
                // Bind errors are fatal and must abort startup here, not
                // inside the spawned task.
                let listener = server.bind(&config.host, config.port).await?;
                let mut rx = http_shutdown_rx.clone();
                server_task = Some(tokio::spawn(server.serve(listener, async move {
                    let _ = rx.changed().await;
                })));
            }
        }

        tokio::pin!(shutdown_signal);

        loop {
            tokio::select! {
                maybe_trigger = trigger_rx.recv() => {
                    match maybe_trigger {
                        Some(trigger) => {
                            info!(changed = trigger.paths.len(), "reloading after change");
                            match &supervisor {
                                Some(supervisor) => {
                                    if let Err(err) = supervisor.restart().await {
                                        error!(error = %err, "restart failed");
                                    }
                                }
                                None => debug!("no managed command, change noted"),
                            }
                        }
                        None => {
                            warn!("watch pipeline ended");
                            break;
                        }
                    }
                }
                _ = &mut shutdown_signal => {
                    info!("shutdown requested");
                    break;
                }
                _ = task_done(&mut server_task), if server_task.is_some() => {
                    warn!("HTTP server task ended unexpectedly");
                    break;
                }
            }
        }

        // Ordered teardown under a bounded deadline.
        if let Some(watcher) = watcher.take() {
            watcher.stop();
        }

        let deadline = Duration::from_millis(config.grace_period_ms) + SHUTDOWN_SLACK;
        let teardown = async {
            if let Some(supervisor) = &supervisor {
                if let Err(err) = supervisor.shutdown().await {
                    warn!(error = %err, "supervisor shutdown failed");
                }
            }
            let _ = http_shutdown_tx.send(());
            if let Some(task) = server_task.take() {
                match task.await {
                    Ok(Ok(())) => {}
                    Ok(Err(err)) => warn!(error = %err, "HTTP server exited with error"),
                    Err(err) => warn!(error = %err, "HTTP server task panicked"),
                }
            }
        };
        if timeout(deadline, teardown).await.is_err() {
            warn!(deadline_ms = deadline.as_millis() as u64, "shutdown deadline exceeded");
        }

        info!("dev server stopped");
        Ok(())
    }
}

/// Await the HTTP server task when one exists; otherwise stay pending so
/// the select arm never fires.
async fn task_done(task: &mut Option<JoinHandle<Result<()>>>) {
    match task {
        Some(handle) => {
            match handle.await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => error!(error = %err, "HTTP server error"),
                Err(err) => error!(error = %err, "HTTP server task panicked"),
            }
            *task = None;
        }
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn base_config() -> ServerConfig {
        ServerConfig {
            watch_directories: vec![PathBuf::from("src")],
            ..ServerConfig::default()
        }
    }

    #[test]
    fn watch_rules_compile_from_config() {
        let config = base_config();
        let rules = DevServer::watch_rules(&config).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].root(), std::path::Path::new("src"));
    }

    #[test]
    fn broken_ignore_pattern_surfaces_as_error() {
        let config = ServerConfig {
            ignore: vec!["[".to_string()],
            ..base_config()
        };
        let err = DevServer::watch_rules(&config).unwrap_err();
        assert!(matches!(err, crate::error::CliError::Pattern { .. }));
    }
}
