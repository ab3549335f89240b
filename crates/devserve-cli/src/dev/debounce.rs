//! Burst coalescing between the watcher and the supervisor.
//!
//! Editors and build steps produce flurries of events for one logical
//! change. The debouncer holds a sliding window: the first event opens it,
//! every further event pushes the deadline out again, and only a full quiet
//! period flushes exactly one [`ReloadTrigger`].

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

use super::watcher::FileEvent;

/// One coalesced reload request.
///
/// The changed paths are informational; restart semantics do not depend on
/// which files changed.
#[derive(Debug, Clone)]
pub struct ReloadTrigger {
    pub paths: Vec<PathBuf>,
}

/// Sliding-window event coalescer.
pub struct Debouncer {
    window: Duration,
}

impl Debouncer {
    pub fn new(debounce_ms: u64) -> Self {
        Self {
            window: Duration::from_millis(debounce_ms),
        }
    }

    /// Consume raw events until the channel closes, emitting one trigger
    /// per quiet period.
    ///
    /// `triggers` is expected to be a capacity-1 channel: when a trigger is
    /// already pending, new flushes coalesce into it instead of queuing, so
    /// rapid-fire changes can never build a restart backlog.
    pub async fn run(
        self,
        mut events: mpsc::UnboundedReceiver<FileEvent>,
        triggers: mpsc::Sender<ReloadTrigger>,
    ) {
        loop {
            // Idle: no window open, block for the first event.
            let Some(event) = events.recv().await else {
                return;
            };

            let mut pending = vec![event.path];
            let mut deadline = Instant::now() + self.window;

            // Window open: each event slides the deadline; expiry flushes.
            loop {
                tokio::select! {
                    maybe = events.recv() => match maybe {
                        Some(event) => {
                            if !pending.contains(&event.path) {
                                pending.push(event.path);
                            }
                            deadline = Instant::now() + self.window;
                        }
                        None => {
                            // Channel closed mid-window: flush rather than
                            // drop what was already observed.
                            flush(pending, &triggers);
                            return;
                        }
                    },
                    _ = sleep_until(deadline) => {
                        flush(pending, &triggers);
                        break;
                    }
                }
            }
        }
    }
}

fn flush(paths: Vec<PathBuf>, triggers: &mpsc::Sender<ReloadTrigger>) {
    debug!(changed = paths.len(), "debounce window closed");
    match triggers.try_send(ReloadTrigger { paths }) {
        Ok(()) => {}
        Err(mpsc::error::TrySendError::Full(_)) => {
            debug!("reload already pending, coalescing trigger");
        }
        Err(mpsc::error::TrySendError::Closed(_)) => {
            debug!("trigger consumer gone, dropping trigger");
        }
    }
}
