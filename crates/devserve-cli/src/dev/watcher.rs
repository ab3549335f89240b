//! Filesystem watching for the dev server.
//!
//! Watches a set of [`WatchRule`] roots and emits [`FileEvent`]s through an
//! unbounded channel. The native notification backend is preferred; when it
//! cannot be created (unsupported platform, inotify limits), the watcher
//! degrades to polling behind the same `notify::Watcher` trait. A single
//! failing root is logged and skipped, never fatal for the session.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use glob::Pattern;
use notify::event::ModifyKind;
use notify::{Event, EventKind, PollWatcher, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::{CliError, Result};

/// Poll interval for the degraded backend.
const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// What happened to a watched path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileEventKind {
    Created,
    Modified,
    Deleted,
    Renamed,
}

/// A single observed filesystem change.
#[derive(Debug, Clone)]
pub struct FileEvent {
    pub path: PathBuf,
    pub kind: FileEventKind,
    pub observed_at: Instant,
}

/// What one root is watched for. Immutable after construction.
#[derive(Debug, Clone)]
pub struct WatchRule {
    root: PathBuf,
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
    recursive: bool,
}

impl WatchRule {
    /// A recursive rule with no pattern filters.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            include: Vec::new(),
            exclude: Vec::new(),
            recursive: true,
        }
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Add include patterns. Empty include set means every path counts.
    pub fn include(mut self, patterns: &[String]) -> Result<Self> {
        self.include.extend(compile_patterns(patterns)?);
        Ok(self)
    }

    /// Add exclude patterns, evaluated before any include pattern.
    pub fn exclude(mut self, patterns: &[String]) -> Result<Self> {
        self.exclude.extend(compile_patterns(patterns)?);
        Ok(self)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve the root to its canonical form so event paths, which arrive
    /// absolute, can be related back to this rule.
    fn canonicalized(mut self) -> std::io::Result<Self> {
        self.root = self.root.canonicalize()?;
        Ok(self)
    }

    /// Does an event for `path` qualify under this rule?
    ///
    /// Excludes win over includes: a path matching any exclude pattern is
    /// dropped even when it also matches an include pattern.
    pub fn matches(&self, path: &Path) -> bool {
        let Ok(rel) = path.strip_prefix(&self.root) else {
            return false;
        };

        if !self.recursive && rel.components().count() > 1 {
            return false;
        }

        if matches_any(&self.exclude, rel) {
            return false;
        }

        self.include.is_empty() || matches_any(&self.include, rel)
    }
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|source| CliError::Pattern {
                pattern: p.clone(),
                source,
            })
        })
        .collect()
}

/// Match a relative path against patterns, considering both the whole
/// relative path and each individual component, so that `.git` excludes the
/// directory anywhere in the tree and `*.log` matches by file name.
fn matches_any(patterns: &[Pattern], rel: &Path) -> bool {
    patterns.iter().any(|pattern| {
        if pattern.matches_path(rel) {
            return true;
        }
        rel.components().any(|component| match component {
            Component::Normal(name) => name.to_str().is_some_and(|n| pattern.matches(n)),
            _ => false,
        })
    })
}

/// Backend selected at startup: native notifications when available,
/// polling otherwise. Both sides of the `notify::Watcher` trait.
enum WatchBackend {
    Recommended(RecommendedWatcher),
    Poll(PollWatcher),
}

impl WatchBackend {
    fn watch(&mut self, path: &Path, mode: RecursiveMode) -> notify::Result<()> {
        match self {
            WatchBackend::Recommended(w) => w.watch(path, mode),
            WatchBackend::Poll(w) => w.watch(path, mode),
        }
    }

    fn unwatch(&mut self, path: &Path) -> notify::Result<()> {
        match self {
            WatchBackend::Recommended(w) => w.unwatch(path),
            WatchBackend::Poll(w) => w.unwatch(path),
        }
    }
}

/// Watches directory trees and emits [`FileEvent`]s until stopped.
///
/// Holds no process state; its only side effect is event emission.
pub struct PathWatcher {
    backend: WatchBackend,
    active_roots: Vec<PathBuf>,
}

impl PathWatcher {
    /// Start watching. Returns the watcher handle and the event stream.
    ///
    /// Roots that cannot be resolved or attached are logged and skipped;
    /// only a failure to construct any backend at all is an error.
    pub fn spawn(rules: Vec<WatchRule>) -> Result<(Self, mpsc::UnboundedReceiver<FileEvent>)> {
        let (tx, rx) = mpsc::unbounded_channel();

        let mut resolved = Vec::with_capacity(rules.len());
        for rule in rules {
            let display_path = rule.root().to_path_buf();
            match rule.canonicalized() {
                Ok(rule) => resolved.push(rule),
                Err(err) => {
                    warn!(path = %display_path.display(), error = %err, "skipping unresolvable watch root");
                }
            }
        }
        let rules = Arc::new(resolved);

        let mut backend = match RecommendedWatcher::new(
            make_handler(Arc::clone(&rules), tx.clone()),
            notify::Config::default(),
        ) {
            Ok(watcher) => WatchBackend::Recommended(watcher),
            Err(err) => {
                warn!(error = %err, "native file notifications unavailable, falling back to polling");
                let config = notify::Config::default().with_poll_interval(POLL_INTERVAL);
                WatchBackend::Poll(PollWatcher::new(make_handler(Arc::clone(&rules), tx), config)?)
            }
        };

        let mut active_roots = Vec::new();
        for rule in rules.iter() {
            let mode = if rule.recursive {
                RecursiveMode::Recursive
            } else {
                RecursiveMode::NonRecursive
            };
            match backend.watch(rule.root(), mode) {
                Ok(()) => {
                    debug!(path = %rule.root().display(), "watching");
                    active_roots.push(rule.root().to_path_buf());
                }
                Err(err) => {
                    warn!(path = %rule.root().display(), error = %err, "failed to watch root, skipping");
                }
            }
        }

        Ok((
            Self {
                backend,
                active_roots,
            },
            rx,
        ))
    }

    /// Roots that were successfully attached.
    pub fn active_roots(&self) -> &[PathBuf] {
        &self.active_roots
    }

    /// Stop watching all roots. Dropping the watcher has the same effect;
    /// this makes the shutdown ordering explicit.
    pub fn stop(mut self) {
        for root in std::mem::take(&mut self.active_roots) {
            if let Err(err) = self.backend.unwatch(&root) {
                debug!(path = %root.display(), error = %err, "unwatch failed");
            }
        }
    }
}

fn make_handler(
    rules: Arc<Vec<WatchRule>>,
    tx: mpsc::UnboundedSender<FileEvent>,
) -> impl Fn(notify::Result<Event>) + Send + 'static {
    move |result| match result {
        Ok(event) => {
            let Some(kind) = map_event_kind(&event.kind) else {
                return;
            };
            for path in &event.paths {
                if rules.iter().any(|rule| rule.matches(path)) {
                    // Receiver gone means the pipeline is shutting down.
                    let _ = tx.send(FileEvent {
                        path: path.clone(),
                        kind,
                        observed_at: Instant::now(),
                    });
                }
            }
        }
        Err(err) => warn!(error = %err, "watch backend error"),
    }
}

fn map_event_kind(kind: &EventKind) -> Option<FileEventKind> {
    match kind {
        EventKind::Create(_) => Some(FileEventKind::Created),
        EventKind::Modify(ModifyKind::Name(_)) => Some(FileEventKind::Renamed),
        EventKind::Modify(ModifyKind::Metadata(_)) => None,
        EventKind::Modify(_) => Some(FileEventKind::Modified),
        EventKind::Remove(_) => Some(FileEventKind::Deleted),
        EventKind::Access(_) | EventKind::Any | EventKind::Other => None,
    }
}
