//! The dev server core.
//!
//! Data flows one way: filesystem events from the [`watcher`] feed the
//! [`debounce`] window, whose coalesced triggers drive the [`supervisor`]'s
//! serialized restarts. The [`static_server`] is an independent sink used
//! when no command is configured. The [`controller`] wires it all together
//! and owns startup and shutdown.

pub mod controller;
pub mod debounce;
pub mod project;
pub mod static_server;
pub mod supervisor;
pub mod watcher;

// Re-exports
pub use controller::DevServer;
pub use debounce::{Debouncer, ReloadTrigger};
pub use project::ProjectKind;
pub use static_server::StaticServer;
pub use supervisor::{CommandSpec, ProcessState, ProcessSupervisor};
pub use watcher::{FileEvent, FileEventKind, PathWatcher, WatchRule};
