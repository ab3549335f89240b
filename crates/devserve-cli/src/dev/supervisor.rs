//! Lifecycle supervision for the managed child process.
//!
//! One supervisor owns one command. The state machine is
//! `Idle → Starting → Running → Stopping → Idle`, with
//! `Running → Crashed → Idle` when the child exits on its own. All state
//! plus the child handle live behind a single mutex; the blocking wait for
//! process exit always happens outside it, so concurrent callers only ever
//! wait on the documented serialization, never on a held lock.
//!
//! Stopping escalates: a graceful termination signal first, then a forced
//! kill once the grace period expires. An unexpected exit is classified,
//! logged, and left alone; only a reload trigger or an explicit call starts
//! the next process, which keeps a crashing command from restart-storming.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::sync::Arc;

use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tokio::time::{sleep, timeout, Duration};
use tracing::{debug, info, warn};

use crate::error::{CliError, Result};

/// How often the monitor checks a running child for an unexpected exit.
const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Lifecycle states of the managed process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    Idle,
    Starting,
    Running,
    Stopping,
    Crashed,
}

impl std::fmt::Display for ProcessState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ProcessState::Idle => "idle",
            ProcessState::Starting => "starting",
            ProcessState::Running => "running",
            ProcessState::Stopping => "stopping",
            ProcessState::Crashed => "crashed",
        };
        f.write_str(name)
    }
}

/// The command a supervisor manages.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    /// Shell command line, run through `sh -c` / `cmd /C`.
    pub command: String,
    pub working_dir: PathBuf,
    pub env: HashMap<String, String>,
}

impl CommandSpec {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            working_dir: PathBuf::from("."),
            env: HashMap::new(),
        }
    }

    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = dir.into();
        self
    }

    pub fn env(mut self, env: HashMap<String, String>) -> Self {
        self.env = env;
        self
    }

    fn build(&self) -> Command {
        #[cfg(unix)]
        let mut std_cmd = {
            let mut cmd = std::process::Command::new("sh");
            cmd.arg("-c").arg(&self.command);
            // Own process group, so termination signals reach the whole
            // tree the shell spawns, not just the shell.
            use std::os::unix::process::CommandExt as _;
            cmd.process_group(0);
            cmd
        };
        #[cfg(windows)]
        let mut std_cmd = {
            let mut cmd = std::process::Command::new("cmd");
            cmd.arg("/C").arg(&self.command);
            cmd
        };
        std_cmd.current_dir(&self.working_dir);
        std_cmd.envs(&self.env);

        let mut cmd = Command::from(std_cmd);
        // Safety net: never leave an orphan if the supervisor itself dies.
        cmd.kill_on_drop(true);
        cmd
    }
}

/// Everything the single lock protects.
struct Inner {
    state: ProcessState,
    child: Option<Child>,
    pid: Option<u32>,
    /// Bumped on every spawn so a stale monitor task can tell it has been
    /// superseded.
    generation: u64,
}

/// Supervises a single child process.
pub struct ProcessSupervisor {
    spec: CommandSpec,
    grace_period: Duration,
    inner: Arc<Mutex<Inner>>,
    /// Serializes whole restart cycles so two concurrent `restart()` calls
    /// interleave as complete stop/start sequences, never piecewise.
    restart_lock: Mutex<()>,
}

impl ProcessSupervisor {
    pub fn new(spec: CommandSpec, grace_period_ms: u64) -> Self {
        Self {
            spec,
            grace_period: Duration::from_millis(grace_period_ms),
            inner: Arc::new(Mutex::new(Inner {
                state: ProcessState::Idle,
                child: None,
                pid: None,
                generation: 0,
            })),
            restart_lock: Mutex::new(()),
        }
    }

    pub async fn state(&self) -> ProcessState {
        self.inner.lock().await.state
    }

    pub async fn pid(&self) -> Option<u32> {
        self.inner.lock().await.pid
    }

    /// Spawn the managed command. Only valid from `Idle`.
    ///
    /// `Running` means spawn success, not readiness; readiness probing is a
    /// concern of the command itself.
    pub async fn start(&self) -> Result<()> {
        let mut inner = self.inner.lock().await;
        if inner.state != ProcessState::Idle {
            return Err(CliError::Process(format!(
                "cannot start from state '{}'",
                inner.state
            )));
        }
        inner.state = ProcessState::Starting;

        match self.spec.build().spawn() {
            Ok(child) => {
                let pid = child.id();
                inner.pid = pid;
                inner.child = Some(child);
                inner.state = ProcessState::Running;
                inner.generation += 1;
                let generation = inner.generation;
                drop(inner);

                info!(pid, command = %self.spec.command, "process started");
                self.spawn_exit_monitor(generation);
                Ok(())
            }
            Err(source) => {
                inner.state = ProcessState::Idle;
                Err(CliError::Spawn {
                    command: self.spec.command.clone(),
                    source,
                })
            }
        }
    }

    /// Stop the managed process if one is running.
    ///
    /// Sends the graceful termination signal, waits up to the grace period,
    /// then kills. A supervisor with nothing running returns immediately.
    pub async fn stop(&self) -> Result<()> {
        let (child, pid) = {
            let mut inner = self.inner.lock().await;
            match inner.state {
                ProcessState::Running | ProcessState::Starting => {}
                _ => return Ok(()),
            }
            inner.state = ProcessState::Stopping;
            (inner.child.take(), inner.pid.take())
        };

        let Some(mut child) = child else {
            // The child slipped away between our check and take (exit race
            // with the monitor); settle back to Idle.
            self.inner.lock().await.state = ProcessState::Idle;
            return Ok(());
        };

        terminate_gracefully(&mut child, pid)?;

        // The wait happens outside the lock; the grace period is the only
        // point where cooperative shutdown escalates to a forced kill.
        let status = match timeout(self.grace_period, child.wait()).await {
            Ok(waited) => waited.map_err(CliError::Io)?,
            Err(_elapsed) => {
                warn!(
                    pid,
                    grace_ms = self.grace_period.as_millis() as u64,
                    "grace period expired, killing process"
                );
                #[cfg(unix)]
                if let Some(pid) = pid {
                    signal_group(pid, libc::SIGKILL);
                }
                child.kill().await.map_err(CliError::Io)?;
                child.wait().await.map_err(CliError::Io)?
            }
        };

        self.inner.lock().await.state = ProcessState::Idle;
        info!(pid, code = status.code(), "process stopped");
        Ok(())
    }

    /// Stop the current process (waiting for it to fully reach `Idle`) and
    /// start a new one.
    ///
    /// Concurrent restarts serialize on an internal lock, so a second call
    /// issued mid-restart runs exactly one more complete cycle after the
    /// in-flight one; trigger-level coalescing upstream keeps that backlog
    /// at one.
    pub async fn restart(&self) -> Result<()> {
        let _cycle = self.restart_lock.lock().await;
        self.stop().await?;
        self.start().await
    }

    /// Wait for any in-flight restart to settle, then stop. Used by the
    /// controller during shutdown.
    pub async fn shutdown(&self) -> Result<()> {
        let _cycle = self.restart_lock.lock().await;
        self.stop().await
    }

    /// Watch one spawned child for an unexpected exit.
    ///
    /// Runs until the child exits by itself, is taken by `stop()`, or a
    /// newer generation replaces it.
    fn spawn_exit_monitor(&self, generation: u64) {
        let inner = Arc::clone(&self.inner);
        let command = self.spec.command.clone();
        tokio::spawn(async move {
            loop {
                sleep(EXIT_POLL_INTERVAL).await;

                let mut guard = inner.lock().await;
                if guard.generation != generation {
                    return;
                }
                let Some(child) = guard.child.as_mut() else {
                    // stop() owns the child now.
                    return;
                };
                match child.try_wait() {
                    Ok(Some(status)) => {
                        guard.child = None;
                        let pid = guard.pid.take();
                        // Running -> Crashed -> Idle: classify, log, do not
                        // restart. Reload triggers decide what runs next.
                        guard.state = ProcessState::Crashed;
                        log_unexpected_exit(&command, pid, status);
                        guard.state = ProcessState::Idle;
                        return;
                    }
                    Ok(None) => {}
                    Err(err) => {
                        warn!(error = %err, "failed to poll process status");
                    }
                }
            }
        });
    }
}

fn log_unexpected_exit(command: &str, pid: Option<u32>, status: ExitStatus) {
    if status.success() {
        info!(pid, command, "process exited cleanly on its own");
    } else {
        warn!(
            pid,
            command,
            code = status.code(),
            "process crashed; waiting for the next change before restarting"
        );
    }
}

/// Ask the child to terminate cooperatively.
///
/// Unix sends SIGTERM to the child's process group. Where no graceful
/// signal exists the kill is started immediately and the grace wait still
/// bounds the total stop time.
#[cfg(unix)]
fn terminate_gracefully(child: &mut Child, pid: Option<u32>) -> Result<()> {
    match pid {
        Some(pid) => {
            debug!(pid, "sending SIGTERM to process group");
            signal_group(pid, libc::SIGTERM);
            Ok(())
        }
        None => child.start_kill().map_err(CliError::Io),
    }
}

/// Signal the whole process group rooted at `pid`.
#[cfg(unix)]
fn signal_group(pid: u32, signal: libc::c_int) {
    // SAFETY: plain kill(2) on a process group we created at spawn time.
    unsafe {
        libc::kill(-(pid as libc::pid_t), signal);
    }
}

#[cfg(not(unix))]
fn terminate_gracefully(child: &mut Child, _pid: Option<u32>) -> Result<()> {
    child.start_kill().map_err(CliError::Io)
}
