//! Development server session.
//!
//! A session negotiates a port, checks the project, starts `next dev` through
//! a [`ProcessManager`] and watches the source tree until either the caller's
//! shutdown future resolves or the child exits on its own. Everything the
//! session observes is published as [`DevEvent`]s on a broadcast channel.

use crate::error::Result;
use crate::next_config::{fix_next_config, NextConfigFix};
use crate::package::require_next_project;
use crate::port::{negotiate_port, PortChoice};
use crate::process::{CommandSpec, ManagedProcess, OutputStream, ProcessManager};
use crate::watcher::{FileChange, FileWatcher};
use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};
use radnt_core::config::DevSettings;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

const EVENT_CAPACITY: usize = 256;
const READER_DRAIN_TIMEOUT: Duration = Duration::from_secs(1);

/// Everything a session needs to know about the project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevServerConfig {
    pub root: Utf8PathBuf,
    pub port: u16,
    pub host: String,
    pub watch: Vec<String>,
    pub ignore: Vec<String>,
    pub poll_interval: Duration,
    /// How long a terminated child gets before it is force-killed
    pub shutdown_grace: Duration,
}

impl DevServerConfig {
    pub fn from_settings(root: impl Into<Utf8PathBuf>, settings: &DevSettings) -> Self {
        Self {
            root: root.into(),
            port: settings.port,
            host: settings.host.clone(),
            watch: settings.watch.clone(),
            ignore: settings.ignore.clone(),
            poll_interval: Duration::from_millis(settings.poll_interval_ms),
            shutdown_grace: Duration::from_secs(settings.shutdown_grace_secs),
        }
    }

    pub fn url(&self, port: u16) -> String {
        format!("http://{}:{}", self.host, port)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildLevel {
    Info,
    Error,
}

/// One line of dev server output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildEvent {
    pub level: BuildLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl BuildEvent {
    pub fn new(level: BuildLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Observable session progress
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DevEvent {
    /// The requested port was busy
    PortSubstituted { requested: u16, port: u16 },
    ConfigFixed(NextConfigFix),
    Starting { port: u16 },
    /// `next dev` reported it is serving
    Ready { url: String },
    Build(BuildEvent),
    FileChanged(FileChange),
    Stopping,
}

/// Why the session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The shutdown future resolved
    Signal,
    /// `next dev` exited by itself
    ChildExited(Option<i32>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub port: u16,
    pub reason: StopReason,
    /// The child ignored the graceful stop and was killed
    pub forced_kill: bool,
}

/// A single `next dev` run
pub struct DevSession {
    config: DevServerConfig,
    processes: Arc<dyn ProcessManager>,
    events: broadcast::Sender<DevEvent>,
}

impl DevSession {
    pub fn new(config: DevServerConfig, processes: Arc<dyn ProcessManager>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            config,
            processes,
            events,
        }
    }

    pub fn config(&self) -> &DevServerConfig {
        &self.config
    }

    /// Receive events published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<DevEvent> {
        self.events.subscribe()
    }

    /// Pick the port, check the project and fix up next.config
    pub fn prepare(&self) -> Result<PortChoice> {
        let choice = negotiate_port(&self.config.host, self.config.port)?;
        if choice.substituted() {
            info!(
                "Port {} is in use, using {} instead",
                choice.requested, choice.port
            );
            self.emit(DevEvent::PortSubstituted {
                requested: choice.requested,
                port: choice.port,
            });
        }

        let package = require_next_project(&self.config.root)?;
        debug!(
            "Next.js {} project detected",
            package.next_version().unwrap_or("*")
        );

        if let Some(fix) = fix_next_config(&self.config.root)? {
            self.emit(DevEvent::ConfigFixed(fix));
        }

        Ok(choice)
    }

    /// Run `next dev` until `shutdown` resolves or the child exits
    pub async fn run<F>(&self, shutdown: F) -> Result<SessionSummary>
    where
        F: Future<Output = ()> + Send,
    {
        let port = self.prepare()?.port;
        let watcher = FileWatcher::new(
            self.config.root.clone(),
            self.config.watch.as_slice(),
            self.config.ignore.as_slice(),
            self.config.poll_interval,
        )?;

        let spec = CommandSpec::new("npx")
            .args(["next", "dev", "--port"])
            .arg(port.to_string())
            .current_dir(self.config.root.clone());
        self.emit(DevEvent::Starting { port });
        let mut child = self.processes.spawn(&spec).await?;

        let mut readers = Vec::new();
        if let Some(stdout) = child.take_stdout() {
            readers.push(tokio::spawn(forward_lines(
                stdout,
                BuildLevel::Info,
                self.events.clone(),
                Some(self.config.url(port)),
            )));
        }
        if let Some(stderr) = child.take_stderr() {
            readers.push(tokio::spawn(forward_lines(
                stderr,
                BuildLevel::Error,
                self.events.clone(),
                None,
            )));
        }

        let (stop_tx, stop_rx) = watch::channel(false);
        let (changes_tx, changes_rx) = broadcast::channel(EVENT_CAPACITY);
        let watcher_task = tokio::spawn(watcher.run(changes_tx, stop_rx));
        let relay_task = tokio::spawn(relay_changes(changes_rx, self.events.clone()));

        tokio::pin!(shutdown);
        let reason = tokio::select! {
            _ = &mut shutdown => StopReason::Signal,
            code = child.wait() => StopReason::ChildExited(code?),
        };
        debug!("Stopping session: {:?}", reason);

        let _ = stop_tx.send(true);

        let forced_kill = match reason {
            StopReason::Signal => {
                self.emit(DevEvent::Stopping);
                self.stop_child(child.as_mut()).await?
            }
            StopReason::ChildExited(_) => false,
        };

        if let Err(e) = watcher_task.await? {
            warn!("File watcher failed: {}", e);
        }
        relay_task.await?;
        for mut reader in readers {
            if tokio::time::timeout(READER_DRAIN_TIMEOUT, &mut reader)
                .await
                .is_err()
            {
                // a grandchild may still hold the pipe open
                reader.abort();
            }
        }

        Ok(SessionSummary {
            port,
            reason,
            forced_kill,
        })
    }

    /// Terminate, then kill once the grace period runs out.
    /// Returns whether the kill was needed.
    async fn stop_child(&self, child: &mut dyn ManagedProcess) -> Result<bool> {
        if let Err(e) = child.terminate().await {
            warn!("Graceful stop failed: {}", e);
        }

        match tokio::time::timeout(self.config.shutdown_grace, child.wait()).await {
            Ok(exit) => {
                exit?;
                Ok(false)
            }
            Err(_) => {
                warn!(
                    "Dev server still running after {}s, killing it",
                    self.config.shutdown_grace.as_secs()
                );
                child.kill().await?;
                child.wait().await?;
                Ok(true)
            }
        }
    }

    fn emit(&self, event: DevEvent) {
        // no subscribers is fine
        let _ = self.events.send(event);
    }
}

/// Publish each non-empty line; the first line containing "Ready" also
/// publishes `Ready` with `ready_url`.
async fn forward_lines(
    stream: OutputStream,
    level: BuildLevel,
    events: broadcast::Sender<DevEvent>,
    mut ready_url: Option<String>,
) {
    let mut lines = BufReader::new(stream).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let line = line.trim_end();
                if line.trim().is_empty() {
                    continue;
                }
                if line.contains("Ready") {
                    if let Some(url) = ready_url.take() {
                        let _ = events.send(DevEvent::Ready { url });
                    }
                }
                let _ = events.send(DevEvent::Build(BuildEvent::new(level, line)));
            }
            Ok(None) => break,
            Err(e) => {
                debug!("Output stream closed: {}", e);
                break;
            }
        }
    }
}

async fn relay_changes(
    mut changes: broadcast::Receiver<FileChange>,
    events: broadcast::Sender<DevEvent>,
) {
    loop {
        match changes.recv().await {
            Ok(change) => {
                let _ = events.send(DevEvent::FileChanged(change));
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                debug!("Dropped {} file change notifications", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
