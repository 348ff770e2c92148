//! Process manager capability.
//!
//! Everything that starts or signals an external program goes through
//! [`ProcessManager`], so orchestration code can be driven by a scripted
//! implementation in tests.

use crate::error::{Error, Result};
use async_trait::async_trait;
use camino::Utf8PathBuf;
use std::fmt;
use std::pin::Pin;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncRead;
use tokio::process::{Child, Command};
use tracing::debug;

#[cfg(unix)]
use nix::errno::Errno;
#[cfg(unix)]
use nix::sys::signal::{self, Signal};
#[cfg(unix)]
use nix::unistd::Pid;

/// Byte stream from a child's stdout or stderr
pub type OutputStream = Pin<Box<dyn AsyncRead + Send>>;

/// Program invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<Utf8PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<Utf8PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }
        cmd
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Captured result of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// A running child process
#[async_trait]
pub trait ManagedProcess: Send {
    /// OS process id, if still known
    fn id(&self) -> Option<u32>;

    /// Take the stdout stream (only once)
    fn take_stdout(&mut self) -> Option<OutputStream>;

    /// Take the stderr stream (only once)
    fn take_stderr(&mut self) -> Option<OutputStream>;

    /// Wait for exit and return the exit code
    async fn wait(&mut self) -> Result<Option<i32>>;

    /// Ask the process to stop (SIGTERM on Unix)
    async fn terminate(&mut self) -> Result<()>;

    /// Stop the process immediately
    async fn kill(&mut self) -> Result<()>;
}

/// Capability for running external programs
#[async_trait]
pub trait ProcessManager: Send + Sync {
    /// Start a long-running process with piped stdout and stderr
    async fn spawn(&self, spec: &CommandSpec) -> Result<Box<dyn ManagedProcess>>;

    /// Run a command to completion and capture its output
    async fn output(&self, spec: &CommandSpec, timeout: Option<Duration>) -> Result<CommandOutput>;

    /// Run a command with the terminal's stdio attached
    async fn run_inherited(&self, spec: &CommandSpec) -> Result<Option<i32>>;
}

/// [`ProcessManager`] backed by `tokio::process`
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioProcessManager;

impl TokioProcessManager {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessManager for TokioProcessManager {
    async fn spawn(&self, spec: &CommandSpec) -> Result<Box<dyn ManagedProcess>> {
        debug!("Spawning: {}", spec);
        let child = spec
            .to_command()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::process_spawn(spec.to_string(), e.to_string()))?;

        Ok(Box::new(TokioProcess { child }))
    }

    async fn output(&self, spec: &CommandSpec, timeout: Option<Duration>) -> Result<CommandOutput> {
        debug!("Running: {}", spec);
        let mut cmd = spec.to_command();
        cmd.stdin(Stdio::null()).kill_on_drop(true);

        let output = match timeout {
            Some(limit) => tokio::time::timeout(limit, cmd.output())
                .await
                .map_err(|_| Error::command_timeout(spec.to_string(), limit.as_secs()))?,
            None => cmd.output().await,
        }
        .map_err(|e| Error::process_spawn(spec.to_string(), e.to_string()))?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    async fn run_inherited(&self, spec: &CommandSpec) -> Result<Option<i32>> {
        debug!("Running (inherited stdio): {}", spec);
        let status = spec
            .to_command()
            .status()
            .await
            .map_err(|e| Error::process_spawn(spec.to_string(), e.to_string()))?;
        Ok(status.code())
    }
}

struct TokioProcess {
    child: Child,
}

#[async_trait]
impl ManagedProcess for TokioProcess {
    fn id(&self) -> Option<u32> {
        self.child.id()
    }

    fn take_stdout(&mut self) -> Option<OutputStream> {
        self.child
            .stdout
            .take()
            .map(|s| Box::pin(s) as OutputStream)
    }

    fn take_stderr(&mut self) -> Option<OutputStream> {
        self.child
            .stderr
            .take()
            .map(|s| Box::pin(s) as OutputStream)
    }

    async fn wait(&mut self) -> Result<Option<i32>> {
        let status = self.child.wait().await?;
        Ok(status.code())
    }

    #[cfg(unix)]
    async fn terminate(&mut self) -> Result<()> {
        let Some(pid) = self.child.id() else {
            return Ok(());
        };
        let pid = Pid::from_raw(pid as i32);
        match signal::kill(pid, Signal::SIGTERM) {
            Ok(()) => Ok(()),
            Err(Errno::ESRCH) => {
                debug!("Process {} already exited", pid);
                Ok(())
            }
            Err(e) => Err(std::io::Error::from(e).into()),
        }
    }

    #[cfg(not(unix))]
    async fn terminate(&mut self) -> Result<()> {
        self.kill().await
    }

    async fn kill(&mut self) -> Result<()> {
        match self.child.start_kill() {
            Ok(()) => Ok(()),
            // already exited
            Err(e) if e.kind() == std::io::ErrorKind::InvalidInput => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
