//! Stopping stray development servers.
//!
//! Kills `next dev` processes and anything listening on the common
//! development ports. Every individual failure is ignored: a port with no
//! listener or a process that already exited is not an error.

use crate::process::{CommandSpec, ProcessManager};
use std::time::Duration;
use tracing::debug;

const COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

/// Host platform family, which decides the tools used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Unix,
    Windows,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }
}

/// A process killed because it held a port
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KilledProcess {
    pub port: u16,
    pub pid: u32,
}

/// What the kill routine did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KillReport {
    /// `next dev` processes were matched and killed by name
    pub next_processes_killed: bool,
    pub by_port: Vec<KilledProcess>,
}

impl KillReport {
    pub fn is_empty(&self) -> bool {
        !self.next_processes_killed && self.by_port.is_empty()
    }
}

/// Kills development servers through a [`ProcessManager`]
pub struct DevServerKiller<'a> {
    processes: &'a dyn ProcessManager,
    platform: Platform,
}

impl<'a> DevServerKiller<'a> {
    pub fn new(processes: &'a dyn ProcessManager, platform: Platform) -> Self {
        Self {
            processes,
            platform,
        }
    }

    /// Kill `next dev` processes, then whatever listens on `ports`
    pub async fn kill(&self, ports: &[u16]) -> KillReport {
        let mut report = KillReport {
            next_processes_killed: self.kill_next_processes().await,
            by_port: Vec::new(),
        };

        for &port in ports {
            for pid in self.pids_on_port(port).await {
                if self.kill_pid(pid).await {
                    report.by_port.push(KilledProcess { port, pid });
                }
            }
        }

        report
    }

    async fn kill_next_processes(&self) -> bool {
        let spec = match self.platform {
            Platform::Unix => CommandSpec::new("pkill").args(["-f", "next dev"]),
            Platform::Windows => CommandSpec::new("taskkill").args([
                "/F",
                "/IM",
                "node.exe",
                "/FI",
                "WINDOWTITLE eq next*",
            ]),
        };
        self.succeeds(&spec).await
    }

    async fn pids_on_port(&self, port: u16) -> Vec<u32> {
        let spec = match self.platform {
            Platform::Unix => CommandSpec::new("lsof").arg("-ti").arg(format!(":{}", port)),
            Platform::Windows => CommandSpec::new("netstat").arg("-ano"),
        };

        match self.processes.output(&spec, Some(COMMAND_TIMEOUT)).await {
            Ok(out) if out.success() => match self.platform {
                Platform::Unix => parse_pid_lines(&out.stdout),
                Platform::Windows => parse_netstat_pids(&out.stdout, port),
            },
            Ok(_) => Vec::new(),
            Err(e) => {
                debug!("Could not inspect port {}: {}", port, e);
                Vec::new()
            }
        }
    }

    async fn kill_pid(&self, pid: u32) -> bool {
        let spec = match self.platform {
            Platform::Unix => CommandSpec::new("kill").args(["-9".to_string(), pid.to_string()]),
            Platform::Windows => {
                CommandSpec::new("taskkill").args(["/F", "/PID"]).arg(pid.to_string())
            }
        };
        self.succeeds(&spec).await
    }

    async fn succeeds(&self, spec: &CommandSpec) -> bool {
        match self.processes.output(spec, Some(COMMAND_TIMEOUT)).await {
            Ok(out) => out.success(),
            Err(e) => {
                debug!("{} failed: {}", spec, e);
                false
            }
        }
    }
}

/// One PID per line, as printed by `lsof -t`
pub fn parse_pid_lines(stdout: &str) -> Vec<u32> {
    stdout
        .lines()
        .filter_map(|line| line.trim().parse().ok())
        .collect()
}

/// PIDs of LISTENING sockets bound to `port` in `netstat -ano` output
pub fn parse_netstat_pids(stdout: &str, port: u16) -> Vec<u32> {
    let needle = format!(":{} ", port);
    let mut pids: Vec<u32> = stdout
        .lines()
        .filter(|line| line.contains(&needle) && line.contains("LISTENING"))
        .filter_map(|line| line.split_whitespace().last())
        .filter_map(|pid| pid.parse().ok())
        .collect();
    pids.dedup();
    pids
}
