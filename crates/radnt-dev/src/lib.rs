//! # radnt-dev
//!
//! Development server orchestration for the Radnt CLI providing:
//! - Port negotiation (fall back to the next free port)
//! - Next.js project checks and next.config.ts compatibility fixup
//! - A process manager capability for spawning and stopping `next dev`
//! - Poll-based file watching with change broadcast
//! - Stopping stray development servers
//!
//! Nothing in this crate reads the process working directory or installs
//! signal handlers; callers pass the project root and a shutdown future.

pub mod error;
pub mod kill;
pub mod next_config;
pub mod package;
pub mod port;
pub mod process;
pub mod session;
pub mod watcher;

#[cfg(test)]
pub(crate) mod fake;

pub use error::{Error, Result};
pub use kill::{DevServerKiller, KillReport, Platform};
pub use process::{
    CommandOutput, CommandSpec, ManagedProcess, ProcessManager, TokioProcessManager,
};
pub use session::{
    BuildEvent, BuildLevel, DevEvent, DevServerConfig, DevSession, SessionSummary, StopReason,
};
pub use watcher::{ChangeKind, FileChange, FileWatcher};
