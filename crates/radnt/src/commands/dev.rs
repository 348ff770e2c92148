//! Next.js development server wrapper

use anyhow::{bail, Result};
use camino::Utf8Path;
use console::style;
use radnt_core::RadntConfig;
use radnt_dev::next_config::NextConfigFix;
use radnt_dev::{
    BuildLevel, ChangeKind, DevEvent, DevServerConfig, DevSession, StopReason,
    TokioProcessManager,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::kill::kill_dev_servers;
use crate::cli::DevArgs;
use crate::output;

pub async fn run(args: DevArgs, root: &Utf8Path, config: &RadntConfig) -> Result<()> {
    output::header("Starting Radnt development server");

    if which::which("npx").is_err() {
        bail!("npx not found on PATH. Install Node.js to run the development server");
    }

    if args.kill {
        kill_dev_servers(&config.dev.kill_ports).await;
    }

    let mut dev_config = DevServerConfig::from_settings(root.to_owned(), &config.dev);
    if let Some(port) = args.port {
        dev_config.port = port;
    }
    if let Some(host) = args.host {
        dev_config.host = host;
    }

    let session = DevSession::new(dev_config, Arc::new(TokioProcessManager::new()));
    let printer = tokio::spawn(print_events(session.subscribe()));

    let result = session.run(shutdown_signal()).await;

    // closing the event channel ends the printer
    drop(session);
    let _ = tokio::time::timeout(Duration::from_secs(1), printer).await;

    let summary = result?;
    if summary.forced_kill {
        output::warning("Dev server did not stop in time and was killed");
    }
    match summary.reason {
        StopReason::Signal | StopReason::ChildExited(Some(0)) => {
            output::success("Development server stopped");
            Ok(())
        }
        StopReason::ChildExited(Some(code)) => bail!("next dev exited with code {}", code),
        StopReason::ChildExited(None) => bail!("next dev was terminated by a signal"),
    }
}

/// Resolves on Ctrl-C, or SIGTERM on Unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Could not listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Could not listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

async fn print_events(mut events: broadcast::Receiver<DevEvent>) {
    loop {
        match events.recv().await {
            Ok(event) => print_event(&event),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                debug!("Skipped {} dev server events", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

fn print_event(event: &DevEvent) {
    match event {
        DevEvent::PortSubstituted { requested, port } => {
            output::warning(&format!("Port {} is already in use.", requested));
            output::info(&format!("Using available port {} instead.", port));
        }
        DevEvent::ConfigFixed(NextConfigFix::Converted) => {
            output::info("Converted next.config.ts to next.config.js for compatibility");
        }
        DevEvent::ConfigFixed(NextConfigFix::Basic) => {
            output::warning("Created basic next.config.js for compatibility");
        }
        DevEvent::Starting { port } => {
            output::info(&format!("Running npx next dev --port {}", port));
        }
        DevEvent::Ready { url } => {
            output::success("Radnt development server is running!");
            output::kv("Local", url);
            output::dim("Press Ctrl+C to stop the server");
        }
        DevEvent::Build(line) => match line.level {
            BuildLevel::Info => println!("{}", line.message),
            BuildLevel::Error => eprintln!("{}", style(&line.message).red()),
        },
        DevEvent::FileChanged(change) => {
            let kind = match change.kind {
                ChangeKind::Created => "added",
                ChangeKind::Modified => "changed",
                ChangeKind::Removed => "removed",
            };
            output::dim(&format!(
                "[{}] {} {}",
                change.timestamp.format("%H:%M:%S"),
                kind,
                change.path
            ));
        }
        DevEvent::Stopping => output::warning("Shutting down development server..."),
    }
}
