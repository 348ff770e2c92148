//! Stop running development servers

use anyhow::Result;
use radnt_core::RadntConfig;
use radnt_dev::{DevServerKiller, KillReport, Platform, TokioProcessManager};

use crate::output;

pub async fn run(config: &RadntConfig) -> Result<()> {
    kill_dev_servers(&config.dev.kill_ports).await;
    Ok(())
}

/// Kill `next dev` and anything on `ports`, reporting what happened
pub(super) async fn kill_dev_servers(ports: &[u16]) -> KillReport {
    let processes = TokioProcessManager::new();
    let spinner = output::spinner("Looking for running development servers...");
    let report = DevServerKiller::new(&processes, Platform::current())
        .kill(ports)
        .await;
    spinner.finish_and_clear();

    print_report(&report);
    report
}

fn print_report(report: &KillReport) {
    if report.is_empty() {
        output::warning("No running development servers found");
        return;
    }

    if report.next_processes_killed {
        output::success("Killed Next.js development processes");
    }
    for killed in &report.by_port {
        output::success(&format!(
            "Killed process on port {} (PID: {})",
            killed.port, killed.pid
        ));
    }
    output::success("All development servers have been stopped");
}
