//! Update the CLI through npm

use anyhow::{Context, Result};
use radnt_core::RadntConfig;
use radnt_dev::TokioProcessManager;
use std::future::Future;
use std::time::Duration;

use crate::npm::Npm;
use crate::output;

const MAX_ATTEMPTS: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(2);
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

pub async fn run(config: &RadntConfig) -> Result<()> {
    if which::which("npm").is_err() {
        anyhow::bail!("npm not found on PATH. Install Node.js to update radnt");
    }

    let processes = TokioProcessManager::new();
    let npm = Npm::new(&processes, &config.update.package);

    output::info("Updating Radnt CLI...");

    let installed = npm.installed_version().await;

    let latest = with_retries(MAX_ATTEMPTS, RETRY_DELAY, |attempt| {
        output::dim(&format!(
            "Checking for latest version... (attempt {}/{})",
            attempt, MAX_ATTEMPTS
        ));
        npm.latest_version(LOOKUP_TIMEOUT)
    })
    .await;

    match &latest {
        Some(latest) => {
            output::kv("Current version", installed.as_deref().unwrap_or("unknown"));
            output::kv("Latest version", latest);
            if installed.as_deref() == Some(latest.as_str()) {
                output::success("You already have the latest version!");
                return Ok(());
            }
        }
        None => {
            output::warning("Could not check latest version from npm registry.");
            output::dim("This might be due to npm registry propagation delay.");
            output::info("Attempting to update anyway...");
        }
    }

    npm.install_global(latest.as_deref())
        .await
        .with_context(|| {
            format!(
                "Failed to update Radnt CLI. Try updating manually: npm install -g {}@latest",
                npm.package()
            )
        })?;

    output::success("Radnt CLI updated successfully!");
    output::dim("Run \"radnt --version\" to see the new version.");
    Ok(())
}

/// Call `attempt` up to `max` times, sleeping `delay` between failures.
/// The closure receives the 1-based attempt number.
async fn with_retries<T, F, Fut>(max: u32, delay: Duration, mut attempt: F) -> Option<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    for n in 1..=max {
        match attempt(n).await {
            Ok(value) => return Some(value),
            Err(e) => {
                tracing::debug!("Attempt {} failed: {:#}", n, e);
                if n < max {
                    output::warning(&format!("Retrying in {} seconds...", delay.as_secs()));
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[tokio::test]
    async fn test_with_retries_succeeds_after_failures() {
        let calls = Cell::new(0);
        let result = with_retries(3, Duration::ZERO, |n| {
            calls.set(calls.get() + 1);
            async move {
                if n < 3 {
                    anyhow::bail!("registry unavailable");
                }
                Ok("1.2.3".to_string())
            }
        })
        .await;

        assert_eq!(result, Some("1.2.3".to_string()));
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn test_with_retries_gives_up() {
        let calls = Cell::new(0);
        let result: Option<String> = with_retries(3, Duration::ZERO, |_| {
            calls.set(calls.get() + 1);
            async { Err(anyhow::anyhow!("offline")) }
        })
        .await;

        assert_eq!(result, None);
        assert_eq!(calls.get(), 3);
    }
}
