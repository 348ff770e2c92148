//! Version command

use anyhow::Result;
use radnt_core::RadntConfig;
use radnt_dev::TokioProcessManager;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use crate::cli::VersionArgs;
use crate::npm::Npm;
use crate::output;
use crate::version::{is_newer, VersionInfo};

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Serialize)]
struct VersionReport {
    #[serde(flatten)]
    info: VersionInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    latest: Option<String>,
}

pub async fn run(args: VersionArgs, config: &RadntConfig) -> Result<()> {
    let info = VersionInfo::current();

    let latest = if args.no_check || !config.update.check {
        None
    } else {
        latest_release(&config.update.package).await
    };

    if args.json {
        let report = VersionReport { info, latest };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", info.display());
    if let Some(date) = &info.build_date {
        println!("Build date: {}", date);
    }

    if let Some(latest) = latest.filter(|latest| is_newer(latest, &info.version)) {
        output::header("Update available!");
        output::kv("Current version", &info.version);
        output::kv("Latest version", &latest);
        output::info("To update, run:");
        println!("  npm update -g {}", config.update.package);
        output::dim("or");
        println!("  radnt update");
    }

    Ok(())
}

/// Registry version, or `None` on any failure
async fn latest_release(package: &str) -> Option<String> {
    let processes = TokioProcessManager::new();
    match Npm::new(&processes, package).latest_version(CHECK_TIMEOUT).await {
        Ok(version) => Some(version),
        Err(e) => {
            debug!("Update check failed: {:#}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_json_flattens_version_info() {
        let report = VersionReport {
            info: VersionInfo {
                version: "0.1.0".to_string(),
                commit: None,
                build_date: None,
                target: None,
            },
            latest: Some("0.2.0".to_string()),
        };
        let json: serde_json::Value = serde_json::to_value(&report).unwrap();
        assert_eq!(json["version"], "0.1.0");
        assert_eq!(json["latest"], "0.2.0");
    }

    #[test]
    fn test_report_json_omits_latest_when_unchecked() {
        let report = VersionReport {
            info: VersionInfo {
                version: "0.1.0".to_string(),
                commit: None,
                build_date: None,
                target: None,
            },
            latest: None,
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(!json.contains("latest"));
    }
}
