//! npm registry queries for version checks and self-update

use anyhow::{anyhow, Context, Result};
use radnt_dev::{CommandSpec, ProcessManager};
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::debug;

/// `name@version` pairs in `npm list` output, scoped names included
static PACKAGE_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([@\w./-]+)@(\d+(?:\.\d+)*)").expect("package version regex is valid")
});

/// npm commands for one published package
pub struct Npm<'a> {
    processes: &'a dyn ProcessManager,
    package: &'a str,
}

impl<'a> Npm<'a> {
    pub fn new(processes: &'a dyn ProcessManager, package: &'a str) -> Self {
        Self { processes, package }
    }

    pub fn package(&self) -> &str {
        self.package
    }

    /// `npm view <package> version`
    pub async fn latest_version(&self, timeout: Duration) -> Result<String> {
        let spec = CommandSpec::new("npm").args(["view", self.package, "version"]);
        let out = self.processes.output(&spec, Some(timeout)).await?;
        if !out.success() {
            return Err(anyhow!("{} failed: {}", spec, out.stderr.trim()));
        }

        let version = out.stdout.trim();
        if version.is_empty() {
            return Err(anyhow!("npm returned no version for {}", self.package));
        }
        Ok(version.to_string())
    }

    /// Version installed globally, if npm knows about one
    pub async fn installed_version(&self) -> Option<String> {
        let spec = CommandSpec::new("npm").args(["list", "-g", self.package, "--depth=0"]);
        match self.processes.output(&spec, None).await {
            Ok(out) => parse_installed_version(&out.stdout, self.package),
            Err(e) => {
                debug!("Could not read installed version: {}", e);
                None
            }
        }
    }

    /// `npm install -g <package>@<version|latest>` with the terminal attached
    pub async fn install_global(&self, version: Option<&str>) -> Result<()> {
        let target = format!("{}@{}", self.package, version.unwrap_or("latest"));
        let spec = CommandSpec::new("npm").args(["install", "-g"]).arg(target);
        let code = self
            .processes
            .run_inherited(&spec)
            .await
            .with_context(|| format!("Failed to run {}", spec))?;
        match code {
            Some(0) => Ok(()),
            Some(code) => Err(anyhow!("{} exited with code {}", spec, code)),
            None => Err(anyhow!("{} was terminated", spec)),
        }
    }
}

/// Version of `package` in `npm list -g` output
pub fn parse_installed_version(stdout: &str, package: &str) -> Option<String> {
    PACKAGE_VERSION_RE
        .captures_iter(stdout)
        .find(|caps| &caps[1] == package)
        .map(|caps| caps[2].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_installed_version() {
        let stdout = "/usr/local/lib\n└── radnt-cli@1.4.2\n";
        assert_eq!(
            parse_installed_version(stdout, "radnt-cli"),
            Some("1.4.2".to_string())
        );
    }

    #[test]
    fn test_parse_installed_version_missing() {
        assert_eq!(parse_installed_version("/usr/local/lib\n└── (empty)\n", "radnt-cli"), None);
    }

    #[test]
    fn test_parse_installed_version_ignores_similar_names() {
        let stdout = "└── radnt-cli-extras@9.9.9\n└── radnt-cli@0.3.0\n";
        // "radnt-cli-extras@" does not match "radnt-cli@"
        assert_eq!(
            parse_installed_version(stdout, "radnt-cli"),
            Some("0.3.0".to_string())
        );
    }

    #[test]
    fn test_parse_installed_version_requires_whole_name() {
        let stdout = "├── my-radnt-cli@2.0.0\n└── radnt-cli@0.4.1\n";
        assert_eq!(
            parse_installed_version(stdout, "radnt-cli"),
            Some("0.4.1".to_string())
        );
        assert_eq!(parse_installed_version("└── my-radnt-cli@2.0.0\n", "radnt-cli"), None);
    }

    #[test]
    fn test_parse_installed_version_scoped_package() {
        let stdout = "└── @radnt/cli@1.0.7\n";
        assert_eq!(
            parse_installed_version(stdout, "@radnt/cli"),
            Some("1.0.7".to_string())
        );
    }
}
