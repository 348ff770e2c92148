//! Project configuration (radnt.yaml)
//!
//! Every field has a default, so a project without a config file behaves the
//! same as one with an empty file. The project root is always passed in by the
//! caller; nothing here reads the process working directory.

use crate::error::{Error, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::fs;
use tracing::debug;

/// Configuration file names to search for
pub const CONFIG_FILE_NAMES: &[&str] = &["radnt.yaml", "radnt.yml"];

/// Top-level radnt.yaml contents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RadntConfig {
    pub components: ComponentsSettings,
    pub dev: DevSettings,
    pub update: UpdateSettings,
}

/// Where component files are written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComponentsSettings {
    /// Directory for generated UI components, relative to the project root
    pub dir: Utf8PathBuf,
}

impl Default for ComponentsSettings {
    fn default() -> Self {
        Self {
            dir: Utf8PathBuf::from("src/components/ui"),
        }
    }
}

/// Development server wrapper settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DevSettings {
    pub port: u16,
    pub host: String,
    /// Glob patterns (relative to the project root) to watch for changes
    pub watch: Vec<String>,
    /// Path components that are never watched
    pub ignore: Vec<String>,
    pub poll_interval_ms: u64,
    /// Seconds to wait after a graceful stop before force-killing the dev server
    pub shutdown_grace_secs: u64,
    /// Ports cleared by `radnt kill`
    pub kill_ports: Vec<u16>,
}

impl Default for DevSettings {
    fn default() -> Self {
        Self {
            port: 8000,
            host: "localhost".to_string(),
            watch: ["src/**", "app/**", "pages/**", "components/**", "styles/**", "public/**"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            ignore: vec![
                "node_modules".to_string(),
                ".next".to_string(),
                ".git".to_string(),
            ],
            poll_interval_ms: 500,
            shutdown_grace_secs: 5,
            kill_ports: vec![3000, 8000, 8001, 3001, 5000],
        }
    }
}

/// Update check settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpdateSettings {
    /// Check the npm registry for a newer release on `radnt version`
    pub check: bool,
    /// npm package the CLI is published as
    pub package: String,
}

impl Default for UpdateSettings {
    fn default() -> Self {
        Self {
            check: true,
            package: "radnt-cli".to_string(),
        }
    }
}

impl RadntConfig {
    /// Load configuration for a project.
    ///
    /// An explicit `path` must exist. Without one, `radnt.yaml`/`radnt.yml` in
    /// `root` is used when present, otherwise defaults.
    pub fn load(root: &Utf8Path, path: Option<&Utf8Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => {
                let p = if p.is_absolute() { p.to_owned() } else { root.join(p) };
                if !p.is_file() {
                    return Err(Error::config_not_found(p.as_str()));
                }
                Some(p)
            }
            None => Self::find(root),
        };

        let config = match config_path {
            Some(p) => {
                debug!("Loading configuration from {}", p);
                let content = fs::read_to_string(&p)?;
                Self::from_yaml(&content)?
            }
            None => {
                debug!("No radnt.yaml in {}, using defaults", root);
                Self::default()
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from YAML (an empty document yields defaults)
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Find a config file directly in `root`
    pub fn find(root: &Utf8Path) -> Option<Utf8PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| root.join(name))
            .find(|p| p.is_file())
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.components.dir.as_str().is_empty() || self.components.dir.is_absolute() {
            return Err(Error::invalid_config(
                "components.dir must be a non-empty path relative to the project root",
            ));
        }
        if self.dev.port == 0 {
            return Err(Error::invalid_config("dev.port must be between 1 and 65535"));
        }
        if self.dev.host.trim().is_empty() {
            return Err(Error::invalid_config("dev.host must not be empty"));
        }
        if self.dev.poll_interval_ms == 0 {
            return Err(Error::invalid_config("dev.poll_interval_ms must be positive"));
        }
        if self.update.package.trim().is_empty() {
            return Err(Error::invalid_config("update.package must not be empty"));
        }
        Ok(())
    }
}
