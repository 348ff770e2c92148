//! shadcn/ui project detection.
//!
//! A project counts as initialized when `components.json` exists at its root.
//! Only the fields radnt needs are read; everything else is ignored.

use crate::error::{Error, Result};
use crate::registry::{RenderContext, DEFAULT_UTILS_ALIAS};
use camino::{Utf8Path, Utf8PathBuf};
use radnt_core::config::ComponentsSettings;
use serde::Deserialize;
use std::fs;
use tracing::debug;

/// Name of the shadcn/ui project marker file
pub const COMPONENTS_JSON: &str = "components.json";

const DEFAULT_COMPONENTS_ALIAS: &str = "@/components";

/// Subset of components.json used by radnt
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ComponentsJson {
    pub aliases: Aliases,
}

/// Import aliases from components.json
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Aliases {
    pub components: String,
    pub utils: String,
}

impl Default for Aliases {
    fn default() -> Self {
        Self {
            components: DEFAULT_COMPONENTS_ALIAS.to_string(),
            utils: DEFAULT_UTILS_ALIAS.to_string(),
        }
    }
}

/// A project that has been initialized for shadcn/ui
#[derive(Debug, Clone)]
pub struct ShadcnProject {
    root: Utf8PathBuf,
    components_dir: Utf8PathBuf,
    manifest: ComponentsJson,
}

impl ShadcnProject {
    /// Open the project at `root`, failing if components.json is missing
    pub fn open(root: &Utf8Path, settings: &ComponentsSettings) -> Result<Self> {
        let manifest_path = root.join(COMPONENTS_JSON);
        if !manifest_path.is_file() {
            return Err(Error::not_initialized(root.as_str()));
        }

        let content = fs::read_to_string(&manifest_path)?;
        let manifest: ComponentsJson = serde_json::from_str(&content)?;
        debug!(
            "Opened shadcn project at {} (utils alias: {})",
            root, manifest.aliases.utils
        );

        Ok(Self {
            root: root.to_owned(),
            components_dir: root.join(&settings.dir),
            manifest,
        })
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Directory that receives component files
    pub fn components_dir(&self) -> &Utf8Path {
        &self.components_dir
    }

    pub fn manifest(&self) -> &ComponentsJson {
        &self.manifest
    }

    /// Target file for a component
    pub fn component_path(&self, name: &str) -> Utf8PathBuf {
        self.components_dir.join(format!("{}.tsx", name))
    }

    /// Template values for this project
    pub fn render_context(&self) -> RenderContext {
        RenderContext {
            utils_alias: self.manifest.aliases.utils.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn root_of(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap()
    }

    #[test]
    fn test_open_requires_components_json() {
        let dir = TempDir::new().unwrap();
        let result = ShadcnProject::open(&root_of(&dir), &ComponentsSettings::default());
        assert!(matches!(result, Err(Error::NotInitialized { .. })));
    }

    #[test]
    fn test_open_with_minimal_manifest() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(COMPONENTS_JSON), "{}").unwrap();
        let root = root_of(&dir);

        let project = ShadcnProject::open(&root, &ComponentsSettings::default()).unwrap();
        assert_eq!(project.root(), root.as_path());
        assert_eq!(
            project.component_path("alert"),
            root.join("src/components/ui/alert.tsx")
        );
        assert_eq!(project.render_context().utils_alias, "@/lib/utils");
    }

    #[test]
    fn test_open_reads_aliases_and_custom_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(COMPONENTS_JSON),
            r#"{
  "style": "new-york",
  "tsx": true,
  "aliases": { "components": "~/components", "utils": "~/lib/cn" }
}"#,
        )
        .unwrap();
        let settings = ComponentsSettings {
            dir: Utf8PathBuf::from("components/ui"),
        };

        let project = ShadcnProject::open(&root_of(&dir), &settings).unwrap();
        assert!(project.component_path("badge").ends_with("components/ui/badge.tsx"));
        assert_eq!(project.manifest().aliases.components, "~/components");
        assert_eq!(project.render_context().utils_alias, "~/lib/cn");
    }

    #[test]
    fn test_open_rejects_malformed_json() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(COMPONENTS_JSON), "{ not json").unwrap();
        let result = ShadcnProject::open(&root_of(&dir), &ComponentsSettings::default());
        assert!(matches!(result, Err(Error::JsonParse(_))));
    }
}
