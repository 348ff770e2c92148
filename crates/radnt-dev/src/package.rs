//! package.json inspection.

use crate::error::{Error, Result};
use camino::Utf8Path;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;

/// Fields of package.json needed to recognise a Next.js project
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PackageJson {
    pub name: Option<String>,
    pub dependencies: BTreeMap<String, serde_json::Value>,
    pub dev_dependencies: BTreeMap<String, serde_json::Value>,
}

impl PackageJson {
    /// Read `<root>/package.json`
    pub fn load(root: &Utf8Path) -> Result<Self> {
        let path = root.join("package.json");
        if !path.is_file() {
            return Err(Error::package_json_missing(root.as_str()));
        }
        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Declared `next` version, from dependencies or devDependencies
    pub fn next_version(&self) -> Option<&str> {
        self.dependencies
            .get("next")
            .or_else(|| self.dev_dependencies.get("next"))
            .map(|v| v.as_str().unwrap_or("*"))
    }

    pub fn is_next_project(&self) -> bool {
        self.next_version().is_some()
    }
}

/// Load package.json and require a `next` dependency
pub fn require_next_project(root: &Utf8Path) -> Result<PackageJson> {
    let package = PackageJson::load(root)?;
    if !package.is_next_project() {
        return Err(Error::not_next_project(root.as_str()));
    }
    Ok(package)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    fn project(package_json: Option<&str>) -> (TempDir, Utf8PathBuf) {
        let dir = TempDir::new().unwrap();
        if let Some(content) = package_json {
            fs::write(dir.path().join("package.json"), content).unwrap();
        }
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();
        (dir, root)
    }

    #[test]
    fn test_missing_package_json() {
        let (_dir, root) = project(None);
        assert!(matches!(
            require_next_project(&root),
            Err(Error::PackageJsonMissing { .. })
        ));
    }

    #[test]
    fn test_next_in_dependencies() {
        let (_dir, root) = project(Some(
            r#"{ "name": "shop", "dependencies": { "next": "15.0.3", "react": "^19" } }"#,
        ));
        let package = require_next_project(&root).unwrap();
        assert_eq!(package.name.as_deref(), Some("shop"));
        assert_eq!(package.next_version(), Some("15.0.3"));
    }

    #[test]
    fn test_next_in_dev_dependencies() {
        let (_dir, root) = project(Some(r#"{ "devDependencies": { "next": "^14" } }"#));
        assert!(require_next_project(&root).unwrap().is_next_project());
    }

    #[test]
    fn test_not_a_next_project() {
        let (_dir, root) = project(Some(r#"{ "dependencies": { "vite": "^5" } }"#));
        assert!(matches!(
            require_next_project(&root),
            Err(Error::NotNextProject { .. })
        ));
    }

    #[test]
    fn test_malformed_package_json() {
        let (_dir, root) = project(Some("{"));
        assert!(matches!(
            require_next_project(&root),
            Err(Error::JsonParse(_))
        ));
    }
}
