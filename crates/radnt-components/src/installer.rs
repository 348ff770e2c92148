//! Writing component boilerplate into a project.
//!
//! Existing files are never overwritten: a component whose target file is
//! already present is reported as skipped.

use crate::error::{Error, Result};
use crate::project::ShadcnProject;
use crate::registry::ComponentRegistry;
use camino::Utf8PathBuf;
use std::fs;
use tracing::{debug, info};

/// Result of installing one component
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// File was written
    Installed { name: String, path: Utf8PathBuf },
    /// File already existed and was left alone
    Skipped { name: String, path: Utf8PathBuf },
}

impl InstallOutcome {
    pub fn name(&self) -> &str {
        match self {
            InstallOutcome::Installed { name, .. } | InstallOutcome::Skipped { name, .. } => name,
        }
    }

    pub fn is_installed(&self) -> bool {
        matches!(self, InstallOutcome::Installed { .. })
    }
}

/// Installs components from a registry into a project
#[derive(Debug)]
pub struct ComponentInstaller<'a> {
    project: &'a ShadcnProject,
    registry: &'a ComponentRegistry,
}

impl<'a> ComponentInstaller<'a> {
    pub fn new(project: &'a ShadcnProject, registry: &'a ComponentRegistry) -> Self {
        Self { project, registry }
    }

    /// Install a single component by catalog name
    pub fn install(&self, name: &str) -> Result<InstallOutcome> {
        let path = self.project.component_path(name);

        if path.exists() {
            debug!("{} already exists, skipping", path);
            return Ok(InstallOutcome::Skipped {
                name: name.to_string(),
                path,
            });
        }

        if !self.registry.is_implemented(name) {
            return Err(Error::not_implemented(name));
        }

        let source = self.registry.render(name, &self.project.render_context())?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, source)?;
        info!("Wrote component {} to {}", name, path);

        Ok(InstallOutcome::Installed {
            name: name.to_string(),
            path,
        })
    }

    /// Install components in order, stopping at the first failure
    pub fn install_all<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<InstallOutcome>> {
        names.iter().map(|name| self.install(name.as_ref())).collect()
    }

    /// Import statement for a component in this project
    pub fn import_hint(&self, name: &str) -> String {
        import_hint(&self.project.manifest().aliases.components, name)
    }
}

/// Import statement for a component given the components alias
pub fn import_hint(components_alias: &str, name: &str) -> String {
    format!(
        "import {{ {} }} from \"{}/ui/{}\"",
        to_pascal_case(name),
        components_alias.trim_end_matches('/'),
        name
    )
}

/// Convert a kebab-case name to PascalCase ("alert-dialog" -> "AlertDialog")
pub fn to_pascal_case(name: &str) -> String {
    name.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}
