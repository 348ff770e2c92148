//! Embedded component boilerplate.
//!
//! Each `templates/components/<name>.tsx` file is the source for one catalog
//! component. Templates are rendered with Tera so that import aliases follow
//! the target project's components.json.

use crate::error::{Error, Result};
use rust_embed::RustEmbed;
use serde::Serialize;
use tera::{Context, Tera};
use tracing::debug;

/// Embedded component templates
#[derive(RustEmbed)]
#[folder = "templates/components/"]
struct ComponentTemplates;

const TEMPLATE_EXTENSION: &str = ".tsx";

/// Default import path of the `cn` helper
pub const DEFAULT_UTILS_ALIAS: &str = "@/lib/utils";

/// Values substituted into component templates
#[derive(Debug, Clone, Serialize)]
pub struct RenderContext {
    /// Import path of the `cn` class-name helper
    pub utils_alias: String,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            utils_alias: DEFAULT_UTILS_ALIAS.to_string(),
        }
    }
}

/// Keyed lookup of component name to boilerplate
pub struct ComponentRegistry {
    tera: Tera,
    names: Vec<String>,
}

impl ComponentRegistry {
    /// Load all embedded component templates
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        let mut names = Vec::new();

        for file in ComponentTemplates::iter() {
            let Some(name) = file.strip_suffix(TEMPLATE_EXTENSION) else {
                continue;
            };

            let content = ComponentTemplates::get(&file)
                .ok_or_else(|| Error::template_not_found(file.to_string()))?;
            let source = std::str::from_utf8(&content.data)
                .map_err(|_| Error::template_not_found(format!("{} (invalid UTF-8)", file)))?;

            tera.add_raw_template(&file, source)?;
            names.push(name.to_string());
        }

        names.sort();
        debug!("Loaded {} component templates", names.len());

        Ok(Self { tera, names })
    }

    /// Names with boilerplate, sorted
    pub fn implemented(&self) -> &[String] {
        &self.names
    }

    /// Whether `name` has boilerplate
    pub fn is_implemented(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Render the boilerplate for `name`
    pub fn render(&self, name: &str, ctx: &RenderContext) -> Result<String> {
        if !self.is_implemented(name) {
            return Err(Error::not_implemented(name));
        }

        let context = Context::from_serialize(ctx)?;
        let rendered = self
            .tera
            .render(&format!("{}{}", name, TEMPLATE_EXTENSION), &context)?;
        Ok(rendered)
    }
}

impl std::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("names", &self.names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use radnt_core::Catalog;

    #[test]
    fn test_implemented_components() {
        let registry = ComponentRegistry::new().unwrap();
        assert_eq!(
            registry.implemented(),
            &["accordion", "alert", "avatar", "badge", "separator", "skeleton", "table"]
        );
    }

    #[test]
    fn test_every_template_is_a_catalog_component() {
        let registry = ComponentRegistry::new().unwrap();
        let catalog = Catalog::embedded().unwrap();
        for name in registry.implemented() {
            assert!(catalog.get(name).is_some(), "{name} missing from catalog");
        }
    }

    #[test]
    fn test_render_uses_default_alias() {
        let registry = ComponentRegistry::new().unwrap();
        let source = registry.render("badge", &RenderContext::default()).unwrap();
        assert!(source.contains(r#"import { cn } from "@/lib/utils""#));
        assert!(source.contains("export { Badge, badgeVariants }"));
        assert!(!source.contains("{{"));
    }

    #[test]
    fn test_render_uses_custom_alias() {
        let registry = ComponentRegistry::new().unwrap();
        let ctx = RenderContext {
            utils_alias: "~/utils/cn".to_string(),
        };
        let source = registry.render("skeleton", &ctx).unwrap();
        assert!(source.contains(r#"import { cn } from "~/utils/cn""#));
    }

    #[test]
    fn test_render_keeps_jsx_braces() {
        let registry = ComponentRegistry::new().unwrap();
        let source = registry.render("table", &RenderContext::default()).unwrap();
        assert!(source.contains("{...props}"));
    }

    #[test]
    fn test_render_unknown_component() {
        let registry = ComponentRegistry::new().unwrap();
        let result = registry.render("calendar", &RenderContext::default());
        assert!(matches!(result, Err(Error::NotImplemented { name }) if name == "calendar"));
    }
}
