//! # radnt-components
//!
//! Component boilerplate for the Radnt CLI providing:
//! - Embedded shadcn/ui component templates, keyed by catalog name
//! - Detection of shadcn-initialized projects (components.json)
//! - Installation of rendered components into a project
//!
//! Name matching lives in `radnt-core`; this crate only ever receives names
//! that were already resolved against the catalog.
//!
//! # Examples
//!
//! ```no_run
//! use camino::Utf8Path;
//! use radnt_components::{ComponentInstaller, ComponentRegistry, ShadcnProject};
//! use radnt_core::config::ComponentsSettings;
//!
//! # fn example() -> radnt_components::Result<()> {
//! let project = ShadcnProject::open(Utf8Path::new("."), &ComponentsSettings::default())?;
//! let registry = ComponentRegistry::new()?;
//! let installer = ComponentInstaller::new(&project, &registry);
//! installer.install("badge")?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod installer;
pub mod project;
pub mod registry;

pub use error::{Error, Result};
pub use installer::{import_hint, to_pascal_case, ComponentInstaller, InstallOutcome};
pub use project::{ComponentsJson, ShadcnProject};
pub use registry::{ComponentRegistry, RenderContext};
