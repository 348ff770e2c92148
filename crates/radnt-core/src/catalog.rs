//! Component catalog loading.
//!
//! The catalog is an ordered, read-only list of known component names. It is
//! embedded at compile time from `catalog/components.yaml`; alternative
//! catalogs can be parsed from YAML for tests and tooling.

use crate::error::{Error, Result};
use crate::resolver::{self, MatchResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Embedded catalog YAML
// Path is relative to this source file
const EMBEDDED_CATALOG: &str = include_str!("../catalog/components.yaml");

/// A single known component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Unique kebab-case identifier
    pub name: String,
    /// One-line human description
    pub description: String,
}

impl CatalogEntry {
    /// Create a catalog entry
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[allow(dead_code)]
    version: String,
    components: Vec<CatalogEntry>,
}

/// Ordered set of known components
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Build a catalog from entries, keeping their order
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if entry.name.is_empty() {
                return Err(Error::invalid_catalog("component name must not be empty"));
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(Error::duplicate_entry(&entry.name));
            }
        }
        Ok(Self { entries })
    }

    /// Load the catalog compiled into the binary
    pub fn embedded() -> Result<Self> {
        let catalog = Self::from_yaml(EMBEDDED_CATALOG)?;
        debug!("Loaded embedded catalog with {} components", catalog.len());
        Ok(catalog)
    }

    /// Parse a catalog from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let file: CatalogFile = serde_yaml_ng::from_str(yaml)?;
        Self::new(file.components)
    }

    /// All entries in catalog order
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// All names in catalog order
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// Look up an entry by exact name
    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a user-typed name against this catalog
    pub fn resolve(&self, query: &str) -> MatchResult<'_> {
        resolver::resolve(query, &self.entries)
    }
}
