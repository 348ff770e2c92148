//! # radnt-core
//!
//! Core library for the Radnt CLI providing:
//! - The component catalog (names and descriptions of shadcn/ui components)
//! - Typo-tolerant component name resolution
//! - Project configuration (radnt.yaml)
//!
//! # Examples
//!
//! ```
//! use radnt_core::{Catalog, MatchResult};
//!
//! let catalog = Catalog::embedded().unwrap();
//! match catalog.resolve("alrt") {
//!     MatchResult::UniqueFuzzy { entry } => assert_eq!(entry.name, "alert"),
//!     other => panic!("unexpected match: {:?}", other),
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod resolver;

pub use catalog::{Catalog, CatalogEntry};
pub use config::RadntConfig;
pub use error::{Error, Result};
pub use resolver::{levenshtein, resolve, MatchResult};
