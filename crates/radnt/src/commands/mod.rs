//! CLI command implementations

pub mod add;
pub mod completions;
pub mod dev;
pub mod kill;
pub mod list;
pub mod update;
pub mod version;
