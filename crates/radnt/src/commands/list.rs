//! Component catalog listing

use anyhow::Result;
use radnt_components::ComponentRegistry;
use radnt_core::Catalog;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use crate::cli::ListArgs;
use crate::output;

#[derive(Debug, Tabled, Serialize)]
struct ComponentRow {
    name: String,
    available: String,
    description: String,
}

fn catalog_rows(catalog: &Catalog, registry: &ComponentRegistry) -> Vec<ComponentRow> {
    catalog
        .entries()
        .iter()
        .map(|entry| ComponentRow {
            name: entry.name.clone(),
            available: if registry.is_implemented(&entry.name) {
                "yes".to_string()
            } else {
                "-".to_string()
            },
            description: entry.description.clone(),
        })
        .collect()
}

pub fn run(args: ListArgs) -> Result<()> {
    let catalog = Catalog::embedded()?;
    let registry = ComponentRegistry::new()?;
    let rows = catalog_rows(&catalog, &registry);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let available = rows.iter().filter(|r| r.available == "yes").count();
    output::header(&format!("Components ({} in catalog, {} available)", rows.len(), available));

    let mut table = Table::new(&rows);
    table.with(Style::sharp());
    println!("{}", table);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_follow_catalog_order_and_mark_available() {
        let catalog = Catalog::embedded().unwrap();
        let registry = ComponentRegistry::new().unwrap();
        let rows = catalog_rows(&catalog, &registry);

        assert_eq!(rows.len(), catalog.len());
        assert_eq!(rows[0].name, "accordion");
        assert_eq!(rows[0].available, "yes");

        let dialog = rows.iter().find(|r| r.name == "dialog").unwrap();
        assert_eq!(dialog.available, "-");
    }
}
