//! Add components to a project

use anyhow::{bail, Context, Result};
use camino::Utf8Path;
use dialoguer::{Confirm, MultiSelect, Select};
use radnt_components::{ComponentInstaller, ComponentRegistry, InstallOutcome, ShadcnProject};
use radnt_core::{Catalog, CatalogEntry, MatchResult, RadntConfig};
use std::io::{self, IsTerminal};

use crate::cli::AddArgs;
use crate::output;

pub fn run(args: AddArgs, root: &Utf8Path, config: &RadntConfig) -> Result<()> {
    output::header("Adding shadcn/ui components");

    let project = ShadcnProject::open(root, &config.components)?;
    let catalog = Catalog::embedded()?;
    let registry = ComponentRegistry::new()?;
    let interactive = io::stdin().is_terminal();

    let names: Vec<String> = if args.all {
        if !args.yes && !confirm_all(catalog.len(), interactive)? {
            output::info("Cancelled.");
            return Ok(());
        }
        catalog.names().into_iter().map(String::from).collect()
    } else if let Some(query) = args.component.as_deref() {
        let picked = choose_component(&catalog, query, |candidates| {
            if !interactive {
                let names: Vec<&str> = candidates.iter().map(|c| c.name.as_str()).collect();
                bail!(
                    "Component \"{}\" is ambiguous: {}. Pass the exact name",
                    query,
                    names.join(", ")
                );
            }
            prompt_candidate(candidates)
        })?;
        match picked {
            Some(name) => vec![name],
            None => return Ok(()),
        }
    } else {
        if !interactive {
            bail!("No component given. Pass a component name or --all");
        }
        let selected = prompt_components(&catalog)?;
        if selected.is_empty() {
            output::warning("No components selected.");
            return Ok(());
        }
        selected
    };

    install(&project, &registry, &names)
}

/// Turn a typed name into a catalog name.
///
/// `select` is only consulted for ambiguous queries. `None` means nothing
/// matched and the catalog has been printed instead.
fn choose_component<F>(catalog: &Catalog, query: &str, select: F) -> Result<Option<String>>
where
    F: FnOnce(&[&CatalogEntry]) -> Result<usize>,
{
    match catalog.resolve(query) {
        MatchResult::Exact { entry } => Ok(Some(entry.name.clone())),
        MatchResult::UniqueFuzzy { entry } => {
            output::warning(&format!(
                "Did you mean \"{}\"? Using that instead.",
                entry.name
            ));
            Ok(Some(entry.name.clone()))
        }
        MatchResult::Ambiguous { candidates } => {
            output::warning(&format!("Component \"{}\" not found.", query));
            output::info("Did you mean one of these?");
            for entry in &candidates {
                output::bullet(&entry.name, &entry.description);
            }

            let index = select(&candidates)?;
            let entry = candidates
                .get(index)
                .with_context(|| format!("Invalid selection {}", index))?;
            Ok(Some(entry.name.clone()))
        }
        MatchResult::NoMatch => {
            output::warning(&format!("Component \"{}\" not found.", query));
            output::info("Available components:");
            for entry in catalog.entries() {
                output::bullet(&entry.name, &entry.description);
            }
            Ok(None)
        }
    }
}

fn prompt_candidate(candidates: &[&CatalogEntry]) -> Result<usize> {
    let items: Vec<&str> = candidates.iter().map(|c| c.name.as_str()).collect();
    let selection = Select::new()
        .with_prompt("Select the correct component")
        .items(&items)
        .default(0)
        .interact()?;
    Ok(selection)
}

fn prompt_components(catalog: &Catalog) -> Result<Vec<String>> {
    let items: Vec<String> = catalog
        .entries()
        .iter()
        .map(|c| format!("{} - {}", c.name, c.description))
        .collect();

    let selected = MultiSelect::new()
        .with_prompt("Which components would you like to add?")
        .items(&items)
        .max_length(15)
        .interact()?;

    Ok(selected
        .into_iter()
        .filter_map(|i| catalog.entries().get(i))
        .map(|c| c.name.clone())
        .collect())
}

fn confirm_all(count: usize, interactive: bool) -> Result<bool> {
    if !interactive {
        output::warning("Refusing to add every component without a terminal; pass --yes");
        return Ok(false);
    }
    Ok(Confirm::new()
        .with_prompt(format!("Add all {} components?", count))
        .default(true)
        .interact()?)
}

fn install(project: &ShadcnProject, registry: &ComponentRegistry, names: &[String]) -> Result<()> {
    let installer = ComponentInstaller::new(project, registry);

    let spinner = output::spinner(&format!("Adding {} component(s)...", names.len()));
    let result = installer.install_all(names);
    spinner.finish_and_clear();
    let outcomes = result.context("Failed to add components")?;

    for outcome in &outcomes {
        if let InstallOutcome::Skipped { name, .. } = outcome {
            output::warning(&format!("Component {} already exists, skipping...", name));
        }
    }

    output::success(&format!("Successfully added {} component(s)!", names.len()));
    output::kv("Directory", project.components_dir().as_str());
    output::info("You can now import and use them in your project:");
    for name in names {
        output::dim(&format!("  {}", installer.import_hint(name)));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn never_asked(_: &[&CatalogEntry]) -> Result<usize> {
        panic!("selection should not be needed");
    }

    #[test]
    fn test_exact_and_fuzzy_need_no_selection() {
        let catalog = Catalog::embedded().unwrap();
        assert_eq!(
            choose_component(&catalog, "alert", never_asked).unwrap(),
            Some("alert".to_string())
        );
        assert_eq!(
            choose_component(&catalog, "tooltp", never_asked).unwrap(),
            Some("tooltip".to_string())
        );
    }

    #[test]
    fn test_no_match_returns_none() {
        let catalog = Catalog::embedded().unwrap();
        assert_eq!(choose_component(&catalog, "xyz123", never_asked).unwrap(), None);
    }

    #[test]
    fn test_ambiguous_uses_selection() {
        let catalog = Catalog::embedded().unwrap();
        let mut offered = Vec::new();
        let picked = choose_component(&catalog, "menu", |candidates| {
            offered = candidates.iter().map(|c| c.name.clone()).collect();
            Ok(2)
        })
        .unwrap();

        assert_eq!(
            offered,
            vec!["context-menu", "dropdown-menu", "menubar", "navigation-menu"]
        );
        assert_eq!(picked, Some("menubar".to_string()));
    }

    #[test]
    fn test_ambiguous_propagates_refusal() {
        let catalog = Catalog::embedded().unwrap();
        let result = choose_component(&catalog, "menu", |_| bail!("no terminal"));
        assert!(result.is_err());
    }
}
