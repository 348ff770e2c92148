//! Radnt CLI - shadcn/ui components and Next.js dev servers
//!
//! This is the main entry point for the radnt command-line interface.

mod cli;
mod commands;
mod npm;
mod output;
mod version;

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use radnt_core::RadntConfig;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI args
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let command = match cli.command {
        Commands::Completions(args) => return commands::completions::run(args),
        command => command,
    };

    let root = resolve_root(cli.cwd.as_deref())?;
    let config = RadntConfig::load(&root, cli.config.as_deref())
        .with_context(|| format!("Failed to load configuration for {}", root))?;

    match command {
        Commands::Add(args) => commands::add::run(args, &root, &config),
        Commands::List(args) => commands::list::run(args),
        Commands::Dev(args) => commands::dev::run(args, &root, &config).await,
        Commands::Kill => commands::kill::run(&config).await,
        Commands::Version(args) => commands::version::run(args, &config).await,
        Commands::Update => commands::update::run(&config).await,
        Commands::Completions(_) => Ok(()),
    }
}

/// Project root: `--cwd` (relative to the current directory) or the current directory
fn resolve_root(cwd: Option<&Utf8Path>) -> Result<Utf8PathBuf> {
    let current = std::env::current_dir().context("Failed to read the current directory")?;
    let current = Utf8PathBuf::try_from(current).context("Current directory is not valid UTF-8")?;

    let root = match cwd {
        Some(dir) if dir.is_absolute() => dir.to_owned(),
        Some(dir) => current.join(dir),
        None => current,
    };
    if !root.is_dir() {
        anyhow::bail!("Project directory {} does not exist", root);
    }
    Ok(root)
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
