//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Radnt - add shadcn/ui components and run Next.js dev servers
#[derive(Parser, Debug)]
#[command(name = "radnt")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Project directory (default: current directory)
    #[arg(short = 'C', long = "cwd", global = true, value_name = "DIR")]
    pub cwd: Option<Utf8PathBuf>,

    /// Path to radnt.yaml config file
    #[arg(short, long, global = true)]
    pub config: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add UI components to the project
    Add(AddArgs),

    /// List the component catalog
    List(ListArgs),

    /// Start the Next.js development server
    Dev(DevArgs),

    /// Stop running development servers
    Kill,

    /// Show version information
    Version(VersionArgs),

    /// Update the CLI through npm
    Update,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Component name (typos are tolerated)
    pub component: Option<String>,

    /// Add every component in the catalog
    #[arg(short, long, conflicts_with = "component")]
    pub all: bool,

    /// Skip confirmation prompts
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct DevArgs {
    /// Port to run on (default from radnt.yaml, then 8000)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Host to bind (default from radnt.yaml, then localhost)
    #[arg(long)]
    pub host: Option<String>,

    /// Stop existing development servers first
    #[arg(short, long)]
    pub kill: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Skip the npm registry update check
    #[arg(long)]
    pub no_check: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
