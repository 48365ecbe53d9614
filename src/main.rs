//! depflip - dependency source flipper CLI

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use depflip::cmd;
use depflip::cmd::init::SourceArgs;
use depflip::config::CheckPolicy;

#[derive(Parser)]
#[command(name = "depflip")]
#[command(author, version, about = "Flip a dependency between local, GitHub, GitLab, and npm sources")]
pub struct Cli {
    /// Skip the pnpm install step after a switch
    #[arg(long, global = true)]
    no_install: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Switch a dependency to its local working copy
    Local {
        /// Dependency name (optional when only one is tracked)
        name: Option<String>,
    },
    /// Switch a dependency to a GitHub ref
    Github {
        /// Dependency name and/or ref (name optional when only one is tracked)
        #[arg(value_name = "NAME|REF", num_args = 0..=2)]
        args: Vec<String>,
        /// Resolve this branch (or tag) to a commit SHA instead of a positional ref
        #[arg(long, value_name = "BRANCH")]
        branch: Option<String>,
        /// Pin a positional ref to its commit SHA via the platform API
        #[arg(long)]
        resolve: bool,
    },
    /// Switch a dependency to a GitLab ref
    Gitlab {
        /// Dependency name and/or ref (name optional when only one is tracked)
        #[arg(value_name = "NAME|REF", num_args = 0..=2)]
        args: Vec<String>,
        /// Resolve this branch (or tag) to a commit SHA instead of a positional ref
        #[arg(long, value_name = "BRANCH")]
        branch: Option<String>,
        /// Pin a positional ref to its commit SHA via the platform API
        #[arg(long)]
        resolve: bool,
    },
    /// Switch a dependency to a published npm version
    Npm {
        /// Dependency name and/or version (name optional when only one is tracked)
        #[arg(value_name = "NAME|VERSION", num_args = 0..=2)]
        args: Vec<String>,
    },
    /// Start tracking a dependency
    Init {
        /// Dependency name as it appears in package.json
        name: String,
        #[command(flatten)]
        source: SourceArgs,
        /// Also declare the dependency in package.json and, with --local, switch to it
        #[arg(long)]
        activate: bool,
        /// Put the --activate placeholder in devDependencies
        #[arg(long, requires = "activate")]
        dev: bool,
        /// Track in the user-global config instead of the project
        #[arg(long)]
        global: bool,
    },
    /// Update a tracked dependency's sources
    Set {
        /// Dependency name (optional when only one is tracked)
        name: Option<String>,
        #[command(flatten)]
        source: SourceArgs,
        /// When to refuse local sources
        #[arg(long, value_enum, value_name = "POLICY")]
        check_on: Option<CheckPolicy>,
        /// Address the user-global config instead of the project
        #[arg(long)]
        global: bool,
    },
    /// Stop tracking a dependency
    Rm {
        /// Dependency name (optional when only one is tracked)
        name: Option<String>,
        /// Also drop the dependency from package.json
        #[arg(long)]
        purge: bool,
        /// Address the user-global config instead of the project
        #[arg(long)]
        global: bool,
    },
    /// List tracked dependencies and their active sources
    List {
        /// Also query the registry and dist branch for versions
        #[arg(short, long)]
        verbose: bool,
        /// List the user-global config instead of the project
        #[arg(long)]
        global: bool,
    },
    /// Fail when any tracked dependency still points at a local source
    Check {
        /// Write the git hook for the configured check policy
        #[arg(long)]
        install_hook: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let no_install = cli.no_install;

    match cli.command {
        Commands::Local { name } => cmd::switch::local(name.as_deref(), no_install).await,
        Commands::Github {
            args,
            branch,
            resolve,
        } => cmd::switch::github(&args, branch, resolve, no_install).await,
        Commands::Gitlab {
            args,
            branch,
            resolve,
        } => cmd::switch::gitlab(&args, branch, resolve, no_install).await,
        Commands::Npm { args } => cmd::switch::npm(&args, no_install).await,
        Commands::Init {
            name,
            source,
            activate,
            dev,
            global,
        } => cmd::init::init(&name, source, activate, dev, global, no_install).await,
        Commands::Set {
            name,
            source,
            check_on,
            global,
        } => cmd::init::set(name.as_deref(), source, check_on, global),
        Commands::Rm { name, purge, global } => cmd::init::rm(name.as_deref(), global, purge),
        Commands::List { verbose, global } => cmd::list::list(verbose, global).await,
        Commands::Check { install_hook } => cmd::check::check(install_hook),
    }
}
