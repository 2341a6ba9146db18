mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod services;
#[cfg(test)]
mod testing;
mod workflow;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cmd::capture::CaptureArgs;
use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::experiment::ExperimentArgs;
use crate::cmd::history::HistoryArgs;
use crate::cmd::story::StoryArgs;
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::infra::git::GitCli;

#[derive(Parser)]
#[command(
    name = "savepoint",
    author,
    version,
    about = "Friendly captures, experiments and backups on top of git"
)]
struct Cli {
    /// Work in this folder instead of the current one.
    #[arg(long, global = true, env = "SAVEPOINT_REPO")]
    repo: Option<PathBuf>,
    /// Show what savepoint asks git to do.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Save a snapshot of everything that changed.
    Capture(CaptureArgs),
    /// Start, list, keep or discard experiments.
    Experiment(ExperimentArgs),
    /// Copy your captures to the backup remote.
    Backup,
    /// Show the current experiment and what is not captured yet.
    Status,
    /// List recent captures.
    History(HistoryArgs),
    /// Tell the story of your recent work.
    #[command(alias = "narrate")]
    Story(StoryArgs),
    /// Manage CLI configuration.
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(error) = run(cli).await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> AppResult<()> {
    if let Commands::Config(args) = cli.command {
        return config_cmd::run(args.command);
    }

    let workspace = match cli.repo {
        Some(path) => path,
        None => std::env::current_dir()?,
    };
    let config = AppConfig::load(&workspace)?;
    debug!(repo = %config.workspace_root.display(), remote = %config.remote, "loaded configuration");

    let git = Arc::new(GitCli::new(
        config.workspace_root.clone(),
        config.main_branch.clone(),
    ));
    let context = AppContext::new(config, git);

    match cli.command {
        Commands::Capture(args) => cmd::capture::run(&context, args).await,
        Commands::Experiment(args) => cmd::experiment::run(&context, args.command).await,
        Commands::Backup => cmd::backup::run(&context).await,
        Commands::Status => cmd::status::run(&context).await,
        Commands::History(args) => cmd::history::run(&context, args).await,
        Commands::Story(args) => cmd::story::run(&context, args).await,
        Commands::Config(args) => config_cmd::run(args.command),
    }
}
