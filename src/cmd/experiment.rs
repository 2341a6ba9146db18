use clap::{Args, Subcommand};

use crate::context::AppContext;
use crate::error::AppResult;
use crate::workflow::experiment::{
    discard_experiment, keep_experiment, list_experiments, start_experiment,
};

#[derive(Args, Debug, Clone)]
pub struct ExperimentArgs {
    #[command(subcommand)]
    pub command: ExperimentCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ExperimentCommand {
    /// Start a new experiment and switch to it.
    Start { name: String },
    /// List experiments in progress.
    List,
    /// Fold an experiment back into the main line.
    Keep { name: String },
    /// Throw an experiment away.
    Discard { name: String },
}

pub async fn run(ctx: &AppContext, command: ExperimentCommand) -> AppResult<()> {
    match command {
        ExperimentCommand::Start { name } => {
            let outcome = start_experiment(ctx, &name).await?;
            println!(
                "Started experiment '{}'. Your main line '{}' is untouched.",
                outcome.name, outcome.main_branch
            );
        }
        ExperimentCommand::List => {
            let experiments = list_experiments(ctx).await?;
            if experiments.is_empty() {
                println!("No experiments in progress.");
            }
            for experiment in experiments {
                let marker = if experiment.current { "*" } else { " " };
                println!("{marker} {}", experiment.name);
            }
        }
        ExperimentCommand::Keep { name } => {
            let outcome = keep_experiment(ctx, &name).await?;
            println!(
                "Kept experiment '{}'; its work is now part of '{}'.",
                outcome.name, outcome.main_branch
            );
        }
        ExperimentCommand::Discard { name } => {
            let outcome = discard_experiment(ctx, &name).await?;
            println!(
                "Discarded experiment '{}'. Back on '{}'.",
                outcome.name, outcome.main_branch
            );
        }
    }
    Ok(())
}
