use crate::context::AppContext;
use crate::domain::branch::{Experiment, ExperimentName};
use crate::error::{AppError, AppResult};

pub struct ExperimentOutcome {
    pub name: ExperimentName,
    pub main_branch: String,
}

pub async fn start_experiment(ctx: &AppContext, raw_name: &str) -> AppResult<ExperimentOutcome> {
    let name = ExperimentName::new(raw_name);
    let main_branch = ctx.version_control.main_branch().await?;
    if name.as_str() == main_branch {
        return Err(AppError::VersionControl(format!(
            "'{name}' is the main line, pick another experiment name"
        )));
    }
    ctx.version_control.start_branch(&name).await?;
    Ok(ExperimentOutcome { name, main_branch })
}

/// Every local branch except the main line.
pub async fn list_experiments(ctx: &AppContext) -> AppResult<Vec<Experiment>> {
    let main_branch = ctx.version_control.main_branch().await?;
    let branches = ctx.version_control.list_branches().await?;
    Ok(branches
        .into_iter()
        .filter(|branch| branch.name != main_branch)
        .collect())
}

pub async fn keep_experiment(ctx: &AppContext, raw_name: &str) -> AppResult<ExperimentOutcome> {
    let (name, main_branch) = resolve_existing(ctx, raw_name).await?;
    let message = format!("Keep experiment {name}");
    ctx.version_control
        .merge_branch(name.as_str(), &main_branch, &message)
        .await?;
    ctx.version_control
        .delete_branch(name.as_str(), &main_branch)
        .await?;
    Ok(ExperimentOutcome { name, main_branch })
}

pub async fn discard_experiment(ctx: &AppContext, raw_name: &str) -> AppResult<ExperimentOutcome> {
    let (name, main_branch) = resolve_existing(ctx, raw_name).await?;
    ctx.version_control
        .delete_branch(name.as_str(), &main_branch)
        .await?;
    Ok(ExperimentOutcome { name, main_branch })
}

async fn resolve_existing(ctx: &AppContext, raw_name: &str) -> AppResult<(ExperimentName, String)> {
    let name = ExperimentName::new(raw_name);
    let main_branch = ctx.version_control.main_branch().await?;
    if name.as_str() == main_branch {
        return Err(AppError::VersionControl(format!(
            "'{name}' is the main line, not an experiment"
        )));
    }

    let experiments = list_experiments(ctx).await?;
    if !experiments.iter().any(|experiment| experiment.name == name.as_str()) {
        return Err(AppError::VersionControl(format!(
            "no experiment named '{name}'"
        )));
    }
    Ok((name, main_branch))
}
