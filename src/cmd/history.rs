use chrono::Local;
use clap::Args;

use crate::context::AppContext;
use crate::domain::commit::Commit;
use crate::domain::icon::icon_for;
use crate::error::AppResult;

#[derive(Args, Debug, Clone)]
pub struct HistoryArgs {
    /// How many captures to show.
    #[arg(short = 'n', long, default_value_t = 10)]
    pub limit: usize,
}

pub async fn run(ctx: &AppContext, args: HistoryArgs) -> AppResult<()> {
    let commits = ctx.version_control.recent_commits(args.limit).await?;
    if commits.is_empty() {
        println!("No captures yet.");
    }
    for commit in &commits {
        println!("{}", render_line(commit));
    }
    Ok(())
}

fn render_line(commit: &Commit) -> String {
    let when = commit.timestamp.with_timezone(&Local);
    format!(
        "{} {} {} {}",
        icon_for(&commit.message),
        commit.short_id(),
        when.format("%a %b %d %H:%M"),
        commit.subject()
    )
}
