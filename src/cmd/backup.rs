use crate::context::AppContext;
use crate::domain::change::BackupOutcome;
use crate::error::AppResult;
use crate::workflow::backup::backup;

pub async fn run(ctx: &AppContext) -> AppResult<()> {
    match backup(ctx).await? {
        BackupOutcome::Pushed { remote, branch } => {
            println!("Backed up '{branch}' to '{remote}'.");
        }
        BackupOutcome::NoRemote { remote } => {
            println!(
                "No backup location named '{remote}' yet. Add one with `git remote add {remote} <url>`."
            );
        }
    }
    Ok(())
}
