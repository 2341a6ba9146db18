use crate::context::AppContext;
use crate::domain::change::BackupOutcome;
use crate::error::AppResult;

pub async fn backup(ctx: &AppContext) -> AppResult<BackupOutcome> {
    ctx.version_control.push(&ctx.config.remote).await
}
