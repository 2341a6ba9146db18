use chrono::Local;
use clap::Args;

use crate::context::AppContext;
use crate::domain::change::CaptureOutcome;
use crate::domain::commit::Commit;
use crate::domain::narration::plural;
use crate::error::AppResult;
use crate::workflow::capture::capture_changes;

#[derive(Args, Debug, Clone)]
pub struct CaptureArgs {
    /// What this capture is about (defaults to a timestamp).
    pub message: Option<String>,
}

pub async fn run(ctx: &AppContext, args: CaptureArgs) -> AppResult<()> {
    let outcome = capture_changes(ctx, args.message, Local::now()).await?;
    println!("{}", describe(&outcome));
    Ok(())
}

fn describe(outcome: &CaptureOutcome) -> String {
    match outcome {
        CaptureOutcome::Captured { id, files_changed } => {
            let short = Commit::short_id_of(id);
            format!(
                "Captured {} as {short}.",
                plural(*files_changed, "file", "files")
            )
        }
        CaptureOutcome::NothingToCapture => {
            "Nothing to capture; everything is already saved.".to_string()
        }
    }
}
