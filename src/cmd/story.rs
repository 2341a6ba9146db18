use std::fmt::Write as _;

use clap::Args;

use crate::context::AppContext;
use crate::domain::narration::{Narration, NarrationWindow, plural};
use crate::error::{AppError, AppResult};
use crate::workflow::narrate::narrate_activity;

#[derive(Args, Debug, Clone)]
pub struct StoryArgs {
    /// How many days back to look (defaults to the configured window, 7).
    pub days: Option<NarrationWindow>,
    /// Print the narration as JSON instead of prose.
    #[arg(long)]
    pub json: bool,
}

pub async fn run(ctx: &AppContext, args: StoryArgs) -> AppResult<()> {
    let window = args.days.unwrap_or(ctx.config.default_window);
    let narration = narrate_activity(ctx, window).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&narration)?);
    } else if narration.success {
        print!("{}", render_story(&narration));
    }

    into_result(narration)
}

fn into_result(narration: Narration) -> AppResult<()> {
    if narration.success {
        Ok(())
    } else {
        Err(AppError::Narration(narration.summary_text))
    }
}

pub fn render_story(narration: &Narration) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", narration.summary_text);

    if !narration.stats.top_files.is_empty() {
        let _ = writeln!(out, "\nMost Active Files");
        for (rank, file) in narration.stats.top_files.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {}. {} ({}) - {}",
                rank + 1,
                file.display_name,
                plural(file.changes, "change", "changes"),
                file.full_path
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::narration::{FileActivity, NarrationStats};

    #[test]
    fn renders_summary_and_ranked_files() {
        let narration = Narration::succeeded(
            "You made 4 captures in the last 7 days.".to_string(),
            NarrationStats {
                total_captures: 4,
                active_days: 2,
                top_files: vec![
                    FileActivity::new("chapters/three.md", 3),
                    FileActivity::new("notes.md", 1),
                ],
                ..Default::default()
            },
        );

        assert_eq!(
            render_story(&narration),
            "You made 4 captures in the last 7 days.\n\
             \n\
             Most Active Files\n  \
             1. three.md (3 changes) - chapters/three.md\n  \
             2. notes.md (1 change) - notes.md\n"
        );
    }

    #[test]
    fn idle_story_has_no_file_list() {
        let narration = Narration::succeeded(
            "No captures in the last 7 days yet.".to_string(),
            NarrationStats::default(),
        );
        assert!(!render_story(&narration).contains("Most Active Files"));
    }

    #[test]
    fn failure_is_reported_with_its_own_wording() {
        let message = "Couldn't read your history: version control error: git log failed";
        let err = into_result(Narration::failed(message.to_string())).unwrap_err();
        assert_eq!(format!("Error: {err}"), format!("Error: {message}"));

        let ok = Narration::succeeded("No captures yet.".to_string(), NarrationStats::default());
        assert!(into_result(ok).is_ok());
    }
}
