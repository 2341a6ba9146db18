use crate::context::AppContext;
use crate::domain::change::WorkingState;
use crate::domain::narration::plural;
use crate::error::AppResult;

pub async fn run(ctx: &AppContext) -> AppResult<()> {
    let state = ctx.version_control.working_state().await?;
    let main_branch = ctx.version_control.main_branch().await?;
    print!("{}", render_status(&state, &main_branch));
    Ok(())
}

fn render_status(state: &WorkingState, main_branch: &str) -> String {
    let mut out = if state.branch == main_branch {
        format!("On your main line '{}'.\n", state.branch)
    } else {
        format!("Working in experiment '{}'.\n", state.branch)
    };

    if state.is_clean() {
        out.push_str("Everything is captured.\n");
        return out;
    }

    out.push_str(&format!(
        "{} not captured yet:\n",
        plural(state.changes.len(), "change", "changes")
    ));
    for change in &state.changes {
        out.push_str(&format!("  {:<8} {}\n", change.describe(), change.path));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::change::PendingChange;

    #[test]
    fn clean_main_line() {
        let state = WorkingState {
            branch: "main".to_string(),
            changes: Vec::new(),
        };
        assert_eq!(
            render_status(&state, "main"),
            "On your main line 'main'.\nEverything is captured.\n"
        );
    }

    #[test]
    fn lists_pending_changes_in_experiment() {
        let state = WorkingState {
            branch: "dark-theme".to_string(),
            changes: vec![PendingChange {
                status: "??".to_string(),
                path: "theme.css".to_string(),
            }],
        };
        let rendered = render_status(&state, "main");
        assert!(rendered.starts_with("Working in experiment 'dark-theme'."));
        assert!(rendered.contains("1 change not captured yet:"));
        assert!(rendered.contains("  new      theme.css\n"));
    }
}
