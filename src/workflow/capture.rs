use chrono::{DateTime, Local};

use crate::context::AppContext;
use crate::domain::change::CaptureOutcome;
use crate::error::AppResult;

pub async fn capture_changes(
    ctx: &AppContext,
    message: Option<String>,
    now: DateTime<Local>,
) -> AppResult<CaptureOutcome> {
    let message = message
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| default_message(now));

    ctx.version_control.capture(&message).await
}

fn default_message(now: DateTime<Local>) -> String {
    format!("Capture {}", now.format("%Y-%m-%d %H:%M"))
}
