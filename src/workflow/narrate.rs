use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use tracing::{debug, warn};

use crate::context::AppContext;
use crate::domain::commit::{ChangedFiles, Commit};
use crate::domain::narration::{
    BusiestDay, FileActivity, Narration, NarrationStats, NarrationWindow, is_rankable_path,
    plural,
};
use crate::error::AppResult;
use crate::services::VersionControlService;

const TOP_FILE_LIMIT: usize = 5;
const MILESTONE_LIMIT: usize = 2;
const MILESTONE_KEYWORDS: &[&str] = &["finish", "complete", "done"];
const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

pub async fn narrate_activity(ctx: &AppContext, window: NarrationWindow) -> Narration {
    narrate(&*ctx.version_control, window, Local::now()).await
}

/// Summarizes the captures made in the `window` days before `now`.
///
/// An idle window is a successful narration. Any collaborator error other
/// than a root commit having no parent turns the whole result into a failure
/// with zeroed stats.
pub async fn narrate(
    vcs: &dyn VersionControlService,
    window: NarrationWindow,
    now: DateTime<Local>,
) -> Narration {
    match collect(vcs, window, now).await {
        Ok(narration) => narration,
        Err(err) => {
            warn!(error = %err, days = window.days(), "narration failed");
            Narration::failed(format!("Couldn't read your history: {err}"))
        }
    }
}

async fn collect(
    vcs: &dyn VersionControlService,
    window: NarrationWindow,
    now: DateTime<Local>,
) -> AppResult<Narration> {
    let since = start_of_day(window.start_date(now.date_naive()));
    debug!(since = %since, days = window.days(), "collecting captures");

    let mut commits = vcs.list_commits(since.with_timezone(&Utc)).await?;
    if commits.is_empty() {
        return Ok(Narration::succeeded(
            idle_summary(window),
            NarrationStats::default(),
        ));
    }
    // Newest first, then by id, whatever order the collaborator used.
    commits.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| a.id.cmp(&b.id)));

    let mut per_weekday = [0usize; 7];
    let mut dates: HashSet<NaiveDate> = HashSet::new();
    let mut files = FileTally::default();

    for commit in &commits {
        let local = commit.timestamp.with_timezone(&Local);
        per_weekday[local.weekday().num_days_from_monday() as usize] += 1;
        dates.insert(local.date_naive());

        match vcs.changed_files(&commit.id).await? {
            ChangedFiles::Paths(paths) => files.record(paths),
            ChangedFiles::NoParent => {
                debug!(commit = %commit.short_id(), "root commit has no parent to diff");
            }
        }
    }

    let stats = NarrationStats {
        total_captures: commits.len(),
        active_days: dates.len(),
        top_files: files.top(TOP_FILE_LIMIT),
        busiest_day: busiest_day(&per_weekday),
        experiments: Default::default(),
    };
    let milestones = milestones(&commits);
    let summary = compose_summary(window, &stats, &milestones);

    Ok(Narration::succeeded(summary, stats))
}

fn start_of_day(date: NaiveDate) -> DateTime<Local> {
    let midnight = date.and_time(NaiveTime::MIN);
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .unwrap_or_else(|| Local.from_utc_datetime(&midnight))
}

/// Change counts per path, remembering first-seen order for ties.
#[derive(Default)]
struct FileTally {
    order: Vec<String>,
    counts: HashMap<String, usize>,
}

impl FileTally {
    fn record(&mut self, paths: Vec<String>) {
        for path in paths {
            let count = self.counts.entry(path.clone()).or_insert(0);
            if *count == 0 {
                self.order.push(path);
            }
            *count += 1;
        }
    }

    fn top(&self, limit: usize) -> Vec<FileActivity> {
        let mut ranked: Vec<(&str, usize)> = self
            .order
            .iter()
            .filter(|path| is_rankable_path(path))
            .map(|path| (path.as_str(), self.counts.get(path).copied().unwrap_or(0)))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
            .into_iter()
            .take(limit)
            .map(|(path, changes)| FileActivity::new(path, changes))
            .collect()
    }
}

/// Ties go to the earliest weekday, Monday first.
fn busiest_day(per_weekday: &[usize; 7]) -> Option<BusiestDay> {
    let mut best: Option<(Weekday, usize)> = None;
    for (day, &count) in WEEK.iter().zip(per_weekday) {
        if count > best.map_or(0, |(_, top)| top) {
            best = Some((*day, count));
        }
    }
    best.map(|(day, captures)| BusiestDay {
        day: weekday_name(day).to_string(),
        captures,
    })
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn milestones(commits: &[Commit]) -> Vec<String> {
    commits
        .iter()
        .filter(|commit| {
            let subject = commit.subject().to_lowercase();
            MILESTONE_KEYWORDS.iter().any(|keyword| subject.contains(keyword))
        })
        .take(MILESTONE_LIMIT)
        .map(|commit| commit.subject().to_string())
        .collect()
}

fn idle_summary(window: NarrationWindow) -> String {
    format!(
        "No captures in the last {} yet. Your next capture starts the story.",
        plural(window.days() as usize, "day", "days")
    )
}

fn compose_summary(window: NarrationWindow, stats: &NarrationStats, milestones: &[String]) -> String {
    let mut sentences = vec![format!(
        "You made {} in the last {}.",
        plural(stats.total_captures, "capture", "captures"),
        plural(window.days() as usize, "day", "days")
    )];

    if let Some(busiest) = stats.busiest_day.as_ref().filter(|b| b.captures > 1) {
        sentences.push(format!(
            "{} was your busiest day with {} captures.",
            busiest.day, busiest.captures
        ));
    }

    if let Some(top) = stats.top_files.first() {
        sentences.push(format!(
            "You worked most on {}, changed {}.",
            top.display_name,
            plural(top.changes, "time", "times")
        ));
    }

    // active_days < days / 2, kept exact without floats.
    if (stats.active_days as u64) * 2 < u64::from(window.days()) {
        sentences.push(format!(
            "You captured on {}; a little progress each day adds up.",
            plural(stats.active_days, "day", "days")
        ));
    }

    match milestones {
        [] => {}
        [only] => sentences.push(format!("Milestone: \"{only}\".")),
        [first, second, ..] => {
            sentences.push(format!("Milestones: \"{first}\" and \"{second}\"."))
        }
    }

    sentences.join(" ")
}
