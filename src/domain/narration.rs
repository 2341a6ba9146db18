use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use chrono::{Days, NaiveDate};
use serde::Serialize;

const DEFAULT_WINDOW_DAYS: u32 = 7;
const OS_METADATA_FILES: &[&str] = &[".DS_Store", "Thumbs.db", "desktop.ini"];

/// Lookback period for a narration, in whole calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NarrationWindow(NonZeroU32);

impl NarrationWindow {
    pub fn new(days: u32) -> Option<Self> {
        NonZeroU32::new(days).map(Self)
    }

    pub fn days(&self) -> u32 {
        self.0.get()
    }

    /// First calendar day included in the window ending `today`.
    pub fn start_date(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_sub_days(Days::new(u64::from(self.days())))
            .unwrap_or(NaiveDate::MIN)
    }
}

impl Default for NarrationWindow {
    fn default() -> Self {
        Self(NonZeroU32::new(DEFAULT_WINDOW_DAYS).unwrap_or(NonZeroU32::MIN))
    }
}

impl FromStr for NarrationWindow {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let days = value
            .trim()
            .parse::<u32>()
            .map_err(|_| format!("'{value}' is not a whole number of days"))?;
        Self::new(days).ok_or_else(|| "the number of days must be at least 1".to_string())
    }
}

impl fmt::Display for NarrationWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.days())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileActivity {
    pub display_name: String,
    pub full_path: String,
    pub changes: usize,
}

impl FileActivity {
    pub fn new(full_path: &str, changes: usize) -> Self {
        Self {
            display_name: display_name(full_path).to_string(),
            full_path: full_path.to_string(),
            changes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusiestDay {
    pub day: String,
    pub captures: usize,
}

/// Experiment activity is not derived from history yet; always zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExperimentCounts {
    pub started: usize,
    pub kept: usize,
    pub discarded: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrationStats {
    pub total_captures: usize,
    pub active_days: usize,
    pub top_files: Vec<FileActivity>,
    pub busiest_day: Option<BusiestDay>,
    pub experiments: ExperimentCounts,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Narration {
    pub success: bool,
    pub summary_text: String,
    pub stats: NarrationStats,
}

impl Narration {
    pub fn succeeded(summary_text: String, stats: NarrationStats) -> Self {
        Self {
            success: true,
            summary_text,
            stats,
        }
    }

    pub fn failed(summary_text: String) -> Self {
        Self {
            success: false,
            summary_text,
            stats: NarrationStats::default(),
        }
    }
}

/// Hidden paths and OS metadata files never count as "worked on".
pub fn is_rankable_path(path: &str) -> bool {
    if path.starts_with('.') {
        return false;
    }
    !OS_METADATA_FILES.contains(&display_name(path))
}

pub fn display_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

pub fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}
