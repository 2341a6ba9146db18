//! In-memory version control used by workflow tests.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone, Utc};

use crate::config::AppConfig;
use crate::context::AppContext;
use crate::domain::branch::{Experiment, ExperimentName};
use crate::domain::change::{BackupOutcome, CaptureOutcome, WorkingState};
use crate::domain::commit::{ChangedFiles, Commit};
use crate::error::{AppError, AppResult};
use crate::services::VersionControlService;

pub fn local_time(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Local> {
    Local
        .with_ymd_and_hms(year, month, day, hour, 0, 0)
        .earliest()
        .expect("valid local time")
}

#[derive(Default)]
pub struct FakeVersionControl {
    pub commits: Vec<Commit>,
    pub files: HashMap<String, ChangedFiles>,
    pub failing_diffs: HashSet<String>,
    pub fail_listing: bool,
    pub branches: Mutex<Vec<Experiment>>,
    pub main: String,
    pub remotes: Vec<String>,
    pub calls: Mutex<Vec<String>>,
    pub since_seen: Mutex<Option<DateTime<Utc>>>,
}

impl FakeVersionControl {
    pub fn new() -> Self {
        Self {
            main: "main".to_string(),
            branches: Mutex::new(vec![Experiment {
                name: "main".to_string(),
                current: true,
            }]),
            ..Default::default()
        }
    }

    pub fn with_commit(mut self, id: &str, message: &str, at: DateTime<Local>, paths: &[&str]) -> Self {
        self.commits.push(Commit {
            id: id.to_string(),
            message: message.to_string(),
            author: "Test Author".to_string(),
            timestamp: at.with_timezone(&Utc),
        });
        self.files.insert(
            id.to_string(),
            ChangedFiles::Paths(paths.iter().map(|p| p.to_string()).collect()),
        );
        self
    }

    pub fn with_root_commit(mut self, id: &str, message: &str, at: DateTime<Local>) -> Self {
        self = self.with_commit(id, message, at, &[]);
        self.files.insert(id.to_string(), ChangedFiles::NoParent);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("calls lock").push(call);
    }
}

#[async_trait]
impl VersionControlService for FakeVersionControl {
    async fn list_commits(&self, since: DateTime<Utc>) -> AppResult<Vec<Commit>> {
        *self.since_seen.lock().expect("since lock") = Some(since);
        if self.fail_listing {
            return Err(AppError::VersionControl("not a git repository".to_string()));
        }
        Ok(self
            .commits
            .iter()
            .filter(|commit| commit.timestamp >= since)
            .cloned()
            .collect())
    }

    async fn recent_commits(&self, limit: usize) -> AppResult<Vec<Commit>> {
        Ok(self.commits.iter().take(limit).cloned().collect())
    }

    async fn changed_files(&self, commit_id: &str) -> AppResult<ChangedFiles> {
        if self.failing_diffs.contains(commit_id) {
            return Err(AppError::VersionControl(format!(
                "bad object {commit_id}"
            )));
        }
        Ok(self
            .files
            .get(commit_id)
            .cloned()
            .unwrap_or(ChangedFiles::Paths(Vec::new())))
    }

    async fn working_state(&self) -> AppResult<WorkingState> {
        let branches = self.branches.lock().expect("branches lock");
        let branch = branches
            .iter()
            .find(|b| b.current)
            .map(|b| b.name.clone())
            .unwrap_or_else(|| self.main.clone());
        Ok(WorkingState {
            branch,
            changes: Vec::new(),
        })
    }

    async fn capture(&self, message: &str) -> AppResult<CaptureOutcome> {
        self.record(format!("capture {message}"));
        Ok(CaptureOutcome::Captured {
            id: "c0ffee0".to_string(),
            files_changed: 1,
        })
    }

    async fn main_branch(&self) -> AppResult<String> {
        Ok(self.main.clone())
    }

    async fn list_branches(&self) -> AppResult<Vec<Experiment>> {
        Ok(self.branches.lock().expect("branches lock").clone())
    }

    async fn start_branch(&self, name: &ExperimentName) -> AppResult<()> {
        self.record(format!("start {name}"));
        let mut branches = self.branches.lock().expect("branches lock");
        for branch in branches.iter_mut() {
            branch.current = false;
        }
        branches.push(Experiment {
            name: name.to_string(),
            current: true,
        });
        Ok(())
    }

    async fn merge_branch(&self, name: &str, into: &str, message: &str) -> AppResult<()> {
        self.record(format!("merge {name} into {into}: {message}"));
        Ok(())
    }

    async fn delete_branch(&self, name: &str, from: &str) -> AppResult<()> {
        self.record(format!("delete {name} from {from}"));
        let mut branches = self.branches.lock().expect("branches lock");
        branches.retain(|b| b.name != name);
        for branch in branches.iter_mut() {
            branch.current = branch.name == from;
        }
        Ok(())
    }

    async fn push(&self, remote: &str) -> AppResult<BackupOutcome> {
        if !self.remotes.iter().any(|r| r == remote) {
            return Ok(BackupOutcome::NoRemote {
                remote: remote.to_string(),
            });
        }
        self.record(format!("push {remote}"));
        Ok(BackupOutcome::Pushed {
            remote: remote.to_string(),
            branch: self.main.clone(),
        })
    }
}

pub fn context_with(vcs: Arc<FakeVersionControl>) -> AppContext {
    let config = AppConfig {
        main_branch: None,
        remote: "origin".to_string(),
        default_window: Default::default(),
        workspace_root: PathBuf::from("."),
    };
    AppContext::new(config, vcs)
}
