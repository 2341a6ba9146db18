use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::branch::{Experiment, ExperimentName};
use crate::domain::change::{BackupOutcome, CaptureOutcome, WorkingState};
use crate::domain::commit::{ChangedFiles, Commit};
use crate::error::AppResult;

#[async_trait]
pub trait VersionControlService: Send + Sync {
    /// Commits reachable from HEAD with a timestamp at or after `since`.
    async fn list_commits(&self, since: DateTime<Utc>) -> AppResult<Vec<Commit>>;
    async fn recent_commits(&self, limit: usize) -> AppResult<Vec<Commit>>;
    async fn changed_files(&self, commit_id: &str) -> AppResult<ChangedFiles>;
    async fn working_state(&self) -> AppResult<WorkingState>;
    async fn capture(&self, message: &str) -> AppResult<CaptureOutcome>;
    async fn main_branch(&self) -> AppResult<String>;
    async fn list_branches(&self) -> AppResult<Vec<Experiment>>;
    async fn start_branch(&self, name: &ExperimentName) -> AppResult<()>;
    async fn merge_branch(&self, name: &str, into: &str, message: &str) -> AppResult<()>;
    async fn delete_branch(&self, name: &str, from: &str) -> AppResult<()>;
    async fn push(&self, remote: &str) -> AppResult<BackupOutcome>;
}
