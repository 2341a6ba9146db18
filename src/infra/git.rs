use std::path::PathBuf;
use std::process::Output;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::domain::branch::{Experiment, ExperimentName};
use crate::domain::change::{BackupOutcome, CaptureOutcome, PendingChange, WorkingState};
use crate::domain::commit::{ChangedFiles, Commit};
use crate::error::{AppError, AppResult};
use crate::services::VersionControlService;

const FIELD_SEP: char = '\u{1f}';
const RECORD_SEP: char = '\u{1e}';
const LOG_FORMAT: &str = "--format=%H%x1f%an%x1f%at%x1f%B%x1e";

/// Drives the `git` binary inside one working tree.
pub struct GitCli {
    workspace_root: PathBuf,
    main_branch: Option<String>,
}

impl GitCli {
    pub fn new(workspace_root: PathBuf, main_branch: Option<String>) -> Self {
        Self {
            workspace_root,
            main_branch,
        }
    }

    async fn output(&self, args: &[&str]) -> AppResult<Output> {
        debug!(repo = %self.workspace_root.display(), ?args, "running git");
        Command::new("git")
            .arg("-C")
            .arg(&self.workspace_root)
            .args(args)
            .output()
            .await
            .map_err(|err| AppError::VersionControl(format!("failed to run git: {err}")))
    }

    async fn run(&self, args: &[&str]) -> AppResult<String> {
        let output = self.output(args).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::VersionControl(format!(
                "git {} failed: {}",
                args.first().copied().unwrap_or_default(),
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn succeeds(&self, args: &[&str]) -> AppResult<bool> {
        Ok(self.output(args).await?.status.success())
    }

    async fn has_head(&self) -> AppResult<bool> {
        self.succeeds(&["rev-parse", "--verify", "--quiet", "HEAD"]).await
    }

    async fn current_branch(&self) -> AppResult<String> {
        let name = self.run(&["branch", "--show-current"]).await?;
        let name = name.trim();
        if name.is_empty() {
            Ok("HEAD".to_string())
        } else {
            Ok(name.to_string())
        }
    }

    async fn branch_exists(&self, name: &str) -> AppResult<bool> {
        let reference = format!("refs/heads/{name}");
        self.succeeds(&["rev-parse", "--verify", "--quiet", &reference]).await
    }

    async fn log(&self, extra: &[&str]) -> AppResult<Vec<Commit>> {
        self.run(&["rev-parse", "--git-dir"]).await?;
        // Fresh repository without any capture yet.
        if !self.has_head().await? {
            return Ok(Vec::new());
        }
        let mut args = vec!["log", LOG_FORMAT];
        args.extend_from_slice(extra);
        let raw = self.run(&args).await?;
        parse_log(&raw)
    }
}

#[async_trait]
impl VersionControlService for GitCli {
    async fn list_commits(&self, since: DateTime<Utc>) -> AppResult<Vec<Commit>> {
        let since_arg = format!("--since=@{} +0000", since.timestamp());
        let commits = self.log(&[&since_arg]).await?;
        Ok(commits
            .into_iter()
            .filter(|commit| commit.timestamp >= since)
            .collect())
    }

    async fn recent_commits(&self, limit: usize) -> AppResult<Vec<Commit>> {
        let limit_arg = format!("--max-count={limit}");
        self.log(&[&limit_arg]).await
    }

    async fn changed_files(&self, commit_id: &str) -> AppResult<ChangedFiles> {
        let parents = self
            .run(&["rev-list", "--parents", "--max-count=1", commit_id])
            .await?;
        let Some(parent) = parents.split_whitespace().nth(1) else {
            return Ok(ChangedFiles::NoParent);
        };

        let raw = self
            .run(&["diff", "--name-only", "-z", parent, commit_id])
            .await?;
        Ok(ChangedFiles::Paths(
            raw.split('\0')
                .filter(|path| !path.is_empty())
                .map(str::to_string)
                .collect(),
        ))
    }

    async fn working_state(&self) -> AppResult<WorkingState> {
        let branch = self.current_branch().await?;
        let raw = self.run(&["status", "--porcelain", "-z"]).await?;
        Ok(WorkingState {
            branch,
            changes: parse_porcelain(&raw),
        })
    }

    async fn capture(&self, message: &str) -> AppResult<CaptureOutcome> {
        self.run(&["add", "--all"]).await?;
        let staged = self.run(&["status", "--porcelain", "-z"]).await?;
        let files_changed = parse_porcelain(&staged).len();
        if files_changed == 0 {
            return Ok(CaptureOutcome::NothingToCapture);
        }

        self.run(&["commit", "--quiet", "--message", message]).await?;
        let id = self.run(&["rev-parse", "HEAD"]).await?.trim().to_string();
        info!(%id, files_changed, "captured changes");
        Ok(CaptureOutcome::Captured { id, files_changed })
    }

    async fn main_branch(&self) -> AppResult<String> {
        if let Some(configured) = &self.main_branch {
            return Ok(configured.clone());
        }
        for candidate in ["main", "master"] {
            if self.branch_exists(candidate).await? {
                return Ok(candidate.to_string());
            }
        }
        self.current_branch().await
    }

    async fn list_branches(&self) -> AppResult<Vec<Experiment>> {
        let raw = self
            .run(&["for-each-ref", "--format=%(HEAD)%(refname:short)", "refs/heads"])
            .await?;
        Ok(parse_branches(&raw))
    }

    async fn start_branch(&self, name: &ExperimentName) -> AppResult<()> {
        if self.branch_exists(name.as_str()).await? {
            return Err(AppError::VersionControl(format!(
                "an experiment named '{name}' already exists"
            )));
        }
        self.run(&["switch", "--create", name.as_str()]).await?;
        info!(branch = %name, "started experiment");
        Ok(())
    }

    async fn merge_branch(&self, name: &str, into: &str, message: &str) -> AppResult<()> {
        self.run(&["switch", into]).await?;
        if let Err(err) = self
            .run(&["merge", "--no-ff", "--message", message, name])
            .await
        {
            if let Err(abort_err) = self.run(&["merge", "--abort"]).await {
                warn!(error = %abort_err, "could not abort failed merge");
            }
            return Err(err);
        }
        info!(branch = %name, into = %into, "merged experiment");
        Ok(())
    }

    async fn delete_branch(&self, name: &str, from: &str) -> AppResult<()> {
        self.run(&["switch", from]).await?;
        self.run(&["branch", "-D", name]).await?;
        info!(branch = %name, "deleted experiment");
        Ok(())
    }

    async fn push(&self, remote: &str) -> AppResult<BackupOutcome> {
        let remotes = self.run(&["remote"]).await?;
        if !remotes.lines().any(|line| line.trim() == remote) {
            return Ok(BackupOutcome::NoRemote {
                remote: remote.to_string(),
            });
        }

        let branch = self.current_branch().await?;
        self.run(&["push", "--set-upstream", remote, &branch]).await?;
        info!(%remote, %branch, "pushed backup");
        Ok(BackupOutcome::Pushed {
            remote: remote.to_string(),
            branch,
        })
    }
}

fn parse_log(raw: &str) -> AppResult<Vec<Commit>> {
    raw.split(RECORD_SEP)
        .map(|record| record.trim_start_matches('\n'))
        .filter(|record| !record.trim().is_empty())
        .map(parse_record)
        .collect()
}

fn parse_record(record: &str) -> AppResult<Commit> {
    let mut fields = record.splitn(4, FIELD_SEP);
    let (Some(id), Some(author), Some(seconds), Some(message)) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(AppError::VersionControl(format!(
            "unexpected git log record: {record:?}"
        )));
    };

    let seconds = seconds.trim().parse::<i64>().map_err(|err| {
        AppError::VersionControl(format!("invalid commit time '{seconds}': {err}"))
    })?;
    let timestamp = DateTime::from_timestamp(seconds, 0).ok_or_else(|| {
        AppError::VersionControl(format!("commit time out of range: {seconds}"))
    })?;

    Ok(Commit {
        id: id.trim().to_string(),
        message: message.trim_end().to_string(),
        author: author.to_string(),
        timestamp,
    })
}

/// Parses `status --porcelain -z`. Paths arrive verbatim, and renames and
/// copies carry their original path as an extra entry after the new one.
fn parse_porcelain(raw: &str) -> Vec<PendingChange> {
    let mut entries = raw.split('\0');
    let mut changes = Vec::new();
    while let Some(entry) = entries.next() {
        let (Some(status), Some(path)) = (entry.get(..2), entry.get(3..)) else {
            continue;
        };
        if path.is_empty() {
            continue;
        }
        if status.contains(['R', 'C']) {
            entries.next();
        }
        changes.push(PendingChange {
            status: status.to_string(),
            path: path.to_string(),
        });
    }
    changes
}

fn parse_branches(raw: &str) -> Vec<Experiment> {
    raw.lines()
        .filter_map(|line| {
            let (head, name) = line.split_at_checked(1)?;
            let name = name.trim();
            (!name.is_empty()).then(|| Experiment {
                name: name.to_string(),
                current: head == "*",
            })
        })
        .collect()
}
