/// One uncaptured change from `git status --porcelain`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingChange {
    pub status: String,
    pub path: String,
}

impl PendingChange {
    pub fn describe(&self) -> &'static str {
        match self.status.trim() {
            "??" | "A" | "AM" => "new",
            "D" | "AD" => "deleted",
            s if s.starts_with('R') => "renamed",
            _ => "changed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingState {
    pub branch: String,
    pub changes: Vec<PendingChange>,
}

impl WorkingState {
    pub fn is_clean(&self) -> bool {
        self.changes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    Captured { id: String, files_changed: usize },
    NothingToCapture,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupOutcome {
    Pushed { remote: String, branch: String },
    NoRemote { remote: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(status: &str) -> PendingChange {
        PendingChange {
            status: status.to_string(),
            path: "notes.md".to_string(),
        }
    }

    #[test]
    fn describes_porcelain_status() {
        assert_eq!(change("??").describe(), "new");
        assert_eq!(change(" M").describe(), "changed");
        assert_eq!(change(" D").describe(), "deleted");
        assert_eq!(change("R ").describe(), "renamed");
    }

    #[test]
    fn clean_when_no_changes() {
        let state = WorkingState {
            branch: "main".to_string(),
            changes: Vec::new(),
        };
        assert!(state.is_clean());
    }
}
