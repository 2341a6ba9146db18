use chrono::{DateTime, Utc};
use serde::Serialize;

/// A capture as reported by the version-control engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Commit {
    pub id: String,
    pub message: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
}

impl Commit {
    pub fn short_id(&self) -> &str {
        Self::short_id_of(&self.id)
    }

    pub fn short_id_of(id: &str) -> &str {
        id.get(..7).unwrap_or(id)
    }

    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or("").trim()
    }
}

/// Files touched by a commit relative to its first parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangedFiles {
    Paths(Vec<String>),
    /// Root commit; there is nothing to diff against.
    NoParent,
}
