//! Wire model for the repos-server status payload
//!
//! The backend serializes its records with Go's default field naming, so every
//! struct here uses `PascalCase` on the wire. Fields are defaulted when absent:
//! older backends omit `CurrentBranch`, and none of them emit `UnstagedChanges`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Number of `TimeSinceLastCommit` units (nanoseconds) in one hour
pub const NANOS_PER_HOUR: i64 = 3_600_000_000_000;

/// Prefix the backend uses for a detached HEAD, e.g. `((abc1234))`
pub const DETACHED_HEAD_PREFIX: &str = "((";

/// Identity and administrative metadata for one repository
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RepoConfig {
    /// Unique name within a snapshot
    pub name: String,

    /// Hide from the default view even when the repo has remote drift
    pub ignore: bool,

    pub path: String,
    pub short_name: String,
    pub fetch: bool,
    pub comment: String,
    pub remote: String,
}

/// Position of the current branch relative to its upstream
///
/// The backend reports `-1/-1` when the remote could not be fetched; such
/// values never count as drift.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RemoteState {
    pub ahead: i64,
    pub behind: i64,
}

impl RemoteState {
    pub fn has_drift(&self) -> bool {
        self.ahead > 0 || self.behind > 0
    }

    /// Whether the backend failed to determine the remote position
    pub fn is_unknown(&self) -> bool {
        self.ahead < 0 || self.behind < 0
    }
}

/// Working-tree and history status of one repository at snapshot time
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RepoState {
    pub dirty: bool,
    pub unstaged_changes: bool,
    pub files: u64,
    pub insertions: u64,
    pub deletions: u64,

    pub staged_changes: bool,
    pub staged_files: u64,
    pub staged_insertions: u64,
    pub staged_deletions: u64,

    pub untracked_files: u64,
    pub untracked_dirs: u64,

    pub current_branch: String,
    pub remote_state: RemoteState,

    /// Nanoseconds since the last commit
    pub time_since_last_commit: i64,
}

impl RepoState {
    /// Unstaged modifications or untracked entries in the working tree
    pub fn has_local_changes(&self) -> bool {
        self.dirty || self.unstaged_changes || self.untracked_files != 0 || self.untracked_dirs != 0
    }

    pub fn is_detached(&self) -> bool {
        self.current_branch.starts_with(DETACHED_HEAD_PREFIX)
    }

    pub fn hours_since_last_commit(&self) -> f64 {
        self.time_since_last_commit as f64 / NANOS_PER_HOUR as f64
    }
}

/// One element of the status payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RepoRecord {
    #[serde(default)]
    pub config: RepoConfig,
    #[serde(default)]
    pub state: RepoState,
}

impl RepoRecord {
    pub fn name(&self) -> &str {
        &self.config.name
    }
}

/// One full response of the status endpoint
///
/// `raw` is the document exactly as received, so the inspector can show
/// fields this client does not model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub records: Vec<RepoRecord>,
    pub raw: Value,
}

impl Snapshot {
    /// Parse a response body
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        let raw: Value = serde_json::from_str(body)?;
        let records = Vec::<RepoRecord>::deserialize(&raw)?;
        Ok(Self { records, raw })
    }

    /// Build a snapshot from already-typed records
    pub fn from_records(records: Vec<RepoRecord>) -> Self {
        let raw = serde_json::to_value(&records).unwrap_or_default();
        Self { records, raw }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
