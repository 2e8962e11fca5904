//! Summary table: one typed row per visible repository
//!
//! Rows are plain data. The HTML, text and TUI projections all read the same
//! `Row`, so the derivation rules below are the only place a cell's text is
//! decided.

use serde::Serialize;

use super::inspector::escape_html;
use crate::model::{RepoRecord, RepoState};
use crate::policy::{select_visible, DisplayMode};

/// Presentational class of a table cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CellStyle {
    Name,
    Branch,
    /// Detached HEAD descriptor such as `((abc1234))`
    Hash,
    RemoteState,
    StagedChanges,
    UnstagedChanges,
    UntrackedFiles,
    TimeSinceLastCommit,
}

impl CellStyle {
    /// CSS class used by the page stylesheet
    pub fn class_name(&self) -> &'static str {
        match self {
            CellStyle::Name => "repo-name",
            CellStyle::Branch => "repo-branch",
            CellStyle::Hash => "repo-hash",
            CellStyle::RemoteState => "repo-remote-state",
            CellStyle::StagedChanges => "repo-staged-changes",
            CellStyle::UnstagedChanges => "repo-unstaged-changes",
            CellStyle::UntrackedFiles => "repo-untracked-files",
            CellStyle::TimeSinceLastCommit => "repo-time-since-last-commit",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub style: CellStyle,
    pub text: String,
}

impl Cell {
    pub fn new(style: CellStyle, text: impl Into<String>) -> Self {
        Self {
            style,
            text: text.into(),
        }
    }
}

/// Column headers, in cell order
pub const HEADERS: [&str; 7] = [
    "REPO",
    "BRANCH",
    "REMOTE STATE",
    "STAGED",
    "UNSTAGED",
    "UNTRACKED",
    "TSLC",
];

/// Derived, display-ready fields of one repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub name: Cell,
    pub branch: Cell,
    pub remote_state: Cell,
    pub staged_changes: Cell,
    pub unstaged_changes: Cell,
    pub untracked_files: Cell,
    pub time_since_last_commit: Cell,

    /// Operator comment from the repo config; not a table column
    #[serde(skip_serializing_if = "String::is_empty")]
    pub comment: String,
}

impl Row {
    pub fn from_record(record: &RepoRecord) -> Self {
        let state = &record.state;
        Self {
            name: Cell::new(CellStyle::Name, record.config.name.as_str()),
            branch: branch_cell(state),
            remote_state: Cell::new(CellStyle::RemoteState, remote_state_text(state)),
            staged_changes: Cell::new(CellStyle::StagedChanges, staged_text(state)),
            unstaged_changes: Cell::new(CellStyle::UnstagedChanges, unstaged_text(state)),
            untracked_files: Cell::new(CellStyle::UntrackedFiles, untracked_text(state)),
            time_since_last_commit: Cell::new(CellStyle::TimeSinceLastCommit, age_text(state)),
            comment: record.config.comment.clone(),
        }
    }

    /// Cells in column order
    pub fn cells(&self) -> [&Cell; 7] {
        [
            &self.name,
            &self.branch,
            &self.remote_state,
            &self.staged_changes,
            &self.unstaged_changes,
            &self.untracked_files,
            &self.time_since_last_commit,
        ]
    }

    pub fn to_html(&self) -> String {
        let mut out = String::from("<tr>");
        for cell in self.cells() {
            out.push_str("<td class=\"");
            out.push_str(cell.style.class_name());
            out.push_str("\">");
            out.push_str(&escape_html(&cell.text));
            out.push_str("</td>");
        }
        out.push_str("</tr>");
        out
    }
}

fn branch_cell(state: &RepoState) -> Cell {
    let style = if state.is_detached() {
        CellStyle::Hash
    } else {
        CellStyle::Branch
    };
    Cell::new(style, state.current_branch.as_str())
}

fn remote_state_text(state: &RepoState) -> String {
    let remote = &state.remote_state;
    let mut text = String::new();
    if remote.ahead > 0 {
        text.push_str(&format!("+{}", remote.ahead));
    }
    if remote.behind > 0 {
        text.push_str(&format!("-{}", remote.behind));
    }
    text
}

fn staged_text(state: &RepoState) -> String {
    if !state.staged_changes {
        return String::new();
    }
    format!(
        "({}f, +{}, -{})",
        state.staged_files, state.staged_insertions, state.staged_deletions
    )
}

fn unstaged_text(state: &RepoState) -> String {
    if !state.dirty {
        return String::new();
    }
    format!("({}f, +{}, -{})", state.files, state.insertions, state.deletions)
}

fn untracked_text(state: &RepoState) -> String {
    if state.untracked_files == 0 && state.untracked_dirs == 0 {
        return String::new();
    }
    format!("{}d,{}f", state.untracked_dirs, state.untracked_files)
}

fn age_text(state: &RepoState) -> String {
    format!("{:.2} hours", state.hours_since_last_commit())
}

/// The rendered table body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableView {
    pub rows: Vec<Row>,
}

impl TableView {
    /// Build the table from scratch for `records` under `mode`
    pub fn build(records: &[RepoRecord], mode: DisplayMode) -> Self {
        let rows = select_visible(records, mode)
            .into_iter()
            .map(Row::from_record)
            .collect();
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `<tr>` elements for the table body, one per line
    pub fn to_html(&self) -> String {
        self.rows
            .iter()
            .map(Row::to_html)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
