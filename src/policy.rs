//! Visibility and ordering policy
//!
//! Decides which records of a snapshot reach the table, and in which order.
//! Everything here is pure: the display-mode flags come in as a value.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::model::RepoRecord;

/// Display-mode flags for one render pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DisplayMode {
    /// Bypass the inclusion predicate entirely
    #[serde(default)]
    pub show_all: bool,

    /// Show drift-only repositories even when they are administratively ignored
    #[serde(default)]
    pub show_ignored: bool,
}

impl DisplayMode {
    pub fn new(show_all: bool, show_ignored: bool) -> Self {
        Self {
            show_all,
            show_ignored,
        }
    }

    pub fn includes(&self, record: &RepoRecord) -> bool {
        self.show_all || should_show(record, self.show_ignored)
    }
}

/// Inclusion predicate of the default (filtered) mode
///
/// Local changes always show. Remote drift shows unless the repo is ignored
/// and ignored repos were not requested. Anything else is hidden.
pub fn should_show(record: &RepoRecord, show_ignored: bool) -> bool {
    if record.state.has_local_changes() {
        return true;
    }

    if record.state.remote_state.has_drift() {
        return !record.config.ignore || show_ignored;
    }

    false
}

/// Case-insensitive order on `Config.Name`
pub fn compare_by_name(a: &RepoRecord, b: &RepoRecord) -> Ordering {
    a.name().to_uppercase().cmp(&b.name().to_uppercase())
}

/// Sort records by name; ties keep their arrival order
pub fn sort_by_name(records: &mut [RepoRecord]) {
    records.sort_by_cached_key(|r| r.name().to_uppercase());
}

/// Records selected by `mode`, ordered by name
pub fn select_visible<'a>(records: &'a [RepoRecord], mode: DisplayMode) -> Vec<&'a RepoRecord> {
    let mut visible: Vec<&RepoRecord> = records.iter().filter(|r| mode.includes(r)).collect();
    // Vec::sort_by is stable
    visible.sort_by(|a, b| compare_by_name(a, b));
    visible
}
