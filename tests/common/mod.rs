//! Common test utilities and helpers for repos-viewer tests
#![allow(dead_code)]

use serde_json::{json, Value};
use std::path::PathBuf;
use tempfile::TempDir;

pub const DATA_PATH: &str = "/repos-server/repos-data";

/// Temporary config directory for one test
pub struct TestEnvironment {
    pub temp_dir: TempDir,
    pub config_dir: PathBuf,
}

impl TestEnvironment {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_dir = temp_dir.path().join("repos-viewer");
        std::fs::create_dir_all(&config_dir).expect("Failed to create config dir");

        Self {
            temp_dir,
            config_dir,
        }
    }

    pub fn create_test_config(&self, content: &str) -> PathBuf {
        let config_path = self.config_dir.join("config.yml");
        std::fs::write(&config_path, content).expect("Failed to write test config");
        config_path
    }

    /// Config pointing at `server_url` with auto-refresh off
    pub fn create_config_for(&self, server_url: &str) -> PathBuf {
        let config_content = format!(
            r#"
server:
  url: "{}"
  timeout: 5
refresh:
  interval: "off"
"#,
            server_url
        );
        self.create_test_config(&config_content)
    }
}

/// Builder for one element of the status document
#[derive(Debug, Clone)]
pub struct MockRecord {
    config: Value,
    state: Value,
}

impl MockRecord {
    pub fn new(name: &str) -> Self {
        Self {
            config: json!({ "Name": name, "Ignore": false }),
            state: json!({
                "CurrentBranch": "main",
                "RemoteState": { "Ahead": 0, "Behind": 0 },
                "TimeSinceLastCommit": 0
            }),
        }
    }

    pub fn ignored(mut self) -> Self {
        self.config["Ignore"] = json!(true);
        self
    }

    pub fn dirty(mut self, files: u64, insertions: u64, deletions: u64) -> Self {
        self.state["Dirty"] = json!(true);
        self.state["Files"] = json!(files);
        self.state["Insertions"] = json!(insertions);
        self.state["Deletions"] = json!(deletions);
        self
    }

    pub fn untracked(mut self, dirs: u64, files: u64) -> Self {
        self.state["UntrackedDirs"] = json!(dirs);
        self.state["UntrackedFiles"] = json!(files);
        self
    }

    pub fn remote(mut self, ahead: i64, behind: i64) -> Self {
        self.state["RemoteState"] = json!({ "Ahead": ahead, "Behind": behind });
        self
    }

    pub fn branch(mut self, branch: &str) -> Self {
        self.state["CurrentBranch"] = json!(branch);
        self
    }

    pub fn hours_since_commit(mut self, hours: i64) -> Self {
        self.state["TimeSinceLastCommit"] = json!(hours * 3_600_000_000_000);
        self
    }

    pub fn to_value(&self) -> Value {
        json!({ "Config": self.config, "State": self.state })
    }
}

/// Test data sets for common scenarios
pub struct TestDataSets;

impl TestDataSets {
    /// Mixed fleet: two need attention by default, one only with show_ignored
    pub fn fleet() -> Vec<MockRecord> {
        vec![
            MockRecord::new("web").ignored().remote(1, 0),
            MockRecord::new("zeta").dirty(1, 2, 3),
            MockRecord::new("Alpha").remote(2, 0).hours_since_commit(2),
            MockRecord::new("docs"),
        ]
    }

    pub fn payload(records: &[MockRecord]) -> Value {
        Value::Array(records.iter().map(MockRecord::to_value).collect())
    }

    pub fn fleet_payload() -> Value {
        Self::payload(&Self::fleet())
    }
}

/// Assertion helpers for test validation
pub fn assert_contains_all(text: &str, expected: &[&str]) {
    for item in expected {
        assert!(
            text.contains(item),
            "Expected text to contain '{}', but it didn't. Text: {}",
            item,
            text
        );
    }
}

pub fn assert_contains_none(text: &str, unexpected: &[&str]) {
    for item in unexpected {
        assert!(
            !text.contains(item),
            "Expected text not to contain '{}'. Text: {}",
            item,
            text
        );
    }
}
