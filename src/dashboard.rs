//! Dashboard state: the last good snapshot and its rendered view
//!
//! A refresh either replaces both wholesale or changes nothing. Toggling the
//! display mode re-renders from the held snapshot without a fetch.

use std::sync::Arc;
use tracing::{info, warn};

use crate::fetch::{FetchError, SnapshotSource};
use crate::model::Snapshot;
use crate::policy::DisplayMode;
use crate::render::{render_snapshot, RenderedView};

pub struct Dashboard {
    source: Arc<dyn SnapshotSource>,
    snapshot: Option<Snapshot>,
    view: Option<RenderedView>,
}

impl Dashboard {
    pub fn new(source: Arc<dyn SnapshotSource>) -> Self {
        Self {
            source,
            snapshot: None,
            view: None,
        }
    }

    pub fn source(&self) -> Arc<dyn SnapshotSource> {
        Arc::clone(&self.source)
    }

    /// Fetch once and apply the outcome
    pub async fn refresh(&mut self, mode: DisplayMode) -> Result<&RenderedView, FetchError> {
        let result = self.source.fetch().await;
        self.apply(result, mode)
    }

    /// Apply the outcome of a fetch that ran elsewhere.
    /// On error the previous snapshot and view stay as they were.
    pub fn apply(
        &mut self,
        result: Result<Snapshot, FetchError>,
        mode: DisplayMode,
    ) -> Result<&RenderedView, FetchError> {
        match result {
            Ok(snapshot) => {
                info!("Rendering {} repositories", snapshot.len());
                let view = render_snapshot(&snapshot, mode);
                self.snapshot = Some(snapshot);
                Ok(&*self.view.insert(view))
            }
            Err(e) => {
                warn!("Refresh from {} failed, keeping previous view: {}", self.source.describe(), e);
                Err(e)
            }
        }
    }

    /// Re-render the held snapshot under a new mode
    pub fn rerender(&mut self, mode: DisplayMode) -> Option<&RenderedView> {
        let snapshot = self.snapshot.as_ref()?;
        self.view = Some(render_snapshot(snapshot, mode));
        self.view.as_ref()
    }

    pub fn view(&self) -> Option<&RenderedView> {
        self.view.as_ref()
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use assert_matches::assert_matches;
    use reqwest::StatusCode;
    use std::sync::Mutex;

    /// Hands out queued results in order
    struct ScriptedSource {
        results: Mutex<Vec<Result<Snapshot, FetchError>>>,
    }

    impl ScriptedSource {
        fn new(mut results: Vec<Result<Snapshot, FetchError>>) -> Arc<Self> {
            results.reverse();
            Arc::new(Self {
                results: Mutex::new(results),
            })
        }
    }

    #[async_trait]
    impl SnapshotSource for ScriptedSource {
        async fn fetch(&self) -> Result<Snapshot, FetchError> {
            self.results
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Ok(Snapshot::default()))
        }

        fn describe(&self) -> String {
            "scripted".to_string()
        }
    }

    fn server_error() -> FetchError {
        FetchError::Status {
            url: "http://localhost/repos-server/repos-data".to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Collects formatted log output for assertions
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);
    struct LogGuard<'a>(std::sync::MutexGuard<'a, Vec<u8>>);

    impl std::io::Write for LogGuard<'_> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogBuffer {
        type Writer = LogGuard<'a>;
        fn make_writer(&'a self) -> Self::Writer {
            LogGuard(self.0.lock().unwrap())
        }
    }

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    const DIRTY: &str = r#"[{"Config": {"Name": "svc"}, "State": {"Dirty": true, "Files": 2}}]"#;
    const TWO_DIRTY: &str = r#"[
        {"Config": {"Name": "b"}, "State": {"Dirty": true}},
        {"Config": {"Name": "a"}, "State": {"UntrackedFiles": 1}}
    ]"#;

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_view() {
        let source = ScriptedSource::new(vec![Ok(Snapshot::from_json(DIRTY).unwrap()), Err(server_error())]);
        let mut dashboard = Dashboard::new(source);
        let mode = DisplayMode::default();

        let first = dashboard.refresh(mode).await.unwrap().clone();
        assert_eq!(first.table.len(), 1);

        assert_matches!(dashboard.refresh(mode).await, Err(FetchError::Status { .. }));
        assert_eq!(dashboard.view(), Some(&first));
        assert_eq!(dashboard.snapshot().map(Snapshot::len), Some(1));
    }

    #[tokio::test]
    async fn test_failed_first_refresh_leaves_nothing() {
        let mut dashboard = Dashboard::new(ScriptedSource::new(vec![Err(server_error())]));
        assert!(dashboard.refresh(DisplayMode::default()).await.is_err());
        assert!(dashboard.view().is_none());
        assert!(dashboard.snapshot().is_none());
    }

    #[tokio::test]
    async fn test_successful_refresh_replaces_view() {
        let source = ScriptedSource::new(vec![
            Ok(Snapshot::from_json(DIRTY).unwrap()),
            Ok(Snapshot::from_json(TWO_DIRTY).unwrap()),
        ]);
        let mut dashboard = Dashboard::new(source);
        let mode = DisplayMode::default();

        dashboard.refresh(mode).await.unwrap();
        let view = dashboard.refresh(mode).await.unwrap();
        let names: Vec<&str> = view.table.rows.iter().map(|r| r.name.text.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(!view.inspector_html.contains("svc"));
    }

    #[tokio::test]
    async fn test_rerender_uses_held_snapshot() {
        let payload = r#"[
            {"Config": {"Name": "clean"}, "State": {}},
            {"Config": {"Name": "dirty"}, "State": {"Dirty": true}}
        ]"#;
        let mut dashboard = Dashboard::new(ScriptedSource::new(vec![Ok(Snapshot::from_json(payload).unwrap())]));

        assert!(dashboard.rerender(DisplayMode::default()).is_none());

        dashboard.refresh(DisplayMode::default()).await.unwrap();
        assert_eq!(dashboard.view().map(|v| v.table.len()), Some(1));

        let all = dashboard.rerender(DisplayMode::new(true, false)).unwrap();
        assert_eq!(all.table.len(), 2);
    }

    #[test]
    fn test_failed_apply_logs_warning() {
        let logs = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();

        let mut dashboard = Dashboard::new(ScriptedSource::new(Vec::new()));
        let mode = DisplayMode::default();
        tracing::subscriber::with_default(subscriber, || {
            dashboard.apply(Ok(Snapshot::from_json(DIRTY).unwrap()), mode).unwrap();
            assert!(dashboard.apply(Err(server_error()), mode).is_err());
        });

        let output = logs.contents();
        assert!(output.contains("WARN"));
        assert!(output.contains("Refresh from scripted failed, keeping previous view"));
        assert!(output.contains("500"));
        assert_eq!(dashboard.view().map(|v| v.table.len()), Some(1));
    }
}
