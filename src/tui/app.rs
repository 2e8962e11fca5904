//! Main application state for the TUI

use super::events::key_handler::{key_to_app_action, key_to_navigation};
use super::events::{AppAction, AppEvent, EventHandler, NavigationAction};
use super::widgets::{
    ColorScheme, ErrorDialog, HelpDialog, InspectorView, LogViewer, RepoTable, StatusBar, TabBar,
};
use crate::dashboard::Dashboard;
use crate::fetch::{FetchError, SnapshotSource};
use crate::model::Snapshot;
use crate::policy::DisplayMode;
use crate::render::inspector::pretty_json;
use crate::render::TableView;
use crate::Config;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Color,
    widgets::TableState,
    Frame,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Which panel has focus
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FocusedPanel {
    Table,
    RightPanel,
}

/// Right panel tab selection
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RightPanelTab {
    Inspector,
    Log,
}

const PAGE: usize = 10;
const MAX_LOGS: usize = 1000;

/// Application state
pub struct App {
    dashboard: Dashboard,
    mode: DisplayMode,

    // Event handling
    event_handler: EventHandler,

    // UI state
    colors: ColorScheme,
    focused_panel: FocusedPanel,
    right_panel_tab: RightPanelTab,
    table_state: TableState,
    selected_row: usize,
    inspector_text: String,
    inspector_scroll: usize,

    // Refresh state
    refresh_interval: Option<Duration>,
    refresh_in_flight: bool,
    last_attempt: Option<Instant>,
    last_success: Option<chrono::DateTime<chrono::Local>>,

    // Status
    status_message: String,
    logs: Vec<String>,
    log_scroll_offset: usize,

    // Popup state
    show_help: bool,
    show_error: Option<String>,

    // Exit flag
    should_exit: bool,
}

impl App {
    /// Create a new application instance; no I/O happens until the first refresh
    pub fn new(config: &Config, source: Arc<dyn SnapshotSource>) -> Self {
        // Note: Don't use tracing in TUI - raw mode conflicts with stdout
        let endpoint = source.describe();

        Self {
            dashboard: Dashboard::new(source),
            mode: config.display,
            event_handler: EventHandler::new(Duration::from_millis(250)),
            colors: ColorScheme::default(),
            focused_panel: FocusedPanel::Table,
            right_panel_tab: RightPanelTab::Inspector,
            table_state: TableState::default(),
            selected_row: 0,
            inspector_text: String::new(),
            inspector_scroll: 0,
            refresh_interval: config.refresh_interval(),
            refresh_in_flight: false,
            last_attempt: None,
            last_success: None,
            status_message: "Loading...".to_string(),
            logs: vec![format!("Application started, reading {}", endpoint)],
            log_scroll_offset: 0,
            show_help: false,
            show_error: None,
            should_exit: false,
        }
    }

    /// Check if the application should exit
    pub fn should_exit(&self) -> bool {
        self.should_exit
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn is_refreshing(&self) -> bool {
        self.refresh_in_flight
    }

    /// Rows currently on screen
    pub fn table(&self) -> Option<&TableView> {
        self.dashboard.view().map(|v| &v.table)
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key_event: KeyEvent) {
        // Handle popup-specific keys first
        if self.show_help || self.show_error.is_some() {
            if matches!(key_event.code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter) {
                self.show_help = false;
                self.show_error = None;
            }
            return;
        }

        if let Some(action) = key_to_app_action(&key_event) {
            match action {
                AppAction::Quit => self.should_exit = true,
                AppAction::Refresh => self.start_refresh(),
                AppAction::ToggleShowAll => {
                    self.mode.show_all = !self.mode.show_all;
                    self.add_log(format!("Show all: {}", on_off(self.mode.show_all)));
                    self.rerender();
                }
                AppAction::ToggleShowIgnored => {
                    self.mode.show_ignored = !self.mode.show_ignored;
                    self.add_log(format!("Show ignored: {}", on_off(self.mode.show_ignored)));
                    self.rerender();
                }
                AppAction::ShowHelp => self.show_help = true,
                AppAction::NextPanel => {
                    self.focused_panel = match self.focused_panel {
                        FocusedPanel::Table => FocusedPanel::RightPanel,
                        FocusedPanel::RightPanel => FocusedPanel::Table,
                    };
                }
                AppAction::ShowInspector => self.right_panel_tab = RightPanelTab::Inspector,
                AppAction::ShowLogs => self.right_panel_tab = RightPanelTab::Log,
            }
            return;
        }

        if let Some(nav) = key_to_navigation(&key_event) {
            self.navigate(nav);
        }
    }

    /// Move the cursor of whichever panel has focus
    fn navigate(&mut self, nav: NavigationAction) {
        let (position, len) = match (self.focused_panel, self.right_panel_tab) {
            (FocusedPanel::Table, _) => (self.selected_row, self.table().map_or(0, TableView::len)),
            (FocusedPanel::RightPanel, RightPanelTab::Inspector) => {
                (self.inspector_scroll, self.inspector_text.lines().count())
            }
            (FocusedPanel::RightPanel, RightPanelTab::Log) => (self.log_scroll_offset, self.logs.len()),
        };

        let last = len.saturating_sub(1);
        let target = match nav {
            NavigationAction::Up => position.saturating_sub(1),
            NavigationAction::Down => (position + 1).min(last),
            NavigationAction::PageUp => position.saturating_sub(PAGE),
            NavigationAction::PageDown => (position + PAGE).min(last),
            NavigationAction::Home => 0,
            NavigationAction::End => last,
        };

        match (self.focused_panel, self.right_panel_tab) {
            (FocusedPanel::Table, _) => {
                self.selected_row = target;
                self.sync_selection();
            }
            (FocusedPanel::RightPanel, RightPanelTab::Inspector) => self.inspector_scroll = target,
            (FocusedPanel::RightPanel, RightPanelTab::Log) => self.log_scroll_offset = target,
        }
    }

    /// Keep the highlighted row inside the current table
    fn sync_selection(&mut self) {
        let len = self.table().map_or(0, TableView::len);
        if len == 0 {
            self.selected_row = 0;
            self.table_state.select(None);
        } else {
            self.selected_row = self.selected_row.min(len - 1);
            self.table_state.select(Some(self.selected_row));
        }
    }

    /// Kick off a background fetch unless one is already running
    pub fn start_refresh(&mut self) {
        if self.refresh_in_flight {
            self.add_log("Refresh already in progress...".to_string());
            return;
        }

        self.refresh_in_flight = true;
        self.last_attempt = Some(Instant::now());
        self.status_message = "Refreshing...".to_string();

        let source = self.dashboard.source();
        let sender = self.event_handler.sender();
        tokio::spawn(async move {
            let result = source.fetch().await;
            let _ = sender.send(AppEvent::RefreshCompleted(result));
        });
    }

    /// Fold a finished fetch into the dashboard
    pub fn finish_refresh(&mut self, result: Result<Snapshot, FetchError>) {
        self.refresh_in_flight = false;

        let outcome = self
            .dashboard
            .apply(result, self.mode)
            .map(|view| view.table.len());

        match outcome {
            Ok(shown) => {
                let total = self.dashboard.snapshot().map_or(0, Snapshot::len);
                self.inspector_text = self.dashboard.snapshot().map(pretty_json).unwrap_or_default();
                self.last_success = Some(chrono::Local::now());
                self.status_message = format!("{} of {} repositories shown", shown, total);
                self.add_log(format!("Loaded {} repositories", total));
                self.sync_selection();
            }
            Err(e) => {
                self.status_message = "Refresh failed, showing last data".to_string();
                self.add_log(format!("ERROR: {}", e));
                if self.dashboard.view().is_none() {
                    self.show_error = Some(e.to_string());
                }
            }
        }
    }

    /// Recompute the view from the held snapshot
    fn rerender(&mut self) {
        if let Some(view) = self.dashboard.rerender(self.mode) {
            let shown = view.table.len();
            let total = self.dashboard.snapshot().map_or(0, Snapshot::len);
            self.status_message = format!("{} of {} repositories shown", shown, total);
        }
        self.sync_selection();
    }

    fn refresh_due(&self) -> bool {
        match (self.refresh_interval, self.last_attempt) {
            (Some(interval), Some(last)) => last.elapsed() >= interval,
            _ => false,
        }
    }

    /// Add a log message
    fn add_log(&mut self, message: String) {
        let timestamp = chrono::Local::now().format("%H:%M:%S").to_string();
        self.logs.push(format!("[{}] {}", timestamp, message));

        if self.logs.len() > MAX_LOGS {
            self.logs.drain(..self.logs.len() - MAX_LOGS);
        }
    }

    /// Process pending events
    pub async fn update(&mut self) -> Result<()> {
        // Try to get an event without blocking
        if let Ok(event) =
            tokio::time::timeout(Duration::from_millis(1), self.event_handler.next_event()).await
        {
            match event? {
                AppEvent::Tick => {
                    if !self.refresh_in_flight && self.refresh_due() {
                        self.start_refresh();
                    }
                }
                AppEvent::RefreshCompleted(result) => self.finish_refresh(result),
                AppEvent::Exit => self.should_exit = true,
            }
        }

        Ok(())
    }

    /// Draw the application UI
    pub fn draw(&mut self, frame: &mut Frame) {
        let size = frame.size();

        // Main content area + status line (full width)
        let vertical_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(vertical_chunks[0]);

        self.draw_table_panel(frame, main_chunks[0]);
        self.draw_right_panel(frame, main_chunks[1]);
        self.draw_status_line(frame, vertical_chunks[1]);

        if self.show_help {
            HelpDialog::new(&self.colors).render(frame, size);
        }

        if let Some(error) = &self.show_error {
            ErrorDialog::new(error, &self.colors).render(frame, size);
        }
    }

    fn border_color(&self, panel: FocusedPanel) -> Color {
        if self.focused_panel == panel {
            self.colors.primary
        } else {
            self.colors.border
        }
    }

    fn draw_table_panel(&mut self, frame: &mut Frame, area: Rect) {
        let border_color = self.border_color(FocusedPanel::Table);
        let empty = TableView::default();
        let table = self.dashboard.view().map_or(&empty, |v| &v.table);

        let title = format!(
            "Repositories ({}) [a]ll:{} [i]gnored:{} [r]efresh",
            table.len(),
            on_off(self.mode.show_all),
            on_off(self.mode.show_ignored)
        );

        RepoTable::new(table, title, &self.colors, border_color).render(
            frame,
            area,
            &mut self.table_state,
        );
    }

    fn draw_right_panel(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(area);

        let selected = match self.right_panel_tab {
            RightPanelTab::Inspector => 0,
            RightPanelTab::Log => 1,
        };
        TabBar::new(&["[1]Raw data", "[2]Log"], selected, &self.colors).render(frame, chunks[0]);

        let border_color = self.border_color(FocusedPanel::RightPanel);
        match self.right_panel_tab {
            RightPanelTab::Inspector => {
                let scroll = u16::try_from(self.inspector_scroll).unwrap_or(u16::MAX);
                InspectorView::new(&self.inspector_text, scroll, &self.colors, border_color)
                    .render(frame, chunks[1]);
            }
            RightPanelTab::Log => {
                LogViewer::new(&self.logs, &self.colors, self.log_scroll_offset, border_color)
                    .render(frame, chunks[1]);
            }
        }
    }

    fn draw_status_line(&self, frame: &mut Frame, area: Rect) {
        let refresh = if self.refresh_in_flight { "● refreshing" } else { "○ idle" };
        let updated = self
            .last_success
            .map(|t| format!("updated {} ", t.format("%H:%M:%S")))
            .unwrap_or_else(|| "no data yet ".to_string());
        let left = format!(" {}", refresh);

        StatusBar::new(
            Some(left.as_str()),
            Some(self.status_message.as_str()),
            Some(updated.as_str()),
            &self.colors,
        )
        .render(frame, area);
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}
