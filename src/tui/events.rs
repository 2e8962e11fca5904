//! Event handling for the TUI application
//!
//! Keyboard input is mapped to actions here; refresh results come back from
//! background tasks over the event channel.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::fetch::FetchError;
use crate::model::Snapshot;

/// Events that can occur in the TUI application
#[derive(Debug)]
pub enum AppEvent {
    /// A background fetch finished
    RefreshCompleted(Result<Snapshot, FetchError>),
    /// Application should exit
    Exit,
    /// Periodic tick for updates
    Tick,
}

/// Event handler for processing TUI events
pub struct EventHandler {
    /// Receiver for application events
    receiver: mpsc::UnboundedReceiver<AppEvent>,
    /// Sender for application events (for cloning)
    sender: mpsc::UnboundedSender<AppEvent>,
    /// Last tick time for periodic updates
    last_tick: Instant,
    /// Tick interval
    tick_interval: Duration,
}

impl EventHandler {
    /// Create a new event handler
    pub fn new(tick_interval: Duration) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();

        Self {
            receiver,
            sender,
            last_tick: Instant::now(),
            tick_interval,
        }
    }

    /// Get a sender handle for sending events
    pub fn sender(&self) -> mpsc::UnboundedSender<AppEvent> {
        self.sender.clone()
    }

    /// Get the next event, handling ticks automatically
    pub async fn next_event(&mut self) -> Result<AppEvent> {
        loop {
            // Queue a tick before waiting so short polls still see it
            if self.last_tick.elapsed() >= self.tick_interval {
                self.last_tick = Instant::now();
                let _ = self.sender.send(AppEvent::Tick);
            }

            match tokio::time::timeout(Duration::from_millis(50), self.receiver.recv()).await {
                Ok(Some(event)) => {
                    return Ok(event);
                }
                Ok(None) => {
                    // Channel closed
                    return Ok(AppEvent::Exit);
                }
                Err(_) => {
                    // Timeout - loop back for the tick check
                    continue;
                }
            }
        }
    }
}

/// Helper functions for key event processing
pub mod key_handler {
    use super::*;

    /// Convert key event to navigation action
    pub fn key_to_navigation(event: &KeyEvent) -> Option<NavigationAction> {
        match event.code {
            KeyCode::Up | KeyCode::Char('k') if event.modifiers.is_empty() => {
                Some(NavigationAction::Up)
            }
            KeyCode::Down | KeyCode::Char('j') if event.modifiers.is_empty() => {
                Some(NavigationAction::Down)
            }
            KeyCode::PageUp => Some(NavigationAction::PageUp),
            KeyCode::PageDown => Some(NavigationAction::PageDown),
            KeyCode::Home | KeyCode::Char('g') => Some(NavigationAction::Home),
            KeyCode::End | KeyCode::Char('G') => Some(NavigationAction::End),
            _ => None,
        }
    }

    /// Convert key event to application action
    pub fn key_to_app_action(event: &KeyEvent) -> Option<AppAction> {
        match (event.code, event.modifiers) {
            (KeyCode::Char('q'), KeyModifiers::NONE) => Some(AppAction::Quit),
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(AppAction::Quit),
            (KeyCode::Char('r'), KeyModifiers::NONE) => Some(AppAction::Refresh),
            (KeyCode::Char('a'), KeyModifiers::NONE) => Some(AppAction::ToggleShowAll),
            (KeyCode::Char('i'), KeyModifiers::NONE) => Some(AppAction::ToggleShowIgnored),
            (KeyCode::Char('?'), KeyModifiers::NONE) => Some(AppAction::ShowHelp),
            (KeyCode::F(1), KeyModifiers::NONE) => Some(AppAction::ShowHelp),
            (KeyCode::Tab, KeyModifiers::NONE) => Some(AppAction::NextPanel),
            (KeyCode::BackTab, _) => Some(AppAction::NextPanel),
            (KeyCode::Char('1'), KeyModifiers::NONE) => Some(AppAction::ShowInspector),
            (KeyCode::Char('2'), KeyModifiers::NONE) => Some(AppAction::ShowLogs),
            _ => None,
        }
    }
}

/// Navigation actions within the TUI
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationAction {
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
}

/// High-level application actions
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    Quit,
    Refresh,
    ToggleShowAll,
    ToggleShowIgnored,
    ShowHelp,
    NextPanel,
    ShowInspector,
    ShowLogs,
}
