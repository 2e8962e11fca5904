//! Terminal User Interface for repos-viewer
//!
//! Interactive dashboard: the summary table on the left, the raw payload
//! inspector and a log panel on the right, refreshed on a timer.

pub mod app;
pub mod events;
pub mod widgets;

use crate::fetch::SnapshotSource;
use crate::Config;
use anyhow::Result;
use app::App;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;

/// Launch the TUI application
pub async fn run_tui(config: Config, source: Arc<dyn SnapshotSource>) -> Result<()> {
    let mut app = App::new(&config, source);
    app.start_refresh();

    // Setup terminal (raw mode)
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main event loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

/// Main application event loop
async fn run_app<B>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B: ratatui::backend::Backend,
{
    while !app.should_exit() {
        terminal.draw(|f| app.draw(f))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                // Windows reports releases too
                if key.kind == KeyEventKind::Press {
                    app.handle_key_event(key);
                }
            }
        }

        // Periodic updates
        app.update().await?;
    }

    Ok(())
}
