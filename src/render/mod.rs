//! Presentation of a snapshot
//!
//! Two independent projections of the same snapshot:
//!
//! - [`inspector`]: the raw payload, pretty-printed and token-classified
//! - [`table`]: one typed row per visible repository, in policy order
//!
//! [`text`] lays the table out for a terminal. Both projections are pure
//! functions of the snapshot and the [`DisplayMode`], recomputed in full.

pub mod inspector;
pub mod table;
pub mod text;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::model::Snapshot;
use crate::policy::{select_visible, DisplayMode};

pub use inspector::{render_inspector, Segment, TokenClass};
pub use table::{Cell, CellStyle, Row, TableView};

/// Everything shown for one snapshot under one display mode
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderedView {
    pub inspector_html: String,
    pub table: TableView,
}

/// Render both projections of `snapshot`
pub fn render_snapshot(snapshot: &Snapshot, mode: DisplayMode) -> RenderedView {
    RenderedView {
        inspector_html: render_inspector(snapshot),
        table: TableView::build(&snapshot.records, mode),
    }
}

/// Output formats of the one-shot `show` command
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Aligned plain text
    Text,
    /// Aligned text with terminal colors
    #[default]
    Ansi,
    /// Table body rows as HTML
    Html,
    /// Visible records, ordered, as JSON
    Json,
}

/// Format the visible part of `snapshot` for printing
pub fn format_table(snapshot: &Snapshot, mode: DisplayMode, format: OutputFormat) -> Result<String> {
    let output = match format {
        OutputFormat::Text => text::render_text(&TableView::build(&snapshot.records, mode), false),
        OutputFormat::Ansi => text::render_text(&TableView::build(&snapshot.records, mode), true),
        OutputFormat::Html => TableView::build(&snapshot.records, mode).to_html(),
        OutputFormat::Json => {
            let visible = select_visible(&snapshot.records, mode);
            serde_json::to_string_pretty(&visible).context("Failed to serialize visible records")?
        }
    };
    Ok(output)
}
