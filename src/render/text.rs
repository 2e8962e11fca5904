//! Aligned terminal table, optionally ANSI-colored

use crossterm::style::{style, Stylize};

use super::table::{Cell, CellStyle, TableView, HEADERS};

const COLUMN_GAP: &str = "  ";

fn paint(cell: &Cell, padded: String) -> String {
    let styled = style(padded);
    match cell.style {
        CellStyle::Name => styled.bold().to_string(),
        CellStyle::Hash => styled.dark_grey().to_string(),
        CellStyle::RemoteState => styled.magenta().to_string(),
        CellStyle::StagedChanges => styled.yellow().bold().to_string(),
        CellStyle::UnstagedChanges => styled.yellow().to_string(),
        CellStyle::UntrackedFiles => styled.red().bold().to_string(),
        CellStyle::Branch | CellStyle::TimeSinceLastCommit => styled.to_string(),
    }
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

/// Widest text per column, headers included
pub fn column_widths(table: &TableView) -> [usize; 7] {
    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &table.rows {
        for (width, cell) in widths.iter_mut().zip(row.cells()) {
            *width = (*width).max(cell.text.chars().count());
        }
    }
    widths
}

/// Render the table with a header line; `ansi` adds colors
pub fn render_text(table: &TableView, ansi: bool) -> String {
    let widths = column_widths(table);
    let mut lines = Vec::with_capacity(table.len() + 1);

    let header: Vec<String> = HEADERS
        .iter()
        .zip(widths)
        .map(|(h, w)| pad(h, w))
        .collect();
    let header = header.join(COLUMN_GAP);
    lines.push(if ansi {
        style(header.trim_end()).bold().underlined().to_string()
    } else {
        header.trim_end().to_string()
    });

    for row in &table.rows {
        let mut line: Vec<String> = row
            .cells()
            .iter()
            .zip(widths)
            .map(|(cell, w)| {
                let padded = pad(&cell.text, w);
                if ansi {
                    paint(cell, padded)
                } else {
                    padded
                }
            })
            .collect();
        if !row.comment.is_empty() {
            line.push(row.comment.clone());
        }
        let line = line.join(COLUMN_GAP);
        lines.push(line.trim_end().to_string());
    }

    lines.join("\n")
}
