//! Reusable widgets for the TUI application
//!
//! Widgets draw the typed render output; none of them decide what a cell
//! says, only how it looks.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{
        Block, Borders, Cell as TableCell, Clear, List, ListItem, Paragraph, Row as TableRow,
        Table, TableState, Tabs, Wrap,
    },
    Frame,
};

use crate::render::inspector::{tokenize, Segment, TokenClass};
use crate::render::table::{CellStyle, TableView, HEADERS};
use crate::render::text::column_widths;

/// Color scheme for the TUI
pub struct ColorScheme {
    pub primary: Color,
    pub secondary: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub text: Color,
    pub muted: Color,
    pub border: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            primary: Color::Blue,
            secondary: Color::Cyan,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            info: Color::Magenta,
            text: Color::White,
            muted: Color::DarkGray,
            border: Color::Gray,
        }
    }
}

impl ColorScheme {
    /// Style for a table cell of the given class
    pub fn cell_style(&self, style: CellStyle) -> Style {
        match style {
            CellStyle::Name => Style::default().fg(self.text).add_modifier(Modifier::BOLD),
            CellStyle::Branch => Style::default().fg(self.secondary),
            CellStyle::Hash => Style::default().fg(self.muted),
            CellStyle::RemoteState => Style::default().fg(self.info),
            CellStyle::StagedChanges => Style::default()
                .fg(self.warning)
                .add_modifier(Modifier::BOLD),
            CellStyle::UnstagedChanges => Style::default().fg(self.warning),
            CellStyle::UntrackedFiles => Style::default().fg(self.error).add_modifier(Modifier::BOLD),
            CellStyle::TimeSinceLastCommit => Style::default().fg(self.text),
        }
    }

    /// Style for a JSON token in the inspector
    pub fn token_style(&self, class: TokenClass) -> Style {
        match class {
            TokenClass::Key => Style::default().fg(self.primary),
            TokenClass::String => Style::default().fg(self.success),
            TokenClass::Boolean => Style::default().fg(self.info),
            TokenClass::Null => Style::default().fg(self.muted),
            TokenClass::Number => Style::default().fg(self.warning),
        }
    }
}

/// Summary table of visible repositories
pub struct RepoTable<'a> {
    table: &'a TableView,
    title: String,
    colors: &'a ColorScheme,
    border_color: Color,
}

impl<'a> RepoTable<'a> {
    pub fn new(table: &'a TableView, title: String, colors: &'a ColorScheme, border_color: Color) -> Self {
        Self {
            table,
            title,
            colors,
            border_color,
        }
    }

    /// Render the table widget
    pub fn render(&self, frame: &mut Frame, area: Rect, state: &mut TableState) {
        let header = TableRow::new(HEADERS.iter().map(|h| TableCell::from(*h)))
            .style(
                Style::default()
                    .fg(self.colors.secondary)
                    .add_modifier(Modifier::BOLD),
            )
            .bottom_margin(1);

        let rows: Vec<TableRow> = self
            .table
            .rows
            .iter()
            .map(|row| {
                TableRow::new(row.cells().map(|cell| {
                    TableCell::from(cell.text.as_str()).style(self.colors.cell_style(cell.style))
                }))
            })
            .collect();

        let widths: Vec<Constraint> = column_widths(self.table)
            .iter()
            .map(|w| Constraint::Length(*w as u16))
            .collect();

        let table = Table::new(rows, widths)
            .header(header)
            .column_spacing(2)
            .block(
                Block::default()
                    .title(self.title.as_str())
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.border_color)),
            )
            .highlight_style(Style::default().bg(self.colors.primary))
            .highlight_symbol("> ");

        frame.render_stateful_widget(table, area, state);
    }
}

/// Pretty-printed payload with token coloring
pub struct InspectorView<'a> {
    json: &'a str,
    scroll: u16,
    colors: &'a ColorScheme,
    border_color: Color,
}

impl<'a> InspectorView<'a> {
    pub fn new(json: &'a str, scroll: u16, colors: &'a ColorScheme, border_color: Color) -> Self {
        Self {
            json,
            scroll,
            colors,
            border_color,
        }
    }

    /// Colored lines; JSON strings never span lines in pretty output
    pub fn lines(&self) -> Vec<Line<'a>> {
        self.json
            .lines()
            .map(|line| {
                let spans: Vec<Span<'a>> = tokenize(line)
                    .into_iter()
                    .map(|segment| match segment {
                        Segment::Plain(text) => Span::styled(text, Style::default().fg(self.colors.text)),
                        Segment::Token(class, text) => Span::styled(text, self.colors.token_style(class)),
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }

    /// Render the inspector widget
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let paragraph = Paragraph::new(Text::from(self.lines()))
            .block(
                Block::default()
                    .title("Raw data")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.border_color)),
            )
            .scroll((self.scroll, 0));

        frame.render_widget(paragraph, area);
    }
}

/// Log viewer widget with scrolling capability
pub struct LogViewer<'a> {
    logs: &'a [String],
    colors: &'a ColorScheme,
    scroll_offset: usize,
    border_color: Color,
}

impl<'a> LogViewer<'a> {
    pub fn new(logs: &'a [String], colors: &'a ColorScheme, scroll_offset: usize, border_color: Color) -> Self {
        Self {
            logs,
            colors,
            scroll_offset,
            border_color,
        }
    }

    /// Render the log viewer widget
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let visible_height = area.height.saturating_sub(2) as usize; // Account for borders
        let start_idx = self.scroll_offset.min(self.logs.len().saturating_sub(1));
        let end_idx = (start_idx + visible_height).min(self.logs.len());

        let visible_logs = if start_idx < self.logs.len() {
            &self.logs[start_idx..end_idx]
        } else {
            &[]
        };

        let items: Vec<ListItem> = visible_logs
            .iter()
            .map(|log| {
                let color = if log.contains("ERROR") {
                    self.colors.error
                } else if log.contains("WARN") {
                    self.colors.warning
                } else {
                    self.colors.text
                };

                ListItem::new(Line::from(Span::styled(
                    log.as_str(),
                    Style::default().fg(color),
                )))
            })
            .collect();

        let list = List::new(items).block(
            Block::default()
                .title(format!(
                    "Log ({}/{})",
                    self.scroll_offset + 1,
                    self.logs.len()
                ))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.border_color)),
        );

        frame.render_widget(list, area);
    }
}

/// Help dialog widget
pub struct HelpDialog<'a> {
    colors: &'a ColorScheme,
}

impl<'a> HelpDialog<'a> {
    pub fn new(colors: &'a ColorScheme) -> Self {
        Self { colors }
    }

    /// Render the help dialog
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(50, 60, area);

        // Clear the background
        frame.render_widget(Clear, popup_area);

        let help_text = Text::from(vec![
            Line::from(vec![Span::styled(
                "Keyboard Shortcuts",
                Style::default()
                    .fg(self.colors.primary)
                    .add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from("Display:"),
            Line::from("  a          Toggle show all"),
            Line::from("  i          Toggle show ignored"),
            Line::from("  r          Refresh now"),
            Line::from(""),
            Line::from("Navigation:"),
            Line::from("  ↑/k ↓/j    Move or scroll"),
            Line::from("  g/G        Top/bottom"),
            Line::from("  Tab        Switch panel focus"),
            Line::from("  1/2        Raw data/Log tab"),
            Line::from(""),
            Line::from("General:"),
            Line::from("  ?/F1       Show this help"),
            Line::from("  q/Ctrl+C   Quit"),
            Line::from(""),
            Line::from(vec![Span::styled(
                "Press Esc to close",
                Style::default().fg(self.colors.secondary),
            )]),
        ]);

        let paragraph = Paragraph::new(help_text)
            .block(
                Block::default()
                    .title("Help")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.colors.primary)),
            )
            .style(Style::default().fg(self.colors.text))
            .alignment(Alignment::Left);

        frame.render_widget(paragraph, popup_area);
    }
}

/// Error popup
pub struct ErrorDialog<'a> {
    message: &'a str,
    colors: &'a ColorScheme,
}

impl<'a> ErrorDialog<'a> {
    pub fn new(message: &'a str, colors: &'a ColorScheme) -> Self {
        Self { message, colors }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let paragraph = Paragraph::new(self.message)
            .block(
                Block::default()
                    .title("Error (press Esc to close)")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.colors.error)),
            )
            .style(Style::default().fg(self.colors.text))
            .wrap(Wrap { trim: true });

        frame.render_widget(paragraph, popup_area);
    }
}

/// Tab bar widget for the right panel
pub struct TabBar<'a> {
    tabs: &'a [&'a str],
    selected: usize,
    colors: &'a ColorScheme,
}

impl<'a> TabBar<'a> {
    pub fn new(tabs: &'a [&'a str], selected: usize, colors: &'a ColorScheme) -> Self {
        Self {
            tabs,
            selected,
            colors,
        }
    }

    /// Render the tab bar widget
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = self.tabs.iter().map(|&t| Line::from(t)).collect();

        let tabs = Tabs::new(titles)
            .style(Style::default().fg(self.colors.text))
            .highlight_style(
                Style::default()
                    .fg(self.colors.primary)
                    .add_modifier(Modifier::BOLD),
            )
            .select(self.selected);

        frame.render_widget(tabs, area);
    }
}

/// Status bar widget showing current status
pub struct StatusBar<'a> {
    left_text: Option<&'a str>,
    center_text: Option<&'a str>,
    right_text: Option<&'a str>,
    colors: &'a ColorScheme,
}

impl<'a> StatusBar<'a> {
    pub fn new(
        left_text: Option<&'a str>,
        center_text: Option<&'a str>,
        right_text: Option<&'a str>,
        colors: &'a ColorScheme,
    ) -> Self {
        Self {
            left_text,
            center_text,
            right_text,
            colors,
        }
    }

    /// Render the status bar widget
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(33),
                Constraint::Percentage(34),
                Constraint::Percentage(33),
            ])
            .split(area);

        if let Some(text) = self.left_text {
            let paragraph = Paragraph::new(Text::from(text))
                .style(Style::default().fg(self.colors.text))
                .alignment(Alignment::Left);
            frame.render_widget(paragraph, chunks[0]);
        }

        if let Some(text) = self.center_text {
            let paragraph = Paragraph::new(Text::from(text))
                .style(Style::default().fg(self.colors.primary))
                .alignment(Alignment::Center);
            frame.render_widget(paragraph, chunks[1]);
        }

        if let Some(text) = self.right_text {
            let paragraph = Paragraph::new(Text::from(text))
                .style(Style::default().fg(self.colors.secondary))
                .alignment(Alignment::Right);
            frame.render_widget(paragraph, chunks[2]);
        }
    }
}

/// Helper to create a centered rectangle
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_scheme_default() {
        let colors = ColorScheme::default();
        assert_eq!(colors.primary, Color::Blue);
        assert_eq!(colors.success, Color::Green);
        assert_eq!(colors.error, Color::Red);
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 50);
        let centered = centered_rect(60, 70, area);

        // Should be roughly centered
        assert!(centered.x > 0 && centered.x < area.width);
        assert!(centered.y > 0 && centered.y < area.height);
        assert!(centered.width > 0 && centered.width < area.width);
        assert!(centered.height > 0 && centered.height < area.height);
    }

    #[test]
    fn test_cell_styles_distinguish_change_kinds() {
        let colors = ColorScheme::default();
        assert_eq!(colors.cell_style(CellStyle::Hash).fg, Some(colors.muted));
        assert_eq!(colors.cell_style(CellStyle::RemoteState).fg, Some(colors.info));
        assert_ne!(
            colors.cell_style(CellStyle::StagedChanges),
            colors.cell_style(CellStyle::UnstagedChanges)
        );
    }

    #[test]
    fn test_inspector_lines_color_tokens() {
        let colors = ColorScheme::default();
        let json = "[\n  {\n    \"Name\": \"alpha\",\n    \"Dirty\": true\n  }\n]";
        let view = InspectorView::new(json, 0, &colors, colors.border);
        let lines = view.lines();
        assert_eq!(lines.len(), 6);

        let name_line = &lines[2];
        let key = name_line
            .spans
            .iter()
            .find(|s| s.content == "\"Name\":")
            .expect("key span");
        assert_eq!(key.style, colors.token_style(TokenClass::Key));
        let value = name_line
            .spans
            .iter()
            .find(|s| s.content == "\"alpha\"")
            .expect("string span");
        assert_eq!(value.style, colors.token_style(TokenClass::String));

        let bool_span = lines[3].spans.iter().find(|s| s.content == "true").expect("boolean span");
        assert_eq!(bool_span.style, colors.token_style(TokenClass::Boolean));
    }
}
