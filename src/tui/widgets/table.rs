//! Result table widget for the TUI.
//!
//! Draws the selected mode's headers over the rows of the last successful
//! lookup. The two can briefly differ after the selector moves, so cells
//! are laid out by position under whatever headers are shown.

use crate::catalog::ColumnSchema;
use crate::db::{ResultSet, Value};
use crate::output::{column_widths, truncate, MIN_COLUMN_WIDTH};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

/// Widget for rendering a result set under a header row.
pub struct ResultTable<'a> {
    headers: ColumnSchema,
    result: Option<&'a ResultSet>,
}

impl<'a> ResultTable<'a> {
    /// Creates a new result table widget.
    pub fn new(headers: ColumnSchema, result: Option<&'a ResultSet>) -> Self {
        Self { headers, result }
    }

    fn rows(&self) -> &'a [Vec<Value>] {
        self.result.map(|r| r.rows.as_slice()).unwrap_or(&[])
    }

    /// Renders the table to a vector of Lines for embedding in other widgets.
    pub fn render_to_lines(&self, available_width: usize) -> Vec<Line<'static>> {
        let widths = column_widths(self.headers, self.rows());

        // Shrink proportionally if the table is wider than the area
        let total_width: usize = widths.iter().sum::<usize>() + widths.len() * 3 + 1;
        let scale_factor = if total_width > available_width && available_width > 0 {
            available_width as f64 / total_width as f64
        } else {
            1.0
        };
        let widths: Vec<usize> = widths
            .iter()
            .map(|&w| ((w as f64 * scale_factor) as usize).max(MIN_COLUMN_WIDTH))
            .collect();

        let mut lines = vec![
            Self::render_border(&widths, '┌', '┬', '┐'),
            self.render_header_row(&widths),
            Self::render_border(&widths, '├', '┼', '┤'),
        ];
        for row in self.rows() {
            lines.push(Self::render_data_row(row, &widths));
        }
        lines.push(Self::render_border(&widths, '└', '┴', '┘'));

        let footer = match self.result {
            Some(result) => format!(
                "{} row{} ({}ms)",
                result.row_count(),
                if result.row_count() == 1 { "" } else { "s" },
                result.execution_time.as_millis()
            ),
            None => "Press Enter to run the lookup".to_string(),
        };
        lines.push(Line::from(Span::styled(
            footer,
            Style::default().fg(Color::DarkGray),
        )));

        lines
    }

    fn render_border(widths: &[usize], left: char, mid: char, right: char) -> Line<'static> {
        let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
        let border = format!("{left}{}{right}", segments.join(&mid.to_string()));
        Line::from(Span::styled(border, Style::default().fg(Color::DarkGray)))
    }

    fn render_header_row(&self, widths: &[usize]) -> Line<'static> {
        let mut spans = vec![Span::styled("│", Style::default().fg(Color::DarkGray))];

        for (name, &width) in self.headers.iter().zip(widths) {
            spans.push(Span::styled(
                format!(" {:width$} ", truncate(name, width), width = width),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
        }

        Line::from(spans)
    }

    fn render_data_row(row: &[Value], widths: &[usize]) -> Line<'static> {
        let mut spans = vec![Span::styled("│", Style::default().fg(Color::DarkGray))];

        for (i, &width) in widths.iter().enumerate() {
            let value = row.get(i).cloned().unwrap_or_default();
            let style = if value.is_null() {
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC)
            } else {
                Style::default()
            };

            spans.push(Span::styled(
                format!(
                    " {:width$} ",
                    truncate(&value.to_display_string(), width),
                    width = width
                ),
                style,
            ));
            spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
        }

        Line::from(spans)
    }
}

impl Widget for ResultTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = self.render_to_lines(area.width as usize);

        for (i, line) in lines.iter().enumerate().take(area.height as usize) {
            buf.set_line(area.x, area.y + i as u16, line, area.width);
        }
    }
}
