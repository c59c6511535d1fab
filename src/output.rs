//! Plain-text and JSON rendering of result sets for one-shot mode.
//!
//! The column sizing helpers are shared with the TUI result table.

use crate::db::{ResultSet, Row};
use crate::error::{Result, ShelfError};

/// Maximum width for any column.
pub const MAX_COLUMN_WIDTH: usize = 40;

/// Minimum width for any column.
pub const MIN_COLUMN_WIDTH: usize = 4;

/// Output format for one-shot mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Boxed text table.
    #[default]
    Text,
    /// The result set as JSON.
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid output format: {s}. Expected: text or json")),
        }
    }
}

/// Calculates the display width of each header's column.
pub fn column_widths(headers: &[&str], rows: &[Row]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers
        .iter()
        .map(|name| name.chars().count().max(MIN_COLUMN_WIDTH))
        .collect();

    for row in rows {
        for (width, value) in widths.iter_mut().zip(row) {
            *width = (*width).max(value.to_display_string().chars().count());
        }
    }

    widths.into_iter().map(|w| w.min(MAX_COLUMN_WIDTH)).collect()
}

/// Truncates a string to fit within the given width, adding ellipsis if needed.
pub fn truncate(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else if max_width <= 3 {
        s.chars().take(max_width).collect()
    } else {
        let kept: String = s.chars().take(max_width - 3).collect();
        format!("{kept}...")
    }
}

/// Renders a result set in the requested format.
pub fn render(result: &ResultSet, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(result)),
        OutputFormat::Json => serde_json::to_string_pretty(result)
            .map_err(|e| ShelfError::internal(format!("Failed to encode result: {e}"))),
    }
}

/// Renders a result set as a boxed table followed by a row-count footer.
pub fn render_text(result: &ResultSet) -> String {
    let widths = column_widths(result.columns, &result.rows);
    let mut out = String::new();

    out.push_str(&border(&widths, '┌', '┬', '┐'));
    out.push_str(&cells(
        &widths,
        result.columns.iter().map(|name| name.to_string()),
    ));
    out.push_str(&border(&widths, '├', '┼', '┤'));
    for row in &result.rows {
        out.push_str(&cells(&widths, row.iter().map(|v| v.to_display_string())));
    }
    out.push_str(&border(&widths, '└', '┴', '┘'));

    let count = result.row_count();
    out.push_str(&format!(
        "{} row{} ({}ms)\n",
        count,
        if count == 1 { "" } else { "s" },
        result.execution_time.as_millis()
    ));
    out
}

fn border(widths: &[usize], left: char, mid: char, right: char) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    format!("{left}{}{right}\n", segments.join(&mid.to_string()))
}

fn cells(widths: &[usize], values: impl Iterator<Item = String>) -> String {
    let mut line = String::from("│");
    for (width, value) in widths.iter().zip(values) {
        line.push_str(&format!(" {:width$} │", truncate(&value, *width), width = *width));
    }
    line.push('\n');
    line
}
