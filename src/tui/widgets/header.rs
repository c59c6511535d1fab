//! Header widget for the TUI.
//!
//! Displays the application name, a busy marker while a lookup runs, and
//! the database connection info.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::Widget,
};

/// Header bar widget.
pub struct Header<'a> {
    connection_info: Option<&'a str>,
    is_running: bool,
}

impl<'a> Header<'a> {
    /// Creates a new header widget.
    pub fn new(connection_info: Option<&'a str>, is_running: bool) -> Self {
        Self {
            connection_info,
            is_running,
        }
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        for x in area.left()..area.right() {
            buf[(x, area.y)].set_style(style);
        }

        let left_text = format!(" Shelf v{}", env!("CARGO_PKG_VERSION"));
        buf.set_span(area.x, area.y, &Span::styled(left_text, style), area.width);

        if self.is_running {
            let text = "running…";
            let width = text.chars().count() as u16;
            let x = area.x + area.width.saturating_sub(width) / 2;
            buf.set_string(x, area.y, text, style.fg(Color::Yellow));
        }

        if let Some(info) = self.connection_info {
            let right_text = format!(" [db: {info}] ");
            let right_width = right_text.chars().count() as u16;
            if right_width < area.width {
                let right_x = area.right().saturating_sub(right_width);
                buf.set_string(right_x, area.y, &right_text, style);
            }
        }
    }
}
