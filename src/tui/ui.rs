//! UI rendering for the TUI.
//!
//! Defines the layout and renders all UI components.

use super::app::App;
use super::widgets::{header::Header, table::ResultTable};
use crate::catalog::CATALOG;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Renders the entire UI.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),                        // Header
            Constraint::Length(CATALOG.len() as u16 + 2), // Mode selector
            Constraint::Length(3),                        // Input
            Constraint::Length(1),                        // Status
            Constraint::Min(3),                           // Results
        ])
        .split(area);

    frame.render_widget(
        Header::new(app.connection_info.as_deref(), !app.binding().is_idle()),
        main_layout[0],
    );
    render_modes(frame, main_layout[1], app);
    render_input(frame, main_layout[2], app);
    render_status(frame, main_layout[3], app);

    let view = app.binding().view();
    frame.render_widget(
        ResultTable::new(view.headers, view.displayed.as_ref()),
        main_layout[4],
    );
}

/// Renders the mode list with the selection highlighted.
fn render_modes(frame: &mut Frame, area: Rect, app: &App) {
    let lines: Vec<Line> = CATALOG
        .modes()
        .iter()
        .map(|mode| {
            let selected = mode.id == app.selected_mode;
            let marker = if selected { "▶ " } else { "  " };
            let style = if selected {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::styled(format!("{marker}{}", mode.label), style),
                Span::styled(
                    format!("  ({})", mode.input_kind.hint()),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Lookup (↑/↓) ");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Renders the parameter input and places the cursor after the text.
fn render_input(frame: &mut Frame, area: Rect, app: &App) {
    let hint = app.selected().map(|m| m.input_kind.hint()).unwrap_or("text");
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Parameter ({hint}) · Enter to run "));
    let text = Line::from(vec![Span::raw("> "), Span::raw(app.input.as_str())]);
    frame.render_widget(Paragraph::new(text).block(block), area);

    frame.set_cursor_position(input_cursor(area, &app.input));
}

/// Cursor cell after `input`, kept inside the input box's borders.
fn input_cursor(area: Rect, input: &str) -> (u16, u16) {
    // Border (1) plus prompt "> " (2)
    let typed = u16::try_from(input.chars().count()).unwrap_or(u16::MAX);
    let last_inner = area.right().saturating_sub(2).max(area.x);
    let x = area.x.saturating_add(3).saturating_add(typed).min(last_inner);
    (x, area.y.saturating_add(1))
}

/// Renders the last error, if any.
fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let line = match &app.binding().view().last_error {
        Some(err) => Line::from(Span::styled(
            format!(" {}: {}", err.category(), err),
            Style::default().fg(Color::Red),
        )),
        None => Line::from(Span::styled(
            " Esc to quit",
            Style::default().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}
