//! Application state for the TUI.
//!
//! Holds the mode selector, the parameter input and the presentation
//! binding, and turns key presses into state changes or run requests.

use crate::binding::{PresentationBinding, RunTicket};
use crate::catalog::{ModeId, QueryMode, CATALOG};
use crate::db::ResultSet;
use crate::error::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What the event loop must do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    None,
    /// Start the lookup for `ticket` with the given raw input.
    Run { ticket: RunTicket, input: String },
    Quit,
}

/// Main application state.
pub struct App {
    /// Whether the application should keep running.
    pub running: bool,
    /// Index of the highlighted mode.
    pub selected_mode: ModeId,
    /// Raw parameter text.
    pub input: String,
    /// Connection info for display.
    pub connection_info: Option<String>,
    binding: PresentationBinding,
}

impl App {
    /// Creates the state with the first mode selected.
    pub fn new(connection_info: Option<String>) -> Result<Self> {
        Ok(Self {
            running: true,
            selected_mode: 0,
            input: String::new(),
            connection_info,
            binding: PresentationBinding::new(0)?,
        })
    }

    pub fn binding(&self) -> &PresentationBinding {
        &self.binding
    }

    pub fn selected(&self) -> Option<&'static QueryMode> {
        CATALOG.modes().get(self.selected_mode)
    }

    /// Selects `mode_id` and shows its headers.
    pub fn select_mode(&mut self, mode_id: ModeId) {
        if self.binding.on_mode_changed(mode_id).is_ok() {
            self.selected_mode = mode_id;
        }
    }

    /// Handles a key press.
    pub fn handle_key(&mut self, key: KeyEvent) -> KeyAction {
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q')
                if key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                self.running = false;
                KeyAction::Quit
            }
            KeyCode::Esc => {
                self.running = false;
                KeyAction::Quit
            }
            KeyCode::Up | KeyCode::BackTab => {
                self.select_mode(CATALOG.previous_mode(self.selected_mode));
                KeyAction::None
            }
            KeyCode::Down | KeyCode::Tab => {
                self.select_mode(CATALOG.next_mode(self.selected_mode));
                KeyAction::None
            }
            KeyCode::Enter => match self.binding.begin_run(self.selected_mode) {
                Ok(ticket) => KeyAction::Run {
                    ticket,
                    input: self.input.clone(),
                },
                // Rejected runs are already recorded in the view.
                Err(_) => KeyAction::None,
            },
            KeyCode::Backspace => {
                self.input.pop();
                self.binding.dismiss_error();
                KeyAction::None
            }
            KeyCode::Char(c) => {
                self.input.push(c);
                self.binding.dismiss_error();
                KeyAction::None
            }
            _ => KeyAction::None,
        }
    }

    /// Applies a finished lookup to the view.
    pub fn apply_outcome(&mut self, ticket: RunTicket, outcome: Result<ResultSet>) {
        // Failures are kept in the view for the status line.
        let _ = self.binding.complete_run(ticket, outcome);
    }
}
