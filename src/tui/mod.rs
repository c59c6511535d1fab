//! Terminal User Interface.
//!
//! Provides the main TUI loop using ratatui and crossterm. Terminal events
//! are read by one blocking reader task and lookups run on spawned tasks;
//! both report over the same channel, so the selector keeps responding while
//! the store works and no keystroke is read by anyone but the reader.

pub mod app;
mod ui;
pub mod widgets;

pub use app::{App, KeyAction};

use crate::binding::RunTicket;
use crate::db::ResultSet;
use crate::dispatch::QueryDispatcher;
use crate::error::{Result, ShelfError};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event as CEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::panic;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Poll interval for terminal events.
const TICK_RATE: Duration = Duration::from_millis(100);

/// Messages sent from the event reader and lookup tasks to the main loop.
#[derive(Debug)]
pub enum AsyncMessage {
    Terminal(CEvent),
    RunFinished {
        ticket: RunTicket,
        outcome: Result<ResultSet>,
    },
}

/// The main TUI application runner.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Tui {
    /// Creates a new TUI instance, initializing the terminal.
    pub fn new() -> Result<Self> {
        enable_raw_mode()
            .map_err(|e| ShelfError::internal(format!("Failed to enable raw mode: {e}")))?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
            .map_err(|e| ShelfError::internal(format!("Failed to enter alternate screen: {e}")))?;

        let terminal = Terminal::new(CrosstermBackend::new(stdout))
            .map_err(|e| ShelfError::internal(format!("Failed to create terminal: {e}")))?;

        Ok(Self { terminal })
    }

    /// Restores the terminal to its original state.
    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode()
            .map_err(|e| ShelfError::internal(format!("Failed to disable raw mode: {e}")))?;

        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )
        .map_err(|e| ShelfError::internal(format!("Failed to leave alternate screen: {e}")))?;

        self.terminal
            .show_cursor()
            .map_err(|e| ShelfError::internal(format!("Failed to show cursor: {e}")))?;

        Ok(())
    }

    /// Runs the event loop until the operator quits.
    pub async fn run(
        &mut self,
        dispatcher: Arc<QueryDispatcher>,
        connection_info: Option<String>,
    ) -> Result<()> {
        // Restore the terminal if anything panics
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
            original_hook(panic_info);
        }));

        let mut app = App::new(connection_info)?;
        let (tx, mut rx) = mpsc::channel::<AsyncMessage>(32);

        let reader_tx = tx.clone();
        let reader = tokio::task::spawn_blocking(move || {
            pump_events(
                || match crossterm::event::poll(TICK_RATE) {
                    Ok(true) => crossterm::event::read().ok(),
                    _ => None,
                },
                reader_tx,
            )
        });

        let result = self.run_event_loop(&mut app, &dispatcher, tx, &mut rx).await;

        // The reader notices the closed channel within one tick.
        drop(rx);
        if let Err(e) = reader.await {
            warn!("Event reader failed: {}", e);
        }

        let _ = panic::take_hook();
        if let Err(e) = self.restore_terminal() {
            warn!("Failed to restore terminal: {}", e);
        }

        result
    }

    async fn run_event_loop(
        &mut self,
        app: &mut App,
        dispatcher: &Arc<QueryDispatcher>,
        tx: mpsc::Sender<AsyncMessage>,
        rx: &mut mpsc::Receiver<AsyncMessage>,
    ) -> Result<()> {
        loop {
            self.terminal
                .draw(|frame| ui::render(frame, app))
                .map_err(|e| ShelfError::internal(format!("Failed to draw: {e}")))?;

            if !app.running {
                break;
            }

            let Some(message) = rx.recv().await else {
                break;
            };
            match message {
                AsyncMessage::Terminal(CEvent::Key(key)) => {
                    if let KeyAction::Run { ticket, input } = app.handle_key(key) {
                        spawn_lookup(Arc::clone(dispatcher), ticket, input, tx.clone());
                    }
                }
                AsyncMessage::Terminal(_) => {}
                AsyncMessage::RunFinished { ticket, outcome } => {
                    app.apply_outcome(ticket, outcome);
                }
            }
        }

        Ok(())
    }
}

/// Forwards terminal events from `next_event` until the loop hangs up.
///
/// `next_event` blocks for at most one tick and yields `None` when nothing
/// arrived, so a closed channel is noticed promptly.
fn pump_events<F>(mut next_event: F, tx: mpsc::Sender<AsyncMessage>)
where
    F: FnMut() -> Option<CEvent>,
{
    while !tx.is_closed() {
        if let Some(event) = next_event() {
            if tx.blocking_send(AsyncMessage::Terminal(event)).is_err() {
                break;
            }
        }
    }
    debug!("Event reader stopped");
}

/// Runs one dispatch off the UI task and posts the outcome back.
fn spawn_lookup(
    dispatcher: Arc<QueryDispatcher>,
    ticket: RunTicket,
    input: String,
    tx: mpsc::Sender<AsyncMessage>,
) {
    tokio::spawn(async move {
        debug!("Dispatching request {:?} for mode {}", ticket.id, ticket.mode_id);
        let outcome = dispatcher.dispatch(ticket.mode_id, &input).await;
        if tx
            .send(AsyncMessage::RunFinished { ticket, outcome })
            .await
            .is_err()
        {
            debug!("UI closed before request {:?} finished", ticket.id);
        }
    });
}
