//! Binds mode selection and run actions to the displayed result table.
//!
//! This is a pure state layer, separate from any event loop: the shell calls
//! [`PresentationBinding::on_mode_changed`] when the selector moves and either
//! [`PresentationBinding::on_run_requested`] or the split
//! [`begin_run`](PresentationBinding::begin_run) /
//! [`complete_run`](PresentationBinding::complete_run) pair when the operator
//! runs a lookup. At most one lookup is in flight; a run issued meanwhile is
//! rejected with [`ShelfError::Busy`].

use crate::catalog::{ColumnSchema, ModeId, QueryCatalog, CATALOG};
use crate::db::ResultSet;
use crate::dispatch::QueryDispatcher;
use crate::error::{Result, ShelfError};
use tracing::{debug, warn};

/// Identifies one run action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

/// Handle for an in-flight run, returned by `begin_run`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunTicket {
    pub id: RequestId,
    pub mode_id: ModeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingState {
    Idle,
    AwaitingResult(RunTicket),
}

/// What the table currently shows.
#[derive(Debug, Clone, Default)]
pub struct ResultsView {
    /// Column headers to draw. Set to the selected mode's schema on a mode
    /// change and to the rendered result's schema when a run completes.
    pub headers: ColumnSchema,
    /// Last successfully rendered result, under its own columns.
    pub displayed: Option<ResultSet>,
    /// Error from the most recent failed run.
    pub last_error: Option<ShelfError>,
}

pub struct PresentationBinding {
    catalog: &'static QueryCatalog,
    view: ResultsView,
    state: BindingState,
    next_request: u64,
}

impl PresentationBinding {
    /// Creates a binding showing the headers of `initial_mode`.
    pub fn new(initial_mode: ModeId) -> Result<Self> {
        let mut binding = Self {
            catalog: &CATALOG,
            view: ResultsView::default(),
            state: BindingState::Idle,
            next_request: 1,
        };
        binding.on_mode_changed(initial_mode)?;
        Ok(binding)
    }

    /// Shows the columns of `mode_id`. Prior rows are left in place.
    pub fn on_mode_changed(&mut self, mode_id: ModeId) -> Result<()> {
        let schema = self.catalog.schema_for(mode_id)?;
        debug!("Mode changed to {}", mode_id);
        self.view.headers = schema;
        Ok(())
    }

    /// Runs the lookup for `mode_id` and renders it.
    ///
    /// On failure the previously displayed rows stay and the error is
    /// recorded in the view as well as returned.
    pub async fn on_run_requested(
        &mut self,
        dispatcher: &QueryDispatcher,
        mode_id: ModeId,
        raw_input: &str,
    ) -> Result<&ResultSet> {
        let ticket = self.begin_run(mode_id)?;
        let outcome = dispatcher.dispatch(mode_id, raw_input).await;
        self.complete_run(ticket, outcome)?;
        self.view
            .displayed
            .as_ref()
            .ok_or_else(|| ShelfError::internal("Completed run left nothing displayed"))
    }

    /// Moves to `AwaitingResult` for a run of `mode_id`.
    pub fn begin_run(&mut self, mode_id: ModeId) -> Result<RunTicket> {
        if let BindingState::AwaitingResult(pending) = self.state {
            warn!(
                "Rejecting run of mode {} while request {:?} is in flight",
                mode_id, pending.id
            );
            self.view.last_error = Some(ShelfError::Busy);
            return Err(ShelfError::Busy);
        }

        let ticket = RunTicket {
            id: RequestId(self.next_request),
            mode_id,
        };
        self.next_request += 1;
        self.state = BindingState::AwaitingResult(ticket);
        Ok(ticket)
    }

    /// Applies the outcome of the run identified by `ticket`.
    ///
    /// Outcomes for any ticket other than the one in flight are discarded,
    /// so a stale response never replaces a newer one. A dispatch failure is
    /// recorded and returned without touching the displayed rows.
    pub fn complete_run(&mut self, ticket: RunTicket, outcome: Result<ResultSet>) -> Result<()> {
        if self.state != BindingState::AwaitingResult(ticket) {
            debug!("Discarding outcome of stale request {:?}", ticket.id);
            return Ok(());
        }
        self.state = BindingState::Idle;

        match outcome {
            Ok(result) if result.mode_id == ticket.mode_id => {
                // The selector may have moved while the run was in flight.
                self.view.headers = result.columns;
                self.view.last_error = None;
                self.view.displayed = Some(result);
                Ok(())
            }
            Ok(result) => {
                let err = ShelfError::internal(format!(
                    "Run for mode {} produced rows for mode {}",
                    ticket.mode_id, result.mode_id
                ));
                self.view.last_error = Some(err.clone());
                Err(err)
            }
            Err(err) => {
                warn!("{}: {}", err.category(), err);
                self.view.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    pub fn view(&self) -> &ResultsView {
        &self.view
    }

    pub fn state(&self) -> BindingState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == BindingState::Idle
    }

    /// Clears the recorded error, e.g. once the operator edits the input.
    pub fn dismiss_error(&mut self) {
        self.view.last_error = None;
    }
}
