//! Load lifecycle: one suspension point, last-load-wins.
//!
//! A load has exactly one asynchronous gap, between "file selected" and
//! "bytes available". `begin_load` marks the gap and hands back a ticket;
//! once the caller has decoded and built the model, `complete` swaps it in
//! atomically. Tickets carry monotonically increasing generations, so when
//! loads overlap only the most recent one lands; everything older is
//! discarded as stale.

use crate::field::Field;
use crate::search;
use crate::selection::{SelectAllState, Selection};
use crate::table::{Row, TableModel};

/// Ticket for an in-flight load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

/// What `complete` did with a finished load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The model was installed and the selection reset.
    Installed,
    /// Decoding failed; the previous model is untouched. Carries the
    /// user-visible message.
    Failed(String),
    /// A newer load superseded this one; the result was discarded.
    Stale,
}

/// Session state around the currently loaded model.
///
/// Decode → normalize → build run synchronously on the caller's side of
/// the suspension point; `complete` only installs the finished model, so
/// no partial model is ever observable. The accessors below are the whole
/// surface the rendering layer may read.
#[derive(Debug, Default)]
pub struct LoadSession {
    model: TableModel,
    selection: Selection,
    source_name: Option<String>,
    pending_name: Option<String>,
    next_generation: u64,
    current: Option<u64>,
}

impl LoadSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the suspension point: a file was chosen, bytes are pending.
    ///
    /// Calling again before the previous load completes supersedes it.
    pub fn begin_load(&mut self, source_name: &str) -> LoadTicket {
        self.next_generation += 1;
        self.current = Some(self.next_generation);
        self.pending_name = Some(source_name.to_string());
        LoadTicket {
            generation: self.next_generation,
        }
    }

    /// Install a finished load, unless a newer one superseded it.
    ///
    /// On success the previous model and selection are replaced wholesale.
    /// On failure the previous model stays untouched. Stale results are
    /// discarded without touching anything.
    pub fn complete(
        &mut self,
        ticket: LoadTicket,
        result: Result<TableModel, String>,
    ) -> LoadOutcome {
        if self.current != Some(ticket.generation) {
            return LoadOutcome::Stale;
        }
        self.current = None;

        match result {
            Ok(model) => {
                self.model = model;
                self.selection.clear();
                self.source_name = self.pending_name.take();
                LoadOutcome::Installed
            }
            Err(message) => {
                self.pending_name = None;
                LoadOutcome::Failed(message)
            }
        }
    }

    /// True between `begin_load` and the matching `complete`.
    pub fn load_in_progress(&self) -> bool {
        self.current.is_some()
    }

    pub fn model(&self) -> &TableModel {
        &self.model
    }

    pub fn columns(&self) -> &[Field] {
        &self.model.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.model.rows
    }

    /// Rows matching `query`, recomputed on every call.
    pub fn filtered_rows(&self, query: &str) -> Vec<&Row> {
        search::filter_rows(&self.model, query)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    /// Tri-state flag for the select-all control, derived on each read.
    pub fn select_all_state(&self) -> SelectAllState {
        self.selection.state(self.model.row_count())
    }

    /// Toggle the select-all control over the loaded rows.
    pub fn toggle_all(&mut self) {
        let universe = self.model.row_ids();
        self.selection.toggle_all(&universe);
    }

    /// Name of the currently loaded file, if any load succeeded.
    pub fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }
}
