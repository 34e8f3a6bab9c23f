// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Processos-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Processos and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Client-side table controller.
//!
//! Owns the record rows, the per-row edit state machine, the pending-delete
//! confirmation and the filter view. Deliberately free of any rendering so
//! the whole state machine is testable without a terminal; the `tui` module
//! maps key events onto these operations and draws the result.

use std::fmt;

use crate::model::{sort_by_pc, Record, RecordFields, RecordId};

/// Minimum windowed `ratio` score for a fuzzy filter hit.
const FUZZY_MIN_SCORE: f64 = 0.70;

/// Best `ratio` of the needle against every needle-length window of the
/// haystack. A row's concatenated text is much longer than a typical query,
/// so scoring against the whole of it would drown every match; windowing
/// scores the query against the stretch of text it actually resembles.
fn fuzzy_score(needle: &str, haystack: &str) -> f64 {
    let hay: Vec<char> = haystack.chars().collect();
    let window = needle.chars().count();
    if window == 0 || hay.len() <= window {
        return rapidfuzz::fuzz::ratio(needle.chars(), hay.iter().copied());
    }
    hay.windows(window)
        .map(|slice| rapidfuzz::fuzz::ratio(needle.chars(), slice.iter().copied()))
        .fold(0.0, f64::max)
}

/// Error surface the controller sees from its backend. The controller only
/// distinguishes "the input was rejected" from "the call itself failed";
/// both roll the row back, the message ends up in a toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    Rejected { message: String },
    Transport { message: String },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected { message } => write!(f, "rejected: {message}"),
            Self::Transport { message } => write!(f, "request failed: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// What the controller needs from the backend. The binary plugs in the
/// in-process service; tests plug in a scripted fake.
pub trait RecordsApi {
    fn list(&mut self) -> Result<Vec<Record>, ApiError>;
    fn create(&mut self, fields: RecordFields) -> Result<Record, ApiError>;
    fn update(&mut self, id: &RecordId, fields: RecordFields) -> Result<Record, ApiError>;
    fn delete(&mut self, id: &RecordId) -> Result<(), ApiError>;
}

/// Per-row mode. `Editing` keeps the pre-edit field values so cancel and
/// failed saves can restore the row exactly; the draft being edited lives in
/// the row's record itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowState {
    Viewing,
    Editing { snapshot: RecordFields },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub record: Record,
    pub state: RowState,
}

impl Row {
    fn new(record: Record) -> Self {
        Self {
            record,
            state: RowState::Viewing,
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, RowState::Editing { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterKind {
    #[default]
    Substring,
    Fuzzy,
}

pub struct RecordTable<A: RecordsApi> {
    api: A,
    rows: Vec<Row>,
    filter: String,
    filter_kind: FilterKind,
    pending_delete: Option<RecordId>,
}

impl<A: RecordsApi> RecordTable<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            rows: Vec::new(),
            filter: String::new(),
            filter_kind: FilterKind::default(),
            pending_delete: None,
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn api_mut(&mut self) -> &mut A {
        &mut self.api
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn filter_kind(&self) -> FilterKind {
        self.filter_kind
    }

    pub fn pending_delete(&self) -> Option<&RecordId> {
        self.pending_delete.as_ref()
    }

    /// Reloads all rows from the backend, sorted by numeric `pc`. Every row
    /// comes back in `Viewing`; a pending delete survives only if its record
    /// still exists.
    pub fn refresh(&mut self) -> Result<(), ApiError> {
        let mut records = self.api.list()?;
        sort_by_pc(&mut records);
        self.rows = records.into_iter().map(Row::new).collect();

        if let Some(id) = self.pending_delete.take() {
            if self.position_of(&id).is_some() {
                self.pending_delete = Some(id);
            }
        }
        Ok(())
    }

    fn position_of(&self, id: &RecordId) -> Option<usize> {
        self.rows.iter().position(|row| &row.record.id == id)
    }

    /// Puts the row into edit mode, snapshotting its current fields. A row
    /// already being edited keeps its original snapshot.
    pub fn begin_edit(&mut self, index: usize) {
        let Some(row) = self.rows.get_mut(index) else {
            return;
        };
        if row.is_editing() {
            return;
        }
        row.state = RowState::Editing {
            snapshot: row.record.fields.clone(),
        };
    }

    /// Mutable access to the draft of a row in edit mode.
    pub fn draft_mut(&mut self, index: usize) -> Option<&mut RecordFields> {
        let row = self.rows.get_mut(index)?;
        if row.is_editing() {
            Some(&mut row.record.fields)
        } else {
            None
        }
    }

    /// Discards the draft and restores the snapshot. No backend call is
    /// made; the row is exactly as it was before `begin_edit`.
    pub fn cancel_edit(&mut self, index: usize) {
        let Some(row) = self.rows.get_mut(index) else {
            return;
        };
        if let RowState::Editing { snapshot } = std::mem::replace(&mut row.state, RowState::Viewing)
        {
            row.record.fields = snapshot;
        }
    }

    /// Submits the draft. `fornecedor` is upper-cased before the call. On
    /// success the row shows what the backend returned; on failure it rolls
    /// back to the snapshot. Either way the row leaves edit mode.
    pub fn save_edit(&mut self, index: usize) -> Result<(), ApiError> {
        let (id, snapshot, draft) = {
            let Some(row) = self.rows.get_mut(index) else {
                return Ok(());
            };
            let RowState::Editing { snapshot } =
                std::mem::replace(&mut row.state, RowState::Viewing)
            else {
                return Ok(());
            };
            let mut draft = row.record.fields.clone();
            draft.normalize_fornecedor();
            (row.record.id.clone(), snapshot, draft)
        };

        match self.api.update(&id, draft) {
            Ok(updated) => {
                if let Some(row) = self.rows.get_mut(index) {
                    row.record = updated;
                }
                self.resort();
                Ok(())
            }
            Err(err) => {
                if let Some(row) = self.rows.get_mut(index) {
                    row.record.fields = snapshot;
                }
                Err(err)
            }
        }
    }

    /// Creates a record from the add form. `pc` is checked here so an empty
    /// form never reaches the backend; `fornecedor` is upper-cased. The
    /// caller keeps the form contents on failure.
    pub fn create(&mut self, mut fields: RecordFields) -> Result<(), ApiError> {
        if fields.pc.trim().is_empty() {
            return Err(ApiError::Rejected {
                message: "pc is required".to_owned(),
            });
        }
        fields.normalize_fornecedor();

        self.api.create(fields)?;
        self.refresh()
    }

    /// First step of the two-step delete: remembers which record the user
    /// asked to remove. Nothing is deleted yet.
    pub fn request_delete(&mut self, index: usize) {
        if let Some(row) = self.rows.get(index) {
            self.pending_delete = Some(row.record.id.clone());
        }
    }

    /// Second step: performs the delete. The pending state is cleared before
    /// the call, so the confirmation closes even when the backend fails.
    pub fn confirm_delete(&mut self) -> Result<(), ApiError> {
        let Some(id) = self.pending_delete.take() else {
            return Ok(());
        };
        self.api.delete(&id)?;
        self.refresh()
    }

    /// Backs out of the confirmation without touching the backend.
    pub fn dismiss_delete(&mut self) {
        self.pending_delete = None;
    }

    pub fn set_filter(&mut self, filter: impl Into<String>, kind: FilterKind) {
        self.filter = filter.into();
        self.filter_kind = kind;
    }

    pub fn clear_filter(&mut self) {
        self.filter.clear();
    }

    /// Indices of rows the current filter lets through, in display order.
    /// An empty filter shows everything.
    pub fn visible_rows(&self) -> Vec<usize> {
        if self.filter.is_empty() {
            return (0..self.rows.len()).collect();
        }

        let needle = self.filter.to_lowercase();
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| {
                let haystack = row.record.fields.concatenated_text().to_lowercase();
                match self.filter_kind {
                    FilterKind::Substring => haystack.contains(&needle),
                    FilterKind::Fuzzy => fuzzy_score(&needle, &haystack) >= FUZZY_MIN_SCORE,
                }
            })
            .map(|(index, _)| index)
            .collect()
    }

    /// True when the table has rows but the filter hides them all. An empty
    /// table is not a "no results" situation.
    pub fn shows_empty_filter_state(&self) -> bool {
        !self.rows.is_empty() && self.visible_rows().is_empty()
    }

    fn resort(&mut self) {
        // Stable sort on records; row states travel with their records.
        self.rows.sort_by_key(|row| {
            let key = crate::model::pc_sort_key(&row.record.fields.pc);
            (key.is_none(), key.unwrap_or(0))
        });
    }
}

#[cfg(test)]
mod tests;
