// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Processos-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Processos and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::{fixture, rstest};

use super::{ApiError, FilterKind, RecordTable, RecordsApi, RowState};
use crate::model::{Record, RecordFields, RecordId};

/// In-memory backend with scriptable failures and a call log, so the tests
/// can assert not only what the table shows but which calls it made.
#[derive(Default)]
struct FakeApi {
    records: Vec<Record>,
    next_id: u32,
    fail_next_update: Option<ApiError>,
    fail_next_delete: Option<ApiError>,
    calls: Vec<&'static str>,
}

impl FakeApi {
    fn seeded(rows: &[(&str, &str, &str)]) -> Self {
        let mut api = Self::default();
        for (id, pc, fornecedor) in rows.iter().copied() {
            api.records.push(record(id, pc, fornecedor));
        }
        api
    }
}

impl RecordsApi for FakeApi {
    fn list(&mut self) -> Result<Vec<Record>, ApiError> {
        self.calls.push("list");
        Ok(self.records.clone())
    }

    fn create(&mut self, fields: RecordFields) -> Result<Record, ApiError> {
        self.calls.push("create");
        self.next_id += 1;
        let created = Record::new(
            RecordId::new(format!("fake{:05}", self.next_id)).unwrap(),
            fields,
        );
        self.records.push(created.clone());
        Ok(created)
    }

    fn update(&mut self, id: &RecordId, fields: RecordFields) -> Result<Record, ApiError> {
        self.calls.push("update");
        if let Some(err) = self.fail_next_update.take() {
            return Err(err);
        }
        let record = self
            .records
            .iter_mut()
            .find(|record| &record.id == id)
            .expect("update of unknown id in test script");
        record.fields = fields;
        Ok(record.clone())
    }

    fn delete(&mut self, id: &RecordId) -> Result<(), ApiError> {
        self.calls.push("delete");
        if let Some(err) = self.fail_next_delete.take() {
            return Err(err);
        }
        self.records.retain(|record| &record.id != id);
        Ok(())
    }
}

fn record(id: &str, pc: &str, fornecedor: &str) -> Record {
    Record::new(
        RecordId::new(id).unwrap(),
        RecordFields {
            pc: pc.to_owned(),
            fornecedor: fornecedor.to_owned(),
            modalidade: "Dispensa".to_owned(),
            num_mod: "001/2024".to_owned(),
            info: String::new(),
        },
    )
}

fn transport_err() -> ApiError {
    ApiError::Transport {
        message: "connection refused".to_owned(),
    }
}

#[fixture]
fn table() -> RecordTable<FakeApi> {
    let mut table = RecordTable::new(FakeApi::seeded(&[
        ("a1", "10", "ACME"),
        ("b2", "2", "ZETA"),
        ("c3", "7", "OMEGA"),
    ]));
    table.refresh().unwrap();
    table
}

fn pcs<A: RecordsApi>(table: &RecordTable<A>) -> Vec<&str> {
    table.rows().iter().map(|row| row.record.fields.pc.as_str()).collect()
}

#[rstest]
fn refresh_sorts_rows_by_numeric_pc(table: RecordTable<FakeApi>) {
    assert_eq!(pcs(&table), vec!["2", "7", "10"]);
}

#[rstest]
fn refresh_puts_rows_with_unparseable_pc_last() {
    let mut table = RecordTable::new(FakeApi::seeded(&[
        ("a1", "sem numero", "A"),
        ("b2", "3", "B"),
        ("c3", "1", "C"),
    ]));
    table.refresh().unwrap();
    assert_eq!(pcs(&table), vec!["1", "3", "sem numero"]);
}

#[rstest]
fn begin_edit_snapshots_the_current_fields(mut table: RecordTable<FakeApi>) {
    table.begin_edit(0);
    let row = &table.rows()[0];
    assert_eq!(
        row.state,
        RowState::Editing {
            snapshot: row.record.fields.clone()
        }
    );
}

#[rstest]
fn cancel_edit_restores_the_row_exactly_and_calls_nothing(mut table: RecordTable<FakeApi>) {
    let before = table.rows()[0].clone();

    table.begin_edit(0);
    {
        let draft = table.draft_mut(0).unwrap();
        draft.pc = "999".to_owned();
        draft.fornecedor = "mangled".to_owned();
    }
    table.cancel_edit(0);

    assert_eq!(&table.rows()[0], &before);
    // Only the initial refresh hit the backend.
    assert_eq!(table.api.calls, vec!["list"]);
}

#[rstest]
fn save_edit_uppercases_fornecedor_and_leaves_edit_mode(mut table: RecordTable<FakeApi>) {
    table.begin_edit(0);
    table.draft_mut(0).unwrap().fornecedor = "acme ltda".to_owned();
    table.save_edit(0).unwrap();

    let row = &table.rows()[0];
    assert_eq!(row.state, RowState::Viewing);
    assert_eq!(row.record.fields.fornecedor, "ACME LTDA");
    // The backend saw the normalized value too.
    assert_eq!(table.api.records[1].fields.fornecedor, "ACME LTDA");
}

#[rstest]
fn save_edit_resorts_when_pc_changes(mut table: RecordTable<FakeApi>) {
    // Row 0 has pc "2"; move it past everything else.
    table.begin_edit(0);
    table.draft_mut(0).unwrap().pc = "99".to_owned();
    table.save_edit(0).unwrap();

    assert_eq!(pcs(&table), vec!["7", "10", "99"]);
}

#[rstest]
fn failed_save_rolls_back_to_the_snapshot(mut table: RecordTable<FakeApi>) {
    let before = table.rows()[0].record.clone();
    table.api.fail_next_update = Some(transport_err());

    table.begin_edit(0);
    table.draft_mut(0).unwrap().pc = "999".to_owned();
    let err = table.save_edit(0).unwrap_err();

    assert_eq!(err, transport_err());
    let row = &table.rows()[0];
    assert_eq!(row.state, RowState::Viewing);
    assert_eq!(row.record, before);
}

#[rstest]
fn draft_mut_is_none_outside_edit_mode(mut table: RecordTable<FakeApi>) {
    assert!(table.draft_mut(0).is_none());
}

#[rstest]
fn rows_can_be_edited_concurrently(mut table: RecordTable<FakeApi>) {
    table.begin_edit(0);
    table.begin_edit(2);
    table.draft_mut(0).unwrap().info = "draft a".to_owned();
    table.draft_mut(2).unwrap().info = "draft b".to_owned();

    // Cancelling one row leaves the other draft untouched.
    table.cancel_edit(0);
    assert!(!table.rows()[0].is_editing());
    assert_eq!(table.rows()[0].record.fields.info, "");
    assert!(table.rows()[2].is_editing());
    assert_eq!(table.rows()[2].record.fields.info, "draft b");
}

#[rstest]
fn begin_edit_twice_keeps_the_original_snapshot(mut table: RecordTable<FakeApi>) {
    let before = table.rows()[0].record.fields.clone();

    table.begin_edit(0);
    table.draft_mut(0).unwrap().pc = "999".to_owned();
    table.begin_edit(0);
    table.cancel_edit(0);

    assert_eq!(table.rows()[0].record.fields, before);
}

#[rstest]
fn create_rejects_blank_pc_before_any_call(mut table: RecordTable<FakeApi>) {
    let err = table
        .create(RecordFields {
            pc: "   ".to_owned(),
            ..RecordFields::default()
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::Rejected { .. }));
    assert_eq!(table.api.calls, vec!["list"]);
}

#[rstest]
fn create_normalizes_fornecedor_and_refreshes(mut table: RecordTable<FakeApi>) {
    table
        .create(RecordFields {
            pc: "5".to_owned(),
            fornecedor: "nova ltda".to_owned(),
            ..RecordFields::default()
        })
        .unwrap();

    assert_eq!(pcs(&table), vec!["2", "5", "7", "10"]);
    let created = table
        .rows()
        .iter()
        .find(|row| row.record.fields.pc == "5")
        .unwrap();
    assert_eq!(created.record.fields.fornecedor, "NOVA LTDA");
}

#[rstest]
fn request_delete_only_marks_the_record(mut table: RecordTable<FakeApi>) {
    table.request_delete(0);

    assert_eq!(table.pending_delete().unwrap().as_str(), "b2");
    assert_eq!(table.rows().len(), 3);
    assert_eq!(table.api.calls, vec!["list"]);
}

#[rstest]
fn confirm_delete_removes_the_marked_record(mut table: RecordTable<FakeApi>) {
    table.request_delete(0);
    table.confirm_delete().unwrap();

    assert!(table.pending_delete().is_none());
    assert_eq!(pcs(&table), vec!["7", "10"]);
}

#[rstest]
fn failed_confirm_still_closes_the_confirmation(mut table: RecordTable<FakeApi>) {
    table.api.fail_next_delete = Some(transport_err());
    table.request_delete(0);

    let err = table.confirm_delete().unwrap_err();
    assert_eq!(err, transport_err());
    assert!(table.pending_delete().is_none());
    assert_eq!(table.rows().len(), 3);
}

#[rstest]
fn dismiss_delete_clears_the_mark_without_calls(mut table: RecordTable<FakeApi>) {
    table.request_delete(1);
    table.dismiss_delete();

    assert!(table.pending_delete().is_none());
    assert_eq!(table.rows().len(), 3);
    assert_eq!(table.api.calls, vec!["list"]);
}

#[rstest]
fn confirm_with_nothing_pending_is_a_no_op(mut table: RecordTable<FakeApi>) {
    table.confirm_delete().unwrap();
    assert_eq!(table.api.calls, vec!["list"]);
}

#[rstest]
fn substring_filter_is_case_insensitive_across_all_fields(mut table: RecordTable<FakeApi>) {
    table.set_filter("omega", FilterKind::Substring);
    assert_eq!(table.visible_rows(), vec![1]);

    // Matches in non-fornecedor columns count too.
    table.set_filter("001/2024", FilterKind::Substring);
    assert_eq!(table.visible_rows(), vec![0, 1, 2]);
}

#[rstest]
fn empty_filter_shows_every_row(table: RecordTable<FakeApi>) {
    assert_eq!(table.visible_rows(), vec![0, 1, 2]);
    assert!(!table.shows_empty_filter_state());
}

#[rstest]
fn empty_state_requires_rows_that_are_all_hidden(mut table: RecordTable<FakeApi>) {
    table.set_filter("nothing matches this", FilterKind::Substring);
    assert!(table.visible_rows().is_empty());
    assert!(table.shows_empty_filter_state());
}

#[rstest]
fn empty_table_is_not_an_empty_filter_state() {
    let mut table = RecordTable::new(FakeApi::default());
    table.refresh().unwrap();
    table.set_filter("anything", FilterKind::Substring);
    assert!(!table.shows_empty_filter_state());
}

#[rstest]
fn fuzzy_score_matches_short_needles_inside_long_rows() {
    let row_text = "7 omega dispensa 001/2024 material de escritório";

    // A whole-string ratio would dilute a five-character query against
    // this much text to well under the cutoff; the windowed score keeps
    // the comparison local to the stretch the query resembles.
    assert!(super::fuzzy_score("omgea", row_text) >= super::FUZZY_MIN_SCORE);
    assert!(super::fuzzy_score("xyzqw", row_text) < super::FUZZY_MIN_SCORE);

    // Needle longer than the haystack falls back to a plain ratio.
    assert!(super::fuzzy_score("omega!", "omega") >= super::FUZZY_MIN_SCORE);
}

#[rstest]
fn fuzzy_filter_tolerates_typos(mut table: RecordTable<FakeApi>) {
    table.set_filter("omgea", FilterKind::Fuzzy);
    assert_eq!(table.visible_rows(), vec![1]);

    table.set_filter("omgea", FilterKind::Substring);
    assert!(table.visible_rows().is_empty());
}
