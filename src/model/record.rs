// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Processos-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Processos and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

use crate::model::RecordId;

/// The full mutable field set of a process record, i.e. a record minus its id.
///
/// This is the shape of create/update request bodies and of per-row edit
/// snapshots. All fields default to the empty string so partial JSON bodies
/// behave like the original form inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFields {
    #[serde(default)]
    pub pc: String,
    #[serde(default)]
    pub fornecedor: String,
    #[serde(default)]
    pub modalidade: String,
    #[serde(rename = "numMod", default)]
    pub num_mod: String,
    #[serde(default)]
    pub info: String,
}

impl RecordFields {
    /// Upper-cases `fornecedor` in place.
    ///
    /// Normalization is a client responsibility applied at exactly two
    /// points (add form submit and row edit save); the service stores field
    /// values verbatim.
    pub fn normalize_fornecedor(&mut self) {
        self.fornecedor = self.fornecedor.to_uppercase();
    }

    /// Concatenated display text of the row, used by the substring filter.
    pub fn concatenated_text(&self) -> String {
        [
            self.pc.as_str(),
            self.fornecedor.as_str(),
            self.modalidade.as_str(),
            self.num_mod.as_str(),
            self.info.as_str(),
        ]
        .join(" ")
    }
}

/// One process entry as persisted and served.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    #[serde(flatten)]
    pub fields: RecordFields,
}

impl Record {
    pub fn new(id: RecordId, fields: RecordFields) -> Self {
        Self { id, fields }
    }
}

/// The single persisted JSON document: one ordered record sequence under a
/// fixed key, nothing else.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub processos: Vec<Record>,
}

impl Document {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// `parseInt`-style leading-integer parse of a `pc` value.
///
/// Leading whitespace is skipped, an optional sign is honored, and parsing
/// stops at the first non-digit. Returns `None` when no digits are found.
pub fn pc_sort_key(pc: &str) -> Option<i64> {
    let trimmed = pc.trim_start();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let mut value: i64 = 0;
    let mut seen = false;
    for ch in digits.chars() {
        let Some(digit) = ch.to_digit(10) else {
            break;
        };
        seen = true;
        value = value.saturating_mul(10).saturating_add(i64::from(digit));
    }

    if !seen {
        return None;
    }
    Some(if negative { -value } else { value })
}

/// Stable sort by the numeric value of `pc`; records without a parseable
/// integer sort after numeric ones, keeping their stored order.
pub fn sort_by_pc(records: &mut [Record]) {
    records.sort_by_key(|record| {
        let key = pc_sort_key(&record.fields.pc);
        (key.is_none(), key.unwrap_or(0))
    });
}
