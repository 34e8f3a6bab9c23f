// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Processos-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Processos and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! CRUD semantics over the process document.
//!
//! Every mutating operation is one load -> mutate-in-memory -> save unit;
//! there is no finer-grained persistence. Callers are expected to serialize
//! access (the binary shares one service behind a mutex).

use std::fmt;

use rand::Rng;

use crate::model::{Document, Record, RecordFields, RecordId};
use crate::store::{JsonFileStore, StoreError};

const RECORD_ID_LEN: usize = 9;
const RECORD_ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Upper bound on id-minting attempts. The id space is vast relative to any
/// plausible record count, so hitting this means the RNG is broken rather
/// than the store being full.
const RECORD_ID_MAX_ATTEMPTS: usize = 64;

#[derive(Debug)]
pub enum ServiceError {
    MissingPc,
    NotFound { id: RecordId },
    IdSpaceExhausted { attempts: usize },
    Store(StoreError),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingPc => f.write_str("pc is required to create a record"),
            Self::NotFound { id } => write!(f, "no record with id {id}"),
            Self::IdSpaceExhausted { attempts } => {
                write!(f, "could not mint a unique record id after {attempts} attempts")
            }
            Self::Store(source) => write!(f, "storage failure: {source}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(source) => Some(source),
            _ => None,
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(source: StoreError) -> Self {
        Self::Store(source)
    }
}

#[derive(Debug, Clone)]
pub struct RecordService {
    store: JsonFileStore,
}

impl RecordService {
    pub fn new(store: JsonFileStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &JsonFileStore {
        &self.store
    }

    /// Returns all records in stored order. Clients re-sort by `pc`.
    pub fn list(&self) -> Result<Vec<Record>, ServiceError> {
        Ok(self.store.load_or_init()?.processos)
    }

    /// Appends a new record with a freshly minted id and persists the
    /// document. `fornecedor` is stored verbatim; normalization happens on
    /// the client before submission.
    pub fn create(&self, fields: RecordFields) -> Result<Record, ServiceError> {
        if fields.pc.trim().is_empty() {
            return Err(ServiceError::MissingPc);
        }

        let mut document = self.store.load_or_init()?;
        let id = mint_record_id(&document)?;
        let record = Record::new(id, fields);
        document.processos.push(record.clone());
        self.store.save(&document)?;
        Ok(record)
    }

    /// Replaces the full field set of the record with matching id. Partial
    /// updates are not supported; the id is preserved.
    pub fn update(&self, id: &RecordId, fields: RecordFields) -> Result<Record, ServiceError> {
        let mut document = self.store.load_or_init()?;
        let Some(record) = document.processos.iter_mut().find(|record| &record.id == id) else {
            return Err(ServiceError::NotFound { id: id.clone() });
        };

        record.fields = fields;
        let updated = record.clone();
        self.store.save(&document)?;
        Ok(updated)
    }

    pub fn delete(&self, id: &RecordId) -> Result<(), ServiceError> {
        let mut document = self.store.load_or_init()?;
        let before = document.processos.len();
        document.processos.retain(|record| &record.id != id);
        if document.processos.len() == before {
            return Err(ServiceError::NotFound { id: id.clone() });
        }

        self.store.save(&document)?;
        Ok(())
    }
}

/// Mints a random base-36 id, collision-checked against every existing id.
/// Retries are bounded; exhaustion surfaces as an error instead of looping.
fn mint_record_id(document: &Document) -> Result<RecordId, ServiceError> {
    let mut rng = rand::rng();

    for _ in 0..RECORD_ID_MAX_ATTEMPTS {
        let candidate: String = (0..RECORD_ID_LEN)
            .map(|_| RECORD_ID_ALPHABET[rng.random_range(0..RECORD_ID_ALPHABET.len())] as char)
            .collect();

        if document.processos.iter().any(|record| record.id.as_str() == candidate) {
            continue;
        }

        return Ok(RecordId::new(candidate).expect("generated record id is a valid id segment"));
    }

    Err(ServiceError::IdSpaceExhausted {
        attempts: RECORD_ID_MAX_ATTEMPTS,
    })
}
