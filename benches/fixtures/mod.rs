// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Processos-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Processos and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use processos::model::{Document, Record, RecordFields, RecordId};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    pub fn new(prefix: &str) -> Self {
        let pid = std::process::id();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);

        let mut path = std::env::temp_dir();
        path.push(format!("processos_bench_{prefix}_{pid}_{nanos}_{counter}"));
        std::fs::create_dir_all(&path).expect("create temp dir");

        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

const FORNECEDORES: [&str; 8] = [
    "ACME LTDA",
    "ZETA COMERCIO",
    "OMEGA SERVICOS",
    "DELTA ENGENHARIA",
    "SIGMA ALIMENTOS",
    "GAMA TRANSPORTES",
    "KAPPA PAPELARIA",
    "LAMBDA INFORMATICA",
];

const MODALIDADES: [&str; 4] = ["Dispensa", "Pregão Eletrônico", "Inexigibilidade", "Concorrência"];

#[derive(Debug, Clone, Copy)]
pub enum Case {
    Small,
    Medium,
    Large,
}

impl Case {
    fn record_count(self) -> u32 {
        match self {
            Self::Small => 10,
            Self::Medium => 200,
            Self::Large => 2_000,
        }
    }
}

fn record(idx: u32) -> Record {
    let id = RecordId::new(format!("bench{idx:04}")).expect("valid record id");
    Record::new(
        id,
        RecordFields {
            pc: (idx + 1).to_string(),
            fornecedor: FORNECEDORES[idx as usize % FORNECEDORES.len()].to_owned(),
            modalidade: MODALIDADES[idx as usize % MODALIDADES.len()].to_owned(),
            num_mod: format!("{:03}/2024", idx % 500 + 1),
            info: format!("processo administrativo {idx}"),
        },
    )
}

pub fn records(case: Case) -> Vec<Record> {
    (0..case.record_count()).map(record).collect()
}

pub fn document(case: Case) -> Document {
    Document {
        processos: records(case),
    }
}

pub fn checksum_document(document: &Document) -> u64 {
    let mut acc = 0u64;
    for record in &document.processos {
        acc = acc.wrapping_mul(131).wrapping_add(record.id.as_str().len() as u64);
        acc = acc.wrapping_mul(131).wrapping_add(record.fields.pc.len() as u64);
        acc = acc.wrapping_mul(131).wrapping_add(record.fields.fornecedor.len() as u64);
        acc = acc.wrapping_mul(131).wrapping_add(record.fields.info.len() as u64);
    }
    acc
}
