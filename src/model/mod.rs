// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Processos-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Processos and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A document holds the ordered sequence of process records persisted as one
//! JSON object.

pub mod ids;
pub mod record;

pub use ids::{Id, IdError, RecordId};
pub use record::{pc_sort_key, sort_by_pc, Document, Record, RecordFields};
