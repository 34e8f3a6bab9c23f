// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Processos-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Processos and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence for the process document on disk.
//!
//! The store module reads/writes the single JSON document used by both the
//! HTTP API and the TUI.

pub mod json_file;

pub use json_file::{JsonFileStore, StoreError, WriteDurability};
