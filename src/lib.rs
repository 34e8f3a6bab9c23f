// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Processos-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Processos and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Processos — process-record management over a JSON file store.
//!
//! One binary serves the HTTP CRUD API and the interactive TUI against the
//! same in-process service.

pub mod api;
pub mod model;
pub mod service;
pub mod store;
pub mod tui;
pub mod ui;

#[cfg(test)]
mod tests {
    #[test]
    fn sanity() {
        assert_eq!(2 + 2, 4);
    }
}
