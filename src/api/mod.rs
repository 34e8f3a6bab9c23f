// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Processos-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Processos and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! HTTP CRUD surface over the record service.
//!
//! JSON in/out on `/processes`; errors map to status codes plus an
//! `{"error": ...}` body. Storage failures are logged and answered with 500
//! instead of crashing the process.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::model::{RecordFields, RecordId};
use crate::service::{RecordService, ServiceError};

#[derive(Clone)]
pub struct ApiState {
    pub service: Arc<Mutex<RecordService>>,
}

impl ApiState {
    pub fn new(service: RecordService) -> Self {
        Self {
            service: Arc::new(Mutex::new(service)),
        }
    }
}

/// Builds the complete `/processes` router.
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/processes", get(list_processes).post(create_process))
        .route("/processes/{id}", put(update_process).delete(delete_process))
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

fn service_error_response(operation: &str, err: ServiceError) -> Response {
    match &err {
        ServiceError::MissingPc => error_response(StatusCode::BAD_REQUEST, err.to_string()),
        ServiceError::NotFound { .. } => error_response(StatusCode::NOT_FOUND, err.to_string()),
        ServiceError::IdSpaceExhausted { .. } | ServiceError::Store(_) => {
            eprintln!("processos: {operation} failed: {err}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

async fn list_processes(State(state): State<ApiState>) -> Response {
    let service = state.service.lock().await;
    match service.list() {
        Ok(records) => Json(records).into_response(),
        Err(err) => service_error_response("list", err),
    }
}

async fn create_process(
    State(state): State<ApiState>,
    Json(fields): Json<RecordFields>,
) -> Response {
    let service = state.service.lock().await;
    match service.create(fields) {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(err) => service_error_response("create", err),
    }
}

async fn update_process(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(fields): Json<RecordFields>,
) -> Response {
    let id = match RecordId::new(id) {
        Ok(id) => id,
        // An id that fails segment validation cannot name any stored record.
        Err(err) => return error_response(StatusCode::NOT_FOUND, format!("invalid id: {err}")),
    };

    let service = state.service.lock().await;
    match service.update(&id, fields) {
        Ok(record) => Json(record).into_response(),
        Err(err) => service_error_response("update", err),
    }
}

async fn delete_process(State(state): State<ApiState>, Path(id): Path<String>) -> Response {
    let id = match RecordId::new(id) {
        Ok(id) => id,
        Err(err) => return error_response(StatusCode::NOT_FOUND, format!("invalid id: {err}")),
    };

    let service = state.service.lock().await;
    match service.delete(&id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => service_error_response("delete", err),
    }
}
