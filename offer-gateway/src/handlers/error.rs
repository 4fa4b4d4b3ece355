// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use offer_policy::access::AccessError;
use offer_policy::record::RecordViolation;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::store::StoreError;

/// Errors surfaced by the `/api` handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Invalid query: {0}")]
    Query(#[from] RecordViolation),

    #[error("Invalid payload: {0}")]
    Payload(String),

    #[error("Failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Payload(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Query(RecordViolation::new("query", &rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Query(RecordViolation::new("offer_id", &rejection.body_text()))
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    violations: Vec<RecordViolation>,
}

impl ApiError {
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Store(StoreError::NotFound { .. }) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::Store(StoreError::Validation(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "validation_error")
            }
            ApiError::Store(StoreError::Transient(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "transient_failure")
            }
            ApiError::Store(StoreError::Config(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "configuration_error")
            }
            ApiError::Access(_) => (StatusCode::FORBIDDEN, "access_denied"),
            ApiError::Query(_) => (StatusCode::BAD_REQUEST, "invalid_query"),
            ApiError::Payload(_) => (StatusCode::BAD_REQUEST, "invalid_payload"),
            ApiError::Encode(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();

        if status.is_server_error() {
            error!(error = %self, kind, "Request failed");
        } else {
            warn!(error = %self, kind, "Request rejected");
        }

        let violations = match &self {
            ApiError::Store(StoreError::Validation(v)) => v.clone(),
            ApiError::Query(v) => vec![v.clone()],
            _ => Vec::new(),
        };

        let body = ErrorBody {
            error: kind,
            message: self.to_string(),
            violations,
        };
        (status, Json(body)).into_response()
    }
}
