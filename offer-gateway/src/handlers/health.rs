// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared state for health endpoints.
#[derive(Clone)]
pub struct HealthState {
    /// Store reachability, published by the health checker
    pub store_healthy: Arc<AtomicBool>,
    /// Flag indicating if we're shutting down
    pub shutting_down: Arc<AtomicBool>,
    /// Store backend name
    pub backend: &'static str,
}

/// Health check response body.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    store: Option<StoreStatus>,
}

#[derive(Serialize)]
struct StoreStatus {
    backend: &'static str,
    status: &'static str,
}

/// Liveness probe. Always 200 while the process runs.
///
/// # Endpoint
/// `GET /health/live`
pub async fn health_live() -> Response {
    let response = HealthResponse {
        status: "ok",
        store: None,
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// Readiness probe.
///
/// Returns 503 while shutting down or while the store is unreachable:
/// every `/api` route needs it.
///
/// # Endpoint
/// `GET /health/ready`
pub async fn health_ready(State(state): State<HealthState>) -> Response {
    if state.shutting_down.load(Ordering::SeqCst) {
        let response = HealthResponse {
            status: "shutting_down",
            store: None,
        };
        return (StatusCode::SERVICE_UNAVAILABLE, Json(response)).into_response();
    }

    let store_healthy = state.store_healthy.load(Ordering::SeqCst);
    let response = HealthResponse {
        status: if store_healthy { "ok" } else { "degraded" },
        store: Some(StoreStatus {
            backend: state.backend,
            status: if store_healthy { "healthy" } else { "unhealthy" },
        }),
    };

    let code = if store_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(response)).into_response()
}

/// Startup probe. The store is built before the listener binds, so this
/// matches liveness.
///
/// # Endpoint
/// `GET /health/startup`
pub async fn health_startup() -> Response {
    let response = HealthResponse {
        status: "ok",
        store: None,
    };
    (StatusCode::OK, Json(response)).into_response()
}
