// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
use crate::metrics::Metrics;
use axum::{extract::State, http::header, response::IntoResponse};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// State for the scrape endpoint.
#[derive(Clone)]
pub struct MetricsState {
    pub metrics: Metrics,
    /// Store reachability, published by the health checker
    pub store_healthy: Arc<AtomicBool>,
    pub backend: &'static str,
}

/// Prometheus metrics endpoint.
///
/// Refreshes the store health gauge, then returns metrics in Prometheus
/// text format.
///
/// # Endpoint
/// `GET /metrics`
pub async fn metrics_handler(State(state): State<MetricsState>) -> impl IntoResponse {
    state
        .metrics
        .set_store_health(state.backend, state.store_healthy.load(Ordering::SeqCst));

    (
        [(
            header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        state.metrics.encode(),
    )
}
