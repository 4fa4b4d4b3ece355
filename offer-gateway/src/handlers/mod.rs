// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
mod directory;
mod error;
mod health;
mod metrics;
mod offers;

use axum::{middleware, routing::get, Router};
use offer_policy::access::{filter_record_for_role, AccessContext};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::auth::role_middleware;
use crate::metrics::Metrics;
use crate::store::{OfferStore, StoreError};

pub use directory::{list_buyers, list_publishers, offer_stats, permissions};
pub use error::ApiError;
pub use health::{health_live, health_ready, health_startup, HealthState};
pub use metrics::{metrics_handler, MetricsState};
pub use offers::{create_offer, delete_offer, get_offer, list_offers, update_offer};

/// Shared state for the `/api` handlers.
#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<dyn OfferStore>,
    pub metrics: Metrics,
}

impl ApiState {
    pub fn new(store: Arc<dyn OfferStore>, metrics: Metrics) -> Self {
        Self { store, metrics }
    }

    /// Count store failures before they become HTTP errors.
    fn observe<T>(&self, result: Result<T, StoreError>) -> Result<T, ApiError> {
        result.map_err(|e| {
            self.metrics.record_store_error(e.kind());
            ApiError::from(e)
        })
    }

    /// Serialize and redact one record for the caller.
    fn redact<T: Serialize>(&self, context: &AccessContext, record: &T) -> Result<Value, ApiError> {
        let value = filter_record_for_role(record, context.role)?;
        self.metrics.record_redactions(context.role.as_str(), 1);
        Ok(value)
    }
}

/// Routes under `/api`, all behind the role middleware.
pub fn api_router(state: ApiState) -> Router {
    Router::new()
        .route("/api/offers", get(list_offers).post(create_offer))
        .route(
            "/api/offers/:offer_id",
            get(get_offer).patch(update_offer).delete(delete_offer),
        )
        .route("/api/buyers", get(list_buyers))
        .route("/api/publishers", get(list_publishers))
        .route("/api/stats", get(offer_stats))
        .route("/api/permissions", get(permissions))
        .route_layer(middleware::from_fn(role_middleware))
        .with_state(state)
}
