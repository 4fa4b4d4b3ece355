// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
//! Persistence Gateway
//!
//! CRUD contract over offers, buyers and publishers, with two backends:
//! - `InMemoryStore`: process-local tables, optionally seeded from YAML
//! - `PostgrestStore`: the hosted database's REST interface
//!
//! Calls are single-flight: no retry, no cache, no cancellation.

pub mod memory;
pub mod postgrest;
pub mod query;

use async_trait::async_trait;
use offer_policy::record::{
    Buyer, NewOffer, Offer, OfferPatch, OfferStats, Publisher, RecordViolation,
};
use thiserror::Error;

pub use memory::InMemoryStore;
pub use postgrest::{PostgrestConfig, PostgrestStore};
pub use query::{OfferPage, OfferQuery};

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} not found: {key}")]
    NotFound { kind: &'static str, key: String },

    #[error("Validation failed ({} violation(s))", .0.len())]
    Validation(Vec<RecordViolation>),

    #[error("Store unavailable: {0}")]
    Transient(String),

    #[error("Invalid store configuration: {0}")]
    Config(String),
}

impl StoreError {
    pub fn offer_not_found(offer_id: &str) -> Self {
        StoreError::NotFound {
            kind: "offer",
            key: offer_id.to_string(),
        }
    }

    /// Short machine-readable kind, used for metrics labels and error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::NotFound { .. } => "not_found",
            StoreError::Validation(_) => "validation_error",
            StoreError::Transient(_) => "transient_failure",
            StoreError::Config(_) => "configuration_error",
        }
    }
}

// =============================================================================
// Store Trait
// =============================================================================

/// Record storage used by the HTTP handlers.
///
/// Implementations must be thread-safe (Send + Sync); handlers share one
/// instance behind an `Arc`.
#[async_trait]
pub trait OfferStore: Send + Sync {
    /// Backend name for logs and metrics.
    fn backend(&self) -> &'static str;

    /// All offers joined with their buyer, newest first.
    async fn list_offers(&self) -> Result<Vec<Offer>, StoreError>;

    /// One offer by business key, joined with its buyer.
    async fn get_offer(&self, offer_id: &str) -> Result<Offer, StoreError>;

    async fn create_offer(&self, offer: NewOffer) -> Result<Offer, StoreError>;

    async fn update_offer(&self, offer_id: &str, patch: OfferPatch) -> Result<Offer, StoreError>;

    async fn delete_offer(&self, offer_id: &str) -> Result<(), StoreError>;

    /// Buyers ordered by name.
    async fn list_buyers(&self) -> Result<Vec<Buyer>, StoreError>;

    /// Publishers ordered by name.
    async fn list_publishers(&self) -> Result<Vec<Publisher>, StoreError>;

    async fn aggregate_stats(&self) -> Result<OfferStats, StoreError>;

    /// Cheap reachability probe for health checks.
    async fn ping(&self) -> Result<(), StoreError>;
}
