// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
//! PostgREST store
//!
//! HTTP client for the hosted database's REST interface (`/rest/v1/<table>`).
//!
//! Dialect:
//! - auth via `apikey` and `Authorization: Bearer` headers
//! - filters as `column=eq.value`, ordering as `order=column.desc`
//! - embedded join `buyer:buyers(*)` on offer reads
//! - writes ask for `Prefer: return=representation` and get the rows back

use async_trait::async_trait;
use offer_policy::record::{
    Buyer, NewOffer, Offer, OfferPatch, OfferStats, OfferTally, Publisher, RecordViolation,
};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error, info};

use super::{OfferStore, StoreError};

const OFFER_SELECT: &str = "*,buyer:buyers(*)";
const RETURN_REPRESENTATION: &str = "return=representation";

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Transient(err.to_string())
    }
}

// =============================================================================
// Configuration
// =============================================================================

#[derive(Debug, Clone)]
pub struct PostgrestConfig {
    /// Project URL, without the `/rest/v1` suffix
    pub base_url: String,

    /// Anonymous API key, sent as `apikey` and bearer token
    pub api_key: String,

    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for PostgrestConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:54321".to_string(),
            api_key: String::new(),
            timeout_seconds: 30,
        }
    }
}

/// Error body returned by PostgREST.
#[derive(Debug, Default, Deserialize)]
struct PostgrestErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    details: Option<String>,
    #[serde(default)]
    hint: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

/// Map a failed response onto the store error kinds.
fn classify_failure(status: StatusCode, kind: &'static str, key: &str, body: &str) -> StoreError {
    let parsed: PostgrestErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = if parsed.message.is_empty() {
        body.to_string()
    } else {
        parsed.message
    };

    error!(
        status = status.as_u16(),
        message = %message,
        details = ?parsed.details,
        hint = ?parsed.hint,
        code = ?parsed.code,
        "PostgREST request failed"
    );

    match status {
        StatusCode::NOT_FOUND => StoreError::NotFound {
            kind,
            key: key.to_string(),
        },
        StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
            let mut violation = RecordViolation::new(kind, &message);
            if !key.is_empty() {
                violation = violation.for_record(key);
            }
            StoreError::Validation(vec![violation])
        }
        _ => StoreError::Transient(format!("{} - {}", status.as_u16(), message)),
    }
}

// =============================================================================
// Client
// =============================================================================

pub struct PostgrestStore {
    client: Client,
    config: PostgrestConfig,
}

impl PostgrestStore {
    pub fn new(config: PostgrestConfig) -> Result<Self, StoreError> {
        let api_key = HeaderValue::from_str(&config.api_key)
            .map_err(|_| StoreError::Config("API key is not a valid header value".to_string()))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|_| StoreError::Config("API key is not a valid header value".to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert("apikey", api_key);
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| StoreError::Config(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn table_url(&self, table: &str) -> String {
        format!(
            "{}/rest/v1/{}",
            self.config.base_url.trim_end_matches('/'),
            table
        )
    }

    async fn rows<T: DeserializeOwned>(
        response: Response,
        kind: &'static str,
        key: &str,
    ) -> Result<Vec<T>, StoreError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(status, kind, key, &body));
        }
        Ok(response.json().await?)
    }

    /// First row, or `NotFound` when the filter matched nothing.
    async fn single<T: DeserializeOwned>(
        response: Response,
        kind: &'static str,
        key: &str,
    ) -> Result<T, StoreError> {
        Self::rows(response, kind, key)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound {
                kind,
                key: key.to_string(),
            })
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        kind: &'static str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, StoreError> {
        let url = self.table_url(table);
        debug!(url = %url, "Selecting rows");
        let response = self.client.get(&url).query(query).send().await?;
        Self::rows(response, kind, "").await
    }
}

fn for_record(violations: Vec<RecordViolation>, key: &str) -> Vec<RecordViolation> {
    violations.into_iter().map(|v| v.for_record(key)).collect()
}

#[derive(Deserialize)]
struct IdOnly {
    #[allow(dead_code)]
    id: String,
}

#[async_trait]
impl OfferStore for PostgrestStore {
    fn backend(&self) -> &'static str {
        "postgrest"
    }

    async fn list_offers(&self) -> Result<Vec<Offer>, StoreError> {
        self.select(
            "offers",
            "offer",
            &[("select", OFFER_SELECT), ("order", "created_at.desc")],
        )
        .await
    }

    async fn get_offer(&self, offer_id: &str) -> Result<Offer, StoreError> {
        let filter = format!("eq.{}", offer_id);
        let response = self
            .client
            .get(self.table_url("offers"))
            .query(&[("select", OFFER_SELECT), ("offer_id", filter.as_str())])
            .send()
            .await?;
        Self::single(response, "offer", offer_id).await
    }

    async fn create_offer(&self, offer: NewOffer) -> Result<Offer, StoreError> {
        offer.validate().map_err(StoreError::Validation)?;

        debug!(offer_id = %offer.offer_id, "Creating offer");
        let response = self
            .client
            .post(self.table_url("offers"))
            .query(&[("select", OFFER_SELECT)])
            .header("Prefer", RETURN_REPRESENTATION)
            .json(&offer)
            .send()
            .await?;

        let created: Offer = Self::single(response, "offer", &offer.offer_id).await?;
        info!(offer_id = %created.offer_id, id = %created.id, "Offer created");
        Ok(created)
    }

    async fn update_offer(&self, offer_id: &str, patch: OfferPatch) -> Result<Offer, StoreError> {
        patch
            .validate()
            .map_err(|violations| StoreError::Validation(for_record(violations, offer_id)))?;

        let filter = format!("eq.{}", offer_id);
        debug!(offer_id = %offer_id, "Updating offer");

        let response = self
            .client
            .patch(self.table_url("offers"))
            .query(&[("select", OFFER_SELECT), ("offer_id", filter.as_str())])
            .header("Prefer", RETURN_REPRESENTATION)
            .json(&patch)
            .send()
            .await?;

        let updated: Offer = Self::single(response, "offer", offer_id).await?;
        // A patch touching one end of a pricing pair is only checkable on the stored row
        updated.validate().map_err(StoreError::Validation)?;
        info!(offer_id = %offer_id, "Offer updated");
        Ok(updated)
    }

    async fn delete_offer(&self, offer_id: &str) -> Result<(), StoreError> {
        let filter = format!("eq.{}", offer_id);
        debug!(offer_id = %offer_id, "Deleting offer");

        let response = self
            .client
            .delete(self.table_url("offers"))
            .query(&[("offer_id", filter.as_str())])
            .header("Prefer", RETURN_REPRESENTATION)
            .send()
            .await?;

        let _deleted: serde_json::Value = Self::single(response, "offer", offer_id).await?;
        info!(offer_id = %offer_id, "Offer deleted");
        Ok(())
    }

    async fn list_buyers(&self) -> Result<Vec<Buyer>, StoreError> {
        self.select(
            "buyers",
            "buyer",
            &[("select", "*"), ("order", "buyer_name.asc")],
        )
        .await
    }

    async fn list_publishers(&self) -> Result<Vec<Publisher>, StoreError> {
        self.select(
            "publishers",
            "publisher",
            &[("select", "*"), ("order", "publisher_name.asc")],
        )
        .await
    }

    async fn aggregate_stats(&self) -> Result<OfferStats, StoreError> {
        let (tallies, buyers, publishers) = tokio::try_join!(
            self.select::<OfferTally>("offers", "offer", &[("select", "status,vertical")]),
            self.select::<IdOnly>("buyers", "buyer", &[("select", "id")]),
            self.select::<IdOnly>("publishers", "publisher", &[("select", "id")]),
        )?;

        Ok(OfferStats::collect(&tallies, buyers.len(), publishers.len()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.select::<IdOnly>("offers", "offer", &[("select", "id"), ("limit", "1")])
            .await
            .map(|_| ())
    }
}

// =============================================================================
// Tests
// =============================================================================
