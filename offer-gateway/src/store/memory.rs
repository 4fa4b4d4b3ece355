// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
//! In-memory store
//!
//! Process-local tables behind a tokio `RwLock`. Used for local runs and tests,
//! and whenever no hosted database is configured.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use offer_policy::record::{
    Buyer, NewBuyer, NewOffer, NewPublisher, Offer, OfferPatch, OfferStats, OfferTally,
    Publisher, RecordViolation, SeedData,
};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use super::{OfferStore, StoreError};

#[derive(Debug, Default)]
struct Tables {
    /// Insertion order
    offers: Vec<Offer>,
    buyers: Vec<Buyer>,
    publishers: Vec<Publisher>,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn duplicate(field: &str, key: &str) -> StoreError {
    StoreError::Validation(vec![
        RecordViolation::new(field, "already exists").for_record(key)
    ])
}

impl Tables {
    fn insert_buyer(&mut self, buyer: NewBuyer, now: DateTime<Utc>) -> Result<Buyer, StoreError> {
        buyer.validate().map_err(StoreError::Validation)?;
        if self.buyers.iter().any(|b| b.buyer_id == buyer.buyer_id) {
            return Err(duplicate("buyer_id", &buyer.buyer_id));
        }

        let buyer = buyer.into_buyer(new_id(), now);
        self.buyers.push(buyer.clone());
        Ok(buyer)
    }

    fn insert_publisher(
        &mut self,
        publisher: NewPublisher,
        now: DateTime<Utc>,
    ) -> Result<Publisher, StoreError> {
        publisher.validate().map_err(StoreError::Validation)?;
        if self
            .publishers
            .iter()
            .any(|p| p.publisher_id == publisher.publisher_id)
        {
            return Err(duplicate("publisher_id", &publisher.publisher_id));
        }

        let publisher = publisher.into_publisher(new_id(), now);
        self.publishers.push(publisher.clone());
        Ok(publisher)
    }

    fn insert_offer(&mut self, offer: NewOffer, now: DateTime<Utc>) -> Result<Offer, StoreError> {
        let mut violations = offer.validate().err().unwrap_or_default();
        violations.extend(self.dangling_references(
            &offer.offer_id,
            offer.buyer_id.as_deref(),
            offer.publisher_id.as_deref(),
        ));
        if !violations.is_empty() {
            return Err(StoreError::Validation(violations));
        }
        if self.offers.iter().any(|o| o.offer_id == offer.offer_id) {
            return Err(duplicate("offer_id", &offer.offer_id));
        }

        let offer = offer.into_offer(new_id(), now);
        self.offers.push(offer.clone());
        Ok(self.joined(offer))
    }

    fn dangling_references(
        &self,
        offer_id: &str,
        buyer_id: Option<&str>,
        publisher_id: Option<&str>,
    ) -> Vec<RecordViolation> {
        let mut violations = Vec::new();
        if let Some(id) = buyer_id {
            if !self.buyers.iter().any(|b| b.id == id) {
                violations.push(
                    RecordViolation::new("buyer_id", "references an unknown buyer")
                        .for_record(offer_id),
                );
            }
        }
        if let Some(id) = publisher_id {
            if !self.publishers.iter().any(|p| p.id == id) {
                violations.push(
                    RecordViolation::new("publisher_id", "references an unknown publisher")
                        .for_record(offer_id),
                );
            }
        }
        violations
    }

    /// Attach the buyer snapshot.
    fn joined(&self, mut offer: Offer) -> Offer {
        offer.buyer = offer
            .buyer_id
            .as_deref()
            .and_then(|id| self.buyers.iter().find(|b| b.id == id))
            .cloned();
        offer
    }

    fn position(&self, offer_id: &str) -> Result<usize, StoreError> {
        self.offers
            .iter()
            .position(|o| o.offer_id == offer_id)
            .ok_or_else(|| StoreError::offer_not_found(offer_id))
    }
}

/// In-memory `OfferStore`.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store holding the seed records.
    ///
    /// Seed offers may reference a buyer or publisher by business key; those
    /// references are rewritten to the party's storage id.
    pub fn from_seed(seed: SeedData) -> Result<Self, StoreError> {
        let now = Utc::now();
        let mut tables = Tables::default();

        for buyer in seed.buyers {
            tables.insert_buyer(buyer, now)?;
        }
        for publisher in seed.publishers {
            tables.insert_publisher(publisher, now)?;
        }
        for mut offer in seed.offers {
            if let Some(key) = offer.buyer_id.as_deref() {
                if let Some(buyer) = tables.buyers.iter().find(|b| b.buyer_id == key) {
                    offer.buyer_id = Some(buyer.id.clone());
                }
            }
            if let Some(key) = offer.publisher_id.as_deref() {
                if let Some(publisher) = tables.publishers.iter().find(|p| p.publisher_id == key) {
                    offer.publisher_id = Some(publisher.id.clone());
                }
            }
            tables.insert_offer(offer, now)?;
        }

        info!(
            offers = tables.offers.len(),
            buyers = tables.buyers.len(),
            publishers = tables.publishers.len(),
            "In-memory store seeded"
        );

        Ok(Self {
            tables: RwLock::new(tables),
        })
    }
}

#[async_trait]
impl OfferStore for InMemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn list_offers(&self) -> Result<Vec<Offer>, StoreError> {
        let tables = self.tables.read().await;

        // Newest first; ties keep reverse insertion order
        let mut offers: Vec<Offer> = tables
            .offers
            .iter()
            .rev()
            .map(|o| tables.joined(o.clone()))
            .collect();
        offers.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(offers)
    }

    async fn get_offer(&self, offer_id: &str) -> Result<Offer, StoreError> {
        let tables = self.tables.read().await;
        let index = tables.position(offer_id)?;
        Ok(tables.joined(tables.offers[index].clone()))
    }

    async fn create_offer(&self, offer: NewOffer) -> Result<Offer, StoreError> {
        let created = self.tables.write().await.insert_offer(offer, Utc::now())?;
        debug!(offer_id = %created.offer_id, id = %created.id, "Offer created");
        Ok(created)
    }

    async fn update_offer(&self, offer_id: &str, patch: OfferPatch) -> Result<Offer, StoreError> {
        let mut tables = self.tables.write().await;
        let index = tables.position(offer_id)?;

        let mut updated = tables.offers[index].clone();
        patch.apply(&mut updated, Utc::now());

        let mut violations = updated.validate().err().unwrap_or_default();
        violations.extend(tables.dangling_references(
            offer_id,
            updated.buyer_id.as_deref(),
            updated.publisher_id.as_deref(),
        ));
        if !violations.is_empty() {
            return Err(StoreError::Validation(violations));
        }

        tables.offers[index] = updated.clone();
        debug!(offer_id = %offer_id, "Offer updated");
        Ok(tables.joined(updated))
    }

    async fn delete_offer(&self, offer_id: &str) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let index = tables.position(offer_id)?;
        tables.offers.remove(index);
        debug!(offer_id = %offer_id, "Offer deleted");
        Ok(())
    }

    async fn list_buyers(&self) -> Result<Vec<Buyer>, StoreError> {
        let mut buyers = self.tables.read().await.buyers.clone();
        buyers.sort_by(|a, b| a.buyer_name.cmp(&b.buyer_name));
        Ok(buyers)
    }

    async fn list_publishers(&self) -> Result<Vec<Publisher>, StoreError> {
        let mut publishers = self.tables.read().await.publishers.clone();
        publishers.sort_by(|a, b| a.publisher_name.cmp(&b.publisher_name));
        Ok(publishers)
    }

    async fn aggregate_stats(&self) -> Result<OfferStats, StoreError> {
        let tables = self.tables.read().await;
        let tallies: Vec<OfferTally> = tables.offers.iter().map(OfferTally::from).collect();
        Ok(OfferStats::collect(
            &tallies,
            tables.buyers.len(),
            tables.publishers.len(),
        ))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use offer_policy::record::OfferStatus;

    const SEED: &str = r#"
buyers:
  - buyer_id: "B-ZED"
    buyer_name: "Zed Insurance"
  - buyer_id: "B-ACME"
    buyer_name: "Acme Health"
publishers:
  - publisher_id: "P-TRAFFIC"
    publisher_name: "Traffic Co"
offers:
  - offer_id: "ACA-001"
    campaign_name: "ACA CPA"
    vertical: "ACA"
    status: "Active"
    buyer_id: "B-ACME"
    publisher_id: "P-TRAFFIC"
  - offer_id: "MEDICA-002"
    campaign_name: "Medicare Transfer"
    vertical: "Medicare"
"#;

    fn seeded() -> InMemoryStore {
        InMemoryStore::from_seed(SeedData::from_yaml(SEED).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_seed_resolves_business_keys() {
        let store = seeded();
        let offer = store.get_offer("ACA-001").await.unwrap();

        let buyer = offer.buyer.expect("buyer joined");
        assert_eq!(buyer.buyer_id, "B-ACME");
        assert_eq!(offer.buyer_id.as_deref(), Some(buyer.id.as_str()));
        assert_ne!(offer.publisher_id.as_deref(), Some("P-TRAFFIC"));
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let store = seeded();
        store
            .create_offer(NewOffer::generated("Legal", "CPL", 3))
            .await
            .unwrap();

        let offers = store.list_offers().await.unwrap();
        let ids: Vec<&str> = offers.iter().map(|o| o.offer_id.as_str()).collect();
        assert_eq!(ids, vec!["LEGAL-003", "MEDICA-002", "ACA-001"]);
    }

    #[tokio::test]
    async fn test_create_stamps_identity() {
        let store = InMemoryStore::new();
        let offer = store
            .create_offer(NewOffer::generated("ACA", "CPA", 1))
            .await
            .unwrap();

        assert!(Uuid::parse_str(&offer.id).is_ok());
        assert_eq!(offer.created_at, offer.updated_at);
        assert!(offer.buyer.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_offer_id_rejected() {
        let store = seeded();
        let mut offer = NewOffer::generated("ACA", "CPA", 1);
        offer.offer_id = "ACA-001".to_string();

        match store.create_offer(offer).await {
            Err(StoreError::Validation(v)) => {
                assert_eq!(v[0].field, "offer_id");
                assert_eq!(v[0].record.as_deref(), Some("ACA-001"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_buyer_rejected() {
        let store = seeded();
        let mut offer = NewOffer::generated("ACA", "CPA", 9);
        offer.buyer_id = Some("no-such-buyer".to_string());

        let err = store.create_offer(offer).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(ref v) if v[0].field == "buyer_id"));
    }

    #[tokio::test]
    async fn test_invalid_offer_rejected() {
        let store = InMemoryStore::new();
        let mut offer = NewOffer::generated("ACA", "CPA", 1);
        offer.campaign_name = String::new();
        offer.publisher_payout_min = Some(20.0);
        offer.publisher_payout_max = Some(10.0);

        match store.create_offer(offer).await {
            Err(StoreError::Validation(v)) => assert_eq!(v.len(), 2),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_offer() {
        let store = seeded();
        let patch = OfferPatch {
            status: Some(OfferStatus::Paused),
            notes: Some(Some("paused for review".to_string())),
            ..Default::default()
        };

        let updated = store.update_offer("MEDICA-002", patch).await.unwrap();
        assert_eq!(updated.status, OfferStatus::Paused);
        assert_eq!(updated.notes.as_deref(), Some("paused for review"));
        assert!(updated.updated_at >= updated.created_at);

        let stored = store.get_offer("MEDICA-002").await.unwrap();
        assert_eq!(stored.status, OfferStatus::Paused);
    }

    #[tokio::test]
    async fn test_update_rejected_leaves_record() {
        let store = seeded();
        let patch = OfferPatch {
            advertiser_price_min: Some(Some(50.0)),
            advertiser_price_max: Some(Some(10.0)),
            ..Default::default()
        };

        assert!(store.update_offer("ACA-001", patch).await.is_err());
        let stored = store.get_offer("ACA-001").await.unwrap();
        assert_eq!(stored.advertiser_price_min, None);
    }

    #[tokio::test]
    async fn test_not_found_paths() {
        let store = seeded();

        assert!(matches!(
            store.get_offer("NOPE").await,
            Err(StoreError::NotFound { .. })
        ));
        assert!(matches!(
            store.update_offer("NOPE", OfferPatch::default()).await,
            Err(StoreError::NotFound { .. })
        ));
        assert!(matches!(
            store.delete_offer("NOPE").await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_offer() {
        let store = seeded();
        store.delete_offer("ACA-001").await.unwrap();

        assert_eq!(store.list_offers().await.unwrap().len(), 1);
        assert!(store.get_offer("ACA-001").await.is_err());
    }

    #[tokio::test]
    async fn test_parties_ordered_by_name() {
        let yaml = r#"
buyers:
  - buyer_id: "B-ZED"
    buyer_name: "Zed Insurance"
  - buyer_id: "B-ACME"
    buyer_name: "Acme Health"
publishers:
  - publisher_id: "P-TRAFFIC"
    publisher_name: "Traffic Co"
  - publisher_id: "P-ALPHA"
    publisher_name: "Alpha Media"
"#;
        let store = InMemoryStore::from_seed(SeedData::from_yaml(yaml).unwrap()).unwrap();

        let buyers = store.list_buyers().await.unwrap();
        assert_eq!(buyers[0].buyer_name, "Acme Health");
        assert_eq!(buyers[1].buyer_name, "Zed Insurance");

        let publishers = store.list_publishers().await.unwrap();
        assert_eq!(publishers[0].publisher_name, "Alpha Media");
    }

    #[test]
    fn test_duplicate_buyer_rejected() {
        let yaml = r#"
buyers:
  - buyer_id: "B-ACME"
    buyer_name: "Acme Health"
  - buyer_id: "B-ACME"
    buyer_name: "Acme again"
"#;
        let err = InMemoryStore::from_seed(SeedData::from_yaml(yaml).unwrap()).unwrap_err();
        assert!(matches!(err, StoreError::Validation(ref v) if v[0].field == "buyer_id"));
    }

    #[test]
    fn test_seed_with_unknown_buyer_rejected() {
        let yaml = r#"
offers:
  - offer_id: "ACA-001"
    campaign_name: "ACA CPA"
    vertical: "ACA"
    buyer_id: "B-MISSING"
"#;
        let err = InMemoryStore::from_seed(SeedData::from_yaml(yaml).unwrap()).unwrap_err();
        assert!(matches!(err, StoreError::Validation(ref v) if v[0].field == "buyer_id"));
    }

    #[tokio::test]
    async fn test_aggregate_stats() {
        let stats = seeded().aggregate_stats().await.unwrap();

        assert_eq!(stats.total_offers, 2);
        assert_eq!(stats.total_buyers, 2);
        assert_eq!(stats.total_publishers, 1);
        assert_eq!(stats.active_offers, 1);
        assert_eq!(stats.offers_by_vertical.get("ACA"), Some(&1));
        assert_eq!(stats.offers_by_status.get("Testing"), Some(&1));
    }
}
