// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
//! Buyers and publishers: the two sides of an offer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::record::violation::RecordViolation;

/// Buyer record as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Buyer {
    /// Storage identifier
    pub id: String,
    /// Business key
    pub buyer_id: String,
    pub buyer_name: String,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub status: String,
    #[serde(default)]
    pub payment_terms: Option<String>,
    #[serde(default)]
    pub quality_score: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Publisher record as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Publisher {
    /// Storage identifier
    pub id: String,
    /// Business key
    pub publisher_id: String,
    pub publisher_name: String,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub status: String,
    #[serde(default)]
    pub payment_terms: Option<String>,
    #[serde(default)]
    pub quality_score: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when registering a buyer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBuyer {
    pub buyer_id: String,
    pub buyer_name: String,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default = "default_party_status")]
    pub status: String,
    #[serde(default)]
    pub payment_terms: Option<String>,
    #[serde(default)]
    pub quality_score: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Fields supplied when registering a publisher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPublisher {
    pub publisher_id: String,
    pub publisher_name: String,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default = "default_party_status")]
    pub status: String,
    #[serde(default)]
    pub payment_terms: Option<String>,
    #[serde(default)]
    pub quality_score: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

fn default_party_status() -> String {
    "Active".to_string()
}

fn validate_party(key_field: &str, key: &str, name_field: &str, name: &str) -> Vec<RecordViolation> {
    let mut violations = Vec::new();
    if key.trim().is_empty() {
        violations.push(RecordViolation::new(key_field, "is required"));
    }
    if name.trim().is_empty() {
        violations.push(RecordViolation::new(name_field, "is required").for_record(key));
    }
    violations
}

impl NewBuyer {
    pub fn validate(&self) -> Result<(), Vec<RecordViolation>> {
        let violations = validate_party("buyer_id", &self.buyer_id, "buyer_name", &self.buyer_name);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    /// Materialize the stored record.
    pub fn into_buyer(self, id: String, now: DateTime<Utc>) -> Buyer {
        Buyer {
            id,
            buyer_id: self.buyer_id,
            buyer_name: self.buyer_name,
            company_name: self.company_name,
            email: self.email,
            status: self.status,
            payment_terms: self.payment_terms,
            quality_score: self.quality_score,
            notes: self.notes,
            created_at: now,
            updated_at: now,
        }
    }
}

impl NewPublisher {
    pub fn validate(&self) -> Result<(), Vec<RecordViolation>> {
        let violations = validate_party(
            "publisher_id",
            &self.publisher_id,
            "publisher_name",
            &self.publisher_name,
        );
        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    /// Materialize the stored record.
    pub fn into_publisher(self, id: String, now: DateTime<Utc>) -> Publisher {
        Publisher {
            id,
            publisher_id: self.publisher_id,
            publisher_name: self.publisher_name,
            company_name: self.company_name,
            email: self.email,
            status: self.status,
            payment_terms: self.payment_terms,
            quality_score: self.quality_score,
            notes: self.notes,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buyer_defaults() {
        let buyer: NewBuyer =
            serde_json::from_str(r#"{"buyer_id": "B-1", "buyer_name": "Acme"}"#).unwrap();
        assert_eq!(buyer.status, "Active");
        assert!(buyer.email.is_none());
    }

    #[test]
    fn test_new_buyer_validation() {
        let buyer = NewBuyer {
            buyer_id: " ".to_string(),
            buyer_name: String::new(),
            company_name: None,
            email: None,
            status: "Active".to_string(),
            payment_terms: None,
            quality_score: None,
            notes: None,
        };
        let violations = buyer.validate().unwrap_err();
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].field, "buyer_id");
    }

    #[test]
    fn test_into_publisher_stamps_timestamps() {
        let now = Utc::now();
        let publisher: NewPublisher =
            serde_json::from_str(r#"{"publisher_id": "P-1", "publisher_name": "Traffic Co"}"#)
                .unwrap();
        let stored = publisher.into_publisher("id-1".to_string(), now);
        assert_eq!(stored.id, "id-1");
        assert_eq!(stored.created_at, now);
        assert_eq!(stored.updated_at, now);
    }

    #[test]
    fn test_buyer_deserialize_from_store_row() {
        let row = r#"{
            "id": "2f1c",
            "buyer_id": "B-7",
            "buyer_name": "Acme",
            "company_name": null,
            "email": "ops@acme.test",
            "status": "Active",
            "payment_terms": "Net 30",
            "quality_score": 8.5,
            "notes": null,
            "created_at": "2024-05-01T10:00:00+00:00",
            "updated_at": "2024-05-02T10:00:00.123456+00:00"
        }"#;
        let buyer: Buyer = serde_json::from_str(row).unwrap();
        assert_eq!(buyer.buyer_id, "B-7");
        assert_eq!(buyer.quality_score, Some(8.5));
    }
}
