// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
//! Offer records, creation payloads, partial updates and validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::record::party::Buyer;
use crate::record::violation::RecordViolation;

/// Verticals offered in the creation form. Advisory: `vertical` stays a free string.
pub const VERTICALS: [&str; 11] = [
    "ACA",
    "Final Expense",
    "Medicare",
    "SSDI",
    "U65",
    "Auto Insurance",
    "Mortgage",
    "Legal",
    "Debt Settlement",
    "Life Insurance",
    "Home Services",
];

/// Offer types offered in the creation form. Advisory.
pub const OFFER_TYPES: [&str; 5] = ["CPA", "CPL", "Transfer", "Inbound", "Form Fill"];

/// Region codes accepted in `states_allowed`.
pub const US_STATES: [&str; 50] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA", "KS",
    "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ", "NM", "NY",
    "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT", "VA", "WA", "WV",
    "WI", "WY",
];

/// Offer lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OfferStatus {
    Active,
    #[default]
    Testing,
    Paused,
    Archived,
}

impl OfferStatus {
    pub const ALL: [OfferStatus; 4] = [
        OfferStatus::Active,
        OfferStatus::Testing,
        OfferStatus::Paused,
        OfferStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OfferStatus::Active => "Active",
            OfferStatus::Testing => "Testing",
            OfferStatus::Paused => "Paused",
            OfferStatus::Archived => "Archived",
        }
    }
}

impl fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OfferStatus {
    type Err = RecordViolation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OfferStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| RecordViolation::new("status", &format!("unknown status '{}'", s)))
    }
}

/// Which side of the trade the offer is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    Buying,
    #[default]
    Selling,
}

/// Offer record as stored, optionally joined with its buyer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    /// Storage identifier
    pub id: String,
    /// Business key
    pub offer_id: String,
    pub campaign_name: String,
    pub vertical: String,
    pub status: OfferStatus,
    pub offer_type: String,
    pub direction: Direction,
    #[serde(default)]
    pub publisher_payout_min: Option<f64>,
    #[serde(default)]
    pub publisher_payout_max: Option<f64>,
    #[serde(default)]
    pub advertiser_price_min: Option<f64>,
    #[serde(default)]
    pub advertiser_price_max: Option<f64>,
    #[serde(default)]
    pub states_allowed: Option<Vec<String>>,
    #[serde(default)]
    pub age_range: Option<String>,
    #[serde(default)]
    pub hours_of_operation: Option<String>,
    #[serde(default)]
    pub compliance_requirements: Option<String>,
    #[serde(default)]
    pub payment_terms: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub buyer_id: Option<String>,
    #[serde(default)]
    pub publisher_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Buyer snapshot joined at read time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer: Option<Buyer>,
}

/// Fields supplied when creating an offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOffer {
    pub offer_id: String,
    pub campaign_name: String,
    pub vertical: String,
    #[serde(default)]
    pub status: OfferStatus,
    #[serde(default = "default_offer_type")]
    pub offer_type: String,
    #[serde(default)]
    pub direction: Direction,
    #[serde(default)]
    pub publisher_payout_min: Option<f64>,
    #[serde(default)]
    pub publisher_payout_max: Option<f64>,
    #[serde(default)]
    pub advertiser_price_min: Option<f64>,
    #[serde(default)]
    pub advertiser_price_max: Option<f64>,
    #[serde(default)]
    pub states_allowed: Option<Vec<String>>,
    #[serde(default)]
    pub age_range: Option<String>,
    #[serde(default)]
    pub hours_of_operation: Option<String>,
    #[serde(default)]
    pub compliance_requirements: Option<String>,
    #[serde(default)]
    pub payment_terms: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub buyer_id: Option<String>,
    #[serde(default)]
    pub publisher_id: Option<String>,
}

fn default_offer_type() -> String {
    "CPA".to_string()
}

/// Partial update of an offer, addressed by business key.
///
/// For nullable fields the outer `Option` says whether the field is touched and the
/// inner one carries the new value, so `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OfferPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OfferStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offer_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "nullable")]
    pub publisher_payout_min: Option<Option<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "nullable")]
    pub publisher_payout_max: Option<Option<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "nullable")]
    pub advertiser_price_min: Option<Option<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "nullable")]
    pub advertiser_price_max: Option<Option<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "nullable")]
    pub states_allowed: Option<Option<Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "nullable")]
    pub age_range: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "nullable")]
    pub hours_of_operation: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "nullable")]
    pub compliance_requirements: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "nullable")]
    pub payment_terms: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "nullable")]
    pub notes: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "nullable")]
    pub buyer_id: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "nullable")]
    pub publisher_id: Option<Option<String>>,
}

/// Present-but-null deserializes to `Some(None)`; absent falls back to `None` via `default`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Build an offer key from a vertical and a sequence number, e.g. `ACA-042`.
///
/// The vertical is upper-cased, stripped of whitespace and cut to six characters.
/// Buyer names never enter the key.
pub fn generate_offer_id(vertical: &str, sequence: u64) -> String {
    let code: String = vertical
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .take(6)
        .collect();
    format!("{}-{:03}", code, sequence % 1000)
}

/// Default campaign name for a vertical and offer type, e.g. `ACA CPA`.
pub fn default_campaign_name(vertical: &str, offer_type: &str) -> String {
    format!("{} {}", vertical, offer_type)
}

struct OfferFields<'a> {
    offer_id: &'a str,
    campaign_name: &'a str,
    vertical: &'a str,
    states_allowed: Option<&'a [String]>,
    publisher_payout: (Option<f64>, Option<f64>),
    advertiser_price: (Option<f64>, Option<f64>),
}

impl OfferFields<'_> {
    fn violations(&self) -> Vec<RecordViolation> {
        let mut violations = Vec::new();

        for (field, value) in [
            ("offer_id", self.offer_id),
            ("campaign_name", self.campaign_name),
            ("vertical", self.vertical),
        ] {
            if value.trim().is_empty() {
                violations.push(RecordViolation::new(field, "is required"));
            }
        }

        if let Some(states) = self.states_allowed {
            for state in states {
                if !US_STATES.contains(&state.as_str()) {
                    violations.push(RecordViolation::new(
                        "states_allowed",
                        &format!("unknown state code '{}'", state),
                    ));
                }
            }
        }

        check_range(
            "publisher_payout_min",
            "publisher_payout_max",
            self.publisher_payout,
            &mut violations,
        );
        check_range(
            "advertiser_price_min",
            "advertiser_price_max",
            self.advertiser_price,
            &mut violations,
        );

        if self.offer_id.trim().is_empty() {
            violations
        } else {
            violations
                .into_iter()
                .map(|v| v.for_record(self.offer_id))
                .collect()
        }
    }
}

fn check_range(
    min_field: &str,
    max_field: &str,
    (min, max): (Option<f64>, Option<f64>),
    violations: &mut Vec<RecordViolation>,
) {
    for (field, amount) in [(min_field, min), (max_field, max)] {
        match amount {
            Some(a) if !a.is_finite() => {
                violations.push(RecordViolation::new(field, "must be a finite amount"))
            }
            Some(a) if a < 0.0 => {
                violations.push(RecordViolation::new(field, "must not be negative"))
            }
            _ => {}
        }
    }

    if let (Some(lo), Some(hi)) = (min, max) {
        if lo > hi {
            violations.push(RecordViolation::new(
                min_field,
                &format!("must not exceed {}", max_field),
            ));
        }
    }
}

fn into_result(violations: Vec<RecordViolation>) -> Result<(), Vec<RecordViolation>> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

impl Offer {
    /// Validate the record, collecting every violation.
    pub fn validate(&self) -> Result<(), Vec<RecordViolation>> {
        into_result(
            OfferFields {
                offer_id: &self.offer_id,
                campaign_name: &self.campaign_name,
                vertical: &self.vertical,
                states_allowed: self.states_allowed.as_deref(),
                publisher_payout: (self.publisher_payout_min, self.publisher_payout_max),
                advertiser_price: (self.advertiser_price_min, self.advertiser_price_max),
            }
            .violations(),
        )
    }

    pub fn is_active(&self) -> bool {
        self.status == OfferStatus::Active
    }
}

impl NewOffer {
    /// A payload for `vertical` and `offer_type` with a generated key and campaign name.
    pub fn generated(vertical: &str, offer_type: &str, sequence: u64) -> Self {
        Self {
            offer_id: generate_offer_id(vertical, sequence),
            campaign_name: default_campaign_name(vertical, offer_type),
            vertical: vertical.to_string(),
            status: OfferStatus::default(),
            offer_type: offer_type.to_string(),
            direction: Direction::default(),
            publisher_payout_min: None,
            publisher_payout_max: None,
            advertiser_price_min: None,
            advertiser_price_max: None,
            states_allowed: None,
            age_range: None,
            hours_of_operation: None,
            compliance_requirements: None,
            payment_terms: None,
            notes: None,
            buyer_id: None,
            publisher_id: None,
        }
    }

    /// Validate the payload, collecting every violation.
    pub fn validate(&self) -> Result<(), Vec<RecordViolation>> {
        into_result(
            OfferFields {
                offer_id: &self.offer_id,
                campaign_name: &self.campaign_name,
                vertical: &self.vertical,
                states_allowed: self.states_allowed.as_deref(),
                publisher_payout: (self.publisher_payout_min, self.publisher_payout_max),
                advertiser_price: (self.advertiser_price_min, self.advertiser_price_max),
            }
            .violations(),
        )
    }

    /// Materialize the stored record.
    pub fn into_offer(self, id: String, now: DateTime<Utc>) -> Offer {
        Offer {
            id,
            offer_id: self.offer_id,
            campaign_name: self.campaign_name,
            vertical: self.vertical,
            status: self.status,
            offer_type: self.offer_type,
            direction: self.direction,
            publisher_payout_min: self.publisher_payout_min,
            publisher_payout_max: self.publisher_payout_max,
            advertiser_price_min: self.advertiser_price_min,
            advertiser_price_max: self.advertiser_price_max,
            states_allowed: self.states_allowed,
            age_range: self.age_range,
            hours_of_operation: self.hours_of_operation,
            compliance_requirements: self.compliance_requirements,
            payment_terms: self.payment_terms,
            notes: self.notes,
            buyer_id: self.buyer_id,
            publisher_id: self.publisher_id,
            created_at: now,
            updated_at: now,
            buyer: None,
        }
    }
}

impl OfferPatch {
    /// True when the patch touches no field.
    pub fn is_empty(&self) -> bool {
        *self == OfferPatch::default()
    }

    /// Check what the patch alone can decide: required fields it clears, amounts
    /// it sets, and any pricing pair it sets at both ends. A pair with one end
    /// left untouched is only checkable against the stored record.
    pub fn validate(&self) -> Result<(), Vec<RecordViolation>> {
        let mut violations = Vec::new();

        for (field, value) in [
            ("campaign_name", &self.campaign_name),
            ("vertical", &self.vertical),
        ] {
            if matches!(value, Some(v) if v.trim().is_empty()) {
                violations.push(RecordViolation::new(field, "is required"));
            }
        }

        if let Some(Some(states)) = &self.states_allowed {
            for state in states {
                if !US_STATES.contains(&state.as_str()) {
                    violations.push(RecordViolation::new(
                        "states_allowed",
                        &format!("unknown state code '{}'", state),
                    ));
                }
            }
        }

        check_range(
            "publisher_payout_min",
            "publisher_payout_max",
            (
                self.publisher_payout_min.flatten(),
                self.publisher_payout_max.flatten(),
            ),
            &mut violations,
        );
        check_range(
            "advertiser_price_min",
            "advertiser_price_max",
            (
                self.advertiser_price_min.flatten(),
                self.advertiser_price_max.flatten(),
            ),
            &mut violations,
        );

        into_result(violations)
    }

    /// Apply the patch in place and bump `updated_at`. Does not validate.
    pub fn apply(&self, offer: &mut Offer, now: DateTime<Utc>) {
        fn set<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(v) = value {
                *target = v.clone();
            }
        }

        set(&mut offer.campaign_name, &self.campaign_name);
        set(&mut offer.vertical, &self.vertical);
        set(&mut offer.status, &self.status);
        set(&mut offer.offer_type, &self.offer_type);
        set(&mut offer.direction, &self.direction);
        set(&mut offer.publisher_payout_min, &self.publisher_payout_min);
        set(&mut offer.publisher_payout_max, &self.publisher_payout_max);
        set(&mut offer.advertiser_price_min, &self.advertiser_price_min);
        set(&mut offer.advertiser_price_max, &self.advertiser_price_max);
        set(&mut offer.states_allowed, &self.states_allowed);
        set(&mut offer.age_range, &self.age_range);
        set(&mut offer.hours_of_operation, &self.hours_of_operation);
        set(&mut offer.compliance_requirements, &self.compliance_requirements);
        set(&mut offer.payment_terms, &self.payment_terms);
        set(&mut offer.notes, &self.notes);
        set(&mut offer.buyer_id, &self.buyer_id);
        set(&mut offer.publisher_id, &self.publisher_id);
        offer.updated_at = now;
    }
}
