// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::offer::NewOffer;
use crate::record::party::{NewBuyer, NewPublisher};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),
    #[error("Invalid seed data: {0}")]
    InvalidSeed(String),
}

/// Initial records, loaded from a YAML document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub buyers: Vec<NewBuyer>,
    #[serde(default)]
    pub publishers: Vec<NewPublisher>,
    #[serde(default)]
    pub offers: Vec<NewOffer>,
}

impl SeedData {
    /// Parse seed data from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, SeedError> {
        let seed: SeedData = serde_yaml::from_str(yaml)?;
        seed.check()?;
        Ok(seed)
    }

    /// Serialize the seed data to a YAML string
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Record count across all kinds
    pub fn len(&self) -> usize {
        self.buyers.len() + self.publishers.len() + self.offers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check(&self) -> Result<(), SeedError> {
        let invalid = |key: &str, violations: Vec<crate::RecordViolation>| {
            let detail: Vec<String> = violations.iter().map(|v| v.to_string()).collect();
            SeedError::InvalidSeed(format!("{}: {}", key, detail.join("; ")))
        };

        for buyer in &self.buyers {
            buyer.validate().map_err(|v| invalid(&buyer.buyer_id, v))?;
        }
        for publisher in &self.publishers {
            publisher
                .validate()
                .map_err(|v| invalid(&publisher.publisher_id, v))?;
        }
        for offer in &self.offers {
            offer.validate().map_err(|v| invalid(&offer.offer_id, v))?;
        }
        Ok(())
    }
}
