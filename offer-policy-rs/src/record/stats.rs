// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::record::offer::{Offer, OfferStatus};

/// The two columns the dashboard aggregates over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferTally {
    pub status: OfferStatus,
    pub vertical: String,
}

impl From<&Offer> for OfferTally {
    fn from(offer: &Offer) -> Self {
        Self {
            status: offer.status,
            vertical: offer.vertical.clone(),
        }
    }
}

/// Dashboard counters and histograms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferStats {
    pub total_offers: usize,
    pub total_buyers: usize,
    pub total_publishers: usize,
    pub active_offers: usize,
    pub offers_by_status: BTreeMap<String, usize>,
    pub offers_by_vertical: BTreeMap<String, usize>,
}

impl OfferStats {
    pub fn collect(tallies: &[OfferTally], total_buyers: usize, total_publishers: usize) -> Self {
        let mut stats = OfferStats {
            total_offers: tallies.len(),
            total_buyers,
            total_publishers,
            ..Default::default()
        };

        for tally in tallies {
            if tally.status == OfferStatus::Active {
                stats.active_offers += 1;
            }
            *stats
                .offers_by_status
                .entry(tally.status.as_str().to_string())
                .or_default() += 1;
            *stats
                .offers_by_vertical
                .entry(tally.vertical.clone())
                .or_default() += 1;
        }

        stats
    }
}
