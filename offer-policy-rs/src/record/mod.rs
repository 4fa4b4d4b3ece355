// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
pub mod offer;
pub mod party;
pub mod seed;
pub mod stats;
pub mod violation;

pub use offer::{
    default_campaign_name, generate_offer_id, Direction, NewOffer, Offer, OfferPatch, OfferStatus,
    OFFER_TYPES, US_STATES, VERTICALS,
};
pub use party::{Buyer, NewBuyer, NewPublisher, Publisher};
pub use seed::{SeedData, SeedError};
pub use stats::{OfferStats, OfferTally};
pub use violation::RecordViolation;
