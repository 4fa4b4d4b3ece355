// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
//! Offer listing filters and pagination.

use offer_policy::record::{Offer, OfferStatus, RecordViolation};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PER_PAGE: usize = 25;
pub const MAX_PER_PAGE: usize = 100;

/// Query-string filters for the offer listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OfferQuery {
    /// Case-insensitive substring over offer_id, campaign_name, vertical and status
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub vertical: Option<String>,
    /// 1-based page number
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub per_page: Option<usize>,
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OfferPage<T> {
    pub items: Vec<T>,
    /// Matches before pagination
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
}

impl<T> OfferPage<T> {
    pub fn try_map<U, E, F>(self, f: F) -> Result<OfferPage<U>, E>
    where
        F: FnMut(T) -> Result<U, E>,
    {
        Ok(OfferPage {
            items: self.items.into_iter().map(f).collect::<Result<_, _>>()?,
            total: self.total,
            page: self.page,
            per_page: self.per_page,
        })
    }
}

impl OfferQuery {
    fn status_filter(&self) -> Result<Option<OfferStatus>, RecordViolation> {
        match self.status.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => s.parse().map(Some),
        }
    }

    fn matches(&self, offer: &Offer, status: Option<OfferStatus>) -> bool {
        if let Some(status) = status {
            if offer.status != status {
                return false;
            }
        }

        if let Some(vertical) = self.vertical.as_deref().map(str::trim) {
            if !vertical.is_empty() && !offer.vertical.eq_ignore_ascii_case(vertical) {
                return false;
            }
        }

        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                [
                    offer.offer_id.as_str(),
                    offer.campaign_name.as_str(),
                    offer.vertical.as_str(),
                    offer.status.as_str(),
                ]
                .iter()
                .any(|haystack| haystack.to_lowercase().contains(&needle))
            }
        }
    }

    /// Filter then paginate. Input order is kept.
    pub fn apply(&self, offers: Vec<Offer>) -> Result<OfferPage<Offer>, RecordViolation> {
        let status = self.status_filter()?;
        let per_page = match self.per_page {
            None | Some(0) => DEFAULT_PER_PAGE,
            Some(n) => n.min(MAX_PER_PAGE),
        };
        let page = self.page.unwrap_or(1).max(1);

        let matching: Vec<Offer> = offers
            .into_iter()
            .filter(|offer| self.matches(offer, status))
            .collect();
        let total = matching.len();
        let items = matching
            .into_iter()
            .skip((page - 1).saturating_mul(per_page))
            .take(per_page)
            .collect();

        Ok(OfferPage {
            items,
            total,
            page,
            per_page,
        })
    }
}
