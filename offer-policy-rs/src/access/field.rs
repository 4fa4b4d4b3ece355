// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
//! Field-level visibility table.
//!
//! Only the fields listed in [`GuardedField`] are subject to a visibility rule.
//! A field name that does not parse into a `GuardedField` is always visible.

use crate::access::permissions::{get_permissions, Capability};
use crate::access::role::Role;

/// Record fields whose visibility depends on the viewer's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuardedField {
    Buyer,
    BuyerId,
    BuyerName,
    BuyerEmail,
    Publisher,
    PublisherId,
    PublisherName,
    AdvertiserPriceMin,
    AdvertiserPriceMax,
    PublisherPayoutMin,
    PublisherPayoutMax,
    Profit,
    Margin,
}

/// How visibility of a guarded field is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Visible when the role holds the capability
    Requires(Capability),
    /// Visible to every role except this one, regardless of capabilities
    DeniedTo(Role),
}

impl Visibility {
    /// Decide whether `role` may see a field governed by this rule.
    pub fn permits(&self, role: Role) -> bool {
        match self {
            Visibility::Requires(capability) => get_permissions(role).allows(*capability),
            Visibility::DeniedTo(denied) => role != *denied,
        }
    }
}

impl GuardedField {
    pub const ALL: [GuardedField; 13] = [
        GuardedField::Buyer,
        GuardedField::BuyerId,
        GuardedField::BuyerName,
        GuardedField::BuyerEmail,
        GuardedField::Publisher,
        GuardedField::PublisherId,
        GuardedField::PublisherName,
        GuardedField::AdvertiserPriceMin,
        GuardedField::AdvertiserPriceMax,
        GuardedField::PublisherPayoutMin,
        GuardedField::PublisherPayoutMax,
        GuardedField::Profit,
        GuardedField::Margin,
    ];

    /// Field name as it appears in serialized records.
    pub fn name(&self) -> &'static str {
        match self {
            GuardedField::Buyer => "buyer",
            GuardedField::BuyerId => "buyer_id",
            GuardedField::BuyerName => "buyer_name",
            GuardedField::BuyerEmail => "buyer_email",
            GuardedField::Publisher => "publisher",
            GuardedField::PublisherId => "publisher_id",
            GuardedField::PublisherName => "publisher_name",
            GuardedField::AdvertiserPriceMin => "advertiser_price_min",
            GuardedField::AdvertiserPriceMax => "advertiser_price_max",
            GuardedField::PublisherPayoutMin => "publisher_payout_min",
            GuardedField::PublisherPayoutMax => "publisher_payout_max",
            GuardedField::Profit => "profit",
            GuardedField::Margin => "margin",
        }
    }

    /// Look up a guarded field by its serialized name. Matching is exact.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /// The visibility rule for this field.
    pub fn visibility(&self) -> Visibility {
        match self {
            GuardedField::Buyer
            | GuardedField::BuyerId
            | GuardedField::BuyerName
            | GuardedField::BuyerEmail => Visibility::Requires(Capability::ViewBuyers),
            GuardedField::Publisher | GuardedField::PublisherId | GuardedField::PublisherName => {
                Visibility::Requires(Capability::ViewPublishers)
            }
            GuardedField::AdvertiserPriceMin | GuardedField::AdvertiserPriceMax => {
                Visibility::Requires(Capability::ViewFinancials)
            }
            // Direct role check, not routed through ViewFinancials: publishers and
            // viewers lack that capability yet still see payouts.
            GuardedField::PublisherPayoutMin | GuardedField::PublisherPayoutMax => {
                Visibility::DeniedTo(Role::Advertiser)
            }
            GuardedField::Profit | GuardedField::Margin => {
                Visibility::Requires(Capability::ViewFinancials)
            }
        }
    }

    /// Check whether `role` may see this field.
    pub fn visible_to(&self, role: Role) -> bool {
        self.visibility().permits(role)
    }
}

/// Check whether `role` may see the field called `field_name`.
///
/// Unknown field names are visible.
pub fn can_view_field(role: Role, field_name: &str) -> bool {
    GuardedField::from_name(field_name).map_or(true, |field| field.visible_to(role))
}
