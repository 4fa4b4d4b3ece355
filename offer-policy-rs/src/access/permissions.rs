// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
use serde::{Deserialize, Serialize};

use crate::access::role::Role;

/// A single capability a role may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ViewBuyers,
    ViewPublishers,
    ViewPricing,
    ViewFullOfferDetails,
    EditOffers,
    DeleteOffers,
    ExportData,
    ViewFinancials,
}

impl Capability {
    pub const ALL: [Capability; 8] = [
        Capability::ViewBuyers,
        Capability::ViewPublishers,
        Capability::ViewPricing,
        Capability::ViewFullOfferDetails,
        Capability::EditOffers,
        Capability::DeleteOffers,
        Capability::ExportData,
        Capability::ViewFinancials,
    ];
}

/// The capability set of a role, one flag per [`Capability`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPermissions {
    pub can_view_buyers: bool,
    pub can_view_publishers: bool,
    pub can_view_pricing: bool,
    pub can_view_full_offer_details: bool,
    pub can_edit_offers: bool,
    pub can_delete_offers: bool,
    pub can_export_data: bool,
    pub can_view_financials: bool,
}

impl UserPermissions {
    /// Check a single capability.
    pub fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::ViewBuyers => self.can_view_buyers,
            Capability::ViewPublishers => self.can_view_publishers,
            Capability::ViewPricing => self.can_view_pricing,
            Capability::ViewFullOfferDetails => self.can_view_full_offer_details,
            Capability::EditOffers => self.can_edit_offers,
            Capability::DeleteOffers => self.can_delete_offers,
            Capability::ExportData => self.can_export_data,
            Capability::ViewFinancials => self.can_view_financials,
        }
    }

    /// Capabilities that are switched on.
    pub fn granted(&self) -> Vec<Capability> {
        Capability::ALL
            .into_iter()
            .filter(|c| self.allows(*c))
            .collect()
    }
}

/// Fixed capability table.
pub fn get_permissions(role: Role) -> UserPermissions {
    match role {
        Role::Admin => UserPermissions {
            can_view_buyers: true,
            can_view_publishers: true,
            can_view_pricing: true,
            can_view_full_offer_details: true,
            can_edit_offers: true,
            can_delete_offers: true,
            can_export_data: true,
            can_view_financials: true,
        },
        Role::Manager => UserPermissions {
            can_view_buyers: true,
            can_view_publishers: true,
            can_view_pricing: true,
            can_view_full_offer_details: true,
            can_edit_offers: true,
            can_delete_offers: false,
            can_export_data: true,
            can_view_financials: true,
        },
        // Publishers see their own payout only, never who buys the traffic
        Role::Publisher => UserPermissions {
            can_view_buyers: false,
            can_view_publishers: false,
            can_view_pricing: true,
            can_view_full_offer_details: false,
            can_edit_offers: false,
            can_delete_offers: false,
            can_export_data: false,
            can_view_financials: false,
        },
        Role::Advertiser => UserPermissions {
            can_view_buyers: false,
            can_view_publishers: false,
            can_view_pricing: true,
            can_view_full_offer_details: false,
            can_edit_offers: false,
            can_delete_offers: false,
            can_export_data: false,
            can_view_financials: false,
        },
        Role::Viewer => UserPermissions {
            can_view_buyers: false,
            can_view_publishers: false,
            can_view_pricing: false,
            can_view_full_offer_details: false,
            can_edit_offers: false,
            can_delete_offers: false,
            can_export_data: false,
            can_view_financials: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(role: Role) -> [bool; 8] {
        let p = get_permissions(role);
        [
            p.can_view_buyers,
            p.can_view_publishers,
            p.can_view_pricing,
            p.can_view_full_offer_details,
            p.can_edit_offers,
            p.can_delete_offers,
            p.can_export_data,
            p.can_view_financials,
        ]
    }

    #[test]
    fn test_truth_table() {
        const T: bool = true;
        const F: bool = false;
        assert_eq!(row(Role::Admin), [T, T, T, T, T, T, T, T]);
        assert_eq!(row(Role::Manager), [T, T, T, T, T, F, T, T]);
        assert_eq!(row(Role::Publisher), [F, F, T, F, F, F, F, F]);
        assert_eq!(row(Role::Advertiser), [F, F, T, F, F, F, F, F]);
        assert_eq!(row(Role::Viewer), [F, F, F, F, F, F, F, F]);
    }

    #[test]
    fn test_deterministic() {
        for role in Role::ALL {
            assert_eq!(get_permissions(role), get_permissions(role));
            assert_eq!(role.permissions(), get_permissions(role));
        }
    }

    #[test]
    fn test_allows_matches_flags() {
        let manager = get_permissions(Role::Manager);
        assert!(manager.allows(Capability::EditOffers));
        assert!(!manager.allows(Capability::DeleteOffers));
        assert_eq!(manager.granted().len(), 7);
        assert!(get_permissions(Role::Viewer).granted().is_empty());
    }

    #[test]
    fn test_serialize_camel_case() {
        let json = serde_json::to_value(get_permissions(Role::Publisher)).unwrap();
        assert_eq!(json["canViewPricing"], true);
        assert_eq!(json["canViewBuyers"], false);
        assert!(json.get("can_view_pricing").is_none());
    }
}
