// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
//! Operation-level authorization.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::access::permissions::{get_permissions, Capability};
use crate::access::role::Role;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("Access denied: role '{role}' cannot {action} (requires {capability:?})")]
    AccessDenied {
        role: Role,
        action: Action,
        capability: Capability,
    },
}

/// Operations exposed over offer, buyer and publisher records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    ListOffers,
    ReadOffer,
    CreateOffer,
    UpdateOffer,
    DeleteOffer,
    ListBuyers,
    ListPublishers,
    ViewStats,
}

impl Action {
    /// Capability needed to perform this action.
    ///
    /// `None` means every role may perform it; read paths rely on redaction instead.
    pub fn required_capability(&self) -> Option<Capability> {
        match self {
            Action::ListOffers | Action::ReadOffer | Action::ViewStats => None,
            Action::CreateOffer | Action::UpdateOffer => Some(Capability::EditOffers),
            Action::DeleteOffer => Some(Capability::DeleteOffers),
            Action::ListBuyers => Some(Capability::ViewBuyers),
            Action::ListPublishers => Some(Capability::ViewPublishers),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::ListOffers => "list_offers",
            Action::ReadOffer => "read_offer",
            Action::CreateOffer => "create_offer",
            Action::UpdateOffer => "update_offer",
            Action::DeleteOffer => "delete_offer",
            Action::ListBuyers => "list_buyers",
            Action::ListPublishers => "list_publishers",
            Action::ViewStats => "view_stats",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check whether `role` may perform `action`.
pub fn authorize(role: Role, action: Action) -> Result<(), AccessError> {
    match action.required_capability() {
        Some(capability) if !get_permissions(role).allows(capability) => {
            Err(AccessError::AccessDenied {
                role,
                action,
                capability,
            })
        }
        _ => Ok(()),
    }
}
