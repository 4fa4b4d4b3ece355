// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::access::permissions::{get_permissions, UserPermissions};

/// Roles a dashboard user can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access, including deletion
    Admin,
    /// Everything an admin can do except delete offers
    Manager,
    /// Traffic source; sees its payout but never buyer identity or buyer pricing
    Publisher,
    /// Buyer side; sees its pricing but never publisher payouts
    Advertiser,
    /// Read-only, no pricing
    Viewer,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Admin,
        Role::Manager,
        Role::Publisher,
        Role::Advertiser,
        Role::Viewer,
    ];

    /// Get the role name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Publisher => "publisher",
            Role::Advertiser => "advertiser",
            Role::Viewer => "viewer",
        }
    }

    /// Capability set for this role.
    pub fn permissions(self) -> UserPermissions {
        get_permissions(self)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a role name coming from outside the process is not one of the known roles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown role '{0}': expected one of admin, manager, publisher, advertiser, viewer")]
pub struct RoleParseError(pub String);

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "publisher" => Ok(Role::Publisher),
            "advertiser" => Ok(Role::Advertiser),
            "viewer" => Ok(Role::Viewer),
            _ => Err(RoleParseError(s.to_string())),
        }
    }
}
