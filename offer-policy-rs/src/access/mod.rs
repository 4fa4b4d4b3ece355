// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
pub mod action;
pub mod context;
pub mod field;
pub mod permissions;
pub mod redact;
pub mod role;

pub use action::{authorize, AccessError, Action};
pub use context::AccessContext;
pub use field::{can_view_field, GuardedField, Visibility};
pub use permissions::{get_permissions, Capability, UserPermissions};
pub use redact::{
    filter_offer_for_role, filter_offers_for_role, filter_record_for_role, redact_fields,
    HIDDEN_SENTINEL, PRIVATE_SENTINEL,
};
pub use role::{Role, RoleParseError};
