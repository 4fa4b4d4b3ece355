// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
//! RBAC enforcement at the HTTP boundary.
//!
//! Wraps `AccessContext::authorize` with the audit logging handlers rely on.

use offer_policy::access::{AccessContext, AccessError, Action};
use tracing::{debug, warn};

/// Check that the caller may perform `action`.
pub fn enforce(context: &AccessContext, action: Action) -> Result<(), AccessError> {
    debug!(
        role = %context.role,
        action = %action,
        request_id = ?context.request_id,
        "Checking RBAC authorization"
    );

    context.authorize(action).map_err(|e| {
        warn!(
            role = %context.role,
            user_id = ?context.user_id,
            action = %action,
            request_id = ?context.request_id,
            "Action denied"
        );
        e
    })
}
