use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::access::action::{authorize, AccessError, Action};
use crate::access::field::can_view_field;
use crate::access::permissions::{Capability, UserPermissions};
use crate::access::redact::filter_offer_for_role;
use crate::access::role::Role;

/// Per-request viewer context.
///
/// Built from the caller's credentials and passed explicitly to every call that
/// needs a role. There is no process-wide default role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessContext {
    /// Viewer's role
    pub role: Role,
    /// User identifier, when known
    #[serde(default)]
    pub user_id: Option<String>,
    /// Request ID for tracing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl AccessContext {
    /// Create a new context for a role
    pub fn new(role: Role) -> Self {
        Self {
            role,
            user_id: None,
            request_id: None,
        }
    }

    /// Set the user ID
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Set the request ID
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Capability set of the viewer
    pub fn permissions(&self) -> UserPermissions {
        self.role.permissions()
    }

    /// Check a single capability
    pub fn can(&self, capability: Capability) -> bool {
        self.permissions().allows(capability)
    }

    /// Check field visibility for the viewer
    pub fn can_view_field(&self, field_name: &str) -> bool {
        can_view_field(self.role, field_name)
    }

    /// Check that the viewer may perform an action
    pub fn authorize(&self, action: Action) -> Result<(), AccessError> {
        authorize(self.role, action)
    }

    /// Redact a record for the viewer
    pub fn redact(&self, record: &Value) -> Value {
        filter_offer_for_role(record, self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_context() {
        let ctx = AccessContext::new(Role::Viewer);
        assert_eq!(ctx.role, Role::Viewer);
        assert!(ctx.user_id.is_none());
        assert!(ctx.request_id.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let ctx = AccessContext::new(Role::Manager)
            .with_user("user123")
            .with_request_id("req-1");

        assert_eq!(ctx.user_id, Some("user123".to_string()));
        assert_eq!(ctx.request_id, Some("req-1".to_string()));
    }

    #[test]
    fn test_can() {
        let ctx = AccessContext::new(Role::Manager);
        assert!(ctx.can(Capability::EditOffers));
        assert!(!ctx.can(Capability::DeleteOffers));
    }

    #[test]
    fn test_authorize() {
        assert!(AccessContext::new(Role::Admin)
            .authorize(Action::DeleteOffer)
            .is_ok());
        assert!(AccessContext::new(Role::Viewer)
            .authorize(Action::CreateOffer)
            .is_err());
    }

    #[test]
    fn test_redact_uses_role() {
        let ctx = AccessContext::new(Role::Advertiser);
        let out = ctx.redact(&json!({"publisher_payout_min": 5}));
        assert_eq!(out["publisher_payout_info"], "[Hidden]");
        assert!(!ctx.can_view_field("publisher_payout_min"));
    }

    #[test]
    fn test_serialization() {
        let ctx = AccessContext::new(Role::Publisher).with_user("user1");

        let json = serde_json::to_string(&ctx).unwrap();
        let ctx2: AccessContext = serde_json::from_str(&json).unwrap();

        assert_eq!(ctx, ctx2);
        assert!(json.contains("\"publisher\""));
    }
}
