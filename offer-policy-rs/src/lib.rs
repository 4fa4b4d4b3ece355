//! Offer Policy - role-based permissions and field redaction for offer records
//!
//! This crate decides what each dashboard role may do and see, and strips
//! buyer identity and counterpart pricing from records before they reach a viewer.
//!
//! # Example
//!
//! ```rust
//! use offer_policy::access::{filter_offer_for_role, Role};
//! use serde_json::json;
//!
//! let offer = json!({
//!     "offer_id": "ACA-001",
//!     "buyer": {"buyer_name": "Acme"},
//!     "advertiser_price_min": 10,
//!     "notes": "secret"
//! });
//!
//! let redacted = filter_offer_for_role(&offer, Role::Publisher);
//!
//! assert_eq!(redacted["buyer_name"], "[Private]");
//! assert_eq!(redacted["advertiser_price_info"], "[Hidden]");
//! assert!(redacted.get("buyer").is_none());
//! assert!(redacted.get("notes").is_none());
//! ```

pub mod access;
pub mod record;

// Re-export commonly used types at the crate root
pub use access::{
    can_view_field, filter_offer_for_role, get_permissions, AccessContext, AccessError, Action,
    Capability, Role, RoleParseError, UserPermissions,
};
pub use record::{Offer, OfferStats, RecordViolation, SeedData};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Redact a JSON record for a role given by name
///
/// This is a convenience function for callers holding an untyped role string.
///
/// # Example
///
/// ```rust
/// use offer_policy::redact_json;
/// use serde_json::json;
///
/// let redacted = redact_json("advertiser", &json!({"publisher_payout_min": 5})).unwrap();
/// assert_eq!(redacted["publisher_payout_info"], "[Hidden]");
///
/// assert!(redact_json("root", &json!({})).is_err());
/// ```
pub fn redact_json(
    role: &str,
    record: &serde_json::Value,
) -> Result<serde_json::Value, RoleParseError> {
    let role: Role = role.parse()?;
    Ok(filter_offer_for_role(record, role))
}
