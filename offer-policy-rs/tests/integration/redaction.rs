use offer_policy::access::{
    can_view_field, filter_offer_for_role, get_permissions, GuardedField, Role, HIDDEN_SENTINEL,
    PRIVATE_SENTINEL,
};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

const OFFER_FIELDS: &[&str] = &[
    "offer_id",
    "campaign_name",
    "vertical",
    "status",
    "buyer",
    "buyer_id",
    "buyer_name",
    "buyer_email",
    "publisher",
    "publisher_id",
    "publisher_name",
    "advertiser_price_min",
    "advertiser_price_max",
    "advertiser_price_info",
    "publisher_payout_min",
    "publisher_payout_max",
    "publisher_payout_info",
    "profit",
    "margin",
    "notes",
];

fn any_role() -> impl Strategy<Value = Role> {
    prop::sample::select(Role::ALL.to_vec())
}

fn any_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        (0i64..100_000).prop_map(Value::from),
        "[a-zA-Z0-9 ]{0,12}".prop_map(Value::from),
    ]
}

fn any_offer() -> impl Strategy<Value = Value> {
    (
        prop::collection::vec((prop::sample::select(OFFER_FIELDS.to_vec()), any_scalar()), 0..20),
        prop::collection::vec(("[a-z_]{1,10}", any_scalar()), 0..4),
    )
        .prop_map(|(known, extra)| {
            let mut fields = Map::new();
            for (key, value) in known {
                fields.insert(key.to_string(), value);
            }
            for (key, value) in extra {
                fields.insert(key, value);
            }
            Value::Object(fields)
        })
}

fn full_offer() -> Value {
    json!({
        "offer_id": "ACA-001",
        "campaign_name": "ACA CPA",
        "vertical": "ACA",
        "status": "Active",
        "buyer": {"buyer_name": "Acme"},
        "buyer_id": "B-1",
        "publisher": {"publisher_name": "Traffic Co"},
        "publisher_id": "P-1",
        "advertiser_price_min": 10,
        "advertiser_price_max": 20,
        "publisher_payout_min": 5,
        "publisher_payout_max": 15,
        "profit": 100,
        "margin": 0.25,
        "notes": "secret"
    })
}

#[test]
fn test_admin_keeps_buyer_and_profit() {
    let offer = json!({"buyer": {"buyer_name": "Acme"}, "profit": 100});
    let out = filter_offer_for_role(&offer, Role::Admin);

    assert_eq!(out["buyer"], json!({"buyer_name": "Acme"}));
    assert_eq!(out["profit"], 100);
}

#[test]
fn test_publisher_loses_advertiser_pricing_and_notes() {
    let offer = json!({
        "advertiser_price_min": 10,
        "advertiser_price_max": 20,
        "notes": "secret"
    });
    let out = filter_offer_for_role(&offer, Role::Publisher);

    assert!(out.get("advertiser_price_min").is_none());
    assert!(out.get("advertiser_price_max").is_none());
    assert_eq!(out["advertiser_price_info"], HIDDEN_SENTINEL);
    assert!(out.get("notes").is_none());
}

#[test]
fn test_advertiser_loses_publisher_payout() {
    let offer = json!({"publisher_payout_min": 5, "publisher_payout_max": 15});
    let out = filter_offer_for_role(&offer, Role::Advertiser);

    assert!(out.get("publisher_payout_min").is_none());
    assert!(out.get("publisher_payout_max").is_none());
    assert_eq!(out["publisher_payout_info"], HIDDEN_SENTINEL);
}

#[test]
fn test_viewer_sees_placeholders_only() {
    let out = filter_offer_for_role(&full_offer(), Role::Viewer);

    assert_eq!(out["buyer_name"], PRIVATE_SENTINEL);
    assert_eq!(out["publisher_name"], PRIVATE_SENTINEL);
    for field in [
        "buyer",
        "buyer_id",
        "publisher",
        "publisher_id",
        "profit",
        "margin",
        "notes",
    ] {
        assert!(out.get(field).is_none(), "{} should be redacted", field);
    }
    // Viewer is neither publisher nor advertiser: pricing pairs are untouched
    assert_eq!(out["advertiser_price_min"], 10);
    assert_eq!(out["publisher_payout_min"], 5);
    assert_eq!(out["offer_id"], "ACA-001");
}

#[test]
fn test_manager_sees_full_record() {
    assert_eq!(filter_offer_for_role(&full_offer(), Role::Manager), full_offer());
}

// Pins current behaviour: notes are dropped for every role without financial
// visibility, although notes are not financial data. Open for product review.
#[test]
fn test_notes_dropped_without_financials() {
    let offer = json!({"notes": "call before 5pm"});
    for role in Role::ALL {
        let out = filter_offer_for_role(&offer, role);
        assert_eq!(
            out.get("notes").is_some(),
            get_permissions(role).can_view_financials,
            "role {}",
            role
        );
    }
    // can_view_field has no rule for notes
    assert!(can_view_field(Role::Viewer, "notes"));
}

#[test]
fn test_advertiser_payout_rule_is_role_based() {
    // Publisher and viewer lack financials but keep payouts; only advertiser loses them.
    let offer = json!({"publisher_payout_min": 5});
    for role in Role::ALL {
        let out = filter_offer_for_role(&offer, role);
        assert_eq!(out.get("publisher_payout_min").is_none(), role == Role::Advertiser);
    }
    assert!(!get_permissions(Role::Publisher).can_view_financials);
    assert!(can_view_field(Role::Publisher, "publisher_payout_max"));
}

#[test]
fn test_guarded_field_table_is_consistent_with_redaction() {
    // Every field removed by the redaction pass is also reported as hidden by can_view_field,
    // except buyer_name and publisher_name which carry placeholders instead.
    for role in Role::ALL {
        let out = filter_offer_for_role(&full_offer(), role);
        for field in GuardedField::ALL {
            if out.get(field.name()).is_none() && full_offer().get(field.name()).is_some() {
                assert!(
                    !can_view_field(role, field.name()),
                    "{} removed for {} but reported visible",
                    field.name(),
                    role
                );
            }
        }
    }
}

#[test]
fn test_viewer_keeps_advertiser_pricing_in_records() {
    // The field table hides advertiser pricing from every role without financials,
    // but record redaction strips it for publishers only.
    assert!(!can_view_field(Role::Viewer, "advertiser_price_min"));
    assert!(!can_view_field(Role::Viewer, "advertiser_price_max"));

    let out = filter_offer_for_role(&full_offer(), Role::Viewer);
    assert_eq!(out["advertiser_price_min"], 10);
    assert_eq!(out["advertiser_price_max"], 20);
    assert!(out.get("advertiser_price_info").is_none());

    let out = filter_offer_for_role(&full_offer(), Role::Publisher);
    assert!(out.get("advertiser_price_min").is_none());
    assert_eq!(out["advertiser_price_info"], "[Hidden]");
}

proptest! {
    #[test]
    fn prop_unknown_fields_visible(role in any_role(), name in "[a-z_]{0,24}") {
        prop_assume!(GuardedField::from_name(&name).is_none());
        prop_assert!(can_view_field(role, &name));
    }

    #[test]
    fn prop_idempotent(offer in any_offer(), role in any_role()) {
        let once = filter_offer_for_role(&offer, role);
        let twice = filter_offer_for_role(&once, role);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_input_not_mutated(offer in any_offer(), role in any_role()) {
        let before = offer.clone();
        let _ = filter_offer_for_role(&offer, role);
        prop_assert_eq!(offer, before);
    }

    #[test]
    fn prop_unrelated_fields_pass_through(offer in any_offer(), role in any_role()) {
        let out = filter_offer_for_role(&offer, role);
        let touched = [
            "buyer", "buyer_id", "buyer_name", "publisher", "publisher_id", "publisher_name",
            "advertiser_price_min", "advertiser_price_max", "advertiser_price_info",
            "publisher_payout_min", "publisher_payout_max", "publisher_payout_info",
            "profit", "margin", "notes",
        ];
        for (key, value) in offer.as_object().unwrap() {
            if !touched.contains(&key.as_str()) {
                prop_assert_eq!(out.get(key), Some(value));
            }
        }
    }

    #[test]
    fn prop_permissions_deterministic(role in any_role()) {
        prop_assert_eq!(get_permissions(role), get_permissions(role));
    }
}
