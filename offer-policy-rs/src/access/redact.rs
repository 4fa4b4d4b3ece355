// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
use serde::Serialize;
use serde_json::{Map, Value};

use crate::access::field::GuardedField;
use crate::access::permissions::get_permissions;
use crate::access::role::Role;

/// Placeholder for withheld party identity.
pub const PRIVATE_SENTINEL: &str = "[Private]";

/// Placeholder for withheld counterpart pricing.
pub const HIDDEN_SENTINEL: &str = "[Hidden]";

/// Redact a record for `role`.
///
/// Returns a new value; `offer` is left untouched. Anything other than a JSON
/// object is returned as-is.
pub fn filter_offer_for_role(offer: &Value, role: Role) -> Value {
    match offer {
        Value::Object(fields) => Value::Object(redact_fields(fields, role)),
        other => other.clone(),
    }
}

/// Redact a JSON object's fields for `role`.
///
/// Rules apply in a fixed order. A removed field is the redaction signal, except
/// for `buyer_name`, `publisher_name`, `advertiser_price_info` and
/// `publisher_payout_info` which receive a sentinel string.
pub fn redact_fields(fields: &Map<String, Value>, role: Role) -> Map<String, Value> {
    let permissions = get_permissions(role);
    let mut filtered = fields.clone();

    if !permissions.can_view_buyers {
        strip(&mut filtered, &[GuardedField::Buyer, GuardedField::BuyerId]);
        filtered.insert(
            GuardedField::BuyerName.name().to_string(),
            Value::from(PRIVATE_SENTINEL),
        );
    }

    if !permissions.can_view_publishers {
        strip(
            &mut filtered,
            &[GuardedField::Publisher, GuardedField::PublisherId],
        );
        filtered.insert(
            GuardedField::PublisherName.name().to_string(),
            Value::from(PRIVATE_SENTINEL),
        );
    }

    if role == Role::Publisher {
        strip(
            &mut filtered,
            &[
                GuardedField::AdvertiserPriceMin,
                GuardedField::AdvertiserPriceMax,
            ],
        );
        filtered.insert(
            "advertiser_price_info".to_string(),
            Value::from(HIDDEN_SENTINEL),
        );
    }

    if role == Role::Advertiser {
        strip(
            &mut filtered,
            &[
                GuardedField::PublisherPayoutMin,
                GuardedField::PublisherPayoutMax,
            ],
        );
        filtered.insert(
            "publisher_payout_info".to_string(),
            Value::from(HIDDEN_SENTINEL),
        );
    }

    if !permissions.can_view_financials {
        strip(&mut filtered, &[GuardedField::Profit, GuardedField::Margin]);
        // Free-text notes may quote prices or buyer names. Pending product review.
        filtered.remove("notes");
    }

    filtered
}

/// Serialize a typed record and redact it for `role`.
pub fn filter_record_for_role<T: Serialize>(
    record: &T,
    role: Role,
) -> Result<Value, serde_json::Error> {
    let value = serde_json::to_value(record)?;
    Ok(filter_offer_for_role(&value, role))
}

/// Serialize and redact a batch of records for `role`.
pub fn filter_offers_for_role<T: Serialize>(
    records: &[T],
    role: Role,
) -> Result<Vec<Value>, serde_json::Error> {
    records
        .iter()
        .map(|record| filter_record_for_role(record, role))
        .collect()
}

fn strip(fields: &mut Map<String, Value>, guarded: &[GuardedField]) {
    for field in guarded {
        fields.remove(field.name());
    }
}
