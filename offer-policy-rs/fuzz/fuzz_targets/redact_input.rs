#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use offer_policy::access::{can_view_field, filter_offer_for_role, Role};

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    role: u8,
    field_name: String,
    fields: Vec<(FuzzField, Option<String>)>,
}

#[derive(Arbitrary, Debug)]
enum FuzzField {
    Buyer,
    BuyerId,
    BuyerName,
    Publisher,
    PublisherId,
    AdvertiserPriceMin,
    PublisherPayoutMax,
    Profit,
    Notes,
    Other(String),
}

impl FuzzField {
    fn name(&self) -> String {
        match self {
            FuzzField::Buyer => "buyer".to_string(),
            FuzzField::BuyerId => "buyer_id".to_string(),
            FuzzField::BuyerName => "buyer_name".to_string(),
            FuzzField::Publisher => "publisher".to_string(),
            FuzzField::PublisherId => "publisher_id".to_string(),
            FuzzField::AdvertiserPriceMin => "advertiser_price_min".to_string(),
            FuzzField::PublisherPayoutMax => "publisher_payout_max".to_string(),
            FuzzField::Profit => "profit".to_string(),
            FuzzField::Notes => "notes".to_string(),
            FuzzField::Other(name) => name.clone(),
        }
    }
}

fuzz_target!(|input: FuzzInput| {
    let role = Role::ALL[input.role as usize % Role::ALL.len()];

    let mut fields = serde_json::Map::new();
    for (field, value) in &input.fields {
        fields.insert(field.name(), serde_json::json!(value));
    }
    let offer = serde_json::Value::Object(fields);

    // Should never panic, and redaction must be idempotent
    let once = filter_offer_for_role(&offer, role);
    let twice = filter_offer_for_role(&once, role);
    assert_eq!(once, twice);

    let _ = can_view_field(role, &input.field_name);
});
