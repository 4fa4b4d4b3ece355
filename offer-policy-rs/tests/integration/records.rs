use chrono::Utc;
use offer_policy::access::{filter_offers_for_role, filter_record_for_role, Role};
use offer_policy::record::{NewOffer, Offer, OfferStats, OfferStatus, OfferTally, SeedData};

const SEED: &str = r#"
buyers:
  - buyer_id: "B-ACME"
    buyer_name: "Acme Health"
offers:
  - offer_id: "ACA-001"
    campaign_name: "ACA CPA"
    vertical: "ACA"
    status: "Active"
    buyer_id: "B-ACME"
    advertiser_price_min: 10
    advertiser_price_max: 20
    publisher_payout_min: 5
    publisher_payout_max: 15
    notes: "Acme pays net 15"
  - offer_id: "MEDICA-002"
    campaign_name: "Medicare Transfer"
    vertical: "Medicare"
    offer_type: "Transfer"
"#;

fn seeded_offers() -> Vec<Offer> {
    let seed = SeedData::from_yaml(SEED).unwrap();
    let now = Utc::now();
    seed.offers
        .into_iter()
        .enumerate()
        .map(|(i, offer)| offer.into_offer(format!("id-{}", i), now))
        .collect()
}

#[test]
fn test_typed_offer_redacted_for_publisher() {
    let offers = seeded_offers();
    let out = filter_record_for_role(&offers[0], Role::Publisher).unwrap();

    assert_eq!(out["offer_id"], "ACA-001");
    assert_eq!(out["buyer_name"], "[Private]");
    assert_eq!(out["advertiser_price_info"], "[Hidden]");
    assert_eq!(out["publisher_payout_min"], 5.0);
    assert!(out.get("buyer_id").is_none());
    assert!(out.get("advertiser_price_max").is_none());
    assert!(out.get("notes").is_none());
}

#[test]
fn test_typed_offer_kept_for_admin() {
    let offers = seeded_offers();
    let out = filter_record_for_role(&offers[0], Role::Admin).unwrap();

    assert_eq!(out["buyer_id"], "B-ACME");
    assert_eq!(out["notes"], "Acme pays net 15");
    assert_eq!(out, serde_json::to_value(&offers[0]).unwrap());
}

#[test]
fn test_batch_redaction_preserves_order() {
    let offers = seeded_offers();
    let out = filter_offers_for_role(&offers, Role::Viewer).unwrap();

    assert_eq!(out.len(), 2);
    assert_eq!(out[0]["offer_id"], "ACA-001");
    assert_eq!(out[1]["offer_id"], "MEDICA-002");
}

#[test]
fn test_stats_over_seed() {
    let offers = seeded_offers();
    let tallies: Vec<OfferTally> = offers.iter().map(OfferTally::from).collect();
    let stats = OfferStats::collect(&tallies, 1, 0);

    assert_eq!(stats.total_offers, 2);
    assert_eq!(stats.active_offers, 1);
    assert_eq!(stats.offers_by_status.get("Testing"), Some(&1));
    assert_eq!(stats.offers_by_vertical.get("Medicare"), Some(&1));
}

#[test]
fn test_generated_offer_is_valid() {
    let offer = NewOffer::generated("Home Services", "Form Fill", 1);
    assert_eq!(offer.offer_id, "HOMESE-001");
    assert_eq!(offer.campaign_name, "Home Services Form Fill");
    assert_eq!(offer.status, OfferStatus::Testing);
    assert!(offer.validate().is_ok());
}
