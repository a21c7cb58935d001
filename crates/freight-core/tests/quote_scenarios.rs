//! End-to-end pricing scenarios and property checks against the public API.

use freight_core::rules::standard_ids;
use freight_core::weight::{assess, raw_weight};
use freight_core::{
    chargeable_weight, generate_quote, Location, Money, Piece, QuoteEngine, QuoteRejection,
    RateSheetRow, RateTable, RuleId, RuleSet, GST_RATE,
};
use proptest::prelude::*;

fn desk_rates() -> RateTable {
    let rows: Vec<RateSheetRow> = serde_json::from_str(
        r#"[
            {"OriginAirportCode": "POM", "DestinationAirportCode": "LAE", "Rate_Per_KG_PGK": 5},
            {"OriginAirportCode": "LAE", "DestinationAirportCode": "POM", "Rate_Per_KG_PGK": "5.20"},
            {"OriginAirportCode": "HGU", "DestinationAirportCode": "RAB", "Rate_Per_KG_PGK": 7.15},
            {"OriginAirportCode": "HGU", "DestinationAirportCode": "POM", "Rate_Per_KG_PGK": 6.5},
            {"OriginAirportCode": "RAB", "DestinationAirportCode": "HGU", "Rate_Per_KG_PGK": 0},
            {"OriginAirportCode": "WWK", "DestinationAirportCode": "RAB", "Rate_Per_KG_PGK": 4.125}
        ]"#,
    )
    .unwrap();
    RateTable::from_sheet_rows(rows).table
}

fn loc(code: &str) -> Location {
    Location::new(code)
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_pom_to_lae_fifty_kilograms() {
    let quote = generate_quote(
        &[Piece::weighing(50.0)],
        &loc("POM"),
        &loc("LAE"),
        &desk_rates(),
        &RuleSet::standard(),
    )
    .unwrap();

    let rows: Vec<(&str, i64, i64, i64)> = quote
        .line_items
        .iter()
        .map(|l| (l.name.as_str(), l.subtotal.cents(), l.tax.cents(), l.total.cents()))
        .collect();

    assert_eq!(
        rows,
        [
            ("Air Freight", 25000, 2500, 27500),
            ("Airline Fuel Surcharge", 1750, 175, 1925),
            ("AWB Fee", 7000, 700, 7700),
            ("PUD Fee", 8000, 800, 8800),
            ("PUD Fuel Surcharge", 800, 80, 880),
            ("Security Surcharge", 1000, 100, 1100),
        ]
    );
    assert_eq!(quote.subtotal, Money::from_cents(43550));
    assert_eq!(quote.tax, Money::from_cents(4355));
    assert_eq!(quote.grand_total, Money::from_cents(47905));
}

#[test]
fn test_pud_applies_when_only_destination_is_serviceable() {
    let quote = generate_quote(
        &[Piece::weighing(20.0)],
        &loc("HGU"),
        &loc("POM"),
        &desk_rates(),
        &RuleSet::standard(),
    )
    .unwrap();

    let pud = quote
        .line_for_rule(&RuleId::new(standard_ids::PUD_FEE))
        .unwrap();
    assert_eq!(pud.subtotal, Money::from_cents(8000));
}

#[test]
fn test_regional_route_without_pud() {
    // 10 kg HGU → RAB: security floors at 5.00, no PUD lines
    let quote = generate_quote(
        &[Piece::weighing(10.0)],
        &loc("HGU"),
        &loc("RAB"),
        &desk_rates(),
        &RuleSet::standard(),
    )
    .unwrap();

    let names: Vec<_> = quote.line_items.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(
        names,
        ["Air Freight", "Airline Fuel Surcharge", "AWB Fee", "Security Surcharge"]
    );
    assert_eq!(quote.line("Air Freight").unwrap().subtotal.cents(), 7150);
    assert_eq!(quote.line("Security Surcharge").unwrap().subtotal.cents(), 500);
    // 71.50 + 3.50 + 70.00 + 5.00
    assert_eq!(quote.subtotal.cents(), 15000);
}

#[test]
fn test_volumetric_shipment() {
    // 30 kg box measuring 100 × 80 × 60 cm → 80 kg volumetric
    let pieces = [Piece::new(30.0, 100.0, 80.0, 60.0), Piece::weighing(4.2)];
    assert_eq!(chargeable_weight(&pieces).unwrap().kg(), 85);

    let quote = generate_quote(
        &pieces,
        &loc("LAE"),
        &loc("POM"),
        &desk_rates(),
        &RuleSet::standard(),
    )
    .unwrap();
    assert_eq!(quote.chargeable_weight.kg(), 85);
    // 85 × 5.20
    assert_eq!(quote.line("Air Freight").unwrap().subtotal.cents(), 44200);
    // 85 × 0.80 = 68.00 is under the 80.00 floor
    assert_eq!(quote.line("PUD Fee").unwrap().subtotal.cents(), 8000);
}

#[test]
fn test_sub_cent_sheet_rate() {
    // 100 kg at 4.125/kg
    let quote = generate_quote(
        &[Piece::weighing(100.0)],
        &loc("WWK"),
        &loc("RAB"),
        &desk_rates(),
        &RuleSet::standard(),
    )
    .unwrap();

    assert_eq!(quote.line("Air Freight").unwrap().subtotal.cents(), 41250);
    // 412.50 + 35.00 + 70.00 + 20.00
    assert_eq!(quote.subtotal.cents(), 53750);
}

#[test]
fn test_rejections() {
    let rates = desk_rates();
    let rules = RuleSet::standard();
    let engine = QuoteEngine::new(&rules);

    assert_eq!(
        engine.quote(&[Piece::new(0.0, 0.0, 40.0, 40.0)], &loc("POM"), &loc("LAE"), &rates),
        Err(QuoteRejection::NoShipmentDetails)
    );
    assert_eq!(
        engine.quote(&[Piece::weighing(1.0e10)], &loc("POM"), &loc("LAE"), &rates),
        Err(QuoteRejection::WeightOutOfRange)
    );
    assert!(matches!(
        engine.quote(&[Piece::weighing(1.0)], &loc("LAE"), &loc("LAE"), &rates),
        Err(QuoteRejection::IdenticalOriginDestination { .. })
    ));

    let err = engine
        .quote(&[Piece::weighing(1.0)], &loc("RAB"), &loc("HGU"), &rates)
        .unwrap_err();
    assert_eq!(err.to_string(), "Sorry, a rate for RAB to HGU is not available.");

    // A rejection leaves the engine usable
    assert!(engine
        .quote(&[Piece::weighing(1.0)], &loc("POM"), &loc("LAE"), &rates)
        .is_ok());
}

#[test]
fn test_custom_rules_from_toml() {
    let rules: RuleSet = toml::from_str(
        r#"
        pickup_delivery_locations = ["RAB"]

        [[rules]]
        id = "doc"
        name = "Documentation"
        basis = { type = "per_shipment", amount = 2500 }

        [[rules]]
        id = "courier"
        name = "Courier Delivery"
        basis = { type = "per_weight", rate_per_kg = 5000 }
        minimum_charge = 3000
        applicability = "pickup_delivery"

        [[rules]]
        id = "courier-fuel"
        name = "Courier Fuel"
        basis = { type = "percentage_of", rate = 1250, depends_on = "courier" }
        applicability = "pickup_delivery"
        "#,
    )
    .unwrap();

    let quote = generate_quote(
        &[Piece::weighing(100.0)],
        &loc("HGU"),
        &loc("RAB"),
        &desk_rates(),
        &rules,
    )
    .unwrap();

    let names: Vec<_> = quote.line_items.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, ["Air Freight", "Courier Delivery", "Courier Fuel", "Documentation"]);
    assert_eq!(quote.line("Courier Delivery").unwrap().subtotal.cents(), 5000);
    assert_eq!(quote.line("Courier Fuel").unwrap().subtotal.cents(), 625);
}

#[test]
fn test_quote_serializes_with_form_field_names() {
    let quote = generate_quote(
        &[Piece::weighing(50.0)],
        &loc("POM"),
        &loc("LAE"),
        &desk_rates(),
        &RuleSet::standard(),
    )
    .unwrap();

    let json = serde_json::to_value(&quote).unwrap();
    assert_eq!(json["subTotal"], 43550);
    assert_eq!(json["grandTotal"], 47905);
    assert_eq!(json["lineItems"][0]["name"], "Air Freight");
    assert!(json["lineItems"][0]["subTotal"].is_number());

    let back: freight_core::Quote = serde_json::from_value(json).unwrap();
    assert_eq!(back, quote);
}

// =============================================================================
// Properties
// =============================================================================

fn piece_strategy() -> impl Strategy<Value = Piece> {
    (0.0f64..500.0, 0.0f64..300.0, 0.0f64..300.0, 0.0f64..300.0)
        .prop_map(|(w, l, wd, h)| Piece::new(w, l, wd, h))
}

proptest! {
    #[test]
    fn prop_chargeable_weight_is_ceiling_of_raw(
        pieces in prop::collection::vec(piece_strategy(), 0..8),
    ) {
        let raw = raw_weight(&pieces);
        let kg = chargeable_weight(&pieces).unwrap().kg() as f64;
        prop_assert!(kg >= raw);
        prop_assert!(kg - raw < 1.0);
    }

    #[test]
    fn prop_uncounted_pieces_change_nothing(
        pieces in prop::collection::vec(piece_strategy(), 0..6),
        width in 0.0f64..300.0,
        height in 0.0f64..300.0,
    ) {
        let mut padded = pieces.clone();
        padded.push(Piece::new(0.0, 0.0, width, height));
        prop_assert!(!assess(&Piece::new(0.0, 0.0, width, height)).counted);
        prop_assert_eq!(chargeable_weight(&pieces), chargeable_weight(&padded));
    }

    #[test]
    fn prop_totals_reconcile(
        pieces in prop::collection::vec(piece_strategy(), 1..6),
        route in prop::sample::select(vec![
            ("POM", "LAE"),
            ("LAE", "POM"),
            ("HGU", "RAB"),
            ("HGU", "POM"),
            ("WWK", "RAB"),
        ]),
    ) {
        let rates = desk_rates();
        let rules = RuleSet::standard();
        match generate_quote(&pieces, &loc(route.0), &loc(route.1), &rates, &rules) {
            Ok(quote) => {
                let mut subtotal = 0i64;
                let mut tax = 0i64;
                for line in &quote.line_items {
                    prop_assert_eq!(Some(line.tax), line.subtotal.checked_percentage(GST_RATE));
                    prop_assert_eq!(line.total.cents(), line.subtotal.cents() + line.tax.cents());
                    prop_assert!(!line.subtotal.is_negative());
                    subtotal += line.subtotal.cents();
                    tax += line.tax.cents();
                }
                prop_assert_eq!(quote.subtotal.cents(), subtotal);
                prop_assert_eq!(quote.tax.cents(), tax);
                prop_assert_eq!(quote.grand_total.cents(), subtotal + tax);

                let lowered: Vec<String> =
                    quote.line_items.iter().map(|l| l.name.to_lowercase()).collect();
                let mut sorted = lowered.clone();
                sorted.sort();
                prop_assert_eq!(lowered, sorted);
            }
            Err(rejection) => prop_assert_eq!(rejection, QuoteRejection::NoShipmentDetails),
        }
    }
}
