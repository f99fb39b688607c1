//! Quantity generation and the parameter selection table.

use crate::generator::random::{
    Event, QuantityGenerationParams, QuantityParamsSelector, QuantitySource, RandomQuantitySource,
    SequenceValueGenerator,
};
use crate::model::Listing;

use super::test_helpers::test_listing;

fn source(draws: Vec<i64>) -> RandomQuantitySource<SequenceValueGenerator> {
    RandomQuantitySource::new(SequenceValueGenerator::new(draws))
}

#[test]
fn quantity_is_a_multiple_inside_the_bounds() {
    let params = QuantityGenerationParams::new(10.0, 20.0, 50.0).expect("valid params");
    let mut quantities = source(vec![3]);

    let (quantity, draw) = quantities.next_quantity(&params);
    assert_eq!(draw, 3);
    // lots 2..=5, draw 3 -> (3 + 2) * 10.
    assert_eq!(quantity, 50.0);
}

#[test]
fn zero_draw_at_zero_floor_falls_back_to_the_multiplier() {
    let params = QuantityGenerationParams::new(25.0, 0.0, 0.0).expect("valid params");
    let mut quantities = source(vec![0]);

    let (quantity, _) = quantities.next_quantity(&params);
    assert_eq!(quantity, 25.0);
}

#[test]
fn zero_multiplier_is_replaced_by_the_default() {
    let params = QuantityGenerationParams::new(0.0, 0.0, 0.0).expect("valid params");
    let mut quantities = source(vec![0]);

    let (quantity, _) = quantities.next_quantity(&params);
    assert_eq!(quantity, 1.0);
}

#[test]
fn invalid_bounds_are_rejected() {
    assert!(QuantityGenerationParams::new(1.0, -1.0, 5.0).is_err());
    assert!(QuantityGenerationParams::new(1.0, 5.0, 2.0).is_err());
    assert!(QuantityGenerationParams::new(1.0, 5.0, 5.0).is_ok());
}

#[test]
fn resting_bounds_come_from_the_random_qty_knobs_when_tighter() {
    let listing = Listing {
        qty_minimum: Some(1.0),
        qty_maximum: Some(100.0),
        random_qty_minimum: Some(10.0),
        random_qty_maximum: Some(60.0),
        ..test_listing()
    };
    let selector = QuantityParamsSelector::new(&listing);

    let params = selector.select(0.0, Event::RestingBuy).expect("valid bounds");
    assert_eq!(params.minimum(), 10.0);
    assert_eq!(params.maximum(), 60.0);
}

#[test]
fn random_qty_knobs_outside_the_instrument_bounds_lose() {
    let listing = Listing {
        qty_minimum: Some(5.0),
        qty_maximum: Some(50.0),
        random_qty_minimum: Some(1.0),   // below the instrument floor
        random_qty_maximum: Some(500.0), // above the instrument ceiling
        ..test_listing()
    };
    let selector = QuantityParamsSelector::new(&listing);

    let params = selector.select(0.0, Event::RestingSell).expect("valid bounds");
    assert_eq!(params.minimum(), 5.0);
    assert_eq!(params.maximum(), 50.0);
}

#[test]
fn amount_knobs_override_when_the_implied_quantity_tightens() {
    let listing = Listing {
        qty_minimum: Some(1.0),
        qty_maximum: Some(100.0),
        random_qty_minimum: Some(10.0),
        random_amt_minimum: Some(100.0), // at price 5 -> 20 units
        random_amt_maximum: Some(400.0), // at price 5 -> 80 units
        ..test_listing()
    };
    let selector = QuantityParamsSelector::new(&listing);

    let params = selector.select(5.0, Event::RestingBuy).expect("valid bounds");
    assert_eq!(params.minimum(), 20.0);
    assert_eq!(params.maximum(), 80.0);
}

#[test]
fn amount_knobs_are_ignored_at_zero_price() {
    let listing = Listing {
        random_qty_minimum: Some(10.0),
        random_amt_minimum: Some(100.0),
        ..test_listing()
    };
    let selector = QuantityParamsSelector::new(&listing);

    let params = selector.select(0.0, Event::RestingBuy).expect("valid bounds");
    assert_eq!(params.minimum(), 10.0);
}

#[test]
fn aggressive_events_use_the_aggressive_table_when_any_knob_is_set() {
    let listing = Listing {
        qty_minimum: Some(1.0),
        qty_maximum: Some(100.0),
        random_qty_minimum: Some(10.0),
        random_aggressive_qty_minimum: Some(2.0),
        ..test_listing()
    };
    let selector = QuantityParamsSelector::new(&listing);

    // Aggressive minimum side uses the aggressive knob...
    let aggressive = selector
        .select(0.0, Event::AggressiveBuy)
        .expect("valid bounds");
    assert_eq!(aggressive.minimum(), 2.0);

    // ...while resting events keep consulting the resting table.
    let resting = selector.select(0.0, Event::RestingBuy).expect("valid bounds");
    assert_eq!(resting.minimum(), 10.0);
}

#[test]
fn aggressive_dispatch_is_per_bound_side() {
    // Only an aggressive *maximum* knob is configured: aggressive events
    // take the aggressive ceiling but fall back to the resting floor.
    let listing = Listing {
        qty_minimum: Some(1.0),
        qty_maximum: Some(100.0),
        random_qty_minimum: Some(10.0),
        random_qty_maximum: Some(90.0),
        random_aggressive_amt_maximum: Some(200.0), // at price 4 -> 50 units
        ..test_listing()
    };
    let selector = QuantityParamsSelector::new(&listing);

    let params = selector
        .select(4.0, Event::AggressiveSell)
        .expect("valid bounds");
    assert_eq!(params.minimum(), 10.0);
    assert_eq!(params.maximum(), 50.0);
}

#[test]
fn aggressive_amount_loosening_is_ignored() {
    let listing = Listing {
        qty_minimum: Some(1.0),
        qty_maximum: Some(100.0),
        random_aggressive_qty_maximum: Some(40.0),
        random_aggressive_amt_maximum: Some(10_000.0), // at price 5 -> 2000, looser
        ..test_listing()
    };
    let selector = QuantityParamsSelector::new(&listing);

    let params = selector
        .select(5.0, Event::AggressiveBuy)
        .expect("valid bounds");
    assert_eq!(params.maximum(), 40.0);
}
