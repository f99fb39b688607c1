//! Price generation: base resolution, spread direction, tick ladder,
//! non-negativity.

use crate::generator::market_data::MarketState;
use crate::generator::random::{
    Event, PriceGenerationParams, PriceSource, RandomPriceSource, SequenceValueGenerator,
    price_params,
};
use crate::model::{Listing, PriceSeed};

use super::test_helpers::{test_listing, test_seed};

fn params() -> PriceGenerationParams {
    // tick_range 5, tick_size 0.1, spread 0.01
    price_params(&test_listing())
}

fn market(bid: Option<f64>, offer: Option<f64>) -> MarketState {
    MarketState {
        best_bid_price: bid,
        best_offer_price: offer,
        ..MarketState::default()
    }
}

fn source(draws: Vec<i64>) -> RandomPriceSource<SequenceValueGenerator> {
    RandomPriceSource::new(SequenceValueGenerator::new(draws))
}

#[test]
fn resting_buy_subtracts_spread_and_tick_from_the_opposite_best() {
    let mut prices = source(vec![0]);
    let (price, details) = prices.next_price(
        &params(),
        &market(Some(10.0), Some(10.05)),
        &test_seed(),
        Event::RestingBuy,
    );

    // base = 10.05 - 0.01 spread; draw 0 maps to the full 5-tick
    // deviation of 0.5.
    assert!((details.base_price - 10.04).abs() < 1e-9);
    assert!(!details.increment_added);
    assert!((price - 9.54).abs() < 1e-9);
}

#[test]
fn resting_sell_adds_spread_and_tick() {
    let mut prices = source(vec![0]);
    let (price, details) = prices.next_price(
        &params(),
        &market(Some(10.0), Some(10.05)),
        &test_seed(),
        Event::RestingSell,
    );

    // base = 10.0 + 0.01 spread, tick 0.5 added.
    assert!((details.base_price - 10.01).abs() < 1e-9);
    assert!(details.increment_added);
    assert!((price - 10.51).abs() < 1e-9);
}

#[test]
fn aggressive_buy_adds_tick_to_the_raw_opposite_best() {
    let mut prices = source(vec![0]);
    let (price, details) = prices.next_price(
        &params(),
        &market(Some(10.0), Some(10.05)),
        &test_seed(),
        Event::AggressiveBuy,
    );

    // No spread for aggressive orders.
    assert!((details.base_price - 10.05).abs() < 1e-9);
    assert!(details.increment_added);
    assert!((price - 10.55).abs() < 1e-9);
}

#[test]
fn tick_ladder_is_geometric_over_five_rungs() {
    // tick_range 5 with coefficient 1.05 gives an integer series sum of
    // 5; the draws 0..=4 map to deviations 0..=4 and ticks 0.5..=0.1.
    let expectations = [(0, 0.5), (1, 0.4), (2, 0.3), (3, 0.2), (4, 0.1)];
    for (draw, expected_tick) in expectations {
        let mut prices = source(vec![draw]);
        let (_, details) = prices.next_price(
            &params(),
            &market(Some(10.0), Some(10.05)),
            &test_seed(),
            Event::AggressiveBuy,
        );
        assert_eq!(details.geometric_sum, 5);
        assert!(
            (details.random_tick - expected_tick).abs() < 1e-9,
            "draw {draw} expected tick {expected_tick}, got {}",
            details.random_tick
        );
    }
}

#[test]
fn missing_opposite_side_falls_back_to_the_same_side_without_spread() {
    let mut prices = source(vec![0]);
    let (price, details) = prices.next_price(
        &params(),
        &market(Some(10.0), None),
        &test_seed(),
        Event::RestingBuy,
    );

    assert!((details.base_price - 10.0).abs() < 1e-9);
    assert!((price - 9.5).abs() < 1e-9);
}

#[test]
fn empty_market_falls_back_to_the_seed_for_the_event_side() {
    let mut prices = source(vec![0]);
    let seed = test_seed();

    let (buy_price, details) =
        prices.next_price(&params(), &market(None, None), &seed, Event::RestingBuy);
    assert!(details.seed_price_used);
    assert_eq!(buy_price, 10.0);

    let (sell_price, _) =
        prices.next_price(&params(), &market(None, None), &seed, Event::RestingSell);
    assert_eq!(sell_price, 10.05);
}

#[test]
fn seed_mid_price_backs_an_absent_side_seed() {
    let mut prices = source(vec![0]);
    let seed = PriceSeed {
        mid_price: Some(42.0),
        ..PriceSeed::new("TEST")
    };

    let (price, details) =
        prices.next_price(&params(), &market(None, None), &seed, Event::RestingSell);
    assert!(details.seed_price_used);
    assert_eq!(price, 42.0);
}

#[test]
fn zero_prices_count_as_an_empty_side() {
    let mut prices = source(vec![0]);
    let (price, details) = prices.next_price(
        &params(),
        &market(Some(0.0), Some(0.0)),
        &test_seed(),
        Event::RestingBuy,
    );
    assert!(details.seed_price_used);
    assert_eq!(price, 10.0);
}

#[test]
fn price_never_goes_negative_when_the_tick_exceeds_the_base() {
    let mut prices = source(vec![0]);
    let (price, details) = prices.next_price(
        &params(),
        &market(Some(0.25), Some(0.31)),
        &test_seed(),
        Event::RestingBuy,
    );

    // base = 0.30, tick 0.5 >= base: the tick itself becomes the price.
    assert!((details.random_tick - 0.5).abs() < 1e-9);
    assert!((price - 0.5).abs() < 1e-9);
    assert!(price >= 0.0);
}

#[test]
fn spread_defaults_to_the_tick_size() {
    let listing = Listing {
        random_orders_spread: None,
        price_tick_size: Some(0.25),
        ..test_listing()
    };
    let params = price_params(&listing);
    assert_eq!(params.spread, 0.25);
    assert_eq!(params.tick_size, 0.25);
}
