//! Integer-bucket boundaries of events and resting-order actions.

use crate::generator::message::Side;
use crate::generator::random::{Event, RestingOrderAction};

#[test]
fn event_bucket_boundaries() {
    assert_eq!(Event::from_integer(0), Event::RestingBuy);
    assert_eq!(Event::from_integer(9), Event::RestingBuy);
    assert_eq!(Event::from_integer(10), Event::RestingSell);
    assert_eq!(Event::from_integer(19), Event::RestingSell);
    assert_eq!(Event::from_integer(20), Event::AggressiveBuy);
    assert_eq!(Event::from_integer(24), Event::AggressiveBuy);
    assert_eq!(Event::from_integer(25), Event::AggressiveSell);
    assert_eq!(Event::from_integer(28), Event::AggressiveSell);
    assert_eq!(Event::from_integer(29), Event::NoOperation);
}

#[test]
fn event_classification() {
    assert!(Event::RestingBuy.is_resting());
    assert!(Event::RestingBuy.is_buy());
    assert!(Event::AggressiveSell.is_aggressive());
    assert!(Event::AggressiveSell.is_sell());
    assert!(Event::NoOperation.is_noop());
    assert!(!Event::NoOperation.is_buy());
    assert!(!Event::NoOperation.is_sell());
}

#[test]
fn event_target_sides() {
    assert_eq!(Event::RestingBuy.target_side(), Some(Side::Buy));
    assert_eq!(Event::AggressiveBuy.target_side(), Some(Side::Buy));
    assert_eq!(Event::RestingSell.target_side(), Some(Side::Sell));
    assert_eq!(Event::AggressiveSell.target_side(), Some(Side::Sell));
    assert_eq!(Event::NoOperation.target_side(), None);
}

#[test]
fn resting_action_bucket_boundaries() {
    assert_eq!(
        RestingOrderAction::from_integer(0),
        RestingOrderAction::QuantityModification
    );
    assert_eq!(
        RestingOrderAction::from_integer(8),
        RestingOrderAction::QuantityModification
    );
    assert_eq!(
        RestingOrderAction::from_integer(9),
        RestingOrderAction::PriceModification
    );
    assert_eq!(
        RestingOrderAction::from_integer(17),
        RestingOrderAction::PriceModification
    );
    assert_eq!(
        RestingOrderAction::from_integer(18),
        RestingOrderAction::Cancellation
    );
    assert_eq!(
        RestingOrderAction::from_integer(19),
        RestingOrderAction::Cancellation
    );
}

#[test]
fn random_ranges_cover_the_declared_intervals() {
    assert_eq!(Event::MIN_RANDOM_INTEGER, 0);
    assert_eq!(Event::MAX_RANDOM_INTEGER, 29);
    assert_eq!(RestingOrderAction::MIN_RANDOM_INTEGER, 0);
    assert_eq!(RestingOrderAction::MAX_RANDOM_INTEGER, 19);
}
