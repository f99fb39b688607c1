//! Generation defaults and fixed protocol attributes.

use crate::generator::message::{OrderType, TimeInForce};

/// Number of random counterparties assumed when the venue does not
/// configure one.
pub const DEFAULT_VENUE_RANDOM_PARTIES_COUNT: u32 = 10;

/// Counterparty identifiers are `CP1`, `CP2`, ...
pub const COUNTERPARTY_ID_PREFIX: &str = "CP";

/// Prefix of synthetic client order identifiers.
pub const SYNTHETIC_IDENTIFIER_PREFIX: &str = "SIM";

/// Quantity multiple assumed when the listing does not configure one (or
/// configures zero).
pub const DEFAULT_LISTING_QTY_MULTIPLE: f64 = 1.0;

/// Instrument quantity floor assumed when unconfigured.
pub const DEFAULT_LISTING_QTY_MINIMUM: f64 = 1.0;

/// Instrument quantity ceiling assumed when unconfigured.
pub const DEFAULT_LISTING_QTY_MAXIMUM: f64 = 1000.0;

/// Price tick range assumed when unconfigured.
pub const DEFAULT_LISTING_TICK_RANGE: u32 = 1;

/// Price tick size assumed when unconfigured.
pub const DEFAULT_LISTING_PRICE_TICK_SIZE: f64 = 0.01;

/// Random order messages per second assumed when unconfigured.
pub const DEFAULT_LISTING_RANDOM_ORDERS_RATE: f64 = 5.0;

/// Base of the geometric ladder used by random price tick generation.
pub const PRICE_GENERATION_COEFFICIENT: f64 = 1.05;

/// Order type carried by aggressive (liquidity-taking) orders.
pub const AGGRESSIVE_ORDER_TYPE: OrderType = OrderType::Market;

/// Time-in-force carried by aggressive orders.
pub const AGGRESSIVE_TIME_IN_FORCE: TimeInForce = TimeInForce::ImmediateOrCancel;

/// Order type carried by resting (book-shaping) orders.
pub const RESTING_ORDER_TYPE: OrderType = OrderType::Limit;

/// Time-in-force carried by resting orders.
pub const RESTING_TIME_IN_FORCE: TimeInForce = TimeInForce::Day;
