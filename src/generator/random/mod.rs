//! Randomized per-instrument order generation.

mod algorithm;
mod counterparty;
mod event;
mod order_generator;
mod params;
mod price;
mod quantity;
mod resting_action;
mod value_generator;

pub use algorithm::OrderGenerationAlgorithm;
pub use counterparty::{CounterpartySource, RandomCounterpartySource};
pub use event::{Event, EventSource, RandomEventSource};
pub use order_generator::InstrumentOrderGenerator;
pub use params::{QuantityParamsSelector, max_market_depth, price_params};
pub use price::{PriceDetails, PriceGenerationParams, PriceSource, RandomPriceSource};
pub use quantity::{
    QuantityGenerationParams, QuantityParamsError, QuantitySource, RandomQuantitySource,
};
pub use resting_action::{RandomRestingActionSource, RestingActionSource, RestingOrderAction};
pub use value_generator::{RngValueGenerator, ValueGenerator};

#[cfg(test)]
pub(crate) use value_generator::testing::SequenceValueGenerator;
