//! Synchronous market-state access for the random generator.

use std::sync::Arc;

use crate::generator::channel::TradingChannel;
use crate::generator::message::Side;
use crate::generator::protocol::{InstrumentDescriptor, InstrumentStateRequest};

/// Observed book state of one instrument at generation time.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MarketState {
    /// Best bid price, if any bid is live.
    pub best_bid_price: Option<f64>,
    /// Best offer price, if any offer is live.
    pub best_offer_price: Option<f64>,
    /// Number of live bid depth levels.
    pub bid_depth_levels: Option<u32>,
    /// Number of live offer depth levels.
    pub offer_depth_levels: Option<u32>,
}

impl MarketState {
    /// Best price on the given side.
    pub fn best_price(&self, side: Side) -> Option<f64> {
        match side {
            Side::Buy => self.best_bid_price,
            Side::Sell => self.best_offer_price,
        }
    }

    /// Live depth on the given side, defaulting to zero.
    pub fn depth_levels(&self, side: Side) -> u32 {
        match side {
            Side::Buy => self.bid_depth_levels.unwrap_or(0),
            Side::Sell => self.offer_depth_levels.unwrap_or(0),
        }
    }
}

/// Market-state provider backed by the trading channel's synchronous
/// instrument-state query.
#[derive(Debug)]
pub struct MarketDataProvider {
    channel: Arc<TradingChannel>,
    instrument: InstrumentDescriptor,
}

impl MarketDataProvider {
    /// Creates a provider for one instrument.
    pub fn new(channel: Arc<TradingChannel>, instrument: InstrumentDescriptor) -> Self {
        Self {
            channel,
            instrument,
        }
    }

    /// Queries the current market state. Failures yield an empty state;
    /// the generation algorithm treats missing prices as empty sides.
    pub fn market_state(&self) -> MarketState {
        let request = InstrumentStateRequest {
            instrument: self.instrument.clone(),
        };

        match self.channel.query_instrument_state(request) {
            Some(state) => MarketState {
                best_bid_price: state.best_bid_price,
                best_offer_price: state.best_offer_price,
                bid_depth_levels: state.current_bid_depth,
                offer_depth_levels: state.current_offer_depth,
            },
            None => MarketState::default(),
        }
    }
}
