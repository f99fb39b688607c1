//! Random generation events and their integer-bucket sampling.

use std::fmt;

use serde::Serialize;

use crate::generator::message::Side;

use super::value_generator::ValueGenerator;

/// Outcome of one event draw.
///
/// The sampled integer in `[0, 29]` buckets into the variants below; the
/// bucket boundaries are part of the generation contract:
/// `0..=9` resting buy, `10..=19` resting sell, `20..=24` aggressive buy,
/// `25..=28` aggressive sell, `29` no operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Event {
    /// Place/modify/cancel a resting buy order.
    RestingBuy,
    /// Place/modify/cancel a resting sell order.
    RestingSell,
    /// Place an aggressive buy order.
    AggressiveBuy,
    /// Place an aggressive sell order.
    AggressiveSell,
    /// Quiet tick, nothing is generated.
    NoOperation,
}

impl Event {
    /// Smallest valid event integer.
    pub const MIN_RANDOM_INTEGER: i64 = 0;
    /// Largest valid event integer.
    pub const MAX_RANDOM_INTEGER: i64 = 29;

    const RESTING_SELL_START: i64 = 10;
    const AGGRESSIVE_BUY_START: i64 = 20;
    const AGGRESSIVE_SELL_START: i64 = 25;
    const NO_OPERATION_START: i64 = 29;

    /// Buckets a sampled integer into its event.
    pub fn from_integer(value: i64) -> Self {
        if value < Self::RESTING_SELL_START {
            Event::RestingBuy
        } else if value < Self::AGGRESSIVE_BUY_START {
            Event::RestingSell
        } else if value < Self::AGGRESSIVE_SELL_START {
            Event::AggressiveBuy
        } else if value < Self::NO_OPERATION_START {
            Event::AggressiveSell
        } else {
            Event::NoOperation
        }
    }

    /// Whether this is the quiet tick.
    pub fn is_noop(self) -> bool {
        self == Event::NoOperation
    }

    /// Whether the event produces a buy order.
    pub fn is_buy(self) -> bool {
        matches!(self, Event::RestingBuy | Event::AggressiveBuy)
    }

    /// Whether the event produces a sell order.
    pub fn is_sell(self) -> bool {
        matches!(self, Event::RestingSell | Event::AggressiveSell)
    }

    /// Whether the event targets a resting order.
    pub fn is_resting(self) -> bool {
        matches!(self, Event::RestingBuy | Event::RestingSell)
    }

    /// Whether the event places an aggressive order.
    pub fn is_aggressive(self) -> bool {
        matches!(self, Event::AggressiveBuy | Event::AggressiveSell)
    }

    /// Order side of the event; `None` for the quiet tick.
    pub fn target_side(self) -> Option<Side> {
        match self {
            Event::RestingBuy | Event::AggressiveBuy => Some(Side::Buy),
            Event::RestingSell | Event::AggressiveSell => Some(Side::Sell),
            Event::NoOperation => None,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Event::RestingBuy => "RestingBuy",
            Event::RestingSell => "RestingSell",
            Event::AggressiveBuy => "AggressiveBuy",
            Event::AggressiveSell => "AggressiveSell",
            Event::NoOperation => "NoOperation",
        })
    }
}

/// Source of generation events.
pub trait EventSource: Send {
    /// Draws the next event, also reporting the raw sampled integer for
    /// tracing.
    fn next_event(&mut self) -> (Event, i64);
}

/// [`EventSource`] sampling uniformly over the event integer range.
pub struct RandomEventSource<G> {
    values: G,
}

impl<G: ValueGenerator> RandomEventSource<G> {
    /// Wraps a value generator.
    pub fn new(values: G) -> Self {
        Self { values }
    }
}

impl<G: ValueGenerator> EventSource for RandomEventSource<G> {
    fn next_event(&mut self) -> (Event, i64) {
        let value = self
            .values
            .uniform_int(Event::MIN_RANDOM_INTEGER, Event::MAX_RANDOM_INTEGER);
        (Event::from_integer(value), value)
    }
}
