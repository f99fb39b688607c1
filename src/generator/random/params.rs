//! Selection of generation parameters from the listing and venue
//! configuration.

use crate::generator::constants;
use crate::generator::numeric::approx_zero;
use crate::model::{Listing, Venue};

use super::event::Event;
use super::price::PriceGenerationParams;
use super::quantity::{QuantityGenerationParams, QuantityParamsError};

/// Price generation parameters of a listing, with the documented
/// defaults; an unset spread defaults to the price tick size.
pub fn price_params(listing: &Listing) -> PriceGenerationParams {
    let tick_range = listing
        .random_tick_range
        .unwrap_or(constants::DEFAULT_LISTING_TICK_RANGE);
    let tick_size = listing
        .price_tick_size
        .unwrap_or(constants::DEFAULT_LISTING_PRICE_TICK_SIZE);
    let spread = listing.random_orders_spread.unwrap_or(tick_size);

    PriceGenerationParams {
        tick_range,
        tick_size,
        spread,
    }
}

/// Depth ceiling for new resting orders.
///
/// With `random_depth_levels` configured the ceiling is the smaller of it
/// and the venue's party count; with only the party count configured the
/// ceiling is the party count alone; with neither configured there is no
/// ceiling and generation proceeds unconditionally.
pub fn max_market_depth(listing: &Listing, venue: &Venue) -> Option<u32> {
    match (listing.random_depth_levels, venue.random_parties_count) {
        (Some(levels), Some(parties)) => Some(levels.min(parties)),
        (Some(levels), None) => Some(levels),
        (None, Some(parties)) => Some(parties),
        (None, None) => None,
    }
}

/// Selector of quantity generation parameters, precomputed once per
/// instrument.
///
/// Aggressive events consult the aggressive bound set whenever the listing
/// configures *any* aggressive qty-or-amount knob on that bound's side;
/// otherwise they fall back to the resting set. Amount knobs override the
/// quantity bound only when the implied quantity (`amount / price`)
/// tightens it, and only when the price is usable.
#[derive(Debug)]
pub struct QuantityParamsSelector {
    multiplier: f64,
    instrument_qty_min: f64,
    instrument_qty_max: f64,

    aggressive_min_configured: bool,
    aggressive_max_configured: bool,
    aggressive_qty_min: f64,
    aggressive_qty_max: f64,
    aggressive_amt_min: Option<f64>,
    aggressive_amt_max: Option<f64>,

    resting_qty_min: f64,
    resting_qty_max: f64,
    resting_amt_min: Option<f64>,
    resting_amt_max: Option<f64>,
}

impl QuantityParamsSelector {
    /// Precomputes the bound sets of one listing.
    pub fn new(listing: &Listing) -> Self {
        let instrument_qty_min = listing
            .qty_minimum
            .unwrap_or(constants::DEFAULT_LISTING_QTY_MINIMUM);
        let instrument_qty_max = listing
            .qty_maximum
            .unwrap_or(constants::DEFAULT_LISTING_QTY_MAXIMUM);

        // A random bound only wins when it tightens the instrument bound.
        let lower_bound = |random_qty: Option<f64>| match random_qty {
            Some(value) if value >= instrument_qty_min => value,
            _ => instrument_qty_min,
        };
        let upper_bound = |random_qty: Option<f64>| match random_qty {
            Some(value) if value <= instrument_qty_max => value,
            _ => instrument_qty_max,
        };

        Self {
            multiplier: listing
                .qty_multiple
                .unwrap_or(constants::DEFAULT_LISTING_QTY_MULTIPLE),
            instrument_qty_min,
            instrument_qty_max,

            aggressive_min_configured: listing.random_aggressive_qty_minimum.is_some()
                || listing.random_aggressive_amt_minimum.is_some(),
            aggressive_max_configured: listing.random_aggressive_qty_maximum.is_some()
                || listing.random_aggressive_amt_maximum.is_some(),
            aggressive_qty_min: lower_bound(listing.random_aggressive_qty_minimum),
            aggressive_qty_max: upper_bound(listing.random_aggressive_qty_maximum),
            aggressive_amt_min: listing.random_aggressive_amt_minimum,
            aggressive_amt_max: listing.random_aggressive_amt_maximum,

            resting_qty_min: lower_bound(listing.random_qty_minimum),
            resting_qty_max: upper_bound(listing.random_qty_maximum),
            resting_amt_min: listing.random_amt_minimum,
            resting_amt_max: listing.random_amt_maximum,
        }
    }

    /// Selects validated quantity parameters for one generation.
    pub fn select(
        &self,
        price: f64,
        event: Event,
    ) -> Result<QuantityGenerationParams, QuantityParamsError> {
        let minimum = self.select_min_qty(price, event);
        let maximum = self.select_max_qty(price, event);
        QuantityGenerationParams::new(self.multiplier, minimum, maximum)
    }

    /// Instrument-level quantity floor (with default applied).
    pub fn instrument_qty_min(&self) -> f64 {
        self.instrument_qty_min
    }

    /// Instrument-level quantity ceiling (with default applied).
    pub fn instrument_qty_max(&self) -> f64 {
        self.instrument_qty_max
    }

    fn select_min_qty(&self, price: f64, event: Event) -> f64 {
        let (bound, amount) = if event.is_aggressive() && self.aggressive_min_configured {
            (self.aggressive_qty_min, self.aggressive_amt_min)
        } else {
            (self.resting_qty_min, self.resting_amt_min)
        };

        let mut min_qty = bound;
        if let Some(amount) = amount {
            if !approx_zero(price) {
                let amount_qty = amount / price;
                if amount_qty >= min_qty {
                    min_qty = amount_qty;
                }
            }
        }
        min_qty
    }

    fn select_max_qty(&self, price: f64, event: Event) -> f64 {
        let (bound, amount) = if event.is_aggressive() && self.aggressive_max_configured {
            (self.aggressive_qty_max, self.aggressive_amt_max)
        } else {
            (self.resting_qty_max, self.resting_amt_max)
        };

        let mut max_qty = bound;
        if let Some(amount) = amount {
            if !approx_zero(price) {
                let amount_qty = amount / price;
                if amount_qty <= max_qty {
                    max_qty = amount_qty;
                }
            }
        }
        max_qty
    }
}
