//! Random order price generation.
//!
//! Prices derive from a base price (live book or configured seed) plus a
//! random tick from a geometric ladder: small deviations from the base are
//! much more likely than large ones, and the deviation never pushes the
//! price negative.

use serde::Serialize;

use crate::generator::constants::PRICE_GENERATION_COEFFICIENT;
use crate::generator::market_data::MarketState;
use crate::generator::message::Side;
use crate::generator::numeric::approx_zero;
use crate::model::PriceSeed;

use super::event::Event;
use super::value_generator::ValueGenerator;

/// Parameters steering one price generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceGenerationParams {
    /// Number of ladder rungs (price deviations) to draw from.
    pub tick_range: u32,
    /// Monetary size of one rung.
    pub tick_size: f64,
    /// Spread subtracted from (buy) or added to (sell) resting base
    /// prices.
    pub spread: f64,
}

/// Diagnostic detail of one price generation, recorded by the tracer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PriceDetails {
    /// Resolved base price.
    pub base_price: f64,
    /// Scaled random tick.
    pub random_tick: f64,
    /// Integer geometric series sum the raw draw ranged over.
    pub geometric_sum: i64,
    /// Raw sampled integer.
    pub random_number: i64,
    /// Whether the tick was added (true) or subtracted (false).
    pub increment_added: bool,
    /// Whether the configured seed price was used instead of the book.
    pub seed_price_used: bool,
}

/// Source of generated order prices.
pub trait PriceSource: Send {
    /// Generates a price for the event, given the live market state and
    /// the configured seed prices.
    fn next_price(
        &mut self,
        params: &PriceGenerationParams,
        market: &MarketState,
        seed: &PriceSeed,
        event: Event,
    ) -> (f64, PriceDetails);
}

/// Default [`PriceSource`] implementation.
pub struct RandomPriceSource<G> {
    values: G,
}

impl<G: ValueGenerator> RandomPriceSource<G> {
    /// Wraps a value generator.
    pub fn new(values: G) -> Self {
        Self { values }
    }

    fn generate_tick(&mut self, params: &PriceGenerationParams, details: &mut PriceDetails) -> f64 {
        let coefficient = PRICE_GENERATION_COEFFICIENT;
        let geometric_sum = geometric_series_sum(params.tick_range, coefficient, coefficient) as i64;
        details.geometric_sum = geometric_sum;

        let random_value = self.values.uniform_int(0, (geometric_sum - 1).max(0));
        details.random_number = random_value;

        // Invert the geometric CDF: larger deviations map onto
        // exponentially narrower integer bands.
        let log_argument = (random_value as f64 * (coefficient - 1.0)) / coefficient + 1.0;
        let deviation = (log_argument.ln() / coefficient.ln()).ceil();

        let random_tick = f64::from(params.tick_range) - deviation;
        let scaled_tick = random_tick * params.tick_size;
        details.random_tick = scaled_tick;
        scaled_tick
    }
}

fn geometric_series_sum(count: u32, coefficient: f64, first_value: f64) -> f64 {
    (first_value * (1.0 - coefficient.powi(count as i32))) / (1.0 - coefficient)
}

/// Base price: the opposite side's best price when available, the same
/// side's otherwise; resting orders move the base away from the touch by
/// the configured spread.
fn resolve_base_price(
    market: &MarketState,
    params: &PriceGenerationParams,
    event: Event,
) -> Option<f64> {
    let side = event.target_side()?;

    let opposite = market
        .best_price(side.opposite())
        .filter(|price| !approx_zero(*price));
    let Some(mut base) = opposite else {
        return market.best_price(side).filter(|price| !approx_zero(*price));
    };

    if event.is_resting() {
        base = match side {
            Side::Buy => base - params.spread,
            Side::Sell => base + params.spread,
        };
    }

    Some(base)
}

/// Seed price for the event side; the mid seed backs an absent side seed.
fn resolve_seed_price(seed: &PriceSeed, event: Event) -> f64 {
    let price = match event.target_side() {
        Some(Side::Buy) => seed.bid_or_mid(),
        Some(Side::Sell) => seed.offer_or_mid(),
        None => seed.mid_price,
    };
    price.unwrap_or(0.0)
}

impl<G: ValueGenerator> PriceSource for RandomPriceSource<G> {
    fn next_price(
        &mut self,
        params: &PriceGenerationParams,
        market: &MarketState,
        seed: &PriceSeed,
        event: Event,
    ) -> (f64, PriceDetails) {
        let mut details = PriceDetails::default();

        let Some(base_price) = resolve_base_price(market, params, event) else {
            details.seed_price_used = true;
            return (resolve_seed_price(seed, event), details);
        };
        details.base_price = base_price;

        // Aggressive-buy and resting-sell prices move up from the base;
        // aggressive-sell and resting-buy prices move down.
        let increment = event.is_buy() ^ event.is_resting();
        details.increment_added = increment;

        let tick = self.generate_tick(params, &mut details);

        if tick >= base_price {
            return (tick, details);
        }

        let price = if increment {
            base_price + tick
        } else {
            base_price - tick
        };
        (price, details)
    }
}
