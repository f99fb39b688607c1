//! The random-order Executable driving one instrument.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::generator::channel::TradingChannel;
use crate::generator::constants;
use crate::generator::context::GenerationContext;
use crate::generator::executor::Executable;

use super::algorithm::OrderGenerationAlgorithm;

/// Wraps the random generation algorithm as a timed [`Executable`].
///
/// The generator is an infinite process: `finished()` is permanently
/// false, only the lifecycle controls can stop it.
pub struct InstrumentOrderGenerator {
    context: Arc<GenerationContext>,
    channel: Arc<TradingChannel>,
    algorithm: OrderGenerationAlgorithm,
    execution_rate: Duration,
}

impl InstrumentOrderGenerator {
    /// Creates a generator with the default random algorithm.
    pub fn new(
        context: Arc<GenerationContext>,
        channel: Arc<TradingChannel>,
        tracing_enabled: bool,
    ) -> Self {
        let algorithm = OrderGenerationAlgorithm::new(Arc::clone(&context), tracing_enabled);
        Self::with_algorithm(context, channel, algorithm)
    }

    /// Creates a generator around an explicit algorithm (test seam).
    pub fn with_algorithm(
        context: Arc<GenerationContext>,
        channel: Arc<TradingChannel>,
        algorithm: OrderGenerationAlgorithm,
    ) -> Self {
        let execution_rate = execution_rate(
            context
                .listing()
                .random_orders_rate
                .unwrap_or(constants::DEFAULT_LISTING_RANDOM_ORDERS_RATE),
        );

        let listing = context.listing();
        info!(
            symbol = listing.symbol_str().unwrap_or_default(),
            listing_id = listing.listing_id,
            execution_rate_us = execution_rate.as_micros() as u64,
            "initialized random orders generator"
        );

        Self {
            context,
            channel,
            algorithm,
            execution_rate,
        }
    }
}

/// One tick per `1e6 / (rate * 1.5)` microseconds.
fn execution_rate(orders_per_second: f64) -> Duration {
    let normalize_coefficient = orders_per_second.max(f64::MIN_POSITIVE) * 3.0 / 2.0;
    Duration::from_micros((1_000_000.0 / normalize_coefficient).round() as u64)
}

impl Executable for InstrumentOrderGenerator {
    fn prepare(&mut self) {
        // Nothing to prepare before random generation starts.
    }

    fn execute(&mut self) {
        let listing = self.context.listing();
        debug!(
            symbol = listing.symbol_str().unwrap_or_default(),
            listing_id = listing.listing_id,
            "executing random order generation tick"
        );

        if let Some(message) = self.algorithm.generate() {
            self.context.instrument().next_message_number();
            self.channel
                .send_order_message(&message, self.context.instrument().descriptor());
        }
    }

    fn finished(&self) -> bool {
        false
    }

    fn next_exec_timeout(&self) -> Duration {
        self.execution_rate
    }
}
