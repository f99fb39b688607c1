//! The per-tick random order generation pipeline.

use std::sync::Arc;

use tracing::{error, warn};

use crate::generator::constants;
use crate::generator::context::GenerationContext;
use crate::generator::market_data::MarketState;
use crate::generator::message::{GeneratedMessage, MessageType};
use crate::generator::numeric::approx_zero;
use crate::generator::registry::RegistryUpdater;
use crate::generator::trace::GenerationTrace;

use super::counterparty::{CounterpartySource, RandomCounterpartySource};
use super::event::{Event, EventSource, RandomEventSource};
use super::params::{self, QuantityParamsSelector};
use super::price::{PriceSource, RandomPriceSource};
use super::quantity::{QuantitySource, RandomQuantitySource};
use super::resting_action::{RandomRestingActionSource, RestingActionSource};
use super::value_generator::RngValueGenerator;

/// Stateful per-instrument generation algorithm.
///
/// On every tick the algorithm samples an event and either produces one
/// order message or stays quiet. Resting emissions are folded into the
/// instrument's registry before they are returned; aggressive emissions
/// never touch the registry.
pub struct OrderGenerationAlgorithm {
    context: Arc<GenerationContext>,
    events: Box<dyn EventSource>,
    counterparties: Box<dyn CounterpartySource>,
    resting_actions: Box<dyn RestingActionSource>,
    prices: Box<dyn PriceSource>,
    quantities: Box<dyn QuantitySource>,
    quantity_params: QuantityParamsSelector,
    tracing_enabled: bool,
}

impl OrderGenerationAlgorithm {
    /// Creates the algorithm with the default entropy-seeded sources.
    pub fn new(context: Arc<GenerationContext>, tracing_enabled: bool) -> Self {
        let parties_count = context
            .venue()
            .random_parties_count
            .unwrap_or(constants::DEFAULT_VENUE_RANDOM_PARTIES_COUNT);

        Self::with_sources(
            context,
            Box::new(RandomEventSource::new(RngValueGenerator::new())),
            Box::new(RandomCounterpartySource::new(
                parties_count,
                RngValueGenerator::new(),
            )),
            Box::new(RandomRestingActionSource::new(RngValueGenerator::new())),
            Box::new(RandomPriceSource::new(RngValueGenerator::new())),
            Box::new(RandomQuantitySource::new(RngValueGenerator::new())),
            tracing_enabled,
        )
    }

    /// Creates the algorithm with explicit value sources (test seam).
    pub fn with_sources(
        context: Arc<GenerationContext>,
        events: Box<dyn EventSource>,
        counterparties: Box<dyn CounterpartySource>,
        resting_actions: Box<dyn RestingActionSource>,
        prices: Box<dyn PriceSource>,
        quantities: Box<dyn QuantitySource>,
        tracing_enabled: bool,
    ) -> Self {
        let quantity_params = QuantityParamsSelector::new(context.listing());
        Self {
            context,
            events,
            counterparties,
            resting_actions,
            prices,
            quantities,
            quantity_params,
            tracing_enabled,
        }
    }

    /// Runs one generation tick. Returns the message to publish, or
    /// `None` for a quiet tick.
    pub fn generate(&mut self) -> Option<GeneratedMessage> {
        let mut trace = GenerationTrace::new(self.tracing_enabled);
        let message = self.run(&mut trace);

        let symbol = self
            .context
            .listing()
            .symbol_str()
            .unwrap_or_default()
            .to_owned();
        trace.emit(&symbol);
        message
    }

    fn run(&mut self, trace: &mut GenerationTrace) -> Option<GeneratedMessage> {
        let (event, raw_event) = self.events.next_event();
        let mut step = trace.step("generating random event");
        step.input("randomValue", raw_event);
        step.output("generatedEvent", event);
        trace.record(step);

        if event.is_noop() {
            return None;
        }

        let mut message = GeneratedMessage::new(MessageType::NewOrderSingle);
        self.generate_counterparty(&mut message, trace);

        let market_state = self.context.current_market_state();

        if event.is_aggressive() {
            let publish = self.fill_aggressive_order(&mut message, &market_state, event, trace);
            return publish.then_some(message);
        }

        let publish = self.fill_resting_order(&mut message, &market_state, event, trace);
        if !publish {
            return None;
        }

        if let Err(err) = RegistryUpdater::apply(self.context.registry(), &message) {
            error!(%err, "generated resting order message was refused by the registry updater");
            return None;
        }
        Some(message)
    }

    fn fill_aggressive_order(
        &mut self,
        message: &mut GeneratedMessage,
        market: &MarketState,
        event: Event,
        trace: &mut GenerationTrace,
    ) -> bool {
        if self.is_opposite_side_empty(event, market, trace) {
            // An aggressive order needs a target on the opposite side.
            return false;
        }

        self.assign_generated_order_id(message, trace);
        message.side = event.target_side();
        message.message_type = MessageType::NewOrderSingle;
        message.order_type = Some(constants::AGGRESSIVE_ORDER_TYPE);
        message.time_in_force = Some(constants::AGGRESSIVE_TIME_IN_FORCE);

        self.generate_price(message, market, event, trace);
        self.generate_quantity(message, event, trace)
    }

    fn fill_resting_order(
        &mut self,
        message: &mut GeneratedMessage,
        market: &MarketState,
        event: Event,
        trace: &mut GenerationTrace,
    ) -> bool {
        let owner_id = message
            .party_id
            .clone()
            .unwrap_or_default();

        let placed_order = self.context.registry().find_by_owner(&owner_id);
        let publish = match placed_order {
            Some(placed_order) => {
                self.update_active_resting_order(message, market, event, &placed_order, trace)
            }
            None => self.prepare_new_resting_order(message, market, event, trace),
        };

        if publish {
            message.order_type = Some(constants::RESTING_ORDER_TYPE);
            message.time_in_force = Some(constants::RESTING_TIME_IN_FORCE);
        }
        publish
    }

    fn update_active_resting_order(
        &mut self,
        message: &mut GeneratedMessage,
        market: &MarketState,
        event: Event,
        existing: &crate::generator::registry::OrderData,
        trace: &mut GenerationTrace,
    ) -> bool {
        let mut step = trace.step("preparing action for the active resting order");
        step.input("counterpartyId", existing.owner_id());
        step.input("orderID", existing.order_id());
        step.input("orderSide", existing.side());
        step.input("orderPrice", existing.price());
        step.input("orderQty", existing.quantity());

        message.client_order_id = Some(existing.order_id().to_owned());
        message.orig_client_order_id = Some(existing.orig_order_id().to_owned());
        message.party_id = Some(existing.owner_id().to_owned());
        message.side = Some(existing.side());

        let (action, raw_action) = self.resting_actions.next_action();
        step.input("restingActionRandomValue", raw_action);
        step.output("restingOrderAction", action);

        let publish = if action.is_cancellation() {
            message.message_type = MessageType::OrderCancelRequest;
            true
        } else {
            message.message_type = MessageType::OrderCancelReplaceRequest;
            message.order_price = Some(existing.price());
            message.quantity = Some(existing.quantity());

            if action.is_quantity_modification() {
                self.generate_quantity(message, event, trace)
            } else {
                self.generate_price(message, market, event, trace);
                true
            }
        };

        step.output("messageType", message.message_type.to_string());
        trace.record(step);
        publish
    }

    fn prepare_new_resting_order(
        &mut self,
        message: &mut GeneratedMessage,
        market: &MarketState,
        event: Event,
        trace: &mut GenerationTrace,
    ) -> bool {
        if !self.check_market_depth(event, market, trace) {
            // The side already shows the configured number of levels.
            return false;
        }

        self.assign_generated_order_id(message, trace);
        message.message_type = MessageType::NewOrderSingle;
        message.side = event.target_side();

        self.generate_price(message, market, event, trace);
        self.generate_quantity(message, event, trace)
    }

    fn generate_counterparty(&mut self, message: &mut GeneratedMessage, trace: &mut GenerationTrace) {
        let (party_id, party_number) = self.counterparties.next_counterparty();

        let mut step = trace.step("generating order counterparty");
        step.input("randomCounterpartyNumber", party_number);
        step.output("partyId", &party_id);
        trace.record(step);

        message.party_id = Some(party_id);
    }

    fn assign_generated_order_id(
        &mut self,
        message: &mut GeneratedMessage,
        trace: &mut GenerationTrace,
    ) {
        let order_id = self.context.generate_identifier();

        let mut step = trace.step("generating ClOrdID");
        step.output("clOrdID", &order_id);
        trace.record(step);

        message.client_order_id = Some(order_id);
    }

    fn generate_price(
        &mut self,
        message: &mut GeneratedMessage,
        market: &MarketState,
        event: Event,
        trace: &mut GenerationTrace,
    ) {
        let params = params::price_params(self.context.listing());

        let mut step = trace.step("generating order price");
        step.input("priceTickRange", params.tick_range);
        step.input("priceTickSize", params.tick_size);
        step.input("priceSpread", params.spread);
        step.input("bestBuyPrice", market.best_bid_price.unwrap_or(0.0));
        step.input("bestSellPrice", market.best_offer_price.unwrap_or(0.0));

        let seed = self.context.price_seed();
        step.input("priceSeedBuy", seed.bid_or_mid().unwrap_or(0.0));
        step.input("priceSeedSell", seed.offer_or_mid().unwrap_or(0.0));
        step.input("priceSeedMid", seed.mid_price.unwrap_or(0.0));

        let (price, details) = self.prices.next_price(&params, market, seed, event);

        if details.seed_price_used {
            step.output_commented(
                "generatedPrice",
                price,
                "price was generated from seed configuration",
            );
        } else {
            step.output("randomValue", details.random_number);
            step.output("geometricSum", details.geometric_sum);
            step.output("randomTick", details.random_tick);
            step.output("basePx", details.base_price);
            step.output("wasBasePxIncrementAdded", details.increment_added);
            step.output_commented(
                "generatedPrice",
                price,
                "price was generated from a base price and random price tick",
            );
        }
        trace.record(step);

        message.order_price = Some(price);
    }

    /// Returns `false` (and emits nothing this tick) when the configured
    /// quantity bounds are unusable.
    fn generate_quantity(
        &mut self,
        message: &mut GeneratedMessage,
        event: Event,
        trace: &mut GenerationTrace,
    ) -> bool {
        let price = message.order_price.unwrap_or(0.0);

        let params = match self.quantity_params.select(price, event) {
            Ok(params) => params,
            Err(err) => {
                warn!(%err, "order quantity generation parameters are invalid, tick skipped");
                return false;
            }
        };

        let mut step = trace.step("generating random quantity");
        step.input("quantityMultiplier", params.multiplier());
        step.input("minimalQuantity", params.minimum());
        step.input("maximalQuantity", params.maximum());

        let (quantity, random_number) = self.quantities.next_quantity(&params);
        step.output("randomValue", random_number);
        step.output("generatedQty", quantity);
        trace.record(step);

        message.quantity = Some(quantity);
        true
    }

    fn check_market_depth(
        &self,
        event: Event,
        market: &MarketState,
        trace: &mut GenerationTrace,
    ) -> bool {
        let mut step = trace.step("checking current market depth state");

        let max_depth = params::max_market_depth(self.context.listing(), self.context.venue());
        let continue_generation = match max_depth {
            Some(max_depth) => {
                let current_depth = event
                    .target_side()
                    .map(|side| market.depth_levels(side))
                    .unwrap_or(0);

                step.input("maximalMarketDepth", max_depth);
                step.input("currentMarketDepth", current_depth);
                current_depth < max_depth
            }
            None => {
                step.input("maximalMarketDepth", "none");
                true
            }
        };

        step.output("continueGeneration", continue_generation);
        trace.record(step);
        continue_generation
    }

    fn is_opposite_side_empty(
        &self,
        event: Event,
        market: &MarketState,
        trace: &mut GenerationTrace,
    ) -> bool {
        let mut step = trace.step("checking if opposite side has prices");

        let opposite_price = event
            .target_side()
            .and_then(|side| market.best_price(side.opposite()));
        step.input("oppositeBestPx", opposite_price.unwrap_or(0.0));

        let is_empty = match opposite_price {
            Some(price) => approx_zero(price),
            None => true,
        };
        step.output("isOppositeSideEmpty", is_empty);
        trace.record(step);
        is_empty
    }
}
