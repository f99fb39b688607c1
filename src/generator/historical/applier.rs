//! Translation of one snapshot record into order-shaping requests.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::generator::constants;
use crate::generator::context::InstrumentContext;
use crate::generator::message::{GeneratedMessage, RequestBuilder, Side};
use crate::generator::registry::{OrderData, RegistryUpdater};

use super::error::HistoricalError;
use super::record::{Level, Record};

/// A level side is processable only when price and quantity are either
/// both present or both absent; price-without-quantity (or the reverse)
/// is malformed.
pub fn is_level_processable(level: &Level) -> bool {
    let bid_valid = level.bid_price().is_some() == level.bid_quantity().is_some();
    let offer_valid = level.offer_price().is_some() == level.offer_quantity().is_some();
    bid_valid && offer_valid
}

/// Whether a processable level carries bid data.
pub fn has_bid_part(level: &Level) -> bool {
    is_level_processable(level) && level.bid_price().is_some() && level.bid_quantity().is_some()
}

/// Whether a processable level carries offer data.
pub fn has_offer_part(level: &Level) -> bool {
    is_level_processable(level) && level.offer_price().is_some() && level.offer_quantity().is_some()
}

struct PendingOrder {
    counterparty_id: String,
    price: f64,
    quantity: f64,
    side: Side,
}

/// Applies one snapshot record to an instrument: emits the ordered
/// new/modify/cancel sequence that makes the live book mirror the
/// recorded one, mutating the registry in lockstep.
///
/// Failure isolation is per record: if anything goes wrong mid-record,
/// every message generated for it is discarded, a corruption warning is
/// logged (the registry may be inconsistent for one counterparty), and
/// the caller proceeds with the next record.
pub struct RecordApplier {
    context: Arc<InstrumentContext>,
    messages: Vec<GeneratedMessage>,
    party_counter: u64,
}

impl RecordApplier {
    /// Processes one record, returning the messages to publish in order.
    pub fn apply(record: Record, context: &Arc<InstrumentContext>) -> Vec<GeneratedMessage> {
        let source_row = record.source_row();
        let source_name = record.source_name().unwrap_or("unknown").to_owned();
        let source_connection = record.source_connection().unwrap_or("unknown").to_owned();

        let mut applier = Self {
            context: Arc::clone(context),
            messages: Vec::new(),
            party_counter: 0,
        };

        match applier.process(record) {
            Ok(()) => {
                debug!(
                    messages = applier.messages.len(),
                    source_row,
                    source_name = %source_name,
                    "generated messages from a historical record"
                );
                applier.messages
            }
            Err(err) => {
                error!(
                    source_row,
                    source_name = %source_name,
                    source_connection = %source_connection,
                    %err,
                    "error while processing a historical record; discarding all generated \
                     historical messages, the generated orders registry may be corrupted"
                );
                Vec::new()
            }
        }
    }

    fn process(&mut self, mut record: Record) -> Result<(), HistoricalError> {
        if !record.has_levels() {
            self.cancel_side(Side::Buy)?;
            self.cancel_side(Side::Sell)?;
            debug!(
                source_row = record.source_row(),
                "no levels in the historical record, cancelled all generated bid and offer orders"
            );
            return Ok(());
        }

        self.cancel_other_parties(&record)?;

        let source_row = record.source_row();
        let mut levels_applied = 0usize;
        for (level_index, level) in record.take_levels().into_iter().enumerate() {
            if self.process_level(&level, level_index)? {
                levels_applied += 1;
            } else {
                warn!(
                    level_index,
                    source_row,
                    %level,
                    "level skipped in a historical record"
                );
            }
        }

        debug!(levels_applied, source_row, "applied historical record levels");
        Ok(())
    }

    fn process_level(&mut self, level: &Level, level_index: usize) -> Result<bool, HistoricalError> {
        if !is_level_processable(level) {
            return Ok(false);
        }

        if !self.place_bid(level)? {
            debug!(
                level_index,
                "no bid data at the historical level, bid part ignored"
            );
        }
        if !self.place_offer(level)? {
            debug!(
                level_index,
                "no offer data at the historical level, offer part ignored"
            );
        }
        Ok(true)
    }

    fn place_bid(&mut self, level: &Level) -> Result<bool, HistoricalError> {
        if !has_bid_part(level) {
            return Ok(false);
        }

        let counterparty = match level.bid_counterparty() {
            Some(party) => party.to_owned(),
            None => self.next_party_id(),
        };
        self.place(PendingOrder {
            counterparty_id: counterparty,
            price: level.bid_price().unwrap_or(0.0),
            quantity: level.bid_quantity().unwrap_or(0.0),
            side: Side::Buy,
        })?;
        Ok(true)
    }

    fn place_offer(&mut self, level: &Level) -> Result<bool, HistoricalError> {
        if !has_offer_part(level) {
            return Ok(false);
        }

        let counterparty = match level.offer_counterparty() {
            Some(party) => party.to_owned(),
            None => self.next_party_id(),
        };
        self.place(PendingOrder {
            counterparty_id: counterparty,
            price: level.offer_price().unwrap_or(0.0),
            quantity: level.offer_quantity().unwrap_or(0.0),
            side: Side::Sell,
        })?;
        Ok(true)
    }

    /// Same-side matches become modifications of the stored order;
    /// cross-side matches cancel the stored order and place a fresh one;
    /// unknown counterparties place a fresh order.
    fn place(&mut self, order: PendingOrder) -> Result<(), HistoricalError> {
        let existing = self.context.registry().find_by_owner(&order.counterparty_id);

        let mut builder = RequestBuilder::new()
            .resting_attributes()
            .price(order.price)
            .quantity(order.quantity)
            .side(order.side)
            .counterparty(order.counterparty_id.clone());

        match existing {
            Some(ref placed) if placed.side() == order.side => {
                builder = builder
                    .modification_request()
                    .client_order_id(placed.order_id())
                    .orig_client_order_id(placed.orig_order_id());
            }
            existing => {
                if let Some(placed) = existing {
                    let target_order_id = placed.order_id().to_owned();
                    self.cancel(|stored| stored.order_id() == target_order_id)?;
                }
                builder = builder
                    .new_order_request()
                    .client_order_id(self.context.generate_identifier());
            }
        }

        let message = builder.build()?;
        RegistryUpdater::apply(self.context.registry(), &message)?;
        self.messages.push(message);
        Ok(())
    }

    fn cancel(
        &mut self,
        cancel_criteria: impl Fn(&OrderData) -> bool,
    ) -> Result<(), HistoricalError> {
        let registry = self.context.registry();
        let orders = registry.select_by(cancel_criteria);
        if orders.is_empty() {
            return Ok(());
        }

        let mut cancel_requests = Vec::with_capacity(orders.len());
        for order in &orders {
            let request = RequestBuilder::new()
                .cancel_request()
                .resting_attributes()
                .client_order_id(order.order_id())
                .orig_client_order_id(order.orig_order_id())
                .side(order.side())
                .price(order.price())
                .quantity(order.quantity())
                .counterparty(order.owner_id())
                .build()?;
            cancel_requests.push(request);
        }

        for request in &cancel_requests {
            RegistryUpdater::apply(registry, request)?;
        }
        self.messages.append(&mut cancel_requests);
        Ok(())
    }

    fn cancel_side(&mut self, side: Side) -> Result<(), HistoricalError> {
        self.cancel(move |order| order.side() == side)
    }

    /// Every registry owner the record does not mention gets cancelled
    /// before the record's levels are applied.
    fn cancel_other_parties(&mut self, record: &Record) -> Result<(), HistoricalError> {
        let mut parties: HashSet<&str> = HashSet::new();
        for level in record.levels() {
            if let Some(party) = level.bid_counterparty() {
                parties.insert(party);
            }
            if let Some(party) = level.offer_counterparty() {
                parties.insert(party);
            }
        }

        self.cancel(|order| !parties.contains(order.owner_id()))
    }

    /// Synthetic counterparties for anonymous levels: `CP1`, `CP2`, ...
    /// per record.
    fn next_party_id(&mut self) -> String {
        self.party_counter += 1;
        format!(
            "{}{}",
            constants::COUNTERPARTY_ID_PREFIX,
            self.party_counter
        )
    }
}
