//! Dispatch of historical records to per-instrument appliers.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use crate::generator::channel::TradingChannel;
use crate::generator::context::InstrumentContext;

use super::applier::RecordApplier;
use super::record::{Action, Record};

/// Routes each record of an action to the context of its instrument,
/// applies it, and sends the resulting requests over the trading
/// channel.
pub struct ActionProcessor {
    contexts_by_symbol: HashMap<String, Arc<InstrumentContext>>,
    channel: Arc<TradingChannel>,
}

impl ActionProcessor {
    /// Indexes the available instrument contexts by symbol. Contexts
    /// without a symbol cannot receive historical data and are dropped
    /// with an error log.
    pub fn new(contexts: &[Arc<InstrumentContext>], channel: Arc<TradingChannel>) -> Self {
        let mut contexts_by_symbol = HashMap::with_capacity(contexts.len());
        for context in contexts {
            match context.listing().symbol_str() {
                Some(symbol) => {
                    contexts_by_symbol.insert(symbol.to_owned(), Arc::clone(context));
                }
                None => warn!(
                    listing_id = context.listing().listing_id,
                    "listing without a symbol can not receive historical records"
                ),
            }
        }

        Self {
            contexts_by_symbol,
            channel,
        }
    }

    /// Processes every record of an action in order.
    pub fn process(&self, action: Action) {
        for record in action.take_records() {
            self.process_record(record);
        }
    }

    fn process_record(&self, record: Record) {
        let Some(context) = self.contexts_by_symbol.get(record.instrument()) else {
            warn!(
                instrument = record.instrument(),
                source_row = record.source_row(),
                "no generation context for the instrument, skipping historical record"
            );
            return;
        };

        let messages = RecordApplier::apply(record, context);
        for message in &messages {
            self.channel.send_order_message(message, context.descriptor());
        }
    }
}
