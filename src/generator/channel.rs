//! Trading-request channel between the generation core and the matching
//! engine.
//!
//! The channel is a binding point: the engine side installs a
//! [`TradingGateway`] once at bootstrap, and every generation thread sends
//! through the shared [`TradingChannel`] handle. An unbound channel is
//! non-fatal — order requests are logged and dropped, state queries return
//! nothing — because generation is best-effort and self-corrects on the
//! next tick.

use std::sync::{PoisonError, RwLock};
use std::sync::Arc;

use crossbeam::channel::Sender;
use tracing::{debug, error};

use crate::generator::message::GeneratedMessage;
use crate::generator::protocol::{
    InstrumentDescriptor, InstrumentState, InstrumentStateRequest, TradingRequest, trading_request,
};

/// Matching-engine side of the trading channel.
pub trait TradingGateway: Send + Sync {
    /// Accepts one order-shaping request. Replies, if any, arrive
    /// out-of-band through the engine's reply dispatcher.
    fn submit(&self, request: TradingRequest);

    /// Answers a synchronous instrument-state query. The calling
    /// generation thread blocks for the duration of the call.
    fn instrument_state(&self, request: InstrumentStateRequest) -> Option<InstrumentState>;
}

/// Process-wide binding point for the trading gateway.
#[derive(Default)]
pub struct TradingChannel {
    gateway: RwLock<Option<Arc<dyn TradingGateway>>>,
}

impl std::fmt::Debug for TradingChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TradingChannel")
            .field("bound", &self.is_bound())
            .finish()
    }
}

impl TradingChannel {
    /// Creates an unbound channel.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Creates a channel already bound to a gateway.
    pub fn bound(gateway: Arc<dyn TradingGateway>) -> Arc<Self> {
        let channel = Self::new();
        channel.bind(gateway);
        channel
    }

    /// Installs (or replaces) the gateway.
    pub fn bind(&self, gateway: Arc<dyn TradingGateway>) {
        *self
            .gateway
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(gateway);
    }

    /// Removes the gateway; subsequent sends are dropped.
    pub fn unbind(&self) {
        *self
            .gateway
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Whether a gateway is currently installed.
    pub fn is_bound(&self) -> bool {
        self.gateway
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Sends one order-shaping request derived from a generated message.
    ///
    /// Messages with no wire representation (execution reports) and sends
    /// on an unbound channel are dropped; the latter logs an error.
    pub fn send_order_message(&self, message: &GeneratedMessage, instrument: &InstrumentDescriptor) {
        let Some(request) = trading_request(message, instrument) else {
            debug!(
                message_type = %message.message_type,
                "message kind has no trading-request representation, nothing sent"
            );
            return;
        };

        let gateway = self
            .gateway
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        match gateway {
            Some(gateway) => gateway.submit(request),
            None => error!(
                message_type = %message.message_type,
                "failed to send order request - trading request channel is not bound"
            ),
        }
    }

    /// Performs the synchronous instrument-state query. Returns `None`
    /// when the channel is unbound or the gateway cannot answer.
    pub fn query_instrument_state(&self, request: InstrumentStateRequest) -> Option<InstrumentState> {
        let gateway = self
            .gateway
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        gateway?.instrument_state(request)
    }
}

/// [`TradingGateway`] adapter forwarding order requests into a crossbeam
/// channel.
///
/// Instrument-state queries cannot be answered over a one-way queue and
/// always return `None`; pair this gateway with engines that tolerate an
/// empty market state (the random generator does).
pub struct ChannelGateway {
    requests: Sender<TradingRequest>,
}

impl ChannelGateway {
    /// Wraps a crossbeam sender.
    pub fn new(requests: Sender<TradingRequest>) -> Self {
        Self { requests }
    }
}

impl TradingGateway for ChannelGateway {
    fn submit(&self, request: TradingRequest) {
        if self.requests.send(request).is_err() {
            error!("trading request receiver disconnected, request dropped");
        }
    }

    fn instrument_state(&self, _request: InstrumentStateRequest) -> Option<InstrumentState> {
        None
    }
}
