//! Wire-level request/reply types of the trading channel and their
//! conversions to and from the neutral generated-message form.

use serde::Serialize;

use crate::generator::message::{
    GeneratedMessage, MessageType, OrderStatus, OrderType, Side, TimeInForce,
};
use crate::model::Listing;

/// Source catalog a security identifier was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SecurityIdSource {
    /// Exchange symbology.
    ExchangeSymbol,
    /// ISIN.
    Isin,
    /// CUSIP.
    Cusip,
    /// SEDOL.
    Sedol,
    /// Reuters instrument code.
    Ric,
    /// Bloomberg symbology.
    BloombergSymbol,
}

/// Role of an order party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PartyRole {
    /// The firm executing the order.
    ExecutingFirm,
    /// The venue's contra firm.
    ContraFirm,
    /// Liquidity provider configured on the listing.
    LiquidityProvider,
}

impl PartyRole {
    /// Parses a catalog party-role name.
    pub fn from_catalog_name(name: &str) -> Option<Self> {
        match name {
            "ExecutingFirm" => Some(PartyRole::ExecutingFirm),
            "ContraFirm" => Some(PartyRole::ContraFirm),
            "LiquidityProvider" => Some(PartyRole::LiquidityProvider),
            _ => None,
        }
    }
}

/// One party attached to an order or instrument.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Party {
    /// Party identifier.
    pub party_id: String,
    /// Party role.
    pub role: PartyRole,
}

/// Instrument identification attached to every outbound request.
///
/// `requester_instrument_id` uniquely identifies the originating
/// instrument inside the engine and routes replies back to its registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InstrumentDescriptor {
    /// Instrument symbol.
    pub symbol: Option<String>,
    /// Security type name.
    pub security_type: Option<String>,
    /// Security identifier.
    pub security_id: Option<String>,
    /// Catalog the security identifier came from.
    pub security_id_source: Option<SecurityIdSource>,
    /// Listing exchange MIC.
    pub security_exchange: Option<String>,
    /// Trade currency.
    pub currency: Option<String>,
    /// Configured instrument parties.
    pub parties: Vec<Party>,
    /// Identifier of the originating instrument for reply routing.
    pub requester_instrument_id: Option<u64>,
}

/// Security types quoted in their FX base currency.
const FX_SECURITY_TYPES: [&str; 6] = [
    "FXSPOT",
    "FORWARD",
    "FXFWD",
    "FXNDF",
    "FXSWAP",
    "FXNDS",
];

/// Builds the instrument descriptor of a listing.
///
/// The security identifier is taken from the first configured source in
/// priority order: exchange symbol, ISIN, CUSIP, SEDOL, RIC, Bloomberg.
/// FX security types carry the FX base currency, everything else the price
/// currency.
pub fn instrument_descriptor(listing: &Listing) -> InstrumentDescriptor {
    let mut descriptor = InstrumentDescriptor {
        symbol: listing.symbol_str().map(str::to_owned),
        security_type: listing.security_type.clone(),
        security_exchange: listing.security_exchange.clone(),
        ..InstrumentDescriptor::default()
    };

    if let Some(security_type) = listing.security_type.as_deref() {
        descriptor.currency = if FX_SECURITY_TYPES.contains(&security_type) {
            listing.fx_base_currency.clone()
        } else {
            listing.price_currency.clone()
        };
    }

    let identifier_sources = [
        (&listing.exchange_symbol_id, SecurityIdSource::ExchangeSymbol),
        (&listing.isin_id, SecurityIdSource::Isin),
        (&listing.cusip_id, SecurityIdSource::Cusip),
        (&listing.sedol_id, SecurityIdSource::Sedol),
        (&listing.ric_id, SecurityIdSource::Ric),
        (&listing.bloomberg_symbol_id, SecurityIdSource::BloombergSymbol),
    ];
    for (identifier, source) in identifier_sources {
        if let Some(id) = identifier.as_deref().filter(|id| !id.is_empty()) {
            descriptor.security_id = Some(id.to_owned());
            descriptor.security_id_source = Some(source);
            break;
        }
    }

    if let (Some(party_id), Some(role_name)) =
        (listing.party_id.as_deref(), listing.party_role.as_deref())
    {
        if let Some(role) = PartyRole::from_catalog_name(role_name) {
            descriptor.parties = vec![Party {
                party_id: party_id.to_owned(),
                role,
            }];
        }
    }

    descriptor
}

/// Request placing a new order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrderPlacementRequest {
    /// Order type attribute.
    pub order_type: Option<OrderType>,
    /// Time-in-force attribute.
    pub time_in_force: Option<TimeInForce>,
    /// Order side.
    pub side: Option<Side>,
    /// Limit price; absent for market-type orders.
    pub order_price: Option<f64>,
    /// Order quantity.
    pub order_quantity: Option<f64>,
    /// Client order identifier.
    pub client_order_id: Option<String>,
    /// Order parties.
    pub parties: Vec<Party>,
    /// Target instrument.
    pub instrument: InstrumentDescriptor,
}

/// Request modifying a live order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrderModificationRequest {
    /// Order type attribute.
    pub order_type: Option<OrderType>,
    /// Time-in-force attribute.
    pub time_in_force: Option<TimeInForce>,
    /// Order side.
    pub side: Option<Side>,
    /// Limit price; absent for market-type orders.
    pub order_price: Option<f64>,
    /// Order quantity.
    pub order_quantity: Option<f64>,
    /// New client order identifier.
    pub client_order_id: Option<String>,
    /// Identifier of the order being modified.
    pub orig_client_order_id: Option<String>,
    /// Order parties.
    pub parties: Vec<Party>,
    /// Target instrument.
    pub instrument: InstrumentDescriptor,
}

/// Request cancelling a live order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrderCancellationRequest {
    /// Order side.
    pub side: Option<Side>,
    /// Client order identifier of the cancellation itself.
    pub client_order_id: Option<String>,
    /// Identifier of the order being cancelled.
    pub orig_client_order_id: Option<String>,
    /// Target instrument.
    pub instrument: InstrumentDescriptor,
}

/// Synchronous query for the current book state of an instrument.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InstrumentStateRequest {
    /// Target instrument.
    pub instrument: InstrumentDescriptor,
}

/// Reply to an [`InstrumentStateRequest`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct InstrumentState {
    /// Best bid price, if any bid is live.
    pub best_bid_price: Option<f64>,
    /// Best offer price, if any offer is live.
    pub best_offer_price: Option<f64>,
    /// Number of live bid depth levels.
    pub current_bid_depth: Option<u32>,
    /// Number of live offer depth levels.
    pub current_offer_depth: Option<u32>,
}

/// Order-shaping requests sent through the trading channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TradingRequest {
    /// New order placement.
    Placement(OrderPlacementRequest),
    /// Order modification.
    Modification(OrderModificationRequest),
    /// Order cancellation.
    Cancellation(OrderCancellationRequest),
}

/// Confirmation of an accepted order placement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderPlacementConfirmation {
    /// Order type attribute.
    pub order_type: Option<OrderType>,
    /// Time-in-force attribute.
    pub time_in_force: Option<TimeInForce>,
    /// Order side.
    pub side: Option<Side>,
    /// Order price.
    pub order_price: Option<f64>,
    /// Order quantity.
    pub order_quantity: Option<f64>,
    /// Client order identifier.
    pub client_order_id: Option<String>,
    /// Instrument the order was placed on.
    pub instrument: InstrumentDescriptor,
}

/// Rejection of an order placement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderPlacementReject {
    /// Order type attribute.
    pub order_type: Option<OrderType>,
    /// Time-in-force attribute.
    pub time_in_force: Option<TimeInForce>,
    /// Order side.
    pub side: Option<Side>,
    /// Order price.
    pub order_price: Option<f64>,
    /// Order quantity.
    pub order_quantity: Option<f64>,
    /// Client order identifier.
    pub client_order_id: Option<String>,
    /// Engine-supplied rejection reason.
    pub reject_text: Option<String>,
    /// Instrument the order was rejected on.
    pub instrument: InstrumentDescriptor,
}

/// Confirmation of an order modification.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderModificationConfirmation {
    /// Order type attribute.
    pub order_type: Option<OrderType>,
    /// Time-in-force attribute.
    pub time_in_force: Option<TimeInForce>,
    /// Order side.
    pub side: Option<Side>,
    /// Order price.
    pub order_price: Option<f64>,
    /// Quantity already executed.
    pub cum_executed_quantity: Option<f64>,
    /// Quantity still live.
    pub leaves_quantity: Option<f64>,
    /// New client order identifier.
    pub client_order_id: Option<String>,
    /// Identifier of the modified order.
    pub orig_client_order_id: Option<String>,
    /// Instrument the order lives on.
    pub instrument: InstrumentDescriptor,
}

/// Confirmation of an order cancellation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderCancellationConfirmation {
    /// Order type attribute.
    pub order_type: Option<OrderType>,
    /// Time-in-force attribute.
    pub time_in_force: Option<TimeInForce>,
    /// Order side.
    pub side: Option<Side>,
    /// Order price.
    pub order_price: Option<f64>,
    /// Quantity already executed.
    pub cum_executed_quantity: Option<f64>,
    /// Quantity still live at cancellation time.
    pub leaves_quantity: Option<f64>,
    /// Client order identifier.
    pub client_order_id: Option<String>,
    /// Identifier of the cancelled order.
    pub orig_client_order_id: Option<String>,
    /// Instrument the order lived on.
    pub instrument: InstrumentDescriptor,
}

/// Execution report for a live order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionReport {
    /// Reported order status.
    pub order_status: Option<OrderStatus>,
    /// Order type attribute.
    pub order_type: Option<OrderType>,
    /// Time-in-force attribute.
    pub time_in_force: Option<TimeInForce>,
    /// Order side.
    pub side: Option<Side>,
    /// Order price.
    pub order_price: Option<f64>,
    /// Quantity already executed.
    pub cum_executed_quantity: Option<f64>,
    /// Quantity still live.
    pub leaves_quantity: Option<f64>,
    /// Client order identifier.
    pub client_order_id: Option<String>,
    /// Instrument the order lives on.
    pub instrument: InstrumentDescriptor,
}

/// Replies arriving from the matching engine.
#[derive(Debug, Clone, PartialEq)]
pub enum TradingReply {
    /// Placement accepted.
    PlacementConfirmation(OrderPlacementConfirmation),
    /// Placement rejected.
    PlacementReject(OrderPlacementReject),
    /// Modification accepted.
    ModificationConfirmation(OrderModificationConfirmation),
    /// Cancellation accepted.
    CancellationConfirmation(OrderCancellationConfirmation),
    /// Execution feedback.
    Execution(ExecutionReport),
}

impl TradingReply {
    /// Instrument descriptor carried by the reply.
    pub fn instrument(&self) -> &InstrumentDescriptor {
        match self {
            TradingReply::PlacementConfirmation(reply) => &reply.instrument,
            TradingReply::PlacementReject(reply) => &reply.instrument,
            TradingReply::ModificationConfirmation(reply) => &reply.instrument,
            TradingReply::CancellationConfirmation(reply) => &reply.instrument,
            TradingReply::Execution(reply) => &reply.instrument,
        }
    }
}

fn limit_price(price: Option<f64>, order_type: Option<OrderType>) -> Option<f64> {
    // Market-class orders travel unpriced.
    match order_type {
        Some(OrderType::Limit) => price,
        _ => None,
    }
}

fn total_quantity(cum_executed: Option<f64>, leaves: Option<f64>) -> f64 {
    cum_executed.unwrap_or(0.0) + leaves.unwrap_or(0.0)
}

/// Maps a generated message to the wire request for its kind.
///
/// Returns `None` for message kinds that never travel as requests
/// (execution reports).
pub fn trading_request(
    message: &GeneratedMessage,
    instrument: &InstrumentDescriptor,
) -> Option<TradingRequest> {
    let parties = message
        .party_id
        .as_ref()
        .map(|party_id| {
            vec![Party {
                party_id: party_id.clone(),
                role: PartyRole::ExecutingFirm,
            }]
        })
        .unwrap_or_default();

    match message.message_type {
        MessageType::NewOrderSingle => Some(TradingRequest::Placement(OrderPlacementRequest {
            order_type: message.order_type,
            time_in_force: message.time_in_force,
            side: message.side,
            order_price: limit_price(message.order_price, message.order_type),
            order_quantity: message.quantity,
            client_order_id: message.client_order_id.clone(),
            parties,
            instrument: instrument.clone(),
        })),
        MessageType::OrderCancelReplaceRequest => {
            Some(TradingRequest::Modification(OrderModificationRequest {
                order_type: message.order_type,
                time_in_force: message.time_in_force,
                side: message.side,
                order_price: limit_price(message.order_price, message.order_type),
                order_quantity: message.quantity,
                client_order_id: message.client_order_id.clone(),
                orig_client_order_id: message.orig_client_order_id.clone(),
                parties,
                instrument: instrument.clone(),
            }))
        }
        MessageType::OrderCancelRequest => {
            Some(TradingRequest::Cancellation(OrderCancellationRequest {
                side: message.side,
                client_order_id: message.client_order_id.clone(),
                orig_client_order_id: message.orig_client_order_id.clone(),
                instrument: instrument.clone(),
            }))
        }
        MessageType::ExecutionReport => None,
    }
}

/// Converts a matching-engine reply into the neutral message form the
/// registry updater consumes.
pub fn reply_message(reply: &TradingReply) -> GeneratedMessage {
    match reply {
        TradingReply::PlacementConfirmation(confirmation) => GeneratedMessage {
            message_type: MessageType::ExecutionReport,
            order_status: Some(OrderStatus::New),
            order_type: confirmation.order_type,
            time_in_force: confirmation.time_in_force,
            side: confirmation.side,
            order_price: confirmation.order_price,
            quantity: confirmation.order_quantity,
            client_order_id: confirmation.client_order_id.clone(),
            ..GeneratedMessage::default()
        },
        TradingReply::PlacementReject(reject) => GeneratedMessage {
            message_type: MessageType::ExecutionReport,
            order_status: Some(OrderStatus::Rejected),
            order_type: reject.order_type,
            time_in_force: reject.time_in_force,
            side: reject.side,
            order_price: reject.order_price,
            quantity: reject.order_quantity,
            client_order_id: reject.client_order_id.clone(),
            ..GeneratedMessage::default()
        },
        TradingReply::ModificationConfirmation(confirmation) => GeneratedMessage {
            message_type: MessageType::ExecutionReport,
            order_status: Some(OrderStatus::Modified),
            order_type: confirmation.order_type,
            time_in_force: confirmation.time_in_force,
            side: confirmation.side,
            order_price: confirmation.order_price,
            quantity: Some(total_quantity(
                confirmation.cum_executed_quantity,
                confirmation.leaves_quantity,
            )),
            client_order_id: confirmation.client_order_id.clone(),
            orig_client_order_id: confirmation.orig_client_order_id.clone(),
            ..GeneratedMessage::default()
        },
        TradingReply::CancellationConfirmation(confirmation) => GeneratedMessage {
            message_type: MessageType::ExecutionReport,
            order_status: Some(OrderStatus::Cancelled),
            order_type: confirmation.order_type,
            time_in_force: confirmation.time_in_force,
            side: confirmation.side,
            order_price: confirmation.order_price,
            quantity: Some(total_quantity(
                confirmation.cum_executed_quantity,
                confirmation.leaves_quantity,
            )),
            client_order_id: confirmation.client_order_id.clone(),
            orig_client_order_id: confirmation.orig_client_order_id.clone(),
            ..GeneratedMessage::default()
        },
        TradingReply::Execution(report) => GeneratedMessage {
            message_type: MessageType::ExecutionReport,
            order_status: report.order_status,
            order_type: report.order_type,
            time_in_force: report.time_in_force,
            side: report.side,
            order_price: report.order_price,
            quantity: Some(total_quantity(
                report.cum_executed_quantity,
                report.leaves_quantity,
            )),
            client_order_id: report.client_order_id.clone(),
            ..GeneratedMessage::default()
        },
    }
}
