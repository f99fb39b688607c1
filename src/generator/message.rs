//! Neutral generated-message model and the request builder.
//!
//! A [`GeneratedMessage`] carries the intent of one generation step in a
//! protocol-neutral form. The same record type flows in both directions:
//! the generators emit it (and the protocol layer converts it to wire
//! requests), and matching-engine replies are converted back into it
//! before being folded into the registry.

use std::fmt;

use serde::Serialize;

/// Message kind of a [`GeneratedMessage`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum MessageType {
    /// A new order entering the book (resting) or crossing it
    /// (aggressive).
    #[default]
    NewOrderSingle,
    /// Modification of a live resting order.
    OrderCancelReplaceRequest,
    /// Cancellation of a live resting order.
    OrderCancelRequest,
    /// Matching-engine feedback about a previously sent order.
    ExecutionReport,
}

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Side {
    /// Buy side / bid.
    Buy,
    /// Sell side / offer.
    Sell,
}

impl Side {
    /// The other side of the book.
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// Order type attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OrderType {
    /// Priced order that can rest on the book.
    Limit,
    /// Unpriced order that executes against the opposite side.
    Market,
}

/// Time-in-force attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TimeInForce {
    /// Rests until the end of the trading day.
    Day,
    /// Executes immediately, any remainder is cancelled.
    ImmediateOrCancel,
}

/// Order status reported by the matching engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OrderStatus {
    /// Order accepted and live.
    New,
    /// Order modified.
    Modified,
    /// Order partially executed, remainder live.
    PartiallyFilled,
    /// Order fully executed.
    Filled,
    /// Order cancelled.
    Cancelled,
    /// Order rejected.
    Rejected,
}

/// Protocol-neutral intent record produced and consumed by the generation
/// core.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GeneratedMessage {
    /// Message kind.
    pub message_type: MessageType,
    /// Order type attribute.
    pub order_type: Option<OrderType>,
    /// Time-in-force attribute.
    pub time_in_force: Option<TimeInForce>,
    /// Order side.
    pub side: Option<Side>,
    /// Order price.
    pub order_price: Option<f64>,
    /// Order quantity.
    pub quantity: Option<f64>,
    /// Client order identifier.
    pub client_order_id: Option<String>,
    /// Previous client order identifier, carried on modifications and
    /// cancellations.
    pub orig_client_order_id: Option<String>,
    /// Owning counterparty identifier.
    pub party_id: Option<String>,
    /// Order status, set on execution reports only.
    pub order_status: Option<OrderStatus>,
}

impl GeneratedMessage {
    /// Creates an otherwise empty message of the given kind.
    pub fn new(message_type: MessageType) -> Self {
        Self {
            message_type,
            ..Self::default()
        }
    }

    /// Whether the message describes a resting order: limit type with a
    /// day time-in-force.
    pub fn is_resting_order(&self) -> bool {
        self.order_type == Some(crate::generator::constants::RESTING_ORDER_TYPE)
            && self.time_in_force == Some(crate::generator::constants::RESTING_TIME_IN_FORCE)
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            MessageType::NewOrderSingle => "NewOrderSingle",
            MessageType::OrderCancelReplaceRequest => "OrderCancelReplaceRequest",
            MessageType::OrderCancelRequest => "OrderCancelRequest",
            MessageType::ExecutionReport => "ExecutionReport",
        };
        f.write_str(value)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Buy => "Buy",
            Side::Sell => "Sell",
        })
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OrderType::Limit => "Limit",
            OrderType::Market => "Market",
        })
    }
}

impl fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TimeInForce::Day => "Day",
            TimeInForce::ImmediateOrCancel => "ImmediateOrCancel",
        })
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OrderStatus::New => "New",
            OrderStatus::Modified => "Modified",
            OrderStatus::PartiallyFilled => "PartiallyFilled",
            OrderStatus::Filled => "Filled",
            OrderStatus::Cancelled => "Cancelled",
            OrderStatus::Rejected => "Rejected",
        })
    }
}

/// Missing-attribute failure raised when constructing a request message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestBuildError {
    /// Name of the attribute that was absent.
    pub missing: &'static str,
}

impl fmt::Display for RequestBuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "can not construct order request without a {} value",
            self.missing
        )
    }
}

impl std::error::Error for RequestBuildError {}

/// Builder assembling validated order request messages.
///
/// Used by the historical record applier, which constructs requests from
/// registry rows and snapshot levels rather than through the random
/// algorithm's incremental attribute assignment.
#[derive(Debug, Default)]
pub struct RequestBuilder {
    message_type: Option<MessageType>,
    order_type: Option<OrderType>,
    time_in_force: Option<TimeInForce>,
    side: Option<Side>,
    price: Option<f64>,
    quantity: Option<f64>,
    client_order_id: Option<String>,
    orig_client_order_id: Option<String>,
    party_id: Option<String>,
}

impl RequestBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the request as a new order placement.
    pub fn new_order_request(mut self) -> Self {
        self.message_type = Some(MessageType::NewOrderSingle);
        self
    }

    /// Marks the request as an order modification.
    pub fn modification_request(mut self) -> Self {
        self.message_type = Some(MessageType::OrderCancelReplaceRequest);
        self
    }

    /// Marks the request as an order cancellation.
    pub fn cancel_request(mut self) -> Self {
        self.message_type = Some(MessageType::OrderCancelRequest);
        self
    }

    /// Sets the client order identifier.
    pub fn client_order_id(mut self, id: impl Into<String>) -> Self {
        self.client_order_id = Some(id.into());
        self
    }

    /// Sets the previous client order identifier.
    pub fn orig_client_order_id(mut self, id: impl Into<String>) -> Self {
        self.orig_client_order_id = Some(id.into());
        self
    }

    /// Sets the owning counterparty.
    pub fn counterparty(mut self, party: impl Into<String>) -> Self {
        self.party_id = Some(party.into());
        self
    }

    /// Applies the aggressive order type / time-in-force pair.
    pub fn aggressive_attributes(mut self) -> Self {
        self.order_type = Some(crate::generator::constants::AGGRESSIVE_ORDER_TYPE);
        self.time_in_force = Some(crate::generator::constants::AGGRESSIVE_TIME_IN_FORCE);
        self
    }

    /// Applies the resting order type / time-in-force pair.
    pub fn resting_attributes(mut self) -> Self {
        self.order_type = Some(crate::generator::constants::RESTING_ORDER_TYPE);
        self.time_in_force = Some(crate::generator::constants::RESTING_TIME_IN_FORCE);
        self
    }

    /// Sets the order price.
    pub fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// Sets the order quantity.
    pub fn quantity(mut self, quantity: f64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Sets the order side.
    pub fn side(mut self, side: Side) -> Self {
        self.side = Some(side);
        self
    }

    /// Validates and constructs the message. Message type, order type,
    /// time-in-force, side and client order id are mandatory.
    pub fn build(self) -> Result<GeneratedMessage, RequestBuildError> {
        let message_type = self.message_type.ok_or(RequestBuildError {
            missing: "MessageType",
        })?;
        let order_type = self.order_type.ok_or(RequestBuildError {
            missing: "OrderType",
        })?;
        let time_in_force = self.time_in_force.ok_or(RequestBuildError {
            missing: "TimeInForce",
        })?;
        let side = self.side.ok_or(RequestBuildError { missing: "Side" })?;
        let client_order_id = self.client_order_id.ok_or(RequestBuildError {
            missing: "ClOrdID",
        })?;

        Ok(GeneratedMessage {
            message_type,
            order_type: Some(order_type),
            time_in_force: Some(time_in_force),
            side: Some(side),
            order_price: self.price,
            quantity: self.quantity,
            client_order_id: Some(client_order_id),
            orig_client_order_id: self.orig_client_order_id,
            party_id: self.party_id,
            order_status: None,
        })
    }
}
