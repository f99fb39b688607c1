//! Per-counterparty resting-order record held by the registry.

use std::fmt;

use crate::generator::message::Side;

/// Failure constructing or patching an order record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum OrderDataError {
    /// The owning counterparty identifier was empty.
    EmptyOwnerId,
    /// The order identifier was empty.
    EmptyOrderId,
}

impl fmt::Display for OrderDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderDataError::EmptyOwnerId => {
                f.write_str("an order owner id can not be represented by an empty string")
            }
            OrderDataError::EmptyOrderId => {
                f.write_str("an order id can not be represented by an empty string")
            }
        }
    }
}

impl std::error::Error for OrderDataError {}

/// One live generated resting order.
///
/// The registry guarantees at most one record per counterparty and keeps
/// both the owner id and the order id unique across the instrument.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderData {
    order_id: String,
    orig_order_id: Option<String>,
    owner_id: String,
    price: f64,
    quantity: f64,
    side: Side,
}

impl OrderData {
    /// Starts building a record; owner, order id and side are mandatory.
    pub fn builder(
        owner_id: impl Into<String>,
        order_id: impl Into<String>,
        side: Side,
    ) -> OrderDataBuilder {
        OrderDataBuilder {
            owner_id: owner_id.into(),
            order_id: order_id.into(),
            side,
            price: 0.0,
            quantity: 0.0,
        }
    }

    /// Current client order identifier.
    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    /// Original client order identifier.
    ///
    /// Falls back to the current identifier while the order has never been
    /// renamed.
    pub fn orig_order_id(&self) -> &str {
        self.orig_order_id.as_deref().unwrap_or(&self.order_id)
    }

    /// Owning counterparty identifier.
    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    /// Order price.
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Order quantity.
    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    /// Order side.
    pub fn side(&self) -> Side {
        self.side
    }

    /// Applies a patch. The first identifier change captures the previous
    /// identifier as the original one; later renames keep it.
    pub(crate) fn apply(&mut self, patch: OrderDataPatch) {
        if let Some(new_id) = patch.order_id {
            if !new_id.is_empty() {
                if self.orig_order_id.is_none() {
                    self.orig_order_id = Some(self.order_id.clone());
                }
                self.order_id = new_id;
            }
        }

        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
    }
}

/// Builder for [`OrderData`].
#[derive(Debug)]
pub struct OrderDataBuilder {
    owner_id: String,
    order_id: String,
    side: Side,
    price: f64,
    quantity: f64,
}

impl OrderDataBuilder {
    /// Sets the order price (defaults to zero).
    pub fn price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    /// Sets the order quantity (defaults to zero).
    pub fn quantity(mut self, quantity: f64) -> Self {
        self.quantity = quantity;
        self
    }

    /// Validates the keys and constructs the record.
    pub fn build(self) -> Result<OrderData, OrderDataError> {
        if self.owner_id.is_empty() {
            return Err(OrderDataError::EmptyOwnerId);
        }
        if self.order_id.is_empty() {
            return Err(OrderDataError::EmptyOrderId);
        }

        Ok(OrderData {
            order_id: self.order_id,
            orig_order_id: None,
            owner_id: self.owner_id,
            price: self.price,
            quantity: self.quantity,
            side: self.side,
        })
    }
}

/// Partial update of a stored order record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderDataPatch {
    order_id: Option<String>,
    price: Option<f64>,
    quantity: Option<f64>,
}

impl OrderDataPatch {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the order identifier. Empty identifiers are ignored at
    /// application time; callers validate beforehand.
    pub fn order_id(mut self, order_id: impl Into<String>) -> Self {
        self.order_id = Some(order_id.into());
        self
    }

    /// Replaces the price.
    pub fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// Replaces the quantity.
    pub fn quantity(mut self, quantity: f64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// New order identifier carried by this patch, if any.
    pub(crate) fn new_order_id(&self) -> Option<&str> {
        self.order_id.as_deref()
    }
}
