//! Folds generated messages and matching-engine replies into the
//! registry.

use std::fmt;

use tracing::{debug, warn};

use crate::generator::message::{GeneratedMessage, MessageType, OrderStatus};

use super::order_data::{OrderData, OrderDataPatch};
use super::store::OrderRegistry;

/// Programmer-error raised for messages that lack attributes mandatory
/// for their kind. The message is refused; the registry is untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdaterError {
    /// Kind of the offending message.
    pub message_type: MessageType,
    /// Missing attribute name.
    pub missing: &'static str,
}

impl fmt::Display for UpdaterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "registry updater expects a `{}' message to have a non-empty {}",
            self.message_type, self.missing
        )
    }
}

impl std::error::Error for UpdaterError {}

/// Stateless mapper from messages to registry mutations.
///
/// Soft failures (duplicate insert, unknown keys) are logged and absorbed;
/// only structurally invalid messages surface as [`UpdaterError`].
pub struct RegistryUpdater;

impl RegistryUpdater {
    /// Applies one message to the registry.
    pub fn apply(registry: &OrderRegistry, message: &GeneratedMessage) -> Result<(), UpdaterError> {
        match message.message_type {
            MessageType::NewOrderSingle => Self::handle_new_order(registry, message),
            MessageType::OrderCancelReplaceRequest => Self::handle_modification(registry, message),
            MessageType::OrderCancelRequest => Self::handle_cancellation(registry, message),
            MessageType::ExecutionReport => Self::handle_execution(registry, message),
        }
    }

    fn handle_new_order(
        registry: &OrderRegistry,
        message: &GeneratedMessage,
    ) -> Result<(), UpdaterError> {
        if !contains_resting_order(message) {
            return Ok(());
        }

        let order_id = require_client_order_id(message)?;
        let owner_id = require_party_id(message)?;
        let side = message.side.ok_or(UpdaterError {
            message_type: message.message_type,
            missing: "Side",
        })?;

        let order = OrderData::builder(owner_id, order_id, side)
            .price(message.order_price.unwrap_or(0.0))
            .quantity(message.quantity.unwrap_or(0.0))
            .build()
            .map_err(|_| UpdaterError {
                message_type: message.message_type,
                missing: "ClOrdID",
            })?;

        if !registry.add(order) {
            warn!(
                owner_id,
                order_id, "failed to register a new generated order: keys already present"
            );
        }
        Ok(())
    }

    fn handle_modification(
        registry: &OrderRegistry,
        message: &GeneratedMessage,
    ) -> Result<(), UpdaterError> {
        if !contains_resting_order(message) {
            return Ok(());
        }

        let order_id = require_client_order_id(message)?;
        let owner_id = require_party_id(message)?;

        let mut patch = OrderDataPatch::new().order_id(order_id);
        if let Some(price) = message.order_price {
            patch = patch.price(price);
        }
        if let Some(quantity) = message.quantity {
            patch = patch.quantity(quantity);
        }

        if !registry.update_by_owner(owner_id, patch) {
            warn!(
                owner_id,
                order_id, "failed to update an order: no active order for that counterparty"
            );
        }
        Ok(())
    }

    fn handle_cancellation(
        registry: &OrderRegistry,
        message: &GeneratedMessage,
    ) -> Result<(), UpdaterError> {
        if !contains_resting_order(message) {
            return Ok(());
        }

        let owner_id = require_party_id(message)?;
        if !registry.remove_by_owner(owner_id) {
            warn!(
                owner_id,
                "failed to remove an order: no active order for that counterparty"
            );
        }
        Ok(())
    }

    /// Execution feedback mutates by order id. Unknown identifiers are
    /// expected (aggressive orders are never stored) and stay silent.
    fn handle_execution(
        registry: &OrderRegistry,
        message: &GeneratedMessage,
    ) -> Result<(), UpdaterError> {
        let order_id = require_client_order_id(message)?;
        let status = message.order_status.ok_or(UpdaterError {
            message_type: message.message_type,
            missing: "OrderStatus",
        })?;

        match status {
            OrderStatus::PartiallyFilled => {
                if let Some(quantity) = message.quantity {
                    registry.update_by_identifier(order_id, OrderDataPatch::new().quantity(quantity));
                }
            }
            OrderStatus::Filled | OrderStatus::Cancelled | OrderStatus::Rejected => {
                registry.remove_by_identifier(order_id);
            }
            OrderStatus::New | OrderStatus::Modified => {}
        }
        Ok(())
    }
}

fn contains_resting_order(message: &GeneratedMessage) -> bool {
    if message.is_resting_order() {
        return true;
    }

    debug!(
        message_type = %message.message_type,
        order_type = ?message.order_type,
        time_in_force = ?message.time_in_force,
        "registry updater ignores a non-resting order message"
    );
    false
}

fn require_client_order_id(message: &GeneratedMessage) -> Result<&str, UpdaterError> {
    message
        .client_order_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or(UpdaterError {
            message_type: message.message_type,
            missing: "ClOrdID",
        })
}

fn require_party_id(message: &GeneratedMessage) -> Result<&str, UpdaterError> {
    message
        .party_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or(UpdaterError {
            message_type: message.message_type,
            missing: "counterparty (owner)",
        })
}
