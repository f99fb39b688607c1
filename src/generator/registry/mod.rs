//! Generated-orders registry: the per-instrument ground truth of live
//! resting orders, plus the updater folding messages into it.

mod order_data;
mod store;
mod updater;

pub use order_data::{OrderData, OrderDataBuilder, OrderDataError, OrderDataPatch};
pub use store::OrderRegistry;
pub use updater::{RegistryUpdater, UpdaterError};
