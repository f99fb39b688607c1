//! The synthetic order-flow generation core.
//!
//! Two subsystems share one set of plumbing: the randomized
//! per-instrument order generator ([`random`]) and the historical depth
//! replayer ([`historical`]). Both emit neutral [`GeneratedMessage`]s,
//! fold resting emissions into the per-instrument [`registry`], and send
//! wire requests through the [`channel`]. The [`Engine`] wires one venue
//! worth of instruments to executors and routes matching-engine replies
//! back into the registries.

pub mod channel;
pub mod constants;
pub mod context;
pub mod engine;
pub mod executor;
pub mod historical;
pub mod market_data;
pub mod message;
pub mod numeric;
pub mod protocol;
pub mod random;
pub mod registry;
pub mod trace;

#[cfg(test)]
mod tests;

pub use channel::{ChannelGateway, TradingChannel, TradingGateway};
pub use context::{GenerationContext, GenerationManager, InstrumentContext};
pub use engine::{Engine, EngineConfig};
pub use executor::{Executable, Executor};
pub use market_data::{MarketDataProvider, MarketState};
pub use message::{
    GeneratedMessage, MessageType, OrderStatus, OrderType, RequestBuildError, RequestBuilder, Side,
    TimeInForce,
};
pub use protocol::{InstrumentDescriptor, TradingReply, TradingRequest};
pub use registry::{OrderData, OrderDataPatch, OrderRegistry, RegistryUpdater, UpdaterError};
