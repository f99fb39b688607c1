//! Prelude module that re-exports commonly used types and traits.
//!
//! Instead of importing each type individually, you can use:
//!
//! ```rust
//! use orderflow_rs::prelude::*;
//! ```

// Catalog model types
pub use crate::model::{
    Catalog, ColumnMapping, Datasource, DatasourceFormat, Listing, MemoryCatalog, PriceSeed, Venue,
};

// Engine and lifecycle
pub use crate::generator::{Engine, EngineConfig, Executable, Executor, GenerationManager};

// Message model
pub use crate::generator::{
    GeneratedMessage, MessageType, OrderStatus, OrderType, RequestBuilder, Side, TimeInForce,
};

// Registry
pub use crate::generator::{OrderData, OrderDataPatch, OrderRegistry, RegistryUpdater};

// Trading channel and protocol
pub use crate::generator::{
    ChannelGateway, InstrumentDescriptor, TradingChannel, TradingGateway, TradingReply,
    TradingRequest,
};

// Market data
pub use crate::generator::MarketState;

// Historical replay
pub use crate::generator::historical::{
    Action, ActionsScheduler, DataAdapter, DataProvider, FiniteProvider, HistoricalReplier, Level,
    Record, RepeatingProvider,
};
