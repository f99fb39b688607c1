//! # Synthetic Order-Flow Generation Core
//!
//! `orderflow-rs` is the order-flow generation core of a trading-venue
//! simulator. It continuously injects plausible activity — new orders,
//! modifications, cancellations — into a matching engine so that
//! downstream market-data and trade-reporting components have realistic
//! traffic to process.
//!
//! ## Key Features
//!
//! - **Randomized per-instrument generation**: a stateful algorithm that,
//!   on each tick, places an aggressive order, places/modifies/cancels a
//!   resting order, or stays quiet, based on sampled events and the
//!   observed market state. One resting order per counterparty per
//!   instrument, always.
//!
//! - **Historical replay**: a time-warped scheduler that ingests recorded
//!   depth snapshots from CSV files or PostgreSQL tables, groups co-timed
//!   records into actions, and emits the order requests that make the
//!   live book mirror the recorded one.
//!
//! - **Generated-orders registry**: a thread-safe two-index store
//!   (by counterparty and by order id) that is the ground truth of what
//!   the generator believes is resting on the book.
//!
//! - **Venue-scoped lifecycle**: launch, suspend, resume and terminate an
//!   entire venue's generation from one manager; executors park on
//!   suspension and resume on the next launch event.
//!
//! - **Thread-per-executor concurrency**: every instrument is driven by
//!   its own OS thread on its own cadence; matching-engine replies are
//!   folded in from the engine's dispatcher thread through the registry
//!   lock.
//!
//! ## Architecture
//!
//! One [`generator::Engine`] serves one configured venue. At
//! construction it pulls the venue, listings, price seeds and datasources
//! from a read-only [`model::Catalog`], builds one instrument context per
//! accepted listing, and wires executors for random generation and
//! (when datasources are configured) historical replay. All outbound
//! requests flow through a [`generator::TradingChannel`]; an unbound
//! channel drops requests without failing generation.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use orderflow_rs::prelude::*;
//!
//! let mut catalog = MemoryCatalog::new();
//! catalog.add_venue(Venue::new("XSIM"));
//! catalog.add_listing(Listing {
//!     symbol: Some("AAPL".to_owned()),
//!     ..Listing::new(1, "XSIM")
//! });
//! catalog.add_price_seed(PriceSeed {
//!     bid_price: Some(100.0),
//!     offer_price: Some(100.1),
//!     ..PriceSeed::new("AAPL")
//! });
//!
//! let channel = TradingChannel::new();
//! let engine = Engine::new(
//!     catalog.venue("XSIM").expect("venue just added"),
//!     &catalog,
//!     Arc::clone(&channel),
//! );
//!
//! engine.resume();
//! engine.start();
//! engine.terminate();
//! ```

pub mod generator;
pub mod model;

pub mod prelude;

pub use generator::{
    Engine, EngineConfig, GeneratedMessage, MessageType, OrderData, OrderRegistry, Side,
    TradingChannel, TradingGateway,
};
pub use model::{Catalog, Datasource, Listing, MemoryCatalog, PriceSeed, Venue};
