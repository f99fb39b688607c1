//! Venue-scoped generation lifecycle and the shared per-instrument
//! context objects.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use crossbeam::atomic::AtomicCell;
use tracing::warn;

use crate::generator::channel::TradingChannel;
use crate::generator::constants;
use crate::generator::market_data::{MarketDataProvider, MarketState};
use crate::generator::protocol::InstrumentDescriptor;
use crate::generator::registry::OrderRegistry;
use crate::model::{Listing, PriceSeed, Venue};

/// Three-valued generation lifecycle state. `Terminated` is absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Active,
    Suspended,
    Terminated,
}

/// Atomic lifecycle cell shared by all generation threads of one venue.
#[derive(Debug)]
pub struct GenerationState {
    state: AtomicCell<State>,
}

impl GenerationState {
    /// Creates the state, optionally already active.
    pub fn new(activate_on_creation: bool) -> Self {
        let initial = if activate_on_creation {
            State::Active
        } else {
            State::Suspended
        };
        Self {
            state: AtomicCell::new(initial),
        }
    }

    /// Whether generation is currently active.
    pub fn is_running(&self) -> bool {
        self.state.load() == State::Active
    }

    /// Flips to `Active` unless terminated.
    pub fn set_running(&self) {
        if !self.is_terminated() {
            self.state.store(State::Active);
        }
    }

    /// Flips to `Suspended` unless terminated.
    pub fn set_stopped(&self) {
        if !self.is_terminated() {
            self.state.store(State::Suspended);
        }
    }

    /// Whether the absorbing terminal state has been entered.
    pub fn is_terminated(&self) -> bool {
        self.state.load() == State::Terminated
    }

    /// Enters the terminal state. There is no way back.
    pub fn set_terminated(&self) {
        self.state.store(State::Terminated);
    }
}

/// Monotonic synthetic identifier source, seeded from the wall clock at
/// creation so identifiers stay unique across engine restarts.
#[derive(Debug)]
pub struct IdentifierGenerator {
    next_identifier: AtomicU64,
}

impl IdentifierGenerator {
    /// Creates a generator seeded from the current wall-clock nanoseconds.
    pub fn new() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos() as u64)
            .unwrap_or_default();
        Self {
            next_identifier: AtomicU64::new(seed),
        }
    }

    /// Emits the next `SIM-<counter>` identifier.
    pub fn generate(&self) -> String {
        let value = self.next_identifier.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", constants::SYNTHETIC_IDENTIFIER_PREFIX, value)
    }
}

impl Default for IdentifierGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Counter of generated order messages across one venue.
#[derive(Debug, Default)]
pub struct GeneratedMessagesCounter {
    generated: AtomicU64,
}

impl GeneratedMessagesCounter {
    /// Increments and returns the new count.
    pub fn increment(&self) -> u64 {
        self.generated.fetch_add(1, Ordering::Relaxed) + 1
    }
}

type LaunchListener = Box<dyn FnOnce() + Send>;

/// Owner of the venue value, identifier source, message counter and
/// lifecycle state for one engine instance.
///
/// Launch listeners registered while generation is suspended are drained
/// and invoked exactly once on the next `launch()`; the callbacks run
/// outside the listener lock.
pub struct GenerationManager {
    venue: Venue,
    state: GenerationState,
    identifiers: IdentifierGenerator,
    message_counter: GeneratedMessagesCounter,
    launch_listeners: Mutex<Vec<LaunchListener>>,
}

impl std::fmt::Debug for GenerationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationManager")
            .field("venue", &self.venue.venue_id)
            .field("running", &self.state.is_running())
            .field("terminated", &self.state.is_terminated())
            .finish()
    }
}

impl GenerationManager {
    /// Creates a manager for the target venue. Generation starts active
    /// when the venue's `orders_on_startup` flag says so.
    pub fn new(venue: Venue) -> Arc<Self> {
        let state = GenerationState::new(venue.orders_on_startup);
        Arc::new(Self {
            venue,
            state,
            identifiers: IdentifierGenerator::new(),
            message_counter: GeneratedMessagesCounter::default(),
            launch_listeners: Mutex::new(Vec::new()),
        })
    }

    /// Whether generation is currently active.
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// The venue this manager serves.
    pub fn venue(&self) -> &Venue {
        &self.venue
    }

    /// Emits the next synthetic client order identifier.
    pub fn generate_identifier(&self) -> String {
        self.identifiers.generate()
    }

    /// Counts one more generated order message.
    pub fn next_message_number(&self) -> u64 {
        self.message_counter.increment()
    }

    /// Registers a callback for the next launch. Ignored once terminated.
    pub fn call_on_launch(&self, callback: LaunchListener) {
        if !self.state.is_terminated() {
            self.launch_listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(callback);
        }
    }

    /// Activates generation and fires the pending launch listeners.
    pub fn launch(&self) {
        if self.state.is_running() {
            return;
        }

        if self.state.is_terminated() {
            warn!(
                venue_id = %self.venue.venue_id,
                "unable to launch generation, it has been terminated previously"
            );
            return;
        }

        self.state.set_running();

        let pending = {
            let mut listeners = self
                .launch_listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            std::mem::take(&mut *listeners)
        };
        for callback in pending {
            callback();
        }
    }

    /// Suspends generation.
    pub fn suspend(&self) {
        self.state.set_stopped();
    }

    /// Terminates generation permanently.
    pub fn terminate(&self) {
        self.state.set_terminated();
    }
}

/// Per-instrument generation context: the listing, its wire descriptor,
/// the venue-wide manager and the instrument's order registry.
///
/// The engine owns the contexts; executables and the historical replayer
/// share them through `Arc` handles. A context never owns its engine.
#[derive(Debug)]
pub struct InstrumentContext {
    listing: Listing,
    descriptor: InstrumentDescriptor,
    manager: Arc<GenerationManager>,
    registry: OrderRegistry,
}

impl InstrumentContext {
    /// Creates a context with an empty registry.
    pub fn new(
        listing: Listing,
        descriptor: InstrumentDescriptor,
        manager: Arc<GenerationManager>,
    ) -> Arc<Self> {
        Arc::new(Self {
            listing,
            descriptor,
            manager,
            registry: OrderRegistry::new(),
        })
    }

    /// The listing this context serves.
    pub fn listing(&self) -> &Listing {
        &self.listing
    }

    /// Wire descriptor attached to every outbound request.
    pub fn descriptor(&self) -> &InstrumentDescriptor {
        &self.descriptor
    }

    /// The venue value.
    pub fn venue(&self) -> &Venue {
        self.manager.venue()
    }

    /// Venue-wide lifecycle manager.
    pub fn manager(&self) -> &Arc<GenerationManager> {
        &self.manager
    }

    /// Emits the next synthetic client order identifier.
    pub fn generate_identifier(&self) -> String {
        self.manager.generate_identifier()
    }

    /// Counts one more generated order message.
    pub fn next_message_number(&self) -> u64 {
        self.manager.next_message_number()
    }

    /// The instrument's generated-orders registry.
    pub fn registry(&self) -> &OrderRegistry {
        &self.registry
    }
}

/// Context of the random generation algorithm: the instrument context plus
/// the configured price seed and live market-data access.
#[derive(Debug)]
pub struct GenerationContext {
    instrument: Arc<InstrumentContext>,
    price_seed: PriceSeed,
    market_data: MarketDataProvider,
}

impl GenerationContext {
    /// Creates the algorithm context.
    pub fn new(
        instrument: Arc<InstrumentContext>,
        price_seed: PriceSeed,
        channel: Arc<TradingChannel>,
    ) -> Arc<Self> {
        let market_data = MarketDataProvider::new(channel, instrument.descriptor().clone());
        Arc::new(Self {
            instrument,
            price_seed,
            market_data,
        })
    }

    /// The instrument context.
    pub fn instrument(&self) -> &Arc<InstrumentContext> {
        &self.instrument
    }

    /// The listing.
    pub fn listing(&self) -> &Listing {
        self.instrument.listing()
    }

    /// The venue.
    pub fn venue(&self) -> &Venue {
        self.instrument.venue()
    }

    /// Configured seed prices.
    pub fn price_seed(&self) -> &PriceSeed {
        &self.price_seed
    }

    /// Emits the next synthetic client order identifier.
    pub fn generate_identifier(&self) -> String {
        self.instrument.generate_identifier()
    }

    /// The instrument's generated-orders registry.
    pub fn registry(&self) -> &OrderRegistry {
        self.instrument.registry()
    }

    /// Current market state, queried synchronously over the channel.
    pub fn current_market_state(&self) -> MarketState {
        self.market_data.market_state()
    }
}
