//! Venue-scoped generation engine.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::generator::channel::TradingChannel;
use crate::generator::context::{GenerationContext, GenerationManager, InstrumentContext};
use crate::generator::executor::Executor;
use crate::generator::historical::HistoricalReplier;
use crate::generator::message::GeneratedMessage;
use crate::generator::protocol::{TradingReply, instrument_descriptor, reply_message};
use crate::generator::random::InstrumentOrderGenerator;
use crate::generator::registry::RegistryUpdater;
use crate::model::{Catalog, Venue};

/// Runtime configuration of one engine instance.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineConfig {
    /// Emit a JSON decision trace for every random generation pass.
    pub enable_tracing: bool,
}

/// The synthetic order-flow engine of one venue.
///
/// Owns one [`InstrumentContext`] per accepted listing, one random-order
/// executor per instrument with a configured price seed, and at most one
/// historical replay executor. Replies from the matching engine are
/// routed back into the originating instrument's registry by
/// `requester_instrument_id`.
pub struct Engine {
    run_id: Uuid,
    manager: Arc<GenerationManager>,
    channel: Arc<TradingChannel>,
    contexts: Vec<Arc<InstrumentContext>>,
    context_lookup: DashMap<u64, Arc<InstrumentContext>>,
    random_generators: Vec<Arc<Executor>>,
    historical_replier: Option<Arc<Executor>>,
    terminated: AtomicBool,
}

impl Engine {
    /// Creates an engine with the default configuration.
    pub fn new(venue: Venue, catalog: &dyn Catalog, channel: Arc<TradingChannel>) -> Self {
        Self::with_config(venue, catalog, channel, EngineConfig::default())
    }

    /// Creates an engine, loading all catalog inputs for the venue.
    pub fn with_config(
        venue: Venue,
        catalog: &dyn Catalog,
        channel: Arc<TradingChannel>,
        config: EngineConfig,
    ) -> Self {
        let mut engine = Self {
            run_id: Uuid::new_v4(),
            manager: GenerationManager::new(venue),
            channel,
            contexts: Vec::new(),
            context_lookup: DashMap::new(),
            random_generators: Vec::new(),
            historical_replier: None,
            terminated: AtomicBool::new(false),
        };

        engine.initialize_instruments(catalog);
        engine.initialize_random_executors(catalog, config);
        engine.initialize_historical_executor(catalog);

        info!(
            run_id = %engine.run_id,
            venue_id = %engine.manager.venue().venue_id,
            instruments = engine.contexts.len(),
            "generator initialized"
        );
        engine
    }

    /// Looks the venue up in the catalog and creates its engine.
    pub fn for_venue(
        venue_id: &str,
        catalog: &dyn Catalog,
        channel: Arc<TradingChannel>,
        config: EngineConfig,
    ) -> Option<Self> {
        match catalog.venue(venue_id) {
            Some(venue) => Some(Self::with_config(venue, catalog, channel, config)),
            None => {
                warn!(venue_id, "venue is not present in the catalog");
                None
            }
        }
    }

    fn initialize_instruments(&mut self, catalog: &dyn Catalog) {
        let venue_id = self.manager.venue().venue_id.clone();

        for listing in catalog.listings() {
            if listing.venue_id != venue_id {
                debug!(
                    listing_id = listing.listing_id,
                    listing_venue = %listing.venue_id,
                    "ignoring listing of another venue"
                );
                continue;
            }

            if !listing.is_generator_eligible() {
                continue;
            }

            let mut descriptor = instrument_descriptor(&listing);
            descriptor.requester_instrument_id = Some(listing.listing_id);

            let listing_id = listing.listing_id;
            let context = InstrumentContext::new(listing, descriptor, Arc::clone(&self.manager));
            self.context_lookup.insert(listing_id, Arc::clone(&context));
            self.contexts.push(context);
        }
    }

    fn initialize_random_executors(&mut self, catalog: &dyn Catalog, config: EngineConfig) {
        for context in &self.contexts {
            let Some(symbol) = context.listing().symbol_str() else {
                continue;
            };

            let Some(price_seed) = catalog.price_seed(symbol) else {
                info!(
                    symbol,
                    "no price seed entry found for the instrument, \
                     random order generation is disabled for it"
                );
                continue;
            };

            let generation_context =
                GenerationContext::new(Arc::clone(context), price_seed, Arc::clone(&self.channel));
            let executable = InstrumentOrderGenerator::new(
                generation_context,
                Arc::clone(&self.channel),
                config.enable_tracing,
            );

            self.random_generators
                .push(Executor::new(Box::new(executable), Arc::clone(&self.manager)));
        }
    }

    fn initialize_historical_executor(&mut self, catalog: &dyn Catalog) {
        if self.contexts.is_empty() {
            self.historical_replier = None;
            return;
        }

        let datasources = catalog.datasources(&self.manager.venue().venue_id);
        let replier =
            HistoricalReplier::new(&datasources, &self.contexts, Arc::clone(&self.channel));

        self.historical_replier = Some(Executor::new(
            Box::new(replier),
            Arc::clone(&self.manager),
        ));
    }

    /// Whether generation is currently active.
    pub fn status(&self) -> bool {
        self.manager.is_running()
    }

    /// Launches every executor (each one honors the lifecycle state).
    pub fn start(&self) {
        for executor in &self.random_generators {
            executor.launch();
        }
        if let Some(replier) = &self.historical_replier {
            replier.launch();
        }
    }

    /// Suspends generation; executors park until the next resume.
    pub fn suspend(&self) {
        self.manager.suspend();
    }

    /// Resumes suspended generation.
    pub fn resume(&self) {
        self.manager.launch();
    }

    /// Terminates generation permanently. Idempotent.
    pub fn terminate(&self) {
        if self.terminated.swap(true, Ordering::SeqCst) {
            return;
        }

        for executor in &self.random_generators {
            executor.terminate();
        }
        if let Some(replier) = &self.historical_replier {
            replier.terminate();
        }
        self.manager.terminate();
    }

    /// Folds a matching-engine reply into the registry of the
    /// originating instrument. Unknown instruments are ignored with a
    /// warning.
    pub fn process_reply(&self, instrument_id: u64, reply: &GeneratedMessage) {
        let Some(context) = self.context_lookup.get(&instrument_id) else {
            warn!(
                instrument_id,
                "can not process reply message: no context has been found for the instrument"
            );
            return;
        };

        if let Err(err) = RegistryUpdater::apply(context.registry(), reply) {
            warn!(instrument_id, %err, "reply message was refused by the registry updater");
            return;
        }
        debug!(instrument_id, "reply message processed");
    }

    /// Routes a typed wire reply via its `requester_instrument_id`.
    pub fn dispatch_reply(&self, reply: &TradingReply) {
        let Some(instrument_id) = reply.instrument().requester_instrument_id else {
            warn!("received a reply without the requester instrument identifier, dropped");
            return;
        };

        let message = reply_message(reply);
        self.process_reply(instrument_id, &message);
    }

    /// Contexts of all accepted listings (test and embedding access).
    pub fn contexts(&self) -> &[Arc<InstrumentContext>] {
        &self.contexts
    }

    /// Unique identifier of this engine instance, used in logs.
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.terminate();
    }
}
