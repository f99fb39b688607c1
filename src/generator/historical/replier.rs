//! The historical replay Executable.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::generator::channel::TradingChannel;
use crate::generator::context::InstrumentContext;
use crate::generator::executor::Executable;
use crate::model::Datasource;

use super::processor::ActionProcessor;
use super::provider::{DataProvider, create_provider};
use super::scheduler::ActionsScheduler;

/// Composes the actions scheduler with the per-instrument processor into
/// one [`Executable`] replaying a venue's recorded depth data.
pub struct HistoricalReplier {
    scheduler: ActionsScheduler,
    processor: ActionProcessor,
}

impl HistoricalReplier {
    /// Builds the replier from the venue's enabled datasources.
    ///
    /// Only the first datasource feeds the replayer for now; reading from
    /// several datasources concurrently needs parallel provider
    /// initialization. A datasource that fails to initialize degrades to
    /// an empty (immediately finished) replier with a warning.
    pub fn new(
        datasources: &[Datasource],
        contexts: &[Arc<InstrumentContext>],
        channel: Arc<TradingChannel>,
    ) -> Self {
        let processor = ActionProcessor::new(contexts, channel);
        let provider = Self::create_provider(datasources);
        let scheduler = ActionsScheduler::new(provider);

        info!("historical data replier initialized");
        Self {
            scheduler,
            processor,
        }
    }

    fn create_provider(datasources: &[Datasource]) -> Option<Box<dyn DataProvider>> {
        let Some(datasource) = datasources.first() else {
            info!("no datasources configured, skipping historical replay configuration");
            return None;
        };

        match create_provider(datasource) {
            Ok(provider) => Some(provider),
            Err(err) => {
                warn!(
                    datasource = %datasource.name,
                    datasource_id = datasource.datasource_id,
                    %err,
                    "failed to initialize a data provider for the datasource"
                );
                None
            }
        }
    }
}

impl Executable for HistoricalReplier {
    fn prepare(&mut self) {
        self.scheduler.initialize();
    }

    fn execute(&mut self) {
        let processor = &self.processor;
        self.scheduler.process_next_action(&mut |action| {
            debug!(%action, "historical replier is applying an action");
            processor.process(action);
        });
    }

    fn finished(&self) -> bool {
        self.scheduler.finished()
    }

    fn next_exec_timeout(&self) -> Duration {
        self.scheduler.next_action_timeout()
    }
}
