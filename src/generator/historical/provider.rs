//! Buffering providers turning parsed records into co-timed actions.

use std::collections::VecDeque;

use chrono::Duration;
use tracing::info;

use crate::model::Datasource;

use super::adapter::{DataAdapter, create_adapter};
use super::error::HistoricalError;
use super::record::{Action, ActionBuilder, Record, make_time_offset};

/// Source of time-rebased historical [`Action`]s.
///
/// A provider buffers the records of one datasource and yields them in
/// groups sharing one receive time. The time offset rebasing recorded
/// timestamps onto the simulator clock is established lazily on the
/// first pull and can be re-established by the scheduler.
pub trait DataProvider: Send {
    /// Whether no more records can be produced.
    fn is_empty(&self) -> bool;

    /// (Re-)establishes the time offset against the current wall clock.
    fn initialize_time_offset(&mut self);

    /// Whether a time offset has been established.
    fn has_time_offset(&self) -> bool;

    /// Pulls the next group of co-timed records.
    fn pull_action(&mut self) -> Result<Action, HistoricalError>;

    /// Buffers one record.
    fn add(&mut self, record: Record);
}

/// Fills a provider from an adapter; returns the number of records
/// buffered.
pub fn prepare(provider: &mut dyn DataProvider, adapter: &mut dyn DataAdapter) -> usize {
    let mut accepted = 0usize;
    adapter.accept(&mut |record| {
        provider.add(record);
        accepted += 1;
    });
    accepted
}

/// Groups the head of `records` (all records sharing the head's receive
/// time) into an action, applying `offset` to every timestamp.
fn pull_group(
    records: &mut VecDeque<Record>,
    offset: Duration,
    mut on_pulled: impl FnMut(&Record),
) -> Result<Action, HistoricalError> {
    let mut builder = ActionBuilder::default();
    let mut group_time = None;

    while let Some(next) = records.front() {
        let next_time = next.receive_time();
        if *group_time.get_or_insert(next_time) != next_time {
            break;
        }

        let record = match records.pop_front() {
            Some(record) => record,
            None => break,
        };
        on_pulled(&record);
        builder.add(record, offset)?;
    }

    builder.build()
}

/// Provider that replays its records exactly once.
#[derive(Debug, Default)]
pub struct FiniteProvider {
    records: VecDeque<Record>,
    time_offset: Option<Duration>,
}

impl FiniteProvider {
    /// Creates an empty provider.
    pub fn new() -> Self {
        Self::default()
    }
}

impl DataProvider for FiniteProvider {
    fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn initialize_time_offset(&mut self) {
        if let Some(first) = self.records.front() {
            self.time_offset = Some(make_time_offset(first.receive_time()));
        }
    }

    fn has_time_offset(&self) -> bool {
        self.time_offset.is_some()
    }

    fn pull_action(&mut self) -> Result<Action, HistoricalError> {
        if self.is_empty() {
            return Err(HistoricalError::ProviderExhausted);
        }
        if !self.has_time_offset() {
            self.initialize_time_offset();
        }

        let offset = self.time_offset.unwrap_or_else(Duration::zero);
        pull_group(&mut self.records, offset, |_| {})
    }

    fn add(&mut self, record: Record) {
        self.records.push_back(record);
    }
}

/// Provider that loops over its records forever.
///
/// Pulled records move onto a processed queue; when the live queue runs
/// dry the processed queue swaps back in and the time offset is
/// re-established, so every cycle replays at the original pace from
/// "now".
#[derive(Debug, Default)]
pub struct RepeatingProvider {
    records: VecDeque<Record>,
    processed: VecDeque<Record>,
    time_offset: Option<Duration>,
}

impl RepeatingProvider {
    /// Creates an empty provider.
    pub fn new() -> Self {
        Self::default()
    }
}

impl DataProvider for RepeatingProvider {
    fn is_empty(&self) -> bool {
        self.records.is_empty() && self.processed.is_empty()
    }

    fn initialize_time_offset(&mut self) {
        if self.is_empty() {
            return;
        }
        if self.records.is_empty() {
            std::mem::swap(&mut self.records, &mut self.processed);
        }
        if let Some(first) = self.records.front() {
            self.time_offset = Some(make_time_offset(first.receive_time()));
        }
    }

    fn has_time_offset(&self) -> bool {
        self.time_offset.is_some()
    }

    fn pull_action(&mut self) -> Result<Action, HistoricalError> {
        if self.is_empty() {
            return Err(HistoricalError::ProviderExhausted);
        }

        if self.records.is_empty() {
            // Start the next repeat cycle from the current wall clock.
            self.initialize_time_offset();
        }
        if !self.has_time_offset() {
            self.initialize_time_offset();
        }

        let offset = self.time_offset.unwrap_or_else(Duration::zero);
        let processed = &mut self.processed;
        pull_group(&mut self.records, offset, |record| {
            processed.push_back(record.clone());
        })
    }

    fn add(&mut self, record: Record) {
        self.records.push_back(record);
    }
}

/// Builds the provider for a datasource (repeat flag selects the looping
/// variant) and fills it from the matching adapter.
pub fn create_provider(datasource: &Datasource) -> Result<Box<dyn DataProvider>, HistoricalError> {
    let mut adapter = create_adapter(datasource)?;

    let mut provider: Box<dyn DataProvider> = if datasource.repeat {
        Box::new(RepeatingProvider::new())
    } else {
        Box::new(FiniteProvider::new())
    };

    let records_read = prepare(provider.as_mut(), adapter.as_mut());
    info!(
        datasource = %datasource.name,
        datasource_id = datasource.datasource_id,
        connection = %datasource.connection,
        records_read,
        "created a historical data provider"
    );

    Ok(provider)
}
