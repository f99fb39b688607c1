//! Historical depth snapshot data: levels, records and co-timed actions.

use std::fmt;

use chrono::{Duration, NaiveDateTime, Utc};

use super::error::HistoricalError;

/// Timestamp type of historical data (timezone-free wall time).
pub type Timestamp = NaiveDateTime;

/// Current wall-clock time in the historical timestamp domain.
pub fn wall_clock_now() -> Timestamp {
    Utc::now().naive_utc()
}

/// Offset that rebases `first_record_time` onto the current wall clock.
pub fn make_time_offset(first_record_time: Timestamp) -> Duration {
    wall_clock_now() - first_record_time
}

/// One side-by-side depth level of a snapshot record.
///
/// Either side may be partially absent; a level with a price but no
/// quantity (or vice versa) on a side is malformed and skipped by the
/// applier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Level {
    bid_price: Option<f64>,
    bid_quantity: Option<f64>,
    bid_counterparty: Option<String>,
    offer_price: Option<f64>,
    offer_quantity: Option<f64>,
    offer_counterparty: Option<String>,
}

impl Level {
    /// Starts building a level.
    pub fn builder() -> LevelBuilder {
        LevelBuilder::default()
    }

    /// Bid price, if recorded.
    pub fn bid_price(&self) -> Option<f64> {
        self.bid_price
    }

    /// Bid quantity, if recorded.
    pub fn bid_quantity(&self) -> Option<f64> {
        self.bid_quantity
    }

    /// Bid counterparty, if recorded.
    pub fn bid_counterparty(&self) -> Option<&str> {
        self.bid_counterparty.as_deref()
    }

    /// Offer price, if recorded.
    pub fn offer_price(&self) -> Option<f64> {
        self.offer_price
    }

    /// Offer quantity, if recorded.
    pub fn offer_quantity(&self) -> Option<f64> {
        self.offer_quantity
    }

    /// Offer counterparty, if recorded.
    pub fn offer_counterparty(&self) -> Option<&str> {
        self.offer_counterparty.as_deref()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ Bid={{ Price={:?} Qty={:?} Counterparty={:?} }} \
             Offer={{ Price={:?} Qty={:?} Counterparty={:?} }} }}",
            self.bid_price,
            self.bid_quantity,
            self.bid_counterparty,
            self.offer_price,
            self.offer_quantity,
            self.offer_counterparty
        )
    }
}

/// Builder for [`Level`].
#[derive(Debug, Default)]
pub struct LevelBuilder {
    level: Level,
}

impl LevelBuilder {
    /// Sets the bid price.
    pub fn bid_price(&mut self, price: f64) -> &mut Self {
        self.level.bid_price = Some(price);
        self
    }

    /// Sets the bid quantity.
    pub fn bid_quantity(&mut self, quantity: f64) -> &mut Self {
        self.level.bid_quantity = Some(quantity);
        self
    }

    /// Sets the bid counterparty.
    pub fn bid_counterparty(&mut self, counterparty: impl Into<String>) -> &mut Self {
        self.level.bid_counterparty = Some(counterparty.into());
        self
    }

    /// Sets the offer price.
    pub fn offer_price(&mut self, price: f64) -> &mut Self {
        self.level.offer_price = Some(price);
        self
    }

    /// Sets the offer quantity.
    pub fn offer_quantity(&mut self, quantity: f64) -> &mut Self {
        self.level.offer_quantity = Some(quantity);
        self
    }

    /// Sets the offer counterparty.
    pub fn offer_counterparty(&mut self, counterparty: impl Into<String>) -> &mut Self {
        self.level.offer_counterparty = Some(counterparty.into());
        self
    }

    /// Whether no attribute has been set.
    pub fn is_empty(&self) -> bool {
        self.level == Level::default()
    }

    /// Finishes the level.
    pub fn build(self) -> Level {
        self.level
    }
}

/// One snapshot line of a datasource: the book of one instrument at one
/// recorded point in time, ordered by depth (index 0 is top of book).
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    instrument: String,
    receive_time: Timestamp,
    message_time: Option<Timestamp>,
    source_name: Option<String>,
    source_connection: Option<String>,
    source_row: u64,
    levels: Vec<Level>,
}

impl Record {
    /// Starts building a record.
    pub fn builder() -> RecordBuilder {
        RecordBuilder::default()
    }

    /// Instrument symbol.
    pub fn instrument(&self) -> &str {
        &self.instrument
    }

    /// Recorded receive time (rebased onto the simulator clock once the
    /// record enters an action).
    pub fn receive_time(&self) -> Timestamp {
        self.receive_time
    }

    /// Recorded message time, if present.
    pub fn message_time(&self) -> Option<Timestamp> {
        self.message_time
    }

    /// Name of the datasource the record came from.
    pub fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }

    /// Connection string of the datasource.
    pub fn source_connection(&self) -> Option<&str> {
        self.source_connection.as_deref()
    }

    /// 1-based source row number.
    pub fn source_row(&self) -> u64 {
        self.source_row
    }

    /// Whether the record carries any depth level.
    pub fn has_levels(&self) -> bool {
        !self.levels.is_empty()
    }

    /// Depth levels, top of book first.
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Consumes the record's levels, top of book first.
    pub fn take_levels(&mut self) -> Vec<Level> {
        std::mem::take(&mut self.levels)
    }

    fn shift_times(&mut self, offset: Duration) {
        self.receive_time = self.receive_time + offset;
        self.message_time = self.message_time.map(|message_time| message_time + offset);
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Record={{ Instrument={} ReceiveTime={} MessageTime={:?} RowNumber={} \
             SourceName={:?} SourceConnection={:?}",
            self.instrument,
            self.receive_time,
            self.message_time,
            self.source_row,
            self.source_name,
            self.source_connection
        )?;

        if self.has_levels() {
            f.write_str(" Levels=[")?;
            for (index, level) in self.levels.iter().enumerate() {
                if index > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "Level={{ Index={index} Data={level} }}")?;
            }
            f.write_str(" ]")?;
        }
        f.write_str(" }")
    }
}

/// Builder for [`Record`]; validates the mandatory attributes.
#[derive(Debug, Default)]
pub struct RecordBuilder {
    instrument: Option<String>,
    receive_time: Option<Timestamp>,
    message_time: Option<Timestamp>,
    source_name: Option<String>,
    source_connection: Option<String>,
    source_row: Option<u64>,
    levels: Vec<Level>,
}

impl RecordBuilder {
    /// Sets the instrument symbol.
    pub fn instrument(&mut self, instrument: impl Into<String>) -> &mut Self {
        self.instrument = Some(instrument.into());
        self
    }

    /// Sets the receive time.
    pub fn receive_time(&mut self, receive_time: Timestamp) -> &mut Self {
        self.receive_time = Some(receive_time);
        self
    }

    /// Sets the message time.
    pub fn message_time(&mut self, message_time: Timestamp) -> &mut Self {
        self.message_time = Some(message_time);
        self
    }

    /// Sets the datasource name.
    pub fn source_name(&mut self, source_name: impl Into<String>) -> &mut Self {
        self.source_name = Some(source_name.into());
        self
    }

    /// Sets the datasource connection.
    pub fn source_connection(&mut self, source_connection: impl Into<String>) -> &mut Self {
        self.source_connection = Some(source_connection.into());
        self
    }

    /// Sets the 1-based source row number.
    pub fn source_row(&mut self, source_row: u64) -> &mut Self {
        self.source_row = Some(source_row);
        self
    }

    /// Places a level at a depth index (0 = top of book), growing the
    /// ladder with empty levels as needed.
    pub fn add_level(&mut self, index: usize, level: Level) -> &mut Self {
        if index >= self.levels.len() {
            self.levels.resize(index + 1, Level::default());
        }
        self.levels[index] = level;
        self
    }

    /// Validates the mandatory attributes and constructs the record.
    pub fn build(self) -> Result<Record, HistoricalError> {
        let source_row = self.source_row.ok_or(HistoricalError::MissingAttribute {
            attribute: "source row number",
            row: None,
        })?;
        let receive_time = self
            .receive_time
            .ok_or(HistoricalError::MissingAttribute {
                attribute: "received time",
                row: Some(source_row),
            })?;
        let instrument = self.instrument.ok_or(HistoricalError::MissingAttribute {
            attribute: "instrument",
            row: Some(source_row),
        })?;

        Ok(Record {
            instrument,
            receive_time,
            message_time: self.message_time,
            source_name: self.source_name,
            source_connection: self.source_connection,
            source_row,
            levels: self.levels,
        })
    }
}

/// A non-empty set of records sharing one receive time, scheduled to fire
/// together at `action_time` on the simulator clock.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    records: Vec<Record>,
    action_time: Timestamp,
}

impl Action {
    /// Starts building an action.
    pub fn builder() -> ActionBuilder {
        ActionBuilder::default()
    }

    /// Scheduled firing time.
    pub fn action_time(&self) -> Timestamp {
        self.action_time
    }

    /// The grouped records.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Consumes the action's records.
    pub fn take_records(self) -> Vec<Record> {
        self.records
    }

    /// Rebases the action to a new firing time, shifting every contained
    /// record's timestamps by the same delta.
    pub fn update_time(mut self, action_time: Timestamp) -> Action {
        let offset = action_time - self.action_time;
        self.action_time = action_time;
        for record in &mut self.records {
            record.shift_times(offset);
        }
        self
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Action={{ ActionTime={} Records=[", self.action_time)?;
        for (index, record) in self.records.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{record}")?;
        }
        f.write_str(" ] }")
    }
}

/// Builder grouping co-timed records into an [`Action`].
#[derive(Debug, Default)]
pub struct ActionBuilder {
    records: Vec<Record>,
}

impl ActionBuilder {
    /// Adds a record, shifting its timestamps by the provider's time
    /// offset. All records of one action must share one receive time.
    pub fn add(&mut self, mut record: Record, time_offset: Duration) -> Result<(), HistoricalError> {
        record.shift_times(time_offset);

        if let Some(first) = self.records.first() {
            if first.receive_time() != record.receive_time() {
                return Err(HistoricalError::MixedActionTimes);
            }
        }

        self.records.push(record);
        Ok(())
    }

    /// Whether no record has been added yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Finishes the action; fails when no record was added.
    pub fn build(self) -> Result<Action, HistoricalError> {
        let action_time = self
            .records
            .first()
            .map(Record::receive_time)
            .ok_or(HistoricalError::EmptyAction)?;

        Ok(Action {
            records: self.records,
            action_time,
        })
    }
}
