//! Historical replay: time-warped re-application of recorded depth
//! snapshots onto the live matching engine.

mod adapter;
mod applier;
mod csv;
mod database;
mod error;
mod mapping;
mod parsing;
mod processor;
mod provider;
mod record;
mod replier;
mod row;
mod scheduler;

pub use adapter::{DataAdapter, create_adapter};
pub use applier::{RecordApplier, has_bid_part, has_offer_part, is_level_processable};
pub use csv::CsvAdapter;
pub use database::PostgresAdapter;
pub use error::HistoricalError;
pub use mapping::{DepthConfig, MappingParams};
pub use parsing::{parse_f64, parse_record, parse_timestamp};
pub use processor::ActionProcessor;
pub use provider::{DataProvider, FiniteProvider, RepeatingProvider, create_provider, prepare};
pub use record::{
    Action, ActionBuilder, Level, LevelBuilder, Record, RecordBuilder, Timestamp, make_time_offset,
    wall_clock_now,
};
pub use replier::HistoricalReplier;
pub use row::Row;
pub use scheduler::ActionsScheduler;
