//! Datasource access: the adapter contract and the format dispatch.

use tracing::warn;

use crate::model::{Datasource, DatasourceFormat};

use super::csv::CsvAdapter;
use super::database::PostgresAdapter;
use super::error::HistoricalError;
use super::record::{Record, RecordBuilder};

/// Token-stream access to one historical datasource.
///
/// Adapters load and tokenize their source eagerly at construction time;
/// `accept` then drains them record by record. Rows that fail to parse
/// are skipped with a warning, the stream continues.
pub trait DataAdapter {
    /// Whether another source row is available.
    fn has_next_record(&self) -> bool;

    /// Parses the next source row into the given builder.
    fn parse_next_record(&mut self, builder: &mut RecordBuilder) -> Result<(), HistoricalError>;

    /// Drains the adapter, feeding every successfully parsed record to
    /// the visitor.
    fn accept(&mut self, visitor: &mut dyn FnMut(Record)) {
        while self.has_next_record() {
            let mut builder = Record::builder();

            if let Err(err) = self.parse_next_record(&mut builder) {
                warn!(%err, "failed to parse historical datasource row");
                continue;
            }

            match builder.build() {
                Ok(record) => visitor(record),
                Err(err) => warn!(%err, "failed to assemble historical data record"),
            }
        }
    }
}

/// Creates the adapter matching a datasource's format.
pub fn create_adapter(datasource: &Datasource) -> Result<Box<dyn DataAdapter>, HistoricalError> {
    match datasource.format {
        DatasourceFormat::Csv => Ok(Box::new(CsvAdapter::new(datasource)?)),
        DatasourceFormat::Postgres => Ok(Box::new(PostgresAdapter::new(datasource)?)),
    }
}
