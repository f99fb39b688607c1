//! CSV datasource adapter.

use std::path::PathBuf;

use csv::StringRecord;
use tracing::debug;

use crate::model::Datasource;

use super::adapter::DataAdapter;
use super::error::HistoricalError;
use super::mapping::MappingParams;
use super::parsing::parse_record;
use super::record::RecordBuilder;
use super::row::Row;

/// [`DataAdapter`] over one delimiter-separated file.
///
/// The whole file is tokenized at construction. Row numbers are global,
/// 1-based line positions in the file; rows up to and including the
/// header row (when one is configured) and rows before the configured
/// first data row are trimmed.
pub struct CsvAdapter {
    source_name: String,
    connection: String,
    mapping: MappingParams,
    depth_to_parse: u32,
    rows: Vec<(u64, StringRecord)>,
    next_row: usize,
}

impl CsvAdapter {
    /// Opens and tokenizes the file described by a CSV datasource.
    pub fn new(datasource: &Datasource) -> Result<Self, HistoricalError> {
        datasource.validate()?;
        let mut mapping = MappingParams::from_datasource(datasource)?;

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(datasource.delimiter as u8)
            .has_headers(false)
            .flexible(true)
            .from_path(&datasource.connection)
            .map_err(|err| HistoricalError::Io {
                message: err.to_string(),
                path: Some(PathBuf::from(&datasource.connection)),
            })?;

        let header_row = datasource
            .text_header_row
            .filter(|_| datasource.has_header_row());
        let first_data_row = datasource.first_data_row();

        let mut header_names: Option<Vec<String>> = None;
        let mut rows = Vec::new();
        let mut line = 0u64;

        for record in reader.records() {
            let record = record.map_err(|err| HistoricalError::Csv {
                message: err.to_string(),
            })?;
            line += 1;

            if header_row == Some(line) {
                header_names = Some(record.iter().map(str::to_owned).collect());
                continue;
            }
            if line >= first_data_row {
                rows.push((line, record));
            }
        }

        let columns_number = match (&header_names, rows.first()) {
            (Some(names), _) => names.len() as u32,
            (None, Some((_, first))) => first.len() as u32,
            (None, None) => 0,
        };
        debug!(
            datasource = %datasource.name,
            columns_number,
            rows = rows.len(),
            "tokenized CSV datasource"
        );

        let depth_config = mapping.depth_config(columns_number, datasource.depth_ceiling());
        mapping.resolve(header_names.as_deref(), depth_config)?;

        Ok(Self {
            source_name: datasource.name.clone(),
            connection: datasource.connection.clone(),
            mapping,
            depth_to_parse: depth_config.depth_to_parse,
            rows,
            next_row: 0,
        })
    }
}

impl DataAdapter for CsvAdapter {
    fn has_next_record(&self) -> bool {
        self.next_row < self.rows.len()
    }

    fn parse_next_record(&mut self, builder: &mut RecordBuilder) -> Result<(), HistoricalError> {
        let (row_number, record) = &self.rows[self.next_row];
        self.next_row += 1;

        builder
            .source_row(*row_number)
            .source_name(&self.source_name)
            .source_connection(&self.connection);

        let row: Row<'_> = record.iter().collect();
        parse_record(&row, &self.mapping, self.depth_to_parse, builder);
        Ok(())
    }
}
