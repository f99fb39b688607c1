//! PostgreSQL datasource adapter.

use postgres::{Client, NoTls, SimpleQueryMessage};
use tracing::debug;

use crate::model::Datasource;

use super::adapter::DataAdapter;
use super::error::HistoricalError;
use super::mapping::MappingParams;
use super::parsing::parse_record;
use super::record::RecordBuilder;
use super::row::Row;

/// [`DataAdapter`] over one database table.
///
/// Issues a single `SELECT * FROM <table>;` over the text protocol and
/// processes the rows in result order; the depth ladder is inferred from
/// the result's column count.
pub struct PostgresAdapter {
    source_name: String,
    connection: String,
    mapping: MappingParams,
    depth_to_parse: u32,
    rows: Vec<(u64, Vec<String>)>,
    next_row: usize,
}

impl PostgresAdapter {
    /// Connects and loads the table described by a database datasource.
    pub fn new(datasource: &Datasource) -> Result<Self, HistoricalError> {
        datasource.validate()?;
        let mut mapping = MappingParams::from_datasource(datasource)?;

        let table_name =
            datasource
                .table_name
                .as_deref()
                .ok_or_else(|| HistoricalError::Database {
                    message: "no table name configured for a database datasource".to_owned(),
                })?;

        let mut client =
            Client::connect(&datasource.connection, NoTls).map_err(|err| {
                HistoricalError::Database {
                    message: err.to_string(),
                }
            })?;

        let messages = client
            .simple_query(&format!("SELECT * FROM {table_name};"))
            .map_err(|err| HistoricalError::Database {
                message: err.to_string(),
            })?;

        let mut column_names: Vec<String> = Vec::new();
        let mut rows = Vec::new();
        let mut row_number = 1u64;

        for message in messages {
            match message {
                SimpleQueryMessage::RowDescription(columns) => {
                    column_names = columns.iter().map(|col| col.name().to_owned()).collect();
                }
                SimpleQueryMessage::Row(row) => {
                    if column_names.is_empty() {
                        column_names = row
                            .columns()
                            .iter()
                            .map(|col| col.name().to_owned())
                            .collect();
                    }
                    let cells = (0..row.len())
                        .map(|index| row.get(index).unwrap_or_default().to_owned())
                        .collect();
                    rows.push((row_number, cells));
                    row_number += 1;
                }
                _ => {}
            }
        }

        let columns_number = column_names.len() as u32;
        debug!(
            datasource = %datasource.name,
            table = table_name,
            columns_number,
            rows = rows.len(),
            "loaded database datasource"
        );

        let depth_config = mapping.depth_config(columns_number, datasource.depth_ceiling());
        mapping.resolve(Some(&column_names), depth_config)?;

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

impl DataAdapter for PostgresAdapter {
    fn has_next_record(&self) -> bool {
        self.next_row < self.rows.len()
    }

    fn parse_next_record(&mut self, builder: &mut RecordBuilder) -> Result<(), HistoricalError> {
        let (row_number, cells) = &self.rows[self.next_row];
        self.next_row += 1;

        builder
            .source_row(*row_number)
            .source_name(&self.source_name)
            .source_connection(&self.connection);

        let row = Row::new(cells.iter().map(String::as_str).collect());
        parse_record(&row, &self.mapping, self.depth_to_parse, builder);
        Ok(())
    }
}
