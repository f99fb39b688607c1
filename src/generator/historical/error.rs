//! Error types of the historical replay subsystem.

use std::fmt;
use std::path::PathBuf;

use crate::generator::message::RequestBuildError;
use crate::generator::registry::UpdaterError;
use crate::model::DatasourceError;

/// Failures raised while loading, grouping or applying historical data.
#[derive(Debug)]
#[non_exhaustive]
pub enum HistoricalError {
    /// A mandatory record attribute was absent or unparsable.
    MissingAttribute {
        /// Attribute name.
        attribute: &'static str,
        /// Source row the record came from, when known.
        row: Option<u64>,
    },

    /// An action was constructed without any record.
    EmptyAction,

    /// A record's receive time differed from the action's initial record.
    MixedActionTimes,

    /// An action was pulled from a provider with no data left.
    ProviderExhausted,

    /// An I/O error while reading a datasource.
    Io {
        /// Underlying error message.
        message: String,
        /// The file involved, if known.
        path: Option<PathBuf>,
    },

    /// A CSV-level parsing error.
    Csv {
        /// Underlying error message.
        message: String,
    },

    /// A database connection or query error.
    Database {
        /// Underlying error message.
        message: String,
    },

    /// A column mapping entry could not be resolved against the source.
    UnresolvedColumn {
        /// The unresolved source reference.
        reference: String,
    },

    /// The datasource configuration itself is invalid.
    InvalidDatasource(DatasourceError),

    /// A replayed request could not be assembled.
    Request(RequestBuildError),

    /// A replayed request was refused by the registry updater.
    Updater(UpdaterError),
}

impl fmt::Display for HistoricalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoricalError::MissingAttribute { attribute, row } => match row {
                Some(row) => {
                    write!(f, "missing mandatory {attribute} attribute (row: {row})")
                }
                None => write!(f, "missing mandatory {attribute} attribute"),
            },
            HistoricalError::EmptyAction => {
                f.write_str("can not construct an action without any record")
            }
            HistoricalError::MixedActionTimes => f.write_str(
                "a new record's receive time does not equal the initial record's receive time",
            ),
            HistoricalError::ProviderExhausted => f.write_str(
                "unable to pull action from data provider: the provider has no data to provide",
            ),
            HistoricalError::Io { message, path } => match path {
                Some(path) => write!(f, "datasource I/O error on {}: {message}", path.display()),
                None => write!(f, "datasource I/O error: {message}"),
            },
            HistoricalError::Csv { message } => write!(f, "CSV parsing error: {message}"),
            HistoricalError::Database { message } => write!(f, "database error: {message}"),
            HistoricalError::UnresolvedColumn { reference } => {
                write!(f, "column reference `{reference}' can not be resolved")
            }
            HistoricalError::InvalidDatasource(err) => write!(f, "invalid datasource: {err}"),
            HistoricalError::Request(err) => write!(f, "{err}"),
            HistoricalError::Updater(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for HistoricalError {}

impl From<DatasourceError> for HistoricalError {
    fn from(err: DatasourceError) -> Self {
        HistoricalError::InvalidDatasource(err)
    }
}

impl From<RequestBuildError> for HistoricalError {
    fn from(err: RequestBuildError) -> Self {
        HistoricalError::Request(err)
    }
}

impl From<UpdaterError> for HistoricalError {
    fn from(err: UpdaterError) -> Self {
        HistoricalError::Updater(err)
    }
}
