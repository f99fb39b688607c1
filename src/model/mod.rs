//! Catalog value objects consumed by the generation core.
//!
//! The surrounding data layer owns the venue/listing/price-seed/datasource
//! catalog; the core only sees immutable snapshots of these objects, pulled
//! through the [`Catalog`] trait at engine construction time.

mod catalog;
mod datasource;
mod listing;
mod price_seed;
mod venue;

pub use catalog::{Catalog, MemoryCatalog};
pub use datasource::{
    ColumnDepth, ColumnFrom, ColumnKind, ColumnMapping, Datasource, DatasourceError,
    DatasourceFormat,
};
pub use listing::Listing;
pub use price_seed::PriceSeed;
pub use venue::Venue;
