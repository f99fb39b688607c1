//! Venue catalog entry.

/// A configured simulated trading venue.
///
/// One engine instance serves exactly one venue; the venue value is shared
/// read-only across all generation threads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Venue {
    /// Venue identifier, unique within the catalog.
    pub venue_id: String,

    /// Number of distinct random counterparties (`CP1`..`CPn`). When
    /// absent, the generation default applies.
    pub random_parties_count: Option<u32>,

    /// Whether generation starts in the `Active` state immediately on
    /// engine construction.
    pub orders_on_startup: bool,
}

impl Venue {
    /// Creates a venue with the given identifier and default knobs.
    pub fn new(venue_id: impl Into<String>) -> Self {
        Self {
            venue_id: venue_id.into(),
            ..Self::default()
        }
    }
}
