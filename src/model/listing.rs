//! Listing (instrument) catalog entry with per-instrument generation knobs.

use tracing::warn;

/// One listed instrument of a simulated venue.
///
/// All attributes except `listing_id` and `venue_id` are optional; the
/// generation components substitute documented defaults for missing tuning
/// knobs. A listing with no symbol is never handed to a generator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Listing {
    /// Internal listing identifier, unique within the catalog.
    pub listing_id: u64,

    /// Venue this listing belongs to.
    pub venue_id: String,

    /// Instrument symbol. Mandatory for generation eligibility.
    pub symbol: Option<String>,

    /// Security type name (`CS`, `FXSPOT`, ...), as stored in the catalog.
    pub security_type: Option<String>,

    /// Quote currency for equity-like security types.
    pub price_currency: Option<String>,

    /// Base currency for FX security types.
    pub fx_base_currency: Option<String>,

    /// MIC of the listing exchange.
    pub security_exchange: Option<String>,

    /// Security identifiers, in descending priority for descriptor
    /// conversion: exchange symbol, ISIN, CUSIP, SEDOL, RIC, Bloomberg.
    pub exchange_symbol_id: Option<String>,
    /// ISIN identifier.
    pub isin_id: Option<String>,
    /// CUSIP identifier.
    pub cusip_id: Option<String>,
    /// SEDOL identifier.
    pub sedol_id: Option<String>,
    /// RIC identifier.
    pub ric_id: Option<String>,
    /// Bloomberg symbol identifier.
    pub bloomberg_symbol_id: Option<String>,

    /// Configured instrument party identifier.
    pub party_id: Option<String>,
    /// Configured instrument party role name.
    pub party_role: Option<String>,

    /// Ceiling on generated depth levels per side.
    pub random_depth_levels: Option<u32>,
    /// Price tick range for random price generation.
    pub random_tick_range: Option<u32>,
    /// Minimal price increment.
    pub price_tick_size: Option<f64>,
    /// Spread applied to resting order base prices.
    pub random_orders_spread: Option<f64>,

    /// Quantity must be a multiple of this value.
    pub qty_multiple: Option<f64>,
    /// Instrument-level quantity floor.
    pub qty_minimum: Option<f64>,
    /// Instrument-level quantity ceiling.
    pub qty_maximum: Option<f64>,

    /// Random resting quantity floor.
    pub random_qty_minimum: Option<f64>,
    /// Random resting quantity ceiling.
    pub random_qty_maximum: Option<f64>,
    /// Random resting amount (price * qty) floor.
    pub random_amt_minimum: Option<f64>,
    /// Random resting amount (price * qty) ceiling.
    pub random_amt_maximum: Option<f64>,

    /// Random aggressive quantity floor.
    pub random_aggressive_qty_minimum: Option<f64>,
    /// Random aggressive quantity ceiling.
    pub random_aggressive_qty_maximum: Option<f64>,
    /// Random aggressive amount floor.
    pub random_aggressive_amt_minimum: Option<f64>,
    /// Random aggressive amount ceiling.
    pub random_aggressive_amt_maximum: Option<f64>,

    /// Target random order messages per second.
    pub random_orders_rate: Option<f64>,
}

impl Listing {
    /// Creates a listing with the mandatory identifiers set and every
    /// optional attribute absent.
    pub fn new(listing_id: u64, venue_id: impl Into<String>) -> Self {
        Self {
            listing_id,
            venue_id: venue_id.into(),
            ..Self::default()
        }
    }

    /// A listing can feed a generator only when it carries a symbol.
    pub fn symbol_str(&self) -> Option<&str> {
        self.symbol.as_deref().filter(|symbol| !symbol.is_empty())
    }

    /// Checks whether this listing may be handed to the generation core.
    ///
    /// Returns `false` (after logging a warning) for listings with no
    /// symbol or with an inverted quantity range; such listings are skipped
    /// at engine initialization.
    pub fn is_generator_eligible(&self) -> bool {
        if self.symbol_str().is_none() {
            warn!(
                listing_id = self.listing_id,
                "listing skipped: no symbol configured"
            );
            return false;
        }

        if let (Some(min), Some(max)) = (self.qty_minimum, self.qty_maximum) {
            if min > max {
                warn!(
                    listing_id = self.listing_id,
                    qty_minimum = min,
                    qty_maximum = max,
                    "listing skipped: quantity minimum exceeds maximum"
                );
                return false;
            }
        }

        true
    }
}
