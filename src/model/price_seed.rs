//! Price seed catalog entry.

/// Configured seed prices for one symbol.
///
/// The random price generator falls back to these values whenever the live
/// book offers no usable base price. An instrument without a price seed row
/// is not eligible for random generation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeed {
    /// Symbol this seed row belongs to (matched by equality with the
    /// listing symbol).
    pub symbol: String,

    /// Seed price for buy orders.
    pub bid_price: Option<f64>,

    /// Seed mid price, used when a side-specific seed is absent.
    pub mid_price: Option<f64>,

    /// Seed price for sell orders.
    pub offer_price: Option<f64>,
}

impl PriceSeed {
    /// Creates a seed row for `symbol` with no prices configured.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Self::default()
        }
    }

    /// Seed price for the buy side, falling back to the mid price.
    pub fn bid_or_mid(&self) -> Option<f64> {
        self.bid_price.or(self.mid_price)
    }

    /// Seed price for the sell side, falling back to the mid price.
    pub fn offer_or_mid(&self) -> Option<f64> {
        self.offer_price.or(self.mid_price)
    }
}
