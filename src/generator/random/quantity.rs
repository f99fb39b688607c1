//! Random order quantity generation.

use std::fmt;

use serde::Serialize;

use crate::generator::constants::DEFAULT_LISTING_QTY_MULTIPLE;
use crate::generator::numeric::approx_zero;

use super::value_generator::ValueGenerator;

/// Validated parameters of one quantity generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuantityGenerationParams {
    multiplier: f64,
    minimum: f64,
    maximum: f64,
}

/// Parameter validation failure; the affected tick emits nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub enum QuantityParamsError {
    /// The quantity floor was negative.
    NegativeMinimum {
        /// Offending floor.
        minimum: f64,
    },
    /// The floor exceeded the ceiling.
    InvertedRange {
        /// Offending floor.
        minimum: f64,
        /// Offending ceiling.
        maximum: f64,
    },
}

impl fmt::Display for QuantityParamsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuantityParamsError::NegativeMinimum { minimum } => {
                write!(f, "minimal order quantity {minimum} is negative")
            }
            QuantityParamsError::InvertedRange { minimum, maximum } => write!(
                f,
                "minimal order quantity {minimum} exceeds maximal order quantity {maximum}"
            ),
        }
    }
}

impl std::error::Error for QuantityParamsError {}

impl QuantityGenerationParams {
    /// Validates and constructs the parameter set.
    pub fn new(multiplier: f64, minimum: f64, maximum: f64) -> Result<Self, QuantityParamsError> {
        if minimum < 0.0 {
            return Err(QuantityParamsError::NegativeMinimum { minimum });
        }
        if minimum > maximum {
            return Err(QuantityParamsError::InvertedRange { minimum, maximum });
        }
        Ok(Self {
            multiplier,
            minimum,
            maximum,
        })
    }

    /// Quantity multiple.
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Quantity floor.
    pub fn minimum(&self) -> f64 {
        self.minimum
    }

    /// Quantity ceiling.
    pub fn maximum(&self) -> f64 {
        self.maximum
    }
}

/// Source of generated order quantities.
pub trait QuantitySource: Send {
    /// Generates a quantity, also reporting the raw sampled integer.
    fn next_quantity(&mut self, params: &QuantityGenerationParams) -> (f64, i64);
}

/// Default [`QuantitySource`]: a uniform multiple of the configured lot
/// inside `[minimum, maximum]`.
pub struct RandomQuantitySource<G> {
    values: G,
}

impl<G: ValueGenerator> RandomQuantitySource<G> {
    /// Wraps a value generator.
    pub fn new(values: G) -> Self {
        Self { values }
    }
}

impl<G: ValueGenerator> QuantitySource for RandomQuantitySource<G> {
    fn next_quantity(&mut self, params: &QuantityGenerationParams) -> (f64, i64) {
        let mut multiplier = params.multiplier();
        if approx_zero(multiplier) {
            multiplier = DEFAULT_LISTING_QTY_MULTIPLE;
        }

        let min_lots = params.minimum() / multiplier;
        let max_lots = params.maximum() / multiplier;
        let random_max = (max_lots - min_lots) as i64;

        let random_number = self.values.uniform_int(0, random_max.max(0));
        let quantity = (random_number as f64 + min_lots) * multiplier;

        if approx_zero(quantity) {
            // Both the draw and the floor are zero here; the multiplier is
            // non-zero by construction and becomes the fallback quantity.
            (multiplier, random_number)
        } else {
            (quantity, random_number)
        }
    }
}
