//! Uniform PRNG wrapper used by all random value sources.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Uniform random value source over integer and floating ranges
/// (inclusive on both ends).
///
/// One instance belongs to exactly one generation component; sources are
/// never shared between threads.
pub trait ValueGenerator: Send {
    /// Uniform signed integer in `[min, max]`.
    fn uniform_int(&mut self, min: i64, max: i64) -> i64;

    /// Uniform unsigned integer in `[min, max]`.
    fn uniform_uint(&mut self, min: u64, max: u64) -> u64;

    /// Uniform float in `[min, max]`.
    fn uniform_f64(&mut self, min: f64, max: f64) -> f64;
}

/// [`ValueGenerator`] backed by a seedable standard RNG.
#[derive(Debug)]
pub struct RngValueGenerator {
    engine: StdRng,
}

impl RngValueGenerator {
    /// Creates a generator seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            engine: StdRng::from_entropy(),
        }
    }

    /// Creates a deterministic generator for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            engine: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RngValueGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueGenerator for RngValueGenerator {
    fn uniform_int(&mut self, min: i64, max: i64) -> i64 {
        debug_assert!(min <= max);
        self.engine.gen_range(min..=max)
    }

    fn uniform_uint(&mut self, min: u64, max: u64) -> u64 {
        debug_assert!(min <= max);
        self.engine.gen_range(min..=max)
    }

    fn uniform_f64(&mut self, min: f64, max: f64) -> f64 {
        debug_assert!(min <= max);
        self.engine.gen_range(min..=max)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::ValueGenerator;

    /// Scripted value source replaying a fixed sequence of draws.
    #[derive(Debug)]
    pub struct SequenceValueGenerator {
        values: Vec<i64>,
        next: usize,
    }

    impl SequenceValueGenerator {
        pub fn new(values: Vec<i64>) -> Self {
            Self { values, next: 0 }
        }

        fn next_value(&mut self) -> i64 {
            let value = self.values[self.next % self.values.len()];
            self.next += 1;
            value
        }
    }

    impl ValueGenerator for SequenceValueGenerator {
        fn uniform_int(&mut self, min: i64, max: i64) -> i64 {
            self.next_value().clamp(min, max)
        }

        fn uniform_uint(&mut self, min: u64, max: u64) -> u64 {
            (self.next_value().max(0) as u64).clamp(min, max)
        }

        fn uniform_f64(&mut self, min: f64, max: f64) -> f64 {
            (self.next_value() as f64).clamp(min, max)
        }
    }
}
