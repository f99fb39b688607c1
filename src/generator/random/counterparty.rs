//! Random counterparty selection.

use crate::generator::constants;

use super::value_generator::ValueGenerator;

/// Source of counterparty identifiers.
pub trait CounterpartySource: Send {
    /// Draws the next counterparty id (`CP1`..`CPn`), also reporting the
    /// sampled party number.
    fn next_counterparty(&mut self) -> (String, u32);
}

/// [`CounterpartySource`] drawing uniformly from the venue's configured
/// party pool.
pub struct RandomCounterpartySource<G> {
    values: G,
    parties_count: u32,
}

impl<G: ValueGenerator> RandomCounterpartySource<G> {
    /// Creates a source over `parties_count` counterparties. A zero count
    /// collapses to one party.
    pub fn new(parties_count: u32, values: G) -> Self {
        Self {
            values,
            parties_count: parties_count.max(1),
        }
    }
}

impl<G: ValueGenerator> CounterpartySource for RandomCounterpartySource<G> {
    fn next_counterparty(&mut self) -> (String, u32) {
        let number = self.values.uniform_uint(1, u64::from(self.parties_count)) as u32;
        (
            format!("{}{}", constants::COUNTERPARTY_ID_PREFIX, number),
            number,
        )
    }
}
