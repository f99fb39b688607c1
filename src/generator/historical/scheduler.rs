//! Wall-clock paced pump of historical actions.

use std::collections::VecDeque;
use std::time::Duration;

use tracing::{debug, warn};

use super::provider::DataProvider;
use super::record::{Action, wall_clock_now};

/// Pending-action scheduler over one data provider.
///
/// On every tick the scheduler refills its pending queue from the
/// provider, dispatches the head action, and refills again so that
/// [`next_action_timeout`](Self::next_action_timeout) can see the next
/// head. Pull failures are logged and absorbed.
pub struct ActionsScheduler {
    pending: VecDeque<Action>,
    provider: Option<Box<dyn DataProvider>>,
}

impl ActionsScheduler {
    /// Creates a scheduler; `None` yields an immediately-finished one.
    pub fn new(provider: Option<Box<dyn DataProvider>>) -> Self {
        Self {
            pending: VecDeque::new(),
            provider,
        }
    }

    /// True when no pending action remains and the provider is exhausted.
    pub fn finished(&self) -> bool {
        !self.has_pending_actions() && !self.can_pull_action()
    }

    /// Re-establishes the replay clock: the provider's time offset is
    /// reset against the current wall clock and previously cached actions
    /// are rebased onto it.
    pub fn initialize(&mut self) {
        if let Some(provider) = self.provider.as_mut() {
            debug!("scheduler re-establishes the provider time offset");
            provider.initialize_time_offset();
        }

        if self.has_pending_actions() {
            let new_base = wall_clock_now();
            debug!(%new_base, "scheduler rebases previously cached actions");
            for action in std::mem::take(&mut self.pending) {
                self.pending.push_back(action.update_time(new_base));
            }
        }
    }

    /// Dispatches the next pending action, if any, to the processor.
    pub fn process_next_action(&mut self, processor: &mut dyn FnMut(Action)) {
        if self.finished() {
            return;
        }

        self.pull();

        if let Some(action) = self.pending.pop_front() {
            processor(action);
        }

        self.pull();
    }

    /// Time until the head action is due; zero when nothing is pending.
    pub fn next_action_timeout(&self) -> Duration {
        let Some(head) = self.pending.front() else {
            return Duration::ZERO;
        };

        let now = wall_clock_now();
        let action_time = head.action_time();
        if now < action_time {
            (action_time - now).to_std().unwrap_or(Duration::ZERO)
        } else {
            Duration::ZERO
        }
    }

    fn has_pending_actions(&self) -> bool {
        !self.pending.is_empty()
    }

    fn can_pull_action(&self) -> bool {
        self.provider
            .as_ref()
            .is_some_and(|provider| !provider.is_empty())
    }

    fn pull(&mut self) {
        while !self.has_pending_actions() && self.can_pull_action() {
            let Some(provider) = self.provider.as_mut() else {
                return;
            };

            match provider.pull_action() {
                Ok(action) => self.pending.push_back(action),
                Err(err) => {
                    warn!(%err, "an error occurred while fetching a record group from a data provider");
                    return;
                }
            }
        }
    }
}
