// Linear capped backoff
//
// Kept as pure functions over a small state struct so the schedule can be
// unit-tested without timers. The poller loop owns one PollerState and
// feeds it the outcome of each settled cycle.

use crate::config::PollerConfig;
use std::time::Duration;

/// How a poll cycle settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The request resolved, with or without updates
    Success,

    /// Network error, timeout, bad status, or undecodable body
    Failure,
}

/// Delay before the next poll given the number of consecutive failures.
///
/// `base + retry_count * step`, capped at `max`.
pub fn next_delay(retry_count: u32, config: &PollerConfig) -> Duration {
    let delay_ms = config
        .base_interval_ms
        .saturating_add(u64::from(retry_count).saturating_mul(config.backoff_step_ms))
        .min(config.max_interval_ms);
    Duration::from_millis(delay_ms)
}

/// Retry counter and connectivity flag for one poller instance.
#[derive(Debug, Clone)]
pub struct PollerState {
    retry_count: u32,
    is_offline: bool,
}

impl PollerState {
    pub fn new(initial_offline: bool) -> Self {
        Self {
            retry_count: 0,
            is_offline: initial_offline,
        }
    }

    /// Delay to sleep before the next poll attempt.
    pub fn next_delay(&self, config: &PollerConfig) -> Duration {
        next_delay(self.retry_count, config)
    }

    /// Fold a settled cycle into the state.
    ///
    /// Success resets the counter to zero (full reset, not a decrement) and
    /// clears the offline flag; failure increments and sets it. Returns
    /// `true` when the offline flag changed value, which is the only case
    /// where the store should be told.
    pub fn record(&mut self, outcome: PollOutcome) -> bool {
        let offline = match outcome {
            PollOutcome::Success => {
                self.retry_count = 0;
                false
            }
            PollOutcome::Failure => {
                self.retry_count = self.retry_count.saturating_add(1);
                true
            }
        };
        let changed = offline != self.is_offline;
        self.is_offline = offline;
        changed
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    pub fn is_offline(&self) -> bool {
        self.is_offline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_grows_linearly() {
        let config = PollerConfig::default();
        assert_eq!(next_delay(0, &config), Duration::from_millis(500));
        assert_eq!(next_delay(1, &config), Duration::from_millis(550));
        assert_eq!(next_delay(2, &config), Duration::from_millis(600));
        assert_eq!(next_delay(10, &config), Duration::from_millis(1_000));
    }

    #[test]
    fn test_delay_is_capped() {
        let config = PollerConfig::default();
        // 500 + 90 * 50 = 5000, exactly at the cap
        assert_eq!(next_delay(90, &config), Duration::from_millis(5_000));
        assert_eq!(next_delay(91, &config), Duration::from_millis(5_000));
        assert_eq!(next_delay(u32::MAX, &config), Duration::from_millis(5_000));
    }

    #[test]
    fn test_success_resets_counter() {
        let config = PollerConfig::default();
        let mut state = PollerState::new(false);

        state.record(PollOutcome::Failure);
        state.record(PollOutcome::Failure);
        state.record(PollOutcome::Failure);
        assert_eq!(state.retry_count(), 3);
        assert_eq!(state.next_delay(&config), Duration::from_millis(650));

        state.record(PollOutcome::Success);
        assert_eq!(state.retry_count(), 0);
        assert_eq!(state.next_delay(&config), Duration::from_millis(500));
    }

    #[test]
    fn test_offline_flag_changes_only_on_transition() {
        let mut state = PollerState::new(false);

        assert!(state.record(PollOutcome::Failure));
        assert!(state.is_offline());
        // Still offline, no transition
        assert!(!state.record(PollOutcome::Failure));
        assert!(state.record(PollOutcome::Success));
        assert!(!state.is_offline());
        assert!(!state.record(PollOutcome::Success));
    }

    #[test]
    fn test_initial_offline_flag_respected() {
        let mut state = PollerState::new(true);
        // First success is a transition back online
        assert!(state.record(PollOutcome::Success));
        assert!(!state.is_offline());
    }
}
