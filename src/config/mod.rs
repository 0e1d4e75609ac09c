// Poller configuration

pub mod constants;

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timing knobs for the auto-refresh poller.
///
/// All values are in milliseconds so the struct deserializes from plain
/// numbers in host-application settings files. `Default` matches the
/// constants in [`constants`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerConfig {
    /// Delay before the first poll and after any success.
    #[serde(default = "default_base_interval_ms")]
    pub base_interval_ms: u64,

    /// Linear backoff increment per consecutive failure.
    #[serde(default = "default_backoff_step_ms")]
    pub backoff_step_ms: u64,

    /// Cap on the computed delay.
    #[serde(default = "default_max_interval_ms")]
    pub max_interval_ms: u64,

    /// Hard timeout on each status request.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Overlap subtracted from the `since` timestamp (clock-skew tolerance).
    #[serde(default = "default_query_update_buffer_ms")]
    pub query_update_buffer_ms: i64,

    /// Age ceiling for the active-query predicate.
    #[serde(default = "default_max_query_age_ms")]
    pub max_query_age_ms: i64,
}

fn default_base_interval_ms() -> u64 {
    constants::BASE_INTERVAL_MS
}

fn default_backoff_step_ms() -> u64 {
    constants::BACKOFF_STEP_MS
}

fn default_max_interval_ms() -> u64 {
    constants::MAX_INTERVAL_MS
}

fn default_request_timeout_ms() -> u64 {
    constants::REQUEST_TIMEOUT_MS
}

fn default_query_update_buffer_ms() -> i64 {
    constants::QUERY_UPDATE_BUFFER_MS
}

fn default_max_query_age_ms() -> i64 {
    constants::MAX_QUERY_AGE_TO_POLL_MS
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            base_interval_ms: default_base_interval_ms(),
            backoff_step_ms: default_backoff_step_ms(),
            max_interval_ms: default_max_interval_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            query_update_buffer_ms: default_query_update_buffer_ms(),
            max_query_age_ms: default_max_query_age_ms(),
        }
    }
}

impl PollerConfig {
    /// Request timeout as a [`Duration`] for the HTTP client builder.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
