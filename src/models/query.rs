// Query state and record types
//
// Records are owned by the host application's store; the poller only reads
// them to decide whether polling is warranted, and forwards refreshed
// snapshots from the server back to the store.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a tracked query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryState {
    /// Queued, not yet picked up by the server
    Pending,

    /// Accepted by the server, execution not yet begun
    Started,

    /// Executing
    Running,

    /// Execution finished, results being fetched
    Fetching,

    /// Completed successfully
    Success,

    /// Failed with an error
    Failed,

    /// Stopped by the user
    Stopped,

    /// Exceeded the server-side execution limit
    TimedOut,
}

impl QueryState {
    /// Whether the query has not yet reached a terminal state.
    pub fn is_unterminated(&self) -> bool {
        matches!(
            self,
            QueryState::Pending | QueryState::Started | QueryState::Running | QueryState::Fetching
        )
    }
}

/// One tracked query, scoped to an editing session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRecord {
    /// Unique identifier assigned by the client at submission time
    pub id: String,

    /// Editing session (e.g. one open SQL editor tab) the query belongs to
    pub session_id: String,

    /// Current lifecycle state
    pub state: QueryState,

    /// Submission time, milliseconds since epoch
    pub started_at: i64,
}

impl QueryRecord {
    /// Whether this record should keep the poller running.
    ///
    /// True iff the state is unterminated and the record is younger than
    /// `max_age_ms`. Queries the server abandoned without a terminal state
    /// age out of the predicate rather than polling forever.
    pub fn is_active(&self, now_ms: i64, max_age_ms: i64) -> bool {
        self.state.is_unterminated() && now_ms - self.started_at < max_age_ms
    }
}

/// Current wall-clock time in milliseconds since epoch.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
