// Query auto-refresh poller
//
// One tokio task per editing session. While any query in the session is
// still active, the task sleeps the backoff delay, re-checks the predicate,
// issues a single status request, and merges the result into the store.
// When nothing is active it parks on a change notification instead of
// spinning a timer. The loop body is strictly sequential, so at most one
// sleep and at most one request exist at any time.

use crate::config::PollerConfig;
use crate::models::now_ms;
use crate::network::StatusFetch;
use crate::scheduling::{PollOutcome, PollerState};
use crate::store::QueryStore;
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Adaptive status poller for one editing session's queries.
pub struct QueryAutoRefresh {
    session_id: String,
    store: Arc<dyn QueryStore>,
    fetcher: Arc<dyn StatusFetch>,
    config: PollerConfig,
    state: PollerState,
    changed: Arc<Notify>,
    cancel: CancellationToken,
}

/// Handle to a spawned poller.
///
/// Dropping the handle cancels the task; `shutdown` additionally waits for
/// it to exit, after which no further store writes can occur.
pub struct PollerHandle {
    changed: Arc<Notify>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl QueryAutoRefresh {
    /// `initial_offline` seeds the connectivity flag so the first poll only
    /// notifies the store if it actually changes the value.
    pub fn new(
        session_id: impl Into<String>,
        store: Arc<dyn QueryStore>,
        fetcher: Arc<dyn StatusFetch>,
        config: PollerConfig,
        initial_offline: bool,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            store,
            fetcher,
            config,
            state: PollerState::new(initial_offline),
            changed: Arc::new(Notify::new()),
            cancel: CancellationToken::new(),
        }
    }

    /// Start the polling task. The task immediately evaluates the active
    /// predicate; with no active queries it idles without a timer.
    pub fn spawn(self) -> PollerHandle {
        let changed = self.changed.clone();
        let cancel = self.cancel.clone();
        let task = tokio::spawn(self.run());
        PollerHandle {
            changed,
            cancel,
            task: Some(task),
        }
    }

    fn has_active_queries(&self) -> bool {
        let now = now_ms();
        self.store
            .queries_for_session(&self.session_id)
            .iter()
            .any(|q| q.is_active(now, self.config.max_query_age_ms))
    }

    async fn run(mut self) {
        info!(session = %self.session_id, "Query auto-refresh poller started");

        loop {
            // Idle until some query in this session needs watching.
            if !self.has_active_queries() {
                tokio::select! {
                    _ = self.cancel.cancelled() => break,
                    _ = self.changed.notified() => continue,
                }
            }

            let delay = self.state.next_delay(&self.config);
            debug!(
                session = %self.session_id,
                delay_ms = delay.as_millis() as u64,
                retries = self.state.retry_count(),
                "Next poll scheduled"
            );
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = sleep(delay) => {}
            }

            // The query set may have settled while we slept.
            if !self.has_active_queries() {
                continue;
            }

            let since = self.store.last_update_ms() - self.config.query_update_buffer_ms;
            let result = tokio::select! {
                // A request in flight at teardown must not reach the store.
                _ = self.cancel.cancelled() => break,
                result = self.fetcher.fetch_updates(since) => result,
            };

            match result {
                Ok(updates) => {
                    if !updates.is_empty() {
                        debug!(
                            session = %self.session_id,
                            count = updates.len(),
                            "Merging refreshed query records"
                        );
                        self.store.bulk_refresh(updates);
                    }
                    if self.state.record(PollOutcome::Success) {
                        info!(session = %self.session_id, "Connectivity restored");
                        self.store.set_offline(false);
                    }
                }
                Err(e) => {
                    debug!(session = %self.session_id, error = %e, "Status poll failed");
                    if self.state.record(PollOutcome::Failure) {
                        warn!(
                            session = %self.session_id,
                            "Status endpoint unreachable, marking offline"
                        );
                        self.store.set_offline(true);
                    }
                }
            }
        }

        info!(session = %self.session_id, "Query auto-refresh poller stopped");
    }
}

impl PollerHandle {
    /// Tell an idle poller the query set changed so it re-evaluates the
    /// active predicate. Safe to call at any time; never creates a second
    /// timer or overlapping request.
    pub fn queries_changed(&self) {
        self.changed.notify_one();
    }

    /// Cancel the pending timer or in-flight request and wait for the task
    /// to exit. No store write happens after this returns.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
