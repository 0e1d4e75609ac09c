// Query store capability
//
// The poller never owns query records. The host application hands it a
// store implementing this trait; the poller reads the session's records to
// evaluate the active predicate and pushes server updates back through
// `bulk_refresh`. Injecting the store (rather than reaching for a global)
// keeps the poller testable against a fake.

use crate::models::{now_ms, QueryRecord};
use std::collections::HashMap;
use std::sync::RwLock;

/// Externally-owned store of query records, keyed by query id.
///
/// Implementations must make `bulk_refresh` an atomic merge-by-id: the
/// poller performs at most one logical update per settled poll cycle and
/// never holds a lock across cycles.
pub trait QueryStore: Send + Sync {
    /// Records belonging to one editing session.
    fn queries_for_session(&self, session_id: &str) -> Vec<QueryRecord>;

    /// Most recent known update time, milliseconds since epoch.
    ///
    /// The poller subtracts the configured buffer from this value to build
    /// the `since` parameter of the next status request.
    fn last_update_ms(&self) -> i64;

    /// Merge refreshed records into the store, deduping by query id.
    fn bulk_refresh(&self, updates: HashMap<String, QueryRecord>);

    /// Record the connectivity state for UI display.
    fn set_offline(&self, offline: bool);
}

/// Thread-safe in-memory implementation of [`QueryStore`].
///
/// Suitable for hosts without their own state container, and for tests.
pub struct InMemoryQueryStore {
    inner: RwLock<StoreInner>,
}

struct StoreInner {
    queries: HashMap<String, QueryRecord>,
    last_update_ms: i64,
    offline: bool,
}

impl InMemoryQueryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreInner {
                queries: HashMap::new(),
                last_update_ms: now_ms(),
                offline: false,
            }),
        }
    }

    /// Insert or replace a single record (e.g. at query submission).
    pub fn upsert(&self, record: QueryRecord) {
        let mut inner = self.inner.write().unwrap();
        inner.queries.insert(record.id.clone(), record);
        inner.last_update_ms = now_ms();
    }

    /// Current connectivity flag as recorded by `set_offline`.
    pub fn is_offline(&self) -> bool {
        self.inner.read().unwrap().offline
    }

    /// Look up one record by id.
    pub fn get(&self, id: &str) -> Option<QueryRecord> {
        self.inner.read().unwrap().queries.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap().queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().unwrap().queries.is_empty()
    }
}

impl Default for InMemoryQueryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryStore for InMemoryQueryStore {
    fn queries_for_session(&self, session_id: &str) -> Vec<QueryRecord> {
        self.inner
            .read()
            .unwrap()
            .queries
            .values()
            .filter(|q| q.session_id == session_id)
            .cloned()
            .collect()
    }

    fn last_update_ms(&self) -> i64 {
        self.inner.read().unwrap().last_update_ms
    }

    fn bulk_refresh(&self, updates: HashMap<String, QueryRecord>) {
        if updates.is_empty() {
            return;
        }
        let mut inner = self.inner.write().unwrap();
        for (id, record) in updates {
            inner.queries.insert(id, record);
        }
        inner.last_update_ms = now_ms();
    }

    fn set_offline(&self, offline: bool) {
        self.inner.write().unwrap().offline = offline;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QueryState;

    fn record(id: &str, session: &str, state: QueryState) -> QueryRecord {
        QueryRecord {
            id: id.to_string(),
            session_id: session.to_string(),
            state,
            started_at: now_ms(),
        }
    }

    #[test]
    fn test_session_scoping() {
        let store = InMemoryQueryStore::new();
        store.upsert(record("q1", "editor-1", QueryState::Running));
        store.upsert(record("q2", "editor-2", QueryState::Running));

        let scoped = store.queries_for_session("editor-1");
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].id, "q1");
    }

    #[test]
    fn test_bulk_refresh_merges_by_id() {
        let store = InMemoryQueryStore::new();
        store.upsert(record("q1", "editor-1", QueryState::Running));

        let mut updates = HashMap::new();
        updates.insert("q1".to_string(), record("q1", "editor-1", QueryState::Success));
        updates.insert("q2".to_string(), record("q2", "editor-1", QueryState::Pending));
        store.bulk_refresh(updates);

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("q1").unwrap().state, QueryState::Success);
        assert_eq!(store.get("q2").unwrap().state, QueryState::Pending);
    }

    #[test]
    fn test_refresh_advances_last_update() {
        let store = InMemoryQueryStore::new();
        let before = store.last_update_ms();

        let mut updates = HashMap::new();
        updates.insert("q1".to_string(), record("q1", "editor-1", QueryState::Running));
        store.bulk_refresh(updates);

        assert!(store.last_update_ms() >= before);
    }

    #[test]
    fn test_empty_refresh_is_a_no_op() {
        let store = InMemoryQueryStore::new();
        store.upsert(record("q1", "editor-1", QueryState::Running));
        let before = store.last_update_ms();

        store.bulk_refresh(HashMap::new());
        assert_eq!(store.last_update_ms(), before);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_offline_flag_round_trip() {
        let store = InMemoryQueryStore::new();
        assert!(!store.is_offline());
        store.set_offline(true);
        assert!(store.is_offline());
        store.set_offline(false);
        assert!(!store.is_offline());
    }
}
