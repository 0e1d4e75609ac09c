// Query records as reported by the status endpoint

pub mod query;

pub use query::{now_ms, QueryRecord, QueryState};
