// query-autorefresh - Adaptive status poller for in-flight SQL queries
// Library exports

pub mod config;
pub mod logging;
pub mod models;
pub mod network;
pub mod poller;
pub mod scheduling;
pub mod store;

pub use config::PollerConfig;
pub use models::{QueryRecord, QueryState};
pub use network::{FetchError, QueryStatusClient, StatusFetch};
pub use poller::{PollerHandle, QueryAutoRefresh};
pub use store::{InMemoryQueryStore, QueryStore};
