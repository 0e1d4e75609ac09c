// Project-wide timing constants
//
// Centralised here so the polling intervals have one source of truth.
// Import via `use crate::config::constants::*;`.

/// Base delay before the first poll and after any successful poll.
pub const BASE_INTERVAL_MS: u64 = 500;

/// Added to the delay once per consecutive failed poll (linear backoff).
pub const BACKOFF_STEP_MS: u64 = 50;

/// Ceiling on the computed poll delay, regardless of retry count.
pub const MAX_INTERVAL_MS: u64 = 5_000;

/// Hard timeout on each outbound status request.
pub const REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Safety overlap subtracted from the `since` timestamp sent to the server.
///
/// Tolerates clock skew between client and server and avoids missing updates
/// that land exactly at the boundary of the previous poll.
pub const QUERY_UPDATE_BUFFER_MS: i64 = 5_000;

/// Queries that started longer ago than this no longer count as active.
///
/// Bounds polling for queries the server abandoned without ever reporting a
/// terminal state. 6 hours, in milliseconds.
pub const MAX_QUERY_AGE_TO_POLL_MS: i64 = 6 * 60 * 60 * 1_000;
