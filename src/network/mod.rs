// Outbound status-endpoint access

pub mod client;

pub use client::{FetchError, QueryStatusClient, StatusFetch};
