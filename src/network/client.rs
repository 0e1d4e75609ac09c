// Query-status endpoint client.
//
// The endpoint contract:
//
//   GET <base_url>/<since>
//     `since`: milliseconds since epoch; the server returns every query
//     updated at or after that instant.
//     Response: JSON object mapping query id -> refreshed QueryRecord.
//     `{}` means no updates.

use crate::config::PollerConfig;
use crate::models::QueryRecord;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use thiserror::Error;

/// Why a status poll failed. The poller treats every variant the same way
/// (offline flag + retry), but keeping them distinct makes the logs useful.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed response body: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Capability to fetch query updates since a given instant.
///
/// The poller depends on this trait rather than on [`QueryStatusClient`]
/// directly so tests can drive it with a scripted fake.
#[async_trait]
pub trait StatusFetch: Send + Sync {
    async fn fetch_updates(&self, since_ms: i64) -> Result<HashMap<String, QueryRecord>, FetchError>;
}

/// HTTP client for the query-status endpoint.
pub struct QueryStatusClient {
    base_url: String,
    http: Client,
}

impl QueryStatusClient {
    pub fn new(base_url: impl Into<String>, config: &PollerConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }
}

#[async_trait]
impl StatusFetch for QueryStatusClient {
    async fn fetch_updates(&self, since_ms: i64) -> Result<HashMap<String, QueryRecord>, FetchError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), since_ms);
        let resp = self.http.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::Network(e)
            }
        })?;

        if !resp.status().is_success() {
            return Err(FetchError::Status(resp.status()));
        }

        resp.json::<HashMap<String, QueryRecord>>()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout
                } else {
                    FetchError::Decode(e)
                }
            })
    }
}
