//! Snapshot fetcher for the repos-server status endpoint
//!
//! One `GET` per refresh, no retries. Any failure (transport, non-200 status,
//! or a body that does not match the schema) comes back as a [`FetchError`]
//! and the caller decides what to keep on screen.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::config::ServerConfig;
use crate::model::Snapshot;

/// Default location of the status document on the server
pub const DEFAULT_DATA_PATH: &str = "/repos-server/repos-data";

/// Why a refresh produced no snapshot
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid server URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Server returned {status} for {url}")]
    Status { url: String, status: StatusCode },

    #[error("Malformed payload from {url}: {source}")]
    Payload {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Anything that can produce a snapshot on demand
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Pull one complete snapshot
    async fn fetch(&self) -> Result<Snapshot, FetchError>;

    /// Human-readable origin of the snapshots, for logs
    fn describe(&self) -> String;
}

/// HTTP fetcher for `GET /repos-server/repos-data`
#[derive(Debug, Clone)]
pub struct SnapshotFetcher {
    client: Client,
    endpoint: Url,
    origin: Option<String>,
    timeout: Option<Duration>,
}

impl SnapshotFetcher {
    /// Fetcher for `base_url` joined with `data_path`
    pub fn new(base_url: &str, data_path: &str) -> Result<Self, FetchError> {
        let endpoint = Url::parse(base_url)?.join(data_path)?;
        Ok(Self {
            client: Client::new(),
            endpoint,
            origin: None,
            timeout: None,
        })
    }

    pub fn from_config(config: &ServerConfig) -> Result<Self, FetchError> {
        let fetcher = Self::new(&config.url, &config.data_path)?
            .with_origin(config.origin.clone())
            .with_timeout(config.timeout.map(Duration::from_secs));
        Ok(fetcher)
    }

    /// Send an `Origin` header; the server checks it against its allow-list
    pub fn with_origin(mut self, origin: Option<String>) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl SnapshotSource for SnapshotFetcher {
    async fn fetch(&self) -> Result<Snapshot, FetchError> {
        let url = self.endpoint.to_string();
        debug!("Fetching snapshot from {}", url);

        // The server rejects requests that are neither same-origin nor from an allowed origin
        let mut request = self
            .client
            .get(self.endpoint.clone())
            .header("Sec-Fetch-Site", "same-origin");
        if let Some(origin) = &self.origin {
            request = request.header(reqwest::header::ORIGIN, origin);
        }
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|source| FetchError::Transport {
            url: url.clone(),
            source,
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status { url, status });
        }

        let body = response.text().await.map_err(|source| FetchError::Transport {
            url: url.clone(),
            source,
        })?;

        let snapshot =
            Snapshot::from_json(&body).map_err(|source| FetchError::Payload { url: url.clone(), source })?;

        info!("Fetched {} repositories from {}", snapshot.len(), url);
        Ok(snapshot)
    }

    fn describe(&self) -> String {
        self.endpoint.to_string()
    }
}
