//! HTTP client for a remote transit-sim instance.
//!
//! Talks to the same routes the local web layer serves: `POST /api/path`
//! for shortest paths and `GET /api/graph` for the network payload.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::StopId;
use crate::engine::PathResult;
use crate::graph::RawNetwork;

use super::error::RemoteError;
use super::service::{GraphService, PathQuery, PathService};
use super::types::{PathRequest, PathResponse};

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Configuration for the remote client.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Base URL of the remote service, without a trailing slash
    pub base_url: String,
    /// Optional API key, sent as `x-apikey`
    pub api_key: Option<String>,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl RemoteConfig {
    /// Create a new config pointing at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: None,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Remote path and graph service client.
///
/// Uses a semaphore to limit concurrent requests.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl RemoteClient {
    /// Create a new client with the given configuration.
    pub fn new(config: RemoteConfig) -> Result<Self, RemoteError> {
        let mut headers = HeaderMap::new();

        if let Some(key) = &config.api_key {
            let value = HeaderValue::from_str(key).map_err(|_| RemoteError::Api {
                status: 0,
                message: "Invalid API key format".to_string(),
            })?;
            headers.insert("x-apikey", value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Ask the remote service for the shortest path between two stops.
    ///
    /// A response carrying an `error` field or `success: false` is an
    /// [`RemoteError::Api`] even when the status code is 200.
    pub async fn fetch_path(
        &self,
        source: &StopId,
        target: &StopId,
    ) -> Result<PathResult, RemoteError> {
        let _permit = self.permit().await?;

        let url = format!("{}/api/path", self.base_url);
        let request = PathRequest::new(source.clone(), target.clone());

        debug!(%url, %source, %target, "Requesting remote path");
        let response = self.http.post(&url).json(&request).send().await?;
        let body: PathResponse = decode(response).await?;

        if let Some(message) = body.failure() {
            return Err(RemoteError::Api {
                status: 200,
                message,
            });
        }
        body.into_result()
    }

    /// Fetch the raw network payload from the remote graph service.
    pub async fn fetch_network(&self) -> Result<RawNetwork, RemoteError> {
        let _permit = self.permit().await?;

        let url = format!("{}/api/graph", self.base_url);
        debug!(%url, "Requesting remote network");
        let response = self.http.get(&url).send().await?;
        decode(response).await
    }

    async fn permit(&self) -> Result<tokio::sync::SemaphorePermit<'_>, RemoteError> {
        self.semaphore
            .acquire()
            .await
            .map_err(|_| RemoteError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })
    }
}

/// Check the status and decode a JSON body.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, RemoteError> {
    let status = response.status();

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(RemoteError::Unauthorized);
    }

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(RemoteError::RateLimited);
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(RemoteError::Api {
            status: status.as_u16(),
            message: body,
        });
    }

    let body = response.text().await?;

    serde_json::from_str(&body).map_err(|e| RemoteError::Json {
        message: e.to_string(),
        body: Some(body.chars().take(500).collect()),
    })
}

impl PathService for RemoteClient {
    async fn shortest_path(&self, query: &PathQuery) -> Result<PathResult, RemoteError> {
        self.fetch_path(&query.source, &query.target).await
    }
}

impl GraphService for RemoteClient {
    async fn fetch_network(&self) -> Result<RawNetwork, RemoteError> {
        RemoteClient::fetch_network(self).await
    }
}
