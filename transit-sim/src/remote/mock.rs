//! Mock remote service for testing without a running instance.
//!
//! Serves canned path results keyed by `(source, target)` and an optional
//! network payload, and can be told to fail every request.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::RwLock;

use crate::domain::StopId;
use crate::engine::PathResult;
use crate::graph::RawNetwork;

use super::error::RemoteError;
use super::service::{GraphService, PathQuery, PathService};

/// One canned answer in a mock data file.
#[derive(Debug, Deserialize)]
struct MockRoute {
    source: StopId,
    target: StopId,
    #[serde(flatten)]
    result: PathResult,
}

/// Mock remote service.
#[derive(Clone, Default)]
pub struct MockPathService {
    routes: Arc<RwLock<HashMap<(StopId, StopId), PathResult>>>,
    network: Option<RawNetwork>,
    /// When set, every request fails with this status.
    fail_status: Option<u16>,
    /// Simulated response latency for path queries.
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl MockPathService {
    /// A mock that knows no routes; every query is a 404.
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock whose every request fails with 503.
    pub fn unavailable() -> Self {
        Self {
            fail_status: Some(503),
            ..Self::default()
        }
    }

    /// Load canned routes from a JSON file.
    ///
    /// Expects an array of `{source, target, path, settledOrder?, distance?}`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RemoteError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| RemoteError::NotConfigured(
            format!("failed to read mock routes {}: {e}", path.display()),
        ))?;

        let entries: Vec<MockRoute> =
            serde_json::from_str(&json).map_err(|e| RemoteError::Json {
                message: e.to_string(),
                body: Some(json.chars().take(500).collect()),
            })?;

        let routes = entries
            .into_iter()
            .map(|e| ((e.source, e.target), e.result))
            .collect();

        Ok(Self {
            routes: Arc::new(RwLock::new(routes)),
            ..Self::default()
        })
    }

    /// Add a canned result for `source -> target`.
    pub fn with_route(self, source: StopId, target: StopId, result: PathResult) -> Self {
        // Only reachable before the mock is shared, so the lock is uncontended
        if let Ok(mut routes) = self.routes.try_write() {
            routes.insert((source, target), result);
        }
        self
    }

    /// Serve `network` from the graph endpoint.
    pub fn with_network(mut self, network: RawNetwork) -> Self {
        self.network = Some(network);
        self
    }

    /// Wait `delay` before answering each path query.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Replace or add a canned result.
    pub async fn insert_route(&self, source: StopId, target: StopId, result: PathResult) {
        self.routes.write().await.insert((source, target), result);
    }

    /// Number of requests served, successful or not.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) -> Result<(), RemoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.fail_status {
            Some(status) => Err(RemoteError::Api {
                status,
                message: "mock service unavailable".to_string(),
            }),
            None => Ok(()),
        }
    }
}

impl PathService for MockPathService {
    async fn shortest_path(&self, query: &PathQuery) -> Result<PathResult, RemoteError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.record_call()?;
        let routes = self.routes.read().await;
        routes
            .get(&(query.source.clone(), query.target.clone()))
            .cloned()
            .ok_or_else(|| RemoteError::Api {
                status: 404,
                message: format!("No mock route for {} -> {}", query.source, query.target),
            })
    }
}

impl GraphService for MockPathService {
    async fn fetch_network(&self) -> Result<RawNetwork, RemoteError> {
        self.record_call()?;
        self.network
            .clone()
            .ok_or_else(|| RemoteError::NotConfigured("mock has no network".to_string()))
    }
}
