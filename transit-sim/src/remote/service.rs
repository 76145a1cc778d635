//! Service traits the route coordinator talks to.
//!
//! These abstractions allow the coordinator to be tested with mock data
//! and let the HTTP client, its cached wrapper and the mock be swapped
//! freely.

use std::future::Future;

use crate::domain::StopId;
use crate::engine::PathResult;
use crate::graph::RawNetwork;

use super::error::RemoteError;

/// A validated path query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathQuery {
    pub source: StopId,
    pub target: StopId,

    /// Revision of the graph the query was made against. Results computed
    /// for one revision are not valid for another.
    pub revision: u64,
}

impl PathQuery {
    pub fn new(source: StopId, target: StopId, revision: u64) -> Self {
        Self {
            source,
            target,
            revision,
        }
    }
}

/// Trait for computing shortest paths somewhere other than the local engine.
pub trait PathService {
    /// Shortest path for `query`.
    ///
    /// Any error makes the caller fall back to the local engine.
    fn shortest_path(
        &self,
        query: &PathQuery,
    ) -> impl Future<Output = Result<PathResult, RemoteError>> + Send;
}

/// Trait for fetching the raw network payload.
pub trait GraphService {
    fn fetch_network(&self) -> impl Future<Output = Result<RawNetwork, RemoteError>> + Send;
}
