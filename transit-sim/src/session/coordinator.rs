//! The session: one graph, its base layout, and the last route answered.

use tracing::{debug, info, warn};

use crate::domain::{Coord, StopId};
use crate::engine::{
    PathResult, compute_path_distance, dominant_route, fewest_stops_path, path_segments,
    shortest_path,
};
use crate::graph::{BaseLayout, Graph, RawNetwork, build_graph, connect_nearby};
use crate::remote::{GraphService, PathQuery, PathService, RemoteError};

use super::config::SessionConfig;
use super::error::{QueryError, SessionError};
use super::status::{Phase, RouteOutcome, RouteSource, Status};

/// Owner of the in-memory graph and the route coordinator.
///
/// Every graph mutation clears the last route and bumps the revision, so a
/// route on screen always belongs to the graph on screen.
#[derive(Debug, Clone, Default)]
pub struct Session {
    config: SessionConfig,
    graph: Graph,
    base: BaseLayout,
    last: Option<RouteOutcome>,
    status: Status,
    revision: u64,
}

impl Session {
    /// Create a session with an empty graph.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Create a session and load `network` into it.
    pub fn with_network(config: SessionConfig, network: &RawNetwork) -> Self {
        let mut session = Self::new(config);
        session.load_network(network);
        session
    }

    /// Replace the graph with one built from `network`.
    ///
    /// The base layout is re-captured from the new graph.
    pub fn load_network(&mut self, network: &RawNetwork) {
        let graph = build_graph(network, &self.config.layout);
        info!(
            stops = graph.len(),
            edges = graph.edge_count(),
            "Loaded network"
        );
        self.base = BaseLayout::capture(&graph);
        self.graph = graph;
        self.invalidate();
    }

    /// Pull the network from a graph service and load it.
    ///
    /// On failure the current graph is kept and the status records the error.
    pub async fn refresh_from<G: GraphService>(&mut self, service: &G) -> Result<(), SessionError> {
        match service.fetch_network().await {
            Ok(network) => {
                self.load_network(&network);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to refresh network");
                self.status = Status::new(Phase::Error, format!("Could not load network: {e}"));
                Err(e.into())
            }
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The last route computed against the current graph.
    pub fn last_result(&self) -> Option<&RouteOutcome> {
        self.last.as_ref()
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Counter bumped by every graph change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn base_layout(&self) -> &BaseLayout {
        &self.base
    }

    /// Move a stop to a new coordinate.
    pub fn move_stop(&mut self, id: &StopId, lat: f64, lng: f64) -> Result<(), SessionError> {
        let coord = Coord::new(lat, lng);
        if !coord.is_valid() {
            return Err(SessionError::InvalidCoordinate { lat, lng });
        }
        if !self.graph.move_stop(id, coord) {
            return Err(SessionError::UnknownStop(id.clone()));
        }
        self.invalidate();
        Ok(())
    }

    /// Put every stop back where the base layout has it.
    pub fn reset_stop_positions(&mut self) -> usize {
        let restored = self.base.restore(&mut self.graph);
        self.invalidate();
        restored
    }

    /// Make the current stop positions the new base layout.
    pub fn commit_stop_positions(&mut self) {
        self.base.commit(&self.graph);
    }

    /// Connect two stops.
    ///
    /// Returns false if they are already connected. `weight: None` uses the
    /// geographic distance.
    pub fn add_edge(
        &mut self,
        from: &StopId,
        to: &StopId,
        weight: Option<f64>,
    ) -> Result<bool, SessionError> {
        for id in [from, to] {
            if !self.graph.contains(id) {
                return Err(SessionError::UnknownStop(id.clone()));
            }
        }
        if let Some(w) = weight
            && !(w.is_finite() && w >= 0.0)
        {
            return Err(SessionError::InvalidWeight(w));
        }

        let added = self.graph.add_edge(from, to, weight);
        if added {
            self.invalidate();
        }
        Ok(added)
    }

    /// Connect every pair of stops closer than the threshold.
    ///
    /// `None` uses the configured threshold. Returns the number of edges added.
    pub fn connect_nearby(&mut self, threshold_km: Option<f64>) -> usize {
        let threshold = threshold_km.unwrap_or(self.config.nearby_threshold_km);
        let added = connect_nearby(&mut self.graph, threshold);
        if added > 0 {
            self.invalidate();
        }
        added
    }

    /// Check a query without running it.
    pub fn validate_query(&self, source: &str, target: &str) -> Result<(StopId, StopId), QueryError> {
        let source = StopId::parse(source).map_err(|_| QueryError::MissingSource)?;
        let target = StopId::parse(target).map_err(|_| QueryError::MissingTarget)?;

        if source == target {
            return Err(QueryError::SameStop(source));
        }
        for id in [&source, &target] {
            if !self.graph.contains(id) {
                return Err(QueryError::UnknownStop(id.clone()));
            }
        }
        Ok((source, target))
    }

    /// Answer a query with the local engine only.
    pub fn compute_local(&mut self, source: &str, target: &str) -> Result<RouteOutcome, QueryError> {
        let (source, target) = self.begin(source, target)?;
        let result = shortest_path(&self.graph, &source, &target);
        Ok(self.finish(result, RouteSource::Local, None))
    }

    /// Answer a query with the path of fewest stops, ignoring weights.
    pub fn compute_fewest_stops(
        &mut self,
        source: &str,
        target: &str,
    ) -> Result<RouteOutcome, QueryError> {
        let (source, target) = self.begin(source, target)?;
        let result = fewest_stops_path(&self.graph, &source, &target);
        Ok(self.finish(result, RouteSource::Local, None))
    }

    /// Answer a query, preferring `remote` and falling back to the local
    /// engine on any remote failure.
    ///
    /// Only an invalid query is an error. Remote failures show up as
    /// `fallback_reason` on the outcome. Callers sharing the session behind
    /// a lock should use [`Session::begin_route`] and
    /// [`Session::complete_route`] instead, so the lock is not held while
    /// the remote answers.
    pub async fn compute_route<P: PathService>(
        &mut self,
        source: &str,
        target: &str,
        remote: Option<&P>,
    ) -> Result<RouteOutcome, QueryError> {
        let query = self.begin_route(source, target)?;
        let answer = match remote {
            Some(remote) => Some(remote.shortest_path(&query).await),
            None => None,
        };
        self.complete_route(&query, answer)
    }

    /// Validate a query and move to [`Phase::Computing`].
    ///
    /// The returned query carries the current revision; pass it to the
    /// remote and then to [`Session::complete_route`].
    pub fn begin_route(&mut self, source: &str, target: &str) -> Result<PathQuery, QueryError> {
        let (source, target) = self.begin(source, target)?;
        Ok(PathQuery::new(source, target, self.revision))
    }

    /// Finish a query started with [`Session::begin_route`].
    ///
    /// `remote` is the remote answer, or `None` when no remote was asked.
    /// An answer computed against an older revision is discarded in favour
    /// of the local engine.
    pub fn complete_route(
        &mut self,
        query: &PathQuery,
        remote: Option<Result<PathResult, RemoteError>>,
    ) -> Result<RouteOutcome, QueryError> {
        // The graph may have been replaced while the remote was answering
        if let Some(missing) = [&query.source, &query.target]
            .into_iter()
            .find(|id| !self.graph.contains(id))
        {
            let e = QueryError::UnknownStop(missing.clone());
            self.status = Status::new(Phase::Error, e.to_string());
            return Err(e);
        }

        let Some(answer) = remote else {
            let result = shortest_path(&self.graph, &query.source, &query.target);
            return Ok(self.finish(result, RouteSource::Local, None));
        };

        let attempt = if query.revision != self.revision {
            Err(format!(
                "graph changed while waiting for the remote (revision {} is now {})",
                query.revision, self.revision
            ))
        } else {
            answer
                .and_then(|result| self.accept_remote(query, result))
                .map_err(|e| e.to_string())
        };

        match attempt {
            Ok(result) => Ok(self.finish(result, RouteSource::Remote, None)),
            Err(reason) => {
                warn!(
                    source = %query.source,
                    target = %query.target,
                    %reason,
                    "Remote path rejected, using local engine"
                );
                let result = shortest_path(&self.graph, &query.source, &query.target);
                Ok(self.finish(result, RouteSource::Local, Some(reason)))
            }
        }
    }

    /// Validate and mark the session as computing.
    fn begin(&mut self, source: &str, target: &str) -> Result<(StopId, StopId), QueryError> {
        match self.validate_query(source, target) {
            Ok((source, target)) => {
                self.status = Status::new(
                    Phase::Computing,
                    format!("Computing route from {source} to {target}"),
                );
                Ok((source, target))
            }
            Err(e) => {
                self.status = Status::new(Phase::Error, e.to_string());
                Err(e)
            }
        }
    }

    /// Check a remote result against the local graph.
    ///
    /// The path must run from source to target through known stops. A
    /// missing or disagreeing distance is replaced by the reconciled one.
    /// "No path" is only believed when the local graph agrees.
    fn accept_remote(
        &self,
        query: &PathQuery,
        mut result: PathResult,
    ) -> Result<PathResult, RemoteError> {
        if let Some(unknown) = result.path.iter().find(|id| !self.graph.contains(id)) {
            return Err(RemoteError::InvalidPath(format!("unknown stop {unknown}")));
        }
        result.settled_order.retain(|id| self.graph.contains(id));

        if !result.is_found() {
            if shortest_path(&self.graph, &query.source, &query.target).is_found() {
                return Err(RemoteError::InvalidPath(format!(
                    "no path reported, but the local graph connects {} and {}",
                    query.source, query.target
                )));
            }
            result.distance = None;
            return Ok(result);
        }

        if result.source() != Some(&query.source) || result.target() != Some(&query.target) {
            return Err(RemoteError::InvalidPath(format!(
                "path does not run from {} to {}",
                query.source, query.target
            )));
        }

        let reconciled = compute_path_distance(&self.graph, &result.path);
        let tolerance = self.config.distance_tolerance * reconciled.abs().max(1.0);
        match result.distance {
            Some(d) if d.is_finite() && (d - reconciled).abs() <= tolerance => {}
            other => {
                debug!(remote = ?other, reconciled, "Using reconciled distance");
                result.distance = Some(reconciled);
            }
        }
        Ok(result)
    }

    fn finish(
        &mut self,
        result: PathResult,
        source: RouteSource,
        fallback_reason: Option<String>,
    ) -> RouteOutcome {
        let segments = path_segments(&self.graph, &result.path);
        let route = dominant_route(&segments);

        self.status = match (result.distance, result.source(), result.target()) {
            (Some(d), Some(from), Some(to)) => {
                let via = match source {
                    RouteSource::Remote => "remote service",
                    RouteSource::Local => "local engine",
                };
                Status::new(
                    Phase::Found,
                    format!("Found route from {from} to {to}: {d:.2} km ({via})"),
                )
            }
            _ => Status::new(Phase::NotFound, "No path between the selected stops"),
        };

        let outcome = RouteOutcome {
            result,
            segments,
            route,
            source,
            fallback_reason,
        };
        self.last = Some(outcome.clone());
        outcome
    }

    fn invalidate(&mut self) {
        self.last = None;
        self.status = Status::idle();
        self.revision += 1;
    }
}
