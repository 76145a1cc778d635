//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::graph::{Graph, WeightSource};
use crate::session::{RouteOutcome, Status};

/// Request for a route between two stops.
///
/// Stop names stay plain strings here so blank or unknown names reach the
/// validator and come back as a 400 rather than a body rejection.
#[derive(Debug, Deserialize)]
pub struct RouteRequest {
    #[serde(default, alias = "start")]
    pub source: String,

    #[serde(default, alias = "end")]
    pub target: String,

    #[serde(default)]
    pub mode: RouteMode,
}

/// How to choose among paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteMode {
    /// Shortest total distance, remote first
    #[default]
    Shortest,
    /// Local shortest distance, never asking the remote
    Local,
    /// Fewest stops, local
    FewestStops,
}

/// A computed route.
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub success: bool,

    #[serde(flatten)]
    pub outcome: RouteOutcome,
}

/// Request to move a stop.
#[derive(Debug, Deserialize)]
pub struct MoveStopRequest {
    pub stop: String,
    pub lat: f64,
    pub lng: f64,
}

/// Request to add an edge.
#[derive(Debug, Deserialize)]
pub struct AddEdgeRequest {
    pub from: String,
    pub to: String,

    /// Kilometers; omitted means geographic distance
    #[serde(default)]
    pub weight: Option<f64>,
}

/// Request to connect nearby stops.
#[derive(Debug, Default, Deserialize)]
pub struct NearbyRequest {
    #[serde(default)]
    pub threshold_km: Option<f64>,
}

/// Result of a graph mutation.
#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub success: bool,

    /// Stops or edges affected
    pub changed: usize,

    /// Graph revision after the change
    pub revision: u64,
}

/// A stop in the graph response.
///
/// Field names match what the network loader accepts, so one instance can
/// load its graph from another.
#[derive(Debug, Serialize)]
pub struct NodeView {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

/// An edge in the graph response.
#[derive(Debug, Serialize)]
pub struct EdgeView {
    pub from: String,
    pub to: String,
    pub weight: f64,
    pub source: WeightSource,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_name: Option<String>,
}

/// The whole graph.
#[derive(Debug, Serialize)]
pub struct GraphResponse {
    pub success: bool,
    pub revision: u64,
    pub nodes: Vec<NodeView>,
    pub edges: Vec<EdgeView>,
}

impl GraphResponse {
    pub fn from_graph(graph: &Graph, revision: u64) -> Self {
        let nodes = graph
            .stops()
            .iter()
            .map(|s| NodeView {
                name: s.id.to_string(),
                lat: s.coord.lat,
                lng: s.coord.lng,
            })
            .collect();

        let edges = graph
            .edges()
            .iter()
            .map(|e| EdgeView {
                from: e.from.to_string(),
                to: e.to.to_string(),
                weight: e.weight,
                source: e.source,
                route_id: e.route.as_ref().and_then(|r| r.id.clone()),
                route_name: e.route.as_ref().and_then(|r| r.name.clone()),
            })
            .collect();

        Self {
            success: true,
            revision,
            nodes,
            edges,
        }
    }
}

/// Coordinator status for the UI.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    #[serde(flatten)]
    pub status: Status,
    pub revision: u64,
    pub last_result: Option<RouteOutcome>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
