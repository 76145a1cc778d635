//! Raw network descriptors as they arrive from the graph/routes service.
//!
//! Nodes, edges and route stops may each be a bare string or an object with
//! a handful of accepted field names. Every descriptor also has a
//! `Malformed` catch-all so one bad record cannot fail a whole payload;
//! normalization turns malformed records into `None` and the builder skips
//! them.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{Coord, StopId};

use super::de::{lenient_f64, lenient_string};
use super::model::RouteRef;

/// Errors from loading a network payload.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    #[error("failed to read network file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("network JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A complete raw network payload. Any field may be absent.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawNetwork {
    #[serde(default, alias = "stops", skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<RawNode>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edges: Option<Vec<RawEdge>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routes: Option<Vec<RawRoute>>,
}

impl RawNetwork {
    /// Parse a network payload from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, NetworkError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a network payload from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, NetworkError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| NetworkError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_json_str(&json)
    }

    /// Explicit node list, if present and non-empty.
    pub fn explicit_nodes(&self) -> Option<&[RawNode]> {
        self.nodes.as_deref().filter(|n| !n.is_empty())
    }

    /// Explicit edge list, if present and non-empty.
    pub fn explicit_edges(&self) -> Option<&[RawEdge]> {
        self.edges.as_deref().filter(|e| !e.is_empty())
    }

    /// Route list, if present and non-empty.
    pub fn route_list(&self) -> Option<&[RawRoute]> {
        self.routes.as_deref().filter(|r| !r.is_empty())
    }
}

/// A node descriptor: a bare name or an object.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawNode {
    Name(String),
    Object(RawNodeObject),
    Malformed(Value),
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawNodeObject {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,

    #[serde(default, alias = "latitude", deserialize_with = "lenient_f64")]
    pub lat: Option<f64>,

    #[serde(
        default,
        alias = "lon",
        alias = "longitude",
        deserialize_with = "lenient_f64"
    )]
    pub lng: Option<f64>,
}

/// A node after normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSpec {
    pub id: StopId,
    pub coord: Option<Coord>,
}

impl RawNode {
    /// Normalize to a stop id and optional coordinate.
    ///
    /// `name` wins over `id` when both are present.
    pub fn normalize(&self) -> Option<NodeSpec> {
        match self {
            RawNode::Name(name) => Some(NodeSpec {
                id: StopId::parse(name).ok()?,
                coord: None,
            }),
            RawNode::Object(obj) => Some(NodeSpec {
                id: first_valid_id(&[obj.name.as_deref(), obj.id.as_deref()])?,
                coord: coord_from(obj.lat, obj.lng),
            }),
            RawNode::Malformed(_) => None,
        }
    }
}

/// An explicit edge descriptor.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawEdge {
    Object(RawEdgeObject),
    Malformed(Value),
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawEdgeObject {
    #[serde(default, deserialize_with = "lenient_string")]
    pub from: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub to: Option<String>,

    #[serde(
        default,
        alias = "w",
        alias = "distance",
        deserialize_with = "lenient_f64"
    )]
    pub weight: Option<f64>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub route_id: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub route_name: Option<String>,
}

/// An edge after normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeSpec {
    pub from: StopId,
    pub to: StopId,
    pub weight: Option<f64>,
    pub route: Option<RouteRef>,
}

impl RawEdge {
    /// Normalize to endpoints, optional weight and optional route.
    ///
    /// Negative weights are treated as absent.
    pub fn normalize(&self) -> Option<EdgeSpec> {
        let RawEdge::Object(obj) = self else {
            return None;
        };
        Some(EdgeSpec {
            from: StopId::parse(obj.from.as_deref()?).ok()?,
            to: StopId::parse(obj.to.as_deref()?).ok()?,
            weight: obj.weight.filter(|w| *w >= 0.0),
            route: Some(RouteRef::new(obj.route_id.clone(), obj.route_name.clone())),
        })
    }
}

/// A route: an ordered sequence of stop references.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawRoute {
    Object(RawRouteObject),
    Malformed(Value),
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawRouteObject {
    #[serde(default, alias = "id", deserialize_with = "lenient_string")]
    pub route_id: Option<String>,

    #[serde(default, alias = "name", deserialize_with = "lenient_string")]
    pub route_name: Option<String>,

    #[serde(default)]
    pub stops: Vec<RawStopRef>,
}

/// A stop reference inside a route.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawStopRef {
    Name(String),
    Object(RawStopObject),
    Malformed(Value),
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawStopObject {
    #[serde(default, deserialize_with = "lenient_string")]
    pub stop_name: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,

    #[serde(default, alias = "latitude", deserialize_with = "lenient_f64")]
    pub lat: Option<f64>,

    #[serde(
        default,
        alias = "lon",
        alias = "longitude",
        deserialize_with = "lenient_f64"
    )]
    pub lng: Option<f64>,

    /// Distance from the previous stop on the route, in kilometers.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub distance_from_previous: Option<f64>,
}

/// A route stop after normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteStop {
    pub id: StopId,
    pub coord: Option<Coord>,
    /// Only positive distances survive normalization.
    pub distance_from_previous: Option<f64>,
}

impl RawStopRef {
    pub fn normalize(&self) -> Option<RouteStop> {
        match self {
            RawStopRef::Name(name) => Some(RouteStop {
                id: StopId::parse(name).ok()?,
                coord: None,
                distance_from_previous: None,
            }),
            RawStopRef::Object(obj) => Some(RouteStop {
                id: first_valid_id(&[
                    obj.stop_name.as_deref(),
                    obj.name.as_deref(),
                    obj.id.as_deref(),
                ])?,
                coord: coord_from(obj.lat, obj.lng),
                distance_from_previous: obj.distance_from_previous.filter(|d| *d > 0.0),
            }),
            RawStopRef::Malformed(_) => None,
        }
    }
}

impl RawRoute {
    /// The route's identity, or `None` for malformed routes.
    pub fn route_ref(&self) -> Option<RouteRef> {
        match self {
            RawRoute::Object(obj) => Some(RouteRef::new(
                obj.route_id.clone(),
                obj.route_name.clone(),
            )),
            RawRoute::Malformed(_) => None,
        }
    }

    /// The route's valid stops in order; malformed stop references are
    /// dropped.
    pub fn stops(&self) -> Vec<RouteStop> {
        match self {
            RawRoute::Object(obj) => obj.stops.iter().filter_map(RawStopRef::normalize).collect(),
            RawRoute::Malformed(_) => Vec::new(),
        }
    }
}

fn first_valid_id(candidates: &[Option<&str>]) -> Option<StopId> {
    candidates
        .iter()
        .flatten()
        .find_map(|candidate| StopId::parse(candidate).ok())
}

fn coord_from(lat: Option<f64>, lng: Option<f64>) -> Option<Coord> {
    let coord = Coord::new(lat?, lng?);
    coord.is_valid().then_some(coord)
}
