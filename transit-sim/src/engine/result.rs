//! Path query results.

use serde::{Deserialize, Serialize};

use crate::domain::StopId;
use crate::graph::RouteRef;

/// Outcome of a path query.
///
/// `path` runs from source to target inclusive and is empty when no path
/// exists, in which case `distance` is `None`. `settled_order` lists stops
/// in the order their shortest distance was finalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathResult {
    pub path: Vec<StopId>,

    #[serde(default, alias = "settled_order")]
    pub settled_order: Vec<StopId>,

    #[serde(default)]
    pub distance: Option<f64>,
}

impl PathResult {
    /// A "no path" result that still reports how far the search got.
    pub fn no_path(settled_order: Vec<StopId>) -> Self {
        Self {
            path: Vec::new(),
            settled_order,
            distance: None,
        }
    }

    /// Returns true if a path was found.
    pub fn is_found(&self) -> bool {
        !self.path.is_empty()
    }

    /// Number of edges traversed.
    pub fn hops(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    pub fn source(&self) -> Option<&StopId> {
        self.path.first()
    }

    pub fn target(&self) -> Option<&StopId> {
        self.path.last()
    }
}

/// One step of a path, between consecutive stops.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub from: StopId,
    pub to: StopId,

    /// Distance in kilometers.
    pub distance: f64,

    /// The route of the edge used, if the edge has one.
    pub route: Option<RouteRef>,

    /// False when no edge joins the stops and the distance is geographic.
    pub via_edge: bool,
}
