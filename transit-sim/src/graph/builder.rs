//! Graph construction from raw network input.
//!
//! Nodes are resolved first (including fallback coordinates) because
//! edges without an explicit weight take their weight from the endpoints'
//! coordinates. Building never fails: malformed records are skipped and
//! the graph is whatever subset of the input was valid.

use std::collections::HashSet;

use tracing::debug;

use crate::domain::{Coord, StopId};

use super::input::{EdgeSpec, NodeSpec, RawEdge, RawNetwork, RawNode, RawRoute};
use super::layout::{FallbackLayout, LayoutConfig};
use super::model::Graph;

/// Where the node set comes from.
#[derive(Debug, Clone, Copy)]
pub enum NodeSource<'a> {
    /// An explicit node list.
    Nodes(&'a [RawNode]),
    /// Every stop referenced by the routes, in first-seen order.
    Routes(&'a [RawRoute]),
    /// Every endpoint of the explicit edges, in first-seen order.
    Edges(&'a [RawEdge]),
}

/// Where the edge set comes from.
#[derive(Debug, Clone, Copy)]
pub enum EdgeSource<'a> {
    /// An explicit edge list.
    Edges(&'a [RawEdge]),
    /// Consecutive stop pairs of each route.
    Routes(&'a [RawRoute]),
}

/// Build a graph from a raw network payload.
///
/// Explicit nodes and edges take priority; routes fill in whichever of the
/// two is absent. With neither nodes nor routes, nodes are taken from the
/// explicit edges' endpoints.
pub fn build_graph(network: &RawNetwork, layout: &LayoutConfig) -> Graph {
    let node_source = match (
        network.explicit_nodes(),
        network.route_list(),
        network.explicit_edges(),
    ) {
        (Some(nodes), _, _) => Some(NodeSource::Nodes(nodes)),
        (None, Some(routes), _) => Some(NodeSource::Routes(routes)),
        (None, None, Some(edges)) => Some(NodeSource::Edges(edges)),
        (None, None, None) => None,
    };

    let mut graph = match node_source {
        Some(source) => build_nodes(source, layout),
        None => Graph::new(),
    };

    let edge_source = match (network.explicit_edges(), network.route_list()) {
        (Some(edges), _) => Some(EdgeSource::Edges(edges)),
        (None, Some(routes)) => Some(EdgeSource::Routes(routes)),
        (None, None) => None,
    };

    if let Some(source) = edge_source {
        build_edges(&mut graph, source);
    }

    debug!(
        stops = graph.len(),
        edges = graph.edge_count(),
        "Built graph"
    );

    graph
}

/// Build the stop set, deduplicated by trimmed name in first-seen order.
///
/// The first coordinate seen for a stop wins. Stops without any
/// coordinate get a fallback position from `layout`, indexed by their
/// position in the final stop order.
pub fn build_nodes(source: NodeSource<'_>, layout: &LayoutConfig) -> Graph {
    let specs: Vec<NodeSpec> = match source {
        NodeSource::Nodes(nodes) => nodes
            .iter()
            .filter_map(|raw| {
                let spec = raw.normalize();
                if spec.is_none() {
                    debug!(?raw, "Skipping malformed node");
                }
                spec
            })
            .collect(),
        NodeSource::Routes(routes) => routes
            .iter()
            .flat_map(|route| route.stops())
            .map(|stop| NodeSpec {
                id: stop.id,
                coord: stop.coord,
            })
            .collect(),
        NodeSource::Edges(edges) => edges
            .iter()
            .filter_map(RawEdge::normalize)
            .flat_map(|edge| [edge.from, edge.to])
            .map(|id| NodeSpec { id, coord: None })
            .collect(),
    };

    let resolved = dedup_nodes(specs);
    let count = resolved.len();
    let mut fallback = FallbackLayout::new(layout);
    let mut graph = Graph::new();

    for (index, (id, coord)) in resolved.into_iter().enumerate() {
        let coord = coord.unwrap_or_else(|| fallback.position(index, count));
        graph.add_stop(id, coord);
    }

    graph
}

/// Merge duplicate specs, keeping first-seen order and the first known
/// coordinate.
fn dedup_nodes(specs: Vec<NodeSpec>) -> Vec<(StopId, Option<Coord>)> {
    let mut resolved: Vec<(StopId, Option<Coord>)> = Vec::new();
    let mut seen: HashSet<StopId> = HashSet::new();

    for spec in specs {
        if seen.insert(spec.id.clone()) {
            resolved.push((spec.id, spec.coord));
        } else if let Some(coord) = spec.coord
            && let Some(entry) = resolved.iter_mut().find(|(id, _)| *id == spec.id)
            && entry.1.is_none()
        {
            entry.1 = Some(coord);
        }
    }

    resolved
}

/// Add edges to `graph`, returning how many were added.
///
/// Duplicates (by unordered pair) and edges whose endpoints are not in the
/// graph are dropped; the first edge processed for a pair wins.
pub fn build_edges(graph: &mut Graph, source: EdgeSource<'_>) -> usize {
    let specs: Vec<EdgeSpec> = match source {
        EdgeSource::Edges(edges) => edges
            .iter()
            .filter_map(|raw| {
                let spec = raw.normalize();
                if spec.is_none() {
                    debug!(?raw, "Skipping malformed edge");
                }
                spec
            })
            .collect(),
        EdgeSource::Routes(routes) => routes.iter().flat_map(route_edges).collect(),
    };

    let mut added = 0;
    for spec in specs {
        if graph.add_edge_on_route(&spec.from, &spec.to, spec.weight, spec.route) {
            added += 1;
        } else {
            debug!(from = %spec.from, to = %spec.to, "Dropping duplicate or dangling edge");
        }
    }
    added
}

/// Consecutive stop pairs of a route. A positive `distance_from_previous`
/// on the later stop becomes the explicit weight.
fn route_edges(route: &RawRoute) -> Vec<EdgeSpec> {
    let Some(route_ref) = route.route_ref() else {
        return Vec::new();
    };
    route
        .stops()
        .windows(2)
        .map(|pair| EdgeSpec {
            from: pair[0].id.clone(),
            to: pair[1].id.clone(),
            weight: pair[1].distance_from_previous,
            route: Some(route_ref.clone()),
        })
        .collect()
}
