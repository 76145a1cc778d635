//! Path distance reconciliation.
//!
//! Recomputes a path's length from the graph. Used to check or fill in
//! distances for paths that came from somewhere other than the local
//! engine, whose connectivity assumptions may differ from ours.

use crate::domain::StopId;
use crate::graph::{Graph, RouteRef};

use super::result::Segment;

/// Total distance of `path` in kilometers.
///
/// Each consecutive pair contributes its edge weight if an edge joins them,
/// otherwise the great-circle distance between the stops. Pairs involving
/// a stop the graph does not know contribute nothing. Paths with fewer
/// than two stops have distance 0.
pub fn compute_path_distance(graph: &Graph, path: &[StopId]) -> f64 {
    path.windows(2)
        .map(|pair| pair_distance(graph, &pair[0], &pair[1]).0)
        .sum()
}

/// Per-pair breakdown of `path`, with the route of each edge used.
pub fn path_segments(graph: &Graph, path: &[StopId]) -> Vec<Segment> {
    path.windows(2)
        .map(|pair| {
            let (distance, route, via_edge) = pair_distance(graph, &pair[0], &pair[1]);
            Segment {
                from: pair[0].clone(),
                to: pair[1].clone(),
                distance,
                route,
                via_edge,
            }
        })
        .collect()
}

fn pair_distance(graph: &Graph, a: &StopId, b: &StopId) -> (f64, Option<RouteRef>, bool) {
    if let Some(edge) = graph.edge_between(a, b) {
        return (edge.weight, edge.route.clone(), true);
    }
    match (graph.stop(a), graph.stop(b)) {
        (Some(sa), Some(sb)) => (sa.coord.distance_km(&sb.coord), None, false),
        _ => (0.0, None, false),
    }
}

/// The route used by the most segments; ties go to the route seen first.
///
/// Routes are compared by id when they have one, by name otherwise.
pub fn dominant_route(segments: &[Segment]) -> Option<RouteRef> {
    let mut votes: Vec<(RouteRef, usize)> = Vec::new();

    for route in segments.iter().filter_map(|s| s.route.as_ref()) {
        match votes.iter_mut().find(|(r, _)| same_route(r, route)) {
            Some((_, count)) => *count += 1,
            None => votes.push((route.clone(), 1)),
        }
    }

    let mut best: Option<(RouteRef, usize)> = None;
    for (route, count) in votes {
        if best.as_ref().is_none_or(|(_, top)| count > *top) {
            best = Some((route, count));
        }
    }
    best.map(|(route, _)| route)
}

fn same_route(a: &RouteRef, b: &RouteRef) -> bool {
    match (&a.id, &b.id) {
        (Some(x), Some(y)) => x == y,
        (None, None) => a.name == b.name,
        _ => false,
    }
}
