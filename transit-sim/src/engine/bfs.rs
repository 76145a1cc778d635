//! Fewest-stops path by breadth-first search.
//!
//! Ignores weights when choosing the path; the reported distance is the
//! reconciled distance of the chosen path. Neighbours are visited in edge
//! insertion order, so results are deterministic.

use std::collections::VecDeque;

use crate::domain::StopId;
use crate::graph::Graph;

use super::reconcile::compute_path_distance;
use super::result::PathResult;

/// Path from `source` to `target` with the fewest hops.
///
/// `settled_order` holds stops in the order they were dequeued.
pub fn fewest_stops_path(graph: &Graph, source: &StopId, target: &StopId) -> PathResult {
    let (Some(src), Some(dst)) = (graph.index_of(source), graph.index_of(target)) else {
        return PathResult::no_path(Vec::new());
    };

    let n = graph.len();
    let mut prev: Vec<Option<usize>> = vec![None; n];
    let mut visited = vec![false; n];
    let mut order = Vec::new();
    let mut queue = VecDeque::from([src]);
    visited[src] = true;

    while let Some(node) = queue.pop_front() {
        order.push(graph.stops()[node].id.clone());
        if node == dst {
            break;
        }
        for (next, _) in graph.neighbors(node) {
            if !visited[next] {
                visited[next] = true;
                prev[next] = Some(node);
                queue.push_back(next);
            }
        }
    }

    if !visited[dst] {
        return PathResult::no_path(order);
    }

    let mut path = vec![graph.stops()[dst].id.clone()];
    let mut current = dst;
    while let Some(p) = prev[current] {
        path.push(graph.stops()[p].id.clone());
        current = p;
    }
    path.reverse();

    let distance = compute_path_distance(graph, &path);
    PathResult {
        path,
        settled_order: order,
        distance: Some(distance),
    }
}
