//! Dijkstra shortest path with a settlement trace.
//!
//! Selection is by minimum tentative distance with ties broken by stop
//! insertion order, so identical graphs always settle stops in the same
//! order. A binary heap with lazy deletion stands in for the linear scan;
//! ordering heap entries by `(distance, index)` keeps the same tie-break.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;
use tracing::{debug, trace};

use crate::domain::StopId;
use crate::graph::Graph;

use super::result::PathResult;

#[derive(Copy, Clone, Eq, PartialEq)]
struct State {
    cost: OrderedFloat<f64>,
    node: usize,
}

// Min-heap by cost, then by insertion index (reversed from standard Rust BinaryHeap)
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Shortest path from `source` to `target`.
///
/// Returns the "no path" result when either stop is missing from the graph
/// or the target is unreachable. The target, once reached, is the last
/// entry of the settlement order.
pub fn shortest_path(graph: &Graph, source: &StopId, target: &StopId) -> PathResult {
    let (Some(src), Some(dst)) = (graph.index_of(source), graph.index_of(target)) else {
        debug!(%source, %target, "Source or target not in graph");
        return PathResult::no_path(Vec::new());
    };

    let n = graph.len();
    let mut dist = vec![f64::INFINITY; n];
    let mut prev: Vec<Option<usize>> = vec![None; n];
    let mut settled = vec![false; n];
    let mut order: Vec<usize> = Vec::new();
    let mut heap = BinaryHeap::new();

    dist[src] = 0.0;
    heap.push(State {
        cost: OrderedFloat(0.0),
        node: src,
    });

    while let Some(State { cost, node }) = heap.pop() {
        // Skip stale entries
        if settled[node] || cost.0 > dist[node] {
            continue;
        }

        settled[node] = true;
        order.push(node);
        trace!(stop = %graph.stops()[node].id, distance = cost.0, "Settled stop");

        if node == dst {
            break;
        }

        for (next, weight) in graph.neighbors(node) {
            if settled[next] {
                continue;
            }
            let next_cost = cost.0 + weight;
            if next_cost < dist[next] {
                dist[next] = next_cost;
                prev[next] = Some(node);
                heap.push(State {
                    cost: OrderedFloat(next_cost),
                    node: next,
                });
            }
        }
    }

    let settled_order = ids(graph, &order);

    if dist[dst].is_infinite() {
        debug!(%source, %target, settled = settled_order.len(), "Target unreachable");
        return PathResult::no_path(settled_order);
    }

    let mut path = vec![dst];
    let mut current = dst;
    while let Some(p) = prev[current] {
        path.push(p);
        current = p;
    }
    path.reverse();

    PathResult {
        path: ids(graph, &path),
        settled_order,
        distance: Some(dist[dst]),
    }
}

fn ids(graph: &Graph, indices: &[usize]) -> Vec<StopId> {
    let stops = graph.stops();
    indices.iter().map(|&i| stops[i].id.clone()).collect()
}
