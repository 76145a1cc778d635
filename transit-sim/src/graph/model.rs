//! The in-memory transit graph.
//!
//! Stops keep their insertion order, which is the tie-break order used by
//! the shortest-path engine. Edges are undirected and unique per unordered
//! pair of stops.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::domain::{Coord, StopId};

/// Where an edge's weight came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightSource {
    /// Supplied by the input data; frozen when stops move.
    Explicit,
    /// Derived from the endpoints' coordinates; re-derived when stops move.
    Geographic,
}

/// The route an edge was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RouteRef {
    pub id: Option<String>,
    pub name: Option<String>,
}

impl RouteRef {
    pub fn new(id: Option<String>, name: Option<String>) -> Self {
        Self { id, name }
    }

    /// Returns true if neither an id nor a name is known.
    pub fn is_anonymous(&self) -> bool {
        self.id.is_none() && self.name.is_none()
    }
}

/// A stop in the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub id: StopId,
    pub coord: Coord,
}

/// An undirected weighted connection between two stops.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub from: StopId,
    pub to: StopId,
    /// Weight in kilometers.
    pub weight: f64,
    pub source: WeightSource,
    pub route: Option<RouteRef>,
}

impl Edge {
    /// Returns true if this edge joins `a` and `b`, in either direction.
    pub fn connects(&self, a: &StopId, b: &StopId) -> bool {
        (&self.from == a && &self.to == b) || (&self.from == b && &self.to == a)
    }

    /// Returns the endpoint opposite `stop`, if `stop` is an endpoint.
    pub fn other(&self, stop: &StopId) -> Option<&StopId> {
        if &self.from == stop {
            Some(&self.to)
        } else if &self.to == stop {
            Some(&self.from)
        } else {
            None
        }
    }
}

/// Index-based edge record; `a` and `b` index into `Graph::stops`.
#[derive(Debug, Clone, Copy)]
struct Link {
    a: usize,
    b: usize,
}

/// Stops in insertion order plus undirected, deduplicated edges.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    stops: Vec<Stop>,
    index: HashMap<StopId, usize>,
    edges: Vec<Edge>,
    links: Vec<Link>,
    /// Normalized `(min, max)` stop index pairs, for dedup.
    pairs: HashSet<(usize, usize)>,
    /// Incident edge indices per stop, in edge insertion order.
    adjacency: Vec<Vec<usize>>,
}

impl Graph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stop. Returns false if a stop with this id already exists.
    pub fn add_stop(&mut self, id: StopId, coord: Coord) -> bool {
        if self.index.contains_key(&id) {
            return false;
        }
        let idx = self.stops.len();
        self.index.insert(id.clone(), idx);
        self.stops.push(Stop { id, coord });
        self.adjacency.push(Vec::new());
        true
    }

    /// Add an edge between two existing stops.
    ///
    /// With `weight: None` the weight is the great-circle distance between
    /// the endpoints. Returns false (and changes nothing) if either endpoint
    /// is unknown, the endpoints are the same stop, the pair is already
    /// connected, or the weight is negative or not finite.
    pub fn add_edge(&mut self, from: &StopId, to: &StopId, weight: Option<f64>) -> bool {
        self.add_edge_on_route(from, to, weight, None)
    }

    /// Like [`Graph::add_edge`], recording the route the edge belongs to.
    pub fn add_edge_on_route(
        &mut self,
        from: &StopId,
        to: &StopId,
        weight: Option<f64>,
        route: Option<RouteRef>,
    ) -> bool {
        let (Some(a), Some(b)) = (self.index_of(from), self.index_of(to)) else {
            return false;
        };
        if a == b || self.pairs.contains(&pair_key(a, b)) {
            return false;
        }

        let (weight, source) = match weight {
            Some(w) if w.is_finite() && w >= 0.0 => (w, WeightSource::Explicit),
            Some(_) => return false,
            None => (
                self.stops[a].coord.distance_km(&self.stops[b].coord),
                WeightSource::Geographic,
            ),
        };

        let edge_idx = self.edges.len();
        self.edges.push(Edge {
            from: self.stops[a].id.clone(),
            to: self.stops[b].id.clone(),
            weight,
            source,
            route: route.filter(|r| !r.is_anonymous()),
        });
        self.links.push(Link { a, b });
        self.pairs.insert(pair_key(a, b));
        self.adjacency[a].push(edge_idx);
        self.adjacency[b].push(edge_idx);
        true
    }

    /// Overwrite a stop's coordinate.
    ///
    /// Geographic weights of incident edges are re-derived from the new
    /// position; explicit weights are left untouched. Returns false if the
    /// stop is unknown.
    pub fn move_stop(&mut self, id: &StopId, coord: Coord) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        self.stops[idx].coord = coord;
        self.rederive_weights(idx);
        true
    }

    fn rederive_weights(&mut self, stop_idx: usize) {
        for &edge_idx in &self.adjacency[stop_idx] {
            let edge = &mut self.edges[edge_idx];
            if edge.source != WeightSource::Geographic {
                continue;
            }
            let Link { a, b } = self.links[edge_idx];
            edge.weight = self.stops[a].coord.distance_km(&self.stops[b].coord);
        }
    }

    /// Position of a stop in insertion order.
    pub fn index_of(&self, id: &StopId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Returns true if the stop exists.
    pub fn contains(&self, id: &StopId) -> bool {
        self.index.contains_key(id)
    }

    /// Look up a stop by id.
    pub fn stop(&self, id: &StopId) -> Option<&Stop> {
        self.index_of(id).map(|idx| &self.stops[idx])
    }

    /// Look up a stop by insertion index.
    pub fn stop_at(&self, idx: usize) -> Option<&Stop> {
        self.stops.get(idx)
    }

    /// All stops in insertion order.
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// The edge joining two stops, if any.
    pub fn edge_between(&self, a: &StopId, b: &StopId) -> Option<&Edge> {
        let (a, b) = (self.index_of(a)?, self.index_of(b)?);
        self.adjacency[a]
            .iter()
            .map(|&edge_idx| (edge_idx, self.links[edge_idx]))
            .find(|(_, link)| (link.a == a && link.b == b) || (link.a == b && link.b == a))
            .map(|(edge_idx, _)| &self.edges[edge_idx])
    }

    /// Neighbours of the stop at `idx` with the connecting weight, in edge
    /// insertion order.
    pub fn neighbors(&self, idx: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.adjacency
            .get(idx)
            .into_iter()
            .flatten()
            .map(move |&edge_idx| {
                let link = self.links[edge_idx];
                let other = if link.a == idx { link.b } else { link.a };
                (other, self.edges[edge_idx].weight)
            })
    }

    /// Number of stops.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Returns true if the graph has no stops.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

fn pair_key(a: usize, b: usize) -> (usize, usize) {
    if a <= b { (a, b) } else { (b, a) }
}
