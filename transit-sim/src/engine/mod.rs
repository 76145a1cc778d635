//! Shortest-path engine.
//!
//! A deterministic Dijkstra over the transit graph that also records the
//! order in which stops were settled, plus helpers for reconciling path
//! distances and breaking a path into route segments.

mod bfs;
mod dijkstra;
mod reconcile;
mod result;


pub use bfs::fewest_stops_path;
pub use dijkstra::shortest_path;
pub use reconcile::{compute_path_distance, dominant_route, path_segments};
pub use result::{PathResult, Segment};
