//! Transit network simulator.
//!
//! Builds a weighted stop graph from route, node and edge data, answers
//! shortest-path queries with a deterministic Dijkstra that records its
//! settlement order, and falls back to that local engine whenever a remote
//! path service cannot answer.

pub mod cache;
pub mod domain;
pub mod engine;
pub mod geo;
pub mod graph;
pub mod playback;
pub mod remote;
pub mod session;
pub mod web;
