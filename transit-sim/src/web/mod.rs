//! Web layer for the transit simulator.
//!
//! Serves the graph and the route coordinator over HTTP. The path and graph
//! endpoints speak the same JSON contract the remote client consumes, so
//! one instance can front another.

mod dto;
mod routes;
mod state;


pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppState, RemoteBackend};
