//! Transit graph model and construction.
//!
//! Raw route/node/edge payloads are normalized into a [`Graph`] of stops
//! (insertion-ordered) and undirected weighted edges. Stops lacking real
//! coordinates are placed on a seeded fallback circle.

mod builder;
mod de;
mod input;
mod layout;
mod model;
mod nearby;

pub use builder::{EdgeSource, NodeSource, build_edges, build_graph, build_nodes};
pub use input::{
    EdgeSpec, NetworkError, NodeSpec, RawEdge, RawEdgeObject, RawNetwork, RawNode, RawNodeObject,
    RawRoute, RawRouteObject, RawStopObject, RawStopRef, RouteStop,
};
pub use layout::{BaseLayout, FallbackLayout, LayoutConfig};
pub use model::{Edge, Graph, RouteRef, Stop, WeightSource};
pub use nearby::{DEFAULT_NEARBY_THRESHOLD_KM, NearbyPair, connect_nearby, nearby_pairs};
