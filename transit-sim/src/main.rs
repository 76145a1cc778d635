use std::net::SocketAddr;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use transit_sim::cache::{CacheConfig, CachedPathClient};
use transit_sim::graph::RawNetwork;
use transit_sim::remote::{RemoteClient, RemoteConfig};
use transit_sim::session::{Session, SessionConfig};
use transit_sim::web::{AppState, RemoteBackend, create_router};

/// Default listen address.
const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Optional remote path service
    let remote = std::env::var("TRANSIT_SIM_REMOTE_URL").ok().map(|url| {
        let mut config = RemoteConfig::new(url);
        if let Ok(key) = std::env::var("TRANSIT_SIM_REMOTE_KEY") {
            config = config.with_api_key(key);
        }
        let client = RemoteClient::new(config).expect("Failed to create remote client");
        CachedPathClient::new(client, &CacheConfig::default())
    });

    let mut session = Session::new(SessionConfig::default());

    // Network: local file first, then the remote graph service
    match std::env::var("TRANSIT_SIM_NETWORK") {
        Ok(path) => {
            let network = RawNetwork::load(&path).expect("Failed to load network file");
            session.load_network(&network);
        }
        Err(_) => match &remote {
            Some(remote) => {
                if let Err(e) = session.refresh_from(remote).await {
                    warn!(error = %e, "Starting with an empty graph");
                }
            }
            None => warn!("TRANSIT_SIM_NETWORK not set. Starting with an empty graph."),
        },
    }

    info!(
        stops = session.graph().len(),
        edges = session.graph().edge_count(),
        "Graph ready"
    );

    let state = AppState::new(session, remote.map(RemoteBackend::Http));
    let app = create_router(state);

    let addr: SocketAddr = std::env::var("TRANSIT_SIM_ADDR")
        .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
        .parse()
        .expect("Invalid TRANSIT_SIM_ADDR");

    info!("Transit simulator listening on http://{addr}");
    info!("API Endpoints:");
    info!("  GET  /health           - Health check");
    info!("  GET  /api/graph        - Stops and edges");
    info!("  GET  /api/status       - Route status");
    info!("  POST /api/path         - Compute a route");
    info!("  POST /api/stops/move   - Move a stop");
    info!("  POST /api/stops/reset  - Restore base layout");
    info!("  POST /api/stops/commit - Save base layout");
    info!("  POST /api/edges        - Add an edge");
    info!("  POST /api/edges/nearby - Connect nearby stops");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind");
    axum::serve(listener, app).await.expect("Server error");
}
