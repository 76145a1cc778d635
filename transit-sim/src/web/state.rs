//! Application state for the web layer.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::cache::CachedPathClient;
use crate::engine::PathResult;
use crate::remote::{MockPathService, PathQuery, PathService, RemoteError};
use crate::session::Session;

/// The remote path service this instance defers to, if any.
pub enum RemoteBackend {
    /// Another instance over HTTP, with response caching
    Http(CachedPathClient),
    /// Canned responses (for development and tests)
    Mock(MockPathService),
}

impl PathService for RemoteBackend {
    async fn shortest_path(&self, query: &PathQuery) -> Result<PathResult, RemoteError> {
        match self {
            RemoteBackend::Http(client) => client.shortest_path(query).await,
            RemoteBackend::Mock(mock) => mock.shortest_path(query).await,
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The graph and route coordinator
    pub session: Arc<RwLock<Session>>,

    /// Remote path service
    pub remote: Option<Arc<RemoteBackend>>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(session: Session, remote: Option<RemoteBackend>) -> Self {
        Self {
            session: Arc::new(RwLock::new(session)),
            remote: remote.map(Arc::new),
        }
    }
}
