//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::domain::StopId;
use crate::remote::PathService;
use crate::session::{QueryError, SessionError};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/graph", get(graph))
        .route("/api/status", get(status))
        .route("/api/path", post(compute_path))
        .route("/api/stops/move", post(move_stop))
        .route("/api/stops/reset", post(reset_stops))
        .route("/api/stops/commit", post(commit_stops))
        .route("/api/edges", post(add_edge))
        .route("/api/edges/nearby", post(connect_nearby))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Stops and edges of the current graph.
async fn graph(State(state): State<AppState>) -> Json<GraphResponse> {
    let session = state.session.read().await;
    Json(GraphResponse::from_graph(session.graph(), session.revision()))
}

/// Coordinator phase and the last route.
async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let session = state.session.read().await;
    Json(StatusResponse {
        status: session.status().clone(),
        revision: session.revision(),
        last_result: session.last_result().cloned(),
    })
}

/// Compute a route between two stops.
async fn compute_path(
    State(state): State<AppState>,
    Json(req): Json<RouteRequest>,
) -> Result<Json<RouteResponse>, AppError> {
    let outcome = match req.mode {
        RouteMode::Shortest => {
            // Lock released while the remote answers, so status reads see Computing
            let query = state
                .session
                .write()
                .await
                .begin_route(&req.source, &req.target)?;

            let answer = match state.remote.as_deref() {
                Some(remote) => Some(remote.shortest_path(&query).await),
                None => None,
            };

            state.session.write().await.complete_route(&query, answer)?
        }
        RouteMode::Local => state
            .session
            .write()
            .await
            .compute_local(&req.source, &req.target)?,
        RouteMode::FewestStops => state
            .session
            .write()
            .await
            .compute_fewest_stops(&req.source, &req.target)?,
    };

    Ok(Json(RouteResponse {
        success: true,
        outcome,
    }))
}

/// Move a stop to a new coordinate.
async fn move_stop(
    State(state): State<AppState>,
    Json(req): Json<MoveStopRequest>,
) -> Result<Json<MutationResponse>, AppError> {
    let id = parse_stop(&req.stop)?;
    let mut session = state.session.write().await;
    session.move_stop(&id, req.lat, req.lng)?;

    Ok(Json(MutationResponse {
        success: true,
        changed: 1,
        revision: session.revision(),
    }))
}

/// Restore every stop to the base layout.
async fn reset_stops(State(state): State<AppState>) -> Json<MutationResponse> {
    let mut session = state.session.write().await;
    let changed = session.reset_stop_positions();

    Json(MutationResponse {
        success: true,
        changed,
        revision: session.revision(),
    })
}

/// Make the current positions the base layout.
async fn commit_stops(State(state): State<AppState>) -> Json<MutationResponse> {
    let mut session = state.session.write().await;
    session.commit_stop_positions();

    Json(MutationResponse {
        success: true,
        changed: session.base_layout().len(),
        revision: session.revision(),
    })
}

/// Connect two stops.
async fn add_edge(
    State(state): State<AppState>,
    Json(req): Json<AddEdgeRequest>,
) -> Result<Json<MutationResponse>, AppError> {
    let from = parse_stop(&req.from)?;
    let to = parse_stop(&req.to)?;
    if from == to {
        return Err(AppError::BadRequest {
            message: format!("Cannot connect {from} to itself"),
        });
    }

    let mut session = state.session.write().await;
    let added = session.add_edge(&from, &to, req.weight)?;

    Ok(Json(MutationResponse {
        success: true,
        changed: usize::from(added),
        revision: session.revision(),
    }))
}

/// Connect every pair of stops within a threshold.
async fn connect_nearby(
    State(state): State<AppState>,
    body: Option<Json<NearbyRequest>>,
) -> Result<Json<MutationResponse>, AppError> {
    let req = body.map(|Json(r)| r).unwrap_or_default();
    if let Some(km) = req.threshold_km.filter(|km| !(km.is_finite() && *km >= 0.0)) {
        return Err(AppError::BadRequest {
            message: format!("Invalid threshold: {km}"),
        });
    }

    let mut session = state.session.write().await;
    let changed = session.connect_nearby(req.threshold_km);

    Ok(Json(MutationResponse {
        success: true,
        changed,
        revision: session.revision(),
    }))
}

fn parse_stop(s: &str) -> Result<StopId, AppError> {
    StopId::parse(s).map_err(|e| AppError::BadRequest {
        message: e.to_string(),
    })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<QueryError> for AppError {
    fn from(e: QueryError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::UnknownStop(_) => AppError::NotFound {
                message: e.to_string(),
            },
            SessionError::InvalidCoordinate { .. } | SessionError::InvalidWeight(_) => {
                AppError::BadRequest {
                    message: e.to_string(),
                }
            }
            _ => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        warn!(%status, %message, "Request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
