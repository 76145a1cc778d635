//! Session error types.

use crate::domain::StopId;
use crate::graph::NetworkError;
use crate::remote::RemoteError;

/// A path query rejected before any computation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    #[error("source stop is required")]
    MissingSource,

    #[error("target stop is required")]
    MissingTarget,

    #[error("source and target are the same stop: {0}")]
    SameStop(StopId),

    #[error("unknown stop: {0}")]
    UnknownStop(StopId),
}

/// Errors from graph-changing session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("unknown stop: {0}")]
    UnknownStop(StopId),

    #[error("invalid coordinate: lat {lat}, lng {lng}")]
    InvalidCoordinate { lat: f64, lng: f64 },

    #[error("invalid edge weight: {0}")]
    InvalidWeight(f64),

    #[error("graph service failed: {0}")]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Network(#[from] NetworkError),
}
