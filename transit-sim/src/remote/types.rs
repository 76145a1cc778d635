//! Wire types for the remote path service.
//!
//! The service accepts `{source, target}` and answers with the path result
//! fields at the top level, optionally alongside a `success` flag or an
//! `error` message.

use serde::{Deserialize, Serialize};

use crate::domain::StopId;
use crate::engine::PathResult;

use super::error::RemoteError;

/// Body of a path request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathRequest {
    #[serde(alias = "start")]
    pub source: StopId,

    #[serde(alias = "end")]
    pub target: StopId,
}

impl PathRequest {
    pub fn new(source: StopId, target: StopId) -> Self {
        Self { source, target }
    }
}

/// Body of a path response.
#[derive(Debug, Clone, Deserialize)]
pub struct PathResponse {
    /// Explicit failure flag; absent means success
    #[serde(default)]
    pub success: Option<bool>,

    #[serde(default)]
    pub error: Option<String>,

    /// Required on success. A body without it does not match the contract.
    #[serde(default)]
    pub path: Option<Vec<StopId>>,

    #[serde(default, alias = "settled_order", rename = "settledOrder")]
    pub settled_order: Vec<StopId>,

    #[serde(default)]
    pub distance: Option<f64>,
}

impl PathResponse {
    /// The error reported by the service, if it reported one.
    pub fn failure(&self) -> Option<String> {
        match (&self.error, self.success) {
            (Some(msg), _) => Some(msg.clone()),
            (None, Some(false)) => Some("service reported failure".to_string()),
            _ => None,
        }
    }

    /// Convert to a path result.
    ///
    /// Fails when the body carries no `path`, since an empty object would
    /// otherwise read as "no path exists".
    pub fn into_result(self) -> Result<PathResult, RemoteError> {
        let Some(path) = self.path else {
            return Err(RemoteError::Json {
                message: "missing field `path`".to_string(),
                body: None,
            });
        };
        Ok(PathResult {
            path,
            settled_order: self.settled_order,
            distance: self.distance,
        })
    }
}
