//! Coordinator phase and route provenance.

use serde::Serialize;

use crate::engine::{PathResult, Segment};
use crate::graph::RouteRef;

/// Where the coordinator is in answering a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Computing,
    Found,
    NotFound,
    Error,
}

/// Current phase plus a human-readable message for the UI.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Status {
    pub phase: Phase,
    pub message: Option<String>,
}

impl Status {
    pub(super) fn new(phase: Phase, message: impl Into<String>) -> Self {
        Self {
            phase,
            message: Some(message.into()),
        }
    }

    pub(super) fn idle() -> Self {
        Self::default()
    }
}

/// Which engine produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteSource {
    Remote,
    Local,
}

/// A path result together with its breakdown and provenance.
///
/// The shape is the same whichever engine answered.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteOutcome {
    #[serde(flatten)]
    pub result: PathResult,

    pub segments: Vec<Segment>,

    /// The route covering the most segments of the path.
    pub route: Option<RouteRef>,

    pub source: RouteSource,

    /// Why the remote answer was not used, if it was attempted.
    pub fallback_reason: Option<String>,
}

impl RouteOutcome {
    pub fn is_found(&self) -> bool {
        self.result.is_found()
    }
}
