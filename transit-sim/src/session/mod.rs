//! Session state and the remote/local route coordinator.
//!
//! A [`Session`] owns the in-memory graph. Route queries go to a remote
//! [`PathService`](crate::remote::PathService) when one is supplied and
//! fall back to the local engine on any remote failure, so callers always
//! get the same result shape.

mod config;
mod coordinator;
mod error;
mod status;

#[cfg(test)]
mod session_tests;

pub use config::SessionConfig;
pub use coordinator::Session;
pub use error::{QueryError, SessionError};
pub use status::{Phase, RouteOutcome, RouteSource, Status};
