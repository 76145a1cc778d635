//! Remote path and graph services.
//!
//! An HTTP client for another transit-sim instance (or anything speaking
//! the same JSON contract), the traits the route coordinator uses to talk
//! to it, and a mock for tests and offline use.

mod client;
mod error;
mod mock;
mod service;
mod types;

pub use client::{RemoteClient, RemoteConfig};
pub use error::RemoteError;
pub use mock::MockPathService;
pub use service::{GraphService, PathQuery, PathService};
pub use types::{PathRequest, PathResponse};
