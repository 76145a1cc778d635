//! Domain types for the transit network.
//!
//! Stops are identified by validated names and located by coordinates.
//! Both types enforce their invariants at construction time.

mod coord;
mod stop;

pub use coord::Coord;
pub use stop::{InvalidStopId, StopId};
