//! Session configuration.

use crate::graph::{DEFAULT_NEARBY_THRESHOLD_KM, LayoutConfig};

/// Configuration for a [`Session`](super::Session).
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Placement of stops without coordinates.
    pub layout: LayoutConfig,

    /// Distance under which `connect_nearby` joins two stops (km).
    pub nearby_threshold_km: f64,

    /// Relative tolerance when checking a remote distance against the
    /// reconciled one.
    pub distance_tolerance: f64,
}

impl SessionConfig {
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_nearby_threshold(mut self, km: f64) -> Self {
        self.nearby_threshold_km = km;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            nearby_threshold_km: DEFAULT_NEARBY_THRESHOLD_KM,
            distance_tolerance: 1e-6,
        }
    }
}
