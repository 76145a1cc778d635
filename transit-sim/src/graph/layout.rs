//! Fallback coordinates and the resettable base layout.

use std::collections::HashMap;
use std::f64::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::domain::{Coord, StopId};

use super::model::Graph;

/// Default seed for fallback jitter.
const DEFAULT_SEED: u64 = 42;

/// Configuration for synthesized stop positions.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Center of the fallback circle.
    pub center: Coord,

    /// Radius of the fallback circle in degrees.
    pub radius_deg: f64,

    /// Lower bound of the radial jitter factor.
    pub jitter_min: f64,

    /// Upper bound of the radial jitter factor.
    pub jitter_max: f64,

    /// Seed for the jitter generator. The same seed always yields the same
    /// layout for the same stop count.
    pub seed: u64,
}

impl LayoutConfig {
    /// Set the circle center.
    pub fn with_center(mut self, center: Coord) -> Self {
        self.center = center;
        self
    }

    /// Set the jitter seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the circle radius in degrees.
    pub fn with_radius(mut self, radius_deg: f64) -> Self {
        self.radius_deg = radius_deg;
        self
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            center: Coord::new(51.5074, -0.1278),
            radius_deg: 0.05, // roughly 5 km
            jitter_min: 0.85,
            jitter_max: 1.15,
            seed: DEFAULT_SEED,
        }
    }
}

/// Generator for fallback positions.
///
/// Stop `index` of `count` sits at `angle = index * 2π / count` on the
/// circle, pushed in or out by a seeded jitter factor.
pub struct FallbackLayout {
    config: LayoutConfig,
    rng: ChaCha8Rng,
}

impl FallbackLayout {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            config: config.clone(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
        }
    }

    /// Position for stop `index` out of `count` stops.
    ///
    /// Each call draws one jitter value, so callers must ask in index order
    /// for the layout to be reproducible.
    pub fn position(&mut self, index: usize, count: usize) -> Coord {
        let count = count.max(1);
        let angle = index as f64 * TAU / count as f64;
        let jitter = self.jitter();
        let r = self.config.radius_deg * jitter;

        let lat = (self.config.center.lat + r * angle.sin()).clamp(-90.0, 90.0);
        let lng = (self.config.center.lng + r * angle.cos()).clamp(-180.0, 180.0);
        Coord::new(lat, lng)
    }

    fn jitter(&mut self) -> f64 {
        let (lo, hi) = (self.config.jitter_min, self.config.jitter_max);
        if lo < hi {
            self.rng.gen_range(lo..=hi)
        } else {
            lo
        }
    }
}

/// Snapshot of stop coordinates that manual repositioning can be reset to.
#[derive(Debug, Clone, Default)]
pub struct BaseLayout {
    coords: HashMap<StopId, Coord>,
}

impl BaseLayout {
    /// Capture the current coordinates of every stop in `graph`.
    pub fn capture(graph: &Graph) -> Self {
        let mut layout = Self::default();
        layout.commit(graph);
        layout
    }

    /// Replace the snapshot with the current coordinates of `graph`.
    pub fn commit(&mut self, graph: &Graph) {
        self.coords = graph
            .stops()
            .iter()
            .map(|s| (s.id.clone(), s.coord))
            .collect();
    }

    /// Move every snapshotted stop back to its saved coordinate.
    ///
    /// Returns the number of stops restored. Stops added after the snapshot
    /// keep their current position.
    pub fn restore(&self, graph: &mut Graph) -> usize {
        let ids: Vec<StopId> = graph.stops().iter().map(|s| s.id.clone()).collect();
        let mut restored = 0;
        for id in ids {
            if let Some(coord) = self.coords.get(&id)
                && graph.move_stop(&id, *coord)
            {
                restored += 1;
            }
        }
        restored
    }

    /// Saved coordinate for a stop.
    pub fn get(&self, id: &StopId) -> Option<Coord> {
        self.coords.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(s: &str) -> StopId {
        StopId::parse(s).unwrap()
    }

    #[test]
    fn same_seed_same_positions() {
        let config = LayoutConfig::default();
        let mut a = FallbackLayout::new(&config);
        let mut b = FallbackLayout::new(&config);
        for i in 0..8 {
            assert_eq!(a.position(i, 8), b.position(i, 8));
        }
    }

    #[test]
    fn different_seed_different_positions() {
        let mut a = FallbackLayout::new(&LayoutConfig::default().with_seed(1));
        let mut b = FallbackLayout::new(&LayoutConfig::default().with_seed(2));
        let pa: Vec<_> = (0..4).map(|i| a.position(i, 4)).collect();
        let pb: Vec<_> = (0..4).map(|i| b.position(i, 4)).collect();
        assert_ne!(pa, pb);
    }

    #[test]
    fn positions_stay_within_jittered_radius() {
        let config = LayoutConfig::default();
        let mut layout = FallbackLayout::new(&config);
        for i in 0..20 {
            let p = layout.position(i, 20);
            assert!(p.is_valid());
            let dx = p.lng - config.center.lng;
            let dy = p.lat - config.center.lat;
            let r = (dx * dx + dy * dy).sqrt();
            assert!(r >= config.radius_deg * config.jitter_min - 1e-9);
            assert!(r <= config.radius_deg * config.jitter_max + 1e-9);
        }
    }

    #[test]
    fn positions_are_distinct() {
        let mut layout = FallbackLayout::new(&LayoutConfig::default());
        let points: Vec<_> = (0..12).map(|i| layout.position(i, 12)).collect();
        for (i, a) in points.iter().enumerate() {
            for b in &points[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn zero_count_does_not_divide_by_zero() {
        let mut layout = FallbackLayout::new(&LayoutConfig::default());
        assert!(layout.position(0, 0).is_valid());
    }

    #[test]
    fn degenerate_jitter_range_uses_lower_bound() {
        let config = LayoutConfig {
            jitter_min: 1.0,
            jitter_max: 1.0,
            ..LayoutConfig::default()
        };
        let mut layout = FallbackLayout::new(&config);
        let p = layout.position(0, 4);
        assert!((p.lng - (config.center.lng + config.radius_deg)).abs() < 1e-12);
        assert!((p.lat - config.center.lat).abs() < 1e-12);
    }

    #[test]
    fn positions_near_pole_are_clamped() {
        let config = LayoutConfig::default()
            .with_center(Coord::new(89.99, 0.0))
            .with_radius(1.0);
        let mut layout = FallbackLayout::new(&config);
        for i in 0..8 {
            assert!(layout.position(i, 8).is_valid());
        }
    }

    #[test]
    fn commit_and_restore() {
        let mut graph = Graph::new();
        graph.add_stop(stop("A"), Coord::new(1.0, 1.0));
        graph.add_stop(stop("B"), Coord::new(2.0, 2.0));

        let mut base = BaseLayout::capture(&graph);
        assert_eq!(base.len(), 2);

        graph.move_stop(&stop("A"), Coord::new(5.0, 5.0));
        assert_eq!(base.restore(&mut graph), 2);
        assert_eq!(graph.stop(&stop("A")).unwrap().coord, Coord::new(1.0, 1.0));

        graph.move_stop(&stop("A"), Coord::new(5.0, 5.0));
        base.commit(&graph);
        graph.move_stop(&stop("A"), Coord::new(7.0, 7.0));
        base.restore(&mut graph);
        assert_eq!(graph.stop(&stop("A")).unwrap().coord, Coord::new(5.0, 5.0));
    }

    #[test]
    fn restore_leaves_new_stops_alone() {
        let mut graph = Graph::new();
        graph.add_stop(stop("A"), Coord::new(1.0, 1.0));
        let base = BaseLayout::capture(&graph);

        graph.add_stop(stop("B"), Coord::new(3.0, 3.0));
        assert_eq!(base.restore(&mut graph), 1);
        assert_eq!(graph.stop(&stop("B")).unwrap().coord, Coord::new(3.0, 3.0));
        assert!(base.get(&stop("B")).is_none());
    }
}
