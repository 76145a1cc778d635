//! Auto-connecting stops that are close enough to walk between.
//!
//! Some stops sit near each other without any route linking them. This
//! module finds such pairs and adds geographic-weight edges for them.

use crate::domain::StopId;

use super::model::Graph;

/// Default distance below which two stops are auto-connected.
pub const DEFAULT_NEARBY_THRESHOLD_KM: f64 = 0.8;

/// A pair of stops within the threshold distance.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyPair {
    pub from: StopId,
    pub to: StopId,
    pub distance_km: f64,
}

/// All unconnected stop pairs within `threshold_km` of each other.
///
/// Pairs are listed in stop insertion order (`from` always precedes `to`).
pub fn nearby_pairs(graph: &Graph, threshold_km: f64) -> Vec<NearbyPair> {
    let stops = graph.stops();
    let mut pairs = Vec::new();

    for (i, a) in stops.iter().enumerate() {
        for b in &stops[i + 1..] {
            let distance_km = a.coord.distance_km(&b.coord);
            if distance_km > threshold_km {
                continue;
            }
            if graph.edge_between(&a.id, &b.id).is_some() {
                continue;
            }
            pairs.push(NearbyPair {
                from: a.id.clone(),
                to: b.id.clone(),
                distance_km,
            });
        }
    }

    pairs
}

/// Connect every unconnected pair within `threshold_km`.
///
/// New edges carry geographic weights. Returns the number of edges added.
pub fn connect_nearby(graph: &mut Graph, threshold_km: f64) -> usize {
    nearby_pairs(graph, threshold_km)
        .into_iter()
        .filter(|pair| graph.add_edge(&pair.from, &pair.to, None))
        .count()
}
