//! Vehicle playback along a computed path.
//!
//! A [`Playback`] is a state machine driven by caller-supplied time deltas.
//! It copies what it needs from the graph at creation, so cancelling or
//! dropping it never touches graph or path state.

use serde::Serialize;

use crate::domain::{Coord, StopId};
use crate::engine::{PathResult, Segment, path_segments};
use crate::graph::Graph;

/// Default vehicle speed: 30 km/h.
pub const DEFAULT_SPEED_KM_PER_SEC: f64 = 30.0 / 3600.0;

/// Where along a segment list a given distance falls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentPosition {
    pub segment_index: usize,
    pub from: StopId,
    pub to: StopId,
    /// Progress along the segment in `[0, 1]`.
    pub fraction: f64,
}

/// Locate `distance_covered` km along `segments`.
///
/// A distance landing exactly on a boundary belongs to the earlier segment.
/// Zero-length segments are only ever reported at their start. Distances past
/// the end report the last segment at fraction 1. Returns `None` for an
/// empty segment list.
pub fn position_at(segments: &[Segment], distance_covered: f64) -> Option<SegmentPosition> {
    let last = segments.last()?;
    let mut remaining = distance_covered.max(0.0);

    for (index, segment) in segments.iter().enumerate() {
        let length = segment.distance.max(0.0);
        if remaining <= length {
            let fraction = if length == 0.0 { 0.0 } else { remaining / length };
            return Some(SegmentPosition {
                segment_index: index,
                from: segment.from.clone(),
                to: segment.to.clone(),
                fraction,
            });
        }
        remaining -= length;
    }

    Some(SegmentPosition {
        segment_index: segments.len() - 1,
        from: last.from.clone(),
        to: last.to.clone(),
        fraction: 1.0,
    })
}

/// Playback lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    Playing,
    Paused,
    Finished,
    Cancelled,
}

/// A vehicle position emitted by [`Playback`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Position {
    #[serde(flatten)]
    pub segment: SegmentPosition,
    pub coord: Coord,
    /// Distance travelled so far (km).
    pub distance_covered: f64,
}

/// Timed walk of a vehicle along a path.
#[derive(Debug, Clone)]
pub struct Playback {
    segments: Vec<Segment>,
    /// Endpoint coordinates of each segment, captured at creation.
    ends: Vec<(Coord, Coord)>,
    total_km: f64,
    speed_km_per_sec: f64,
    covered_km: f64,
    state: PlaybackState,
}

impl Playback {
    /// Start playback of `result` over `graph`.
    ///
    /// Returns `None` when the path has no segments or names a stop the
    /// graph does not know. Non-positive or non-finite speeds fall back to
    /// [`DEFAULT_SPEED_KM_PER_SEC`].
    pub fn new(graph: &Graph, result: &PathResult, speed_km_per_sec: f64) -> Option<Self> {
        let segments = path_segments(graph, &result.path);
        if segments.is_empty() {
            return None;
        }

        let ends = segments
            .iter()
            .map(|s| Some((graph.stop(&s.from)?.coord, graph.stop(&s.to)?.coord)))
            .collect::<Option<Vec<_>>>()?;

        let speed_km_per_sec = if speed_km_per_sec.is_finite() && speed_km_per_sec > 0.0 {
            speed_km_per_sec
        } else {
            DEFAULT_SPEED_KM_PER_SEC
        };

        Some(Self {
            total_km: segments.iter().map(|s| s.distance).sum(),
            segments,
            ends,
            speed_km_per_sec,
            covered_km: 0.0,
            state: PlaybackState::Playing,
        })
    }

    /// Move forward by `dt_secs` seconds and report the new position.
    ///
    /// While paused the position does not change. The step that reaches the
    /// end reports the final position and finishes the playback; after that,
    /// and after cancellation, this returns `None`.
    pub fn advance(&mut self, dt_secs: f64) -> Option<Position> {
        match self.state {
            PlaybackState::Finished | PlaybackState::Cancelled => return None,
            PlaybackState::Paused => return self.position(),
            PlaybackState::Playing => {}
        }

        if dt_secs.is_finite() && dt_secs > 0.0 {
            self.covered_km = (self.covered_km + dt_secs * self.speed_km_per_sec).min(self.total_km);
        }

        let position = self.position();
        if self.covered_km >= self.total_km {
            self.state = PlaybackState::Finished;
        }
        position
    }

    /// Current position without advancing. `None` once cancelled.
    pub fn position(&self) -> Option<Position> {
        if self.state == PlaybackState::Cancelled {
            return None;
        }
        let segment = if self.covered_km >= self.total_km {
            position_at(&self.segments, f64::INFINITY)?
        } else {
            position_at(&self.segments, self.covered_km)?
        };
        let (from, to) = self.ends[segment.segment_index];
        Some(Position {
            coord: from.lerp(&to, segment.fraction),
            segment,
            distance_covered: self.covered_km,
        })
    }

    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == PlaybackState::Paused {
            self.state = PlaybackState::Playing;
        }
    }

    /// Stop for good.
    pub fn cancel(&mut self) {
        self.state = PlaybackState::Cancelled;
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn total_km(&self) -> f64 {
        self.total_km
    }

    pub fn remaining_km(&self) -> f64 {
        (self.total_km - self.covered_km).max(0.0)
    }

    /// Seconds left at the current speed.
    pub fn remaining_secs(&self) -> f64 {
        self.remaining_km() / self.speed_km_per_sec
    }

    /// Fraction of the whole path travelled.
    pub fn progress(&self) -> f64 {
        if self.total_km == 0.0 {
            1.0
        } else {
            self.covered_km / self.total_km
        }
    }
}
