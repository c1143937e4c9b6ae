//! `WorldModel` — the snapshot every state node steps against.

use rov_core::{Point, SimTime};

use crate::polar::PolarMap;
use crate::radar::RadarMap;
use crate::status::{LabelMarker, RobotStatus};

/// Everything a state node may read during one reaction: latched status,
/// radar snapshot, the polar map derived for this inference, and the
/// detected labels.
///
/// The agent builds one at latch and hands out immutable borrows; nothing
/// here mutates during a `step`.
#[derive(Clone, Debug)]
pub struct WorldModel {
    pub status:  RobotStatus,
    pub radar:   RadarMap,
    /// Derived at inference; `None` between latch and inference.
    pub polar:   Option<PolarMap>,
    pub markers: Vec<LabelMarker>,
}

impl WorldModel {
    pub fn new(status: RobotStatus, radar: RadarMap, markers: Vec<LabelMarker>) -> Self {
        Self { status, radar, polar: None, markers }
    }

    /// Simulation time of the latched status.
    #[inline]
    pub fn time(&self) -> SimTime {
        self.status.time
    }

    /// The marker nearest to `from`, if any.
    pub fn nearest_marker(&self, from: Point) -> Option<&LabelMarker> {
        self.markers
            .iter()
            .min_by(|a, b| from.distance(a.location).total_cmp(&from.distance(b.location)))
    }

    /// `true` if any marker lies within `max_distance` of `from`.
    pub fn has_marker_within(&self, from: Point, max_distance: f64) -> bool {
        self.markers.iter().any(|m| from.distance(m.location) <= max_distance)
    }
}
