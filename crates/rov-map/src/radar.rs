//! `RadarMap` — the dense occupancy grid fed by the ultrasonic sensor.
//!
//! # Update model
//!
//! Each status message carries one sensor ping (pose + echo distance).  The
//! cells along the beam strictly before the echo are observed `Empty`, the
//! cell containing the echo becomes `Hindered`, and everything behind the
//! echo stays untouched.  Per-cell stamps are monotonic in simulation time
//! (see [`MapCell::observe`]), so replayed messages are idempotent and
//! backward time never corrupts the map.
//!
//! # Obstacle index
//!
//! An `rstar` R-tree over hindered cell centres is maintained incrementally
//! alongside the grid.  All clearance queries (`safe_sectors`,
//! `free_trajectory`, `nearest_hindered_distance`) go through the tree, which
//! keeps them cheap even while the RRT probes hundreds of candidate edges per
//! inference.

use rstar::primitives::GeomWithData;
use rstar::{AABB, RTree};
use tracing::warn;

use rov_core::{Complex, GridTopology, Point, SimDuration, SimTime};

use crate::cell::{CellState, MapCell};

/// Half-angle of the candidate cone used by [`RadarMap::find_safe_target`].
const TARGET_CONE_RAD: f64 = std::f64::consts::FRAC_PI_4;

type HinderedEntry = GeomWithData<[f64; 2], usize>;

/// One ultrasonic observation: sensor pose, echo and range.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensorPing {
    /// Simulation time of the observation.
    pub time: SimTime,
    /// Sensor location in the global frame.
    pub location: Point,
    /// Absolute beam direction.
    pub direction: Complex,
    /// Echo distance in metres; `0` means no echo within range.
    pub echo_distance: f64,
    /// Maximum sensor range in metres.
    pub max_distance: f64,
}

/// The dense occupancy grid plus its hindered-cell index.
#[derive(Clone)]
pub struct RadarMap {
    topology: GridTopology,
    cells:    Vec<MapCell>,
    hindered: RTree<HinderedEntry>,
}

impl RadarMap {
    /// Create an all-unknown map over `topology`.
    pub fn new(topology: GridTopology) -> Self {
        let cells = vec![MapCell::UNKNOWN; topology.cell_count()];
        Self { topology, cells, hindered: RTree::new() }
    }

    #[inline]
    pub fn topology(&self) -> &GridTopology {
        &self.topology
    }

    #[inline]
    pub fn cell(&self, index: usize) -> &MapCell {
        &self.cells[index]
    }

    /// State of the cell containing `point`; out-of-grid points read as
    /// unknown.
    pub fn state_at(&self, point: Point) -> CellState {
        match self.topology.index_of(point) {
            Some(i) => self.cells[i].state,
            None => CellState::Unknown,
        }
    }

    /// Number of cells currently hindered.
    pub fn hindered_count(&self) -> usize {
        self.hindered.size()
    }

    // ── Updates ───────────────────────────────────────────────────────────

    /// Apply one sensor ping.  Never fails: malformed input is logged and
    /// dropped.
    pub fn update(&mut self, ping: &SensorPing) {
        if !ping.location.is_finite()
            || !ping.echo_distance.is_finite()
            || ping.echo_distance < 0.0
            || !(ping.max_distance.is_finite() && ping.max_distance > 0.0)
        {
            warn!(?ping, "dropping malformed sensor ping");
            return;
        }

        let has_echo = ping.echo_distance > 0.0 && ping.echo_distance <= ping.max_distance;
        let echo_index = if has_echo {
            self.topology.index_of(ping.location.translate(ping.direction, ping.echo_distance))
        } else {
            None
        };

        // Observe the beam in half-cell steps so no crossed cell is skipped.
        let range = if has_echo { ping.echo_distance } else { ping.max_distance };
        let step = self.topology.grid_size() * 0.5;
        let mut d = 0.0;
        while d < range {
            let p = ping.location.translate(ping.direction, d);
            if let Some(i) = self.topology.index_of(p) {
                if Some(i) != echo_index {
                    self.observe(i, CellState::Empty, ping.time);
                }
            }
            d += step;
        }
        if let Some(i) = echo_index {
            self.observe(i, CellState::Hindered, ping.time);
        }
    }

    /// Drop all observations, reverting every cell to unknown.
    pub fn clean(&mut self) {
        for cell in &mut self.cells {
            cell.clean();
        }
        self.hindered = RTree::new();
    }

    /// Revert cells whose observation is older than `persistence` to
    /// unknown, keeping the map honest while the robot lingers.
    pub fn decay(&mut self, now: SimTime, persistence: SimDuration) {
        for i in 0..self.cells.len() {
            let stale = match self.cells[i].echo_time {
                Some(stamp) => now.saturating_since(stamp) > persistence,
                None => false,
            };
            if stale {
                if self.cells[i].is_hindered() {
                    self.remove_hindered(i);
                }
                self.cells[i].clean();
            }
        }
    }

    fn observe(&mut self, index: usize, state: CellState, time: SimTime) {
        let was_hindered = self.cells[index].is_hindered();
        if !self.cells[index].observe(state, time) {
            return;
        }
        match (was_hindered, self.cells[index].is_hindered()) {
            (false, true) => {
                let p = self.topology.point_at(index);
                self.hindered.insert(HinderedEntry::new([p.x, p.y], index));
            }
            (true, false) => self.remove_hindered(index),
            _ => {}
        }
    }

    fn remove_hindered(&mut self, index: usize) {
        let p = self.topology.point_at(index);
        self.hindered.remove(&HinderedEntry::new([p.x, p.y], index));
    }

    // ── Clearance queries ─────────────────────────────────────────────────

    /// Distance from `point` to the nearest hindered cell centre, or `None`
    /// on a map without obstacles.
    pub fn nearest_hindered_distance(&self, point: Point) -> Option<f64> {
        self.hindered
            .nearest_neighbor(&[point.x, point.y])
            .map(|e| point.distance(Point::new(e.geom()[0], e.geom()[1])))
    }

    /// `true` if no hindered cell lies within `safety_distance` of `point`.
    pub fn is_safe(&self, point: Point, safety_distance: f64) -> bool {
        match self.nearest_hindered_distance(point) {
            Some(d) => d >= safety_distance,
            None => true,
        }
    }

    /// Indices whose nearest hindered cell is at least `safety_distance`
    /// away — the Minkowski-expanded free space.
    pub fn safe_sectors(&self, safety_distance: f64) -> Vec<usize> {
        (0..self.cells.len())
            .filter(|&i| self.is_safe(self.topology.point_at(i), safety_distance))
            .collect()
    }

    /// `true` if no hindered cell lies within `safety_distance` of the
    /// segment `a`–`b`.
    pub fn free_trajectory(&self, a: Point, b: Point, safety_distance: f64) -> bool {
        let envelope = AABB::from_corners(
            [a.x.min(b.x) - safety_distance, a.y.min(b.y) - safety_distance],
            [a.x.max(b.x) + safety_distance, a.y.max(b.y) + safety_distance],
        );
        self.hindered
            .locate_in_envelope_intersecting(&envelope)
            .all(|e| {
                Point::new(e.geom()[0], e.geom()[1]).distance_to_segment(a, b) >= safety_distance
            })
    }

    /// Walkable 8-connected neighbours of the cell containing `point`:
    /// not hindered, clear by `safety_distance`, and accepted by `filter`.
    pub fn neighbour_indices(
        &self,
        point: Point,
        safety_distance: f64,
        filter: impl Fn(usize) -> bool,
    ) -> Vec<usize> {
        let Some(index) = self.topology.index_of(point) else {
            return Vec::new();
        };
        self.topology
            .adjacent_indices(index)
            .into_iter()
            .filter(|&i| !self.cells[i].is_hindered())
            .filter(|&i| self.is_safe(self.topology.point_at(i), safety_distance))
            .filter(|&i| filter(i))
            .collect()
    }

    // ── Region queries ────────────────────────────────────────────────────

    /// Empty cells bordering the unknown region — the exploration frontier.
    /// Ascending index order.
    pub fn unknown_contour(&self) -> Vec<usize> {
        (0..self.cells.len())
            .filter(|&i| self.cells[i].is_empty())
            .filter(|&i| {
                self.topology
                    .adjacent_indices(i)
                    .into_iter()
                    .any(|n| self.cells[n].is_unknown())
            })
            .collect()
    }

    /// The empty cell with the oldest stamp within `max_distance` of
    /// `center` — where the map most needs a refresh.  Ties break on the
    /// lower index.
    pub fn oldest_empty_cell(&self, center: Point, max_distance: f64) -> Option<usize> {
        (0..self.cells.len())
            .filter(|&i| self.cells[i].is_empty())
            .filter(|&i| self.topology.point_at(i).distance(center) <= max_distance)
            .min_by_key(|&i| (self.cells[i].echo_time, i))
    }

    /// The best safe point along `direction`: an empty cell between
    /// `min_distance` and `max_distance` from `from`, within ±45° of the
    /// direction, clear by `min_distance`, and reachable on a free
    /// trajectory.  "Best" is the closest such point, which keeps escape
    /// moves short; ties break on the lower index.
    pub fn find_safe_target(
        &self,
        from: Point,
        direction: Complex,
        min_distance: f64,
        max_distance: f64,
    ) -> Option<Point> {
        (0..self.cells.len())
            .filter(|&i| self.cells[i].is_empty())
            .map(|i| (i, self.topology.point_at(i)))
            .filter(|&(_, p)| {
                let d = from.distance(p);
                d >= min_distance && d <= max_distance
            })
            .filter(|&(_, p)| Complex::direction(from, p).is_close_to(direction, TARGET_CONE_RAD))
            .filter(|&(_, p)| self.is_safe(p, min_distance))
            .filter(|&(_, p)| self.free_trajectory(from, p, min_distance))
            .min_by(|&(i, p), &(j, q)| {
                from.distance(p)
                    .total_cmp(&from.distance(q))
                    .then(i.cmp(&j))
            })
            .map(|(_, p)| p)
    }

    /// Centres of all hindered cells.
    pub fn hindered_points(&self) -> Vec<Point> {
        (0..self.cells.len())
            .filter(|&i| self.cells[i].is_hindered())
            .map(|i| self.topology.point_at(i))
            .collect()
    }

    /// Centres of all empty cells.
    pub fn empty_points(&self) -> Vec<Point> {
        (0..self.cells.len())
            .filter(|&i| self.cells[i].is_empty())
            .map(|i| self.topology.point_at(i))
            .collect()
    }
}

impl std::fmt::Debug for RadarMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RadarMap")
            .field("cells", &self.cells.len())
            .field("hindered", &self.hindered.size())
            .finish()
    }
}
