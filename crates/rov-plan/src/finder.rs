//! The discretised free-configuration space over the radar grid, its goal
//! recipes, and the budgeted search driver.

use std::time::{Duration, Instant};

use rustc_hash::FxHashSet;
use tracing::debug;

use rov_core::{AreaExpr, PlannerRng, Point};
use rov_map::RadarMap;

use crate::optimize::optimize_path;
use crate::rrt::{Rrt, RrtSpace};

// ── GoalSet ───────────────────────────────────────────────────────────────────

/// Where a grid search wants to arrive.
#[derive(Clone, Debug)]
pub enum GoalSet {
    /// Any configuration inside the area expression.
    Area(AreaExpr),
    /// Any of an explicit set of grid cells.
    Cells(FxHashSet<usize>),
}

impl GoalSet {
    /// Recipe: disks of `reach_distance` around each label location, minus
    /// the robot footprint (so "already standing on it" never counts).
    pub fn labels(
        labels: impl IntoIterator<Item = Point>,
        reach_distance: f64,
        robot: Point,
        footprint: f64,
    ) -> GoalSet {
        let disks = labels
            .into_iter()
            .map(|p| AreaExpr::circle(p, reach_distance))
            .collect();
        GoalSet::Area(AreaExpr::and(vec![
            AreaExpr::or(disks),
            AreaExpr::not(AreaExpr::circle(robot, footprint)),
        ]))
    }

    /// Recipe: the empty cell with the oldest echo stamp within
    /// `max_distance` of `center` — the map-refresh heuristic.  Empty when
    /// the map holds no empty cell in range.
    pub fn oldest_echo(radar: &RadarMap, center: Point, max_distance: f64) -> GoalSet {
        GoalSet::Cells(radar.oldest_empty_cell(center, max_distance).into_iter().collect())
    }

    /// Recipe: the contour of the unknown region — the exploration frontier.
    pub fn unknown_frontier(radar: &RadarMap) -> GoalSet {
        GoalSet::Cells(radar.unknown_contour().into_iter().collect())
    }

    /// `true` if the set can never match (saves a doomed search).
    pub fn is_empty(&self) -> bool {
        match self {
            GoalSet::Area(_) => false,
            GoalSet::Cells(cells) => cells.is_empty(),
        }
    }

    fn contains(&self, radar: &RadarMap, p: Point) -> bool {
        match self {
            GoalSet::Area(area) => area.contains(p),
            GoalSet::Cells(cells) => radar
                .topology()
                .index_of(p)
                .is_some_and(|i| cells.contains(&i)),
        }
    }
}

// ── GridSpace ─────────────────────────────────────────────────────────────────

/// The discretised free configuration space: radar-safe, grid-snapped empty
/// cells, sampled without replacement by a seeded RNG.
pub struct GridSpace<'a> {
    radar:           &'a RadarMap,
    free:            Vec<Point>,
    rng:             PlannerRng,
    growth_distance: f64,
    safety_distance: f64,
    goal:            GoalSet,
}

impl<'a> GridSpace<'a> {
    pub fn new(
        radar: &'a RadarMap,
        goal: GoalSet,
        safety_distance: f64,
        growth_distance: f64,
        seed: u64,
    ) -> Self {
        // Candidate configurations: empty cells with enough clearance.
        let free = radar
            .safe_sectors(safety_distance)
            .into_iter()
            .filter(|&i| radar.cell(i).is_empty())
            .map(|i| radar.topology().point_at(i))
            .collect();
        Self {
            radar,
            free,
            rng: PlannerRng::new(seed),
            growth_distance,
            safety_distance,
            goal,
        }
    }

    /// Remaining (unsampled) free configurations.
    pub fn free_count(&self) -> usize {
        self.free.len()
    }
}

impl RrtSpace for GridSpace<'_> {
    type Config = Point;

    fn sample(&mut self) -> Option<Point> {
        if self.free.is_empty() {
            return None;
        }
        let idx = self.rng.next_index(self.free.len());
        Some(self.free.swap_remove(idx))
    }

    fn interpolate(&self, nearest: &Point, sample: &Point) -> Point {
        let d = nearest.distance(*sample);
        let stepped = if d <= self.growth_distance {
            *sample
        } else {
            let dir = rov_core::Complex::direction(*nearest, *sample);
            nearest.translate(dir, self.growth_distance)
        };
        self.radar.topology().snap(stepped).unwrap_or(*sample)
    }

    fn distance(&self, a: &Point, b: &Point) -> f64 {
        a.distance(*b)
    }

    fn is_connected(&self, from: &Point, to: &Point) -> bool {
        self.radar.free_trajectory(*from, *to, self.safety_distance)
    }

    fn is_goal(&self, config: &Point) -> bool {
        self.goal.contains(self.radar, *config)
    }
}

// ── Budgeted search driver ────────────────────────────────────────────────────

/// Termination budgets for one RRT search.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RrtBudget {
    /// Growth attempts before giving up.
    pub max_iterations: usize,
    /// Stop early once this many goal configurations are in the tree.
    pub min_goals: usize,
    /// Wall-clock cap on one search, keeping reactions timely.
    pub max_search_time: Duration,
}

impl Default for RrtBudget {
    fn default() -> Self {
        Self {
            max_iterations:  300,
            min_goals:       1,
            max_search_time: Duration::from_millis(500),
        }
    }
}

/// Grow an RRT from `start` under `budget`, then shortcut-optimize the
/// winning polyline.  `None` when the budget is exhausted without reaching a
/// goal.
pub fn find_path(space: GridSpace<'_>, start: Point, budget: RrtBudget) -> Option<Vec<Point>> {
    if space.goal.is_empty() {
        return None;
    }
    let radar = space.radar;
    let safety = space.safety_distance;

    let mut rrt = Rrt::new(space, start);
    let deadline = Instant::now() + budget.max_search_time;
    let mut iterations = 0usize;
    while iterations < budget.max_iterations
        && rrt.goal_count() < budget.min_goals
        && Instant::now() < deadline
    {
        rrt.grow();
        iterations += 1;
    }

    match rrt.path() {
        Some(path) => Some(optimize_path(&path, radar, safety)),
        None => {
            debug!(
                iterations,
                vertices = rrt.vertex_count(),
                "search budget exhausted without reaching a goal"
            );
            None
        }
    }
}
