//! Shortcut post-optimization of planned polylines.
//!
//! RRT paths zig-zag because every edge was grown toward a random sample.
//! This pass builds the DAG of admissible shortcuts over the waypoint
//! indices — `j` is a child of `i` iff `i < j` and the straight segment is
//! free — and runs A\* with Euclidean cost from the first to the last
//! waypoint.  For planner output the consecutive edges are free and hence
//! admissible, so the original route is always in the DAG and the optimum is
//! never longer than the input.

use rov_core::Point;
use rov_map::RadarMap;

use crate::astar::astar;

/// Corner-cut `path` against `radar`, keeping every kept segment clear by
/// `safety_distance`.  Paths of fewer than three points pass through
/// unchanged.
pub fn optimize_path(path: &[Point], radar: &RadarMap, safety_distance: f64) -> Vec<Point> {
    if path.len() < 3 {
        return path.to_vec();
    }
    let last = path.len() - 1;

    let shortcut = astar(
        0usize,
        |&i| i == last,
        |&i| {
            (i + 1..=last)
                .filter(|&j| radar.free_trajectory(path[i], path[j], safety_distance))
                .collect()
        },
        |&i, &j| path[i].distance(path[j]),
        |&i| path[i].distance(path[last]),
    );

    match shortcut {
        Some(indices) => indices.into_iter().map(|i| path[i]).collect(),
        // Only reachable when the input itself was not free (e.g. the map
        // changed since planning); hand it back untouched.
        None => path.to_vec(),
    }
}

/// Total Euclidean length of a polyline.
pub fn path_length(path: &[Point]) -> f64 {
    path.windows(2).map(|w| w[0].distance(w[1])).sum()
}
