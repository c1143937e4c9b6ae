//! Unit tests for rov-plan.

use std::time::Duration;

use rov_core::{Complex, GridTopology, Point, SimTime};
use rov_map::{RadarMap, SensorPing};

use crate::{GoalSet, GridSpace, Rrt, RrtBudget, RrtSpace, astar, find_path, optimize_path};
use crate::optimize::path_length;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// 21 × 21 cells of 0.2 m centred on the origin.
fn topo() -> GridTopology {
    GridTopology::centered(Point::ORIGIN, 0.2, 21, 21).unwrap()
}

/// A radar map with empty cells along rays every 5° out to max range.
fn swept_radar() -> RadarMap {
    let mut radar = RadarMap::new(topo());
    let mut deg = -180.0;
    while deg < 180.0 {
        radar.update(&SensorPing {
            time:          SimTime(100),
            location:      Point::ORIGIN,
            direction:     Complex::from_deg(deg),
            echo_distance: 0.0,
            max_distance:  3.0,
        });
        deg += 5.0;
    }
    radar
}

fn budget() -> RrtBudget {
    RrtBudget {
        max_iterations:  2_000,
        min_goals:       1,
        max_search_time: Duration::from_secs(5),
    }
}

// ── A* ────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod astar_tests {
    use super::*;

    /// 4-connected walk on a 5×5 integer grid with a wall at x == 2, y < 4.
    fn grid_children(n: &(i32, i32)) -> Vec<(i32, i32)> {
        let (x, y) = *n;
        [(x + 1, y), (x - 1, y), (x, y + 1), (x, y - 1)]
            .into_iter()
            .filter(|&(x, y)| (0..5).contains(&x) && (0..5).contains(&y))
            .filter(|&(x, y)| !(x == 2 && y < 4))
            .collect()
    }

    #[test]
    fn routes_around_the_wall() {
        let goal = (4, 0);
        let path = astar(
            (0, 0),
            |n| *n == goal,
            grid_children,
            |_, _| 1.0,
            |&(x, y)| ((goal.0 - x).abs() + (goal.1 - y).abs()) as f64,
        )
        .expect("goal is reachable");

        assert_eq!(path.first(), Some(&(0, 0)));
        assert_eq!(path.last(), Some(&goal));
        // Manhattan detour over the wall: 4 right + 4 up + 4 down = 12 moves.
        assert_eq!(path.len(), 13);
        assert!(path.iter().all(|&(x, y)| !(x == 2 && y < 4)));
    }

    #[test]
    fn unreachable_returns_none() {
        let result = astar(
            (0, 0),
            |&n| n == (9, 9),
            |_| Vec::new(),
            |_, _| 1.0,
            |_| 0.0,
        );
        assert!(result.is_none());
    }

    #[test]
    fn trivial_goal_is_the_start() {
        let path = astar(7i32, |&n| n == 7, |_| vec![], |_, _| 1.0, |_| 0.0).unwrap();
        assert_eq!(path, vec![7]);
    }
}

// ── RRT core ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod rrt_tests {
    use super::*;

    /// A 1-D space handing out a scripted sample sequence; connectivity is
    /// limited to unit steps so growth is forced to go through 1 and 2.
    struct LineSpace {
        samples: Vec<i64>,
    }

    impl RrtSpace for LineSpace {
        type Config = i64;

        fn sample(&mut self) -> Option<i64> {
            self.samples.pop()
        }

        fn interpolate(&self, nearest: &i64, sample: &i64) -> i64 {
            nearest + (sample - nearest).clamp(-1, 1)
        }

        fn distance(&self, a: &i64, b: &i64) -> f64 {
            (a - b).abs() as f64
        }

        fn is_connected(&self, from: &i64, to: &i64) -> bool {
            (from - to).abs() <= 1
        }

        fn is_goal(&self, config: &i64) -> bool {
            *config == 3
        }
    }

    #[test]
    fn grows_one_step_per_sample() {
        let space = LineSpace { samples: vec![3, 3, 3] }; // popped back to front
        let mut rrt = Rrt::new(space, 0);

        assert_eq!(rrt.grow(), Some(1));
        assert_eq!(rrt.grow(), Some(2));
        assert_eq!(rrt.grow(), Some(3));
        assert_eq!(rrt.goal_count(), 1);
        assert_eq!(rrt.path(), Some(vec![0, 1, 2, 3]));
    }

    #[test]
    fn duplicate_configurations_are_rejected() {
        let space = LineSpace { samples: vec![1, 1] };
        let mut rrt = Rrt::new(space, 0);

        assert_eq!(rrt.grow(), Some(1));
        assert_eq!(rrt.grow(), None); // interpolates onto an existing vertex
        assert_eq!(rrt.vertex_count(), 2);
    }

    #[test]
    fn exhausted_sampler_stops_growth() {
        let space = LineSpace { samples: vec![] };
        let mut rrt = Rrt::new(space, 0);
        assert_eq!(rrt.grow(), None);
        assert_eq!(rrt.path(), None);
    }

    #[test]
    fn root_in_goal_set_yields_trivial_path() {
        let space = LineSpace { samples: vec![] };
        let rrt = Rrt::new(space, 3);
        assert_eq!(rrt.path(), Some(vec![3]));
    }
}

// ── Grid search ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod grid_search_tests {
    use super::*;

    #[test]
    fn finds_path_to_label_disk() {
        let radar = swept_radar();
        let goal = GoalSet::labels([Point::new(1.5, 0.0)], 0.3, Point::ORIGIN, 0.3);
        // Growth ≥ map radius: every sampled cell connects directly, so the
        // exhaustive (consume-on-sample) sweep is guaranteed to hit the goal.
        let space = GridSpace::new(&radar, goal, 0.1, 3.0, 42);

        let path = find_path(space, Point::ORIGIN, budget()).expect("open map must route");
        assert_eq!(path[0], Point::ORIGIN);
        assert!(path.last().unwrap().distance(Point::new(1.5, 0.0)) <= 0.3 + 1e-9);
    }

    #[test]
    fn same_seed_reproduces_the_path() {
        let radar = swept_radar();
        let make = |seed| {
            let goal = GoalSet::labels([Point::new(1.5, 0.0)], 0.3, Point::ORIGIN, 0.3);
            find_path(
                GridSpace::new(&radar, goal, 0.1, 3.0, seed),
                Point::ORIGIN,
                budget(),
            )
        };
        assert_eq!(make(7), make(7));
    }

    #[test]
    fn same_seed_reproduces_the_vertex_sequence() {
        let radar = swept_radar();
        let grow_all = || {
            let goal = GoalSet::unknown_frontier(&radar);
            let space = GridSpace::new(&radar, goal, 0.1, 0.5, 99);
            let mut rrt = Rrt::new(space, Point::ORIGIN);
            let mut accepted = Vec::new();
            for _ in 0..200 {
                if let Some(v) = rrt.grow() {
                    accepted.push(v);
                }
            }
            accepted
        };
        assert_eq!(grow_all(), grow_all());
    }

    #[test]
    fn empty_goal_set_fails_fast() {
        let radar = swept_radar();
        let goal = GoalSet::oldest_echo(&radar, Point::new(10.0, 10.0), 0.5); // nothing in range
        assert!(goal.is_empty());
        let space = GridSpace::new(&radar, goal, 0.1, 0.5, 1);
        assert!(find_path(space, Point::ORIGIN, budget()).is_none());
    }

    #[test]
    fn saturated_map_has_no_free_samples() {
        // All-unknown map: no empty cell may be sampled.
        let radar = RadarMap::new(topo());
        let goal = GoalSet::labels([Point::new(1.0, 0.0)], 0.3, Point::ORIGIN, 0.3);
        let space = GridSpace::new(&radar, goal, 0.1, 0.5, 1);
        assert_eq!(space.free_count(), 0);
        assert!(find_path(space, Point::ORIGIN, budget()).is_none());
    }

    #[test]
    fn oldest_echo_recipe_targets_stalest_cell() {
        let mut radar = swept_radar();
        // Refresh everything except the +x beam with a newer sweep.
        radar.update(&SensorPing {
            time:          SimTime(9_000),
            location:      Point::ORIGIN,
            direction:     Complex::from_deg(90.0),
            echo_distance: 0.0,
            max_distance:  3.0,
        });
        let goal = GoalSet::oldest_echo(&radar, Point::ORIGIN, 2.0);
        match &goal {
            GoalSet::Cells(cells) => {
                assert_eq!(cells.len(), 1);
                let &i = cells.iter().next().unwrap();
                assert_eq!(radar.cell(i).echo_time, Some(SimTime(100)));
            }
            GoalSet::Area(_) => panic!("oldest_echo must produce a cell set"),
        }
    }
}

// ── Path optimization ─────────────────────────────────────────────────────────

#[cfg(test)]
mod optimize_tests {
    use super::*;

    #[test]
    fn zigzag_collapses_on_open_map() {
        let radar = swept_radar();
        let zigzag = vec![
            Point::new(0.0, 0.0),
            Point::new(0.2, 0.4),
            Point::new(0.4, -0.4),
            Point::new(0.6, 0.4),
            Point::new(0.8, 0.0),
        ];
        let optimized = optimize_path(&zigzag, &radar, 0.05);

        assert!(path_length(&optimized) < path_length(&zigzag));
        assert_eq!(optimized.first(), zigzag.first());
        assert_eq!(optimized.last(), zigzag.last());
        for w in optimized.windows(2) {
            assert!(radar.free_trajectory(w[0], w[1], 0.05));
        }
    }

    #[test]
    fn never_longer_than_input() {
        let mut radar = RadarMap::new(topo());
        radar.update(&SensorPing {
            time:          SimTime(100),
            location:      Point::ORIGIN,
            direction:     Complex::ZERO,
            echo_distance: 1.0, // obstacle at (1, 0) keeps the detour necessary
            max_distance:  3.0,
        });
        let detour = vec![
            Point::new(0.0, 0.0),
            Point::new(0.8, 0.8),
            Point::new(1.6, 0.0),
        ];
        let optimized = optimize_path(&detour, &radar, 0.5);
        assert!(path_length(&optimized) <= path_length(&detour) + 1e-9);
    }

    #[test]
    fn short_paths_pass_through() {
        let radar = RadarMap::new(topo());
        assert!(optimize_path(&[], &radar, 0.1).is_empty());
        let single = vec![Point::new(0.3, 0.3)];
        assert_eq!(optimize_path(&single, &radar, 0.1), single);
        let pair = vec![Point::ORIGIN, Point::new(1.0, 0.0)];
        assert_eq!(optimize_path(&pair, &radar, 0.1), pair);
    }
}
