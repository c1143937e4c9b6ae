//! Unit tests for rov-map.

use rov_core::{Complex, GridTopology, Point, SimDuration, SimTime};

use crate::{CellState, MapCell, PolarMap, RadarMap, SensorPing};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// 21 × 21 cells of 0.2 m centred on the origin (covers ±2 m).
fn topo() -> GridTopology {
    GridTopology::centered(Point::ORIGIN, 0.2, 21, 21).unwrap()
}

fn ping_at(time: u64, direction_deg: f64, echo: f64) -> SensorPing {
    SensorPing {
        time:          SimTime(time),
        location:      Point::ORIGIN,
        direction:     Complex::from_deg(direction_deg),
        echo_distance: echo,
        max_distance:  3.0,
    }
}

// ── MapCell ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod cell_tests {
    use super::*;

    #[test]
    fn unknown_accepts_any_observation() {
        let mut c = MapCell::UNKNOWN;
        assert!(c.observe(CellState::Hindered, SimTime(10)));
        assert_eq!(c.state, CellState::Hindered);
        assert_eq!(c.echo_time, Some(SimTime(10)));
    }

    #[test]
    fn older_observation_is_a_no_op() {
        let mut c = MapCell::UNKNOWN;
        c.observe(CellState::Hindered, SimTime(100));
        assert!(!c.observe(CellState::Empty, SimTime(50)));
        assert_eq!(c.state, CellState::Hindered);
        assert_eq!(c.echo_time, Some(SimTime(100)));
    }

    #[test]
    fn equal_time_flip_is_rejected() {
        let mut c = MapCell::UNKNOWN;
        c.observe(CellState::Empty, SimTime(100));
        assert!(!c.observe(CellState::Hindered, SimTime(100)));
        assert_eq!(c.state, CellState::Empty);
    }

    #[test]
    fn newer_observation_may_flip() {
        let mut c = MapCell::UNKNOWN;
        c.observe(CellState::Empty, SimTime(100));
        assert!(c.observe(CellState::Hindered, SimTime(101)));
        assert_eq!(c.state, CellState::Hindered);
    }

    #[test]
    fn reordering_is_idempotent() {
        // Applying (u1 then u2) with u1.time < u2.time equals applying u2 alone.
        let mut ordered = MapCell::UNKNOWN;
        ordered.observe(CellState::Empty, SimTime(10));
        ordered.observe(CellState::Hindered, SimTime(20));

        let mut reordered = MapCell::UNKNOWN;
        reordered.observe(CellState::Hindered, SimTime(20));
        reordered.observe(CellState::Empty, SimTime(10));

        assert_eq!(ordered, reordered);
    }
}

// ── RadarMap updates ──────────────────────────────────────────────────────────

#[cfg(test)]
mod radar_update_tests {
    use super::*;

    #[test]
    fn beam_marks_empty_up_to_echo() {
        let mut radar = RadarMap::new(topo());
        radar.update(&ping_at(100, 0.0, 1.0));

        assert_eq!(radar.state_at(Point::new(0.6, 0.0)), CellState::Empty);
        assert_eq!(radar.state_at(Point::new(1.0, 0.0)), CellState::Hindered);
        // Behind the echo: untouched.
        assert_eq!(radar.state_at(Point::new(1.4, 0.0)), CellState::Unknown);
        assert_eq!(radar.hindered_count(), 1);
    }

    #[test]
    fn no_echo_marks_out_to_max_range() {
        let mut radar = RadarMap::new(topo());
        radar.update(&ping_at(100, 0.0, 0.0));

        assert_eq!(radar.state_at(Point::new(1.8, 0.0)), CellState::Empty);
        assert_eq!(radar.hindered_count(), 0);
    }

    #[test]
    fn backward_time_does_not_erase_obstacle() {
        let mut radar = RadarMap::new(topo());
        radar.update(&ping_at(1_000, 0.0, 1.0));
        // A replayed, older no-echo sweep along the same beam.
        radar.update(&ping_at(500, 0.0, 0.0));

        assert_eq!(radar.state_at(Point::new(1.0, 0.0)), CellState::Hindered);
    }

    #[test]
    fn newer_sweep_clears_stale_obstacle() {
        let mut radar = RadarMap::new(topo());
        radar.update(&ping_at(1_000, 0.0, 1.0));
        radar.update(&ping_at(2_000, 0.0, 0.0));

        assert_eq!(radar.state_at(Point::new(1.0, 0.0)), CellState::Empty);
        assert_eq!(radar.hindered_count(), 0);
    }

    #[test]
    fn malformed_ping_is_dropped() {
        let mut radar = RadarMap::new(topo());
        let mut bad = ping_at(100, 0.0, 1.0);
        bad.echo_distance = f64::NAN;
        radar.update(&bad);
        bad.echo_distance = -1.0;
        radar.update(&bad);

        assert_eq!(radar.hindered_count(), 0);
        assert_eq!(radar.state_at(Point::ORIGIN), CellState::Unknown);
    }

    #[test]
    fn clean_reverts_everything() {
        let mut radar = RadarMap::new(topo());
        radar.update(&ping_at(100, 0.0, 1.0));
        radar.clean();

        assert_eq!(radar.hindered_count(), 0);
        assert_eq!(radar.state_at(Point::new(0.6, 0.0)), CellState::Unknown);
    }

    #[test]
    fn decay_expires_stale_cells_only() {
        let mut radar = RadarMap::new(topo());
        radar.update(&ping_at(0, 0.0, 1.0));
        radar.update(&ping_at(8_000, 90.0, 0.0));

        radar.decay(SimTime(10_000), SimDuration::from_secs(5));

        // The old beam (stamped t=0) expired, obstacle index included.
        assert_eq!(radar.state_at(Point::new(1.0, 0.0)), CellState::Unknown);
        assert_eq!(radar.hindered_count(), 0);
        // The fresh beam survives.
        assert_eq!(radar.state_at(Point::new(0.0, 1.0)), CellState::Empty);
    }
}

// ── RadarMap queries ──────────────────────────────────────────────────────────

#[cfg(test)]
mod radar_query_tests {
    use super::*;

    #[test]
    fn queries_on_empty_map() {
        let radar = RadarMap::new(topo());
        assert!(radar.free_trajectory(Point::ORIGIN, Point::new(1.0, 1.0), 0.3));
        assert_eq!(radar.safe_sectors(0.3).len(), radar.topology().cell_count());
        assert!(radar.unknown_contour().is_empty());
        assert_eq!(radar.oldest_empty_cell(Point::ORIGIN, 2.0), None);
        assert_eq!(radar.find_safe_target(Point::ORIGIN, Complex::ZERO, 0.3, 2.0), None);
        assert_eq!(radar.nearest_hindered_distance(Point::ORIGIN), None);
    }

    #[test]
    fn free_trajectory_blocked_by_obstacle_tube() {
        let mut radar = RadarMap::new(topo());
        radar.update(&ping_at(100, 0.0, 1.0)); // obstacle at (1, 0)

        // Straight through the obstacle.
        assert!(!radar.free_trajectory(Point::ORIGIN, Point::new(1.8, 0.0), 0.2));
        // Passing 0.6 m to the side clears a 0.4 m tube.
        assert!(radar.free_trajectory(Point::new(0.0, 0.6), Point::new(1.8, 0.6), 0.4));
        // But not a 0.8 m tube.
        assert!(!radar.free_trajectory(Point::new(0.0, 0.6), Point::new(1.8, 0.6), 0.8));
    }

    #[test]
    fn safe_sectors_shrink_near_obstacles() {
        let mut radar = RadarMap::new(topo());
        radar.update(&ping_at(100, 0.0, 1.0));

        let safe = radar.safe_sectors(0.5);
        let t = radar.topology();
        let obstacle_cell = t.index_of(Point::new(1.0, 0.0)).unwrap();
        let near_cell = t.index_of(Point::new(0.8, 0.0)).unwrap();
        let far_cell = t.index_of(Point::new(-1.0, 0.0)).unwrap();
        assert!(!safe.contains(&obstacle_cell));
        assert!(!safe.contains(&near_cell));
        assert!(safe.contains(&far_cell));
    }

    #[test]
    fn unknown_contour_is_the_frontier() {
        let mut radar = RadarMap::new(topo());
        radar.update(&ping_at(100, 0.0, 0.0));

        let contour = radar.unknown_contour();
        assert!(!contour.is_empty());
        let t = radar.topology();
        for &i in &contour {
            assert!(radar.cell(i).is_empty());
            assert!(
                t.adjacent_indices(i).iter().any(|&n| radar.cell(n).is_unknown()),
                "contour cell {i} must border the unknown region"
            );
        }
    }

    #[test]
    fn oldest_empty_cell_prefers_stalest_stamp() {
        let mut radar = RadarMap::new(topo());
        radar.update(&ping_at(100, 0.0, 0.0));
        radar.update(&ping_at(5_000, 90.0, 0.0));

        let oldest = radar.oldest_empty_cell(Point::ORIGIN, 2.0).unwrap();
        assert_eq!(radar.cell(oldest).echo_time, Some(SimTime(100)));
    }

    #[test]
    fn find_safe_target_picks_nearest_reachable() {
        let mut radar = RadarMap::new(topo());
        radar.update(&ping_at(100, 0.0, 0.0));

        let target = radar
            .find_safe_target(Point::ORIGIN, Complex::ZERO, 0.3, 2.0)
            .expect("free beam must yield a target");
        assert!((target.y).abs() < 1e-9);
        assert!((target.x - 0.4).abs() < 1e-9, "nearest empty cell past 0.3 m, got {target}");
    }

    #[test]
    fn neighbour_indices_exclude_hindered() {
        let mut radar = RadarMap::new(topo());
        radar.update(&ping_at(100, 0.0, 0.4)); // obstacle at (0.4, 0)

        let neighbours = radar.neighbour_indices(Point::new(0.2, 0.0), 0.0, |_| true);
        let blocked = radar.topology().index_of(Point::new(0.4, 0.0)).unwrap();
        assert!(!neighbours.contains(&blocked));
        assert!(!neighbours.is_empty());
    }
}

// ── PolarMap ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod polar_tests {
    use super::*;

    #[test]
    fn hindered_sector_reports_nearest_obstacle() {
        let mut radar = RadarMap::new(topo());
        radar.update(&ping_at(100, 0.0, 1.0));

        let polar = PolarMap::from_radar(&radar, Point::ORIGIN, 0.1, 3.0, 24);
        let ahead = polar.sector_at(Complex::ZERO);
        assert_eq!(ahead.status, CellState::Hindered);
        assert!((ahead.distance.unwrap() - 1.0).abs() < 0.15);
    }

    #[test]
    fn unobserved_sectors_stay_unknown() {
        let radar = RadarMap::new(topo());
        let polar = PolarMap::from_radar(&radar, Point::ORIGIN, 0.1, 3.0, 24);
        assert!(polar.sectors().iter().all(|s| s.status == CellState::Unknown));
        assert_eq!(polar.safe_centroid(3.0), None);
    }

    #[test]
    fn safe_centroid_points_into_free_space() {
        let mut radar = RadarMap::new(topo());
        radar.update(&ping_at(100, 0.0, 0.0)); // free beam along +x

        let polar = PolarMap::from_radar(&radar, Point::ORIGIN, 0.1, 3.0, 24);
        let centroid = polar.safe_centroid(3.0).expect("empty sector exists");
        assert!(centroid.x > 0.5, "centroid should lean along the free beam, got {centroid}");
        assert!(centroid.y.abs() < 0.3);
    }

    #[test]
    fn sector_index_wraps_at_pi() {
        let radar = RadarMap::new(topo());
        let polar = PolarMap::from_radar(&radar, Point::ORIGIN, 0.1, 3.0, 24);
        // +180° and −180° are the same heading, hence the same sector.
        assert!(std::ptr::eq(
            polar.sector_at(Complex::from_deg(180.0)),
            polar.sector_at(Complex::from_deg(-180.0)),
        ));
    }
}
