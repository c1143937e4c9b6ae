//! `PolarMap` — a fixed-resolution 360° sector view around the robot.
//!
//! Derived freshly at every inference from the latched radar map; never
//! persisted across ticks.  Sector 0 is centred on heading 0 and indices
//! grow counter-clockwise, wrapping modulo the sector count.

use rov_core::{Complex, Point};

use crate::cell::CellState;
use crate::radar::RadarMap;

/// One angular wedge of the surroundings.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PolarSector {
    /// Hindered if any obstacle falls in the wedge, else empty if anything
    /// was observed, else unknown.
    pub status: CellState,
    /// For hindered sectors the nearest obstacle distance; for empty
    /// sectors the farthest observed free distance.
    pub distance: Option<f64>,
    /// Cell centre the distance was measured to.
    pub location: Option<Point>,
}

impl PolarSector {
    const UNKNOWN: PolarSector = PolarSector { status: CellState::Unknown, distance: None, location: None };
}

/// The sector view: `sector_count` wedges of 2π / `sector_count` each.
#[derive(Clone, Debug)]
pub struct PolarMap {
    center:  Point,
    sectors: Vec<PolarSector>,
}

impl PolarMap {
    /// Scan the radar cells between `min_distance` and `max_distance` of
    /// `center` into `sector_count` wedges.
    pub fn from_radar(
        radar: &RadarMap,
        center: Point,
        min_distance: f64,
        max_distance: f64,
        sector_count: usize,
    ) -> Self {
        debug_assert!(sector_count > 0);
        let mut sectors = vec![PolarSector::UNKNOWN; sector_count];

        let topology = radar.topology();
        for i in 0..topology.cell_count() {
            let cell = radar.cell(i);
            if cell.is_unknown() {
                continue;
            }
            let p = topology.point_at(i);
            let d = center.distance(p);
            if d < min_distance || d > max_distance {
                continue;
            }
            let s = &mut sectors[sector_index(center, p, sector_count)];
            match (cell.state, s.status) {
                // First obstacle in the wedge, or a nearer one.
                (CellState::Hindered, CellState::Hindered) => {
                    if d < s.distance.unwrap_or(f64::INFINITY) {
                        s.distance = Some(d);
                        s.location = Some(p);
                    }
                }
                (CellState::Hindered, _) => {
                    *s = PolarSector { status: CellState::Hindered, distance: Some(d), location: Some(p) };
                }
                // Empty observations never override an obstacle.
                (CellState::Empty, CellState::Hindered) => {}
                (CellState::Empty, _) => {
                    if d > s.distance.unwrap_or(0.0) || s.status == CellState::Unknown {
                        s.distance = Some(d);
                        s.location = Some(p);
                    }
                    s.status = CellState::Empty;
                }
                (CellState::Unknown, _) => unreachable!("unknown cells are skipped above"),
            }
        }

        Self { center, sectors }
    }

    #[inline]
    pub fn center(&self) -> Point {
        self.center
    }

    #[inline]
    pub fn sector_count(&self) -> usize {
        self.sectors.len()
    }

    /// The sector containing `direction` (indices wrap modulo the count).
    pub fn sector_at(&self, direction: Complex) -> &PolarSector {
        let width = std::f64::consts::TAU / self.sectors.len() as f64;
        let idx = ((direction.rad() + width * 0.5).rem_euclid(std::f64::consts::TAU) / width)
            as usize
            % self.sectors.len();
        &self.sectors[idx]
    }

    /// Heading of the centre of sector `index`.
    pub fn sector_direction(&self, index: usize) -> Complex {
        let width = std::f64::consts::TAU / self.sectors.len() as f64;
        Complex::from_rad(index as f64 * width)
    }

    #[inline]
    pub fn sectors(&self) -> &[PolarSector] {
        &self.sectors
    }

    /// Distance-weighted mass centre of the empty sectors, the "safest spot
    /// in view".  `None` when no sector is empty.
    pub fn safe_centroid(&self, max_distance: f64) -> Option<Point> {
        let mut weight_sum = 0.0;
        let (mut x, mut y) = (0.0, 0.0);
        for (i, s) in self.sectors.iter().enumerate() {
            if s.status != CellState::Empty {
                continue;
            }
            let d = s.distance.unwrap_or(max_distance).min(max_distance);
            let p = self.center.translate(self.sector_direction(i), d);
            x += p.x * d;
            y += p.y * d;
            weight_sum += d;
        }
        if weight_sum > 0.0 {
            Some(Point::new(x / weight_sum, y / weight_sum))
        } else {
            None
        }
    }
}

/// Index of the wedge containing the direction from `center` to `p`.
fn sector_index(center: Point, p: Point, sector_count: usize) -> usize {
    let width = std::f64::consts::TAU / sector_count as f64;
    let rad = Complex::direction(center, p).rad();
    (((rad + width * 0.5).rem_euclid(std::f64::consts::TAU)) / width) as usize % sector_count
}
