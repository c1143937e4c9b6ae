//! `GridTopology` — the uniform square grid shared by the radar map and the
//! planners.
//!
//! # Layout
//!
//! Cells are addressed by a flat index `row * width + col`.  `origin` is the
//! *centre* of cell `(0, 0)`; cell centres are spaced `grid_size` metres
//! apart.  `snap` rounds an arbitrary point to the nearest cell centre, which
//! is how "grid-aligned" points are produced everywhere else in the
//! workspace.

use std::collections::HashSet;

use crate::area::AreaExpr;
use crate::error::{CoreError, CoreResult};
use crate::geom::Point;

/// A uniform square grid: origin, cell size and extents.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridTopology {
    origin:    Point,
    grid_size: f64,
    width:     usize,
    height:    usize,
}

/// Offsets of the 8-connected neighbourhood.
const NEIGHBOURS_8: [(isize, isize); 8] = [
    (-1, -1), (0, -1), (1, -1),
    (-1,  0),          (1,  0),
    (-1,  1), (0,  1), (1,  1),
];

impl GridTopology {
    /// Build a grid whose cell `(0, 0)` centre sits at `origin`.
    pub fn new(origin: Point, grid_size: f64, width: usize, height: usize) -> CoreResult<Self> {
        if !(grid_size.is_finite() && grid_size > 0.0) {
            return Err(CoreError::Geometry(format!("grid size must be positive, got {grid_size}")));
        }
        if width == 0 || height == 0 {
            return Err(CoreError::Geometry(format!("empty grid extents {width}x{height}")));
        }
        Ok(Self { origin, grid_size, width, height })
    }

    /// Build a grid of `width` × `height` cells centred on `center`.
    pub fn centered(center: Point, grid_size: f64, width: usize, height: usize) -> CoreResult<Self> {
        let origin = Point::new(
            center.x - (width.saturating_sub(1)) as f64 * 0.5 * grid_size,
            center.y - (height.saturating_sub(1)) as f64 * 0.5 * grid_size,
        );
        Self::new(origin, grid_size, width, height)
    }

    #[inline]
    pub fn grid_size(&self) -> f64 {
        self.grid_size
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    // ── Index ↔ point ─────────────────────────────────────────────────────

    /// Centre of the cell at `index`.
    ///
    /// # Panics
    /// Panics in debug mode if `index` is out of bounds.
    pub fn point_at(&self, index: usize) -> Point {
        debug_assert!(index < self.cell_count());
        let col = index % self.width;
        let row = index / self.width;
        Point::new(
            self.origin.x + col as f64 * self.grid_size,
            self.origin.y + row as f64 * self.grid_size,
        )
    }

    /// Index of the cell containing `point`, or `None` outside the grid.
    pub fn index_of(&self, point: Point) -> Option<usize> {
        if !point.is_finite() {
            return None;
        }
        let col = ((point.x - self.origin.x) / self.grid_size).round();
        let row = ((point.y - self.origin.y) / self.grid_size).round();
        if col < 0.0 || row < 0.0 || col >= self.width as f64 || row >= self.height as f64 {
            return None;
        }
        Some(row as usize * self.width + col as usize)
    }

    /// `true` if `point` falls inside the grid.
    pub fn contains(&self, point: Point) -> bool {
        self.index_of(point).is_some()
    }

    /// Round `point` to the nearest cell centre, or `None` outside the grid.
    pub fn snap(&self, point: Point) -> Option<Point> {
        self.index_of(point).map(|i| self.point_at(i))
    }

    // ── Set queries ───────────────────────────────────────────────────────

    /// All indices whose cell centre satisfies `area`.
    pub fn indices_by_area(&self, area: &AreaExpr) -> Vec<usize> {
        (0..self.cell_count())
            .filter(|&i| area.contains(self.point_at(i)))
            .collect()
    }

    /// The 8-connected neighbours of `index`, respecting grid borders.
    pub fn adjacent_indices(&self, index: usize) -> Vec<usize> {
        let col = (index % self.width) as isize;
        let row = (index / self.width) as isize;
        NEIGHBOURS_8
            .iter()
            .filter_map(|&(dc, dr)| {
                let (c, r) = (col + dc, row + dr);
                if c < 0 || r < 0 || c >= self.width as isize || r >= self.height as isize {
                    None
                } else {
                    Some(r as usize * self.width + c as usize)
                }
            })
            .collect()
    }

    /// Indices adjacent to, but not inside, `set` — the contour of a region.
    ///
    /// Ascending order, each index reported once.
    pub fn contour(&self, set: &HashSet<usize>) -> Vec<usize> {
        let mut result: Vec<usize> = (0..self.cell_count())
            .filter(|i| !set.contains(i))
            .filter(|&i| self.adjacent_indices(i).iter().any(|n| set.contains(n)))
            .collect();
        result.sort_unstable();
        result
    }
}
