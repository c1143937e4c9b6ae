//! One occupancy cell of the radar map.

use rov_core::SimTime;

/// What the radar knows about a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellState {
    /// Never observed (or observation expired).
    #[default]
    Unknown,
    /// Observed free of obstacles.
    Empty,
    /// An echo placed an obstacle here.
    Hindered,
}

/// A radar map cell: observation state plus the stamp of the observation
/// that produced it.  The cell's location is implied by its grid index.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapCell {
    pub state:     CellState,
    pub echo_time: Option<SimTime>,
}

impl MapCell {
    /// The pristine, never-observed cell.
    pub const UNKNOWN: MapCell = MapCell { state: CellState::Unknown, echo_time: None };

    #[inline]
    pub fn is_unknown(&self) -> bool {
        self.state == CellState::Unknown
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.state == CellState::Empty
    }

    #[inline]
    pub fn is_hindered(&self) -> bool {
        self.state == CellState::Hindered
    }

    /// Apply an observation, honouring the per-cell monotonicity rules:
    ///
    /// - stamps never move backward — an older observation is a no-op;
    /// - `empty ↔ hindered` flips require a strictly newer stamp;
    /// - `unknown → empty/hindered` is always allowed.
    ///
    /// Returns `true` if the cell changed.
    pub fn observe(&mut self, state: CellState, time: SimTime) -> bool {
        if let Some(stamp) = self.echo_time {
            if time < stamp {
                return false;
            }
            if time == stamp && state != self.state && self.state != CellState::Unknown {
                return false;
            }
        }
        let changed = self.state != state || self.echo_time != Some(time);
        self.state = state;
        self.echo_time = Some(time);
        changed
    }

    /// Drop all observed information, reverting to unknown.
    pub fn clean(&mut self) {
        *self = MapCell::UNKNOWN;
    }
}
