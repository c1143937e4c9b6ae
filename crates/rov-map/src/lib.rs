//! `rov-map` — spatial perception state for the rover behaviour core.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                      |
//! |------------|---------------------------------------------------------------|
//! | [`cell`]   | `CellState`, `MapCell` — one occupancy cell with its stamp    |
//! | [`radar`]  | `RadarMap` — dense grid, sensor updates, spatial queries      |
//! | [`polar`]  | `PolarMap` — per-inference 360° sector view                   |
//! | [`status`] | `RobotStatus`, `RobotSpec`, `LabelMarker`, `SensorPing`       |
//! | [`world`]  | `WorldModel` — the immutable per-tick snapshot                |
//!
//! # Design notes
//!
//! The radar map is the only mutable perception state; it is owned by the
//! agent and updated from every status message.  At latch it is cloned into
//! the [`WorldModel`] handed to the active state node, so one reaction always
//! sees a consistent map.  The polar map is derived from that snapshot at
//! inference time and never persisted.
//!
//! Updates never fail: malformed sensor input is logged and dropped, and
//! per-cell stamps are monotonic in simulation time, which makes replayed or
//! reordered status messages idempotent.

pub mod cell;
pub mod polar;
pub mod radar;
pub mod status;
pub mod world;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use cell::{CellState, MapCell};
pub use polar::{PolarMap, PolarSector};
pub use radar::{RadarMap, SensorPing};
pub use status::{LabelMarker, RobotSpec, RobotStatus};
pub use world::WorldModel;
