//! `rov-core` — foundational types for the rover behaviour core.
//!
//! This crate is a dependency of every other `rov-*` crate.  It intentionally
//! has no `rov-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                |
//! |-------------|---------------------------------------------------------|
//! | [`geom`]    | `Complex` (unit-circle heading), `Point`                |
//! | [`grid`]    | `GridTopology` — uniform square grid over the world     |
//! | [`area`]    | `AreaExpr` — recursive set expressions over points      |
//! | [`time`]    | `SimTime`, `SimDuration` (milliseconds of sim time)     |
//! | [`rng`]     | `PlannerRng` (seeded, never process-global)             |
//! | [`command`] | `RobotCommand` enum                                     |
//! | [`error`]   | `CoreError`, `CoreResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod area;
pub mod command;
pub mod error;
pub mod geom;
pub mod grid;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use area::AreaExpr;
pub use command::RobotCommand;
pub use error::{CoreError, CoreResult};
pub use geom::{Complex, Point};
pub use grid::GridTopology;
pub use rng::PlannerRng;
pub use time::{SimDuration, SimTime};
