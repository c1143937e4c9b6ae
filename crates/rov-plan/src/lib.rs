//! `rov-plan` — path planning over the radar grid.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                    |
//! |--------------|-------------------------------------------------------------|
//! | [`astar`]    | Generic A\* driven by goal/children/cost/estimate closures  |
//! | [`rrt`]      | Generic RRT over a pluggable [`RrtSpace`]                   |
//! | [`finder`]   | `GridSpace` — the discretised free-configuration space, its |
//! |              | goal recipes, and the budgeted search driver                |
//! | [`optimize`] | Shortcut post-optimization of RRT polylines                 |
//!
//! # Pluggability
//!
//! Both planners are parameterised by callbacks rather than bound to the
//! radar map, so behaviours can route them over sector graphs, polyline
//! indices, or grid configurations without touching the planner core.  The
//! concrete grid wiring lives in [`finder`].
//!
//! # Determinism
//!
//! All sampling goes through a caller-seeded [`rov_core::PlannerRng`]; the
//! same seed, map and budgets reproduce the identical vertex sequence and
//! path.

pub mod astar;
pub mod finder;
pub mod optimize;
pub mod rrt;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use astar::astar;
pub use finder::{GoalSet, GridSpace, RrtBudget, find_path};
pub use optimize::optimize_path;
pub use rrt::{Rrt, RrtSpace};
