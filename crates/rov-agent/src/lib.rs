//! `rov-agent` — the tick loop that turns world models into commands.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`controller`] | `RobotController` port trait, `MockController`            |
//! | [`observer`]   | `AgentObserver` — no-op-default callbacks                 |
//! | [`throttle`]   | `CommandThrottle` — de-duplication and pacing             |
//! | [`agent`]      | `StateAgent` — status/latch/inference dispatch            |
//! | [`error`]      | `AgentError`, `AgentResult`                               |
//!
//! # Tick anatomy
//!
//! Every status message updates the radar map.  When `reaction_interval`
//! has elapsed since the last reaction, the agent **latches** (snapshots
//! status + radar + markers into the context) and **infers** (derives the
//! polar map, runs the active node's `step`, dispatches the command through
//! the throttle, and follows at most one transition).  All of it runs on
//! the caller's task: handlers never interleave, so the context, radar map
//! and current-state pointer need no locking.

pub mod agent;
pub mod controller;
pub mod error;
pub mod observer;
pub mod throttle;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use agent::{AgentConfig, StateAgent};
pub use controller::{MockController, RobotController};
pub use error::{AgentError, AgentResult};
pub use observer::{AgentObserver, NoopObserver};
pub use throttle::CommandThrottle;
