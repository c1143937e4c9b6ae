//! Agent error type.

use thiserror::Error;

use rov_state::StateError;

/// Errors surfaced by the agent.
///
/// Only configuration problems (wrapped [`StateError`]s at construction)
/// are fatal; controller I/O and runtime command failures are reported to
/// the observer while the dispatch loop keeps running on the last known
/// status.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("controller error: {0}")]
    Controller(String),

    #[error(transparent)]
    State(#[from] StateError),
}

/// Shorthand result type for `rov-agent`.
pub type AgentResult<T> = Result<T, AgentError>;
