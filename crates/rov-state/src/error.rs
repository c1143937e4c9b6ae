//! State-machine error types.
//!
//! Configuration problems (`StateError`) are fatal at flow construction.
//! Runtime command failures (`CommandError`) are surfaced to the observer
//! and never abort the dispatch loop.

use thiserror::Error;

/// A micro-VM program failed at runtime.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("stack underflow")]
    StackUnderflow,

    #[error("missing key `{0}`")]
    MissingKey(String),

    #[error("expected a number, got {0}")]
    NotANumber(&'static str),

    #[error("{0} operand(s) left on the stack after execution")]
    UnbalancedStack(usize),
}

/// Flow construction failed — the only fatal error path in the core.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid trigger pattern `{pattern}`: {source}")]
    Trigger {
        pattern: String,
        source:  regex::Error,
    },

    #[error(transparent)]
    Command(#[from] CommandError),
}

/// Shorthand result type for flow and node construction.
pub type StateResult<T> = Result<T, StateError>;
