//! Core error type.
//!
//! Sub-crates define their own error enums for their own failure surfaces and
//! wrap `CoreError` where construction-time geometry validation can bubble
//! up.

use thiserror::Error;

/// Errors produced by `rov-core` construction-time validation.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid grid geometry: {0}")]
    Geometry(String),
}

/// Shorthand result type for `rov-core`.
pub type CoreResult<T> = Result<T, CoreError>;
