//! Engine error model.

use thiserror::Error;

/// Result type used across the engine.
pub type EngineResult<T> = Result<T, EngineError>;

/// Engine-level error.
///
/// Keep this focused on deterministic computation/contract failures. The
/// `InsufficientData` variant is *recoverable*: callers treat it as "not yet
/// computable", not as a system failure, and bulk passes report it per item
/// instead of aborting.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A parameter failed validation (out-of-range service level, alpha,
    /// negative lookback, malformed config).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Not enough history to compute the requested result.
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// Unknown item / supplier / suggestion within the tenant scope.
    #[error("not found: {0}")]
    NotFound(String),

    /// A collaborator query failed; the caller may retry.
    #[error("dependency unavailable: {0}")]
    DependencyUnavailable(String),
}

impl EngineError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn insufficient_data(msg: impl Into<String>) -> Self {
        Self::InsufficientData(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn dependency_unavailable(msg: impl Into<String>) -> Self {
        Self::DependencyUnavailable(msg.into())
    }

    /// Whether the caller should treat this as "nothing to compute yet"
    /// rather than a computation failure.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::InsufficientData(_))
    }
}
