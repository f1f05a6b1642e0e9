//! # Function Errors
//!
//! Construction problems are [`crate::config::ConfigError`]s and runtime
//! data problems are the [`super::Outcome::Error`] sentinel. What remains
//! are failures of host-registered external callables.

use thiserror::Error;

/// Result type for external callables
pub type ExternResult<T> = Result<T, ExternError>;

/// External callable errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExternError {
    /// A callable with this name is already registered
    #[error("External callable already registered: {0}")]
    AlreadyRegistered(String),

    /// The callable rejected its arguments or failed
    #[error("External callable failed: {0}")]
    Failed(String),

    /// Registry lock poisoned
    #[error("Internal error: {0}")]
    Internal(String),
}
