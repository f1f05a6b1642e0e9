//! # Transport Errors

use thiserror::Error;

/// Result type for leaf transport calls
pub type TransportResult<T> = Result<T, TransportError>;

/// Failures of an external record transport
///
/// These never cross the datasource boundary: the leaf logs them and
/// answers with no rows.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Query rejected: {0}")]
    Rejected(String),

    #[error("Timed out: {0}")]
    Timeout(String),
}
