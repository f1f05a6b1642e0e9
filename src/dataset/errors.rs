//! Dataset access errors

use thiserror::Error;

/// Result type for column access
pub type DatasetResult<T> = Result<T, ColumnNotFound>;

/// A column outside the dataset's declared schema was requested
///
/// Distinct from a declared column whose value is absent, which reads as
/// `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("column '{column}' is not in the schema")]
pub struct ColumnNotFound {
    /// The requested column
    pub column: String,
}

impl ColumnNotFound {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }
}
