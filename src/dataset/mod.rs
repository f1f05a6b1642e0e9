//! Records and result sets
//!
//! A [`Dataset`] is an immutable record with a stable key. Reading a
//! column outside its schema fails with [`ColumnNotFound`]; reading a
//! declared column without a value yields `None`.

mod errors;
mod record;
mod results;

pub use errors::{ColumnNotFound, DatasetResult};
pub use record::{schema_of, Dataset, DatasetRef, RecordDataset, Schema};
pub use results::QueryResults;
