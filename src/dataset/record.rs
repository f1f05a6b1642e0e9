//! Dataset capability and the plain record implementation

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::errors::{ColumnNotFound, DatasetResult};

/// Ordered column names a datasource or dataset exposes
pub type Schema = Arc<[String]>;

/// Builds a [`Schema`] from column names
pub fn schema_of<I, S>(columns: I) -> Schema
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    columns.into_iter().map(Into::into).collect::<Vec<_>>().into()
}

/// An immutable key-value record
///
/// `get` fails for columns outside the declared schema and returns
/// `Ok(None)` for declared columns without a value.
pub trait Dataset: Send + Sync + fmt::Debug {
    /// Value of `column`
    fn get(&self, column: &str) -> DatasetResult<Option<String>>;

    /// Stable, source-defined identity
    fn key(&self) -> &str;
}

/// Shared handle to a dataset
pub type DatasetRef = Arc<dyn Dataset>;

/// A dataset backed by a map of present values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDataset {
    key: String,
    schema: Schema,
    values: HashMap<String, String>,
}

impl RecordDataset {
    /// Creates a record; values for columns outside `schema` are dropped
    pub fn new(key: impl Into<String>, schema: Schema, values: HashMap<String, String>) -> Self {
        let values = values
            .into_iter()
            .filter(|(column, _)| schema.iter().any(|c| c == column))
            .collect();
        Self {
            key: key.into(),
            schema,
            values,
        }
    }

    /// Creates a record from (column, value) pairs
    pub fn from_pairs<I, C, V>(key: impl Into<String>, schema: Schema, pairs: I) -> Self
    where
        I: IntoIterator<Item = (C, V)>,
        C: Into<String>,
        V: Into<String>,
    {
        let values = pairs
            .into_iter()
            .map(|(c, v)| (c.into(), v.into()))
            .collect();
        Self::new(key, schema, values)
    }

    /// Wraps the record in a shared handle
    pub fn into_ref(self) -> DatasetRef {
        Arc::new(self)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

impl Dataset for RecordDataset {
    fn get(&self, column: &str) -> DatasetResult<Option<String>> {
        if !self.schema.iter().any(|c| c == column) {
            return Err(ColumnNotFound::new(column));
        }
        Ok(self.values.get(column).cloned())
    }

    fn key(&self) -> &str {
        &self.key
    }
}
