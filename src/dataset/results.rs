//! Query result sets

use std::slice;
use std::vec;

use super::record::{DatasetRef, Schema};

/// A sized, ordered collection of datasets
///
/// May carry an explicit schema; [`QueryResults::with_schema`] attaches
/// one to a schema-less set. Iteration is read-only.
#[derive(Debug, Clone, Default)]
pub struct QueryResults {
    datasets: Vec<DatasetRef>,
    schema: Option<Schema>,
}

impl QueryResults {
    pub fn new(datasets: Vec<DatasetRef>) -> Self {
        Self {
            datasets,
            schema: None,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Attaches a schema, replacing any previous one
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DatasetRef> {
        self.datasets.get(index)
    }

    pub fn iter(&self) -> slice::Iter<'_, DatasetRef> {
        self.datasets.iter()
    }

    /// Keys of all datasets, in order
    pub fn keys(&self) -> Vec<String> {
        self.datasets.iter().map(|ds| ds.key().to_string()).collect()
    }

    /// Returns true if some dataset has `key`
    pub fn contains_key(&self, key: &str) -> bool {
        self.datasets.iter().any(|ds| ds.key() == key)
    }

    pub fn into_vec(self) -> Vec<DatasetRef> {
        self.datasets
    }
}

impl FromIterator<DatasetRef> for QueryResults {
    fn from_iter<I: IntoIterator<Item = DatasetRef>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl From<Vec<DatasetRef>> for QueryResults {
    fn from(datasets: Vec<DatasetRef>) -> Self {
        Self::new(datasets)
    }
}

impl IntoIterator for QueryResults {
    type Item = DatasetRef;
    type IntoIter = vec::IntoIter<DatasetRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.datasets.into_iter()
    }
}

impl<'a> IntoIterator for &'a QueryResults {
    type Item = &'a DatasetRef;
    type IntoIter = slice::Iter<'a, DatasetRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.datasets.iter()
    }
}
