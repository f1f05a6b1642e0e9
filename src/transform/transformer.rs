//! Pseudo columns computed by functions

use std::sync::Arc;

use super::values::DatasetValues;
use crate::config::ConfigNode;
use crate::dataset::{ColumnNotFound, Dataset, DatasetRef, DatasetResult, QueryResults, Schema};
use crate::function::{Function, FunctionFactory};

/// Applies named functions as computed columns
///
/// Pseudo columns shadow dataset columns of the same name.
#[derive(Debug, Clone, Default)]
pub struct ColumnTransformer {
    columns: Arc<[(String, Function)]>,
}

impl ColumnTransformer {
    /// Creates a transformer; a later definition replaces an earlier one
    /// of the same name
    pub fn new(columns: Vec<(String, Function)>) -> Self {
        let mut unique: Vec<(String, Function)> = Vec::with_capacity(columns.len());
        for (name, function) in columns {
            unique.retain(|(existing, _)| *existing != name);
            unique.push((name, function));
        }
        Self {
            columns: unique.into(),
        }
    }

    /// Builds the pseudo columns from a transformation section
    pub fn from_config(section: &ConfigNode, factory: &FunctionFactory<'_>) -> Self {
        Self::new(factory.parse_trafos(section))
    }

    /// Names of the pseudo columns, in order
    pub fn pseudo_columns(&self) -> Vec<String> {
        self.columns.iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn is_pseudo_column(&self, column: &str) -> bool {
        self.function(column).is_some()
    }

    fn function(&self, column: &str) -> Option<&Function> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, f)| f)
    }

    /// Schema of transformed datasets: pseudo columns, then the base
    /// columns they do not shadow
    pub fn schema_for(&self, base: &[String]) -> Schema {
        let mut schema = self.pseudo_columns();
        for column in base {
            if !schema.contains(column) {
                schema.push(column.clone());
            }
        }
        schema.into()
    }

    /// Value of `column` for `dataset`
    ///
    /// Pseudo columns evaluate their function against the dataset's
    /// values; other columns read straight from the dataset.
    pub fn get(&self, column: &str, dataset: &dyn Dataset) -> DatasetResult<Option<String>> {
        match self.function(column) {
            Some(f) => Ok(Some(f.string(&DatasetValues::new(dataset)))),
            None => dataset.get(column),
        }
    }

    /// Wraps `dataset`; the key is unchanged
    pub fn transform(&self, dataset: DatasetRef) -> DatasetRef {
        Arc::new(TransformedDataset {
            inner: dataset,
            transformer: self.clone(),
        })
    }

    /// Transforms every row, preserving order and size
    pub fn transform_results(&self, results: QueryResults) -> QueryResults {
        let schema = results.schema().map(|s| self.schema_for(s));
        let transformed: QueryResults = results.into_iter().map(|ds| self.transform(ds)).collect();
        match schema {
            Some(schema) => transformed.with_schema(schema),
            None => transformed,
        }
    }
}

/// A dataset seen through a [`ColumnTransformer`]
#[derive(Debug)]
struct TransformedDataset {
    inner: DatasetRef,
    transformer: ColumnTransformer,
}

impl Dataset for TransformedDataset {
    fn get(&self, column: &str) -> DatasetResult<Option<String>> {
        match self.transformer.get(column, self.inner.as_ref()) {
            Err(ColumnNotFound { .. }) => Err(ColumnNotFound::new(column)),
            found => found,
        }
    }

    fn key(&self) -> &str {
        self.inner.key()
    }
}
