//! Values view over a dataset

use crate::dataset::Dataset;
use crate::function::Values;

/// Resolves VALUE("x") through `Dataset::get("x")`
///
/// A column outside the schema has no value; a null column reads as "".
pub struct DatasetValues<'d> {
    dataset: &'d dyn Dataset,
}

impl<'d> DatasetValues<'d> {
    pub fn new(dataset: &'d dyn Dataset) -> Self {
        Self { dataset }
    }
}

impl Values for DatasetValues<'_> {
    fn has_value(&self, id: &str) -> bool {
        self.dataset.get(id).is_ok()
    }

    fn get_string(&self, id: &str) -> String {
        self.dataset.get(id).ok().flatten().unwrap_or_default()
    }
}
