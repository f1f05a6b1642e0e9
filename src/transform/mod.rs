//! Computed columns
//!
//! A [`ColumnTransformer`] exposes named functions as pseudo columns of
//! datasets and result sets. `VALUE("x")` inside a pseudo column reads
//! column `x` of the row being transformed.

mod transformer;
mod values;

pub use transformer::ColumnTransformer;
pub use values::DatasetValues;
