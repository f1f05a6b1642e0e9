//! Datasource capability

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use crate::config::{ConfigError, ConfigNode, ConfigResult};
use crate::dataset::{QueryResults, Schema};
use crate::query::QueryPart;

/// A named provider of datasets
///
/// Every dataset a datasource returns answers `get` for exactly the
/// columns in [`schema`](Datasource::schema). Query failures never
/// escape: leaf sources log them and return no rows.
pub trait Datasource: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Columns in declaration order
    fn schema(&self) -> &Schema;

    /// Datasets matching every constraint
    fn find(&self, query: &[QueryPart]) -> QueryResults;

    /// Datasets whose key is in `keys`
    fn datasets_by_key(&self, keys: &[String]) -> QueryResults;

    /// Everything the source can enumerate cheaply; federation operators
    /// return nothing
    fn contents(&self) -> QueryResults;
}

/// Shared handle to a datasource
pub type DatasourceRef = Arc<dyn Datasource>;

/// Datasources by name
pub type DatasourceMap = HashMap<String, DatasourceRef>;

/// Value of `NAME` in a datasource description
pub(crate) fn name_of(desc: &ConfigNode) -> ConfigResult<&str> {
    desc.value_of("NAME")
        .ok_or_else(|| ConfigError::missing_key("datasource", "NAME"))
}

/// Resolves the datasource named by `key` in `desc`
pub(crate) fn referenced(
    map: &DatasourceMap,
    desc: &ConfigNode,
    key: &str,
    owner: &str,
) -> ConfigResult<DatasourceRef> {
    let name = desc.require(key, owner)?;
    map.get(name)
        .cloned()
        .ok_or_else(|| ConfigError::unknown_source(owner, name))
}

/// Fails unless both schemas hold the same columns, listing what each
/// side lacks
pub(crate) fn require_same_columns(
    first: &dyn Datasource,
    second: &dyn Datasource,
) -> ConfigResult<()> {
    let lhs: HashSet<&String> = first.schema().iter().collect();
    let rhs: HashSet<&String> = second.schema().iter().collect();
    if lhs == rhs {
        return Ok(());
    }

    let missing = |from: &HashSet<&String>, against: &HashSet<&String>| {
        let mut cols: Vec<&str> = against
            .difference(from)
            .map(|c| c.as_str())
            .collect();
        cols.sort_unstable();
        cols.join(", ")
    };
    Err(ConfigError::schema_conflict(format!(
        "datasource \"{}\" lacks columns: {}; datasource \"{}\" lacks columns: {}",
        first.name(),
        missing(&lhs, &rhs),
        second.name(),
        missing(&rhs, &lhs),
    )))
}
