//! Prioritized fallback between two datasources

use std::collections::HashSet;

use super::source::{name_of, referenced, require_same_columns, Datasource, DatasourceMap, DatasourceRef};
use crate::config::{ConfigNode, ConfigResult};
use crate::dataset::{QueryResults, Schema};
use crate::query::QueryPart;

/// SOURCE rows first, then the OVER rows whose keys SOURCE does not have
#[derive(Debug)]
pub struct PreferDatasource {
    name: String,
    source: DatasourceRef,
    fallback: DatasourceRef,
}

impl PreferDatasource {
    /// Builds from `NAME`, `SOURCE` and `OVER`; both must have the same
    /// columns
    pub fn from_config(map: &DatasourceMap, desc: &ConfigNode) -> ConfigResult<Self> {
        let name = name_of(desc)?;
        let source = referenced(map, desc, "SOURCE", name)?;
        let fallback = referenced(map, desc, "OVER", name)?;
        require_same_columns(source.as_ref(), fallback.as_ref())?;
        Ok(Self {
            name: name.to_string(),
            source,
            fallback,
        })
    }

    /// Drops fallback rows that SOURCE has a row for, either in this
    /// result or anywhere by key
    fn prefer(&self, preferred: QueryResults, fallback: QueryResults) -> QueryResults {
        let mut shadowed: HashSet<String> = preferred.keys().into_iter().collect();
        let fallback_keys: Vec<String> = fallback
            .iter()
            .map(|ds| ds.key().to_string())
            .filter(|key| !shadowed.contains(key))
            .collect();
        if !fallback_keys.is_empty() {
            shadowed.extend(self.source.datasets_by_key(&fallback_keys).keys());
        }

        preferred
            .into_iter()
            .chain(fallback.into_iter().filter(|ds| !shadowed.contains(ds.key())))
            .collect::<QueryResults>()
            .with_schema(self.source.schema().clone())
    }
}

impl Datasource for PreferDatasource {
    fn name(&self) -> &str {
        &self.name
    }

    fn schema(&self) -> &Schema {
        self.source.schema()
    }

    fn find(&self, query: &[QueryPart]) -> QueryResults {
        if query.is_empty() {
            return QueryResults::empty().with_schema(self.schema().clone());
        }
        self.prefer(self.source.find(query), self.fallback.find(query))
    }

    fn datasets_by_key(&self, keys: &[String]) -> QueryResults {
        self.prefer(
            self.source.datasets_by_key(keys),
            self.fallback.datasets_by_key(keys),
        )
    }

    fn contents(&self) -> QueryResults {
        QueryResults::empty().with_schema(self.schema().clone())
    }
}
