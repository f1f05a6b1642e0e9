//! Concatenation of two datasources

use super::source::{name_of, referenced, require_same_columns, Datasource, DatasourceMap, DatasourceRef};
use crate::config::{ConfigNode, ConfigResult};
use crate::dataset::{QueryResults, Schema};
use crate::query::QueryPart;

/// Rows of SOURCE1 followed by rows of SOURCE2
#[derive(Debug)]
pub struct UnionDatasource {
    name: String,
    first: DatasourceRef,
    second: DatasourceRef,
}

impl UnionDatasource {
    /// Builds from `NAME`, `SOURCE1` and `SOURCE2`; both must have the same
    /// columns
    pub fn from_config(map: &DatasourceMap, desc: &ConfigNode) -> ConfigResult<Self> {
        let name = name_of(desc)?;
        let first = referenced(map, desc, "SOURCE1", name)?;
        let second = referenced(map, desc, "SOURCE2", name)?;
        require_same_columns(first.as_ref(), second.as_ref())?;
        Ok(Self {
            name: name.to_string(),
            first,
            second,
        })
    }

    fn concat(&self, first: QueryResults, second: QueryResults) -> QueryResults {
        first
            .into_iter()
            .chain(second)
            .collect::<QueryResults>()
            .with_schema(self.schema().clone())
    }
}

impl Datasource for UnionDatasource {
    fn name(&self) -> &str {
        &self.name
    }

    fn schema(&self) -> &Schema {
        self.first.schema()
    }

    fn find(&self, query: &[QueryPart]) -> QueryResults {
        if query.is_empty() {
            return QueryResults::empty().with_schema(self.schema().clone());
        }
        self.concat(self.first.find(query), self.second.find(query))
    }

    fn datasets_by_key(&self, keys: &[String]) -> QueryResults {
        self.concat(
            self.first.datasets_by_key(keys),
            self.second.datasets_by_key(keys),
        )
    }

    fn contents(&self) -> QueryResults {
        QueryResults::empty().with_schema(self.schema().clone())
    }
}
