//! Left join of two datasources

use std::collections::HashSet;
use std::sync::Arc;

use super::join::MatchPairs;
use super::source::{name_of, referenced, Datasource, DatasourceMap, DatasourceRef};
use crate::config::{ConfigError, ConfigNode, ConfigResult};
use crate::dataset::{ColumnNotFound, Dataset, DatasetRef, DatasetResult, QueryResults, Schema};
use crate::query::{DatasetPredicate, QueryPart};

/// Column layout of joined rows
#[derive(Debug)]
struct Layout {
    prefix: String,
    source_columns: HashSet<String>,
    attach_columns: HashSet<String>,
}

/// SOURCE rows extended with the columns of one matching ATTACH row
///
/// Attached columns are exposed as `<ATTACH name>__<column>` and are null
/// for SOURCE rows without a match.
#[derive(Debug)]
pub struct AttachDatasource {
    name: String,
    source: DatasourceRef,
    attach: DatasourceRef,
    matches: MatchPairs,
    schema: Schema,
    layout: Arc<Layout>,
}

impl AttachDatasource {
    /// Builds from `NAME`, `SOURCE`, `ATTACH` and one or more `MATCH`
    pub fn from_config(map: &DatasourceMap, desc: &ConfigNode) -> ConfigResult<Self> {
        let name = name_of(desc)?;
        let source = referenced(map, desc, "SOURCE", name)?;
        let attach = referenced(map, desc, "ATTACH", name)?;
        let matches = MatchPairs::parse(desc, name, source.schema(), attach.schema())?;

        let prefix = format!("{}__", attach.name());
        let mut schema: Vec<String> = source.schema().to_vec();
        for column in attach.schema().iter() {
            let prefixed = format!("{prefix}{column}");
            if schema.contains(&prefixed) {
                return Err(ConfigError::schema_conflict(format!(
                    "column \"{prefixed}\" of datasource \"{name}\" is defined twice"
                )));
            }
            schema.push(prefixed);
        }

        let layout = Layout {
            prefix,
            source_columns: source.schema().iter().cloned().collect(),
            attach_columns: attach.schema().iter().cloned().collect(),
        };
        Ok(Self {
            name: name.to_string(),
            source,
            attach,
            matches,
            schema: schema.into(),
            layout: Arc::new(layout),
        })
    }

    fn joined(&self, source_row: DatasetRef, attach_row: Option<DatasetRef>) -> DatasetRef {
        Arc::new(JoinedDataset {
            source_row,
            attach_row,
            layout: Arc::clone(&self.layout),
        })
    }

    /// Joins every SOURCE row with its first ATTACH row passing `filter`
    fn attach_columns(&self, rows: QueryResults, filter: &DatasetPredicate) -> QueryResults {
        let mut joined = Vec::with_capacity(rows.len());
        for row in rows {
            let candidates: Vec<DatasetRef> = match self.matches.right_query(row.as_ref()) {
                Some(query) => self
                    .attach
                    .find(&query)
                    .into_iter()
                    .filter(|a| self.matches.joins(row.as_ref(), a.as_ref()))
                    .collect(),
                None => Vec::new(),
            };

            if candidates.is_empty() {
                let ds = self.joined(row, None);
                if filter.matches(ds.as_ref()) {
                    joined.push(ds);
                }
                continue;
            }
            if let Some(ds) = candidates
                .into_iter()
                .map(|a| self.joined(Arc::clone(&row), Some(a)))
                .find(|ds| filter.matches(ds.as_ref()))
            {
                joined.push(ds);
            }
        }
        self.results(joined)
    }

    /// Joins ATTACH rows back to every SOURCE row they match
    fn attach_columns_reversed(&self, rows: QueryResults) -> QueryResults {
        let mut joined = Vec::with_capacity(rows.len());
        for row in rows {
            let Some(query) = self.matches.left_query(row.as_ref()) else {
                continue;
            };
            for source_row in self.source.find(&query) {
                if self.matches.joins(source_row.as_ref(), row.as_ref()) {
                    joined.push(self.joined(source_row, Some(Arc::clone(&row))));
                }
            }
        }
        self.results(joined)
    }

    fn results(&self, rows: Vec<DatasetRef>) -> QueryResults {
        QueryResults::new(rows).with_schema(self.schema.clone())
    }
}

impl Datasource for AttachDatasource {
    fn name(&self) -> &str {
        &self.name
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn find(&self, query: &[QueryPart]) -> QueryResults {
        if query.is_empty() {
            return self.results(Vec::new());
        }

        let mut source_query = Vec::new();
        let mut attach_query = Vec::new();
        let mut prefixed_query = Vec::new();
        for part in query {
            match part.column().strip_prefix(&self.layout.prefix) {
                Some(column) if !self.layout.source_columns.contains(part.column()) => {
                    attach_query.push(QueryPart::new(column, part.pattern()));
                    prefixed_query.push(part.clone());
                }
                _ => source_query.push(part.clone()),
            }
        }

        // ATTACH constraints rarely narrow much, so any SOURCE constraint
        // drives the query
        if !source_query.is_empty() {
            let rows = self.source.find(&source_query);
            self.attach_columns(rows, &DatasetPredicate::compile(&prefixed_query))
        } else {
            self.attach_columns_reversed(self.attach.find(&attach_query))
        }
    }

    fn datasets_by_key(&self, keys: &[String]) -> QueryResults {
        self.attach_columns(
            self.source.datasets_by_key(keys),
            &DatasetPredicate::match_all(),
        )
    }

    fn contents(&self) -> QueryResults {
        self.results(Vec::new())
    }
}

#[derive(Debug)]
struct JoinedDataset {
    source_row: DatasetRef,
    attach_row: Option<DatasetRef>,
    layout: Arc<Layout>,
}

impl Dataset for JoinedDataset {
    fn get(&self, column: &str) -> DatasetResult<Option<String>> {
        if self.layout.source_columns.contains(column) {
            return self.source_row.get(column);
        }
        match column.strip_prefix(&self.layout.prefix) {
            Some(attached) if self.layout.attach_columns.contains(attached) => {
                match &self.attach_row {
                    Some(row) => row.get(attached).or(Ok(None)),
                    None => Ok(None),
                }
            }
            _ => Err(ColumnNotFound::new(column)),
        }
    }

    fn key(&self) -> &str {
        self.source_row.key()
    }
}
