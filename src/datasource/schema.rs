//! Column editing over another datasource

use std::collections::HashMap;
use std::sync::Arc;

use super::source::{name_of, referenced, Datasource, DatasourceMap, DatasourceRef};
use crate::config::{ConfigError, ConfigNode, ConfigResult};
use crate::dataset::{ColumnNotFound, Dataset, DatasetRef, DatasetResult, QueryResults, Schema};
use crate::query::QueryPart;

/// `[a-zA-Z_][a-zA-Z_0-9]*`
pub(crate) fn is_column_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Where a column of the edited schema reads from
#[derive(Debug, Clone, PartialEq, Eq)]
enum Origin {
    /// An ADDed column, always null
    Added,
    /// A RENAMEd column reading the named SOURCE column
    Renamed(String),
}

#[derive(Debug)]
struct Mapping {
    schema: Schema,
    origins: HashMap<String, Origin>,
}

impl Mapping {
    fn column(&self, column: &str) -> Result<Option<&Origin>, ColumnNotFound> {
        if !self.schema.iter().any(|c| c == column) {
            return Err(ColumnNotFound::new(column));
        }
        Ok(self.origins.get(column))
    }
}

/// SOURCE with columns dropped, added or renamed
///
/// `DROP(a b)` removes columns, `ADD(c)` adds always-null columns and
/// `RENAME(old new)` exposes `old` as `new`.
#[derive(Debug)]
pub struct SchemaDatasource {
    name: String,
    source: DatasourceRef,
    mapping: Arc<Mapping>,
}

impl SchemaDatasource {
    /// Builds from `NAME`, `SOURCE` and any `DROP`, `ADD` and `RENAME`
    pub fn from_config(map: &DatasourceMap, desc: &ConfigNode) -> ConfigResult<Self> {
        let name = name_of(desc)?;
        let source = referenced(map, desc, "SOURCE", name)?;
        let mut schema: Vec<String> = source.schema().to_vec();

        let mut dropped: Vec<String> = Vec::new();
        for column in desc.children_named("DROP").flat_map(ConfigNode::children) {
            let column = column.name();
            if !schema.iter().any(|c| c == column) {
                return Err(undefined(name, column));
            }
            dropped.push(column.to_string());
        }

        let mut added: Vec<String> = Vec::new();
        for column in desc.children_named("ADD").flat_map(ConfigNode::children) {
            let column = valid(name, column.name())?;
            dropped.retain(|c| c != column);
            added.push(column.to_string());
        }

        let mut origins: HashMap<String, Origin> = HashMap::new();
        for rename in desc.children_named("RENAME") {
            let (old, new) = match rename.children() {
                [old, new] => (old.name(), new.name()),
                _ => {
                    return Err(ConfigError::arity(format!(
                        "RENAME in datasource \"{name}\" needs exactly two column names"
                    )))
                }
            };
            if !schema.iter().any(|c| c == old) {
                return Err(undefined(name, old));
            }
            let new = valid(name, new)?;
            origins.insert(new.to_string(), Origin::Renamed(old.to_string()));
            dropped.push(old.to_string());
            dropped.retain(|c| c != new);
            added.push(new.to_string());
        }

        for column in &added {
            if !schema.contains(column) && !origins.contains_key(column) {
                origins.insert(column.clone(), Origin::Added);
            }
        }
        schema.retain(|c| !dropped.contains(c));
        for column in added {
            if !schema.contains(&column) {
                schema.push(column);
            }
        }

        Ok(Self {
            name: name.to_string(),
            source,
            mapping: Arc::new(Mapping {
                schema: schema.into(),
                origins,
            }),
        })
    }

    fn wrap(&self, results: QueryResults) -> QueryResults {
        results
            .into_iter()
            .map(|inner| -> DatasetRef {
                Arc::new(EditedDataset {
                    inner,
                    mapping: Arc::clone(&self.mapping),
                })
            })
            .collect::<QueryResults>()
            .with_schema(self.mapping.schema.clone())
    }

    fn nothing(&self) -> QueryResults {
        QueryResults::empty().with_schema(self.mapping.schema.clone())
    }
}

fn undefined(owner: &str, column: &str) -> ConfigError {
    ConfigError::schema_conflict(format!(
        "column \"{column}\" used by datasource \"{owner}\" is not defined in schema"
    ))
}

fn valid<'c>(owner: &str, column: &'c str) -> ConfigResult<&'c str> {
    if is_column_name(column) {
        Ok(column)
    } else {
        Err(ConfigError::invalid_value(format!(
            "\"{column}\" in datasource \"{owner}\" is not a valid column name"
        )))
    }
}

impl Datasource for SchemaDatasource {
    fn name(&self) -> &str {
        &self.name
    }

    fn schema(&self) -> &Schema {
        &self.mapping.schema
    }

    fn find(&self, query: &[QueryPart]) -> QueryResults {
        let mut translated = Vec::with_capacity(query.len());
        for part in query {
            match self.mapping.column(part.column()) {
                // dropped, or added and therefore never matching
                Err(_) | Ok(Some(Origin::Added)) => return self.nothing(),
                Ok(Some(Origin::Renamed(old))) => {
                    translated.push(QueryPart::new(old.as_str(), part.pattern()))
                }
                Ok(None) => translated.push(part.clone()),
            }
        }
        self.wrap(self.source.find(&translated))
    }

    fn datasets_by_key(&self, keys: &[String]) -> QueryResults {
        self.wrap(self.source.datasets_by_key(keys))
    }

    fn contents(&self) -> QueryResults {
        self.nothing()
    }
}

#[derive(Debug)]
struct EditedDataset {
    inner: DatasetRef,
    mapping: Arc<Mapping>,
}

impl Dataset for EditedDataset {
    fn get(&self, column: &str) -> DatasetResult<Option<String>> {
        match self.mapping.column(column)? {
            Some(Origin::Added) => Ok(None),
            Some(Origin::Renamed(old)) => self.inner.get(old),
            None => self.inner.get(column),
        }
    }

    fn key(&self) -> &str {
        self.inner.key()
    }
}
