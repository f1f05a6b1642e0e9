//! In-memory leaf sources

use std::collections::HashSet;

use super::source::Datasource;
use crate::dataset::{DatasetRef, QueryResults, Schema};
use crate::query::{DatasetPredicate, QueryPart};

/// A fixed list of datasets
///
/// Unlike the federation operators, an empty query returns every row.
#[derive(Debug, Clone)]
pub struct RamDatasource {
    name: String,
    schema: Schema,
    rows: Vec<DatasetRef>,
}

impl RamDatasource {
    pub fn new(name: impl Into<String>, schema: Schema, rows: Vec<DatasetRef>) -> Self {
        Self {
            name: name.into(),
            schema,
            rows,
        }
    }

    fn results<I>(&self, rows: I) -> QueryResults
    where
        I: IntoIterator<Item = DatasetRef>,
    {
        rows.into_iter()
            .collect::<QueryResults>()
            .with_schema(self.schema.clone())
    }
}

impl Datasource for RamDatasource {
    fn name(&self) -> &str {
        &self.name
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn find(&self, query: &[QueryPart]) -> QueryResults {
        let predicate = DatasetPredicate::compile(query);
        self.results(
            self.rows
                .iter()
                .filter(|ds| predicate.matches(ds.as_ref()))
                .cloned(),
        )
    }

    fn datasets_by_key(&self, keys: &[String]) -> QueryResults {
        let wanted: HashSet<&str> = keys.iter().map(String::as_str).collect();
        self.results(
            self.rows
                .iter()
                .filter(|ds| wanted.contains(ds.key()))
                .cloned(),
        )
    }

    fn contents(&self) -> QueryResults {
        self.results(self.rows.iter().cloned())
    }
}

/// A source with a schema and no rows
#[derive(Debug, Clone)]
pub struct EmptyDatasource {
    name: String,
    schema: Schema,
}

impl EmptyDatasource {
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }

    fn nothing(&self) -> QueryResults {
        QueryResults::empty().with_schema(self.schema.clone())
    }
}

impl Datasource for EmptyDatasource {
    fn name(&self) -> &str {
        &self.name
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn find(&self, _query: &[QueryPart]) -> QueryResults {
        self.nothing()
    }

    fn datasets_by_key(&self, _keys: &[String]) -> QueryResults {
        self.nothing()
    }

    fn contents(&self) -> QueryResults {
        self.nothing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{schema_of, RecordDataset};

    fn people() -> RamDatasource {
        let schema = schema_of(["first", "last"]);
        let rows = [("1", "Ada", "Lovelace"), ("2", "Alan", "Turing"), ("3", "Grace", "Hopper")]
            .into_iter()
            .map(|(k, f, l)| {
                RecordDataset::from_pairs(k, schema.clone(), [("first", f), ("last", l)]).into_ref()
            })
            .collect();
        RamDatasource::new("people", schema, rows)
    }

    #[test]
    fn test_find_filters_with_wildcards() {
        let ram = people();
        let hits = ram.find(&[QueryPart::new("first", "a*")]);
        assert_eq!(hits.keys(), vec!["1", "2"]);
        assert_eq!(hits.schema().unwrap().len(), 2);
    }

    #[test]
    fn test_empty_query_returns_everything() {
        assert_eq!(people().find(&[]).len(), 3);
    }

    #[test]
    fn test_datasets_by_key_keeps_row_order() {
        let hits = people().datasets_by_key(&["3".into(), "1".into(), "9".into()]);
        assert_eq!(hits.keys(), vec!["1", "3"]);
    }

    #[test]
    fn test_empty_datasource() {
        let empty = EmptyDatasource::new("none", schema_of(["a"]));
        assert!(empty.find(&[]).is_empty());
        assert!(empty.contents().is_empty());
        assert_eq!(empty.schema().to_vec(), vec!["a"]);
    }
}
