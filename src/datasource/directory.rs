//! # Directory leaf
//!
//! Adapts a directory-style record service to the datasource contract.
//! The service is reached through a [`DirectoryTransport`]; keys are made
//! by a pluggable [`KeyStrategy`].

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use sha2::{Digest, Sha256};

use super::errors::TransportResult;
use super::file::{parse_keys, parse_schema, KEY_SEPARATOR};
use super::source::{name_of, Datasource};
use crate::config::{ConfigError, ConfigNode, ConfigResult};
use crate::dataset::{DatasetRef, QueryResults, RecordDataset, Schema};
use crate::observability::{log_event_with_fields, Event};
use crate::query::{DatasetPredicate, QueryPart};

/// A raw record as delivered by a transport
pub type Record = HashMap<String, String>;

/// Access to an external record service
pub trait DirectoryTransport: Send + Sync + fmt::Debug {
    /// Records matching every constraint
    fn fetch(&self, query: &[QueryPart]) -> TransportResult<Vec<Record>>;

    /// Every record
    fn fetch_all(&self) -> TransportResult<Vec<Record>>;
}

/// Derives a stable key from a record
///
/// Equal values in the key columns must give equal keys.
pub trait KeyStrategy: Send + Sync + fmt::Debug {
    fn key(&self, record: &Record) -> String;

    /// Constraints selecting the records that can carry `key`, when the
    /// key can be decoded
    fn query_for(&self, _key: &str) -> Option<Vec<QueryPart>> {
        None
    }
}

/// Key column values joined with [`KEY_SEPARATOR`]
///
/// A key decodes into one exact constraint per key column; an empty
/// component asks for an empty value, so transports must read a missing
/// attribute as empty.
#[derive(Debug, Clone)]
pub struct ColumnKey {
    columns: Vec<String>,
}

impl ColumnKey {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }
}

impl KeyStrategy for ColumnKey {
    fn key(&self, record: &Record) -> String {
        self.columns
            .iter()
            .map(|c| record.get(c).map(String::as_str).unwrap_or_default())
            .collect::<Vec<_>>()
            .join(KEY_SEPARATOR)
    }

    fn query_for(&self, key: &str) -> Option<Vec<QueryPart>> {
        let values: Vec<&str> = key.split(KEY_SEPARATOR).collect();
        if values.len() != self.columns.len() {
            return None;
        }
        Some(
            self.columns
                .iter()
                .zip(values)
                .map(|(c, v)| QueryPart::new(c.as_str(), v))
                .collect(),
        )
    }
}

/// SHA-256 over the key column values, hex encoded
#[derive(Debug, Clone)]
pub struct HashedKey {
    columns: Vec<String>,
}

impl HashedKey {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }
}

impl KeyStrategy for HashedKey {
    fn key(&self, record: &Record) -> String {
        let mut hasher = Sha256::new();
        for column in &self.columns {
            let value = record.get(column).map(String::as_str).unwrap_or_default();
            hasher.update((value.len() as u64).to_le_bytes());
            hasher.update(value.as_bytes());
        }
        format!("{:x}", hasher.finalize())
    }
}

/// Leaf datasource over a [`DirectoryTransport`]
#[derive(Debug)]
pub struct DirectoryDatasource {
    name: String,
    schema: Schema,
    transport: Arc<dyn DirectoryTransport>,
    keys: Box<dyn KeyStrategy>,
}

impl DirectoryDatasource {
    pub fn new(
        name: impl Into<String>,
        schema: Schema,
        transport: Arc<dyn DirectoryTransport>,
        keys: Box<dyn KeyStrategy>,
    ) -> Self {
        Self {
            name: name.into(),
            schema,
            transport,
            keys,
        }
    }

    /// Builds from `NAME`, `Schema`, `Schluessel` and an optional
    /// `KEYS "columns"|"sha256"`
    pub fn from_config(
        desc: &ConfigNode,
        transport: Arc<dyn DirectoryTransport>,
    ) -> ConfigResult<Self> {
        let name = name_of(desc)?;
        let schema = parse_schema(name, desc)?;
        let columns = parse_keys(name, desc, &schema)?;
        let keys: Box<dyn KeyStrategy> = match desc.value_of("KEYS").unwrap_or("columns") {
            "columns" => Box::new(ColumnKey::new(columns)),
            "sha256" => Box::new(HashedKey::new(columns)),
            other => {
                return Err(ConfigError::invalid_value(format!(
                    "KEYS \"{other}\" of datasource \"{name}\" is not allowed"
                )))
            }
        };
        Ok(Self::new(name, schema, transport, keys))
    }

    fn to_dataset(&self, record: Record) -> DatasetRef {
        let key = self.keys.key(&record);
        RecordDataset::new(key, self.schema.clone(), record).into_ref()
    }

    fn results(&self, rows: Vec<DatasetRef>) -> QueryResults {
        QueryResults::new(rows).with_schema(self.schema.clone())
    }

    /// Transport failures are logged and read as no records
    fn records(&self, fetched: TransportResult<Vec<Record>>) -> Vec<Record> {
        fetched.unwrap_or_else(|e| {
            let error = e.to_string();
            log_event_with_fields(
                Event::DatasourceQueryFailed,
                &[("datasource", self.name.as_str()), ("error", error.as_str())],
            );
            Vec::new()
        })
    }
}

impl Datasource for DirectoryDatasource {
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
        let predicate = DatasetPredicate::compile(query);
        let rows = self
            .records(self.transport.fetch(query))
            .into_iter()
            .map(|r| self.to_dataset(r))
            .filter(|ds| predicate.matches(ds.as_ref()))
            .collect();
        self.results(rows)
    }

    fn datasets_by_key(&self, keys: &[String]) -> QueryResults {
        let wanted: HashSet<&str> = keys.iter().map(String::as_str).collect();
        let queries: Option<Vec<Vec<QueryPart>>> =
            keys.iter().map(|k| self.keys.query_for(k)).collect();

        let records = match queries {
            Some(queries) => queries
                .iter()
                .flat_map(|q| self.records(self.transport.fetch(q)))
                .collect(),
            None => self.records(self.transport.fetch_all()),
        };

        let mut seen = HashSet::new();
        let rows = records
            .into_iter()
            .map(|r| self.to_dataset(r))
            .filter(|ds| wanted.contains(ds.key()) && seen.insert(ds.key().to_string()))
            .collect();
        self.results(rows)
    }

    fn contents(&self) -> QueryResults {
        self.results(Vec::new())
    }
}
