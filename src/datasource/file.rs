//! Flat-file and inline table leaves

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::ram::{EmptyDatasource, RamDatasource};
use super::schema::is_column_name;
use super::source::name_of;
use crate::config::{ConfigError, ConfigNode, ConfigResult};
use crate::dataset::{DatasetRef, RecordDataset, Schema};

/// Joins the key column values of a row
pub const KEY_SEPARATOR: &str = "£#%&|";

/// Builds a RAM source from a JSON table file
///
/// `URL` names the file, relative to `base_dir` when given; the file
/// holds a node with `Schema` and `Daten` sections. `Schluessel` lists
/// the key columns.
pub fn conf_from_config(desc: &ConfigNode, base_dir: Option<&Path>) -> ConfigResult<RamDatasource> {
    let name = name_of(desc)?;
    let url = desc.require("URL", name)?;
    let path = match base_dir {
        Some(dir) => dir.join(url),
        None => Path::new(url).to_path_buf(),
    };

    let text = fs::read_to_string(&path).map_err(|e| {
        ConfigError::io(format!(
            "datasource \"{name}\" cannot read {}: {e}",
            path.display()
        ))
    })?;
    let table = ConfigNode::from_json(&text).map_err(|e| {
        ConfigError::parse(format!("table file of datasource \"{name}\": {}", e.message()))
    })?;
    build_table(name, &table, desc)
}

/// Builds a RAM source whose `Schema`, `Daten` and `Schluessel` are part
/// of the description itself
pub fn ram_from_config(desc: &ConfigNode) -> ConfigResult<RamDatasource> {
    let name = name_of(desc)?;
    build_table(name, desc, desc)
}

/// Builds an empty source from `NAME` and `Schema`
pub fn empty_from_config(desc: &ConfigNode) -> ConfigResult<EmptyDatasource> {
    let name = name_of(desc)?;
    Ok(EmptyDatasource::new(name, parse_schema(name, desc)?))
}

fn build_table(name: &str, table: &ConfigNode, keys: &ConfigNode) -> ConfigResult<RamDatasource> {
    let schema = parse_schema(name, table)?;
    let key_columns = parse_keys(name, keys, &schema)?;
    let data = table
        .child("Daten")
        .ok_or_else(|| ConfigError::missing_key(name, "Daten"))?;

    let rows = data
        .children()
        .iter()
        .map(|row| parse_row(name, row, &schema, &key_columns))
        .collect::<ConfigResult<Vec<_>>>()?;
    Ok(RamDatasource::new(name, schema, rows))
}

pub(crate) fn parse_schema(name: &str, table: &ConfigNode) -> ConfigResult<Schema> {
    let section = table
        .child("Schema")
        .ok_or_else(|| ConfigError::missing_key(name, "Schema"))?;

    let mut columns: Vec<String> = Vec::with_capacity(section.count());
    for column in section.children() {
        let column = column.name();
        if !is_column_name(column) {
            return Err(ConfigError::invalid_value(format!(
                "column \"{column}\" of datasource \"{name}\" is not a valid identifier"
            )));
        }
        if columns.iter().any(|c| c == column) {
            return Err(ConfigError::duplicate(format!(
                "column \"{column}\" of datasource \"{name}\" is defined twice"
            )));
        }
        columns.push(column.to_string());
    }
    Ok(columns.into())
}

pub(crate) fn parse_keys(name: &str, desc: &ConfigNode, schema: &Schema) -> ConfigResult<Vec<String>> {
    let keys = desc
        .child("Schluessel")
        .filter(|k| !k.is_leaf())
        .ok_or_else(|| ConfigError::missing_key(name, "Schluessel"))?;

    keys.children()
        .iter()
        .map(|k| {
            let column = k.name();
            if schema.iter().any(|c| c == column) {
                Ok(column.to_string())
            } else {
                Err(ConfigError::schema_conflict(format!(
                    "key column \"{column}\" of datasource \"{name}\" is not defined in schema"
                )))
            }
        })
        .collect()
}

/// A row is either positional values in schema order or `column(value)`
/// entries
fn parse_row(
    name: &str,
    row: &ConfigNode,
    schema: &Schema,
    key_columns: &[String],
) -> ConfigResult<DatasetRef> {
    let mut values: HashMap<String, String> = HashMap::new();
    let positional = row.first_child().is_some_and(ConfigNode::is_leaf);

    if positional {
        if row.count() > schema.len() {
            return Err(ConfigError::arity(format!(
                "row of datasource \"{name}\" has more fields than the schema"
            )));
        }
        for (column, value) in schema.iter().zip(row.children()) {
            values.insert(column.clone(), value.name().to_string());
        }
    } else {
        for cell in row.children() {
            let column = cell.name();
            if !schema.iter().any(|c| c == column) {
                return Err(ConfigError::schema_conflict(format!(
                    "row of datasource \"{name}\" has column \"{column}\" which is not in the schema"
                )));
            }
            let value = cell.scalar().filter(|_| !cell.is_leaf()).ok_or_else(|| {
                ConfigError::invalid_value(format!(
                    "column \"{column}\" of datasource \"{name}\" needs exactly one value"
                ))
            })?;
            values.insert(column.to_string(), value.to_string());
        }
    }

    let key = key_columns
        .iter()
        .map(|c| values.get(c).map(String::as_str).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(KEY_SEPARATOR);
    Ok(RecordDataset::new(key, schema.clone(), values).into_ref())
}
