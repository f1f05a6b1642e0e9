//! JSON output for CLI
//!
//! One JSON object per line on stdout, UTF-8.

use std::io::{self, Write};

use serde_json::{Map, Value};

use super::errors::CliResult;
use crate::dataset::Dataset;

/// A row as `{"key": ..., "columns": {column: value-or-null}}`
pub fn row_to_json(row: &dyn Dataset, schema: &[String]) -> Value {
    let mut columns = Map::new();
    for column in schema {
        let value = match row.get(column) {
            Ok(Some(v)) => Value::String(v),
            Ok(None) | Err(_) => Value::Null,
        };
        columns.insert(column.clone(), value);
    }
    serde_json::json!({
        "key": row.key(),
        "columns": columns,
    })
}

/// Write one JSON value as a line to stdout
pub fn write_json(value: &Value) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{schema_of, RecordDataset};

    #[test]
    fn test_row_to_json() {
        let schema = schema_of(["a", "b"]);
        let row = RecordDataset::from_pairs("k1", schema.clone(), [("a", "1")]);
        let json = row_to_json(&row, &schema);
        assert_eq!(json["key"], "k1");
        assert_eq!(json["columns"]["a"], "1");
        assert!(json["columns"]["b"].is_null());
    }
}
