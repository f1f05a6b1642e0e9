//! MATCH column pairs shared by Attach and Overlay

use std::collections::HashSet;

use crate::config::{ConfigError, ConfigNode, ConfigResult};
use crate::dataset::Dataset;
use crate::observability::{log_event_with_fields, Event};
use crate::query::QueryPart;

/// Column pairs (left, right) that must hold equal values for two rows
/// to join
#[derive(Debug, Clone)]
pub(crate) struct MatchPairs {
    pairs: Vec<(String, String)>,
}

impl MatchPairs {
    /// Reads every `MATCH(left right)` child of `desc`
    pub(crate) fn parse(
        desc: &ConfigNode,
        owner: &str,
        left: &[String],
        right: &[String],
    ) -> ConfigResult<Self> {
        let mut pairs = Vec::new();
        for m in desc.children_named("MATCH") {
            let (l, r) = match m.children() {
                [l, r] if l.is_leaf() && r.is_leaf() => (l.name(), r.name()),
                _ => {
                    return Err(ConfigError::arity(format!(
                        "MATCH in datasource \"{owner}\" needs exactly two column names"
                    )))
                }
            };
            if !left.iter().any(|c| c == l) {
                return Err(ConfigError::schema_conflict(format!(
                    "column \"{l}\" of MATCH in datasource \"{owner}\" is not defined in schema"
                )));
            }
            if !right.iter().any(|c| c == r) {
                return Err(ConfigError::schema_conflict(format!(
                    "column \"{r}\" of MATCH in datasource \"{owner}\" is not defined in schema"
                )));
            }
            pairs.push((l.to_string(), r.to_string()));
        }

        if pairs.is_empty() {
            return Err(ConfigError::missing_key(owner, "MATCH"));
        }
        Ok(Self { pairs })
    }

    /// Columns matched against a column of the same name
    pub(crate) fn common_columns(&self) -> HashSet<String> {
        self.pairs
            .iter()
            .filter(|(l, r)| l == r)
            .map(|(l, _)| l.clone())
            .collect()
    }

    /// Query on the right side for rows joining `left_row`
    ///
    /// `None` when a match value is null: such a row joins nothing.
    pub(crate) fn right_query(&self, left_row: &dyn Dataset) -> Option<Vec<QueryPart>> {
        self.pairs
            .iter()
            .map(|(l, r)| value(left_row, l).map(|v| QueryPart::new(r.as_str(), v)))
            .collect()
    }

    /// Query on the left side for rows joining `right_row`
    pub(crate) fn left_query(&self, right_row: &dyn Dataset) -> Option<Vec<QueryPart>> {
        self.pairs
            .iter()
            .map(|(l, r)| value(right_row, r).map(|v| QueryPart::new(l.as_str(), v)))
            .collect()
    }

    /// Exact, case-sensitive equality on every pair
    pub(crate) fn joins(&self, left_row: &dyn Dataset, right_row: &dyn Dataset) -> bool {
        self.pairs.iter().all(|(l, r)| {
            matches!(
                (value(left_row, l), value(right_row, r)),
                (Some(a), Some(b)) if a == b
            )
        })
    }
}

fn value(row: &dyn Dataset, column: &str) -> Option<String> {
    match row.get(column) {
        Ok(v) => v,
        Err(e) => {
            log_event_with_fields(
                Event::DatasourceColumnMissing,
                &[("column", e.column.as_str()), ("key", row.key())],
            );
            None
        }
    }
}
