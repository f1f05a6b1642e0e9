//! Overlay of one datasource onto another

use std::collections::HashSet;
use std::sync::Arc;

use super::join::MatchPairs;
use super::source::{name_of, referenced, Datasource, DatasourceMap, DatasourceRef};
use crate::config::{ConfigError, ConfigNode, ConfigResult};
use crate::dataset::{ColumnNotFound, Dataset, DatasetRef, DatasetResult, QueryResults, Schema};
use crate::query::{most_restricting_part, DatasetPredicate, QueryPart};

/// Which side wins when both have a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayMode {
    /// `so`: SOURCE wins
    SourceFirst,
    /// `os`: OVERLAY wins
    OverlayFirst,
}

#[derive(Debug)]
struct Layout {
    mode: OverlayMode,
    empty_as_null: bool,
    source_columns: HashSet<String>,
    overlay_columns: HashSet<String>,
}

/// SOURCE rows merged with their matching OVERLAY row
///
/// MODE `so` lets SOURCE values win, `os` lets OVERLAY values win. A null
/// on the winning side falls back to the other side; with a lowercase
/// second MODE letter (`so`, `Os`) an empty string counts as null too.
/// Keys are SOURCE keys. The schema is SOURCE's followed by OVERLAY's, so
/// shared columns appear twice.
#[derive(Debug)]
pub struct OverlayDatasource {
    name: String,
    source: DatasourceRef,
    overlay: DatasourceRef,
    matches: MatchPairs,
    common_match_columns: HashSet<String>,
    schema: Schema,
    layout: Arc<Layout>,
}

impl OverlayDatasource {
    /// Builds from `NAME`, `SOURCE`, `OVERLAY`, `MODE` and one or more `MATCH`
    pub fn from_config(map: &DatasourceMap, desc: &ConfigNode) -> ConfigResult<Self> {
        let name = name_of(desc)?;
        let mode_text = desc.require("MODE", name)?;
        let (mode, empty_as_null) = parse_mode(mode_text).ok_or_else(|| {
            ConfigError::invalid_value(format!(
                "MODE \"{mode_text}\" of datasource \"{name}\" is not allowed"
            ))
        })?;

        let source = referenced(map, desc, "SOURCE", name)?;
        let overlay = referenced(map, desc, "OVERLAY", name)?;
        let matches = MatchPairs::parse(desc, name, source.schema(), overlay.schema())?;

        let schema: Vec<String> = source
            .schema()
            .iter()
            .chain(overlay.schema().iter())
            .cloned()
            .collect();
        let layout = Layout {
            mode,
            empty_as_null,
            source_columns: source.schema().iter().cloned().collect(),
            overlay_columns: overlay.schema().iter().cloned().collect(),
        };

        Ok(Self {
            name: name.to_string(),
            common_match_columns: matches.common_columns(),
            source,
            overlay,
            matches,
            schema: schema.into(),
            layout: Arc::new(layout),
        })
    }

    pub fn mode(&self) -> OverlayMode {
        self.layout.mode
    }

    fn merged(&self, source_row: DatasetRef, overlay_row: Option<DatasetRef>) -> DatasetRef {
        Arc::new(MergedDataset {
            source_row,
            overlay_row,
            layout: Arc::clone(&self.layout),
        })
    }

    /// Merges each SOURCE row with its first OVERLAY row passing `filter`
    fn overlay_columns(&self, rows: QueryResults, filter: &DatasetPredicate) -> Vec<DatasetRef> {
        let mut merged = Vec::with_capacity(rows.len());
        for row in rows {
            let candidates: Vec<DatasetRef> = match self.matches.right_query(row.as_ref()) {
                Some(query) => self
                    .overlay
                    .find(&query)
                    .into_iter()
                    .filter(|o| self.matches.joins(row.as_ref(), o.as_ref()))
                    .collect(),
                None => Vec::new(),
            };

            if candidates.is_empty() {
                let ds = self.merged(row, None);
                if filter.matches(ds.as_ref()) {
                    merged.push(ds);
                }
                continue;
            }
            if let Some(ds) = candidates
                .into_iter()
                .map(|o| self.merged(Arc::clone(&row), Some(o)))
                .find(|ds| filter.matches(ds.as_ref()))
            {
                merged.push(ds);
            }
        }
        merged
    }

    /// Merges OVERLAY rows under every SOURCE row they match
    fn overlay_columns_reversed(
        &self,
        rows: QueryResults,
        filter: &DatasetPredicate,
    ) -> Vec<DatasetRef> {
        let mut merged = Vec::with_capacity(rows.len());
        for row in rows {
            let Some(query) = self.matches.left_query(row.as_ref()) else {
                continue;
            };
            for source_row in self.source.find(&query) {
                if !self.matches.joins(source_row.as_ref(), row.as_ref()) {
                    continue;
                }
                let ds = self.merged(source_row, Some(Arc::clone(&row)));
                if filter.matches(ds.as_ref()) {
                    merged.push(ds);
                }
            }
        }
        merged
    }

    /// Query touching only columns both sides have
    fn find_shared(&self, shared: &[QueryPart], query: &[QueryPart]) -> Vec<DatasetRef> {
        let Some(part) = most_restricting_part(shared) else {
            return Vec::new();
        };
        let restricting = [part.clone()];
        let predicate = DatasetPredicate::compile(query);

        let from_source = self.overlay_columns(self.source.find(&restricting), &predicate);
        let from_overlay =
            self.overlay_columns_reversed(self.overlay.find(&restricting), &predicate);

        let source_keys: HashSet<&str> = from_source.iter().map(|ds| ds.key()).collect();
        let mut rows = Vec::with_capacity(from_source.len() + from_overlay.len());
        let mut dup_keys = Vec::new();
        for ds in &from_overlay {
            if source_keys.contains(ds.key()) {
                dup_keys.push(ds.key().to_string());
            } else {
                rows.push(Arc::clone(ds));
            }
        }

        // Rows found from both sides are rebuilt once by key
        rows.extend(
            self.datasets_by_key(&dup_keys)
                .into_iter()
                .filter(|ds| predicate.matches(ds.as_ref())),
        );
        let dup_keys: HashSet<&str> = dup_keys.iter().map(String::as_str).collect();
        rows.extend(
            from_source
                .iter()
                .filter(|ds| !dup_keys.contains(ds.key()))
                .cloned(),
        );
        rows
    }

    fn results(&self, rows: Vec<DatasetRef>) -> QueryResults {
        QueryResults::new(rows).with_schema(self.schema.clone())
    }
}

/// Reads `so`/`os` case-insensitively; the flag is set when the second
/// letter is lowercase
fn parse_mode(mode: &str) -> Option<(OverlayMode, bool)> {
    let parsed = match mode.to_lowercase().as_str() {
        "so" => OverlayMode::SourceFirst,
        "os" => OverlayMode::OverlayFirst,
        _ => return None,
    };
    let empty_as_null = mode.chars().nth(1).is_some_and(char::is_lowercase);
    Some((parsed, empty_as_null))
}

impl Datasource for OverlayDatasource {
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

        let mut only_source = Vec::new();
        let mut only_overlay = Vec::new();
        let mut shared = Vec::new();
        for part in query {
            let column = part.column();
            if !self.layout.source_columns.contains(column) {
                only_overlay.push(part.clone());
            } else if self.layout.overlay_columns.contains(column)
                && !self.common_match_columns.contains(column)
            {
                shared.push(part.clone());
            } else {
                only_source.push(part.clone());
            }
        }

        let rows = if !only_source.is_empty() {
            let rest: Vec<QueryPart> = shared.iter().chain(&only_overlay).cloned().collect();
            self.overlay_columns(
                self.source.find(&only_source),
                &DatasetPredicate::compile(&rest),
            )
        } else if !only_overlay.is_empty() {
            self.overlay_columns_reversed(
                self.overlay.find(&only_overlay),
                &DatasetPredicate::compile(&shared),
            )
        } else {
            self.find_shared(&shared, query)
        };
        self.results(rows)
    }

    fn datasets_by_key(&self, keys: &[String]) -> QueryResults {
        let rows = self.overlay_columns(
            self.source.datasets_by_key(keys),
            &DatasetPredicate::match_all(),
        );
        self.results(rows)
    }

    fn contents(&self) -> QueryResults {
        self.results(Vec::new())
    }
}

#[derive(Debug)]
struct MergedDataset {
    source_row: DatasetRef,
    overlay_row: Option<DatasetRef>,
    layout: Arc<Layout>,
}

impl MergedDataset {
    fn side(&self, source: bool) -> (Option<&DatasetRef>, &HashSet<String>) {
        if source {
            (Some(&self.source_row), &self.layout.source_columns)
        } else {
            (self.overlay_row.as_ref(), &self.layout.overlay_columns)
        }
    }
}

impl Dataset for MergedDataset {
    fn get(&self, column: &str) -> DatasetResult<Option<String>> {
        let layout = &self.layout;
        if !layout.source_columns.contains(column) && !layout.overlay_columns.contains(column) {
            return Err(ColumnNotFound::new(column));
        }

        let source_wins = layout.mode == OverlayMode::SourceFirst;
        let (winner, winner_columns) = self.side(source_wins);
        let (loser, loser_columns) = self.side(!source_wins);

        if let Some(row) = winner.filter(|_| winner_columns.contains(column)) {
            let value = row
                .get(column)
                .ok()
                .flatten()
                .filter(|v| !(layout.empty_as_null && v.is_empty()));
            if value.is_some() {
                return Ok(value);
            }
        }

        match loser.filter(|_| loser_columns.contains(column)) {
            Some(row) => Ok(row.get(column).ok().flatten()),
            None => Ok(None),
        }
    }

    fn key(&self) -> &str {
        self.source_row.key()
    }
}
