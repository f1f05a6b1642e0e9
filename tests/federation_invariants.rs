//! Federation Invariant Tests
//!
//! Datasources built from one configuration the way a host builds them:
//! - Attach prefixes attached columns and keeps unmatched rows
//! - Overlay mode decides which side wins
//! - Federation operators answer an empty query with no rows
//! - Prefer shadows fallback rows by key
//! - Pseudo columns keep the source key

use docdata::config::{ConfigErrorCode, ConfigNode};
use docdata::dataset::{schema_of, QueryResults, RecordDataset};
use docdata::datasource::{DatasourceFactory, DatasourceMap};
use docdata::function::{FunctionFactory, FunctionLibrary};
use docdata::query::{DatasetPredicate, QueryPart};

// =============================================================================
// Helper Functions
// =============================================================================

const DATASOURCES: &str = r#"{"Datenquellen": [
    {"Datenquelle": [
        {"NAME": ["people"]}, {"TYPE": ["ram"]},
        {"Schema": ["id", "name", "room"]}, {"Schluessel": ["id"]},
        {"Daten": [
            {"": ["1", "Ada", "101"]},
            {"": ["2", "Alan", "202"]},
            {"": ["3", "Grace", "999"]}
        ]}
    ]},
    {"Datenquelle": [
        {"NAME": ["rooms"]}, {"TYPE": ["ram"]},
        {"Schema": ["nr", "floor"]}, {"Schluessel": ["nr"]},
        {"Daten": [{"": ["101", "1"]}, {"": ["202", "2"]}]}
    ]},
    {"Datenquelle": [
        {"NAME": ["local"]}, {"TYPE": ["ram"]},
        {"Schema": ["id", "name"]}, {"Schluessel": ["id"]},
        {"Daten": [{"": ["1", "Augusta"]}]}
    ]},
    {"Datenquelle": [
        {"NAME": ["main"]}, {"TYPE": ["ram"]},
        {"Schema": ["k", "v"]}, {"Schluessel": ["k"]},
        {"Daten": [{"": ["ds", "main"]}]}
    ]},
    {"Datenquelle": [
        {"NAME": ["backup"]}, {"TYPE": ["ram"]},
        {"Schema": ["k", "v"]}, {"Schluessel": ["k"]},
        {"Daten": [{"": ["ds", "backup"]}, {"": ["ds3", "backup"]}]}
    ]},
    {"Datenquelle": [
        {"NAME": ["staff"]}, {"TYPE": ["attach"]},
        {"SOURCE": ["people"]}, {"ATTACH": ["rooms"]}, {"MATCH": ["room", "nr"]}
    ]},
    {"Datenquelle": [
        {"NAME": ["source_first"]}, {"TYPE": ["overlay"]}, {"MODE": ["SO"]},
        {"SOURCE": ["people"]}, {"OVERLAY": ["local"]}, {"MATCH": ["id", "id"]}
    ]},
    {"Datenquelle": [
        {"NAME": ["overlay_first"]}, {"TYPE": ["overlay"]}, {"MODE": ["OS"]},
        {"SOURCE": ["people"]}, {"OVERLAY": ["local"]}, {"MATCH": ["id", "id"]}
    ]},
    {"Datenquelle": [
        {"NAME": ["preferred"]}, {"TYPE": ["prefer"]},
        {"SOURCE": ["main"]}, {"OVER": ["backup"]}
    ]},
    {"Datenquelle": [
        {"NAME": ["labelled"]}, {"TYPE": ["funky"]}, {"SOURCE": ["people"]},
        {"Spaltenumsetzung": [
            {"label": [{"CAT": [{"VALUE": ["name"]}, " (", {"VALUE": ["room"]}, ")"]}]}
        ]}
    ]}
]}"#;

fn build(json: &str) -> Result<DatasourceMap, docdata::config::ConfigError> {
    let section = ConfigNode::from_json(json).unwrap();
    let lib = FunctionLibrary::new();
    let functions = FunctionFactory::new(&lib);
    DatasourceFactory::new().build_all(section.children(), &functions)
}

fn datasources() -> DatasourceMap {
    build(DATASOURCES).unwrap()
}

fn value(results: &QueryResults, index: usize, column: &str) -> Option<String> {
    results.get(index).unwrap().get(column).unwrap()
}

// =============================================================================
// Attach Tests
// =============================================================================

/// Attached columns follow the source columns, prefixed with the attached
/// datasource's name.
#[test]
fn test_attach_schema_is_source_then_prefixed_attach() {
    let map = datasources();
    assert_eq!(
        map["staff"].schema().to_vec(),
        vec!["id", "name", "room", "rooms__nr", "rooms__floor"]
    );
}

/// A source row without a partner keeps its columns and has no attached
/// values.
#[test]
fn test_attach_keeps_unmatched_rows() {
    let map = datasources();
    let hits = map["staff"].find(&[QueryPart::new("name", "gr*")]);
    assert_eq!(hits.keys(), vec!["3"]);
    assert_eq!(value(&hits, 0, "room"), Some("999".into()));
    assert_eq!(value(&hits, 0, "rooms__floor"), None);

    let ada = map["staff"].find(&[QueryPart::new("name", "ada")]);
    assert_eq!(value(&ada, 0, "rooms__floor"), Some("1".into()));
}

// =============================================================================
// Overlay Tests
// =============================================================================

#[test]
fn test_overlay_mode_decides_the_winner() {
    let map = datasources();
    let key = ["1".to_string()];

    let so = map["source_first"].datasets_by_key(&key);
    assert_eq!(value(&so, 0, "name"), Some("Ada".into()));

    let os = map["overlay_first"].datasets_by_key(&key);
    assert_eq!(value(&os, 0, "name"), Some("Augusta".into()));
}

#[test]
fn test_overlay_keeps_rows_without_partner() {
    let map = datasources();
    let hits = map["overlay_first"].datasets_by_key(&["2".to_string()]);
    assert_eq!(value(&hits, 0, "name"), Some("Alan".into()));
}

// =============================================================================
// Empty Query Tests
// =============================================================================

/// Every federation operator answers an empty query with no rows; a leaf
/// RAM source returns everything.
#[test]
fn test_empty_query_on_operators_is_empty() {
    let map = datasources();
    for name in ["staff", "source_first", "overlay_first", "preferred", "labelled"] {
        assert!(map[name].find(&[]).is_empty(), "{name} answered an empty query");
    }
    assert_eq!(map["people"].find(&[]).len(), 3);
}

// =============================================================================
// Query Tests
// =============================================================================

#[test]
fn test_wildcards_are_case_insensitive() {
    let map = datasources();
    assert_eq!(map["people"].find(&[QueryPart::new("name", "*LAN")]).keys(), vec!["2"]);
    assert_eq!(map["people"].find(&[QueryPart::new("name", "a*")]).keys(), vec!["1", "2"]);
}

#[test]
fn test_conjunctive_parts() {
    let map = datasources();
    let hits = map["people"].find(&[QueryPart::new("name", "a*"), QueryPart::new("room", "2*")]);
    assert_eq!(hits.keys(), vec!["2"]);
}

#[test]
fn test_match_all_predicate() {
    let schema = schema_of(["a"]);
    let results = QueryResults::new(vec![
        RecordDataset::from_pairs("k1", schema.clone(), [("a", "x")]).into_ref(),
        RecordDataset::from_pairs("k2", schema, [("a", "y")]).into_ref(),
    ]);
    let predicate = DatasetPredicate::match_all();
    assert!(predicate.is_match_all());
    assert_eq!(predicate.filter(results).keys(), vec!["k1", "k2"]);
}

// =============================================================================
// Prefer Tests
// =============================================================================

/// Keys present in the preferred source come from it; the rest come from
/// the fallback.
#[test]
fn test_prefer_by_key() {
    let map = datasources();
    let rows = map["preferred"].datasets_by_key(&["ds".to_string(), "ds3".to_string()]);
    assert_eq!(rows.len(), 2);

    let ds = rows.iter().find(|r| r.key() == "ds").unwrap();
    assert_eq!(ds.get("v").unwrap(), Some("main".into()));
    let ds3 = rows.iter().find(|r| r.key() == "ds3").unwrap();
    assert_eq!(ds3.get("v").unwrap(), Some("backup".into()));
}

// =============================================================================
// Transform Tests
// =============================================================================

#[test]
fn test_pseudo_columns_keep_the_source_key() {
    let map = datasources();
    let hits = map["labelled"].find(&[QueryPart::new("name", "ada")]);
    assert_eq!(hits.keys(), vec!["1"]);
    assert_eq!(value(&hits, 0, "label"), Some("Ada (101)".into()));
    assert_eq!(value(&hits, 0, "room"), Some("101".into()));
}

// =============================================================================
// Construction Tests
// =============================================================================

#[test]
fn test_unknown_source_reference_fails() {
    let err = build(
        r#"{"D": [{"Datenquelle": [
            {"NAME": ["broken"]}, {"TYPE": ["prefer"]}, {"SOURCE": ["nowhere"]}, {"OVER": ["nothing"]}
        ]}]}"#,
    )
    .unwrap_err();
    assert_eq!(err.code(), ConfigErrorCode::UnknownSource);
}

#[test]
fn test_unknown_type_fails() {
    let err = build(r#"{"D": [{"Datenquelle": [{"NAME": ["x"]}, {"TYPE": ["ldap"]}]}]}"#).unwrap_err();
    assert_eq!(err.code(), ConfigErrorCode::UnknownLabel);
}
