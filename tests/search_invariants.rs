//! Search Invariant Tests
//!
//! - Templates are chosen by word count and tried in order
//! - The first template with rows wins
//! - Async searches resolve to empty results instead of failing

use std::collections::HashMap;

use docdata::config::ConfigNode;
use docdata::datasource::{DatasourceFactory, DatasourceMap};
use docdata::function::{FunctionFactory, FunctionLibrary};
use docdata::search::{search, search_by_columns, AsyncSearch, SearchStrategy};

// =============================================================================
// Helper Functions
// =============================================================================

fn datasources() -> DatasourceMap {
    let section = ConfigNode::from_json(
        r#"{"Datenquellen": [
            {"Datenquelle": [
                {"NAME": ["people"]}, {"TYPE": ["ram"]},
                {"Schema": ["first", "last", "city"]}, {"Schluessel": ["first", "last"]},
                {"Daten": [
                    {"": ["Ada", "Lovelace", "London"]},
                    {"": ["Alan", "Turing", "Wilmslow"]},
                    {"": ["Alan", "Kay", "Boulder"]}
                ]}
            ]}
        ]}"#,
    )
    .unwrap();
    let lib = FunctionLibrary::new();
    DatasourceFactory::new()
        .build_all(section.children(), &FunctionFactory::new(&lib))
        .unwrap()
}

fn strategy(json: &str) -> SearchStrategy {
    SearchStrategy::parse(&ConfigNode::from_json(json).unwrap()).unwrap()
}

// =============================================================================
// Template Order Tests
// =============================================================================

/// An empty first template falls through to the next one.
#[test]
fn test_second_template_answers_when_first_is_empty() {
    let s = strategy(
        r#"{"Suche": [
            {"people": [{"city": ["${suchanfrage1}"]}]},
            {"people": [{"first": ["${suchanfrage1}"]}]}
        ]}"#,
    );
    let map = datasources();
    let hits = search(Some("alan"), Some(&s), Some(&map)).unwrap();
    assert_eq!(hits.len(), 2);
    for row in hits.iter() {
        assert_eq!(row.get("first").unwrap(), Some("Alan".into()));
    }
}

/// Input with more words than any template uses the largest template.
#[test]
fn test_templates_chosen_by_word_count() {
    let s = strategy(
        r#"{"Suche": [
            {"people": [{"last": ["${suchanfrage1}"]}]},
            {"people": [{"first": ["${suchanfrage1}"]}, {"last": ["${suchanfrage2}"]}]}
        ]}"#,
    );
    let map = datasources();
    let one = search(Some("kay"), Some(&s), Some(&map)).unwrap();
    assert_eq!(one.len(), 1);

    let many = search(Some("alan tur. extra"), Some(&s), Some(&map)).unwrap();
    assert_eq!(many.len(), 1);
    assert_eq!(many.get(0).unwrap().get("city").unwrap(), Some("Wilmslow".into()));
}

#[test]
fn test_unknown_datasource_is_skipped() {
    let s = strategy(
        r#"{"Suche": [
            {"nowhere": [{"first": ["${suchanfrage1}"]}]},
            {"people": [{"first": ["${suchanfrage1}"]}]}
        ]}"#,
    );
    let map = datasources();
    assert_eq!(search(Some("ada"), Some(&s), Some(&map)).unwrap().len(), 1);
}

#[test]
fn test_no_matches_is_empty_not_none() {
    let s = strategy(r#"{"Suche": [{"people": [{"first": ["${suchanfrage1}"]}]}]}"#);
    let map = datasources();
    assert!(search(Some("grace"), Some(&s), Some(&map)).unwrap().is_empty());
}

// =============================================================================
// Column Search Tests
// =============================================================================

#[test]
fn test_search_by_columns_is_conjunctive() {
    let map = datasources();
    let query: HashMap<String, String> = [("first", "alan"), ("city", "b*")]
        .into_iter()
        .map(|(c, p)| (c.to_string(), p.to_string()))
        .collect();
    let hits = search_by_columns(&query, map["people"].as_ref());
    assert_eq!(hits.len(), 1);
    assert_eq!(hits.get(0).unwrap().get("last").unwrap(), Some("Kay".into()));
}

// =============================================================================
// Async Search Tests
// =============================================================================

#[tokio::test]
async fn test_async_search_without_datasource_is_empty() {
    let query = HashMap::from([("first".to_string(), "ada".to_string())]);
    let results = AsyncSearch::new(Some(query), None).run().await;
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_async_search_finds_rows() {
    let map = datasources();
    let query = HashMap::from([("last".to_string(), "t*".to_string())]);
    let handle = AsyncSearch::new(Some(query), Some(map["people"].clone())).spawn();
    let results = handle.await.unwrap();
    assert_eq!(results.len(), 1);
}
