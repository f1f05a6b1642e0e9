//! Template-driven search over datasources

use std::collections::HashMap;

use super::strategy::SearchStrategy;
use crate::dataset::QueryResults;
use crate::datasource::{Datasource, DatasourceMap};
use crate::observability::{log_event_with_fields, Event};
use crate::query::QueryPart;

/// Normalizes one word of user input
///
/// A word ending in `*` or `.` becomes a prefix search: the trailing `.`
/// and every `*` are removed and a single `*` is appended.
fn prepare_word(word: &str) -> String {
    let prefix_search = word.ends_with('*') || word.ends_with('.');
    let mut prepared = word.strip_suffix('.').unwrap_or(word).replace('*', "");
    if prefix_search {
        prepared.push('*');
    }
    prepared
}

/// True for a word made of nothing but `.` and `*`
fn is_wildcard_only(word: &str) -> bool {
    word.chars().all(|c| c == '*' || c == '.')
}

/// Splits user input into prepared words; commas separate like spaces
pub fn prepare_words(input: &str) -> Vec<String> {
    input
        .replace(',', " ")
        .split_whitespace()
        .map(prepare_word)
        .filter(|w| !w.is_empty())
        .collect()
}

/// Runs the templates of `strategy` for `input` in order and returns the
/// first non-empty result, carrying the schema of the datasource that
/// produced it
///
/// `None` if any argument is `None`. Input without words, or with only
/// wildcard words, finds nothing.
pub fn search(
    input: Option<&str>,
    strategy: Option<&SearchStrategy>,
    datasources: Option<&DatasourceMap>,
) -> Option<QueryResults> {
    let (input, strategy, datasources) = (input?, strategy?, datasources?);

    let words = prepare_words(input);
    if words.iter().all(|w| is_wildcard_only(w)) {
        return Some(QueryResults::empty());
    }
    let Some((count, templates)) = strategy.templates_for(words.len()) else {
        return Some(QueryResults::empty());
    };

    let words = &words[..count];
    for (index, template) in templates.iter().enumerate() {
        let Some(datasource) = datasources.get(template.datasource()) else {
            log_event_with_fields(
                Event::SearchSourceUnknown,
                &[("datasource", template.datasource())],
            );
            continue;
        };

        let query = template.resolve(words);
        let results = if query.is_empty() {
            datasource.contents()
        } else {
            datasource.find(&query)
        };

        let index = index.to_string();
        if results.is_empty() {
            log_event_with_fields(
                Event::SearchTemplateEmpty,
                &[("datasource", template.datasource()), ("template", index.as_str())],
            );
            continue;
        }
        let rows = results.len().to_string();
        log_event_with_fields(
            Event::SearchComplete,
            &[
                ("datasource", template.datasource()),
                ("template", index.as_str()),
                ("rows", rows.as_str()),
            ],
        );
        let results = match results.schema() {
            Some(_) => results,
            None => results.with_schema(datasource.schema().clone()),
        };
        return Some(results);
    }
    Some(QueryResults::empty())
}

/// One conjunctive query built from a column → pattern map
///
/// Constraints are ordered by column name.
pub fn search_by_columns(query: &HashMap<String, String>, datasource: &dyn Datasource) -> QueryResults {
    let mut parts: Vec<QueryPart> = query
        .iter()
        .map(|(column, pattern)| QueryPart::new(column.as_str(), pattern.as_str()))
        .collect();
    parts.sort_by(|a, b| a.column().cmp(b.column()));
    datasource.find(&parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigNode;
    use crate::datasource::testing::ram_source;

    fn datasources() -> DatasourceMap {
        let mut map = DatasourceMap::new();
        map.insert(
            "people".into(),
            ram_source(
                "people",
                &["first", "last"],
                &[&["p1", "Ada", "Lovelace"], &["p2", "Alan", "Turing"], &["p3", "Alan", "Kay"]],
            ),
        );
        map
    }

    fn strategy(json: &str) -> SearchStrategy {
        SearchStrategy::parse(&ConfigNode::from_json(json).unwrap()).unwrap()
    }

    #[test]
    fn test_prepare_words() {
        assert_eq!(prepare_words("  Ada,Lovelace "), vec!["Ada", "Lovelace"]);
        assert_eq!(prepare_words("Tur. *a*b*"), vec!["Tur*", "ab*"]);
        assert_eq!(prepare_words("* . **"), vec!["*", "*", "*"]);
        assert!(prepare_words(" , ").is_empty());
    }

    #[test]
    fn test_none_arguments() {
        let s = SearchStrategy::new();
        let map = datasources();
        assert!(search(None, Some(&s), Some(&map)).is_none());
        assert!(search(Some("x"), None, Some(&map)).is_none());
        assert!(search(Some("x"), Some(&s), None).is_none());
    }

    #[test]
    fn test_wildcard_only_input_finds_nothing() {
        let s = strategy(r#"{"S": [{"people": [{"last": ["${suchanfrage1}"]}]}]}"#);
        let map = datasources();
        assert!(search(Some("* ."), Some(&s), Some(&map)).unwrap().is_empty());
        assert!(search(Some("   "), Some(&s), Some(&map)).unwrap().is_empty());
    }

    #[test]
    fn test_combined_wildcards_find_nothing() {
        let s = strategy(r#"{"S": [{"people": [{"last": ["${suchanfrage1}"]}]}]}"#);
        let mut map = datasources();
        map.insert(
            "people".into(),
            ram_source("people", &["first", "last"], &[&["p1", "", ".net"], &["p2", "Alan", "Kay"]]),
        );
        for input in ["..", "*.*", ".*", "*. .., *"] {
            let hits = search(Some(input), Some(&s), Some(&map)).unwrap();
            assert!(hits.is_empty(), "{input:?} found {:?}", hits.keys());
        }
        let dotted = search(Some(".net"), Some(&s), Some(&map)).unwrap();
        assert_eq!(dotted.keys(), vec!["p1"]);
    }

    #[test]
    fn test_first_non_empty_template_wins() {
        let s = strategy(
            r#"{"S": [
                {"people": [{"last": ["${suchanfrage1}"]}]},
                {"people": [{"first": ["${suchanfrage1}"]}]},
                {"people": [{"last": ["*"]}]}
            ]}"#,
        );
        let map = datasources();
        let hits = search(Some("alan"), Some(&s), Some(&map)).unwrap();
        assert_eq!(hits.keys(), vec!["p2", "p3"]);
        let schema = hits.schema().unwrap();
        assert_eq!(schema.to_vec(), vec!["first", "last"]);
    }

    #[test]
    fn test_unknown_datasource_is_skipped() {
        let s = strategy(
            r#"{"S": [
                {"ldap": [{"last": ["${suchanfrage1}"]}]},
                {"people": [{"first": ["${suchanfrage1}"]}, {"last": ["${suchanfrage2}"]}]}
            ]}"#,
        );
        let map = datasources();
        // two words select the two-placeholder template
        let hits = search(Some("ada love."), Some(&s), Some(&map)).unwrap();
        assert_eq!(hits.keys(), vec!["p1"]);
        let none = search(Some("kay"), Some(&s), Some(&map)).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_search_by_columns() {
        let map = datasources();
        let query: HashMap<String, String> = [("first", "al*"), ("last", "k*")]
            .into_iter()
            .map(|(c, p)| (c.to_string(), p.to_string()))
            .collect();
        let hits = search_by_columns(&query, map["people"].as_ref());
        assert_eq!(hits.keys(), vec!["p3"]);
    }
}
