//! Search templates

use std::collections::BTreeMap;

use crate::config::{ConfigError, ConfigNode, ConfigResult};
use crate::query::QueryPart;

const PLACEHOLDER_PREFIX: &str = "${suchanfrage";

/// One query against one datasource
///
/// Patterns may contain `${suchanfrageN}` placeholders, replaced by the
/// N-th word of the user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTemplate {
    datasource: String,
    parts: Vec<QueryPart>,
}

impl QueryTemplate {
    pub fn new(datasource: impl Into<String>, parts: Vec<QueryPart>) -> Self {
        Self {
            datasource: datasource.into(),
            parts,
        }
    }

    pub fn datasource(&self) -> &str {
        &self.datasource
    }

    pub fn parts(&self) -> &[QueryPart] {
        &self.parts
    }

    /// Highest placeholder number used, i.e. the words this template needs
    pub fn word_count(&self) -> usize {
        self.parts
            .iter()
            .flat_map(|p| placeholders(p.pattern()))
            .max()
            .unwrap_or(0)
    }

    /// The query with the first `words.len()` placeholders replaced
    pub fn resolve(&self, words: &[String]) -> Vec<QueryPart> {
        self.parts
            .iter()
            .map(|part| {
                let pattern = words.iter().enumerate().fold(
                    part.pattern().to_string(),
                    |pattern, (i, word)| {
                        pattern.replace(&format!("{PLACEHOLDER_PREFIX}{}}}", i + 1), word)
                    },
                );
                QueryPart::new(part.column(), pattern)
            })
            .collect()
    }
}

/// Numbers of all well-formed placeholders in `pattern`
fn placeholders(pattern: &str) -> Vec<usize> {
    pattern
        .match_indices(PLACEHOLDER_PREFIX)
        .filter_map(|(at, _)| {
            let rest = &pattern[at + PLACEHOLDER_PREFIX.len()..];
            let end = rest.find('}')?;
            rest[..end].parse().ok()
        })
        .collect()
}

/// Query templates grouped by the number of words they consume, each
/// group in configuration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStrategy {
    by_word_count: BTreeMap<usize, Vec<QueryTemplate>>,
}

impl SearchStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a section whose children are templates: the label names the
    /// datasource, each grandchild is `column("pattern")`
    pub fn parse(section: &ConfigNode) -> ConfigResult<Self> {
        let mut strategy = Self::new();
        for template in section.children() {
            let parts = template
                .children()
                .iter()
                .map(|part| {
                    let pattern = part.scalar().filter(|_| !part.is_leaf()).ok_or_else(|| {
                        ConfigError::invalid_value(format!(
                            "search template for \"{}\" needs column(\"pattern\") entries, found \"{}\"",
                            template.name(),
                            part.name()
                        ))
                    })?;
                    Ok(QueryPart::new(part.name(), pattern))
                })
                .collect::<ConfigResult<Vec<_>>>()?;
            strategy.add(QueryTemplate::new(template.name(), parts));
        }
        Ok(strategy)
    }

    pub fn add(&mut self, template: QueryTemplate) {
        self.by_word_count
            .entry(template.word_count())
            .or_default()
            .push(template);
    }

    /// Templates for `words` words, falling back to the largest smaller
    /// count that has any; the count actually used comes first
    pub fn templates_for(&self, words: usize) -> Option<(usize, &[QueryTemplate])> {
        self.by_word_count
            .range(..=words)
            .next_back()
            .map(|(count, templates)| (*count, templates.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.by_word_count.is_empty()
    }
}
