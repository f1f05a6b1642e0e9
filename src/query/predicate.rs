//! Wildcard predicates over datasets
//!
//! A compiled predicate is the AND of one check per constraint. A column
//! the dataset does not declare, or a null value, fails its check
//! silently.

use crate::dataset::{Dataset, QueryResults};

use super::part::QueryPart;

/// How a single pattern matches a (lowercased) value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    /// `text`
    Exact(String),
    /// `text*`
    Prefix(String),
    /// `*text`
    Suffix(String),
    /// `*text*`
    Contains(String),
}

impl Matcher {
    /// Compiles a wildcard pattern
    pub fn compile(pattern: &str) -> Matcher {
        let lower = pattern.to_lowercase();
        let leading = lower.starts_with('*');
        let trailing = lower.len() > 1 && lower.ends_with('*');
        let start = usize::from(leading);
        let end = lower.len() - usize::from(trailing);
        let text = lower.get(start..end).unwrap_or_default().to_string();

        match (leading, trailing) {
            (true, true) => Matcher::Contains(text),
            (true, false) => {
                // a lone "*" matches any value
                if text.is_empty() {
                    Matcher::Contains(text)
                } else {
                    Matcher::Suffix(text)
                }
            }
            (false, true) => Matcher::Prefix(text),
            (false, false) => Matcher::Exact(text),
        }
    }

    /// Tests a raw value
    pub fn matches(&self, value: &str) -> bool {
        let value = value.to_lowercase();
        match self {
            Matcher::Exact(text) => value == *text,
            Matcher::Prefix(text) => value.starts_with(text.as_str()),
            Matcher::Suffix(text) => value.ends_with(text.as_str()),
            Matcher::Contains(text) => value.contains(text.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ColumnCheck {
    column: String,
    matcher: Matcher,
}

/// Conjunction of wildcard checks; the empty predicate matches everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetPredicate {
    checks: Vec<ColumnCheck>,
}

impl DatasetPredicate {
    /// Compiles a constraint list
    pub fn compile(parts: &[QueryPart]) -> Self {
        let checks = parts
            .iter()
            .map(|p| ColumnCheck {
                column: p.column().to_string(),
                matcher: Matcher::compile(p.pattern()),
            })
            .collect();
        Self { checks }
    }

    /// The permanently true predicate
    pub fn match_all() -> Self {
        Self::default()
    }

    pub fn is_match_all(&self) -> bool {
        self.checks.is_empty()
    }

    /// Checks if a dataset satisfies every constraint
    pub fn matches(&self, dataset: &dyn Dataset) -> bool {
        self.checks.iter().all(|check| match dataset.get(&check.column) {
            Ok(Some(value)) => check.matcher.matches(&value),
            // Undeclared column or null value = no match
            Ok(None) | Err(_) => false,
        })
    }

    /// Keeps the datasets that match, preserving order
    pub fn filter(&self, results: QueryResults) -> QueryResults {
        if self.is_match_all() {
            return results;
        }
        results
            .into_iter()
            .filter(|ds| self.matches(ds.as_ref()))
            .collect()
    }
}
