//! Column constraints

use serde::{Deserialize, Serialize};

/// A (column, pattern) constraint
///
/// The pattern may carry a leading and/or trailing `*` wildcard and is
/// matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryPart {
    column: String,
    pattern: String,
}

impl QueryPart {
    pub fn new(column: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            pattern: pattern.into(),
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Number of wildcard ends (0, 1 or 2)
    fn star_count(&self) -> usize {
        let p = &self.pattern;
        let mut stars = 0;
        if p.starts_with('*') {
            stars += 1;
        }
        if p.len() > 1 && p.ends_with('*') {
            stars += 1;
        }
        stars
    }

    /// Number of characters that are not wildcard ends
    fn literal_len(&self) -> usize {
        self.pattern.chars().count() - self.star_count()
    }
}

/// Picks the part that narrows a search the most
///
/// Scanning in order, a part replaces the current best if it has no
/// wildcard while the best has one, if it has more literal characters, or
/// if it has as many literal characters and fewer wildcards.
pub fn most_restricting_part(parts: &[QueryPart]) -> Option<&QueryPart> {
    let mut best: Option<&QueryPart> = None;
    for part in parts {
        let better = match best {
            None => true,
            Some(b) => {
                let (stars, literal) = (part.star_count(), part.literal_len());
                let (best_stars, best_literal) = (b.star_count(), b.literal_len());
                (stars == 0 && best_stars > 0)
                    || literal > best_literal
                    || (literal == best_literal && stars < best_stars)
            }
        };
        if better {
            best = Some(part);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_beats_wildcard() {
        let parts = vec![
            QueryPart::new("a", "Meier*"),
            QueryPart::new("b", "Li"),
        ];
        assert_eq!(most_restricting_part(&parts).unwrap().column(), "b");
    }

    #[test]
    fn test_longer_literal_wins() {
        let parts = vec![
            QueryPart::new("a", "Mei*"),
            QueryPart::new("b", "*Meierhof*"),
        ];
        assert_eq!(most_restricting_part(&parts).unwrap().column(), "b");
    }

    #[test]
    fn test_empty_input() {
        assert!(most_restricting_part(&[]).is_none());
    }
}
