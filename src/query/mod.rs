//! Query model
//!
//! Constraints are (column, pattern) pairs; `*text`, `text*`, `*text*`
//! and `text` select suffix, prefix, substring and exact matching, all
//! case-insensitive.

mod part;
mod predicate;

pub use part::{most_restricting_part, QueryPart};
pub use predicate::{DatasetPredicate, Matcher};
