//! Search
//!
//! A [`SearchStrategy`] holds query templates per word count. [`search`]
//! splits user input into words, fills the templates for that many words
//! and returns the first non-empty result. [`AsyncSearch`] runs a single
//! column search without blocking the caller.

mod async_search;
mod runner;
mod strategy;

pub use async_search::AsyncSearch;
pub use runner::{prepare_words, search, search_by_columns};
pub use strategy::{QueryTemplate, SearchStrategy};
