//! docdata - federated record sources and a declarative expression engine
//!
//! Uniform key-value records ([`dataset`]) come from pluggable sources
//! ([`datasource`]) that compose by attaching, overlaying, preferring,
//! transforming, renaming and concatenating each other. Sources answer
//! conjunctive wildcard queries ([`query`]). Pseudo-columns are computed
//! by function graphs ([`function`], [`transform`]) built from labeled
//! configuration trees ([`config`]). A word-count driven strategy turns
//! free text into queries ([`search`]).

pub mod cli;
pub mod config;
pub mod dataset;
pub mod datasource;
pub mod function;
pub mod observability;
pub mod query;
pub mod search;
pub mod transform;
