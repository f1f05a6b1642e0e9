//! CLI module for docdata
//!
//! Provides command-line interface for:
//! - search: Run the configured search strategy
//! - eval: Evaluate one function
//! - schema: Print a datasource's columns

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{eval, load, run, run_command, schema, search_command, Loaded};
pub use errors::{CliError, CliResult};
pub use io::{row_to_json, write_json};
