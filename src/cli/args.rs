//! CLI argument definitions using clap
//!
//! Commands:
//! - docdata search --config <path> --query <text>
//! - docdata eval --expr <json> [--value name=value ...]
//! - docdata schema --config <path> --source <name>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// docdata - federated record sources and a declarative expression engine
#[derive(Parser, Debug)]
#[command(name = "docdata")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the configured search strategy and print matching rows
    Search {
        /// Path to configuration file
        #[arg(long, default_value = "./docdata.json")]
        config: PathBuf,

        /// Search input, as a user would type it
        #[arg(long)]
        query: String,
    },

    /// Evaluate one function and print its string and boolean results
    Eval {
        /// Function in JSON form, e.g. {"AND": ["true", "true"]}
        #[arg(long)]
        expr: String,

        /// Input values as name=value
        #[arg(long = "value", value_name = "NAME=VALUE")]
        values: Vec<String>,

        /// Optional configuration providing the function library and
        /// number format
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the schema of a datasource
    Schema {
        /// Path to configuration file
        #[arg(long, default_value = "./docdata.json")]
        config: PathBuf,

        /// Datasource name
        #[arg(long)]
        source: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_eval_with_values() {
        let cli = Cli::parse_from([
            "docdata", "eval", "--expr", r#"{"VALUE": ["a"]}"#, "--value", "a=1", "--value", "b=x=y",
        ]);
        match cli.command {
            Command::Eval { expr, values, config } => {
                assert!(expr.contains("VALUE"));
                assert_eq!(values, vec!["a=1", "b=x=y"]);
                assert!(config.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_search_defaults_config_path() {
        let cli = Cli::parse_from(["docdata", "search", "--query", "ada"]);
        match cli.command {
            Command::Search { config, query } => {
                assert_eq!(config, PathBuf::from("./docdata.json"));
                assert_eq!(query, "ada");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
