//! CLI command implementations
//!
//! Every command loads its configuration the same way: parse the file,
//! apply the log level, build the function library, then the datasources
//! in declaration order.

use std::path::Path;
use std::sync::Arc;

use serde_json::json;

use crate::config::{ConfigNode, EngineConfig};
use crate::datasource::{DatasourceFactory, DatasourceMap};
use crate::function::{FunctionFactory, FunctionLibrary, NumberFormat, SimpleValues};
use crate::observability::Logger;
use crate::search::{search, SearchStrategy};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{row_to_json, write_json};

/// A configuration with everything it describes built
pub struct Loaded {
    pub config: EngineConfig,
    pub library: Arc<FunctionLibrary>,
    pub datasources: DatasourceMap,
    pub strategy: Option<SearchStrategy>,
}

/// Run the CLI with parsed arguments
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Execute a command
pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Search { config, query } => search_command(&config, &query),
        Command::Eval {
            expr,
            values,
            config,
        } => eval(&expr, &values, config.as_deref()),
        Command::Schema { config, source } => schema(&config, &source),
    }
}

/// Load a configuration file and build its function library,
/// datasources and search strategy
pub fn load(path: &Path) -> CliResult<Loaded> {
    let config = EngineConfig::load(path)?;
    Logger::set_min_severity(config.severity());

    let library = Arc::new(build_library(&config));
    let format = NumberFormat::new(config.decimal_separator);
    let functions = FunctionFactory::new(&library).with_format(format);

    let mut factory = DatasourceFactory::new();
    if let Some(dir) = path.parent() {
        factory = factory.with_base_dir(dir);
    }
    let datasources = factory.build_all(&config.datasources, &functions)?;

    let strategy = config
        .search
        .as_ref()
        .map(SearchStrategy::parse)
        .transpose()?;

    Ok(Loaded {
        config,
        library,
        datasources,
        strategy,
    })
}

fn build_library(config: &EngineConfig) -> FunctionLibrary {
    let Some(section) = &config.functions else {
        return FunctionLibrary::new();
    };
    let empty = FunctionLibrary::new();
    let format = NumberFormat::new(config.decimal_separator);
    FunctionFactory::new(&empty)
        .with_format(format)
        .parse_functions(section, None)
}

/// Search command: one JSON line per matching row
pub fn search_command(config_path: &Path, query: &str) -> CliResult<()> {
    let loaded = load(config_path)?;
    let results = search(
        Some(query),
        loaded.strategy.as_ref(),
        Some(&loaded.datasources),
    )
    .unwrap_or_default();

    let columns: Vec<String> = results.schema().map(|s| s.to_vec()).unwrap_or_default();
    for row in results.iter() {
        write_json(&row_to_json(row.as_ref(), &columns))?;
    }
    Ok(())
}

/// Eval command: evaluates a JSON function against `name=value` inputs
pub fn eval(expr: &str, values: &[String], config_path: Option<&Path>) -> CliResult<()> {
    let (library, format) = match config_path {
        Some(path) => {
            let loaded = load(path)?;
            let format = NumberFormat::new(loaded.config.decimal_separator);
            (loaded.library, format)
        }
        None => (Arc::new(FunctionLibrary::new()), NumberFormat::default()),
    };

    let node = ConfigNode::from_json(expr)?;
    let function = FunctionFactory::new(&library)
        .with_format(format)
        .parse(&node)?;
    let inputs = parse_values(values)?;

    let outcome = function.evaluate(&inputs);
    write_json(&json!({
        "string": outcome.as_str(),
        "boolean": outcome.truthy(),
        "error": outcome.is_error(),
    }))
}

/// Schema command: prints the columns of one datasource
pub fn schema(config_path: &Path, source: &str) -> CliResult<()> {
    let loaded = load(config_path)?;
    let datasource = loaded
        .datasources
        .get(source)
        .ok_or_else(|| CliError::UnknownDatasource(source.to_string()))?;
    write_json(&json!({
        "datasource": datasource.name(),
        "columns": datasource.schema().to_vec(),
    }))
}

fn parse_values(values: &[String]) -> CliResult<SimpleValues> {
    let mut inputs = SimpleValues::new();
    for entry in values {
        let (name, value) = entry.split_once('=').ok_or_else(|| {
            CliError::InvalidArgument(format!("expected name=value, got \"{entry}\""))
        })?;
        if name.is_empty() {
            return Err(CliError::InvalidArgument(format!(
                "empty value name in \"{entry}\""
            )));
        }
        inputs.put(name, value);
    }
    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::Values;
    use std::fs;
    use tempfile::TempDir;

    const CONFIG: &str = r#"{
        "log_level": "error",
        "functions": {"Funktionen": [
            {"adult": [{"GE": [{"VALUE": ["age"]}, "18"]}]}
        ]},
        "datasources": [
            {"Datenquelle": [
                {"NAME": ["people"]},
                {"TYPE": ["ram"]},
                {"Schema": ["name", "city"]},
                {"Schluessel": ["name"]},
                {"Daten": [
                    {"r1": [{"name": ["Ada"]}, {"city": ["London"]}]},
                    {"r2": [{"name": ["Alan"]}, {"city": ["Wilmslow"]}]}
                ]}
            ]}
        ],
        "search": {"Suche": [
            {"people": [{"name": ["${suchanfrage1}*"]}]}
        ]}
    }"#;

    fn write_config(dir: &TempDir) -> std::path::PathBuf {
        let path = dir.path().join("docdata.json");
        fs::write(&path, CONFIG).unwrap();
        path
    }

    #[test]
    fn test_load_builds_everything() {
        let dir = TempDir::new().unwrap();
        let loaded = load(&write_config(&dir)).unwrap();
        assert!(loaded.datasources.contains_key("people"));
        assert!(loaded.library.contains("adult"));
        assert!(loaded.strategy.is_some());
    }

    #[test]
    fn test_search_through_loaded_config() {
        let dir = TempDir::new().unwrap();
        let loaded = load(&write_config(&dir)).unwrap();
        let results = search(
            Some("al"),
            loaded.strategy.as_ref(),
            Some(&loaded.datasources),
        )
        .unwrap();
        assert_eq!(results.keys(), vec!["Alan"]);
    }

    #[test]
    fn test_unknown_datasource() {
        let dir = TempDir::new().unwrap();
        let err = schema(&write_config(&dir), "nobody").unwrap_err();
        assert_eq!(err.code(), "DOCDATA_CLI_UNKNOWN_DATASOURCE");
    }

    #[test]
    fn test_missing_config_file() {
        let dir = TempDir::new().unwrap();
        let err = load(&dir.path().join("absent.json")).err().unwrap();
        assert_eq!(err.code(), "DOCDATA_CONFIG_IO");
    }

    #[test]
    fn test_parse_values() {
        let inputs = parse_values(&["a=1".to_string(), "b=x=y".to_string()]).unwrap();
        assert_eq!(inputs.get_string("a"), "1");
        assert_eq!(inputs.get_string("b"), "x=y");
        assert!(parse_values(&["novalue".to_string()]).is_err());
        assert!(parse_values(&["=1".to_string()]).is_err());
    }
}
