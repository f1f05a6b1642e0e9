//! Engine configuration file
//!
//! A JSON document naming the datasources to build, an optional function
//! library, an optional search strategy and number formatting.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{ConfigError, ConfigResult};
use super::node::ConfigNode;
use crate::observability::{log_event_with_fields, Event, Severity};

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Datasource descriptions, built in order
    #[serde(default)]
    pub datasources: Vec<ConfigNode>,

    /// Function library section (children are named definitions)
    #[serde(default)]
    pub functions: Option<ConfigNode>,

    /// Search strategy section
    #[serde(default)]
    pub search: Option<ConfigNode>,

    /// Decimal separator used by numeric functions (default '.')
    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: char,

    /// Minimum log severity (default "warn")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_decimal_separator() -> char {
    '.'
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            datasources: Vec::new(),
            functions: None,
            search: None,
            decimal_separator: default_decimal_separator(),
            log_level: default_log_level(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::io(format!("failed to read config: {}", e)))?;
        let config = Self::from_json(&content)?;

        let shown = path.display().to_string();
        let count = config.datasources.len().to_string();
        log_event_with_fields(
            Event::ConfigLoaded,
            &[("path", shown.as_str()), ("datasources", count.as_str())],
        );
        Ok(config)
    }

    /// Parse and validate configuration text
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: EngineConfig = serde_json::from_str(content)
            .map_err(|e| ConfigError::parse(format!("invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        let sep = self.decimal_separator;
        if sep.is_ascii_digit() || sep == '-' || sep == '+' || sep.is_whitespace() {
            return Err(ConfigError::invalid_value(format!(
                "invalid decimal_separator: '{}'",
                sep
            )));
        }
        if Severity::parse(&self.log_level).is_none() {
            return Err(ConfigError::invalid_value(format!(
                "invalid log_level: '{}'",
                self.log_level
            )));
        }
        Ok(())
    }

    /// The configured minimum log severity
    pub fn severity(&self) -> Severity {
        Severity::parse(&self.log_level).unwrap_or(Severity::Warn)
    }
}
