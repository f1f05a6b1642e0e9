//! Configuration error types
//!
//! Every failure to build a datasource or a function graph from its
//! configuration tree surfaces as a [`ConfigError`]. These are authoring
//! mistakes: they are raised eagerly and nothing is partially constructed.
//!
//! Error codes:
//! - DOCDATA_CONFIG_MISSING_KEY
//! - DOCDATA_CONFIG_UNKNOWN_SOURCE
//! - DOCDATA_CONFIG_UNKNOWN_LABEL
//! - DOCDATA_CONFIG_ARITY
//! - DOCDATA_CONFIG_DUPLICATE
//! - DOCDATA_CONFIG_INVALID_VALUE
//! - DOCDATA_CONFIG_PATTERN
//! - DOCDATA_CONFIG_SCHEMA_CONFLICT
//! - DOCDATA_CONFIG_UNKNOWN_CALLABLE
//! - DOCDATA_CONFIG_UNKNOWN_PROMPT
//! - DOCDATA_CONFIG_IO
//! - DOCDATA_CONFIG_PARSE

use std::fmt;

/// Configuration error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorCode {
    /// A required key is absent
    MissingKey,
    /// A referenced datasource has not been defined (yet)
    UnknownSource,
    /// A node label does not select any constructor
    UnknownLabel,
    /// Wrong number of children
    Arity,
    /// A key or name appears more than once where it must be unique
    Duplicate,
    /// A value is present but not acceptable
    InvalidValue,
    /// A regular expression does not compile
    Pattern,
    /// Column names clash or schemas disagree
    SchemaConflict,
    /// An EXTERN reference cannot be resolved
    UnknownCallable,
    /// A prompt-bound node names an unknown prompt or field
    UnknownPrompt,
    /// Reading a configuration file failed
    Io,
    /// A configuration file is not well-formed
    Parse,
}

impl ConfigErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            ConfigErrorCode::MissingKey => "DOCDATA_CONFIG_MISSING_KEY",
            ConfigErrorCode::UnknownSource => "DOCDATA_CONFIG_UNKNOWN_SOURCE",
            ConfigErrorCode::UnknownLabel => "DOCDATA_CONFIG_UNKNOWN_LABEL",
            ConfigErrorCode::Arity => "DOCDATA_CONFIG_ARITY",
            ConfigErrorCode::Duplicate => "DOCDATA_CONFIG_DUPLICATE",
            ConfigErrorCode::InvalidValue => "DOCDATA_CONFIG_INVALID_VALUE",
            ConfigErrorCode::Pattern => "DOCDATA_CONFIG_PATTERN",
            ConfigErrorCode::SchemaConflict => "DOCDATA_CONFIG_SCHEMA_CONFLICT",
            ConfigErrorCode::UnknownCallable => "DOCDATA_CONFIG_UNKNOWN_CALLABLE",
            ConfigErrorCode::UnknownPrompt => "DOCDATA_CONFIG_UNKNOWN_PROMPT",
            ConfigErrorCode::Io => "DOCDATA_CONFIG_IO",
            ConfigErrorCode::Parse => "DOCDATA_CONFIG_PARSE",
        }
    }
}

impl fmt::Display for ConfigErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Construction-time configuration error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    code: ConfigErrorCode,
    message: String,
}

impl ConfigError {
    fn new(code: ConfigErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// A required key is missing from the description of `owner`
    pub fn missing_key(owner: &str, key: &str) -> Self {
        if owner.is_empty() {
            Self::new(ConfigErrorCode::MissingKey, format!("{} is missing", key))
        } else {
            Self::new(
                ConfigErrorCode::MissingKey,
                format!("{} is missing in definition of '{}'", key, owner),
            )
        }
    }

    /// `owner` references a datasource that is not defined
    pub fn unknown_source(owner: &str, referenced: &str) -> Self {
        Self::new(
            ConfigErrorCode::UnknownSource,
            format!(
                "datasource '{}' references undefined datasource '{}'",
                owner, referenced
            ),
        )
    }

    /// No constructor is registered for `label`
    pub fn unknown_label(label: &str) -> Self {
        Self::new(
            ConfigErrorCode::UnknownLabel,
            format!("unknown label '{}'", label),
        )
    }

    /// Wrong number of children
    pub fn arity(message: impl Into<String>) -> Self {
        Self::new(ConfigErrorCode::Arity, message)
    }

    /// Something that must be unique appears twice
    pub fn duplicate(message: impl Into<String>) -> Self {
        Self::new(ConfigErrorCode::Duplicate, message)
    }

    /// A value is not acceptable
    pub fn invalid_value(message: impl Into<String>) -> Self {
        Self::new(ConfigErrorCode::InvalidValue, message)
    }

    /// A pattern does not compile
    pub fn pattern(pattern: &str, reason: impl fmt::Display) -> Self {
        Self::new(
            ConfigErrorCode::Pattern,
            format!("invalid regular expression '{}': {}", pattern, reason),
        )
    }

    /// Columns clash or schemas disagree
    pub fn schema_conflict(message: impl Into<String>) -> Self {
        Self::new(ConfigErrorCode::SchemaConflict, message)
    }

    /// An external callable cannot be resolved
    pub fn unknown_callable(message: impl Into<String>) -> Self {
        Self::new(ConfigErrorCode::UnknownCallable, message)
    }

    /// A prompt or prompt field cannot be resolved
    pub fn unknown_prompt(message: impl Into<String>) -> Self {
        Self::new(ConfigErrorCode::UnknownPrompt, message)
    }

    /// A configuration file cannot be read
    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ConfigErrorCode::Io, message)
    }

    /// A configuration file cannot be parsed
    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ConfigErrorCode::Parse, message)
    }

    /// Returns the error code
    pub fn code(&self) -> ConfigErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Result type for configuration-driven construction
pub type ConfigResult<T> = Result<T, ConfigError>;
