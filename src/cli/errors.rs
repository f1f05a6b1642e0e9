//! CLI-specific error types
//!
//! Every CLI error is fatal: `main` prints it and exits non-zero.

use std::io;

use thiserror::Error;

use crate::config::ConfigError;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown datasource: {0}")]
    UnknownDatasource(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CliError {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.code().code(),
            Self::Io(_) => "DOCDATA_CLI_IO_ERROR",
            Self::Json(_) => "DOCDATA_CLI_JSON_ERROR",
            Self::UnknownDatasource(_) => "DOCDATA_CLI_UNKNOWN_DATASOURCE",
            Self::InvalidArgument(_) => "DOCDATA_CLI_INVALID_ARGUMENT",
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
