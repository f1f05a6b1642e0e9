//! Observable events
//!
//! Every line the crate logs names one of these events.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Engine configuration file loaded
    ConfigLoaded,
    /// A datasource was constructed and registered
    DatasourceBuilt,

    // Datasource queries
    /// A leaf transport failed; the query degraded to no results
    DatasourceQueryFailed,
    /// A row lacked a column its datasource declares
    DatasourceColumnMissing,

    // Function engine
    /// A function library or transformation entry was rejected and skipped
    FunctionDefinitionRejected,
    /// A registered external callable failed during evaluation
    ExternCallFailed,

    // Search
    /// A search template names a datasource that does not exist
    SearchSourceUnknown,
    /// A search template produced no rows, trying the next one
    SearchTemplateEmpty,
    /// A search produced rows
    SearchComplete,
    /// A background search task could not be joined
    AsyncSearchFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::DatasourceBuilt => "DATASOURCE_BUILT",
            Event::DatasourceQueryFailed => "DATASOURCE_QUERY_FAILED",
            Event::DatasourceColumnMissing => "DATASOURCE_COLUMN_MISSING",
            Event::FunctionDefinitionRejected => "FUNCTION_DEFINITION_REJECTED",
            Event::ExternCallFailed => "EXTERN_CALL_FAILED",
            Event::SearchSourceUnknown => "SEARCH_SOURCE_UNKNOWN",
            Event::SearchTemplateEmpty => "SEARCH_TEMPLATE_EMPTY",
            Event::SearchComplete => "SEARCH_COMPLETE",
            Event::AsyncSearchFailed => "ASYNC_SEARCH_FAILED",
        }
    }

    /// Severity this event is logged at
    pub fn severity(&self) -> super::Severity {
        use super::Severity;
        match self {
            Event::ConfigLoaded | Event::DatasourceBuilt | Event::SearchComplete => Severity::Info,
            Event::SearchTemplateEmpty => Severity::Trace,
            Event::DatasourceQueryFailed
            | Event::DatasourceColumnMissing
            | Event::FunctionDefinitionRejected
            | Event::ExternCallFailed
            | Event::SearchSourceUnknown => Severity::Warn,
            Event::AsyncSearchFailed => Severity::Error,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
