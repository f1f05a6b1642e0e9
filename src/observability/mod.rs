//! Observability subsystem
//!
//! Structured JSON logging for the few places where the crate degrades
//! instead of failing: leaf transport errors, rejected library entries,
//! failed external callables and search fallbacks.
//!
//! # Usage
//!
//! ```ignore
//! use docdata::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::DatasourceQueryFailed, &[("datasource", "ldap")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log an event at its own severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log an event at its own severity with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
