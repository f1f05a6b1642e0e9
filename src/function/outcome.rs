//! Evaluation results and the error sentinel

use std::fmt;

/// Text form of the error sentinel
///
/// A plain string equal to this text is *not* the sentinel; only
/// ISERRORSTRING treats the two alike.
pub const ERROR_TEXT: &str = "!#FEHLERHAFTE DATEN#!";

/// Result of evaluating a function
///
/// Evaluation never fails with an error; bad runtime data yields
/// [`Outcome::Error`], which propagates through composites and is false
/// as a boolean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Value(String),
    Error,
}

impl Outcome {
    pub fn value(s: impl Into<String>) -> Self {
        Outcome::Value(s.into())
    }

    /// "true" or "false"
    pub fn from_bool(b: bool) -> Self {
        Outcome::Value(if b { "true" } else { "false" }.to_string())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Error)
    }

    /// Boolean reading: the value equals "true" ignoring ASCII case
    pub fn truthy(&self) -> bool {
        match self {
            Outcome::Value(s) => s.eq_ignore_ascii_case("true"),
            Outcome::Error => false,
        }
    }

    /// String reading; the sentinel reads as [`ERROR_TEXT`]
    pub fn as_str(&self) -> &str {
        match self {
            Outcome::Value(s) => s,
            Outcome::Error => ERROR_TEXT,
        }
    }

    pub fn into_string(self) -> String {
        match self {
            Outcome::Value(s) => s,
            Outcome::Error => ERROR_TEXT.to_string(),
        }
    }

    /// The value, or `None` for the sentinel
    pub fn ok(self) -> Option<String> {
        match self {
            Outcome::Value(s) => Some(s),
            Outcome::Error => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
