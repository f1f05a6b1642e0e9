//! # External Callables
//!
//! Hosts register named callables at startup; EXTERN nodes resolve them
//! when parsed. A callable receives its arguments in the order the EXTERN
//! node's `PARAMS` list declares them.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use super::errors::{ExternError, ExternResult};

/// Signature of a registered callable
pub type ExternFn = dyn Fn(&[String]) -> ExternResult<String> + Send + Sync;

/// A registered callable and its arity
#[derive(Clone)]
pub struct ExternEntry {
    arity: usize,
    callable: Arc<ExternFn>,
}

impl ExternEntry {
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Invokes the callable
    pub fn call(&self, args: &[String]) -> ExternResult<String> {
        (self.callable)(args)
    }
}

impl fmt::Debug for ExternEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternEntry")
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// Registry of external callables
#[derive(Debug, Default)]
pub struct ExternRegistry {
    by_name: RwLock<HashMap<String, ExternEntry>>,
}

impl ExternRegistry {
    /// Create a new registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callable under `name`
    pub fn register<F>(&self, name: impl Into<String>, arity: usize, callable: F) -> ExternResult<()>
    where
        F: Fn(&[String]) -> ExternResult<String> + Send + Sync + 'static,
    {
        let name = name.into();
        let mut by_name = self
            .by_name
            .write()
            .map_err(|_| ExternError::Internal("Lock poisoned".into()))?;
        if by_name.contains_key(&name) {
            return Err(ExternError::AlreadyRegistered(name));
        }
        by_name.insert(
            name,
            ExternEntry {
                arity,
                callable: Arc::new(callable),
            },
        );
        Ok(())
    }

    /// Look up a callable
    pub fn get(&self, name: &str) -> Option<ExternEntry> {
        self.by_name.read().ok()?.get(name).cloned()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = match self.by_name.read() {
            Ok(by_name) => by_name.keys().cloned().collect(),
            Err(_) => Vec::new(),
        };
        names.sort();
        names
    }
}
