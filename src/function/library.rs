//! Named function definitions

use std::collections::HashMap;
use std::sync::Arc;

use super::node::Function;

/// Named functions, with an optional fallback library
#[derive(Debug, Clone, Default)]
pub struct FunctionLibrary {
    functions: HashMap<String, Arc<Function>>,
    base: Option<Arc<FunctionLibrary>>,
}

impl FunctionLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// A library that falls back to `base` for unknown names
    pub fn with_base(base: Arc<FunctionLibrary>) -> Self {
        Self {
            functions: HashMap::new(),
            base: Some(base),
        }
    }

    /// Adds or replaces `name`
    pub fn add(&mut self, name: impl Into<String>, function: Function) {
        self.functions.insert(name.into(), Arc::new(function));
    }

    /// Looks up `name` here, then in the base library
    pub fn get(&self, name: &str) -> Option<Arc<Function>> {
        match self.functions.get(name) {
            Some(f) => Some(Arc::clone(f)),
            None => self.base.as_ref().and_then(|b| b.get(name)),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Removes `name` from this library (not from the base)
    pub fn remove(&mut self, name: &str) -> bool {
        self.functions.remove(name).is_some()
    }

    /// Names defined in this library, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.functions.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
