//! Named-value contexts for evaluation

use std::collections::HashMap;

/// Named-value lookup used by VALUE nodes
pub trait Values {
    /// Returns true if `id` has a value
    fn has_value(&self, id: &str) -> bool;

    /// Value of `id`, empty if it has none
    fn get_string(&self, id: &str) -> String;

    /// Value of `id` read as a boolean
    fn get_boolean(&self, id: &str) -> bool {
        self.get_string(id).eq_ignore_ascii_case("true")
    }
}

/// The empty context
#[derive(Debug, Clone, Copy, Default)]
pub struct NoValues;

impl Values for NoValues {
    fn has_value(&self, _id: &str) -> bool {
        false
    }

    fn get_string(&self, _id: &str) -> String {
        String::new()
    }
}

/// A mutable map context
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimpleValues {
    values: HashMap<String, String>,
}

impl SimpleValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `id`, returning the previous value
    pub fn put(&mut self, id: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.values.insert(id.into(), value.into())
    }

    pub fn remove(&mut self, id: &str) -> Option<String> {
        self.values.remove(id)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SimpleValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let values = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self { values }
    }
}

impl Values for SimpleValues {
    fn has_value(&self, id: &str) -> bool {
        self.values.contains_key(id)
    }

    fn get_string(&self, id: &str) -> String {
        self.values.get(id).cloned().unwrap_or_default()
    }
}
