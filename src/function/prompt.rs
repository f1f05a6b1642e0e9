//! # Interactive Prompts
//!
//! Prompt-bound function nodes read a field from an interactive prompt.
//! A [`PromptLibrary`] holds prompt templates by name; a [`PromptContext`]
//! is owned by the caller (typically one per open session) and holds the
//! live instance of each prompt for that session.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

/// How an interactive prompt was closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptOutcome {
    Confirmed,
    Cancelled,
}

/// Interactive prompt supplied by the host
pub trait Prompt: Send + Sync {
    /// Shows the prompt and waits until it is closed
    fn show(&self) -> PromptOutcome;

    /// The instance of this prompt that belongs to `context`
    fn instance_for(&self, context: &PromptContext) -> Arc<dyn Prompt>;

    /// Field ids this prompt can supply
    fn schema(&self) -> Vec<String>;

    /// Current value of `field`, `None` if unavailable
    fn data(&self, field: &str) -> Option<String>;
}

/// Named prompt templates
#[derive(Clone, Default)]
pub struct PromptLibrary {
    prompts: HashMap<String, Arc<dyn Prompt>>,
    base: Option<Arc<PromptLibrary>>,
}

impl PromptLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// A library that falls back to `base` for unknown names
    pub fn with_base(base: Arc<PromptLibrary>) -> Self {
        Self {
            prompts: HashMap::new(),
            base: Some(base),
        }
    }

    pub fn add(&mut self, name: impl Into<String>, prompt: Arc<dyn Prompt>) {
        self.prompts.insert(name.into(), prompt);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Prompt>> {
        match self.prompts.get(name) {
            Some(prompt) => Some(Arc::clone(prompt)),
            None => self.base.as_ref().and_then(|b| b.get(name)),
        }
    }
}

impl fmt::Debug for PromptLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.prompts.keys().collect();
        names.sort();
        f.debug_struct("PromptLibrary")
            .field("prompts", &names)
            .field("base", &self.base)
            .finish()
    }
}

/// Session state for prompt-bound functions
///
/// Synchronization is internal, but which context an evaluation sees is
/// the caller's decision.
#[derive(Default)]
pub struct PromptContext {
    instances: Mutex<HashMap<String, Arc<dyn Prompt>>>,
}

impl PromptContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// The live instance of prompt `name`, created from `template` on
    /// first use. `None` if the context is unusable.
    pub fn instance(&self, name: &str, template: &dyn Prompt) -> Option<Arc<dyn Prompt>> {
        if let Some(existing) = self.instances.lock().ok()?.get(name) {
            return Some(Arc::clone(existing));
        }

        // instance_for may consult this context, so no lock is held here
        let created = template.instance_for(self);

        let mut instances = self.instances.lock().ok()?;
        let entry = instances.entry(name.to_string()).or_insert(created);
        Some(Arc::clone(entry))
    }

    /// Drops the instance of prompt `name`
    pub fn reset(&self, name: &str) {
        if let Ok(mut instances) = self.instances.lock() {
            instances.remove(name);
        }
    }

    /// Number of live instances
    pub fn len(&self) -> usize {
        self.instances.lock().map(|i| i.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for PromptContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptContext")
            .field("instances", &self.len())
            .finish()
    }
}
