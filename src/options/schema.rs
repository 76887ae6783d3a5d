//! Option schemas: the registered names and their fallback metadata

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::error::CascadeError;
use crate::value::Value;

/// Fallback metadata for one registered option
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OptionEntry {
    /// Used when nothing else provides a value
    pub default: Value,
    /// Take the unset value from the nearest ancestor's option of the same name
    pub inherit: bool,
    /// Take the unset value from another option of the same store
    pub defer: Option<String>,
}

impl OptionEntry {
    /// An entry with no default, no inheritance and no deferral
    pub fn new() -> Self {
        Self::default()
    }

    /// An entry with a default value
    pub fn with_default(default: impl Into<Value>) -> Self {
        Self {
            default: default.into(),
            ..Self::default()
        }
    }

    /// Inherit the value from the parent item
    pub fn inherited(mut self) -> Self {
        self.inherit = true;
        self
    }

    /// Set whether the value is inherited from the parent item
    pub fn with_inherit(mut self, inherit: bool) -> Self {
        self.inherit = inherit;
        self
    }

    /// Defer to another option of the same store
    pub fn deferring_to(mut self, target: impl Into<String>) -> Self {
        self.defer = Some(target.into());
        self
    }
}

/// Registered option names of one item kind
///
/// A schema is shared (behind an `Arc`) by every store of its kind,
/// including the stores of that kind's templates.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    name: String,
    entries: IndexMap<String, OptionEntry>,
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    Visiting,
    Done,
}

impl Schema {
    /// Create an empty schema; `name` identifies it in errors and diagnostics
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register an option; re-registering a name replaces its entry in place
    pub fn register(&mut self, name: impl Into<String>, entry: OptionEntry) {
        self.entries.insert(name.into(), entry);
    }

    pub fn get(&self, name: &str) -> Option<&OptionEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered names, in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|s| s.as_str())
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &OptionEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn index_of(&self, name: &str) -> Option<usize> {
        self.entries.get_index_of(name)
    }

    /// Order in which names must be resolved so that every defer target
    /// precedes the options deferring to it
    ///
    /// Names that take part in no deferral keep their registration order.
    pub fn resolution_order(&self) -> Result<Vec<&str>, CascadeError> {
        let mut marks: HashMap<&str, Mark> = HashMap::with_capacity(self.entries.len());
        let mut stack = Vec::new();
        let mut order = Vec::with_capacity(self.entries.len());
        for name in self.entries.keys() {
            self.visit(name, &mut marks, &mut stack, &mut order)?;
        }
        Ok(order)
    }

    fn visit<'s>(
        &'s self,
        name: &'s str,
        marks: &mut HashMap<&'s str, Mark>,
        stack: &mut Vec<&'s str>,
        order: &mut Vec<&'s str>,
    ) -> Result<(), CascadeError> {
        match marks.get(name) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::Visiting) => {
                let start = stack.iter().position(|n| *n == name).unwrap_or(0);
                let mut cycle: Vec<String> = stack[start..].iter().map(|n| n.to_string()).collect();
                cycle.push(name.to_string());
                return Err(CascadeError::defer_cycle(&self.name, cycle));
            }
            None => {}
        }

        marks.insert(name, Mark::Visiting);
        stack.push(name);
        if let Some(target) = self.entries.get(name).and_then(|e| e.defer.as_deref()) {
            if !self.entries.contains_key(target) {
                return Err(CascadeError::unknown_defer_target(&self.name, name, target));
            }
            self.visit(target, marks, stack, order)?;
        }
        stack.pop();
        marks.insert(name, Mark::Done);
        order.push(name);
        Ok(())
    }
}
