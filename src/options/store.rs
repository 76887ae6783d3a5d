//! Per-item option values and single-store resolution

use std::sync::Arc;

use indexmap::IndexMap;

use super::schema::{OptionEntry, Schema};
use crate::diagnostic::Diagnostic;
use crate::error::CascadeError;
use crate::value::{OptionMap, Value};

/// Explicitly set option values, backed by a shared schema
///
/// Absence of a value means "unset", not "default". Stores may share a
/// schema but never share their values.
#[derive(Debug, Clone, Default)]
pub struct OptionStore {
    schema: Arc<Schema>,
    values: IndexMap<String, Value>,
}

impl OptionStore {
    /// Create an empty store backed by `schema`
    pub fn new(schema: Arc<Schema>) -> Self {
        Self {
            schema,
            values: IndexMap::new(),
        }
    }

    /// Create an empty store sharing this store's schema
    pub fn derive(&self) -> Self {
        Self::new(Arc::clone(&self.schema))
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Register an option
    ///
    /// If the schema is shared with other stores it is copied first, so
    /// registering never changes a sibling store.
    pub fn register(&mut self, name: impl Into<String>, entry: OptionEntry) {
        Arc::make_mut(&mut self.schema).register(name, entry);
    }

    /// Set values, returning a diagnostic for every unregistered name
    ///
    /// Values for unregistered names are stored anyway.
    pub fn set<I, K, V>(&mut self, values: I) -> Vec<Diagnostic>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut diagnostics = Vec::new();
        for (name, value) in values {
            let name = name.into();
            if !self.schema.contains(&name) {
                diagnostics.push(Diagnostic::unknown_option(self.schema.name(), &name));
            }
            self.values.insert(name, value.into());
        }
        diagnostics
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// The explicitly set values
    pub fn values(&self) -> &IndexMap<String, Value> {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Names that were set but are not registered
    pub fn unknown_names(&self) -> impl Iterator<Item = &str> {
        self.values
            .keys()
            .map(|s| s.as_str())
            .filter(|name| !self.schema.contains(name))
    }

    /// The default of every registered option
    pub fn fallback_values(&self) -> OptionMap {
        self.schema
            .entries()
            .map(|(name, entry)| (name.to_string(), entry.default.clone()))
            .collect()
    }

    /// Resolve every registered option of this store
    ///
    /// `templates` must be ordered by ascending priority. For each name the
    /// value is the first available of: this store's value, the value of the
    /// highest-priority template that sets it, the inherited value (only for
    /// options registered with `inherit`), the resolved value of the defer
    /// target, and finally the default.
    pub fn resolve(
        &self,
        templates: &[&OptionStore],
        inherited: &OptionMap,
    ) -> Result<OptionMap, CascadeError> {
        let order = self.schema.resolution_order()?;
        let mut resolved = OptionMap::with_capacity(order.len());

        for name in order {
            let Some(entry) = self.schema.get(name) else {
                continue;
            };
            let value = self
                .values
                .get(name)
                .or_else(|| templates.iter().rev().find_map(|t| t.values.get(name)))
                .or_else(|| entry.inherit.then(|| inherited.get(name)).flatten())
                .or_else(|| {
                    entry
                        .defer
                        .as_deref()
                        .and_then(|target| resolved.get(target))
                })
                .unwrap_or(&entry.default)
                .clone();
            resolved.insert(name.to_string(), value);
        }

        // Present names in registration order rather than resolution order
        resolved.sort_by(|a, _, b, _| self.schema.index_of(a).cmp(&self.schema.index_of(b)));
        Ok(resolved)
    }
}
