//! The item model
//!
//! A [`Model`] holds the frozen item kinds and one class-scope
//! [`TemplateRegistry`] per kind. Items are created from a model and form
//! trees through the child items and [`ItemContainer`]s their kind declares.

mod container;
mod item;
mod kind;
mod registry;

pub use container::ItemContainer;
pub use item::{Item, ItemId};
pub(crate) use item::Child;
pub use kind::{ItemKind, KindDef, Slot, SlotDef, SlotType};
pub use registry::{SelectorConflict, TemplateRegistry, DEFAULT_SELECTOR};

use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::CascadeError;
use crate::selector::SelectorPath;
use crate::tag::TagSpec;
use crate::value::Value;

/// Collects kind declarations for a [`Model`]
#[derive(Debug, Clone, Default)]
pub struct ModelBuilder {
    defs: Vec<KindDef>,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a kind
    pub fn kind(mut self, def: KindDef) -> Self {
        self.defs.push(def);
        self
    }

    /// Declare several kinds
    pub fn kinds(mut self, defs: impl IntoIterator<Item = KindDef>) -> Self {
        self.defs.extend(defs);
        self
    }

    /// Freeze every declared kind
    ///
    /// Fails on duplicate or unknown kinds, `extends` cycles and kinds that
    /// contain themselves.
    pub fn build(self) -> Result<Model, CascadeError> {
        let kinds = kind::freeze(self.defs)?;
        let classes = kinds
            .iter()
            .map(|(name, kind)| (name.clone(), TemplateRegistry::new(kind)))
            .collect();
        tracing::debug!(kinds = kinds.len(), "built item model");
        Ok(Model { kinds, classes })
    }
}

/// Frozen item kinds and their class-scope templates
#[derive(Debug)]
pub struct Model {
    kinds: IndexMap<String, Arc<ItemKind>>,
    classes: IndexMap<String, TemplateRegistry>,
}

impl Model {
    pub fn builder() -> ModelBuilder {
        ModelBuilder::new()
    }

    pub fn kind(&self, name: &str) -> Result<&Arc<ItemKind>, CascadeError> {
        self.kinds
            .get(name)
            .ok_or_else(|| CascadeError::unknown_kind(name))
    }

    /// Kinds in declaration order
    pub fn kinds(&self) -> impl Iterator<Item = &Arc<ItemKind>> {
        self.kinds.values()
    }

    /// Create an untagged item of `kind`
    pub fn create(&self, kind: &str) -> Result<Item, CascadeError> {
        Ok(Item::new(self.kind(kind)?))
    }

    pub fn create_tagged(&self, kind: &str, spec: impl Into<TagSpec>) -> Result<Item, CascadeError> {
        Ok(Item::tagged(self.kind(kind)?, spec))
    }

    /// Create an item with initial values; `tag` is consumed into its tags
    ///
    /// Unknown names surface in the diagnostics of the resolve call, as for
    /// [`Item::with_options`].
    pub fn create_with<I, K, V>(&self, kind: &str, options: I) -> Result<Item, CascadeError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Item::with_options(self.kind(kind)?, options)
    }

    /// Class-scope templates of `kind`
    pub fn class(&self, kind: &str) -> Result<&TemplateRegistry, CascadeError> {
        self.classes
            .get(kind)
            .ok_or_else(|| CascadeError::unknown_kind(kind))
    }

    pub fn class_mut(&mut self, kind: &str) -> Result<&mut TemplateRegistry, CascadeError> {
        self.classes
            .get_mut(kind)
            .ok_or_else(|| CascadeError::unknown_kind(kind))
    }

    /// Navigate to a class template, e.g. `plot[alpha].series[one]`
    ///
    /// The first segment names a kind and selects one of its class templates;
    /// the remaining segments walk that template's children.
    pub fn select_path(&mut self, path: &str) -> Result<&mut Item, CascadeError> {
        let path = SelectorPath::parse(path)?;
        self.template(&path)
    }

    /// Navigate to the class template at an already parsed path
    pub fn template(&mut self, path: &SelectorPath) -> Result<&mut Item, CascadeError> {
        let Some((first, rest)) = path.segments.split_first() else {
            return Err(CascadeError::unknown_kind(""));
        };
        self.class_mut(&first.name)?
            .select(first.selector_or_default())
            .navigate(rest)
    }
}
