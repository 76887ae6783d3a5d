//! Homogeneous, ordered collections of items

use std::sync::Arc;

use super::item::Item;
use super::kind::ItemKind;
use super::registry::TemplateRegistry;
use crate::diagnostic::Diagnostic;
use crate::error::CascadeError;
use crate::tag::TagSpec;
use crate::value::Value;

/// Items of one kind, with templates scoped to this container
#[derive(Debug)]
pub struct ItemContainer {
    kind: Arc<ItemKind>,
    items: Vec<Item>,
    templates: TemplateRegistry,
}

impl ItemContainer {
    pub fn new(kind: &Arc<ItemKind>) -> Self {
        Self {
            kind: Arc::clone(kind),
            items: Vec::new(),
            templates: TemplateRegistry::new(kind),
        }
    }

    /// Kind of every element
    pub fn kind(&self) -> &Arc<ItemKind> {
        &self.kind
    }

    /// Append an untagged item and return it
    pub fn add(&mut self) -> &mut Item {
        let item = Item::new(&self.kind);
        self.push(item)
    }

    /// Append an item carrying the tags of `spec`
    pub fn add_tagged(&mut self, spec: impl Into<TagSpec>) -> &mut Item {
        let item = Item::tagged(&self.kind, spec);
        self.push(item)
    }

    /// Append an item with initial values; `tag` is consumed into its tags
    ///
    /// Unknown names surface in the diagnostics of the resolve call, as for
    /// [`Item::with_options`].
    pub fn add_with<I, K, V>(&mut self, options: I) -> Result<&mut Item, CascadeError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let item = Item::with_options(&self.kind, options)?;
        Ok(self.push(item))
    }

    fn push(&mut self, item: Item) -> &mut Item {
        let index = self.items.len();
        self.items.push(item);
        &mut self.items[index]
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut [Item] {
        &mut self.items
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Item> {
        self.items.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The most recently added item
    pub fn last(&self) -> Option<&Item> {
        self.items.last()
    }

    pub fn last_mut(&mut self) -> Option<&mut Item> {
        self.items.last_mut()
    }

    pub fn templates(&self) -> &TemplateRegistry {
        &self.templates
    }

    pub fn templates_mut(&mut self) -> &mut TemplateRegistry {
        &mut self.templates
    }

    /// Container template for `selector`, created on first access
    pub fn select(&mut self, selector: &str) -> &mut Item {
        self.templates.select(selector)
    }

    /// The container's default template
    pub fn all(&mut self) -> &mut Item {
        self.templates.all()
    }

    /// Set options on the container's default template
    pub fn set<I, K, V>(&mut self, values: I) -> Vec<Diagnostic>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.templates.set(values)
    }
}
