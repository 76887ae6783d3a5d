//! Template registry for tag-selected templates
//!
//! The same registry type backs both scopes: every item kind has one in the
//! [`Model`](super::Model) (class scope), and every item container has its
//! own (container scope).

use std::sync::Arc;

use indexmap::IndexMap;

use super::item::Item;
use super::kind::ItemKind;
use crate::diagnostic::Diagnostic;
use crate::tag::Tag;
use crate::value::Value;

/// Selector of the default template, which applies to every item
pub const DEFAULT_SELECTOR: &str = "";

/// Two or more tag templates matching one item that disagree on an option
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorConflict {
    pub option: String,
    /// Selectors setting the option, in ascending priority
    pub selectors: Vec<String>,
}

/// Lazily populated templates of one kind, keyed by selector
#[derive(Debug)]
pub struct TemplateRegistry {
    kind: Arc<ItemKind>,
    templates: IndexMap<String, Item>,
}

impl TemplateRegistry {
    /// Create an empty registry for templates of `kind`
    pub fn new(kind: &Arc<ItemKind>) -> Self {
        Self {
            kind: Arc::clone(kind),
            templates: IndexMap::new(),
        }
    }

    pub fn kind(&self) -> &Arc<ItemKind> {
        &self.kind
    }

    /// Get the template for `selector`, creating it on first access
    pub fn select(&mut self, selector: &str) -> &mut Item {
        let kind = &self.kind;
        self.templates
            .entry(selector.to_string())
            .or_insert_with(|| Item::new(kind))
    }

    /// The default template
    pub fn all(&mut self) -> &mut Item {
        self.select(DEFAULT_SELECTOR)
    }

    /// Set options on the default template
    pub fn set<I, K, V>(&mut self, values: I) -> Vec<Diagnostic>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.all().set(values)
    }

    /// Get an existing template without creating it
    pub fn get(&self, selector: &str) -> Option<&Item> {
        self.templates.get(selector)
    }

    pub fn contains(&self, selector: &str) -> bool {
        self.templates.contains_key(selector)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Selectors in creation order
    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(|s| s.as_str())
    }

    /// Templates applying to an item with `tags`, in ascending priority
    ///
    /// The default template comes first, followed by every tag template whose
    /// selector is one of `tags`, in creation order. Among several matching
    /// tag templates the one created last therefore wins.
    pub fn matching_templates(&self, tags: &[Tag]) -> Vec<&Item> {
        self.templates
            .get(DEFAULT_SELECTOR)
            .into_iter()
            .chain(
                self.matching_tag_templates(tags)
                    .into_iter()
                    .map(|(_, template)| template),
            )
            .collect()
    }

    fn matching_tag_templates(&self, tags: &[Tag]) -> Vec<(&str, &Item)> {
        self.templates
            .iter()
            .filter(|(selector, _)| !selector.is_empty() && tags.contains(*selector))
            .map(|(selector, template)| (selector.as_str(), template))
            .collect()
    }

    /// Options on which the tag templates matching `tags` disagree
    pub fn conflicts(&self, tags: &[Tag]) -> Vec<SelectorConflict> {
        let matched = self.matching_tag_templates(tags);
        if matched.len() < 2 {
            return Vec::new();
        }

        let mut conflicts: Vec<SelectorConflict> = Vec::new();
        for (_, template) in &matched {
            for (option, value) in template.options().values() {
                if conflicts.iter().any(|c| &c.option == option) {
                    continue;
                }
                let setters: Vec<(&str, &Value)> = matched
                    .iter()
                    .filter_map(|(selector, t)| t.options().get(option).map(|v| (*selector, v)))
                    .collect();
                if setters.iter().any(|(_, v)| *v != value) {
                    conflicts.push(SelectorConflict {
                        option: option.clone(),
                        selectors: setters.iter().map(|(s, _)| s.to_string()).collect(),
                    });
                }
            }
        }
        conflicts
    }
}
