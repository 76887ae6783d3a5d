//! Items: nodes of the option-bearing tree

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::container::ItemContainer;
use super::kind::{ItemKind, SlotType};
use crate::diagnostic::Diagnostic;
use crate::error::CascadeError;
use crate::options::OptionStore;
use crate::selector::{Segment, SelectorPath};
use crate::tag::{self, Tag, TagSpec, TAG_OPTION};
use crate::value::Value;

/// Identity of an item, unique for the lifetime of the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(u64);

impl ItemId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Content of one declared slot
#[derive(Debug)]
pub(crate) enum Child {
    Item(Item),
    Container(ItemContainer),
}

/// A node in the hierarchy
///
/// An item owns its option values, its tags and one child item or item
/// container per slot declared by its kind. Templates are items too; they
/// are just never part of a real tree.
#[derive(Debug)]
pub struct Item {
    id: ItemId,
    kind: Arc<ItemKind>,
    tags: Vec<Tag>,
    options: OptionStore,
    children: Vec<Child>,
}

impl Item {
    /// Create an untagged item with no values set
    pub fn new(kind: &Arc<ItemKind>) -> Self {
        let children = kind
            .slots()
            .iter()
            .map(|slot| match slot.slot_type() {
                SlotType::Item => Child::Item(Item::new(slot.kind())),
                SlotType::Container => Child::Container(ItemContainer::new(slot.kind())),
            })
            .collect();
        Self {
            id: ItemId::next(),
            kind: Arc::clone(kind),
            tags: Vec::new(),
            options: OptionStore::new(Arc::clone(kind.schema())),
            children,
        }
    }

    /// Create an item carrying the tags of `spec`
    pub fn tagged(kind: &Arc<ItemKind>, spec: impl Into<TagSpec>) -> Self {
        let mut item = Self::new(kind);
        item.tags = tag::parse(spec);
        item
    }

    /// Create an item with initial values
    ///
    /// The reserved `tag` option is consumed into the tag list instead of
    /// being stored. Names the kind does not declare are stored anyway and
    /// reported as unknown-option diagnostics when the item is resolved; use
    /// [`Item::set`] to get them immediately.
    pub fn with_options<I, K, V>(kind: &Arc<ItemKind>, options: I) -> Result<Self, CascadeError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut item = Self::new(kind);
        let mut values = Vec::new();
        for (name, value) in options {
            let name = name.into();
            let value = value.into();
            if name == TAG_OPTION {
                item.tags.extend(tag::parse_value(&value)?);
            } else {
                values.push((name, value));
            }
        }
        item.options.set(values);
        Ok(item)
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn kind(&self) -> &Arc<ItemKind> {
        &self.kind
    }

    pub fn kind_name(&self) -> &str {
        self.kind.name()
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn options(&self) -> &OptionStore {
        &self.options
    }

    /// Merge values into this item's options
    pub fn set<I, K, V>(&mut self, values: I) -> Vec<Diagnostic>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.options.set(values)
    }

    /// The child item declared as `name`
    pub fn child(&self, name: &str) -> Result<&Item, CascadeError> {
        match self.slot(name, SlotType::Item)? {
            Child::Item(item) => Ok(item),
            Child::Container(_) => Err(self.mismatch(name, SlotType::Item)),
        }
    }

    pub fn child_mut(&mut self, name: &str) -> Result<&mut Item, CascadeError> {
        let index = self.slot_position(name, SlotType::Item)?;
        match &mut self.children[index] {
            Child::Item(item) => Ok(item),
            Child::Container(_) => Err(CascadeError::slot_mismatch(
                self.kind.name(),
                name,
                SlotType::Item.describe(),
            )),
        }
    }

    /// The item container declared as `name`
    pub fn container(&self, name: &str) -> Result<&ItemContainer, CascadeError> {
        match self.slot(name, SlotType::Container)? {
            Child::Container(container) => Ok(container),
            Child::Item(_) => Err(self.mismatch(name, SlotType::Container)),
        }
    }

    pub fn container_mut(&mut self, name: &str) -> Result<&mut ItemContainer, CascadeError> {
        let index = self.slot_position(name, SlotType::Container)?;
        match &mut self.children[index] {
            Child::Container(container) => Ok(container),
            Child::Item(_) => Err(CascadeError::slot_mismatch(
                self.kind.name(),
                name,
                SlotType::Container.describe(),
            )),
        }
    }

    /// Child items with their slot names, in declaration order
    pub fn child_items(&self) -> impl Iterator<Item = (&str, &Item)> {
        self.kind
            .slots()
            .iter()
            .zip(&self.children)
            .filter_map(|(slot, child)| match child {
                Child::Item(item) => Some((slot.name(), item)),
                Child::Container(_) => None,
            })
    }

    /// Item containers with their slot names, in declaration order
    pub fn containers(&self) -> impl Iterator<Item = (&str, &ItemContainer)> {
        self.kind
            .slots()
            .iter()
            .zip(&self.children)
            .filter_map(|(slot, child)| match child {
                Child::Container(container) => Some((slot.name(), container)),
                Child::Item(_) => None,
            })
    }

    /// Slot contents, parallel to the kind's slots
    pub(crate) fn children(&self) -> &[Child] {
        &self.children
    }

    pub(crate) fn child_at(&self, index: usize) -> Option<&Item> {
        match self.children.get(index)? {
            Child::Item(item) => Some(item),
            Child::Container(_) => None,
        }
    }

    pub(crate) fn container_at(&self, index: usize) -> Option<&ItemContainer> {
        match self.children.get(index)? {
            Child::Container(container) => Some(container),
            Child::Item(_) => None,
        }
    }

    /// Navigate to a template below this item, e.g. `plots[alpha].series`
    ///
    /// Container segments select a template of that container (the default
    /// template without a selector); child item segments take no selector.
    pub fn select_path(&mut self, path: &str) -> Result<&mut Item, CascadeError> {
        let path = SelectorPath::parse(path)?;
        self.navigate(&path.segments)
    }

    pub(crate) fn navigate(&mut self, segments: &[Segment]) -> Result<&mut Item, CascadeError> {
        let Some((segment, rest)) = segments.split_first() else {
            return Ok(self);
        };
        let index = self
            .kind
            .slot_index(&segment.name)
            .ok_or_else(|| CascadeError::unknown_slot(self.kind.name(), &segment.name))?;

        let next = match &mut self.children[index] {
            Child::Item(child) => {
                if segment.selector.is_some() {
                    return Err(CascadeError::UnexpectedSelector {
                        kind: self.kind.name().to_string(),
                        slot: segment.name.clone(),
                    });
                }
                child
            }
            Child::Container(container) => container.select(segment.selector_or_default()),
        };
        next.navigate(rest)
    }

    fn slot(&self, name: &str, expected: SlotType) -> Result<&Child, CascadeError> {
        let index = self.slot_position(name, expected)?;
        Ok(&self.children[index])
    }

    fn slot_position(&self, name: &str, expected: SlotType) -> Result<usize, CascadeError> {
        let index = self
            .kind
            .slot_index(name)
            .ok_or_else(|| CascadeError::unknown_slot(self.kind.name(), name))?;
        if self.kind.slots()[index].slot_type() != expected {
            return Err(self.mismatch(name, expected));
        }
        Ok(index)
    }

    fn mismatch(&self, name: &str, expected: SlotType) -> CascadeError {
        CascadeError::slot_mismatch(self.kind.name(), name, expected.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::kind::{freeze, KindDef};
    use crate::options::OptionEntry;
    use indexmap::IndexMap;

    fn kinds() -> IndexMap<String, Arc<ItemKind>> {
        freeze(vec![
            KindDef::new("plot")
                .option("a", OptionEntry::new().inherited())
                .child("legend", "legend")
                .container("series", "series"),
            KindDef::new("legend").option("a", OptionEntry::new()),
            KindDef::new("series").option("a", OptionEntry::new()),
        ])
        .expect("Should freeze")
    }

    #[test]
    fn test_ids_are_unique() {
        let kinds = kinds();
        let a = Item::new(&kinds["series"]);
        let b = Item::new(&kinds["series"]);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_new_builds_declared_slots() {
        let kinds = kinds();
        let plot = Item::new(&kinds["plot"]);
        assert_eq!(plot.child("legend").expect("legend").kind_name(), "legend");
        assert!(plot.container("series").expect("series").is_empty());
        assert_eq!(
            plot.child_items().map(|(name, _)| name).collect::<Vec<_>>(),
            vec!["legend"]
        );
        assert_eq!(
            plot.containers().map(|(name, _)| name).collect::<Vec<_>>(),
            vec!["series"]
        );
    }

    #[test]
    fn test_slot_errors() {
        let kinds = kinds();
        let plot = Item::new(&kinds["plot"]);
        assert!(matches!(
            plot.child("axis"),
            Err(CascadeError::UnknownSlot { .. })
        ));
        assert!(matches!(
            plot.child("series"),
            Err(CascadeError::SlotMismatch { .. })
        ));
        assert!(matches!(
            plot.container("legend"),
            Err(CascadeError::SlotMismatch { .. })
        ));
    }

    #[test]
    fn test_with_options_consumes_tag() {
        let kinds = kinds();
        let item = Item::with_options(
            &kinds["series"],
            [("a", Value::from(3)), ("tag", Value::from("one,two"))],
        )
        .expect("Should create");
        assert_eq!(item.tags(), &["one".to_string(), "two".to_string()]);
        assert!(item.has_tag("two"));
        assert_eq!(item.options().get("a"), Some(&Value::Int(3)));
        assert!(item.options().get("tag").is_none());
    }

    #[test]
    fn test_with_options_rejects_invalid_tag() {
        let kinds = kinds();
        let err = Item::with_options(&kinds["series"], [("tag", 3)]).expect_err("Should fail");
        assert!(matches!(err, CascadeError::InvalidTagSpec { .. }));
    }

    #[test]
    fn test_select_path() {
        let kinds = kinds();
        let mut plot = Item::new(&kinds["plot"]);
        let id = plot.select_path("series[one]").expect("Should select").id();
        let template = plot
            .container_mut("series")
            .expect("series")
            .select("one")
            .id();
        assert_eq!(id, template);

        let legend = plot.child("legend").expect("legend").id();
        assert_eq!(plot.select_path("legend").expect("legend").id(), legend);
    }

    #[test]
    fn test_select_path_rejects_selector_on_child_item() {
        let kinds = kinds();
        let mut plot = Item::new(&kinds["plot"]);
        assert!(matches!(
            plot.select_path("legend[one]"),
            Err(CascadeError::UnexpectedSelector { .. })
        ));
        assert!(matches!(
            plot.select_path("axis"),
            Err(CascadeError::UnknownSlot { .. })
        ));
    }
}
