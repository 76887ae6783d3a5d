//! Item kinds: the static shape of an item
//!
//! A kind names its option schema and the ordered child slots every item of
//! the kind carries. Kinds are declared with [`KindDef`] and frozen into
//! [`ItemKind`]s when a model is built.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::CascadeError;
use crate::options::{OptionEntry, Schema};

/// Whether a slot holds one child item or a container of items
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotType {
    Item,
    Container,
}

impl SlotType {
    pub(crate) fn describe(self) -> &'static str {
        match self {
            SlotType::Item => "child item",
            SlotType::Container => "container",
        }
    }
}

/// A named child slot of a frozen kind
#[derive(Debug)]
pub struct Slot {
    name: String,
    kind: Arc<ItemKind>,
    slot_type: SlotType,
}

impl Slot {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kind of the child item, or of the container's elements
    pub fn kind(&self) -> &Arc<ItemKind> {
        &self.kind
    }

    pub fn slot_type(&self) -> SlotType {
        self.slot_type
    }
}

/// A frozen item kind
#[derive(Debug)]
pub struct ItemKind {
    name: String,
    schema: Arc<Schema>,
    slots: Vec<Slot>,
}

impl ItemKind {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot_index(&self, name: &str) -> Option<usize> {
        self.slots.iter().position(|s| s.name == name)
    }

    pub fn slot(&self, name: &str) -> Option<&Slot> {
        self.slots.iter().find(|s| s.name == name)
    }
}

/// Declaration of a child slot, referring to its kind by name
#[derive(Debug, Clone, PartialEq)]
pub struct SlotDef {
    pub name: String,
    pub kind: String,
    pub slot_type: SlotType,
}

/// Declaration of an item kind
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KindDef {
    pub name: String,
    pub extends: Option<String>,
    pub options: Vec<(String, OptionEntry)>,
    pub slots: Vec<SlotDef>,
}

impl KindDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Start from the options and slots of another kind
    pub fn extends(mut self, base: impl Into<String>) -> Self {
        self.extends = Some(base.into());
        self
    }

    /// Register an option
    pub fn option(mut self, name: impl Into<String>, entry: OptionEntry) -> Self {
        self.options.push((name.into(), entry));
        self
    }

    /// Declare a single child item
    pub fn child(mut self, name: impl Into<String>, kind: impl Into<String>) -> Self {
        self.slots.push(SlotDef {
            name: name.into(),
            kind: kind.into(),
            slot_type: SlotType::Item,
        });
        self
    }

    /// Declare a container of child items
    pub fn container(mut self, name: impl Into<String>, kind: impl Into<String>) -> Self {
        self.slots.push(SlotDef {
            name: name.into(),
            kind: kind.into(),
            slot_type: SlotType::Container,
        });
        self
    }
}

/// Freeze kind declarations, in declaration order
pub(crate) fn freeze(defs: Vec<KindDef>) -> Result<IndexMap<String, Arc<ItemKind>>, CascadeError> {
    let mut by_name: IndexMap<String, KindDef> = IndexMap::with_capacity(defs.len());
    for def in defs {
        if by_name.contains_key(&def.name) {
            return Err(CascadeError::DuplicateKind { name: def.name });
        }
        by_name.insert(def.name.clone(), def);
    }

    let mut freezer = Freezer {
        defs: &by_name,
        frozen: HashMap::new(),
        stack: Vec::new(),
    };
    by_name
        .keys()
        .map(|name| freezer.freeze(name).map(|kind| (name.clone(), kind)))
        .collect()
}

type Flattened = (IndexMap<String, OptionEntry>, Vec<SlotDef>);

struct Freezer<'d> {
    defs: &'d IndexMap<String, KindDef>,
    frozen: HashMap<String, Arc<ItemKind>>,
    /// Kinds whose slots are being frozen, for structural cycle detection
    stack: Vec<String>,
}

impl Freezer<'_> {
    fn freeze(&mut self, name: &str) -> Result<Arc<ItemKind>, CascadeError> {
        if let Some(kind) = self.frozen.get(name) {
            return Ok(Arc::clone(kind));
        }
        if let Some(start) = self.stack.iter().position(|n| n == name) {
            let mut cycle = self.stack[start..].to_vec();
            cycle.push(name.to_string());
            return Err(CascadeError::StructuralCycle { cycle });
        }

        let (options, slot_defs) = self.flatten(name, &mut Vec::new())?;

        self.stack.push(name.to_string());
        let mut slots = Vec::with_capacity(slot_defs.len());
        for def in slot_defs {
            let kind = self.freeze(&def.kind)?;
            slots.push(Slot {
                name: def.name,
                kind,
                slot_type: def.slot_type,
            });
        }
        self.stack.pop();

        let mut schema = Schema::new(name);
        for (option, entry) in options {
            schema.register(option, entry);
        }

        let kind = Arc::new(ItemKind {
            name: name.to_string(),
            schema: Arc::new(schema),
            slots,
        });
        self.frozen.insert(name.to_string(), Arc::clone(&kind));
        Ok(kind)
    }

    /// Options and slots of a kind with its `extends` chain applied
    fn flatten(&self, name: &str, chain: &mut Vec<String>) -> Result<Flattened, CascadeError> {
        if let Some(start) = chain.iter().position(|n| n == name) {
            let mut cycle = chain[start..].to_vec();
            cycle.push(name.to_string());
            return Err(CascadeError::ExtendsCycle { cycle });
        }
        let def = self
            .defs
            .get(name)
            .ok_or_else(|| CascadeError::unknown_kind(name))?;

        chain.push(name.to_string());
        let (mut options, mut slots) = match &def.extends {
            Some(base) => self.flatten(base, chain)?,
            None => (IndexMap::new(), Vec::new()),
        };
        chain.pop();

        for (option, entry) in &def.options {
            options.insert(option.clone(), entry.clone());
        }
        for slot in &def.slots {
            match slots.iter_mut().find(|s| s.name == slot.name) {
                Some(existing) => *existing = slot.clone(),
                None => slots.push(slot.clone()),
            }
        }
        Ok((options, slots))
    }
}
