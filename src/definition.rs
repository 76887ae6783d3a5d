//! Item kind definitions in TOML
//!
//! ```toml
//! [kinds.plot.options]
//! color = { inherit = true }
//! lineColor = { defer = "color" }
//! lineWidth = { default = 1 }
//!
//! [[kinds.plot.slots]]
//! name = "legend"
//! item = "legend"
//!
//! [[kinds.plot.slots]]
//! name = "series"
//! container = "series"
//! ```
//!
//! Kinds and options keep their document order.

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::model::{KindDef, Model, ModelBuilder};
use crate::options::OptionEntry;
use crate::value::Value;

/// Kind declarations read from a TOML document
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Definition {
    pub kinds: Vec<KindDef>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlDefinition {
    #[serde(default)]
    kinds: IndexMap<String, TomlKind>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlKind {
    extends: Option<String>,
    #[serde(default)]
    options: IndexMap<String, TomlOption>,
    #[serde(default)]
    slots: Vec<TomlSlot>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlOption {
    #[serde(default)]
    default: Value,
    #[serde(default)]
    inherit: bool,
    defer: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlSlot {
    name: String,
    item: Option<String>,
    container: Option<String>,
}

impl Definition {
    /// Load a definition from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a definition from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlDefinition = toml::from_str(content)?;
        let kinds = parsed
            .kinds
            .into_iter()
            .map(|(name, kind)| kind.into_def(name))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Definition { kinds })
    }

    /// A model builder holding these kinds
    pub fn into_builder(self) -> ModelBuilder {
        ModelBuilder::new().kinds(self.kinds)
    }

    /// Build a model from these kinds alone
    pub fn build(self) -> Result<Model, ConfigError> {
        Ok(self.into_builder().build()?)
    }
}

impl TomlKind {
    fn into_def(self, name: String) -> Result<KindDef, ConfigError> {
        let mut def = KindDef::new(name);
        def.extends = self.extends;
        for (option, entry) in self.options {
            def = def.option(option, entry.into());
        }
        for slot in self.slots {
            def = match (slot.item, slot.container) {
                (Some(kind), None) => def.child(slot.name, kind),
                (None, Some(kind)) => def.container(slot.name, kind),
                _ => {
                    return Err(ConfigError::invalid(format!(
                        "slot '{}' of kind '{}' must name exactly one of 'item' or 'container'",
                        slot.name, def.name
                    )))
                }
            };
        }
        Ok(def)
    }
}

impl From<TomlOption> for OptionEntry {
    fn from(option: TomlOption) -> Self {
        OptionEntry {
            default: option.default,
            inherit: option.inherit,
            defer: option.defer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SlotType;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"
[kinds.base.options]
lineWidth = { default = 1 }

[kinds.plot]
extends = "base"

[kinds.plot.options]
color = { inherit = true }
lineColor = { defer = "color" }

[[kinds.plot.slots]]
name = "legend"
item = "legend"

[[kinds.plot.slots]]
name = "series"
container = "legend"

[kinds.legend]
"#;

    #[test]
    fn test_parse_definition() {
        let def = Definition::from_str(SAMPLE).expect("Should parse");
        assert_eq!(
            def.kinds.iter().map(|k| k.name.as_str()).collect::<Vec<_>>(),
            vec!["base", "plot", "legend"]
        );

        let plot = &def.kinds[1];
        assert_eq!(plot.extends.as_deref(), Some("base"));
        assert_eq!(
            plot.options,
            vec![
                ("color".to_string(), OptionEntry::new().inherited()),
                ("lineColor".to_string(), OptionEntry::new().deferring_to("color")),
            ]
        );
        assert_eq!(plot.slots[0].slot_type, SlotType::Item);
        assert_eq!(plot.slots[1].slot_type, SlotType::Container);
    }

    #[test]
    fn test_build_model() {
        let model = Definition::from_str(SAMPLE)
            .and_then(Definition::build)
            .expect("Should build");
        let plot = model.kind("plot").expect("plot");
        assert_eq!(
            plot.schema().names().collect::<Vec<_>>(),
            vec!["lineWidth", "color", "lineColor"]
        );
    }

    #[test]
    fn test_slot_needs_exactly_one_kind() {
        let err = Definition::from_str(
            r#"
[[kinds.plot.slots]]
name = "legend"
"#,
        )
        .expect_err("Should fail");
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = Definition::from_str(
            r#"
[[kinds.plot.slots]]
name = "legend"
item = "legend"
container = "legend"
"#,
        )
        .expect_err("Should fail");
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let err = Definition::from_str("[kinds.plot]\ncolour = 1\n").expect_err("Should fail");
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_unknown_kind_is_a_cascade_error() {
        let err = Definition::from_str("[kinds.plot]\nextends = \"base\"\n")
            .and_then(Definition::build)
            .expect_err("Should fail");
        assert!(matches!(err, ConfigError::Cascade(_)));
    }
}
