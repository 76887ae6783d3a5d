//! Stylesheets: template rules loaded from TOML
//!
//! A stylesheet sets options on class templates, addressed by selector path.
//! Applying several stylesheets to one model layers them; later rules win
//! because they set the same template last.
//!
//! ```toml
//! [metadata]
//! name = "Print"
//!
//! [templates."series"]
//! markerSize = 8
//!
//! [templates."plot[alpha].series[one]"]
//! color = "red"
//! ```

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::diagnostic::Diagnostic;
use crate::error::{CascadeError, ConfigError};
use crate::model::Model;
use crate::selector::SelectorPath;
use crate::value::OptionMap;

/// A set of template rules
#[derive(Debug, Clone, Default)]
pub struct Stylesheet {
    /// Optional name for the stylesheet
    pub name: Option<String>,
    /// Optional description
    pub description: Option<String>,
    /// Rules in document order
    pub rules: Vec<Rule>,
}

/// Option values for the class template at one selector path
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub path: SelectorPath,
    pub values: OptionMap,
}

/// TOML structure for deserializing stylesheets
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlStylesheet {
    metadata: Option<TomlMetadata>,
    #[serde(default)]
    templates: IndexMap<String, OptionMap>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlMetadata {
    name: Option<String>,
    description: Option<String>,
}

impl Stylesheet {
    /// Load stylesheet from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load stylesheet from TOML string
    ///
    /// Selector paths are parsed here, so a malformed path fails the load
    /// rather than the first application.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlStylesheet = toml::from_str(content)?;

        let rules = parsed
            .templates
            .into_iter()
            .map(|(path, values)| -> Result<Rule, CascadeError> {
                Ok(Rule {
                    path: SelectorPath::parse(&path)?,
                    values,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Stylesheet {
            name: parsed.metadata.as_ref().and_then(|m| m.name.clone()),
            description: parsed.metadata.as_ref().and_then(|m| m.description.clone()),
            rules,
        })
    }

    /// Set every rule's values on the addressed class template of `model`
    ///
    /// Returns the diagnostics for option names the templates do not know.
    pub fn apply(&self, model: &mut Model) -> Result<Vec<Diagnostic>, CascadeError> {
        let mut diagnostics = Vec::new();
        for rule in &self.rules {
            let template = model.template(&rule.path)?;
            for diagnostic in template.set(rule.values.clone()) {
                diagnostic.log();
                diagnostics.push(diagnostic);
            }
        }
        tracing::debug!(
            stylesheet = self.name.as_deref().unwrap_or("unnamed"),
            rules = self.rules.len(),
            "applied stylesheet"
        );
        Ok(diagnostics)
    }
}
