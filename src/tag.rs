//! Tag lists
//!
//! Tags work like CSS classes: an item carries zero or more of them, and tag
//! selectors pick the templates that apply to it. A tag specification is a
//! string of tags separated by commas, semicolons or spaces, or a (possibly
//! nested) list of such strings.

use crate::error::CascadeError;
use crate::value::Value;

/// A case-sensitive tag
pub type Tag = String;

/// Name of the reserved option consumed into an item's tags on construction
pub const TAG_OPTION: &str = "tag";

/// A tag specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagSpec {
    Text(String),
    List(Vec<TagSpec>),
}

impl From<&str> for TagSpec {
    fn from(s: &str) -> Self {
        TagSpec::Text(s.to_string())
    }
}

impl From<String> for TagSpec {
    fn from(s: String) -> Self {
        TagSpec::Text(s)
    }
}

impl<T: Into<TagSpec>> From<Vec<T>> for TagSpec {
    fn from(items: Vec<T>) -> Self {
        TagSpec::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<TagSpec>, const N: usize> From<[T; N]> for TagSpec {
    fn from(items: [T; N]) -> Self {
        TagSpec::List(items.into_iter().map(Into::into).collect())
    }
}

impl TryFrom<&Value> for TagSpec {
    type Error = CascadeError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Str(s) => Ok(TagSpec::Text(s.clone())),
            Value::List(items) => items
                .iter()
                .map(TagSpec::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(TagSpec::List),
            other => Err(CascadeError::invalid_tag_spec(other.type_name())),
        }
    }
}

/// Parse a tag specification into a flat, order-preserving tag list
///
/// Duplicates are kept; empty fragments are dropped.
pub fn parse(spec: impl Into<TagSpec>) -> Vec<Tag> {
    let mut tags = Vec::new();
    collect(&spec.into(), &mut tags);
    tags
}

/// Parse a tag specification given as an option value
pub fn parse_value(value: &Value) -> Result<Vec<Tag>, CascadeError> {
    TagSpec::try_from(value).map(parse)
}

fn collect(spec: &TagSpec, tags: &mut Vec<Tag>) {
    match spec {
        TagSpec::Text(text) => tags.extend(
            text.split([',', ';', ' '])
                .map(str::trim)
                .filter(|fragment| !fragment.is_empty())
                .map(str::to_string),
        ),
        TagSpec::List(items) => {
            for item in items {
                collect(item, tags);
            }
        }
    }
}
