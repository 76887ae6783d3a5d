//! Selector paths
//!
//! A selector path walks from an item kind (or an item) through its declared
//! children to a template, e.g. `plot[alpha].series[one]`. Each segment names
//! a child slot; container slots accept an optional `[tag]` selecting one of
//! the container's templates, and select the default template without it.

mod grammar;
pub mod lexer;

pub use grammar::parse;

use crate::error::{CascadeError, Span};

/// A parsed selector path
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorPath {
    pub segments: Vec<Segment>,
}

/// One `name[selector]` step of a selector path
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub name: String,
    pub selector: Option<String>,
    pub span: Span,
}

impl Segment {
    /// The template selector, where no selector means the default template
    pub fn selector_or_default(&self) -> &str {
        self.selector.as_deref().unwrap_or("")
    }
}

impl SelectorPath {
    /// Parse a path, wrapping syntax errors into a [`CascadeError`]
    pub fn parse(path: &str) -> Result<Self, CascadeError> {
        parse(path).map_err(|errors| CascadeError::InvalidSelectorPath {
            path: path.to_string(),
            errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wraps_errors() {
        let err = SelectorPath::parse("plot[").expect_err("Should fail");
        assert!(matches!(err, CascadeError::InvalidSelectorPath { .. }));
        assert!(err.to_string().contains("plot["));
    }

    #[test]
    fn test_selector_or_default() {
        let path = SelectorPath::parse("plot.series[one]").expect("Should parse");
        assert_eq!(path.segments[0].selector_or_default(), "");
        assert_eq!(path.segments[1].selector_or_default(), "one");
    }
}
