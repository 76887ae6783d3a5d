//! Error types for the cascade engine and selector paths

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Syntax error in a selector path such as `plot[alpha].series`
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Parse error at {span:?}: {message}")]
    Syntax {
        span: Span,
        message: String,
        expected: Vec<String>,
    },
}

impl ParseError {
    /// Create a syntax error without expectations
    pub fn syntax(span: Span, message: impl Into<String>) -> Self {
        Self::Syntax {
            span,
            message: message.into(),
            expected: Vec::new(),
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            ParseError::Syntax { span, .. } => span,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let mut buf = Vec::new();
        match self {
            ParseError::Syntax {
                span,
                message,
                expected,
            } => {
                let expected_str = if expected.is_empty() {
                    String::new()
                } else {
                    format!("\nExpected: {}", expected.join(", "))
                };

                let written = Report::build(ReportKind::Error, filename, span.start)
                    .with_message(message)
                    .with_label(
                        Label::new((filename, span.clone()))
                            .with_message(format!("{}{}", message, expected_str))
                            .with_color(Color::Red),
                    )
                    .finish()
                    .write((filename, Source::from(source)), &mut buf);
                if written.is_err() {
                    return format!("{}: {}", filename, self);
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl<'a> From<chumsky::error::Rich<'a, crate::selector::lexer::Token>> for ParseError {
    fn from(err: chumsky::error::Rich<'a, crate::selector::lexer::Token>) -> Self {
        use chumsky::error::{RichPattern, RichReason};

        let message = match err.reason() {
            RichReason::ExpectedFound { found, .. } => match found {
                Some(tok) => format!("Unexpected {}", format_token(tok)),
                None => "Unexpected end of selector".to_string(),
            },
            RichReason::Custom(msg) => msg.to_string(),
        };

        let expected: Vec<String> = err
            .expected()
            .filter_map(|e| match e {
                RichPattern::Token(tok) => Some(format_token(tok)),
                RichPattern::Label(label) => Some(label.to_string()),
                RichPattern::EndOfInput => Some("end of selector".to_string()),
                _ => None,
            })
            .collect();

        ParseError::Syntax {
            span: err.span().into_range(),
            message,
            expected,
        }
    }
}

/// Format a token for human-readable error messages
fn format_token(tok: &crate::selector::lexer::Token) -> String {
    use crate::selector::lexer::Token;
    match tok {
        Token::Ident(s) => format!("name '{}'", s),
        Token::Word(s) => format!("word '{}'", s),
        Token::String(s) => format!("string \"{}\"", s),
        Token::Dot => "'.'".to_string(),
        Token::BracketOpen => "'['".to_string(),
        Token::BracketClose => "']'".to_string(),
    }
}

/// Errors raised by the cascade engine
#[derive(Debug, Error)]
pub enum CascadeError {
    /// Tag specification is neither a string nor a list
    #[error("invalid tag specification: expected a string or a list of strings, found {found}")]
    InvalidTagSpec { found: String },

    /// The defer graph of a schema contains a cycle
    #[error("defer cycle in options of '{schema}': {}", cycle.join(" -> "))]
    DeferCycle { schema: String, cycle: Vec<String> },

    /// An option defers to a name that is not registered
    #[error("option '{option}' of '{schema}' defers to unregistered option '{target}'")]
    UnknownDeferTarget {
        schema: String,
        option: String,
        target: String,
    },

    /// Reference to an item kind that was never defined
    #[error("unknown item kind '{name}'")]
    UnknownKind { name: String },

    /// The same kind was defined twice
    #[error("duplicate item kind '{name}'")]
    DuplicateKind { name: String },

    /// Reference to a child slot the kind does not declare
    #[error("item kind '{kind}' has no child or container named '{slot}'")]
    UnknownSlot { kind: String, slot: String },

    /// A child slot was accessed as the wrong slot type
    #[error("'{slot}' of item kind '{kind}' is not a {expected}")]
    SlotMismatch {
        kind: String,
        slot: String,
        expected: &'static str,
    },

    /// A tag selector was applied to a child item slot
    #[error("'{slot}' of item kind '{kind}' is a child item and takes no selector")]
    UnexpectedSelector { kind: String, slot: String },

    /// A kind contains itself through its child items or containers
    #[error("item kind contains itself: {}", cycle.join(" -> "))]
    StructuralCycle { cycle: Vec<String> },

    /// A kind extends itself, directly or indirectly
    #[error("item kind extends itself: {}", cycle.join(" -> "))]
    ExtendsCycle { cycle: Vec<String> },

    /// A selector path could not be parsed
    #[error("invalid selector path '{path}': {}", format_parse_errors(errors))]
    InvalidSelectorPath {
        path: String,
        errors: Vec<ParseError>,
    },
}

/// Errors raised while loading kind definitions or stylesheets
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// Well-formed TOML that does not describe a valid configuration
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error(transparent)]
    Cascade(#[from] CascadeError),
}

impl ConfigError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}

fn format_parse_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl CascadeError {
    /// Create an invalid tag specification error
    pub fn invalid_tag_spec(found: impl Into<String>) -> Self {
        Self::InvalidTagSpec {
            found: found.into(),
        }
    }

    /// Create a defer cycle error
    pub fn defer_cycle(schema: impl Into<String>, cycle: Vec<String>) -> Self {
        Self::DeferCycle {
            schema: schema.into(),
            cycle,
        }
    }

    /// Create an unknown defer target error
    pub fn unknown_defer_target(
        schema: impl Into<String>,
        option: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self::UnknownDeferTarget {
            schema: schema.into(),
            option: option.into(),
            target: target.into(),
        }
    }

    pub fn unknown_kind(name: impl Into<String>) -> Self {
        Self::UnknownKind { name: name.into() }
    }

    pub fn unknown_slot(kind: impl Into<String>, slot: impl Into<String>) -> Self {
        Self::UnknownSlot {
            kind: kind.into(),
            slot: slot.into(),
        }
    }

    pub fn slot_mismatch(
        kind: impl Into<String>,
        slot: impl Into<String>,
        expected: &'static str,
    ) -> Self {
        Self::SlotMismatch {
            kind: kind.into(),
            slot: slot.into(),
            expected,
        }
    }

    /// Render the error for a terminal, with source context for selector
    /// syntax errors
    pub fn report(&self) -> String {
        match self {
            Self::InvalidSelectorPath { path, errors } => errors
                .iter()
                .map(|e| e.format(path, "selector"))
                .collect::<Vec<_>>()
                .join("\n"),
            other => other.to_string(),
        }
    }

    /// Get the offending cycle, if this is a cycle error
    pub fn cycle(&self) -> Option<&[String]> {
        match self {
            Self::DeferCycle { cycle, .. }
            | Self::StructuralCycle { cycle }
            | Self::ExtendsCycle { cycle } => Some(cycle),
            _ => None,
        }
    }
}
