//! Non-fatal diagnostics
//!
//! Diagnostics never abort anything. They are returned to the caller; the
//! resolver and the stylesheet loader also log the ones they report at warn
//! level. A bare `set` only returns them.

use std::fmt;

/// A non-fatal problem noticed while setting or resolving options
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    /// The item, template or schema the diagnostic is about
    pub subject: String,
    pub message: String,
}

/// Category of diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticCategory {
    /// A value was set for a name the schema does not register
    UnknownOption,
    /// Several tag templates of one registry set different values for the
    /// same option on the same item
    AmbiguousSelectors,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::UnknownOption => write!(f, "unknown-option"),
            DiagnosticCategory::AmbiguousSelectors => write!(f, "ambiguous-selectors"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.subject, self.category, self.message)
    }
}

impl Diagnostic {
    pub fn unknown_option(subject: impl Into<String>, option: &str) -> Self {
        Self {
            category: DiagnosticCategory::UnknownOption,
            subject: subject.into(),
            message: format!("Setting unknown option {}", option),
        }
    }

    pub fn ambiguous_selectors(subject: impl Into<String>, option: &str, selectors: &[&str]) -> Self {
        Self {
            category: DiagnosticCategory::AmbiguousSelectors,
            subject: subject.into(),
            message: format!(
                "option {} is set differently by templates {}; the last one wins",
                option,
                selectors
                    .iter()
                    .map(|s| format!("[{}]", s))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }

    /// Emit the diagnostic as a `tracing` warning
    pub fn log(&self) {
        tracing::warn!(
            category = %self.category,
            subject = %self.subject,
            "{}",
            self.message
        );
    }
}
