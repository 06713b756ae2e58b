//! Diagnostic types for lint results.

use brightlint_ast::{Location, Span};
use serde::{Deserialize, Serialize};

/// Severity level for diagnostics.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Error - must be fixed.
    #[default]
    Error,
    /// Warning - should be reviewed.
    Warning,
    /// Info - informational message.
    Info,
}

impl Severity {
    /// Parses a configured severity name. `"off"` yields `None`.
    pub fn from_config(value: &str) -> Option<Option<Severity>> {
        match value {
            "off" => Some(None),
            "error" => Some(Some(Severity::Error)),
            "warn" | "warning" => Some(Some(Severity::Warning)),
            "info" => Some(Some(Severity::Info)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

/// A diagnostic message from a lint rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The rule that generated this diagnostic.
    pub rule_id: String,

    /// The diagnostic message.
    pub message: String,

    /// Byte span in the source.
    pub span: Span,

    /// Line/column location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<Location>,

    /// Severity level.
    #[serde(default)]
    pub severity: Severity,

    /// Optional fix for this diagnostic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<Fix>,
}

impl Diagnostic {
    /// Creates a new diagnostic.
    pub fn new(rule_id: impl Into<String>, message: impl Into<String>, span: Span) -> Self {
        Self {
            rule_id: rule_id.into(),
            message: message.into(),
            span,
            loc: None,
            severity: Severity::Error,
            fix: None,
        }
    }

    /// Sets the severity level.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Sets the location.
    pub fn with_location(mut self, loc: Location) -> Self {
        self.loc = Some(loc);
        self
    }

    /// Sets an auto-fix.
    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }
}

/// A textual edit: replace `span` with `text`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fix {
    /// The byte span to replace.
    pub span: Span,

    /// The replacement text.
    pub text: String,
}

impl Fix {
    /// Creates a fix that replaces a span.
    pub fn new(span: Span, text: impl Into<String>) -> Self {
        Self {
            span,
            text: text.into(),
        }
    }

    /// Creates a fix that inserts text at a position.
    pub fn insert(offset: u32, text: impl Into<String>) -> Self {
        Self {
            span: Span::empty(offset),
            text: text.into(),
        }
    }

    /// Creates a fix that deletes a span.
    pub fn delete(span: Span) -> Self {
        Self {
            span,
            text: String::new(),
        }
    }
}
