//! Scan diagnostics
//!
//! Problems found in the *input* (unreadable files, malformed annotation
//! bodies, schema violations, identity clashes) are reported as data rather
//! than as `Err`: a scan always completes and callers decide which
//! diagnostics should fail a build.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Span;

/// Diagnostic category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// File could not be read; the file is skipped
    IoError,
    /// Annotation body is not parseable structured text
    SchemaError,
    /// Annotation parsed but violates a field constraint
    ValidationError,
    /// Two distinct symbols in one file map to the same identity; the file is dropped
    IdentityConflictError,
    /// The same sentinel variant appears twice for one symbol; later copies are ignored
    DuplicateAnnotation,
    /// Declared `type` disagrees with the structural kind of the symbol
    KindMismatch,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::IoError => "io_error",
            DiagnosticKind::SchemaError => "schema_error",
            DiagnosticKind::ValidationError => "validation_error",
            DiagnosticKind::IdentityConflictError => "identity_conflict_error",
            DiagnosticKind::DuplicateAnnotation => "duplicate_annotation",
            DiagnosticKind::KindMismatch => "kind_mismatch",
        }
    }

    pub fn default_severity(&self) -> Severity {
        match self {
            DiagnosticKind::DuplicateAnnotation | DiagnosticKind::KindMismatch => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single diagnostic with file/line provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub file: String,
    pub span: Span,
    pub message: String,
    /// Offending field path for validation errors (`context.funnel_stage`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl Diagnostic {
    pub fn new(
        kind: DiagnosticKind,
        file: impl Into<String>,
        span: Span,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity: kind.default_severity(),
            file: file.into(),
            span,
            message: message.into(),
            field: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    // Convenience constructors
    pub fn io(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::IoError, file, Span::line(1), message)
    }

    pub fn schema(file: impl Into<String>, span: Span, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::SchemaError, file, span, message)
    }

    pub fn validation(
        file: impl Into<String>,
        span: Span,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(DiagnosticKind::ValidationError, file, span, message).with_field(field)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    fn sort_key(&self) -> (&str, Span, DiagnosticKind, &str) {
        (&self.file, self.span, self.kind, &self.message)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}:{}: {}", self.kind.as_str(), self.file, self.span, self.message)?;
        if let Some(ref field) = self.field {
            write!(f, " (field: {})", field)?;
        }
        Ok(())
    }
}

/// Ordered collection of diagnostics produced by one scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    pub fn extend(&mut self, other: impl IntoIterator<Item = Diagnostic>) {
        self.items.extend(other);
    }

    /// Sort by (file, span, kind, message) so output does not depend on worker timing
    pub fn sort(&mut self) {
        self.items.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(|d| !d.is_error())
    }

    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(move |d| d.kind == kind)
    }

    pub fn for_file<'a>(&'a self, file: &'a str) -> impl Iterator<Item = &'a Diagnostic> {
        self.items.iter().filter(move |d| d.file == file)
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl FromIterator<Diagnostic> for Diagnostics {
    fn from_iter<T: IntoIterator<Item = Diagnostic>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
