//! Diagnostic infrastructure for error reporting
//!
//! Diagnostics are anchored on model declarations rather than source spans, so
//! they render without labels. Notes and help carry the context instead.

use codespan_reporting::diagnostic::{Diagnostic as CsDiagnostic, Severity};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream, WriteColor};
use parcelgen_model::{DeclId, ElementId, TypeModel};
use serde::{Deserialize, Serialize};

use crate::error::{ProcessError, Violation};

/// Error code for a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorCode(pub &'static str);

impl ErrorCode {
    /// The code as text ("E4001")
    pub fn as_str(&self) -> &str {
        self.0
    }
}

/// What a diagnostic is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Anchor {
    /// An annotated field
    Element(u32),
    /// A type declaration
    Declaration(u32),
}

impl From<ElementId> for Anchor {
    fn from(id: ElementId) -> Self {
        Anchor::Element(id.0)
    }
}

impl From<DeclId> for Anchor {
    fn from(id: DeclId) -> Self {
        Anchor::Declaration(id.0)
    }
}

/// A diagnostic message anchored on a model item
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// The underlying codespan diagnostic
    inner: CsDiagnostic<usize>,
    /// Error code (e.g., "E4001")
    code: Option<ErrorCode>,
    /// Anchoring element or declaration
    anchor: Option<Anchor>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic {
            inner: CsDiagnostic::new(severity).with_message(message),
            code: None,
            anchor: None,
        }
    }

    /// Create an error diagnostic
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a note diagnostic
    pub fn note(message: impl Into<String>) -> Self {
        Self::new(Severity::Note, message)
    }

    /// Set the error code
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self.inner = self.inner.with_code(code.0);
        self
    }

    /// Attach the diagnostic to a model item, naming it in a note
    pub fn with_anchor(mut self, anchor: impl Into<Anchor>, label: impl AsRef<str>) -> Self {
        self.anchor = Some(anchor.into());
        self.inner.notes.push(format!("in `{}`", label.as_ref()));
        self
    }

    /// Add a note (additional context)
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.inner.notes.push(note.into());
        self
    }

    /// Add a help suggestion
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.inner.notes.push(format!("help: {}", help.into()));
        self
    }

    /// Create diagnostic from a validation failure
    pub fn from_violation(violation: &Violation, model: &TypeModel) -> Self {
        use Violation::*;

        let diag = Diagnostic::error(violation.to_string()).with_code(violation_code(violation));
        match violation {
            PrivateOrStatic { element, owner, field, .. } => diag
                .with_anchor(*element, format!("{owner}.{field}"))
                .with_help("remove the `private` and `static` modifiers"),
            NotInClass { enclosing, owner, .. } => {
                let kind = model
                    .decl(*enclosing)
                    .map(|decl| decl.kind.to_string())
                    .unwrap_or_else(|_| "declaration".to_string());
                diag.with_anchor(*enclosing, owner)
                    .with_note(format!("`{owner}` is an {kind}"))
            }
            InPrivateClass { enclosing, owner, .. } => diag.with_anchor(*enclosing, owner),
            ReservedNamespace { element, owner, .. } => diag
                .with_anchor(*element, owner)
                .with_help("move the class out of the platform namespace"),
        }
    }

    /// Create diagnostics from a per-element or per-descriptor failure
    pub fn from_process_error(error: &ProcessError, model: &TypeModel) -> Vec<Self> {
        match error {
            ProcessError::ElementRejected { violations, .. } => violations
                .iter()
                .map(|violation| Diagnostic::from_violation(violation, model))
                .collect(),
            ProcessError::ElementProcessingFailed { element, .. } => {
                let label = model
                    .element(*element)
                    .map(|field| field.name.clone())
                    .unwrap_or_else(|_| element.to_string());
                vec![Diagnostic::error(error.detail())
                    .with_code(ErrorCode("E4101"))
                    .with_anchor(*element, label)]
            }
            ProcessError::EmissionFailed { target, declaration, .. } => {
                vec![Diagnostic::error(error.to_string())
                    .with_code(ErrorCode("E4201"))
                    .with_anchor(*declaration, target)]
            }
        }
    }

    /// Severity of the diagnostic
    pub fn severity(&self) -> Severity {
        self.inner.severity
    }

    /// Whether this is an error (or worse)
    pub fn is_error(&self) -> bool {
        self.inner.severity >= Severity::Error
    }

    /// Main message
    pub fn message(&self) -> &str {
        &self.inner.message
    }

    /// Error code, if any
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Anchoring item, if any
    pub fn anchor(&self) -> Option<Anchor> {
        self.anchor
    }

    /// Notes and help lines, in order
    pub fn notes(&self) -> &[String] {
        &self.inner.notes
    }

    /// Write the diagnostic to `writer`
    pub fn emit_to(&self, writer: &mut dyn WriteColor) -> Result<(), codespan_reporting::files::Error> {
        let files: SimpleFiles<String, String> = SimpleFiles::new();
        let config = term::Config::default();
        term::emit(writer, &config, &files, &self.inner)
    }

    /// Emit the diagnostic to stderr with colors
    pub fn emit(&self, color: ColorChoice) -> Result<(), codespan_reporting::files::Error> {
        let mut writer = StandardStream::stderr(color);
        self.emit_to(&mut writer)
    }

    /// Get the underlying codespan diagnostic (for testing/custom rendering)
    pub fn inner(&self) -> &CsDiagnostic<usize> {
        &self.inner
    }

    /// Convert to JSON representation for IDE integration
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&JsonDiagnostic::from_diagnostic(self))
    }
}

/// JSON representation of a diagnostic for IDE integration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonDiagnostic {
    /// Error code (e.g., "E4001")
    pub code: Option<String>,
    /// Severity level
    pub severity: String,
    /// Main error message
    pub message: String,
    /// Anchoring element or declaration
    pub anchor: Option<Anchor>,
    /// Additional notes and help
    pub notes: Vec<String>,
}

impl JsonDiagnostic {
    /// Convert a Diagnostic to JSON representation
    pub fn from_diagnostic(diag: &Diagnostic) -> Self {
        JsonDiagnostic {
            code: diag.code.map(|c| c.0.to_string()),
            severity: severity_name(diag.inner.severity).to_string(),
            message: diag.inner.message.clone(),
            anchor: diag.anchor,
            notes: diag.inner.notes.clone(),
        }
    }
}

fn severity_name(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Note => "note",
        Severity::Help => "help",
        Severity::Bug => "bug",
    }
}

/// Get error code for a Violation
pub fn violation_code(violation: &Violation) -> ErrorCode {
    use Violation::*;

    match violation {
        PrivateOrStatic { .. } => ErrorCode("E4001"),
        NotInClass { .. } => ErrorCode("E4002"),
        InPrivateClass { .. } => ErrorCode("E4003"),
        ReservedNamespace { .. } => ErrorCode("E4004"),
    }
}

/// The host's reporting channel
pub trait Messager {
    /// Report one diagnostic
    fn report(&mut self, diagnostic: Diagnostic);
}

/// A [`Messager`] that keeps every diagnostic in report order
#[derive(Debug, Default)]
pub struct CollectingMessager {
    diagnostics: Vec<Diagnostic>,
}

impl CollectingMessager {
    /// Create an empty messager
    pub fn new() -> Self {
        Self::default()
    }

    /// Diagnostics reported so far
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Only the error diagnostics
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    /// Number of error diagnostics
    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    /// Number of note diagnostics
    pub fn note_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity() == Severity::Note)
            .count()
    }

    /// Take the collected diagnostics
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl Messager for CollectingMessager {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}
