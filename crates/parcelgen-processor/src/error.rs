//! Processor errors

use parcelgen_model::{DeclId, ElementId, ModelError};
use thiserror::Error;

/// A validation rule broken by one annotated element
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    /// The field is private or static
    #[error("@{annotation} fields must not be private or static. ({owner}.{field})")]
    PrivateOrStatic {
        /// Annotation simple name
        annotation: String,
        /// Enclosing class qualified name
        owner: String,
        /// Field name
        field: String,
        /// Offending element
        element: ElementId,
    },

    /// The field is not contained in a class
    #[error("@{annotation} fields may only be contained in classes. ({owner}.{field})")]
    NotInClass {
        /// Annotation simple name
        annotation: String,
        /// Enclosing declaration qualified name
        owner: String,
        /// Field name
        field: String,
        /// Offending enclosing declaration
        enclosing: DeclId,
    },

    /// The field's class is private
    #[error("@{annotation} fields may not be contained in private classes. ({owner}.{field})")]
    InPrivateClass {
        /// Annotation simple name
        annotation: String,
        /// Enclosing class qualified name
        owner: String,
        /// Field name
        field: String,
        /// Offending enclosing declaration
        enclosing: DeclId,
    },

    /// The field's class lives in a reserved namespace
    #[error("@{annotation}-annotated class incorrectly in {label} package. ({owner})")]
    ReservedNamespace {
        /// Annotation simple name
        annotation: String,
        /// Enclosing class qualified name
        owner: String,
        /// Namespace label ("Android framework")
        label: String,
        /// Offending element
        element: ElementId,
    },
}

/// Errors produced by a [`Generator`](crate::Generator)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    /// Nothing to generate
    #[error("descriptor {class_name} has no fields")]
    EmptyDescriptor {
        /// Generated class simple name
        class_name: String,
    },

    /// A name cannot be used as an identifier in generated source
    #[error("'{name}' is not a valid identifier")]
    InvalidIdentifier {
        /// The offending name
        name: String,
    },
}

/// Failure to produce or persist one generated unit
#[derive(Debug, Error)]
pub enum EmitError {
    /// The generator rejected the descriptor
    #[error(transparent)]
    Generate(#[from] GenerateError),

    /// The output sink failed to open, write or close the unit
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Per-element and per-descriptor failures of a round
///
/// None of these abort the round; each is converted into diagnostics and the
/// round continues with the next element or descriptor.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// One or more validation rules failed
    #[error("{element} rejected: {} violation(s)", violations.len())]
    ElementRejected {
        /// Rejected element
        element: ElementId,
        /// Every failing rule
        violations: Vec<Violation>,
    },

    /// The type model could not answer a query about the element
    #[error("Unable to generate parcel injector for @{annotation}.")]
    ElementProcessingFailed {
        /// Element being processed
        element: ElementId,
        /// Annotation simple name
        annotation: String,
        /// Underlying model failure
        #[source]
        source: ModelError,
    },

    /// Generation or output failed for one descriptor
    #[error("Unable to write injector for type {target}: {cause}")]
    EmissionFailed {
        /// Target class qualified name
        target: String,
        /// Target class identity
        declaration: DeclId,
        /// Underlying failure, already part of the message
        cause: EmitError,
    },
}

impl ProcessError {
    /// Message with the full source chain appended
    pub fn detail(&self) -> String {
        let mut detail = self.to_string();
        let mut source = std::error::Error::source(self);
        if source.is_some() {
            detail.push_str("\n\n");
        }
        let mut first = true;
        while let Some(error) = source {
            if !first {
                detail.push_str("\ncaused by: ");
            }
            detail.push_str(&error.to_string());
            first = false;
            source = error.source();
        }
        detail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violation_messages() {
        let violation = Violation::PrivateOrStatic {
            annotation: "ParcelField".to_string(),
            owner: "com.example.User".to_string(),
            field: "name".to_string(),
            element: ElementId(0),
        };
        assert_eq!(
            violation.to_string(),
            "@ParcelField fields must not be private or static. (com.example.User.name)"
        );

        let violation = Violation::ReservedNamespace {
            annotation: "ParcelField".to_string(),
            owner: "android.app.Thing".to_string(),
            label: "Android framework".to_string(),
            element: ElementId(0),
        };
        assert_eq!(
            violation.to_string(),
            "@ParcelField-annotated class incorrectly in Android framework package. (android.app.Thing)"
        );
    }

    #[test]
    fn test_processing_failure_detail_includes_source() {
        let error = ProcessError::ElementProcessingFailed {
            element: ElementId(7),
            annotation: "ParcelField".to_string(),
            source: ModelError::UnknownElement { id: ElementId(7) },
        };
        assert_eq!(
            error.detail(),
            "Unable to generate parcel injector for @ParcelField.\n\nUnknown element: ElementId(7)"
        );
    }

    #[test]
    fn test_emission_failure_message() {
        let error = ProcessError::EmissionFailed {
            target: "com.example.User".to_string(),
            declaration: DeclId(3),
            cause: EmitError::Io(std::io::Error::other("disk full")),
        };
        assert_eq!(
            error.to_string(),
            "Unable to write injector for type com.example.User: disk full"
        );
        assert_eq!(error.detail(), error.to_string(), "cause is reported once");
    }
}
