//! Type model errors

use crate::decl::{DeclId, ElementId};
use crate::ty::TypeId;
use thiserror::Error;

/// Errors raised while building or querying a type model
#[derive(Debug, Error)]
pub enum ModelError {
    /// A declaration handle does not belong to this model
    #[error("Unknown declaration: {id}")]
    UnknownDeclaration {
        /// The dangling handle
        id: DeclId,
    },

    /// An element handle does not belong to this model
    #[error("Unknown element: {id}")]
    UnknownElement {
        /// The dangling handle
        id: ElementId,
    },

    /// A type handle does not belong to this model
    #[error("Unknown type: {id}")]
    UnknownType {
        /// The dangling handle
        id: TypeId,
    },

    /// Two declarations share a qualified name
    #[error("Duplicate declaration: {name}")]
    DuplicateDeclaration {
        /// Qualified name declared twice
        name: String,
    },

    /// A qualified name does not live inside its declared package
    #[error("Declaration {name} is not inside package '{package}'")]
    PackageMismatch {
        /// Qualified name
        name: String,
        /// Declared package
        package: String,
    },

    /// A type parameter index is out of range for its owner
    #[error("Type parameter #{index} does not exist on {owner}")]
    InvalidTypeParameter {
        /// Owning declaration
        owner: String,
        /// Requested index
        index: usize,
    },

    /// A parameterized reference has the wrong number of arguments
    #[error("Invalid type argument count for {name}: expected {expected}, got {actual}")]
    InvalidTypeArgCount {
        /// Referenced declaration
        name: String,
        /// Declared parameter count
        expected: usize,
        /// Supplied argument count
        actual: usize,
    },

    /// A type expression could not be parsed
    #[error("Invalid type expression '{expr}': {message}")]
    TypeSyntax {
        /// The expression as written
        expr: String,
        /// What went wrong
        message: String,
    },

    /// The superclass/interface graph contains a cycle
    #[error("Circular type hierarchy detected: {cycle}")]
    CyclicHierarchy {
        /// The cycle, rendered as `A -> B -> A`
        cycle: String,
    },

    /// The model document could not be read
    #[error("Failed to read model: {0}")]
    Io(#[from] std::io::Error),

    /// The model document is not valid JSON for a model source
    #[error("Failed to parse model: {0}")]
    Json(#[from] serde_json::Error),
}
