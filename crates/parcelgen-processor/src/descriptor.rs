//! Generation descriptors: what to generate for one target class

use crate::config::ProcessorConfig;
use parcelgen_model::{DeclId, TypeDecl};
use serde::Serialize;
use std::fmt;

/// Separator that replaces `.` between nested class names in generated names
pub const NESTED_DELIMITER: char = '$';

/// Generation strategy for a target class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationKind {
    /// The target already implements the serialization interface; generated
    /// code augments that implementation
    Injector,
    /// The target does not implement the interface; generated code is a
    /// detached helper
    Delegate,
}

impl GenerationKind {
    /// Name suffix configured for this strategy
    pub fn suffix(self, config: &ProcessorConfig) -> &str {
        match self {
            GenerationKind::Injector => &config.injector_suffix,
            GenerationKind::Delegate => &config.delegate_suffix,
        }
    }
}

impl fmt::Display for GenerationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationKind::Injector => write!(f, "injector"),
            GenerationKind::Delegate => write!(f, "delegate"),
        }
    }
}

/// One (field name, resolved type) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldBinding {
    /// Field simple name
    pub name: String,
    /// Canonical name of the field's resolved type
    pub ty: String,
}

/// Per-target accumulator built during one round
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationDescriptor {
    /// Package of the generated class (the target's package)
    pub package: String,
    /// Simple name of the generated class
    pub class_name: String,
    /// Qualified name of the target class
    pub target: String,
    /// Identity of the target class
    #[serde(skip)]
    pub target_decl: DeclId,
    /// Generation strategy
    pub kind: GenerationKind,
    /// Fields in discovery order; duplicates are kept
    pub fields: Vec<FieldBinding>,
}

impl GenerationDescriptor {
    /// Create an empty descriptor for `target`
    pub fn new(
        target_decl: DeclId,
        target: &TypeDecl,
        kind: GenerationKind,
        config: &ProcessorConfig,
    ) -> Self {
        GenerationDescriptor {
            package: target.package.clone(),
            class_name: generated_class_name(target, kind.suffix(config)),
            target: target.qualified_name.clone(),
            target_decl,
            kind,
            fields: Vec::new(),
        }
    }

    /// Append a field
    pub fn add_field(&mut self, name: impl Into<String>, ty: impl Into<String>) {
        self.fields.push(FieldBinding {
            name: name.into(),
            ty: ty.into(),
        });
    }

    /// Fully qualified name of the generated class
    pub fn full_name(&self) -> String {
        if self.package.is_empty() {
            self.class_name.clone()
        } else {
            format!("{}.{}", self.package, self.class_name)
        }
    }
}

/// Name relative to the package with nested separators flattened, plus `suffix`
pub fn generated_class_name(target: &TypeDecl, suffix: &str) -> String {
    let flattened: String = target
        .relative_name()
        .chars()
        .map(|c| if c == '.' { NESTED_DELIMITER } else { c })
        .collect();
    format!("{flattened}{suffix}")
}
