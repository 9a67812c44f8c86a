//! Declarations: class-like types and the fields they contain

use crate::ty::TypeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a class-like declaration in a [`TypeModel`](crate::TypeModel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(pub u32);

impl fmt::Display for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeclId({})", self.0)
    }
}

/// Identity of a field-like element in a [`TypeModel`](crate::TypeModel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementId({})", self.0)
    }
}

/// Declaration kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclKind {
    /// Class declaration
    #[default]
    Class,
    /// Interface declaration
    Interface,
    /// Enum declaration
    Enum,
    /// Annotation type declaration
    Annotation,
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclKind::Class => write!(f, "class"),
            DeclKind::Interface => write!(f, "interface"),
            DeclKind::Enum => write!(f, "enum"),
            DeclKind::Annotation => write!(f, "annotation"),
        }
    }
}

/// A single source modifier keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    /// `public`
    Public,
    /// `protected`
    Protected,
    /// `private`
    Private,
    /// `static`
    Static,
    /// `final`
    Final,
    /// `abstract`
    Abstract,
    /// `transient`
    Transient,
    /// `volatile`
    Volatile,
}

/// Visibility and storage modifiers of a declaration or field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Is this declaration public?
    pub is_public: bool,
    /// Is this declaration protected?
    pub is_protected: bool,
    /// Is this declaration private?
    pub is_private: bool,
    /// Is this declaration static?
    pub is_static: bool,
    /// Is this declaration final?
    pub is_final: bool,
    /// Is this declaration abstract?
    pub is_abstract: bool,
    /// Is this field transient?
    pub is_transient: bool,
    /// Is this field volatile?
    pub is_volatile: bool,
}

impl Modifiers {
    /// No modifiers (package-private)
    pub fn none() -> Self {
        Self::default()
    }

    /// Only `public`
    pub fn public() -> Self {
        Modifiers {
            is_public: true,
            ..Self::default()
        }
    }

    /// Only `private`
    pub fn private() -> Self {
        Modifiers {
            is_private: true,
            ..Self::default()
        }
    }

    /// Add a modifier
    pub fn with(mut self, modifier: Modifier) -> Self {
        self.insert(modifier);
        self
    }

    /// Set the flag for `modifier`
    pub fn insert(&mut self, modifier: Modifier) {
        match modifier {
            Modifier::Public => self.is_public = true,
            Modifier::Protected => self.is_protected = true,
            Modifier::Private => self.is_private = true,
            Modifier::Static => self.is_static = true,
            Modifier::Final => self.is_final = true,
            Modifier::Abstract => self.is_abstract = true,
            Modifier::Transient => self.is_transient = true,
            Modifier::Volatile => self.is_volatile = true,
        }
    }

    /// Check whether `modifier` is present
    pub fn contains(&self, modifier: Modifier) -> bool {
        match modifier {
            Modifier::Public => self.is_public,
            Modifier::Protected => self.is_protected,
            Modifier::Private => self.is_private,
            Modifier::Static => self.is_static,
            Modifier::Final => self.is_final,
            Modifier::Abstract => self.is_abstract,
            Modifier::Transient => self.is_transient,
            Modifier::Volatile => self.is_volatile,
        }
    }
}

impl FromIterator<Modifier> for Modifiers {
    fn from_iter<I: IntoIterator<Item = Modifier>>(iter: I) -> Self {
        let mut modifiers = Modifiers::none();
        for modifier in iter {
            modifiers.insert(modifier);
        }
        modifiers
    }
}

/// Type parameter of a generic declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParam {
    /// Parameter name
    pub name: String,
    /// Explicit bounds (`T extends A & B`), in source order
    pub bounds: Vec<TypeId>,
}

/// A class-like declaration
#[derive(Debug, Clone)]
pub struct TypeDecl {
    /// Fully qualified name, e.g. `com.example.Outer.Inner`
    pub qualified_name: String,
    /// Package name, e.g. `com.example` (empty for the default package)
    pub package: String,
    /// Declaration kind
    pub kind: DeclKind,
    /// Declaration modifiers
    pub modifiers: Modifiers,
    /// Type parameters
    pub type_params: Vec<TypeParam>,
    /// Direct superclass; `None` for interfaces and the root class
    pub superclass: Option<TypeId>,
    /// Directly implemented (or, for interfaces, extended) interfaces
    pub interfaces: Vec<TypeId>,
    /// The declaration's own type, parameterized by its type variables
    pub self_type: TypeId,
}

impl TypeDecl {
    /// Name relative to the package, e.g. `Outer.Inner`
    pub fn relative_name(&self) -> &str {
        if self.package.is_empty() {
            return &self.qualified_name;
        }
        self.qualified_name
            .strip_prefix(self.package.as_str())
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(&self.qualified_name)
    }

    /// Simple name, e.g. `Inner`
    pub fn simple_name(&self) -> &str {
        self.qualified_name
            .rsplit('.')
            .next()
            .unwrap_or(&self.qualified_name)
    }
}

/// A field-like element, possibly carrying annotations
#[derive(Debug, Clone)]
pub struct FieldDecl {
    /// Simple name
    pub name: String,
    /// Declared type (may be a type variable)
    pub ty: TypeId,
    /// The declaration this field is contained in
    pub enclosing: DeclId,
    /// Field modifiers
    pub modifiers: Modifiers,
    /// Qualified names of the annotations on this field
    pub annotations: Vec<String>,
}

impl FieldDecl {
    /// Whether the field carries the annotation with this qualified name
    pub fn has_annotation(&self, annotation: &str) -> bool {
        self.annotations.iter().any(|a| a == annotation)
    }
}
