//! Model documents (JSON)
//!
//! A model document is the front end's description of the declarations in a
//! compilation: one entry per class-like declaration, with its hierarchy and
//! fields. Types are written as type expressions and resolved relative to the
//! declaration they appear in.
//!
//! ```json
//! {
//!   "declarations": [
//!     { "name": "android.os.Parcelable", "kind": "interface" },
//!     {
//!       "name": "com.example.User",
//!       "modifiers": ["public"],
//!       "interfaces": ["android.os.Parcelable"],
//!       "fields": [
//!         { "name": "name", "type": "String",
//!           "annotations": ["kirisame.android.toolset.parcel.ParcelField"] }
//!       ]
//!     }
//!   ]
//! }
//! ```

use crate::builder::{DeclHeader, FieldHeader, TypeModelBuilder};
use crate::context::TypeModel;
use crate::decl::{DeclKind, Modifier};
use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root of a model document
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ModelSource {
    /// Declarations, in source order
    #[serde(default)]
    pub declarations: Vec<DeclarationSource>,
}

/// A class-like declaration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeclarationSource {
    /// Fully qualified name
    pub name: String,

    /// Package (defaults to everything before the last `.`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,

    /// Declaration kind (defaults to `class`)
    #[serde(default)]
    pub kind: DeclKind,

    /// Declaration modifiers
    #[serde(default)]
    pub modifiers: Vec<Modifier>,

    /// Type parameters
    #[serde(default, rename = "type-params", alias = "type_params")]
    pub type_params: Vec<TypeParamSource>,

    /// Superclass type expression
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superclass: Option<String>,

    /// Interface type expressions
    #[serde(default)]
    pub interfaces: Vec<String>,

    /// Fields
    #[serde(default)]
    pub fields: Vec<FieldSource>,
}

/// A type parameter and its bounds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TypeParamSource {
    /// Parameter name
    pub name: String,

    /// Bound type expressions
    #[serde(default)]
    pub bounds: Vec<String>,
}

/// A field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldSource {
    /// Simple name
    pub name: String,

    /// Type expression
    #[serde(rename = "type")]
    pub ty: String,

    /// Field modifiers
    #[serde(default)]
    pub modifiers: Vec<Modifier>,

    /// Qualified annotation names
    #[serde(default)]
    pub annotations: Vec<String>,
}

/// Builds [`TypeModel`]s from model documents
pub struct ModelLoader;

impl ModelLoader {
    /// Load a model document from a file
    pub fn from_path(path: impl AsRef<Path>) -> Result<TypeModel, ModelError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Load a model document from a JSON string
    pub fn from_json(json: &str) -> Result<TypeModel, ModelError> {
        let source: ModelSource = serde_json::from_str(json)?;
        Self::build(&source)
    }

    /// Build a model from a parsed document
    ///
    /// All declarations are registered before any type expression is
    /// resolved, so declarations may refer to each other in any order.
    pub fn build(source: &ModelSource) -> Result<TypeModel, ModelError> {
        let mut builder = TypeModelBuilder::new();

        let mut ids = Vec::with_capacity(source.declarations.len());
        for decl in &source.declarations {
            let mut header = DeclHeader::new(&decl.name, decl.kind)
                .with_modifiers(decl.modifiers.iter().copied().collect())
                .with_type_params(decl.type_params.iter().map(|p| p.name.clone()));
            if let Some(package) = &decl.package {
                header = header.in_package(package);
            }
            ids.push(builder.declare(header)?);
        }

        for (&id, decl) in ids.iter().zip(&source.declarations) {
            for (index, param) in decl.type_params.iter().enumerate() {
                let bounds = param
                    .bounds
                    .iter()
                    .map(|bound| builder.parse_type(bound, id))
                    .collect::<Result<Vec<_>, _>>()?;
                builder.set_bounds(id, index, bounds)?;
            }

            if let Some(superclass) = &decl.superclass {
                let superclass = builder.parse_type(superclass, id)?;
                builder.set_superclass(id, superclass)?;
            }

            for interface in &decl.interfaces {
                let interface = builder.parse_type(interface, id)?;
                builder.add_interface(id, interface)?;
            }

            for field in &decl.fields {
                let ty = builder.parse_type(&field.ty, id)?;
                let mut header = FieldHeader::new(&field.name, ty)
                    .with_modifiers(field.modifiers.iter().copied().collect());
                for annotation in &field.annotations {
                    header = header.annotated(annotation);
                }
                builder.add_field(id, header)?;
            }
        }

        builder.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_minimal_document() {
        let model = ModelLoader::from_json(
            r#"{
                "declarations": [
                    {
                        "name": "com.example.User",
                        "modifiers": ["public"],
                        "fields": [
                            { "name": "age", "type": "int", "modifiers": ["protected"] }
                        ]
                    }
                ]
            }"#,
        )
        .unwrap();

        let user = model.lookup("com.example.User").unwrap();
        let decl = model.decl(user).unwrap();
        assert_eq!(decl.kind, DeclKind::Class);
        assert!(decl.modifiers.is_public);

        let (_, field) = model.fields_of(user).next().unwrap();
        assert_eq!(field.name, "age");
        assert!(field.modifiers.is_protected);
        assert_eq!(model.canonical_name(field.ty).unwrap(), "int");
    }

    #[test]
    fn test_forward_references_resolve() {
        let model = ModelLoader::from_json(
            r#"{
                "declarations": [
                    { "name": "com.example.Child", "superclass": "Base<String>" },
                    { "name": "com.example.Base", "type-params": [{ "name": "T" }] }
                ]
            }"#,
        )
        .unwrap();

        let child = model.lookup("com.example.Child").unwrap();
        let superclass = model.decl(child).unwrap().superclass.unwrap();
        assert_eq!(
            model.canonical_name(superclass).unwrap(),
            "com.example.Base<java.lang.String>"
        );
    }

    #[test]
    fn test_unknown_modifier_is_a_parse_error() {
        let err = ModelLoader::from_json(
            r#"{ "declarations": [ { "name": "a.B", "modifiers": ["sealed"] } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::Json(_)));
    }

    #[test]
    fn test_bad_type_expression_reported() {
        let err = ModelLoader::from_json(
            r#"{ "declarations": [ { "name": "a.B", "fields": [ { "name": "x", "type": "List<" } ] } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::TypeSyntax { .. }));
    }
}
