//! Parcelgen Type Model
//!
//! A standalone declaration graph standing in for a compiler host's type
//! system: declarations, fields, interned types, and the structural queries
//! the processor needs (upper-bound resolution and name-based subtyping).
//!
//! # Usage
//!
//! ```ignore
//! use parcelgen_model::{DeclHeader, DeclKind, Modifiers, TypeModelBuilder, TypeReflection};
//!
//! let mut builder = TypeModelBuilder::new();
//! let parcelable = builder.declare(DeclHeader::interface("android.os.Parcelable"))?;
//! let user = builder.declare(DeclHeader::class("com.example.User"))?;
//! let iface = builder.declared(parcelable, Vec::new())?;
//! builder.add_interface(user, iface)?;
//! let model = builder.finish()?;
//!
//! let reflection = TypeReflection::new(&model);
//! let user_ty = reflection.declaration_type(user)?;
//! assert!(reflection.is_subtype_of(user_ty, "android.os.Parcelable"));
//! ```

#![warn(missing_docs)]

pub mod builder;
pub mod context;
pub mod decl;
pub mod error;
pub mod loader;
pub mod reflect;
pub mod ty;
pub mod type_expr;

pub use builder::{DeclHeader, FieldHeader, TypeModelBuilder};
pub use context::TypeModel;
pub use decl::{DeclId, DeclKind, ElementId, FieldDecl, Modifier, Modifiers, TypeDecl, TypeParam};
pub use error::ModelError;
pub use loader::{ModelLoader, ModelSource};
pub use reflect::TypeReflection;
pub use ty::{DeclaredType, PrimitiveType, Type, TypeId, TypeVarRef, WildcardType};
