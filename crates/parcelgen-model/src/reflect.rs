//! Type reflection queries used by the processor
//!
//! Two questions are answered here: "what is this element's type, with type
//! variables replaced by their bound?" and "does this type structurally
//! extend or implement the type named `X`?".

use crate::context::TypeModel;
use crate::decl::{DeclId, ElementId};
use crate::error::ModelError;
use crate::ty::{Type, TypeId};

/// Read-only reflection facade over a [`TypeModel`]
#[derive(Debug, Clone, Copy)]
pub struct TypeReflection<'a> {
    model: &'a TypeModel,
}

impl<'a> TypeReflection<'a> {
    /// Create a facade over `model`
    pub fn new(model: &'a TypeModel) -> Self {
        TypeReflection { model }
    }

    /// The underlying model
    pub fn model(&self) -> &'a TypeModel {
        self.model
    }

    /// Declared type of an element, with a type variable replaced by its upper bound
    ///
    /// Only one substitution is made: a variable bounded by another variable
    /// resolves to that variable.
    pub fn resolve_declared_type(&self, element: ElementId) -> Result<TypeId, ModelError> {
        let field = self.model.element(element)?;
        self.resolve_type(field.ty)
    }

    /// Replace a type variable by its upper bound; other types are returned as is
    pub fn resolve_type(&self, ty: TypeId) -> Result<TypeId, ModelError> {
        match self.model.ty(ty)? {
            Type::TypeVar(var) => self.model.upper_bound(*var),
            _ => Ok(ty),
        }
    }

    /// The declaration's own type
    pub fn declaration_type(&self, decl: DeclId) -> Result<TypeId, ModelError> {
        Ok(self.model.decl(decl)?.self_type)
    }

    /// Structural, name-based subtype test against `target`
    ///
    /// Matches when the canonical name equals `target`, when a parameterized
    /// type's wildcard form (`Raw<?,?>`) equals `target`, or when any
    /// supertype matches, walking the superclass first and then each
    /// interface depth-first. Non-declared types only match by name.
    pub fn is_subtype_of(&self, ty: TypeId, target: &str) -> bool {
        match self.model.canonical_name(ty) {
            Ok(name) if name == target => return true,
            Ok(_) => {}
            Err(_) => return false,
        }

        let Some(declared) = self.model.get(ty).and_then(Type::as_declared) else {
            return false;
        };
        let Ok(decl) = self.model.decl(declared.decl) else {
            return false;
        };

        if !declared.args.is_empty()
            && wildcard_form(&decl.qualified_name, declared.args.len()) == target
        {
            return true;
        }

        if let Some(superclass) = decl.superclass {
            if self.is_subtype_of(superclass, target) {
                return true;
            }
        }

        decl.interfaces
            .iter()
            .any(|&interface| self.is_subtype_of(interface, target))
    }
}

/// `Raw<?,?>` with one placeholder per type argument
fn wildcard_form(raw: &str, arity: usize) -> String {
    let placeholders = vec!["?"; arity];
    format!("{}<{}>", raw, placeholders.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{DeclHeader, FieldHeader, TypeModelBuilder};

    #[test]
    fn test_wildcard_form() {
        assert_eq!(wildcard_form("java.util.Map", 2), "java.util.Map<?,?>");
        assert_eq!(wildcard_form("java.util.List", 1), "java.util.List<?>");
    }

    #[test]
    fn test_reflexivity() {
        let mut builder = TypeModelBuilder::new();
        let user = builder.declare(DeclHeader::class("com.example.User")).unwrap();
        let model = builder.finish().unwrap();
        let reflection = TypeReflection::new(&model);

        let user_ty = reflection.declaration_type(user).unwrap();
        assert!(reflection.is_subtype_of(user_ty, "com.example.User"));
        assert!(reflection.is_subtype_of(user_ty, "java.lang.Object"));
        assert!(!reflection.is_subtype_of(user_ty, "com.example.Other"));
    }

    #[test]
    fn test_unbounded_type_variable_resolves_to_object() {
        let mut builder = TypeModelBuilder::new();
        let holder = builder
            .declare(DeclHeader::class("com.example.Holder").with_type_params(["T"]))
            .unwrap();
        let t = builder.type_var(holder, 0).unwrap();
        let field = builder.add_field(holder, FieldHeader::new("value", t)).unwrap();
        let model = builder.finish().unwrap();
        let reflection = TypeReflection::new(&model);

        let resolved = reflection.resolve_declared_type(field).unwrap();
        assert_eq!(model.canonical_name(resolved).unwrap(), "java.lang.Object");
    }

    #[test]
    fn test_primitives_only_match_by_name() {
        let mut builder = TypeModelBuilder::new();
        let int = builder.primitive(crate::ty::PrimitiveType::Int);
        let model = builder.finish().unwrap();
        let reflection = TypeReflection::new(&model);

        assert!(reflection.is_subtype_of(int, "int"));
        assert!(!reflection.is_subtype_of(int, "java.lang.Object"));
        assert!(!reflection.is_subtype_of(TypeId(u32::MAX), "int"));
    }
}
