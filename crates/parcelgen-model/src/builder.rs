//! Type model construction
//!
//! [`TypeModelBuilder`] is the only way to obtain a [`TypeModel`]. It checks
//! names as declarations are registered and, in [`TypeModelBuilder::finish`],
//! fills in implicit superclasses and rejects cyclic hierarchies so that
//! hierarchy walks over a finished model always terminate.

use crate::context::TypeModel;
use crate::decl::{DeclId, DeclKind, ElementId, FieldDecl, Modifiers};
use crate::error::ModelError;
use crate::ty::{DeclaredType, PrimitiveType, Type, TypeId, TypeVarRef, WildcardType};
use crate::type_expr::{self, BoundKind, TypeExpr};

/// Header of a class-like declaration to register
#[derive(Debug, Clone)]
pub struct DeclHeader {
    /// Fully qualified name
    pub qualified_name: String,
    /// Package; derived from the qualified name when `None`
    pub package: Option<String>,
    /// Declaration kind
    pub kind: DeclKind,
    /// Declaration modifiers
    pub modifiers: Modifiers,
    /// Type parameter names, bounds are set afterwards
    pub type_params: Vec<String>,
}

impl DeclHeader {
    /// A public declaration of the given kind
    pub fn new(qualified_name: impl Into<String>, kind: DeclKind) -> Self {
        DeclHeader {
            qualified_name: qualified_name.into(),
            package: None,
            kind,
            modifiers: Modifiers::public(),
            type_params: Vec::new(),
        }
    }

    /// A public class
    pub fn class(qualified_name: impl Into<String>) -> Self {
        Self::new(qualified_name, DeclKind::Class)
    }

    /// A public interface
    pub fn interface(qualified_name: impl Into<String>) -> Self {
        Self::new(qualified_name, DeclKind::Interface)
    }

    /// Set the package explicitly (needed for nested declarations)
    pub fn in_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    /// Replace the modifiers
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Declare type parameters
    pub fn with_type_params<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.type_params = names.into_iter().map(Into::into).collect();
        self
    }
}

/// A field to add to a declaration
#[derive(Debug, Clone)]
pub struct FieldHeader {
    /// Simple name
    pub name: String,
    /// Declared type
    pub ty: TypeId,
    /// Field modifiers
    pub modifiers: Modifiers,
    /// Qualified annotation names
    pub annotations: Vec<String>,
}

impl FieldHeader {
    /// A package-private, unannotated field
    pub fn new(name: impl Into<String>, ty: TypeId) -> Self {
        FieldHeader {
            name: name.into(),
            ty,
            modifiers: Modifiers::none(),
            annotations: Vec::new(),
        }
    }

    /// Replace the modifiers
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Add an annotation by qualified name
    pub fn annotated(mut self, annotation: impl Into<String>) -> Self {
        self.annotations.push(annotation.into());
        self
    }
}

/// Incremental builder for a [`TypeModel`]
#[derive(Debug, Clone)]
pub struct TypeModelBuilder {
    model: TypeModel,
}

impl Default for TypeModelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeModelBuilder {
    /// Start from a model containing the platform classes
    pub fn new() -> Self {
        TypeModelBuilder {
            model: TypeModel::new(),
        }
    }

    /// The model built so far
    pub fn model(&self) -> &TypeModel {
        &self.model
    }

    /// The root class
    pub fn object(&self) -> DeclId {
        self.model.object()
    }

    /// Find a declaration by qualified name
    pub fn lookup(&self, qualified_name: &str) -> Option<DeclId> {
        self.model.lookup(qualified_name)
    }

    /// Register a declaration
    pub fn declare(&mut self, header: DeclHeader) -> Result<DeclId, ModelError> {
        let name = header.qualified_name;
        if self.model.lookup(&name).is_some() {
            return Err(ModelError::DuplicateDeclaration { name });
        }

        let package = match header.package {
            Some(package) => package,
            None => name
                .rsplit_once('.')
                .map(|(package, _)| package.to_string())
                .unwrap_or_default(),
        };
        let inside_package = package.is_empty()
            || name
                .strip_prefix(package.as_str())
                .is_some_and(|rest| rest.len() > 1 && rest.starts_with('.'));
        if !inside_package {
            return Err(ModelError::PackageMismatch { name, package });
        }

        Ok(self.model.insert_decl(
            &name,
            &package,
            header.kind,
            header.modifiers,
            header.type_params,
        ))
    }

    // ── Types ────────────────────────────────────────────────────────

    /// Primitive type
    pub fn primitive(&mut self, primitive: PrimitiveType) -> TypeId {
        self.model.intern(Type::Primitive(primitive))
    }

    /// Declared type, raw when `args` is empty
    pub fn declared(&mut self, decl: DeclId, args: Vec<TypeId>) -> Result<TypeId, ModelError> {
        self.model.decl(decl)?;
        for &arg in &args {
            self.model.ty(arg)?;
        }
        Ok(self.model.intern(Type::Declared(DeclaredType { decl, args })))
    }

    /// The declaration's own type (`Foo<T>` for a generic `Foo`)
    pub fn self_type(&self, decl: DeclId) -> Result<TypeId, ModelError> {
        Ok(self.model.decl(decl)?.self_type)
    }

    /// Reference to the `index`-th type parameter of `owner`
    pub fn type_var(&mut self, owner: DeclId, index: usize) -> Result<TypeId, ModelError> {
        let var = TypeVarRef {
            owner,
            index: index as u32,
        };
        self.model.type_param(var)?;
        Ok(self.model.intern(Type::TypeVar(var)))
    }

    /// Array of `element`
    pub fn array(&mut self, element: TypeId) -> TypeId {
        self.model.intern(Type::Array(element))
    }

    /// Wildcard type argument
    pub fn wildcard(&mut self, wildcard: WildcardType) -> TypeId {
        self.model.intern(Type::Wildcard(wildcard))
    }

    /// Unresolvable type, kept by name
    pub fn error_type(&mut self, name: impl Into<String>) -> TypeId {
        self.model.intern(Type::Error(name.into()))
    }

    // ── Hierarchy ────────────────────────────────────────────────────

    /// Set the direct superclass of a declaration
    pub fn set_superclass(&mut self, decl: DeclId, superclass: TypeId) -> Result<(), ModelError> {
        self.model.ty(superclass)?;
        self.model.decl_mut(decl)?.superclass = Some(superclass);
        Ok(())
    }

    /// Append a directly implemented interface
    pub fn add_interface(&mut self, decl: DeclId, interface: TypeId) -> Result<(), ModelError> {
        self.model.ty(interface)?;
        self.model.decl_mut(decl)?.interfaces.push(interface);
        Ok(())
    }

    /// Set the bounds of a type parameter
    pub fn set_bounds(
        &mut self,
        owner: DeclId,
        index: usize,
        bounds: Vec<TypeId>,
    ) -> Result<(), ModelError> {
        for &bound in &bounds {
            self.model.ty(bound)?;
        }
        let decl = self.model.decl_mut(owner)?;
        let owner_name = decl.qualified_name.clone();
        let param = decl
            .type_params
            .get_mut(index)
            .ok_or(ModelError::InvalidTypeParameter {
                owner: owner_name,
                index,
            })?;
        param.bounds = bounds;
        Ok(())
    }

    /// Add a field to `enclosing`
    pub fn add_field(
        &mut self,
        enclosing: DeclId,
        field: FieldHeader,
    ) -> Result<ElementId, ModelError> {
        self.model.decl(enclosing)?;
        self.model.ty(field.ty)?;
        Ok(self.model.insert_element(FieldDecl {
            name: field.name,
            ty: field.ty,
            enclosing,
            modifiers: field.modifiers,
            annotations: field.annotations,
        }))
    }

    // ── Type expressions ─────────────────────────────────────────────

    /// Parse and resolve a type expression written inside `context`
    pub fn parse_type(&mut self, expr: &str, context: DeclId) -> Result<TypeId, ModelError> {
        let parsed = type_expr::parse(expr)?;
        self.resolve_expr(&parsed, context)
    }

    /// Resolve a parsed type expression written inside `context`
    ///
    /// Simple names are looked up as type parameters of the context and its
    /// enclosing declarations, innermost first, then as members of those
    /// declarations, then as qualified names, then in the context's package
    /// and finally in `java.lang`. Names that resolve nowhere become error
    /// types.
    pub fn resolve_expr(&mut self, expr: &TypeExpr, context: DeclId) -> Result<TypeId, ModelError> {
        match expr {
            TypeExpr::Named { name, args } => {
                if args.is_empty() {
                    if let Some(primitive) = PrimitiveType::from_keyword(name) {
                        return Ok(self.primitive(primitive));
                    }
                    for scope in self.scopes(context)? {
                        let param = self
                            .model
                            .decl(scope)?
                            .type_params
                            .iter()
                            .position(|p| p.name == *name);
                        if let Some(index) = param {
                            return self.type_var(scope, index);
                        }
                    }
                }

                let Some(decl) = self.resolve_name(name, context)? else {
                    return Ok(self.error_type(expr.to_string()));
                };

                let expected = self.model.decl(decl)?.type_params.len();
                if !args.is_empty() && args.len() != expected {
                    return Err(ModelError::InvalidTypeArgCount {
                        name: self.model.decl(decl)?.qualified_name.clone(),
                        expected,
                        actual: args.len(),
                    });
                }

                let args = args
                    .iter()
                    .map(|arg| self.resolve_expr(arg, context))
                    .collect::<Result<Vec<_>, _>>()?;
                self.declared(decl, args)
            }

            TypeExpr::Array(element) => {
                let element = self.resolve_expr(element, context)?;
                Ok(self.array(element))
            }

            TypeExpr::Wildcard(bound) => {
                let mut wildcard = WildcardType::default();
                if let Some((kind, bound)) = bound {
                    let bound = self.resolve_expr(bound, context)?;
                    match kind {
                        BoundKind::Extends => wildcard.extends = Some(bound),
                        BoundKind::Super => wildcard.super_bound = Some(bound),
                    }
                }
                Ok(self.wildcard(wildcard))
            }
        }
    }

    fn resolve_name(&self, name: &str, context: DeclId) -> Result<Option<DeclId>, ModelError> {
        let mut candidates = Vec::new();
        for scope in self.scopes(context)? {
            candidates.push(format!("{}.{}", self.model.decl(scope)?.qualified_name, name));
        }
        candidates.push(name.to_string());
        let package = &self.model.decl(context)?.package;
        if !package.is_empty() {
            candidates.push(format!("{package}.{name}"));
        }
        candidates.push(format!("java.lang.{name}"));

        Ok(candidates
            .iter()
            .find_map(|candidate| self.model.lookup(candidate)))
    }

    /// `context` followed by its enclosing declarations, innermost first
    ///
    /// Enclosing declarations are found by trimming trailing segments of the
    /// qualified name down to the package.
    fn scopes(&self, context: DeclId) -> Result<Vec<DeclId>, ModelError> {
        let decl = self.model.decl(context)?;
        let mut scopes = vec![context];
        let mut name = decl.qualified_name.as_str();
        while let Some((outer, _)) = name.rsplit_once('.') {
            if outer.len() <= decl.package.len() {
                break;
            }
            if let Some(id) = self.model.lookup(outer) {
                scopes.push(id);
            }
            name = outer;
        }
        Ok(scopes)
    }

    // ── Completion ───────────────────────────────────────────────────

    /// Finish the model
    ///
    /// Classes and enums without an explicit superclass extend the root
    /// class. Fails with [`ModelError::CyclicHierarchy`] when a declaration
    /// is its own supertype.
    pub fn finish(mut self) -> Result<TypeModel, ModelError> {
        let object = self.model.object();
        let object_type = self.model.decl(object)?.self_type;
        let implicit: Vec<DeclId> = self
            .model
            .declarations()
            .filter(|(id, decl)| {
                *id != object
                    && decl.superclass.is_none()
                    && matches!(decl.kind, DeclKind::Class | DeclKind::Enum)
            })
            .map(|(id, _)| id)
            .collect();
        for id in implicit {
            self.model.decl_mut(id)?.superclass = Some(object_type);
        }

        check_acyclic(&self.model)?;
        Ok(self.model)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Active,
    Done,
}

fn check_acyclic(model: &TypeModel) -> Result<(), ModelError> {
    let mut marks = vec![Mark::Unvisited; model.declarations().count()];
    let mut path = Vec::new();
    for (id, _) in model.declarations() {
        visit(model, id, &mut marks, &mut path)?;
    }
    Ok(())
}

fn visit(
    model: &TypeModel,
    id: DeclId,
    marks: &mut [Mark],
    path: &mut Vec<DeclId>,
) -> Result<(), ModelError> {
    let decl = model.decl(id)?;
    let mark = marks
        .get(id.0 as usize)
        .copied()
        .ok_or(ModelError::UnknownDeclaration { id })?;
    match mark {
        Mark::Done => return Ok(()),
        Mark::Active => {
            let start = path.iter().position(|&p| p == id).unwrap_or(0);
            let mut names = Vec::new();
            for &decl in path[start..].iter().chain(std::iter::once(&id)) {
                names.push(model.decl(decl)?.qualified_name.clone());
            }
            return Err(ModelError::CyclicHierarchy {
                cycle: names.join(" -> "),
            });
        }
        Mark::Unvisited => {}
    }

    marks[id.0 as usize] = Mark::Active;
    path.push(id);

    for &supertype in decl.superclass.iter().chain(&decl.interfaces) {
        if let Some(declared) = model.ty(supertype)?.as_declared() {
            visit(model, declared.decl, marks, path)?;
        }
    }

    path.pop();
    marks[id.0 as usize] = Mark::Done;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declare_derives_package() {
        let mut builder = TypeModelBuilder::new();
        let user = builder.declare(DeclHeader::class("com.example.User")).unwrap();
        let model = builder.finish().unwrap();
        let decl = model.decl(user).unwrap();
        assert_eq!(decl.package, "com.example");
        assert_eq!(
            decl.superclass,
            Some(model.decl(model.object()).unwrap().self_type),
            "classes implicitly extend the root class"
        );
    }

    #[test]
    fn test_duplicate_declaration_rejected() {
        let mut builder = TypeModelBuilder::new();
        builder.declare(DeclHeader::class("com.example.User")).unwrap();
        let err = builder.declare(DeclHeader::class("com.example.User")).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateDeclaration { .. }));

        let err = builder.declare(DeclHeader::class("java.lang.String")).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateDeclaration { .. }));
    }

    #[test]
    fn test_package_mismatch_rejected() {
        let mut builder = TypeModelBuilder::new();
        let err = builder
            .declare(DeclHeader::class("com.example.User").in_package("org.other"))
            .unwrap_err();
        assert!(matches!(err, ModelError::PackageMismatch { .. }));

        let err = builder
            .declare(DeclHeader::class("com.exampleX.User").in_package("com.example"))
            .unwrap_err();
        assert!(matches!(err, ModelError::PackageMismatch { .. }));
    }

    #[test]
    fn test_resolution_order() {
        let mut builder = TypeModelBuilder::new();
        let outer = builder
            .declare(DeclHeader::class("com.example.Outer").with_type_params(["T"]))
            .unwrap();
        let inner = builder
            .declare(DeclHeader::class("com.example.Outer.Inner").in_package("com.example"))
            .unwrap();
        let sibling = builder.declare(DeclHeader::class("com.example.Sibling")).unwrap();

        let t = builder.parse_type("T", outer).unwrap();
        assert!(matches!(builder.model().ty(t).unwrap(), Type::TypeVar(_)));

        let inner_ty = builder.parse_type("Inner", outer).unwrap();
        assert_eq!(builder.model().canonical_name(inner_ty).unwrap(), "com.example.Outer.Inner");
        assert_eq!(inner_ty, builder.self_type(inner).unwrap());

        let sibling_ty = builder.parse_type("Sibling", outer).unwrap();
        assert_eq!(sibling_ty, builder.self_type(sibling).unwrap());

        let string = builder.parse_type("String", outer).unwrap();
        assert_eq!(builder.model().canonical_name(string).unwrap(), "java.lang.String");

        let unknown = builder.parse_type("java.util.List<String>", outer).unwrap();
        assert_eq!(
            builder.model().ty(unknown).unwrap(),
            &Type::Error("java.util.List<String>".to_string())
        );
    }

    #[test]
    fn test_nested_resolution_walks_enclosing_declarations() {
        let mut builder = TypeModelBuilder::new();
        let outer = builder
            .declare(DeclHeader::class("com.example.Outer").with_type_params(["T"]))
            .unwrap();
        let peer = builder
            .declare(DeclHeader::class("com.example.Outer.Peer").in_package("com.example"))
            .unwrap();
        let leaf = builder
            .declare(
                DeclHeader::class("com.example.Outer.Inner.Leaf")
                    .in_package("com.example")
                    .with_type_params(["U"]),
            )
            .unwrap();

        let t = builder.parse_type("T", leaf).unwrap();
        assert_eq!(
            builder.model().ty(t).unwrap(),
            &Type::TypeVar(TypeVarRef { owner: outer, index: 0 })
        );
        let u = builder.parse_type("U", leaf).unwrap();
        assert_eq!(
            builder.model().ty(u).unwrap(),
            &Type::TypeVar(TypeVarRef { owner: leaf, index: 0 })
        );

        let peer_ty = builder.parse_type("Peer", leaf).unwrap();
        assert_eq!(peer_ty, builder.self_type(peer).unwrap());
    }

    #[test]
    fn test_type_argument_count_checked() {
        let mut builder = TypeModelBuilder::new();
        let boxed = builder
            .declare(DeclHeader::class("com.example.Box").with_type_params(["T"]))
            .unwrap();
        let err = builder.parse_type("Box<String, String>", boxed).unwrap_err();
        assert!(matches!(
            err,
            ModelError::InvalidTypeArgCount {
                expected: 1,
                actual: 2,
                ..
            }
        ));
        assert!(builder.parse_type("Box", boxed).is_ok(), "raw references are allowed");
    }

    #[test]
    fn test_cyclic_hierarchy_rejected() {
        let mut builder = TypeModelBuilder::new();
        let a = builder.declare(DeclHeader::interface("com.example.A")).unwrap();
        let b = builder.declare(DeclHeader::interface("com.example.B")).unwrap();
        let a_ty = builder.self_type(a).unwrap();
        let b_ty = builder.self_type(b).unwrap();
        builder.add_interface(a, b_ty).unwrap();
        builder.add_interface(b, a_ty).unwrap();

        match builder.finish() {
            Err(ModelError::CyclicHierarchy { cycle }) => {
                assert_eq!(cycle, "com.example.A -> com.example.B -> com.example.A");
            }
            other => panic!("expected cyclic hierarchy, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_dangling_declared_type_is_an_error() {
        let mut builder = TypeModelBuilder::new();
        let user = builder.declare(DeclHeader::class("com.example.User")).unwrap();

        let err = builder.declared(DeclId(999), vec![]).unwrap_err();
        assert!(matches!(err, ModelError::UnknownDeclaration { id: DeclId(999) }));

        let err = builder.declared(user, vec![TypeId(9999)]).unwrap_err();
        assert!(matches!(err, ModelError::UnknownType { id: TypeId(9999) }));

        // Nothing dangling was recorded, so the model still finishes
        let model = builder.finish().unwrap();
        assert!(model.decl(user).unwrap().superclass.is_some());
    }

    #[test]
    fn test_set_bounds_out_of_range() {
        let mut builder = TypeModelBuilder::new();
        let boxed = builder.declare(DeclHeader::class("com.example.Box")).unwrap();
        assert!(matches!(
            builder.set_bounds(boxed, 0, Vec::new()),
            Err(ModelError::InvalidTypeParameter { index: 0, .. })
        ));
        assert!(builder.type_var(boxed, 0).is_err());
    }
}
