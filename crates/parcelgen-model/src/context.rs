//! The type model: an arena of declarations, elements and interned types
//!
//! A `TypeModel` is the read-only view of a declaration graph that the
//! processor queries during a round. It is built with
//! [`TypeModelBuilder`](crate::TypeModelBuilder), which guarantees that every
//! handle stored inside the model resolves and that the supertype graph is
//! acyclic.

use crate::decl::{DeclId, DeclKind, ElementId, FieldDecl, Modifiers, TypeDecl, TypeParam};
use crate::error::ModelError;
use crate::ty::{DeclaredType, Type, TypeId, TypeVarRef};
use rustc_hash::FxHashMap;

/// Qualified name of the root class
pub const OBJECT: &str = "java.lang.Object";

/// Platform classes every model knows about, with their superclass
const PLATFORM_CLASSES: &[(&str, &str)] = &[
    ("java.lang.String", OBJECT),
    ("java.lang.Number", OBJECT),
    ("java.lang.Boolean", OBJECT),
    ("java.lang.Character", OBJECT),
    ("java.lang.Byte", "java.lang.Number"),
    ("java.lang.Short", "java.lang.Number"),
    ("java.lang.Integer", "java.lang.Number"),
    ("java.lang.Long", "java.lang.Number"),
    ("java.lang.Float", "java.lang.Number"),
    ("java.lang.Double", "java.lang.Number"),
];

/// Declaration graph with interned types
#[derive(Debug, Clone)]
pub struct TypeModel {
    /// All types (indexed by TypeId)
    types: Vec<Type>,
    /// Structural interning table
    interned: FxHashMap<Type, TypeId>,
    /// All declarations (indexed by DeclId)
    decls: Vec<TypeDecl>,
    /// Qualified name -> declaration
    decl_names: FxHashMap<String, DeclId>,
    /// All field elements (indexed by ElementId), in declaration order
    elements: Vec<FieldDecl>,
    /// The root class
    object: DeclId,
}

impl TypeModel {
    /// Create a model containing only the platform classes
    pub(crate) fn new() -> Self {
        let mut model = TypeModel {
            types: Vec::new(),
            interned: FxHashMap::default(),
            decls: Vec::new(),
            decl_names: FxHashMap::default(),
            elements: Vec::new(),
            object: DeclId(0),
        };

        model.object = model.insert_platform_class(OBJECT, None);
        for (name, superclass) in PLATFORM_CLASSES {
            let superclass = model.decl_names[*superclass];
            let superclass = model.decls[superclass.0 as usize].self_type;
            model.insert_platform_class(name, Some(superclass));
        }

        model
    }

    fn insert_platform_class(&mut self, name: &str, superclass: Option<TypeId>) -> DeclId {
        let package = name.rsplit_once('.').map(|(p, _)| p).unwrap_or_default();
        let mut modifiers = Modifiers::public();
        modifiers.is_abstract = name == "java.lang.Number";
        modifiers.is_final = !modifiers.is_abstract && name != OBJECT;

        let id = self.insert_decl(name, package, DeclKind::Class, modifiers, Vec::new());
        self.decls[id.0 as usize].superclass = superclass;
        id
    }

    // ── Construction (crate-internal, driven by the builder) ─────────

    /// Intern a type, returning the existing id for structurally equal types
    pub(crate) fn intern(&mut self, ty: Type) -> TypeId {
        if let Some(&id) = self.interned.get(&ty) {
            return id;
        }
        let id = TypeId(self.types.len() as u32);
        self.types.push(ty.clone());
        self.interned.insert(ty, id);
        id
    }

    /// Register a declaration whose name has already been checked
    pub(crate) fn insert_decl(
        &mut self,
        qualified_name: &str,
        package: &str,
        kind: DeclKind,
        modifiers: Modifiers,
        type_params: Vec<String>,
    ) -> DeclId {
        let id = DeclId(self.decls.len() as u32);
        let args = (0..type_params.len() as u32)
            .map(|index| self.intern(Type::TypeVar(TypeVarRef { owner: id, index })))
            .collect();
        let self_type = self.intern(Type::Declared(DeclaredType { decl: id, args }));

        self.decls.push(TypeDecl {
            qualified_name: qualified_name.to_string(),
            package: package.to_string(),
            kind,
            modifiers,
            type_params: type_params
                .into_iter()
                .map(|name| TypeParam {
                    name,
                    bounds: Vec::new(),
                })
                .collect(),
            superclass: None,
            interfaces: Vec::new(),
            self_type,
        });
        self.decl_names.insert(qualified_name.to_string(), id);
        id
    }

    pub(crate) fn insert_element(&mut self, field: FieldDecl) -> ElementId {
        let id = ElementId(self.elements.len() as u32);
        self.elements.push(field);
        id
    }

    pub(crate) fn decl_mut(&mut self, id: DeclId) -> Result<&mut TypeDecl, ModelError> {
        self.decls
            .get_mut(id.0 as usize)
            .ok_or(ModelError::UnknownDeclaration { id })
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Get a type by id
    pub fn get(&self, id: TypeId) -> Option<&Type> {
        self.types.get(id.0 as usize)
    }

    /// Get a type by id, failing on dangling handles
    pub fn ty(&self, id: TypeId) -> Result<&Type, ModelError> {
        self.get(id).ok_or(ModelError::UnknownType { id })
    }

    /// Get a declaration by id
    pub fn decl(&self, id: DeclId) -> Result<&TypeDecl, ModelError> {
        self.decls
            .get(id.0 as usize)
            .ok_or(ModelError::UnknownDeclaration { id })
    }

    /// Get an element by id
    pub fn element(&self, id: ElementId) -> Result<&FieldDecl, ModelError> {
        self.elements
            .get(id.0 as usize)
            .ok_or(ModelError::UnknownElement { id })
    }

    /// Find a declaration by qualified name
    pub fn lookup(&self, qualified_name: &str) -> Option<DeclId> {
        self.decl_names.get(qualified_name).copied()
    }

    /// The root class (`java.lang.Object`)
    pub fn object(&self) -> DeclId {
        self.object
    }

    /// All declarations in registration order
    pub fn declarations(&self) -> impl Iterator<Item = (DeclId, &TypeDecl)> {
        self.decls
            .iter()
            .enumerate()
            .map(|(i, decl)| (DeclId(i as u32), decl))
    }

    /// All field elements in declaration order
    pub fn elements(&self) -> impl Iterator<Item = (ElementId, &FieldDecl)> {
        self.elements
            .iter()
            .enumerate()
            .map(|(i, field)| (ElementId(i as u32), field))
    }

    /// Elements carrying the given annotation, in declaration order
    pub fn elements_annotated_with(&self, annotation: &str) -> Vec<ElementId> {
        self.elements()
            .filter(|(_, field)| field.has_annotation(annotation))
            .map(|(id, _)| id)
            .collect()
    }

    /// Fields contained in a declaration, in declaration order
    pub fn fields_of(&self, decl: DeclId) -> impl Iterator<Item = (ElementId, &FieldDecl)> {
        self.elements().filter(move |(_, field)| field.enclosing == decl)
    }

    /// Upper bound of a type variable: its first explicit bound, or the root class
    pub fn upper_bound(&self, var: TypeVarRef) -> Result<TypeId, ModelError> {
        let param = self.type_param(var)?;
        match param.bounds.first() {
            Some(&bound) => Ok(bound),
            None => Ok(self.decl(self.object)?.self_type),
        }
    }

    /// Type parameter referenced by a type variable
    pub fn type_param(&self, var: TypeVarRef) -> Result<&TypeParam, ModelError> {
        let owner = self.decl(var.owner)?;
        owner
            .type_params
            .get(var.index as usize)
            .ok_or_else(|| ModelError::InvalidTypeParameter {
                owner: owner.qualified_name.clone(),
                index: var.index as usize,
            })
    }

    /// Canonical textual rendering of a type
    ///
    /// Declared types render as their qualified name followed by `<A,B>` when
    /// parameterized (no space after the comma), arrays as `T[]`, type
    /// variables by name and error types as written.
    pub fn canonical_name(&self, id: TypeId) -> Result<String, ModelError> {
        let mut out = String::new();
        self.write_type(id, &mut out)?;
        Ok(out)
    }

    fn write_type(&self, id: TypeId, out: &mut String) -> Result<(), ModelError> {
        match self.ty(id)? {
            Type::Primitive(p) => out.push_str(p.keyword()),
            Type::Declared(declared) => {
                out.push_str(&self.decl(declared.decl)?.qualified_name);
                if !declared.args.is_empty() {
                    out.push('<');
                    for (i, &arg) in declared.args.iter().enumerate() {
                        if i > 0 {
                            out.push(',');
                        }
                        self.write_type(arg, out)?;
                    }
                    out.push('>');
                }
            }
            Type::TypeVar(var) => out.push_str(&self.type_param(*var)?.name),
            Type::Array(element) => {
                self.write_type(*element, out)?;
                out.push_str("[]");
            }
            Type::Wildcard(wildcard) => {
                out.push('?');
                if let Some(bound) = wildcard.extends {
                    out.push_str(" extends ");
                    self.write_type(bound, out)?;
                } else if let Some(bound) = wildcard.super_bound {
                    out.push_str(" super ");
                    self.write_type(bound, out)?;
                }
            }
            Type::Error(name) => out.push_str(name),
        }
        Ok(())
    }
}
