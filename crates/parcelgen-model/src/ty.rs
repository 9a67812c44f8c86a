//! Core type definitions for the parcelgen type model

use crate::decl::DeclId;
use std::fmt;

/// Unique identifier for a type in the type model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}

/// Primitive (non-nominal) types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    /// `boolean`
    Boolean,
    /// `byte`
    Byte,
    /// `short`
    Short,
    /// `int`
    Int,
    /// `long`
    Long,
    /// `char`
    Char,
    /// `float`
    Float,
    /// `double`
    Double,
}

impl PrimitiveType {
    /// All primitive types, in keyword order
    pub const ALL: [PrimitiveType; 8] = [
        PrimitiveType::Boolean,
        PrimitiveType::Byte,
        PrimitiveType::Short,
        PrimitiveType::Int,
        PrimitiveType::Long,
        PrimitiveType::Char,
        PrimitiveType::Float,
        PrimitiveType::Double,
    ];

    /// Source keyword for this primitive
    pub fn keyword(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Short => "short",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Char => "char",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        }
    }

    /// Look up a primitive by its keyword
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.keyword() == keyword)
    }

    /// Qualified name of the boxed counterpart
    pub fn boxed_name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "java.lang.Boolean",
            PrimitiveType::Byte => "java.lang.Byte",
            PrimitiveType::Short => "java.lang.Short",
            PrimitiveType::Int => "java.lang.Integer",
            PrimitiveType::Long => "java.lang.Long",
            PrimitiveType::Char => "java.lang.Character",
            PrimitiveType::Float => "java.lang.Float",
            PrimitiveType::Double => "java.lang.Double",
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Reference to a nominal declaration, possibly parameterized: `Map<K, V>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeclaredType {
    /// The declaration this type names
    pub decl: DeclId,
    /// Type arguments (empty for raw or non-generic types)
    pub args: Vec<TypeId>,
}

/// Reference to the `index`-th type parameter of `owner`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeVarRef {
    /// Declaration that introduces the type parameter
    pub owner: DeclId,
    /// Position in the owner's type parameter list
    pub index: u32,
}

/// Wildcard type argument: `?`, `? extends T`, `? super T`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WildcardType {
    /// Upper bound (`? extends T`)
    pub extends: Option<TypeId>,
    /// Lower bound (`? super T`)
    pub super_bound: Option<TypeId>,
}

/// The core type representation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// Primitive type (int, boolean, ...)
    Primitive(PrimitiveType),

    /// Nominal class or interface type
    Declared(DeclaredType),

    /// Type variable: T
    TypeVar(TypeVarRef),

    /// Array type: T[]
    Array(TypeId),

    /// Wildcard type argument
    Wildcard(WildcardType),

    /// A type the model could not resolve, kept by its written name
    Error(String),
}

impl Type {
    /// The declared type, if this is one
    pub fn as_declared(&self) -> Option<&DeclaredType> {
        match self {
            Type::Declared(declared) => Some(declared),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_keywords_round_trip() {
        for p in PrimitiveType::ALL {
            assert_eq!(PrimitiveType::from_keyword(p.keyword()), Some(p));
        }
        assert_eq!(PrimitiveType::from_keyword("void"), None);
        assert_eq!(PrimitiveType::from_keyword("String"), None);
    }

    #[test]
    fn test_boxed_names() {
        assert_eq!(PrimitiveType::Int.boxed_name(), "java.lang.Integer");
        assert_eq!(PrimitiveType::Char.boxed_name(), "java.lang.Character");
    }

    #[test]
    fn test_as_declared() {
        let declared = Type::Declared(DeclaredType {
            decl: DeclId(4),
            args: vec![TypeId(1)],
        });
        assert_eq!(declared.as_declared().map(|d| d.decl), Some(DeclId(4)));
        assert!(Type::Primitive(PrimitiveType::Int).as_declared().is_none());
        assert!(Type::Error("T".to_string()).as_declared().is_none());
    }
}
