//! Source generation for completed descriptors

use crate::descriptor::{GenerationDescriptor, GenerationKind};
use crate::error::GenerateError;
use parcelgen_model::PrimitiveType;

/// Turns a descriptor into the text of one source unit
pub trait Generator {
    /// Render the companion source for `descriptor`
    fn generate(&self, descriptor: &GenerationDescriptor) -> Result<String, GenerateError>;
}

impl<F> Generator for F
where
    F: Fn(&GenerationDescriptor) -> Result<String, GenerateError>,
{
    fn generate(&self, descriptor: &GenerationDescriptor) -> Result<String, GenerateError> {
        self(descriptor)
    }
}

/// Java keywords and literals that cannot be used as identifiers
const RESERVED_WORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally", "float",
    "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "package", "private", "protected", "public", "return", "short", "static",
    "strictfp", "super", "switch", "synchronized", "this", "throw", "throws", "transient", "try",
    "void", "volatile", "while", "true", "false", "null",
];

const INDENT: &str = "    ";

/// Emits a Java companion class with static parcel read/write helpers
///
/// Each field is written with `parcel.writeValue(target.f)` and read back
/// through a cast of `parcel.readValue(loader)`; primitive fields are cast to
/// their boxed class.
#[derive(Debug, Clone, Copy, Default)]
pub struct JavaSourceGenerator;

impl JavaSourceGenerator {
    /// Create the generator
    pub fn new() -> Self {
        JavaSourceGenerator
    }

    fn check(descriptor: &GenerationDescriptor) -> Result<(), GenerateError> {
        if descriptor.fields.is_empty() {
            return Err(GenerateError::EmptyDescriptor {
                class_name: descriptor.class_name.clone(),
            });
        }
        if !descriptor.package.is_empty() {
            descriptor.package.split('.').try_for_each(check_identifier)?;
        }
        check_identifier(&descriptor.class_name)?;
        descriptor.target.split('.').try_for_each(check_identifier)?;
        descriptor
            .fields
            .iter()
            .try_for_each(|field| check_identifier(&field.name))
    }
}

impl Generator for JavaSourceGenerator {
    fn generate(&self, descriptor: &GenerationDescriptor) -> Result<String, GenerateError> {
        Self::check(descriptor)?;

        let target = &descriptor.target;
        let class_name = &descriptor.class_name;
        let mut out = String::new();

        out.push_str("// Generated by parcelgen. Do not edit.\n");
        if !descriptor.package.is_empty() {
            out.push_str(&format!("package {};\n", descriptor.package));
        }
        out.push('\n');
        out.push_str("import android.os.Parcel;\n\n");

        match descriptor.kind {
            GenerationKind::Injector => {
                out.push_str(&format!(
                    "/** Field marshalling for {target}; call from its Parcelable implementation. */\n"
                ));
            }
            GenerationKind::Delegate => {
                out.push_str(&format!("/** Field marshalling delegate for {target}. */\n"));
            }
        }
        out.push_str(&format!("public final class {class_name} {{\n"));
        out.push_str(&format!("{INDENT}private {class_name}() {{\n{INDENT}}}\n\n"));

        out.push_str(&format!(
            "{INDENT}public static void writeToParcel({target} target, Parcel parcel) {{\n"
        ));
        for field in &descriptor.fields {
            out.push_str(&format!(
                "{INDENT}{INDENT}parcel.writeValue(target.{});\n",
                field.name
            ));
        }
        out.push_str(&format!("{INDENT}}}\n\n"));

        out.push_str(&format!(
            "{INDENT}public static void readFromParcel({target} target, Parcel parcel) {{\n"
        ));
        out.push_str(&format!(
            "{INDENT}{INDENT}ClassLoader loader = {target}.class.getClassLoader();\n"
        ));
        for field in &descriptor.fields {
            out.push_str(&format!(
                "{INDENT}{INDENT}target.{} = ({}) parcel.readValue(loader);\n",
                field.name,
                cast_type(&field.ty)
            ));
        }
        out.push_str(&format!("{INDENT}}}\n"));
        out.push_str("}\n");

        Ok(out)
    }
}

/// Boxed class for primitives, the type itself otherwise
fn cast_type(ty: &str) -> &str {
    match PrimitiveType::from_keyword(ty) {
        Some(primitive) => primitive.boxed_name(),
        None => ty,
    }
}

fn check_identifier(name: &str) -> Result<(), GenerateError> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$');
    let valid_rest = chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$');
    if valid_start && valid_rest && !RESERVED_WORDS.contains(&name) {
        Ok(())
    } else {
        Err(GenerateError::InvalidIdentifier {
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::FieldBinding;
    use parcelgen_model::DeclId;

    fn descriptor(kind: GenerationKind, fields: &[(&str, &str)]) -> GenerationDescriptor {
        GenerationDescriptor {
            package: "com.example".to_string(),
            class_name: "User$$ParcelDelegate".to_string(),
            target: "com.example.User".to_string(),
            target_decl: DeclId(1),
            kind,
            fields: fields
                .iter()
                .map(|(name, ty)| FieldBinding {
                    name: name.to_string(),
                    ty: ty.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_delegate_source() {
        let source = JavaSourceGenerator::new()
            .generate(&descriptor(
                GenerationKind::Delegate,
                &[("name", "java.lang.String"), ("age", "int")],
            ))
            .unwrap();

        assert!(source.contains("package com.example;"));
        assert!(source.contains("public final class User$$ParcelDelegate {"));
        assert!(source.contains(
            "public static void writeToParcel(com.example.User target, Parcel parcel) {"
        ));
        assert!(source.contains("parcel.writeValue(target.name);"));
        assert!(source.contains("target.name = (java.lang.String) parcel.readValue(loader);"));
        assert!(source.contains("target.age = (java.lang.Integer) parcel.readValue(loader);"));
        assert!(source.contains("Field marshalling delegate for com.example.User"));
    }

    #[test]
    fn test_injector_source_mentions_parcelable() {
        let source = JavaSourceGenerator::new()
            .generate(&descriptor(GenerationKind::Injector, &[("id", "long")]))
            .unwrap();
        assert!(source.contains("call from its Parcelable implementation"));
        assert!(source.contains("target.id = (java.lang.Long) parcel.readValue(loader);"));
    }

    #[test]
    fn test_array_and_generic_casts_are_kept() {
        assert_eq!(cast_type("int[]"), "int[]");
        assert_eq!(cast_type("java.util.List<java.lang.String>"), "java.util.List<java.lang.String>");
        assert_eq!(cast_type("boolean"), "java.lang.Boolean");
    }

    #[test]
    fn test_default_package_has_no_package_line() {
        let mut d = descriptor(GenerationKind::Delegate, &[("x", "int")]);
        d.package.clear();
        d.target = "User".to_string();
        let source = JavaSourceGenerator::new().generate(&d).unwrap();
        assert!(!source.contains("package "));
    }

    #[test]
    fn test_empty_descriptor_rejected() {
        let err = JavaSourceGenerator::new()
            .generate(&descriptor(GenerationKind::Delegate, &[]))
            .unwrap_err();
        assert_eq!(
            err,
            GenerateError::EmptyDescriptor {
                class_name: "User$$ParcelDelegate".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_field_name_rejected() {
        let err = JavaSourceGenerator::new()
            .generate(&descriptor(GenerationKind::Delegate, &[("class", "int")]))
            .unwrap_err();
        assert_eq!(err, GenerateError::InvalidIdentifier { name: "class".to_string() });

        assert!(check_identifier("9lives").is_err());
        assert!(check_identifier("$value_2").is_ok());
    }

    #[test]
    fn test_closure_generator() {
        let generator = |d: &GenerationDescriptor| Ok::<_, GenerateError>(d.full_name());
        let text = generator
            .generate(&descriptor(GenerationKind::Delegate, &[("x", "int")]))
            .unwrap();
        assert_eq!(text, "com.example.User$$ParcelDelegate");
    }
}
