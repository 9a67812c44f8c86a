//! Per-element validation rules

use crate::config::ProcessorConfig;
use crate::error::Violation;
use parcelgen_model::{DeclKind, ElementId, Modifier, ModelError, TypeModel};

/// Checks annotated elements against the placement rules
///
/// Every rule runs for every element, so one pass reports all the problems
/// with an element.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    model: &'a TypeModel,
    config: &'a ProcessorConfig,
}

impl<'a> Validator<'a> {
    /// Create a validator
    pub fn new(model: &'a TypeModel, config: &'a ProcessorConfig) -> Self {
        Validator { model, config }
    }

    /// All rules the element breaks, in rule order
    ///
    /// An empty result means the element is accepted. `Err` is returned only
    /// when the element or its enclosing declaration is not in the model.
    pub fn validate(&self, element: ElementId) -> Result<Vec<Violation>, ModelError> {
        let field = self.model.element(element)?;
        let enclosing = self.model.decl(field.enclosing)?;
        let annotation = self.config.annotation_simple_name();
        let owner = &enclosing.qualified_name;

        let mut violations = Vec::new();

        if field.modifiers.contains(Modifier::Private) || field.modifiers.contains(Modifier::Static)
        {
            violations.push(Violation::PrivateOrStatic {
                annotation: annotation.to_string(),
                owner: owner.clone(),
                field: field.name.clone(),
                element,
            });
        }

        if enclosing.kind != DeclKind::Class {
            violations.push(Violation::NotInClass {
                annotation: annotation.to_string(),
                owner: owner.clone(),
                field: field.name.clone(),
                enclosing: field.enclosing,
            });
        }

        if enclosing.modifiers.contains(Modifier::Private) {
            violations.push(Violation::InPrivateClass {
                annotation: annotation.to_string(),
                owner: owner.clone(),
                field: field.name.clone(),
                enclosing: field.enclosing,
            });
        }

        if let Some(namespace) = self.config.reserved_namespace_for(owner) {
            violations.push(Violation::ReservedNamespace {
                annotation: annotation.to_string(),
                owner: owner.clone(),
                label: namespace.label.clone(),
                element,
            });
        }

        Ok(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PARCEL_FIELD;
    use parcelgen_model::{
        DeclHeader, FieldHeader, Modifiers, PrimitiveType, TypeModelBuilder,
    };

    fn single_field(header: DeclHeader, field_modifiers: Modifiers) -> (TypeModel, ElementId) {
        let mut builder = TypeModelBuilder::new();
        let decl = builder.declare(header).unwrap();
        let int = builder.primitive(PrimitiveType::Int);
        let element = builder
            .add_field(
                decl,
                FieldHeader::new("count", int)
                    .with_modifiers(field_modifiers)
                    .annotated(PARCEL_FIELD),
            )
            .unwrap();
        (builder.finish().unwrap(), element)
    }

    #[test]
    fn test_accepts_package_private_field_in_public_class() {
        let (model, element) = single_field(
            DeclHeader::class("com.example.User").with_modifiers(Modifiers::public()),
            Modifiers::none(),
        );
        let config = ProcessorConfig::default();
        let violations = Validator::new(&model, &config).validate(element).unwrap();
        assert!(violations.is_empty(), "unexpected: {violations:?}");
    }

    #[test]
    fn test_private_and_static_are_one_violation() {
        let (model, element) = single_field(
            DeclHeader::class("com.example.User"),
            Modifiers::private().with(Modifier::Static),
        );
        let config = ProcessorConfig::default();
        let violations = Validator::new(&model, &config).validate(element).unwrap();
        assert_eq!(violations.len(), 1);
        assert!(matches!(violations[0], Violation::PrivateOrStatic { .. }));
    }

    #[test]
    fn test_static_field_rejected() {
        let (model, element) = single_field(
            DeclHeader::class("com.example.User"),
            Modifiers::none().with(Modifier::Static),
        );
        let config = ProcessorConfig::default();
        let violations = Validator::new(&model, &config).validate(element).unwrap();
        assert_eq!(
            violations[0].to_string(),
            "@ParcelField fields must not be private or static. (com.example.User.count)"
        );
    }

    #[test]
    fn test_all_rules_reported_together() {
        let (model, element) = single_field(
            DeclHeader::interface("android.widget.Holder").with_modifiers(Modifiers::private()),
            Modifiers::private(),
        );
        let config = ProcessorConfig::default();
        let violations = Validator::new(&model, &config).validate(element).unwrap();
        assert_eq!(violations.len(), 4, "got: {violations:?}");
        assert!(matches!(violations[0], Violation::PrivateOrStatic { .. }));
        assert!(matches!(violations[1], Violation::NotInClass { .. }));
        assert!(matches!(violations[2], Violation::InPrivateClass { .. }));
        assert_eq!(
            violations[3].to_string(),
            "@ParcelField-annotated class incorrectly in Android framework package. (android.widget.Holder)"
        );
    }

    #[test]
    fn test_enum_is_not_a_class() {
        let (model, element) = single_field(
            DeclHeader::new("com.example.Color", DeclKind::Enum),
            Modifiers::none(),
        );
        let config = ProcessorConfig::default();
        let violations = Validator::new(&model, &config).validate(element).unwrap();
        assert_eq!(violations.len(), 1);
        assert!(matches!(violations[0], Violation::NotInClass { .. }));
    }

    #[test]
    fn test_java_namespace_and_lookalikes() {
        let config = ProcessorConfig::default();

        let (model, element) =
            single_field(DeclHeader::class("java.util.Thing"), Modifiers::none());
        let violations = Validator::new(&model, &config).validate(element).unwrap();
        assert!(matches!(
            &violations[..],
            [Violation::ReservedNamespace { label, .. }] if label == "Java framework"
        ));

        let (model, element) =
            single_field(DeclHeader::class("javax.inject.Thing"), Modifiers::none());
        let violations = Validator::new(&model, &config).validate(element).unwrap();
        assert!(violations.is_empty());
    }

    #[test]
    fn test_unknown_element_is_an_error() {
        let (model, _) = single_field(DeclHeader::class("com.example.User"), Modifiers::none());
        let config = ProcessorConfig::default();
        let err = Validator::new(&model, &config)
            .validate(ElementId(999))
            .unwrap_err();
        assert!(matches!(err, ModelError::UnknownElement { .. }));
    }
}
