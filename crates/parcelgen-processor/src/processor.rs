//! Round orchestration
//!
//! A round runs discovery, validation, classification and emission for one
//! set of annotated elements. Failures are isolated to the element or the
//! descriptor they concern and reported through the [`Messager`]; nothing a
//! round builds outlives it.

use crate::config::ProcessorConfig;
use crate::descriptor::GenerationDescriptor;
use crate::diagnostic::{Diagnostic, Messager};
use crate::error::{EmitError, ProcessError};
use crate::filer::OutputSink;
use crate::generator::{Generator, JavaSourceGenerator};
use crate::registry::TargetRegistry;
use crate::validate::Validator;
use parcelgen_model::{ElementId, ModelError, TypeModel, TypeReflection};
use serde::Serialize;
use std::io::Write;
use tracing::{debug, debug_span, trace, warn};

/// The elements handed to one round
#[derive(Debug, Clone)]
pub struct RoundEnv<'a> {
    model: &'a TypeModel,
    elements: Vec<ElementId>,
}

impl<'a> RoundEnv<'a> {
    /// Every element in `model` carrying the configured annotation, in model order
    pub fn new(model: &'a TypeModel, config: &ProcessorConfig) -> Self {
        RoundEnv {
            model,
            elements: model.elements_annotated_with(&config.annotation),
        }
    }

    /// An explicit element list, processed in the given order
    pub fn with_elements(model: &'a TypeModel, elements: Vec<ElementId>) -> Self {
        RoundEnv { model, elements }
    }

    /// The model the elements belong to
    pub fn model(&self) -> &'a TypeModel {
        self.model
    }

    /// Elements in processing order
    pub fn elements(&self) -> &[ElementId] {
        &self.elements
    }
}

/// Counts describing what a round did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RoundReport {
    /// Elements seen
    pub elements: usize,
    /// Elements added to a descriptor
    pub accepted: usize,
    /// Elements that broke at least one rule
    pub rejected: usize,
    /// Elements the model could not answer for
    pub failed: usize,
    /// Descriptors created
    pub descriptors: usize,
    /// Units generated and written
    pub emitted: usize,
    /// Descriptors whose generation or output failed
    pub emission_failures: usize,
}

impl RoundReport {
    /// Whether any error diagnostic was reported during the round
    pub fn has_errors(&self) -> bool {
        self.rejected > 0 || self.failed > 0 || self.emission_failures > 0
    }
}

/// Result of handling one element
#[derive(Debug)]
enum ElementOutcome {
    Accepted,
    Rejected(ProcessError),
    Failed(ProcessError),
}

/// The `@ParcelField` processor
#[derive(Debug, Clone)]
pub struct ParcelProcessor<G = JavaSourceGenerator> {
    config: ProcessorConfig,
    generator: G,
}

impl ParcelProcessor {
    /// Create a processor with the default Java generator
    pub fn new(config: ProcessorConfig) -> Self {
        ParcelProcessor {
            config,
            generator: JavaSourceGenerator::new(),
        }
    }
}

impl Default for ParcelProcessor {
    fn default() -> Self {
        Self::new(ProcessorConfig::default())
    }
}

impl<G: Generator> ParcelProcessor<G> {
    /// Create a processor with a custom generator
    pub fn with_generator(config: ProcessorConfig, generator: G) -> Self {
        ParcelProcessor { config, generator }
    }

    /// Processor configuration
    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Run one round
    ///
    /// Every element is handled, then every descriptor is emitted in
    /// registration order. The registry is local to this call.
    pub fn process_round(
        &self,
        round: &RoundEnv<'_>,
        messager: &mut dyn Messager,
        sink: &mut dyn OutputSink,
    ) -> RoundReport {
        let span = debug_span!("round", elements = round.elements().len());
        let _enter = span.enter();

        messager.report(Diagnostic::note("start process parcel annotation"));

        let model = round.model();
        let reflection = TypeReflection::new(model);
        let validator = Validator::new(model, &self.config);
        let mut registry = TargetRegistry::new(reflection, &self.config);
        let mut report = RoundReport::default();

        for &element in round.elements() {
            report.elements += 1;
            let outcome =
                self.process_element(element, reflection, &validator, &mut registry, messager);
            let error = match outcome {
                ElementOutcome::Accepted => {
                    report.accepted += 1;
                    continue;
                }
                ElementOutcome::Rejected(error) => {
                    debug!(%element, "element rejected");
                    report.rejected += 1;
                    error
                }
                ElementOutcome::Failed(error) => {
                    warn!(%element, error = %error.detail(), "element processing failed");
                    report.failed += 1;
                    error
                }
            };
            for diagnostic in Diagnostic::from_process_error(&error, model) {
                messager.report(diagnostic);
            }
        }

        report.descriptors = registry.len();
        for descriptor in registry.into_descriptors() {
            match self.emit(&descriptor, sink) {
                Ok(()) => {
                    debug!(unit = %descriptor.full_name(), fields = descriptor.fields.len(), "unit emitted");
                    report.emitted += 1;
                }
                Err(cause) => {
                    warn!(target_class = %descriptor.target, error = %cause, "emission failed");
                    report.emission_failures += 1;
                    let error = ProcessError::EmissionFailed {
                        target: descriptor.target,
                        declaration: descriptor.target_decl,
                        cause,
                    };
                    for diagnostic in Diagnostic::from_process_error(&error, model) {
                        messager.report(diagnostic);
                    }
                }
            }
        }

        debug!(?report, "round finished");
        report
    }

    fn process_element(
        &self,
        element: ElementId,
        reflection: TypeReflection<'_>,
        validator: &Validator<'_>,
        registry: &mut TargetRegistry<'_>,
        messager: &mut dyn Messager,
    ) -> ElementOutcome {
        let failed = |source: ModelError| {
            ElementOutcome::Failed(ProcessError::ElementProcessingFailed {
                element,
                annotation: self.config.annotation_simple_name().to_string(),
                source,
            })
        };

        let (name, type_name) = match resolve_element(reflection, element) {
            Ok(resolved) => resolved,
            Err(source) => return failed(source),
        };
        trace!(%element, name = %name, ty = %type_name, "resolved element");

        let violations = match validator.validate(element) {
            Ok(violations) => violations,
            Err(source) => return failed(source),
        };
        if !violations.is_empty() {
            return ElementOutcome::Rejected(ProcessError::ElementRejected {
                element,
                violations,
            });
        }

        let enclosing = match reflection.model().element(element) {
            Ok(field) => field.enclosing,
            Err(source) => return failed(source),
        };
        let (descriptor, created) = match registry.get_or_create(enclosing) {
            Ok(entry) => entry,
            Err(source) => return failed(source),
        };
        if created {
            debug!(target_class = %descriptor.target, kind = %descriptor.kind, "descriptor created");
            messager.report(Diagnostic::note(format!(
                "targetClassName={},packageName={},className={}",
                descriptor.target, descriptor.package, descriptor.class_name
            )));
        }
        messager.report(Diagnostic::note(format!(
            "elementName={name},elementType={type_name}"
        )));
        descriptor.add_field(name, type_name);
        ElementOutcome::Accepted
    }

    fn emit(
        &self,
        descriptor: &GenerationDescriptor,
        sink: &mut dyn OutputSink,
    ) -> Result<(), EmitError> {
        let text = self.generator.generate(descriptor)?;
        let mut unit = sink.create_unit(&descriptor.full_name(), descriptor.target_decl)?;
        unit.write_all(text.as_bytes())?;
        unit.close()?;
        Ok(())
    }
}

/// Field name and canonical resolved type of an element
fn resolve_element(
    reflection: TypeReflection<'_>,
    element: ElementId,
) -> Result<(String, String), ModelError> {
    let model = reflection.model();
    let field = model.element(element)?;
    let ty = reflection.resolve_declared_type(element)?;
    Ok((field.name.clone(), model.canonical_name(ty)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PARCEL_FIELD;
    use crate::diagnostic::CollectingMessager;
    use crate::filer::MemorySink;
    use parcelgen_model::{DeclHeader, FieldHeader, Modifiers, PrimitiveType, TypeModelBuilder};

    fn user_model() -> TypeModel {
        let mut builder = TypeModelBuilder::new();
        let user = builder.declare(DeclHeader::class("com.example.User")).unwrap();
        let int = builder.primitive(PrimitiveType::Int);
        builder
            .add_field(user, FieldHeader::new("age", int).annotated(PARCEL_FIELD))
            .unwrap();
        builder
            .add_field(
                user,
                FieldHeader::new("secret", int)
                    .with_modifiers(Modifiers::private())
                    .annotated(PARCEL_FIELD),
            )
            .unwrap();
        builder
            .add_field(user, FieldHeader::new("plain", int))
            .unwrap();
        builder.finish().unwrap()
    }

    #[test]
    fn test_round_env_collects_annotated_elements() {
        let model = user_model();
        let config = ProcessorConfig::default();
        let round = RoundEnv::new(&model, &config);
        assert_eq!(round.elements().len(), 2);
    }

    #[test]
    fn test_report_counts() {
        let model = user_model();
        let processor = ParcelProcessor::default();
        let round = RoundEnv::new(&model, processor.config());
        let mut messager = CollectingMessager::new();
        let mut sink = MemorySink::new();

        let report = processor.process_round(&round, &mut messager, &mut sink);
        assert_eq!(
            report,
            RoundReport {
                elements: 2,
                accepted: 1,
                rejected: 1,
                failed: 0,
                descriptors: 1,
                emitted: 1,
                emission_failures: 0,
            }
        );
        assert!(report.has_errors());
        assert_eq!(messager.error_count(), 1);
        assert_eq!(messager.diagnostics()[0].message(), "start process parcel annotation");
    }

    #[test]
    fn test_empty_round_emits_nothing() {
        let model = TypeModelBuilder::new().finish().unwrap();
        let processor = ParcelProcessor::default();
        let round = RoundEnv::new(&model, processor.config());
        let mut messager = CollectingMessager::new();
        let mut sink = MemorySink::new();

        let report = processor.process_round(&round, &mut messager, &mut sink);
        assert_eq!(report, RoundReport::default());
        assert!(!report.has_errors());
        assert_eq!(messager.note_count(), 1);
        assert!(sink.units().is_empty());
    }
}
