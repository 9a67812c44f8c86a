//! Parcelgen Processor
//!
//! Discovers fields annotated with `@ParcelField`, validates them, groups them
//! by enclosing class and classifies each class into an Injector or Delegate
//! generation strategy. Every completed descriptor is handed to a
//! [`Generator`] and the resulting source is written through an
//! [`OutputSink`].
//!
//! This crate provides:
//! - Processor configuration (annotation name, serialization interface, suffixes)
//! - Per-element validation with all violations reported at once
//! - A per-round target registry
//! - The round orchestrator with per-element and per-descriptor failure isolation
//! - Diagnostics rendered through codespan-reporting or as JSON
//!
//! # Usage
//!
//! ```ignore
//! use parcelgen_model::ModelLoader;
//! use parcelgen_processor::{CollectingMessager, DirectorySink, ParcelProcessor, ProcessorConfig, RoundEnv};
//!
//! let model = ModelLoader::from_path("model.json")?;
//! let processor = ParcelProcessor::new(ProcessorConfig::default());
//! let round = RoundEnv::new(&model, processor.config());
//!
//! let mut messager = CollectingMessager::new();
//! let mut sink = DirectorySink::new("generated");
//! let report = processor.process_round(&round, &mut messager, &mut sink);
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod descriptor;
pub mod diagnostic;
pub mod error;
pub mod filer;
pub mod generator;
pub mod processor;
pub mod registry;
pub mod validate;

// Re-export main types
pub use config::{ConfigError, ProcessorConfig, ReservedNamespace};
pub use descriptor::{FieldBinding, GenerationDescriptor, GenerationKind};
pub use diagnostic::{Anchor, CollectingMessager, Diagnostic, ErrorCode, JsonDiagnostic, Messager};
pub use error::{EmitError, GenerateError, ProcessError, Violation};
pub use filer::{DirectorySink, GeneratedUnit, MemorySink, OutputSink, SourceUnit};
pub use generator::{Generator, JavaSourceGenerator};
pub use processor::{ParcelProcessor, RoundEnv, RoundReport};
pub use registry::TargetRegistry;
pub use validate::Validator;
