//! Per-round registry of generation targets

use crate::config::ProcessorConfig;
use crate::descriptor::{GenerationDescriptor, GenerationKind};
use parcelgen_model::{DeclId, ModelError, TypeReflection};
use rustc_hash::FxHashMap;

/// Insertion-ordered map from enclosing declaration to its descriptor
///
/// A registry lives for exactly one round.
#[derive(Debug)]
pub struct TargetRegistry<'a> {
    reflection: TypeReflection<'a>,
    config: &'a ProcessorConfig,
    index: FxHashMap<DeclId, usize>,
    descriptors: Vec<GenerationDescriptor>,
}

impl<'a> TargetRegistry<'a> {
    /// Create an empty registry
    pub fn new(reflection: TypeReflection<'a>, config: &'a ProcessorConfig) -> Self {
        TargetRegistry {
            reflection,
            config,
            index: FxHashMap::default(),
            descriptors: Vec::new(),
        }
    }

    /// Descriptor for `target`, creating and classifying it on first use
    ///
    /// The flag is `true` when the descriptor was created by this call.
    /// Nothing is registered when classification fails.
    pub fn get_or_create(
        &mut self,
        target: DeclId,
    ) -> Result<(&mut GenerationDescriptor, bool), ModelError> {
        if let Some(&slot) = self.index.get(&target) {
            return Ok((&mut self.descriptors[slot], false));
        }

        let kind = self.classify(target)?;
        let decl = self.reflection.model().decl(target)?;
        let descriptor = GenerationDescriptor::new(target, decl, kind, self.config);

        let slot = self.descriptors.len();
        self.descriptors.push(descriptor);
        self.index.insert(target, slot);
        Ok((&mut self.descriptors[slot], true))
    }

    /// Injector when the target's own type reaches the serialization interface
    fn classify(&self, target: DeclId) -> Result<GenerationKind, ModelError> {
        let ty = self.reflection.declaration_type(target)?;
        if self
            .reflection
            .is_subtype_of(ty, &self.config.serializable_type)
        {
            Ok(GenerationKind::Injector)
        } else {
            Ok(GenerationKind::Delegate)
        }
    }

    /// Descriptor registered for `target`, if any
    pub fn get(&self, target: DeclId) -> Option<&GenerationDescriptor> {
        self.index.get(&target).map(|&slot| &self.descriptors[slot])
    }

    /// Number of registered descriptors
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether nothing has been registered
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Descriptors in registration order
    pub fn iter(&self) -> impl Iterator<Item = &GenerationDescriptor> {
        self.descriptors.iter()
    }

    /// Consume the registry, yielding descriptors in registration order
    pub fn into_descriptors(self) -> Vec<GenerationDescriptor> {
        self.descriptors
    }
}
