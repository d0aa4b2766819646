//! Randomizers registered on the builder.

use super::RandomizerRegistry;
use crate::error::FixtureError;
use crate::randomizer::Randomizer;
use fixture_core::{DeclaredType, FieldDescriptor, TypeSchema};
use std::collections::HashMap;
use std::sync::Arc;

/// Per-field and per-type randomizers registered by the caller.
///
/// Field randomizers match through [`FieldDescriptor::matches`]; the most
/// recently registered matching descriptor wins. Type randomizers match the
/// declared type exactly.
#[derive(Clone, Default)]
pub struct CustomRegistry {
    field_randomizers: Vec<(FieldDescriptor, Arc<dyn Randomizer>)>,
    type_randomizers: HashMap<DeclaredType, Arc<dyn Randomizer>>,
}

impl CustomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a randomizer for the fields covered by `descriptor`.
    ///
    /// The descriptor must carry a declared type, since that is the type of
    /// the values the randomizer produces. A type-only descriptor registers
    /// a type randomizer.
    pub fn register(
        &mut self,
        descriptor: FieldDescriptor,
        randomizer: Arc<dyn Randomizer>,
    ) -> Result<(), FixtureError> {
        let Some(declared_type) = descriptor.declared_type.clone() else {
            return Err(FixtureError::AmbiguousFieldDefinition(format!(
                "randomizer for {descriptor} has no declared type"
            )));
        };
        if descriptor.is_type_only() && descriptor.generic_args.is_none() {
            self.register_type(declared_type, randomizer);
            return Ok(());
        }
        self.field_randomizers
            .retain(|(existing, _)| *existing != descriptor);
        self.field_randomizers.push((descriptor, randomizer));
        Ok(())
    }

    /// Register a randomizer for every value of `ty`.
    pub fn register_type(&mut self, ty: DeclaredType, randomizer: Arc<dyn Randomizer>) {
        self.type_randomizers.insert(ty, randomizer);
    }

    /// Descriptors with a field randomizer, in registration order.
    pub fn field_descriptors(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.field_randomizers.iter().map(|(descriptor, _)| descriptor)
    }

    pub fn len(&self) -> usize {
        self.field_randomizers.len() + self.type_randomizers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RandomizerRegistry for CustomRegistry {
    fn get_randomizer(
        &self,
        field: &FieldDescriptor,
        schema: &TypeSchema,
    ) -> Option<Arc<dyn Randomizer>> {
        self.field_randomizers
            .iter()
            .rev()
            .find(|(descriptor, _)| descriptor.matches(field, schema))
            .map(|(_, randomizer)| Arc::clone(randomizer))
    }

    fn get_type_randomizer(
        &self,
        ty: &DeclaredType,
        _schema: &TypeSchema,
    ) -> Option<Arc<dyn Randomizer>> {
        self.type_randomizers.get(ty).cloned()
    }
}
