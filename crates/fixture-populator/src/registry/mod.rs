//! Randomizer registries.
//!
//! A registry is a source of randomizers. The populator combines them into a
//! [`RegistryChain`] with a fixed precedence and uses the first answer it
//! gets:
//!
//! ```text
//! ExclusionRegistry        skip the field entirely
//! CustomRegistry           per-field, then per-type randomizers from the builder
//! user registries          in registration order
//! discovered registries    from a RegistryDiscovery table
//! DefaultRegistry          built-in value producers
//! ```

pub mod chain;
pub mod custom;
pub mod default;
pub mod discovery;
pub mod exclusion;

use crate::parameters::Parameters;
use crate::randomizer::Randomizer;
use fixture_core::{DeclaredType, FieldDescriptor, TypeSchema};
use std::sync::Arc;

pub use chain::{RegistryChain, RegistrySource, Resolution};
pub use custom::CustomRegistry;
pub use default::DefaultRegistry;
pub use discovery::RegistryDiscovery;
pub use exclusion::ExclusionRegistry;

/// A source of randomizers.
pub trait RandomizerRegistry: Send + Sync {
    /// Name used to deduplicate registries; two registries with the same
    /// name are never both part of a chain.
    fn name(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }

    /// Called once with the populator's parameters before any lookup.
    fn init(&mut self, _parameters: &Parameters) {}

    /// Randomizer for one specific field, if this registry has one.
    fn get_randomizer(
        &self,
        _field: &FieldDescriptor,
        _schema: &TypeSchema,
    ) -> Option<Arc<dyn Randomizer>> {
        None
    }

    /// Randomizer for every value of a type, if this registry has one.
    fn get_type_randomizer(
        &self,
        _ty: &DeclaredType,
        _schema: &TypeSchema,
    ) -> Option<Arc<dyn Randomizer>> {
        None
    }
}
