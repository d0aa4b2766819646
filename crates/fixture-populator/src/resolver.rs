//! Concrete type resolution for abstract and interface types.

use fixture_core::TypeSchema;
use std::collections::HashMap;

/// Finds the concrete types that can stand in for an abstract type.
pub trait ConcreteTypeResolver: Send + Sync {
    /// Concrete types assignable to `abstract_type`, in a stable order.
    fn find_concrete_types_of(&self, abstract_type: &str, schema: &TypeSchema) -> Vec<String>;
}

/// Scans the type schema for instantiable subtypes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaScanResolver;

impl ConcreteTypeResolver for SchemaScanResolver {
    fn find_concrete_types_of(&self, abstract_type: &str, schema: &TypeSchema) -> Vec<String> {
        schema
            .concrete_subtypes(abstract_type)
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

/// Resolves from a table filled at startup.
#[derive(Debug, Clone, Default)]
pub struct StaticTypeResolver {
    implementations: HashMap<String, Vec<String>>,
}

impl StaticTypeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `concrete` as an implementation of `abstract_type`.
    pub fn register(
        mut self,
        abstract_type: impl Into<String>,
        concrete: impl Into<String>,
    ) -> Self {
        let implementations = self.implementations.entry(abstract_type.into()).or_default();
        let concrete = concrete.into();
        if !implementations.contains(&concrete) {
            implementations.push(concrete);
        }
        self
    }
}

impl ConcreteTypeResolver for StaticTypeResolver {
    fn find_concrete_types_of(&self, abstract_type: &str, _schema: &TypeSchema) -> Vec<String> {
        self.implementations
            .get(abstract_type)
            .cloned()
            .unwrap_or_default()
    }
}

/// Never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTypeResolver;

impl ConcreteTypeResolver for NoopTypeResolver {
    fn find_concrete_types_of(&self, _abstract_type: &str, _schema: &TypeSchema) -> Vec<String> {
        Vec::new()
    }
}
