//! Exclusions.

use crate::error::FixtureError;
use fixture_core::{DeclaredType, FieldDescriptor, TypeSchema};

/// Fields and types that must never be populated.
///
/// An excluded field keeps the value it had after construction. A type-only
/// exclusion also covers container elements and top-level requests for
/// that type (and its subtypes).
#[derive(Debug, Clone, Default)]
pub struct ExclusionRegistry {
    descriptors: Vec<FieldDescriptor>,
}

impl ExclusionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclude every field covered by `descriptor`.
    pub fn exclude(&mut self, descriptor: FieldDescriptor) -> Result<(), FixtureError> {
        if descriptor.is_unconstrained() {
            return Err(FixtureError::AmbiguousFieldDefinition(
                "exclusion must name a field, an owning type or a declared type".to_string(),
            ));
        }
        if !self.descriptors.contains(&descriptor) {
            self.descriptors.push(descriptor);
        }
        Ok(())
    }

    /// Exclude a type wherever it appears.
    pub fn exclude_type(&mut self, ty: DeclaredType) {
        let descriptor = FieldDescriptor::of_type_only(ty);
        if !self.descriptors.contains(&descriptor) {
            self.descriptors.push(descriptor);
        }
    }

    /// Check if a field met during population is excluded.
    pub fn is_field_excluded(&self, field: &FieldDescriptor, schema: &TypeSchema) -> bool {
        self.descriptors
            .iter()
            .any(|descriptor| descriptor.matches(field, schema))
    }

    /// Check if a bare type (container element, top-level target) is excluded.
    pub fn is_type_excluded(&self, ty: &DeclaredType, schema: &TypeSchema) -> bool {
        self.descriptors.iter().any(|descriptor| {
            descriptor.is_type_only()
                && descriptor.generic_args.is_none()
                && descriptor
                    .declared_type
                    .as_ref()
                    .is_some_and(|excluded| schema.is_assignable(excluded, ty))
        })
    }

    /// Registered exclusions, in registration order.
    pub fn descriptors(&self) -> &[FieldDescriptor] {
        &self.descriptors
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixture_core::{field, FieldDefinition, TypeDefinition, TypeKind};

    fn schema() -> TypeSchema {
        TypeSchema::new(vec![
            TypeDefinition::new("Contact").with_kind(TypeKind::Interface),
            TypeDefinition::new("EmailAddress")
                .implementing("Contact")
                .with_field(FieldDefinition::new("value", DeclaredType::String)),
            TypeDefinition::new("Person")
                .with_field(FieldDefinition::new("name", DeclaredType::String))
                .with_field(FieldDefinition::new(
                    "email",
                    DeclaredType::named("EmailAddress"),
                )),
        ])
        .unwrap()
    }

    fn person_field(name: &str, ty: DeclaredType) -> FieldDescriptor {
        FieldDescriptor::for_field("Person", &FieldDefinition::new(name, ty))
    }

    #[test]
    fn test_unconstrained_is_ambiguous() {
        let mut registry = ExclusionRegistry::new();
        assert!(matches!(
            registry.exclude(field()),
            Err(FixtureError::AmbiguousFieldDefinition(_))
        ));
    }

    #[test]
    fn test_exclude_by_name() {
        let schema = schema();
        let mut registry = ExclusionRegistry::new();
        registry.exclude(field().named("name").in_type("Person")).unwrap();

        assert!(registry.is_field_excluded(&person_field("name", DeclaredType::String), &schema));
        assert!(!registry.is_field_excluded(
            &person_field("email", DeclaredType::named("EmailAddress")),
            &schema
        ));
        // not a type-only exclusion
        assert!(!registry.is_type_excluded(&DeclaredType::String, &schema));
    }

    #[test]
    fn test_exclude_by_type_covers_subtypes() {
        let schema = schema();
        let mut registry = ExclusionRegistry::new();
        registry.exclude_type(DeclaredType::named("Contact"));
        registry.exclude_type(DeclaredType::named("Contact"));
        assert_eq!(registry.len(), 1);

        assert!(registry.is_field_excluded(
            &person_field("email", DeclaredType::named("EmailAddress")),
            &schema
        ));
        assert!(registry.is_type_excluded(&DeclaredType::named("EmailAddress"), &schema));
        assert!(!registry.is_type_excluded(&DeclaredType::named("Person"), &schema));
    }
}
