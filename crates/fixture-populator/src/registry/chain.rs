//! The registry chain.

use super::{CustomRegistry, DefaultRegistry, ExclusionRegistry, RandomizerRegistry};
use crate::parameters::Parameters;
use crate::randomizer::Randomizer;
use fixture_core::{DeclaredType, FieldDescriptor, TypeSchema};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::warn;

/// Which part of the chain answered a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrySource {
    /// Randomizers registered on the builder
    Custom,
    /// Registries passed to the builder
    User,
    /// Registries from a discovery table
    Discovered,
    /// Built-in value producers
    Builtin,
}

/// Outcome of a chain lookup.
#[derive(Clone)]
pub enum Resolution {
    /// The field or type is excluded and must be left as it is
    Excluded,
    /// A randomizer applies
    Found {
        randomizer: Arc<dyn Randomizer>,
        source: RegistrySource,
    },
    /// Nothing in the chain applies
    NotFound,
}

impl Resolution {
    fn found(randomizer: Option<Arc<dyn Randomizer>>, source: RegistrySource) -> Option<Self> {
        randomizer.map(|randomizer| Self::Found { randomizer, source })
    }
}

/// Ordered registries consulted by the populator; the first answer wins.
pub struct RegistryChain {
    exclusions: ExclusionRegistry,
    custom: CustomRegistry,
    user: Vec<Box<dyn RandomizerRegistry>>,
    discovered: Vec<Box<dyn RandomizerRegistry>>,
    builtin: DefaultRegistry,
}

impl RegistryChain {
    /// Assemble and initialize a chain.
    ///
    /// User and discovered registries are deduplicated by name, keeping the
    /// first occurrence; user registries come before discovered ones.
    pub fn new(
        parameters: &Parameters,
        exclusions: ExclusionRegistry,
        custom: CustomRegistry,
        user: Vec<Box<dyn RandomizerRegistry>>,
        discovered: Vec<Box<dyn RandomizerRegistry>>,
    ) -> Self {
        let mut seen = HashSet::new();
        let mut dedup = |registries: Vec<Box<dyn RandomizerRegistry>>| {
            registries
                .into_iter()
                .filter(|registry| {
                    let name = registry.name();
                    let first = seen.insert(name.clone());
                    if !first {
                        warn!("Ignoring duplicate randomizer registry: {name}");
                    }
                    first
                })
                .collect::<Vec<_>>()
        };
        let mut user = dedup(user);
        let mut discovered = dedup(discovered);

        for registry in user.iter_mut().chain(discovered.iter_mut()) {
            registry.init(parameters);
        }

        Self {
            exclusions,
            custom,
            user,
            discovered,
            builtin: DefaultRegistry::new(parameters),
        }
    }

    /// Names of the user and discovered registries, in lookup order.
    pub fn registry_names(&self) -> Vec<String> {
        self.user
            .iter()
            .chain(self.discovered.iter())
            .map(|registry| registry.name())
            .collect()
    }

    pub fn exclusions(&self) -> &ExclusionRegistry {
        &self.exclusions
    }

    pub fn custom(&self) -> &CustomRegistry {
        &self.custom
    }

    /// Resolve a field met while populating an instance.
    ///
    /// Each registry is asked for a field randomizer, then for a randomizer
    /// of the field's declared type, before the next registry is consulted.
    pub fn resolve_field(&self, field: &FieldDescriptor, schema: &TypeSchema) -> Resolution {
        if self.exclusions.is_field_excluded(field, schema) {
            return Resolution::Excluded;
        }
        self.lookup(|registry| {
            registry.get_randomizer(field, schema).or_else(|| {
                field
                    .declared_type
                    .as_ref()
                    .and_then(|ty| registry.get_type_randomizer(ty, schema))
            })
        })
    }

    /// Resolve a bare type: a container element or a top-level target.
    pub fn resolve_type(&self, ty: &DeclaredType, schema: &TypeSchema) -> Resolution {
        if self.exclusions.is_type_excluded(ty, schema) {
            return Resolution::Excluded;
        }
        self.lookup(|registry| registry.get_type_randomizer(ty, schema))
    }

    fn lookup<F>(&self, query: F) -> Resolution
    where
        F: Fn(&dyn RandomizerRegistry) -> Option<Arc<dyn Randomizer>>,
    {
        Resolution::found(query(&self.custom), RegistrySource::Custom)
            .or_else(|| {
                self.user.iter().find_map(|registry| {
                    Resolution::found(query(registry.as_ref()), RegistrySource::User)
                })
            })
            .or_else(|| {
                self.discovered.iter().find_map(|registry| {
                    Resolution::found(query(registry.as_ref()), RegistrySource::Discovered)
                })
            })
            .or_else(|| Resolution::found(query(&self.builtin), RegistrySource::Builtin))
            .unwrap_or(Resolution::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::randomizer::{constant, RandomizerContext};
    use fixture_core::{field, FieldDefinition, TypeDefinition, Value};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct Shouting;

    impl RandomizerRegistry for Shouting {
        fn get_type_randomizer(
            &self,
            ty: &DeclaredType,
            _schema: &TypeSchema,
        ) -> Option<Arc<dyn Randomizer>> {
            (*ty == DeclaredType::String).then(|| Arc::new(constant("HEY")) as Arc<dyn Randomizer>)
        }
    }

    struct Whispering;

    impl RandomizerRegistry for Whispering {
        fn get_type_randomizer(
            &self,
            ty: &DeclaredType,
            _schema: &TypeSchema,
        ) -> Option<Arc<dyn Randomizer>> {
            (*ty == DeclaredType::String).then(|| Arc::new(constant("hey")) as Arc<dyn Randomizer>)
        }
    }

    fn schema() -> TypeSchema {
        TypeSchema::new(vec![TypeDefinition::new("Person")
            .with_field(FieldDefinition::new("name", DeclaredType::String))
            .with_field(FieldDefinition::new("nick", DeclaredType::String))])
        .unwrap()
    }

    fn person_field(name: &str) -> FieldDescriptor {
        FieldDescriptor::for_field("Person", &FieldDefinition::new(name, DeclaredType::String))
    }

    fn produce(resolution: Resolution) -> (Value, RegistrySource) {
        match resolution {
            Resolution::Found { randomizer, source } => {
                let mut rng = StdRng::seed_from_u64(1);
                let parameters = Parameters::default();
                let mut ctx = RandomizerContext {
                    rng: &mut rng,
                    parameters: &parameters,
                    depth: 1,
                    field: None,
                };
                (randomizer.randomize(&mut ctx), source)
            }
            Resolution::Excluded => panic!("unexpected exclusion"),
            Resolution::NotFound => panic!("unexpected miss"),
        }
    }

    #[test]
    fn test_precedence() {
        let schema = schema();
        let parameters = Parameters::default();
        let mut custom = CustomRegistry::new();
        custom
            .register(
                field().named("name").of_type(DeclaredType::String),
                Arc::new(constant("Alice")),
            )
            .unwrap();
        let chain = RegistryChain::new(
            &parameters,
            ExclusionRegistry::new(),
            custom,
            vec![Box::new(Shouting)],
            vec![Box::new(Whispering)],
        );

        assert_eq!(
            produce(chain.resolve_field(&person_field("name"), &schema)),
            (Value::from("Alice"), RegistrySource::Custom)
        );
        assert_eq!(
            produce(chain.resolve_field(&person_field("nick"), &schema)),
            (Value::from("HEY"), RegistrySource::User)
        );
        assert!(matches!(
            chain.resolve_type(&DeclaredType::Int32, &schema),
            Resolution::Found {
                source: RegistrySource::Builtin,
                ..
            }
        ));
        assert!(matches!(
            chain.resolve_type(&DeclaredType::named("Person"), &schema),
            Resolution::NotFound
        ));
    }

    #[test]
    fn test_exclusion_wins() {
        let schema = schema();
        let parameters = Parameters::default();
        let mut custom = CustomRegistry::new();
        custom
            .register(
                field().named("name").of_type(DeclaredType::String),
                Arc::new(constant("Alice")),
            )
            .unwrap();
        let mut exclusions = ExclusionRegistry::new();
        exclusions.exclude(field().named("name")).unwrap();
        let chain = RegistryChain::new(&parameters, exclusions, custom, vec![], vec![]);

        assert!(matches!(
            chain.resolve_field(&person_field("name"), &schema),
            Resolution::Excluded
        ));
    }

    #[test]
    fn test_duplicate_registries_are_dropped() {
        let parameters = Parameters::default();
        let chain = RegistryChain::new(
            &parameters,
            ExclusionRegistry::new(),
            CustomRegistry::new(),
            vec![Box::new(Shouting), Box::new(Shouting)],
            vec![Box::new(Shouting), Box::new(Whispering)],
        );
        let names = chain.registry_names();
        assert_eq!(names.len(), 2);
        assert!(names[0].ends_with("Shouting"));
        assert!(names[1].ends_with("Whispering"));
    }
}
