//! The population engine.
//!
//! A `Populator` builds instances of schema types and fills every field with
//! a random value. For each field it consults, in order: the exclusions, the
//! registry chain, the value the constructor assigned, and finally the
//! structure of the field's type (containers are filled element by element,
//! nested types are populated recursively).
//!
//! Recursion is bounded by `max_randomization_depth`: a field nested deeper
//! than that is left as constructed. Within one call, at most
//! `max_object_pool_size` distinct instances of a type are generated; further
//! nested requests reuse one of them.

use crate::context::{PopulateOptions, PopulationContext};
use crate::error::FixtureError;
use crate::parameters::{Charset, DateRange, Parameters, TimeRange};
use crate::randomizer::{Randomizer, RandomizerContext};
use crate::registry::{
    CustomRegistry, ExclusionRegistry, RandomizerRegistry, RegistryChain, RegistryDiscovery,
    RegistrySource, Resolution,
};
use crate::resolver::{ConcreteTypeResolver, SchemaScanResolver};
use chrono::{NaiveDate, NaiveTime};
use fixture_core::{
    DeclaredType, FieldDefinition, FieldDescriptor, ObjectValue, TypeSchema, Value,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, trace, warn};

/// Draws allowed per element when filling sets and map keys.
const UNIQUE_ATTEMPTS_PER_ELEMENT: usize = 10;

/// Generates populated instances of the types of a schema.
///
/// # Example
///
/// ```rust
/// use fixture_core::{field, DeclaredType, TypeSchema};
/// use fixture_populator::{constant, Populator};
///
/// let schema = TypeSchema::from_yaml(r#"
/// types:
///   - name: Person
///     fields:
///       - name: id
///         type: int64
///       - name: name
///         type: string
/// "#).unwrap();
///
/// let mut populator = Populator::builder(schema)
///     .seed(42)
///     .randomize(field().named("id").of_type(DeclaredType::Int64), constant(42i64))
///     .unwrap()
///     .build()
///     .unwrap();
///
/// let person = populator.populate("Person").unwrap();
/// assert_eq!(person.get_field("id").and_then(|v| v.as_i64()), Some(42));
/// ```
pub struct Populator {
    engine: Engine,
    rng: StdRng,
    seed: u64,
}

impl Populator {
    /// Start configuring a populator for `schema`.
    pub fn builder(schema: TypeSchema) -> PopulatorBuilder {
        PopulatorBuilder::new(schema)
    }

    /// A fresh populator with default parameters and a time-based seed.
    pub fn with_defaults(schema: TypeSchema) -> Result<Self, FixtureError> {
        PopulatorBuilder::new(schema).build()
    }

    /// Seed of the random source, either configured or chosen at build time.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn parameters(&self) -> &Parameters {
        &self.engine.parameters
    }

    pub fn schema(&self) -> &TypeSchema {
        &self.engine.schema
    }

    /// Names of the user and discovered registries, in lookup order.
    pub fn registry_names(&self) -> Vec<String> {
        self.engine.chain.registry_names()
    }

    /// Generate a populated instance of a schema type.
    pub fn populate(&mut self, type_name: &str) -> Result<Value, FixtureError> {
        self.populate_with(type_name, &PopulateOptions::default())
    }

    /// Generate a populated instance of a schema type with per-call options.
    pub fn populate_with(
        &mut self,
        type_name: &str,
        options: &PopulateOptions,
    ) -> Result<Value, FixtureError> {
        self.populate_type_with(&DeclaredType::named(type_name), options)
    }

    /// Generate a value of any declared type (containers and primitives included).
    pub fn populate_type(&mut self, ty: &DeclaredType) -> Result<Value, FixtureError> {
        self.populate_type_with(ty, &PopulateOptions::default())
    }

    pub fn populate_type_with(
        &mut self,
        ty: &DeclaredType,
        options: &PopulateOptions,
    ) -> Result<Value, FixtureError> {
        let mut ctx = PopulationContext::new(
            &mut self.rng,
            options,
            self.engine.parameters.max_object_pool_size,
        );
        match ty {
            DeclaredType::Named(name) => self.engine.generate_object(name, &mut ctx, true),
            _ => self.engine.generate_value(ty, &mut ctx),
        }
    }

    /// Populate the fields of an existing instance in place.
    ///
    /// Fields the instance lacks get their constructor value first. Fields
    /// holding a non-default value are kept unless
    /// `override_default_initialization` is set.
    pub fn populate_instance(&mut self, instance: ObjectValue) -> Result<ObjectValue, FixtureError> {
        self.populate_instance_with(instance, &PopulateOptions::default())
    }

    pub fn populate_instance_with(
        &mut self,
        instance: ObjectValue,
        options: &PopulateOptions,
    ) -> Result<ObjectValue, FixtureError> {
        let type_name = instance.type_name.clone();
        let definition = self
            .engine
            .schema
            .get_type(&type_name)
            .ok_or_else(|| FixtureError::generation(&type_name, "type is not defined in the schema"))?;
        if definition.kind.is_abstract() {
            return Err(FixtureError::generation(
                &type_name,
                "cannot populate an instance of an abstract type",
            ));
        }

        let mut base = self
            .engine
            .schema
            .instantiate(&type_name)
            .map_err(|e| FixtureError::generation(&type_name, e.to_string()))?;
        for (name, value) in instance.fields {
            if !base.fields.contains_key(&name) {
                return Err(FixtureError::field_generation(
                    &type_name,
                    name,
                    "no such field in the type definition",
                ));
            }
            base.set(name, value);
        }

        let mut ctx = PopulationContext::new(
            &mut self.rng,
            options,
            self.engine.parameters.max_object_pool_size,
        );
        self.engine.populate_fields(base, &mut ctx)
    }

    /// Generate `count` independent instances of a schema type.
    pub fn populate_many(&mut self, type_name: &str, count: usize) -> PopulateMany<'_> {
        PopulateMany {
            populator: self,
            type_name: type_name.to_string(),
            remaining: count,
        }
    }

    /// Generate an instance and deserialize it into a Rust type.
    pub fn populate_as<T: DeserializeOwned>(&mut self, type_name: &str) -> Result<T, FixtureError> {
        let value = self.populate(type_name)?;
        serde_json::from_value(value.to_json()).map_err(|e| {
            FixtureError::generation(
                type_name,
                format!("cannot convert to {}: {e}", std::any::type_name::<T>()),
            )
        })
    }
}

/// Iterator over freshly populated instances of one type.
pub struct PopulateMany<'a> {
    populator: &'a mut Populator,
    type_name: String,
    remaining: usize,
}

impl Iterator for PopulateMany<'_> {
    type Item = Result<Value, FixtureError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.populator.populate(&self.type_name))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for PopulateMany<'_> {}

/// Read-only part of a populator, shared by every call.
struct Engine {
    schema: TypeSchema,
    parameters: Parameters,
    chain: RegistryChain,
    resolver: Box<dyn ConcreteTypeResolver>,
}

impl Engine {
    /// Generate a value of a bare type: a top-level target or a container element.
    fn generate_value(
        &self,
        ty: &DeclaredType,
        ctx: &mut PopulationContext<'_>,
    ) -> Result<Value, FixtureError> {
        if let DeclaredType::Named(name) = ty {
            return self.generate_object(name, ctx, false);
        }
        match self.chain.resolve_type(ty, &self.schema) {
            Resolution::Excluded => Ok(Value::zero(ty)),
            Resolution::Found { randomizer, source } => {
                trace!("Generating {ty} with a {source:?} randomizer");
                self.apply(&randomizer, ty, None, ctx)
            }
            Resolution::NotFound => self.generate_structure(ty, ctx),
        }
    }

    /// Build a value from the shape of its type.
    fn generate_structure(
        &self,
        ty: &DeclaredType,
        ctx: &mut PopulationContext<'_>,
    ) -> Result<Value, FixtureError> {
        match ty {
            DeclaredType::List { element } => Ok(Value::List(self.generate_elements(element, ctx)?)),
            DeclaredType::Array { element } => {
                Ok(Value::Array(self.generate_elements(element, ctx)?))
            }
            DeclaredType::Set { element } => Ok(Value::Set(self.generate_unique(element, ctx)?)),
            DeclaredType::Map { key, value } => self.generate_map(key, value, ctx),
            DeclaredType::Named(name) => self.generate_object(name, ctx, false),
            other => Err(FixtureError::generation(
                other.to_string(),
                "no randomizer available for this type",
            )),
        }
    }

    fn collection_size(&self, ctx: &mut PopulationContext<'_>) -> usize {
        let min = self.parameters.min_collection_size;
        let max = self.parameters.max_collection_size;
        if min >= max {
            return min;
        }
        ctx.rng().random_range(min..=max)
    }

    fn generate_elements(
        &self,
        element: &DeclaredType,
        ctx: &mut PopulationContext<'_>,
    ) -> Result<Vec<Value>, FixtureError> {
        let size = self.collection_size(ctx);
        (0..size)
            .map(|_| self.generate_value(element, ctx))
            .collect()
    }

    /// Draw distinct elements; a small element domain yields a smaller set.
    fn generate_unique(
        &self,
        element: &DeclaredType,
        ctx: &mut PopulationContext<'_>,
    ) -> Result<Vec<Value>, FixtureError> {
        let size = self.collection_size(ctx);
        let mut items: Vec<Value> = Vec::with_capacity(size);
        let mut attempts = 0;
        while items.len() < size && attempts < size * UNIQUE_ATTEMPTS_PER_ELEMENT {
            attempts += 1;
            let item = self.generate_value(element, ctx)?;
            if !items.contains(&item) {
                items.push(item);
            }
        }
        if items.len() < size {
            warn!(
                "Generated {} distinct {element} values at {} instead of {size}",
                items.len(),
                ctx.current_path()
            );
        }
        Ok(items)
    }

    fn generate_map(
        &self,
        key: &DeclaredType,
        value: &DeclaredType,
        ctx: &mut PopulationContext<'_>,
    ) -> Result<Value, FixtureError> {
        let keys = self.generate_unique(key, ctx)?;
        let mut entries = Vec::with_capacity(keys.len());
        for k in keys {
            let v = self.generate_value(value, ctx)?;
            entries.push((k, v));
        }
        Ok(Value::Map(entries))
    }

    /// Generate an instance of a schema type, or reuse a pooled one.
    fn generate_object(
        &self,
        name: &str,
        ctx: &mut PopulationContext<'_>,
        top_level: bool,
    ) -> Result<Value, FixtureError> {
        let ty = DeclaredType::named(name);
        match self.chain.resolve_type(&ty, &self.schema) {
            Resolution::Excluded => return Ok(Value::Null),
            Resolution::Found { randomizer, source } => {
                trace!("Generating {name} with a {source:?} randomizer");
                return self.apply(&randomizer, &ty, None, ctx);
            }
            Resolution::NotFound => {}
        }

        let definition = self
            .schema
            .get_type(name)
            .ok_or_else(|| FixtureError::generation(name, "type is not defined in the schema"))?;

        if definition.kind.is_abstract() {
            return match self.pick_concrete_type(name, ctx) {
                Some(concrete) => {
                    trace!("Using {concrete} for abstract type {name}");
                    self.generate_object(&concrete, ctx, top_level)
                }
                None if top_level => Err(FixtureError::generation(
                    name,
                    "abstract type has no concrete implementation to instantiate",
                )),
                None => Ok(Value::Null),
            };
        }

        if !top_level && ctx.pool_is_full(name) {
            if let Some(instance) = ctx.reuse_pooled(name) {
                return Ok(Value::Object(instance));
            }
        }

        let instance = self
            .schema
            .instantiate(name)
            .map_err(|e| FixtureError::generation(name, e.to_string()))?;
        let populated = self.populate_fields(instance, ctx)?;
        ctx.add_to_pool(&populated);
        Ok(Value::Object(populated))
    }

    /// Pick one concrete type for an abstract one, if scanning is enabled.
    fn pick_concrete_type(&self, name: &str, ctx: &mut PopulationContext<'_>) -> Option<String> {
        if !self.parameters.scan_for_concrete_types {
            return None;
        }
        let candidates: Vec<String> = self
            .resolver
            .find_concrete_types_of(name, &self.schema)
            .into_iter()
            .filter(|candidate| {
                self.schema
                    .get_type(candidate)
                    .is_some_and(|def| !def.kind.is_abstract())
                    && self.schema.is_subtype(candidate, name)
            })
            .collect();
        if candidates.is_empty() {
            return None;
        }
        let idx = ctx.rng().random_range(0..candidates.len());
        candidates.into_iter().nth(idx)
    }

    /// Populate every non-static field of an instance, in declaration order.
    fn populate_fields(
        &self,
        mut instance: ObjectValue,
        ctx: &mut PopulationContext<'_>,
    ) -> Result<ObjectValue, FixtureError> {
        let fields = self
            .schema
            .all_fields(&instance.type_name)
            .map_err(|e| FixtureError::generation(&instance.type_name, e.to_string()))?;

        for field in fields {
            let definition = field.definition;
            if definition.is_static {
                continue;
            }
            ctx.enter_field(&definition.name);
            let result = self.populate_field(&mut instance, definition, ctx);
            ctx.leave_field();
            result?;
        }
        Ok(instance)
    }

    fn populate_field(
        &self,
        instance: &mut ObjectValue,
        definition: &FieldDefinition,
        ctx: &mut PopulationContext<'_>,
    ) -> Result<(), FixtureError> {
        if ctx.depth() > self.parameters.max_randomization_depth {
            trace!("Depth limit reached at {}", ctx.current_path());
            return Ok(());
        }
        if ctx.is_current_path_excluded() {
            trace!("Skipping excluded path {}", ctx.current_path());
            return Ok(());
        }

        let descriptor = FieldDescriptor::for_field(instance.type_name.clone(), definition);
        let ty = &definition.field_type;

        let value = match self.chain.resolve_field(&descriptor, &self.schema) {
            Resolution::Excluded => {
                trace!("Skipping excluded field {descriptor}");
                return Ok(());
            }
            Resolution::Found { randomizer, source } if source != RegistrySource::Builtin => {
                trace!("Populating {descriptor} with a {source:?} randomizer");
                self.apply(&randomizer, ty, Some(&descriptor), ctx)?
            }
            resolution => {
                if !self.parameters.override_default_initialization
                    && instance
                        .get(&definition.name)
                        .is_some_and(|current| !current.is_default_for(ty))
                {
                    trace!("Keeping initialized value of {descriptor}");
                    return Ok(());
                }
                match resolution {
                    Resolution::Found { randomizer, .. } => {
                        self.apply(&randomizer, ty, Some(&descriptor), ctx)?
                    }
                    _ => self.generate_structure(ty, ctx)?,
                }
            }
        };

        instance.set(definition.name.clone(), value);
        Ok(())
    }

    /// Run a randomizer and check its value fits the declared type.
    fn apply(
        &self,
        randomizer: &Arc<dyn Randomizer>,
        ty: &DeclaredType,
        field: Option<&FieldDescriptor>,
        ctx: &mut PopulationContext<'_>,
    ) -> Result<Value, FixtureError> {
        let depth = ctx.depth();
        let mut randomizer_ctx = RandomizerContext {
            rng: ctx.rng(),
            parameters: &self.parameters,
            depth,
            field,
        };
        let value = randomizer.randomize(&mut randomizer_ctx);
        if value.conforms_to(ty, &self.schema) {
            return Ok(value);
        }

        let reason = format!(
            "randomizer produced a {} value where {ty} was expected",
            value.type_label()
        );
        Err(match field {
            Some(descriptor) => FixtureError::ObjectGeneration {
                type_name: descriptor.owning_type.clone().unwrap_or_else(|| ty.to_string()),
                field: descriptor.name.clone(),
                reason,
            },
            None => FixtureError::generation(ty.to_string(), reason),
        })
    }
}

/// Fluent configuration of a [`Populator`].
pub struct PopulatorBuilder {
    schema: TypeSchema,
    parameters: Parameters,
    custom: CustomRegistry,
    exclusions: ExclusionRegistry,
    registries: Vec<Box<dyn RandomizerRegistry>>,
    discovery: Option<RegistryDiscovery>,
    resolver: Option<Box<dyn ConcreteTypeResolver>>,
}

impl PopulatorBuilder {
    pub fn new(schema: TypeSchema) -> Self {
        Self {
            schema,
            parameters: Parameters::default(),
            custom: CustomRegistry::new(),
            exclusions: ExclusionRegistry::new(),
            registries: Vec::new(),
            discovery: None,
            resolver: None,
        }
    }

    /// Replace every parameter at once.
    pub fn parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.parameters.seed = Some(seed);
        self
    }

    pub fn min_collection_size(mut self, size: usize) -> Self {
        self.parameters.min_collection_size = size;
        self
    }

    pub fn max_collection_size(mut self, size: usize) -> Self {
        self.parameters.max_collection_size = size;
        self
    }

    /// Set both collection size bounds.
    pub fn collection_size_range(self, min: usize, max: usize) -> Self {
        self.min_collection_size(min).max_collection_size(max)
    }

    pub fn min_string_length(mut self, length: usize) -> Self {
        self.parameters.min_string_length = length;
        self
    }

    pub fn max_string_length(mut self, length: usize) -> Self {
        self.parameters.max_string_length = length;
        self
    }

    /// Set both string length bounds.
    pub fn string_length_range(self, min: usize, max: usize) -> Self {
        self.min_string_length(min).max_string_length(max)
    }

    pub fn max_object_pool_size(mut self, size: usize) -> Self {
        self.parameters.max_object_pool_size = size;
        self
    }

    pub fn max_randomization_depth(mut self, depth: usize) -> Self {
        self.parameters.max_randomization_depth = depth;
        self
    }

    pub fn charset(mut self, charset: Charset) -> Self {
        self.parameters.charset = charset;
        self
    }

    pub fn date_range(mut self, min: NaiveDate, max: NaiveDate) -> Self {
        self.parameters.date_range = Some(DateRange::new(min, max));
        self
    }

    pub fn time_range(mut self, min: NaiveTime, max: NaiveTime) -> Self {
        self.parameters.time_range = Some(TimeRange::new(min, max));
        self
    }

    pub fn scan_for_concrete_types(mut self, scan: bool) -> Self {
        self.parameters.scan_for_concrete_types = scan;
        self
    }

    pub fn override_default_initialization(mut self, override_defaults: bool) -> Self {
        self.parameters.override_default_initialization = override_defaults;
        self
    }

    /// Use `randomizer` for the fields covered by `descriptor`.
    ///
    /// Fails with `AmbiguousFieldDefinition` if the descriptor has no
    /// declared type.
    pub fn randomize<R: Randomizer + 'static>(
        mut self,
        descriptor: FieldDescriptor,
        randomizer: R,
    ) -> Result<Self, FixtureError> {
        self.custom.register(descriptor, Arc::new(randomizer))?;
        Ok(self)
    }

    /// Use `randomizer` for every value of `ty`.
    pub fn randomize_type<R: Randomizer + 'static>(mut self, ty: DeclaredType, randomizer: R) -> Self {
        self.custom.register_type(ty, Arc::new(randomizer));
        self
    }

    /// Never populate the fields covered by `descriptor`.
    pub fn exclude(mut self, descriptor: FieldDescriptor) -> Result<Self, FixtureError> {
        self.exclusions.exclude(descriptor)?;
        Ok(self)
    }

    /// Never populate values of `ty` (or its subtypes).
    pub fn exclude_type(mut self, ty: DeclaredType) -> Self {
        self.exclusions.exclude_type(ty);
        self
    }

    pub fn exclude_types(mut self, types: impl IntoIterator<Item = DeclaredType>) -> Self {
        for ty in types {
            self.exclusions.exclude_type(ty);
        }
        self
    }

    /// Add a registry consulted after the builder's own randomizers.
    pub fn register_registry<R: RandomizerRegistry + 'static>(mut self, registry: R) -> Self {
        self.registries.push(Box::new(registry));
        self
    }

    /// Add the registries of a discovery table, consulted after registered ones.
    pub fn with_discovery(mut self, discovery: RegistryDiscovery) -> Self {
        self.discovery = Some(discovery);
        self
    }

    /// Replace the resolver used to pick concrete types for abstract ones.
    pub fn with_type_resolver<R: ConcreteTypeResolver + 'static>(mut self, resolver: R) -> Self {
        self.resolver = Some(Box::new(resolver));
        self
    }

    /// Validate the configuration and build the populator.
    pub fn build(self) -> Result<Populator, FixtureError> {
        self.schema.validate()?;
        self.parameters.validate()?;
        for descriptor in self
            .custom
            .field_descriptors()
            .chain(self.exclusions.descriptors())
        {
            check_descriptor(descriptor, &self.schema)?;
        }

        let seed = self.parameters.seed.unwrap_or_else(time_based_seed);
        let mut parameters = self.parameters;
        parameters.seed = Some(seed);

        let discovered = self
            .discovery
            .map(|discovery| discovery.discover())
            .unwrap_or_default();
        let custom_count = self.custom.len();
        let exclusion_count = self.exclusions.len();
        let chain = RegistryChain::new(
            &parameters,
            self.exclusions,
            self.custom,
            self.registries,
            discovered,
        );

        debug!(
            "Built populator with seed {seed}, {custom_count} custom randomizers, {exclusion_count} exclusions, registries {:?}",
            chain.registry_names()
        );

        Ok(Populator {
            engine: Engine {
                schema: self.schema,
                parameters,
                chain,
                resolver: self
                    .resolver
                    .unwrap_or_else(|| Box::new(SchemaScanResolver)),
            },
            rng: StdRng::seed_from_u64(seed),
            seed,
        })
    }
}

/// Reject descriptors naming types the schema does not define.
fn check_descriptor(descriptor: &FieldDescriptor, schema: &TypeSchema) -> Result<(), FixtureError> {
    let mut referenced: Vec<&str> = descriptor.owning_type.iter().map(String::as_str).collect();
    if let Some(ty) = &descriptor.declared_type {
        referenced.extend(ty.referenced_names());
    }
    for name in referenced {
        if schema.get_type(name).is_none() {
            return Err(FixtureError::Configuration(format!(
                "{descriptor} refers to unknown type '{name}'"
            )));
        }
    }
    Ok(())
}

fn time_based_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::randomizer::{constant, randomizer_fn};
    use fixture_core::field;

    fn schema() -> TypeSchema {
        TypeSchema::from_yaml(
            r#"
types:
  - name: Address
    fields:
      - name: street
        type: string
      - name: zip
        type: uint32
  - name: Person
    fields:
      - name: id
        type: int64
      - name: name
        type: string
      - name: country
        type: string
        default: FR
      - name: address
        type: Address
      - name: tags
        type:
          type: set
          element: string
      - name: scores
        type:
          type: map
          key: string
          value: float64
      - name: COUNT
        type: int32
        static: true
"#,
        )
        .unwrap()
    }

    fn populator(builder: PopulatorBuilder) -> Populator {
        builder.seed(42).build().unwrap()
    }

    #[test]
    fn test_populates_every_field() {
        let mut populator = populator(Populator::builder(schema()));
        let person = populator.populate("Person").unwrap();
        let person = person.as_object().unwrap();

        assert!(matches!(person.get("id"), Some(Value::Int64(_))));
        assert!(!person.get("name").unwrap().as_str().unwrap().is_empty());
        let address = person.get("address").unwrap().as_object().unwrap();
        assert_eq!(address.type_name, "Address");
        assert!(!address.get("street").unwrap().is_default_for(&DeclaredType::String));
        let tags = person.get("tags").unwrap().as_elements().unwrap();
        assert!((1..=5).contains(&tags.len()));
        assert!(matches!(person.get("scores"), Some(Value::Map(entries)) if !entries.is_empty()));
        // static fields keep their constructor value
        assert_eq!(person.get("COUNT"), Some(&Value::Int32(0)));
    }

    #[test]
    fn test_keeps_constructor_values() {
        let mut populator = populator(Populator::builder(schema()));
        let person = populator.populate("Person").unwrap();
        assert_eq!(person.get_field("country"), Some(&Value::from("FR")));

        let mut populator = populator_with_override();
        let person = populator.populate("Person").unwrap();
        assert_ne!(person.get_field("country"), Some(&Value::from("FR")));
    }

    fn populator_with_override() -> Populator {
        populator(
            Populator::builder(schema())
                .override_default_initialization(true)
                .string_length_range(5, 10),
        )
    }

    #[test]
    fn test_custom_randomizer_beats_constructor_value() {
        let mut populator = populator(
            Populator::builder(schema())
                .randomize(
                    field().named("country").of_type(DeclaredType::String),
                    constant("DE"),
                )
                .unwrap(),
        );
        let person = populator.populate("Person").unwrap();
        assert_eq!(person.get_field("country"), Some(&Value::from("DE")));
    }

    #[test]
    fn test_non_conforming_randomizer_fails() {
        let mut populator = populator(
            Populator::builder(schema())
                .randomize(field().named("id").of_type(DeclaredType::Int64), constant("x"))
                .unwrap(),
        );
        let err = populator.populate("Person").unwrap_err();
        match err {
            FixtureError::ObjectGeneration { type_name, field, .. } => {
                assert_eq!(type_name, "Person");
                assert_eq!(field.as_deref(), Some("id"));
            }
            other => panic!("Expected ObjectGeneration, got {other:?}"),
        }
    }

    #[test]
    fn test_randomizer_sees_depth() {
        let mut populator = populator(
            Populator::builder(schema())
                .randomize(
                    field().named("zip").of_type(DeclaredType::UInt32),
                    randomizer_fn(|ctx| Value::UInt32(ctx.depth as u32)),
                )
                .unwrap(),
        );
        let person = populator.populate("Person").unwrap();
        let zip = person
            .get_field("address")
            .and_then(|a| a.get_field("zip"))
            .cloned();
        assert_eq!(zip, Some(Value::UInt32(2)));
    }

    #[test]
    fn test_excluded_path() {
        let mut populator = populator(Populator::builder(schema()));
        let options = PopulateOptions::new().exclude_path("address.street");
        let person = populator.populate_with("Person", &options).unwrap();
        let address = person.get_field("address").unwrap();
        assert_eq!(address.get_field("street"), Some(&Value::from("")));
        assert_ne!(address.get_field("zip"), None);
    }

    #[test]
    fn test_populate_instance() {
        let mut populator = populator(Populator::builder(schema()));
        let existing = ObjectValue::new("Person").with_field("name", "Bob");
        let person = populator.populate_instance(existing).unwrap();
        assert_eq!(person.get("name"), Some(&Value::from("Bob")));
        assert!(matches!(person.get("address"), Some(Value::Object(_))));

        let unknown = ObjectValue::new("Person").with_field("nope", 1i32);
        assert!(populator.populate_instance(unknown).is_err());
        assert!(populator
            .populate_instance(ObjectValue::new("Missing"))
            .is_err());
    }

    #[test]
    fn test_populate_type_containers() {
        let mut populator = populator(Populator::builder(schema()).collection_size_range(3, 3));
        let list = populator
            .populate_type(&DeclaredType::list(DeclaredType::named("Address")))
            .unwrap();
        assert_eq!(list.as_elements().map(<[Value]>::len), Some(3));

        let number = populator.populate_type(&DeclaredType::UInt8).unwrap();
        assert!(matches!(number, Value::UInt8(_)));
    }

    #[test]
    fn test_small_set_domain() {
        let mut populator = populator(Populator::builder(schema()).collection_size_range(5, 5));
        let set = populator
            .populate_type(&DeclaredType::set(DeclaredType::Bool))
            .unwrap();
        let items = set.as_elements().unwrap();
        assert!(!items.is_empty() && items.len() <= 2);
    }

    #[test]
    fn test_populate_many() {
        let mut populator = populator(Populator::builder(schema()));
        let people: Vec<Value> = populator
            .populate_many("Person", 3)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(people.len(), 3);
        assert_ne!(people[0], people[1]);
    }

    #[test]
    fn test_build_validation() {
        let result = Populator::builder(schema())
            .collection_size_range(4, 2)
            .build();
        assert!(matches!(result, Err(FixtureError::Configuration(_))));

        let result = Populator::builder(schema())
            .exclude(field().in_type("Ghost"))
            .unwrap()
            .build();
        assert!(matches!(result, Err(FixtureError::Configuration(_))));

        let result = Populator::builder(schema()).randomize(field().named("id"), constant(1i64));
        assert!(matches!(
            result,
            Err(FixtureError::AmbiguousFieldDefinition(_))
        ));
    }

    #[test]
    fn test_seed_is_reported() {
        let populator = Populator::with_defaults(schema()).unwrap();
        assert_eq!(populator.parameters().seed, Some(populator.seed()));

        let populator = populator_with_override();
        assert_eq!(populator.seed(), 42);
    }

    #[test]
    fn test_unknown_type() {
        let mut populator = populator(Populator::builder(schema()));
        let err = populator.populate("Ghost").unwrap_err();
        assert!(matches!(err, FixtureError::ObjectGeneration { .. }));
    }
}
