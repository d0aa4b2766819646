//! Built-in value producers as a registry.

use super::RandomizerRegistry;
use crate::parameters::{DateRange, Parameters, TimeRange};
use crate::producers::{enumeration, numeric, temporal, text, uuid};
use crate::randomizer::{Randomizer, RandomizerContext};
use fixture_core::{DeclaredType, TypeSchema, Value};
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;

/// Types with a built-in producer, apart from enumerations.
const PRODUCED_TYPES: [DeclaredType; 19] = [
    DeclaredType::Bool,
    DeclaredType::Char,
    DeclaredType::Int8,
    DeclaredType::Int16,
    DeclaredType::Int32,
    DeclaredType::Int64,
    DeclaredType::UInt8,
    DeclaredType::UInt16,
    DeclaredType::UInt32,
    DeclaredType::UInt64,
    DeclaredType::Float32,
    DeclaredType::Float64,
    DeclaredType::String,
    DeclaredType::Bytes,
    DeclaredType::Uuid,
    DeclaredType::Date,
    DeclaredType::Time,
    DeclaredType::DateTime,
    DeclaredType::Duration,
];

/// Settings derived from the parameters when the registry is initialized.
#[derive(Debug)]
struct ProducerSettings {
    alphabet: Vec<char>,
    min_string_length: usize,
    max_string_length: usize,
    dates: DateRange,
    times: TimeRange,
}

impl ProducerSettings {
    fn from_parameters(parameters: &Parameters) -> Self {
        Self {
            alphabet: parameters.charset.characters(),
            min_string_length: parameters.min_string_length,
            max_string_length: parameters.max_string_length,
            dates: parameters.effective_date_range(),
            times: parameters.effective_time_range(),
        }
    }
}

/// Randomizer delegating to the built-in producer of one type.
struct ProducerRandomizer {
    ty: DeclaredType,
    settings: Arc<ProducerSettings>,
}

impl Randomizer for ProducerRandomizer {
    fn randomize(&self, ctx: &mut RandomizerContext<'_>) -> Value {
        let rng = &mut *ctx.rng;
        let settings = &self.settings;
        match &self.ty {
            DeclaredType::Bool => Value::Bool(rng.random()),
            DeclaredType::Char => text::generate_char(rng, &settings.alphabet)
                .map(Value::Char)
                .unwrap_or(Value::Null),
            DeclaredType::String => Value::String(text::generate_string(
                rng,
                &settings.alphabet,
                settings.min_string_length,
                settings.max_string_length,
            )),
            DeclaredType::Bytes => Value::Bytes(text::generate_bytes(
                rng,
                settings.min_string_length,
                settings.max_string_length,
            )),
            DeclaredType::Uuid => uuid::generate_uuid_v4(rng),
            DeclaredType::Date => Value::Date(temporal::generate_date(rng, &settings.dates)),
            DeclaredType::Time => Value::Time(temporal::generate_time(rng, &settings.times)),
            DeclaredType::DateTime => Value::DateTime(temporal::generate_date_time(
                rng,
                &settings.dates,
                &settings.times,
            )),
            DeclaredType::Duration => Value::Duration(temporal::generate_duration(rng)),
            DeclaredType::Enum { values } => enumeration::generate_enum(rng, values),
            other => numeric::generate_number(rng, other).unwrap_or(Value::Null),
        }
    }
}

/// Lowest-precedence registry: a producer for every primitive and
/// well-known value type.
///
/// Containers and schema types have no producer here; the populator builds
/// them structurally.
pub struct DefaultRegistry {
    settings: Arc<ProducerSettings>,
    producers: HashMap<DeclaredType, Arc<dyn Randomizer>>,
}

impl DefaultRegistry {
    pub fn new(parameters: &Parameters) -> Self {
        let mut registry = Self {
            settings: Arc::new(ProducerSettings::from_parameters(parameters)),
            producers: HashMap::new(),
        };
        registry.init(parameters);
        registry
    }

    fn producer(&self, ty: DeclaredType) -> Arc<dyn Randomizer> {
        Arc::new(ProducerRandomizer {
            ty,
            settings: Arc::clone(&self.settings),
        })
    }
}

impl RandomizerRegistry for DefaultRegistry {
    fn init(&mut self, parameters: &Parameters) {
        self.settings = Arc::new(ProducerSettings::from_parameters(parameters));
        self.producers = PRODUCED_TYPES
            .iter()
            .map(|ty| (ty.clone(), self.producer(ty.clone())))
            .collect();
    }

    fn get_type_randomizer(
        &self,
        ty: &DeclaredType,
        _schema: &TypeSchema,
    ) -> Option<Arc<dyn Randomizer>> {
        match ty {
            DeclaredType::Enum { .. } => Some(self.producer(ty.clone())),
            _ => self.producers.get(ty).cloned(),
        }
    }
}
