//! Strategies declared in configuration files.
//!
//! A `StrategyConfig` is checked against the declared type it will be
//! attached to when it is turned into a randomizer, so that a populator
//! never meets a strategy it cannot apply.
//!
//! ```yaml
//! randomize:
//!   - field: email
//!     type: string
//!     strategy:
//!       type: pattern
//!       pattern: "user_{rand:6}@example.com"
//!   - owner: Order
//!     field: status
//!     type: string
//!     strategy:
//!       type: one_of
//!       values: [pending, shipped, delivered]
//! ```

use crate::error::FixtureError;
use crate::producers::{array, numeric, pattern, temporal, uuid};
use crate::randomizer::{Randomizer, RandomizerContext};
use chrono::{DateTime, NaiveDate, Utc};
use fixture_core::literal::parse_timestamp;
use fixture_core::{value_from_literal, DeclaredType, Value};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Value generation strategy configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StrategyConfig {
    /// Generate UUIDs (v4)
    UuidV4,

    /// Generate strings using a pattern with placeholders
    Pattern {
        /// Pattern string (supports {uuid} and {rand:N})
        pattern: String,
    },

    /// Generate random integers in a range
    IntRange {
        /// Minimum value (inclusive)
        min: i64,
        /// Maximum value (inclusive)
        max: i64,
    },

    /// Generate random floats in a range
    FloatRange {
        /// Minimum value (inclusive)
        min: f64,
        /// Maximum value (inclusive)
        max: f64,
    },

    /// Generate timestamps in a range
    TimestampRange {
        /// Start timestamp (ISO 8601)
        start: String,
        /// End timestamp (ISO 8601)
        end: String,
    },

    /// Generate dates in a range
    DateRange {
        /// First date (YYYY-MM-DD)
        start: String,
        /// Last date (YYYY-MM-DD)
        end: String,
    },

    /// Generate weighted boolean values
    WeightedBool {
        /// Weight for true value (0.0 to 1.0)
        true_weight: f64,
    },

    /// Generate random selection from a pool of values
    OneOf {
        /// Pool of values to select from
        values: Vec<serde_yaml::Value>,
    },

    /// Generate containers by sampling from a pool
    SampleArray {
        /// Pool of values to sample from
        pool: Vec<serde_yaml::Value>,
        /// Minimum container length
        #[serde(default)]
        min_length: usize,
        /// Maximum container length
        max_length: usize,
    },

    /// Static value
    Static {
        /// The value to use
        value: serde_yaml::Value,
    },

    /// Null value
    Null,
}

impl StrategyConfig {
    /// Short name of the strategy, as written in YAML.
    pub fn name(&self) -> &'static str {
        match self {
            Self::UuidV4 => "uuid_v4",
            Self::Pattern { .. } => "pattern",
            Self::IntRange { .. } => "int_range",
            Self::FloatRange { .. } => "float_range",
            Self::TimestampRange { .. } => "timestamp_range",
            Self::DateRange { .. } => "date_range",
            Self::WeightedBool { .. } => "weighted_bool",
            Self::OneOf { .. } => "one_of",
            Self::SampleArray { .. } => "sample_array",
            Self::Static { .. } => "static",
            Self::Null => "null",
        }
    }

    /// Build a randomizer producing values of `target`.
    pub fn into_randomizer(self, target: &DeclaredType) -> Result<StrategyRandomizer, FixtureError> {
        let invalid = |reason: String| {
            FixtureError::Configuration(format!(
                "{} strategy cannot produce {target}: {reason}",
                self.name()
            ))
        };
        let literal = |literal: &serde_yaml::Value, ty: &DeclaredType| {
            value_from_literal(literal, ty).map_err(|e| invalid(e.to_string()))
        };

        let kind = match &self {
            Self::UuidV4 => match target {
                DeclaredType::Uuid => StrategyKind::Uuid { as_string: false },
                DeclaredType::String => StrategyKind::Uuid { as_string: true },
                _ => return Err(invalid("expected a uuid or string field".to_string())),
            },
            Self::Pattern { pattern } => {
                if *target != DeclaredType::String {
                    return Err(invalid("expected a string field".to_string()));
                }
                pattern::check_pattern(pattern).map_err(invalid)?;
                StrategyKind::Pattern(pattern.clone())
            }
            Self::IntRange { min, max } => {
                if min > max {
                    return Err(invalid(format!("min {min} is greater than max {max}")));
                }
                if numeric::integer_value(*min, target).is_none()
                    || numeric::integer_value(*max, target).is_none()
                {
                    return Err(invalid("range does not fit the field type".to_string()));
                }
                StrategyKind::IntRange {
                    min: *min,
                    max: *max,
                }
            }
            Self::FloatRange { min, max } => {
                if !target.is_float() {
                    return Err(invalid("expected a float field".to_string()));
                }
                if !(min.is_finite() && max.is_finite()) || min > max {
                    return Err(invalid(format!("invalid range {min}..={max}")));
                }
                if !(max - min).is_finite() {
                    return Err(invalid(format!(
                        "range {min}..={max} is too wide to sample"
                    )));
                }
                StrategyKind::FloatRange {
                    min: *min,
                    max: *max,
                }
            }
            Self::TimestampRange { start, end } => {
                if *target != DeclaredType::DateTime {
                    return Err(invalid("expected a date_time field".to_string()));
                }
                let start = parse_timestamp(start)
                    .ok_or_else(|| invalid(format!("invalid start timestamp '{start}'")))?;
                let end = parse_timestamp(end)
                    .ok_or_else(|| invalid(format!("invalid end timestamp '{end}'")))?;
                StrategyKind::TimestampRange { start, end }
            }
            Self::DateRange { start, end } => {
                if *target != DeclaredType::Date {
                    return Err(invalid("expected a date field".to_string()));
                }
                let parse = |s: &str| {
                    NaiveDate::parse_from_str(s, "%Y-%m-%d")
                        .map_err(|_| invalid(format!("invalid date '{s}'")))
                };
                StrategyKind::DateRange {
                    range: crate::parameters::DateRange::new(parse(start)?, parse(end)?),
                }
            }
            Self::WeightedBool { true_weight } => {
                if *target != DeclaredType::Bool {
                    return Err(invalid("expected a bool field".to_string()));
                }
                if !(0.0..=1.0).contains(true_weight) {
                    return Err(invalid(format!(
                        "true_weight {true_weight} is not between 0 and 1"
                    )));
                }
                StrategyKind::WeightedBool(*true_weight)
            }
            Self::OneOf { values } => StrategyKind::OneOf(
                values
                    .iter()
                    .map(|v| literal(v, target))
                    .collect::<Result<_, _>>()?,
            ),
            Self::SampleArray {
                pool,
                min_length,
                max_length,
            } => {
                let element = match target {
                    DeclaredType::List { element }
                    | DeclaredType::Set { element }
                    | DeclaredType::Array { element } => element.as_ref(),
                    _ => return Err(invalid("expected a list, set or array field".to_string())),
                };
                if min_length > max_length {
                    return Err(invalid(format!(
                        "min_length {min_length} is greater than max_length {max_length}"
                    )));
                }
                StrategyKind::SampleArray {
                    pool: pool
                        .iter()
                        .map(|v| literal(v, element))
                        .collect::<Result<_, _>>()?,
                    min_length: *min_length,
                    max_length: *max_length,
                }
            }
            Self::Static { value } => StrategyKind::Static(literal(value, target)?),
            Self::Null => StrategyKind::Static(Value::Null),
        };

        Ok(StrategyRandomizer {
            target: target.clone(),
            kind,
        })
    }
}

/// Checked form of a strategy, bound to its target type.
#[derive(Debug, Clone)]
enum StrategyKind {
    Uuid { as_string: bool },
    Pattern(String),
    IntRange { min: i64, max: i64 },
    FloatRange { min: f64, max: f64 },
    TimestampRange { start: DateTime<Utc>, end: DateTime<Utc> },
    DateRange { range: crate::parameters::DateRange },
    WeightedBool(f64),
    OneOf(Vec<Value>),
    SampleArray {
        pool: Vec<Value>,
        min_length: usize,
        max_length: usize,
    },
    Static(Value),
}

/// Randomizer built from a `StrategyConfig`.
#[derive(Debug, Clone)]
pub struct StrategyRandomizer {
    target: DeclaredType,
    kind: StrategyKind,
}

impl StrategyRandomizer {
    /// Type of the values this randomizer produces.
    pub fn target(&self) -> &DeclaredType {
        &self.target
    }
}

impl Randomizer for StrategyRandomizer {
    fn randomize(&self, ctx: &mut RandomizerContext<'_>) -> Value {
        let rng = &mut *ctx.rng;
        match &self.kind {
            StrategyKind::Uuid { as_string: false } => uuid::generate_uuid_v4(rng),
            StrategyKind::Uuid { as_string: true } => {
                Value::String(uuid::random_uuid(rng).to_string())
            }
            StrategyKind::Pattern(p) => Value::String(pattern::generate_pattern(p, rng)),
            StrategyKind::IntRange { min, max } => {
                let i = numeric::generate_int_range(rng, *min, *max);
                numeric::integer_value(i, &self.target).unwrap_or(Value::Null)
            }
            StrategyKind::FloatRange { min, max } => {
                let f = numeric::generate_float_range(rng, *min, *max);
                numeric::float_value(f, &self.target).unwrap_or(Value::Null)
            }
            StrategyKind::TimestampRange { start, end } => {
                Value::DateTime(temporal::generate_timestamp_between(rng, *start, *end))
            }
            StrategyKind::DateRange { range } => Value::Date(temporal::generate_date(rng, range)),
            StrategyKind::WeightedBool(weight) => Value::Bool(rng.random_bool(*weight)),
            StrategyKind::OneOf(values) => array::generate_one_of(rng, values),
            StrategyKind::SampleArray {
                pool,
                min_length,
                max_length,
            } => {
                let items = array::generate_sample_array(rng, pool, *min_length, *max_length);
                match &self.target {
                    DeclaredType::Set { .. } => {
                        let mut unique: Vec<Value> = Vec::with_capacity(items.len());
                        for item in items {
                            if !unique.contains(&item) {
                                unique.push(item);
                            }
                        }
                        Value::Set(unique)
                    }
                    DeclaredType::Array { .. } => Value::Array(items),
                    _ => Value::List(items),
                }
            }
            StrategyKind::Static(value) => value.clone(),
        }
    }
}
