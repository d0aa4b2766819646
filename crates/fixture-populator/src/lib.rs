//! Random population engine for fixture-gen.
//!
//! This crate provides the `Populator`, which builds instances of the types
//! of a [`TypeSchema`](fixture_core::TypeSchema) and fills every field with a
//! random value. The random source is seeded, so the same seed and the same
//! configuration produce the same object graph on every run.
//!
//! # Architecture
//!
//! ```text
//! TypeSchema (YAML)     Parameters / FixtureConfig
//!        │                        │
//!        ▼                        ▼
//! ┌──────────────────────────────────────┐
//! │              Populator               │
//! │                                      │
//! │  - seed, rng (StdRng)                │
//! │  - RegistryChain                     │
//! │      exclusions → custom → user      │
//! │      → discovered → built-in         │
//! │  - ConcreteTypeResolver              │
//! └──────────────────┬───────────────────┘
//!                    │
//!                    ▼
//!      Value::Object { type_name, fields }
//! ```
//!
//! # Example
//!
//! ```rust
//! use fixture_core::{field, DeclaredType, TypeSchema, Value};
//! use fixture_populator::{randomizer_fn, Populator};
//! use rand::Rng;
//!
//! let schema = TypeSchema::from_yaml(r#"
//! types:
//!   - name: Node
//!     fields:
//!       - name: value
//!         type: int32
//!       - name: children
//!         type:
//!           type: list
//!           element: Node
//! "#).unwrap();
//!
//! let mut populator = Populator::builder(schema)
//!     .seed(42)
//!     .collection_size_range(2, 2)
//!     .max_randomization_depth(1)
//!     .randomize(
//!         field().named("value").of_type(DeclaredType::Int32),
//!         randomizer_fn(|ctx| Value::Int32(ctx.rng.random_range(0..10))),
//!     )
//!     .unwrap()
//!     .build()
//!     .unwrap();
//!
//! let node = populator.populate("Node").unwrap();
//! let children = node.get_field("children").and_then(Value::as_elements).unwrap();
//! assert_eq!(children.len(), 2);
//! ```
//!
//! # Strategies
//!
//! Configuration files attach strategies to fields:
//!
//! - `uuid_v4` - Random UUID v4 (uuid or string fields)
//! - `pattern` - Pattern strings with placeholders (`{uuid}`, `{rand:N}`)
//! - `int_range` - Random integers in a range
//! - `float_range` - Random floats in a range
//! - `timestamp_range` - Random timestamps in a range
//! - `date_range` - Random dates in a range
//! - `weighted_bool` - Boolean with configurable true probability
//! - `one_of` - Random selection from a list
//! - `sample_array` - Container of random samples from a pool
//! - `static` - Static value
//! - `null` - Null value

pub mod config;
pub mod context;
pub mod error;
pub mod parameters;
pub mod populator;
pub mod producers;
pub mod randomizer;
pub mod registry;
pub mod resolver;
pub mod strategy;

// Re-exports for convenience
pub use config::{ConfigError, FixtureConfig, RandomizeRule};
pub use context::PopulateOptions;
pub use error::FixtureError;
pub use parameters::{Charset, DateRange, Parameters, TimeRange};
pub use populator::{PopulateMany, Populator, PopulatorBuilder};
pub use randomizer::{constant, randomizer_fn, supplier, Randomizer, RandomizerContext};
pub use registry::{RandomizerRegistry, RegistryDiscovery, RegistrySource};
pub use resolver::{ConcreteTypeResolver, NoopTypeResolver, SchemaScanResolver, StaticTypeResolver};
pub use strategy::{StrategyConfig, StrategyRandomizer};
