//! fixture-gen Library
//!
//! Generates randomly populated test fixtures from YAML type schemas.
//!
//! # Crates
//!
//! - `fixture_core` - Declared types, type schemas, field descriptors and values
//! - `fixture_populator` - Randomizers, registries and the population engine
//!
//! # CLI Usage
//!
//! ```bash
//! # Ten people as a JSON array, reproducible with seed 42
//! fixture-gen populate --schema schema.yaml --type Person --count 10 --seed 42
//!
//! # Strategies and exclusions from a config file, written as JSON lines
//! fixture-gen populate --schema schema.yaml --config fixtures.yaml \
//!   --type Order --count 1000 --format jsonl --output orders.jsonl
//!
//! # Check a schema and config without generating anything
//! fixture-gen validate --schema schema.yaml --config fixtures.yaml
//! ```

pub mod populate;

pub use populate::{
    load_builder, run_populate, run_validate, write_values, OutputFormat, PopulateArgs,
    PopulateMetrics,
};
