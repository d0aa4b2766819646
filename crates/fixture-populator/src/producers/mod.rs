//! Built-in value producers.
//!
//! Leaf generators for primitive and well-known value types. Each one draws
//! exclusively from the random source it is given, so a seeded source yields
//! the same values on every run.

pub mod array;
pub mod enumeration;
pub mod numeric;
pub mod pattern;
pub mod temporal;
pub mod text;
pub mod uuid;
