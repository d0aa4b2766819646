//! Core types for fixture-gen.
//!
//! This crate provides the type and value model the populator works on:
//!
//! - [`DeclaredType`] - Types a field can be declared with
//! - [`TypeSchema`] - Structured type definitions loaded from YAML
//! - [`FieldDescriptor`] - Keys used to customize or exclude fields
//! - [`Value`] - The generated object graph
//!
//! # Architecture
//!
//! ```text
//! fixture-core (this crate)
//!    │
//!    ├─── fixture-populator  (randomizers, registries, population engine)
//!    │
//!    └─── fixture-gen        (CLI)
//! ```
//!
//! # Example
//!
//! ```rust
//! use fixture_core::{DeclaredType, TypeSchema, Value};
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
//! let node = schema.instantiate("Node").unwrap();
//! assert_eq!(node.get("value"), Some(&Value::Int32(0)));
//! assert_eq!(
//!     schema.all_fields("Node").unwrap()[1].definition.field_type,
//!     DeclaredType::list(DeclaredType::named("Node"))
//! );
//! ```

pub mod field;
pub mod literal;
pub mod schema;
pub mod types;
pub mod values;

// Re-exports for convenience
pub use field::{field, FieldDescriptor};
pub use literal::{value_from_literal, LiteralError};
pub use schema::{
    FieldDefinition, InheritedField, SchemaError, TypeDefinition, TypeKind, TypeSchema,
};
pub use types::DeclaredType;
pub use values::{ObjectValue, Value};
