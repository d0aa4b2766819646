//! Error types for the populator.

use fixture_core::SchemaError;
use thiserror::Error;

/// Errors that can occur while configuring or running a populator.
#[derive(Error, Debug)]
pub enum FixtureError {
    /// Invalid parameters or configuration, raised when the populator is built.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A randomizer or exclusion was registered without enough information
    /// to know which fields it applies to.
    #[error("Ambiguous field definition: {0}")]
    AmbiguousFieldDefinition(String),

    /// A type could not be instantiated or one of its fields could not be
    /// populated.
    #[error("Unable to generate {type_name}{}: {reason}", field_suffix(.field))]
    ObjectGeneration {
        type_name: String,
        field: Option<String>,
        reason: String,
    },

    /// The type schema handed to the builder is invalid.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
}

fn field_suffix(field: &Option<String>) -> String {
    field
        .as_deref()
        .map(|name| format!(".{name}"))
        .unwrap_or_default()
}

impl FixtureError {
    /// Generation failure for a whole type.
    pub fn generation(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ObjectGeneration {
            type_name: type_name.into(),
            field: None,
            reason: reason.into(),
        }
    }

    /// Generation failure for one field of a type.
    pub fn field_generation(
        type_name: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::ObjectGeneration {
            type_name: type_name.into(),
            field: Some(field.into()),
            reason: reason.into(),
        }
    }
}
