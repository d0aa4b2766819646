//! Field descriptors.
//!
//! A `FieldDescriptor` identifies "this field" when attaching custom
//! randomizers and exclusions, and describes the field currently being
//! populated when matching them. Every part is optional: a descriptor with
//! only a declared type is a type-only wildcard.
//!
//! ```
//! use fixture_core::{field, DeclaredType};
//!
//! // the "id" field of any type, when it is declared as int64
//! let id = field().named("id").of_type(DeclaredType::Int64);
//! // the "email" field of Person and its subtypes, whatever its type
//! let email = field().named("email").in_type("Person");
//! # let _ = (id, email);
//! ```

use crate::schema::{FieldDefinition, TypeSchema};
use crate::types::DeclaredType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Key identifying a field, or a set of fields sharing the same shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Type declaring the field
    #[serde(default, rename = "owner", skip_serializing_if = "Option::is_none")]
    pub owning_type: Option<String>,

    /// Field name
    #[serde(default, rename = "field", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Declared type of the field
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub declared_type: Option<DeclaredType>,

    /// Explicit generic arguments; when absent, container arguments are erased
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic_args: Option<Vec<DeclaredType>>,
}

/// Start building a field descriptor.
pub fn field() -> FieldDescriptor {
    FieldDescriptor::default()
}

impl FieldDescriptor {
    /// Type-only descriptor, used to randomize or exclude by type.
    pub fn of_type_only(declared_type: DeclaredType) -> Self {
        Self {
            declared_type: Some(declared_type),
            ..Self::default()
        }
    }

    /// Descriptor of a concrete field of `owner`, as met during population.
    pub fn for_field(owner: impl Into<String>, definition: &FieldDefinition) -> Self {
        let generic_args = definition.field_type.type_arguments();
        Self {
            owning_type: Some(owner.into()),
            name: Some(definition.name.clone()),
            generic_args: (!generic_args.is_empty())
                .then(|| generic_args.into_iter().cloned().collect()),
            declared_type: Some(definition.field_type.clone()),
        }
    }

    /// Restrict to fields with the given name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Restrict to fields whose type is assignable to `declared_type`.
    pub fn of_type(mut self, declared_type: DeclaredType) -> Self {
        self.declared_type = Some(declared_type);
        self
    }

    /// Restrict to fields of `owner` (and of its subtypes).
    pub fn in_type(mut self, owner: impl Into<String>) -> Self {
        self.owning_type = Some(owner.into());
        self
    }

    /// Require the given generic arguments.
    pub fn with_generic_args(mut self, args: Vec<DeclaredType>) -> Self {
        self.generic_args = Some(args);
        self
    }

    /// Check if only the declared type is set.
    pub fn is_type_only(&self) -> bool {
        self.owning_type.is_none() && self.name.is_none() && self.declared_type.is_some()
    }

    /// Check if nothing is set, so the descriptor would match every field.
    pub fn is_unconstrained(&self) -> bool {
        self.owning_type.is_none()
            && self.name.is_none()
            && self.declared_type.is_none()
            && self.generic_args.is_none()
    }

    /// Check if `candidate`, a field met during population, is covered by this descriptor.
    ///
    /// Each part that is set must agree: the owner must be the candidate's
    /// owner or one of its supertypes, the name must be equal, and the
    /// candidate's type must be assignable to the declared type.
    pub fn matches(&self, candidate: &FieldDescriptor, schema: &TypeSchema) -> bool {
        if let Some(owner) = &self.owning_type {
            match &candidate.owning_type {
                Some(candidate_owner) if schema.is_subtype(candidate_owner, owner) => {}
                _ => return false,
            }
        }

        if let Some(name) = &self.name {
            if candidate.name.as_ref() != Some(name) {
                return false;
            }
        }

        if let Some(declared) = &self.declared_type {
            match &candidate.declared_type {
                Some(candidate_type) if schema.is_assignable(declared, candidate_type) => {}
                _ => return false,
            }
        }

        if let Some(args) = &self.generic_args {
            let candidate_args: Vec<&DeclaredType> = candidate
                .declared_type
                .as_ref()
                .map(DeclaredType::type_arguments)
                .unwrap_or_default();
            if candidate_args.len() != args.len()
                || candidate_args.iter().zip(args).any(|(c, a)| *c != a)
            {
                return false;
            }
        }

        true
    }
}

impl fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let owner = self.owning_type.as_deref().unwrap_or("*");
        let name = self.name.as_deref().unwrap_or("*");
        write!(f, "{owner}.{name}")?;
        if let Some(ty) = &self.declared_type {
            write!(f, ": {ty}")?;
        }
        Ok(())
    }
}
