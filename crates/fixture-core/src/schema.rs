//! Type schema definitions for fixture-gen.
//!
//! A type schema is the explicit description of the structured types a
//! populator can build: their fields in declaration order, the values their
//! constructor assigns, and how they relate through `extends` and
//! `implements`.
//!
//! ```yaml
//! version: 1
//! types:
//!   - name: Entity
//!     kind: abstract
//!     fields:
//!       - name: id
//!         type: int64
//!   - name: Person
//!     extends: Entity
//!     fields:
//!       - name: name
//!         type: string
//!       - name: friends
//!         type:
//!           type: list
//!           element: Person
//!       - name: nickname
//!         type: string
//!         default: "anonymous"
//! ```

use crate::literal::value_from_literal;
use crate::types::DeclaredType;
use crate::values::{ObjectValue, Value};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

// ============================================================================
// Error Types
// ============================================================================

/// Error type for schema operations.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Error reading schema file
    #[error("Failed to read schema file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Type not found in schema
    #[error("Type not found: {0}")]
    UnknownType(String),

    /// A field references a type that is not defined
    #[error("Field '{field}' of type '{type_name}' references unknown type '{referenced}'")]
    UnknownReference {
        type_name: String,
        field: String,
        referenced: String,
    },

    /// A type extends or implements a type that is not defined
    #[error("Type '{type_name}' inherits from unknown type '{parent}'")]
    UnknownParent { type_name: String, parent: String },

    /// The extends/implements graph contains a cycle
    #[error("Inheritance cycle through type '{0}'")]
    InheritanceCycle(String),

    /// The same type name is defined twice
    #[error("Duplicate type: {0}")]
    DuplicateType(String),

    /// A field name appears twice in a type (including inherited fields)
    #[error("Duplicate field '{field}' in type '{type_name}'")]
    DuplicateField { type_name: String, field: String },

    /// A field default cannot be converted to the field type
    #[error("Invalid default for field '{field}' of type '{type_name}': {reason}")]
    InvalidDefault {
        type_name: String,
        field: String,
        reason: String,
    },
}

// ============================================================================
// Definitions
// ============================================================================

/// Kind of a structured type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// Concrete type that can be instantiated
    #[default]
    Struct,
    /// Abstract type with fields, not instantiable on its own
    Abstract,
    /// Interface, not instantiable on its own
    Interface,
}

impl TypeKind {
    /// Check if instances of this kind cannot be constructed directly.
    pub fn is_abstract(self) -> bool {
        matches!(self, Self::Abstract | Self::Interface)
    }
}

/// Field of a structured type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Field name
    pub name: String,

    /// Declared field type
    #[serde(rename = "type")]
    pub field_type: DeclaredType,

    /// Value assigned when the type is constructed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_yaml::Value>,

    /// Static fields belong to the type, not to instances, and are never populated
    #[serde(default, rename = "static", skip_serializing_if = "std::ops::Not::not")]
    pub is_static: bool,
}

impl FieldDefinition {
    /// Create a new field definition.
    pub fn new(name: impl Into<String>, field_type: DeclaredType) -> Self {
        Self {
            name: name.into(),
            field_type,
            default: None,
            is_static: false,
        }
    }

    /// Set the value assigned when the owning type is constructed.
    pub fn with_default(mut self, default: serde_yaml::Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Mark this field as static.
    pub fn static_field(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Value this field holds right after construction.
    pub fn initial_value(&self) -> Result<Value, crate::literal::LiteralError> {
        match &self.default {
            Some(literal) => value_from_literal(literal, &self.field_type),
            None => Ok(Value::zero(&self.field_type)),
        }
    }
}

/// Structured type definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDefinition {
    /// Type name
    pub name: String,

    /// Struct, abstract type or interface
    #[serde(default)]
    pub kind: TypeKind,

    /// Parent type whose fields are inherited
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    /// Interfaces implemented by this type
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implements: Vec<String>,

    /// Fields declared by this type, in declaration order
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

impl TypeDefinition {
    /// Create a new concrete type definition without fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Struct,
            extends: None,
            implements: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Set the kind of this type.
    pub fn with_kind(mut self, kind: TypeKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the parent type.
    pub fn extending(mut self, parent: impl Into<String>) -> Self {
        self.extends = Some(parent.into());
        self
    }

    /// Add an implemented interface.
    pub fn implementing(mut self, interface: impl Into<String>) -> Self {
        self.implements.push(interface.into());
        self
    }

    /// Add a field.
    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    /// Direct supertypes: the parent first, then implemented interfaces.
    pub fn supertypes(&self) -> impl Iterator<Item = &str> {
        self.extends
            .iter()
            .chain(self.implements.iter())
            .map(String::as_str)
    }
}

/// A field together with the type that declares it.
#[derive(Debug, Clone, Copy)]
pub struct InheritedField<'a> {
    /// Type whose definition lists this field
    pub declared_in: &'a str,
    /// The field definition
    pub definition: &'a FieldDefinition,
}

fn default_version() -> u32 {
    1
}

/// Collection of structured type definitions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeSchema {
    /// Schema format version
    #[serde(default = "default_version")]
    pub version: u32,

    /// Type definitions
    #[serde(default)]
    pub types: Vec<TypeDefinition>,

    /// Cached type lookup (not serialized)
    #[serde(skip)]
    type_map: HashMap<String, usize>,
}

impl TypeSchema {
    /// Create a schema from type definitions and validate it.
    pub fn new(types: Vec<TypeDefinition>) -> Result<Self, SchemaError> {
        let mut schema = Self {
            version: default_version(),
            types,
            type_map: HashMap::new(),
        };
        schema.build_type_map()?;
        schema.validate()?;
        Ok(schema)
    }

    /// Parse and validate a schema from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, SchemaError> {
        let mut schema: Self = serde_yaml::from_str(yaml)?;
        schema.build_type_map()?;
        schema.validate()?;
        Ok(schema)
    }

    /// Load and validate a schema from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Build the internal type lookup map.
    fn build_type_map(&mut self) -> Result<(), SchemaError> {
        self.type_map.clear();
        for (idx, ty) in self.types.iter().enumerate() {
            if self.type_map.insert(ty.name.clone(), idx).is_some() {
                return Err(SchemaError::DuplicateType(ty.name.clone()));
            }
        }
        Ok(())
    }

    /// Get a type definition by name.
    pub fn get_type(&self, name: &str) -> Option<&TypeDefinition> {
        self.type_map.get(name).and_then(|&idx| self.types.get(idx))
    }

    /// Get all type names in declaration order.
    pub fn type_names(&self) -> Vec<&str> {
        self.types.iter().map(|t| t.name.as_str()).collect()
    }

    /// Add a type definition and re-validate the schema.
    pub fn add_type(&mut self, ty: TypeDefinition) -> Result<(), SchemaError> {
        if self.type_map.contains_key(&ty.name) {
            return Err(SchemaError::DuplicateType(ty.name));
        }
        self.type_map.insert(ty.name.clone(), self.types.len());
        self.types.push(ty);
        if let Err(e) = self.validate() {
            if let Some(removed) = self.types.pop() {
                self.type_map.remove(&removed.name);
            }
            return Err(e);
        }
        Ok(())
    }

    /// Chain of parent types via `extends`, starting with the type itself.
    pub fn lineage(&self, name: &str) -> Result<Vec<&TypeDefinition>, SchemaError> {
        let mut lineage = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(name);
        while let Some(type_name) = current {
            if !seen.insert(type_name) {
                return Err(SchemaError::InheritanceCycle(type_name.to_string()));
            }
            let def = self
                .get_type(type_name)
                .ok_or_else(|| SchemaError::UnknownType(type_name.to_string()))?;
            lineage.push(def);
            current = def.extends.as_deref();
        }
        Ok(lineage)
    }

    /// All fields of a type, inherited fields first (most distant ancestor first).
    pub fn all_fields(&self, name: &str) -> Result<Vec<InheritedField<'_>>, SchemaError> {
        let lineage = self.lineage(name)?;
        Ok(lineage
            .into_iter()
            .rev()
            .flat_map(|def| {
                def.fields.iter().map(move |field| InheritedField {
                    declared_in: def.name.as_str(),
                    definition: field,
                })
            })
            .collect())
    }

    /// Check if `sub` is `sup` or transitively extends or implements it.
    pub fn is_subtype(&self, sub: &str, sup: &str) -> bool {
        let mut stack = vec![sub];
        let mut seen = HashSet::new();
        while let Some(name) = stack.pop() {
            if name == sup {
                return true;
            }
            if !seen.insert(name) {
                continue;
            }
            if let Some(def) = self.get_type(name) {
                stack.extend(def.supertypes());
            }
        }
        false
    }

    /// Check if a value of type `candidate` can be assigned to `target`.
    ///
    /// Containers are compared by kind only; their generic arguments are
    /// erased. Named types follow the `extends`/`implements` hierarchy.
    pub fn is_assignable(&self, target: &DeclaredType, candidate: &DeclaredType) -> bool {
        match (target, candidate) {
            (DeclaredType::Named(sup), DeclaredType::Named(sub)) => self.is_subtype(sub, sup),
            _ => target.same_kind(candidate),
        }
    }

    /// Concrete (instantiable) types assignable to `name`, in declaration order.
    pub fn concrete_subtypes(&self, name: &str) -> Vec<&str> {
        self.types
            .iter()
            .filter(|def| !def.kind.is_abstract() && self.is_subtype(&def.name, name))
            .map(|def| def.name.as_str())
            .collect()
    }

    /// Build an instance of a type as its constructor would: every field
    /// holds its declared default, or the zero value of its type.
    pub fn instantiate(&self, name: &str) -> Result<ObjectValue, SchemaError> {
        let mut object = ObjectValue::new(name);
        for field in self.all_fields(name)? {
            let value = field.definition.initial_value().map_err(|e| {
                SchemaError::InvalidDefault {
                    type_name: field.declared_in.to_string(),
                    field: field.definition.name.clone(),
                    reason: e.to_string(),
                }
            })?;
            object.set(field.definition.name.clone(), value);
        }
        Ok(object)
    }

    /// Validate references, inheritance and field defaults.
    pub fn validate(&self) -> Result<(), SchemaError> {
        for def in &self.types {
            for parent in def.supertypes() {
                if self.get_type(parent).is_none() {
                    return Err(SchemaError::UnknownParent {
                        type_name: def.name.clone(),
                        parent: parent.to_string(),
                    });
                }
            }
        }

        self.check_acyclic()?;

        for def in &self.types {
            let mut names = HashSet::new();
            for field in self.all_fields(&def.name)? {
                let field_name = field.definition.name.as_str();
                if !names.insert(field_name) {
                    return Err(SchemaError::DuplicateField {
                        type_name: def.name.clone(),
                        field: field_name.to_string(),
                    });
                }
            }

            for field in &def.fields {
                for referenced in field.field_type.referenced_names() {
                    if self.get_type(referenced).is_none() {
                        return Err(SchemaError::UnknownReference {
                            type_name: def.name.clone(),
                            field: field.name.clone(),
                            referenced: referenced.to_string(),
                        });
                    }
                }
                field
                    .initial_value()
                    .map_err(|e| SchemaError::InvalidDefault {
                        type_name: def.name.clone(),
                        field: field.name.clone(),
                        reason: e.to_string(),
                    })?;
            }
        }

        Ok(())
    }

    /// Depth-first search over `extends`/`implements` edges.
    fn check_acyclic(&self) -> Result<(), SchemaError> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            InProgress,
            Done,
        }

        fn visit<'a>(
            schema: &'a TypeSchema,
            name: &'a str,
            marks: &mut HashMap<&'a str, Mark>,
        ) -> Result<(), SchemaError> {
            match marks.get(name) {
                Some(Mark::Done) => return Ok(()),
                Some(Mark::InProgress) => {
                    return Err(SchemaError::InheritanceCycle(name.to_string()))
                }
                None => {}
            }
            marks.insert(name, Mark::InProgress);
            if let Some(def) = schema.get_type(name) {
                for parent in def.supertypes() {
                    visit(schema, parent, marks)?;
                }
            }
            marks.insert(name, Mark::Done);
            Ok(())
        }

        let mut marks = HashMap::new();
        for def in &self.types {
            visit(self, &def.name, &mut marks)?;
        }
        Ok(())
    }
}
