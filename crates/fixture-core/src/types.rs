//! Declared field types for fixture-gen.
//!
//! This module defines `DeclaredType`, the universe of types a field can be
//! declared with in a type schema. Primitive and well-known value types are
//! filled by value producers, containers are filled element by element, and
//! `Named` references point at structured (or abstract) types defined in the
//! same schema.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Type of a field as declared in a type schema.
///
/// # YAML Format
///
/// Simple types and references to schema types are plain strings:
/// ```yaml
/// type: int64
/// type: string
/// type: Address     # any unknown name is a reference to a schema type
/// ```
///
/// Parameterized types use the object format:
/// ```yaml
/// type:
///   type: list
///   element: Node
/// type:
///   type: map
///   key: string
///   value: int32
/// type:
///   type: enum
///   values: [red, green, blue]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeclaredType {
    /// Boolean value
    Bool,

    /// Single unicode scalar value
    Char,

    // Signed integers
    /// 8-bit signed integer
    Int8,
    /// 16-bit signed integer
    Int16,
    /// 32-bit signed integer
    Int32,
    /// 64-bit signed integer
    Int64,

    // Unsigned integers
    /// 8-bit unsigned integer
    UInt8,
    /// 16-bit unsigned integer
    UInt16,
    /// 32-bit unsigned integer
    UInt32,
    /// 64-bit unsigned integer
    UInt64,

    // Floating point
    /// 32-bit IEEE 754 floating point
    Float32,
    /// 64-bit IEEE 754 floating point
    Float64,

    /// UTF-8 string
    String,

    /// Raw bytes
    Bytes,

    /// UUID (128-bit)
    Uuid,

    // Temporal types
    /// Calendar date without time zone
    Date,
    /// Time of day without time zone
    Time,
    /// UTC timestamp
    DateTime,
    /// Elapsed time
    Duration,

    /// Enumeration with a closed set of variant names
    Enum {
        /// Allowed variant names
        values: Vec<String>,
    },

    // Containers
    /// Ordered sequence
    List {
        /// Element type
        element: Box<DeclaredType>,
    },

    /// Collection of distinct elements
    Set {
        /// Element type
        element: Box<DeclaredType>,
    },

    /// Mapping from keys to values
    Map {
        /// Key type
        key: Box<DeclaredType>,
        /// Value type
        value: Box<DeclaredType>,
    },

    /// Array of elements
    Array {
        /// Element type
        element: Box<DeclaredType>,
    },

    /// Reference to a type defined in the schema
    Named(String),
}

impl DeclaredType {
    /// Look up a simple (non-parameterized) type by its YAML name.
    pub fn from_simple_name(name: &str) -> Option<Self> {
        let ty = match name {
            "bool" | "boolean" => Self::Bool,
            "char" => Self::Char,
            "int8" | "i8" => Self::Int8,
            "int16" | "i16" => Self::Int16,
            "int32" | "i32" | "int" => Self::Int32,
            "int64" | "i64" | "long" => Self::Int64,
            "uint8" | "u8" => Self::UInt8,
            "uint16" | "u16" => Self::UInt16,
            "uint32" | "u32" => Self::UInt32,
            "uint64" | "u64" => Self::UInt64,
            "float32" | "f32" | "float" => Self::Float32,
            "float64" | "f64" | "double" => Self::Float64,
            "string" | "text" => Self::String,
            "bytes" => Self::Bytes,
            "uuid" => Self::Uuid,
            "date" => Self::Date,
            "time" => Self::Time,
            "date_time" | "datetime" => Self::DateTime,
            "duration" => Self::Duration,
            _ => return None,
        };
        Some(ty)
    }

    /// Canonical YAML name of a simple type, `None` for parameterized and named types.
    pub fn simple_name(&self) -> Option<&'static str> {
        let name = match self {
            Self::Bool => "bool",
            Self::Char => "char",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::UInt8 => "uint8",
            Self::UInt16 => "uint16",
            Self::UInt32 => "uint32",
            Self::UInt64 => "uint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::String => "string",
            Self::Bytes => "bytes",
            Self::Uuid => "uuid",
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTime => "date_time",
            Self::Duration => "duration",
            _ => return None,
        };
        Some(name)
    }

    /// Create a reference to a schema type.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Create a list type with the given element type.
    pub fn list(element: DeclaredType) -> Self {
        Self::List {
            element: Box::new(element),
        }
    }

    /// Create a set type with the given element type.
    pub fn set(element: DeclaredType) -> Self {
        Self::Set {
            element: Box::new(element),
        }
    }

    /// Create an array type with the given element type.
    pub fn array(element: DeclaredType) -> Self {
        Self::Array {
            element: Box::new(element),
        }
    }

    /// Create a map type with the given key and value types.
    pub fn map(key: DeclaredType, value: DeclaredType) -> Self {
        Self::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// Create an enumeration type with the given variant names.
    pub fn enumeration<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self::Enum {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Name of the referenced schema type, if this is a `Named` type.
    pub fn as_named(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            _ => None,
        }
    }

    /// Check if this type is a container (list, set, map or array).
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            Self::List { .. } | Self::Set { .. } | Self::Map { .. } | Self::Array { .. }
        )
    }

    /// Check if this type represents an integer type.
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Self::Int8
                | Self::Int16
                | Self::Int32
                | Self::Int64
                | Self::UInt8
                | Self::UInt16
                | Self::UInt32
                | Self::UInt64
        )
    }

    /// Check if this type represents a floating point type.
    pub fn is_float(&self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }

    /// Check if this type represents a temporal type.
    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            Self::Date | Self::Time | Self::DateTime | Self::Duration
        )
    }

    /// Generic arguments of a container type (element, or key and value).
    pub fn type_arguments(&self) -> Vec<&DeclaredType> {
        match self {
            Self::List { element } | Self::Set { element } | Self::Array { element } => {
                vec![element.as_ref()]
            }
            Self::Map { key, value } => vec![key.as_ref(), value.as_ref()],
            _ => Vec::new(),
        }
    }

    /// Check if both types have the same shape, ignoring generic arguments.
    ///
    /// Two lists are the same kind whatever their element types; two named
    /// types are the same kind only when they name the same type.
    pub fn same_kind(&self, other: &DeclaredType) -> bool {
        match (self, other) {
            (Self::List { .. }, Self::List { .. })
            | (Self::Set { .. }, Self::Set { .. })
            | (Self::Map { .. }, Self::Map { .. })
            | (Self::Array { .. }, Self::Array { .. }) => true,
            _ => self == other,
        }
    }

    /// Collect every schema type name referenced by this type, recursively.
    pub fn referenced_names(&self) -> Vec<&str> {
        match self {
            Self::Named(name) => vec![name.as_str()],
            _ => self
                .type_arguments()
                .into_iter()
                .flat_map(|arg| arg.referenced_names())
                .collect(),
        }
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = self.simple_name() {
            return f.write_str(name);
        }
        match self {
            Self::Enum { values } => write!(f, "enum[{}]", values.join(", ")),
            Self::List { element } => write!(f, "list<{element}>"),
            Self::Set { element } => write!(f, "set<{element}>"),
            Self::Array { element } => write!(f, "array<{element}>"),
            Self::Map { key, value } => write!(f, "map<{key}, {value}>"),
            Self::Named(name) => f.write_str(name),
            // Every remaining variant has a simple name
            _ => write!(f, "{self:?}"),
        }
    }
}

// Custom serialization/deserialization for DeclaredType
// Supports both simple string format ("int64", "Address") and object format ({"type": "list", "element": "Node"})

impl Serialize for DeclaredType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeMap;

        if let Some(name) = self.simple_name() {
            return serializer.serialize_str(name);
        }

        match self {
            Self::Named(name) => serializer.serialize_str(name),
            Self::Enum { values } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "enum")?;
                map.serialize_entry("values", values)?;
                map.end()
            }
            Self::List { element } | Self::Set { element } | Self::Array { element } => {
                let tag = match self {
                    Self::List { .. } => "list",
                    Self::Set { .. } => "set",
                    _ => "array",
                };
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", tag)?;
                map.serialize_entry("element", element)?;
                map.end()
            }
            Self::Map { key, value } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("type", "map")?;
                map.serialize_entry("key", key)?;
                map.serialize_entry("value", value)?;
                map.end()
            }
            // Simple types were handled above
            _ => Err(serde::ser::Error::custom(format!(
                "unserializable type: {self:?}"
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for DeclaredType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{Error, MapAccess, Visitor};

        struct DeclaredTypeVisitor;

        impl<'de> Visitor<'de> for DeclaredTypeVisitor {
            type Value = DeclaredType;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a type name or a map describing a parameterized type")
            }

            // Handle string format: "int64", "Address", etc.
            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: Error,
            {
                if value.is_empty() {
                    return Err(E::custom("type name must not be empty"));
                }
                Ok(DeclaredType::from_simple_name(value)
                    .unwrap_or_else(|| DeclaredType::Named(value.to_string())))
            }

            // Handle map format: {"type": "list", "element": "Node"}
            fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut type_name: Option<String> = None;
                let mut fields: HashMap<String, serde_yaml::Value> = HashMap::new();

                while let Some(key) = map.next_key::<String>()? {
                    if key == "type" {
                        type_name = Some(map.next_value()?);
                    } else {
                        fields.insert(key, map.next_value()?);
                    }
                }

                let type_name = type_name.ok_or_else(|| M::Error::missing_field("type"))?;

                match type_name.as_str() {
                    "enum" => {
                        let values = get_field_required(&fields, "values")?;
                        Ok(DeclaredType::Enum { values })
                    }
                    "list" => {
                        let element = get_field_required(&fields, "element")?;
                        Ok(DeclaredType::list(element))
                    }
                    "set" => {
                        let element = get_field_required(&fields, "element")?;
                        Ok(DeclaredType::set(element))
                    }
                    "array" => {
                        let element = get_field_required(&fields, "element")?;
                        Ok(DeclaredType::array(element))
                    }
                    "map" => {
                        let key = get_field_required(&fields, "key")?;
                        let value = get_field_required(&fields, "value")?;
                        Ok(DeclaredType::map(key, value))
                    }
                    other => self.visit_str(other),
                }
            }
        }

        deserializer.deserialize_any(DeclaredTypeVisitor)
    }
}

fn get_field_required<T: for<'de> Deserialize<'de>, E: serde::de::Error>(
    fields: &HashMap<String, serde_yaml::Value>,
    key: &'static str,
) -> Result<T, E> {
    let value = fields.get(key).ok_or_else(|| E::missing_field(key))?;
    serde_yaml::from_value(value.clone())
        .map_err(|e| E::custom(format!("invalid field '{key}': {e}")))
}
