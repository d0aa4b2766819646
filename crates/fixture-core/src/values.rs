//! Value representations for fixture-gen.
//!
//! `Value` is the dynamically typed object graph the populator produces.
//! Objects keep their fields in declaration order so a populated instance
//! reads the same way its type definition does.

use crate::schema::TypeSchema;
use crate::types::DeclaredType;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::time::Duration;
use uuid::Uuid;

/// A generated (or caller supplied) value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value
    Null,

    /// Boolean value
    Bool(bool),

    /// Single character
    Char(char),

    /// 8-bit signed integer
    Int8(i8),

    /// 16-bit signed integer
    Int16(i16),

    /// 32-bit signed integer
    Int32(i32),

    /// 64-bit signed integer
    Int64(i64),

    /// 8-bit unsigned integer
    UInt8(u8),

    /// 16-bit unsigned integer
    UInt16(u16),

    /// 32-bit unsigned integer
    UInt32(u32),

    /// 64-bit unsigned integer
    UInt64(u64),

    /// 32-bit floating point
    Float32(f32),

    /// 64-bit floating point
    Float64(f64),

    /// String value
    String(String),

    /// Binary data
    Bytes(Vec<u8>),

    /// UUID value
    Uuid(Uuid),

    /// Calendar date
    Date(NaiveDate),

    /// Time of day
    Time(NaiveTime),

    /// UTC timestamp
    DateTime(DateTime<Utc>),

    /// Elapsed time
    Duration(Duration),

    /// Enumeration variant name
    Enum(String),

    /// Ordered sequence of values
    List(Vec<Value>),

    /// Distinct values in insertion order
    Set(Vec<Value>),

    /// Key/value entries with distinct keys, in insertion order
    Map(Vec<(Value, Value)>),

    /// Array of values
    Array(Vec<Value>),

    /// Instance of a structured schema type
    Object(ObjectValue),
}

/// Instance of a structured type: its concrete type name and its fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectValue {
    /// Concrete type of this instance
    pub type_name: String,

    /// Field values in declaration order
    pub fields: IndexMap<String, Value>,
}

impl ObjectValue {
    /// Create an instance without fields.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: IndexMap::new(),
        }
    }

    /// Builder-style field assignment.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Get a field value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Set a field value, keeping the position of an existing field.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }
}

impl Value {
    /// The zero value of a declared type.
    ///
    /// Mirrors `Default` for the corresponding Rust types: `false`, `0`,
    /// empty strings and containers, the nil UUID, the Unix epoch. Enums and
    /// schema types have no natural default and are `Null`.
    pub fn zero(ty: &DeclaredType) -> Value {
        match ty {
            DeclaredType::Bool => Value::Bool(false),
            DeclaredType::Char => Value::Char('\0'),
            DeclaredType::Int8 => Value::Int8(0),
            DeclaredType::Int16 => Value::Int16(0),
            DeclaredType::Int32 => Value::Int32(0),
            DeclaredType::Int64 => Value::Int64(0),
            DeclaredType::UInt8 => Value::UInt8(0),
            DeclaredType::UInt16 => Value::UInt16(0),
            DeclaredType::UInt32 => Value::UInt32(0),
            DeclaredType::UInt64 => Value::UInt64(0),
            DeclaredType::Float32 => Value::Float32(0.0),
            DeclaredType::Float64 => Value::Float64(0.0),
            DeclaredType::String => Value::String(String::new()),
            DeclaredType::Bytes => Value::Bytes(Vec::new()),
            DeclaredType::Uuid => Value::Uuid(Uuid::nil()),
            DeclaredType::Date => Value::Date(NaiveDate::default()),
            DeclaredType::Time => Value::Time(NaiveTime::default()),
            DeclaredType::DateTime => Value::DateTime(DateTime::<Utc>::default()),
            DeclaredType::Duration => Value::Duration(Duration::ZERO),
            DeclaredType::List { .. } => Value::List(Vec::new()),
            DeclaredType::Set { .. } => Value::Set(Vec::new()),
            DeclaredType::Map { .. } => Value::Map(Vec::new()),
            DeclaredType::Array { .. } => Value::Array(Vec::new()),
            DeclaredType::Enum { .. } | DeclaredType::Named(_) => Value::Null,
        }
    }

    /// Check if this value is null or the zero value of `ty`.
    pub fn is_default_for(&self, ty: &DeclaredType) -> bool {
        self.is_null() || *self == Value::zero(ty)
    }

    /// Check if this value can be assigned to a field declared as `ty`.
    ///
    /// `Null` conforms to every type. Objects conform to a named type when
    /// their concrete type is that type or one of its subtypes.
    pub fn conforms_to(&self, ty: &DeclaredType, schema: &TypeSchema) -> bool {
        match (self, ty) {
            (Value::Null, _) => true,
            (Value::Bool(_), DeclaredType::Bool)
            | (Value::Char(_), DeclaredType::Char)
            | (Value::Int8(_), DeclaredType::Int8)
            | (Value::Int16(_), DeclaredType::Int16)
            | (Value::Int32(_), DeclaredType::Int32)
            | (Value::Int64(_), DeclaredType::Int64)
            | (Value::UInt8(_), DeclaredType::UInt8)
            | (Value::UInt16(_), DeclaredType::UInt16)
            | (Value::UInt32(_), DeclaredType::UInt32)
            | (Value::UInt64(_), DeclaredType::UInt64)
            | (Value::Float32(_), DeclaredType::Float32)
            | (Value::Float64(_), DeclaredType::Float64)
            | (Value::String(_), DeclaredType::String)
            | (Value::Bytes(_), DeclaredType::Bytes)
            | (Value::Uuid(_), DeclaredType::Uuid)
            | (Value::Date(_), DeclaredType::Date)
            | (Value::Time(_), DeclaredType::Time)
            | (Value::DateTime(_), DeclaredType::DateTime)
            | (Value::Duration(_), DeclaredType::Duration) => true,
            (Value::Enum(variant), DeclaredType::Enum { values }) => values.contains(variant),
            (Value::List(items), DeclaredType::List { element })
            | (Value::Set(items), DeclaredType::Set { element })
            | (Value::Array(items), DeclaredType::Array { element }) => {
                items.iter().all(|item| item.conforms_to(element, schema))
            }
            (Value::Map(entries), DeclaredType::Map { key, value }) => entries
                .iter()
                .all(|(k, v)| k.conforms_to(key, schema) && v.conforms_to(value, schema)),
            (Value::Object(object), DeclaredType::Named(name)) => {
                schema.is_subtype(&object.type_name, name)
            }
            _ => false,
        }
    }

    /// Short label of the value's variant, for diagnostics.
    pub fn type_label(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Char(_) => "char",
            Value::Int8(_) => "int8",
            Value::Int16(_) => "int16",
            Value::Int32(_) => "int32",
            Value::Int64(_) => "int64",
            Value::UInt8(_) => "uint8",
            Value::UInt16(_) => "uint16",
            Value::UInt32(_) => "uint32",
            Value::UInt64(_) => "uint64",
            Value::Float32(_) => "float32",
            Value::Float64(_) => "float64",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Uuid(_) => "uuid",
            Value::Date(_) => "date",
            Value::Time(_) => "time",
            Value::DateTime(_) => "date_time",
            Value::Duration(_) => "duration",
            Value::Enum(_) => "enum",
            Value::List(_) => "list",
            Value::Set(_) => "set",
            Value::Map(_) => "map",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Try to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get this value as an i64 (any signed or unsigned width that fits).
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int8(i) => Some(*i as i64),
            Self::Int16(i) => Some(*i as i64),
            Self::Int32(i) => Some(*i as i64),
            Self::Int64(i) => Some(*i),
            Self::UInt8(u) => Some(*u as i64),
            Self::UInt16(u) => Some(*u as i64),
            Self::UInt32(u) => Some(*u as i64),
            Self::UInt64(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    /// Try to get this value as an f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float32(f) => Some(*f as f64),
            Self::Float64(f) => Some(*f),
            _ => None,
        }
    }

    /// Try to get this value as a string slice (strings and enum variants).
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Enum(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get the elements of a list, set or array.
    pub fn as_elements(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) | Self::Set(items) | Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Try to get this value as an object.
    pub fn as_object(&self) -> Option<&ObjectValue> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Get a field of an object value.
    pub fn get_field(&self, name: &str) -> Option<&Value> {
        self.as_object().and_then(|object| object.get(name))
    }

    /// Convert to a JSON value.
    ///
    /// Dates and times use their ISO 8601 forms, durations the
    /// `{secs, nanos}` shape serde uses for `std::time::Duration`, and maps
    /// become JSON objects when every key has a string form (otherwise a list
    /// of `[key, value]` pairs).
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;

        match self {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Char(c) => Json::String(c.to_string()),
            Value::Int8(i) => Json::from(*i),
            Value::Int16(i) => Json::from(*i),
            Value::Int32(i) => Json::from(*i),
            Value::Int64(i) => Json::from(*i),
            Value::UInt8(u) => Json::from(*u),
            Value::UInt16(u) => Json::from(*u),
            Value::UInt32(u) => Json::from(*u),
            Value::UInt64(u) => Json::from(*u),
            Value::Float32(f) => float_to_json(*f as f64),
            Value::Float64(f) => float_to_json(*f),
            Value::String(s) | Value::Enum(s) => Json::String(s.clone()),
            Value::Bytes(bytes) => Json::Array(bytes.iter().map(|b| Json::from(*b)).collect()),
            Value::Uuid(uuid) => Json::String(uuid.to_string()),
            Value::Date(date) => Json::String(date.to_string()),
            Value::Time(time) => Json::String(time.to_string()),
            Value::DateTime(dt) => Json::String(dt.to_rfc3339()),
            Value::Duration(duration) => serde_json::json!({
                "secs": duration.as_secs(),
                "nanos": duration.subsec_nanos(),
            }),
            Value::List(items) | Value::Set(items) | Value::Array(items) => {
                Json::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Map(entries) => {
                let keys: Option<Vec<String>> = entries.iter().map(|(k, _)| k.key_string()).collect();
                match keys {
                    Some(keys) => Json::Object(
                        keys.into_iter()
                            .zip(entries.iter().map(|(_, v)| v.to_json()))
                            .collect(),
                    ),
                    None => Json::Array(
                        entries
                            .iter()
                            .map(|(k, v)| Json::Array(vec![k.to_json(), v.to_json()]))
                            .collect(),
                    ),
                }
            }
            Value::Object(object) => Json::Object(
                object
                    .fields
                    .iter()
                    .map(|(name, value)| (name.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }

    /// String form of a value used as a JSON object key.
    fn key_string(&self) -> Option<String> {
        match self {
            Value::String(s) | Value::Enum(s) => Some(s.clone()),
            Value::Char(c) => Some(c.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Uuid(uuid) => Some(uuid.to_string()),
            Value::Date(date) => Some(date.to_string()),
            other => other.as_i64().map(|i| i.to_string()).or(match other {
                Value::UInt64(u) => Some(u.to_string()),
                _ => None,
            }),
        }
    }
}

fn float_to_json(f: f64) -> serde_json::Value {
    serde_json::Number::from_f64(f)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_json().serialize(serializer)
    }
}

macro_rules! impl_from_for_value {
    ($($source:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$source> for Value {
                fn from(value: $source) -> Self {
                    Value::$variant(value)
                }
            }
        )*
    };
}

impl_from_for_value! {
    bool => Bool,
    char => Char,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
    String => String,
    Vec<u8> => Bytes,
    Uuid => Uuid,
    NaiveDate => Date,
    NaiveTime => Time,
    DateTime<Utc> => DateTime,
    Duration => Duration,
    ObjectValue => Object,
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_schema() -> TypeSchema {
        TypeSchema::from_yaml(
            r#"
types:
  - name: Shape
    kind: interface
  - name: Circle
    implements: [Shape]
    fields:
      - name: radius
        type: float64
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_zero_values() {
        assert_eq!(Value::zero(&DeclaredType::Int32), Value::Int32(0));
        assert_eq!(Value::zero(&DeclaredType::String), Value::String(String::new()));
        assert_eq!(
            Value::zero(&DeclaredType::list(DeclaredType::Int32)),
            Value::List(vec![])
        );
        assert_eq!(Value::zero(&DeclaredType::named("Circle")), Value::Null);
        assert_eq!(Value::zero(&DeclaredType::Uuid), Value::Uuid(Uuid::nil()));
    }

    #[test]
    fn test_is_default_for() {
        assert!(Value::Null.is_default_for(&DeclaredType::Int64));
        assert!(Value::Int64(0).is_default_for(&DeclaredType::Int64));
        assert!(!Value::Int64(7).is_default_for(&DeclaredType::Int64));
        assert!(!Value::List(vec![Value::Int32(1)])
            .is_default_for(&DeclaredType::list(DeclaredType::Int32)));
    }

    #[test]
    fn test_conforms_to() {
        let schema = test_schema();

        assert!(Value::Int64(42).conforms_to(&DeclaredType::Int64, &schema));
        assert!(!Value::Int32(42).conforms_to(&DeclaredType::Int64, &schema));
        assert!(Value::Null.conforms_to(&DeclaredType::Int64, &schema));

        let circle = Value::Object(ObjectValue::new("Circle").with_field("radius", 1.5));
        assert!(circle.conforms_to(&DeclaredType::named("Shape"), &schema));
        assert!(circle.conforms_to(&DeclaredType::named("Circle"), &schema));

        let list = Value::List(vec![Value::Int32(1), Value::String("x".into())]);
        assert!(!list.conforms_to(&DeclaredType::list(DeclaredType::Int32), &schema));

        let color = DeclaredType::enumeration(["red", "green"]);
        assert!(Value::Enum("red".into()).conforms_to(&color, &schema));
        assert!(!Value::Enum("blue".into()).conforms_to(&color, &schema));
    }

    #[test]
    fn test_to_json_object_keeps_field_order() {
        let object = ObjectValue::new("Person")
            .with_field("name", "Ada")
            .with_field("age", 36i32)
            .with_field("born", NaiveDate::from_ymd_opt(1815, 12, 10).unwrap());

        let json = Value::Object(object).to_json();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["name", "age", "born"]);
        assert_eq!(json["born"], "1815-12-10");
    }

    #[test]
    fn test_to_json_maps() {
        let by_string = Value::Map(vec![(Value::from("a"), Value::Int32(1))]);
        assert_eq!(by_string.to_json(), serde_json::json!({"a": 1}));

        let by_int = Value::Map(vec![(Value::Int32(3), Value::Bool(true))]);
        assert_eq!(by_int.to_json(), serde_json::json!({"3": true}));

        let by_object = Value::Map(vec![(
            Value::Object(ObjectValue::new("Key")),
            Value::Int32(1),
        )]);
        assert_eq!(by_object.to_json(), serde_json::json!([[{}, 1]]));
    }

    #[test]
    fn test_to_json_duration() {
        let value = Value::Duration(Duration::new(5, 10));
        assert_eq!(value.to_json(), serde_json::json!({"secs": 5, "nanos": 10}));
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Value::from(Some(3i64)), Value::Int64(3));
        assert_eq!(Value::from(None::<i64>), Value::Null);
    }
}
