//! Type-aware conversion of YAML literals into `Value`s.
//!
//! Used for field defaults in type schemas and for the `static` and
//! `one_of` strategies, where the target type is always known.

use crate::types::DeclaredType;
use crate::values::Value;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde_yaml::Value as YamlValue;
use std::time::Duration;

/// Error converting a literal into a value of a declared type.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("cannot convert {literal} to {target}: {reason}")]
pub struct LiteralError {
    /// Debug rendering of the offending literal
    pub literal: String,
    /// Target type
    pub target: String,
    /// What went wrong
    pub reason: String,
}

impl LiteralError {
    fn new(literal: &YamlValue, target: &DeclaredType, reason: impl Into<String>) -> Self {
        Self {
            literal: render(literal),
            target: target.to_string(),
            reason: reason.into(),
        }
    }
}

fn render(literal: &YamlValue) -> String {
    serde_yaml::to_string(literal)
        .map(|s| s.trim_end().to_string())
        .unwrap_or_else(|_| format!("{literal:?}"))
}

/// Convert a YAML literal to a value of the given declared type.
///
/// `null` converts to `Value::Null` for every type. Scalars given as
/// strings are parsed into the target type (`"42"` for an integer,
/// `"2024-01-31"` for a date), mirroring how hand-written fixtures are
/// usually spelled in YAML.
pub fn value_from_literal(literal: &YamlValue, ty: &DeclaredType) -> Result<Value, LiteralError> {
    if let YamlValue::Tagged(tagged) = literal {
        return value_from_literal(&tagged.value, ty);
    }
    if literal.is_null() {
        return Ok(Value::Null);
    }

    let fail = |reason: &str| LiteralError::new(literal, ty, reason);

    match ty {
        DeclaredType::Bool => match literal {
            YamlValue::Bool(b) => Ok(Value::Bool(*b)),
            YamlValue::String(s) => match s.to_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(Value::Bool(true)),
                "false" | "0" | "no" => Ok(Value::Bool(false)),
                _ => Err(fail("not a boolean")),
            },
            _ => Err(fail("not a boolean")),
        },

        DeclaredType::Char => {
            let s = literal.as_str().ok_or_else(|| fail("expected a string"))?;
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(Value::Char(c)),
                _ => Err(fail("expected exactly one character")),
            }
        }

        DeclaredType::Int8 => narrow(literal)
            .map(Value::Int8)
            .ok_or_else(|| fail("not an int8")),
        DeclaredType::Int16 => narrow(literal)
            .map(Value::Int16)
            .ok_or_else(|| fail("not an int16")),
        DeclaredType::Int32 => narrow(literal)
            .map(Value::Int32)
            .ok_or_else(|| fail("not an int32")),
        DeclaredType::Int64 => narrow(literal)
            .map(Value::Int64)
            .ok_or_else(|| fail("not an int64")),
        DeclaredType::UInt8 => narrow(literal)
            .map(Value::UInt8)
            .ok_or_else(|| fail("not a uint8")),
        DeclaredType::UInt16 => narrow(literal)
            .map(Value::UInt16)
            .ok_or_else(|| fail("not a uint16")),
        DeclaredType::UInt32 => narrow(literal)
            .map(Value::UInt32)
            .ok_or_else(|| fail("not a uint32")),
        DeclaredType::UInt64 => narrow(literal)
            .map(Value::UInt64)
            .ok_or_else(|| fail("not a uint64")),

        DeclaredType::Float32 => float(literal)
            .map(|f| Value::Float32(f as f32))
            .ok_or_else(|| fail("not a number")),
        DeclaredType::Float64 => float(literal)
            .map(Value::Float64)
            .ok_or_else(|| fail("not a number")),

        DeclaredType::String => match literal {
            YamlValue::String(s) => Ok(Value::String(s.clone())),
            YamlValue::Bool(b) => Ok(Value::String(b.to_string())),
            YamlValue::Number(n) => Ok(Value::String(n.to_string())),
            _ => Err(fail("expected a scalar")),
        },

        DeclaredType::Bytes => match literal {
            YamlValue::String(s) => Ok(Value::Bytes(s.as_bytes().to_vec())),
            YamlValue::Sequence(items) => items
                .iter()
                .map(|item| integer(item).and_then(|i| u8::try_from(i).ok()))
                .collect::<Option<Vec<u8>>>()
                .map(Value::Bytes)
                .ok_or_else(|| fail("expected a list of bytes")),
            _ => Err(fail("expected a string or a list of bytes")),
        },

        DeclaredType::Uuid => literal
            .as_str()
            .and_then(|s| uuid::Uuid::parse_str(s).ok())
            .map(Value::Uuid)
            .ok_or_else(|| fail("not a UUID")),

        DeclaredType::Date => literal
            .as_str()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
            .map(Value::Date)
            .ok_or_else(|| fail("expected YYYY-MM-DD")),

        DeclaredType::Time => literal
            .as_str()
            .and_then(parse_time)
            .map(Value::Time)
            .ok_or_else(|| fail("expected HH:MM:SS")),

        DeclaredType::DateTime => literal
            .as_str()
            .and_then(parse_timestamp)
            .map(Value::DateTime)
            .ok_or_else(|| fail("expected an RFC 3339 timestamp or YYYY-MM-DD")),

        DeclaredType::Duration => match literal {
            YamlValue::Number(n) => n
                .as_u64()
                .map(Duration::from_secs)
                .or_else(|| n.as_f64().and_then(|f| Duration::try_from_secs_f64(f).ok()))
                .map(Value::Duration)
                .ok_or_else(|| fail("negative or invalid seconds")),
            YamlValue::String(s) => parse_duration(s)
                .map(Value::Duration)
                .map_err(|reason| fail(reason.as_str())),
            _ => Err(fail("expected seconds or a duration string")),
        },

        DeclaredType::Enum { values } => {
            let variant = literal.as_str().ok_or_else(|| fail("expected a variant name"))?;
            if values.iter().any(|v| v == variant) {
                Ok(Value::Enum(variant.to_string()))
            } else {
                Err(fail(
                    format!("unknown variant, expected one of {values:?}").as_str(),
                ))
            }
        }

        DeclaredType::List { element } => sequence(literal, element)
            .map(Value::List)
            .ok_or_else(|| fail("expected a list")),
        DeclaredType::Array { element } => sequence(literal, element)
            .map(Value::Array)
            .ok_or_else(|| fail("expected a list")),
        DeclaredType::Set { element } => {
            let items = sequence(literal, element).ok_or_else(|| fail("expected a list"))?;
            let mut distinct: Vec<Value> = Vec::with_capacity(items.len());
            for item in items {
                if !distinct.contains(&item) {
                    distinct.push(item);
                }
            }
            Ok(Value::Set(distinct))
        }

        DeclaredType::Map { key, value } => {
            let mapping = literal.as_mapping().ok_or_else(|| fail("expected a mapping"))?;
            let mut entries: Vec<(Value, Value)> = Vec::with_capacity(mapping.len());
            for (k, v) in mapping {
                entries.push((value_from_literal(k, key)?, value_from_literal(v, value)?));
            }
            Ok(Value::Map(entries))
        }

        DeclaredType::Named(_) => Err(fail("only null is accepted for schema types")),
    }
}

/// Convert each element of a YAML sequence, `None` if any element fails or
/// the literal is not a sequence.
fn sequence(literal: &YamlValue, element: &DeclaredType) -> Option<Vec<Value>> {
    literal
        .as_sequence()?
        .iter()
        .map(|item| value_from_literal(item, element).ok())
        .collect()
}

fn narrow<T: TryFrom<i128>>(literal: &YamlValue) -> Option<T> {
    integer(literal).and_then(|i| T::try_from(i).ok())
}

fn integer(literal: &YamlValue) -> Option<i128> {
    match literal {
        YamlValue::Number(n) => n
            .as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from)),
        YamlValue::String(s) => s.trim().parse::<i128>().ok(),
        _ => None,
    }
}

fn float(literal: &YamlValue) -> Option<f64> {
    match literal {
        YamlValue::Number(n) => n.as_f64(),
        YamlValue::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Parse a time of day with optional fractional seconds.
pub fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
}

/// Parse a timestamp string in various formats.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    // Try RFC 3339 / ISO 8601
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    // Try common date-only format
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }

    None
}

/// Parse a duration string like "1h", "30m", "300s", "250ms" or "300".
///
/// Plain numbers are interpreted as seconds.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    let parse = |num: &str| {
        num.trim()
            .parse::<u64>()
            .map_err(|_| format!("invalid duration value: {s}"))
    };

    // "ms" must be checked before "s" and "m"
    if let Some(num) = s.strip_suffix("ms") {
        return parse(num).map(Duration::from_millis);
    }
    if let Some(num) = s.strip_suffix('h') {
        return parse(num).map(|h| Duration::from_secs(h * 3600));
    }
    if let Some(num) = s.strip_suffix('m') {
        return parse(num).map(|m| Duration::from_secs(m * 60));
    }
    if let Some(num) = s.strip_suffix('s') {
        return parse(num).map(Duration::from_secs);
    }

    parse(s).map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn yaml(s: &str) -> YamlValue {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn test_integers_respect_width() {
        assert_eq!(
            value_from_literal(&yaml("42"), &DeclaredType::Int8).unwrap(),
            Value::Int8(42)
        );
        assert!(value_from_literal(&yaml("300"), &DeclaredType::Int8).is_err());
        assert!(value_from_literal(&yaml("-1"), &DeclaredType::UInt32).is_err());
        assert_eq!(
            value_from_literal(&yaml("\"17\""), &DeclaredType::Int64).unwrap(),
            Value::Int64(17)
        );
    }

    #[test]
    fn test_null_for_any_type() {
        assert_eq!(
            value_from_literal(&YamlValue::Null, &DeclaredType::named("Address")).unwrap(),
            Value::Null
        );
        assert_eq!(
            value_from_literal(&YamlValue::Null, &DeclaredType::Int32).unwrap(),
            Value::Null
        );
    }

    #[test]
    fn test_named_type_rejects_mapping() {
        let result = value_from_literal(&yaml("{ street: Main }"), &DeclaredType::named("Address"));
        assert!(result.is_err());
    }

    #[test]
    fn test_containers() {
        let list = value_from_literal(&yaml("[1, 2, 3]"), &DeclaredType::list(DeclaredType::Int32)).unwrap();
        assert_eq!(
            list,
            Value::List(vec![Value::Int32(1), Value::Int32(2), Value::Int32(3)])
        );

        let set = value_from_literal(&yaml("[a, b, a]"), &DeclaredType::set(DeclaredType::String)).unwrap();
        assert_eq!(set, Value::Set(vec![Value::from("a"), Value::from("b")]));

        let map = value_from_literal(
            &yaml("{ x: 1 }"),
            &DeclaredType::map(DeclaredType::String, DeclaredType::UInt8),
        )
        .unwrap();
        assert_eq!(map, Value::Map(vec![(Value::from("x"), Value::UInt8(1))]));

        assert!(value_from_literal(&yaml("[1, x]"), &DeclaredType::list(DeclaredType::Int32)).is_err());
    }

    #[test]
    fn test_enum_variants() {
        let color = DeclaredType::enumeration(["red", "green"]);
        assert_eq!(
            value_from_literal(&yaml("red"), &color).unwrap(),
            Value::Enum("red".to_string())
        );
        assert!(value_from_literal(&yaml("blue"), &color).is_err());
    }

    #[test]
    fn test_temporal_literals() {
        let date = value_from_literal(&yaml("2024-02-29"), &DeclaredType::Date).unwrap();
        assert_eq!(date, Value::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));

        let time = value_from_literal(&yaml("\"12:30:15\""), &DeclaredType::Time).unwrap();
        assert_eq!(time, Value::Time(NaiveTime::from_hms_opt(12, 30, 15).unwrap()));

        if let Value::DateTime(dt) =
            value_from_literal(&yaml("2020-01-01T10:00:00Z"), &DeclaredType::DateTime).unwrap()
        {
            assert_eq!(dt.year(), 2020);
        } else {
            panic!("Expected DateTime value");
        }

        let duration = value_from_literal(&yaml("90m"), &DeclaredType::Duration).unwrap();
        assert_eq!(duration, Value::Duration(Duration::from_secs(5400)));
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("300").unwrap(), Duration::from_secs(300));
        assert_eq!(parse_duration("2h").unwrap(), Duration::from_secs(7200));
        assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
        assert!(parse_duration("").is_err());
        assert!(parse_duration("abc").is_err());
    }

    #[test]
    fn test_char_literal() {
        assert_eq!(
            value_from_literal(&yaml("x"), &DeclaredType::Char).unwrap(),
            Value::Char('x')
        );
        assert!(value_from_literal(&yaml("xy"), &DeclaredType::Char).is_err());
    }

    #[test]
    fn test_error_message_names_target() {
        let err = value_from_literal(&yaml("abc"), &DeclaredType::Int32).unwrap_err();
        assert_eq!(err.target, "int32");
        assert!(err.to_string().contains("int32"));
    }
}
