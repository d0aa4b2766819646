//! Numeric value producers.

use fixture_core::{DeclaredType, Value};
use rand::Rng;

/// Generate a random integer in the given range (inclusive).
pub fn generate_int_range<R: Rng>(rng: &mut R, min: i64, max: i64) -> i64 {
    if min >= max {
        return min;
    }
    rng.random_range(min..=max)
}

/// Generate a random float in the given range (inclusive).
pub fn generate_float_range<R: Rng>(rng: &mut R, min: f64, max: f64) -> f64 {
    if min >= max {
        return min;
    }
    rng.random_range(min..=max)
}

/// Generate a number over the whole domain of a numeric type.
///
/// Integers cover every value of their width; floats are drawn from `[0, 1)`.
/// Returns `None` for non-numeric types.
pub fn generate_number<R: Rng>(rng: &mut R, ty: &DeclaredType) -> Option<Value> {
    let value = match ty {
        DeclaredType::Int8 => Value::Int8(rng.random()),
        DeclaredType::Int16 => Value::Int16(rng.random()),
        DeclaredType::Int32 => Value::Int32(rng.random()),
        DeclaredType::Int64 => Value::Int64(rng.random()),
        DeclaredType::UInt8 => Value::UInt8(rng.random()),
        DeclaredType::UInt16 => Value::UInt16(rng.random()),
        DeclaredType::UInt32 => Value::UInt32(rng.random()),
        DeclaredType::UInt64 => Value::UInt64(rng.random()),
        DeclaredType::Float32 => Value::Float32(rng.random()),
        DeclaredType::Float64 => Value::Float64(rng.random()),
        _ => return None,
    };
    Some(value)
}

/// Convert an integer to a value of the given integer type, if it fits.
pub fn integer_value(i: i64, ty: &DeclaredType) -> Option<Value> {
    let value = match ty {
        DeclaredType::Int8 => Value::Int8(i8::try_from(i).ok()?),
        DeclaredType::Int16 => Value::Int16(i16::try_from(i).ok()?),
        DeclaredType::Int32 => Value::Int32(i32::try_from(i).ok()?),
        DeclaredType::Int64 => Value::Int64(i),
        DeclaredType::UInt8 => Value::UInt8(u8::try_from(i).ok()?),
        DeclaredType::UInt16 => Value::UInt16(u16::try_from(i).ok()?),
        DeclaredType::UInt32 => Value::UInt32(u32::try_from(i).ok()?),
        DeclaredType::UInt64 => Value::UInt64(u64::try_from(i).ok()?),
        _ => return None,
    };
    Some(value)
}

/// Convert a float to a value of the given float type.
pub fn float_value(f: f64, ty: &DeclaredType) -> Option<Value> {
    match ty {
        DeclaredType::Float32 => Some(Value::Float32(f as f32)),
        DeclaredType::Float64 => Some(Value::Float64(f)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_int_range() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let value = generate_int_range(&mut rng, 10, 20);
            assert!((10..=20).contains(&value));
        }
        assert_eq!(generate_int_range(&mut rng, 5, 5), 5);
    }

    #[test]
    fn test_generate_float_range() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let value = generate_float_range(&mut rng, 0.0, 100.0);
            assert!((0.0..=100.0).contains(&value));
        }
    }

    #[test]
    fn test_generate_number_matches_type() {
        let mut rng = StdRng::seed_from_u64(42);
        assert!(matches!(
            generate_number(&mut rng, &DeclaredType::UInt16),
            Some(Value::UInt16(_))
        ));
        assert!(matches!(
            generate_number(&mut rng, &DeclaredType::Float32),
            Some(Value::Float32(_))
        ));
        assert_eq!(generate_number(&mut rng, &DeclaredType::String), None);
    }

    #[test]
    fn test_integer_value_narrowing() {
        assert_eq!(
            integer_value(42, &DeclaredType::Int8),
            Some(Value::Int8(42))
        );
        assert_eq!(integer_value(300, &DeclaredType::UInt8), None);
        assert_eq!(integer_value(-1, &DeclaredType::UInt64), None);
        assert_eq!(integer_value(1, &DeclaredType::Bool), None);
    }
}
