//! Enumeration value producer.

use fixture_core::Value;
use rand::Rng;

/// Pick one of the enumeration's values uniformly; `Null` when it has none.
pub fn generate_enum<R: Rng>(rng: &mut R, values: &[String]) -> Value {
    if values.is_empty() {
        return Value::Null;
    }
    let idx = rng.random_range(0..values.len());
    Value::Enum(values[idx].clone())
}
