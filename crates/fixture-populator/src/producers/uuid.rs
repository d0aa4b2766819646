//! UUID value producer.

use fixture_core::Value;
use rand::Rng;
use uuid::Uuid;

/// Generate a random UUID v4 using the provided RNG.
pub fn generate_uuid_v4<R: Rng>(rng: &mut R) -> Value {
    Value::Uuid(random_uuid(rng))
}

/// Random UUID v4 drawn from the provided RNG.
pub fn random_uuid<R: Rng>(rng: &mut R) -> Uuid {
    let mut bytes = [0u8; 16];
    rng.fill(&mut bytes[..]);
    uuid::Builder::from_random_bytes(bytes).into_uuid()
}
