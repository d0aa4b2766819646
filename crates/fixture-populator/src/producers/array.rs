//! Sampling producers.

use super::text::generate_length;
use fixture_core::Value;
use rand::Rng;

/// Generate a list by sampling from a pool of values, with repetition.
///
/// An empty pool or a zero maximum length yields an empty list.
pub fn generate_sample_array<R: Rng>(
    rng: &mut R,
    pool: &[Value],
    min_length: usize,
    max_length: usize,
) -> Vec<Value> {
    if pool.is_empty() || max_length == 0 {
        return Vec::new();
    }

    let length = generate_length(rng, min_length, max_length);
    (0..length)
        .map(|_| pool[rng.random_range(0..pool.len())].clone())
        .collect()
}

/// Pick one value of a pool uniformly; `Null` when the pool is empty.
pub fn generate_one_of<R: Rng>(rng: &mut R, pool: &[Value]) -> Value {
    if pool.is_empty() {
        return Value::Null;
    }
    pool[rng.random_range(0..pool.len())].clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pool() -> Vec<Value> {
        vec![Value::from("a"), Value::from("b"), Value::from("c")]
    }

    #[test]
    fn test_generate_sample_array() {
        let mut rng = StdRng::seed_from_u64(42);
        let pool = pool();

        for _ in 0..50 {
            let items = generate_sample_array(&mut rng, &pool, 1, 4);
            assert!((1..=4).contains(&items.len()));
            assert!(items.iter().all(|item| pool.contains(item)));
        }
    }

    #[test]
    fn test_empty_pool() {
        let mut rng = StdRng::seed_from_u64(42);
        assert!(generate_sample_array(&mut rng, &[], 1, 4).is_empty());
        assert_eq!(generate_one_of(&mut rng, &[]), Value::Null);
    }

    #[test]
    fn test_generate_one_of() {
        let mut rng = StdRng::seed_from_u64(42);
        let pool = pool();
        for _ in 0..20 {
            assert!(pool.contains(&generate_one_of(&mut rng, &pool)));
        }
    }
}
