//! String, char and byte producers.

use rand::Rng;

/// Generate a string of `min_length..=max_length` characters drawn from `alphabet`.
///
/// An empty alphabet yields an empty string.
pub fn generate_string<R: Rng>(
    rng: &mut R,
    alphabet: &[char],
    min_length: usize,
    max_length: usize,
) -> String {
    if alphabet.is_empty() {
        return String::new();
    }
    let length = generate_length(rng, min_length, max_length);
    (0..length)
        .map(|_| alphabet[rng.random_range(0..alphabet.len())])
        .collect()
}

/// Generate a single character drawn from `alphabet`.
pub fn generate_char<R: Rng>(rng: &mut R, alphabet: &[char]) -> Option<char> {
    if alphabet.is_empty() {
        return None;
    }
    Some(alphabet[rng.random_range(0..alphabet.len())])
}

/// Generate `min_length..=max_length` random bytes.
pub fn generate_bytes<R: Rng>(rng: &mut R, min_length: usize, max_length: usize) -> Vec<u8> {
    let length = generate_length(rng, min_length, max_length);
    let mut bytes = vec![0u8; length];
    rng.fill(&mut bytes[..]);
    bytes
}

/// Pick a length in the inclusive range, tolerating `min > max`.
pub fn generate_length<R: Rng>(rng: &mut R, min_length: usize, max_length: usize) -> usize {
    if min_length >= max_length {
        return min_length;
    }
    rng.random_range(min_length..=max_length)
}
