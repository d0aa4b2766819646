//! Pattern-based string producer.
//!
//! Supports placeholders:
//! - `{uuid}` - random UUID
//! - `{rand:N}` - random N-digit number, N at most [`MAX_RAND_DIGITS`]

use super::uuid::random_uuid;
use rand::Rng;

/// Largest digit count accepted by a `{rand:N}` placeholder.
pub const MAX_RAND_DIGITS: usize = 19;

/// Reject `{rand:N}` placeholders asking for more than [`MAX_RAND_DIGITS`] digits.
pub fn check_pattern(pattern: &str) -> Result<(), String> {
    let mut rest = pattern;
    while let Some(found) = rest.find("{rand:") {
        let after = &rest[found + 6..];
        let Some(end) = after.find('}') else {
            break;
        };
        let digits = &after[..end];
        if !digits.is_empty()
            && digits.bytes().all(|b| b.is_ascii_digit())
            && digits.parse::<usize>().map_or(true, |n| n > MAX_RAND_DIGITS)
        {
            return Err(format!(
                "{{rand:{digits}}} exceeds {MAX_RAND_DIGITS} digits"
            ));
        }
        rest = &after[end + 1..];
    }
    Ok(())
}

/// Generate a string based on a pattern with placeholders.
pub fn generate_pattern<R: Rng>(pattern: &str, rng: &mut R) -> String {
    let mut result = pattern.to_string();

    while result.contains("{uuid}") {
        result = result.replacen("{uuid}", &random_uuid(rng).to_string(), 1);
    }

    // Unparseable or oversized {rand:...} placeholders are left as they are
    let mut search_from = 0;
    while let Some(found) = result[search_from..].find("{rand:") {
        let start = search_from + found;
        let Some(len) = result[start..].find('}') else {
            break;
        };
        let end = start + len;
        match result[start + 6..end].parse::<usize>() {
            Ok(digits) if digits <= MAX_RAND_DIGITS => {
                let random_num = generate_random_digits(rng, digits);
                result = format!("{}{}{}", &result[..start], random_num, &result[end + 1..]);
                search_from = start + random_num.len();
            }
            _ => search_from = end + 1,
        }
    }

    result
}

/// Generate a random number with exactly N digits.
fn generate_random_digits<R: Rng>(rng: &mut R, digits: usize) -> String {
    if digits == 0 {
        return String::new();
    }

    let mut result = String::with_capacity(digits);

    // First digit should be 1-9 to avoid leading zeros
    result.push(char::from(b'0' + rng.random_range(1..10u8)));

    for _ in 1..digits {
        result.push(char::from(b'0' + rng.random_range(0..10u8)));
    }

    result
}
