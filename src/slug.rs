//! Deterministic slug derivation from a human-readable query name.
//!
//! The generated slug is a proposal: callers may overwrite it freely, and
//! global uniqueness is enforced by the store, not here.

use std::time::{SystemTime, UNIX_EPOCH};

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SLUG_LEN: usize = 8;

/// 31-bit mask keeps the accumulator non-negative on platforms with
/// fixed-width signed integers.
const MASK: u64 = 0x7fff_ffff;

/// Derive an 8-character base-36 slug from `name`.
///
/// Identical input always yields identical output; distinct inputs are
/// overwhelmingly likely (not guaranteed) to differ. An empty or
/// whitespace-only name cannot seed the hash, so it falls back to a
/// time-based value instead.
pub fn generate_slug(name: &str) -> String {
    if name.trim().is_empty() {
        return time_based_slug();
    }

    // Polynomial rolling hash over the code points, seeded by length.
    let mut acc: u64 = name.len() as u64 + 1000;
    for ch in name.chars() {
        acc = (acc.wrapping_mul(31) + ch as u64) & MASK;
    }

    // 8 rounds of a linear congruential generator, one base-36 digit each.
    let mut x = acc;
    let mut slug = String::with_capacity(SLUG_LEN);
    for _ in 0..SLUG_LEN {
        x = (x.wrapping_mul(1_664_525) + 1_013_904_223) & MASK;
        slug.push(BASE36[(x % 36) as usize] as char);
    }
    slug
}

/// Non-deterministic escape hatch for empty names: current time in millis,
/// rendered base-36 and trimmed/padded to 8 characters.
fn time_based_slug() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64;

    let mut digits = Vec::with_capacity(SLUG_LEN);
    let mut rest = millis;
    while rest > 0 {
        digits.push(BASE36[(rest % 36) as usize]);
        rest /= 36;
    }
    while digits.len() < SLUG_LEN {
        digits.push(b'0');
    }
    digits.truncate(SLUG_LEN);
    digits.reverse();
    String::from_utf8(digits).unwrap_or_else(|_| "0".repeat(SLUG_LEN))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Identical input must always yield identical output
    #[test]
    fn test_slug_deterministic() {
        for name in ["Daily Report", "a", "Ünïcode name", "x".repeat(500).as_str()] {
            assert_eq!(
                generate_slug(name),
                generate_slug(name),
                "slug for {:?} should be stable",
                name
            );
        }
    }

    #[test]
    fn test_slug_shape() {
        let slug = generate_slug("Daily Report");
        assert_eq!(slug.len(), 8, "slug should be 8 characters");
        assert!(
            slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()),
            "slug {:?} should be lowercase base-36",
            slug
        );
    }

    #[test]
    fn test_distinct_names_usually_differ() {
        assert_ne!(generate_slug("Daily Report"), generate_slug("Weekly Report"));
        assert_ne!(generate_slug("orders"), generate_slug("orders2"));
    }

    /// Empty and whitespace names take the time-based fallback, which still
    /// produces a well-formed 8-character base-36 value
    #[test]
    fn test_empty_name_fallback_shape() {
        for name in ["", "   ", "\t\n"] {
            let slug = generate_slug(name);
            assert_eq!(slug.len(), 8);
            assert!(slug
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
        }
    }
}
