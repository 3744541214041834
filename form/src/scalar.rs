//! Text-to-scalar parsing used by the converter.

use chrono::{DateTime, Utc};

/// Parses a signed 64-bit integer, picking the radix from its prefix:
/// `0x` hexadecimal, `0o` or a bare leading `0` octal, `0b` binary,
/// decimal otherwise. An optional sign comes before the prefix.
#[must_use]
pub fn parse_i64_auto(input: &str) -> Option<i64> {
    let (sign, unsigned) = match input.as_bytes().first() {
        Some(b'-') => ("-", input.get(1..)?),
        Some(b'+') => ("", input.get(1..)?),
        _ => ("", input),
    };

    let (radix, digits) = split_radix(unsigned);
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }

    i64::from_str_radix(&format!("{sign}{digits}"), radix).ok()
}

fn split_radix(unsigned: &str) -> (u32, &str) {
    let lower = unsigned.get(..2).map(str::to_ascii_lowercase);
    match lower.as_deref() {
        Some("0x") => (16, unsigned.get(2..).unwrap_or_default()),
        Some("0o") => (8, unsigned.get(2..).unwrap_or_default()),
        Some("0b") => (2, unsigned.get(2..).unwrap_or_default()),
        _ if unsigned.len() > 1 && unsigned.starts_with('0') => {
            (8, unsigned.get(1..).unwrap_or_default())
        }
        _ => (10, unsigned),
    }
}

/// Parses a 32-bit float. Finite input that overflows `f32` is rejected
/// instead of silently becoming infinity.
#[must_use]
pub fn parse_f32(input: &str) -> Option<f32> {
    let value: f32 = input.parse().ok()?;
    if value.is_infinite() && !names_infinity(input) {
        return None;
    }
    Some(value)
}

fn names_infinity(input: &str) -> bool {
    let unsigned = input.trim_start_matches(['+', '-']);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

/// Parses the exact literals `true` and `false`.
#[must_use]
pub fn parse_bool_strict(input: &str) -> Option<bool> {
    match input {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Parses an RFC 3339 timestamp and normalizes it to UTC.
///
/// Only the canonical form is accepted: an uppercase `T` between date and
/// time and an uppercase `Z` for UTC.
#[must_use]
pub fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
    if input.as_bytes().get(10) != Some(&b'T') || input.contains(['t', 'z']) {
        return None;
    }
    DateTime::parse_from_rfc3339(input)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_i64_decimal() {
        assert_eq!(parse_i64_auto("42"), Some(42));
        assert_eq!(parse_i64_auto("-42"), Some(-42));
        assert_eq!(parse_i64_auto("+7"), Some(7));
        assert_eq!(parse_i64_auto("0"), Some(0));
        assert_eq!(parse_i64_auto("-0"), Some(0));
    }

    #[test]
    fn test_parse_i64_prefixes() {
        assert_eq!(parse_i64_auto("0x1F"), Some(31));
        assert_eq!(parse_i64_auto("0X1f"), Some(31));
        assert_eq!(parse_i64_auto("-0x10"), Some(-16));
        assert_eq!(parse_i64_auto("0o17"), Some(15));
        assert_eq!(parse_i64_auto("017"), Some(15));
        assert_eq!(parse_i64_auto("0b101"), Some(5));
    }

    #[test]
    fn test_parse_i64_bounds() {
        assert_eq!(parse_i64_auto("9223372036854775807"), Some(i64::MAX));
        assert_eq!(parse_i64_auto("-9223372036854775808"), Some(i64::MIN));
        assert_eq!(parse_i64_auto("9223372036854775808"), None);
        assert_eq!(parse_i64_auto("-0x8000000000000000"), Some(i64::MIN));
    }

    #[test]
    fn test_parse_i64_rejects_garbage() {
        assert_eq!(parse_i64_auto(""), None);
        assert_eq!(parse_i64_auto("-"), None);
        assert_eq!(parse_i64_auto("0x"), None);
        assert_eq!(parse_i64_auto("0x+5"), None);
        assert_eq!(parse_i64_auto("--5"), None);
        assert_eq!(parse_i64_auto("08"), None);
        assert_eq!(parse_i64_auto("2nd"), None);
        assert_eq!(parse_i64_auto(" 1"), None);
        assert_eq!(parse_i64_auto("1.5"), None);
    }

    #[test]
    fn test_parse_f32() {
        assert_eq!(parse_f32("1.5"), Some(1.5));
        assert_eq!(parse_f32("-2"), Some(-2.0));
        assert_eq!(parse_f32("1e3"), Some(1000.0));
        assert_eq!(parse_f32("inf"), Some(f32::INFINITY));
        assert_eq!(parse_f32("1e40"), None);
        assert_eq!(parse_f32("abc"), None);
        assert_eq!(parse_f32(""), None);
    }

    #[test]
    fn test_parse_bool_strict() {
        assert_eq!(parse_bool_strict("true"), Some(true));
        assert_eq!(parse_bool_strict("false"), Some(false));
        assert_eq!(parse_bool_strict("True"), None);
        assert_eq!(parse_bool_strict("1"), None);
        assert_eq!(parse_bool_strict("maybe"), None);
    }

    #[test]
    fn test_parse_timestamp() {
        let ts = parse_timestamp("2015-05-28T21:00:00Z").unwrap();
        assert_eq!(ts.timestamp(), 1_432_846_800);

        let shifted = parse_timestamp("2015-05-28T23:00:00+02:00").unwrap();
        assert_eq!(shifted, ts);

        assert!(parse_timestamp("2015-05-28T21:00:00.5Z").is_some());
        assert!(parse_timestamp("2015-05-28").is_none());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_parse_timestamp_rejects_relaxed_forms() {
        assert!(parse_timestamp("2015-05-28 21:00:00Z").is_none());
        assert!(parse_timestamp("2015-05-28t21:00:00z").is_none());
        assert!(parse_timestamp("2015-05-28T21:00:00z").is_none());
        assert!(parse_timestamp("2015-05-28t21:00:00Z").is_none());
    }
}
