//! # Typed Coercers
//!
//! One pure function per schema variant, turning a raw environment string
//! into a [`TypedValue`] or a [`Rejection`]. Coercers are total: malformed
//! input is always reported as a rejection, never as a panic.
//!
//! ## Numeric Grammar
//!
//! Numbers are read with the ECMAScript string-to-number grammar that the
//! frontend toolchains sharing these env files use, not `f64::from_str`:
//! surrounding whitespace is ignored, unsigned `0x`/`0o`/`0b` literals are
//! accepted, `Infinity` parses (and is then rejected as non-finite), and
//! spellings such as `inf` or `nan` are not numbers at all.
//!
//! ## Lengths
//!
//! Length bounds count UTF-16 code units, so `"é"` has length 1 and an emoji
//! outside the BMP has length 2.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};
use url::Url;

use crate::error::Rejection;
use crate::pattern::Pattern;
use crate::value::TypedValue;

/// Result of coercing one raw value.
pub type Outcome = Result<TypedValue, Rejection>;

/// Non-empty after trimming whitespace. Keeps the untrimmed value.
pub fn string(raw: &str) -> Outcome {
    if trim_space(raw).is_empty() {
        return Err(Rejection::new("Must be a non-empty string"));
    }
    Ok(TypedValue::String(raw.to_string()))
}

/// An absolute URL: parses as a WHATWG URL with a scheme and an authority.
pub fn url(raw: &str) -> Outcome {
    match Url::parse(raw) {
        Ok(u) if u.has_authority() => Ok(TypedValue::String(raw.to_string())),
        _ => Err(Rejection::new("Invalid URL")),
    }
}

/// `local@domain`, no whitespace, and a dot inside the domain part.
pub fn email(raw: &str) -> Outcome {
    if is_email(raw) {
        Ok(TypedValue::String(raw.to_string()))
    } else {
        Err(Rejection::new("Invalid email"))
    }
}

/// Canonical 8-4-4-4-12 hexadecimal grouping, case-insensitive.
pub fn uuid(raw: &str) -> Outcome {
    if is_canonical_uuid(raw) {
        Ok(TypedValue::String(raw.to_string()))
    } else {
        Err(Rejection::new("Invalid UUID"))
    }
}

/// Strict dotted-quad IPv4, falling back to colon-grouped IPv6.
///
/// A value with dotted-quad shape is judged as IPv4 only: `999.999.999.999`
/// is an invalid IPv4 address, not a candidate for the IPv6 check.
pub fn ip(raw: &str) -> Outcome {
    if let Some(octets) = dotted_quad(raw) {
        return if octets.iter().all(|o| is_canonical_octet(o)) {
            Ok(TypedValue::String(raw.to_string()))
        } else {
            Err(Rejection::new("Invalid IPv4 address"))
        };
    }
    if is_ipv6_grouping(raw) {
        Ok(TypedValue::String(raw.to_string()))
    } else {
        Err(Rejection::new("Invalid IP address"))
    }
}

/// `YYYY-MM-DDTHH:MM:SS[.mmm][Z]` that is also a real calendar instant.
pub fn datetime(raw: &str) -> Outcome {
    let valid = has_iso_datetime_shape(raw) && parse_iso_datetime(raw).is_some();
    if valid {
        Ok(TypedValue::String(raw.to_string()))
    } else {
        Err(Rejection::new("Invalid datetime (ISO 8601)"))
    }
}

/// Any recognizable calendar date or date-time. Produces a UTC instant.
pub fn date(raw: &str) -> Outcome {
    parse_loose_date(raw)
        .map(TypedValue::Date)
        .ok_or_else(|| Rejection::new("Invalid date"))
}

/// A finite number; empty and whitespace-only input are rejected.
pub fn number(raw: &str) -> Outcome {
    finite_number(raw)
        .map(TypedValue::Number)
        .ok_or_else(|| Rejection::new("Invalid number"))
}

/// A finite number with no fractional part.
pub fn integer(raw: &str) -> Outcome {
    finite_number(raw)
        .filter(|n| n.fract() == 0.0)
        .map(TypedValue::Number)
        .ok_or_else(|| Rejection::new("Invalid integer"))
}

/// A finite number strictly greater than zero.
pub fn positive_number(raw: &str) -> Outcome {
    finite_number(raw)
        .filter(|n| *n > 0.0)
        .map(TypedValue::Number)
        .ok_or_else(|| Rejection::new("Must be a positive number"))
}

/// A finite number strictly less than zero.
pub fn negative_number(raw: &str) -> Outcome {
    finite_number(raw)
        .filter(|n| *n < 0.0)
        .map(TypedValue::Number)
        .ok_or_else(|| Rejection::new("Must be a negative number"))
}

/// `true`/`1` and `false`/`0`, ignoring case and surrounding whitespace.
///
/// The exact empty string is read as `false`, so `DEBUG=` in an env file
/// means off. Whitespace-only values are rejected.
pub fn boolean(raw: &str) -> Outcome {
    match trim_space(raw).to_lowercase().as_str() {
        "true" | "1" => Ok(TypedValue::Boolean(true)),
        "false" | "0" => Ok(TypedValue::Boolean(false)),
        _ if raw.is_empty() => Ok(TypedValue::Boolean(false)),
        _ => Err(Rejection::new(
            r#"Invalid boolean (use "true", "false", "1", or "0")"#,
        )),
    }
}

/// At least `min` UTF-16 code units.
pub fn min_length(min: usize, raw: &str) -> Outcome {
    if utf16_len(raw) >= min {
        Ok(TypedValue::String(raw.to_string()))
    } else {
        Err(Rejection::new(format!("Must be at least {min} characters")))
    }
}

/// At most `max` UTF-16 code units.
pub fn max_length(max: usize, raw: &str) -> Outcome {
    if utf16_len(raw) <= max {
        Ok(TypedValue::String(raw.to_string()))
    } else {
        Err(Rejection::new(format!("Must be at most {max} characters")))
    }
}

/// Exactly `len` UTF-16 code units.
pub fn length(len: usize, raw: &str) -> Outcome {
    if utf16_len(raw) == len {
        Ok(TypedValue::String(raw.to_string()))
    } else {
        Err(Rejection::new(format!("Must be exactly {len} characters")))
    }
}

/// Matches `pattern`; no anchoring beyond what the pattern itself states.
pub fn regex(pattern: &Pattern, raw: &str) -> Outcome {
    if pattern.is_match(raw) {
        Ok(TypedValue::String(raw.to_string()))
    } else {
        Err(Rejection::new("Value does not match pattern"))
    }
}

/// A finite number `>= min`.
pub fn min_number(min: f64, raw: &str) -> Outcome {
    finite_number(raw)
        .filter(|n| *n >= min)
        .map(TypedValue::Number)
        .ok_or_else(|| Rejection::new(format!("Must be at least {}", TypedValue::Number(min))))
}

/// A finite number `<= max`.
pub fn max_number(max: f64, raw: &str) -> Outcome {
    finite_number(raw)
        .filter(|n| *n <= max)
        .map(TypedValue::Number)
        .ok_or_else(|| Rejection::new(format!("Must be at most {}", TypedValue::Number(max))))
}

/// Exactly one of `options`, compared case-sensitively.
pub fn one_of(options: &[String], raw: &str) -> Outcome {
    if options.iter().any(|o| o == raw) {
        Ok(TypedValue::String(raw.to_string()))
    } else {
        Err(Rejection::new(format!(
            "Must be one of: {}",
            options.join(", ")
        )))
    }
}

// ---------------------------------------------------------------------------
// Numbers
// ---------------------------------------------------------------------------

/// Trims Unicode whitespace and the byte-order mark.
fn trim_space(raw: &str) -> &str {
    raw.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

fn finite_number(raw: &str) -> Option<f64> {
    let s = trim_space(raw);
    if s.is_empty() {
        return None;
    }
    parse_number_literal(s).filter(|n| n.is_finite())
}

/// Parse a trimmed, non-empty string. `None` stands for not-a-number.
fn parse_number_literal(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    if bytes.len() > 2 && bytes[0] == b'0' {
        let radix = match bytes[1] {
            b'x' | b'X' => Some(16),
            b'o' | b'O' => Some(8),
            b'b' | b'B' => Some(2),
            _ => None,
        };
        if let Some(radix) = radix {
            return parse_radix_digits(&s[2..], radix);
        }
    }
    match s {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }
    if !is_decimal_literal(bytes) {
        return None;
    }
    s.parse::<f64>().ok()
}

fn parse_radix_digits(digits: &str, radix: u32) -> Option<f64> {
    digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix)
            .map(|d| acc * f64::from(radix) + f64::from(d))
    })
}

/// `[+-]? (digits [. digits?] | . digits) ([eE] [+-]? digits)?`
fn is_decimal_literal(b: &[u8]) -> bool {
    let mut i = 0;
    if matches!(b.first(), Some(b'+' | b'-')) {
        i = 1;
    }
    let int_digits = count_digits(&b[i..]);
    i += int_digits;
    let mut frac_digits = 0;
    if b.get(i) == Some(&b'.') {
        i += 1;
        frac_digits = count_digits(&b[i..]);
        i += frac_digits;
    }
    if int_digits == 0 && frac_digits == 0 {
        return false;
    }
    if matches!(b.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(b.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let exp_digits = count_digits(&b[i..]);
        if exp_digits == 0 {
            return false;
        }
        i += exp_digits;
    }
    i == b.len()
}

fn count_digits(b: &[u8]) -> usize {
    b.iter().take_while(|c| c.is_ascii_digit()).count()
}

fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}

// ---------------------------------------------------------------------------
// Shapes
// ---------------------------------------------------------------------------

/// Compiled check for `^[^\s@]+@[^\s@]+\.[^\s@]+$`.
fn is_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    // A dot with at least one character on each side.
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

fn is_canonical_uuid(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() != 36 {
        return false;
    }
    bytes.iter().enumerate().all(|(i, b)| match i {
        8 | 13 | 18 | 23 => *b == b'-',
        _ => b.is_ascii_hexdigit(),
    })
}

/// Splits `s` into four segments of one to three ASCII digits, or `None`
/// if it does not have dotted-quad shape.
fn dotted_quad(s: &str) -> Option<Vec<&str>> {
    let parts: Vec<&str> = s.split('.').collect();
    let shaped = parts.len() == 4
        && parts
            .iter()
            .all(|p| (1..=3).contains(&p.len()) && p.bytes().all(|b| b.is_ascii_digit()));
    shaped.then_some(parts)
}

/// In range and round-trips through its integer form (`"01"` does not).
fn is_canonical_octet(part: &str) -> bool {
    match part.parse::<u16>() {
        Ok(n) => n <= 255 && n.to_string() == part,
        Err(_) => false,
    }
}

/// Compiled check for `^([0-9a-fA-F]{0,4}:){2,7}[0-9a-fA-F]{0,4}$`.
fn is_ipv6_grouping(s: &str) -> bool {
    let groups: Vec<&str> = s.split(':').collect();
    let colons = groups.len() - 1;
    (2..=7).contains(&colons)
        && groups
            .iter()
            .all(|g| g.len() <= 4 && g.bytes().all(|b| b.is_ascii_hexdigit()))
}

/// Compiled check for `^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d{3})?Z?$`.
fn has_iso_datetime_shape(s: &str) -> bool {
    const TEMPLATE: &[u8] = b"dddd-dd-ddTdd:dd:dd";
    let b = s.as_bytes();
    if b.len() < TEMPLATE.len() {
        return false;
    }
    let head_ok = TEMPLATE.iter().zip(b).all(|(t, c)| match t {
        b'd' => c.is_ascii_digit(),
        other => other == c,
    });
    if !head_ok {
        return false;
    }
    let mut rest = &b[TEMPLATE.len()..];
    if rest.first() == Some(&b'.') {
        if rest.len() < 4 || !rest[1..4].iter().all(u8::is_ascii_digit) {
            return false;
        }
        rest = &rest[4..];
    }
    rest.is_empty() || rest == b"Z"
}

/// Zone-less and `Z`-suffixed ISO date-times, read as UTC. Leap seconds
/// are not real instants and are rejected.
fn parse_iso_datetime(s: &str) -> Option<DateTime<Utc>> {
    let naive = s.strip_suffix('Z').unwrap_or(s);
    let dt = NaiveDateTime::parse_from_str(naive, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    if dt.nanosecond() >= 1_000_000_000 {
        return None;
    }
    Some(dt.and_utc())
}

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%B %d, %Y", "%b %d, %Y"];

/// Accepts RFC 3339, RFC 2822, ISO-like date-times with or without `Z`,
/// bare dates in common layouts, `YYYY-MM`, and `YYYY`.
fn parse_loose_date(raw: &str) -> Option<DateTime<Utc>> {
    let s = trim_space(raw);
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    let naive = s.strip_suffix('Z').unwrap_or(s);
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, fmt) {
            return Some(dt.and_utc());
        }
    }
    for fmt in NAIVE_DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }
    parse_year_month(s)
}

/// `YYYY` or `YYYY-MM`, pinned to the first day.
fn parse_year_month(s: &str) -> Option<DateTime<Utc>> {
    let b = s.as_bytes();
    let (year, month) = match b.len() {
        4 => (s, "01"),
        7 if b[4] == b'-' => (&s[..4], &s[5..]),
        _ => return None,
    };
    if !year.bytes().chain(month.bytes()).all(|c| c.is_ascii_digit()) {
        return None;
    }
    let d = NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)?;
    d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Coercers never panic on arbitrary input.
        #[test]
        fn coercers_are_total(raw in ".*") {
            let _ = string(&raw);
            let _ = url(&raw);
            let _ = email(&raw);
            let _ = uuid(&raw);
            let _ = ip(&raw);
            let _ = datetime(&raw);
            let _ = date(&raw);
            let _ = number(&raw);
            let _ = integer(&raw);
            let _ = boolean(&raw);
        }

        /// Identical input always yields an identical outcome.
        #[test]
        fn coercers_are_pure(raw in ".{0,40}") {
            prop_assert_eq!(number(&raw), number(&raw));
            prop_assert_eq!(ip(&raw), ip(&raw));
            prop_assert_eq!(date(&raw), date(&raw));
            prop_assert_eq!(boolean(&raw), boolean(&raw));
        }

        /// Every i64 in the exactly-representable range is an integer.
        #[test]
        fn integers_round_trip(n in -(1i64 << 52)..(1i64 << 52)) {
            prop_assert_eq!(integer(&n.to_string()), Ok(TypedValue::Number(n as f64)));
        }

        /// `integer` succeeds exactly when `number` does with no fraction.
        #[test]
        fn integer_refines_number(raw in "[-+0-9.eE ]{0,12}") {
            let expected = matches!(number(&raw), Ok(TypedValue::Number(n)) if n.fract() == 0.0);
            prop_assert_eq!(integer(&raw).is_ok(), expected);
        }

        /// Anything outside the boolean vocabulary is rejected.
        #[test]
        fn boolean_rejects_other_words(raw in "[a-z]{2,8}") {
            prop_assume!(raw != "true" && raw != "false");
            prop_assert!(boolean(&raw).is_err());
        }

        /// Valid octets always pass the IPv4 check.
        #[test]
        fn dotted_quads_in_range_pass(a in any::<u8>(), b in any::<u8>(), c in any::<u8>(), d in any::<u8>()) {
            let addr = format!("{a}.{b}.{c}.{d}");
            prop_assert!(ip(&addr).is_ok());
        }
    }
}
