//! # Variant Registry
//!
//! The closed set of schema variants. [`VariantTag`] names a variant;
//! [`Variant`] is a tag together with its parameter payload, ready to
//! coerce values. Dispatch is an exhaustive `match`, so adding a tag
//! without wiring up its coercer fails to compile.
//!
//! | Tag | Parameters | Produces |
//! |-----|------------|----------|
//! | `string` | none | text |
//! | `url` | none | text |
//! | `email` | none | text |
//! | `uuid` | none | text |
//! | `ip` | none | text |
//! | `datetime` | none | text |
//! | `date` | none | instant |
//! | `number` | none | number |
//! | `integer` | none | number |
//! | `positiveNumber` | none | number |
//! | `negativeNumber` | none | number |
//! | `boolean` | none | flag |
//! | `minLength` | length | text |
//! | `maxLength` | length | text |
//! | `length` | length | text |
//! | `regex` | pattern | text |
//! | `minNumber` | bound | number |
//! | `maxNumber` | bound | number |
//! | `enum` | list of strings | text |
//!
//! The registry is static data; lookups are read-only and safe from any thread.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::coerce::{self, Outcome};
use crate::error::VariantError;
use crate::pattern::Pattern;

/// Identifier of a schema variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VariantTag {
    /// Non-blank text.
    String,
    /// Absolute URL.
    Url,
    /// Pragmatic `local@domain.tld` address.
    Email,
    /// Canonical hyphenated UUID.
    Uuid,
    /// IPv4 dotted quad or IPv6 colon groups.
    Ip,
    /// Strict ISO 8601 date-time.
    Datetime,
    /// Any recognizable calendar date.
    Date,
    /// Finite number.
    Number,
    /// Finite number without fraction.
    Integer,
    /// Number greater than zero.
    PositiveNumber,
    /// Number less than zero.
    NegativeNumber,
    /// `true`/`false`/`1`/`0`.
    Boolean,
    /// Text with a minimum length.
    MinLength,
    /// Text with a maximum length.
    MaxLength,
    /// Text with an exact length.
    Length,
    /// Text matching a pattern.
    Regex,
    /// Number with a lower bound.
    MinNumber,
    /// Number with an upper bound.
    MaxNumber,
    /// One of a fixed set of strings.
    Enum,
}

/// Total number of registered variants.
pub const VARIANT_COUNT: usize = 19;

impl VariantTag {
    /// Returns every tag in registry order.
    pub fn all() -> &'static [VariantTag] {
        &[
            Self::String,
            Self::Url,
            Self::Email,
            Self::Uuid,
            Self::Ip,
            Self::Datetime,
            Self::Date,
            Self::Number,
            Self::Integer,
            Self::PositiveNumber,
            Self::NegativeNumber,
            Self::Boolean,
            Self::MinLength,
            Self::MaxLength,
            Self::Length,
            Self::Regex,
            Self::MinNumber,
            Self::MaxNumber,
            Self::Enum,
        ]
    }

    /// The canonical identifier used in schema files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Url => "url",
            Self::Email => "email",
            Self::Uuid => "uuid",
            Self::Ip => "ip",
            Self::Datetime => "datetime",
            Self::Date => "date",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::PositiveNumber => "positiveNumber",
            Self::NegativeNumber => "negativeNumber",
            Self::Boolean => "boolean",
            Self::MinLength => "minLength",
            Self::MaxLength => "maxLength",
            Self::Length => "length",
            Self::Regex => "regex",
            Self::MinNumber => "minNumber",
            Self::MaxNumber => "maxNumber",
            Self::Enum => "enum",
        }
    }

    /// The parameter shape a factory tag expects, or `None` for bare tags.
    pub fn param_shape(&self) -> Option<&'static str> {
        match self {
            Self::MinLength | Self::MaxLength | Self::Length => Some("a non-negative integer length"),
            Self::Regex => Some("a regex pattern"),
            Self::MinNumber | Self::MaxNumber => Some("a finite number"),
            Self::Enum => Some("a list of allowed strings"),
            Self::String
            | Self::Url
            | Self::Email
            | Self::Uuid
            | Self::Ip
            | Self::Datetime
            | Self::Date
            | Self::Number
            | Self::Integer
            | Self::PositiveNumber
            | Self::NegativeNumber
            | Self::Boolean => None,
        }
    }

    /// Whether this tag is a factory that needs parameters.
    pub fn is_parameterized(&self) -> bool {
        self.param_shape().is_some()
    }
}

impl fmt::Display for VariantTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VariantTag {
    type Err = VariantError;

    /// Accepts the canonical camelCase identifier and its kebab-case
    /// spelling (`minLength` or `min-length`). Matching is case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Self::String),
            "url" => Ok(Self::Url),
            "email" => Ok(Self::Email),
            "uuid" => Ok(Self::Uuid),
            "ip" => Ok(Self::Ip),
            "datetime" => Ok(Self::Datetime),
            "date" => Ok(Self::Date),
            "number" => Ok(Self::Number),
            "integer" => Ok(Self::Integer),
            "positiveNumber" | "positive-number" => Ok(Self::PositiveNumber),
            "negativeNumber" | "negative-number" => Ok(Self::NegativeNumber),
            "boolean" => Ok(Self::Boolean),
            "minLength" | "min-length" => Ok(Self::MinLength),
            "maxLength" | "max-length" => Ok(Self::MaxLength),
            "length" => Ok(Self::Length),
            "regex" => Ok(Self::Regex),
            "minNumber" | "min-number" => Ok(Self::MinNumber),
            "maxNumber" | "max-number" => Ok(Self::MaxNumber),
            "enum" => Ok(Self::Enum),
            other => Err(VariantError::UnknownVariant(other.to_string())),
        }
    }
}

/// Parameters attached to a factory tag in a schema entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Params {
    /// A length or numeric bound.
    Number(f64),
    /// A pattern source, compiled when the variant is built.
    Text(String),
    /// The allowed values of an `enum`.
    List(Vec<String>),
    /// An already-compiled pattern.
    Pattern(Pattern),
}

impl<'de> Deserialize<'de> for Params {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
            List(Vec<String>),
        }

        Raw::deserialize(deserializer).map(|raw| match raw {
            Raw::Number(n) => Params::Number(n),
            Raw::Text(s) => Params::Text(s),
            Raw::List(v) => Params::List(v),
        })
    }
}

impl From<f64> for Params {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<usize> for Params {
    fn from(n: usize) -> Self {
        Self::Number(n as f64)
    }
}

impl From<&str> for Params {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<Vec<String>> for Params {
    fn from(v: Vec<String>) -> Self {
        Self::List(v)
    }
}

impl From<Vec<&str>> for Params {
    fn from(v: Vec<&str>) -> Self {
        Self::List(v.into_iter().map(str::to_string).collect())
    }
}

impl From<Pattern> for Params {
    fn from(p: Pattern) -> Self {
        Self::Pattern(p)
    }
}

impl From<regex::Regex> for Params {
    fn from(r: regex::Regex) -> Self {
        Self::Pattern(Pattern::from(r))
    }
}

/// A schema variant with its parameters bound.
#[derive(Debug, Clone, PartialEq)]
pub enum Variant {
    /// Non-blank text, kept as supplied.
    String,
    /// Absolute URL with a scheme.
    Url,
    /// `local@domain.tld` address.
    Email,
    /// Hyphenated UUID, any version.
    Uuid,
    /// IPv4 or IPv6 address.
    Ip,
    /// ISO 8601 date-time, normalized to UTC.
    Datetime,
    /// Calendar date in any recognized layout.
    Date,
    /// Finite number.
    Number,
    /// Finite number with no fractional part.
    Integer,
    /// Number strictly above zero.
    PositiveNumber,
    /// Number strictly below zero.
    NegativeNumber,
    /// `true`/`false`/`1`/`0`, ignoring case.
    Boolean,
    /// Text of at least this many UTF-16 code units.
    MinLength(usize),
    /// Text of at most this many UTF-16 code units.
    MaxLength(usize),
    /// Text of exactly this many UTF-16 code units.
    Length(usize),
    /// Text the pattern matches.
    Regex(Pattern),
    /// Number no smaller than the bound.
    MinNumber(f64),
    /// Number no larger than the bound.
    MaxNumber(f64),
    /// Exactly one of the listed strings.
    Enum(Vec<String>),
}

impl Variant {
    /// Build a zero-argument variant.
    ///
    /// # Errors
    ///
    /// Returns [`VariantError::ParamsRequired`] for factory tags.
    pub fn bare(tag: VariantTag) -> Result<Self, VariantError> {
        let variant = match tag {
            VariantTag::String => Self::String,
            VariantTag::Url => Self::Url,
            VariantTag::Email => Self::Email,
            VariantTag::Uuid => Self::Uuid,
            VariantTag::Ip => Self::Ip,
            VariantTag::Datetime => Self::Datetime,
            VariantTag::Date => Self::Date,
            VariantTag::Number => Self::Number,
            VariantTag::Integer => Self::Integer,
            VariantTag::PositiveNumber => Self::PositiveNumber,
            VariantTag::NegativeNumber => Self::NegativeNumber,
            VariantTag::Boolean => Self::Boolean,
            VariantTag::MinLength
            | VariantTag::MaxLength
            | VariantTag::Length
            | VariantTag::Regex
            | VariantTag::MinNumber
            | VariantTag::MaxNumber
            | VariantTag::Enum => {
                return Err(VariantError::ParamsRequired {
                    tag,
                    expected: tag.param_shape().unwrap_or("parameters"),
                })
            }
        };
        Ok(variant)
    }

    /// Build a factory variant, checking that `params` has the right shape.
    ///
    /// Lengths must be non-negative integers, numeric bounds finite, regex
    /// parameters a compilable source or a compiled pattern, and enum
    /// parameters a list of strings.
    ///
    /// # Errors
    ///
    /// Returns [`VariantError::UnexpectedParams`] for bare tags,
    /// [`VariantError::InvalidParams`] for a shape mismatch, and
    /// [`VariantError::InvalidPattern`] for a regex source that does not compile.
    pub fn with_params(tag: VariantTag, params: Params) -> Result<Self, VariantError> {
        let Some(expected) = tag.param_shape() else {
            return Err(VariantError::UnexpectedParams { tag });
        };
        let invalid = || VariantError::InvalidParams { tag, expected };

        match (tag, params) {
            (VariantTag::MinLength, Params::Number(n)) => as_length(n).map(Self::MinLength).ok_or_else(invalid),
            (VariantTag::MaxLength, Params::Number(n)) => as_length(n).map(Self::MaxLength).ok_or_else(invalid),
            (VariantTag::Length, Params::Number(n)) => as_length(n).map(Self::Length).ok_or_else(invalid),
            (VariantTag::Regex, Params::Text(source)) => Pattern::new(&source).map(Self::Regex),
            (VariantTag::Regex, Params::Pattern(p)) => Ok(Self::Regex(p)),
            (VariantTag::MinNumber, Params::Number(n)) if n.is_finite() => Ok(Self::MinNumber(n)),
            (VariantTag::MaxNumber, Params::Number(n)) if n.is_finite() => Ok(Self::MaxNumber(n)),
            (VariantTag::Enum, Params::List(options)) => Ok(Self::Enum(options)),
            _ => Err(invalid()),
        }
    }

    /// The tag this variant was built from.
    pub fn tag(&self) -> VariantTag {
        match self {
            Self::String => VariantTag::String,
            Self::Url => VariantTag::Url,
            Self::Email => VariantTag::Email,
            Self::Uuid => VariantTag::Uuid,
            Self::Ip => VariantTag::Ip,
            Self::Datetime => VariantTag::Datetime,
            Self::Date => VariantTag::Date,
            Self::Number => VariantTag::Number,
            Self::Integer => VariantTag::Integer,
            Self::PositiveNumber => VariantTag::PositiveNumber,
            Self::NegativeNumber => VariantTag::NegativeNumber,
            Self::Boolean => VariantTag::Boolean,
            Self::MinLength(_) => VariantTag::MinLength,
            Self::MaxLength(_) => VariantTag::MaxLength,
            Self::Length(_) => VariantTag::Length,
            Self::Regex(_) => VariantTag::Regex,
            Self::MinNumber(_) => VariantTag::MinNumber,
            Self::MaxNumber(_) => VariantTag::MaxNumber,
            Self::Enum(_) => VariantTag::Enum,
        }
    }

    /// Coerce one raw value.
    pub fn coerce(&self, raw: &str) -> Outcome {
        match self {
            Self::String => coerce::string(raw),
            Self::Url => coerce::url(raw),
            Self::Email => coerce::email(raw),
            Self::Uuid => coerce::uuid(raw),
            Self::Ip => coerce::ip(raw),
            Self::Datetime => coerce::datetime(raw),
            Self::Date => coerce::date(raw),
            Self::Number => coerce::number(raw),
            Self::Integer => coerce::integer(raw),
            Self::PositiveNumber => coerce::positive_number(raw),
            Self::NegativeNumber => coerce::negative_number(raw),
            Self::Boolean => coerce::boolean(raw),
            Self::MinLength(min) => coerce::min_length(*min, raw),
            Self::MaxLength(max) => coerce::max_length(*max, raw),
            Self::Length(len) => coerce::length(*len, raw),
            Self::Regex(pattern) => coerce::regex(pattern, raw),
            Self::MinNumber(min) => coerce::min_number(*min, raw),
            Self::MaxNumber(max) => coerce::max_number(*max, raw),
            Self::Enum(options) => coerce::one_of(options, raw),
        }
    }
}

fn as_length(n: f64) -> Option<usize> {
    (n.is_finite() && n >= 0.0 && n.fract() == 0.0 && n <= usize::MAX as f64).then_some(n as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::TypedValue;

    #[test]
    fn test_all_tags_count() {
        assert_eq!(VariantTag::all().len(), VARIANT_COUNT);
    }

    #[test]
    fn test_all_tags_unique() {
        let mut seen = std::collections::HashSet::new();
        for tag in VariantTag::all() {
            assert!(seen.insert(tag), "Duplicate tag: {tag}");
        }
    }

    #[test]
    fn test_as_str_roundtrip() {
        for tag in VariantTag::all() {
            let parsed: VariantTag = tag.as_str().parse().unwrap_or_else(|e| {
                panic!("Failed to parse {:?}: {e}", tag.as_str())
            });
            assert_eq!(*tag, parsed);
        }
    }

    #[test]
    fn test_kebab_case_aliases() {
        assert_eq!("min-length".parse::<VariantTag>().unwrap(), VariantTag::MinLength);
        assert_eq!("positive-number".parse::<VariantTag>().unwrap(), VariantTag::PositiveNumber);
        assert_eq!("max-number".parse::<VariantTag>().unwrap(), VariantTag::MaxNumber);
    }

    #[test]
    fn test_from_str_unknown() {
        assert_eq!(
            "phone".parse::<VariantTag>(),
            Err(VariantError::UnknownVariant("phone".to_string()))
        );
        assert!("STRING".parse::<VariantTag>().is_err());
        assert!("".parse::<VariantTag>().is_err());
    }

    #[test]
    fn test_serde_matches_as_str() {
        for tag in VariantTag::all() {
            let json = serde_json::to_string(tag).unwrap();
            assert_eq!(json, format!("\"{}\"", tag.as_str()));
        }
    }

    #[test]
    fn test_bare_and_parameterized_partition() {
        for tag in VariantTag::all() {
            assert_eq!(Variant::bare(*tag).is_err(), tag.is_parameterized(), "{tag}");
        }
    }

    #[test]
    fn test_bare_variant_keeps_tag() {
        for tag in VariantTag::all().iter().filter(|t| !t.is_parameterized()) {
            assert_eq!(Variant::bare(*tag).unwrap().tag(), *tag);
        }
    }

    #[test]
    fn test_with_params_builds_factories() {
        assert_eq!(
            Variant::with_params(VariantTag::MinLength, Params::from(8usize)).unwrap(),
            Variant::MinLength(8)
        );
        assert_eq!(
            Variant::with_params(VariantTag::MinNumber, Params::from(1024.0)).unwrap(),
            Variant::MinNumber(1024.0)
        );
        assert_eq!(
            Variant::with_params(VariantTag::Enum, Params::from(vec!["dev", "prod"])).unwrap(),
            Variant::Enum(vec!["dev".to_string(), "prod".to_string()])
        );
        let re = Variant::with_params(VariantTag::Regex, Params::from(r"^v\d+$")).unwrap();
        assert!(re.coerce("v12").is_ok());
    }

    #[test]
    fn test_with_params_rejects_bad_shapes() {
        assert!(matches!(
            Variant::with_params(VariantTag::MinLength, Params::from(-1.0)),
            Err(VariantError::InvalidParams { .. })
        ));
        assert!(matches!(
            Variant::with_params(VariantTag::Length, Params::from(2.5)),
            Err(VariantError::InvalidParams { .. })
        ));
        assert!(matches!(
            Variant::with_params(VariantTag::MaxNumber, Params::from(f64::INFINITY)),
            Err(VariantError::InvalidParams { .. })
        ));
        assert!(matches!(
            Variant::with_params(VariantTag::Enum, Params::from("dev")),
            Err(VariantError::InvalidParams { .. })
        ));
        assert!(matches!(
            Variant::with_params(VariantTag::Regex, Params::from("(")),
            Err(VariantError::InvalidPattern { .. })
        ));
        assert!(matches!(
            Variant::with_params(VariantTag::Integer, Params::from(3.0)),
            Err(VariantError::UnexpectedParams { tag: VariantTag::Integer })
        ));
    }

    #[test]
    fn test_coerce_dispatches_with_params() {
        let v = Variant::MinLength(8);
        assert!(v.coerce("password123").is_ok());
        let err = v.coerce("short").unwrap_err();
        assert!(err.message().contains('8'), "message should name the bound: {err}");

        assert_eq!(Variant::Integer.coerce("3000"), Ok(TypedValue::Number(3000.0)));
    }

    #[test]
    fn test_params_deserialize_untagged() {
        let n: Params = serde_json::from_str("8").unwrap();
        assert_eq!(n, Params::Number(8.0));
        let t: Params = serde_json::from_str(r#""^v\\d+$""#).unwrap();
        assert_eq!(t, Params::Text(r"^v\d+$".to_string()));
        let l: Params = serde_json::from_str(r#"["dev","prod"]"#).unwrap();
        assert_eq!(l, Params::from(vec!["dev", "prod"]));
        assert!(serde_json::from_str::<Params>("true").is_err());
    }
}
