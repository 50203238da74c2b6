//! # Regex Patterns
//!
//! [`Pattern`] wraps a compiled `regex::Regex` for the `regex` variant.
//! Source strings are compiled once, at construction, so a broken pattern
//! is reported while the schema is being built rather than on every value.
//! Matching is unanchored: the pattern decides where it must match.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::VariantError;

/// A compiled regular expression used by the `regex` variant.
#[derive(Clone)]
pub struct Pattern(Regex);

impl Pattern {
    /// Compile a pattern from its source.
    ///
    /// # Errors
    ///
    /// Returns [`VariantError::InvalidPattern`] if the source does not compile.
    pub fn new(source: &str) -> Result<Self, VariantError> {
        Regex::new(source)
            .map(Self)
            .map_err(|e| VariantError::InvalidPattern {
                pattern: source.to_string(),
                reason: e.to_string(),
            })
    }

    /// The pattern source.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Access the compiled expression.
    pub fn as_regex(&self) -> &Regex {
        &self.0
    }

    /// Whether `value` matches anywhere the pattern permits.
    pub fn is_match(&self, value: &str) -> bool {
        self.0.is_match(value)
    }
}

impl From<Regex> for Pattern {
    fn from(regex: Regex) -> Self {
        Self(regex)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.as_str()).finish()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.as_str())
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Pattern::new(&source).map_err(serde::de::Error::custom)
    }
}
