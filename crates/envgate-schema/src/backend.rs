//! # Validator Backends
//!
//! Two backends validate a [`Schema`]:
//!
//! - [`Backend::Builtin`] resolves every entry against the variant registry,
//!   and also accepts external validator entries.
//! - [`Backend::External`] treats every entry as an opaque
//!   [`ExternalValidator`] capability. Registry names are rejected.
//!
//! ## External Protocol
//!
//! An external validator returns an [`ExternalOutcome`]. No issues (or an
//! empty list) means success, carrying the validator's computed value or the
//! raw string when it computes none. Otherwise the first issue decides the
//! report message: `"{key} is invalid, must be {expected}"` when the issue
//! states what it expected, else the issue's own message.
//!
//! Any third-party schema library can be adapted by implementing the trait,
//! or by wrapping a closure in [`FnValidator`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use envgate_core::{Outcome, Rejection, TypedValue};

use crate::engine::{validate_with, EnvLookup};
use crate::error::SchemaError;
use crate::report::ValidationReport;
use crate::schema::Schema;

/// One problem reported by an external validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Human-readable description of the problem.
    pub message: String,
    /// What the validator expected instead, e.g. `"a port number"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
}

impl Issue {
    /// An issue with a message only.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            expected: None,
        }
    }

    /// An issue that states what was expected.
    pub fn expected(message: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            expected: Some(expected.into()),
        }
    }
}

/// Result of one external validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalOutcome {
    /// Problems found. `None` or empty means the value is accepted.
    #[serde(default)]
    pub issues: Option<Vec<Issue>>,
    /// Value computed by the validator, if any.
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

impl ExternalOutcome {
    /// Accept the raw value unchanged.
    pub fn accept() -> Self {
        Self::default()
    }

    /// Accept with a computed value.
    pub fn value(value: impl Into<serde_json::Value>) -> Self {
        Self {
            issues: None,
            value: Some(value.into()),
        }
    }

    /// Reject with the given issues.
    pub fn issues(issues: Vec<Issue>) -> Self {
        Self {
            issues: Some(issues),
            value: None,
        }
    }

    /// Convert into a per-key outcome for `key`.
    pub(crate) fn into_outcome(self, key: &str, raw: &str) -> Outcome {
        match self.issues.and_then(|issues| issues.into_iter().next()) {
            Some(Issue {
                expected: Some(expected),
                ..
            }) => Err(Rejection::new(format!("{key} is invalid, must be {expected}"))),
            Some(Issue { message, .. }) => Err(Rejection::new(message)),
            None => Ok(match self.value {
                Some(value) => TypedValue::Json(value),
                None => TypedValue::String(raw.to_string()),
            }),
        }
    }
}

/// A validator defined outside the built-in variant registry.
pub trait ExternalValidator: Send + Sync + fmt::Debug {
    /// Validate one raw value.
    fn validate(&self, raw: &str) -> ExternalOutcome;

    /// Whether an absent variable is acceptable. Absent optional keys are
    /// left out of the report entirely.
    fn is_optional(&self) -> bool {
        false
    }
}

/// Adapts a closure into an [`ExternalValidator`].
pub struct FnValidator<F> {
    name: String,
    optional: bool,
    check: F,
}

impl<F> FnValidator<F>
where
    F: Fn(&str) -> ExternalOutcome + Send + Sync,
{
    /// Wrap `check`; `name` only appears in debug output.
    pub fn new(name: impl Into<String>, check: F) -> Self {
        Self {
            name: name.into(),
            optional: false,
            check,
        }
    }

    /// Mark the validator optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

impl<F> fmt::Debug for FnValidator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnValidator")
            .field("name", &self.name)
            .field("optional", &self.optional)
            .finish_non_exhaustive()
    }
}

impl<F> ExternalValidator for FnValidator<F>
where
    F: Fn(&str) -> ExternalOutcome + Send + Sync,
{
    fn validate(&self, raw: &str) -> ExternalOutcome {
        (self.check)(raw)
    }

    fn is_optional(&self) -> bool {
        self.optional
    }
}

/// Registered validator backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Backend {
    /// Built-in variant registry plus external entries.
    #[default]
    Builtin,
    /// External validator objects only.
    External,
}

impl Backend {
    /// Returns all registered backends.
    pub fn all() -> &'static [Backend] {
        &[Self::Builtin, Self::External]
    }

    /// Returns the canonical name of this backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Builtin => "default",
            Self::External => "external",
        }
    }

    /// Validate `env` against `schema` with this backend.
    ///
    /// # Errors
    ///
    /// See [`validate_with`].
    pub fn validate(
        self,
        schema: &Schema,
        env: &impl EnvLookup,
    ) -> Result<ValidationReport, SchemaError> {
        validate_with(schema, env, self)
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" | "builtin" => Ok(Self::Builtin),
            "external" | "standard" => Ok(Self::External),
            other => Err(SchemaError::UnknownBackend {
                name: other.to_string(),
                available: Self::all()
                    .iter()
                    .map(Backend::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }
}

/// Look up a backend by name. `None` selects the default.
///
/// # Errors
///
/// Returns [`SchemaError::UnknownBackend`] for unregistered names; there is
/// no fallback.
pub fn select_backend(name: Option<&str>) -> Result<Backend, SchemaError> {
    name.map_or(Ok(Backend::default()), str::parse)
}
