//! # Validation Engine
//!
//! Walks a [`Schema`] in declaration order and checks each key against the
//! raw environment:
//!
//! 1. Presence first. An absent key is reported as missing and its schema
//!    entry is never resolved, so a missing variable with a misspelled
//!    variant name still reads as "Variable is required".
//! 2. The entry is resolved. A broken entry aborts the whole call with a
//!    [`SchemaError`]; it is never folded into the report.
//! 3. The resolved check runs on the raw string and its outcome is recorded.
//!
//! Validation reads its inputs only, so repeated calls with the same inputs
//! produce identical reports.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use crate::backend::Backend;
use crate::error::SchemaError;
use crate::report::{ReportEntry, ValidationReport};
use crate::resolve::resolve;
use crate::schema::Schema;

/// Source of raw environment values.
pub trait EnvLookup {
    /// The raw value for `key`, or `None` when absent.
    fn lookup(&self, key: &str) -> Option<&str>;
}

impl<S: BuildHasher> EnvLookup for HashMap<String, String, S> {
    fn lookup(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl<S: BuildHasher> EnvLookup for HashMap<String, Option<String>, S> {
    fn lookup(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Option::as_deref)
    }
}

impl EnvLookup for BTreeMap<String, String> {
    fn lookup(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl EnvLookup for BTreeMap<String, Option<String>> {
    fn lookup(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Option::as_deref)
    }
}

/// Validate `env` against `schema` with the default backend.
///
/// # Errors
///
/// See [`validate_with`].
pub fn validate(schema: &Schema, env: &impl EnvLookup) -> Result<ValidationReport, SchemaError> {
    validate_with(schema, env, Backend::default())
}

/// Validate `env` against `schema` with `backend`.
///
/// # Errors
///
/// Returns [`SchemaError::UnknownVariant`] or
/// [`SchemaError::InvalidSchemaValue`] for the first present key whose entry
/// cannot be resolved. Missing and invalid values are never errors here.
pub fn validate_with(
    schema: &Schema,
    env: &impl EnvLookup,
    backend: Backend,
) -> Result<ValidationReport, SchemaError> {
    let mut report = ValidationReport::default();

    for (key, entry) in schema.iter() {
        let Some(raw) = env.lookup(key) else {
            if entry.skips_when_absent() {
                tracing::debug!(key, "optional variable absent, skipping");
            } else {
                tracing::debug!(key, "required variable absent");
                report.push(ReportEntry::missing(key));
            }
            continue;
        };

        let resolved = resolve(key, entry, backend)?;
        match resolved.check(key, raw) {
            Ok(value) => {
                tracing::debug!(key, "variable valid");
                report.push(ReportEntry::valid(key, value));
            }
            Err(rejection) => {
                tracing::debug!(key, reason = rejection.message(), "variable invalid");
                report.push(ReportEntry::invalid(key, raw, rejection));
            }
        }
    }

    tracing::debug!(
        backend = backend.as_str(),
        checked = report.len(),
        errors = report.error_count(),
        "validation complete"
    );
    Ok(report)
}
