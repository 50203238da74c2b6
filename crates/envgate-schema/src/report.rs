//! # Validation Report
//!
//! One [`ReportEntry`] per schema key, in schema order. Per-key failures
//! (missing or invalid values) live here and never abort a validation call,
//! so the operator sees every problem at once.

use std::fmt;

use serde::Serialize;

use envgate_core::{Rejection, TypedValue};

/// Message recorded for a required variable that is absent.
pub const MISSING_MESSAGE: &str = "Variable is required";

/// Message recorded for a value that passed its check.
pub const SUCCESS_MESSAGE: &str = "success";

/// Outcome class of one report entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// The value passed its check.
    Valid,
    /// The variable is absent.
    Missing,
    /// The value is present but failed its check.
    Invalid,
}

impl EntryStatus {
    /// Returns the lowercase name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Missing => "missing",
            Self::Invalid => "invalid",
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result for a single schema key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportEntry {
    /// The environment variable name.
    pub key: String,
    /// The coerced value on success, the raw string on failure, absent when missing.
    pub value: Option<TypedValue>,
    /// `"success"` or the reason the value was rejected.
    pub message: String,
    /// Outcome class.
    pub status: EntryStatus,
}

impl ReportEntry {
    /// A value that passed.
    pub fn valid(key: impl Into<String>, value: TypedValue) -> Self {
        Self {
            key: key.into(),
            value: Some(value),
            message: SUCCESS_MESSAGE.to_string(),
            status: EntryStatus::Valid,
        }
    }

    /// A required variable that is absent.
    pub fn missing(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
            message: MISSING_MESSAGE.to_string(),
            status: EntryStatus::Missing,
        }
    }

    /// A present value that was rejected; the raw string is kept for display.
    pub fn invalid(key: impl Into<String>, raw: &str, rejection: Rejection) -> Self {
        Self {
            key: key.into(),
            value: Some(TypedValue::String(raw.to_string())),
            message: rejection.into_message(),
            status: EntryStatus::Invalid,
        }
    }

    /// Whether this entry counts against the overall verdict.
    pub fn is_error(&self) -> bool {
        self.status != EntryStatus::Valid
    }
}

/// Ordered per-key results of one validation call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationReport {
    entries: Vec<ReportEntry>,
}

impl ValidationReport {
    pub(crate) fn push(&mut self, entry: ReportEntry) {
        self.entries.push(entry);
    }

    /// Entries in schema order.
    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    /// Iterate entries in schema order.
    pub fn iter(&self) -> std::slice::Iter<'_, ReportEntry> {
        self.entries.iter()
    }

    /// Number of reported keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no key was reported.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True iff no entry is an error. An empty report is valid.
    pub fn is_valid(&self) -> bool {
        !self.entries.iter().any(ReportEntry::is_error)
    }

    /// Error entries, in schema order.
    pub fn errors(&self) -> impl Iterator<Item = &ReportEntry> {
        self.entries.iter().filter(|e| e.is_error())
    }

    /// Number of missing or invalid entries.
    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    /// The entry for `key`, if the key was reported.
    pub fn get(&self, key: &str) -> Option<&ReportEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    /// Consumes self and returns the entries.
    pub fn into_inner(self) -> Vec<ReportEntry> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a ValidationReport {
    type Item = &'a ReportEntry;
    type IntoIter = std::slice::Iter<'a, ReportEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let errors = self.error_count();
        if errors == 0 {
            write!(f, "{} variable(s) valid", self.len())
        } else {
            write!(f, "{errors} of {} variable(s) failed validation", self.len())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ValidationReport {
        let mut report = ValidationReport::default();
        report.push(ReportEntry::valid("PORT", TypedValue::Number(3000.0)));
        report.push(ReportEntry::missing("ENV"));
        report.push(ReportEntry::invalid(
            "DEBUG",
            "maybe",
            Rejection::new("Invalid boolean"),
        ));
        report
    }

    #[test]
    fn test_entry_constructors() {
        let report = sample();
        let port = report.get("PORT").unwrap();
        assert_eq!(port.message, "success");
        assert!(!port.is_error());

        let env = report.get("ENV").unwrap();
        assert_eq!(env.value, None);
        assert_eq!(env.message, "Variable is required");
        assert_eq!(env.status, EntryStatus::Missing);

        let debug = report.get("DEBUG").unwrap();
        assert_eq!(debug.value, Some(TypedValue::String("maybe".into())));
        assert_eq!(debug.status, EntryStatus::Invalid);
    }

    #[test]
    fn test_verdict() {
        let report = sample();
        assert!(!report.is_valid());
        assert_eq!(report.error_count(), 2);
        assert_eq!(
            report.errors().map(|e| e.key.as_str()).collect::<Vec<_>>(),
            ["ENV", "DEBUG"]
        );
        assert!(ValidationReport::default().is_valid());
    }

    #[test]
    fn test_accessors_keep_schema_order() {
        let report = sample();
        assert_eq!(report.len(), 3);
        assert!(!report.is_empty());
        assert!(ValidationReport::default().is_empty());
        assert_eq!(
            report.iter().map(|e| e.key.as_str()).collect::<Vec<_>>(),
            ["PORT", "ENV", "DEBUG"]
        );
        assert_eq!(report.entries()[1].key, "ENV");
        let inner = report.into_inner();
        assert_eq!(inner.len(), 3);
        assert_eq!(inner[2].key, "DEBUG");
    }

    #[test]
    fn test_display_summary() {
        assert_eq!(sample().to_string(), "2 of 3 variable(s) failed validation");
        assert_eq!(ValidationReport::default().to_string(), "0 variable(s) valid");
    }

    #[test]
    fn test_serializes_as_ordered_array() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"key": "PORT", "value": 3000.0, "message": "success", "status": "valid"},
                {"key": "ENV", "value": null, "message": "Variable is required", "status": "missing"},
                {"key": "DEBUG", "value": "maybe", "message": "Invalid boolean", "status": "invalid"},
            ])
        );
    }
}
