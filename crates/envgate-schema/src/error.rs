//! # Schema Errors
//!
//! Configuration errors that stop a validation call outright. Problems with
//! the *values* being validated never appear here; they are recorded in the
//! [`ValidationReport`](crate::ValidationReport) instead.

use thiserror::Error;

use envgate_core::VariantError;

/// A broken schema, backend selection, or schema document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// A schema entry names a variant that is not registered.
    #[error("unknown schema variant {variant:?} for '{key}'")]
    UnknownVariant {
        /// The schema key whose entry is broken.
        key: String,
        /// The unrecognized variant name.
        variant: String,
    },

    /// A schema entry has a shape the active backend cannot resolve.
    #[error("invalid schema value for '{key}': {reason}")]
    InvalidSchemaValue {
        /// The schema key whose entry is broken.
        key: String,
        /// What is wrong with the entry.
        reason: String,
    },

    /// The requested validator backend is not registered.
    #[error("validator backend {name:?} not found (available: {available})")]
    UnknownBackend {
        /// The name that was requested.
        name: String,
        /// Comma-separated list of registered names.
        available: String,
    },

    /// A schema or options document could not be read or parsed.
    #[error("schema load error for '{source_name}': {reason}")]
    Load {
        /// File path or other identifier of the document.
        source_name: String,
        /// Reason the document could not be loaded.
        reason: String,
    },
}

impl SchemaError {
    /// Attribute a variant construction failure to the schema key it came from.
    pub(crate) fn for_key(key: &str, err: VariantError) -> Self {
        match err {
            VariantError::UnknownVariant(variant) => Self::UnknownVariant {
                key: key.to_string(),
                variant,
            },
            other => Self::InvalidSchemaValue {
                key: key.to_string(),
                reason: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use envgate_core::VariantTag;

    #[test]
    fn test_unknown_variant_names_key_and_tag() {
        let err = SchemaError::for_key("PORT", VariantError::UnknownVariant("port".into()));
        assert_eq!(
            err,
            SchemaError::UnknownVariant {
                key: "PORT".into(),
                variant: "port".into()
            }
        );
        let msg = err.to_string();
        assert!(msg.contains("PORT") && msg.contains("\"port\""), "{msg}");
    }

    #[test]
    fn test_other_variant_errors_become_invalid_schema_value() {
        let err = SchemaError::for_key(
            "PASSWORD",
            VariantError::ParamsRequired {
                tag: VariantTag::MinLength,
                expected: "a non-negative integer length",
            },
        );
        match err {
            SchemaError::InvalidSchemaValue { key, reason } => {
                assert_eq!(key, "PASSWORD");
                assert!(reason.contains("minLength"), "{reason}");
            }
            other => panic!("Expected InvalidSchemaValue, got: {other}"),
        }
    }
}
