//! # Schema Resolution
//!
//! Turns a [`SchemaEntry`] into something that can check a raw value.
//! Resolution only inspects the entry's shape; it never runs a coercer,
//! so a broken schema is always distinguishable from bad data.

use std::borrow::Cow;

use envgate_core::{Outcome, Variant, VariantTag};

use crate::backend::{Backend, ExternalValidator};
use crate::error::SchemaError;
use crate::schema::SchemaEntry;

/// A resolved schema entry.
#[derive(Debug, Clone)]
pub enum Resolved<'a> {
    /// A registry variant, borrowed when the entry already held one.
    Variant(Cow<'a, Variant>),
    /// An external validator capability.
    External(&'a dyn ExternalValidator),
}

impl Resolved<'_> {
    /// Check one raw value for `key`.
    pub fn check(&self, key: &str, raw: &str) -> Outcome {
        match self {
            Self::Variant(variant) => variant.coerce(raw),
            Self::External(validator) => validator.validate(raw).into_outcome(key, raw),
        }
    }
}

/// Resolve the entry declared for `key` under `backend`.
///
/// # Errors
///
/// - [`SchemaError::UnknownVariant`] if a variant name is not registered.
/// - [`SchemaError::InvalidSchemaValue`] if parameters are missing,
///   unexpected, or malformed, or if the backend cannot handle the entry's
///   shape.
pub fn resolve<'a>(
    key: &str,
    entry: &'a SchemaEntry,
    backend: Backend,
) -> Result<Resolved<'a>, SchemaError> {
    let variant = match entry {
        SchemaEntry::External(validator) => return Ok(Resolved::External(validator.as_ref())),
        _ if backend == Backend::External => {
            return Err(SchemaError::InvalidSchemaValue {
                key: key.to_string(),
                reason: format!("the {backend} backend only accepts validator objects"),
            })
        }
        SchemaEntry::Variant(variant) => return Ok(Resolved::Variant(Cow::Borrowed(variant))),
        SchemaEntry::Tag(name)
        | SchemaEntry::Parameterized {
            schema: name,
            params: None,
        } => Variant::bare(parse_tag(key, name)?),
        SchemaEntry::Parameterized {
            schema: name,
            params: Some(params),
        } => Variant::with_params(parse_tag(key, name)?, params.clone()),
    };
    variant
        .map(|v| Resolved::Variant(Cow::Owned(v)))
        .map_err(|e| SchemaError::for_key(key, e))
}

fn parse_tag(key: &str, name: &str) -> Result<VariantTag, SchemaError> {
    name.parse().map_err(|e| SchemaError::for_key(key, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{ExternalOutcome, FnValidator, Issue};
    use envgate_core::{Params, TypedValue};

    #[test]
    fn test_bare_tag_resolves() {
        let entry = SchemaEntry::tag("integer");
        let resolved = resolve("PORT", &entry, Backend::Builtin).unwrap();
        assert_eq!(
            resolved.check("PORT", "3000").unwrap(),
            TypedValue::Number(3000.0)
        );
    }

    #[test]
    fn test_object_form_without_params_is_bare() {
        let entry = SchemaEntry::Parameterized {
            schema: "boolean".into(),
            params: None,
        };
        let resolved = resolve("DEBUG", &entry, Backend::Builtin).unwrap();
        assert_eq!(resolved.check("DEBUG", "1").unwrap(), TypedValue::Boolean(true));
    }

    #[test]
    fn test_factory_with_params_resolves() {
        let entry = SchemaEntry::with_params("enum", vec!["dev", "prod"]);
        let resolved = resolve("ENV", &entry, Backend::Builtin).unwrap();
        assert!(resolved.check("ENV", "dev").is_ok());
        assert!(resolved.check("ENV", "Dev").is_err());
    }

    #[test]
    fn test_typed_variant_is_borrowed() {
        let entry = SchemaEntry::Variant(Variant::MinLength(3));
        match resolve("K", &entry, Backend::Builtin).unwrap() {
            Resolved::Variant(Cow::Borrowed(v)) => assert_eq!(v, &Variant::MinLength(3)),
            other => panic!("Expected borrowed variant, got: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_tag_is_unknown_variant() {
        let entry = SchemaEntry::tag("port");
        let err = resolve("PORT", &entry, Backend::Builtin).unwrap_err();
        assert!(matches!(err, SchemaError::UnknownVariant { ref variant, .. } if variant == "port"));
    }

    #[test]
    fn test_factory_without_params_is_invalid_schema_value() {
        let entry = SchemaEntry::tag("minLength");
        let err = resolve("PASSWORD", &entry, Backend::Builtin).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidSchemaValue { ref key, .. } if key == "PASSWORD"));
    }

    #[test]
    fn test_params_on_bare_tag_is_invalid_schema_value() {
        let entry = SchemaEntry::with_params("url", Params::from(3.0));
        assert!(matches!(
            resolve("API", &entry, Backend::Builtin),
            Err(SchemaError::InvalidSchemaValue { .. })
        ));
    }

    #[test]
    fn test_bad_regex_source_is_invalid_schema_value() {
        let entry = SchemaEntry::with_params("regex", "([a-z");
        assert!(matches!(
            resolve("VERSION", &entry, Backend::Builtin),
            Err(SchemaError::InvalidSchemaValue { .. })
        ));
    }

    #[test]
    fn test_external_backend_rejects_registry_names() {
        let entry = SchemaEntry::tag("string");
        let err = resolve("NAME", &entry, Backend::External).unwrap_err();
        assert!(err.to_string().contains("external"), "{err}");
    }

    #[test]
    fn test_external_entry_resolves_under_both_backends() {
        let entry = SchemaEntry::external(FnValidator::new("port", |raw: &str| {
            match raw.parse::<u16>() {
                Ok(port) => ExternalOutcome::value(port),
                Err(_) => ExternalOutcome::issues(vec![Issue::expected("bad", "a port number")]),
            }
        }));
        for backend in Backend::all() {
            let resolved = resolve("PORT", &entry, *backend).unwrap();
            assert_eq!(
                resolved.check("PORT", "80").unwrap(),
                TypedValue::Json(serde_json::json!(80))
            );
            assert_eq!(
                resolved.check("PORT", "x").unwrap_err().message(),
                "PORT is invalid, must be a port number"
            );
        }
    }
}
