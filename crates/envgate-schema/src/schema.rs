//! # Environment Schema
//!
//! A [`Schema`] maps environment variable names to [`SchemaEntry`] values,
//! in declaration order. Entries come in four shapes:
//!
//! - a bare variant name (`PORT: integer`),
//! - a `{schema, params}` object (`ENV: {schema: enum, params: [dev, prod]}`),
//! - a typed [`Variant`] built in code,
//! - an opaque [`ExternalValidator`] capability.
//!
//! Variant names stay as text until resolution. A schema can therefore
//! mention a name nobody registered, and the mistake only surfaces when
//! that key is actually validated (or when [`Schema::resolve_all`] is called).
//!
//! ## File Format
//!
//! ```yaml
//! APP_API_URL: url
//! APP_PORT: integer
//! APP_ENV:
//!   schema: enum
//!   params: [development, production, staging]
//! APP_VERSION:
//!   schema: regex
//!   params: '^v\d+\.\d+\.\d+$'
//! ```
//!
//! The same document in JSON is accepted as well. Key order in the file is
//! the order of the validation report.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use envgate_core::{Params, Variant, VariantTag};

use crate::backend::{Backend, ExternalValidator};
use crate::error::SchemaError;
use crate::load::{self, Format};
use crate::resolve::resolve;

/// How one environment variable is validated.
#[derive(Debug, Clone)]
pub enum SchemaEntry {
    /// A bare variant name, resolved against the registry on use.
    Tag(String),
    /// A variant name with optional parameters.
    Parameterized {
        /// The variant name.
        schema: String,
        /// Parameters for factory variants.
        params: Option<Params>,
    },
    /// A variant already built in code.
    Variant(Variant),
    /// A validator object defined outside the built-in registry.
    External(Arc<dyn ExternalValidator>),
}

impl SchemaEntry {
    /// A bare variant name.
    pub fn tag(name: impl Into<String>) -> Self {
        Self::Tag(name.into())
    }

    /// A variant name with parameters.
    pub fn with_params(schema: impl Into<String>, params: impl Into<Params>) -> Self {
        Self::Parameterized {
            schema: schema.into(),
            params: Some(params.into()),
        }
    }

    /// Wrap an external validator object.
    pub fn external(validator: impl ExternalValidator + 'static) -> Self {
        Self::External(Arc::new(validator))
    }

    /// Whether an absent variable should be skipped rather than reported.
    ///
    /// Only external validators can declare themselves optional.
    pub fn skips_when_absent(&self) -> bool {
        match self {
            Self::External(v) => v.is_optional(),
            Self::Tag(_) | Self::Parameterized { .. } | Self::Variant(_) => false,
        }
    }
}

impl From<VariantTag> for SchemaEntry {
    fn from(tag: VariantTag) -> Self {
        Self::Tag(tag.as_str().to_string())
    }
}

impl From<Variant> for SchemaEntry {
    fn from(variant: Variant) -> Self {
        Self::Variant(variant)
    }
}

impl From<&str> for SchemaEntry {
    fn from(name: &str) -> Self {
        Self::Tag(name.to_string())
    }
}

impl From<Arc<dyn ExternalValidator>> for SchemaEntry {
    fn from(validator: Arc<dyn ExternalValidator>) -> Self {
        Self::External(validator)
    }
}

impl<'de> Deserialize<'de> for SchemaEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct Object {
            schema: String,
            #[serde(default)]
            params: Option<Params>,
        }

        #[derive(Deserialize)]
        #[serde(
            untagged,
            expecting = "a variant name or an object with `schema` and optional `params`"
        )]
        enum Raw {
            Tag(String),
            Object(Object),
        }

        Raw::deserialize(deserializer).map(|raw| match raw {
            Raw::Tag(name) => SchemaEntry::Tag(name),
            Raw::Object(o) => SchemaEntry::Parameterized {
                schema: o.schema,
                params: o.params,
            },
        })
    }
}

/// Ordered mapping from environment variable name to [`SchemaEntry`].
#[derive(Debug, Clone, Default)]
pub struct Schema {
    entries: Vec<(String, SchemaEntry)>,
}

impl Schema {
    /// An empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `key`. Re-declaring a key replaces its entry but keeps its
    /// original position. Returns the replaced entry, if any.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        entry: impl Into<SchemaEntry>,
    ) -> Option<SchemaEntry> {
        let key = key.into();
        let entry = entry.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, entry)),
            None => {
                self.entries.push((key, entry));
                None
            }
        }
    }

    /// Builder form of [`Schema::insert`].
    pub fn with(mut self, key: impl Into<String>, entry: impl Into<SchemaEntry>) -> Self {
        self.insert(key, entry);
        self
    }

    /// Look up the entry for `key`.
    pub fn get(&self, key: &str) -> Option<&SchemaEntry> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, e)| e)
    }

    /// Number of declared keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no keys are declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Declared keys, in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Entries, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SchemaEntry)> {
        self.entries.iter().map(|(k, e)| (k.as_str(), e))
    }

    /// Resolve every entry against `backend` without validating anything.
    ///
    /// Lets a host reject a broken schema at startup instead of on the
    /// first validation call.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`] in declaration order.
    pub fn resolve_all(&self, backend: Backend) -> Result<(), SchemaError> {
        for (key, entry) in self.iter() {
            resolve(key, entry, backend)?;
        }
        Ok(())
    }

    /// Parse a schema from a YAML document.
    pub fn from_yaml_str(content: &str) -> Result<Self, SchemaError> {
        load::parse(content, Format::Yaml, "<yaml>")
    }

    /// Parse a schema from a JSON document.
    pub fn from_json_str(content: &str) -> Result<Self, SchemaError> {
        load::parse(content, Format::Json, "<json>")
    }

    /// Load a schema file; `.yaml`/`.yml` is read as YAML, anything else as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Load`] if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        load::read(path.as_ref())
    }
}

impl<K, E> FromIterator<(K, E)> for Schema
where
    K: Into<String>,
    E: Into<SchemaEntry>,
{
    fn from_iter<I: IntoIterator<Item = (K, E)>>(iter: I) -> Self {
        let mut schema = Schema::new();
        for (k, e) in iter {
            schema.insert(k, e);
        }
        schema
    }
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SchemaVisitor;

        impl<'de> Visitor<'de> for SchemaVisitor {
            type Value = Schema;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping from variable name to schema entry")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Schema, A::Error> {
                let mut schema = Schema::new();
                while let Some((key, entry)) = map.next_entry::<String, SchemaEntry>()? {
                    schema.insert(key, entry);
                }
                Ok(schema)
            }
        }

        deserializer.deserialize_map(SchemaVisitor)
    }
}
