//! Validator options document: backend, renderer and schema in one file.
//!
//! ```yaml
//! validator: default
//! render: console
//! schema:
//!   PORT: integer
//!   ENV:
//!     schema: enum
//!     params: [dev, prod]
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::backend::{select_backend, Backend};
use crate::error::SchemaError;
use crate::load::{self, Format};
use crate::schema::Schema;

/// Options for one validation host.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidatorOptions {
    /// Backend name; the default backend when absent.
    #[serde(default)]
    pub validator: Option<String>,
    /// Renderer name; interpreted by the host.
    #[serde(default)]
    pub render: Option<String>,
    /// The variables to validate.
    pub schema: Schema,
}

impl ValidatorOptions {
    /// Options with the given schema and every other field defaulted.
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            ..Self::default()
        }
    }

    /// The backend named by `validator`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownBackend`] for an unregistered name.
    pub fn backend(&self) -> Result<Backend, SchemaError> {
        select_backend(self.validator.as_deref())
    }

    /// Parse options from a YAML document.
    pub fn from_yaml_str(content: &str) -> Result<Self, SchemaError> {
        load::parse(content, Format::Yaml, "<yaml>")
    }

    /// Parse options from a JSON document.
    pub fn from_json_str(content: &str) -> Result<Self, SchemaError> {
        load::parse(content, Format::Json, "<json>")
    }

    /// Load an options file; `.yaml`/`.yml` is read as YAML, anything else as JSON.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        load::read(path.as_ref())
    }
}
