//! Reading schema and options documents from disk.
//!
//! The format is chosen from the file extension: `.yaml`/`.yml` is YAML,
//! anything else is JSON.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::SchemaError;

/// Document encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    Yaml,
    Json,
}

impl Format {
    pub(crate) fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()).unwrap_or("") {
            "yaml" | "yml" => Self::Yaml,
            _ => Self::Json,
        }
    }
}

/// Parse `content` as `T`, attributing failures to `source_name`.
pub(crate) fn parse<T: DeserializeOwned>(
    content: &str,
    format: Format,
    source_name: &str,
) -> Result<T, SchemaError> {
    let parsed = match format {
        Format::Yaml => serde_yaml::from_str(content).map_err(|e| format!("invalid YAML: {e}")),
        Format::Json => serde_json::from_str(content).map_err(|e| format!("invalid JSON: {e}")),
    };
    parsed.map_err(|reason| SchemaError::Load {
        source_name: source_name.to_string(),
        reason,
    })
}

/// Read and parse the document at `path`.
pub(crate) fn read<T: DeserializeOwned>(path: &Path) -> Result<T, SchemaError> {
    let source_name = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|e| SchemaError::Load {
        source_name: source_name.clone(),
        reason: format!("cannot read file: {e}"),
    })?;
    parse(&content, Format::from_path(path), &source_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(Format::from_path(Path::new("env.schema.yaml")), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("env.yml")), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("env.json")), Format::Json);
        assert_eq!(Format::from_path(Path::new("envschema")), Format::Json);
    }

    #[test]
    fn test_read_missing_file_is_load_error() {
        let err = read::<serde_json::Value>(Path::new("/nonexistent/env.yaml")).unwrap_err();
        assert!(matches!(err, SchemaError::Load { .. }), "got: {err}");
    }
}
