//! Collects the raw environment handed to the validator.
//!
//! Dotenv files are read without touching the process environment. Later
//! files override earlier ones, and process variables override every file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Where raw values come from.
#[derive(Debug, Clone, Default)]
pub struct EnvSources {
    /// Dotenv files, lowest precedence first.
    pub env_files: Vec<PathBuf>,
    /// Whether to layer the process environment on top.
    pub process_env: bool,
}

/// Merge every source into one map.
pub fn collect(sources: &EnvSources) -> Result<BTreeMap<String, String>> {
    let mut env = BTreeMap::new();
    for path in &sources.env_files {
        let loaded = read_env_file(path)?;
        tracing::debug!(path = %path.display(), count = loaded.len(), "loaded env file");
        env.extend(loaded);
    }
    if sources.process_env {
        env.extend(process_vars());
    }
    Ok(env)
}

/// Parse one dotenv file into ordered pairs.
///
/// Nothing is written to the process environment.
// `from_path_iter` is the only dotenv 0.15 reader that returns pairs
// instead of exporting them.
#[allow(deprecated)]
pub fn read_env_file(path: &Path) -> Result<Vec<(String, String)>> {
    let iter = dotenv::from_path_iter(path)
        .with_context(|| format!("cannot open env file {}", path.display()))?;
    iter.map(|item| item.with_context(|| format!("malformed env file {}", path.display())))
        .collect()
}

fn process_vars() -> Vec<(String, String)> {
    std::env::vars_os()
        .filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
            (Ok(k), Ok(v)) => Some((k, v)),
            (Ok(k), Err(_)) => {
                tracing::warn!(key = %k, "skipping environment variable with non-UTF-8 value");
                None
            }
            (Err(k), _) => {
                tracing::warn!(key = ?k, "skipping environment variable with non-UTF-8 name");
                None
            }
        })
        .collect()
}
