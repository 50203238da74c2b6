//! # envgate-schema: Schemas, Resolution & the Validation Engine
//!
//! Validates a set of environment variables against a declared [`Schema`]
//! and collects the per-key results into a [`ValidationReport`].
//!
//! ## Validation (`engine`)
//!
//! [`validate`] checks every schema key in declaration order: presence
//! first, then resolution of the key's entry, then the check itself.
//! Missing and invalid values are recorded in the report. A broken schema
//! entry aborts the call with a [`SchemaError`].
//!
//! ```
//! use std::collections::HashMap;
//! use envgate_schema::{validate, Schema, SchemaEntry, VariantTag};
//!
//! let schema = Schema::new()
//!     .with("PORT", VariantTag::Integer)
//!     .with("ENV", SchemaEntry::with_params("enum", vec!["dev", "prod"]));
//!
//! let env: HashMap<String, String> =
//!     [("PORT".to_string(), "3000".to_string())].into_iter().collect();
//!
//! let report = validate(&schema, &env).unwrap();
//! assert!(!report.is_valid());
//! assert_eq!(report.get("ENV").unwrap().message, "Variable is required");
//! ```
//!
//! ## Backends (`backend`)
//!
//! [`Backend::Builtin`] resolves registry variant names; [`Backend::External`]
//! accepts only [`ExternalValidator`] objects. [`select_backend`] never falls
//! back to the default for an unknown name.
//!
//! ## Crate Policy
//!
//! - Depends only on `envgate-core` internally.
//! - Schema documents are loaded as YAML or JSON, chosen by file extension.
//! - Per-key failures go in the report; configuration failures are errors.

#![deny(missing_docs)]

pub mod backend;
pub mod engine;
pub mod error;
mod load;
pub mod options;
pub mod report;
pub mod resolve;
pub mod schema;

pub use backend::{select_backend, Backend, ExternalOutcome, ExternalValidator, FnValidator, Issue};
pub use engine::{validate, validate_with, EnvLookup};
pub use error::SchemaError;
pub use options::ValidatorOptions;
pub use report::{EntryStatus, ReportEntry, ValidationReport, MISSING_MESSAGE, SUCCESS_MESSAGE};
pub use resolve::{resolve, Resolved};
pub use schema::{Schema, SchemaEntry};

pub use envgate_core::{Params, TypedValue, Variant, VariantTag};
