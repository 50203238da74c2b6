//! # envgate-core: Variants and Typed Coercers
//!
//! The leaf of the envgate crate graph. It owns the closed set of schema
//! variants and the pure functions that turn raw environment strings into
//! typed values.
//!
//! ## Key Design Principles
//!
//! 1. **Sealed registry.** [`VariantTag`] is a closed enum and [`Variant`]
//!    carries its parameters directly (`MinLength(usize)`, `Enum(Vec<String>)`).
//!    Dispatch is an exhaustive `match`, so there is no runtime lookup miss.
//!
//! 2. **Total coercers.** Every coercer returns an [`Outcome`]; malformed
//!    input becomes a [`Rejection`], never a panic.
//!
//! 3. **Schema mistakes are a different type.** Building a variant from bad
//!    parameters yields a [`VariantError`], which callers treat as fatal.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `envgate-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - No shared mutable state; everything here is safe to call concurrently.

#![deny(missing_docs)]

pub mod coerce;
pub mod error;
pub mod pattern;
pub mod value;
pub mod variant;

pub use coerce::Outcome;
pub use error::{Rejection, VariantError};
pub use pattern::Pattern;
pub use value::TypedValue;
pub use variant::{Params, Variant, VariantTag, VARIANT_COUNT};
