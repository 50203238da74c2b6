//! # Error Types
//!
//! Two kinds of failure live at this layer and they never mix:
//!
//! - [`Rejection`]: a single raw value failed its coercer. Always
//!   recoverable; the engine folds it into the report.
//! - [`VariantError`]: a variant could not be constructed from its tag
//!   and parameters. This is a schema authoring mistake and is fatal to
//!   the validation call that encounters it.

use thiserror::Error;

use crate::variant::VariantTag;

/// A raw value that failed coercion, with the human-readable reason.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct Rejection {
    message: String,
}

impl Rejection {
    /// Create a rejection carrying `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The message shown to the operator.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Consumes self and returns the message.
    pub fn into_message(self) -> String {
        self.message
    }
}

/// Error constructing a [`Variant`](crate::Variant) from a tag and parameters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VariantError {
    /// The tag is not one of the registered variants.
    #[error("unknown schema variant: {0:?}")]
    UnknownVariant(String),

    /// A parameterized tag was used without parameters.
    #[error("variant '{tag}' requires parameters ({expected})")]
    ParamsRequired {
        /// The parameterized tag.
        tag: VariantTag,
        /// Description of the expected parameter shape.
        expected: &'static str,
    },

    /// A bare tag was given parameters.
    #[error("variant '{tag}' does not take parameters")]
    UnexpectedParams {
        /// The bare tag.
        tag: VariantTag,
    },

    /// Parameters were supplied but have the wrong shape.
    #[error("invalid parameters for variant '{tag}': expected {expected}")]
    InvalidParams {
        /// The parameterized tag.
        tag: VariantTag,
        /// Description of the expected parameter shape.
        expected: &'static str,
    },

    /// A regex source string failed to compile.
    #[error("invalid regex pattern {pattern:?}: {reason}")]
    InvalidPattern {
        /// The pattern source as supplied.
        pattern: String,
        /// Compiler diagnostic.
        reason: String,
    },
}
