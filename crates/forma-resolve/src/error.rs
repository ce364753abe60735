//! # Error Types
//!
//! [`InitError`] is what a caller of the dispatcher sees.
//!
//! ## Design
//!
//! - Usage errors describe a malformed request: a missing `target`, a bad
//!   path, positional arguments for a keyword-only target.
//! - Resolution errors name the failing segment and the parent path that was
//!   searched, with the underlying import or lookup failure.
//! - Validation errors are the aggregate union error, passed through as-is.
//! - Call errors carry whatever a directly-called target returned.

use thiserror::Error;

use forma_core::ConstructError;
use forma_schema::{SchemaError, ValidationError};

/// Top-level error for resolution and dispatch.
#[derive(Error, Debug)]
pub enum InitError {
    /// Malformed descriptor or unsupported request.
    #[error("usage error: {0}")]
    Usage(String),

    /// A dotted path could not be resolved.
    #[error("error loading '{path}': {reason}")]
    Resolution {
        /// Full path being resolved.
        path: String,
        /// Segment at which resolution failed.
        segment: String,
        /// Dotted path of the object searched, `None` for the first segment.
        parent: Option<String>,
        /// Underlying failure and hint.
        reason: String,
    },

    /// The record matched no constructor variant, or the matched one refused.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A directly-called target returned an error.
    #[error("call to '{target}' failed: {source}")]
    Call {
        /// Path of the target.
        target: String,
        /// Error returned by the target.
        #[source]
        source: ConstructError,
    },
}

impl InitError {
    pub(crate) fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }
}

impl From<SchemaError> for InitError {
    fn from(err: SchemaError) -> Self {
        Self::Validation(ValidationError::Schema(err))
    }
}

/// Why importing a unit failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// Nothing is registered under this path.
    #[error("no module named '{0}'")]
    NotFound(String),

    /// The unit exists but could not be loaded.
    #[error("module '{module}' failed to load: {reason}")]
    Failed {
        /// Module path.
        module: String,
        /// Loader message.
        reason: String,
    },
}
