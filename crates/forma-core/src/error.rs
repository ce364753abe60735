//! # Constructor Errors
//!
//! Errors raised by constructors themselves: an initializer, an alternate
//! factory, or a directly-called function that cannot build a value from the
//! arguments it received.
//!
//! ## Design
//!
//! - Argument errors name the argument.
//! - A constructor that understands its inputs but refuses them (an unknown
//!   role, an out-of-range date) reports `Rejected` with its own message.
//! - Schema and resolution failures live in the crates that detect them;
//!   this enum only covers the callee side.

use thiserror::Error;

/// Error returned by a constructor function.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConstructError {
    /// A required keyword argument was not supplied.
    #[error("missing required argument '{0}'")]
    MissingArgument(String),

    /// A keyword argument had the wrong shape for the parameter.
    #[error("invalid value for argument '{name}': {reason}")]
    InvalidArgument {
        /// Parameter name.
        name: String,
        /// Why the value could not be converted.
        reason: String,
    },

    /// Keyword arguments remained after the constructor took what it needed.
    #[error("unexpected keyword argument(s): {}", .0.join(", "))]
    UnexpectedArguments(Vec<String>),

    /// The number of positional arguments did not fit the callable.
    #[error("expected at most {expected} positional argument(s), got {got}")]
    TooManyPositional {
        /// Maximum accepted.
        expected: usize,
        /// Number supplied.
        got: usize,
    },

    /// The constructor refused the supplied values.
    #[error("{0}")]
    Rejected(String),
}

impl ConstructError {
    /// Shorthand for [`ConstructError::Rejected`].
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected(reason.into())
    }
}
