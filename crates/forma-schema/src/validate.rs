//! # Schema Validation
//!
//! Thin layer over the `jsonschema` crate (Draft 2020-12). It compiles the
//! record schemas produced by the describer and turns engine errors into
//! structured [`Violation`]s.
//!
//! ## Error Model
//!
//! A union is validated member by member. When nothing matches, the caller
//! gets one [`ValidationError::NoMatch`] carrying an [`AlternativeFailure`]
//! per member, each listing the engine's violations for that member:
//! which field was missing and which had the wrong type.
//! A single "no branch matched" line would not tell a configuration author
//! anything useful.

use std::fmt;

use jsonschema::{Draft, Validator};
use serde_json::Value;
use thiserror::Error;

use forma_core::ConstructError;

/// Error while assembling or compiling a schema.
#[derive(Error, Debug, Clone)]
pub enum SchemaError {
    /// A type named a factory in its explicit selection that it never registered.
    #[error("type '{type_name}' selects factory '{factory}', which is not registered")]
    UnknownFactory {
        /// Type whose descriptor is inconsistent.
        type_name: String,
        /// Name that could not be found.
        factory: String,
    },

    /// The engine could not compile a generated schema.
    #[error("validator build error for schema '{schema_name}': {reason}")]
    Build {
        /// Schema title.
        schema_name: String,
        /// Engine message.
        reason: String,
    },
}

/// Error while validating a record against a union.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// No member of the union accepted the record.
    #[error("no alternative of '{type_name}' matched:\n{alternatives}")]
    NoMatch {
        /// Type being validated.
        type_name: String,
        /// Why each member rejected the record.
        alternatives: AlternativeFailures,
    },

    /// A member matched, but its constructor refused the values.
    #[error("'{variant}' could not construct a value: {source}")]
    Construction {
        /// Name of the matched member.
        variant: String,
        /// Constructor error.
        #[source]
        source: ConstructError,
    },

    /// The union itself could not be built.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// A single validation violation with structured context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer path to the violating value in the instance.
    pub instance_path: String,
    /// JSON Pointer path within the schema that triggered the error.
    pub schema_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.instance_path, self.message)
        }
    }
}

/// Why one union member rejected a record.
#[derive(Debug, Clone)]
pub struct AlternativeFailure {
    /// Member schema name, e.g. `WeaponFromRole`.
    pub alternative: String,
    /// Violations reported for that member.
    pub violations: Vec<Violation>,
}

impl fmt::Display for AlternativeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  {}:", self.alternative)?;
        for v in &self.violations {
            write!(f, "\n    {v}")?;
        }
        Ok(())
    }
}

/// Collection of per-member failures, in union order.
#[derive(Debug, Clone, Default)]
pub struct AlternativeFailures {
    failures: Vec<AlternativeFailure>,
}

impl AlternativeFailures {
    /// Wrap a list of failures.
    pub fn new(failures: Vec<AlternativeFailure>) -> Self {
        Self { failures }
    }

    /// Returns the number of members that were tried.
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// Returns true if no member was tried.
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Returns a slice of all failures.
    pub fn failures(&self) -> &[AlternativeFailure] {
        &self.failures
    }

    /// Failure for a named member.
    pub fn get(&self, alternative: &str) -> Option<&AlternativeFailure> {
        self.failures.iter().find(|f| f.alternative == alternative)
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<AlternativeFailure> {
        self.failures
    }
}

impl fmt::Display for AlternativeFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{failure}")?;
        }
        Ok(())
    }
}

/// Compile a schema document.
///
/// # Errors
///
/// Returns `SchemaError::Build` if the engine rejects the document.
pub fn compile(schema_name: &str, schema: &Value) -> Result<Validator, SchemaError> {
    let mut opts = jsonschema::options();
    opts.with_draft(Draft::Draft202012);
    opts.build(schema).map_err(|e| SchemaError::Build {
        schema_name: schema_name.to_string(),
        reason: e.to_string(),
    })
}

/// Validate `instance` against `schema`, returning every violation.
///
/// An empty vector means the instance is valid.
pub fn check(schema_name: &str, schema: &Value, instance: &Value) -> Result<Vec<Violation>, SchemaError> {
    let validator = compile(schema_name, schema)?;
    Ok(validator
        .iter_errors(instance)
        .map(|e| Violation {
            instance_path: e.instance_path.to_string(),
            schema_path: e.schema_path.to_string(),
            message: e.to_string(),
        })
        .collect())
}
