//! # Dispatcher
//!
//! Builds whatever a [`ConstructionDescriptor`] names.
//!
//! ```text
//!   descriptor ──▶ Resolver ──▶ Callable
//!                                 ├── Validated ──▶ union validate ──▶ Instance
//!                                 └── Direct    ──▶ call(positional, named) ──▶ Instance
//! ```
//!
//! Arguments are merged before dispatch: caller positionals are appended
//! after the descriptor's, and caller named arguments replace descriptor
//! entries with the same key. Validation-aware targets are keyword-only.

use serde_json::{Map, Value};

use forma_core::{Arguments, Instance};

use crate::descriptor::ConstructionDescriptor;
use crate::error::InitError;
use crate::namespace::{Callable, Invoke, Item};
use crate::resolve::Resolver;

/// Resolves descriptor targets and constructs them.
#[derive(Debug, Clone)]
pub struct Dispatcher<R> {
    resolver: R,
}

impl<R: Resolver> Dispatcher<R> {
    /// Dispatch through `resolver`.
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    /// The resolver in use.
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Build the descriptor's target with no extra arguments.
    pub fn init(&self, descriptor: ConstructionDescriptor) -> Result<Instance, InitError> {
        self.dispatch(descriptor, Vec::new(), Map::new())
    }

    /// Build the descriptor's target, merging in caller-supplied arguments.
    ///
    /// # Errors
    ///
    /// - `InitError::Usage` if the target is not callable, or positional
    ///   arguments reach a validation-aware target.
    /// - `InitError::Resolution` if the target path names nothing.
    /// - `InitError::Validation` with the union's aggregate error.
    /// - `InitError::Call` if a directly-called target fails.
    pub fn dispatch(
        &self,
        descriptor: ConstructionDescriptor,
        extra_positional: Vec<Value>,
        extra_named: Map<String, Value>,
    ) -> Result<Instance, InitError> {
        let (target, mut positional, mut named) = descriptor.into_parts();
        positional.extend(extra_positional);
        named.extend(extra_named);

        let callable = self.callable(&target)?;
        match callable.invoke() {
            Invoke::Validated { build, .. } => {
                if !positional.is_empty() {
                    return Err(InitError::usage(format!(
                        "'{target}' is constructed by validation and accepts keyword arguments only, got {} positional",
                        positional.len()
                    )));
                }
                tracing::debug!(path = %target, "dispatching through constructor union");
                Ok(build(&Value::Object(named))?)
            }
            Invoke::Direct(call) => {
                tracing::debug!(
                    path = %target,
                    positional = positional.len(),
                    named = named.len(),
                    "calling target directly"
                );
                call(positional, Arguments::new(named)).map_err(|source| InitError::Call { target, source })
            }
        }
    }

    /// Union schema document of a validation-aware target.
    ///
    /// # Errors
    ///
    /// `InitError::Usage` if the target builds by direct call and so has no
    /// schema.
    pub fn schema_for(&self, path: &str) -> Result<Value, InitError> {
        let callable = self.callable(path)?;
        let schema = callable.schema().ok_or_else(|| {
            InitError::usage(format!("'{path}' is not validation-aware and has no schema"))
        })?;
        Ok(schema()?)
    }

    fn callable(&self, path: &str) -> Result<std::sync::Arc<Callable>, InitError> {
        let resolved = self.resolver.resolve(path)?;
        match resolved.item {
            Item::Callable(callable) => Ok(callable),
            other => Err(InitError::usage(format!(
                "'{}' resolved to a {}, which cannot be constructed",
                resolved.path,
                other.kind()
            ))),
        }
    }
}
