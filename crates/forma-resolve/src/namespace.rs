//! # Namespace
//!
//! An explicit, injectable model of "things a dotted path can name".
//!
//! ```text
//!   ModuleRegistry                       (Importer)
//!     "collections"      ──▶ Module { Counter: Callable }
//!     "datetime"         ──▶ Module { date: Callable { fromisocalendar: Callable, ... } }
//!     "heroes"           ──▶ Module { Weapon: Callable(validated), Hero: ... }
//!     "heroes.armory"    ──▶ Module { Shield: ... }     (import-only, not an attribute)
//! ```
//!
//! A [`Module`] is an importable unit with named attributes. A [`Callable`]
//! is something that can be invoked, either directly with raw arguments or
//! through a constructor union, and may itself carry attributes (a type and
//! its factory functions). Registration happens once at startup; afterwards
//! the registry is only read.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use forma_core::{Arguments, ConstructError, Instance};
use forma_schema::signature::SchemaFn;
use forma_schema::{Constructible, ValidationError};

use crate::error::ImportError;

/// Direct call: positional and keyword arguments in, opaque value out.
pub type DirectFn = fn(Vec<Value>, Arguments) -> Result<Instance, ConstructError>;

/// Validated construction of a type-erased constructible.
pub type ValidatedFn = fn(&Value) -> Result<Instance, ValidationError>;

/// How a callable is invoked.
#[derive(Clone, Copy)]
pub enum Invoke {
    /// Called with the raw merged arguments.
    Direct(DirectFn),
    /// Keyword-only; the record is routed through the type's union.
    Validated {
        /// Validate and construct.
        build: ValidatedFn,
        /// Union schema document.
        schema: SchemaFn,
    },
}

impl fmt::Debug for Invoke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct(_) => f.write_str("Direct"),
            Self::Validated { .. } => f.write_str("Validated"),
        }
    }
}

fn validate_erased<T: Constructible + fmt::Debug>(value: &Value) -> Result<Instance, ValidationError> {
    T::model_validate(value).map(Instance::new)
}

/// A named invocable with optional attributes of its own.
#[derive(Debug, Clone)]
pub struct Callable {
    name: String,
    invoke: Invoke,
    attributes: BTreeMap<String, Item>,
}

impl Callable {
    /// A plain function or type that takes raw arguments.
    pub fn direct(name: impl Into<String>, call: DirectFn) -> Self {
        Self {
            name: name.into(),
            invoke: Invoke::Direct(call),
            attributes: BTreeMap::new(),
        }
    }

    /// A validation-aware type, constructed through its union.
    pub fn constructible<T: Constructible + fmt::Debug>(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            invoke: Invoke::Validated {
                build: validate_erased::<T>,
                schema: T::json_schema,
            },
            attributes: BTreeMap::new(),
        }
    }

    /// Attach a named attribute, e.g. a factory function on a type.
    pub fn with_attribute(mut self, name: impl Into<String>, item: impl Into<Item>) -> Self {
        self.attributes.insert(name.into(), item.into());
        self
    }

    /// Registered name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invocation strategy.
    pub fn invoke(&self) -> Invoke {
        self.invoke
    }

    /// Whether construction goes through a union and is keyword-only.
    pub fn is_validation_aware(&self) -> bool {
        matches!(self.invoke, Invoke::Validated { .. })
    }

    /// The union schema document, for validation-aware callables.
    pub fn schema(&self) -> Option<SchemaFn> {
        match self.invoke {
            Invoke::Validated { schema, .. } => Some(schema),
            Invoke::Direct(_) => None,
        }
    }

    /// Look up an attribute.
    pub fn attribute(&self, name: &str) -> Option<&Item> {
        self.attributes.get(name)
    }
}

/// An importable unit: a dotted name and its attributes.
#[derive(Debug, Clone)]
pub struct Module {
    name: String,
    attributes: BTreeMap<String, Item>,
}

impl Module {
    /// An empty module.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Attach a named attribute.
    pub fn with(mut self, name: impl Into<String>, item: impl Into<Item>) -> Self {
        self.attributes.insert(name.into(), item.into());
        self
    }

    /// Attach a callable under its own name.
    pub fn with_callable(self, callable: Callable) -> Self {
        let name = callable.name.clone();
        self.with(name, callable)
    }

    /// Full dotted name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up an attribute.
    pub fn attribute(&self, name: &str) -> Option<&Item> {
        self.attributes.get(name)
    }

    /// Attribute names in sorted order.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }
}

/// Anything a path segment can resolve to.
#[derive(Debug, Clone)]
pub enum Item {
    /// A namespace.
    Module(Arc<Module>),
    /// Something invocable.
    Callable(Arc<Callable>),
    /// A terminal value with no attributes.
    Value(Value),
}

impl Item {
    /// Attribute lookup. Plain values have none.
    pub fn attribute(&self, name: &str) -> Option<Item> {
        match self {
            Self::Module(module) => module.attribute(name).cloned(),
            Self::Callable(callable) => callable.attribute(name).cloned(),
            Self::Value(_) => None,
        }
    }

    /// Whether this item is an importable unit.
    pub fn is_module(&self) -> bool {
        matches!(self, Self::Module(_))
    }

    /// Short kind name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Module(_) => "module",
            Self::Callable(_) => "callable",
            Self::Value(_) => "value",
        }
    }
}

impl From<Module> for Item {
    fn from(module: Module) -> Self {
        Self::Module(Arc::new(module))
    }
}

impl From<Callable> for Item {
    fn from(callable: Callable) -> Self {
        Self::Callable(Arc::new(callable))
    }
}

impl From<Value> for Item {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

/// Loads importable units by dotted name.
///
/// Repeated imports of the same name must return the same module.
pub trait Importer: Send + Sync {
    /// Import `path` as a unit.
    fn import(&self, path: &str) -> Result<Arc<Module>, ImportError>;
}

impl<I: Importer + ?Sized> Importer for Arc<I> {
    fn import(&self, path: &str) -> Result<Arc<Module>, ImportError> {
        (**self).import(path)
    }
}

#[derive(Debug, Clone)]
enum Unit {
    Ready(Arc<Module>),
    Broken(String),
}

/// In-memory [`Importer`] populated at startup.
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    units: BTreeMap<String, Unit>,
}

impl ModuleRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module under its own name, replacing any previous entry.
    pub fn register(&mut self, module: Module) -> &mut Self {
        tracing::trace!(module = module.name(), "registered module");
        self.units
            .insert(module.name.clone(), Unit::Ready(Arc::new(module)));
        self
    }

    /// Register a unit that exists but fails every import.
    pub fn register_failure(&mut self, path: impl Into<String>, reason: impl Into<String>) -> &mut Self {
        self.units.insert(path.into(), Unit::Broken(reason.into()));
        self
    }

    /// Whether anything is registered under `path`.
    pub fn contains(&self, path: &str) -> bool {
        self.units.contains_key(path)
    }

    /// Registered unit names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.units.keys().map(String::as_str)
    }

    /// Number of registered units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl Importer for ModuleRegistry {
    fn import(&self, path: &str) -> Result<Arc<Module>, ImportError> {
        match self.units.get(path) {
            Some(Unit::Ready(module)) => Ok(Arc::clone(module)),
            Some(Unit::Broken(reason)) => Err(ImportError::Failed {
                module: path.to_string(),
                reason: reason.clone(),
            }),
            None => Err(ImportError::NotFound(path.to_string())),
        }
    }
}
