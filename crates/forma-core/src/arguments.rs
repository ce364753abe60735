//! # Keyword Arguments
//!
//! [`Arguments`] is the field-name → value mapping a constructor receives.
//! Values are `serde_json::Value`s and are converted to concrete Rust types
//! on extraction, so a constructor reads like a typed parameter list:
//!
//! ```
//! use forma_core::Arguments;
//! use serde_json::json;
//!
//! let mut args = Arguments::from_value(json!({"name": "axe", "damage": 15})).unwrap();
//! let name: String = args.take("name").unwrap();
//! let damage: u32 = args.take("damage").unwrap();
//! args.finish().unwrap();
//! assert_eq!((name.as_str(), damage), ("axe", 15));
//! ```

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::ConstructError;

/// Keyword arguments handed to a constructor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    values: Map<String, Value>,
}

impl Arguments {
    /// Wrap an existing mapping.
    pub fn new(values: Map<String, Value>) -> Self {
        Self { values }
    }

    /// Wrap a JSON object. Returns `None` for any other kind of value.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(values) => Some(Self { values }),
            _ => None,
        }
    }

    /// Remove and convert a required argument.
    ///
    /// # Errors
    ///
    /// `MissingArgument` if absent, `InvalidArgument` if the value does not
    /// deserialize into `T`.
    pub fn take<T: DeserializeOwned>(&mut self, name: &str) -> Result<T, ConstructError> {
        let value = self
            .values
            .remove(name)
            .ok_or_else(|| ConstructError::MissingArgument(name.to_string()))?;
        convert(name, value)
    }

    /// Remove and convert an optional argument. `null` counts as absent.
    pub fn take_opt<T: DeserializeOwned>(&mut self, name: &str) -> Result<Option<T>, ConstructError> {
        match self.values.remove(name) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => convert(name, value).map(Some),
        }
    }

    /// Remove and convert an argument, falling back to `default` when absent.
    pub fn take_or<T: DeserializeOwned>(&mut self, name: &str, default: T) -> Result<T, ConstructError> {
        Ok(self.take_opt(name)?.unwrap_or(default))
    }

    /// Remove a raw value.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    /// Look up a raw value without removing it.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Whether an argument with this name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Insert or replace an argument.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.values.insert(name.into(), value)
    }

    /// Number of remaining arguments.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no arguments remain.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Names of the remaining arguments, in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Assert that every argument was consumed.
    ///
    /// # Errors
    ///
    /// `UnexpectedArguments` listing the leftover names.
    pub fn finish(self) -> Result<(), ConstructError> {
        if self.values.is_empty() {
            Ok(())
        } else {
            Err(ConstructError::UnexpectedArguments(
                self.values.into_iter().map(|(k, _)| k).collect(),
            ))
        }
    }

    /// Consume and return the inner mapping.
    pub fn into_inner(self) -> Map<String, Value> {
        self.values
    }
}

impl From<Map<String, Value>> for Arguments {
    fn from(values: Map<String, Value>) -> Self {
        Self::new(values)
    }
}

fn convert<T: DeserializeOwned>(name: &str, value: Value) -> Result<T, ConstructError> {
    serde_json::from_value(value).map_err(|e| ConstructError::InvalidArgument {
        name: name.to_string(),
        reason: e.to_string(),
    })
}
