//! # Construction Descriptors
//!
//! A descriptor names a target and the arguments to build it with:
//!
//! ```yaml
//! target: heroes.Weapon
//! name: axe
//! damage: 15
//! ```
//!
//! Two keys are reserved: the target path and the positional-argument list.
//! Every other key is a named argument. Nested descriptors are not expanded;
//! a mapping-valued argument is passed through as data.
//!
//! The reserved key names default to `target` and `positional-args` and can
//! be changed through [`DescriptorKeys`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::error::InitError;

/// Default key holding the target path.
pub const TARGET_KEY: &str = "target";

/// Default key holding positional arguments.
pub const POSITIONAL_KEY: &str = "positional-args";

/// Names of the reserved descriptor keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescriptorKeys {
    /// Key holding the dotted target path.
    pub target: String,
    /// Key holding the positional-argument list.
    pub positional: String,
}

impl Default for DescriptorKeys {
    fn default() -> Self {
        Self {
            target: TARGET_KEY.to_string(),
            positional: POSITIONAL_KEY.to_string(),
        }
    }
}

/// Error loading a descriptor from disk.
#[derive(Error, Debug)]
pub enum DescriptorLoadError {
    /// The file could not be read.
    #[error("failed to read descriptor {path}: {source}")]
    Io {
        /// Path of the descriptor file.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid YAML or JSON.
    #[error("failed to parse descriptor {path}: {reason}")]
    Parse {
        /// Path of the descriptor file.
        path: String,
        /// Parser message.
        reason: String,
    },

    /// The document parsed but is not a usable descriptor.
    #[error(transparent)]
    Invalid(#[from] InitError),
}

/// A target path plus positional and named arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstructionDescriptor {
    target: String,
    positional: Vec<Value>,
    named: Map<String, Value>,
}

impl ConstructionDescriptor {
    /// A descriptor with no arguments.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ..Self::default()
        }
    }

    /// Append positional arguments.
    pub fn with_positional<I: IntoIterator<Item = Value>>(mut self, values: I) -> Self {
        self.positional.extend(values);
        self
    }

    /// Set a named argument.
    pub fn with_named(mut self, name: impl Into<String>, value: Value) -> Self {
        self.named.insert(name.into(), value);
        self
    }

    /// Parse a descriptor using the default reserved keys.
    pub fn from_value(value: Value) -> Result<Self, InitError> {
        Self::from_value_with_keys(value, &DescriptorKeys::default())
    }

    /// Parse a descriptor mapping.
    ///
    /// # Errors
    ///
    /// `InitError::Usage` if the value is not a mapping, the target is
    /// missing or not a string, or the positional entry is not a list.
    /// A `null` positional entry counts as empty.
    pub fn from_value_with_keys(value: Value, keys: &DescriptorKeys) -> Result<Self, InitError> {
        let Value::Object(mut named) = value else {
            return Err(InitError::usage("descriptor must be a mapping"));
        };

        let target = match named.remove(&keys.target) {
            Some(Value::String(target)) => target,
            Some(other) => {
                return Err(InitError::usage(format!(
                    "descriptor key '{}' must be a string, got {other}",
                    keys.target
                )))
            }
            None => {
                return Err(InitError::usage(format!(
                    "descriptor is missing the '{}' key",
                    keys.target
                )))
            }
        };

        let positional = match named.remove(&keys.positional) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(InitError::usage(format!(
                    "descriptor key '{}' must be a list, got {other}",
                    keys.positional
                )))
            }
        };

        Ok(Self {
            target,
            positional,
            named,
        })
    }

    /// Load a descriptor file. `.json` files are read as JSON, anything else
    /// as YAML.
    pub fn from_path(path: impl AsRef<Path>, keys: &DescriptorKeys) -> Result<Self, DescriptorLoadError> {
        let path = path.as_ref();
        let shown = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| DescriptorLoadError::Io {
            path: shown.clone(),
            source,
        })?;

        let is_json = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let parsed: Result<Value, String> = if is_json {
            serde_json::from_str(&content).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str(&content).map_err(|e| e.to_string())
        };
        let value = parsed.map_err(|reason| DescriptorLoadError::Parse {
            path: shown.clone(),
            reason,
        })?;

        tracing::debug!(path = %shown, "loaded construction descriptor");
        Ok(Self::from_value_with_keys(value, keys)?)
    }

    /// Dotted target path.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Positional arguments in order.
    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    /// Named arguments.
    pub fn named(&self) -> &Map<String, Value> {
        &self.named
    }

    /// Split into target, positional and named arguments.
    pub fn into_parts(self) -> (String, Vec<Value>, Map<String, Value>) {
        (self.target, self.positional, self.named)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reserved_keys_are_split_out() {
        let descriptor = ConstructionDescriptor::from_value(json!({
            "target": "collections.Counter",
            "positional-args": ["abb"],
            "extra": true,
        }))
        .unwrap();
        assert_eq!(descriptor.target(), "collections.Counter");
        assert_eq!(descriptor.positional(), [json!("abb")]);
        assert_eq!(descriptor.named().len(), 1);
        assert_eq!(descriptor.named()["extra"], true);
    }

    #[test]
    fn test_missing_target_is_usage_error() {
        let err = ConstructionDescriptor::from_value(json!({"name": "axe"})).unwrap_err();
        assert!(matches!(err, InitError::Usage(ref m) if m.contains("'target'")), "{err}");
    }

    #[test]
    fn test_non_mapping_and_bad_types() {
        assert!(matches!(ConstructionDescriptor::from_value(json!([1])), Err(InitError::Usage(_))));
        assert!(matches!(
            ConstructionDescriptor::from_value(json!({"target": 3})),
            Err(InitError::Usage(_))
        ));
        assert!(matches!(
            ConstructionDescriptor::from_value(json!({"target": "a.b", "positional-args": "abb"})),
            Err(InitError::Usage(_))
        ));
    }

    #[test]
    fn test_null_positional_is_empty() {
        let descriptor =
            ConstructionDescriptor::from_value(json!({"target": "a.b", "positional-args": null})).unwrap();
        assert!(descriptor.positional().is_empty());
    }

    #[test]
    fn test_custom_keys() {
        let keys = DescriptorKeys {
            target: "_target_".into(),
            positional: "_args_".into(),
        };
        let descriptor =
            ConstructionDescriptor::from_value_with_keys(json!({"_target_": "a.b", "_args_": [1], "target": "x"}), &keys)
                .unwrap();
        assert_eq!(descriptor.target(), "a.b");
        assert_eq!(descriptor.positional(), [json!(1)]);
        assert_eq!(descriptor.named()["target"], "x");
    }

    #[test]
    fn test_keys_deserialize_with_defaults() {
        let keys: DescriptorKeys = serde_json::from_value(json!({"target": "_target_"})).unwrap();
        assert_eq!(keys.target, "_target_");
        assert_eq!(keys.positional, POSITIONAL_KEY);
    }

    #[test]
    fn test_builder_matches_parsed() {
        let built = ConstructionDescriptor::new("heroes.Weapon")
            .with_named("name", json!("axe"))
            .with_named("damage", json!(15));
        let parsed =
            ConstructionDescriptor::from_value(json!({"target": "heroes.Weapon", "name": "axe", "damage": 15}))
                .unwrap();
        assert_eq!(built, parsed);
    }

    #[test]
    fn test_from_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weapon.yaml");
        std::fs::write(&path, "target: heroes.Weapon\nname: axe\ndamage: 15\n").unwrap();

        let descriptor = ConstructionDescriptor::from_path(&path, &DescriptorKeys::default()).unwrap();
        assert_eq!(descriptor.target(), "heroes.Weapon");
        assert_eq!(descriptor.named()["damage"], 15);
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("counter.json");
        std::fs::write(&path, r#"{"target": "collections.Counter", "positional-args": ["abb"]}"#).unwrap();

        let descriptor = ConstructionDescriptor::from_path(&path, &DescriptorKeys::default()).unwrap();
        assert_eq!(descriptor.positional(), [json!("abb")]);
    }

    #[test]
    fn test_from_path_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = ConstructionDescriptor::from_path(dir.path().join("absent.yaml"), &DescriptorKeys::default());
        assert!(matches!(missing, Err(DescriptorLoadError::Io { .. })));

        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        let bad = ConstructionDescriptor::from_path(&path, &DescriptorKeys::default());
        assert!(matches!(bad, Err(DescriptorLoadError::Parse { .. })));

        let path = dir.path().join("untargeted.yaml");
        std::fs::write(&path, "name: axe\n").unwrap();
        let invalid = ConstructionDescriptor::from_path(&path, &DescriptorKeys::default());
        assert!(matches!(invalid, Err(DescriptorLoadError::Invalid(InitError::Usage(_)))));
    }

    #[test]
    fn test_yaml_descriptor_keeps_nested_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hero.yml");
        std::fs::write(
            &path,
            "target: heroes.Hero\nname: Conan\nweapon:\n  role: tank\ntags: [true, 2.5]\n",
        )
        .unwrap();

        let descriptor = ConstructionDescriptor::from_path(&path, &DescriptorKeys::default()).unwrap();
        assert_eq!(
            Value::Object(descriptor.named().clone()),
            json!({"name": "Conan", "weapon": {"role": "tank"}, "tags": [true, 2.5]})
        );
    }
}
