//! # CLI Configuration
//!
//! Optional YAML file passed with `--config`:
//!
//! ```yaml
//! descriptor_keys:
//!   target: _target_
//!   positional: _args_
//! ```
//!
//! Missing keys take their defaults; no file means all defaults.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use forma_resolve::DescriptorKeys;

/// Settings shared by every subcommand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Reserved descriptor key names.
    pub descriptor_keys: DescriptorKeys,
}

impl CliConfig {
    /// Load from `path`, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file: {}", path.display()))?;
        // An empty document is null in YAML.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing config file: {}", path.display()))?;
        tracing::debug!(
            path = %path.display(),
            target_key = %config.descriptor_keys.target,
            positional_key = %config.descriptor_keys.positional,
            "loaded configuration"
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_path_means_defaults() {
        assert_eq!(CliConfig::load(None).unwrap(), CliConfig::default());
    }

    #[test]
    fn test_partial_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forma.yaml");
        std::fs::write(&path, "descriptor_keys:\n  target: _target_\n").unwrap();

        let config = CliConfig::load(Some(&path)).unwrap();
        assert_eq!(config.descriptor_keys.target, "_target_");
        assert_eq!(config.descriptor_keys.positional, "positional-args");
    }

    #[test]
    fn test_empty_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forma.yaml");
        std::fs::write(&path, "\n").unwrap();
        assert_eq!(CliConfig::load(Some(&path)).unwrap(), CliConfig::default());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forma.yaml");
        std::fs::write(&path, "descriptor_key: {}\n").unwrap();
        let err = CliConfig::load(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("parsing config file"));
    }

    #[test]
    fn test_missing_file() {
        let err = CliConfig::load(Some(Path::new("/nonexistent/forma.yaml"))).unwrap_err();
        assert!(err.to_string().contains("reading config file"));
    }
}
