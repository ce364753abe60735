//! # Build Subcommand
//!
//! Loads a construction descriptor and builds its target from the built-in
//! catalog, printing the result.
//!
//! ```bash
//! forma build weapon.yaml
//! forma build weapon.yaml --set damage=20
//! forma build counter.yaml --arg '"xyz"'
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::{Map, Value};

use forma_core::Instance;
use forma_resolve::{ConstructionDescriptor, Dispatcher, DottedPathResolver};

use crate::catalog::builtin_registry;
use crate::config::CliConfig;

/// Arguments for the build subcommand.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Descriptor file (.yaml, .yml or .json).
    pub descriptor: PathBuf,

    /// Named argument overriding the descriptor. The value is read as JSON,
    /// or as a plain string if it is not valid JSON.
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment)]
    pub set: Vec<(String, Value)>,

    /// Positional argument appended after the descriptor's.
    #[arg(long = "arg", value_name = "VALUE", value_parser = parse_value)]
    pub args: Vec<Value>,
}

/// Parse a command-line value: JSON if it parses, otherwise a string.
pub fn parse_value(raw: &str) -> Result<Value, String> {
    Ok(serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string())))
}

/// Parse `key=value`.
pub fn parse_assignment(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }
    Ok((key.to_string(), parse_value(value)?))
}

/// Build the descriptor's target with the command-line overrides applied.
pub fn build_instance(args: &BuildArgs, config: &CliConfig) -> Result<Instance> {
    let descriptor = ConstructionDescriptor::from_path(&args.descriptor, &config.descriptor_keys)
        .with_context(|| format!("loading descriptor: {}", args.descriptor.display()))?;
    let target = descriptor.target().to_string();

    let named: Map<String, Value> = args.set.iter().cloned().collect();
    let dispatcher = Dispatcher::new(DottedPathResolver::new(builtin_registry()));
    dispatcher
        .dispatch(descriptor, args.args.clone(), named)
        .with_context(|| format!("building '{target}'"))
}

/// Execute the build subcommand.
pub fn run_build(args: &BuildArgs, config: &CliConfig) -> Result<u8> {
    let instance = build_instance(args, config)?;
    tracing::info!(type_name = instance.type_name(), "built instance");
    println!("{instance:?}");
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("15").unwrap(), json!(15));
        assert_eq!(parse_value("[1, 2]").unwrap(), json!([1, 2]));
        assert_eq!(parse_value("\"15\"").unwrap(), json!("15"));
        assert_eq!(parse_value("axe").unwrap(), json!("axe"));
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(parse_assignment("damage=20").unwrap(), ("damage".into(), json!(20)));
        assert_eq!(parse_assignment("name=a=b").unwrap(), ("name".into(), json!("a=b")));
        assert!(parse_assignment("damage").is_err());
        assert!(parse_assignment("=1").is_err());
    }
}
