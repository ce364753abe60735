//! # Schema Subcommand
//!
//! Prints or writes the constructor-union schema of a validation-aware target.
//!
//! ```bash
//! forma schema heroes.Weapon
//! forma schema heroes.Hero --output hero.schema.json
//! forma schema heroes.Hero --output config/hero.json --with-document
//! ```
//!
//! `--with-document` writes `hero.schema.json` next to the output and the
//! output itself as a stub document pointing at it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use forma_resolve::{Dispatcher, DottedPathResolver};
use forma_schema::{create_json_with_schema, save_json_schema};

use crate::catalog::builtin_registry;

/// Arguments for the schema subcommand.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Dotted path of the target, e.g. `heroes.Weapon`.
    pub target: String,

    /// Write to this file instead of standard output.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Also write a stub document at `--output` referencing the schema.
    #[arg(long, requires = "output")]
    pub with_document: bool,
}

/// Union schema document of a catalog target.
pub fn target_schema(target: &str) -> Result<Value> {
    let dispatcher = Dispatcher::new(DottedPathResolver::new(builtin_registry()));
    dispatcher
        .schema_for(target)
        .with_context(|| format!("rendering schema for '{target}'"))
}

/// Execute the schema subcommand.
pub fn run_schema(args: &SchemaArgs) -> Result<u8> {
    let schema = target_schema(&args.target)?;

    match (&args.output, args.with_document) {
        (None, _) => {
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
        (Some(output), false) => {
            save_json_schema(&schema, output)
                .with_context(|| format!("writing schema: {}", output.display()))?;
            println!("OK: wrote {}", output.display());
        }
        (Some(output), true) => {
            let schema_path = create_json_with_schema(&schema, output)
                .with_context(|| format!("writing schema document: {}", output.display()))?;
            println!("OK: wrote {}", schema_path.display());
            println!("OK: wrote {}", output.display());
        }
    }
    Ok(0)
}
