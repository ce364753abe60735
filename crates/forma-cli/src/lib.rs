//! # forma-cli — Command-Line Interface for forma
//!
//! Provides the `forma` binary over a built-in demo catalog.
//!
//! ## Subcommands
//!
//! - `forma build <descriptor>`: Load a YAML or JSON construction
//!   descriptor, resolve its target and build it.
//! - `forma schema <target>`: Print or write the constructor-union schema
//!   of a validation-aware target.
//!
//! ```bash
//! forma build weapon.yaml --set damage=20
//! forma -vv schema heroes.Hero --output hero.json --with-document
//! forma --config forma.yaml build counter.yaml
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in `main.rs`; handlers return an exit code.
//! - Handlers delegate to the library crates. Catalog types are the only
//!   domain code here.

pub mod build;
pub mod catalog;
pub mod config;
pub mod schema;
