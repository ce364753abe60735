//! # forma-core — Foundational Types for forma
//!
//! This crate is the leaf of the forma workspace. It defines the values that
//! flow between a data record and the constructor that consumes it, and the
//! small text utilities the schema layer builds on.
//!
//! ## Key Design Principles
//!
//! 1. **Keyword arguments are a typed bag.** Constructors receive an
//!    [`Arguments`] value and pull fields out with `take::<T>()`. Missing or
//!    mistyped fields become a [`ConstructError`], never a panic.
//!
//! 2. **Construction results are type-erased once.** A dispatcher does not
//!    know what it built. [`Instance`] carries the value behind `dyn Any` and
//!    hands it back through `downcast`.
//!
//! 3. **Names are canonical.** Variant schema names are derived with
//!    [`to_pascal`], a single casing rule used everywhere a name is
//!    synthesized.
//!
//! 4. **Documentation is optional enrichment.** [`parse_doc`] never fails;
//!    an undocumented callable yields an empty [`ParsedDoc`].
//!
//! ## Crate Policy
//!
//! - No dependencies on other `forma-*` crates.
//! - No `unsafe` code.
//! - No `.unwrap()` or `.expect()` outside tests.

pub mod arguments;
pub mod casing;
pub mod docstring;
pub mod error;
pub mod instance;

// Re-export primary types for ergonomic imports.
pub use arguments::Arguments;
pub use casing::to_pascal;
pub use docstring::{parse_doc, ParsedDoc};
pub use error::ConstructError;
pub use instance::{Instance, Object};
