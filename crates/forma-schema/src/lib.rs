//! # forma-schema — Constructor-Union Schemas
//!
//! Describes how a type can be constructed and validates data records against
//! that description before anything is built.
//!
//! ## Layers
//!
//! - [`signature`]: The Signature Describer. A constructor's declared
//!   parameters, plus its doc comment, become a [`RecordSchema`].
//! - [`variant`]: The Variant Schema Builder. Names each record schema
//!   deterministically (`WeaponFromRole`, `WeaponInit`).
//! - [`union`]: The Union Schema Assembler. Enumerates a type's factories
//!   and its initializer or native layout, validates a record against each
//!   in turn, and constructs through the first match.
//! - [`validate`]: Compilation and checking through the `jsonschema` crate,
//!   with structured per-alternative violations.
//! - [`adapter`]: Serde integration so constructible types can nest inside
//!   ordinary records.
//! - [`export`]: Writes schema documents for editors and external tools.
//!
//! ## Crate Policy
//!
//! - Depends only on `forma-core` internally.
//! - Schemas are assembled per request; nothing is cached.
//! - Matching and coercion are the engine's job. This crate only builds the
//!   documents the engine checks against.

pub mod adapter;
pub mod export;
pub mod signature;
pub mod union;
pub mod validate;
pub mod variant;

pub use adapter::{deserialize_constructible, Constructed};
pub use export::{create_json_with_schema, save_json_schema, ExportError};
pub use signature::{
    describe, CallableRole, Field, Param, ParamType, RecordSchema, Signature, DISCRIMINATOR_FIELD,
    INITIALIZER_NAME,
};
pub use union::{
    BuildFn, Constructible, Factory, FactorySelection, MemberKind, TypeDescriptor, UnionMember,
    UnionSchema, FACTORY_PREFIX,
};
pub use validate::{AlternativeFailure, AlternativeFailures, SchemaError, ValidationError, Violation};
pub use variant::variant_name;
