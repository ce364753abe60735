//! # Variant Schema Builder
//!
//! Names and builds the record schema for one way of constructing a type.
//!
//! A variant's name is `to_pascal(type_name) + to_pascal(function_name)`:
//! `Weapon` with factory `from_role` is `WeaponFromRole`, and its
//! initializer is `WeaponInit`. Names are unique within a union as long as
//! the type registers each factory name once; registering the same name
//! twice is a contract violation by the type author and is not detected.

use forma_core::to_pascal;

use crate::signature::{describe, CallableRole, RecordSchema, Signature, INITIALIZER_NAME};

/// Deterministic schema name for a type's variant.
pub fn variant_name(type_name: &str, function_name: &str) -> String {
    let mut name = to_pascal(type_name);
    name.push_str(&to_pascal(function_name));
    name
}

/// Schema for an alternate factory of `type_name`.
pub fn factory_variant(type_name: &str, signature: &Signature) -> RecordSchema {
    describe(
        signature,
        &variant_name(type_name, signature.name()),
        CallableRole::Factory,
    )
}

/// Schema for the initializer of `type_name`, named with the `init` sentinel.
pub fn initializer_variant(type_name: &str, signature: &Signature) -> RecordSchema {
    describe(
        signature,
        &variant_name(type_name, INITIALIZER_NAME),
        CallableRole::Initializer,
    )
}

/// Schema for a natively validatable record, named after the type itself.
pub fn native_variant(type_name: &str, signature: &Signature) -> RecordSchema {
    describe(signature, &to_pascal(type_name), CallableRole::Initializer)
}
