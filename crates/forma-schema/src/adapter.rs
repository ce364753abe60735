//! # Serde Adapter
//!
//! Lets a [`Constructible`] type appear inside ordinary serde data: as a field
//! of a native record, or as the element of a list. Deserialization reads a
//! raw JSON value and runs it through the type's union.
//!
//! ```ignore
//! #[derive(Deserialize)]
//! struct Hero {
//!     name: String,
//!     #[serde(deserialize_with = "forma_schema::deserialize_constructible")]
//!     weapon: Weapon,
//! }
//!
//! let weapons: Vec<Constructed<Weapon>> = serde_json::from_value(json!([
//!     {"name": "axe", "damage": 15},
//!     {"role": "tank"},
//! ]))?;
//! ```

use std::ops::Deref;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::signature::ParamType;
use crate::union::Constructible;
use crate::validate::SchemaError;

/// A `T` that was deserialized through its constructor union.
#[derive(Debug, Clone, PartialEq)]
pub struct Constructed<T>(pub T);

impl<T> Constructed<T> {
    /// Unwrap the constructed value.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Constructed<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<'de, T: Constructible> Deserialize<'de> for Constructed<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        T::model_validate(&value)
            .map(Constructed)
            .map_err(serde::de::Error::custom)
    }
}

/// `deserialize_with` helper for a constructible field.
pub fn deserialize_constructible<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Constructible,
{
    Constructed::<T>::deserialize(deserializer).map(Constructed::into_inner)
}

fn union_json_schema<T: Constructible>() -> Result<Value, SchemaError> {
    T::json_schema()
}

impl ParamType {
    /// A parameter whose value is itself built through `T`'s union.
    pub fn nested<T: Constructible>() -> Self {
        Self::Nested {
            type_name: std::any::type_name::<T>(),
            schema: union_json_schema::<T>,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::Signature;
    use crate::union::TypeDescriptor;
    use forma_core::{Arguments, ConstructError};
    use serde_json::json;

    #[derive(Debug, PartialEq)]
    struct Gem {
        carats: u32,
    }

    impl Constructible for Gem {
        fn descriptor() -> TypeDescriptor<Self> {
            TypeDescriptor::with_initializer(
                "Gem",
                Signature::initializer().param("carats", ParamType::Integer),
                |mut args: Arguments| -> Result<Gem, ConstructError> {
                    Ok(Gem { carats: args.take("carats")? })
                },
            )
            .factory(
                Signature::new("from_grade").param("grade", ParamType::choice(["a", "b"])),
                |mut args: Arguments| -> Result<Gem, ConstructError> {
                    let grade: String = args.take("grade")?;
                    Ok(Gem { carats: if grade == "a" { 3 } else { 1 } })
                },
            )
        }
    }

    #[derive(Debug, Deserialize)]
    struct Ring {
        #[serde(deserialize_with = "deserialize_constructible")]
        stone: Gem,
    }

    #[test]
    fn test_list_of_constructed() {
        let gems: Vec<Constructed<Gem>> =
            serde_json::from_value(json!([{"carats": 2}, {"grade": "a"}])).unwrap();
        assert_eq!(gems[0].carats, 2);
        assert_eq!(gems[1].carats, 3);
    }

    #[test]
    fn test_field_deserialize_with() {
        let ring: Ring = serde_json::from_value(json!({"stone": {"grade": "b"}})).unwrap();
        assert_eq!(ring.stone, Gem { carats: 1 });
    }

    #[test]
    fn test_invalid_element_surfaces_union_error() {
        let err = serde_json::from_value::<Vec<Constructed<Gem>>>(json!([{"grade": "z"}])).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("no alternative of 'Gem' matched"), "{message}");
        assert!(message.contains("GemFromGrade"), "{message}");
    }

    #[test]
    fn test_nested_param_renders_union() {
        let schema = ParamType::nested::<Gem>().json_schema().unwrap();
        assert_eq!(schema["title"], "Gem");
        assert_eq!(schema["anyOf"].as_array().unwrap().len(), 2);
    }
}
