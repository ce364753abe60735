//! # Signature Describer
//!
//! A constructor's parameter list, declared once next to the constructor,
//! and the record schema derived from it.
//!
//! ## Description Rules
//!
//! - One field per parameter, in declaration order. A leading receiver
//!   parameter named `self` or `cls` is skipped.
//! - A parameter without a default is required; one with a default is
//!   optional and carries that default.
//! - A factory (anything but the type's own initializer) gets a hidden
//!   [`DISCRIMINATOR_FIELD`] prepended, fixed to the factory's name and
//!   defaulted to it, so callers may omit it but never change it.
//! - Descriptions come from the callable's doc comment via
//!   [`forma_core::parse_doc`]. Undocumented parameters simply have none.
//! - Record schemas are open: keys a callable does not declare are ignored
//!   during matching and dropped before the callable sees the record.

use serde_json::{json, Map, Value};

use forma_core::parse_doc;

use crate::validate::SchemaError;

/// Name of the hidden field that records which factory a record targets.
pub const DISCRIMINATOR_FIELD: &str = "from_method";

/// Function name used for a type's own initializer when naming its variant.
pub const INITIALIZER_NAME: &str = "init";

/// Produces the JSON Schema of a nested constructible type.
pub type SchemaFn = fn() -> Result<Value, SchemaError>;

/// Declared type of a constructor parameter.
#[derive(Debug, Clone)]
pub enum ParamType {
    /// Any JSON value.
    Any,
    /// `true` / `false`.
    Bool,
    /// Whole number.
    Integer,
    /// Any number.
    Number,
    /// String.
    String,
    /// Homogeneous list.
    List(Box<ParamType>),
    /// String-keyed map with homogeneous values.
    Map(Box<ParamType>),
    /// The inner type or `null`.
    Optional(Box<ParamType>),
    /// One of a fixed set of literal values.
    Choice(Vec<Value>),
    /// Another type with its own schema, e.g. a constructible field.
    Nested {
        /// Name of the nested type, for diagnostics.
        type_name: &'static str,
        /// Schema producer, evaluated each time the schema is rendered.
        schema: SchemaFn,
    },
}

impl ParamType {
    /// List of `item`.
    pub fn list(item: ParamType) -> Self {
        Self::List(Box::new(item))
    }

    /// Map with `value` values.
    pub fn map(value: ParamType) -> Self {
        Self::Map(Box::new(value))
    }

    /// `inner` or `null`.
    pub fn optional(inner: ParamType) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// One of the given string literals.
    pub fn choice<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Choice(values.into_iter().map(|s| Value::String(s.into())).collect())
    }

    /// Render as a JSON Schema fragment.
    pub fn json_schema(&self) -> Result<Value, SchemaError> {
        Ok(match self {
            Self::Any => json!({}),
            Self::Bool => json!({"type": "boolean"}),
            Self::Integer => json!({"type": "integer"}),
            Self::Number => json!({"type": "number"}),
            Self::String => json!({"type": "string"}),
            Self::List(item) => json!({"type": "array", "items": item.json_schema()?}),
            Self::Map(value) => json!({"type": "object", "additionalProperties": value.json_schema()?}),
            Self::Optional(inner) => json!({"anyOf": [inner.json_schema()?, {"type": "null"}]}),
            Self::Choice(values) => json!({"enum": values}),
            Self::Nested { schema, .. } => schema()?,
        })
    }
}

/// One declared parameter.
#[derive(Debug, Clone)]
pub struct Param {
    /// Parameter name, also the record key.
    pub name: String,
    /// Declared type.
    pub ty: ParamType,
    /// Default value; `None` makes the parameter required.
    pub default: Option<Value>,
}

/// Declared signature of an initializer or factory.
#[derive(Debug, Clone)]
pub struct Signature {
    name: String,
    doc: Option<String>,
    params: Vec<Param>,
}

impl Signature {
    /// Signature of a function called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            params: Vec::new(),
        }
    }

    /// Signature of a type's own initializer.
    pub fn initializer() -> Self {
        Self::new(INITIALIZER_NAME)
    }

    /// Attach documentation text.
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Add a required parameter.
    pub fn param(mut self, name: impl Into<String>, ty: ParamType) -> Self {
        self.params.push(Param {
            name: name.into(),
            ty,
            default: None,
        });
        self
    }

    /// Add an optional parameter with a default.
    pub fn optional(mut self, name: impl Into<String>, ty: ParamType, default: impl Into<Value>) -> Self {
        self.params.push(Param {
            name: name.into(),
            ty,
            default: Some(default.into()),
        });
        self
    }

    /// Function name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Documentation text, if any.
    pub fn doc_text(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// Declared parameters, receiver included.
    pub fn params(&self) -> &[Param] {
        &self.params
    }
}

/// Whether a described callable is the type's initializer or a factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallableRole {
    /// The type's own initializer or native record layout.
    Initializer,
    /// An alternate factory; gets a discriminator.
    Factory,
}

/// One field of a record schema.
#[derive(Debug, Clone)]
pub struct Field {
    /// Record key.
    pub name: String,
    /// Declared type.
    pub ty: ParamType,
    /// Default value, if optional.
    pub default: Option<Value>,
    /// Human-readable description.
    pub description: Option<String>,
}

impl Field {
    /// Whether callers must supply this field.
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// Structured, validatable description of one callable's parameters.
#[derive(Debug, Clone)]
pub struct RecordSchema {
    name: String,
    description: Option<String>,
    discriminator: Option<String>,
    fields: Vec<Field>,
}

impl RecordSchema {
    /// Schema name (the `title` of the rendered document).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Short description from the doc comment.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Fixed discriminator value, for factory variants only.
    pub fn discriminator(&self) -> Option<&str> {
        self.discriminator.as_deref()
    }

    /// Parameter fields in declaration order (discriminator excluded).
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Names of required fields, in declaration order.
    pub fn required(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.is_required())
            .map(|f| f.name.as_str())
            .collect()
    }

    /// Render as a JSON Schema object.
    pub fn to_json_schema(&self) -> Result<Value, SchemaError> {
        let mut properties = Map::new();
        if let Some(tag) = &self.discriminator {
            properties.insert(
                DISCRIMINATOR_FIELD.to_string(),
                json!({"const": tag, "default": tag}),
            );
        }
        for field in &self.fields {
            let schema = annotate(field.ty.json_schema()?, field);
            properties.insert(field.name.clone(), schema);
        }

        let mut doc = Map::new();
        doc.insert("title".into(), Value::String(self.name.clone()));
        if let Some(desc) = &self.description {
            doc.insert("description".into(), Value::String(desc.clone()));
        }
        doc.insert("type".into(), json!("object"));
        doc.insert("properties".into(), Value::Object(properties));
        let required = self.required();
        if !required.is_empty() {
            doc.insert("required".into(), json!(required));
        }
        Ok(Value::Object(doc))
    }

    /// Drop every key that is neither a declared field nor the discriminator.
    pub fn retain_declared(&self, record: &mut Map<String, Value>) {
        record.retain(|key, _| {
            self.field(key).is_some() || (self.discriminator.is_some() && key == DISCRIMINATOR_FIELD)
        });
    }

    /// Rewrite integral floats (`15.0`) in integer-typed fields as integers.
    ///
    /// The schema engine already accepts them as integers; constructors
    /// deserializing into integer types would not.
    pub fn normalize_integers(&self, record: &mut Map<String, Value>) {
        for field in &self.fields {
            if let Some(value) = record.get_mut(&field.name) {
                normalize_integer(&field.ty, value);
            }
        }
    }

    /// Fill in declared defaults (and the discriminator) for absent keys.
    pub fn fill_defaults(&self, record: &mut Map<String, Value>) {
        if let Some(tag) = &self.discriminator {
            record
                .entry(DISCRIMINATOR_FIELD)
                .or_insert_with(|| Value::String(tag.clone()));
        }
        for field in &self.fields {
            if let Some(default) = &field.default {
                record
                    .entry(field.name.as_str())
                    .or_insert_with(|| default.clone());
            }
        }
    }
}

/// Describe a callable as a record schema called `schema_name`.
pub fn describe(signature: &Signature, schema_name: &str, role: CallableRole) -> RecordSchema {
    let doc = signature.doc_text().map(parse_doc).unwrap_or_default();

    let params = match signature.params.first() {
        Some(first) if first.name == "self" || first.name == "cls" => &signature.params[1..],
        _ => &signature.params[..],
    };

    let fields = params
        .iter()
        .map(|p| Field {
            name: p.name.clone(),
            ty: p.ty.clone(),
            default: p.default.clone(),
            description: doc.param(&p.name).map(str::to_string),
        })
        .collect();

    RecordSchema {
        name: schema_name.to_string(),
        description: doc.short_description,
        discriminator: match role {
            CallableRole::Factory => Some(signature.name.clone()),
            CallableRole::Initializer => None,
        },
        fields,
    }
}

fn normalize_integer(ty: &ParamType, value: &mut Value) {
    match (ty, value) {
        (ParamType::Integer, value) if value.is_f64() => {
            if let Some(whole) = value.as_f64().and_then(integral) {
                *value = whole;
            }
        }
        (ParamType::Optional(inner), value) => normalize_integer(inner, value),
        (ParamType::List(item), Value::Array(items)) => {
            items.iter_mut().for_each(|v| normalize_integer(item, v));
        }
        (ParamType::Map(inner), Value::Object(map)) => {
            map.values_mut().for_each(|v| normalize_integer(inner, v));
        }
        _ => {}
    }
}

fn integral(f: f64) -> Option<Value> {
    if f.fract() != 0.0 {
        return None;
    }
    if f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(Value::from(f as i64))
    } else if f >= 0.0 && f < u64::MAX as f64 {
        Some(Value::from(f as u64))
    } else {
        None
    }
}

fn annotate(schema: Value, field: &Field) -> Value {
    let mut obj = match schema {
        Value::Object(obj) => obj,
        other => {
            let mut wrapped = Map::new();
            wrapped.insert("allOf".into(), json!([other]));
            wrapped
        }
    };
    if let Some(desc) = &field.description {
        obj.insert("description".into(), Value::String(desc.clone()));
    }
    if let Some(default) = &field.default {
        obj.insert("default".into(), default.clone());
    }
    Value::Object(obj)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_role() -> Signature {
        Signature::new("from_role")
            .doc(
                "Create a weapon based on the role.

                Args:
                    role: The role of the hero. Only 'tank' is supported.
                ",
            )
            .param("role", ParamType::String)
    }

    #[test]
    fn test_factory_gets_discriminator() {
        let schema = describe(&from_role(), "WeaponFromRole", CallableRole::Factory);
        assert_eq!(schema.discriminator(), Some("from_role"));
        assert_eq!(schema.description(), Some("Create a weapon based on the role."));
        assert_eq!(
            schema.field("role").and_then(|f| f.description.as_deref()),
            Some("The role of the hero. Only 'tank' is supported.")
        );

        let doc = schema.to_json_schema().unwrap();
        assert_eq!(doc["title"], "WeaponFromRole");
        assert_eq!(doc["properties"]["from_method"]["const"], "from_role");
        assert_eq!(doc["properties"]["from_method"]["default"], "from_role");
        assert_eq!(doc["required"], json!(["role"]));
        assert!(doc.get("additionalProperties").is_none());
    }

    #[test]
    fn test_initializer_has_no_discriminator() {
        let sig = Signature::initializer()
            .param("name", ParamType::String)
            .param("damage", ParamType::Integer);
        let schema = describe(&sig, "WeaponInit", CallableRole::Initializer);
        assert_eq!(schema.discriminator(), None);
        let doc = schema.to_json_schema().unwrap();
        assert!(doc["properties"].get(DISCRIMINATOR_FIELD).is_none());
        assert_eq!(doc["required"], json!(["name", "damage"]));
    }

    #[test]
    fn test_field_order_follows_declaration() {
        let sig = Signature::initializer()
            .param("zeta", ParamType::String)
            .param("alpha", ParamType::String)
            .optional("mid", ParamType::Integer, 3);
        let doc = describe(&sig, "T", CallableRole::Factory).to_json_schema().unwrap();
        let keys: Vec<&String> = doc["properties"].as_object().unwrap().keys().collect();
        assert_eq!(keys, ["from_method", "zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_receiver_is_skipped() {
        let sig = Signature::initializer()
            .param("self", ParamType::Any)
            .param("value", ParamType::Integer);
        let schema = describe(&sig, "T", CallableRole::Initializer);
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["value"]);
    }

    #[test]
    fn test_receiver_only_skipped_in_leading_position() {
        let sig = Signature::initializer()
            .param("value", ParamType::Integer)
            .param("self", ParamType::Any);
        let schema = describe(&sig, "T", CallableRole::Initializer);
        assert_eq!(schema.fields().len(), 2);
    }

    #[test]
    fn test_defaults_make_fields_optional() {
        let sig = Signature::initializer()
            .param("name", ParamType::String)
            .optional("label", ParamType::optional(ParamType::String), Value::Null);
        let schema = describe(&sig, "T", CallableRole::Initializer);
        assert_eq!(schema.required(), ["name"]);
        let doc = schema.to_json_schema().unwrap();
        assert_eq!(doc["properties"]["label"]["default"], Value::Null);
        assert_eq!(doc["properties"]["label"]["anyOf"][1]["type"], "null");
    }

    #[test]
    fn test_undocumented_callable_has_no_descriptions() {
        let sig = Signature::new("from_seed").param("seed", ParamType::Integer);
        let schema = describe(&sig, "RngFromSeed", CallableRole::Factory);
        assert_eq!(schema.description(), None);
        let doc = schema.to_json_schema().unwrap();
        assert!(doc.get("description").is_none());
        assert!(doc["properties"]["seed"].get("description").is_none());
    }

    #[test]
    fn test_fill_defaults_keeps_supplied_values() {
        let sig = Signature::new("from_parts")
            .param("a", ParamType::Integer)
            .optional("b", ParamType::Integer, 2);
        let schema = describe(&sig, "T", CallableRole::Factory);
        let mut record = json!({"a": 1, "b": 5}).as_object().cloned().unwrap();
        schema.fill_defaults(&mut record);
        assert_eq!(Value::Object(record), json!({"a": 1, "b": 5, "from_method": "from_parts"}));

        let mut sparse = json!({"a": 1}).as_object().cloned().unwrap();
        schema.fill_defaults(&mut sparse);
        assert_eq!(sparse["b"], 2);
    }

    #[test]
    fn test_retain_declared_drops_undeclared_keys() {
        let factory = describe(&from_role(), "WeaponFromRole", CallableRole::Factory);
        let mut record = json!({"from_method": "from_role", "role": "tank", "note": "spare"})
            .as_object()
            .cloned()
            .unwrap();
        factory.retain_declared(&mut record);
        assert_eq!(Value::Object(record), json!({"from_method": "from_role", "role": "tank"}));

        let init = describe(
            &Signature::initializer().param("name", ParamType::String),
            "WeaponInit",
            CallableRole::Initializer,
        );
        let mut record = json!({"from_method": "init", "name": "axe"}).as_object().cloned().unwrap();
        init.retain_declared(&mut record);
        assert_eq!(Value::Object(record), json!({"name": "axe"}));
    }

    #[test]
    fn test_normalize_integers_rewrites_integral_floats() {
        let sig = Signature::initializer()
            .param("damage", ParamType::Integer)
            .param("ratio", ParamType::Number)
            .param("slots", ParamType::list(ParamType::Integer))
            .optional("bonus", ParamType::optional(ParamType::Integer), Value::Null);
        let schema = describe(&sig, "T", CallableRole::Initializer);
        let mut record = json!({"damage": 15.0, "ratio": 2.0, "slots": [1.0, 2], "bonus": 3.0})
            .as_object()
            .cloned()
            .unwrap();
        schema.normalize_integers(&mut record);
        assert_eq!(
            Value::Object(record),
            json!({"damage": 15, "ratio": 2.0, "slots": [1, 2], "bonus": 3})
        );
    }

    #[test]
    fn test_normalize_integers_leaves_fractions() {
        let schema = describe(&Signature::initializer().param("n", ParamType::Integer), "T", CallableRole::Initializer);
        let mut record = json!({"n": 1.5}).as_object().cloned().unwrap();
        schema.normalize_integers(&mut record);
        assert_eq!(record["n"], 1.5);
    }

    #[test]
    fn test_param_type_fragments() {
        assert_eq!(ParamType::list(ParamType::Integer).json_schema().unwrap(),
            json!({"type": "array", "items": {"type": "integer"}}));
        assert_eq!(ParamType::map(ParamType::Bool).json_schema().unwrap(),
            json!({"type": "object", "additionalProperties": {"type": "boolean"}}));
        assert_eq!(ParamType::choice(["tank", "healer"]).json_schema().unwrap(),
            json!({"enum": ["tank", "healer"]}));
        assert_eq!(ParamType::Any.json_schema().unwrap(), json!({}));
    }
}
