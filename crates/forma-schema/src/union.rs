//! # Union Schema Assembler
//!
//! Builds, for one type, the discriminated union of every way the type can be
//! constructed, and maps a validated record back to the constructor that
//! accepts it.
//!
//! ## Members
//!
//! ```text
//!   TypeDescriptor<Weapon>
//!     ├── factories (registration table, declaration order)
//!     │     from_role(role)            ──▶ WeaponFromRole   [from_method = "from_role"]
//!     │     from_loadout(slots, ...)   ──▶ WeaponFromLoadout [from_method = "from_loadout"]
//!     └── base
//!           Initializer(name, damage)  ──▶ WeaponInit       (no discriminator)
//!        or Native(record layout)      ──▶ Weapon           (serde deserialization)
//! ```
//!
//! With the default [`FactorySelection::All`], every registered factory whose
//! name starts with [`FACTORY_PREFIX`] becomes a member. [`FactorySelection::Only`]
//! picks an explicit list instead, in the listed order.
//!
//! ## Matching
//!
//! Members are tried in assembled order (factories, then the base member) and
//! the first one whose required fields are present and whose field types
//! accept the supplied values wins. Keys a member does not declare play no
//! part in matching, so a record carrying the fields of several members is
//! built by the earliest of them.
//!
//! Each member carries its own construction action, so dispatching a matched
//! record needs no lookup by name. Undeclared keys and the discriminator are
//! removed from the record before the constructor sees it.
//!
//! Nothing here is cached: a [`UnionSchema`] is assembled on every request.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use forma_core::{Arguments, ConstructError};

use crate::signature::{RecordSchema, Signature, DISCRIMINATOR_FIELD};
use crate::validate::{check, AlternativeFailure, AlternativeFailures, SchemaError, ValidationError};
use crate::variant::{factory_variant, initializer_variant, native_variant};

/// Name prefix that marks a registered function as an alternate factory.
pub const FACTORY_PREFIX: &str = "from_";

/// Initializer or factory body: keyword arguments in, value out.
pub type BuildFn<T> = fn(Arguments) -> Result<T, ConstructError>;

/// Native record construction from already-validated data.
pub type NativeFn<T> = fn(Value) -> Result<T, serde_json::Error>;

/// Optional custom serializer for constructed values.
pub type SerializeFn<T> = fn(&T) -> Value;

/// Which registered factories take part in the union.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FactorySelection {
    /// Every factory whose name starts with [`FACTORY_PREFIX`].
    #[default]
    All,
    /// Exactly these factories, in this order.
    Only(Vec<String>),
}

/// A registered constructor function and its declared signature.
#[derive(Debug, Clone)]
pub struct Factory<T> {
    signature: Signature,
    build: BuildFn<T>,
}

impl<T> Factory<T> {
    /// Declared signature.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }
}

#[derive(Debug, Clone)]
enum Base<T> {
    Initializer(Factory<T>),
    Native { signature: Signature, build: NativeFn<T> },
}

/// Everything a type declares about how it can be built.
///
/// Built by [`Constructible::descriptor`]; consumed by [`UnionSchema::assemble`].
#[derive(Debug, Clone)]
pub struct TypeDescriptor<T> {
    type_name: String,
    selection: FactorySelection,
    factories: Vec<Factory<T>>,
    base: Base<T>,
    serializer: Option<SerializeFn<T>>,
}

impl<T> TypeDescriptor<T> {
    /// A type built through its own initializer when no factory matches.
    pub fn with_initializer(type_name: impl Into<String>, signature: Signature, build: BuildFn<T>) -> Self {
        Self {
            type_name: type_name.into(),
            selection: FactorySelection::All,
            factories: Vec::new(),
            base: Base::Initializer(Factory { signature, build }),
            serializer: None,
        }
    }

    /// A plain structured record: validated against `layout`, then
    /// deserialized directly without a second validation pass.
    pub fn native(type_name: impl Into<String>, layout: Signature) -> Self
    where
        T: DeserializeOwned,
    {
        Self {
            type_name: type_name.into(),
            selection: FactorySelection::All,
            factories: Vec::new(),
            base: Base::Native {
                signature: layout,
                build: deserialize_record::<T>,
            },
            serializer: None,
        }
    }

    /// Register an alternate factory.
    pub fn factory(mut self, signature: Signature, build: BuildFn<T>) -> Self {
        self.factories.push(Factory { signature, build });
        self
    }

    /// Restrict the union to the named factories, in the given order.
    pub fn only<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selection = FactorySelection::Only(names.into_iter().map(Into::into).collect());
        self
    }

    /// Opt into a custom serializer for constructed values.
    pub fn serializer(mut self, serialize: SerializeFn<T>) -> Self {
        self.serializer = Some(serialize);
        self
    }

    /// Type name used for variant naming.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Current factory selection.
    pub fn selection(&self) -> &FactorySelection {
        &self.selection
    }

    /// All registered factories, selected or not.
    pub fn factories(&self) -> &[Factory<T>] {
        &self.factories
    }

    fn selected_factories(&self) -> Result<Vec<&Factory<T>>, SchemaError> {
        match &self.selection {
            FactorySelection::All => Ok(self
                .factories
                .iter()
                .filter(|f| f.signature.name().starts_with(FACTORY_PREFIX))
                .collect()),
            FactorySelection::Only(names) => names
                .iter()
                .map(|name| {
                    self.factories
                        .iter()
                        .find(|f| f.signature.name() == name)
                        .ok_or_else(|| SchemaError::UnknownFactory {
                            type_name: self.type_name.clone(),
                            factory: name.clone(),
                        })
                })
                .collect(),
        }
    }
}

fn deserialize_record<T: DeserializeOwned>(value: Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(value)
}

/// How a member turns its validated record into a value.
#[derive(Debug, Clone)]
enum Construction<T> {
    Initializer(BuildFn<T>),
    Factory(BuildFn<T>),
    Native(NativeFn<T>),
}

/// Kind of a union member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    /// An alternate factory, tagged with a discriminator.
    Factory,
    /// The type's own initializer.
    Initializer,
    /// The type's native record layout.
    Native,
}

/// One alternative of a union: a record schema plus its construction action.
#[derive(Debug, Clone)]
pub struct UnionMember<T> {
    schema: RecordSchema,
    construction: Construction<T>,
}

impl<T> UnionMember<T> {
    /// The member's record schema.
    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    /// Member schema name.
    pub fn name(&self) -> &str {
        self.schema.name()
    }

    /// Which construction path this member represents.
    pub fn kind(&self) -> MemberKind {
        match self.construction {
            Construction::Initializer(_) => MemberKind::Initializer,
            Construction::Factory(_) => MemberKind::Factory,
            Construction::Native(_) => MemberKind::Native,
        }
    }

    /// Post-validation transform: keep the declared fields, normalize
    /// integral floats, fill defaults, drop the discriminator, and hand the
    /// rest to the member's constructor.
    fn construct(&self, value: &Value) -> Result<T, ValidationError> {
        let mut record: Map<String, Value> = value.as_object().cloned().unwrap_or_default();
        self.schema.retain_declared(&mut record);
        self.schema.normalize_integers(&mut record);
        self.schema.fill_defaults(&mut record);
        record.remove(DISCRIMINATOR_FIELD);

        let built = match &self.construction {
            Construction::Initializer(build) | Construction::Factory(build) => {
                build(Arguments::new(record))
            }
            Construction::Native(build) => build(Value::Object(record))
                .map_err(|e| ConstructError::Rejected(e.to_string())),
        };
        built.map_err(|source| {
            tracing::warn!(variant = self.name(), error = %source, "constructor refused validated record");
            ValidationError::Construction {
                variant: self.name().to_string(),
                source,
            }
        })
    }
}

/// The discriminated union of every way to construct a `T`.
#[derive(Debug, Clone)]
pub struct UnionSchema<T> {
    type_name: String,
    members: Vec<UnionMember<T>>,
    serializer: Option<SerializeFn<T>>,
}

impl<T> UnionSchema<T> {
    /// Enumerate the type's variants and assemble them into a union.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnknownFactory` if an explicit selection names a
    /// factory the type never registered.
    pub fn assemble(descriptor: TypeDescriptor<T>) -> Result<Self, SchemaError> {
        let type_name = descriptor.type_name.as_str();
        let mut members: Vec<UnionMember<T>> = descriptor
            .selected_factories()?
            .into_iter()
            .map(|f| UnionMember {
                schema: factory_variant(type_name, &f.signature),
                construction: Construction::Factory(f.build),
            })
            .collect();

        members.push(match &descriptor.base {
            Base::Native { signature, build } => UnionMember {
                schema: native_variant(type_name, signature),
                construction: Construction::Native(*build),
            },
            Base::Initializer(init) => UnionMember {
                schema: initializer_variant(type_name, &init.signature),
                construction: Construction::Initializer(init.build),
            },
        });

        tracing::debug!(
            type_name,
            members = members.len(),
            "assembled constructor union"
        );

        Ok(Self {
            type_name: descriptor.type_name,
            members,
            serializer: descriptor.serializer,
        })
    }

    /// Name of the type this union builds.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Members in matching order.
    pub fn members(&self) -> &[UnionMember<T>] {
        &self.members
    }

    /// Member schema names in matching order.
    pub fn member_names(&self) -> Vec<&str> {
        self.members.iter().map(UnionMember::name).collect()
    }

    /// Whether the type is a native record rather than an initializer-built type.
    pub fn is_native(&self) -> bool {
        self.members
            .last()
            .is_some_and(|m| m.kind() == MemberKind::Native)
    }

    /// Render the whole union as one JSON Schema document.
    pub fn to_json_schema(&self) -> Result<Value, SchemaError> {
        let any_of = self
            .members
            .iter()
            .map(|m| m.schema.to_json_schema())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(serde_json::json!({
            "title": self.type_name,
            "anyOf": any_of,
        }))
    }

    /// Validate a raw record and construct a `T` from the first matching member.
    ///
    /// # Errors
    ///
    /// - `ValidationError::NoMatch` with one entry per member if nothing matched.
    /// - `ValidationError::Construction` if the matched constructor refused.
    /// - `ValidationError::Schema` if a member schema could not be compiled.
    pub fn validate(&self, value: &Value) -> Result<T, ValidationError> {
        let mut failures = Vec::with_capacity(self.members.len());
        for member in &self.members {
            let schema = member.schema.to_json_schema()?;
            let violations = check(member.name(), &schema, value)?;
            if violations.is_empty() {
                tracing::debug!(
                    type_name = %self.type_name,
                    variant = member.name(),
                    "record matched union member"
                );
                return member.construct(value);
            }
            tracing::trace!(
                variant = member.name(),
                violations = violations.len(),
                "union member rejected record"
            );
            failures.push(AlternativeFailure {
                alternative: member.name().to_string(),
                violations,
            });
        }
        Err(ValidationError::NoMatch {
            type_name: self.type_name.clone(),
            alternatives: AlternativeFailures::new(failures),
        })
    }

    /// Serialize a constructed value with the type's custom serializer.
    ///
    /// Returns `None` when the type did not opt in; callers then fall back to
    /// whatever general mechanism they use for arbitrary values.
    pub fn serialize(&self, value: &T) -> Option<Value> {
        self.serializer.map(|serialize| serialize(value))
    }
}

/// A type that declares its constructors and can be built from a validated record.
pub trait Constructible: Sized + Send + Sync + 'static {
    /// Declare the type's initializer or native layout and its factories.
    fn descriptor() -> TypeDescriptor<Self>;

    /// Assemble a fresh union for this type.
    fn union_schema() -> Result<UnionSchema<Self>, SchemaError> {
        UnionSchema::assemble(Self::descriptor())
    }

    /// JSON Schema document of the union.
    fn json_schema() -> Result<Value, SchemaError> {
        Self::union_schema()?.to_json_schema()
    }

    /// Validate a raw record and construct through the matching member.
    fn model_validate(value: &Value) -> Result<Self, ValidationError> {
        Self::union_schema()?.validate(value)
    }
}
