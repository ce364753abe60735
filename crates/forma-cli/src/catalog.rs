//! # Built-in Catalog
//!
//! The namespace the `forma` binary resolves targets against.
//!
//! ```text
//! collections        Counter                       direct
//! datetime           date                          direct
//!                    date.fromisocalendar          direct
//!                    date.fromisoformat            direct
//! heroes             Weapon                        validated (init, from_role)
//!                    Hero                          validated (native record)
//! heroes.armory      Shield                        validated (init, from_material)
//! ```
//!
//! `heroes.armory` is not an attribute of `heroes`; it is only reachable by
//! importing the deeper path.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, Weekday};
use serde::Deserialize;
use serde_json::Value;

use forma_core::{Arguments, ConstructError, Instance};
use forma_resolve::{Callable, Module, ModuleRegistry};
use forma_schema::{deserialize_constructible, Constructible, ParamType, Signature, TypeDescriptor};

/// Populate a registry with every built-in module.
pub fn builtin_registry() -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    registry
        .register(Module::new("collections").with_callable(Callable::direct("Counter", counter)))
        .register(
            Module::new("datetime").with_callable(
                Callable::direct("date", date)
                    .with_attribute("fromisocalendar", Callable::direct("fromisocalendar", fromisocalendar))
                    .with_attribute("fromisoformat", Callable::direct("fromisoformat", fromisoformat)),
            ),
        )
        .register(
            Module::new("heroes")
                .with_callable(Callable::constructible::<Weapon>("Weapon"))
                .with_callable(Callable::constructible::<Hero>("Hero")),
        )
        .register(Module::new("heroes.armory").with_callable(Callable::constructible::<Shield>("Shield")));
    registry
}

/// Move positional arguments into `args` under the given parameter names.
fn bind_positional(positional: Vec<Value>, args: &mut Arguments, names: &[&str]) -> Result<(), ConstructError> {
    if positional.len() > names.len() {
        return Err(ConstructError::TooManyPositional {
            expected: names.len(),
            got: positional.len(),
        });
    }
    for (name, value) in names.iter().zip(positional) {
        if args.contains(name) {
            return Err(ConstructError::InvalidArgument {
                name: (*name).to_string(),
                reason: "given both positionally and by keyword".into(),
            });
        }
        args.insert(*name, value);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// collections
// ---------------------------------------------------------------------------

/// Element counts, printed most common first.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Counter(BTreeMap<String, u64>);

impl Counter {
    /// Count of one element, zero if never seen.
    pub fn get(&self, element: &str) -> u64 {
        self.0.get(element).copied().unwrap_or(0)
    }

    /// Elements ordered by descending count, ties in element order.
    pub fn most_common(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<(&str, u64)> = self.0.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }

    fn add(&mut self, element: String, n: u64) -> Result<(), ConstructError> {
        let total = self.get(&element).checked_add(n).ok_or_else(|| ConstructError::InvalidArgument {
            name: element.clone(),
            reason: format!("count overflows when adding {n}"),
        })?;
        self.0.insert(element, total);
        Ok(())
    }
}

impl fmt::Debug for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Counter(")?;
        f.debug_map().entries(self.most_common()).finish()?;
        f.write_str(")")
    }
}

/// `Counter(iterable=None, /, **kwds)`: count characters of a string or
/// items of a list, then add keyword counts.
fn counter(positional: Vec<Value>, named: Arguments) -> Result<Instance, ConstructError> {
    if positional.len() > 1 {
        return Err(ConstructError::TooManyPositional {
            expected: 1,
            got: positional.len(),
        });
    }
    let mut counts = Counter::default();
    match positional.into_iter().next() {
        None | Some(Value::Null) => {}
        Some(Value::String(text)) => {
            for c in text.chars() {
                counts.add(c.to_string(), 1)?;
            }
        }
        Some(Value::Array(items)) => {
            for item in items {
                let element = match item {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                counts.add(element, 1)?;
            }
        }
        Some(Value::Object(map)) => {
            for (key, value) in map {
                counts.add(key.clone(), count_value(&key, &value)?)?;
            }
        }
        Some(other) => {
            return Err(ConstructError::InvalidArgument {
                name: "iterable".into(),
                reason: format!("cannot count elements of {other}"),
            })
        }
    }
    for (key, value) in named.into_inner() {
        let n = count_value(&key, &value)?;
        counts.add(key, n)?;
    }
    Ok(Instance::new(counts))
}

fn count_value(name: &str, value: &Value) -> Result<u64, ConstructError> {
    value.as_u64().ok_or_else(|| ConstructError::InvalidArgument {
        name: name.to_string(),
        reason: format!("expected a non-negative count, got {value}"),
    })
}

// ---------------------------------------------------------------------------
// datetime
// ---------------------------------------------------------------------------

/// `date(year, month, day)`.
fn date(positional: Vec<Value>, mut args: Arguments) -> Result<Instance, ConstructError> {
    bind_positional(positional, &mut args, &["year", "month", "day"])?;
    let year: i32 = args.take("year")?;
    let month: u32 = args.take("month")?;
    let day: u32 = args.take("day")?;
    args.finish()?;
    NaiveDate::from_ymd_opt(year, month, day)
        .map(Instance::new)
        .ok_or_else(|| ConstructError::rejected(format!("invalid date: {year}-{month}-{day}")))
}

/// `date.fromisocalendar(year, week, day)`.
fn fromisocalendar(positional: Vec<Value>, mut args: Arguments) -> Result<Instance, ConstructError> {
    bind_positional(positional, &mut args, &["year", "week", "day"])?;
    let year: i32 = args.take("year")?;
    let week: u32 = args.take("week")?;
    let day: u8 = args.take("day")?;
    args.finish()?;
    let weekday = match day {
        1 => Weekday::Mon,
        2 => Weekday::Tue,
        3 => Weekday::Wed,
        4 => Weekday::Thu,
        5 => Weekday::Fri,
        6 => Weekday::Sat,
        7 => Weekday::Sun,
        other => return Err(ConstructError::rejected(format!("invalid weekday: {other} (range is [1, 7])"))),
    };
    NaiveDate::from_isoywd_opt(year, week, weekday)
        .map(Instance::new)
        .ok_or_else(|| ConstructError::rejected(format!("invalid week: {week}")))
}

/// `date.fromisoformat(date_string)`.
fn fromisoformat(positional: Vec<Value>, mut args: Arguments) -> Result<Instance, ConstructError> {
    bind_positional(positional, &mut args, &["date_string"])?;
    let text: String = args.take("date_string")?;
    args.finish()?;
    NaiveDate::parse_from_str(&text, "%Y-%m-%d")
        .map(Instance::new)
        .map_err(|_| ConstructError::rejected(format!("Invalid isoformat string: '{text}'")))
}

// ---------------------------------------------------------------------------
// heroes
// ---------------------------------------------------------------------------

/// A weapon, built from explicit stats or from a hero's role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Weapon {
    /// Display name.
    pub name: String,
    /// Damage per hit.
    pub damage: i64,
}

impl fmt::Display for Weapon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} damage", self.name, self.damage)
    }
}

impl Weapon {
    fn new(mut args: Arguments) -> Result<Self, ConstructError> {
        let weapon = Self {
            name: args.take("name")?,
            damage: args.take("damage")?,
        };
        args.finish()?;
        Ok(weapon)
    }

    fn from_role(mut args: Arguments) -> Result<Self, ConstructError> {
        let role: String = args.take("role")?;
        args.finish()?;
        match role.as_str() {
            "tank" => Ok(Self {
                name: "sword".into(),
                damage: 10,
            }),
            _ => Err(ConstructError::rejected(format!("Unknown role: {role}"))),
        }
    }
}

impl Constructible for Weapon {
    fn descriptor() -> TypeDescriptor<Self> {
        TypeDescriptor::with_initializer(
            "Weapon",
            Signature::initializer()
                .doc(
                    "A weapon.

                    Args:
                        name: Display name.
                        damage: Damage per hit.",
                )
                .param("name", ParamType::String)
                .param("damage", ParamType::Integer),
            Weapon::new,
        )
        .factory(
            Signature::new("from_role")
                .doc(
                    "Create a weapon based on the role.

                    Args:
                        role: The role of the hero. Only 'tank' is supported.",
                )
                .param("role", ParamType::String),
            Weapon::from_role,
        )
    }
}

/// A plain hero record whose weapon is built through its own union.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Hero {
    /// Hero name.
    pub name: String,
    /// Equipped weapon.
    #[serde(deserialize_with = "deserialize_constructible")]
    pub weapon: Weapon,
}

impl Constructible for Hero {
    fn descriptor() -> TypeDescriptor<Self> {
        TypeDescriptor::native(
            "Hero",
            Signature::initializer()
                .param("name", ParamType::String)
                .param("weapon", ParamType::nested::<Weapon>()),
        )
    }
}

/// A shield from the armory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shield {
    /// Display name.
    pub name: String,
    /// Damage blocked per hit.
    pub block: i64,
}

impl Shield {
    fn new(mut args: Arguments) -> Result<Self, ConstructError> {
        let shield = Self {
            name: args.take("name")?,
            block: args.take_or("block", 5)?,
        };
        args.finish()?;
        Ok(shield)
    }

    fn from_material(mut args: Arguments) -> Result<Self, ConstructError> {
        let material: String = args.take("material")?;
        args.finish()?;
        let block = match material.as_str() {
            "wood" => 3,
            "iron" => 8,
            _ => 6,
        };
        Ok(Self {
            name: format!("{material} shield"),
            block,
        })
    }
}

impl Constructible for Shield {
    fn descriptor() -> TypeDescriptor<Self> {
        TypeDescriptor::with_initializer(
            "Shield",
            Signature::initializer()
                .param("name", ParamType::String)
                .optional("block", ParamType::Integer, 5),
            Shield::new,
        )
        .factory(
            Signature::new("from_material")
                .doc("Forge a shield from a material.")
                .param("material", ParamType::choice(["wood", "iron", "steel"])),
            Shield::from_material,
        )
    }
}
