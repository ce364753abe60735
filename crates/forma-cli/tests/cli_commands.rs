//! Integration test: build and schema handlers against descriptor files on
//! disk and the built-in catalog.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde_json::{json, Value};

use forma_cli::build::{build_instance, run_build, BuildArgs};
use forma_cli::catalog::{Counter, Hero, Shield, Weapon};
use forma_cli::config::CliConfig;
use forma_cli::schema::{run_schema, target_schema, SchemaArgs};
use forma_resolve::{DescriptorKeys, InitError};

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn args(descriptor: PathBuf) -> BuildArgs {
    BuildArgs {
        descriptor,
        set: Vec::new(),
        args: Vec::new(),
    }
}

#[test]
fn test_build_weapon_from_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "weapon.yaml", "target: heroes.Weapon\nname: axe\ndamage: 15\n");

    let weapon = build_instance(&args(path), &CliConfig::default())
        .unwrap()
        .downcast::<Weapon>()
        .unwrap();
    assert_eq!(weapon.to_string(), "axe - 15 damage");
}

#[test]
fn test_build_weapon_from_role_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "weapon.json", r#"{"target": "heroes.Weapon", "role": "tank"}"#);

    let weapon = build_instance(&args(path), &CliConfig::default()).unwrap();
    assert_eq!(weapon.downcast_ref::<Weapon>().map(|w| w.name.as_str()), Some("sword"));
}

#[test]
fn test_set_overrides_descriptor() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "weapon.yaml", "target: heroes.Weapon\nname: axe\ndamage: 15\n");
    let mut build = args(path);
    build.set = vec![("damage".into(), json!(20))];

    let weapon = build_instance(&build, &CliConfig::default())
        .unwrap()
        .downcast::<Weapon>()
        .unwrap();
    assert_eq!(weapon.damage, 20);
}

#[test]
fn test_build_counter_with_extra_positional_is_too_many() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "counter.yaml", "target: collections.Counter\npositional-args: [abb]\n");

    let counter = build_instance(&args(path.clone()), &CliConfig::default())
        .unwrap()
        .downcast::<Counter>()
        .unwrap();
    assert_eq!(counter.most_common(), [("b", 2), ("a", 1)]);

    let mut build = args(path);
    build.args = vec![json!("xyz")];
    let err = build_instance(&build, &CliConfig::default()).unwrap_err();
    let init = err.downcast_ref::<InitError>().unwrap();
    assert!(matches!(init, InitError::Call { .. }), "{init}");
}

#[test]
fn test_build_date_fromisocalendar() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "date.yaml",
        "target: datetime.date.fromisocalendar\nyear: 2021\nweek: 1\nday: 1\n",
    );

    let date = build_instance(&args(path), &CliConfig::default())
        .unwrap()
        .downcast::<NaiveDate>()
        .unwrap();
    assert_eq!(date, NaiveDate::from_ymd_opt(2021, 1, 4).unwrap());
}

#[test]
fn test_build_hero_with_nested_weapon() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "hero.yaml",
        "target: heroes.Hero\nname: Conan\nweapon:\n  role: tank\n",
    );

    let hero = build_instance(&args(path), &CliConfig::default())
        .unwrap()
        .downcast::<Hero>()
        .unwrap();
    assert_eq!(hero.name, "Conan");
    assert_eq!(hero.weapon.name, "sword");
}

#[test]
fn test_build_shield_through_import_only_module() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "shield.yaml", "target: heroes.armory.Shield\nmaterial: wood\n");

    let shield = build_instance(&args(path), &CliConfig::default())
        .unwrap()
        .downcast::<Shield>()
        .unwrap();
    assert_eq!(shield.block, 3);
}

#[test]
fn test_custom_descriptor_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "counter.yaml", "_target_: collections.Counter\n_args_: [aab]\n");
    let config = CliConfig {
        descriptor_keys: DescriptorKeys {
            target: "_target_".into(),
            positional: "_args_".into(),
        },
    };

    let counter = build_instance(&args(path), &config)
        .unwrap()
        .downcast::<Counter>()
        .unwrap();
    assert_eq!(counter.get("a"), 2);
}

#[test]
fn test_build_errors_carry_context() {
    let dir = tempfile::tempdir().unwrap();

    let path = write(dir.path(), "weapon.yaml", "target: heroes.Weapon\ncolour: red\n");
    let err = build_instance(&args(path), &CliConfig::default()).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("building 'heroes.Weapon'"), "{message}");
    assert!(message.contains("WeaponFromRole"), "{message}");

    let path = write(dir.path(), "missing.yaml", "target: heroes.Dragon\n");
    let err = build_instance(&args(path), &CliConfig::default()).unwrap_err();
    assert!(matches!(err.downcast_ref::<InitError>(), Some(InitError::Resolution { .. })));

    let err = build_instance(&args(dir.path().join("absent.yaml")), &CliConfig::default()).unwrap_err();
    assert!(format!("{err:#}").contains("loading descriptor"));
}

#[test]
fn test_run_build_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "weapon.yaml", "target: heroes.Weapon\nrole: tank\n");
    assert_eq!(run_build(&args(path), &CliConfig::default()).unwrap(), 0);
}

#[test]
fn test_target_schema() {
    let schema = target_schema("heroes.Weapon").unwrap();
    assert_eq!(schema["title"], "Weapon");
    let titles: Vec<&str> = schema["anyOf"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|m| m["title"].as_str())
        .collect();
    assert_eq!(titles, ["WeaponFromRole", "WeaponInit"]);

    let err = target_schema("collections.Counter").unwrap_err();
    assert!(matches!(err.downcast_ref::<InitError>(), Some(InitError::Usage(_))));
}

#[test]
fn test_run_schema_writes_files() {
    let dir = tempfile::tempdir().unwrap();

    let output = dir.path().join("weapon.schema.json");
    let code = run_schema(&SchemaArgs {
        target: "heroes.Weapon".into(),
        output: Some(output.clone()),
        with_document: false,
    })
    .unwrap();
    assert_eq!(code, 0);
    let written: Value = serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written["title"], "Weapon");

    let output = dir.path().join("config/hero.json");
    run_schema(&SchemaArgs {
        target: "heroes.Hero".into(),
        output: Some(output.clone()),
        with_document: true,
    })
    .unwrap();
    let stub: Value = serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    let schema_path = PathBuf::from(stub["$schema"].as_str().unwrap());
    assert!(schema_path.ends_with("config/hero.schema.json"));
    let schema: Value = serde_json::from_str(&std::fs::read_to_string(schema_path).unwrap()).unwrap();
    assert_eq!(schema["anyOf"][0]["properties"]["weapon"]["title"], "Weapon");
}
