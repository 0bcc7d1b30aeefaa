//! Facade generation against the engine's full script catalog.

use std::fs;

use script_facade::prelude::*;
use tempfile::TempDir;

const EZ_CATALOG: &str = include_str!("fixtures/ez_catalog.json");

fn ez_catalog() -> Catalog {
    Catalog::from_json_str(EZ_CATALOG).expect("fixture catalog should parse")
}

/// Every enabled catalog entry becomes exactly one export.
#[test]
fn test_full_catalog_generates() {
    let catalog = ez_catalog();
    let facade = Facade::generate(&catalog, &catalog.sources()).unwrap();

    let enabled = catalog.iter().filter(|entry| entry.is_enabled()).count();
    assert_eq!(facade.len(), enabled);

    assert_eq!(facade.block(Category::Utility).count(), 22);
    assert_eq!(facade.block(Category::Component).count(), 88);
    assert_eq!(facade.block(Category::Message).count(), 41);
    assert_eq!(facade.block(Category::Enum).count(), 21);
    assert_eq!(facade.block(Category::Flags).count(), 3);

    assert_eq!(
        facade.resolve("TickedTypescriptComponent"),
        Some(&TypeIdentity::new(
            "TypeScript/wd/Component",
            "TickedTypescriptComponent"
        ))
    );
    assert_eq!(
        facade.resolve("MsgDamage"),
        Some(&TypeIdentity::new("./wd/AllMessages", "MsgDamage"))
    );
    assert_eq!(facade.resolve("EventMessage"), None);
}

/// Blocks appear in a fixed order with aliases sorted inside each one.
#[test]
fn test_barrel_layout() {
    let catalog = ez_catalog();
    let artifact = generate_artifact(&catalog, &catalog.sources(), &FacadeConfig::default()).unwrap();
    let barrel = &artifact.barrel;

    let blocks: Vec<&str> = barrel.trim_end().split("\n\n\n").collect();
    assert_eq!(blocks.len(), 5);
    assert!(blocks.iter().all(|block| block.starts_with("// AUTO-GENERATED\n")));

    assert!(blocks[1].contains("import __AllComponents = require(\"./wd/AllComponents\")"));
    assert!(blocks[2].contains("import __AllMessages = require(\"./wd/AllMessages\")"));
    assert!(blocks[3].contains("import __AllEnums = require(\"./wd/AllEnums\")"));
    assert!(blocks[4].contains("import __AllFlags = require(\"./wd/AllFlags\")"));

    let components: Vec<&str> = blocks[1]
        .lines()
        .filter_map(|line| line.strip_prefix("export import "))
        .collect();
    let mut sorted = components.clone();
    sorted.sort();
    assert_eq!(components, sorted);
    assert_eq!(
        components.first().copied(),
        Some("AlwaysVisibleComponent = __AllComponents.AlwaysVisibleComponent;")
    );

    assert!(blocks[0].contains(
        "//export import EventMessage = __Message.EventMessage; \
         // not supported yet, to write custom TS event messages"
    ));
    assert_eq!(barrel.matches("require(\"TypeScript/wd/Component\")").count(), 1);
}

/// Regenerating from an unchanged catalog changes nothing on disk.
#[test]
fn test_regeneration_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    let config = FacadeConfig::new(dir.path());
    let catalog = ez_catalog();

    generate_artifact(&catalog, &catalog.sources(), &config)
        .unwrap()
        .write()
        .unwrap();
    let first_barrel = fs::read(config.barrel_path()).unwrap();
    let first_manifest = fs::read(config.manifest_path()).unwrap();

    generate_artifact(&catalog, &catalog.sources(), &config)
        .unwrap()
        .write()
        .unwrap();
    assert_eq!(fs::read(config.barrel_path()).unwrap(), first_barrel);
    assert_eq!(fs::read(config.manifest_path()).unwrap(), first_manifest);
}

/// A catalog of two utilities exposes those two names and nothing else.
#[test]
fn test_two_entry_catalog() {
    let catalog = Catalog::from_json_str(
        r#"[["wd/Vec2", "Vec2", "Vec2"], ["wd/Mat3", "Mat3", "Mat3"]]"#,
    )
    .unwrap();

    let facade = Facade::generate(&catalog, &catalog.sources()).unwrap();

    let mut aliases: Vec<&str> = facade.aliases().collect();
    aliases.sort();
    assert_eq!(aliases, ["Mat3", "Vec2"]);
    assert_eq!(facade.resolve("Vec2"), Some(&TypeIdentity::new("wd/Vec2", "Vec2")));
    assert_eq!(facade.resolve("Mat3"), Some(&TypeIdentity::new("wd/Mat3", "Mat3")));
}

/// Two components asking for `Light` stop generation and nothing is written.
#[test]
fn test_duplicate_alias_fails_closed() {
    let dir = TempDir::new().unwrap();
    let config = FacadeConfig::new(dir.path());

    let mut catalog = ez_catalog();
    catalog.push(
        CatalogEntry::new("./wd/AllComponents", "LightComponent", "Light")
            .in_category(Category::Component),
    );
    catalog.push(
        CatalogEntry::new("./wd/AllComponents", "SpotLightComponent", "Light")
            .in_category(Category::Component),
    );

    let result = generate_artifact(&catalog, &catalog.sources(), &config);
    match result {
        Err(FacadeError::DuplicateAlias {
            alias,
            first,
            second,
        }) => {
            assert_eq!(alias, "Light");
            assert_eq!(first, TypeIdentity::new("./wd/AllComponents", "LightComponent"));
            assert_eq!(
                second,
                TypeIdentity::new("./wd/AllComponents", "SpotLightComponent")
            );
        }
        other => panic!("expected DuplicateAlias, got {other:?}"),
    }

    assert!(!config.barrel_path().exists());
    assert!(!config.manifest_path().exists());
}

/// A name the engine cannot provide is reported with its module.
#[test]
fn test_unresolved_source() {
    let catalog = ez_catalog();
    let mut sources = ModuleTable::new();
    for entry in catalog.iter().filter(|entry| entry.internal_name != "MsgCollision") {
        sources.insert(entry.module.clone(), entry.internal_name.clone());
    }

    let err = Facade::generate(&catalog, &sources).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Alias 'MsgCollision' points at 'MsgCollision' in module './wd/AllMessages', \
         which the engine does not provide"
    );
}

/// A facade written for an older catalog is refused by a newer engine.
#[test]
fn test_stale_facade_detected() {
    let dir = TempDir::new().unwrap();
    let config = FacadeConfig::new(dir.path());

    let mut old = ez_catalog();
    old.remove_alias("WindVolumeSphereComponent");
    generate_artifact(&old, &old.sources(), &config)
        .unwrap()
        .write()
        .unwrap();

    let current = ez_catalog();
    let engine = fingerprint(&Facade::generate(&current, &current.sources()).unwrap());

    let err = ResolvedFacade::load(config.manifest_path(), &engine).unwrap_err();
    assert!(matches!(err, FacadeError::StaleArtifact { .. }));
}

/// A retired type whose module is gone stays a comment and is never imported.
#[test]
fn test_disabled_entry_for_missing_module() {
    let catalog = ez_catalog();
    let sources = catalog.sources();

    let mut with_retired = catalog.clone();
    with_retired.push(
        CatalogEntry::new("TypeScript/wd/Legacy", "LegacyTween", "LegacyTween")
            .disabled("removed from the engine"),
    );

    let artifact = generate_artifact(&with_retired, &sources, &FacadeConfig::default()).unwrap();

    assert!(!artifact.barrel.contains("require(\"TypeScript/wd/Legacy\")"));
    assert!(artifact.barrel.contains(
        "//export import LegacyTween = __Legacy.LegacyTween; // removed from the engine"
    ));
    assert_eq!(
        artifact.fingerprint(),
        fingerprint(&Facade::generate(&catalog, &sources).unwrap())
    );
}
