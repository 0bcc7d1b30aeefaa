//! Property tests for facade generation.

use proptest::prelude::*;
use proptest::sample::Index;
use script_facade::prelude::*;

/// Catalog entries with unique aliases spread over a handful of modules.
fn unique_entries() -> impl Strategy<Value = Vec<CatalogEntry>> {
    prop::collection::btree_map("[A-Z][A-Za-z0-9]{0,10}", (0..4usize, 0..5usize), 1..40).prop_map(
        |aliases| {
            aliases
                .into_iter()
                .map(|(alias, (module, category))| {
                    CatalogEntry::new(format!("wd/Module{module}"), format!("{alias}Impl"), alias)
                        .in_category(Category::ALL[category])
                })
                .collect()
        },
    )
}

fn render(catalog: &Catalog) -> (String, String) {
    let artifact = generate_artifact(catalog, &catalog.sources(), &FacadeConfig::default()).unwrap();
    let manifest = artifact.manifest.to_json().unwrap();
    (artifact.barrel, manifest)
}

fn export_lines(barrel: &str) -> impl Iterator<Item = &str> {
    barrel.lines().filter(|line| line.starts_with("export import "))
}

proptest! {
    #[test]
    fn unique_aliases_always_resolve(entries in unique_entries()) {
        let catalog: Catalog = entries.iter().cloned().collect();
        let facade = Facade::generate(&catalog, &catalog.sources()).unwrap();

        prop_assert_eq!(facade.len(), entries.len());
        for entry in &entries {
            let export = facade.get(&entry.public_alias).unwrap();
            prop_assert_eq!(&export.identity.module, &entry.module);
            prop_assert_eq!(&export.identity.name, &entry.internal_name);
            prop_assert_eq!(export.category, entry.category);
        }
    }

    #[test]
    fn entry_order_does_not_change_the_artifact(
        (entries, shuffled) in unique_entries()
            .prop_flat_map(|entries| (Just(entries.clone()), Just(entries).prop_shuffle()))
    ) {
        let original: Catalog = entries.into_iter().collect();
        let shuffled: Catalog = shuffled.into_iter().collect();

        prop_assert_eq!(render(&original), render(&shuffled));
        prop_assert_eq!(render(&original), render(&original));
    }

    #[test]
    fn removing_an_entry_removes_only_its_alias(entries in unique_entries(), pick in any::<Index>()) {
        let catalog: Catalog = entries.iter().cloned().collect();
        let removed = pick.get(&entries).public_alias.clone();

        let mut smaller = catalog.clone();
        prop_assert_eq!(smaller.remove_alias(&removed), 1);

        let before = Facade::generate(&catalog, &catalog.sources()).unwrap();
        let after = Facade::generate(&smaller, &smaller.sources()).unwrap();

        prop_assert_eq!(after.len(), before.len() - 1);
        prop_assert!(!after.contains(&removed));
        for export in before.exports().filter(|export| export.alias != removed) {
            prop_assert_eq!(after.get(&export.alias), Some(export));
        }

        let (before_barrel, _) = render(&catalog);
        let (after_barrel, _) = render(&smaller);
        let removed_line = format!("export import {removed} = ");
        let mut expected: Vec<&str> = export_lines(&before_barrel)
            .filter(|line| !line.starts_with(&removed_line))
            .collect();
        let mut actual: Vec<&str> = export_lines(&after_barrel).collect();
        expected.sort();
        actual.sort();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn conflicting_alias_is_always_rejected(entries in unique_entries(), pick in any::<Index>()) {
        let victim = pick.get(&entries).clone();
        let mut catalog: Catalog = entries.into_iter().collect();
        catalog.push(CatalogEntry::new(
            victim.module.clone(),
            format!("{}Other", victim.internal_name),
            victim.public_alias.clone(),
        ));

        let result = Facade::generate(&catalog, &catalog.sources());
        let is_duplicate = matches!(
            result,
            Err(FacadeError::DuplicateAlias { ref alias, .. }) if *alias == victim.public_alias
        );
        prop_assert!(is_duplicate);
    }
}
