//! Bridge between Bevy's type registry and the facade catalog.
//!
//! Engine types opt into the facade by implementing [`ScriptBinding`] and
//! registering the matching type data:
//!
//! ```rust,ignore
//! #[derive(Component, Reflect)]
//! #[reflect(Component, ScriptBinding)]
//! pub struct CameraComponent;
//!
//! impl ScriptBinding for CameraComponent {
//!     const CATEGORY: Category = Category::Component;
//!     const MODULE: &'static str = "./wd/AllComponents";
//! }
//! ```

use std::collections::BTreeMap;

use bevy::{
    log::debug,
    reflect::{FromType, TypeRegistration, TypeRegistry},
};

use crate::{
    catalog::{Catalog, CatalogEntry, Category},
    error::{FacadeError, Result},
    source::{SourceIndex, TypeIdentity},
};

/// Describes how a reflected engine type is exposed to scripts.
pub trait ScriptBinding {
    const CATEGORY: Category;
    /// Script module the type lives in, e.g. `"TypeScript/wd/Vec2"`.
    const MODULE: &'static str;
    /// Public name, when it differs from the type's ident.
    const ALIAS: Option<&'static str> = None;
}

/// Type data stored for every type registered with `#[reflect(ScriptBinding)]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReflectScriptBinding {
    pub category: Category,
    pub module: &'static str,
    pub alias: Option<&'static str>,
}

impl<T: ScriptBinding> FromType<T> for ReflectScriptBinding {
    fn from_type() -> Self {
        Self {
            category: T::CATEGORY,
            module: T::MODULE,
            alias: T::ALIAS,
        }
    }
}

fn ident(registration: &TypeRegistration) -> &'static str {
    let info = registration.type_info();
    info.type_path_table()
        .ident()
        .unwrap_or_else(|| info.type_path_table().short_path())
}

/// Snapshot of the scriptable types in a [`TypeRegistry`].
///
/// Holds both the catalog (what should be exported) and the source index
/// (what the engine can provide), so the two always agree.
#[derive(Clone, Debug, Default)]
pub struct RegistryIndex {
    catalog: Catalog,
    sources: BTreeMap<(String, String), &'static str>,
}

impl RegistryIndex {
    /// Collects every registration carrying [`ReflectScriptBinding`].
    ///
    /// Entries are ordered by Rust type path so the catalog does not depend on
    /// registration order. Two Rust types claiming the same script name in the
    /// same module are rejected.
    pub fn scan(registry: &TypeRegistry) -> Result<Self> {
        let mut bound: Vec<(&'static str, &'static str, &ReflectScriptBinding)> = registry
            .iter()
            .filter_map(|registration| {
                registration.data::<ReflectScriptBinding>().map(|binding| {
                    (
                        registration.type_info().type_path(),
                        ident(registration),
                        binding,
                    )
                })
            })
            .collect();
        bound.sort_by_key(|(type_path, ..)| *type_path);

        let mut index = Self::default();
        for (type_path, name, binding) in bound {
            let key = (binding.module.to_string(), name.to_string());
            if let Some(first_type) = index.sources.get(&key) {
                return Err(FacadeError::AmbiguousSource {
                    module: key.0,
                    name: key.1,
                    first_type: first_type.to_string(),
                    second_type: type_path.to_string(),
                });
            }

            debug!("Binding {} as {} in \"{}\"", type_path, name, binding.module);
            index.catalog.push(
                CatalogEntry::new(binding.module, name, binding.alias.unwrap_or(name))
                    .in_category(binding.category),
            );
            index.sources.insert(key, type_path);
        }

        Ok(index)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The Rust type behind a script `(module, name)` pair.
    pub fn type_path(&self, module: &str, name: &str) -> Option<&'static str> {
        self.sources
            .get(&(module.to_string(), name.to_string()))
            .copied()
    }
}

impl SourceIndex for RegistryIndex {
    fn resolve(&self, module: &str, name: &str) -> Option<TypeIdentity> {
        self.type_path(module, name)
            .map(|_| TypeIdentity::new(module, name))
    }
}
