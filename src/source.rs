use std::{
    collections::{BTreeMap, BTreeSet},
    fmt, fs,
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::error::{FacadeError, Result};

/// The engine-owned type an alias stands for.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TypeIdentity {
    pub module: String,
    pub name: String,
}

impl TypeIdentity {
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' from '{}'", self.name, self.module)
    }
}

/// The host engine's view of which types exist in which script module.
///
/// Generation never looks at engine internals directly; it only asks this
/// trait whether a `(module, name)` pair can be located.
pub trait SourceIndex {
    fn resolve(&self, module: &str, name: &str) -> Option<TypeIdentity>;
}

/// An explicit module → exported names table.
///
/// Serialized as `{ "module": ["Name", ...] }`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleTable(BTreeMap<String, BTreeSet<String>>);

impl ModuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, module: impl Into<String>, name: impl Into<String>) -> &mut Self {
        self.0.entry(module.into()).or_default().insert(name.into());
        self
    }

    pub fn contains(&self, module: &str, name: &str) -> bool {
        self.0.get(module).is_some_and(|names| names.contains(name))
    }

    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| FacadeError::io(path, e))?;
        Self::from_json_str(&content)
    }
}

impl SourceIndex for ModuleTable {
    fn resolve(&self, module: &str, name: &str) -> Option<TypeIdentity> {
        self.contains(module, name)
            .then(|| TypeIdentity::new(module, name))
    }
}

impl<T: SourceIndex + ?Sized> SourceIndex for &T {
    fn resolve(&self, module: &str, name: &str) -> Option<TypeIdentity> {
        (**self).resolve(module, name)
    }
}
