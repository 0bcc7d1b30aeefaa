use std::{fmt, fs, path::Path};

use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    error::{FacadeError, Result},
    source::ModuleTable,
};

/// The block a catalog entry is emitted in.
///
/// Declaration order is the block order of the generated artifact.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[default]
    Utility,
    Component,
    Message,
    Enum,
    Flags,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Utility,
        Category::Component,
        Category::Message,
        Category::Enum,
        Category::Flags,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Utility => "utility",
            Category::Component => "component",
            Category::Message => "message",
            Category::Enum => "enum",
            Category::Flags => "flags",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `(module, internal_name, public_alias)` triple from the engine's
/// reflection metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub module: String,
    pub internal_name: String,
    pub public_alias: String,
    pub category: Category,
    /// Entries carrying a reason are kept in the artifact as commented-out
    /// exports and never resolve.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled: Option<String>,
}

impl CatalogEntry {
    pub fn new(
        module: impl Into<String>,
        internal_name: impl Into<String>,
        public_alias: impl Into<String>,
    ) -> Self {
        Self {
            module: module.into(),
            internal_name: internal_name.into(),
            public_alias: public_alias.into(),
            category: Category::Utility,
            disabled: None,
        }
    }

    pub fn in_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn disabled(mut self, reason: impl Into<String>) -> Self {
        self.disabled = Some(reason.into());
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.disabled.is_none()
    }
}

// Entries are accepted either as full objects or as bare
// `[module, internal_name, public_alias]` triples.
impl<'de> Deserialize<'de> for CatalogEntry {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Full {
            module: String,
            internal_name: String,
            public_alias: String,
            #[serde(default)]
            category: Category,
            #[serde(default)]
            disabled: Option<String>,
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Triple(String, String, String),
            Full(Full),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Triple(module, internal_name, public_alias) => {
                CatalogEntry::new(module, internal_name, public_alias)
            }
            Repr::Full(full) => CatalogEntry {
                module: full.module,
                internal_name: full.internal_name,
                public_alias: full.public_alias,
                category: full.category,
                disabled: full.disabled,
            },
        })
    }
}

/// The ordered list of scriptable types the engine wants exported.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn push(&mut self, entry: CatalogEntry) -> &mut Self {
        self.entries.push(entry);
        self
    }

    /// Drops every entry requesting `alias`, returning how many were removed.
    pub fn remove_alias(&mut self, alias: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.public_alias != alias);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    /// Treats the catalog itself as the list of types the engine provides.
    pub fn sources(&self) -> ModuleTable {
        let mut table = ModuleTable::new();
        for entry in &self.entries {
            table.insert(entry.module.clone(), entry.internal_name.clone());
        }
        table
    }

    /// Accepts either `{ "version": .., "entries": [..] }` or a bare entry array.
    pub fn from_json_str(json: &str) -> Result<Self> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Entries(Vec<CatalogEntry>),
            Full(Catalog),
        }

        Ok(match serde_json::from_str::<Repr>(json)? {
            Repr::Entries(entries) => Catalog {
                version: None,
                entries,
            },
            Repr::Full(catalog) => catalog,
        })
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| FacadeError::io(path, e))?;
        Self::from_json_str(&content)
    }
}

impl FromIterator<CatalogEntry> for Catalog {
    fn from_iter<I: IntoIterator<Item = CatalogEntry>>(iter: I) -> Self {
        Catalog {
            version: None,
            entries: iter.into_iter().collect(),
        }
    }
}
