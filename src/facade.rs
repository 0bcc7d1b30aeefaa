use bevy::{
    log::{debug, info},
    platform::collections::{HashMap, HashSet},
};

use crate::{
    catalog::{Catalog, Category},
    config::FacadeConfig,
    error::{FacadeError, Result},
    render::{import_binding, last_segment},
    source::{SourceIndex, TypeIdentity},
};

/// A public alias and the engine type it stands for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Export {
    pub alias: String,
    pub category: Category,
    pub identity: TypeIdentity,
}

/// A catalog entry that is listed in the artifact but never resolves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisabledExport {
    pub alias: String,
    pub category: Category,
    pub source: TypeIdentity,
    pub reason: String,
}

/// The export table of a facade: every public alias mapped to exactly one
/// engine type.
///
/// # Description
///
/// Exports are kept in artifact order: blocks follow [`Category`] order and
/// aliases are sorted within each block. The same catalog and sources always
/// produce the same table, whatever order the catalog lists its entries in.
#[derive(Clone, Debug, Default)]
pub struct Facade {
    exports: Vec<Export>,
    disabled: Vec<DisabledExport>,
    index: HashMap<String, usize>,
}

impl Facade {
    /// Builds the export table with the default import prefix.
    pub fn generate(catalog: &Catalog, sources: &impl SourceIndex) -> Result<Self> {
        Self::generate_with(catalog, sources, &FacadeConfig::default())
    }

    /// Builds the export table, failing on the first entry (in catalog order)
    /// that cannot be exported.
    pub fn generate_with(
        catalog: &Catalog,
        sources: &impl SourceIndex,
        config: &FacadeConfig,
    ) -> Result<Self> {
        config.validate()?;

        let mut by_alias: HashMap<String, Export> = HashMap::default();
        let mut disabled: Vec<DisabledExport> = Vec::new();
        let mut bindings: HashMap<String, String> = HashMap::default();

        for entry in catalog.iter() {
            validate_alias(&entry.public_alias, &config.import_prefix)?;
            validate_source(&entry.public_alias, &entry.module, &entry.internal_name)?;

            if let Some(reason) = &entry.disabled {
                if reason.chars().any(breaks_line) {
                    return Err(FacadeError::InvalidEntry {
                        alias: entry.public_alias.clone(),
                        field: "disabled reason",
                        value: reason.clone(),
                        reason: "it may not contain line breaks or control characters",
                    });
                }
                disabled.push(DisabledExport {
                    alias: entry.public_alias.clone(),
                    category: entry.category,
                    source: TypeIdentity::new(&entry.module, &entry.internal_name),
                    reason: reason.clone(),
                });
                continue;
            }

            let identity = sources
                .resolve(&entry.module, &entry.internal_name)
                .ok_or_else(|| FacadeError::UnresolvedSource {
                    module: entry.module.clone(),
                    name: entry.internal_name.clone(),
                    alias: entry.public_alias.clone(),
                })?;
            validate_source(&entry.public_alias, &identity.module, &identity.name)?;

            let binding = import_binding(&identity.module, &config.import_prefix);
            match bindings.get(&binding) {
                Some(first) if *first != identity.module => {
                    return Err(FacadeError::BindingCollision {
                        binding,
                        first: first.clone(),
                        second: identity.module.clone(),
                    });
                }
                Some(_) => {}
                None => {
                    bindings.insert(binding, identity.module.clone());
                }
            }

            match by_alias.get(&entry.public_alias) {
                Some(existing) if existing.identity != identity => {
                    return Err(FacadeError::DuplicateAlias {
                        alias: entry.public_alias.clone(),
                        first: existing.identity.clone(),
                        second: identity,
                    });
                }
                Some(_) => {
                    debug!(
                        "Collapsing repeated alias \"{}\" for {}",
                        entry.public_alias, identity
                    );
                }
                None => {
                    by_alias.insert(
                        entry.public_alias.clone(),
                        Export {
                            alias: entry.public_alias.clone(),
                            category: entry.category,
                            identity,
                        },
                    );
                }
            }
        }

        let mut exports: Vec<Export> = by_alias.into_values().collect();
        exports.sort_by(|a, b| (a.category, &a.alias).cmp(&(b.category, &b.alias)));

        let index: HashMap<String, usize> = exports
            .iter()
            .enumerate()
            .map(|(position, export)| (export.alias.clone(), position))
            .collect();

        // A disabled entry never shadows a live export, and is listed once.
        let mut seen: HashSet<String> = HashSet::default();
        disabled.retain(|entry| {
            !index.contains_key(&entry.alias) && seen.insert(entry.alias.clone())
        });
        disabled.sort_by(|a, b| (a.category, &a.alias).cmp(&(b.category, &b.alias)));

        info!(
            "Generated facade with {} exports ({} disabled) from {} catalog entries",
            exports.len(),
            disabled.len(),
            catalog.len()
        );

        Ok(Self {
            exports,
            disabled,
            index,
        })
    }

    /// The engine type behind `alias`, if the facade exports it.
    pub fn resolve(&self, alias: &str) -> Option<&TypeIdentity> {
        self.get(alias).map(|export| &export.identity)
    }

    pub fn get(&self, alias: &str) -> Option<&Export> {
        self.index.get(alias).map(|&position| &self.exports[position])
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.index.contains_key(alias)
    }

    /// All exports in artifact order.
    pub fn exports(&self) -> impl Iterator<Item = &Export> {
        self.exports.iter()
    }

    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.exports.iter().map(|export| export.alias.as_str())
    }

    /// The exports of one block, sorted by alias.
    pub fn block(&self, category: Category) -> impl Iterator<Item = &Export> {
        self.exports
            .iter()
            .filter(move |export| export.category == category)
    }

    pub fn disabled(&self) -> impl Iterator<Item = &DisabledExport> {
        self.disabled.iter()
    }

    pub fn len(&self) -> usize {
        self.exports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exports.is_empty()
    }
}

const RESERVED_WORDS: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete", "do",
    "else", "enum", "export", "extends", "false", "finally", "for", "function", "if", "import",
    "in", "instanceof", "new", "null", "return", "super", "switch", "this", "throw", "true", "try",
    "typeof", "var", "void", "while", "with",
];

pub(crate) fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

pub(crate) fn is_identifier_part(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Characters that would end a `//` comment or a string literal early.
fn breaks_line(c: char) -> bool {
    c.is_control() || c == '\u{2028}' || c == '\u{2029}'
}

fn identifier_error(text: &str) -> Option<&'static str> {
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return Some("it is empty");
    };
    if !is_identifier_start(first) {
        return Some("it must start with a letter, '_' or '$'");
    }
    if !chars.all(is_identifier_part) {
        return Some("it may only contain letters, digits, '_' or '$'");
    }
    if RESERVED_WORDS.contains(&text) {
        return Some("it is a reserved word");
    }
    None
}

/// Checks that `alias` can be written as `export import <alias> = ...`.
pub fn validate_alias(alias: &str, import_prefix: &str) -> Result<()> {
    let invalid = |reason: &'static str| -> Result<()> {
        Err(FacadeError::InvalidAlias {
            alias: alias.to_string(),
            reason,
        })
    };

    if let Some(reason) = identifier_error(alias) {
        return invalid(reason);
    }
    if !import_prefix.is_empty() && alias.starts_with(import_prefix) {
        return invalid("it starts with the reserved import prefix");
    }

    Ok(())
}

/// Checks that `module` fits in `require("<module>")` and `name` can follow
/// the import binding as `<binding>.<name>`.
pub fn validate_source(alias: &str, module: &str, name: &str) -> Result<()> {
    let invalid = |field: &'static str, value: &str, reason: &'static str| -> Result<()> {
        Err(FacadeError::InvalidEntry {
            alias: alias.to_string(),
            field,
            value: value.to_string(),
            reason,
        })
    };

    if module
        .chars()
        .any(|c| c == '"' || c == '\\' || breaks_line(c))
    {
        return invalid(
            "module",
            module,
            "it may not contain quotes, backslashes or line breaks",
        );
    }
    if last_segment(module).is_none() {
        return invalid("module", module, "it has no named path segment");
    }
    if let Some(reason) = identifier_error(name) {
        return invalid("internal name", name, reason);
    }

    Ok(())
}
