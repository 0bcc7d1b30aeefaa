//! TypeScript barrel rendering.
//!
//! A rendered barrel looks like:
//!
//! ```text
//! // AUTO-GENERATED
//! import __Vec2 = require("TypeScript/wd/Vec2")
//! export import Vec2 = __Vec2.Vec2;
//! ```

use std::collections::{BTreeMap, BTreeSet};

use bevy::platform::collections::HashSet;

use crate::{catalog::Category, config::FacadeConfig, facade::Facade};

/// Last named path segment of `module`.
pub(crate) fn last_segment(module: &str) -> Option<&str> {
    module
        .rsplit('/')
        .find(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
}

/// Import binding for `module`: the prefix followed by the module's last
/// path segment, turned into an identifier.
///
/// The binding depends on nothing but its arguments, so adding or removing
/// other modules never renames it. Two modules mapping to the same binding
/// are rejected when the facade is generated.
pub fn import_binding(module: &str, import_prefix: &str) -> String {
    let stem: String = last_segment(module)
        .unwrap_or("module")
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '$' { c } else { '_' })
        .collect();
    format!("{import_prefix}{stem}")
}

/// Renders the barrel text for `facade`.
///
/// The output depends only on the facade and the config, so rendering an
/// unchanged facade twice yields identical bytes. Only modules with a live
/// export are imported; disabled entries stay inside comments.
pub fn render_barrel(facade: &Facade, config: &FacadeConfig) -> String {
    let prefix = config.import_prefix.as_str();

    let mut imports: BTreeMap<Category, BTreeSet<&str>> = BTreeMap::new();
    let mut lines: BTreeMap<Category, Vec<(&str, String)>> = BTreeMap::new();
    let mut imported: HashSet<&str> = HashSet::default();

    // Exports arrive in block order, so a module is imported by the first
    // block that uses it.
    for export in facade.exports() {
        let module = export.identity.module.as_str();
        if imported.insert(module) {
            imports.entry(export.category).or_default().insert(module);
        }
        lines.entry(export.category).or_default().push((
            export.alias.as_str(),
            format!(
                "export import {} = {}.{};",
                export.alias,
                import_binding(module, prefix),
                export.identity.name
            ),
        ));
    }
    if config.emit_disabled {
        for disabled in facade.disabled() {
            lines.entry(disabled.category).or_default().push((
                disabled.alias.as_str(),
                format!(
                    "//export import {} = {}.{}; // {}",
                    disabled.alias,
                    import_binding(&disabled.source.module, prefix),
                    disabled.source.name,
                    disabled.reason
                ),
            ));
        }
    }

    let mut rendered: Vec<String> = Vec::new();
    for category in Category::ALL {
        let Some(mut block_lines) = lines.remove(&category) else {
            continue;
        };
        block_lines.sort_by(|a, b| a.0.cmp(b.0));

        let mut block = vec![config.block_banner.clone()];
        for module in imports.get(&category).into_iter().flatten() {
            block.push(format!(
                "import {} = require(\"{module}\")",
                import_binding(module, prefix)
            ));
        }
        block.extend(block_lines.into_iter().map(|(_, line)| line));

        rendered.push(block.join("\n"));
    }

    let mut out = String::new();
    for line in &config.header {
        out.push_str(line);
        out.push('\n');
    }
    if !config.header.is_empty() && !rendered.is_empty() {
        out.push('\n');
    }
    out.push_str(&rendered.join("\n\n\n"));
    if !rendered.is_empty() {
        out.push('\n');
    }
    out
}
