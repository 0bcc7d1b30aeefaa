use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    error::{FacadeError, Result},
    facade::{is_identifier_part, is_identifier_start},
};

/// Settings for generating and writing a facade.
///
/// Every field has a default, so a config file only needs to name what it
/// changes:
///
/// ```json
/// { "output_dir": "Data/Base/TypeScript", "artifact_name": "wd" }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacadeConfig {
    /// Directory the barrel and its manifest are written to.
    pub output_dir: PathBuf,
    /// File stem: produces `<name>.ts` and `<name>.facade.json`.
    pub artifact_name: String,
    /// Prefix of the per-module import bindings. Aliases may not start with it.
    pub import_prefix: String,
    /// Comment line opening every block.
    pub block_banner: String,
    /// Lines written once at the top of the barrel.
    pub header: Vec<String>,
    /// Keep disabled catalog entries as commented-out exports.
    pub emit_disabled: bool,
}

impl Default for FacadeConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            artifact_name: "wd".to_string(),
            import_prefix: "__".to_string(),
            block_banner: "// AUTO-GENERATED".to_string(),
            header: Vec::new(),
            emit_disabled: true,
        }
    }
}

impl FacadeConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..Default::default()
        }
    }

    pub fn with_artifact_name(mut self, name: impl Into<String>) -> Self {
        self.artifact_name = name.into();
        self
    }

    pub fn with_header(mut self, line: impl Into<String>) -> Self {
        self.header.push(line.into());
        self
    }

    pub fn barrel_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.ts", self.artifact_name))
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}.facade.json", self.artifact_name))
    }

    /// Checks the settings that end up inside the generated barrel.
    ///
    /// The import prefix keeps bindings apart from aliases, so it must be a
    /// non-empty identifier start. Every block banner must stay a single
    /// `//` comment line.
    pub fn validate(&self) -> Result<()> {
        let invalid = |field: &'static str, reason: &'static str| -> Result<()> {
            Err(FacadeError::InvalidConfig { field, reason })
        };

        let mut prefix = self.import_prefix.chars();
        match prefix.next() {
            None => return invalid("import_prefix", "must not be empty"),
            Some(first) if !is_identifier_start(first) => {
                return invalid("import_prefix", "must start with a letter, '_' or '$'");
            }
            Some(_) if !prefix.all(is_identifier_part) => {
                return invalid(
                    "import_prefix",
                    "may only contain letters, digits, '_' or '$'",
                );
            }
            Some(_) => {}
        }

        if !self.block_banner.starts_with("//") || self.block_banner.contains(['\n', '\r']) {
            return invalid("block_banner", "must be a single '//' comment line");
        }

        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| FacadeError::io(path, e))?;
        Self::from_json_str(&content)
    }
}
