use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use bevy::{log::info, platform::collections::HashMap};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;

use crate::{
    catalog::{Catalog, Category},
    config::FacadeConfig,
    error::{FacadeError, Result},
    facade::Facade,
    render::render_barrel,
    source::{SourceIndex, TypeIdentity},
};

/// Bumped whenever the manifest layout changes.
pub const MANIFEST_FORMAT: u32 = 1;

/// SHA-256 over the canonical export table of `facade`.
///
/// Two facades share a fingerprint exactly when they export the same aliases,
/// in the same blocks, for the same types.
pub fn fingerprint(facade: &Facade) -> String {
    let mut hasher = Sha256::new();
    for export in facade.exports() {
        hasher.update(export.category.as_str().as_bytes());
        hasher.update(b"\t");
        hasher.update(export.identity.module.as_bytes());
        hasher.update(b"\t");
        hasher.update(export.identity.name.as_bytes());
        hasher.update(b"\t");
        hasher.update(export.alias.as_bytes());
        hasher.update(b"\n");
    }
    hex::encode(hasher.finalize())
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestExport {
    pub alias: String,
    pub category: Category,
    pub module: String,
    pub name: String,
}

/// Machine-readable twin of the barrel, read back at script-load time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacadeManifest {
    pub format: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_version: Option<String>,
    pub fingerprint: String,
    pub exports: Vec<ManifestExport>,
}

impl FacadeManifest {
    pub fn from_facade(facade: &Facade, catalog_version: Option<String>) -> Self {
        Self {
            format: MANIFEST_FORMAT,
            catalog_version,
            fingerprint: fingerprint(facade),
            exports: facade
                .exports()
                .map(|export| ManifestExport {
                    alias: export.alias.clone(),
                    category: export.category,
                    module: export.identity.module.clone(),
                    name: export.identity.name.clone(),
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A rendered facade, ready to be written next to the engine's scripts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    pub barrel: String,
    pub manifest: FacadeManifest,
    barrel_path: PathBuf,
    manifest_path: PathBuf,
}

impl Artifact {
    pub fn build(facade: &Facade, config: &FacadeConfig, catalog_version: Option<String>) -> Self {
        Self {
            barrel: render_barrel(facade, config),
            manifest: FacadeManifest::from_facade(facade, catalog_version),
            barrel_path: config.barrel_path(),
            manifest_path: config.manifest_path(),
        }
    }

    pub fn fingerprint(&self) -> &str {
        &self.manifest.fingerprint
    }

    pub fn barrel_path(&self) -> &Path {
        &self.barrel_path
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    /// Writes the barrel and the manifest to the paths chosen by the config
    /// the artifact was built with.
    ///
    /// Both files are staged next to their destination before either is
    /// moved into place, so a failure while rendering or staging leaves the
    /// previous artifact untouched. The barrel is moved first and the
    /// manifest last: if the second move fails, the old manifest no longer
    /// matches the engine and [`ResolvedFacade::load`] reports it as stale.
    pub fn write(&self) -> Result<()> {
        let manifest_json = self.manifest.to_json()?;

        let barrel = stage(&self.barrel_path, self.barrel.as_bytes())?;
        let manifest = stage(&self.manifest_path, manifest_json.as_bytes())?;

        barrel
            .persist(&self.barrel_path)
            .map_err(|e| FacadeError::io(&self.barrel_path, e.error))?;
        manifest
            .persist(&self.manifest_path)
            .map_err(|e| FacadeError::io(&self.manifest_path, e.error))?;

        info!(
            "Wrote facade {} ({} exports) to {}",
            self.manifest.fingerprint,
            self.manifest.exports.len(),
            self.barrel_path.display()
        );
        Ok(())
    }
}

/// Generates the facade for `catalog` and renders it. Nothing is written.
pub fn generate_artifact(
    catalog: &Catalog,
    sources: &impl SourceIndex,
    config: &FacadeConfig,
) -> Result<Artifact> {
    let facade = Facade::generate_with(catalog, sources, config)?;
    Ok(Artifact::build(&facade, config, catalog.version.clone()))
}

fn stage(destination: &Path, contents: &[u8]) -> Result<NamedTempFile> {
    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| FacadeError::io(dir, e))?;

    let mut file = NamedTempFile::new_in(dir).map_err(|e| FacadeError::io(dir, e))?;
    file.write_all(contents)
        .and_then(|()| file.flush())
        .map_err(|e| FacadeError::io(destination, e))?;
    Ok(file)
}

/// The alias table a script loader works from.
#[derive(Clone, Debug, Default)]
pub struct ResolvedFacade {
    fingerprint: String,
    catalog_version: Option<String>,
    aliases: HashMap<String, TypeIdentity>,
}

impl ResolvedFacade {
    pub fn from_manifest(manifest: &FacadeManifest) -> Self {
        Self {
            fingerprint: manifest.fingerprint.clone(),
            catalog_version: manifest.catalog_version.clone(),
            aliases: manifest
                .exports
                .iter()
                .map(|export| {
                    (
                        export.alias.clone(),
                        TypeIdentity::new(&export.module, &export.name),
                    )
                })
                .collect(),
        }
    }

    /// Loads a manifest and checks it was generated from the catalog the
    /// engine is running with.
    pub fn load(path: impl AsRef<Path>, engine_fingerprint: &str) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| FacadeError::io(path, e))?;
        let manifest = FacadeManifest::from_json_str(&content)?;

        let resolved = Self::from_manifest(&manifest);
        resolved.ensure_current(engine_fingerprint)?;
        Ok(resolved)
    }

    pub fn ensure_current(&self, engine_fingerprint: &str) -> Result<()> {
        if self.fingerprint != engine_fingerprint {
            return Err(FacadeError::StaleArtifact {
                artifact: self.fingerprint.clone(),
                engine: engine_fingerprint.to_string(),
            });
        }
        Ok(())
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn catalog_version(&self) -> Option<&str> {
        self.catalog_version.as_deref()
    }

    pub fn resolve(&self, alias: &str) -> Option<&TypeIdentity> {
        self.aliases.get(alias)
    }

    pub fn require(&self, alias: &str) -> Result<&TypeIdentity> {
        self.resolve(alias)
            .ok_or_else(|| FacadeError::UnknownAlias(alias.to_string()))
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}
