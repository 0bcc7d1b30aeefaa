use bevy::{prelude::*, reflect::TypeRegistry};

use crate::{
    artifact::{Artifact, generate_artifact},
    asset::FacadeAsset,
    config::FacadeConfig,
    error::Result,
    reflect::RegistryIndex,
};

/// Generator settings used by [`FacadePlugin`](crate::plugin::FacadePlugin).
#[derive(Resource, Clone, Debug, Default)]
pub struct FacadeSettings {
    pub config: FacadeConfig,
    pub catalog_version: Option<String>,
}

/// Fingerprint of the facade generated for the running engine.
#[derive(Resource, Clone, Debug, Deref)]
pub struct CatalogFingerprint(pub String);

/// Outcome of checking a loaded facade manifest against the running engine.
#[derive(Event, Clone, Debug, PartialEq, Eq)]
pub enum FacadeChecked {
    Accepted(AssetId<FacadeAsset>),
    Rejected {
        id: AssetId<FacadeAsset>,
        reason: String,
    },
}

/// Scans `registry`, generates the facade and writes it to disk.
pub fn write_registry_facade(registry: &TypeRegistry, settings: &FacadeSettings) -> Result<Artifact> {
    let index = RegistryIndex::scan(registry)?;

    let mut catalog = index.catalog().clone();
    catalog.version = settings.catalog_version.clone();

    let artifact = generate_artifact(&catalog, &index, &settings.config)?;
    artifact.write()?;
    Ok(artifact)
}

pub(crate) fn generate_facade(
    registry: Res<AppTypeRegistry>,
    settings: Res<FacadeSettings>,
    mut commands: Commands,
) {
    let registry = registry.read();

    match write_registry_facade(&registry, &settings) {
        Ok(artifact) => {
            info!(
                "Generated script facade \"{}\"",
                artifact.barrel_path().display()
            );
            commands.insert_resource(CatalogFingerprint(artifact.fingerprint().to_string()));
        }
        Err(err) => error!("Failed to generate script facade:\n{}", err),
    }
}

pub(crate) fn check_loaded_facades(
    mut events: EventReader<AssetEvent<FacadeAsset>>,
    assets: Res<Assets<FacadeAsset>>,
    fingerprint: Option<Res<CatalogFingerprint>>,
    mut checked: EventWriter<FacadeChecked>,
) {
    for event in events.read() {
        match event {
            AssetEvent::LoadedWithDependencies { id } | AssetEvent::Modified { id } => {
                let Some(asset) = assets.get(*id) else {
                    continue;
                };

                let Some(fingerprint) = fingerprint.as_deref() else {
                    warn!("Loaded a script facade before one was generated; skipping stale check");
                    continue;
                };

                match asset.resolved.ensure_current(fingerprint) {
                    Ok(()) => {
                        info!(
                            "Loaded script facade with {} exports",
                            asset.resolved.len()
                        );
                        checked.write(FacadeChecked::Accepted(*id));
                    }
                    Err(err) => {
                        error!("Rejected script facade:\n{}", err);
                        checked.write(FacadeChecked::Rejected {
                            id: *id,
                            reason: err.to_string(),
                        });
                    }
                }
            }
            _ => {}
        }
    }
}
