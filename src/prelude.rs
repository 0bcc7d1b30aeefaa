pub use crate::{
    artifact::{Artifact, FacadeManifest, ResolvedFacade, fingerprint, generate_artifact},
    asset::FacadeAsset,
    catalog::{Catalog, CatalogEntry, Category},
    config::FacadeConfig,
    error::FacadeError,
    facade::{Export, Facade},
    plugin::FacadePlugin,
    reflect::{ReflectScriptBinding, RegistryIndex, ScriptBinding},
    source::{ModuleTable, SourceIndex, TypeIdentity},
    systems::{CatalogFingerprint, FacadeChecked},
};
