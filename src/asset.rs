use anyhow::{Context, Result};
use bevy::{
    asset::{Asset, AssetLoader, LoadContext, io::Reader},
    reflect::TypePath,
};

use crate::artifact::{FacadeManifest, ResolvedFacade};

/// A facade manifest loaded by scripts at load time.
#[derive(Asset, TypePath)]
pub struct FacadeAsset {
    pub resolved: ResolvedFacade,
}

/// The bevy [`AssetLoader`] for [`FacadeAsset`]
#[derive(Default)]
pub struct FacadeAssetLoader;

impl AssetLoader for FacadeAssetLoader {
    type Asset = FacadeAsset;
    type Settings = ();
    type Error = anyhow::Error;

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset> {
        let mut bytes = vec![];
        reader.read_to_end(&mut bytes).await?;

        let manifest: FacadeManifest = serde_json::from_slice(&bytes).with_context(|| {
            format!(
                "Failed to parse facade manifest {}",
                load_context.path().display()
            )
        })?;

        Ok(FacadeAsset {
            resolved: ResolvedFacade::from_manifest(&manifest),
        })
    }

    fn extensions(&self) -> &[&str] {
        &["facade.json"]
    }
}
