use crate::{
    asset::{FacadeAsset, FacadeAssetLoader},
    config::FacadeConfig,
    systems::{FacadeChecked, FacadeSettings, check_loaded_facades, generate_facade},
};
use bevy::prelude::*;

/// This plugin writes the script facade for every type registered with
/// `#[reflect(ScriptBinding)]` when the [`App`] starts.
///
/// ```rust,ignore
///  App::new()
///    .add_plugins(DefaultPlugins)
///    .add_plugins(FacadePlugin::new(FacadeConfig::new("assets/scripts")))
///    .register_type::<CameraComponent>()
///    // etc
/// ```
///
/// When [`AssetPlugin`] is present, `*.facade.json` manifests can be loaded as
/// [`FacadeAsset`]s and are checked against the generated facade.
#[derive(Default)]
pub struct FacadePlugin {
    settings: FacadeSettings,
}

impl FacadePlugin {
    pub fn new(config: FacadeConfig) -> Self {
        Self {
            settings: FacadeSettings {
                config,
                catalog_version: None,
            },
        }
    }

    pub fn with_catalog_version(mut self, version: impl Into<String>) -> Self {
        self.settings.catalog_version = Some(version.into());
        self
    }
}

impl Plugin for FacadePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.settings.clone())
            .add_systems(Startup, generate_facade);

        if app.is_plugin_added::<AssetPlugin>() {
            app.init_asset::<FacadeAsset>()
                .register_asset_loader(FacadeAssetLoader)
                .add_event::<FacadeChecked>()
                .add_systems(Update, check_loaded_facades);
        } else {
            warn!(
                "FacadePlugin was added without AssetPlugin; \
                facade manifests can't be loaded as assets."
            );
        }
    }
}
