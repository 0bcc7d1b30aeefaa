use std::path::Path;

use bevy::{log::LogPlugin, prelude::*};
use script_facade::prelude::*;

macro_rules! script_types {
    ($group:ident, $category:ident, $module:literal: $($name:ident),+ $(,)?) => {
        mod $group {
            use super::*;

            $(
                #[derive(Reflect, Default)]
                #[reflect(ScriptBinding)]
                pub struct $name;

                impl ScriptBinding for $name {
                    const CATEGORY: Category = Category::$category;
                    const MODULE: &'static str = $module;
                }
            )+

            pub fn register(app: &mut App) {
                $(app.register_type::<$name>();)+
            }
        }
    };
}

script_types!(vec2, Utility, "TypeScript/wd/Vec2": Vec2);
script_types!(vec3, Utility, "TypeScript/wd/Vec3": Vec3);
script_types!(quat, Utility, "TypeScript/wd/Quat": Quat);
script_types!(color, Utility, "TypeScript/wd/Color": Color);
script_types!(
    messages,
    Message,
    "./wd/AllMessages": MsgDamage, MsgSetColor, MsgTriggerTriggered
);
script_types!(flags, Flags, "./wd/AllFlags": PhysicsShapeType);

#[derive(Component, Reflect, Default)]
#[reflect(Component, ScriptBinding)]
pub struct CameraComponent {
    pub mode: CameraMode,
}

impl ScriptBinding for CameraComponent {
    const CATEGORY: Category = Category::Component;
    const MODULE: &'static str = "./wd/AllComponents";
}

#[derive(Component, Reflect, Default)]
#[reflect(Component, ScriptBinding)]
pub struct PointLightComponent {
    pub range: f32,
}

impl ScriptBinding for PointLightComponent {
    const CATEGORY: Category = Category::Component;
    const MODULE: &'static str = "./wd/AllComponents";
}

#[derive(Reflect, Default)]
#[reflect(ScriptBinding)]
pub enum CameraMode {
    #[default]
    PerspectiveFixedFovX,
    PerspectiveFixedFovY,
    OrthoFixedWidth,
    OrthoFixedHeight,
}

impl ScriptBinding for CameraMode {
    const CATEGORY: Category = Category::Enum;
    const MODULE: &'static str = "./wd/AllEnums";
}

#[derive(Resource)]
struct LoadedFacade(#[allow(dead_code)] Handle<FacadeAsset>);

fn load_facade(asset_server: Res<AssetServer>, mut commands: Commands) {
    let handle: Handle<FacadeAsset> = asset_server.load("scripts/wd.facade.json");
    commands.insert_resource(LoadedFacade(handle));
}

fn main() -> anyhow::Result<()> {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));

    let mut config = FacadeConfig::from_json_file(root.join("facade.json"))?;
    config.output_dir = root.join(&config.output_dir);

    let mut app = App::new();

    app.add_plugins((MinimalPlugins, AssetPlugin::default(), LogPlugin::default()));
    app.add_plugins(FacadePlugin::new(config).with_catalog_version(env!("CARGO_PKG_VERSION")));

    vec2::register(&mut app);
    vec3::register(&mut app);
    quat::register(&mut app);
    color::register(&mut app);
    messages::register(&mut app);
    flags::register(&mut app);
    app.register_type::<CameraComponent>()
        .register_type::<PointLightComponent>()
        .register_type::<CameraMode>();

    app.add_systems(PostStartup, load_facade);

    app.run();

    Ok(())
}
