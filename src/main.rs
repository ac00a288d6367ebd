mod assets_map;
mod config;
mod configurator;
mod plugins;

use bevy::asset::AssetMetaCheck;
use bevy::log::LogPlugin;
use bevy::picking::mesh_picking::MeshPickingPlugin;
use bevy::prelude::*;

use config::tuning::Tuning;
use configurator::components::AppState;
use plugins::{
    picker_plugin::PickerPlugin, scene_plugin::ScenePlugin, selection_plugin::SelectionPlugin,
    shoe_plugin::ShoePlugin, ui_plugin::UiPlugin,
};

fn main() {
    let tuning = Tuning::load_or_default();

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: tuning.window_title.clone(),
                        resolution: (tuning.window_width, tuning.window_height).into(),
                        #[cfg(target_arch = "wasm32")]
                        fit_canvas_to_parent: true,
                        #[cfg(target_arch = "wasm32")]
                        prevent_default_event_handling: true,
                        ..default()
                    }),
                    ..default()
                })
                .set(AssetPlugin {
                    meta_check: AssetMetaCheck::Never,
                    ..default()
                })
                .set(LogPlugin {
                    filter: "wgpu=warn,naga=error,shoe_configurator=debug".to_string(),
                    ..default()
                }),
        )
        .add_plugins(MeshPickingPlugin)
        .init_state::<AppState>()
        .insert_resource(tuning)
        .add_plugins(SelectionPlugin)
        .add_plugins(ScenePlugin)
        .add_plugins(ShoePlugin)
        .add_plugins(UiPlugin)
        .add_plugins(PickerPlugin)
        .run();
}
