use bevy::gltf::{Gltf, GltfMesh, GltfNode};
use bevy::picking::hover::HoverMap;
use bevy::picking::pointer::PointerButton;
use bevy::prelude::*;
use bevy::window::{CursorIcon, CustomCursor, PrimaryWindow, SystemCursorIcon};

use crate::assets_map::{ModelLoad, ShoeAssets, model_load_status};
use crate::config::tuning::Tuning;
use crate::configurator::color::HexColor;
use crate::configurator::components::{AppState, PartMesh, ShoeRoot};
use crate::configurator::cursor::CURSOR_HOTSPOT;
use crate::configurator::error::ConfiguratorError;
use crate::configurator::hover::HoverState;
use crate::configurator::part::Part;
use crate::configurator::state::{SelectionCommand, SelectionState};
use crate::plugins::selection_plugin::ConfiguratorSet;

pub struct ShoePlugin;

impl Plugin for ShoePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(AppState::Loading), request_model);
        app.add_systems(
            Update,
            check_model_loading
                .in_set(ConfiguratorSet::Input)
                .run_if(in_state(AppState::Loading).and(resource_exists::<ShoeAssets>)),
        );
        app.add_systems(Update, animate_idle);
        app.add_systems(
            Update,
            (apply_part_colors, update_cursor).in_set(ConfiguratorSet::Present),
        );
        app.add_observer(on_background_press);
    }
}

// ── Model loading ───────────────────────────────────────────────────

/// One resolved sub-mesh of the model.
#[derive(Debug, Clone)]
pub struct SubMesh {
    pub meshes: Vec<Handle<Mesh>>,
    pub material: Option<Handle<StandardMaterial>>,
    pub transform: Transform,
}

/// Looks up `part_0` .. `part_7` through `lookup`. Every part must resolve
/// to at least one primitive.
pub fn resolve_parts(
    path: &str,
    mut lookup: impl FnMut(&str) -> Option<SubMesh>,
) -> Result<Vec<(Part, SubMesh)>, ConfiguratorError> {
    Part::ALL
        .into_iter()
        .map(|part| {
            let mesh = part.mesh_name();
            let sub = lookup(&mesh).ok_or_else(|| ConfiguratorError::MissingSubMesh {
                path: path.to_string(),
                mesh: mesh.clone(),
            })?;
            if sub.meshes.is_empty() {
                return Err(ConfiguratorError::EmptySubMesh { path: path.to_string(), mesh });
            }
            Ok((part, sub))
        })
        .collect()
}

/// Named meshes first, then named nodes (which also carry a transform).
fn lookup_sub_mesh(
    gltf: &Gltf,
    nodes: &Assets<GltfNode>,
    gltf_meshes: &Assets<GltfMesh>,
    name: &str,
) -> Option<SubMesh> {
    let (handle, transform) = match gltf.named_meshes.get(name) {
        Some(handle) => (handle.clone(), Transform::IDENTITY),
        None => {
            let node = nodes.get(gltf.named_nodes.get(name)?)?;
            (node.mesh.clone()?, node.transform)
        }
    };
    let gltf_mesh = gltf_meshes.get(&handle)?;
    Some(SubMesh {
        meshes: gltf_mesh.primitives.iter().map(|p| p.mesh.clone()).collect(),
        material: gltf_mesh.primitives.iter().find_map(|p| p.material.clone()),
        transform,
    })
}

fn request_model(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    tuning: Res<Tuning>,
    time: Res<Time>,
) {
    info!("Loading shoe model from {}", tuning.model_path);
    let gltf = asset_server.load(tuning.model_path.clone());
    commands.insert_resource(ShoeAssets::new(tuning.model_path.clone(), gltf, time.elapsed_secs()));
    commands.spawn((ShoeRoot, Transform::default(), Visibility::default()));
}

#[allow(clippy::too_many_arguments)]
fn check_model_loading(
    mut commands: Commands,
    time: Res<Time>,
    tuning: Res<Tuning>,
    asset_server: Res<AssetServer>,
    mut shoe: ResMut<ShoeAssets>,
    gltfs: Res<Assets<Gltf>>,
    nodes: Res<Assets<GltfNode>>,
    gltf_meshes: Res<Assets<GltfMesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    roots: Query<Entity, With<ShoeRoot>>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    let status = model_load_status(
        &asset_server.load_state(&shoe.gltf),
        &asset_server.recursive_dependency_load_state(&shoe.gltf),
    );
    let gltf = match status {
        ModelLoad::Failed(reason) => {
            let error = ConfiguratorError::AssetLoad { path: shoe.path.clone(), reason };
            fail_loading(&mut shoe, &mut next_state, error);
            return;
        }
        ModelLoad::Ready => gltfs.get(&shoe.gltf),
        ModelLoad::Pending => None,
    };
    let Some(gltf) = gltf else {
        if let Some(error) = shoe.check_timeout(time.elapsed_secs(), tuning.load_timeout_secs) {
            fail_loading(&mut shoe, &mut next_state, error);
        }
        return;
    };

    let parts = match resolve_parts(&shoe.path, |name| lookup_sub_mesh(gltf, &nodes, &gltf_meshes, name)) {
        Ok(parts) => parts,
        Err(error) => {
            fail_loading(&mut shoe, &mut next_state, error);
            return;
        }
    };

    let Ok(root) = roots.single() else {
        warn!("Shoe model loaded but no ShoeRoot exists");
        return;
    };

    commands.entity(root).with_children(|parent| {
        for (part, sub) in &parts {
            // Own material instance per part, seeded from the model's material.
            let source = sub
                .material
                .as_ref()
                .and_then(|h| materials.get(h))
                .cloned()
                .unwrap_or_default();
            let material = materials.add(source);
            for mesh in &sub.meshes {
                parent
                    .spawn((
                        PartMesh(*part),
                        Name::new(part.mesh_name()),
                        Mesh3d(mesh.clone()),
                        MeshMaterial3d(material.clone()),
                        sub.transform,
                    ))
                    .observe(on_part_over)
                    .observe(on_part_out)
                    .observe(on_part_press);
            }
        }
    });

    info!(
        "Shoe model ready: {}",
        parts
            .iter()
            .map(|(part, _)| format!("{}={}", part.mesh_name(), part))
            .collect::<Vec<_>>()
            .join(", ")
    );
    next_state.set(AppState::Ready);
}

fn fail_loading(shoe: &mut ShoeAssets, next_state: &mut NextState<AppState>, error: ConfiguratorError) {
    error!("[ASSETS] {error}");
    shoe.error = Some(error);
    next_state.set(AppState::Failed);
}

// ── Per-frame presentation ──────────────────────────────────────────

fn animate_idle(
    time: Res<Time>,
    tuning: Res<Tuning>,
    mut roots: Query<&mut Transform, With<ShoeRoot>>,
) {
    let pose = tuning.idle.pose(time.elapsed_secs());
    for mut transform in &mut roots {
        *transform = pose;
    }
}

/// Pushes `colors[part]` into each part's material whenever the store
/// changed or new part meshes appeared.
fn apply_part_colors(
    state: Res<SelectionState>,
    parts: Query<(&PartMesh, &MeshMaterial3d<StandardMaterial>)>,
    added: Query<(), Added<PartMesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if !state.is_changed() && added.is_empty() {
        return;
    }
    for (part, material) in &parts {
        if let Some(mut material) = materials.get_mut(&material.0) {
            material.base_color = state.colors.get(part.0).to_color();
        }
    }
}

/// What the cursor should show: the hovered part and its current color.
pub fn cursor_key(hover: &HoverState, state: &SelectionState) -> Option<(Part, HexColor)> {
    hover.hovered.map(|part| (part, state.colors.get(part)))
}

fn update_cursor(
    mut commands: Commands,
    hover: Res<HoverState>,
    state: Res<SelectionState>,
    windows: Query<Entity, With<PrimaryWindow>>,
    mut images: ResMut<Assets<Image>>,
    mut shown: Local<Option<(Part, HexColor)>>,
) {
    let key = cursor_key(&hover, &state);
    if key == *shown {
        return;
    }
    *shown = key;

    let icon = match key {
        None => CursorIcon::from(SystemCursorIcon::Default),
        Some((part, color)) => {
            trace!("Cursor -> {part} {color}");
            CursorIcon::Custom(part_cursor(&mut images, part, color))
        }
    };
    for window in &windows {
        commands.entity(window).insert(icon.clone());
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn part_cursor(images: &mut Assets<Image>, _part: Part, color: HexColor) -> CustomCursor {
    use crate::configurator::cursor::cursor_image;
    use bevy::window::CustomCursorImage;

    CustomCursor::Image(CustomCursorImage {
        handle: images.add(cursor_image(color)),
        hotspot: CURSOR_HOTSPOT,
        ..default()
    })
}

#[cfg(target_arch = "wasm32")]
fn part_cursor(_images: &mut Assets<Image>, part: Part, color: HexColor) -> CustomCursor {
    use crate::configurator::cursor::cursor_data_url;
    use bevy::window::CustomCursorUrl;

    CustomCursor::Url(CustomCursorUrl {
        url: cursor_data_url(color, part),
        hotspot: CURSOR_HOTSPOT,
    })
}

// ── Pointer observers ───────────────────────────────────────────────

fn on_part_over(
    mut over: On<Pointer<Over>>,
    parts: Query<&PartMesh>,
    mut hover: ResMut<HoverState>,
) {
    over.propagate(false);
    if let Ok(part) = parts.get(over.entity) {
        hover.enter(part.0);
    }
}

fn on_part_out(
    mut out: On<Pointer<Out>>,
    parts: Query<(), With<PartMesh>>,
    hover_map: Res<HoverMap>,
    mut hover: ResMut<HoverState>,
) {
    out.propagate(false);
    let left = out.entity;
    let remaining = hover_map
        .get(&out.pointer_id)
        .map(|hits| hits.keys().filter(|&&e| e != left && parts.contains(e)).count())
        .unwrap_or(0);
    hover.leave(remaining);
}

fn on_part_press(
    mut press: On<Pointer<Press>>,
    parts: Query<&PartMesh>,
    mut writer: MessageWriter<SelectionCommand>,
) {
    press.propagate(false);
    if press.event.button != PointerButton::Primary {
        return;
    }
    if let Ok(part) = parts.get(press.entity) {
        writer.write(SelectionCommand::Select(part.0));
    }
}

/// The window is only hit when nothing pickable is in front of it, so a
/// press landing on it missed the shoe and every UI element.
///
/// Clears on press, not on release: an orbit drag that starts on empty space
/// also drops the selection.
fn on_background_press(
    press: On<Pointer<Press>>,
    windows: Query<(), With<Window>>,
    mut writer: MessageWriter<SelectionCommand>,
) {
    if press.event.button == PointerButton::Primary && windows.contains(press.entity) {
        writer.write(SelectionCommand::ClearSelection);
    }
}
