use bevy::asset::RenderAssetUsages;
use bevy::ecs::hierarchy::ChildSpawnerCommands;
use bevy::picking::Pickable;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use bevy::ui::RelativeCursorPosition;

use crate::configurator::color::HexColor;
use crate::configurator::picker::{
    PRESETS, PickerModel, hue_texels, saturation_value_texels, unit_from_centered,
};
use crate::configurator::state::{SelectionCommand, SelectionState};
use crate::plugins::selection_plugin::ConfiguratorSet;
use crate::plugins::ui_plugin::PickerPanel;

const SQUARE_PX: f32 = 200.0;
const SQUARE_TEXELS: u32 = 64;
const HUE_TEXELS: u32 = 128;
const STRIP_HEIGHT_PX: f32 = 14.0;
const MARKER_PX: f32 = 14.0;
const SWATCH_PX: f32 = 20.0;

pub struct PickerPlugin;

impl Plugin for PickerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PickerModel>();
        app.add_systems(Update, spawn_picker_widget.in_set(ConfiguratorSet::Input));
        app.add_systems(
            Update,
            (picker_drag_system, preset_swatch_system).in_set(ConfiguratorSet::Input),
        );
        app.add_systems(
            Update,
            (
                sync_picker_model.run_if(resource_changed::<SelectionState>),
                render_picker.run_if(resource_changed::<PickerModel>),
            )
                .chain()
                .in_set(ConfiguratorSet::Present),
        );
    }
}

// ── Marker components ───────────────────────────────────────────────

#[derive(Component)]
struct SaturationValueArea;

#[derive(Component)]
struct SaturationValueMarker;

#[derive(Component)]
struct HueStrip;

#[derive(Component)]
struct HueMarker;

#[derive(Component)]
struct PreviewSwatch;

#[derive(Component)]
struct HexReadout;

#[derive(Component, Clone, Copy)]
struct PresetSwatch(HexColor);

/// Generated textures behind the widget.
#[derive(Resource)]
struct PickerImages {
    square: Handle<Image>,
    /// Hue the square texture was last generated for.
    square_hue: f32,
}

fn rgba_image(width: u32, height: u32, data: Vec<u8>) -> Image {
    Image::new(
        Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        data,
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::default(),
    )
}

// ── Setup ───────────────────────────────────────────────────────────

fn spawn_picker_widget(
    mut commands: Commands,
    panels: Query<Entity, Added<PickerPanel>>,
    model: Res<PickerModel>,
    mut images: ResMut<Assets<Image>>,
) {
    for panel in &panels {
        let hue = model.hsva.hue;
        let square = images.add(rgba_image(
            SQUARE_TEXELS,
            SQUARE_TEXELS,
            saturation_value_texels(hue, SQUARE_TEXELS),
        ));
        let strip = images.add(rgba_image(HUE_TEXELS, 1, hue_texels(HUE_TEXELS)));
        commands.insert_resource(PickerImages { square: square.clone(), square_hue: hue });

        let sv = model.saturation_value_marker();
        commands.entity(panel).with_children(|p| {
            p.spawn((
                SaturationValueArea,
                Button,
                RelativeCursorPosition::default(),
                ImageNode::new(square),
                Node {
                    width: Val::Px(SQUARE_PX),
                    height: Val::Px(SQUARE_PX),
                    border_radius: BorderRadius::all(Val::Px(6.0)),
                    ..default()
                },
            ))
            .with_children(|area| {
                spawn_marker(area, SaturationValueMarker, Val::Percent(sv.x), Val::Percent(sv.y));
            });

            p.spawn((
                HueStrip,
                Button,
                RelativeCursorPosition::default(),
                ImageNode::new(strip),
                Node {
                    width: Val::Px(SQUARE_PX),
                    height: Val::Px(STRIP_HEIGHT_PX),
                    border_radius: BorderRadius::all(Val::Px(STRIP_HEIGHT_PX / 2.0)),
                    ..default()
                },
            ))
            .with_children(|strip| {
                spawn_marker(strip, HueMarker, Val::Percent(model.hue_marker()), Val::Percent(50.0));
            });

            p.spawn(Node {
                flex_direction: FlexDirection::Row,
                align_items: AlignItems::Center,
                column_gap: Val::Px(8.0),
                ..default()
            })
            .with_children(|row| {
                row.spawn((
                    PreviewSwatch,
                    Node {
                        width: Val::Px(SWATCH_PX),
                        height: Val::Px(SWATCH_PX),
                        border_radius: BorderRadius::all(Val::Px(4.0)),
                        ..default()
                    },
                    BackgroundColor(model.to_hex().to_color()),
                ));
                row.spawn((
                    HexReadout,
                    Text::new(model.to_hex().to_string()),
                    TextFont { font_size: 14.0, ..default() },
                    TextColor(Color::srgb(0.2, 0.2, 0.2)),
                ));
            });

            p.spawn(Node {
                flex_direction: FlexDirection::Row,
                flex_wrap: FlexWrap::Wrap,
                width: Val::Px(SQUARE_PX),
                column_gap: Val::Px(5.0),
                row_gap: Val::Px(5.0),
                ..default()
            })
            .with_children(|row| {
                for color in PRESETS {
                    row.spawn((
                        PresetSwatch(color),
                        Button,
                        Node {
                            width: Val::Px(SWATCH_PX),
                            height: Val::Px(SWATCH_PX),
                            border: UiRect::all(Val::Px(1.0)),
                            border_radius: BorderRadius::all(Val::Px(4.0)),
                            ..default()
                        },
                        BorderColor::all(Color::srgba(0.0, 0.0, 0.0, 0.15)),
                        BackgroundColor(color.to_color()),
                    ));
                }
            });
        });
    }
}

/// Ring centered on (`left`, `top`) of its parent.
fn spawn_marker<C: Component>(parent: &mut ChildSpawnerCommands, marker: C, left: Val, top: Val) {
    parent.spawn((
        marker,
        Node {
            position_type: PositionType::Absolute,
            left,
            top,
            width: Val::Px(MARKER_PX),
            height: Val::Px(MARKER_PX),
            margin: UiRect {
                left: Val::Px(-MARKER_PX / 2.0),
                top: Val::Px(-MARKER_PX / 2.0),
                ..default()
            },
            border: UiRect::all(Val::Px(2.0)),
            border_radius: BorderRadius::MAX,
            ..default()
        },
        BorderColor::all(Color::WHITE),
        Pickable::IGNORE,
    ));
}

// ── Input ───────────────────────────────────────────────────────────

/// Holding the button over the square or the strip moves the matching
/// marker and recolors the selected part.
fn picker_drag_system(
    state: Res<SelectionState>,
    mut model: ResMut<PickerModel>,
    areas: Query<(&Interaction, &RelativeCursorPosition), With<SaturationValueArea>>,
    strips: Query<(&Interaction, &RelativeCursorPosition), With<HueStrip>>,
    mut writer: MessageWriter<SelectionCommand>,
) {
    let Some(current) = state.selected_color() else {
        return;
    };
    let pressed_at = |(interaction, rel): (&Interaction, &RelativeCursorPosition)| {
        (*interaction == Interaction::Pressed)
            .then_some(rel.normalized)
            .flatten()
            .map(unit_from_centered)
    };

    let mut edited = false;
    if let Some(unit) = areas.iter().find_map(pressed_at) {
        model.set_saturation_value(unit);
        edited = true;
    }
    if let Some(unit) = strips.iter().find_map(pressed_at) {
        model.set_hue(unit.x);
        edited = true;
    }
    if edited {
        let color = model.to_hex();
        if color != current {
            writer.write(SelectionCommand::SetColor(color));
        }
    }
}

fn preset_swatch_system(
    q: Query<(&Interaction, &PresetSwatch), Changed<Interaction>>,
    state: Res<SelectionState>,
    mut writer: MessageWriter<SelectionCommand>,
) {
    if state.selected.is_none() {
        return;
    }
    for (interaction, swatch) in &q {
        if *interaction == Interaction::Pressed {
            writer.write(SelectionCommand::SetColor(swatch.0));
        }
    }
}

// ── Present ─────────────────────────────────────────────────────────

/// Pulls the selected part's color into the widget when the store moved
/// away from what the widget last produced (new selection, preset click).
fn sync_picker_model(state: Res<SelectionState>, mut model: ResMut<PickerModel>) {
    if let Some(color) = state.selected_color()
        && model.bypass_change_detection().sync(color)
    {
        model.set_changed();
    }
}

#[allow(clippy::type_complexity)]
fn render_picker(
    model: Res<PickerModel>,
    images_state: Option<ResMut<PickerImages>>,
    mut images: ResMut<Assets<Image>>,
    mut sv_markers: Query<&mut Node, (With<SaturationValueMarker>, Without<HueMarker>)>,
    mut hue_markers: Query<&mut Node, (With<HueMarker>, Without<SaturationValueMarker>)>,
    mut previews: Query<&mut BackgroundColor, With<PreviewSwatch>>,
    mut readouts: Query<&mut Text, With<HexReadout>>,
) {
    let hex = model.to_hex();
    let sv = model.saturation_value_marker();
    for mut node in &mut sv_markers {
        node.left = Val::Percent(sv.x);
        node.top = Val::Percent(sv.y);
    }
    for mut node in &mut hue_markers {
        node.left = Val::Percent(model.hue_marker());
    }
    for mut bg in &mut previews {
        *bg = BackgroundColor(hex.to_color());
    }
    for mut text in &mut readouts {
        **text = hex.to_string();
    }

    let Some(mut picker_images) = images_state else {
        return;
    };
    if (picker_images.square_hue - model.hsva.hue).abs() > f32::EPSILON {
        if let Some(mut image) = images.get_mut(&picker_images.square) {
            *image = rgba_image(
                SQUARE_TEXELS,
                SQUARE_TEXELS,
                saturation_value_texels(model.hsva.hue, SQUARE_TEXELS),
            );
        }
        picker_images.square_hue = model.hsva.hue;
    }
}
