use bevy::input::mouse::AccumulatedMouseMotion;
use bevy::picking::Pickable;
use bevy::prelude::*;

use crate::config::tuning::Tuning;
use crate::configurator::components::Ground;
use crate::configurator::orbit::OrbitCamera;
use crate::plugins::selection_plugin::ConfiguratorSet;

const CLEAR_COLOR: Color = Color::srgb(0.93, 0.93, 0.93);

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(CLEAR_COLOR));
        app.add_systems(Startup, setup_scene);
        app.add_systems(
            Update,
            (
                reload_tuning_on_key,
                orbit_camera_system,
                apply_tuning_to_camera.run_if(resource_changed::<Tuning>),
            )
                .chain()
                .in_set(ConfiguratorSet::Input),
        );
    }
}

fn setup_scene(
    mut commands: Commands,
    tuning: Res<Tuning>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let orbit = OrbitCamera::new(tuning.camera_distance, tuning.orbit_sensitivity);
    commands.spawn((
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            fov: tuning.camera_fov_degrees.to_radians(),
            ..default()
        }),
        orbit.transform(),
        orbit,
        AmbientLight {
            brightness: tuning.ambient_brightness,
            ..default()
        },
    ));

    commands.spawn((
        SpotLight {
            intensity: tuning.spot_intensity,
            outer_angle: tuning.spot_angle,
            inner_angle: 0.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_translation(tuning.spot_translation()).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Shadow catcher: same tone as the background so only the shadow reads.
    commands.spawn((
        Ground,
        Mesh3d(meshes.add(Plane3d::default().mesh().size(tuning.ground_size, tuning.ground_size))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: CLEAR_COLOR,
            perceptual_roughness: 1.0,
            reflectance: 0.0,
            ..default()
        })),
        Transform::from_xyz(0.0, tuning.ground_height, 0.0),
        Pickable::IGNORE,
    ));
}

/// Horizontal drag rotates the camera around the shoe. A drag only counts if
/// it starts while no UI element is under the pointer.
fn orbit_camera_system(
    mouse: Res<ButtonInput<MouseButton>>,
    motion: Res<AccumulatedMouseMotion>,
    ui: Query<&Interaction>,
    mut cameras: Query<(&mut OrbitCamera, &mut Transform)>,
) {
    let over_ui = ui.iter().any(|i| *i != Interaction::None);
    for (mut orbit, mut transform) in &mut cameras {
        if mouse.just_pressed(MouseButton::Left) {
            orbit.dragging = !over_ui;
        }
        if !mouse.pressed(MouseButton::Left) {
            orbit.dragging = false;
        }
        if orbit.dragging && motion.delta.x != 0.0 {
            orbit.drag(motion.delta.x);
            *transform = orbit.transform();
        }
    }
}

fn reload_tuning_on_key(keys: Res<ButtonInput<KeyCode>>, mut tuning: ResMut<Tuning>) {
    if keys.just_pressed(KeyCode::F5) {
        tuning.reload();
    }
}

fn apply_tuning_to_camera(
    tuning: Res<Tuning>,
    mut cameras: Query<(&mut OrbitCamera, &mut Transform, &mut Projection)>,
) {
    for (mut orbit, mut transform, mut projection) in &mut cameras {
        orbit.distance = tuning.camera_distance;
        orbit.sensitivity = tuning.orbit_sensitivity;
        *transform = orbit.transform();
        if let Projection::Perspective(perspective) = projection.as_mut() {
            perspective.fov = tuning.camera_fov_degrees.to_radians();
        }
    }
}
