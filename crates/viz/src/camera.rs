//! Camera system: focus controller resource, input handling and transform sync.

use bevy::core_pipeline::bloom::BloomSettings;
use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;
use zone_core::{CameraFocusController, CameraPose, ZoneLayout};
use zone_events::ZoneId;

use crate::plugin::{MapConfig, MapSet};

/// Radians of orbit per pixel of mouse drag.
const ORBIT_SENSITIVITY: f32 = 0.005;
/// Fractional zoom per wheel step.
const ZOOM_STEP: f32 = 0.1;

/// Plugin for camera control and movement.
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PreStartup, init_focus_camera)
            .add_systems(Startup, setup_camera)
            .add_systems(Update, handle_camera_input.in_set(MapSet::CameraInput))
            .add_systems(
                Update,
                (tick_camera, apply_camera_to_transform)
                    .chain()
                    .in_set(MapSet::CameraTick),
            );
    }
}

/// The camera focus state machine.
#[derive(Resource, Default, Deref, DerefMut)]
pub struct FocusCamera(pub CameraFocusController);

/// Marker component for the main camera.
#[derive(Component)]
pub struct MainCamera;

/// Zone selected by a number key, `1` through `8`.
pub fn zone_for_key(key: KeyCode) -> Option<ZoneId> {
    let zone = match key {
        KeyCode::Digit1 => 0,
        KeyCode::Digit2 => 1,
        KeyCode::Digit3 => 2,
        KeyCode::Digit4 => 3,
        KeyCode::Digit5 => 4,
        KeyCode::Digit6 => 5,
        KeyCode::Digit7 => 6,
        KeyCode::Digit8 => 7,
        _ => return None,
    };
    Some(zone)
}

/// Distance multiplier for a wheel delta. Scrolling up moves closer.
pub fn zoom_factor(scroll: f32) -> f32 {
    (1.0 - scroll * ZOOM_STEP).clamp(0.5, 1.5)
}

/// Transform looking from the pose position at its target.
pub fn pose_transform(pose: CameraPose) -> Transform {
    Transform::from_translation(pose.position).looking_at(pose.target, Vec3::Y)
}

fn init_focus_camera(mut commands: Commands, config: Res<MapConfig>) {
    let controller = CameraFocusController::new(config.camera.clone());
    commands.insert_resource(FocusCamera(controller));
}

/// System to set up the camera on startup.
fn setup_camera(mut commands: Commands, focus: Res<FocusCamera>, config: Res<MapConfig>) {
    let bloom = config.performance.resolve().bloom_enabled;
    let mut camera = commands.spawn((
        Camera3dBundle {
            camera: Camera {
                hdr: bloom,
                ..default()
            },
            transform: pose_transform(focus.pose()),
            ..default()
        },
        MainCamera,
    ));
    if bloom {
        camera.insert(BloomSettings::NATURAL);
    }
}

/// System to handle zone selection, orbit drag and wheel zoom.
pub fn handle_camera_input(
    mut focus: ResMut<FocusCamera>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll: EventReader<MouseWheel>,
) {
    let layout = ZoneLayout::standard();

    for key in keyboard.get_just_pressed() {
        if let Some(zone) = zone_for_key(*key) {
            focus.select_zone(Some(zone), layout);
        } else if *key == KeyCode::Escape {
            focus.select_zone(None, layout);
        }
    }

    if mouse_button.just_pressed(MouseButton::Left) {
        if let Some(zone) = focus.hovered() {
            focus.select_zone(Some(zone), layout);
        }
    }

    // Orbit with right or middle mouse button
    let is_dragging =
        mouse_button.pressed(MouseButton::Right) || mouse_button.pressed(MouseButton::Middle);

    if is_dragging {
        if !focus.is_dragging() {
            focus.begin_drag();
        }

        let mut delta = Vec2::ZERO;
        for motion in mouse_motion.read() {
            delta += motion.delta;
        }
        if delta != Vec2::ZERO {
            focus.orbit(-delta.x * ORBIT_SENSITIVITY, delta.y * ORBIT_SENSITIVITY);
        }
    } else {
        if focus.is_dragging() {
            focus.end_drag();
        }
        // Clear motion events if not dragging
        mouse_motion.clear();
    }

    for ev in scroll.read() {
        focus.zoom(zoom_factor(ev.y));
    }
}

fn tick_camera(time: Res<Time>, mut focus: ResMut<FocusCamera>) {
    focus.tick(time.delta_seconds());
}

/// System to apply the controller pose to the actual camera transform.
fn apply_camera_to_transform(
    focus: Res<FocusCamera>,
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
) {
    for mut transform in camera_query.iter_mut() {
        *transform = pose_transform(focus.pose());
    }
}
