//! Zone rendering: hex tiles, adjacency edges, star field and hover picking.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use zone_core::ZoneLayout;
use zone_events::{ZoneId, ZONE_COUNT};

use crate::camera::{handle_camera_input, FocusCamera, MainCamera};
use crate::plugin::{MapConfig, MapSet};

/// Circumradius of a rendered tile.
pub const TILE_RADIUS: f32 = 2.4;
const TILE_HEIGHT: f32 = 0.3;
/// Pointer distance from a zone center that still counts as hovering it.
pub const PICK_RADIUS: f32 = 2.4;
const STAR_SHELL: f32 = 120.0;
const STAR_SEED: u64 = 0x5EED;

/// Plugin for zone tiles and picking.
pub struct ZonePlugin;

impl Plugin for ZonePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (spawn_zones, spawn_lights, spawn_stars))
            .add_systems(
                Update,
                update_hover
                    .in_set(MapSet::CameraInput)
                    .before(handle_camera_input),
            )
            .add_systems(
                Update,
                (highlight_zones, draw_zone_edges).in_set(MapSet::Render),
            );
    }
}

/// A rendered zone tile.
#[derive(Component, Debug, Clone, Copy)]
pub struct ZoneTile {
    pub zone: ZoneId,
}

/// Base hue for each zone.
pub fn zone_color(zone: ZoneId) -> Color {
    let hue = zone as f32 / ZONE_COUNT as f32 * 360.0;
    Color::hsl(hue, 0.45, 0.35)
}

/// Zone whose center lies within `radius` of `point` on the ground plane,
/// nearest first.
pub fn pick_zone(layout: &ZoneLayout, point: Vec3, radius: f32) -> Option<ZoneId> {
    layout
        .positions()
        .iter()
        .enumerate()
        .map(|(zone, pos)| (zone, pos.xz().distance(point.xz())))
        .filter(|(_, distance)| *distance <= radius)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(zone, _)| zone as ZoneId)
}

fn spawn_zones(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let layout = ZoneLayout::standard();
    let mesh = meshes.add(
        Cylinder::new(TILE_RADIUS, TILE_HEIGHT)
            .mesh()
            .resolution(6)
            .build(),
    );

    for (zone, position) in layout.positions().iter().enumerate() {
        let zone = zone as ZoneId;
        commands.spawn((
            PbrBundle {
                mesh: mesh.clone(),
                material: materials.add(StandardMaterial {
                    base_color: zone_color(zone),
                    perceptual_roughness: 0.8,
                    ..default()
                }),
                transform: Transform::from_translation(*position - Vec3::Y * TILE_HEIGHT * 0.5),
                ..default()
            },
            ZoneTile { zone },
        ));
    }

    tracing::info!("Spawned {} zone tiles", layout.len());
}

fn spawn_lights(mut commands: Commands) {
    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.6, 0.65, 0.8),
        brightness: 200.0,
    });
    commands.spawn(DirectionalLightBundle {
        directional_light: DirectionalLight {
            illuminance: 6000.0,
            ..default()
        },
        transform: Transform::from_xyz(10.0, 20.0, 8.0).looking_at(Vec3::ZERO, Vec3::Y),
        ..default()
    });
}

/// Scatters the configured number of stars on a shell around the map.
fn spawn_stars(
    mut commands: Commands,
    config: Res<MapConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let settings = config.performance.resolve();
    if settings.star_count == 0 {
        return;
    }

    let mesh = meshes.add(Sphere::new(0.15).mesh().uv(8, 6));
    let material = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        emissive: LinearRgba::rgb(4.0, 4.0, 4.5),
        unlit: true,
        ..default()
    });

    let mut rng = SmallRng::seed_from_u64(STAR_SEED);
    for _ in 0..settings.star_count {
        let direction = Vec3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(0.05..1.0),
            rng.gen_range(-1.0..1.0),
        )
        .try_normalize()
        .unwrap_or(Vec3::Y);
        commands.spawn(PbrBundle {
            mesh: mesh.clone(),
            material: material.clone(),
            transform: Transform::from_translation(direction * STAR_SHELL),
            ..default()
        });
    }

    tracing::debug!("Spawned {} stars", settings.star_count);
}

/// Casts the cursor onto the ground plane and records the zone under it.
fn update_hover(
    windows: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    mut focus: ResMut<FocusCamera>,
) {
    let hovered = windows
        .get_single()
        .ok()
        .and_then(|window| window.cursor_position())
        .zip(camera_query.get_single().ok())
        .and_then(|(cursor, (camera, transform))| camera.viewport_to_world(transform, cursor))
        .and_then(|ray| {
            let distance = ray.intersect_plane(Vec3::ZERO, InfinitePlane3d::new(Vec3::Y))?;
            Some(ray.get_point(distance))
        })
        .and_then(|point| pick_zone(ZoneLayout::standard(), point, PICK_RADIUS));

    if focus.hovered() != hovered {
        focus.hover_zone(hovered);
    }
}

/// Brightens the hovered and selected tiles.
fn highlight_zones(
    focus: Res<FocusCamera>,
    tiles: Query<(&ZoneTile, &Handle<StandardMaterial>)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if !focus.is_changed() {
        return;
    }
    for (tile, handle) in tiles.iter() {
        let Some(material) = materials.get_mut(handle) else {
            continue;
        };
        material.emissive = if focus.selected() == Some(tile.zone) {
            LinearRgba::rgb(0.6, 0.6, 0.7)
        } else if focus.hovered() == Some(tile.zone) {
            LinearRgba::rgb(0.25, 0.25, 0.3)
        } else {
            LinearRgba::BLACK
        };
    }
}

fn draw_zone_edges(mut gizmos: Gizmos) {
    let lift = Vec3::Y * 0.05;
    for (from, to) in ZoneLayout::standard().edge_segments() {
        gizmos.line(from + lift, to + lift, Color::srgba(0.5, 0.7, 1.0, 0.35));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_zone_at_centers() {
        let layout = ZoneLayout::standard();
        for (zone, position) in layout.positions().iter().enumerate() {
            assert_eq!(pick_zone(layout, *position, PICK_RADIUS), Some(zone as ZoneId));
        }
    }

    #[test]
    fn test_pick_zone_ignores_height() {
        let layout = ZoneLayout::standard();
        let raised = layout.position(3).unwrap() + Vec3::Y * 10.0;
        assert_eq!(pick_zone(layout, raised, PICK_RADIUS), Some(3));
    }

    #[test]
    fn test_pick_zone_far_away() {
        let layout = ZoneLayout::standard();
        assert_eq!(pick_zone(layout, Vec3::new(500.0, 0.0, 500.0), PICK_RADIUS), None);
    }

    #[test]
    fn test_zone_colors_distinct() {
        let colors: Vec<Color> = (0..ZONE_COUNT as ZoneId).map(zone_color).collect();
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
