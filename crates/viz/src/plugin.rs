//! Main visualization plugin that ties all systems together.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use zone_core::ZoneMapConfig;

use crate::camera::CameraPlugin;
use crate::demo::DemoPlugin;
use crate::effects::EffectsPlugin;
use crate::feed_loader::FeedLoaderPlugin;
use crate::overlay::OverlayPlugin;
use crate::zones::ZonePlugin;

/// Loaded configuration shared by every sub-plugin.
#[derive(Resource, Clone, Debug, Default, Deref)]
pub struct MapConfig(pub ZoneMapConfig);

/// Per-frame ordering: load feeds, fire timers, turn feed changes into
/// effects, read camera input, move the camera, draw.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapSet {
    LoadFeeds,
    AdvanceTimers,
    ProcessFeeds,
    CameraInput,
    CameraTick,
    Render,
}

/// Startup ordering: initial feeds must be in place before the effect
/// manager records their heads.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapStartup {
    LoadFeeds,
    Mount,
}

/// Main plugin for the zone map.
///
/// This plugin sets up the window, adds all sub-plugins, and orders their
/// systems. Insert a [`MapConfig`] and a [`FeedSource`](crate::feed_loader::FeedSource)
/// before adding it to override the defaults.
pub struct ZoneMapPlugin;

impl Plugin for ZoneMapPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Zone Map".into(),
                resolution: (1280., 720.).into(),
                ..default()
            }),
            ..default()
        }))
        .init_resource::<MapConfig>()
        .insert_resource(ClearColor(Color::srgb(0.01, 0.01, 0.03)))
        .configure_sets(Startup, (MapStartup::LoadFeeds, MapStartup::Mount).chain())
        .configure_sets(
            Update,
            (
                MapSet::LoadFeeds,
                MapSet::AdvanceTimers,
                MapSet::ProcessFeeds,
                MapSet::CameraInput,
                MapSet::CameraTick,
                MapSet::Render,
            )
                .chain(),
        )
        .add_systems(Update, clamp_scale_factor)
        .add_plugins((
            FeedLoaderPlugin,
            DemoPlugin,
            EffectsPlugin,
            ZonePlugin,
            CameraPlugin,
            OverlayPlugin,
        ));
    }
}

/// Keeps the window scale factor inside the configured pixel ratio range.
fn clamp_scale_factor(
    config: Res<MapConfig>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    let [low, high] = config.performance.resolve().device_pixel_ratio_range;
    for mut window in windows.iter_mut() {
        let wanted = window.resolution.base_scale_factor().clamp(low, high);
        if window.resolution.scale_factor_override() != Some(wanted) {
            window.resolution.set_scale_factor_override(Some(wanted));
        }
    }
}
