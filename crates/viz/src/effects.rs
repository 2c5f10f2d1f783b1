//! Effect rendering: warfare lines, activity bursts and cosmic shockwaves.
//!
//! The lifecycle lives in [`EffectLifecycleManager`]; this module feeds it
//! from the [`Feeds`] resource on a virtual clock and draws what it holds
//! with gizmos.

use bevy::app::AppExit;
use bevy::prelude::*;
use std::time::Duration;
use zone_core::{
    burst_color, effect_progress, Clock, EffectColor, EffectLifecycleManager, PerformanceSettings,
    ZoneLayout,
};
use zone_events::ZONE_COUNT;

use crate::feed_loader::Feeds;
use crate::plugin::{MapConfig, MapSet, MapStartup};

/// Height above a zone surface where effects are drawn.
const EFFECT_LIFT: f32 = 0.6;
/// Apex height of a warfare arc.
const ARC_HEIGHT: f32 = 2.5;
const ARC_SEGMENTS: usize = 16;

/// Plugin for effect lifecycle and rendering.
pub struct EffectsPlugin;

impl Plugin for EffectsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MapClock>()
            .add_systems(Startup, mount_effects.in_set(MapStartup::Mount))
            .add_systems(
                Update,
                (
                    (tick_map_clock, advance_effects)
                        .chain()
                        .in_set(MapSet::AdvanceTimers),
                    process_feeds.in_set(MapSet::ProcessFeeds),
                    draw_effects.in_set(MapSet::Render),
                ),
            )
            .add_systems(Last, dispose_on_exit);
    }
}

/// Virtual time driving every effect timer.
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct MapClock {
    now: Duration,
}

impl MapClock {
    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }
}

impl Clock for MapClock {
    fn now(&self) -> Duration {
        self.now
    }
}

/// The live effect manager.
#[derive(Resource, Deref, DerefMut)]
pub struct ZoneEffects(pub EffectLifecycleManager);

/// Rendering budget resolved from the performance tier.
#[derive(Resource, Clone, Debug, Deref)]
pub struct RenderBudget(pub PerformanceSettings);

/// Records the initial feed heads as history.
fn mount_effects(
    mut commands: Commands,
    config: Res<MapConfig>,
    feeds: Res<Feeds>,
    clock: Res<MapClock>,
) {
    let mut manager = EffectLifecycleManager::new(config.effects.clone());
    manager.mount(&feeds.sabotage.events, &feeds.cosmic.events, clock.now());
    commands.insert_resource(ZoneEffects(manager));
    commands.insert_resource(RenderBudget(config.performance.resolve()));
}

fn tick_map_clock(time: Res<Time>, mut clock: ResMut<MapClock>) {
    clock.advance(time.delta());
}

fn advance_effects(clock: Res<MapClock>, effects: Option<ResMut<ZoneEffects>>) {
    if let Some(mut effects) = effects {
        effects.advance(clock.now());
    }
}

/// Hands changed feeds to the manager.
fn process_feeds(
    feeds: Res<Feeds>,
    clock: Res<MapClock>,
    effects: Option<ResMut<ZoneEffects>>,
) {
    let Some(mut effects) = effects else {
        return;
    };
    if !feeds.is_changed() {
        return;
    }

    let now = clock.now();
    effects.on_sabotage_feed(&feeds.sabotage.events, &feeds.roster, now);
    effects.on_cosmic_feed(&feeds.cosmic.events, now);
}

/// Cancels outstanding timers when the app shuts down.
fn dispose_on_exit(mut exit: EventReader<AppExit>, effects: Option<ResMut<ZoneEffects>>) {
    if exit.read().next().is_none() {
        return;
    }
    if let Some(mut effects) = effects {
        effects.dispose();
    }
}

/// Converts an effect color with the given opacity.
pub fn to_color(color: EffectColor, alpha: f32) -> Color {
    Color::srgba(color.r, color.g, color.b, alpha)
}

/// Point on a raised arc between two zones, `t` in 0..=1.
pub fn arc_point(from: Vec3, to: Vec3, t: f32) -> Vec3 {
    let lift = ARC_HEIGHT * 4.0 * t * (1.0 - t);
    from.lerp(to, t) + Vec3::Y * (EFFECT_LIFT + lift)
}

fn draw_effects(
    mut gizmos: Gizmos,
    clock: Res<MapClock>,
    effects: Option<Res<ZoneEffects>>,
    budget: Option<Res<RenderBudget>>,
) {
    let Some(effects) = effects else {
        return;
    };
    let layout = ZoneLayout::standard();
    let now = clock.now();
    let config = effects.config();

    for line in effects.warfare_lines() {
        let from = layout.position(line.from_zone);
        let to = layout.position(line.to_zone);
        let (Some(from), Some(to)) = (from, to) else {
            continue;
        };
        let progress = effect_progress(line.created_at, config.warfare_line_ttl(), now);
        let color = to_color(burst_color(line.kind), 1.0 - progress);
        let points =
            (0..=ARC_SEGMENTS).map(|i| arc_point(from, to, i as f32 / ARC_SEGMENTS as f32));
        gizmos.linestrip(points, color);
    }

    let per_zone = budget.map(|b| b.max_particles_per_zone as usize).unwrap_or(usize::MAX);
    let mut drawn = [0usize; ZONE_COUNT];
    // Newest bursts first so the budget keeps the freshest ones.
    for burst in effects.activity_bursts().iter().rev() {
        let Some(slot) = drawn.get_mut(burst.zone as usize) else {
            continue;
        };
        if *slot >= per_zone {
            continue;
        }
        let Some(center) = layout.position(burst.zone) else {
            continue;
        };
        *slot += 1;
        let progress = effect_progress(burst.created_at, config.activity_burst_ttl(), now);
        gizmos.sphere(
            center + Vec3::Y * (EFFECT_LIFT + progress),
            Quat::IDENTITY,
            0.3 + progress * 1.2,
            to_color(burst.color, 1.0 - progress),
        );
    }

    if let Some(shockwave) = effects.shockwave() {
        if let Some(center) = layout.position(shockwave.zone) {
            let progress = effect_progress(shockwave.created_at, config.shockwave_ttl(), now);
            let reach = 4.0 * shockwave.tier.level() as f32;
            gizmos.circle(
                center + Vec3::Y * EFFECT_LIFT,
                Dir3::Y,
                0.5 + progress * reach,
                Color::srgba(0.9, 0.95, 1.0, 1.0 - progress),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_clock_advances() {
        let mut clock = MapClock::default();
        clock.advance(Duration::from_millis(16));
        clock.advance(Duration::from_millis(16));
        assert_eq!(clock.now(), Duration::from_millis(32));
    }

    #[test]
    fn test_arc_endpoints_and_apex() {
        let from = Vec3::new(-2.0, 0.0, 0.0);
        let to = Vec3::new(2.0, 0.0, 0.0);
        assert_eq!(arc_point(from, to, 0.0), from + Vec3::Y * EFFECT_LIFT);
        assert_eq!(arc_point(from, to, 1.0), to + Vec3::Y * EFFECT_LIFT);
        let apex = arc_point(from, to, 0.5);
        assert!((apex.y - (EFFECT_LIFT + ARC_HEIGHT)).abs() < 1e-5);
        assert!(apex.x.abs() < 1e-5);
    }

    #[test]
    fn test_to_color_keeps_alpha() {
        let color = to_color(EffectColor::BREACH, 0.25);
        assert!((color.alpha() - 0.25).abs() < 1e-6);
    }
}
