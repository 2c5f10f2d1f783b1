//! UI overlay: per-zone stats and effect status.
//!
//! Toggle with H.

use bevy::prelude::*;
use std::fmt::Write as _;
use zone_core::{aggregate, Phase, ZoneSummary};
use zone_events::ZoneId;

use crate::camera::FocusCamera;
use crate::effects::ZoneEffects;
use crate::feed_loader::Feeds;
use crate::plugin::MapSet;

/// Plugin for the stats overlay.
pub struct OverlayPlugin;

impl Plugin for OverlayPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ZoneStatsView>()
            .add_systems(Startup, setup_overlay)
            .add_systems(
                Update,
                (toggle_overlay, refresh_summary, update_overlay_text)
                    .chain()
                    .in_set(MapSet::Render),
            );
    }
}

/// Cached per-zone stats, recomputed when the roster changes.
#[derive(Resource, Default, Debug)]
pub struct ZoneStatsView {
    pub summary: ZoneSummary,
    pub visible: bool,
}

/// Component marking the overlay container.
#[derive(Component)]
pub struct OverlayContainer;

/// Component for the overlay text.
#[derive(Component)]
pub struct OverlayText;

fn setup_overlay(mut commands: Commands, mut view: ResMut<ZoneStatsView>) {
    view.visible = true;
    commands
        .spawn((
            NodeBundle {
                style: Style {
                    position_type: PositionType::Absolute,
                    top: Val::Px(10.0),
                    left: Val::Px(10.0),
                    padding: UiRect::all(Val::Px(10.0)),
                    flex_direction: FlexDirection::Column,
                    ..default()
                },
                background_color: Color::srgba(0.0, 0.0, 0.0, 0.7).into(),
                ..default()
            },
            OverlayContainer,
        ))
        .with_children(|parent| {
            parent.spawn(TextBundle::from_section(
                "ZONES (1-8 focus, Esc overview, H hide)",
                TextStyle {
                    font_size: 14.0,
                    color: Color::srgb(0.9, 0.9, 0.3),
                    ..default()
                },
            ));
            parent.spawn((
                TextBundle::from_section(
                    "",
                    TextStyle {
                        font_size: 12.0,
                        color: Color::srgb(0.8, 0.8, 0.8),
                        ..default()
                    },
                ),
                OverlayText,
            ));
        });
}

fn toggle_overlay(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut view: ResMut<ZoneStatsView>,
    mut container: Query<&mut Visibility, With<OverlayContainer>>,
) {
    if !keyboard.just_pressed(KeyCode::KeyH) {
        return;
    }
    view.visible = !view.visible;
    for mut visibility in container.iter_mut() {
        *visibility = if view.visible {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
}

fn refresh_summary(feeds: Res<Feeds>, mut view: ResMut<ZoneStatsView>) {
    if feeds.is_changed() {
        view.summary = aggregate(&feeds.roster);
    }
}

fn update_overlay_text(
    view: Res<ZoneStatsView>,
    focus: Res<FocusCamera>,
    feeds: Res<Feeds>,
    effects: Option<Res<ZoneEffects>>,
    mut text: Query<&mut Text, With<OverlayText>>,
) {
    if !view.visible {
        return;
    }

    let mut body = format_summary(&view.summary, focus.selected());
    if let Some(effects) = effects {
        let _ = write!(
            body,
            "\n{}  lines {}  bursts {}  shockwave {}",
            phase_label(effects.phase()),
            effects.warfare_lines().len(),
            effects.activity_bursts().len(),
            if effects.shockwave().is_some() { "yes" } else { "no" },
        );
    }
    if focus.auto_rotate() {
        body.push_str("\nauto-rotate");
    }
    if let Some(ref error) = feeds.last_error {
        let _ = write!(body, "\nERROR: {}", error);
    }

    for mut text in text.iter_mut() {
        text.sections[0].value.clone_from(&body);
    }
}

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Unmounted => "unmounted",
        Phase::Initializing => "warming up",
        Phase::Live => "live",
        Phase::Disposed => "stopped",
    }
}

/// One line per zone, the selected zone marked with `>` and the busiest
/// with `*`.
pub fn format_summary(summary: &ZoneSummary, selected: Option<ZoneId>) -> String {
    let busiest = summary.busiest();
    let mut out = String::new();
    for (zone, stats) in summary.zones.iter().enumerate() {
        let zone = zone as ZoneId;
        let marker = if selected == Some(zone) { '>' } else { ' ' };
        let star = if busiest == Some(zone) { "*" } else { "" };
        let _ = writeln!(
            out,
            "{} Zone {}{}: {} agents, {:.1} H/s ({:.0}%), {} shielded",
            marker,
            zone + 1,
            star,
            stats.agent_count,
            stats.total_hashrate,
            stats.hash_share * 100.0,
            stats.shielded_count,
        );
    }
    let _ = write!(
        out,
        "{} agents, {:.1} H/s total",
        summary.total_agents(),
        summary.total_hashrate
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use zone_events::{AgentSnapshot, Roster};

    #[test]
    fn test_format_summary_marks_selected_and_busiest() {
        let roster = Roster::new(vec![
            AgentSnapshot::new("a", 2, 90.0),
            AgentSnapshot::new("b", 5, 10.0),
        ]);
        let text = format_summary(&aggregate(&roster), Some(5));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 9);
        assert!(lines[2].starts_with("  Zone 3*: 1 agents, 90.0 H/s (90%)"));
        assert!(lines[5].starts_with("> Zone 6: 1 agents"));
        assert_eq!(lines[8], "2 agents, 100.0 H/s total");
    }

    #[test]
    fn test_format_empty_summary() {
        let text = format_summary(&ZoneSummary::default(), None);
        assert!(text.contains("Zone 1: 0 agents"));
        assert!(!text.contains('*'));
    }

    #[test]
    fn test_phase_labels() {
        assert_eq!(phase_label(Phase::Live), "live");
        assert_eq!(phase_label(Phase::Initializing), "warming up");
    }
}
