//! Synthetic feeds for running the map without a backend.
//!
//! Generates a roster and a steady trickle of sabotage and cosmic events from
//! a seed. Feeds are bounded like a polling endpoint's window.

use bevy::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use zone_events::{
    AgentSnapshot, CosmicEvent, Roster, SabotageEvent, SabotageKind, SeverityTier, ZoneId,
    ZONE_COUNT,
};

use crate::feed_loader::{FeedSource, Feeds};
use crate::plugin::{MapSet, MapStartup};

/// Entries kept in each synthetic feed.
pub const DEMO_WINDOW: usize = 50;
const DEMO_AGENTS: usize = 24;
/// Events already in the feeds when the map starts.
const HISTORY_SABOTAGE: usize = 8;

/// Plugin for the synthetic feed generator. Inert unless the feed source is
/// [`FeedSource::Demo`].
pub struct DemoPlugin;

impl Plugin for DemoPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, seed_demo_feeds.in_set(MapStartup::LoadFeeds))
            .add_systems(Update, run_demo_feed.in_set(MapSet::LoadFeeds));
    }
}

/// Seeded generator state.
#[derive(Resource, Debug)]
pub struct DemoFeed {
    rng: SmallRng,
    next_sabotage_id: u64,
    next_cosmic_id: u64,
    /// Seconds until the next sabotage event.
    sabotage_in: f32,
    /// Seconds until the next cosmic event.
    cosmic_in: f32,
    elapsed_ms: u64,
}

impl DemoFeed {
    pub fn new(seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let sabotage_in = rng.gen_range(0.5..1.5);
        let cosmic_in = rng.gen_range(5.0..10.0);
        Self {
            rng,
            next_sabotage_id: 1,
            next_cosmic_id: 1,
            sabotage_in,
            cosmic_in,
            elapsed_ms: 0,
        }
    }

    /// Builds a roster with agents spread over every zone.
    pub fn roster(&mut self) -> Roster {
        let agents = (0..DEMO_AGENTS)
            .map(|n| {
                let zone = (n % ZONE_COUNT) as ZoneId;
                let mut agent = AgentSnapshot::new(
                    format!("agent_{:02}", n + 1),
                    zone,
                    self.rng.gen_range(20.0..150.0),
                );
                agent.total_mined = self.rng.gen_range(0.0..5000.0);
                agent.shield_level = self.rng.gen_range(0..=3);
                agent
            })
            .collect();
        Roster::new(agents)
    }

    /// Picks two distinct agents and records an attack in the target's zone.
    pub fn next_sabotage(&mut self, roster: &Roster) -> Option<SabotageEvent> {
        if roster.len() < 2 {
            return None;
        }
        let attacker = self.rng.gen_range(0..roster.len());
        let mut target = self.rng.gen_range(0..roster.len() - 1);
        if target >= attacker {
            target += 1;
        }
        let kinds = SabotageKind::all();
        let kind = kinds[self.rng.gen_range(0..kinds.len())];

        let attacker = &roster.agents[attacker];
        let target = &roster.agents[target];
        let event = SabotageEvent::new(
            format!("demo_{:05}", self.next_sabotage_id),
            attacker.agent_id.clone(),
            target.agent_id.clone(),
            target.zone,
            kind,
            self.elapsed_ms,
        );
        self.next_sabotage_id += 1;
        Some(event)
    }

    /// Next cosmic event. Ids strictly increase.
    pub fn next_cosmic(&mut self) -> CosmicEvent {
        let zone = self.rng.gen_range(0..ZONE_COUNT) as ZoneId;
        let tier = match self.rng.gen_range(0..10) {
            0..=5 => SeverityTier::Minor,
            6..=8 => SeverityTier::Major,
            _ => SeverityTier::Cataclysmic,
        };
        let event = CosmicEvent::new(self.next_cosmic_id, zone, tier);
        self.next_cosmic_id += 1;
        event
    }

    /// Fills empty feeds with a roster and some history.
    pub fn seed_history(&mut self, feeds: &mut Feeds) {
        feeds.roster = self.roster();
        for _ in 0..HISTORY_SABOTAGE {
            if let Some(event) = self.next_sabotage(&feeds.roster) {
                feeds.sabotage.push_front(event, DEMO_WINDOW);
            }
        }
        let cosmic = self.next_cosmic();
        feeds.cosmic.push_front(cosmic, DEMO_WINDOW);
    }

    /// Advances the generator by `dt` seconds. Returns true if any feed
    /// changed.
    pub fn step(&mut self, dt: f32, feeds: &mut Feeds) -> bool {
        self.elapsed_ms += (dt.max(0.0) * 1000.0) as u64;
        self.sabotage_in -= dt;
        self.cosmic_in -= dt;
        let mut changed = false;

        while self.sabotage_in <= 0.0 {
            self.sabotage_in += self.rng.gen_range(0.4..1.8);
            if let Some(event) = self.next_sabotage(&feeds.roster) {
                self.settle_attack(&event, &mut feeds.roster);
                feeds.sabotage.push_front(event, DEMO_WINDOW);
                changed = true;
            }
        }

        while self.cosmic_in <= 0.0 {
            self.cosmic_in += self.rng.gen_range(8.0..16.0);
            let event = self.next_cosmic();
            feeds.cosmic.push_front(event, DEMO_WINDOW);
            changed = true;
        }

        changed
    }

    /// Moves a little hashrate from target to attacker.
    fn settle_attack(&mut self, event: &SabotageEvent, roster: &mut Roster) {
        let drained: f64 = self.rng.gen_range(1.0..8.0);
        let mut taken = 0.0;
        if let Some(target) = roster.agents.iter_mut().find(|a| a.agent_id == event.target_id) {
            taken = drained.min(target.hashrate);
            target.hashrate -= taken;
            if event.kind == SabotageKind::ShieldBreach {
                target.shield_level = target.shield_level.saturating_sub(1);
            }
        }
        if let Some(attacker) = roster.agents.iter_mut().find(|a| a.agent_id == event.attacker_id) {
            attacker.hashrate += taken;
            attacker.total_mined += taken;
        }
    }
}

fn seed_demo_feeds(mut commands: Commands, source: Res<FeedSource>, mut feeds: ResMut<Feeds>) {
    let FeedSource::Demo { seed } = *source else {
        return;
    };
    let mut demo = DemoFeed::new(seed);
    demo.seed_history(&mut feeds);
    tracing::info!(
        "Demo feeds seeded (seed {}): {} agents, {} sabotage events",
        seed,
        feeds.roster.len(),
        feeds.sabotage.events.len()
    );
    commands.insert_resource(demo);
}

fn run_demo_feed(time: Res<Time>, demo: Option<ResMut<DemoFeed>>, mut feeds: ResMut<Feeds>) {
    let Some(mut demo) = demo else {
        return;
    };
    if demo.step(time.delta_seconds(), feeds.bypass_change_detection()) {
        feeds.set_changed();
    }
}
