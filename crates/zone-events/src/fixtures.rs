//! Sample data fixtures for testing.
//!
//! This module provides ready-made feeds for other crates to use.
//! Enable the `test-fixtures` feature to access these helpers.
//!
//! # Example
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // zone-events = { path = "../zone-events", features = ["test-fixtures"] }
//!
//! use zone_events::fixtures;
//!
//! let roster = fixtures::sample_roster();
//! let sabotage = fixtures::sample_sabotage_feed();
//! ```

use crate::{CosmicEvent, CosmicFeed, Roster, SabotageEvent, SabotageFeed, SabotageKind, SeverityTier};

/// Returns the sample roster.
///
/// Contains 9 agents, at least one in every zone, two of them in zone 0.
pub fn sample_roster() -> Roster {
    let json = include_str!("../tests/fixtures/sample_roster.json");
    serde_json::from_str(json).expect("Failed to parse sample_roster.json")
}

/// Returns the sample sabotage feed, most recent first.
///
/// Contains 6 events:
/// - `sab_0006` crosses zones 1 -> 2
/// - `sab_0005` stays inside zone 0
/// - `sab_0004` names an attacker missing from the roster
/// - `sab_0003` has an attack type this build does not know
/// - `sab_0002` crosses zones 5 -> 6
/// - `sab_0001` crosses zones 3 -> 1
pub fn sample_sabotage_feed() -> SabotageFeed {
    let json = include_str!("../tests/fixtures/sample_sabotage_feed.json");
    serde_json::from_str(json).expect("Failed to parse sample_sabotage_feed.json")
}

/// Returns the sample cosmic feed (ids 42, 41, 40).
pub fn sample_cosmic_feed() -> CosmicFeed {
    let json = include_str!("../tests/fixtures/sample_cosmic_feed.json");
    serde_json::from_str(json).expect("Failed to parse sample_cosmic_feed.json")
}

/// Builds a sabotage event between two roster agents.
pub fn sabotage(id: &str, attacker: &str, target: &str, zone: u8) -> SabotageEvent {
    SabotageEvent::new(id, attacker, target, zone, SabotageKind::HashrateDrain, 0)
}

/// Builds a cosmic event of minor severity.
pub fn cosmic(event_id: u64, zone: u8) -> CosmicEvent {
    CosmicEvent::new(event_id, zone, SeverityTier::Minor)
}

/// Returns `count` cross-zone sabotage events, most recent first, with ids
/// `burst_<n>` counting down from `count - 1`. Attackers sit in zone 0 and
/// targets in zone 1 of [`sample_roster`].
pub fn sabotage_storm(count: usize) -> SabotageFeed {
    let events = (0..count)
        .rev()
        .map(|n| sabotage(&format!("burst_{:03}", n), "agent_01", "agent_03", 1))
        .collect();
    SabotageFeed::new(events)
}
