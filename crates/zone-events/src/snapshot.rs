//! Snapshot Types
//!
//! Serialization structs for the agent roster and the two event feeds as a
//! poller sees them at one moment.

use serde::{Deserialize, Serialize};

use crate::{CosmicEvent, SabotageEvent, ZoneId};

/// Mining agent as reported by the roster endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub agent_id: String,
    pub zone: ZoneId,
    #[serde(default)]
    pub hashrate: f64,
    #[serde(default)]
    pub total_mined: f64,
    #[serde(default)]
    pub shield_level: u32,
}

impl AgentSnapshot {
    /// Creates an agent with the given zone and hashrate and no mining history.
    pub fn new(agent_id: impl Into<String>, zone: ZoneId, hashrate: f64) -> Self {
        Self {
            agent_id: agent_id.into(),
            zone,
            hashrate,
            total_mined: 0.0,
            shield_level: 0,
        }
    }

    /// Returns true if the agent currently has any shield.
    pub fn is_shielded(&self) -> bool {
        self.shield_level > 0
    }
}

/// Snapshot of all live agents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    pub agents: Vec<AgentSnapshot>,
}

impl Roster {
    /// Wraps a list of agents.
    pub fn new(agents: Vec<AgentSnapshot>) -> Self {
        Self { agents }
    }

    /// Looks up the current zone of an agent.
    pub fn zone_of(&self, agent_id: &str) -> Option<ZoneId> {
        self.agents
            .iter()
            .find(|a| a.agent_id == agent_id)
            .map(|a| a.zone)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

/// Sabotage feed, most recent event first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SabotageFeed {
    pub events: Vec<SabotageEvent>,
}

impl SabotageFeed {
    pub fn new(events: Vec<SabotageEvent>) -> Self {
        Self { events }
    }

    /// Most recent event, if any.
    pub fn head(&self) -> Option<&SabotageEvent> {
        self.events.first()
    }

    /// Inserts a new event at the head, dropping the oldest entries beyond `window`.
    pub fn push_front(&mut self, event: SabotageEvent, window: usize) {
        self.events.insert(0, event);
        self.events.truncate(window);
    }
}

/// Cosmic event feed, most recent event first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CosmicFeed {
    pub events: Vec<CosmicEvent>,
}

impl CosmicFeed {
    pub fn new(events: Vec<CosmicEvent>) -> Self {
        Self { events }
    }

    /// Most recent event, if any.
    pub fn head(&self) -> Option<&CosmicEvent> {
        self.events.first()
    }

    /// Inserts a new event at the head, dropping the oldest entries beyond `window`.
    pub fn push_front(&mut self, event: CosmicEvent, window: usize) {
        self.events.insert(0, event);
        self.events.truncate(window);
    }
}
