//! Per-zone statistics reduced from the agent roster.

use serde::Serialize;
use zone_events::{is_valid_zone, Roster, ZoneId, ZONE_COUNT};

/// Totals for one zone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ZoneStats {
    pub agent_count: u32,
    pub total_hashrate: f64,
    pub total_mined: f64,
    /// Agents with a shield level above zero.
    pub shielded_count: u32,
    pub avg_hashrate: f64,
    /// Fraction of the global hashrate held by this zone.
    pub hash_share: f64,
}

/// Stats for all zones, indexed by zone id.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ZoneSummary {
    pub zones: [ZoneStats; ZONE_COUNT],
    pub total_hashrate: f64,
}

impl ZoneSummary {
    pub fn get(&self, zone: ZoneId) -> Option<&ZoneStats> {
        self.zones.get(zone as usize)
    }

    /// Zone with the highest hashrate, lowest id on ties. `None` if every
    /// zone is empty.
    pub fn busiest(&self) -> Option<ZoneId> {
        let mut best: Option<(ZoneId, f64)> = None;
        for (zone, stats) in self.zones.iter().enumerate() {
            if stats.agent_count == 0 {
                continue;
            }
            match best {
                Some((_, rate)) if stats.total_hashrate <= rate => {}
                _ => best = Some((zone as ZoneId, stats.total_hashrate)),
            }
        }
        best.map(|(zone, _)| zone)
    }

    pub fn total_agents(&self) -> u32 {
        self.zones.iter().map(|z| z.agent_count).sum()
    }
}

/// Folds the roster into per-zone totals. Agents in unknown zones are skipped.
pub fn aggregate(roster: &Roster) -> ZoneSummary {
    let mut summary = ZoneSummary::default();

    for agent in &roster.agents {
        if !is_valid_zone(agent.zone) {
            tracing::trace!("Skipping {} in unknown zone {}", agent.agent_id, agent.zone);
            continue;
        }
        let stats = &mut summary.zones[agent.zone as usize];
        stats.agent_count += 1;
        stats.total_hashrate += agent.hashrate;
        stats.total_mined += agent.total_mined;
        if agent.is_shielded() {
            stats.shielded_count += 1;
        }
        summary.total_hashrate += agent.hashrate;
    }

    for stats in summary.zones.iter_mut() {
        if stats.agent_count > 0 {
            stats.avg_hashrate = stats.total_hashrate / stats.agent_count as f64;
        }
        if summary.total_hashrate > 0.0 {
            stats.hash_share = stats.total_hashrate / summary.total_hashrate;
        }
    }

    summary
}
