//! Event Types
//!
//! Sabotage and cosmic event definitions as delivered by the polling feeds.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ZoneId;

/// Category of a sabotage attack.
///
/// The wire value is a snake_case string. Values the viewer does not know
/// about deserialize to [`SabotageKind::Unknown`] instead of failing the
/// whole feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SabotageKind {
    /// Steals hashrate from the target.
    HashrateDrain,
    /// Knocks down the target's shield.
    ShieldBreach,
    /// Disrupts mining across the target's zone.
    ZoneDisruption,
    /// Any attack type this build does not recognise.
    #[serde(other)]
    Unknown,
}

impl SabotageKind {
    /// Returns all known variants, `Unknown` last.
    pub fn all() -> &'static [SabotageKind] {
        &[
            SabotageKind::HashrateDrain,
            SabotageKind::ShieldBreach,
            SabotageKind::ZoneDisruption,
            SabotageKind::Unknown,
        ]
    }
}

impl fmt::Display for SabotageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SabotageKind::HashrateDrain => write!(f, "hashrate_drain"),
            SabotageKind::ShieldBreach => write!(f, "shield_breach"),
            SabotageKind::ZoneDisruption => write!(f, "zone_disruption"),
            SabotageKind::Unknown => write!(f, "unknown"),
        }
    }
}

/// A single sabotage attack between two agents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SabotageEvent {
    /// Unique event identifier.
    pub id: String,
    /// Agent that launched the attack.
    pub attacker_id: String,
    /// Agent that was attacked.
    pub target_id: String,
    /// Zone where the attack was recorded.
    pub zone: ZoneId,
    /// Attack category.
    #[serde(rename = "type")]
    pub kind: SabotageKind,
    /// Unix timestamp in milliseconds.
    pub timestamp: u64,
}

impl SabotageEvent {
    /// Creates a new sabotage event.
    pub fn new(
        id: impl Into<String>,
        attacker_id: impl Into<String>,
        target_id: impl Into<String>,
        zone: ZoneId,
        kind: SabotageKind,
        timestamp: u64,
    ) -> Self {
        Self {
            id: id.into(),
            attacker_id: attacker_id.into(),
            target_id: target_id.into(),
            zone,
            kind,
            timestamp,
        }
    }
}

/// Severity of a cosmic event, serialized as the integers 1 to 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SeverityTier {
    Minor = 1,
    Major = 2,
    Cataclysmic = 3,
}

impl SeverityTier {
    /// Numeric tier, 1 to 3.
    pub fn level(self) -> u8 {
        self as u8
    }
}

/// Error returned when a tier number is outside 1..=3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTier(pub u8);

impl fmt::Display for InvalidTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid severity tier {} (expected 1, 2 or 3)", self.0)
    }
}

impl std::error::Error for InvalidTier {}

impl TryFrom<u8> for SeverityTier {
    type Error = InvalidTier;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(SeverityTier::Minor),
            2 => Ok(SeverityTier::Major),
            3 => Ok(SeverityTier::Cataclysmic),
            other => Err(InvalidTier(other)),
        }
    }
}

impl From<SeverityTier> for u8 {
    fn from(tier: SeverityTier) -> Self {
        tier.level()
    }
}

/// A cosmic event hitting one zone.
///
/// `event_id` increases strictly over time, so "new since last seen" is a
/// plain comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CosmicEvent {
    /// Monotonically increasing identifier.
    pub event_id: u64,
    /// Zone the event originates from.
    pub origin_zone: ZoneId,
    /// Severity tier.
    pub tier: SeverityTier,
}

impl CosmicEvent {
    /// Creates a new cosmic event.
    pub fn new(event_id: u64, origin_zone: ZoneId, tier: SeverityTier) -> Self {
        Self {
            event_id,
            origin_zone,
            tier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sabotage_event_wire_format() {
        let json = r#"{"id":"sab_1","attacker_id":"a1","target_id":"a2","zone":3,"type":"shield_breach","timestamp":1700000000000}"#;
        let event: SabotageEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.id, "sab_1");
        assert_eq!(event.zone, 3);
        assert_eq!(event.kind, SabotageKind::ShieldBreach);
    }

    #[test]
    fn test_unrecognised_kind_is_unknown() {
        let json = r#"{"id":"sab_2","attacker_id":"a1","target_id":"a2","zone":0,"type":"orbital_laser","timestamp":0}"#;
        let event: SabotageEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.kind, SabotageKind::Unknown);
    }

    #[test]
    fn test_kind_display_matches_wire() {
        for kind in SabotageKind::all() {
            if *kind == SabotageKind::Unknown {
                continue;
            }
            let wire = serde_json::to_string(kind).unwrap();
            assert_eq!(wire, format!("\"{}\"", kind));
        }
    }

    #[test]
    fn test_severity_tier_numeric() {
        let event: CosmicEvent =
            serde_json::from_str(r#"{"event_id":9,"origin_zone":5,"tier":3}"#).unwrap();
        assert_eq!(event.tier, SeverityTier::Cataclysmic);
        assert_eq!(serde_json::to_string(&SeverityTier::Major).unwrap(), "2");
    }

    #[test]
    fn test_severity_tier_out_of_range() {
        let result = serde_json::from_str::<CosmicEvent>(r#"{"event_id":1,"origin_zone":0,"tier":4}"#);
        assert!(result.is_err());
        assert_eq!(SeverityTier::try_from(0), Err(InvalidTier(0)));
    }
}
