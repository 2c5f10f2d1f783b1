//! Shared feed types and serialization for the zone map.
//!
//! This crate contains pure data structures with no visualization logic.
//! It is a dependency for all other crates in the workspace.

pub mod event;
pub mod snapshot;
pub mod zone;

#[cfg(feature = "test-fixtures")]
pub mod fixtures;

// Re-export zone types
pub use zone::{is_valid_zone, ZoneId, ZONE_COUNT};

// Re-export event types
pub use event::{CosmicEvent, InvalidTier, SabotageEvent, SabotageKind, SeverityTier};

// Re-export snapshot types
pub use snapshot::{AgentSnapshot, CosmicFeed, Roster, SabotageFeed};
