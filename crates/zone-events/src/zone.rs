//! Zone identifiers.

/// Index of one of the fixed map zones.
pub type ZoneId = u8;

/// Number of zones on the map. Never changes at runtime.
pub const ZONE_COUNT: usize = 8;

/// Returns true if `zone` names one of the map zones.
pub fn is_valid_zone(zone: ZoneId) -> bool {
    usize::from(zone) < ZONE_COUNT
}
