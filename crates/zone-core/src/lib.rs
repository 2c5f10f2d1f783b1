//! Zone map core: layout, effect lifecycle and camera focus.
//!
//! Everything here runs on a virtual clock passed in by the caller and has no
//! rendering dependency, so the whole map can be driven headless.
//!
//! # Modules
//!
//! - [`layout`]: Deterministic 3D positions and adjacency for the eight zones
//! - [`schedule`]: Virtual clock and deadline queue
//! - [`feed`]: Watermark scanning over most-recent-first feeds
//! - [`effects`]: Warfare lines, activity bursts and cosmic shockwaves
//! - [`camera`]: Focus transitions, manual orbit and idle auto-rotate
//! - [`aggregate`]: Per-zone stats from the agent roster
//! - [`config`]: TOML configuration and performance tiers

pub mod aggregate;
pub mod camera;
pub mod config;
pub mod effects;
pub mod feed;
pub mod layout;
pub mod schedule;

pub use aggregate::{aggregate, ZoneStats, ZoneSummary};
pub use camera::{CameraFocusController, CameraPhase, CameraPose};
pub use config::{
    default_config_toml, CameraConfig, ConfigError, EffectsConfig, PerformanceConfig,
    PerformanceSettings, PerformanceTier, ZoneMapConfig,
};
pub use effects::{
    burst_color, effect_progress, ActivityBurst, CosmicShockwave, EffectBatch, EffectColor,
    EffectLifecycleManager, Phase, WarfareLine,
};
pub use feed::new_since;
pub use layout::{GridCell, ZoneLayout, WORLD_SCALE, ZONE_EDGES, ZONE_ELEVATION, ZONE_GRID};
pub use schedule::{Clock, ExpiryQueue, ManualClock};
