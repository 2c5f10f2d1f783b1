//! Visualization layer: Bevy-based zone map renderer.

pub mod camera;
pub mod demo;
pub mod effects;
pub mod feed_loader;
pub mod overlay;
pub mod plugin;
pub mod zones;

pub use feed_loader::FeedSource;
pub use plugin::{MapConfig, ZoneMapPlugin};
