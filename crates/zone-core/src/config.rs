//! Configuration loading for the zone map.
//!
//! All tunables are loaded from a TOML configuration file. Every section
//! falls back to its defaults, so an empty file is a valid configuration.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Complete zone map configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneMapConfig {
    /// Effect lifetimes and capacities
    #[serde(default)]
    pub effects: EffectsConfig,
    /// Camera motion settings
    #[serde(default)]
    pub camera: CameraConfig,
    /// Rendering budget, consumed only by the renderer
    #[serde(default)]
    pub performance: PerformanceConfig,
}

impl ZoneMapConfig {
    /// Loads and validates configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses and validates configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration as pretty TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Rejects values the core cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let e = &self.effects;
        if e.max_warfare_lines == 0 || e.max_activity_bursts == 0 || e.max_new_batch == 0 {
            return Err(ConfigError::Invalid(
                "effect capacities must be at least 1".into(),
            ));
        }
        for (name, secs) in [
            ("grace_delay_secs", e.grace_delay_secs),
            ("warfare_line_ttl_secs", e.warfare_line_ttl_secs),
            ("activity_burst_ttl_secs", e.activity_burst_ttl_secs),
            ("shockwave_ttl_secs", e.shockwave_ttl_secs),
            ("idle_timeout_secs", self.camera.idle_timeout_secs),
        ] {
            if !secs.is_finite() || secs <= 0.0 {
                return Err(ConfigError::Invalid(format!("{} must be positive", name)));
            }
        }

        let c = &self.camera;
        if !(c.damping_base > 0.0 && c.damping_base < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "camera.damping_base must be in (0, 1), got {}",
                c.damping_base
            )));
        }
        for (name, value) in [
            ("camera.settle_threshold", c.settle_threshold),
            ("camera.focus_distance", c.focus_distance),
            ("camera.max_distance", c.max_distance),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!("{} must be positive", name)));
            }
        }
        if !(c.auto_rotate_speed.is_finite() && c.auto_rotate_speed >= 0.0) {
            return Err(ConfigError::Invalid(
                "camera.auto_rotate_speed must be finite and not negative".into(),
            ));
        }
        if !(c.min_distance > 0.0 && c.min_distance < c.max_distance) {
            return Err(ConfigError::Invalid(
                "camera.min_distance must be positive and below max_distance".into(),
            ));
        }

        if let Some([low, high]) = self.performance.device_pixel_ratio_range {
            if low <= 0.0 || low > high {
                return Err(ConfigError::Invalid(format!(
                    "performance.device_pixel_ratio_range [{}, {}] is empty",
                    low, high
                )));
            }
        }
        Ok(())
    }
}

/// Effect lifetimes and capacities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    /// Seconds after mount before feed changes produce effects
    pub grace_delay_secs: f32,
    /// Lifetime of a cross-zone warfare line
    pub warfare_line_ttl_secs: f32,
    /// Lifetime of an activity burst
    pub activity_burst_ttl_secs: f32,
    /// Lifetime of a cosmic shockwave
    pub shockwave_ttl_secs: f32,
    /// Maximum concurrently live warfare lines
    pub max_warfare_lines: usize,
    /// Maximum concurrently live activity bursts
    pub max_activity_bursts: usize,
    /// Largest batch taken when the watermark fell out of the feed window
    pub max_new_batch: usize,
    /// How many processed sabotage ids are remembered to reject regressions
    pub regression_memory: usize,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            grace_delay_secs: 3.0,
            warfare_line_ttl_secs: 10.0,
            activity_burst_ttl_secs: 3.0,
            shockwave_ttl_secs: 4.0,
            max_warfare_lines: 10,
            max_activity_bursts: 12,
            max_new_batch: 12,
            regression_memory: 256,
        }
    }
}

impl EffectsConfig {
    pub fn grace_delay(&self) -> Duration {
        secs(self.grace_delay_secs)
    }

    pub fn warfare_line_ttl(&self) -> Duration {
        secs(self.warfare_line_ttl_secs)
    }

    pub fn activity_burst_ttl(&self) -> Duration {
        secs(self.activity_burst_ttl_secs)
    }

    pub fn shockwave_ttl(&self) -> Duration {
        secs(self.shockwave_ttl_secs)
    }
}

/// Camera motion settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Fraction of the remaining distance left after one second of damping.
    /// 0.015 per second is a base of about 0.9958 per millisecond.
    pub damping_base: f32,
    /// Distance below which a transition counts as settled
    pub settle_threshold: f32,
    /// Seconds without interaction before auto-rotation starts
    pub idle_timeout_secs: f32,
    /// Auto-rotation speed in radians per second
    pub auto_rotate_speed: f32,
    /// Horizontal distance of the focus pose from its zone
    pub focus_distance: f32,
    /// Height of the focus pose above its zone
    pub focus_height: f32,
    /// Overview camera position
    pub overview_position: [f32; 3],
    /// Overview look-at target
    pub overview_target: [f32; 3],
    /// Closest allowed orbit distance
    pub min_distance: f32,
    /// Farthest allowed orbit distance
    pub max_distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            damping_base: 0.015,
            settle_threshold: 0.05,
            idle_timeout_secs: 6.0,
            auto_rotate_speed: 0.12,
            focus_distance: 8.0,
            focus_height: 6.0,
            overview_position: [0.0, 18.0, 22.0],
            overview_target: [0.0, 0.0, 0.0],
            min_distance: 4.0,
            max_distance: 60.0,
        }
    }
}

impl CameraConfig {
    pub fn idle_timeout(&self) -> Duration {
        secs(self.idle_timeout_secs)
    }

    pub fn overview_position(&self) -> Vec3 {
        Vec3::from_array(self.overview_position)
    }

    pub fn overview_target(&self) -> Vec3 {
        Vec3::from_array(self.overview_target)
    }
}

/// Named rendering budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceTier {
    Low,
    #[default]
    Medium,
    High,
}

/// Rendering budget as written in the config file: a tier plus optional
/// per-field overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    pub tier: PerformanceTier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub star_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_particles_per_zone: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bloom_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vignette_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_pixel_ratio_range: Option<[f32; 2]>,
}

/// Resolved rendering budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceSettings {
    pub star_count: u32,
    pub max_particles_per_zone: u32,
    pub bloom_enabled: bool,
    pub vignette_enabled: bool,
    pub device_pixel_ratio_range: [f32; 2],
}

impl PerformanceSettings {
    /// Baseline budget for a tier.
    pub fn for_tier(tier: PerformanceTier) -> Self {
        match tier {
            PerformanceTier::Low => Self {
                star_count: 400,
                max_particles_per_zone: 8,
                bloom_enabled: false,
                vignette_enabled: false,
                device_pixel_ratio_range: [1.0, 1.0],
            },
            PerformanceTier::Medium => Self {
                star_count: 1200,
                max_particles_per_zone: 20,
                bloom_enabled: true,
                vignette_enabled: false,
                device_pixel_ratio_range: [1.0, 1.5],
            },
            PerformanceTier::High => Self {
                star_count: 3000,
                max_particles_per_zone: 40,
                bloom_enabled: true,
                vignette_enabled: true,
                device_pixel_ratio_range: [1.0, 2.0],
            },
        }
    }
}

impl PerformanceConfig {
    /// Applies overrides on top of the tier baseline.
    pub fn resolve(&self) -> PerformanceSettings {
        let base = PerformanceSettings::for_tier(self.tier);
        PerformanceSettings {
            star_count: self.star_count.unwrap_or(base.star_count),
            max_particles_per_zone: self
                .max_particles_per_zone
                .unwrap_or(base.max_particles_per_zone),
            bloom_enabled: self.bloom_enabled.unwrap_or(base.bloom_enabled),
            vignette_enabled: self.vignette_enabled.unwrap_or(base.vignette_enabled),
            device_pixel_ratio_range: self
                .device_pixel_ratio_range
                .unwrap_or(base.device_pixel_ratio_range),
        }
    }
}

fn secs(value: f32) -> Duration {
    Duration::try_from_secs_f32(value).unwrap_or(Duration::ZERO)
}

/// Errors that can occur during configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Error parsing TOML config
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    /// Error writing TOML config
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// A value parsed but cannot be used
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Generates a default configuration file content.
pub fn default_config_toml() -> String {
    r#"# Zone Map Configuration

[effects]
grace_delay_secs = 3.0
warfare_line_ttl_secs = 10.0
activity_burst_ttl_secs = 3.0
shockwave_ttl_secs = 4.0
max_warfare_lines = 10
max_activity_bursts = 12
max_new_batch = 12
regression_memory = 256

[camera]
damping_base = 0.015
settle_threshold = 0.05
idle_timeout_secs = 6.0
auto_rotate_speed = 0.12
focus_distance = 8.0
focus_height = 6.0
overview_position = [0.0, 18.0, 22.0]
overview_target = [0.0, 0.0, 0.0]
min_distance = 4.0
max_distance = 60.0

[performance]
# low | medium | high; any field below overrides the tier baseline
tier = "medium"
# star_count = 1200
# max_particles_per_zone = 20
# bloom_enabled = true
# vignette_enabled = false
# device_pixel_ratio_range = [1.0, 1.5]
"#
    .to_string()
}
