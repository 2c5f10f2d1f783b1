//! Camera focus state machine.
//!
//! The camera is either `Free` (only direct manipulation moves it) or
//! `Transitioning` toward a goal pose. Transitions use exponential damping,
//! `factor = 1 - base^dt`, so the approach speed does not depend on the
//! frame rate. Any drag or zoom drops back to `Free` on the spot. After a
//! quiet spell with nothing selected the camera slowly orbits the scene.

use glam::{Quat, Vec3};
use std::time::Duration;
use zone_events::ZoneId;

use crate::config::CameraConfig;
use crate::layout::ZoneLayout;

/// Lowest and highest polar angle (from straight up) an orbit may reach.
const MIN_POLAR: f32 = 0.1;
const MAX_POLAR: f32 = 1.5;

/// Camera position and look-at target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
}

impl CameraPose {
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self { position, target }
    }

    /// Default pose showing the whole map.
    pub fn overview(config: &CameraConfig) -> Self {
        Self::new(config.overview_position(), config.overview_target())
    }

    /// Pose looking at a zone from a fixed offset.
    pub fn focus_on(zone_position: Vec3, config: &CameraConfig) -> Self {
        Self::new(
            zone_position + Vec3::new(0.0, config.focus_height, config.focus_distance),
            zone_position,
        )
    }

    /// Distance between position and target.
    pub fn distance(&self) -> f32 {
        self.position.distance(self.target)
    }
}

/// What the controller is doing this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraPhase {
    /// Only direct manipulation (or auto-rotation) moves the camera.
    Free,
    /// Easing toward `goal`.
    Transitioning { goal: CameraPose },
}

/// Drives the camera pose from selection, manipulation and time.
#[derive(Debug, Clone)]
pub struct CameraFocusController {
    config: CameraConfig,
    pose: CameraPose,
    phase: CameraPhase,
    selected: Option<ZoneId>,
    hovered: Option<ZoneId>,
    dragging: bool,
    idle_secs: f32,
    auto_rotate: bool,
}

impl Default for CameraFocusController {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

impl CameraFocusController {
    /// Creates a controller resting at the overview pose.
    pub fn new(config: CameraConfig) -> Self {
        Self {
            pose: CameraPose::overview(&config),
            config,
            phase: CameraPhase::Free,
            selected: None,
            hovered: None,
            dragging: false,
            idle_secs: 0.0,
            auto_rotate: false,
        }
    }

    /// Selects a zone (or clears the selection) and starts moving toward
    /// its focus pose or the overview.
    ///
    /// Zones missing from `layout` are treated as clearing the selection.
    pub fn select_zone(&mut self, zone: Option<ZoneId>, layout: &ZoneLayout) {
        let focus = zone.and_then(|z| layout.position(z).map(|p| (z, p)));
        let goal = match focus {
            Some((_, position)) => CameraPose::focus_on(position, &self.config),
            None => CameraPose::overview(&self.config),
        };

        self.selected = focus.map(|(z, _)| z);
        self.phase = CameraPhase::Transitioning { goal };
        self.note_interaction();

        tracing::debug!("Camera focus -> {:?}", self.selected);
    }

    /// Records the zone under the pointer. Hovering does not count as
    /// interaction for the idle timer.
    pub fn hover_zone(&mut self, zone: Option<ZoneId>) {
        self.hovered = zone;
    }

    /// User started dragging: stop any transition where it is.
    pub fn begin_drag(&mut self) {
        self.dragging = true;
        self.interrupt();
    }

    /// User released the drag.
    pub fn end_drag(&mut self) {
        self.dragging = false;
        self.note_interaction();
    }

    /// Rotates the camera around its target by yaw and pitch radians.
    pub fn orbit(&mut self, yaw: f32, pitch: f32) {
        self.interrupt();
        self.rotate(yaw, pitch);
    }

    /// Scales the orbit distance by `factor`, clamped to the configured range.
    pub fn zoom(&mut self, factor: f32) {
        self.interrupt();
        let offset = self.pose.position - self.pose.target;
        let distance = offset.length();
        if distance <= f32::EPSILON {
            return;
        }
        let new_distance = (distance * factor).clamp(self.config.min_distance, self.config.max_distance);
        self.pose.position = self.pose.target + offset * (new_distance / distance);
    }

    /// Advances the controller by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        let dt = dt.max(0.0);

        if let CameraPhase::Transitioning { goal } = self.phase {
            let factor = 1.0 - self.config.damping_base.powf(dt);
            self.pose.position = self.pose.position.lerp(goal.position, factor);
            self.pose.target = self.pose.target.lerp(goal.target, factor);

            if self.pose.position.distance(goal.position) < self.config.settle_threshold {
                self.phase = CameraPhase::Free;
                tracing::debug!("Camera settled at {:?}", self.pose.position);
            }
        }

        if self.dragging {
            self.idle_secs = 0.0;
        } else {
            self.idle_secs += dt;
        }

        self.auto_rotate = self.phase == CameraPhase::Free
            && self.selected.is_none()
            && !self.dragging
            && self.idle_secs >= self.config.idle_timeout_secs;

        if self.auto_rotate {
            self.rotate(self.config.auto_rotate_speed * dt, 0.0);
        }
    }

    /// Same as [`tick`](Self::tick) with a `Duration`.
    pub fn tick_duration(&mut self, dt: Duration) {
        self.tick(dt.as_secs_f32());
    }

    pub fn pose(&self) -> CameraPose {
        self.pose
    }

    pub fn phase(&self) -> CameraPhase {
        self.phase
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.phase, CameraPhase::Transitioning { .. })
    }

    pub fn auto_rotate(&self) -> bool {
        self.auto_rotate
    }

    pub fn selected(&self) -> Option<ZoneId> {
        self.selected
    }

    pub fn hovered(&self) -> Option<ZoneId> {
        self.hovered
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Seconds since the last interaction.
    pub fn idle_secs(&self) -> f32 {
        self.idle_secs
    }

    fn interrupt(&mut self) {
        self.phase = CameraPhase::Free;
        self.note_interaction();
    }

    fn note_interaction(&mut self) {
        self.idle_secs = 0.0;
        self.auto_rotate = false;
    }

    fn rotate(&mut self, yaw: f32, pitch: f32) {
        let offset = self.pose.position - self.pose.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return;
        }

        let polar = (offset.y / radius).clamp(-1.0, 1.0).acos();
        let new_polar = (polar - pitch).clamp(MIN_POLAR, MAX_POLAR);
        let horizontal = Quat::from_rotation_y(yaw) * Vec3::new(offset.x, 0.0, offset.z);
        let direction = if horizontal.length_squared() > f32::EPSILON {
            horizontal.normalize()
        } else {
            Vec3::Z
        };

        let rotated = direction * (radius * new_polar.sin()) + Vec3::Y * (radius * new_polar.cos());
        self.pose.position = self.pose.target + rotated;
    }
}
