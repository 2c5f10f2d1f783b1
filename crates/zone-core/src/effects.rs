//! Ephemeral effects derived from the sabotage and cosmic feeds.
//!
//! The manager turns two most-recent-first feeds and the live roster into
//! three bounded collections: cross-zone warfare lines, per-zone activity
//! bursts and at most one cosmic shockwave. Every effect expires on its own
//! id-targeted timer; capacity overflow evicts the oldest entries first.
//!
//! Feed contents that existed when the manager was mounted never produce
//! effects. Changes are only acted on once the grace delay has elapsed.

use std::collections::{HashSet, VecDeque};
use std::time::Duration;

use zone_events::{CosmicEvent, Roster, SabotageEvent, SabotageKind, SeverityTier, ZoneId};

use crate::config::EffectsConfig;
use crate::feed::new_since;
use crate::schedule::ExpiryQueue;

/// Linear sRGB color handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl EffectColor {
    pub const fn srgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub const DRAIN: EffectColor = EffectColor::srgb(1.0, 0.27, 0.2);
    pub const BREACH: EffectColor = EffectColor::srgb(0.25, 0.65, 1.0);
    pub const DISRUPTION: EffectColor = EffectColor::srgb(0.75, 0.3, 1.0);
    pub const DEFAULT: EffectColor = EffectColor::srgb(1.0, 0.8, 0.3);
}

/// Burst color for a sabotage category.
pub fn burst_color(kind: SabotageKind) -> EffectColor {
    match kind {
        SabotageKind::HashrateDrain => EffectColor::DRAIN,
        SabotageKind::ShieldBreach => EffectColor::BREACH,
        SabotageKind::ZoneDisruption => EffectColor::DISRUPTION,
        SabotageKind::Unknown => EffectColor::DEFAULT,
    }
}

/// Line between the attacker's and the target's zones.
#[derive(Debug, Clone, PartialEq)]
pub struct WarfareLine {
    pub id: String,
    pub from_zone: ZoneId,
    pub to_zone: ZoneId,
    pub created_at: Duration,
    pub kind: SabotageKind,
}

/// Pulse on the zone where a sabotage event was recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityBurst {
    pub id: String,
    pub zone: ZoneId,
    pub created_at: Duration,
    pub color: EffectColor,
}

/// Ring spreading out from the origin of the latest cosmic event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CosmicShockwave {
    pub zone: ZoneId,
    pub tier: SeverityTier,
    pub event_id: u64,
    pub created_at: Duration,
}

/// Fraction of `ttl` elapsed since `created_at`, clamped to 0..=1.
pub fn effect_progress(created_at: Duration, ttl: Duration, now: Duration) -> f32 {
    if ttl.is_zero() {
        return 1.0;
    }
    let age = now.saturating_sub(created_at);
    (age.as_secs_f32() / ttl.as_secs_f32()).clamp(0.0, 1.0)
}

/// Counts of what one sabotage pass created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EffectBatch {
    pub warfare_lines: usize,
    pub activity_bursts: usize,
    pub evicted: usize,
}

impl EffectBatch {
    pub fn is_empty(&self) -> bool {
        self.warfare_lines == 0 && self.activity_bursts == 0
    }
}

/// Lifecycle phase of the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Not mounted yet; no heads recorded.
    #[default]
    Unmounted,
    /// Heads recorded, waiting for the grace delay.
    Initializing,
    /// Feed changes produce effects.
    Live,
    /// Torn down; every call is a no-op.
    Disposed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Expiry {
    GraceElapsed,
    WarfareLine(String),
    ActivityBurst(String),
    Shockwave(u64),
}

/// Bounded memory of processed sabotage ids.
#[derive(Debug, Default)]
struct RecentIds {
    order: VecDeque<String>,
    members: HashSet<String>,
    capacity: usize,
}

impl RecentIds {
    fn new(capacity: usize) -> Self {
        Self {
            order: VecDeque::with_capacity(capacity),
            members: HashSet::with_capacity(capacity),
            capacity,
        }
    }

    fn contains(&self, id: &str) -> bool {
        self.members.contains(id)
    }

    /// Returns false if the id was already remembered. When full, the
    /// earliest inserted id is forgotten, so callers insert oldest first.
    fn insert(&mut self, id: &str) -> bool {
        if self.capacity == 0 {
            return true;
        }
        if self.members.contains(id) {
            return false;
        }
        if self.order.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.members.remove(&oldest);
            }
        }
        self.order.push_back(id.to_string());
        self.members.insert(id.to_string());
        true
    }

    fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }
}

/// Owns the live effect collections and the feed watermarks.
#[derive(Debug)]
pub struct EffectLifecycleManager {
    config: EffectsConfig,
    phase: Phase,
    last_seen_sabotage: Option<String>,
    last_seen_cosmic: u64,
    warfare_lines: VecDeque<WarfareLine>,
    activity_bursts: VecDeque<ActivityBurst>,
    shockwave: Option<CosmicShockwave>,
    timers: ExpiryQueue<Expiry>,
    recent_ids: RecentIds,
}

impl Default for EffectLifecycleManager {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl EffectLifecycleManager {
    /// Creates an unmounted manager with the given configuration.
    pub fn new(config: EffectsConfig) -> Self {
        let recent_ids = RecentIds::new(config.regression_memory);
        Self {
            warfare_lines: VecDeque::with_capacity(config.max_warfare_lines + 1),
            activity_bursts: VecDeque::with_capacity(config.max_activity_bursts + 1),
            config,
            phase: Phase::Unmounted,
            last_seen_sabotage: None,
            last_seen_cosmic: 0,
            shockwave: None,
            timers: ExpiryQueue::new(),
            recent_ids,
        }
    }

    /// Creates an unmounted manager with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(EffectsConfig::default())
    }

    /// Records the current feed heads as already seen and starts the grace delay.
    ///
    /// Only the first call has any effect.
    pub fn mount(&mut self, sabotage: &[SabotageEvent], cosmic: &[CosmicEvent], now: Duration) {
        if self.phase != Phase::Unmounted {
            return;
        }

        self.last_seen_sabotage = sabotage.first().map(|e| e.id.clone());
        self.last_seen_cosmic = cosmic.first().map(|e| e.event_id).unwrap_or(0);
        // Everything already in the window is history, even if the watermark
        // later falls out of it.
        for event in sabotage.iter().rev() {
            self.recent_ids.insert(&event.id);
        }

        self.timers
            .schedule(now + self.config.grace_delay(), Expiry::GraceElapsed);
        self.phase = Phase::Initializing;

        tracing::info!(
            "Effect manager mounted: {} sabotage and {} cosmic events treated as history",
            sabotage.len(),
            cosmic.len()
        );
    }

    /// Fires every timer due at `now`.
    pub fn advance(&mut self, now: Duration) {
        if self.phase == Phase::Disposed {
            return;
        }

        for expiry in self.timers.pop_due(now) {
            match expiry {
                Expiry::GraceElapsed => {
                    if self.phase == Phase::Initializing {
                        self.phase = Phase::Live;
                        tracing::info!("Effect grace delay elapsed; feed changes are now live");
                    }
                }
                Expiry::WarfareLine(id) => {
                    self.warfare_lines.retain(|line| line.id != id);
                    tracing::debug!("Warfare line {} expired", id);
                }
                Expiry::ActivityBurst(id) => {
                    self.activity_bursts.retain(|burst| burst.id != id);
                    tracing::debug!("Activity burst {} expired", id);
                }
                Expiry::Shockwave(event_id) => {
                    // A newer shockwave replaced this one; its own timer clears it.
                    if self.shockwave.is_some_and(|s| s.event_id == event_id) {
                        self.shockwave = None;
                        tracing::debug!("Shockwave {} cleared", event_id);
                    }
                }
            }
        }
    }

    /// Converts sabotage events that arrived since the last pass into effects.
    ///
    /// Does nothing before the grace delay elapses, on an empty feed, or when
    /// the head is unchanged. Events are handled in feed order, most recent
    /// first. An attacker or target missing from `roster` costs the event its
    /// warfare line but never its burst.
    pub fn on_sabotage_feed(
        &mut self,
        feed: &[SabotageEvent],
        roster: &Roster,
        now: Duration,
    ) -> EffectBatch {
        self.advance(now);
        let mut batch = EffectBatch::default();

        if self.phase != Phase::Live {
            return batch;
        }
        let Some(head) = feed.first() else {
            return batch;
        };
        if self.last_seen_sabotage.as_deref() == Some(head.id.as_str()) {
            return batch;
        }

        let fresh = new_since(
            feed,
            self.last_seen_sabotage.as_deref(),
            |e: &SabotageEvent| e.id.as_str(),
            self.config.max_new_batch,
        );
        // Advance the watermark before emitting anything so a re-entrant
        // update cannot see these ids as new.
        self.last_seen_sabotage = Some(head.id.clone());

        let mut new_line_ids = Vec::new();
        let mut new_burst_ids = Vec::new();
        let mut processed: Vec<&str> = Vec::new();

        for event in fresh {
            if self.recent_ids.contains(&event.id) || processed.contains(&event.id.as_str()) {
                tracing::trace!("Sabotage event {} already processed, skipping", event.id);
                continue;
            }
            processed.push(&event.id);

            let attacker_zone = roster.zone_of(&event.attacker_id);
            let target_zone = roster.zone_of(&event.target_id);
            if let (Some(from_zone), Some(to_zone)) = (attacker_zone, target_zone) {
                let id = format!("{}:line", event.id);
                if from_zone != to_zone && !self.warfare_lines.iter().any(|l| l.id == id) {
                    self.warfare_lines.push_back(WarfareLine {
                        id: id.clone(),
                        from_zone,
                        to_zone,
                        created_at: now,
                        kind: event.kind,
                    });
                    new_line_ids.push(id);
                    batch.warfare_lines += 1;
                }
            }

            let id = format!("{}:burst", event.id);
            if !self.activity_bursts.iter().any(|b| b.id == id) {
                self.activity_bursts.push_back(ActivityBurst {
                    id: id.clone(),
                    zone: event.zone,
                    created_at: now,
                    color: burst_color(event.kind),
                });
                new_burst_ids.push(id);
                batch.activity_bursts += 1;
            }
        }

        for id in processed.into_iter().rev() {
            self.recent_ids.insert(id);
        }

        batch.evicted += truncate_front(&mut self.warfare_lines, self.config.max_warfare_lines);
        batch.evicted += truncate_front(&mut self.activity_bursts, self.config.max_activity_bursts);

        let line_deadline = now + self.config.warfare_line_ttl();
        for id in new_line_ids {
            if self.warfare_lines.iter().any(|l| l.id == id) {
                self.timers.schedule(line_deadline, Expiry::WarfareLine(id));
            }
        }
        let burst_deadline = now + self.config.activity_burst_ttl();
        for id in new_burst_ids {
            if self.activity_bursts.iter().any(|b| b.id == id) {
                self.timers.schedule(burst_deadline, Expiry::ActivityBurst(id));
            }
        }

        if !batch.is_empty() {
            tracing::debug!(
                "Sabotage pass: {} lines, {} bursts, {} evicted",
                batch.warfare_lines,
                batch.activity_bursts,
                batch.evicted
            );
        }
        batch
    }

    /// Starts a shockwave for the newest cosmic event, if it is new.
    ///
    /// A new shockwave replaces any live one. Returns true if one was started.
    pub fn on_cosmic_feed(&mut self, feed: &[CosmicEvent], now: Duration) -> bool {
        self.advance(now);

        if self.phase != Phase::Live {
            return false;
        }
        let Some(head) = feed.first() else {
            return false;
        };
        if head.event_id <= self.last_seen_cosmic {
            if head.event_id < self.last_seen_cosmic {
                tracing::trace!(
                    "Cosmic feed head {} is behind watermark {}",
                    head.event_id,
                    self.last_seen_cosmic
                );
            }
            return false;
        }

        self.last_seen_cosmic = head.event_id;
        self.shockwave = Some(CosmicShockwave {
            zone: head.origin_zone,
            tier: head.tier,
            event_id: head.event_id,
            created_at: now,
        });
        self.timers.schedule(
            now + self.config.shockwave_ttl(),
            Expiry::Shockwave(head.event_id),
        );

        tracing::debug!(
            "Shockwave {} started in zone {} (tier {})",
            head.event_id,
            head.origin_zone,
            head.tier.level()
        );
        true
    }

    /// Cancels every pending timer and drops all effects. Later calls are no-ops.
    pub fn dispose(&mut self) {
        if self.phase == Phase::Disposed {
            return;
        }
        let pending = self.timers.len();
        self.timers.clear();
        self.warfare_lines.clear();
        self.activity_bursts.clear();
        self.shockwave = None;
        self.recent_ids.clear();
        self.phase = Phase::Disposed;
        tracing::info!("Effect manager disposed, {} pending timers cancelled", pending);
    }

    pub fn warfare_lines(&self) -> &VecDeque<WarfareLine> {
        &self.warfare_lines
    }

    pub fn activity_bursts(&self) -> &VecDeque<ActivityBurst> {
        &self.activity_bursts
    }

    pub fn shockwave(&self) -> Option<&CosmicShockwave> {
        self.shockwave.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_live(&self) -> bool {
        self.phase == Phase::Live
    }

    /// Number of timers still waiting to fire.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn config(&self) -> &EffectsConfig {
        &self.config
    }
}

/// Drops entries from the front until at most `capacity` remain.
///
/// Entries are pushed in processing order, and a batch is processed head
/// first. Within one oversized batch the feed's newest events are therefore
/// the first evicted and its oldest survive; across batches the earlier
/// batch goes first.
fn truncate_front<T>(items: &mut VecDeque<T>, capacity: usize) -> usize {
    let excess = items.len().saturating_sub(capacity);
    items.drain(..excess);
    excess
}

#[cfg(test)]
mod tests {
    use super::*;
    use zone_events::AgentSnapshot;

    const GRACE: Duration = Duration::from_secs(3);

    fn at(secs: f32) -> Duration {
        Duration::from_secs_f32(secs)
    }

    fn roster() -> Roster {
        Roster::new(vec![
            AgentSnapshot::new("north", 0, 10.0),
            AgentSnapshot::new("south", 1, 10.0),
            AgentSnapshot::new("south_2", 1, 10.0),
        ])
    }

    fn attack(id: &str, attacker: &str, target: &str, kind: SabotageKind) -> SabotageEvent {
        SabotageEvent::new(id, attacker, target, 1, kind, 0)
    }

    /// Manager mounted on `history` and already past its grace delay.
    fn live_manager(history: &[SabotageEvent]) -> EffectLifecycleManager {
        let mut manager = EffectLifecycleManager::with_defaults();
        manager.mount(history, &[], Duration::ZERO);
        manager.advance(GRACE);
        assert!(manager.is_live());
        manager
    }

    #[test]
    fn test_history_produces_nothing() {
        let history = vec![attack("old", "north", "south", SabotageKind::HashrateDrain)];
        let cosmic = vec![CosmicEvent::new(7, 2, SeverityTier::Major)];
        let mut manager = EffectLifecycleManager::with_defaults();
        manager.mount(&history, &cosmic, Duration::ZERO);

        let batch = manager.on_sabotage_feed(&history, &roster(), at(5.0));
        assert!(batch.is_empty());
        assert!(!manager.on_cosmic_feed(&cosmic, at(5.0)));
        assert!(manager.warfare_lines().is_empty());
        assert!(manager.activity_bursts().is_empty());
        assert!(manager.shockwave().is_none());
    }

    #[test]
    fn test_changes_during_grace_are_ignored() {
        let mut manager = EffectLifecycleManager::with_defaults();
        manager.mount(&[], &[], Duration::ZERO);
        let feed = vec![attack("e1", "north", "south", SabotageKind::HashrateDrain)];

        assert!(manager.on_sabotage_feed(&feed, &roster(), at(1.0)).is_empty());
        assert!(!manager.on_cosmic_feed(&[CosmicEvent::new(1, 0, SeverityTier::Minor)], at(2.9)));
        assert_eq!(manager.phase(), Phase::Initializing);
    }

    #[test]
    fn test_unmounted_manager_ignores_feeds() {
        let mut manager = EffectLifecycleManager::with_defaults();
        let feed = vec![attack("e1", "north", "south", SabotageKind::HashrateDrain)];
        assert!(manager.on_sabotage_feed(&feed, &roster(), at(10.0)).is_empty());
        assert_eq!(manager.phase(), Phase::Unmounted);
    }

    #[test]
    fn test_cross_zone_event_creates_line_and_burst() {
        let mut manager = live_manager(&[]);
        let feed = vec![attack("e1", "north", "south", SabotageKind::ShieldBreach)];
        let batch = manager.on_sabotage_feed(&feed, &roster(), at(4.0));

        assert_eq!(batch.warfare_lines, 1);
        assert_eq!(batch.activity_bursts, 1);
        let line = &manager.warfare_lines()[0];
        assert_eq!((line.from_zone, line.to_zone), (0, 1));
        assert_eq!(line.id, "e1:line");
        assert_eq!(manager.activity_bursts()[0].color, EffectColor::BREACH);
    }

    #[test]
    fn test_same_zone_event_has_no_line() {
        let mut manager = live_manager(&[]);
        let feed = vec![attack("e1", "south", "south_2", SabotageKind::HashrateDrain)];
        let batch = manager.on_sabotage_feed(&feed, &roster(), at(4.0));
        assert_eq!(batch.warfare_lines, 0);
        assert_eq!(batch.activity_bursts, 1);
    }

    #[test]
    fn test_unresolved_agent_still_bursts() {
        let mut manager = live_manager(&[]);
        let feed = vec![
            attack("e2", "north", "departed", SabotageKind::ZoneDisruption),
            attack("e1", "ghost", "south", SabotageKind::ZoneDisruption),
        ];
        let batch = manager.on_sabotage_feed(&feed, &roster(), at(4.0));
        assert_eq!(batch.warfare_lines, 0);
        assert_eq!(batch.activity_bursts, 2);
    }

    #[test]
    fn test_only_new_suffix_is_processed() {
        let old = attack("e1", "north", "south", SabotageKind::HashrateDrain);
        let mut manager = live_manager(std::slice::from_ref(&old));
        let feed = vec![
            attack("e3", "north", "south", SabotageKind::HashrateDrain),
            attack("e2", "north", "south", SabotageKind::HashrateDrain),
            old,
        ];
        let batch = manager.on_sabotage_feed(&feed, &roster(), at(4.0));
        assert_eq!(batch.activity_bursts, 2);
        let ids: Vec<&str> = manager.activity_bursts().iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["e3:burst", "e2:burst"]);

        // Same head again: nothing new.
        assert!(manager.on_sabotage_feed(&feed, &roster(), at(4.5)).is_empty());
    }

    #[test]
    fn test_capacity_is_bounded() {
        let mut manager = live_manager(&[]);
        let feed: Vec<SabotageEvent> = (0..20)
            .rev()
            .map(|n| attack(&format!("e{:02}", n), "north", "south", SabotageKind::HashrateDrain))
            .collect();

        // Present the feed one event at a time, as a fast poller would.
        for len in 1..=feed.len() {
            let window = &feed[feed.len() - len..];
            manager.on_sabotage_feed(window, &roster(), at(4.0 + len as f32 * 0.01));
            assert!(manager.warfare_lines().len() <= 10);
            assert!(manager.activity_bursts().len() <= 12);
        }
        assert_eq!(manager.warfare_lines().len(), 10);
        assert_eq!(manager.activity_bursts().len(), 12);
        // Oldest evicted first: the newest event survives.
        assert_eq!(manager.warfare_lines().back().map(|l| l.id.as_str()), Some("e19:line"));
    }

    #[test]
    fn test_expiry_targets_exact_ids() {
        let mut manager = live_manager(&[]);
        let first = vec![attack("e1", "north", "south", SabotageKind::HashrateDrain)];
        manager.on_sabotage_feed(&first, &roster(), at(4.0));

        let mut second = first.clone();
        second.insert(0, attack("e2", "north", "south", SabotageKind::HashrateDrain));
        manager.on_sabotage_feed(&second, &roster(), at(6.0));
        assert_eq!(manager.activity_bursts().len(), 2);

        // e1's burst expires at 7s; e2's must survive until 9s.
        manager.advance(at(7.0));
        let ids: Vec<&str> = manager.activity_bursts().iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["e2:burst"]);
        assert_eq!(manager.warfare_lines().len(), 2);

        manager.advance(at(9.0));
        assert!(manager.activity_bursts().is_empty());

        // Lines live for 10s.
        manager.advance(at(13.9));
        assert_eq!(manager.warfare_lines().len(), 2);
        manager.advance(at(14.0));
        assert_eq!(manager.warfare_lines().len(), 1);
        manager.advance(at(16.0));
        assert!(manager.warfare_lines().is_empty());
        assert_eq!(manager.pending_timers(), 0);
    }

    #[test]
    fn test_regressed_head_is_not_reprocessed() {
        let mut manager = live_manager(&[]);
        let e1 = attack("e1", "north", "south", SabotageKind::HashrateDrain);
        let e2 = attack("e2", "north", "south", SabotageKind::HashrateDrain);
        manager.on_sabotage_feed(&[e2.clone(), e1.clone()], &roster(), at(4.0));
        assert_eq!(manager.activity_bursts().len(), 2);

        // Feed shrinks back to e1 at the head.
        let batch = manager.on_sabotage_feed(&[e1], &roster(), at(4.5));
        assert!(batch.is_empty());
        assert_eq!(manager.activity_bursts().len(), 2);
    }

    #[test]
    fn test_long_history_survives_head_regression() {
        let history: Vec<SabotageEvent> = (0..300)
            .rev()
            .map(|n| attack(&format!("h{}", n), "north", "south", SabotageKind::HashrateDrain))
            .collect();
        let mut manager = live_manager(&history);

        // Newest history entry vanishes, so the watermark is gone from the window.
        let batch = manager.on_sabotage_feed(&history[1..], &roster(), at(4.0));
        assert!(batch.is_empty());
        assert!(manager.activity_bursts().is_empty());
        assert!(manager.warfare_lines().is_empty());
    }

    #[test]
    fn test_processed_ids_outlive_older_ones_in_memory() {
        let mut manager = live_manager(&[]);
        let feed: Vec<SabotageEvent> = (0..300)
            .rev()
            .map(|n| attack(&format!("p{}", n), "south", "south_2", SabotageKind::Unknown))
            .collect();
        for (step, start) in (0..300).step_by(10).rev().enumerate() {
            manager.on_sabotage_feed(&feed[start..], &roster(), at(4.0 + step as f32 * 0.01));
        }
        let before = manager.activity_bursts().len();

        let batch = manager.on_sabotage_feed(&feed[1..], &roster(), at(5.0));
        assert!(batch.is_empty());
        assert_eq!(manager.activity_bursts().len(), before);
    }

    #[test]
    fn test_stale_watermark_batch_is_capped() {
        let history = vec![attack("gone", "north", "south", SabotageKind::HashrateDrain)];
        let mut manager = live_manager(&history);
        let feed: Vec<SabotageEvent> = (0..40)
            .rev()
            .map(|n| attack(&format!("n{}", n), "south", "south_2", SabotageKind::Unknown))
            .collect();
        let batch = manager.on_sabotage_feed(&feed, &roster(), at(4.0));
        assert_eq!(batch.activity_bursts, 12);
        assert_eq!(manager.activity_bursts()[0].id, "n39:burst");
        assert_eq!(manager.activity_bursts()[0].color, EffectColor::DEFAULT);
    }

    #[test]
    fn test_shockwave_replacement() {
        let mut manager = live_manager(&[]);
        let mut feed = vec![CosmicEvent::new(1, 3, SeverityTier::Minor)];
        assert!(manager.on_cosmic_feed(&feed, at(4.0)));

        feed.insert(0, CosmicEvent::new(2, 6, SeverityTier::Cataclysmic));
        assert!(manager.on_cosmic_feed(&feed, at(6.0)));
        assert_eq!(manager.shockwave().map(|s| s.event_id), Some(2));

        // The first shockwave's timer must not clear the second one.
        manager.advance(at(8.0));
        let live = manager.shockwave().copied().unwrap();
        assert_eq!((live.zone, live.tier), (6, SeverityTier::Cataclysmic));

        manager.advance(at(10.0));
        assert!(manager.shockwave().is_none());
    }

    #[test]
    fn test_cosmic_regression_is_ignored() {
        let history = vec![CosmicEvent::new(10, 0, SeverityTier::Minor)];
        let mut manager = EffectLifecycleManager::with_defaults();
        manager.mount(&[], &history, Duration::ZERO);
        manager.advance(GRACE);

        assert!(!manager.on_cosmic_feed(&[CosmicEvent::new(9, 1, SeverityTier::Major)], at(4.0)));
        assert!(!manager.on_cosmic_feed(&history, at(4.0)));
        assert!(manager.on_cosmic_feed(&[CosmicEvent::new(11, 1, SeverityTier::Major)], at(4.0)));
    }

    #[test]
    fn test_dispose_cancels_timers() {
        let mut manager = live_manager(&[]);
        let feed = vec![attack("e1", "north", "south", SabotageKind::HashrateDrain)];
        manager.on_sabotage_feed(&feed, &roster(), at(4.0));
        manager.on_cosmic_feed(&[CosmicEvent::new(1, 0, SeverityTier::Minor)], at(4.0));
        assert_eq!(manager.pending_timers(), 3);

        manager.dispose();
        assert_eq!(manager.pending_timers(), 0);
        assert_eq!(manager.phase(), Phase::Disposed);

        let later = vec![attack("e2", "north", "south", SabotageKind::HashrateDrain)];
        assert!(manager.on_sabotage_feed(&later, &roster(), at(5.0)).is_empty());
        assert!(manager.activity_bursts().is_empty());
    }

    #[test]
    fn test_mount_is_idempotent() {
        let mut manager = EffectLifecycleManager::with_defaults();
        manager.mount(&[], &[], Duration::ZERO);
        manager.mount(&[], &[], at(2.0));
        assert_eq!(manager.pending_timers(), 1);
        manager.advance(GRACE);
        assert!(manager.is_live());
    }

    #[test]
    fn test_burst_colors_are_distinct() {
        let colors: Vec<EffectColor> = SabotageKind::all().iter().map(|k| burst_color(*k)).collect();
        for (i, a) in colors.iter().enumerate() {
            for b in colors.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_effect_progress() {
        let ttl = Duration::from_secs(4);
        assert_eq!(effect_progress(at(1.0), ttl, at(1.0)), 0.0);
        assert_eq!(effect_progress(at(1.0), ttl, at(3.0)), 0.5);
        assert_eq!(effect_progress(at(1.0), ttl, at(9.0)), 1.0);
        assert_eq!(effect_progress(at(2.0), ttl, at(1.0)), 0.0);
    }
}
