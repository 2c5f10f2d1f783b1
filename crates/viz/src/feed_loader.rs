//! Feed loading and file watching.
//!
//! Watches the feed directory for the sabotage feed, the cosmic feed and the
//! agent roster, and reloads whichever file changed. A file that fails to
//! parse keeps the previous snapshot in place.

use bevy::prelude::*;
use notify::{Event as NotifyEvent, RecommendedWatcher, RecursiveMode, Watcher};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use zone_events::{CosmicFeed, Roster, SabotageFeed};

use crate::plugin::{MapSet, MapStartup};

pub const SABOTAGE_FILE: &str = "sabotage_feed.json";
pub const COSMIC_FILE: &str = "cosmic_feed.json";
pub const ROSTER_FILE: &str = "agents.json";

/// Plugin for loading feeds from disk.
pub struct FeedLoaderPlugin;

impl Plugin for FeedLoaderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FeedSource>()
            .init_resource::<Feeds>()
            .add_systems(Startup, load_initial_feeds.in_set(MapStartup::LoadFeeds))
            .add_systems(
                Update,
                (check_file_updates, handle_reload_key)
                    .chain()
                    .in_set(MapSet::LoadFeeds),
            );
    }
}

/// Where feed snapshots come from.
#[derive(Resource, Clone, Debug, PartialEq)]
pub enum FeedSource {
    /// JSON files in a directory, reloaded on change.
    Directory(PathBuf),
    /// Synthesised in memory from a seed.
    Demo { seed: u64 },
}

impl Default for FeedSource {
    fn default() -> Self {
        Self::Directory(PathBuf::from("output"))
    }
}

impl FeedSource {
    fn directory(&self) -> Option<&Path> {
        match self {
            Self::Directory(dir) => Some(dir),
            Self::Demo { .. } => None,
        }
    }
}

/// Latest snapshot of every feed.
#[derive(Resource, Default, Debug)]
pub struct Feeds {
    pub sabotage: SabotageFeed,
    pub cosmic: CosmicFeed,
    pub roster: Roster,
    /// Any error from the last load attempt.
    pub last_error: Option<String>,
}

/// Errors that can occur while reading a feed file.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Which feeds a reload replaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedChanges {
    pub sabotage: bool,
    pub cosmic: bool,
    pub roster: bool,
}

impl FeedChanges {
    pub fn any(&self) -> bool {
        self.sabotage || self.cosmic || self.roster
    }
}

/// Reads and parses one JSON feed file.
pub fn read_feed<T: DeserializeOwned>(path: &Path) -> Result<T, FeedError> {
    let contents = std::fs::read_to_string(path).map_err(|source| FeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| FeedError::Json {
        path: path.to_path_buf(),
        source,
    })
}

impl Feeds {
    /// Reloads every feed file present in `dir`. Missing files are skipped.
    pub fn reload_dir(&mut self, dir: &Path) -> FeedChanges {
        FeedChanges {
            sabotage: self.reload_file(&dir.join(SABOTAGE_FILE)),
            cosmic: self.reload_file(&dir.join(COSMIC_FILE)),
            roster: self.reload_file(&dir.join(ROSTER_FILE)),
        }
    }

    /// Reloads the feed stored at `path`, chosen by file name. Returns true if
    /// the stored snapshot was replaced.
    pub fn reload_file(&mut self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        if !path.exists() {
            tracing::debug!("Feed file {:?} does not exist yet", path);
            return false;
        }

        let result = match name {
            SABOTAGE_FILE => read_feed::<SabotageFeed>(path).map(|feed| self.sabotage = feed),
            COSMIC_FILE => read_feed::<CosmicFeed>(path).map(|feed| self.cosmic = feed),
            ROSTER_FILE => read_feed::<Roster>(path).map(|roster| self.roster = roster),
            _ => return false,
        };

        match result {
            Ok(()) => {
                tracing::debug!("Loaded {:?}", path);
                self.last_error = None;
                true
            }
            Err(e) => {
                tracing::error!("{}", e);
                self.last_error = Some(e.to_string());
                false
            }
        }
    }
}

/// Returns true if a changed path is one of the feed files.
pub fn is_feed_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| matches!(name, SABOTAGE_FILE | COSMIC_FILE | ROSTER_FILE))
}

/// File watching state stored in Local (doesn't need Send+Sync).
#[derive(Default)]
struct FileWatcherState {
    /// The watcher instance.
    watcher: Option<RecommendedWatcher>,
    /// Receiver for file change events.
    rx: Option<Receiver<Result<NotifyEvent, notify::Error>>>,
    /// Whether we've initialized.
    initialized: bool,
}

impl FileWatcherState {
    fn ensure_initialized(&mut self, dir: &Path) {
        if self.initialized {
            return;
        }
        self.initialized = true;

        let (tx, rx) = channel();
        match RecommendedWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            notify::Config::default(),
        ) {
            Ok(mut watcher) => {
                if dir.exists() {
                    if let Err(e) = watcher.watch(dir, RecursiveMode::NonRecursive) {
                        tracing::warn!("Failed to watch directory {:?}: {}", dir, e);
                    } else {
                        tracing::info!("Watching feed directory: {:?}", dir);
                    }
                } else {
                    tracing::info!(
                        "Feed directory {:?} does not exist yet, press R to reload once it does",
                        dir
                    );
                }
                self.watcher = Some(watcher);
                self.rx = Some(rx);
            }
            Err(e) => {
                tracing::error!("Failed to create file watcher: {}", e);
            }
        }
    }
}

/// Loads whatever feed files exist before the effect manager mounts.
fn load_initial_feeds(source: Res<FeedSource>, mut feeds: ResMut<Feeds>) {
    let Some(dir) = source.directory() else {
        return;
    };
    let changes = feeds.reload_dir(dir);
    tracing::info!(
        "Initial feeds from {:?}: {} sabotage, {} cosmic, {} agents",
        dir,
        feeds.sabotage.events.len(),
        feeds.cosmic.events.len(),
        feeds.roster.len()
    );
    if !changes.any() {
        tracing::warn!("No feed files found in {:?}", dir);
    }
}

/// Reloads feed files reported by the watcher.
fn check_file_updates(
    mut watcher_state: Local<FileWatcherState>,
    source: Res<FeedSource>,
    mut feeds: ResMut<Feeds>,
) {
    let Some(dir) = source.directory() else {
        return;
    };
    watcher_state.ensure_initialized(dir);

    let Some(ref rx) = watcher_state.rx else {
        return;
    };

    let mut changed_paths: Vec<PathBuf> = Vec::new();
    while let Ok(result) = rx.try_recv() {
        match result {
            Ok(event) => {
                if matches!(
                    event.kind,
                    notify::EventKind::Modify(_) | notify::EventKind::Create(_)
                ) {
                    for path in event.paths.into_iter().filter(|p| is_feed_file(p)) {
                        if !changed_paths.contains(&path) {
                            changed_paths.push(path);
                        }
                    }
                }
            }
            Err(e) => {
                tracing::warn!("File watcher error: {}", e);
            }
        }
    }

    if changed_paths.is_empty() {
        return;
    }
    tracing::debug!("Detected feed changes: {:?}", changed_paths);

    // Only flag the resource as changed when a snapshot was actually replaced.
    let inner = feeds.bypass_change_detection();
    let mut replaced = false;
    for path in &changed_paths {
        replaced |= inner.reload_file(path);
    }
    if replaced {
        feeds.set_changed();
    }
}

/// Handle R key to force reload.
fn handle_reload_key(
    keyboard: Res<ButtonInput<KeyCode>>,
    source: Res<FeedSource>,
    mut feeds: ResMut<Feeds>,
) {
    if !keyboard.just_pressed(KeyCode::KeyR) {
        return;
    }
    let Some(dir) = source.directory() else {
        return;
    };
    tracing::info!("Manual reload triggered");
    if feeds.bypass_change_detection().reload_dir(dir).any() {
        feeds.set_changed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const SABOTAGE_JSON: &str = r#"[
        {"id": "s2", "attacker_id": "a", "target_id": "b", "zone": 1, "type": "shield_breach", "timestamp": 2},
        {"id": "s1", "attacker_id": "b", "target_id": "a", "zone": 0, "type": "hashrate_drain", "timestamp": 1}
    ]"#;

    #[test]
    fn test_reload_dir_reads_present_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(SABOTAGE_FILE), SABOTAGE_JSON).unwrap();
        fs::write(
            dir.path().join(COSMIC_FILE),
            r#"[{"event_id": 7, "origin_zone": 3, "tier": 3}]"#,
        )
        .unwrap();

        let mut feeds = Feeds::default();
        let changes = feeds.reload_dir(dir.path());
        assert!(changes.sabotage);
        assert!(changes.cosmic);
        assert!(!changes.roster);
        assert_eq!(feeds.sabotage.head().unwrap().id, "s2");
        assert_eq!(feeds.cosmic.head().unwrap().event_id, 7);
    }

    #[test]
    fn test_parse_failure_keeps_previous_snapshot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SABOTAGE_FILE);
        fs::write(&path, SABOTAGE_JSON).unwrap();

        let mut feeds = Feeds::default();
        assert!(feeds.reload_file(&path));

        fs::write(&path, "[{\"id\": ").unwrap();
        assert!(!feeds.reload_file(&path));
        assert_eq!(feeds.sabotage.events.len(), 2);
        assert!(feeds.last_error.is_some());
    }

    #[test]
    fn test_read_feed_errors() {
        let dir = tempdir().unwrap();
        let missing = read_feed::<Roster>(&dir.path().join(ROSTER_FILE));
        assert!(matches!(missing, Err(FeedError::Io { .. })));

        let bad = dir.path().join(ROSTER_FILE);
        fs::write(&bad, "{}").unwrap();
        assert!(matches!(read_feed::<Roster>(&bad), Err(FeedError::Json { .. })));
    }

    #[test]
    fn test_is_feed_file() {
        assert!(is_feed_file(Path::new("output/agents.json")));
        assert!(is_feed_file(Path::new("cosmic_feed.json")));
        assert!(!is_feed_file(Path::new("output/current_state.json")));
    }

    #[test]
    fn test_default_source_is_output_dir() {
        assert_eq!(FeedSource::default(), FeedSource::Directory(PathBuf::from("output")));
        assert!(FeedSource::Demo { seed: 1 }.directory().is_none());
    }
}
