use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use crate::layers::{self, MapLayer};

pub const SPOILER_FREE_KEY: &str = "spoiler-free-mode";
pub const VISIBLE_LAYERS_KEY: &str = "visible-layers";
pub const SHOW_LOG_COUNTS_KEY: &str = "show-log-counts";

/// User-adjustable display settings. Owned by the store for the whole
/// session; mutated only through its operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    pub visible_layers: BTreeSet<MapLayer>,
    pub spoiler_free_mode: bool,
    pub show_log_counts: bool,
    /// Bumped by every `reset`, including a reset to already-current values.
    /// Consumers that need an edge-triggered reset signal watch this instead
    /// of diffing the other fields.
    pub reset_marker: u64,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            visible_layers: MapLayer::ALL.into_iter().collect(),
            spoiler_free_mode: true,
            show_log_counts: true,
            reset_marker: 0,
        }
    }
}

/// Durable string key/value storage behind the store. Values are small
/// string-encoded settings, written on every change.
pub trait PrefBackend {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&mut self, key: &str, value: &str);
}

impl PrefBackend for Box<dyn PrefBackend> {
    fn read(&self, key: &str) -> Option<String> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) {
        (**self).write(key, value);
    }
}

#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: BTreeMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PrefBackend for MemoryBackend {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

/// Preference storage as a JSON string map on disk. An unreadable or corrupt
/// file is treated as empty; a failed write is logged and dropped rather than
/// surfaced, so a read-only disk never breaks the session.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileBackend {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
                tracing::debug!(path = %path.display(), %err, "ignoring corrupt preference file");
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        Self { path, entries }
    }

    fn persist(&self) {
        let contents = match serde_json::to_string_pretty(&self.entries) {
            Ok(contents) => contents,
            Err(err) => {
                tracing::warn!(%err, "failed to encode preferences");
                return;
            }
        };
        if let Err(err) = std::fs::write(&self.path, contents) {
            tracing::warn!(path = %self.path.display(), %err, "failed to persist preferences");
        }
    }
}

impl PrefBackend for FileBackend {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
        self.persist();
    }
}

/// Session-long owner of the preferences. Loads persisted values over the
/// compile-time defaults at startup and writes through on every change.
#[derive(Debug)]
pub struct PreferenceStore<B: PrefBackend> {
    backend: B,
    prefs: Preferences,
}

impl<B: PrefBackend> PreferenceStore<B> {
    pub fn load(backend: B) -> Self {
        let mut prefs = Preferences::default();
        if let Some(raw) = backend.read(VISIBLE_LAYERS_KEY) {
            prefs.visible_layers = decode_layers(&raw);
        }
        if let Some(raw) = backend.read(SPOILER_FREE_KEY) {
            match decode_bool(&raw) {
                Some(value) => prefs.spoiler_free_mode = value,
                None => {
                    tracing::debug!(key = SPOILER_FREE_KEY, %raw, "falling back to default");
                }
            }
        }
        if let Some(raw) = backend.read(SHOW_LOG_COUNTS_KEY) {
            match decode_bool(&raw) {
                Some(value) => prefs.show_log_counts = value,
                None => {
                    tracing::debug!(key = SHOW_LOG_COUNTS_KEY, %raw, "falling back to default");
                }
            }
        }
        Self { backend, prefs }
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    pub fn toggle_layer(&mut self, layer: MapLayer) {
        self.prefs.visible_layers = layers::toggle_layer(&self.prefs.visible_layers, layer);
        let encoded = encode_layers(&self.prefs.visible_layers);
        self.backend.write(VISIBLE_LAYERS_KEY, &encoded);
    }

    pub fn toggle_spoiler_free_mode(&mut self) {
        self.prefs.spoiler_free_mode = !self.prefs.spoiler_free_mode;
        self.backend
            .write(SPOILER_FREE_KEY, encode_bool(self.prefs.spoiler_free_mode));
    }

    pub fn toggle_show_log_counts(&mut self) {
        self.prefs.show_log_counts = !self.prefs.show_log_counts;
        self.backend.write(
            SHOW_LOG_COUNTS_KEY,
            encode_bool(self.prefs.show_log_counts),
        );
    }

    /// Restores the compile-time defaults and bumps the reset marker, even
    /// when the current values already equal the defaults.
    pub fn reset(&mut self) {
        let marker = self.prefs.reset_marker + 1;
        self.prefs = Preferences {
            reset_marker: marker,
            ..Preferences::default()
        };
        let encoded = encode_layers(&self.prefs.visible_layers);
        self.backend.write(VISIBLE_LAYERS_KEY, &encoded);
        self.backend
            .write(SPOILER_FREE_KEY, encode_bool(self.prefs.spoiler_free_mode));
        self.backend.write(
            SHOW_LOG_COUNTS_KEY,
            encode_bool(self.prefs.show_log_counts),
        );
    }
}

fn encode_bool(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

fn decode_bool(raw: &str) -> Option<bool> {
    match raw {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Comma-joined integer codes, ascending enum order.
pub fn encode_layers(visible: &BTreeSet<MapLayer>) -> String {
    let codes: Vec<String> = visible.iter().map(|layer| layer.code().to_string()).collect();
    codes.join(",")
}

/// Parses each comma-separated token as a layer code. Tokens that do not
/// parse, or parse to an unknown code, are dropped; persisted garbage
/// degrades to omission, never to a failure.
pub fn decode_layers(raw: &str) -> BTreeSet<MapLayer> {
    raw.split(',')
        .filter(|token| !token.trim().is_empty())
        .filter_map(|token| match token.trim().parse::<u8>() {
            Ok(code) => MapLayer::from_code(code),
            Err(_) => {
                tracing::debug!(%token, "dropping unparsable layer code");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_show_every_layer() {
        let prefs = Preferences::default();
        assert_eq!(prefs.visible_layers.len(), MapLayer::ALL.len());
        assert!(prefs.spoiler_free_mode);
        assert!(prefs.show_log_counts);
    }

    #[test]
    fn unknown_layer_codes_are_silently_dropped() {
        let decoded = decode_layers("0,2,99");
        let expected: BTreeSet<MapLayer> = [MapLayer::Landmark, MapLayer::Signal]
            .into_iter()
            .collect();
        assert_eq!(decoded, expected);
    }

    #[test]
    fn an_empty_encoding_means_no_visible_layers() {
        assert!(decode_layers("").is_empty());
        let mut backend = MemoryBackend::new();
        backend.write(VISIBLE_LAYERS_KEY, "");
        let store = PreferenceStore::load(backend);
        assert!(store.preferences().visible_layers.is_empty());
    }

    #[test]
    fn layer_encoding_round_trips() {
        let visible: BTreeSet<MapLayer> = [MapLayer::Relic, MapLayer::Other].into_iter().collect();
        assert_eq!(encode_layers(&visible), "1,4");
        assert_eq!(decode_layers(&encode_layers(&visible)), visible);
    }

    #[test]
    fn toggles_write_through_to_the_backend() {
        let mut store = PreferenceStore::load(MemoryBackend::new());
        store.toggle_spoiler_free_mode();
        assert!(!store.preferences().spoiler_free_mode);
        assert_eq!(
            store.backend.read(SPOILER_FREE_KEY).as_deref(),
            Some("false")
        );

        store.toggle_layer(MapLayer::Passage);
        assert!(!store.preferences().visible_layers.contains(&MapLayer::Passage));
        assert_eq!(
            store.backend.read(VISIBLE_LAYERS_KEY).as_deref(),
            Some("0,1,2,4")
        );
    }

    #[test]
    fn malformed_persisted_booleans_fall_back_to_defaults() {
        let mut backend = MemoryBackend::new();
        backend.write(SPOILER_FREE_KEY, "yes please");
        backend.write(SHOW_LOG_COUNTS_KEY, "FALSE");
        let store = PreferenceStore::load(backend);
        assert!(store.preferences().spoiler_free_mode);
        assert!(store.preferences().show_log_counts);
    }

    #[test]
    fn reset_at_defaults_still_produces_a_fresh_marker() {
        let mut store = PreferenceStore::load(MemoryBackend::new());
        assert_eq!(store.preferences().reset_marker, 0);
        store.reset();
        assert_eq!(store.preferences().reset_marker, 1);
        assert_eq!(store.preferences(), &Preferences {
            reset_marker: 1,
            ..Preferences::default()
        });
        store.reset();
        assert_eq!(store.preferences().reset_marker, 2);
    }

    #[test]
    fn reset_restores_defaults_and_persists_them() {
        let mut store = PreferenceStore::load(MemoryBackend::new());
        store.toggle_layer(MapLayer::Landmark);
        store.toggle_show_log_counts();
        store.reset();
        assert_eq!(
            store.preferences().visible_layers.len(),
            MapLayer::ALL.len()
        );
        assert!(store.preferences().show_log_counts);
        assert_eq!(
            store.backend.read(VISIBLE_LAYERS_KEY).as_deref(),
            Some("0,1,2,3,4")
        );
        assert_eq!(
            store.backend.read(SHOW_LOG_COUNTS_KEY).as_deref(),
            Some("true")
        );
    }

    #[test]
    fn file_backend_round_trips_and_shrugs_off_corrupt_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        {
            let mut store = PreferenceStore::load(FileBackend::open(&path));
            store.toggle_layer(MapLayer::Signal);
            store.toggle_spoiler_free_mode();
        }

        let reloaded = PreferenceStore::load(FileBackend::open(&path));
        assert!(!reloaded.preferences().visible_layers.contains(&MapLayer::Signal));
        assert!(!reloaded.preferences().spoiler_free_mode);

        std::fs::write(&path, "not json at all").unwrap();
        let fallback = PreferenceStore::load(FileBackend::open(&path));
        assert_eq!(fallback.preferences(), &Preferences::default());
    }
}
