//! Settings store.
//!
//! Settings are loaded once at startup and merged field by field over the
//! defaults, so a missing, partial or malformed record never prevents the
//! timer from starting. Every mutation is persisted immediately; a failed
//! write is logged and the in-memory settings stay in effect.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::storage::KeyValueStore;
use crate::types::{AppSettings, SettingsPatch};

/// Storage key of the settings record.
pub const SETTINGS_KEY: &str = "pomodoro-settings";

/// Owns the user settings and their persisted record.
pub struct SettingsStore {
    storage: Arc<dyn KeyValueStore>,
    settings: AppSettings,
}

impl SettingsStore {
    /// Loads the settings from `storage`, falling back to defaults for
    /// anything missing or malformed.
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let settings = match storage.get(SETTINGS_KEY) {
            Ok(Some(raw)) => merge_over_defaults(&raw),
            Ok(None) => {
                debug!("No stored settings, using defaults");
                AppSettings::default()
            }
            Err(e) => {
                warn!("Failed to load settings: {}", e);
                AppSettings::default()
            }
        };
        Self { storage, settings }
    }

    /// Returns the current settings.
    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    /// Shallow-merges `patch` into the settings and persists the result.
    pub fn update(&mut self, patch: SettingsPatch) -> &AppSettings {
        self.settings.apply(patch);
        self.persist();
        &self.settings
    }

    /// Restores the default settings and persists them.
    pub fn reset_to_defaults(&mut self) -> &AppSettings {
        self.settings = AppSettings::default();
        self.persist();
        &self.settings
    }

    /// Writes the current settings. Returns false if the write failed.
    fn persist(&self) -> bool {
        let json = match serde_json::to_string(&self.settings) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize settings: {}", e);
                return false;
            }
        };
        match self.storage.set(SETTINGS_KEY, &json) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to save settings: {} ({})", e, e.suggestion());
                false
            }
        }
    }
}

impl std::fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsStore")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// Parses a stored settings record over the defaults.
///
/// Each top-level field is taken from `raw` only if it is present and well
/// formed; anything else keeps its default.
pub fn merge_over_defaults(raw: &str) -> AppSettings {
    let mut settings = AppSettings::default();

    let object = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(object)) => object,
        Ok(_) => {
            warn!("Stored settings are not an object, using defaults");
            return settings;
        }
        Err(e) => {
            warn!("Stored settings are not valid JSON, using defaults: {}", e);
            return settings;
        }
    };

    merge_field(&object, "durations", &mut settings.durations);
    merge_field(&object, "autoStart", &mut settings.auto_start);
    merge_field(&object, "soundEnabled", &mut settings.sound_enabled);
    merge_field(&object, "notificationsEnabled", &mut settings.notifications_enabled);

    settings
}

fn merge_field<T: DeserializeOwned>(object: &Map<String, Value>, key: &str, slot: &mut T) {
    let Some(value) = object.get(key) else {
        return;
    };
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => *slot = parsed,
        Err(e) => warn!("Ignoring malformed setting '{}': {}", key, e),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::types::TimerDurations;

    fn stored(store: &MemoryStore) -> Value {
        serde_json::from_str(&store.raw(SETTINGS_KEY).unwrap()).unwrap()
    }

    // ------------------------------------------------------------------------
    // Load Tests
    // ------------------------------------------------------------------------

    mod load_tests {
        use super::*;

        #[test]
        fn test_missing_record_uses_defaults() {
            let store = SettingsStore::load(Arc::new(MemoryStore::new()));
            assert_eq!(store.settings(), &AppSettings::default());
        }

        #[test]
        fn test_full_record() {
            let raw = r#"{"durations":{"work":3000,"shortBreak":600,"longBreak":0},
                "autoStart":true,"soundEnabled":false,"notificationsEnabled":false}"#;
            let store = SettingsStore::load(Arc::new(MemoryStore::with_value(SETTINGS_KEY, raw)));

            let settings = store.settings();
            assert_eq!(
                settings.durations,
                TimerDurations {
                    work: 3000,
                    short_break: 600,
                    long_break: 0
                }
            );
            assert!(settings.auto_start);
            assert!(!settings.sound_enabled);
            assert!(!settings.notifications_enabled);
        }

        #[test]
        fn test_partial_record_merges_over_defaults() {
            let settings = merge_over_defaults(r#"{"autoStart":true}"#);

            assert!(settings.auto_start);
            assert_eq!(settings.durations, TimerDurations::default());
            assert!(settings.sound_enabled);
        }

        #[test]
        fn test_malformed_field_is_treated_as_absent() {
            let settings =
                merge_over_defaults(r#"{"soundEnabled":"yes","durations":{"work":-5},"autoStart":true}"#);

            assert!(settings.sound_enabled);
            assert_eq!(settings.durations, TimerDurations::default());
            assert!(settings.auto_start);
        }

        #[test]
        fn test_incomplete_durations_fall_back() {
            let settings = merge_over_defaults(r#"{"durations":{"work":600}}"#);
            assert_eq!(settings.durations, TimerDurations::default());
        }

        #[test]
        fn test_garbage_uses_defaults() {
            assert_eq!(merge_over_defaults("not json"), AppSettings::default());
            assert_eq!(merge_over_defaults("[1,2,3]"), AppSettings::default());
            assert_eq!(merge_over_defaults("null"), AppSettings::default());
        }

        #[test]
        fn test_read_failure_uses_defaults() {
            let storage = MemoryStore::with_value(SETTINGS_KEY, r#"{"autoStart":true}"#);
            storage.set_fail_reads(true);

            let store = SettingsStore::load(Arc::new(storage));
            assert_eq!(store.settings(), &AppSettings::default());
        }
    }

    // ------------------------------------------------------------------------
    // Mutation Tests
    // ------------------------------------------------------------------------

    mod mutation_tests {
        use super::*;

        #[test]
        fn test_update_persists_single_field() {
            let storage = Arc::new(MemoryStore::new());
            let mut store = SettingsStore::load(storage.clone());

            store.update(SettingsPatch::default().sound_enabled(false));

            let json = stored(&storage);
            assert_eq!(json["soundEnabled"], false);
            assert_eq!(json["durations"]["work"], 1500);
            assert_eq!(json["durations"]["shortBreak"], 300);
            assert_eq!(json["durations"]["longBreak"], 900);
            assert_eq!(json["autoStart"], false);
            assert_eq!(json["notificationsEnabled"], true);
        }

        #[test]
        fn test_reset_restores_exact_defaults() {
            let storage = Arc::new(MemoryStore::new());
            let mut store = SettingsStore::load(storage.clone());
            store.update(
                SettingsPatch::default()
                    .auto_start(true)
                    .durations(TimerDurations::default().with_work_minutes(50)),
            );

            store.reset_to_defaults();

            assert_eq!(store.settings(), &AppSettings::default());
            assert_eq!(stored(&storage), serde_json::to_value(AppSettings::default()).unwrap());
        }

        #[test]
        fn test_write_failure_keeps_in_memory_settings() {
            let storage = Arc::new(MemoryStore::new());
            storage.set_fail_writes(true);
            let mut store = SettingsStore::load(storage.clone());

            let settings = store.update(SettingsPatch::default().auto_start(true));

            assert!(settings.auto_start);
            assert!(store.settings().auto_start);
            assert_eq!(storage.raw(SETTINGS_KEY), None);
        }

        #[test]
        fn test_updates_survive_reload() {
            let storage = Arc::new(MemoryStore::new());
            let mut store = SettingsStore::load(storage.clone());
            store.update(SettingsPatch::default().notifications_enabled(false));

            let reloaded = SettingsStore::load(storage);
            assert!(!reloaded.settings().notifications_enabled);
        }
    }
}
