//! Settings persistence boundary.
//!
//! The controlling specification excludes non-volatile settings persistence
//! from this crate's scope (§1) beyond the key/value contract (§6.1). This
//! module only defines the trait boundary (`load`/`save`) plus a simple
//! file-backed implementation useful for host testing and the CLI; real
//! firmware backs `SettingsStore` with NVS outside this crate.

use crate::config::Settings;
use crate::error::{BeaconError, Result};
use std::path::{Path, PathBuf};

/// Persists and restores `Settings`. `load()` returning `Err` is treated by
/// callers as "no persisted settings yet" and falls back to
/// `Settings::default()`.
pub trait SettingsStore: Send + Sync {
    fn load(&self) -> Result<Settings>;
    fn save(&self, settings: &Settings) -> Result<()>;
}

/// JSON-file-backed settings store.
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> Result<Settings> {
        let data = std::fs::read_to_string(&self.path)
            .map_err(|e| BeaconError::SettingsStoreFailure(e.to_string()))?;
        serde_json::from_str(&data).map_err(|e| BeaconError::SettingsStoreFailure(e.to_string()))
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        let data = serde_json::to_string_pretty(settings)
            .map_err(|e| BeaconError::SettingsStoreFailure(e.to_string()))?;
        std::fs::write(&self.path, data)
            .map_err(|e| BeaconError::SettingsStoreFailure(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_a_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let store = FileSettingsStore::new(&path);

        let mut settings = Settings::default();
        settings.callsign = "K1ABC".to_string();
        store.save(&settings).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.callsign, "K1ABC");
    }

    #[test]
    fn missing_file_is_a_settings_store_failure() {
        let store = FileSettingsStore::new("/nonexistent/path/settings.json");
        assert!(store.load().is_err());
    }
}
