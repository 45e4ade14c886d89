//! JSON-backed settings store

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ledcube_core::{SettingValue, SettingsStore};

pub const SETTINGS_FILE: &str = "settings.json";

/// Flat key/value settings persisted as pretty JSON.
/// Every `set_value` writes the whole file back.
#[derive(Debug, Clone, Default)]
pub struct JsonSettingsStore {
    path: Option<PathBuf>,
    values: BTreeMap<String, SettingValue>,
}

impl JsonSettingsStore {
    /// Open the per-user store, falling back to an unsaved in-memory store
    /// when no config directory is available or the file is unreadable
    pub fn open_default() -> Self {
        let Some(dirs) = directories::ProjectDirs::from("org", "groupname", "LEDcube") else {
            tracing::warn!("No config directory available; settings will not persist");
            return Self::default();
        };
        let path = dirs.config_dir().join(SETTINGS_FILE);
        match Self::open_at(&path) {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!("Ignoring settings file: {e:#}");
                Self {
                    path: Some(path),
                    values: BTreeMap::new(),
                }
            }
        }
    }

    /// Open the store at `path`. A missing file is an empty store.
    pub fn open_at(path: &Path) -> Result<Self> {
        let values: BTreeMap<String, SettingValue> = if path.exists() {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&json)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        } else {
            BTreeMap::new()
        };
        tracing::debug!("Loaded {} settings from {}", values.len(), path.display());
        Ok(Self {
            path: Some(path.to_path_buf()),
            values,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Write all values to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
    }
}

impl SettingsStore for JsonSettingsStore {
    fn value(&self, key: &str) -> Option<SettingValue> {
        self.values.get(key).copied()
    }

    fn set_value(&mut self, key: &str, value: SettingValue) {
        self.values.insert(key.to_string(), value);
        if let Err(e) = self.save() {
            tracing::error!("Failed to save settings: {e:#}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSettingsStore::open_at(&dir.path().join(SETTINGS_FILE)).unwrap();
        assert!(store.is_empty());
        assert!(store.value("spacing").is_none());
    }

    #[test]
    fn test_set_value_writes_through() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(SETTINGS_FILE);

        let mut store = JsonSettingsStore::open_at(&path).unwrap();
        store.set_value("xSize", SettingValue::Int(12));
        store.set_value("spacing", SettingValue::Float(1.5));
        assert!(path.exists());

        let reopened = JsonSettingsStore::open_at(&path).unwrap();
        assert_eq!(reopened.len(), 2);
        assert_eq!(reopened.value("xSize"), Some(SettingValue::Int(12)));
        assert_eq!(reopened.value("spacing"), Some(SettingValue::Float(1.5)));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, "{ not json").unwrap();
        assert!(JsonSettingsStore::open_at(&path).is_err());
    }

    #[test]
    fn test_unbacked_store_keeps_values() {
        let mut store = JsonSettingsStore::default();
        store.set_value("drawMode", SettingValue::Int(0));
        assert_eq!(store.value("drawMode"), Some(SettingValue::Int(0)));
        assert!(store.path().is_none());
    }
}
