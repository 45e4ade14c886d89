//! Persisted settings: key schema, defaults and the store collaborator.
//!
//! The core never opens a settings file itself. A `SettingsStore` is injected
//! into `RenderCore` at construction; values are read once there and written
//! back on every change.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::grid::{DrawMode, GridConfig, CELL_SIZE, MAX_AXIS_CELLS};

pub const KEY_DRAW_MODE: &str = "drawMode";
pub const KEY_SPACING: &str = "spacing";
pub const KEY_X_SIZE: &str = "xSize";
pub const KEY_Y_SIZE: &str = "ySize";
pub const KEY_Z_SIZE: &str = "zSize";

pub const DEFAULT_SPACING: f32 = 0.5;
pub const DEFAULT_AXIS_SIZE: u32 = 20;

/// Spacing limits, matching the 1..=40 tenths control range
pub const MIN_SPACING: f32 = 0.1;
pub const MAX_SPACING: f32 = 4.0;

/// A single stored value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Int(i64),
    Float(f64),
}

impl SettingValue {
    pub fn as_i64(&self) -> i64 {
        match *self {
            SettingValue::Int(v) => v,
            SettingValue::Float(v) => v as i64,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            SettingValue::Int(v) => v as f64,
            SettingValue::Float(v) => v,
        }
    }
}

/// Key/value store the core persists into
pub trait SettingsStore {
    fn value(&self, key: &str) -> Option<SettingValue>;
    fn set_value(&mut self, key: &str, value: SettingValue);
}

/// In-memory store for headless use and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, SettingValue>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, key: &str, value: SettingValue) -> Self {
        self.values.insert(key.to_string(), value);
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl SettingsStore for MemoryStore {
    fn value(&self, key: &str) -> Option<SettingValue> {
        self.values.get(key).copied()
    }

    fn set_value(&mut self, key: &str, value: SettingValue) {
        self.values.insert(key.to_string(), value);
    }
}

/// Grid settings restored at startup
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedSettings {
    pub draw_mode: DrawMode,
    pub spacing: f32,
    pub x_size: u32,
    pub y_size: u32,
    pub z_size: u32,
}

impl Default for PersistedSettings {
    fn default() -> Self {
        Self {
            draw_mode: DrawMode::Points,
            spacing: DEFAULT_SPACING,
            x_size: DEFAULT_AXIS_SIZE,
            y_size: DEFAULT_AXIS_SIZE,
            z_size: DEFAULT_AXIS_SIZE,
        }
    }
}

impl PersistedSettings {
    /// Read every key, falling back to defaults and clamping out-of-range values
    pub fn load(store: &dyn SettingsStore) -> Self {
        let defaults = Self::default();

        let draw_mode = match store.value(KEY_DRAW_MODE) {
            Some(v) => DrawMode::from_index(v.as_i64()).unwrap_or_else(|| {
                tracing::warn!("Ignoring stored {KEY_DRAW_MODE}={}", v.as_i64());
                defaults.draw_mode
            }),
            None => defaults.draw_mode,
        };

        let spacing = store
            .value(KEY_SPACING)
            .map(|v| v.as_f64() as f32)
            .filter(|s| s.is_finite())
            .map(|s| s.clamp(MIN_SPACING, MAX_SPACING))
            .unwrap_or(defaults.spacing);

        let size = |key: &str| {
            store
                .value(key)
                .map(|v| v.as_i64().clamp(0, MAX_AXIS_CELLS as i64) as u32)
                .unwrap_or(DEFAULT_AXIS_SIZE)
        };

        Self {
            draw_mode,
            spacing,
            x_size: size(KEY_X_SIZE),
            y_size: size(KEY_Y_SIZE),
            z_size: size(KEY_Z_SIZE),
        }
    }

    pub fn grid_config(&self) -> GridConfig {
        GridConfig {
            x_cubes: self.x_size,
            y_cubes: self.y_size,
            z_cubes: self.z_size,
            spacing: self.spacing,
            cell_size: CELL_SIZE,
            mode: self.draw_mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_store_empty() {
        let s = PersistedSettings::load(&MemoryStore::new());
        assert_eq!(s, PersistedSettings::default());
        assert_eq!(s.draw_mode, DrawMode::Points);
        assert_eq!(s.spacing, 0.5);
        assert_eq!((s.x_size, s.y_size, s.z_size), (20, 20, 20));
    }

    #[test]
    fn test_load_stored_values() {
        let store = MemoryStore::new()
            .with_value(KEY_DRAW_MODE, SettingValue::Int(0))
            .with_value(KEY_SPACING, SettingValue::Float(1.2))
            .with_value(KEY_X_SIZE, SettingValue::Int(4))
            .with_value(KEY_Y_SIZE, SettingValue::Int(5))
            .with_value(KEY_Z_SIZE, SettingValue::Int(6));
        let s = PersistedSettings::load(&store);
        assert_eq!(s.draw_mode, DrawMode::Cubes);
        assert!((s.spacing - 1.2).abs() < 1e-6);
        assert_eq!((s.x_size, s.y_size, s.z_size), (4, 5, 6));

        let grid = s.grid_config();
        assert_eq!(grid.mode, DrawMode::Cubes);
        assert_eq!(grid.cell_size, CELL_SIZE);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let store = MemoryStore::new()
            .with_value(KEY_DRAW_MODE, SettingValue::Int(9))
            .with_value(KEY_SPACING, SettingValue::Float(100.0))
            .with_value(KEY_X_SIZE, SettingValue::Int(-3))
            .with_value(KEY_Y_SIZE, SettingValue::Int(1000));
        let s = PersistedSettings::load(&store);
        assert_eq!(s.draw_mode, DrawMode::Points);
        assert_eq!(s.spacing, MAX_SPACING);
        assert_eq!(s.x_size, 0);
        assert_eq!(s.y_size, MAX_AXIS_CELLS);
        assert_eq!(s.z_size, DEFAULT_AXIS_SIZE);
    }

    #[test]
    fn test_setting_value_conversions() {
        assert_eq!(SettingValue::Float(2.9).as_i64(), 2);
        assert_eq!(SettingValue::Int(3).as_f64(), 3.0);
    }

    #[test]
    fn test_memory_store_overwrites() {
        let mut store = MemoryStore::new();
        store.set_value(KEY_X_SIZE, SettingValue::Int(1));
        store.set_value(KEY_X_SIZE, SettingValue::Int(2));
        assert_eq!(store.len(), 1);
        assert_eq!(store.value(KEY_X_SIZE), Some(SettingValue::Int(2)));
    }
}
