use crate::api::models::BackendConfig;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
use gloo_storage::{LocalStorage, Storage};

#[cfg(target_arch = "wasm32")]
const SETTINGS_KEY: &str = "hygge.app_settings";
#[cfg(target_arch = "wasm32")]
const BACKEND_KEY: &str = "hygge.backend";

/// Key prefix for per-track playback offsets in browser storage.
const POSITION_KEY_PREFIX: &str = "audio_position_";

/// Repeat mode for playback
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum RepeatMode {
    #[default]
    Off,
    All,
    One,
}

/// App settings stored in browser storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    pub volume: f64,
    #[serde(default = "default_playback_speed")]
    pub playback_speed: f64,
    #[serde(default)]
    pub shuffle_enabled: bool,
    #[serde(default)]
    pub repeat_mode: RepeatMode,
}

fn default_playback_speed() -> f64 {
    1.0
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            volume: 0.8,
            playback_speed: 1.0,
            shuffle_enabled: false,
            repeat_mode: RepeatMode::Off,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub fn load_settings() -> AppSettings {
    LocalStorage::get(SETTINGS_KEY).unwrap_or_default()
}

#[cfg(target_arch = "wasm32")]
pub fn save_settings(settings: &AppSettings) -> Result<(), String> {
    LocalStorage::set(SETTINGS_KEY, settings).map_err(|e| e.to_string())
}

#[cfg(target_arch = "wasm32")]
pub fn load_backend() -> Option<BackendConfig> {
    LocalStorage::get(BACKEND_KEY).ok()
}

#[cfg(target_arch = "wasm32")]
pub fn save_backend(config: &BackendConfig) -> Result<(), String> {
    LocalStorage::set(BACKEND_KEY, config).map_err(|e| e.to_string())
}

// Storage only exists in the browser; native builds (tests, tooling) fall
// back to in-memory defaults.

#[cfg(not(target_arch = "wasm32"))]
pub fn load_settings() -> AppSettings {
    AppSettings::default()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn save_settings(_settings: &AppSettings) -> Result<(), String> {
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
pub fn load_backend() -> Option<BackendConfig> {
    None
}

#[cfg(not(target_arch = "wasm32"))]
pub fn save_backend(_config: &BackendConfig) -> Result<(), String> {
    Ok(())
}

fn position_key(track_id: &str) -> String {
    format!("{POSITION_KEY_PREFIX}{track_id}")
}

/// Where the user left off in each track, keyed by track id.
///
/// Offsets live only on this device. A missing record reads as 0; a record
/// is removed when the track finishes naturally.
pub trait PositionStore {
    fn get(&self, track_id: &str) -> f64;
    fn set(&self, track_id: &str, seconds: f64);
    fn clear(&self, track_id: &str);
}

/// Browser-storage-backed position store.
#[cfg(target_arch = "wasm32")]
#[derive(Default)]
pub struct LocalPositionStore;

#[cfg(target_arch = "wasm32")]
impl PositionStore for LocalPositionStore {
    fn get(&self, track_id: &str) -> f64 {
        LocalStorage::get::<f64>(&position_key(track_id)).unwrap_or(0.0)
    }

    fn set(&self, track_id: &str, seconds: f64) {
        let _ = LocalStorage::set(&position_key(track_id), seconds);
    }

    fn clear(&self, track_id: &str) {
        LocalStorage::delete(&position_key(track_id));
    }
}

/// In-memory position store for native builds and tests.
#[derive(Default)]
pub struct MemoryPositionStore {
    offsets: RefCell<HashMap<String, f64>>,
}

impl PositionStore for MemoryPositionStore {
    fn get(&self, track_id: &str) -> f64 {
        self.offsets
            .borrow()
            .get(&position_key(track_id))
            .copied()
            .unwrap_or(0.0)
    }

    fn set(&self, track_id: &str, seconds: f64) {
        self.offsets
            .borrow_mut()
            .insert(position_key(track_id), seconds);
    }

    fn clear(&self, track_id: &str) {
        self.offsets.borrow_mut().remove(&position_key(track_id));
    }
}

/// The position store for the current target.
pub fn default_position_store() -> Rc<dyn PositionStore> {
    #[cfg(target_arch = "wasm32")]
    {
        Rc::new(LocalPositionStore)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Rc::new(MemoryPositionStore::default())
    }
}

#[cfg(test)]
mod tests;
