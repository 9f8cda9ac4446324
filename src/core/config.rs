use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ResmonError, Result};

pub const DEFAULT_UPDATE_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_HISTORY_LENGTH: usize = 60;
pub const DEFAULT_CPU_THRESHOLD: u32 = 90;
pub const DEFAULT_RAM_THRESHOLD: u32 = 90;
/// One day of samples at one per second.
pub const MAX_HISTORY_LENGTH: usize = 86_400;

/// Keys accepted by the configuration file, in the order they are written.
pub const CONFIG_KEYS: [&str; 4] = [
    "update_interval_ms",
    "history_length",
    "cpu_threshold",
    "ram_threshold",
];

/// User settings persisted between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub update_interval_ms: u64,
    pub history_length: usize,
    pub cpu_threshold: u32,
    pub ram_threshold: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: DEFAULT_UPDATE_INTERVAL_MS,
            history_length: DEFAULT_HISTORY_LENGTH,
            cpu_threshold: DEFAULT_CPU_THRESHOLD,
            ram_threshold: DEFAULT_RAM_THRESHOLD,
        }
    }
}

impl AppConfig {
    /// Load the configuration stored at `path`.
    ///
    /// Never fails: a missing file yields the defaults, an unreadable or
    /// malformed file is treated as empty, and every key that is absent or
    /// holds an invalid value falls back to its default.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("No config at {:?}, using defaults", path);
            return Self::default();
        }

        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("Failed to read config file {:?}: {}", path, e);
                return Self::default();
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => Self::from_map(&map),
            Ok(_) => {
                log::warn!("Config file {:?} is not a JSON object, using defaults", path);
                Self::default()
            }
            Err(e) => {
                log::warn!("Config file {:?} is malformed ({}), using defaults", path, e);
                Self::default()
            }
        }
    }

    /// Merge known keys from a parsed document over the defaults.
    fn from_map(map: &Map<String, Value>) -> Self {
        let defaults = Self::default();
        let mut config = defaults.clone();

        for key in CONFIG_KEYS {
            if let Some(value) = map.get(key) {
                if config.apply_value(key, value).is_err() {
                    log::warn!("Ignoring invalid value for '{}': {}", key, value);
                }
            }
        }

        config.sanitize();
        config
    }

    fn apply_value(&mut self, key: &str, value: &Value) -> Result<()> {
        let number = value
            .as_u64()
            .or_else(|| value.as_f64().filter(|f| *f >= 0.0 && f.fract() == 0.0).map(|f| f as u64))
            .ok_or_else(|| ResmonError::config(format!("'{}' must be a non-negative integer", key)))?;

        match key {
            "update_interval_ms" => self.update_interval_ms = number,
            "history_length" => self.history_length = usize::try_from(number).unwrap_or(usize::MAX),
            "cpu_threshold" => self.cpu_threshold = u32::try_from(number).map_err(|_| {
                ResmonError::config("cpu_threshold out of range")
            })?,
            "ram_threshold" => self.ram_threshold = u32::try_from(number).map_err(|_| {
                ResmonError::config("ram_threshold out of range")
            })?,
            other => return Err(ResmonError::config(format!("Unknown config key '{}'", other))),
        }
        Ok(())
    }

    /// Set a single key from its textual form (used by `resmon config set`).
    pub fn set(&mut self, key: &str, raw: &str) -> Result<()> {
        let value: u64 = raw
            .trim()
            .parse()
            .map_err(|_| ResmonError::config(format!("'{}' is not a valid value for '{}'", raw, key)))?;
        if value == 0 && matches!(key, "update_interval_ms" | "history_length") {
            return Err(ResmonError::config(format!("'{}' must be greater than zero", key)));
        }
        if key == "history_length" && value > MAX_HISTORY_LENGTH as u64 {
            return Err(ResmonError::config(format!(
                "'history_length' must be at most {}",
                MAX_HISTORY_LENGTH
            )));
        }
        self.apply_value(key, &Value::from(value))
    }

    /// Look up a key by name.
    pub fn get(&self, key: &str) -> Option<u64> {
        match key {
            "update_interval_ms" => Some(self.update_interval_ms),
            "history_length" => Some(self.history_length as u64),
            "cpu_threshold" => Some(u64::from(self.cpu_threshold)),
            "ram_threshold" => Some(u64::from(self.ram_threshold)),
            _ => None,
        }
    }

    /// Zero interval or history cannot drive the sampler; oversized history is capped.
    pub fn sanitize(&mut self) {
        if self.update_interval_ms == 0 {
            self.update_interval_ms = DEFAULT_UPDATE_INTERVAL_MS;
        }
        if self.history_length == 0 {
            self.history_length = DEFAULT_HISTORY_LENGTH;
        }
        if self.history_length > MAX_HISTORY_LENGTH {
            log::warn!(
                "history_length {} capped to {}",
                self.history_length,
                MAX_HISTORY_LENGTH
            );
            self.history_length = MAX_HISTORY_LENGTH;
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data)?;
        log::debug!("Saved config to {:?}", path);

        Ok(())
    }

    /// Default location: `<config dir>/resmon/config.json`.
    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ResmonError::config("Could not determine config directory"))?;

        Ok(config_dir.join("resmon"))
    }
}
