use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::system_monitor::{
    clamp_percent, AlertEvaluator, AlertMetric, ProcessSort, ThresholdConfig,
    DEFAULT_HISTORY_SIZE,
};

pub const MIN_UPDATE_INTERVAL: u64 = 1;
pub const MAX_UPDATE_INTERVAL: u64 = 60;

/// User preferences, stored as JSON
///
/// Missing keys take their defaults and unknown keys are ignored, so
/// older or newer files still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seconds between polls, within [1, 60]
    pub update_interval: u64,
    pub alert_enabled: bool,
    pub thresholds: ThresholdConfig,
    /// Seconds before the same metric may alert again
    pub alert_cooldown: u64,
    pub logging_enabled: bool,
    pub auto_export: bool,
    /// Seconds between automatic snapshot exports
    pub export_interval: u64,
    pub theme: String,
    pub show_notifications: bool,
    /// Capacity of the rolling chart history
    pub history_size: usize,
    /// Path whose filesystem is reported as "disk"
    pub disk_path: String,
    pub process_limit: usize,
    pub process_sort: ProcessSort,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            update_interval: 2,
            alert_enabled: true,
            thresholds: ThresholdConfig::default(),
            alert_cooldown: 300,
            logging_enabled: false,
            auto_export: false,
            export_interval: 3600,
            theme: "dark".to_string(),
            show_notifications: true,
            history_size: DEFAULT_HISTORY_SIZE,
            disk_path: default_disk_path(),
            process_limit: 20,
            process_sort: ProcessSort::Cpu,
        }
    }
}

#[cfg(windows)]
fn default_disk_path() -> String {
    "C:\\".to_string()
}

#[cfg(not(windows))]
fn default_disk_path() -> String {
    "/".to_string()
}

impl Config {
    /// Load from the default location, falling back to defaults
    pub fn load() -> Self {
        match Self::config_path() {
            Ok(path) => Self::load_from(&path),
            Err(e) => {
                log::warn!("{:#}, using default configuration", e);
                Config::default()
            }
        }
    }

    /// Load from `path`. A missing, empty or corrupt file yields defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Config::default();
        }

        let data = match fs::read(path) {
            Ok(data) => data,
            Err(e) => {
                log::warn!("Failed to read config file {:?}: {}, using defaults", path, e);
                return Config::default();
            }
        };

        if data.is_empty() {
            return Config::default();
        }

        match serde_json::from_slice::<Config>(&data) {
            Ok(config) => config.normalized(),
            Err(e) => {
                log::warn!("Error loading config {:?}: {}, using defaults", path, e);
                Config::default()
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let data = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, data)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().with_context(|| "Could not determine config directory")?;

        Ok(config_dir.join("resource_monitor").join("config.json"))
    }

    /// Bring out-of-range values back into their valid ranges
    pub fn normalized(mut self) -> Self {
        self.update_interval = self
            .update_interval
            .clamp(MIN_UPDATE_INTERVAL, MAX_UPDATE_INTERVAL);
        self.history_size = self.history_size.max(1);
        self.process_limit = self.process_limit.max(1);
        for metric in AlertMetric::ALL {
            let value = clamp_percent(self.thresholds.get(metric));
            self.thresholds.set(metric, value);
        }
        self
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(
            self.update_interval
                .clamp(MIN_UPDATE_INTERVAL, MAX_UPDATE_INTERVAL),
        )
    }

    /// Fresh evaluator with these thresholds and cooldown
    pub fn alert_evaluator(&self) -> AlertEvaluator {
        AlertEvaluator::new(self.thresholds.clone(), self.alert_cooldown)
    }

    /// Read a value by dotted key, e.g. `thresholds.cpu`
    pub fn get(&self, key: &str) -> Option<Value> {
        let document = serde_json::to_value(self).ok()?;
        key.split('.')
            .try_fold(&document, |node, part| node.get(part))
            .cloned()
    }

    /// Set a value by dotted key. `raw` is parsed as JSON, falling back to
    /// a plain string. Unknown keys and ill-typed values are rejected.
    pub fn set(&mut self, key: &str, raw: &str) -> Result<()> {
        let mut document = serde_json::to_value(&*self).context("Failed to serialize config")?;

        let mut node = &mut document;
        for part in key.split('.') {
            node = match node.get_mut(part) {
                Some(child) => child,
                None => bail!("Unknown configuration key '{}'", key),
            };
        }

        if node.is_object() {
            bail!("'{}' is a section; set one of its keys instead", key);
        }

        *node = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));

        let updated: Config = serde_json::from_value(document)
            .with_context(|| format!("Invalid value '{}' for '{}'", raw, key))?;
        *self = updated.normalized();
        Ok(())
    }

    /// Reset every key to its default
    pub fn reset_to_defaults(&mut self) {
        *self = Config::default();
    }
}
