use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_SAVE_DEBOUNCE_MS: u64 = 500;
const DEFAULT_CACHE_RETENTION_HOURS: u64 = 24;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub save_debounce_ms: Option<u64>,
    #[serde(default)]
    pub cache_retention_hours: Option<u64>,
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::home_dir().map(|home| home.join(".config/taskboard/config.toml"))
        }
        #[cfg(target_os = "linux")]
        {
            dirs::config_dir().map(|config| config.join("taskboard/config.toml"))
        }
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map(|config| config.join("taskboard\\config.toml"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }

    pub fn load() -> Self {
        if let Some(config_path) = Self::config_path() {
            if config_path.exists() {
                if let Ok(content) = std::fs::read_to_string(&config_path) {
                    return Self::from_toml(&content);
                }
            }
        }
        Self::default()
    }

    /// Parse a config document, falling back to defaults when it is malformed.
    pub fn from_toml(content: &str) -> Self {
        toml::from_str(content).unwrap_or_default()
    }

    pub fn save_debounce(&self) -> Duration {
        Duration::from_millis(self.save_debounce_ms.unwrap_or(DEFAULT_SAVE_DEBOUNCE_MS))
    }

    pub fn cache_retention(&self) -> Duration {
        let hours = self
            .cache_retention_hours
            .unwrap_or(DEFAULT_CACHE_RETENTION_HOURS);
        Duration::from_secs(hours * 60 * 60)
    }

    pub fn effective_cache_dir(&self) -> PathBuf {
        self.cache_dir
            .clone()
            .or_else(|| dirs::cache_dir().map(|dir| dir.join("taskboard")))
            .unwrap_or_else(|| PathBuf::from(".taskboard-cache"))
    }
}
