use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::model::{default_catalog, EarningsCallEntry, DEFAULT_INITIAL_COMPANY};
use super::platform;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub transport: TransportConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Which earnings calls the sidebar offers, and which one is selected first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_initial_company")]
    pub initial_company: String,
    #[serde(default = "default_catalog")]
    pub entries: Vec<EarningsCallEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Length of every call recording, in seconds.
    #[serde(default = "default_duration_secs")]
    pub duration_secs: u32,
    #[serde(default = "default_volume")]
    pub default_volume: f32,
    #[serde(default = "default_volume_step")]
    pub volume_step: f32,
    #[serde(default = "default_seek_step_secs")]
    pub seek_step_secs: u32,
}

/// Data feed source. With no `json_path` the built-in mock figures are used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default)]
    pub json_path: Option<PathBuf>,
    #[serde(default)]
    pub latency_ms: u64,
    #[serde(default = "default_price_base")]
    pub price_base: f64,
    #[serde(default = "default_price_spread")]
    pub price_spread: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_show_keys_bar")]
    pub show_keys_bar: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            initial_company: default_initial_company(),
            entries: default_catalog(),
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            duration_secs: default_duration_secs(),
            default_volume: default_volume(),
            volume_step: default_volume_step(),
            seek_step_secs: default_seek_step_secs(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            json_path: None,
            latency_ms: 0,
            price_base: default_price_base(),
            price_spread: default_price_spread(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_keys_bar: default_show_keys_bar(),
        }
    }
}

fn default_initial_company() -> String {
    DEFAULT_INITIAL_COMPANY.to_string()
}

fn default_duration_secs() -> u32 {
    3600
}

fn default_volume() -> f32 {
    0.5
}

fn default_volume_step() -> f32 {
    0.1
}

fn default_seek_step_secs() -> u32 {
    30
}

fn default_price_base() -> f64 {
    180.0
}

fn default_price_spread() -> f64 {
    10.0
}

fn default_show_keys_bar() -> bool {
    true
}

impl Config {
    /// Load from the default location, writing a default file on first run.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> anyhow::Result<Self> {
        if !config_path.exists() {
            let config = Self::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(config_path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.catalog.initial_company, "Innovation Labs");
        assert_eq!(config.catalog.entries.len(), 3);
        assert_eq!(config.transport.duration_secs, 3600);
        assert_eq!(config.transport.default_volume, 0.5);
        assert!(config.feed.json_path.is_none());
        assert!(config.ui.show_keys_bar);
        assert!(Config::config_path().ends_with("advisor/config.toml"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [transport]
            seek_step_secs = 10

            [feed]
            latency_ms = 250
            "#,
        )
        .unwrap();
        assert_eq!(config.transport.seek_step_secs, 10);
        assert_eq!(config.transport.duration_secs, 3600);
        assert_eq!(config.feed.latency_ms, 250);
        assert_eq!(config.feed.price_base, 180.0);
        assert_eq!(config.catalog.entries.len(), 3);
    }

    #[test]
    fn test_load_writes_default_on_first_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.catalog.initial_company, "Innovation Labs");

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.catalog.entries, config.catalog.entries);
    }

    #[test]
    fn test_custom_catalog_entries() {
        let config: Config = toml::from_str(
            r#"
            [catalog]
            initial_company = "Acme"

            [[catalog.entries]]
            company = "Acme"
            scheduled_time = "9:00:00 AM"
            status = "ongoing"
            "#,
        )
        .unwrap();
        assert_eq!(config.catalog.entries.len(), 1);
        assert_eq!(config.catalog.entries[0].company, "Acme");
    }
}
