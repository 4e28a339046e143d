use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::summary::export::default_export_dir;

/// Where the summarizer service lives unless overridden
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000/";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Service root; the lesson is POSTed here
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Desktop notification when a summary finishes
    #[serde(default)]
    pub notifications: bool,

    /// Open the browser as soon as a summary succeeds
    #[serde(default)]
    pub auto_open: bool,

    /// Where exported summaries are written (data dir when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            notifications: false,
            auto_open: false,
            export_dir: None,
        }
    }
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("matome");

        if let Err(e) = std::fs::create_dir_all(&config_dir) {
            tracing::warn!("Could not create config directory: {}", e);
        }

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        let path = match Self::config_path() {
            Ok(p) => p,
            Err(_) => return Ok(AppConfig::default()),
        };

        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return Ok(config),
                    Err(e) => tracing::warn!("Failed to parse config: {}", e),
                },
                Err(e) => tracing::warn!("Failed to read config: {}", e),
            }
        }

        let config = AppConfig::default();
        let _ = config.save();
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        // Clean up the config before saving: a blank server URL would make
        // every request fail opaquely later
        let mut clean_config = self.clone();
        if clean_config.server_url.trim().is_empty() {
            clean_config.server_url = default_server_url();
        }
        if clean_config
            .export_dir
            .as_ref()
            .map(|p| p.as_os_str().is_empty())
            .unwrap_or(false)
        {
            clean_config.export_dir = None;
        }

        let content = toml::to_string_pretty(&clean_config)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Export directory with the default applied
    pub fn resolve_export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(default_export_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serialization() {
        let config = AppConfig {
            server_url: "https://summarizer.example.net/".to_string(),
            notifications: true,
            auto_open: false,
            export_dir: Some(PathBuf::from("/tmp/matome")),
        };

        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&serialized).unwrap();

        assert_eq!(config.server_url, deserialized.server_url);
        assert_eq!(config.notifications, deserialized.notifications);
        assert_eq!(config.export_dir, deserialized.export_dir);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        assert!(!config.notifications);
        assert!(!config.auto_open);
        assert_eq!(config.export_dir, None);
    }

    #[test]
    fn export_dir_resolution() {
        let mut config = AppConfig::default();
        assert_eq!(config.resolve_export_dir(), default_export_dir());

        config.export_dir = Some(PathBuf::from("/tmp/somewhere"));
        assert_eq!(config.resolve_export_dir(), PathBuf::from("/tmp/somewhere"));
    }
}
