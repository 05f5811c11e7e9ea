//! Console settings stored as JSON in the platform config directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::pager::DEFAULT_PAGE_SIZE;

/// Environment variable that overrides the server URL.
pub const SERVER_URL_ENV: &str = "RUSTMAILER_CONSOLE_URL";

const CONFIG_DIR: &str = "rustmailer-console";
const SETTINGS_FILE: &str = "settings.json";

/// Color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light theme.
    Light,
    /// Dark theme.
    #[default]
    Dark,
}

/// Console settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Base URL of the `RustMailer` server.
    pub server_url: String,
    /// Envelopes per page.
    pub page_size: u64,
    /// Dashboard refresh interval in seconds.
    pub dashboard_poll_secs: u64,
    /// Account running-state refresh interval in seconds.
    pub running_state_poll_secs: u64,
    /// Color theme.
    pub theme: Theme,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:15630".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            dashboard_poll_secs: 30,
            running_state_poll_secs: 5,
            theme: Theme::Dark,
        }
    }
}

impl ConsoleConfig {
    /// Default settings file location.
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR)
            .join(SETTINGS_FILE)
    }

    /// Loads settings from [`default_path`](Self::default_path), then applies
    /// the environment override.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::default_path()).await?;
        if let Ok(url) = std::env::var(SERVER_URL_ENV) {
            config.apply_server_override(&url);
        }
        Ok(config)
    }

    /// Loads settings from `path`. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let contents = match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No settings at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        config.validated()
    }

    /// Saves settings to [`default_path`](Self::default_path).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub async fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path()).await
    }

    /// Saves settings to `path`, creating its directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, contents).await?;
        info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Replaces the server URL with a non-blank override.
    pub fn apply_server_override(&mut self, url: &str) {
        let url = url.trim();
        if !url.is_empty() {
            debug!("Server URL overridden by {SERVER_URL_ENV}");
            self.server_url = url.to_string();
        }
    }

    fn validated(self) -> Result<Self> {
        if url::Url::parse(&self.server_url).is_err() {
            return Err(Error::Config(format!(
                "server_url is not a valid URL: {}",
                self.server_url
            )));
        }
        if self.page_size == 0 {
            return Err(Error::Config("page_size must be positive".to_string()));
        }
        if self.dashboard_poll_secs == 0 || self.running_state_poll_secs == 0 {
            return Err(Error::Config(
                "poll intervals must be at least one second".to_string(),
            ));
        }
        Ok(self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("rmc-config-{}-{name}", std::process::id()))
            .join(SETTINGS_FILE)
    }

    #[tokio::test]
    async fn test_missing_file_gives_defaults() {
        let config = ConsoleConfig::load_from(&temp_path("missing")).await.unwrap();
        assert_eq!(config, ConsoleConfig::default());
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let path = temp_path("roundtrip");
        let config = ConsoleConfig {
            server_url: "https://mail.internal:15630".into(),
            page_size: 50,
            theme: Theme::Light,
            ..ConsoleConfig::default()
        };
        config.save_to(&path).await.unwrap();
        assert_eq!(ConsoleConfig::load_from(&path).await.unwrap(), config);

        let raw = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(raw.contains(r#""theme": "light""#));
        let _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
    }

    #[tokio::test]
    async fn test_partial_file_fills_defaults() {
        let path = temp_path("partial");
        tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        tokio::fs::write(&path, r#"{"page_size": 10}"#).await.unwrap();

        let config = ConsoleConfig::load_from(&path).await.unwrap();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.server_url, "http://localhost:15630");
        let _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
    }

    #[tokio::test]
    async fn test_invalid_file_is_an_error() {
        let path = temp_path("invalid");
        tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();

        tokio::fs::write(&path, "{not json").await.unwrap();
        assert!(matches!(
            ConsoleConfig::load_from(&path).await,
            Err(Error::Config(_))
        ));

        tokio::fs::write(&path, r#"{"page_size": 0}"#).await.unwrap();
        assert!(matches!(
            ConsoleConfig::load_from(&path).await,
            Err(Error::Config(_))
        ));
        let _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
    }

    #[test]
    fn test_server_override() {
        let mut config = ConsoleConfig::default();
        config.apply_server_override("  ");
        assert_eq!(config.server_url, "http://localhost:15630");
        config.apply_server_override(" http://10.0.0.2:15630 ");
        assert_eq!(config.server_url, "http://10.0.0.2:15630");
    }
}
