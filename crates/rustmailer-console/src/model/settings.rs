//! Settings page state.

use rustmailer_console_api::types::{License, RootPasswordRequest};
use rustmailer_console_core::ConsoleConfig;

/// Shortest root password accepted.
const MIN_PASSWORD_LEN: usize = 8;

/// License, root credentials and console settings.
#[derive(Debug, Default)]
pub struct SettingsState {
    /// Installed license.
    pub license: Option<License>,
    /// Why the license could not be read or installed.
    pub license_error: Option<String>,
    /// License key as typed.
    pub license_key: String,
    /// Waiting for the user to confirm a root token reset.
    pub confirm_reset: bool,
    /// Root token issued by the last reset, shown once.
    pub new_root_token: Option<String>,
    /// New root password.
    pub password: String,
    /// Confirmation.
    pub password_confirm: String,
    /// Why the password was rejected.
    pub password_error: Option<&'static str>,
    /// Server URL as typed.
    pub server_url: String,
    /// Page size as typed.
    pub page_size: String,
    /// Why the console settings were rejected.
    pub config_error: Option<String>,
    /// A request is in flight.
    pub busy: bool,
}

impl SettingsState {
    /// Fills the console settings fields from `config`.
    pub fn load_config(&mut self, config: &ConsoleConfig) {
        self.server_url.clone_from(&config.server_url);
        self.page_size = config.page_size.to_string();
        self.config_error = None;
    }

    /// Root password request.
    ///
    /// # Errors
    ///
    /// Returns a message when the password is short or unconfirmed.
    pub fn password_request(&self) -> Result<RootPasswordRequest, &'static str> {
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err("Password must be at least 8 characters");
        }
        if self.password != self.password_confirm {
            return Err("Passwords do not match");
        }
        Ok(RootPasswordRequest {
            password: self.password.clone(),
        })
    }

    /// `base` with the typed server URL and page size.
    ///
    /// # Errors
    ///
    /// Returns a message when a field is invalid.
    pub fn build_config(&self, base: &ConsoleConfig) -> Result<ConsoleConfig, String> {
        let server_url = self.server_url.trim();
        match url::Url::parse(server_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => return Err(format!("Not an HTTP(S) URL: {server_url}")),
        }
        let page_size = self
            .page_size
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|n| (1..=200).contains(n))
            .ok_or_else(|| "Page size must be between 1 and 200".to_string())?;
        Ok(ConsoleConfig {
            server_url: server_url.trim_end_matches('/').to_string(),
            page_size,
            ..base.clone()
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_password_rules() {
        let mut state = SettingsState {
            password: "short".into(),
            password_confirm: "short".into(),
            ..SettingsState::default()
        };
        assert!(state.password_request().is_err());

        state.password = "correct horse".into();
        assert_eq!(state.password_request().unwrap_err(), "Passwords do not match");

        state.password_confirm = "correct horse".into();
        assert_eq!(state.password_request().unwrap().password, "correct horse");
    }

    #[test]
    fn test_build_config() {
        let base = ConsoleConfig::default();
        let mut state = SettingsState::default();
        state.load_config(&base);
        assert_eq!(state.build_config(&base).unwrap(), base);

        state.server_url = " https://mail.internal:15630/ ".into();
        state.page_size = "50".into();
        let config = state.build_config(&base).unwrap();
        assert_eq!(config.server_url, "https://mail.internal:15630");
        assert_eq!(config.page_size, 50);
        assert_eq!(config.theme, base.theme);
    }

    #[test]
    fn test_build_config_rejects() {
        let base = ConsoleConfig::default();
        let mut state = SettingsState::default();
        state.load_config(&base);
        state.page_size = "0".into();
        assert!(state.build_config(&base).is_err());

        state.page_size = "20".into();
        state.server_url = "ftp://files".into();
        assert!(state.build_config(&base).is_err());
    }
}
