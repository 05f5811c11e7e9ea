//! Account form.

use rustmailer_console_api::types::{
    AccountCreateRequest, AccountEntity, AccountUpdateRequest, AuthConfig, AuthType, Encryption,
    MailerType, ServerConfig,
};

use super::{ValidationError, ValidationResult, finish, non_blank, parse_port};
use crate::address::is_valid_email;

/// Authentication of one server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerAuthForm {
    /// Username/password; a blank password keeps the stored one when editing.
    Password(String),
    /// XOAUTH2 through the account's OAuth2 configuration.
    OAuth2,
}

impl Default for ServerAuthForm {
    fn default() -> Self {
        Self::Password(String::new())
    }
}

impl ServerAuthForm {
    /// Auth type discriminant.
    #[must_use]
    pub const fn auth_type(&self) -> AuthType {
        match self {
            Self::Password(_) => AuthType::Password,
            Self::OAuth2 => AuthType::OAuth2,
        }
    }

    /// Switches the auth type, keeping the password when it stays `Password`.
    pub fn set_auth_type(&mut self, auth_type: AuthType) {
        if self.auth_type() != auth_type {
            *self = match auth_type {
                AuthType::Password => Self::default(),
                AuthType::OAuth2 => Self::OAuth2,
            };
        }
    }
}

/// IMAP or SMTP server section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerForm {
    /// Hostname.
    pub host: String,
    /// Port as typed.
    pub port: String,
    /// Encryption mode.
    pub encryption: Encryption,
    /// Authentication.
    pub auth: ServerAuthForm,
    /// Proxy id.
    pub use_proxy: Option<u64>,
}

impl ServerForm {
    fn with_port(port: u16) -> Self {
        Self {
            host: String::new(),
            port: port.to_string(),
            encryption: Encryption::Ssl,
            auth: ServerAuthForm::default(),
            use_proxy: None,
        }
    }

    /// Empty IMAP section with the implicit-TLS port.
    #[must_use]
    pub fn imap() -> Self {
        Self::with_port(993)
    }

    /// Empty SMTP section with the implicit-TLS port.
    #[must_use]
    pub fn smtp() -> Self {
        Self::with_port(465)
    }

    fn from_config(config: &ServerConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port.to_string(),
            encryption: config.encryption,
            auth: match config.auth.auth_type {
                AuthType::Password => ServerAuthForm::Password(String::new()),
                AuthType::OAuth2 => ServerAuthForm::OAuth2,
            },
            use_proxy: config.use_proxy,
        }
    }

    fn set(&mut self, host: &str, port: u16, encryption: Encryption) {
        self.host = host.to_string();
        self.port = port.to_string();
        self.encryption = encryption;
    }

    fn to_config(&self) -> Option<ServerConfig> {
        let password = match &self.auth {
            ServerAuthForm::Password(password) if !password.is_empty() => Some(password.clone()),
            _ => None,
        };
        Some(ServerConfig {
            host: self.host.trim().to_string(),
            port: parse_port(&self.port)?,
            encryption: self.encryption,
            auth: AuthConfig {
                auth_type: self.auth.auth_type(),
                password,
            },
            use_proxy: self.use_proxy,
        })
    }
}

/// Mailer-specific part of the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailerForm {
    /// IMAP for reading, SMTP for sending.
    ImapSmtp {
        /// IMAP section.
        imap: ServerForm,
        /// SMTP section.
        smtp: ServerForm,
    },
    /// Gmail REST API, always authorized through OAuth2.
    GmailApi {
        /// Proxy id for API traffic.
        use_proxy: Option<u64>,
    },
}

impl Default for MailerForm {
    fn default() -> Self {
        Self::ImapSmtp {
            imap: ServerForm::imap(),
            smtp: ServerForm::smtp(),
        }
    }
}

impl MailerForm {
    /// Mailer type discriminant.
    #[must_use]
    pub const fn mailer_type(&self) -> MailerType {
        match self {
            Self::ImapSmtp { .. } => MailerType::ImapSmtp,
            Self::GmailApi { .. } => MailerType::GmailApi,
        }
    }
}

/// Add/edit account form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountForm {
    /// Account being edited; `None` when adding.
    pub account_id: Option<u64>,
    /// Email address (read-only when editing).
    pub email: String,
    /// Display name.
    pub name: String,
    /// Mailer section.
    pub mailer: MailerForm,
    /// OAuth2 configuration to authorize with, when OAuth2 is used.
    pub oauth2_name: String,
    /// Start synchronization enabled.
    pub enabled: bool,
    /// Only sync envelopes.
    pub minimal_sync: bool,
    /// Sync interval in minutes as typed.
    pub sync_interval_min: String,
}

impl Default for AccountForm {
    fn default() -> Self {
        Self {
            account_id: None,
            email: String::new(),
            name: String::new(),
            mailer: MailerForm::default(),
            oauth2_name: String::new(),
            enabled: true,
            minimal_sync: false,
            sync_interval_min: "10".to_string(),
        }
    }
}

/// A validated account form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedAccount {
    /// Create request (also the source of the update request).
    pub request: AccountCreateRequest,
    /// OAuth2 configuration to authorize with after saving.
    pub oauth2_name: Option<String>,
}

impl ValidatedAccount {
    /// Update request for an existing account.
    #[must_use]
    pub fn update_request(&self) -> AccountUpdateRequest {
        AccountUpdateRequest::from(self.request.clone())
    }
}

impl AccountForm {
    /// Creates an empty add form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fills an edit form from a stored account. Passwords stay blank.
    #[must_use]
    pub fn from_entity(account: &AccountEntity) -> Self {
        let mailer = match account.mailer_type {
            MailerType::ImapSmtp => MailerForm::ImapSmtp {
                imap: account
                    .imap
                    .as_ref()
                    .map_or_else(ServerForm::imap, ServerForm::from_config),
                smtp: account
                    .smtp
                    .as_ref()
                    .map_or_else(ServerForm::smtp, ServerForm::from_config),
            },
            MailerType::GmailApi => MailerForm::GmailApi { use_proxy: None },
        };

        Self {
            account_id: Some(account.id),
            email: account.email.clone(),
            name: account.name.clone().unwrap_or_default(),
            mailer,
            oauth2_name: String::new(),
            enabled: account.enabled,
            minimal_sync: account.minimal_sync,
            sync_interval_min: account
                .sync_interval_min
                .map_or_else(String::new, |m| m.to_string()),
        }
    }

    /// Whether the form edits an existing account.
    #[must_use]
    pub const fn is_edit(&self) -> bool {
        self.account_id.is_some()
    }

    /// Switches the mailer type, resetting the mailer section when it changes.
    pub fn set_mailer_type(&mut self, mailer_type: MailerType) {
        if self.mailer.mailer_type() == mailer_type {
            return;
        }
        self.mailer = match mailer_type {
            MailerType::ImapSmtp => MailerForm::default(),
            MailerType::GmailApi => MailerForm::GmailApi { use_proxy: None },
        };
    }

    /// Whether any part of the account authorizes through OAuth2.
    #[must_use]
    pub fn uses_oauth2(&self) -> bool {
        match &self.mailer {
            MailerForm::GmailApi { .. } => true,
            MailerForm::ImapSmtp { imap, smtp } => {
                imap.auth == ServerAuthForm::OAuth2 || smtp.auth == ServerAuthForm::OAuth2
            }
        }
    }

    /// Fills server settings for well-known providers from the email domain.
    /// Does nothing for unknown domains or a Gmail API account.
    pub fn apply_provider_defaults(&mut self) {
        let MailerForm::ImapSmtp { imap, smtp } = &mut self.mailer else {
            return;
        };
        let Some(domain) = self.email.trim().split('@').nth(1) else {
            return;
        };

        match domain.to_lowercase().as_str() {
            "gmail.com" | "googlemail.com" => {
                imap.set("imap.gmail.com", 993, Encryption::Ssl);
                smtp.set("smtp.gmail.com", 465, Encryption::Ssl);
            }
            "outlook.com" | "hotmail.com" | "live.com" => {
                imap.set("outlook.office365.com", 993, Encryption::Ssl);
                smtp.set("smtp.office365.com", 587, Encryption::StartTls);
            }
            "yahoo.com" | "ymail.com" => {
                imap.set("imap.mail.yahoo.com", 993, Encryption::Ssl);
                smtp.set("smtp.mail.yahoo.com", 465, Encryption::Ssl);
            }
            "icloud.com" | "me.com" | "mac.com" => {
                imap.set("imap.mail.me.com", 993, Encryption::Ssl);
                smtp.set("smtp.mail.me.com", 587, Encryption::StartTls);
            }
            _ => {}
        }
    }

    /// Validates the form.
    ///
    /// # Errors
    ///
    /// Returns every invalid field.
    pub fn validate(&self) -> ValidationResult<ValidatedAccount> {
        let mut errors = Vec::new();

        if self.email.trim().is_empty() {
            errors.push(ValidationError::EmptyEmail);
        } else if !is_valid_email(&self.email) {
            errors.push(ValidationError::InvalidEmail);
        }

        let sync_interval_min = match self.sync_interval_min.trim() {
            "" => None,
            text => match text.parse::<i64>() {
                Ok(minutes) if minutes > 0 => Some(minutes),
                _ => {
                    errors.push(ValidationError::InvalidSyncInterval);
                    None
                }
            },
        };

        if let MailerForm::ImapSmtp { imap, smtp } = &self.mailer {
            self.check_server(
                imap,
                [
                    ValidationError::EmptyImapHost,
                    ValidationError::InvalidImapPort,
                    ValidationError::EmptyImapPassword,
                ],
                &mut errors,
            );
            self.check_server(
                smtp,
                [
                    ValidationError::EmptySmtpHost,
                    ValidationError::InvalidSmtpPort,
                    ValidationError::EmptySmtpPassword,
                ],
                &mut errors,
            );
        }

        let oauth2_name = non_blank(&self.oauth2_name);
        // An edited account is already authorized; re-authorizing is optional.
        if self.uses_oauth2() && oauth2_name.is_none() && !self.is_edit() {
            errors.push(ValidationError::MissingOAuth2Config);
        }

        finish(errors, || {
            let (imap, smtp, use_proxy) = match &self.mailer {
                MailerForm::ImapSmtp { imap, smtp } => (imap.to_config(), smtp.to_config(), None),
                MailerForm::GmailApi { use_proxy } => (None, None, *use_proxy),
            };
            ValidatedAccount {
                request: AccountCreateRequest {
                    email: self.email.trim().to_string(),
                    name: non_blank(&self.name),
                    mailer_type: self.mailer.mailer_type(),
                    imap,
                    smtp,
                    enabled: self.enabled,
                    minimal_sync: self.minimal_sync,
                    sync_interval_min,
                    use_proxy,
                },
                oauth2_name: oauth2_name.filter(|_| self.uses_oauth2()),
            }
        })
    }

    /// `codes` are the empty-host, bad-port and empty-password errors.
    fn check_server(
        &self,
        server: &ServerForm,
        codes: [ValidationError; 3],
        errors: &mut Vec<ValidationError>,
    ) {
        let [empty_host, bad_port, empty_password] = codes;
        if server.host.trim().is_empty() {
            errors.push(empty_host);
        }
        if parse_port(&server.port).is_none() {
            errors.push(bad_port);
        }
        if let ServerAuthForm::Password(password) = &server.auth
            && password.is_empty()
            && !self.is_edit()
        {
            errors.push(empty_password);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn imap_form() -> AccountForm {
        let mut form = AccountForm::new();
        form.email = "user@gmail.com".into();
        form.apply_provider_defaults();
        if let MailerForm::ImapSmtp { imap, smtp } = &mut form.mailer {
            imap.auth = ServerAuthForm::Password("secret".into());
            smtp.auth = ServerAuthForm::Password("secret".into());
        }
        form
    }

    #[test]
    fn test_empty_form_errors() {
        let errors = AccountForm::new().validate().unwrap_err();
        assert!(errors.contains(&ValidationError::EmptyEmail));
        assert!(errors.contains(&ValidationError::EmptyImapHost));
        assert!(errors.contains(&ValidationError::EmptySmtpHost));
        assert!(errors.contains(&ValidationError::EmptyImapPassword));
        assert!(!errors.contains(&ValidationError::InvalidImapPort));
    }

    #[test]
    fn test_provider_defaults() {
        let form = imap_form();
        let MailerForm::ImapSmtp { imap, smtp } = &form.mailer else {
            panic!("expected IMAP/SMTP form");
        };
        assert_eq!(imap.host, "imap.gmail.com");
        assert_eq!(smtp.port, "465");
    }

    #[test]
    fn test_valid_password_account() {
        let validated = imap_form().validate().unwrap();
        let request = validated.request;
        assert_eq!(request.mailer_type, MailerType::ImapSmtp);
        let imap = request.imap.unwrap();
        assert_eq!(imap.port, 993);
        assert_eq!(imap.auth.password.as_deref(), Some("secret"));
        assert_eq!(request.sync_interval_min, Some(10));
        assert_eq!(validated.oauth2_name, None);
    }

    #[test]
    fn test_oauth2_server_needs_configuration() {
        let mut form = imap_form();
        if let MailerForm::ImapSmtp { imap, .. } = &mut form.mailer {
            imap.auth.set_auth_type(AuthType::OAuth2);
        }
        assert_eq!(
            form.validate().unwrap_err(),
            [ValidationError::MissingOAuth2Config]
        );

        form.oauth2_name = "google".into();
        let validated = form.validate().unwrap();
        assert_eq!(validated.oauth2_name.as_deref(), Some("google"));
        let imap = validated.request.imap.unwrap();
        assert_eq!(imap.auth.auth_type, AuthType::OAuth2);
        assert_eq!(imap.auth.password, None);
    }

    #[test]
    fn test_gmail_api_needs_no_servers() {
        let mut form = AccountForm::new();
        form.email = "me@gmail.com".into();
        form.set_mailer_type(MailerType::GmailApi);
        assert_eq!(
            form.validate().unwrap_err(),
            [ValidationError::MissingOAuth2Config]
        );

        form.oauth2_name = "google".into();
        let request = form.validate().unwrap().request;
        assert_eq!(request.mailer_type, MailerType::GmailApi);
        assert!(request.imap.is_none() && request.smtp.is_none());
    }

    #[test]
    fn test_bad_port_and_interval() {
        let mut form = imap_form();
        if let MailerForm::ImapSmtp { smtp, .. } = &mut form.mailer {
            smtp.port = "0".into();
        }
        form.sync_interval_min = "-5".into();
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors,
            [ValidationError::InvalidSyncInterval, ValidationError::InvalidSmtpPort]
        );
    }

    #[test]
    fn test_edit_keeps_blank_passwords() {
        let account: AccountEntity = serde_json::from_value(serde_json::json!({
            "id": 3,
            "email": "ops@example.com",
            "mailer_type": "ImapSmtp",
            "enabled": true,
            "imap": {"host": "imap.example.com", "port": 993, "encryption": "Ssl",
                     "auth": {"auth_type": "Password"}},
            "smtp": {"host": "smtp.example.com", "port": 587, "encryption": "StartTls",
                     "auth": {"auth_type": "Password"}}
        }))
        .unwrap();
        let form = AccountForm::from_entity(&account);
        assert!(form.is_edit());

        let update = form.validate().unwrap().update_request();
        let smtp = update.smtp.unwrap();
        assert_eq!(smtp.port, 587);
        assert_eq!(smtp.encryption, Encryption::StartTls);
        assert_eq!(smtp.auth.password, None);
    }
}
