//! Form state and validation for the admin pages.
//!
//! Each form holds raw text input and validates into the matching API request
//! or a list of [`ValidationError`]s. Record kinds with different required
//! fields (mailer type, auth type, hook type) are modeled as enums so a form
//! can only carry the fields of its current kind.

mod account;
mod hook;
mod mta;
mod oauth2;
mod proxy;
mod template;

pub use account::{AccountForm, MailerForm, ServerAuthForm, ServerForm, ValidatedAccount};
pub use hook::{HookChannelForm, HookForm, NatsAuthForm};
pub use mta::MtaForm;
pub use oauth2::OAuth2Form;
pub use proxy::ProxyForm;
pub use template::TemplateForm;

/// Validation error for a form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Email address is empty.
    EmptyEmail,
    /// Email address format is invalid.
    InvalidEmail,
    /// IMAP host is empty.
    EmptyImapHost,
    /// IMAP port is invalid.
    InvalidImapPort,
    /// IMAP password is empty.
    EmptyImapPassword,
    /// SMTP host is empty.
    EmptySmtpHost,
    /// SMTP port is invalid.
    InvalidSmtpPort,
    /// SMTP password is empty.
    EmptySmtpPassword,
    /// OAuth2 is used but no configuration was chosen.
    MissingOAuth2Config,
    /// Sync interval is not a positive number of minutes.
    InvalidSyncInterval,
    /// Webhook URL is empty.
    EmptyHookUrl,
    /// Webhook URL is not an HTTP(S) URL.
    InvalidHookUrl,
    /// A custom header line is malformed.
    InvalidHeader,
    /// NATS host is empty.
    EmptyNatsHost,
    /// NATS port is invalid.
    InvalidNatsPort,
    /// NATS namespace is empty.
    EmptyNatsNamespace,
    /// NATS stream name is empty.
    EmptyNatsStream,
    /// NATS token is empty.
    EmptyNatsToken,
    /// NATS username is empty.
    EmptyNatsUsername,
    /// NATS password is empty.
    EmptyNatsPassword,
    /// Account hook watches no events.
    NoWatchedEvents,
    /// MTA host is empty.
    EmptyMtaHost,
    /// MTA port is invalid.
    InvalidMtaPort,
    /// MTA username is empty.
    EmptyMtaUsername,
    /// MTA password is empty.
    EmptyMtaPassword,
    /// Proxy URL is empty.
    EmptyProxyUrl,
    /// Proxy URL is not `socks5://` or `http://`.
    InvalidProxyUrl,
    /// Template description is empty.
    EmptyDescription,
    /// Template subject is empty.
    EmptySubject,
    /// Template has neither text nor HTML body.
    EmptyTemplateBody,
    /// Template parameters are not a JSON object.
    InvalidTemplateParams,
    /// OAuth2 configuration name is empty.
    EmptyOAuth2Name,
    /// OAuth2 client id is empty.
    EmptyClientId,
    /// OAuth2 client secret is empty.
    EmptyClientSecret,
    /// Authorization URL is invalid.
    InvalidAuthUrl,
    /// Token URL is invalid.
    InvalidTokenUrl,
    /// Redirect URI is invalid.
    InvalidRedirectUri,
    /// No scope was given.
    EmptyScopes,
}

impl ValidationError {
    /// Get human-readable error message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::EmptyEmail => "Email address is required",
            Self::InvalidEmail => "Invalid email address format",
            Self::EmptyImapHost => "IMAP server is required",
            Self::InvalidImapPort => "IMAP port must be 1-65535",
            Self::EmptyImapPassword => "IMAP password is required",
            Self::EmptySmtpHost => "SMTP server is required",
            Self::InvalidSmtpPort => "SMTP port must be 1-65535",
            Self::EmptySmtpPassword => "SMTP password is required",
            Self::MissingOAuth2Config => "Choose an OAuth2 configuration",
            Self::InvalidSyncInterval => "Sync interval must be a positive number of minutes",
            Self::EmptyHookUrl => "Webhook URL is required",
            Self::InvalidHookUrl => "Webhook URL must start with http:// or https://",
            Self::InvalidHeader => "Headers must be written as Name: value, one per line",
            Self::EmptyNatsHost => "NATS host is required",
            Self::InvalidNatsPort => "NATS port must be 1-65535",
            Self::EmptyNatsNamespace => "NATS namespace is required",
            Self::EmptyNatsStream => "NATS stream name is required",
            Self::EmptyNatsToken => "NATS token is required",
            Self::EmptyNatsUsername => "NATS username is required",
            Self::EmptyNatsPassword => "NATS password is required",
            Self::NoWatchedEvents => "Select at least one event",
            Self::EmptyMtaHost => "SMTP server is required",
            Self::InvalidMtaPort => "SMTP port must be 1-65535",
            Self::EmptyMtaUsername => "Username is required",
            Self::EmptyMtaPassword => "Password is required",
            Self::EmptyProxyUrl => "Proxy URL is required",
            Self::InvalidProxyUrl => "Proxy URL must be socks5://host:port or http://host:port",
            Self::EmptyDescription => "Description is required",
            Self::EmptySubject => "Subject is required",
            Self::EmptyTemplateBody => "Provide a text or HTML body",
            Self::InvalidTemplateParams => "Parameters must be a JSON object",
            Self::EmptyOAuth2Name => "Name is required",
            Self::EmptyClientId => "Client ID is required",
            Self::EmptyClientSecret => "Client secret is required",
            Self::InvalidAuthUrl => "Authorization URL must be an HTTP(S) URL",
            Self::InvalidTokenUrl => "Token URL must be an HTTP(S) URL",
            Self::InvalidRedirectUri => "Redirect URI must be an HTTP(S) URL",
            Self::EmptyScopes => "At least one scope is required",
        }
    }

    /// Get the field name this error relates to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyEmail | Self::InvalidEmail => "email",
            Self::EmptyImapHost => "imap_host",
            Self::InvalidImapPort => "imap_port",
            Self::EmptyImapPassword => "imap_password",
            Self::EmptySmtpHost | Self::EmptyMtaHost => "smtp_host",
            Self::InvalidSmtpPort | Self::InvalidMtaPort => "smtp_port",
            Self::EmptySmtpPassword => "smtp_password",
            Self::MissingOAuth2Config => "oauth2",
            Self::InvalidSyncInterval => "sync_interval",
            Self::EmptyHookUrl | Self::InvalidHookUrl => "target_url",
            Self::InvalidHeader => "headers",
            Self::EmptyNatsHost => "nats_host",
            Self::InvalidNatsPort => "nats_port",
            Self::EmptyNatsNamespace => "namespace",
            Self::EmptyNatsStream => "stream_name",
            Self::EmptyNatsToken => "token",
            Self::EmptyNatsUsername | Self::EmptyMtaUsername => "username",
            Self::EmptyNatsPassword | Self::EmptyMtaPassword => "password",
            Self::NoWatchedEvents => "watched_events",
            Self::EmptyProxyUrl | Self::InvalidProxyUrl => "url",
            Self::EmptyDescription | Self::EmptyOAuth2Name => "description",
            Self::EmptySubject => "subject",
            Self::EmptyTemplateBody => "body",
            Self::InvalidTemplateParams => "params",
            Self::EmptyClientId => "client_id",
            Self::EmptyClientSecret => "client_secret",
            Self::InvalidAuthUrl => "auth_url",
            Self::InvalidTokenUrl => "token_url",
            Self::InvalidRedirectUri => "redirect_uri",
            Self::EmptyScopes => "scopes",
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ValidationError {}

/// Result of validating a form into a request of type `T`.
pub type ValidationResult<T> = Result<T, Vec<ValidationError>>;

/// First error message for `field`, for inline display.
#[must_use]
pub fn error_for<'a>(errors: &'a [ValidationError], field: &str) -> Option<&'a str> {
    errors
        .iter()
        .find(|e| e.field() == field)
        .map(ValidationError::message)
}

/// Parses a port typed into a text field.
fn parse_port(input: &str) -> Option<u16> {
    input.trim().parse::<u16>().ok().filter(|port| *port > 0)
}

/// Trimmed text, or `None` when blank.
fn non_blank(input: &str) -> Option<String> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Whether `input` parses as an absolute URL with one of `schemes`.
fn is_url_with_scheme(input: &str, schemes: &[&str]) -> bool {
    url::Url::parse(input.trim())
        .is_ok_and(|url| schemes.contains(&url.scheme()) && url.host_str().is_some())
}

fn finish<T>(errors: Vec<ValidationError>, value: impl FnOnce() -> T) -> ValidationResult<T> {
    if errors.is_empty() {
        Ok(value())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_port() {
        assert_eq!(parse_port(" 993 "), Some(993));
        assert_eq!(parse_port("0"), None);
        assert_eq!(parse_port("70000"), None);
        assert_eq!(parse_port("imap"), None);
    }

    #[test]
    fn test_url_scheme_check() {
        assert!(is_url_with_scheme("https://hooks.example.com/x", &["http", "https"]));
        assert!(!is_url_with_scheme("ftp://example.com", &["http", "https"]));
        assert!(!is_url_with_scheme("not a url", &["http"]));
    }

    #[test]
    fn test_error_for() {
        let errors = [ValidationError::EmptyEmail, ValidationError::EmptyImapHost];
        assert_eq!(error_for(&errors, "imap_host"), Some("IMAP server is required"));
        assert_eq!(error_for(&errors, "smtp_host"), None);
    }
}
