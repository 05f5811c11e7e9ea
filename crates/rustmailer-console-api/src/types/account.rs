//! Account records and requests.

use serde::{Deserialize, Serialize};

/// How the backend talks to the mail provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MailerType {
    /// IMAP for reading, SMTP for sending.
    #[default]
    ImapSmtp,
    /// Gmail REST API (OAuth2 only).
    GmailApi,
}

impl MailerType {
    /// Get display name for the mailer type.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::ImapSmtp => "IMAP / SMTP",
            Self::GmailApi => "Gmail API",
        }
    }
}

/// Connection encryption mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Encryption {
    /// Implicit TLS.
    #[default]
    Ssl,
    /// STARTTLS upgrade after plaintext connect.
    StartTls,
    /// No encryption.
    None,
}

impl Encryption {
    /// Get display name for the encryption mode.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Ssl => "SSL/TLS",
            Self::StartTls => "STARTTLS",
            Self::None => "None (insecure)",
        }
    }
}

/// Authentication method for an IMAP or SMTP server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AuthType {
    /// Username/password login.
    #[default]
    Password,
    /// XOAUTH2 with a token managed by the backend.
    OAuth2,
}

/// Server authentication settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Authentication method.
    pub auth_type: AuthType,
    /// Password (only for [`AuthType::Password`]).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// IMAP or SMTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server hostname.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Encryption mode.
    pub encryption: Encryption,
    /// Authentication settings.
    pub auth: AuthConfig,
    /// Proxy id to route through.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_proxy: Option<u64>,
}

/// Account as stored by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountEntity {
    /// Account id.
    pub id: u64,
    /// Email address.
    pub email: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Mailer type.
    #[serde(default)]
    pub mailer_type: MailerType,
    /// IMAP settings.
    #[serde(default)]
    pub imap: Option<ServerConfig>,
    /// SMTP settings.
    #[serde(default)]
    pub smtp: Option<ServerConfig>,
    /// Whether synchronization is enabled.
    #[serde(default)]
    pub enabled: bool,
    /// Only sync envelopes, never bodies.
    #[serde(default)]
    pub minimal_sync: bool,
    /// Incremental sync interval in minutes.
    #[serde(default)]
    pub sync_interval_min: Option<i64>,
    /// Server capabilities reported at last connect.
    #[serde(default)]
    pub capabilities: Vec<String>,
    /// Creation time (ms since epoch).
    #[serde(default)]
    pub created_at: i64,
    /// Last update time (ms since epoch).
    #[serde(default)]
    pub updated_at: i64,
}

impl AccountEntity {
    /// Label used in pickers and headers.
    #[must_use]
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) if !name.trim().is_empty() => format!("{name} <{}>", self.email),
            _ => self.email.clone(),
        }
    }
}

/// Body of a create-account request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccountCreateRequest {
    /// Email address.
    pub email: String,
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Mailer type.
    pub mailer_type: MailerType,
    /// IMAP settings (required for [`MailerType::ImapSmtp`]).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imap: Option<ServerConfig>,
    /// SMTP settings (required for [`MailerType::ImapSmtp`]).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smtp: Option<ServerConfig>,
    /// Whether synchronization starts enabled.
    pub enabled: bool,
    /// Only sync envelopes.
    pub minimal_sync: bool,
    /// Incremental sync interval in minutes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_interval_min: Option<i64>,
    /// Proxy id for Gmail API traffic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_proxy: Option<u64>,
}

/// Body of an update-account request. Absent fields are left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccountUpdateRequest {
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// IMAP settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imap: Option<ServerConfig>,
    /// SMTP settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smtp: Option<ServerConfig>,
    /// Enable or disable synchronization.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Only sync envelopes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimal_sync: Option<bool>,
    /// Incremental sync interval in minutes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_interval_min: Option<i64>,
    /// Proxy id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_proxy: Option<u64>,
}

impl From<AccountCreateRequest> for AccountUpdateRequest {
    fn from(request: AccountCreateRequest) -> Self {
        Self {
            name: request.name,
            imap: request.imap,
            smtp: request.smtp,
            enabled: Some(request.enabled),
            minimal_sync: Some(request.minimal_sync),
            sync_interval_min: request.sync_interval_min,
            use_proxy: request.use_proxy,
        }
    }
}

/// A sync error recorded by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedError {
    /// Error text.
    pub error: String,
    /// When it happened (ms since epoch).
    pub at: i64,
}

/// Live synchronization state of an account.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountRunningState {
    /// Start of the last full sync.
    pub last_full_sync_start: Option<i64>,
    /// End of the last full sync.
    pub last_full_sync_end: Option<i64>,
    /// Start of the last incremental sync.
    pub last_incremental_sync_start: Option<i64>,
    /// End of the last incremental sync.
    pub last_incremental_sync_end: Option<i64>,
    /// Recent errors.
    pub errors: Vec<TrackedError>,
    /// Whether the initial sync finished.
    pub is_initial_sync_completed: bool,
    /// Folders included in the initial sync.
    pub initial_sync_folders: Vec<String>,
    /// Folder being synced right now.
    pub current_syncing_folder: Option<String>,
    /// Batch number being synced.
    pub current_batch_number: Option<u32>,
    /// Total number of batches.
    pub current_total_batches: Option<u32>,
}

impl AccountRunningState {
    /// Progress of the current batch run as a fraction in `0.0..=1.0`.
    #[must_use]
    pub fn batch_progress(&self) -> Option<f32> {
        match (self.current_batch_number, self.current_total_batches) {
            (Some(current), Some(total)) if total > 0 => {
                #[allow(clippy::cast_precision_loss)]
                let ratio = current.min(total) as f32 / total as f32;
                Some(ratio)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_account_label() {
        let mut account: AccountEntity =
            serde_json::from_str(r#"{"id":1,"email":"ops@example.com"}"#).unwrap();
        assert_eq!(account.label(), "ops@example.com");
        account.name = Some("Ops".into());
        assert_eq!(account.label(), "Ops <ops@example.com>");
    }

    #[test]
    fn test_create_request_skips_empty_servers() {
        let request = AccountCreateRequest {
            email: "me@gmail.com".into(),
            mailer_type: MailerType::GmailApi,
            enabled: true,
            ..Default::default()
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["mailer_type"], "GmailApi");
        assert!(json.get("imap").is_none());
        assert!(json.get("smtp").is_none());
    }

    #[test]
    fn test_batch_progress() {
        let state = AccountRunningState {
            current_batch_number: Some(5),
            current_total_batches: Some(10),
            ..Default::default()
        };
        assert_eq!(state.batch_progress(), Some(0.5));
        assert_eq!(AccountRunningState::default().batch_progress(), None);
    }
}
