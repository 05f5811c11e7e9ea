//! MTA (outbound SMTP relay) records.

use serde::{Deserialize, Serialize};

use super::Encryption;

/// SMTP relay credentials.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MtaCredentials {
    /// Username.
    pub username: String,
    /// Password (write-only; the server never returns it).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Relay server address.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MtaServer {
    /// Hostname.
    pub host: String,
    /// Port.
    pub port: u16,
    /// Encryption mode.
    pub encryption: Encryption,
}

/// An MTA record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mta {
    /// MTA id.
    pub id: u64,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Credentials.
    pub credentials: MtaCredentials,
    /// Server address.
    pub server: MtaServer,
    /// Whether the relay supports DSN.
    #[serde(default)]
    pub dsn_capable: bool,
    /// Proxy id.
    #[serde(default)]
    pub use_proxy: Option<u64>,
    /// Creation time (ms since epoch).
    #[serde(default)]
    pub created_at: i64,
    /// Last update time (ms since epoch).
    #[serde(default)]
    pub updated_at: i64,
    /// Last time the relay was used (ms since epoch).
    #[serde(default)]
    pub last_access_at: Option<i64>,
}

/// Create or update an MTA.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MtaRequest {
    /// Free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Credentials.
    pub credentials: MtaCredentials,
    /// Server address.
    pub server: MtaServer,
    /// Whether the relay supports DSN.
    pub dsn_capable: bool,
    /// Proxy id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_proxy: Option<u64>,
}

/// Send a test message through an MTA.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MtaSendTestRequest {
    /// Sender address.
    pub from: String,
    /// Recipient address.
    pub to: String,
    /// Subject.
    pub subject: String,
    /// Plain-text body.
    pub message: String,
}
