//! OAuth2 client configurations used by the server for XOAUTH2 and Gmail API accounts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// An OAuth2 client configuration stored on the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuth2Entity {
    /// Configuration id.
    pub id: u64,
    /// Unique description (used as the configuration name).
    pub description: String,
    /// Client id.
    pub client_id: String,
    /// Authorization endpoint.
    pub auth_url: String,
    /// Token endpoint.
    pub token_url: String,
    /// Redirect URI registered with the provider.
    pub redirect_uri: String,
    /// Requested scopes.
    #[serde(default)]
    pub scopes: Vec<String>,
    /// Extra authorization parameters.
    #[serde(default)]
    pub extra_params: BTreeMap<String, String>,
    /// Whether the configuration is usable.
    #[serde(default)]
    pub enabled: bool,
    /// Proxy id for token requests.
    #[serde(default)]
    pub use_proxy: Option<u64>,
    /// Creation time (ms since epoch).
    #[serde(default)]
    pub created_at: i64,
    /// Last update time (ms since epoch).
    #[serde(default)]
    pub updated_at: i64,
}

/// Create or update an OAuth2 configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OAuth2Request {
    /// Unique description.
    pub description: String,
    /// Client id.
    pub client_id: String,
    /// Client secret (write-only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    /// Authorization endpoint.
    pub auth_url: String,
    /// Token endpoint.
    pub token_url: String,
    /// Redirect URI.
    pub redirect_uri: String,
    /// Requested scopes.
    pub scopes: Vec<String>,
    /// Extra authorization parameters.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra_params: BTreeMap<String, String>,
    /// Whether the configuration is usable.
    pub enabled: bool,
    /// Proxy id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_proxy: Option<u64>,
}

/// Ask the server for a provider authorization URL for an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizeUrlRequest {
    /// Account to authorize.
    pub account_id: u64,
    /// OAuth2 configuration name.
    pub oauth2_name: String,
}
