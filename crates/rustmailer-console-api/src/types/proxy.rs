//! Outbound proxies referenced by accounts, MTAs and OAuth2 configurations.

use serde::{Deserialize, Serialize};

/// An outbound proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proxy {
    /// Proxy id.
    pub id: u64,
    /// `socks5://` or `http://` URL.
    pub url: String,
    /// Creation time (ms since epoch).
    #[serde(default)]
    pub created_at: i64,
    /// Last update time (ms since epoch).
    #[serde(default)]
    pub updated_at: i64,
}

/// Create or update a proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyRequest {
    /// Proxy URL.
    pub url: String,
}
