//! Proxy endpoints.

use crate::client::ApiClient;
use crate::error::Result;
use crate::types::{Proxy, ProxyRequest};

impl ApiClient {
    /// Lists all proxies.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_proxies(&self) -> Result<Vec<Proxy>> {
        self.get_json("list-proxy").await
    }

    /// Creates a proxy.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn create_proxy(&self, request: &ProxyRequest) -> Result<Proxy> {
        self.post_json("proxy", request).await
    }

    /// Changes a proxy URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn update_proxy(&self, proxy_id: u64, request: &ProxyRequest) -> Result<()> {
        self.put_unit(&format!("proxy/{proxy_id}"), request).await
    }

    /// Deletes a proxy.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_proxy(&self, proxy_id: u64) -> Result<()> {
        self.delete_unit(&format!("proxy/{proxy_id}")).await
    }
}
