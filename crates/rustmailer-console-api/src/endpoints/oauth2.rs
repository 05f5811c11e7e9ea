//! OAuth2 configuration endpoints.

use crate::client::ApiClient;
use crate::error::Result;
use crate::types::{DataPage, OAuth2Entity, OAuth2Request};

impl ApiClient {
    /// Lists all OAuth2 configurations.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_oauth2(&self) -> Result<Vec<OAuth2Entity>> {
        let page: DataPage<OAuth2Entity> = self.get_json("list-oauth2").await?;
        Ok(page.items)
    }

    /// Creates an OAuth2 configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn create_oauth2(&self, request: &OAuth2Request) -> Result<OAuth2Entity> {
        self.post_json("oauth2", request).await
    }

    /// Replaces an OAuth2 configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn update_oauth2(&self, oauth2_id: u64, request: &OAuth2Request) -> Result<()> {
        self.put_unit(&format!("oauth2/{oauth2_id}"), request).await
    }

    /// Deletes an OAuth2 configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_oauth2(&self, oauth2_id: u64) -> Result<()> {
        self.delete_unit(&format!("oauth2/{oauth2_id}")).await
    }
}
