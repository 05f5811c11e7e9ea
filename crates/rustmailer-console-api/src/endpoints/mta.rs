//! MTA endpoints.

use crate::client::ApiClient;
use crate::error::Result;
use crate::types::{DataPage, Mta, MtaRequest, MtaSendTestRequest};

impl ApiClient {
    /// Lists all MTAs.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_mtas(&self) -> Result<Vec<Mta>> {
        let page: DataPage<Mta> = self.get_json("list-mta").await?;
        Ok(page.items)
    }

    /// Creates an MTA.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn create_mta(&self, request: &MtaRequest) -> Result<Mta> {
        self.post_json("mta", request).await
    }

    /// Replaces an MTA's settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn update_mta(&self, mta_id: u64, request: &MtaRequest) -> Result<()> {
        self.put_unit(&format!("mta/{mta_id}"), request).await
    }

    /// Deletes an MTA.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_mta(&self, mta_id: u64) -> Result<()> {
        self.delete_unit(&format!("mta/{mta_id}")).await
    }

    /// Sends a test message through an MTA.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the relay refuses the message.
    pub async fn send_test_mta(&self, mta_id: u64, request: &MtaSendTestRequest) -> Result<()> {
        self.post_unit(&format!("mta-send-test/{mta_id}"), request)
            .await
    }
}
