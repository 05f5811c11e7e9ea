//! License, root credentials, dashboard and task-queue endpoints.

use tracing::info;

use crate::client::ApiClient;
use crate::error::Result;
use crate::types::{
    DataPage, License, LicenseRequest, LoginRequest, LoginResponse, Overview,
    RootPasswordRequest, TaskListQuery, TaskRecord,
};

impl ApiClient {
    /// Fetches the installed license.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_license(&self) -> Result<License> {
        self.get_json("license").await
    }

    /// Installs a license key and returns the decoded license.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the key is invalid.
    pub async fn set_license(&self, request: &LicenseRequest) -> Result<License> {
        let license: License = self.post_json("license", request).await?;
        info!("Installed license {}", license.id);
        Ok(license)
    }

    /// Generates a new root access token. The previous token stops working.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn reset_root_token(&self) -> Result<String> {
        self.post_empty_text("reset-root-token").await
    }

    /// Sets the root password.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn set_root_password(&self, request: &RootPasswordRequest) -> Result<()> {
        self.post_unit("reset-root-password", request).await
    }

    /// Exchanges the root password for an access token.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Unauthorized`] for a wrong password.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse> {
        self.post_json("login", request).await
    }

    /// Checks that the current access token is accepted.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Unauthorized`] when it is not.
    pub async fn validate_token(&self) -> Result<()> {
        self.get_unit("access-token-validate").await
    }

    /// Fetches dashboard metrics.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn overview(&self) -> Result<Overview> {
        self.get_json("overview").await
    }

    /// Lists outbound email tasks.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_email_tasks(&self, query: &TaskListQuery) -> Result<DataPage<TaskRecord>> {
        self.get_json_with_query("list-email-tasks", query).await
    }

    /// Lists hook delivery tasks.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_hook_tasks(&self, query: &TaskListQuery) -> Result<DataPage<TaskRecord>> {
        self.get_json_with_query("list-hook-tasks", query).await
    }
}
