//! Email template endpoints.

use crate::client::ApiClient;
use crate::error::Result;
use crate::types::{DataPage, EmailTemplate, EmailTemplateRequest, TemplateSendTestRequest};

impl ApiClient {
    /// Lists all templates.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_templates(&self) -> Result<Vec<EmailTemplate>> {
        let page: DataPage<EmailTemplate> = self.get_json("list-templates").await?;
        Ok(page.items)
    }

    /// Fetches one template.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_template(&self, template_id: u64) -> Result<EmailTemplate> {
        self.get_json(&format!("template/{template_id}")).await
    }

    /// Creates a template.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn create_template(&self, request: &EmailTemplateRequest) -> Result<EmailTemplate> {
        self.post_json("template", request).await
    }

    /// Replaces a template.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn update_template(
        &self,
        template_id: u64,
        request: &EmailTemplateRequest,
    ) -> Result<()> {
        self.put_unit(&format!("template/{template_id}"), request)
            .await
    }

    /// Deletes a template.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_template(&self, template_id: u64) -> Result<()> {
        self.delete_unit(&format!("template/{template_id}")).await
    }

    /// Renders a template and sends it to a test recipient.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn send_test_template(
        &self,
        template_id: u64,
        request: &TemplateSendTestRequest,
    ) -> Result<()> {
        self.post_unit(&format!("template-send-test/{template_id}"), request)
            .await
    }
}
