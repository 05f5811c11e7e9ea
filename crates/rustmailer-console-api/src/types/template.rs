//! Email templates.

use serde::{Deserialize, Serialize};

/// A stored email template.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmailTemplate {
    /// Template id.
    pub id: u64,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Account the template belongs to (absent for shared templates).
    #[serde(default)]
    pub account_id: Option<u64>,
    /// Account email, for display.
    #[serde(default)]
    pub account_email: Option<String>,
    /// Subject (may contain template placeholders).
    pub subject: String,
    /// Preview text.
    #[serde(default)]
    pub preview: Option<String>,
    /// Plain-text body.
    #[serde(default)]
    pub text: Option<String>,
    /// HTML body.
    #[serde(default)]
    pub html: Option<String>,
    /// Creation time (ms since epoch).
    #[serde(default)]
    pub created_at: i64,
    /// Last update time (ms since epoch).
    #[serde(default)]
    pub updated_at: i64,
}

/// Create or update a template.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmailTemplateRequest {
    /// Owning account; `None` makes the template shared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<u64>,
    /// Free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Subject.
    pub subject: String,
    /// Preview text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    /// Plain-text body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// HTML body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

/// Render a template and send it to a test recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSendTestRequest {
    /// Account to send from.
    pub account_id: u64,
    /// Recipient address.
    pub recipient: String,
    /// Placeholder values as a JSON object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_params: Option<serde_json::Value>,
}
