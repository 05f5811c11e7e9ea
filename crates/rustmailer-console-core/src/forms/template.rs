//! Email template form and the test-send dialog.

use rustmailer_console_api::types::{EmailTemplate, EmailTemplateRequest, TemplateSendTestRequest};

use super::{ValidationError, ValidationResult, finish, non_blank};
use crate::address::is_valid_email;

/// Add/edit template form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateForm {
    /// Template being edited; `None` when adding.
    pub template_id: Option<u64>,
    /// Owning account; `None` for a shared template.
    pub account_id: Option<u64>,
    /// Description.
    pub description: String,
    /// Subject (may contain template placeholders).
    pub subject: String,
    /// Inbox preview line.
    pub preview: String,
    /// Plain-text body.
    pub text: String,
    /// HTML body.
    pub html: String,
}

impl TemplateForm {
    /// Creates an empty add form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fills an edit form from a stored template.
    #[must_use]
    pub fn from_template(template: &EmailTemplate) -> Self {
        Self {
            template_id: Some(template.id),
            account_id: template.account_id,
            description: template.description.clone().unwrap_or_default(),
            subject: template.subject.clone(),
            preview: template.preview.clone().unwrap_or_default(),
            text: template.text.clone().unwrap_or_default(),
            html: template.html.clone().unwrap_or_default(),
        }
    }

    /// Validates the form.
    ///
    /// # Errors
    ///
    /// Returns every invalid field.
    pub fn validate(&self) -> ValidationResult<EmailTemplateRequest> {
        let mut errors = Vec::new();
        if self.description.trim().is_empty() {
            errors.push(ValidationError::EmptyDescription);
        }
        if self.subject.trim().is_empty() {
            errors.push(ValidationError::EmptySubject);
        }
        if self.text.trim().is_empty() && self.html.trim().is_empty() {
            errors.push(ValidationError::EmptyTemplateBody);
        }

        finish(errors, || EmailTemplateRequest {
            account_id: self.account_id,
            description: non_blank(&self.description),
            subject: self.subject.trim().to_string(),
            preview: non_blank(&self.preview),
            text: non_blank(&self.text),
            html: non_blank(&self.html),
        })
    }

    /// Builds a test-send request.
    ///
    /// `params` is optional JSON; when given it must be an object.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidEmail`] or
    /// [`ValidationError::InvalidTemplateParams`].
    pub fn send_test_request(
        account_id: u64,
        recipient: &str,
        params: &str,
    ) -> ValidationResult<TemplateSendTestRequest> {
        let mut errors = Vec::new();
        let recipient = recipient.trim();
        if recipient.is_empty() {
            errors.push(ValidationError::EmptyEmail);
        } else if !is_valid_email(recipient) {
            errors.push(ValidationError::InvalidEmail);
        }

        let template_params = if params.trim().is_empty() {
            None
        } else {
            match serde_json::from_str::<serde_json::Value>(params) {
                Ok(value) if value.is_object() => Some(value),
                _ => {
                    errors.push(ValidationError::InvalidTemplateParams);
                    None
                }
            }
        };

        finish(errors, || TemplateSendTestRequest {
            account_id,
            recipient: recipient.to_string(),
            template_params,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_some_body() {
        let form = TemplateForm {
            description: "Welcome".into(),
            subject: "Hello {{name}}".into(),
            ..TemplateForm::default()
        };
        assert_eq!(
            form.validate().unwrap_err(),
            [ValidationError::EmptyTemplateBody]
        );

        let form = TemplateForm {
            html: "<p>Hi {{name}}</p>".into(),
            ..form
        };
        let request = form.validate().unwrap();
        assert!(request.text.is_none());
        assert_eq!(request.html.as_deref(), Some("<p>Hi {{name}}</p>"));
    }

    #[test]
    fn test_send_test_params() {
        let request =
            TemplateForm::send_test_request(1, "ops@example.com", r#"{"name": "Ada"}"#).unwrap();
        assert_eq!(request.template_params.unwrap()["name"], "Ada");

        let request = TemplateForm::send_test_request(1, "ops@example.com", "  ").unwrap();
        assert!(request.template_params.is_none());
    }

    #[test]
    fn test_send_test_rejects_non_object() {
        assert_eq!(
            TemplateForm::send_test_request(1, "nobody", "[1, 2]").unwrap_err(),
            [
                ValidationError::InvalidEmail,
                ValidationError::InvalidTemplateParams
            ]
        );
    }
}
