//! Email templates page state.

use iced::widget::text_editor;
use rustmailer_console_api::types::EmailTemplate;
use rustmailer_console_core::dialog::TemplateDialog;
use rustmailer_console_core::forms::{TemplateForm, ValidationError, error_for};

use super::RecordPage;

/// Template list, form, body editors and the test-send dialog.
pub struct TemplatesState {
    /// List, form and dialog.
    pub records: RecordPage<EmailTemplate, TemplateForm, TemplateDialog>,
    /// Plain-text body editor.
    pub text: text_editor::Content,
    /// HTML body editor.
    pub html: text_editor::Content,
    /// Account that sends the test.
    pub test_account: Option<u64>,
    /// Test recipient.
    pub test_recipient: String,
    /// Template parameters as JSON.
    pub test_params: text_editor::Content,
    /// Problems with the test-send fields.
    pub test_errors: Vec<ValidationError>,
}

impl Default for TemplatesState {
    fn default() -> Self {
        Self {
            records: RecordPage::default(),
            text: text_editor::Content::new(),
            html: text_editor::Content::new(),
            test_account: None,
            test_recipient: String::new(),
            test_params: text_editor::Content::new(),
            test_errors: Vec::new(),
        }
    }
}

impl TemplatesState {
    /// Loads the form bodies into the editors.
    pub fn sync_editors(&mut self) {
        self.text = text_editor::Content::with_text(&self.records.form.text);
        self.html = text_editor::Content::with_text(&self.records.form.html);
    }

    /// Copies the editor texts back into the form.
    pub fn sync_form(&mut self) {
        self.records.form.text = self.text.text();
        self.records.form.html = self.html.text();
    }

    /// Resets the test-send fields, defaulting the sender to the template's
    /// own account.
    pub fn reset_test(&mut self, account_id: Option<u64>) {
        self.test_account = account_id;
        self.test_recipient.clear();
        self.test_params = text_editor::Content::with_text("{}");
        self.test_errors.clear();
    }

    /// First test-send message for `field`.
    #[must_use]
    pub fn test_error(&self, field: &str) -> Option<&str> {
        error_for(&self.test_errors, field)
    }
}
