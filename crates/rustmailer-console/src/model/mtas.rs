//! MTA page state.

use rustmailer_console_api::types::{Mta, MtaSendTestRequest};
use rustmailer_console_core::address::is_valid_email;
use rustmailer_console_core::dialog::MtaDialog;
use rustmailer_console_core::forms::MtaForm;

use super::RecordPage;
use crate::message::MtaTestField;

/// Fields of the MTA test-send dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MtaTestForm {
    /// Sender.
    pub from: String,
    /// Recipient.
    pub to: String,
    /// Subject.
    pub subject: String,
    /// Body.
    pub message: String,
}

impl MtaTestForm {
    /// Updates one field.
    pub fn set(&mut self, field: MtaTestField, value: String) {
        match field {
            MtaTestField::From => self.from = value,
            MtaTestField::To => self.to = value,
            MtaTestField::Subject => self.subject = value,
            MtaTestField::Message => self.message = value,
        }
    }

    /// Builds the request.
    ///
    /// # Errors
    ///
    /// Returns a message when an address is invalid or the subject is blank.
    pub fn request(&self) -> Result<MtaSendTestRequest, &'static str> {
        if !is_valid_email(self.from.trim()) {
            return Err("Sender must be a valid email address");
        }
        if !is_valid_email(self.to.trim()) {
            return Err("Recipient must be a valid email address");
        }
        if self.subject.trim().is_empty() {
            return Err("Subject is required");
        }
        Ok(MtaSendTestRequest {
            from: self.from.trim().to_string(),
            to: self.to.trim().to_string(),
            subject: self.subject.trim().to_string(),
            message: self.message.clone(),
        })
    }
}

/// MTA list, form and test-send dialog.
#[derive(Debug, Default)]
pub struct MtasState {
    /// List, form and dialog.
    pub records: RecordPage<Mta, MtaForm, MtaDialog>,
    /// Test-send fields.
    pub test: MtaTestForm,
    /// Why the test fields are invalid.
    pub test_error: Option<&'static str>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn filled() -> MtaTestForm {
        let mut form = MtaTestForm::default();
        form.set(MtaTestField::From, " relay@example.com ".into());
        form.set(MtaTestField::To, "ops@example.com".into());
        form.set(MtaTestField::Subject, "Relay check".into());
        form.set(MtaTestField::Message, "hello".into());
        form
    }

    #[test]
    fn test_request_trims_addresses() {
        let request = filled().request().unwrap();
        assert_eq!(request.from, "relay@example.com");
        assert_eq!(request.message, "hello");
    }

    #[test]
    fn test_request_rejects_bad_fields() {
        let mut form = filled();
        form.to = "ops".into();
        assert_eq!(form.request().unwrap_err(), "Recipient must be a valid email address");

        let mut form = filled();
        form.subject = " ".into();
        assert_eq!(form.request().unwrap_err(), "Subject is required");
    }
}
