//! Event hooks page state.

use iced::widget::text_editor;
use rustmailer_console_api::types::{EventHook, ResolveResult};
use rustmailer_console_core::dialog::HookDialog;
use rustmailer_console_core::forms::{HookChannelForm, HookForm};

use super::RecordPage;

/// Event used to try a VRL script when the user has not written one.
pub const SAMPLE_EVENT: &str = r#"{
  "event_type": "EmailAddedToFolder",
  "account_id": 1,
  "account_email": "user@example.com",
  "timestamp": 1700000000000,
  "payload": {
    "mailbox_name": "INBOX",
    "uid": 42,
    "subject": "Quarterly report",
    "from": { "name": "Alice", "address": "alice@example.com" }
  }
}"#;

/// Parses the sample event typed in the VRL test dialog.
///
/// Blank input means "no event".
///
/// # Errors
///
/// Returns the parse error when the text is not JSON.
pub fn parse_sample_event(input: &str) -> Result<Option<serde_json::Value>, String> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(input)
        .map(Some)
        .map_err(|e| format!("Sample event is not valid JSON: {e}"))
}

/// Hook list, form, script editor and VRL test dialog.
pub struct HooksState {
    /// List, form and dialog.
    pub records: RecordPage<EventHook, HookForm, HookDialog>,
    /// VRL script editor backing `records.form.vrl_script`.
    pub script: text_editor::Content,
    /// Header editor backing the HTTP channel's `headers`.
    pub headers: text_editor::Content,
    /// Sample event editor.
    pub sample_event: text_editor::Content,
    /// Last script result.
    pub vrl_result: Option<ResolveResult>,
    /// Why the last test could not run.
    pub vrl_error: Option<String>,
    /// A test is in flight.
    pub vrl_running: bool,
    /// Dialog to return to when the VRL test closes.
    pub return_to: Option<HookDialog>,
}

impl Default for HooksState {
    fn default() -> Self {
        Self {
            records: RecordPage::default(),
            script: text_editor::Content::new(),
            headers: text_editor::Content::new(),
            sample_event: text_editor::Content::with_text(SAMPLE_EVENT),
            vrl_result: None,
            vrl_error: None,
            vrl_running: false,
            return_to: None,
        }
    }
}

impl HooksState {
    /// Loads the form's script and headers into the editors.
    pub fn sync_editor(&mut self) {
        self.script = text_editor::Content::with_text(&self.records.form.vrl_script);
        let headers = match &self.records.form.channel {
            HookChannelForm::Http { headers, .. } => headers.as_str(),
            HookChannelForm::Nats { .. } => "",
        };
        self.headers = text_editor::Content::with_text(headers);
    }

    /// Copies the editor text back into the form.
    pub fn sync_form(&mut self) {
        self.records.form.vrl_script = self.script.text();
        if let HookChannelForm::Http { headers, .. } = &mut self.records.form.channel {
            *headers = self.headers.text();
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_event_is_valid() {
        let value = parse_sample_event(SAMPLE_EVENT).unwrap().unwrap();
        assert_eq!(value["event_type"], "EmailAddedToFolder");
    }

    #[test]
    fn test_headers_round_trip_through_editor() {
        let mut state = HooksState::default();
        state.records.form.channel = HookChannelForm::Http {
            target_url: "https://hooks.example.com".into(),
            method: rustmailer_console_api::types::HttpMethod::Post,
            headers: "X-Token: abc".into(),
        };
        state.sync_editor();
        assert_eq!(state.headers.text().trim_end(), "X-Token: abc");

        state.headers = text_editor::Content::with_text("X-Token: abc\nX-Env: prod");
        state.sync_form();
        let HookChannelForm::Http { headers, .. } = &state.records.form.channel else {
            panic!("channel changed");
        };
        assert_eq!(headers.trim_end(), "X-Token: abc\nX-Env: prod");
    }

    #[test]
    fn test_blank_and_invalid_sample() {
        assert_eq!(parse_sample_event("  \n").unwrap(), None);
        assert!(parse_sample_event("{oops").unwrap_err().contains("not valid JSON"));
    }
}
